//! LL(1) predictive table construction and the table-driven parser.
//!
//! The table keeps every alternative claiming a cell, in rule order, so
//! conflicts stay visible; the strict view used by the driver is the
//! first entry of each cell.

use crate::error::{GrammarError, Result};
use crate::grammar::{Grammar, Production};
use crate::symbol::{Symbol, string_to_symbols};
use log::warn;
use std::collections::HashMap;
use std::fmt;

/// Default step limit for the LL(1) driver.
pub const DEFAULT_STEP_LIMIT: usize = 50;

/// A predictive-table cell claimed by two or more alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Conflict {
    pub non_terminal: Symbol,
    pub terminal: Symbol,
    /// The claiming alternatives, in rule order. The first one wins.
    pub productions: Vec<Production>,
}

impl fmt::Display for Ll1Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .productions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "conflict at [{}, {}]: {}",
            self.non_terminal, self.terminal, entries
        )
    }
}

/// The LL(1) predictive parse table.
#[derive(Debug, Clone)]
pub struct Ll1Table {
    rows: HashMap<Symbol, HashMap<Symbol, Vec<Production>>>,
    conflicts: Vec<Ll1Conflict>,
}

impl Ll1Table {
    /// Builds the table from the grammar's set analysis.
    ///
    /// # Algorithm
    /// For each non-terminal `V` and each `t ∈ T ∪ {$}`:
    /// 1. Add every alternative `body` with `t ∈ FNE_rule(body)`.
    /// 2. If `t ∈ FOLLOW(V)`, add every entirely nullable alternative.
    /// A cell with two or more distinct entries is a conflict.
    pub fn build(grammar: &Grammar) -> Self {
        let analysis = grammar.analysis();
        let mut rows: HashMap<Symbol, HashMap<Symbol, Vec<Production>>> = HashMap::new();
        let mut conflicts = Vec::new();

        let mut lookaheads: Vec<Symbol> = grammar.terminals().iter().cloned().collect();
        lookaheads.push(Symbol::end_marker());

        for v in grammar.non_terminals() {
            let mut row: HashMap<Symbol, Vec<Production>> = HashMap::new();
            for t in &lookaheads {
                let mut entries: Vec<Production> = Vec::new();
                for body in grammar.alternatives(v) {
                    if analysis.fne_of_rule(body).contains(t) {
                        entries.push(Production::new(v.clone(), body.clone()));
                    }
                }
                if analysis.follow(v).is_some_and(|f| f.contains(t)) {
                    for body in grammar.alternatives(v) {
                        if !analysis.is_rule_nullable(body) {
                            continue;
                        }
                        let p = Production::new(v.clone(), body.clone());
                        if !entries.contains(&p) {
                            entries.push(p);
                        }
                    }
                }
                if entries.is_empty() {
                    continue;
                }
                if entries.len() > 1 {
                    let conflict = Ll1Conflict {
                        non_terminal: v.clone(),
                        terminal: t.clone(),
                        productions: entries.clone(),
                    };
                    warn!("LL(1) {conflict}");
                    conflicts.push(conflict);
                }
                row.insert(t.clone(), entries);
            }
            rows.insert(v.clone(), row);
        }

        Self { rows, conflicts }
    }

    /// Every alternative claiming the cell, in rule order.
    pub fn entries(&self, v: &Symbol, t: &Symbol) -> &[Production] {
        self.rows
            .get(v)
            .and_then(|row| row.get(t))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Strict view: the first alternative claiming the cell.
    pub fn entry(&self, v: &Symbol, t: &Symbol) -> Option<&Production> {
        self.entries(v, t).first()
    }

    /// The conflicts found while building, in discovery order.
    pub fn conflicts(&self) -> &[Ll1Conflict] {
        &self.conflicts
    }

    /// True iff no cell holds more than one alternative.
    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Parses an input with the stack-based predictive driver.
    ///
    /// The stack starts as `[axiom, $]` (top first) and the input gets
    /// `$` appended. Rejection is reported through the returned run, not
    /// as an error; `Err` only flags an input symbol outside `T`.
    pub fn parse(&self, grammar: &Grammar, input: &[Symbol], limit: usize) -> Result<Ll1Run> {
        for sym in input {
            if !grammar.terminals().contains(sym) {
                return Err(GrammarError::UnknownSymbol(sym.to_string()));
            }
        }

        // Top of stack lives at the end; trace rows snapshot it top first.
        let mut stack: Vec<Symbol> = vec![Symbol::end_marker(), grammar.axiom().clone()];
        let mut input: Vec<Symbol> = input.to_vec();
        input.push(Symbol::end_marker());
        let mut pos = 0;

        let mut steps: Vec<Ll1Step> = Vec::new();
        let mut accepted = false;

        loop {
            let snapshot_stack: Vec<Symbol> = stack.iter().rev().cloned().collect();
            let snapshot_input: Vec<Symbol> = input[pos..].to_vec();

            if steps.len() == limit {
                steps.push(Ll1Step {
                    stack: snapshot_stack,
                    remaining: snapshot_input,
                    action: Ll1Action::LimitReached,
                });
                break;
            }

            let top = stack.last().cloned().unwrap_or_else(Symbol::end_marker);
            let lookahead = input[pos].clone();

            let action = if top == lookahead {
                if top.is_end_marker() {
                    accepted = true;
                    Ll1Action::Accept
                } else {
                    stack.pop();
                    pos += 1;
                    Ll1Action::Match(top)
                }
            } else if grammar.is_terminal(&top) {
                Ll1Action::Error
            } else if let Some(production) = self.entry(&top, &lookahead) {
                stack.pop();
                // Push the body reversed so its first symbol ends on top.
                for sym in production.body.iter().rev() {
                    stack.push(sym.clone());
                }
                Ll1Action::Apply(production.clone())
            } else {
                Ll1Action::Error
            };

            let done = matches!(action, Ll1Action::Accept | Ll1Action::Error);
            steps.push(Ll1Step {
                stack: snapshot_stack,
                remaining: snapshot_input,
                action,
            });
            if done {
                break;
            }
        }

        Ok(Ll1Run { accepted, steps })
    }
}

/// One row of an LL(1) driver trace.
#[derive(Debug, Clone)]
pub struct Ll1Step {
    /// The parse stack, top first.
    pub stack: Vec<Symbol>,
    /// The unconsumed input, `$` included.
    pub remaining: Vec<Symbol>,
    pub action: Ll1Action,
}

/// What the driver did at one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ll1Action {
    Match(Symbol),
    Apply(Production),
    Accept,
    Error,
    LimitReached,
}

impl fmt::Display for Ll1Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ll1Action::Match(sym) => write!(f, "match {sym}"),
            Ll1Action::Apply(production) => write!(f, "apply {production}"),
            Ll1Action::Accept => write!(f, "accept"),
            Ll1Action::Error => write!(f, "parsing error"),
            Ll1Action::LimitReached => write!(f, "limit reached"),
        }
    }
}

/// Outcome of a driver run: acceptance plus the full step trace.
#[derive(Debug, Clone)]
pub struct Ll1Run {
    pub accepted: bool,
    pub steps: Vec<Ll1Step>,
}

impl Ll1Run {
    /// The action that ended the run.
    pub fn last_action(&self) -> Option<&Ll1Action> {
        self.steps.last().map(|s| &s.action)
    }
}

/// LL(1) entry points on the grammar itself.
impl Grammar {
    /// Builds the LL(1) predictive table.
    pub fn ll1_table(&self) -> Ll1Table {
        Ll1Table::build(self)
    }

    /// Parses a plain string, one terminal per character.
    pub fn ll1_parse(&self, input: &str, limit: usize) -> Result<Ll1Run> {
        self.ll1_parse_symbols(&string_to_symbols(input), limit)
    }

    /// Parses a symbol sequence; keeps multi-character terminals usable.
    pub fn ll1_parse_symbols(&self, input: &[Symbol], limit: usize) -> Result<Ll1Run> {
        self.ll1_table().parse(self, input, limit)
    }
}
