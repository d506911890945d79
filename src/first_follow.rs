//! Nullability, FNE, FIRST and FOLLOW set computation.
//!
//! All three analyses are least fixed points, computed by worklist
//! iteration so that left- and right-recursive grammars terminate
//! without any recursion guard.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashMap, HashSet};

/// The memoized set analysis of a grammar.
///
/// Built once per grammar by [`Analysis::compute`]; every accessor is a
/// pure lookup afterwards.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Non-terminals with an entirely nullable alternative.
    nullable: HashSet<Symbol>,
    /// First-non-epsilon sets, for terminals and non-terminals alike.
    fne: HashMap<Symbol, BTreeSet<Symbol>>,
    /// FOLLOW sets, for non-terminals only.
    follow: HashMap<Symbol, BTreeSet<Symbol>>,
}

impl Analysis {
    /// Runs all three fixed points over the grammar.
    pub fn compute(grammar: &Grammar) -> Self {
        let nullable = compute_nullable(grammar);
        let fne = compute_fne(grammar, &nullable);
        let follow = compute_follow(grammar, &nullable, &fne);
        Self {
            nullable,
            fne,
            follow,
        }
    }

    /// True iff the symbol derives the empty word. Terminals never do.
    pub fn is_nullable(&self, x: &Symbol) -> bool {
        self.nullable.contains(x)
    }

    /// True iff every symbol of the body is nullable. Vacuously true for
    /// an empty body.
    pub fn is_rule_nullable(&self, body: &[Symbol]) -> bool {
        body.iter().all(|s| self.is_nullable(s))
    }

    /// First-non-epsilon set of a symbol: `{x}` for a terminal, the
    /// union over alternatives for a non-terminal. Never contains ε.
    pub fn fne(&self, x: &Symbol) -> BTreeSet<Symbol> {
        self.fne
            .get(x)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([x.clone()]))
    }

    /// FNE of a body: scan left to right, accumulating each symbol's FNE
    /// and stopping past the first non-nullable symbol. Empty for an
    /// empty body.
    pub fn fne_of_rule(&self, body: &[Symbol]) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        for sym in body {
            out.extend(self.fne(sym));
            if !self.is_nullable(sym) {
                break;
            }
        }
        out
    }

    /// FIRST of a symbol: FNE plus the explicit ε member when nullable.
    pub fn first(&self, x: &Symbol) -> BTreeSet<Symbol> {
        let mut set = self.fne(x);
        if self.is_nullable(x) {
            set.insert(Symbol::epsilon());
        }
        set
    }

    /// FOLLOW of a non-terminal. `None` for terminals, where FOLLOW is
    /// undefined.
    pub fn follow(&self, x: &Symbol) -> Option<&BTreeSet<Symbol>> {
        self.follow.get(x)
    }
}

/// Least fixed point of: a non-terminal is nullable iff some alternative
/// is entirely composed of nullable symbols.
fn compute_nullable(grammar: &Grammar) -> HashSet<Symbol> {
    let mut nullable = HashSet::new();

    let mut changed = true;
    while changed {
        changed = false;
        for (head, body) in grammar.productions() {
            if nullable.contains(head) {
                continue;
            }
            if body.iter().all(|s| nullable.contains(s)) {
                nullable.insert(head.clone());
                changed = true;
            }
        }
    }

    nullable
}

fn compute_fne(
    grammar: &Grammar,
    nullable: &HashSet<Symbol>,
) -> HashMap<Symbol, BTreeSet<Symbol>> {
    let mut fne: HashMap<Symbol, BTreeSet<Symbol>> = HashMap::new();

    for t in grammar.terminals() {
        fne.insert(t.clone(), BTreeSet::from([t.clone()]));
    }
    for v in grammar.non_terminals() {
        fne.insert(v.clone(), BTreeSet::new());
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (head, body) in grammar.productions() {
            // FNE of the body against the sets known so far.
            let mut add = BTreeSet::new();
            for sym in body {
                if let Some(set) = fne.get(sym) {
                    add.extend(set.iter().cloned());
                }
                if !nullable.contains(sym) {
                    break;
                }
            }

            let current = fne.get_mut(head).unwrap();
            let before = current.len();
            current.extend(add);
            if current.len() != before {
                changed = true;
            }
        }
    }

    fne
}

/// Least fixed point of the FOLLOW rules: `$` for the axiom; for each
/// occurrence `H → α X β`, the FNE prefix of β up to its first
/// non-nullable symbol; FOLLOW(H) as well when β is entirely nullable.
fn compute_follow(
    grammar: &Grammar,
    nullable: &HashSet<Symbol>,
    fne: &HashMap<Symbol, BTreeSet<Symbol>>,
) -> HashMap<Symbol, BTreeSet<Symbol>> {
    let mut follow: HashMap<Symbol, BTreeSet<Symbol>> = HashMap::new();

    for v in grammar.non_terminals() {
        follow.insert(v.clone(), BTreeSet::new());
    }
    follow
        .get_mut(grammar.axiom())
        .unwrap()
        .insert(Symbol::end_marker());

    let mut changed = true;
    while changed {
        changed = false;
        for (head, body) in grammar.productions() {
            for (i, sym) in body.iter().enumerate() {
                if grammar.is_terminal(sym) {
                    continue;
                }

                let beta = &body[i + 1..];
                let mut add = BTreeSet::new();
                let mut beta_nullable = true;
                for b in beta {
                    if let Some(set) = fne.get(b) {
                        add.extend(set.iter().cloned());
                    }
                    if !nullable.contains(b) {
                        beta_nullable = false;
                        break;
                    }
                }
                if beta_nullable {
                    add.extend(follow.get(head).into_iter().flatten().cloned());
                }

                let target = follow.get_mut(sym).unwrap();
                let before = target.len();
                target.extend(add);
                if target.len() != before {
                    changed = true;
                }
            }
        }
    }

    follow
}

/// Set-analysis accessors on the grammar itself, delegating to the
/// memoized [`Analysis`].
impl Grammar {
    pub fn is_nullable(&self, x: &Symbol) -> bool {
        self.analysis().is_nullable(x)
    }

    pub fn fne(&self, x: &Symbol) -> BTreeSet<Symbol> {
        self.analysis().fne(x)
    }

    pub fn first(&self, x: &Symbol) -> BTreeSet<Symbol> {
        self.analysis().first(x)
    }

    pub fn follow(&self, x: &Symbol) -> Option<&BTreeSet<Symbol>> {
        self.analysis().follow(x)
    }
}
