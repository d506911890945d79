//! LR(0) items, the canonical collection, and the shift/reduce parser.
//!
//! The grammar is augmented with `S' → axiom`; state 0 is the closure of
//! the augmented start item. States are identified by item-set
//! membership, with items canonically ordered by `(head, body, dot)`.

use crate::error::{GrammarError, Result};
use crate::grammar::{Grammar, Production, Rule};
use crate::symbol::{self, Symbol, string_to_symbols};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Default step limit for the LR(0) driver.
pub const DEFAULT_STEP_LIMIT: usize = 20;

/// Default ceiling on the size of the canonical collection.
pub const DEFAULT_STATE_CAP: usize = 10_000;

/// A production with a dot marking parse progress.
///
/// The derived ordering (head, then body, then dot) is the canonical
/// item order used for state identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item {
    pub head: Symbol,
    pub body: Rule,
    pub dot: usize,
}

impl Item {
    pub fn new(head: Symbol, body: Rule, dot: usize) -> Self {
        Self { head, body, dot }
    }

    /// The symbol just past the dot, if any.
    pub fn symbol_after_dot(&self) -> Option<&Symbol> {
        self.body.get(self.dot)
    }

    /// Checks if the dot sits at the end of the body.
    pub fn is_reduce(&self) -> bool {
        self.dot == self.body.len()
    }

    /// The same item with the dot moved one symbol right.
    pub fn advanced(&self) -> Item {
        Item::new(self.head.clone(), self.body.clone(), self.dot + 1)
    }

    /// The underlying dotless production.
    pub fn production(&self) -> Production {
        Production::new(self.head.clone(), self.body.clone())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.head, symbol::ARROW)?;
        for s in &self.body[..self.dot] {
            write!(f, "{s}")?;
        }
        write!(f, "{}", symbol::BULLET)?;
        for s in &self.body[self.dot..] {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// An ordered, deduplicated set of items. Two states with the same
/// membership are the same state.
pub type ItemSet = BTreeSet<Item>;

/// Closure of an item set: for every item with a non-terminal past the
/// dot, all of its alternatives join with the dot at 0, to a fixed point.
pub fn closure(grammar: &Grammar, mut items: ItemSet) -> ItemSet {
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot: Vec<Item> = items.iter().cloned().collect();
        for item in snapshot {
            if let Some(sym) = item.symbol_after_dot() {
                if grammar.is_non_terminal(sym) {
                    for body in grammar.alternatives(sym) {
                        let new_item = Item::new(sym.clone(), body.clone(), 0);
                        if items.insert(new_item) {
                            changed = true;
                        }
                    }
                }
            }
        }
    }
    items
}

/// Goto: closure of every item whose dot can move over `x`.
pub fn goto(grammar: &Grammar, items: &ItemSet, x: &Symbol) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.symbol_after_dot() == Some(x))
        .map(Item::advanced)
        .collect();
    if moved.is_empty() {
        moved
    } else {
        closure(grammar, moved)
    }
}

/// The canonical collection: numbered item sets plus their transitions.
#[derive(Debug, Clone)]
pub struct StateGraph {
    states: Vec<ItemSet>,
    /// Per-state successor map, parallel to `states`.
    transitions: Vec<BTreeMap<Symbol, usize>>,
}

impl StateGraph {
    /// Builds the collection, sweeping symbols in sorted `V ∪ T` order
    /// so numbering is deterministic.
    ///
    /// # Errors
    /// Fails with `StateExplosion` when more than `cap` states arise.
    pub fn build(grammar: &Grammar, cap: usize) -> Result<Self> {
        let vocabulary: Vec<Symbol> = grammar.symbols().into_iter().collect();
        let start = Item::new(
            Symbol::augmented_start(),
            vec![grammar.axiom().clone()],
            0,
        );

        let mut states = vec![closure(grammar, ItemSet::from([start]))];
        let mut transitions: Vec<BTreeMap<Symbol, usize>> = vec![BTreeMap::new()];

        let mut current = 0;
        while current < states.len() {
            let item_set = states[current].clone();
            for x in &vocabulary {
                let target = goto(grammar, &item_set, x);
                if target.is_empty() {
                    continue;
                }
                let id = match states.iter().position(|s| *s == target) {
                    Some(existing) => existing,
                    None => {
                        if states.len() >= cap {
                            return Err(GrammarError::StateExplosion { limit: cap });
                        }
                        states.push(target);
                        transitions.push(BTreeMap::new());
                        states.len() - 1
                    }
                };
                transitions[current].insert(x.clone(), id);
            }
            current += 1;
        }

        debug!("LR(0) canonical collection has {} states", states.len());
        Ok(Self {
            states,
            transitions,
        })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The item set of a state.
    pub fn items(&self, state: usize) -> &ItemSet {
        &self.states[state]
    }

    /// The successor of `state` on `x`, if any.
    pub fn transition(&self, state: usize, x: &Symbol) -> Option<usize> {
        self.transitions[state].get(x).copied()
    }

    /// All transitions leaving a state, in symbol order.
    pub fn transitions_from(&self, state: usize) -> &BTreeMap<Symbol, usize> {
        &self.transitions[state]
    }

    /// Every `(origin, symbol)` pair leading into a state.
    pub fn origins(&self, state: usize) -> Vec<(usize, &Symbol)> {
        let mut origins = Vec::new();
        for (source, row) in self.transitions.iter().enumerate() {
            for (sym, &target) in row {
                if target == state {
                    origins.push((source, sym));
                }
            }
        }
        origins
    }

    /// The reduce items of a state, in canonical order.
    pub fn reduce_items(&self, state: usize) -> Vec<&Item> {
        self.states[state].iter().filter(|i| i.is_reduce()).collect()
    }
}

/// An ACTION-table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(Production),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "shift {state}"),
            Action::Reduce(production) => write!(f, "reduce {production}"),
            Action::Accept => write!(f, "accept"),
        }
    }
}

/// A cell that was claimed twice. The first claim stays in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lr0Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub kept: Action,
    pub dropped: Action,
}

impl fmt::Display for Lr0Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflict at [{}, {}]: kept {}, dropped {}",
            self.state, self.symbol, self.kept, self.dropped
        )
    }
}

/// The LR(0) ACTION/GOTO table.
#[derive(Debug, Clone)]
pub struct Lr0Table {
    /// Per-state actions over `T ∪ {$}`.
    actions: Vec<BTreeMap<Symbol, Action>>,
    /// Per-state gotos over the non-terminals.
    gotos: Vec<BTreeMap<Symbol, usize>>,
    conflicts: Vec<Lr0Conflict>,
}

impl Lr0Table {
    /// Derives the table from the canonical collection.
    ///
    /// Shifts and gotos come from the transitions; every reduce item
    /// writes its reduction on all of `T ∪ {$}` (pure LR(0), reductions
    /// on any lookahead); `S' → axiom•` writes accept at `$`. Collisions
    /// are recorded as conflicts and the first entry stands.
    pub fn build(grammar: &Grammar, graph: &StateGraph) -> Self {
        let mut lookaheads: Vec<Symbol> = grammar.terminals().iter().cloned().collect();
        lookaheads.push(Symbol::end_marker());

        let mut actions: Vec<BTreeMap<Symbol, Action>> = Vec::with_capacity(graph.len());
        let mut gotos: Vec<BTreeMap<Symbol, usize>> = Vec::with_capacity(graph.len());
        let mut conflicts = Vec::new();

        for state in 0..graph.len() {
            let mut action_row: BTreeMap<Symbol, Action> = BTreeMap::new();
            let mut goto_row: BTreeMap<Symbol, usize> = BTreeMap::new();

            for (sym, &target) in graph.transitions_from(state) {
                if grammar.is_non_terminal(sym) {
                    goto_row.insert(sym.clone(), target);
                } else {
                    action_row.insert(sym.clone(), Action::Shift(target));
                }
            }

            for item in graph.reduce_items(state) {
                if item.head == Symbol::augmented_start() {
                    set_action(
                        &mut action_row,
                        &mut conflicts,
                        state,
                        &Symbol::end_marker(),
                        Action::Accept,
                    );
                } else {
                    let reduce = Action::Reduce(item.production());
                    for t in &lookaheads {
                        set_action(&mut action_row, &mut conflicts, state, t, reduce.clone());
                    }
                }
            }

            actions.push(action_row);
            gotos.push(goto_row);
        }

        Self {
            actions,
            gotos,
            conflicts,
        }
    }

    /// The action at `[state, terminal-or-$]`, if any.
    pub fn action(&self, state: usize, symbol: &Symbol) -> Option<&Action> {
        self.actions[state].get(symbol)
    }

    /// The goto at `[state, non-terminal]`, if any.
    pub fn goto(&self, state: usize, symbol: &Symbol) -> Option<usize> {
        self.gotos[state].get(symbol).copied()
    }

    /// The conflicts found while building, in discovery order.
    pub fn conflicts(&self) -> &[Lr0Conflict] {
        &self.conflicts
    }

    /// Drives the shift/reduce parser over an input.
    ///
    /// Twin stacks: states `Σ = [0]` and symbols `Γ = [$]`; the input
    /// gets `$` appended. A state holding two or more reduce items
    /// aborts the run with a conflict diagnostic. Rejection is reported
    /// through the returned run; `Err` only flags an input symbol
    /// outside `T`.
    pub fn parse(
        &self,
        grammar: &Grammar,
        graph: &StateGraph,
        input: &[Symbol],
        limit: usize,
    ) -> Result<Lr0Run> {
        for sym in input {
            if !grammar.terminals().contains(sym) {
                return Err(GrammarError::UnknownSymbol(sym.to_string()));
            }
        }

        let mut input: Vec<Symbol> = input.to_vec();
        input.push(Symbol::end_marker());
        let mut pos = 0;

        let mut state_stack: Vec<usize> = vec![0];
        let mut symbol_stack: Vec<Symbol> = vec![Symbol::end_marker()];

        let mut steps: Vec<Lr0Step> = Vec::new();
        let mut accepted = false;

        loop {
            let snapshot_states = state_stack.clone();
            let snapshot_symbols = symbol_stack.clone();
            let snapshot_input: Vec<Symbol> = input[pos..].to_vec();

            if steps.len() == limit {
                steps.push(Lr0Step {
                    states: snapshot_states,
                    symbols: snapshot_symbols,
                    remaining: snapshot_input,
                    action: Lr0StepAction::LimitReached,
                });
                break;
            }

            let state = *state_stack.last().unwrap();
            let lookahead = input[pos].clone();

            let action = match self.action(state, &lookahead) {
                Some(Action::Shift(target)) => {
                    state_stack.push(*target);
                    symbol_stack.push(lookahead);
                    pos += 1;
                    Lr0StepAction::Shift(*target)
                }
                Some(Action::Reduce(production)) => {
                    let reduce_items = graph.reduce_items(state);
                    if reduce_items.len() > 1 {
                        Lr0StepAction::Conflict {
                            state,
                            items: reduce_items.into_iter().cloned().collect(),
                        }
                    } else {
                        for _ in 0..production.body.len() {
                            state_stack.pop();
                            symbol_stack.pop();
                        }
                        let uncovered = *state_stack.last().unwrap();
                        match self.goto(uncovered, &production.head) {
                            Some(target) => {
                                state_stack.push(target);
                                symbol_stack.push(production.head.clone());
                                Lr0StepAction::Reduce(production.clone())
                            }
                            None => Lr0StepAction::Error,
                        }
                    }
                }
                Some(Action::Accept) => {
                    accepted = true;
                    Lr0StepAction::Accept
                }
                None => Lr0StepAction::Error,
            };

            let done = matches!(
                action,
                Lr0StepAction::Accept | Lr0StepAction::Error | Lr0StepAction::Conflict { .. }
            );
            steps.push(Lr0Step {
                states: snapshot_states,
                symbols: snapshot_symbols,
                remaining: snapshot_input,
                action,
            });
            if done {
                break;
            }
        }

        Ok(Lr0Run { accepted, steps })
    }
}

fn set_action(
    row: &mut BTreeMap<Symbol, Action>,
    conflicts: &mut Vec<Lr0Conflict>,
    state: usize,
    symbol: &Symbol,
    action: Action,
) {
    match row.get(symbol) {
        None => {
            row.insert(symbol.clone(), action);
        }
        Some(existing) if *existing == action => {}
        Some(existing) => {
            let conflict = Lr0Conflict {
                state,
                symbol: symbol.clone(),
                kept: existing.clone(),
                dropped: action,
            };
            warn!("LR(0) {conflict}");
            conflicts.push(conflict);
        }
    }
}

/// One row of an LR(0) driver trace.
#[derive(Debug, Clone)]
pub struct Lr0Step {
    /// The state stack, bottom first.
    pub states: Vec<usize>,
    /// The symbol stack, bottom first.
    pub symbols: Vec<Symbol>,
    /// The unconsumed input, `$` included.
    pub remaining: Vec<Symbol>,
    pub action: Lr0StepAction,
}

/// What the driver did at one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lr0StepAction {
    Shift(usize),
    Reduce(Production),
    Accept,
    /// The state offered more than one reduction; the run aborts.
    Conflict { state: usize, items: Vec<Item> },
    Error,
    LimitReached,
}

impl fmt::Display for Lr0StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lr0StepAction::Shift(state) => write!(f, "shift {state}"),
            Lr0StepAction::Reduce(production) => write!(f, "reduce {production}"),
            Lr0StepAction::Accept => write!(f, "accept"),
            Lr0StepAction::Conflict { state, items } => {
                let items = items
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "reduce/reduce conflict in state {state}: {items}")
            }
            Lr0StepAction::Error => write!(f, "parsing error"),
            Lr0StepAction::LimitReached => write!(f, "limit reached"),
        }
    }
}

/// Outcome of a driver run: acceptance plus the full step trace.
#[derive(Debug, Clone)]
pub struct Lr0Run {
    pub accepted: bool,
    pub steps: Vec<Lr0Step>,
}

impl Lr0Run {
    /// The action that ended the run.
    pub fn last_action(&self) -> Option<&Lr0StepAction> {
        self.steps.last().map(|s| &s.action)
    }
}

/// LR(0) entry points on the grammar itself.
impl Grammar {
    /// Builds the canonical collection with the default state cap.
    pub fn lr0_states(&self) -> Result<StateGraph> {
        StateGraph::build(self, DEFAULT_STATE_CAP)
    }

    /// Builds the canonical collection with an explicit state cap.
    pub fn lr0_states_capped(&self, cap: usize) -> Result<StateGraph> {
        StateGraph::build(self, cap)
    }

    /// Derives the ACTION/GOTO table from a canonical collection.
    pub fn lr0_table(&self, graph: &StateGraph) -> Lr0Table {
        Lr0Table::build(self, graph)
    }

    /// Parses a plain string, one terminal per character.
    pub fn lr0_parse(&self, input: &str, limit: usize) -> Result<Lr0Run> {
        self.lr0_parse_symbols(&string_to_symbols(input), limit)
    }

    /// Parses a symbol sequence; keeps multi-character terminals usable.
    pub fn lr0_parse_symbols(&self, input: &[Symbol], limit: usize) -> Result<Lr0Run> {
        let graph = self.lr0_states()?;
        let table = self.lr0_table(&graph);
        table.parse(self, &graph, input, limit)
    }
}
