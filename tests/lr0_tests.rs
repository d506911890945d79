//! Unit tests for the LR(0) automaton, table and driver

use grammar_lab::grammar::Grammar;
use grammar_lab::lr0::{self, Action, DEFAULT_STEP_LIMIT, Item, ItemSet, Lr0StepAction};
use grammar_lab::symbol::Symbol;
use grammar_lab::GrammarError;

const BALANCED: &str = "S → (S) | a";
const WIKIPEDIA: &str = "E → E*B | E+B | B\nB → 0 | 1";

fn item(head: &str, body: &str, dot: usize) -> Item {
    Item::new(
        Symbol::from(head),
        body.chars().map(Symbol::from).collect(),
        dot,
    )
}

#[test]
fn test_item_display_places_the_dot() {
    assert_eq!(item("S", "(S)", 0).to_string(), "S → •(S)");
    assert_eq!(item("S", "(S)", 2).to_string(), "S → (S•)");
    assert_eq!(item("S'", "S", 1).to_string(), "S' → S•");
    assert_eq!(item("A", "", 0).to_string(), "A → •");
}

#[test]
fn test_balanced_grammar_has_six_states() {
    let grammar = Grammar::from_text(BALANCED).unwrap();
    let graph = grammar.lr0_states().unwrap();
    assert_eq!(graph.len(), 6);

    let state0 = graph.items(0);
    assert!(state0.contains(&item("S'", "S", 0)));
    assert!(state0.contains(&item("S", "(S)", 0)));
    assert!(state0.contains(&item("S", "a", 0)));
    assert_eq!(state0.len(), 3);
}

#[test]
fn test_accept_state_holds_the_advanced_start_item() {
    let grammar = Grammar::from_text(BALANCED).unwrap();
    let graph = grammar.lr0_states().unwrap();
    let table = grammar.lr0_table(&graph);

    let accept_state = (0..graph.len())
        .find(|&s| graph.items(s).contains(&item("S'", "S", 1)))
        .unwrap();
    assert_eq!(
        table.action(accept_state, &Symbol::end_marker()),
        Some(&Action::Accept)
    );
}

#[test]
fn test_closure_is_idempotent_and_goto_is_closed() {
    let grammar = Grammar::from_text(BALANCED).unwrap();
    let kernel: ItemSet = [item("S'", "S", 0)].into_iter().collect();
    let closed = lr0::closure(&grammar, kernel);
    assert_eq!(lr0::closure(&grammar, closed.clone()), closed);

    let next = lr0::goto(&grammar, &closed, &Symbol::from('('));
    assert_eq!(lr0::closure(&grammar, next.clone()), next);
}

#[test]
fn test_state_numbering_is_deterministic() {
    let grammar = Grammar::from_text(BALANCED).unwrap();
    let a = grammar.lr0_states().unwrap();
    let b = grammar.lr0_states().unwrap();
    for state in 0..a.len() {
        assert_eq!(a.items(state), b.items(state));
    }
}

#[test]
fn test_wikipedia_grammar_reduces_on_every_lookahead() {
    let grammar = Grammar::from_text(WIKIPEDIA).unwrap();
    let graph = grammar.lr0_states().unwrap();
    let table = grammar.lr0_table(&graph);

    let one = Symbol::from('1');
    let state = graph.transition(0, &one).unwrap();
    let expected = Action::Reduce(grammar_lab::Production::new(
        Symbol::from('B'),
        vec![one.clone()],
    ));
    for t in ["*", "+", "0", "1", "$"] {
        assert_eq!(table.action(state, &Symbol::from(t)), Some(&expected));
    }
}

#[test]
fn test_wikipedia_grammar_accepts_one_plus_one() {
    let grammar = Grammar::from_text(WIKIPEDIA).unwrap();
    let run = grammar.lr0_parse("1+1", DEFAULT_STEP_LIMIT).unwrap();
    assert!(run.accepted);
    assert_eq!(run.last_action(), Some(&Lr0StepAction::Accept));
}

#[test]
fn test_driver_rejects_bad_input() {
    let grammar = Grammar::from_text(WIKIPEDIA).unwrap();
    let run = grammar.lr0_parse("1+", DEFAULT_STEP_LIMIT).unwrap();
    assert!(!run.accepted);
    let run = grammar.lr0_parse("+1", DEFAULT_STEP_LIMIT).unwrap();
    assert!(!run.accepted);
}

#[test]
fn test_conflicted_grammar_still_builds_eight_states() {
    let grammar = Grammar::from_text("S → Aa | Bb | ac\nA → a\nB → a").unwrap();
    let graph = grammar.lr0_states().unwrap();
    assert_eq!(graph.len(), 8);

    let table = grammar.lr0_table(&graph);
    assert!(!table.conflicts().is_empty());
}

#[test]
fn test_driver_aborts_on_reduce_reduce_conflict() {
    let grammar = Grammar::from_text("S → Aa | Bb | ac\nA → a\nB → a").unwrap();
    let run = grammar.lr0_parse("ab", DEFAULT_STEP_LIMIT).unwrap();
    assert!(!run.accepted);
    assert!(matches!(
        run.last_action(),
        Some(Lr0StepAction::Conflict { .. })
    ));
}

#[test]
fn test_shift_beats_reduce_in_the_conflicted_state() {
    // The cell on `c` was claimed by a shift first; the driver can still
    // ride it to acceptance.
    let grammar = Grammar::from_text("S → Aa | Bb | ac\nA → a\nB → a").unwrap();
    let run = grammar.lr0_parse("ac", DEFAULT_STEP_LIMIT).unwrap();
    assert!(run.accepted);
}

#[test]
fn test_step_limit_marks_run_as_not_accepted() {
    let grammar = Grammar::from_text(WIKIPEDIA).unwrap();
    let run = grammar.lr0_parse("1+1", 1).unwrap();
    assert!(!run.accepted);
    assert_eq!(run.last_action(), Some(&Lr0StepAction::LimitReached));
}

#[test]
fn test_state_cap_fails_with_state_explosion() {
    let grammar = Grammar::from_text(BALANCED).unwrap();
    assert!(matches!(
        grammar.lr0_states_capped(2),
        Err(GrammarError::StateExplosion { limit: 2 })
    ));
}

#[test]
fn test_unknown_input_symbol_is_an_error() {
    let grammar = Grammar::from_text(WIKIPEDIA).unwrap();
    assert!(matches!(
        grammar.lr0_parse("2", DEFAULT_STEP_LIMIT),
        Err(GrammarError::UnknownSymbol(_))
    ));
}

#[test]
fn test_origins_point_back_to_sources() {
    let grammar = Grammar::from_text(BALANCED).unwrap();
    let graph = grammar.lr0_states().unwrap();
    // Every non-initial state is reachable from somewhere.
    for state in 1..graph.len() {
        assert!(!graph.origins(state).is_empty());
    }
    assert!(graph.origins(0).is_empty());
}
