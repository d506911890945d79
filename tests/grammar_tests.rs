//! Unit tests for grammar parsing and symbol classification

use grammar_lab::grammar::Grammar;
use grammar_lab::symbol::Symbol;
use grammar_lab::GrammarError;

const EXPR: &str = "\
E → TA
A → +TA | ɛ
T → FB
B → ∗FB | ɛ
F → (E) | a
";

#[test]
fn test_parse_expression_grammar() {
    let grammar = Grammar::from_text(EXPR).unwrap();
    assert_eq!(grammar.axiom(), &Symbol::from('E'));
    assert_eq!(grammar.non_terminals().count(), 5);
    assert_eq!(grammar.terminals().len(), 5);
    assert!(grammar.terminals().contains(&Symbol::from('∗')));
    assert!(grammar.is_non_terminal(&Symbol::from('E')));
    assert!(grammar.is_terminal(&Symbol::from('a')));
}

#[test]
fn test_ascii_arrow_accepted() {
    let grammar = Grammar::from_text("S -> aS | b").unwrap();
    assert_eq!(grammar.axiom(), &Symbol::from('S'));
    assert_eq!(grammar.alternatives(&Symbol::from('S')).len(), 2);
}

#[test]
fn test_first_head_is_axiom_and_blank_lines_skipped() {
    let grammar = Grammar::from_text("\n\n  T → a\n\nU → bT\n").unwrap();
    assert_eq!(grammar.axiom(), &Symbol::from('T'));
}

#[test]
fn test_alternative_order_is_preserved() {
    let grammar = Grammar::from_text(EXPR).unwrap();
    let alts = grammar.alternatives(&Symbol::from('F'));
    assert_eq!(alts[0].len(), 3);
    assert_eq!(alts[1], vec![Symbol::from('a')]);
}

#[test]
fn test_epsilon_elision() {
    let grammar = Grammar::from_text("A → aA | ɛ").unwrap();
    let alts = grammar.alternatives(&Symbol::from('A'));
    assert!(alts[1].is_empty());
    // ɛ never shows up as a terminal.
    assert_eq!(grammar.terminals().len(), 1);
}

#[test]
fn test_missing_arrow_fails() {
    assert!(matches!(
        Grammar::from_text("E = TA"),
        Err(GrammarError::MissingArrow(_))
    ));
}

#[test]
fn test_empty_alternative_fails() {
    assert!(matches!(
        Grammar::from_text("S → a |"),
        Err(GrammarError::EmptyAlternative { .. })
    ));
    assert!(matches!(
        Grammar::from_text("S →"),
        Err(GrammarError::EmptyAlternative { .. })
    ));
}

#[test]
fn test_duplicate_head_fails() {
    assert!(matches!(
        Grammar::from_text("S → a\nT → b\nS → c"),
        Err(GrammarError::DuplicateHead(_))
    ));
}

#[test]
fn test_reserved_symbols_fail() {
    assert!(matches!(
        Grammar::from_text("S → a$"),
        Err(GrammarError::ReservedSymbol(_))
    ));
    assert!(matches!(
        Grammar::from_text("S' → a"),
        Err(GrammarError::ReservedSymbol(_))
    ));
}

#[test]
fn test_empty_input_fails() {
    assert!(matches!(
        Grammar::from_text("  \n\n"),
        Err(GrammarError::EmptyInput)
    ));
}

#[test]
fn test_display_lists_rules_in_order() {
    let grammar = Grammar::from_text("S → aS | ɛ").unwrap();
    assert_eq!(grammar.to_string(), "S → aS | ɛ\n");
}
