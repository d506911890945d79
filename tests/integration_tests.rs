//! End-to-end scenarios across analysis, tables, drivers and rendering

use grammar_lab::grammar::Grammar;
use grammar_lab::render;
use grammar_lab::symbol::Symbol;

const EXPR: &str = "\
E → TA
A → +TA | ɛ
T → FB
B → ∗FB | ɛ
F → (E) | a
";

#[test]
fn test_expression_grammar_end_to_end() {
    let grammar = Grammar::from_text(EXPR).unwrap();

    let table = grammar.ll1_table();
    assert!(table.is_ll1());

    for input in ["a", "a+a", "a∗a", "(a)", "a+a∗a", "(a+a)∗a"] {
        let run = grammar.ll1_parse(input, 50).unwrap();
        assert!(run.accepted, "LL(1) should accept {input:?}");
    }
    for input in ["", "a+", "+a", "(a", "a)", "aa"] {
        let run = grammar.ll1_parse(input, 50).unwrap();
        assert!(!run.accepted, "LL(1) should reject {input:?}");
    }
}

#[test]
fn test_wikipedia_grammar_end_to_end() {
    let grammar = Grammar::from_text("E → E*B | E+B | B\nB → 0 | 1").unwrap();

    // Left recursion rules the grammar out for LL(1)...
    assert!(!grammar.ll1_table().is_ll1());

    // ...but the LR(0) driver handles it.
    for input in ["1", "0", "1+1", "1*0", "1+1*0"] {
        let run = grammar.lr0_parse(input, 20).unwrap();
        assert!(run.accepted, "LR(0) should accept {input:?}");
    }
    for input in ["", "+", "1+", "11"] {
        let run = grammar.lr0_parse(input, 20).unwrap();
        assert!(!run.accepted, "LR(0) should reject {input:?}");
    }
}

#[test]
fn test_stats_report_contains_every_section() {
    let grammar = Grammar::from_text(EXPR).unwrap();
    let report = grammar.stats().unwrap();

    assert!(report.contains("Axiom: E"));
    assert!(report.contains("Non-Terminals: A B E F T"));
    assert!(report.contains("FIRST/FOLLOW table:"));
    assert!(report.contains("LL(1) parse table:"));
    assert!(report.contains("LR(0) states:"));
    assert!(report.contains("LR(0) transition table:"));
    assert!(report.contains("LR(0) action table:"));
    assert!(report.contains("I0:"));
    assert!(report.contains("S' → •E"));
}

#[test]
fn test_traces_render_as_aligned_text() {
    let grammar = Grammar::from_text(EXPR).unwrap();

    let run = grammar.ll1_parse("a+a∗a", 50).unwrap();
    let text = render::ll1_trace(&run);
    assert!(text.contains("(top) stack"));
    assert!(text.contains("apply E → TA"));
    assert!(text.contains("accept"));
    assert!(text.ends_with("accepted\n"));

    let balanced = Grammar::from_text("S → (S) | a").unwrap();
    let run = balanced.lr0_parse("(a)", 20).unwrap();
    assert!(run.accepted);
    let text = render::lr0_trace(&run);
    assert!(text.contains("state stack"));
    assert!(text.contains("shift"));
    assert!(text.contains("reduce S → a"));
    assert!(text.ends_with("accepted\n"));
}

#[test]
fn test_conflict_scenario_surfaces_in_both_engines() {
    let grammar = Grammar::from_text("S → Aa | Bb | ac\nA → a\nB → a").unwrap();

    let table = grammar.ll1_table();
    assert_eq!(table.conflicts().len(), 1);
    let rendered = render::ll1_table_text(&grammar, &table, true);
    assert!(rendered.contains("conflict at [S, a]"));

    let graph = grammar.lr0_states().unwrap();
    assert_eq!(graph.len(), 8);
    let lr0_table = grammar.lr0_table(&graph);
    assert!(!lr0_table.conflicts().is_empty());
}

#[test]
fn test_demo_grammar_matches_the_library_example() {
    let grammar = Grammar::from_text(grammar_lab::cli::EXAMPLE).unwrap();
    assert_eq!(grammar.axiom(), &Symbol::from('E'));
    assert!(grammar.ll1_parse("a+a∗a", 50).unwrap().accepted);
}

#[test]
fn test_first_follow_table_rows_are_sorted() {
    let grammar = Grammar::from_text(EXPR).unwrap();
    let text = render::first_follow_table(&grammar);
    let a_row = text.lines().position(|l| l.starts_with("A")).unwrap();
    let e_row = text.lines().position(|l| l.starts_with("E")).unwrap();
    assert!(a_row < e_row);
    assert!(text.contains("FIRST"));
    assert!(text.contains("FOLLOW"));
}
