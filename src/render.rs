//! Plain-text rendering of grammars, tables and parser traces.
//!
//! Pure functions from value types to strings; the only sink of the
//! crate. Callers decide where the text goes.

use crate::error::Result;
use crate::grammar::Grammar;
use crate::ll1::{Ll1Run, Ll1Table};
use crate::lr0::{Action, Lr0Run, Lr0Table, StateGraph};
use crate::symbol::{self, Symbol, symbols_to_string};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Lays out a padded, column-aligned text table.
fn grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let joined = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" | ");
        joined.trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&format_row(headers));
    out.push('\n');
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    out.push_str(&separator);
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

fn format_set(set: &BTreeSet<Symbol>) -> String {
    set.iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn sorted_lookaheads(grammar: &Grammar) -> Vec<Symbol> {
    let mut lookaheads: Vec<Symbol> = grammar.terminals().iter().cloned().collect();
    lookaheads.push(Symbol::end_marker());
    lookaheads
}

fn sorted_non_terminals(grammar: &Grammar) -> Vec<Symbol> {
    let mut vs: Vec<Symbol> = grammar.non_terminals().cloned().collect();
    vs.sort();
    vs
}

/// Axiom, alphabets, and the rule listing.
pub fn grammar_summary(grammar: &Grammar) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Axiom: {}", grammar.axiom());
    let terminals = grammar
        .terminals()
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "Terminals: {terminals}");
    let non_terminals = sorted_non_terminals(grammar)
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "Non-Terminals: {non_terminals}");
    let _ = writeln!(out, "Rules:");
    out.push_str(&grammar.to_string());
    out
}

/// FIRST and FOLLOW per non-terminal, one row each.
pub fn first_follow_table(grammar: &Grammar) -> String {
    let analysis = grammar.analysis();
    let headers = vec!["".to_string(), "FIRST".to_string(), "FOLLOW".to_string()];
    let rows = sorted_non_terminals(grammar)
        .iter()
        .map(|v| {
            vec![
                v.to_string(),
                format_set(&analysis.first(v)),
                analysis.follow(v).map(format_set).unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    grid(&headers, &rows)
}

/// The predictive table. `raw` shows every entry of conflicted cells;
/// strict shows the surviving first entry only.
pub fn ll1_table_text(grammar: &Grammar, table: &Ll1Table, raw: bool) -> String {
    let lookaheads = sorted_lookaheads(grammar);
    let mut headers = vec![" ".to_string()];
    headers.extend(lookaheads.iter().map(|t| t.to_string()));

    let rows = sorted_non_terminals(grammar)
        .iter()
        .map(|v| {
            let mut row = vec![v.to_string()];
            for t in &lookaheads {
                let cell = if raw {
                    table
                        .entries(v, t)
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                } else {
                    table
                        .entry(v, t)
                        .map(|p| p.to_string())
                        .unwrap_or_default()
                };
                row.push(cell);
            }
            row
        })
        .collect::<Vec<_>>();

    let mut out = grid(&headers, &rows);
    for conflict in table.conflicts() {
        let _ = writeln!(out, "{conflict}");
    }
    out
}

/// An LL(1) driver trace, one row per step.
pub fn ll1_trace(run: &Ll1Run) -> String {
    let headers = vec![
        "(top) stack".to_string(),
        "parse".to_string(),
        "action".to_string(),
    ];
    let rows = run
        .steps
        .iter()
        .map(|step| {
            vec![
                symbols_to_string(&step.stack),
                symbols_to_string(&step.remaining),
                step.action.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let mut out = grid(&headers, &rows);
    let _ = writeln!(
        out,
        "{}",
        if run.accepted { "accepted" } else { "rejected" }
    );
    out
}

/// The state listing: items per state, plus where each state came from.
pub fn lr0_state_listing(graph: &StateGraph) -> String {
    let mut out = String::new();
    for state in 0..graph.len() {
        let items = graph
            .items(state)
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        let _ = writeln!(out, "I{state}: {items}");
        let origins = graph.origins(state);
        if !origins.is_empty() {
            let origins = origins
                .iter()
                .map(|(source, sym)| format!("I{source} on {sym}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "   from {origins}");
        }
        if !graph.transitions_from(state).is_empty() {
            let transitions = graph
                .transitions_from(state)
                .iter()
                .map(|(sym, target)| format!("{sym}{}I{target}", symbol::ARROW))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "   transition {transitions}");
        }
    }
    out
}

/// The raw transition table over `T ∪ V`.
pub fn lr0_transition_table(grammar: &Grammar, graph: &StateGraph) -> String {
    let mut columns: Vec<Symbol> = grammar.terminals().iter().cloned().collect();
    columns.extend(sorted_non_terminals(grammar));

    let mut headers = vec!["state".to_string()];
    headers.extend(columns.iter().map(|s| s.to_string()));

    let rows = (0..graph.len())
        .map(|state| {
            let mut row = vec![format!("I{state}")];
            for sym in &columns {
                row.push(
                    graph
                        .transition(state, sym)
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                );
            }
            row
        })
        .collect::<Vec<_>>();
    grid(&headers, &rows)
}

/// The full ACTION/GOTO table: shifts, reduces and accept over
/// `T ∪ {$}`, goto states over `V`.
pub fn lr0_full_table(grammar: &Grammar, graph: &StateGraph, table: &Lr0Table) -> String {
    let lookaheads = sorted_lookaheads(grammar);
    let non_terminals = sorted_non_terminals(grammar);

    let mut headers = vec!["state".to_string()];
    headers.extend(lookaheads.iter().map(|t| t.to_string()));
    headers.extend(non_terminals.iter().map(|v| v.to_string()));

    let rows = (0..graph.len())
        .map(|state| {
            let mut row = vec![format!("I{state}")];
            for t in &lookaheads {
                let cell = match table.action(state, t) {
                    Some(Action::Accept) => "acc".to_string(),
                    Some(action) => action.to_string(),
                    None => String::new(),
                };
                row.push(cell);
            }
            for v in &non_terminals {
                row.push(
                    table
                        .goto(state, v)
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                );
            }
            row
        })
        .collect::<Vec<_>>();

    let mut out = grid(&headers, &rows);
    for conflict in table.conflicts() {
        let _ = writeln!(out, "{conflict}");
    }
    out
}

/// An LR(0) driver trace, one row per step.
pub fn lr0_trace(run: &Lr0Run) -> String {
    let headers = vec![
        "state stack".to_string(),
        "symbol stack".to_string(),
        "parse".to_string(),
        "action".to_string(),
    ];
    let rows = run
        .steps
        .iter()
        .map(|step| {
            vec![
                step.states
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                symbols_to_string(&step.symbols),
                symbols_to_string(&step.remaining),
                step.action.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let mut out = grid(&headers, &rows);
    let _ = writeln!(
        out,
        "{}",
        if run.accepted { "accepted" } else { "rejected" }
    );
    out
}

/// The combined report: grammar, FIRST/FOLLOW, LL(1) table with raw
/// cells, and the three LR(0) views.
pub fn stats(grammar: &Grammar) -> Result<String> {
    let mut out = String::new();
    out.push_str(&grammar_summary(grammar));
    out.push('\n');
    out.push_str("FIRST/FOLLOW table:\n");
    out.push_str(&first_follow_table(grammar));
    out.push('\n');
    out.push_str("LL(1) parse table:\n");
    let table = grammar.ll1_table();
    out.push_str(&ll1_table_text(grammar, &table, true));
    out.push('\n');

    let graph = grammar.lr0_states()?;
    let lr0_table = grammar.lr0_table(&graph);
    out.push_str("LR(0) states:\n");
    out.push_str(&lr0_state_listing(&graph));
    out.push('\n');
    out.push_str("LR(0) transition table:\n");
    out.push_str(&lr0_transition_table(grammar, &graph));
    out.push('\n');
    out.push_str("LR(0) action table:\n");
    out.push_str(&lr0_full_table(grammar, &graph, &lr0_table));
    Ok(out)
}

/// Report entry point on the grammar itself.
impl Grammar {
    pub fn stats(&self) -> Result<String> {
        stats(self)
    }
}
