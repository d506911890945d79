//! Grammar model and the textual grammar notation parser.
//!
//! A grammar is the axiom plus an ordered map from each non-terminal to
//! its alternatives. Alternative order is preserved because conflict
//! reporting and item ordering depend on it.

use crate::error::{GrammarError, Result};
use crate::first_follow::Analysis;
use crate::symbol::{self, Symbol, symbols_to_string};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::fmt;

/// A rule body: an ordered sequence of symbols, empty for an ε-production.
pub type Rule = Vec<Symbol>;

/// A head together with one of its bodies.
///
/// Represents a production of the form: head → body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    /// Left-hand side (always a non-terminal)
    pub head: Symbol,
    /// Right-hand side (sequence of symbols, empty for ε)
    pub body: Rule,
}

impl Production {
    /// Creates a new production.
    pub fn new(head: Symbol, body: Rule) -> Self {
        Self { head, body }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = if self.body.is_empty() {
            symbol::EPSILON_MARK.to_string()
        } else {
            symbols_to_string(&self.body)
        };
        write!(f, "{} {} {}", self.head, symbol::ARROW, body)
    }
}

/// A context-free grammar.
///
/// Immutable after construction; the set analysis is computed on first
/// use and cached.
#[derive(Debug, Clone)]
pub struct Grammar {
    axiom: Symbol,
    rules: IndexMap<Symbol, Vec<Rule>>,
    terminals: BTreeSet<Symbol>,
    analysis: OnceCell<Analysis>,
}

impl Grammar {
    /// Parses a grammar from its textual form.
    ///
    /// # Format
    /// One rule per line: `H → ALT ( | ALT )*`, with `->` accepted for
    /// the arrow. Each alternative is a whitespace-trimmed run of
    /// one-character symbols; `ɛ` denotes the empty word and is elided.
    /// The first head becomes the axiom. Blank lines are skipped.
    ///
    /// # Errors
    /// Fails on a line without an arrow, an empty alternative written
    /// without `ɛ`, a second rule line for the same head, or any use of
    /// the reserved carriers `$`, `S'`, `•`, `→`, `ɛ`-as-head.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut axiom: Option<Symbol> = None;
        let mut rules: IndexMap<Symbol, Vec<Rule>> = IndexMap::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (head, tail) = split_arrow(line)
                .ok_or_else(|| GrammarError::MissingArrow(line.to_string()))?;
            let head = head.trim();
            if head.is_empty() {
                return Err(GrammarError::MissingHead(line.to_string()));
            }
            let head = Symbol::new(head);
            if head.is_reserved() {
                return Err(GrammarError::ReservedSymbol(head.as_str().to_string()));
            }

            let mut alternatives = Vec::new();
            for alt in tail.split('|') {
                let alt = alt.trim();
                if alt.is_empty() {
                    return Err(GrammarError::EmptyAlternative {
                        head: head.to_string(),
                    });
                }
                let mut body = Rule::new();
                for c in alt.chars() {
                    if c == symbol::EPSILON_MARK || c.is_whitespace() {
                        continue;
                    }
                    let sym = Symbol::from(c);
                    if sym.is_reserved() {
                        return Err(GrammarError::ReservedSymbol(sym.as_str().to_string()));
                    }
                    body.push(sym);
                }
                if body.is_empty() && !alt.contains(symbol::EPSILON_MARK) {
                    return Err(GrammarError::EmptyAlternative {
                        head: head.to_string(),
                    });
                }
                alternatives.push(body);
            }

            if axiom.is_none() {
                axiom = Some(head.clone());
            }
            if rules.insert(head.clone(), alternatives).is_some() {
                return Err(GrammarError::DuplicateHead(head.to_string()));
            }
        }

        let axiom = axiom.ok_or(GrammarError::EmptyInput)?;
        let terminals = rules
            .values()
            .flatten()
            .flatten()
            .filter(|s| !rules.contains_key(*s))
            .cloned()
            .collect();

        Ok(Self {
            axiom,
            rules,
            terminals,
            analysis: OnceCell::new(),
        })
    }

    /// Returns the axiom (designated start non-terminal).
    pub fn axiom(&self) -> &Symbol {
        &self.axiom
    }

    /// Returns the non-terminals in rule order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.rules.keys()
    }

    /// Returns the terminal alphabet, sorted. Never contains `$` or ε.
    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    /// Checks if a symbol is a terminal (not a key of the rule map).
    pub fn is_terminal(&self, x: &Symbol) -> bool {
        !self.rules.contains_key(x)
    }

    /// Checks if a symbol is a non-terminal.
    pub fn is_non_terminal(&self, x: &Symbol) -> bool {
        self.rules.contains_key(x)
    }

    /// Returns the alternatives of a non-terminal, in rule order.
    /// Empty for terminals.
    pub fn alternatives(&self, x: &Symbol) -> &[Rule] {
        self.rules.get(x).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates every production as a `(head, body)` pair, in rule order.
    pub fn productions(&self) -> impl Iterator<Item = (&Symbol, &Rule)> {
        self.rules
            .iter()
            .flat_map(|(head, alts)| alts.iter().map(move |body| (head, body)))
    }

    /// Returns the full vocabulary `V ∪ T`, sorted.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.rules
            .keys()
            .cloned()
            .chain(self.terminals.iter().cloned())
            .collect()
    }

    /// Returns the memoized set analysis, computing it on first use.
    pub fn analysis(&self) -> &Analysis {
        self.analysis.get_or_init(|| Analysis::compute(self))
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (head, alts) in &self.rules {
            let alts = alts
                .iter()
                .map(|body| {
                    if body.is_empty() {
                        symbol::EPSILON_MARK.to_string()
                    } else {
                        symbols_to_string(body)
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(f, "{} {} {}", head, symbol::ARROW, alts)?;
        }
        Ok(())
    }
}

fn split_arrow(line: &str) -> Option<(&str, &str)> {
    line.split_once(symbol::ARROW)
        .or_else(|| line.split_once(symbol::ASCII_ARROW))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_grammar() {
        let grammar = Grammar::from_text("S → AB\nA → a\nB → b").unwrap();
        assert_eq!(grammar.axiom(), &Symbol::from("S"));
        assert_eq!(grammar.non_terminals().count(), 3);
        assert!(grammar.terminals().contains(&Symbol::from("a")));
        assert!(grammar.is_terminal(&Symbol::from("b")));
        assert!(grammar.is_non_terminal(&Symbol::from("A")));
    }

    #[test]
    fn test_parse_alternatives_keep_order() {
        let grammar = Grammar::from_text("F → (E) | a\nE → F").unwrap();
        let alts = grammar.alternatives(&Symbol::from("F"));
        assert_eq!(alts.len(), 2);
        assert_eq!(
            alts[0],
            vec![Symbol::from("("), Symbol::from("E"), Symbol::from(")")]
        );
        assert_eq!(alts[1], vec![Symbol::from("a")]);
    }

    #[test]
    fn test_epsilon_alternative_is_empty_body() {
        let grammar = Grammar::from_text("A → a | ɛ").unwrap();
        let alts = grammar.alternatives(&Symbol::from("A"));
        assert_eq!(alts[1], Vec::<Symbol>::new());
    }

    #[test]
    fn test_missing_arrow_is_an_error() {
        assert!(matches!(
            Grammar::from_text("S = a"),
            Err(GrammarError::MissingArrow(_))
        ));
    }

    #[test]
    fn test_duplicate_head_is_an_error() {
        assert!(matches!(
            Grammar::from_text("S → a\nS → b"),
            Err(GrammarError::DuplicateHead(_))
        ));
    }
}
