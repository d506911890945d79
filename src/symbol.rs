//! Symbol carrier and reserved markers.
//!
//! A symbol is an opaque token identity. Whether it is a terminal or a
//! non-terminal is never stored on the symbol itself; it is derived from
//! membership in the grammar's rule map.

use std::fmt;

/// The end-of-input marker appended to every parse.
pub const END_MARKER: &str = "$";
/// The character standing for the empty word in grammar text.
pub const EPSILON_MARK: char = 'ɛ';
/// Head of the synthetic start production added for LR(0).
pub const AUGMENTED_START: &str = "S'";
/// Dot marker used when pretty-printing items.
pub const BULLET: &str = "•";
/// Arrow accepted in grammar text and used in pretty-printed productions.
pub const ARROW: &str = "→";
/// ASCII spelling of the arrow, also accepted in grammar text.
pub const ASCII_ARROW: &str = "->";

/// A grammar symbol.
///
/// The empty carrier is reserved for explicit ε-membership in FIRST sets
/// and `$` for the end of input. Ordering is plain string ordering, which
/// drives every deterministic iteration in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from any short string.
    pub fn new(text: impl Into<String>) -> Self {
        Symbol(text.into())
    }

    /// The explicit ε member carried by FIRST sets.
    pub fn epsilon() -> Self {
        Symbol(String::new())
    }

    /// The reserved end-of-input marker `$`.
    pub fn end_marker() -> Self {
        Symbol(END_MARKER.to_string())
    }

    /// The synthetic start non-terminal `S'`.
    pub fn augmented_start() -> Self {
        Symbol(AUGMENTED_START.to_string())
    }

    /// Borrows the underlying text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks if this symbol is the explicit ε member.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks if this symbol is the end marker `$`.
    #[inline]
    pub fn is_end_marker(&self) -> bool {
        self.0 == END_MARKER
    }

    /// Checks if this carrier is reserved by the engine and therefore
    /// rejected in grammar text.
    pub fn is_reserved(&self) -> bool {
        matches!(
            self.0.as_str(),
            END_MARKER | AUGMENTED_START | BULLET | ARROW | "ɛ"
        )
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol(c.to_string())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol(s.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            write!(f, "{}", EPSILON_MARK)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Splits a plain string into symbols, one per Unicode scalar.
pub fn string_to_symbols(s: &str) -> Vec<Symbol> {
    s.chars().map(Symbol::from).collect()
}

/// Concatenates symbols back into display text.
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.to_string()).collect()
}
