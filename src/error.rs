//! Error types for grammar construction and the parser drivers.

use thiserror::Error;

/// Errors raised while building a grammar or preparing a parse.
///
/// Table conflicts are deliberately absent: they are diagnostics carried
/// by the tables, not errors. Driver dead-ends are terminal trace entries
/// and never surface here either.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("empty grammar input")]
    EmptyInput,

    #[error("grammar line has no arrow: {0:?}")]
    MissingArrow(String),

    #[error("grammar line has no head: {0:?}")]
    MissingHead(String),

    #[error("empty alternative for {head} (write ɛ for an empty body)")]
    EmptyAlternative { head: String },

    #[error("duplicate rules for {0}")]
    DuplicateHead(String),

    #[error("reserved symbol {0:?} used in grammar")]
    ReservedSymbol(String),

    #[error("input symbol {0:?} is not a terminal of the grammar")]
    UnknownSymbol(String),

    #[error("LR(0) construction stopped after {limit} states")]
    StateExplosion { limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
