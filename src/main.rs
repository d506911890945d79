//! Grammar analysis laboratory.
//!
//! Computes nullability, FNE/FIRST and FOLLOW sets for a context-free
//! grammar, builds the LL(1) predictive table and the LR(0) canonical
//! collection, and drives both parsers over input strings with full
//! step traces.

use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = grammar_lab::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
