//! Command-line front end: reads a grammar, prints the analysis report,
//! and runs both drivers over the requested inputs.

use crate::error::Result;
use crate::grammar::Grammar;
use crate::symbol::string_to_symbols;
use crate::{ll1, lr0, render};
use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Demo expression grammar used when no grammar file is given.
pub const EXAMPLE: &str = "\
E → TA
A → +TA | ɛ
T → FB
B → ∗FB | ɛ
F → (E) | a
";

#[derive(Debug, Parser)]
#[command(
    name = "grammar_lab",
    about = "LL(1) and LR(0) analysis of context-free grammars",
    version
)]
pub struct Args {
    /// Grammar file; `-` reads stdin. Defaults to a demo expression grammar.
    grammar: Option<PathBuf>,

    /// Input strings to parse with both drivers, one terminal per character.
    #[arg(short = 'p', long = "parse")]
    inputs: Vec<String>,

    /// Show every entry of conflicted LL(1) cells instead of the surviving one.
    #[arg(long)]
    raw_table: bool,

    /// Step limit for the LL(1) driver.
    #[arg(long, default_value_t = ll1::DEFAULT_STEP_LIMIT)]
    ll1_limit: usize,

    /// Step limit for the LR(0) driver.
    #[arg(long, default_value_t = lr0::DEFAULT_STEP_LIMIT)]
    lr0_limit: usize,

    /// Ceiling on the LR(0) state count.
    #[arg(long, default_value_t = lr0::DEFAULT_STATE_CAP)]
    state_cap: usize,

    /// Skip the LR(0) construction entirely.
    #[arg(long)]
    skip_lr0: bool,
}

/// Main CLI runner.
pub fn run() -> Result<()> {
    let args = Args::parse();

    let text = match &args.grammar {
        None => EXAMPLE.to_string(),
        Some(path) if path.as_os_str() == "-" => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        Some(path) => fs::read_to_string(path)?,
    };
    let grammar = Grammar::from_text(&text)?;

    println!("{}", render::grammar_summary(&grammar));
    println!("FIRST/FOLLOW table:");
    println!("{}", render::first_follow_table(&grammar));

    let table = grammar.ll1_table();
    println!("LL(1) parse table:");
    println!("{}", render::ll1_table_text(&grammar, &table, args.raw_table));

    let lr0_parts = if args.skip_lr0 {
        None
    } else {
        let graph = grammar.lr0_states_capped(args.state_cap)?;
        let lr0_table = grammar.lr0_table(&graph);
        println!("LR(0) states:");
        println!("{}", render::lr0_state_listing(&graph));
        println!("LR(0) transition table:");
        println!("{}", render::lr0_transition_table(&grammar, &graph));
        println!("LR(0) action table:");
        println!("{}", render::lr0_full_table(&grammar, &graph, &lr0_table));
        Some((graph, lr0_table))
    };

    for input in &args.inputs {
        println!("LL(1) parse of {input:?}:");
        let run = table.parse(&grammar, &string_to_symbols(input), args.ll1_limit)?;
        println!("{}", render::ll1_trace(&run));

        if let Some((graph, lr0_table)) = &lr0_parts {
            println!("LR(0) parse of {input:?}:");
            let run = lr0_table.parse(&grammar, graph, &string_to_symbols(input), args.lr0_limit)?;
            println!("{}", render::lr0_trace(&run));
        }
    }

    Ok(())
}
