mod cli;
mod engine;
mod logging;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use tracing::info;

use crate::engine::Environment;

#[tracing::instrument]
fn main() -> Result<()> {
    logging::init_logging();
    info!("Starting interpreter");

    let cli = cli::Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    let mut env = Environment::new();
    engine::install_stdlib(&mut env)?;

    if let Some(expression) = cli.expr {
        let value = engine::evaluate_source(&expression, &mut env)?;
        println!("{}", value);
    } else if let Some(path) = cli.file {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = engine::evaluate_source(&source, &mut env)?;
        println!("{}", value);
    } else {
        repl::start_repl(env)?;
    }

    info!("Interpreter finished");
    Ok(())
}
