//! The interactive read-eval-print loop.

mod highlighter;
mod history;

use crate::engine::{self, Environment};
use highlighter::ReplHelper;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing::{info, warn};

const PROMPT: &str = ">> ";

/// Runs the interactive session until the user exits.
///
/// Every submitted fragment is evaluated against the same environment, so
/// definitions persist across lines. The helper's validator keeps reading
/// while a form is open, so expressions may span several lines.
#[tracing::instrument(skip(env))]
pub fn start_repl(mut env: Environment) -> anyhow::Result<()> {
    info!("Starting REPL session");
    println!(
        "vesp {}. Type 'exit' or press Ctrl-D to quit.",
        env!("CARGO_PKG_VERSION")
    );

    let mut rl = Editor::<ReplHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    let history_path = history::history_path();
    match history_path {
        Some(ref path) => history::load(&mut rl, path),
        None => warn!("Could not determine history file path. History will not be saved."),
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if let Err(error) = rl.add_history_entry(line.as_str()) {
                    warn!("Failed to add line to history: {}", error);
                }
                if trimmed == "exit" {
                    info!("Exiting REPL session via user command.");
                    break;
                }

                match engine::evaluate_source(trimmed, &mut env) {
                    Ok(value) => println!("{}", value),
                    Err(error) => eprintln!("Error: {}", error),
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type 'exit' or press Ctrl-D to quit.");
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                break;
            }
            Err(error) => {
                eprintln!("Readline error: {:?}", error);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        history::save(&mut rl, path);
    }
    println!("Exiting.");
    Ok(())
}
