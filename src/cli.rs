use clap::Parser;
use std::path::PathBuf;

/// A small Lisp interpreter with a REPL.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "vesp", bin_name = "vesp")]
pub struct Cli {
    /// Lisp expression string to evaluate.
    #[clap(short, long, value_name = "LISP_CODE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// Path to a Lisp file to execute. With neither a file nor --expr, the
    /// REPL starts.
    #[clap(value_name = "FILE_PATH", conflicts_with = "expr")]
    pub file: Option<PathBuf>,
}
