mod commands;
mod config;
mod diagnostics;
mod error;
mod fixer;
mod index;
mod report;
mod scanner;
mod suggest;
mod types;
mod validator;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::RunOptions;

#[derive(Parser)]
#[command(
    name = "linkcheck",
    about = "Find broken internal links and anchors in markdown trees"
)]
struct Cli {
    /// Content root directory to scan
    root: PathBuf,

    /// Write a CSV report to this file instead of the terminal report
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Prompt to fix each broken reference in place
    #[arg(long)]
    interactive: bool,

    /// Suppress progress output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = RunOptions {
        csv: cli.csv,
        interactive: cli.interactive,
        quiet: cli.quiet,
        root: cli.root,
    };

    match commands::run(&options) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    }
}
