pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "offerly",
    about = "Offerly shopping assistant CLI",
    long_about = "Chat with the offers assistant, debug the rule grammar, and inspect configuration.",
    after_help = "Examples:\n  offerly chat --offline\n  offerly parse \"fashion under $60\"\n  offerly config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive multi-turn shopping conversation")]
    Chat {
        #[arg(long, help = "Use the built-in sample catalog instead of the HTTP catalog")]
        offline: bool,
        #[arg(long, help = "Session token to resume (defaults to a fresh token)")]
        session: Option<String>,
    },
    #[command(about = "Parse a query with the rule grammar and print the criteria as JSON")]
    Parse { query: String },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat { offline, session } => commands::chat::run(offline, session),
        Command::Parse { query } => commands::parse::run(&query),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
