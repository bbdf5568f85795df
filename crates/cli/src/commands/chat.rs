use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use offerly_agent::llm::capability_from_config;
use offerly_agent::AgentRuntime;
use offerly_catalog::InMemoryCatalog;
use offerly_core::config::{AppConfig, LoadOptions, LogFormat};
use offerly_core::ConfigError;

use super::CommandResult;

pub fn run(offline: bool, session: Option<String>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("chat", "config_validation", error.to_string(), 2)
        }
    };
    init_logging(&config);

    let runtime = match build_runtime(&config, offline) {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure("chat", "config_validation", error.to_string(), 2)
        }
    };

    let tokio_runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(tokio_runtime) => tokio_runtime,
        Err(error) => return CommandResult::failure("chat", "runtime", error.to_string(), 1),
    };

    let session_token = session.unwrap_or_else(generated_session_token);
    println!("offerly chat (session {session_token}); empty line or ctrl-d quits");

    let stdin = io::stdin();
    let mut turns = 0u32;
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => return CommandResult::failure("chat", "stdin", error.to_string(), 1),
        }
        let input = line.trim();
        if input.is_empty() {
            break;
        }

        let outcome = match tokio_runtime.block_on(runtime.advance(&session_token, input)) {
            Ok(outcome) => outcome,
            Err(error) => return CommandResult::failure("chat", "turn", error.to_string(), 1),
        };

        println!("{}", outcome.message);
        for offer in &outcome.offers {
            println!(
                "  #{} {} | {} | ${} | {}% off | rating {}",
                offer.id, offer.title, offer.category, offer.price, offer.discount, offer.rating
            );
        }
        if outcome.done {
            println!("(concluded; further input keeps refining this session)");
        }
        turns += 1;
    }

    CommandResult::success("chat", format!("conversation ended after {turns} turns"))
}

fn build_runtime(config: &AppConfig, offline: bool) -> Result<AgentRuntime, ConfigError> {
    if offline {
        AgentRuntime::new(
            config.llm.mode,
            Duration::from_secs(config.session.ttl_secs),
            Arc::new(InMemoryCatalog::with_sample_offers()),
            capability_from_config(&config.llm)?,
        )
    } else {
        AgentRuntime::from_config(config)
    }
}

/// Client-side tokens are opaque; a nanosecond timestamp is unique enough
/// for a single interactive process.
fn generated_session_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("cli-{nanos:x}")
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}
