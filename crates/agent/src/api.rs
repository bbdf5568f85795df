use serde::Deserialize;
use thiserror::Error;

use offerly_core::ConfigError;

use crate::runtime::{AgentRuntime, TurnOutcome};

/// One conversation turn as submitted by a front end.
#[derive(Clone, Debug, Deserialize)]
pub struct TurnRequest {
    pub session_token: Option<String>,
    #[serde(default)]
    pub query: String,
}

/// Boundary validation failures, surfaced to the caller as client errors.
/// Everything deeper (capability, catalog) is recovered internally and never
/// reaches this type.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing session_token")]
    MissingSessionToken,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub async fn handle_turn(
    runtime: &AgentRuntime,
    request: TurnRequest,
) -> Result<TurnOutcome, RequestError> {
    let session_token = request
        .session_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(RequestError::MissingSessionToken)?;

    Ok(runtime.advance(session_token, &request.query).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use offerly_catalog::InMemoryCatalog;
    use offerly_core::AgentMode;

    use super::{handle_turn, RequestError, TurnRequest};
    use crate::runtime::AgentRuntime;

    fn runtime() -> AgentRuntime {
        AgentRuntime::new(
            AgentMode::Fake,
            Duration::from_secs(60),
            Arc::new(InMemoryCatalog::with_sample_offers()),
            None,
        )
        .expect("runtime should build")
    }

    #[tokio::test]
    async fn missing_session_token_is_a_client_error() {
        let runtime = runtime();

        let request = TurnRequest { session_token: None, query: "fashion".to_string() };
        let error = handle_turn(&runtime, request).await.expect_err("should fail validation");
        assert!(matches!(error, RequestError::MissingSessionToken));

        let request =
            TurnRequest { session_token: Some("   ".to_string()), query: "fashion".to_string() };
        let error = handle_turn(&runtime, request).await.expect_err("should fail validation");
        assert!(matches!(error, RequestError::MissingSessionToken));
    }

    #[tokio::test]
    async fn valid_request_runs_a_turn() {
        let runtime = runtime();
        let request = TurnRequest {
            session_token: Some("browser-1".to_string()),
            query: "fashion under $60".to_string(),
        };

        let outcome = handle_turn(&runtime, request).await.expect("turn should run");
        assert!(outcome.done);
        assert_eq!(outcome.offers.len(), 2);
    }
}
