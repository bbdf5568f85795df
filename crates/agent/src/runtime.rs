use std::sync::Arc;
use std::time::Duration;

use offerly_catalog::{CatalogClient, HttpCatalogClient};
use offerly_core::config::AppConfig;
use offerly_core::{
    mode, sort_for_presentation, AgentMode, ConfigError, Decision, EngineChoice, Offer,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::interpret::{Interpreter, LlmInterpreter, RuleBasedInterpreter};
use crate::llm::{capability_from_config, LlmClient};
use crate::session::{SessionState, SessionStore};

/// The externally visible result of one conversation turn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub message: String,
    pub offers: Vec<Offer>,
    pub done: bool,
}

/// Owns per-session state and sequences parse-or-revise, offer fetch,
/// decision, and conclusion across turns.
pub struct AgentRuntime {
    mode: AgentMode,
    store: SessionStore,
    catalog: Arc<dyn CatalogClient>,
    rules: RuleBasedInterpreter,
    capability: Option<LlmInterpreter>,
}

impl AgentRuntime {
    /// Wires the runtime from explicit components. Fails fast when the
    /// configured mode cannot be satisfied (`real` without an API key).
    pub fn new(
        agent_mode: AgentMode,
        session_ttl: Duration,
        catalog: Arc<dyn CatalogClient>,
        llm: Option<Arc<dyn LlmClient>>,
    ) -> Result<Self, ConfigError> {
        mode::resolve(agent_mode, llm.is_some())?;

        Ok(Self {
            mode: agent_mode,
            store: SessionStore::new(session_ttl),
            catalog,
            rules: RuleBasedInterpreter,
            capability: llm.map(LlmInterpreter::new),
        })
    }

    /// Standard wiring: HTTP catalog client plus the capability client when
    /// an API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let catalog = HttpCatalogClient::new(&config.catalog).map_err(|error| {
            ConfigError::Validation(format!("could not build catalog client: {error}"))
        })?;

        Self::new(
            config.llm.mode,
            Duration::from_secs(config.session.ttl_secs),
            Arc::new(catalog),
            capability_from_config(&config.llm)?,
        )
    }

    /// Runs one conversation turn for the given session.
    ///
    /// A session without a live store entry is treated as new: the input is
    /// the original query and is parsed into criteria. Any later turn (even
    /// after the session concluded) is treated as follow-up input that
    /// refines the accumulated criteria and re-runs the cycle.
    pub async fn advance(
        &self,
        session_id: &str,
        user_input: &str,
    ) -> Result<TurnOutcome, ConfigError> {
        let interpreter = self.interpreter()?;

        let (mut state, reasoning) = match self.store.get(session_id) {
            None => {
                let criteria = interpreter.parse_query(user_input).await;
                debug!(session_id, %criteria, "session started");
                let reasoning = format!("Parsed initial criteria: {criteria}");
                let state = SessionState {
                    original_query: user_input.to_string(),
                    criteria,
                    offers: Vec::new(),
                    done: false,
                };
                (state, reasoning)
            }
            Some(mut state) => {
                state.criteria = interpreter.revise_criteria(&state.criteria, user_input).await;
                debug!(session_id, criteria = %state.criteria, "criteria revised");
                let reasoning = format!("Updated criteria: {}", state.criteria);
                (state, reasoning)
            }
        };

        let mut offers = self.catalog.fetch(&state.criteria).await;
        let decision =
            interpreter.decide(&state.original_query, &state.criteria, offers.len()).await;

        match decision {
            Decision::Ask { question } if !offers.is_empty() => {
                state.offers = offers;
                state.done = false;
                self.store.put(session_id, state);
                Ok(TurnOutcome { message: question, offers: Vec::new(), done: false })
            }
            // Conclude, or Ask against an empty result set: an empty fetch
            // ends the turn with a zero-offer summary instead of looping.
            _ => {
                sort_for_presentation(&mut offers);
                state.offers = offers.clone();
                state.done = true;
                self.store.put(session_id, state);

                info!(session_id, offer_count = offers.len(), "session concluded");
                let message =
                    format!("Found {} offers matching your criteria.\n{reasoning}", offers.len());
                Ok(TurnOutcome { message, offers, done: true })
            }
        }
    }

    /// Consults the mode selector for the current decision point. The
    /// resolution is pure, so this always agrees with the construction-time
    /// check.
    fn interpreter(&self) -> Result<&dyn Interpreter, ConfigError> {
        match mode::resolve(self.mode, self.capability.is_some())? {
            EngineChoice::Capability => match &self.capability {
                Some(capability) => Ok(capability),
                None => Err(ConfigError::Validation(
                    "capability engine selected without a configured client".to_string(),
                )),
            },
            EngineChoice::Rules => Ok(&self.rules),
        }
    }
}
