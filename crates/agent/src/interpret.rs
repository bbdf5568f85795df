use std::sync::Arc;

use async_trait::async_trait;
use offerly_core::{decision, parser, updater, Criteria, CriteriaPatch, Decision};
use serde::Deserialize;
use tracing::warn;

use crate::llm::{extract_json_object, LlmClient, LlmError};

/// The strategy seam over the three per-turn interpretation points. One
/// implementation is pure rules, the other delegates to the language
/// capability; the mode selector picks between them at each decision point.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Turns a fresh free-text query into criteria.
    async fn parse_query(&self, query: &str) -> Criteria;

    /// Folds a follow-up answer into the accumulated criteria. Existing
    /// fields may be overwritten, never removed.
    async fn revise_criteria(&self, criteria: &Criteria, user_response: &str) -> Criteria;

    /// Decides whether to present the fetched offers or keep asking.
    async fn decide(
        &self,
        original_query: &str,
        criteria: &Criteria,
        offer_count: usize,
    ) -> Decision;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedInterpreter;

#[async_trait]
impl Interpreter for RuleBasedInterpreter {
    async fn parse_query(&self, query: &str) -> Criteria {
        parser::parse_query(query)
    }

    async fn revise_criteria(&self, criteria: &Criteria, user_response: &str) -> Criteria {
        updater::apply_followup(criteria, user_response)
    }

    async fn decide(
        &self,
        _original_query: &str,
        _criteria: &Criteria,
        offer_count: usize,
    ) -> Decision {
        decision::decide_by_rules(offer_count)
    }
}

/// Delegates interpretation to the language capability.
///
/// Failure handling is deliberately asymmetric: parse and revise fall back
/// to the rule-based path (retrying with rules is safe), while a failed
/// decision fails open to [`Decision::Conclude`] — a capability outage must
/// never wedge a conversation into an endless clarification loop.
pub struct LlmInterpreter {
    client: Arc<dyn LlmClient>,
    rules: RuleBasedInterpreter,
}

impl LlmInterpreter {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client, rules: RuleBasedInterpreter }
    }

    async fn request_patch(&self, prompt: &str) -> Result<CriteriaPatch, LlmError> {
        let reply = self.client.complete(prompt).await?;
        let object = extract_json_object(&reply).ok_or(LlmError::MissingJson)?;
        let patch = serde_json::from_str::<CriteriaPatch>(object)?;

        let clean = patch.clone().sanitized();
        if clean != patch {
            warn!("dropped out-of-range fields from a capability reply");
        }
        Ok(clean)
    }

    async fn request_decision(&self, prompt: &str) -> Result<Decision, LlmError> {
        let reply = self.client.complete(prompt).await?;
        let object = extract_json_object(&reply).ok_or(LlmError::MissingJson)?;
        let decoded = serde_json::from_str::<DecisionReply>(object)?;

        match decoded.next_action.trim().to_ascii_uppercase().as_str() {
            "CONCLUDE" => Ok(Decision::Conclude),
            "ASK" => Ok(Decision::Ask {
                question: decoded
                    .question
                    .filter(|question| !question.trim().is_empty())
                    .unwrap_or_else(|| "Could you clarify your preferences?".to_string()),
            }),
            other => Err(LlmError::UnexpectedReply(format!("unknown next_action `{other}`"))),
        }
    }
}

#[derive(Deserialize)]
struct DecisionReply {
    next_action: String,
    question: Option<String>,
}

#[async_trait]
impl Interpreter for LlmInterpreter {
    async fn parse_query(&self, query: &str) -> Criteria {
        match self.request_patch(&parse_prompt(query)).await {
            Ok(patch) => {
                let mut criteria = Criteria::default();
                criteria.merge(patch);
                criteria
            }
            Err(error) => {
                warn!(%error, "capability parse failed, falling back to rules");
                self.rules.parse_query(query).await
            }
        }
    }

    async fn revise_criteria(&self, criteria: &Criteria, user_response: &str) -> Criteria {
        match self.request_patch(&revise_prompt(criteria, user_response)).await {
            Ok(patch) => {
                let mut updated = criteria.clone();
                updated.merge(patch);
                updated
            }
            Err(error) => {
                warn!(%error, "capability update failed, falling back to rules");
                self.rules.revise_criteria(criteria, user_response).await
            }
        }
    }

    async fn decide(
        &self,
        original_query: &str,
        criteria: &Criteria,
        offer_count: usize,
    ) -> Decision {
        match self.request_decision(&decide_prompt(original_query, criteria, offer_count)).await {
            Ok(decision) => decision,
            Err(error) => {
                warn!(%error, "capability decision failed, concluding");
                Decision::Conclude
            }
        }
    }
}

fn criteria_json(criteria: &Criteria) -> String {
    serde_json::to_string(criteria).unwrap_or_else(|_| "{}".to_string())
}

fn parse_prompt(query: &str) -> String {
    format!(
        "Parse the following user query into structured search criteria for an \
         e-commerce offers API.\n\
         Extract: category (fashion or electronics), max_price, min_discount, min_rating.\n\
         Only include fields that are mentioned or implied in the query.\n\n\
         User query: \"{query}\"\n\n\
         Respond ONLY with a valid JSON object containing the criteria. \
         Example: {{\"category\": \"fashion\", \"max_price\": 50}}"
    )
}

fn revise_prompt(criteria: &Criteria, user_response: &str) -> String {
    format!(
        "Current search criteria: {}\n\
         User response: \"{user_response}\"\n\n\
         Update the criteria based on the user's response. Return ONLY a JSON \
         object with the updated criteria. Only include fields that need to be \
         added or modified.\n\n\
         Example: {{\"min_rating\": 4.5, \"max_price\": 100}}",
        criteria_json(criteria)
    )
}

fn decide_prompt(original_query: &str, criteria: &Criteria, offer_count: usize) -> String {
    format!(
        "You are an AI shopping assistant.\n\n\
         User query: \"{original_query}\"\n\
         Current criteria: {}\n\
         Number of offers found: {offer_count}\n\n\
         Decide if you need to ask the user a follow-up question to refine \
         results. If results are satisfactory (1-10 offers), respond with \
         \"CONCLUDE\". If no offers or too many offers, ask a clarifying \
         question.\n\n\
         Respond ONLY as JSON: {{\"next_action\": \"CONCLUDE\" or \"ASK\", \
         \"question\": \"...\" if ASK}}",
        criteria_json(criteria)
    )
}
