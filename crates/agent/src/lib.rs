//! Conversational brain of the Offerly assistant: per-session dialogue state
//! and the rule/LLM hybrid interpretation layer.
//!
//! # Architecture
//!
//! Each turn runs a constrained loop:
//! 1. **Interpretation** (`interpret`) - parse a fresh query, or fold a
//!    follow-up answer into the accumulated criteria
//! 2. **Offer fetch** - ask the catalog collaborator for matching offers
//! 3. **Decision** (`interpret`) - conclude with results or ask a clarifying
//!    question
//! 4. **Conclusion** (`runtime`) - sort offers for presentation and mark the
//!    session done, or return the question and keep the session open
//!
//! # Key types
//!
//! - `AgentRuntime` - per-session orchestrator (see `runtime`)
//! - `Interpreter` - strategy seam with rule-based and LLM-delegated
//!   implementations, selected by the mode policy at each decision point
//! - `LlmClient` - pluggable trait over the external language capability
//! - `SessionStore` - TTL-bounded conversation memory
//!
//! # Degradation principle
//!
//! The capability is optional everywhere. Parse and revise failures fall
//! back to the rule-based path; decision failures fail open to "conclude";
//! a dead catalog degrades to an empty result set. No capability or catalog
//! fault ever aborts an in-progress session.

pub mod api;
pub mod interpret;
pub mod llm;
pub mod runtime;
pub mod session;

pub use api::{handle_turn, RequestError, TurnRequest};
pub use interpret::{Interpreter, LlmInterpreter, RuleBasedInterpreter};
pub use llm::{capability_from_config, LlmClient, LlmError, OpenAiClient};
pub use runtime::{AgentRuntime, TurnOutcome};
pub use session::{SessionState, SessionStore};
