//! Domain logic for the Offerly shopping assistant: filter criteria, offers,
//! the rule-based parser/decision/updater trio, the capability mode selector,
//! and configuration loading. No I/O lives here; network collaborators are in
//! `offerly-catalog` and `offerly-agent`.

pub mod config;
pub mod criteria;
pub mod decision;
pub mod mode;
pub mod offer;
pub mod parser;
pub mod updater;

pub use config::{AppConfig, ConfigError, LoadOptions};
pub use criteria::{Category, Criteria, CriteriaPatch};
pub use decision::{decide_by_rules, Decision, MAX_PRESENTABLE_OFFERS};
pub use mode::{AgentMode, EngineChoice};
pub use offer::{sort_for_presentation, Offer};
pub use parser::parse_query;
pub use updater::apply_followup;
