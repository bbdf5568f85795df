use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Configured policy for whether the external language capability is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    /// Use the capability iff an API key is configured.
    #[default]
    Auto,
    /// Require the capability; missing key is a configuration error.
    Real,
    /// Always use rule-based logic.
    Fake,
}

impl std::str::FromStr for AgentMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "real" => Ok(Self::Real),
            "fake" => Ok(Self::Fake),
            other => Err(ConfigError::Validation(format!(
                "unsupported agent mode `{other}` (expected auto|real|fake)"
            ))),
        }
    }
}

/// Which implementation the strategy seams should use for a decision point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineChoice {
    Capability,
    Rules,
}

/// Pure function of configuration and secret presence. Callers may resolve
/// once at startup or at every decision point; the answer is identical for
/// a given input pair.
pub fn resolve(mode: AgentMode, api_key_present: bool) -> Result<EngineChoice, ConfigError> {
    match mode {
        AgentMode::Fake => Ok(EngineChoice::Rules),
        AgentMode::Real if api_key_present => Ok(EngineChoice::Capability),
        AgentMode::Real => Err(ConfigError::Validation(
            "llm.mode is `real` but llm.api_key is not configured".to_string(),
        )),
        AgentMode::Auto if api_key_present => Ok(EngineChoice::Capability),
        AgentMode::Auto => Ok(EngineChoice::Rules),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, AgentMode, EngineChoice};

    #[test]
    fn auto_follows_key_presence() {
        assert_eq!(resolve(AgentMode::Auto, true).ok(), Some(EngineChoice::Capability));
        assert_eq!(resolve(AgentMode::Auto, false).ok(), Some(EngineChoice::Rules));
    }

    #[test]
    fn fake_ignores_key_presence() {
        assert_eq!(resolve(AgentMode::Fake, true).ok(), Some(EngineChoice::Rules));
        assert_eq!(resolve(AgentMode::Fake, false).ok(), Some(EngineChoice::Rules));
    }

    #[test]
    fn real_requires_a_key() {
        assert_eq!(resolve(AgentMode::Real, true).ok(), Some(EngineChoice::Capability));
        assert!(resolve(AgentMode::Real, false).is_err());
    }

    #[test]
    fn resolution_is_idempotent() {
        for mode in [AgentMode::Auto, AgentMode::Real, AgentMode::Fake] {
            for key_present in [true, false] {
                let first = resolve(mode, key_present).ok();
                let second = resolve(mode, key_present).ok();
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn unknown_mode_string_is_a_config_error() {
        assert!("turbo".parse::<AgentMode>().is_err());
        assert_eq!("REAL".parse::<AgentMode>().ok(), Some(AgentMode::Real));
    }
}
