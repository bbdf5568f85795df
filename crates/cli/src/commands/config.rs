use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use offerly_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "catalog.base_url",
        &config.catalog.base_url,
        source("catalog.base_url", "OFFERLY_CATALOG_BASE_URL"),
    ));
    lines.push(render_line(
        "catalog.timeout_secs",
        &config.catalog.timeout_secs.to_string(),
        source("catalog.timeout_secs", "OFFERLY_CATALOG_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "llm.mode",
        &format!("{:?}", config.llm.mode).to_lowercase(),
        source("llm.mode", "OFFERLY_LLM_MODE"),
    ));
    let llm_api_key = if config.llm.api_key_present() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        source("llm.api_key", "OFFERLY_LLM_API_KEY"),
    ));
    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        source("llm.base_url", "OFFERLY_LLM_BASE_URL"),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        source("llm.model", "OFFERLY_LLM_MODEL"),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", "OFFERLY_LLM_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "session.ttl_secs",
        &config.session.ttl_secs.to_string(),
        source("session.ttl_secs", "OFFERLY_SESSION_TTL_SECS"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "OFFERLY_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_lowercase(),
        source("logging.format", "OFFERLY_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("offerly.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/offerly.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
