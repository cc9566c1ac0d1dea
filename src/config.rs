//! Process-wide configuration, read once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Groq's OpenAI-compatible chat-completions endpoint.
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama3-70b-8192";
/// Upstream clients give up at 180 seconds; leave a buffer.
const DEFAULT_TIMEOUT_SECS: u64 = 170;

/// Immutable service configuration. Built once in main and shared by
/// reference; no component mutates it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub exec_timeout: Duration,
    pub interpreter: String,
    pub workspace_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = env::var("LLM_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            warn!("LLM_API_KEY is not set; generation requests will fail upstream");
        }
        let timeout_secs = env::var("EXECUTION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key,
            base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            exec_timeout: Duration::from_secs(timeout_secs),
            interpreter: env::var("PYTHON_BIN").unwrap_or_else(|_| "python3".to_string()),
            workspace_root: env::var("WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        }
    }
}
