//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::llm::LlmClient;

/// Read-only state handed to every request handler. Sessions own all of
/// their mutable state themselves; nothing here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: LlmClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm = LlmClient::new(&config);
        Self {
            config: Arc::new(config),
            llm,
        }
    }
}
