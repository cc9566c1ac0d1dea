//! Mapping execution outcomes to the final response.

use serde_json::Value;
use tracing::{error, warn};

use crate::error::AppError;
use crate::executor::ExecOutcome;

/// Prompt-level budget for inline plot data URIs.
pub const DATA_URI_BUDGET_BYTES: usize = 100_000;

/// Turn a captured execution into the response body, or the matching
/// fault. The diagnostic channel is only surfaced on a non-zero exit and
/// is never parsed as the answer; on timeout no partial output survives.
pub fn validate(outcome: ExecOutcome) -> Result<Value, AppError> {
    match outcome {
        ExecOutcome::TimedOut => Err(AppError::Timeout),
        ExecOutcome::Failed { exit_code, stderr } => {
            error!(exit = ?exit_code, "script execution failed");
            Err(AppError::ExecutionFailed { stderr })
        }
        ExecOutcome::Succeeded { stdout } => {
            let trimmed = stdout.trim();
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => {
                    warn_on_oversized_data_uris(&value);
                    Ok(value)
                }
                Err(err) => {
                    error!("script stdout is not valid JSON ({err}): {trimmed}");
                    Err(AppError::InvalidScriptOutput {
                        stdout: trimmed.to_string(),
                    })
                }
            }
        }
    }
}

/// The byte budget on plot data URIs is a prompt-level instruction, not a
/// contract the platform enforces; oversized values are logged so the gap
/// stays observable.
fn warn_on_oversized_data_uris(value: &Value) {
    match value {
        Value::String(s) => {
            if s.starts_with("data:") && s.len() > DATA_URI_BUDGET_BYTES {
                warn!(bytes = s.len(), "data URI exceeds the plot byte budget");
            }
        }
        Value::Array(items) => {
            for item in items {
                warn_on_oversized_data_uris(item);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                warn_on_oversized_data_uris(item);
            }
        }
        _ => {}
    }
}
