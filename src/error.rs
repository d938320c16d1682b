//! Internal fault taxonomy
//!
//! Every fault is caught at its originating stage and converted into a
//! terminal [`crate::types::ExecutionResult`] by the dispatcher; nothing
//! here crosses the engine's public boundary.

use std::fmt;

use thiserror::Error;

/// Pipeline stage a ceiling applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Compile => f.write_str("compile"),
            Stage::Run => f.write_str("run"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExecError {
    /// No candidate binary responded to probing; carries installation guidance.
    #[error("{hint}")]
    ToolMissing { hint: String },

    /// Compiler invoked and exited non-zero; diagnostic text kept verbatim.
    #[error("{diagnostic}")]
    Compile { diagnostic: String },

    /// A compile or run stage exceeded its wall-clock ceiling.
    #[error("Execution timed out: {stage} stage exceeded the {limit_secs} second limit")]
    Timeout { stage: Stage, limit_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQL store error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("execution task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_stage_and_limit() {
        let err = ExecError::Timeout {
            stage: Stage::Run,
            limit_secs: 30,
        };
        assert_eq!(
            err.to_string(),
            "Execution timed out: run stage exceeded the 30 second limit"
        );
    }
}
