//! Request and result records
//!
//! The wire-level schema shared by every strategy: one [`ExecutionRequest`]
//! in, one [`ExecutionResult`] out, with the outcome classified by
//! [`ExecutionStatus`]. Serialized as JSON with snake_case tags.

use serde::{Deserialize, Serialize};

/// A snippet to execute: the source text, a language tag (matched
/// case-insensitively against [`crate::languages::Language`] aliases),
/// and pre-supplied values fed to interactive reads in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub inputs: Vec<String>,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            inputs: Vec::new(),
        }
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }
}

/// Terminal classification of a run. `Success` covers any run that
/// completed under its ceiling with a zero exit, including runs whose
/// statements individually failed but were reported in-band (the
/// statement store does this). `Error` is the catch-all for engine-side
/// faults that are none of the more specific kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Error,
    CompileError,
    RuntimeError,
    Timeout,
    InputExhausted,
    ToolMissing,
    UnsupportedLanguage,
}

/// The normalized outcome every strategy produces. `output` always holds
/// something printable; `errors` and `warnings` are omitted from the JSON
/// rendering when empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub output: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExecutionResult {
    /// A failed run with no captured output and a single diagnostic.
    pub fn failure(status: ExecutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            output: String::new(),
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_inputs_default_to_empty() {
        let req: ExecutionRequest =
            serde_json::from_str(r#"{"code": "1 + 1", "language": "rhai"}"#).unwrap();
        assert_eq!(req.language, "rhai");
        assert!(req.inputs.is_empty());

        let seeded = ExecutionRequest::new("x", "python").with_inputs(["5", "10"]);
        assert_eq!(seeded.inputs, vec!["5".to_string(), "10".to_string()]);
    }

    #[test]
    fn status_serializes_snake_case() {
        let tag = serde_json::to_string(&ExecutionStatus::CompileError).unwrap();
        assert_eq!(tag, r#""compile_error""#);
        let back: ExecutionStatus = serde_json::from_str(r#""input_exhausted""#).unwrap();
        assert_eq!(back, ExecutionStatus::InputExhausted);
    }

    #[test]
    fn empty_error_lists_are_omitted_from_json() {
        let ok = ExecutionResult {
            status: ExecutionStatus::Success,
            output: "42\n".to_string(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        let json = serde_json::to_string(&ok).unwrap();
        assert!(!json.contains("errors"));
        assert!(!json.contains("warnings"));
        assert!(ok.is_success());

        let failed = ExecutionResult::failure(ExecutionStatus::Timeout, "too slow");
        assert!(serde_json::to_string(&failed).unwrap().contains("errors"));
        assert!(!failed.is_success());
    }
}
