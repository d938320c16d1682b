//! Dispatcher
//!
//! Maps a language tag to its strategy and guarantees the engine's
//! external contract: every request gets exactly one terminal
//! [`ExecutionResult`]; no fault propagates past this boundary.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::ExecError;
use crate::languages::Language;
use crate::strategies::{
    EmbeddedStrategy, InterpretedStrategy, JavaStrategy, LanguageStrategy, NativeStrategy,
    SqlStrategy, TypeScriptStrategy,
};
use crate::types::{ExecutionRequest, ExecutionResult, ExecutionStatus};

pub struct Engine {
    strategies: HashMap<Language, Box<dyn LanguageStrategy>>,
}

impl Engine {
    pub fn new() -> Self {
        let mut strategies: HashMap<Language, Box<dyn LanguageStrategy>> = HashMap::new();
        strategies.insert(Language::Rhai, Box::new(EmbeddedStrategy));
        strategies.insert(Language::C, Box::new(NativeStrategy::c()));
        strategies.insert(Language::Cpp, Box::new(NativeStrategy::cpp()));
        strategies.insert(Language::Java, Box::new(JavaStrategy));
        strategies.insert(Language::Go, Box::new(InterpretedStrategy::go()));
        strategies.insert(Language::Php, Box::new(InterpretedStrategy::php()));
        strategies.insert(Language::Python, Box::new(InterpretedStrategy::python()));
        strategies.insert(Language::R, Box::new(InterpretedStrategy::r()));
        strategies.insert(Language::TypeScript, Box::new(TypeScriptStrategy));
        strategies.insert(Language::Sql, Box::new(SqlStrategy));
        Self { strategies }
    }

    /// Execute one request to a terminal result. Unrecognized tags return
    /// `unsupported_language` without touching the filesystem or spawning
    /// processes.
    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionResult {
        let Some(language) = Language::parse(&request.language) else {
            return ExecutionResult::failure(
                ExecutionStatus::UnsupportedLanguage,
                format!("Execution is not supported for language '{}'", request.language),
            );
        };

        let Some(strategy) = self.strategies.get(&language) else {
            // Every parsed tag is registered in `new`; keep the contract anyway.
            return ExecutionResult::failure(
                ExecutionStatus::UnsupportedLanguage,
                format!("No strategy registered for language '{language}'"),
            );
        };

        info!(%language, inputs = request.inputs.len(), "executing snippet");
        let result = match strategy.execute(request).await {
            Ok(result) => result,
            Err(fault) => fault_result(fault),
        };
        debug!(%language, status = ?result.status, "execution finished");
        result
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert an internal fault into its terminal result.
fn fault_result(fault: ExecError) -> ExecutionResult {
    match fault {
        ExecError::ToolMissing { hint } => {
            ExecutionResult::failure(ExecutionStatus::ToolMissing, hint)
        }
        ExecError::Compile { diagnostic } => ExecutionResult::failure(
            ExecutionStatus::CompileError,
            format!("Compilation error:\n{diagnostic}"),
        ),
        timeout @ ExecError::Timeout { .. } => {
            ExecutionResult::failure(ExecutionStatus::Timeout, timeout.to_string())
        }
        other => ExecutionResult::failure(
            ExecutionStatus::Error,
            format!("Execution error: {other}"),
        ),
    }
}
