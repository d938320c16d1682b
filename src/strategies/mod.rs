//! Per-language execution strategies
//!
//! Each strategy owns the prepare/build/run/classify behavior for one
//! execution shape. The dispatcher routes a request to exactly one
//! strategy and converts any internal fault into a terminal result.

pub mod compiled;
pub mod embedded;
pub mod interpreted;
pub mod sql;
pub mod typescript;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::types::{ExecutionRequest, ExecutionResult};

#[async_trait]
pub trait LanguageStrategy: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecError>;
}

pub use compiled::{JavaStrategy, NativeStrategy};
pub use embedded::EmbeddedStrategy;
pub use interpreted::InterpretedStrategy;
pub use sql::SqlStrategy;
pub use typescript::TypeScriptStrategy;
