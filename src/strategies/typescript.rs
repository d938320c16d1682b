//! Transpile-and-run strategy
//!
//! Fast path: `ts-node` runs the snippet directly. When ts-node is not
//! installed, fall back to compiling with `tsc` to CommonJS and running
//! the emitted JavaScript with `node`.

use std::ffi::OsStr;

use async_trait::async_trait;
use tracing::debug;

use super::LanguageStrategy;
use crate::error::{ExecError, Stage};
use crate::input::stdin_payload;
use crate::normalize::{self, MOCK_INPUT_WARNING};
use crate::runner::{run_with_timeout, RunOutcome, DEFAULT_CEILING};
use crate::toolchain;
use crate::types::{ExecutionRequest, ExecutionResult};

pub struct TypeScriptStrategy;

impl TypeScriptStrategy {
    fn finish(out: crate::runner::ProcessOutput, inputs: &[String]) -> ExecutionResult {
        let diag = normalize::attach_stderr("Runtime error", &out.stderr);
        let mut result = normalize::from_process(&out, diag);
        if !inputs.is_empty() {
            result.warnings.push(MOCK_INPUT_WARNING.to_string());
        }
        result
    }
}

#[async_trait]
impl LanguageStrategy for TypeScriptStrategy {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        let scratch = tempfile::tempdir()?;
        let source = scratch.path().join("program.ts");
        tokio::fs::write(&source, &request.code).await?;
        let stdin = stdin_payload(&request.inputs);

        // Fast path: ts-node runs the source in place.
        match toolchain::resolve("ts-node").await {
            Ok(ts_node) => {
                debug!("running typescript via ts-node");
                return match run_with_timeout(
                    &ts_node,
                    &[source.as_os_str()],
                    Some(scratch.path()),
                    stdin.as_deref(),
                    DEFAULT_CEILING,
                )
                .await?
                {
                    RunOutcome::TimedOut => Err(ExecError::Timeout {
                        stage: Stage::Run,
                        limit_secs: DEFAULT_CEILING.as_secs(),
                    }),
                    RunOutcome::Completed(out) => Ok(Self::finish(out, &request.inputs)),
                };
            }
            Err(ExecError::ToolMissing { .. }) => {
                debug!("ts-node unavailable, falling back to tsc + node");
            }
            Err(e) => return Err(e),
        }

        // Fallback: compile to an intermediate form, then run it.
        let tsc = toolchain::resolve("tsc").await?;
        let node = toolchain::resolve("node").await?;
        let emitted = scratch.path().join("program.js");

        let compile_args: Vec<&OsStr> = vec![
            source.as_os_str(),
            OsStr::new("--outFile"),
            emitted.as_os_str(),
            OsStr::new("--module"),
            OsStr::new("commonjs"),
        ];
        match run_with_timeout(&tsc, &compile_args, Some(scratch.path()), None, DEFAULT_CEILING)
            .await?
        {
            RunOutcome::TimedOut => {
                return Err(ExecError::Timeout {
                    stage: Stage::Compile,
                    limit_secs: DEFAULT_CEILING.as_secs(),
                })
            }
            RunOutcome::Completed(out) if !out.is_success() => {
                let diagnostic = if !out.stderr.trim().is_empty() {
                    out.stderr
                } else if !out.stdout.trim().is_empty() {
                    // tsc reports diagnostics on stdout
                    out.stdout
                } else {
                    "tsc command failed".to_string()
                };
                return Err(ExecError::Compile { diagnostic });
            }
            RunOutcome::Completed(_) => {}
        }

        if !emitted.exists() {
            return Err(ExecError::Compile {
                diagnostic: "TypeScript compilation did not produce an output file".to_string(),
            });
        }

        match run_with_timeout(
            &node,
            &[emitted.as_os_str()],
            Some(scratch.path()),
            stdin.as_deref(),
            DEFAULT_CEILING,
        )
        .await?
        {
            RunOutcome::TimedOut => Err(ExecError::Timeout {
                stage: Stage::Run,
                limit_secs: DEFAULT_CEILING.as_secs(),
            }),
            RunOutcome::Completed(out) => Ok(Self::finish(out, &request.inputs)),
        }
    }
}
