//! Compile-then-run strategies
//!
//! Native toolchains (gcc/g++) and the managed-bytecode toolchain
//! (javac/java). The snippet is written into a scratch directory, the
//! resolved compiler is invoked under its ceiling, and only a clean
//! compile proceeds to the run stage. The scratch directory is removed on
//! every exit path when the `TempDir` drops.

use std::ffi::OsStr;

use async_trait::async_trait;
use tracing::debug;

use super::LanguageStrategy;
use crate::error::{ExecError, Stage};
use crate::input::stdin_payload;
use crate::normalize::{self, MOCK_INPUT_WARNING};
use crate::prepare;
use crate::runner::{run_with_timeout, ProcessOutput, RunOutcome, BYTECODE_CEILING, DEFAULT_CEILING};
use crate::toolchain;
use crate::types::{ExecutionRequest, ExecutionResult};

/// Compiler stderr kept verbatim; some toolchains report on stdout instead.
fn compile_diagnostic(out: ProcessOutput) -> ExecError {
    let diagnostic = if !out.stderr.is_empty() {
        out.stderr
    } else if !out.stdout.is_empty() {
        out.stdout
    } else {
        format!("Compiler exited with code {}", out.exit_code)
    };
    ExecError::Compile { diagnostic }
}

fn annotate_mock_input(mut result: ExecutionResult, inputs: &[String]) -> ExecutionResult {
    if !inputs.is_empty() {
        result.warnings.push(MOCK_INPUT_WARNING.to_string());
    }
    result
}

/// gcc/g++ style: compile to a binary in the scratch directory, then run
/// the binary with the mock input stream on stdin.
pub struct NativeStrategy {
    tool: &'static str,
    source_file: &'static str,
}

impl NativeStrategy {
    pub fn c() -> Self {
        Self {
            tool: "gcc",
            source_file: "program.c",
        }
    }

    pub fn cpp() -> Self {
        Self {
            tool: "g++",
            source_file: "program.cpp",
        }
    }
}

#[async_trait]
impl LanguageStrategy for NativeStrategy {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        let compiler = toolchain::resolve(self.tool).await?;

        let scratch = tempfile::tempdir()?;
        let source = scratch.path().join(self.source_file);
        let binary = scratch.path().join("program");
        tokio::fs::write(&source, &request.code).await?;

        debug!(tool = self.tool, "compiling native snippet");
        let compile_args: Vec<&OsStr> = vec![
            source.as_os_str(),
            OsStr::new("-o"),
            binary.as_os_str(),
        ];
        match run_with_timeout(
            &compiler,
            &compile_args,
            Some(scratch.path()),
            None,
            DEFAULT_CEILING,
        )
        .await?
        {
            RunOutcome::TimedOut => {
                return Err(ExecError::Timeout {
                    stage: Stage::Compile,
                    limit_secs: DEFAULT_CEILING.as_secs(),
                })
            }
            RunOutcome::Completed(out) if !out.is_success() => return Err(compile_diagnostic(out)),
            RunOutcome::Completed(_) => {}
        }

        let stdin = stdin_payload(&request.inputs);
        match run_with_timeout(
            &binary,
            &[] as &[&OsStr],
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
            RunOutcome::Completed(out) => {
                let diag = normalize::attach_stderr("Runtime error", &out.stderr);
                Ok(annotate_mock_input(
                    normalize::from_process(&out, diag),
                    &request.inputs,
                ))
            }
        }
    }
}

/// javac/java: the source filename must match the first publicly declared
/// class, so the entry-class name is extracted from the snippet (with a
/// fixed fallback) and drives both the scratch filename and the run
/// invocation.
pub struct JavaStrategy;

#[async_trait]
impl LanguageStrategy for JavaStrategy {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        let javac = toolchain::resolve("javac").await?;
        let java = toolchain::resolve("java").await?;

        let class_name = prepare::entry_class(&request.code);
        let scratch = tempfile::tempdir()?;
        let source = scratch.path().join(format!("{class_name}.java"));
        tokio::fs::write(&source, &request.code).await?;

        debug!(%class_name, "compiling java snippet");
        match run_with_timeout(
            &javac,
            &[source.as_os_str()],
            Some(scratch.path()),
            None,
            BYTECODE_CEILING,
        )
        .await?
        {
            RunOutcome::TimedOut => {
                return Err(ExecError::Timeout {
                    stage: Stage::Compile,
                    limit_secs: BYTECODE_CEILING.as_secs(),
                })
            }
            RunOutcome::Completed(out) if !out.is_success() => return Err(compile_diagnostic(out)),
            RunOutcome::Completed(_) => {}
        }

        let stdin = stdin_payload(&request.inputs);
        let run_args: Vec<&OsStr> = vec![
            OsStr::new("-cp"),
            scratch.path().as_os_str(),
            OsStr::new(class_name.as_str()),
        ];
        match run_with_timeout(&java, &run_args, Some(scratch.path()), stdin.as_deref(), BYTECODE_CEILING)
            .await?
        {
            RunOutcome::TimedOut => Err(ExecError::Timeout {
                stage: Stage::Run,
                limit_secs: BYTECODE_CEILING.as_secs(),
            }),
            RunOutcome::Completed(out) => {
                let diag = normalize::attach_stderr("Runtime error", &out.stderr);
                Ok(annotate_mock_input(
                    normalize::from_process(&out, diag),
                    &request.inputs,
                ))
            }
        }
    }
}
