//! Run-only strategies
//!
//! Languages executed by handing the scratch source file straight to an
//! interpreter/runner: go (`go run`), php, python, and R. Per-language
//! hooks cover source preparation (R's interactive-read rewriting),
//! error-stream rendering (R's benign-noise filter), and output
//! post-processing (PHP's `<br>` folding).

use std::ffi::OsStr;

use async_trait::async_trait;
use tracing::debug;

use super::LanguageStrategy;
use crate::error::{ExecError, Stage};
use crate::input::stdin_payload;
use crate::normalize::{self, MOCK_INPUT_WARNING};
use crate::prepare;
use crate::runner::{run_with_timeout, RunOutcome, DEFAULT_CEILING};
use crate::toolchain;
use crate::types::{ExecutionRequest, ExecutionResult};

type PrepareFn = fn(&str) -> String;
type StderrFn = fn(&str) -> Option<String>;
type OutputFn = fn(String) -> String;

pub struct InterpretedStrategy {
    tool: &'static str,
    source_file: &'static str,
    /// Arguments inserted between the tool and the source file.
    run_args: &'static [&'static str],
    prepare: Option<PrepareFn>,
    render_stderr: StderrFn,
    post_output: Option<OutputFn>,
}

fn default_stderr(stderr: &str) -> Option<String> {
    normalize::attach_stderr("Runtime error", stderr)
}

impl InterpretedStrategy {
    pub fn go() -> Self {
        Self {
            tool: "go",
            source_file: "main.go",
            run_args: &["run"],
            prepare: None,
            render_stderr: default_stderr,
            post_output: None,
        }
    }

    pub fn php() -> Self {
        Self {
            tool: "php",
            source_file: "program.php",
            run_args: &[],
            prepare: None,
            render_stderr: default_stderr,
            post_output: Some(normalize::fold_php_breaks),
        }
    }

    pub fn python() -> Self {
        Self {
            tool: "python3",
            source_file: "program.py",
            run_args: &[],
            prepare: None,
            render_stderr: default_stderr,
            post_output: None,
        }
    }

    pub fn r() -> Self {
        Self {
            tool: "Rscript",
            source_file: "program.R",
            run_args: &["--vanilla", "--slave"],
            prepare: Some(prepare::rewrite_read_calls),
            render_stderr: normalize::filter_r_stderr,
            post_output: None,
        }
    }
}

#[async_trait]
impl LanguageStrategy for InterpretedStrategy {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        let tool = toolchain::resolve(self.tool).await?;

        let prepared = match self.prepare {
            Some(prepare) => prepare(&request.code),
            None => request.code.clone(),
        };

        let scratch = tempfile::tempdir()?;
        let source = scratch.path().join(self.source_file);
        tokio::fs::write(&source, &prepared).await?;

        let mut args: Vec<&OsStr> = self.run_args.iter().map(OsStr::new).collect();
        args.push(source.as_os_str());

        debug!(tool = self.tool, "running interpreted snippet");
        let stdin = stdin_payload(&request.inputs);
        match run_with_timeout(&tool, &args, Some(scratch.path()), stdin.as_deref(), DEFAULT_CEILING)
            .await?
        {
            RunOutcome::TimedOut => Err(ExecError::Timeout {
                stage: Stage::Run,
                limit_secs: DEFAULT_CEILING.as_secs(),
            }),
            RunOutcome::Completed(mut out) => {
                if let Some(post) = self.post_output {
                    out.stdout = post(std::mem::take(&mut out.stdout));
                }
                let diag = (self.render_stderr)(&out.stderr);
                let mut result = normalize::from_process(&out, diag);
                if !request.inputs.is_empty() {
                    result.warnings.push(MOCK_INPUT_WARNING.to_string());
                }
                Ok(result)
            }
        }
    }
}
