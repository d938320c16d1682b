//! Result normalization
//!
//! Maps raw process outcomes onto the uniform result schema: exit 0 with
//! an empty error stream is a success; exit 0 with stderr content is a
//! success with the content attached as an annotation (some runtimes emit
//! benign diagnostics on stderr); a non-zero exit is a runtime error with
//! stderr as the diagnostic.

use crate::runner::ProcessOutput;
use crate::types::{ExecutionResult, ExecutionStatus};

/// Placeholder distinguishing "ran with nothing printed" from "result not
/// yet populated".
pub const NO_OUTPUT_PLACEHOLDER: &str = "Code executed successfully (no output)";

/// Warning attached when pre-supplied input values were fed to a program.
pub const MOCK_INPUT_WARNING: &str = "Note: pre-supplied mock input values were used";

/// Normalize a completed child process. `diagnostic` is the
/// language-specific rendering of the error stream (`None` when the
/// stream was empty or filtered down to nothing).
pub fn from_process(out: &ProcessOutput, diagnostic: Option<String>) -> ExecutionResult {
    let status = if out.is_success() {
        ExecutionStatus::Success
    } else {
        ExecutionStatus::RuntimeError
    };

    let mut errors = Vec::new();
    if let Some(diag) = diagnostic {
        errors.push(diag);
    }
    if status != ExecutionStatus::Success && errors.is_empty() {
        errors.push(format!("Program exited with code {}", out.exit_code));
    }

    ExecutionResult {
        status,
        output: if out.stdout.is_empty() {
            NO_OUTPUT_PLACEHOLDER.to_string()
        } else {
            out.stdout.clone()
        },
        errors,
        warnings: Vec::new(),
    }
}

/// Default error-stream rendering: attach non-empty stderr verbatim under
/// a short label.
pub fn attach_stderr(label: &str, stderr: &str) -> Option<String> {
    if stderr.trim().is_empty() {
        None
    } else {
        Some(format!("{label}:\n{stderr}"))
    }
}

/// R emits benign loader noise on stderr even on success; keep only lines
/// that are neither `WARNING:` banners nor package messages.
pub fn filter_r_stderr(stderr: &str) -> Option<String> {
    let kept: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("WARNING:")
                && !trimmed.to_lowercase().contains("package")
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(format!("R messages:\n{}", kept.join("\n")))
    }
}

/// PHP renders line breaks as HTML tags; fold them back for console display.
pub fn fold_php_breaks(output: String) -> String {
    output
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(exit_code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn clean_exit_is_success() {
        let res = from_process(&out(0, "hi\n", ""), None);
        assert_eq!(res.status, ExecutionStatus::Success);
        assert_eq!(res.output, "hi\n");
        assert!(res.errors.is_empty());
    }

    #[test]
    fn empty_output_gets_placeholder() {
        let res = from_process(&out(0, "", ""), None);
        assert_eq!(res.output, NO_OUTPUT_PLACEHOLDER);
    }

    #[test]
    fn stderr_on_success_is_annotated_not_fatal() {
        let diag = attach_stderr("Runtime messages", "deprecation notice");
        let res = from_process(&out(0, "done\n", "deprecation notice"), diag);
        assert_eq!(res.status, ExecutionStatus::Success);
        assert_eq!(res.errors.len(), 1);
        assert!(res.errors[0].contains("deprecation notice"));
    }

    #[test]
    fn non_zero_exit_is_runtime_error() {
        let diag = attach_stderr("Runtime error", "segfault");
        let res = from_process(&out(139, "partial", "segfault"), diag);
        assert_eq!(res.status, ExecutionStatus::RuntimeError);
        assert!(res.errors[0].contains("segfault"));
    }

    #[test]
    fn non_zero_exit_without_stderr_still_reports_an_error() {
        let res = from_process(&out(2, "", ""), None);
        assert_eq!(res.status, ExecutionStatus::RuntimeError);
        assert_eq!(res.errors, vec!["Program exited with code 2".to_string()]);
    }

    #[test]
    fn r_filter_drops_warning_and_package_lines() {
        let stderr = "WARNING: unknown locale\nLoading required package: stats\nError: object 'x' not found";
        let filtered = filter_r_stderr(stderr).unwrap();
        assert!(filtered.contains("object 'x' not found"));
        assert!(!filtered.contains("locale"));
        assert!(!filtered.contains("stats"));
        assert_eq!(filter_r_stderr("WARNING: only noise\n"), None);
    }

    #[test]
    fn php_breaks_fold_to_newlines() {
        assert_eq!(fold_php_breaks("a<br>b<br/>c<br />d".into()), "a\nb\nc\nd");
    }
}
