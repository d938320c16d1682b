//! In-process evaluator
//!
//! Executes snippets of the engine's embedded scripting runtime (rhai)
//! without spawning a process. A fresh script engine is built per
//! evaluation with its print/debug hooks wired to a per-run capture
//! buffer, so no process-wide channel redirection (and no evaluation
//! lock) is needed. The `input` primitive is substituted with the mock
//! input stream: the prompt and the consumed value are echoed to the
//! capture buffer, and an exhausted stream yields a fixed default value.
//!
//! No wall-clock ceiling is enforced at this layer; a non-terminating
//! snippet stalls its blocking worker thread.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use rhai::{Engine as ScriptEngine, EvalAltResult};
use tracing::debug;

use super::LanguageStrategy;
use crate::error::ExecError;
use crate::input::MockInputStream;
use crate::normalize::{MOCK_INPUT_WARNING, NO_OUTPUT_PLACEHOLDER};
use crate::types::{ExecutionRequest, ExecutionResult, ExecutionStatus};

pub struct EmbeddedStrategy;

#[async_trait]
impl LanguageStrategy for EmbeddedStrategy {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        let code = request.code.clone();
        let inputs = request.inputs.clone();
        // rhai's default build is single-threaded; keep the whole
        // evaluation on one blocking worker.
        let result = tokio::task::spawn_blocking(move || evaluate(&code, &inputs)).await?;
        Ok(result)
    }
}

fn evaluate(code: &str, inputs: &[String]) -> ExecutionResult {
    let capture: Rc<RefCell<String>> = Rc::new(RefCell::new(String::new()));
    let stream = Rc::new(RefCell::new(MockInputStream::seeded(inputs)));

    let mut engine = ScriptEngine::new();

    let out = capture.clone();
    engine.on_print(move |text| {
        let mut buf = out.borrow_mut();
        buf.push_str(text);
        buf.push('\n');
    });

    let out = capture.clone();
    engine.on_debug(move |text, _source, pos| {
        let mut buf = out.borrow_mut();
        match pos.line() {
            Some(line) => buf.push_str(&format!("{text} (line {line})")),
            None => buf.push_str(text),
        }
        buf.push('\n');
    });

    let out = capture.clone();
    let reads = stream.clone();
    engine.register_fn("input", move |prompt: &str| -> String {
        let value = reads.borrow_mut().next_or_default();
        let mut buf = out.borrow_mut();
        buf.push_str(prompt);
        buf.push_str(&value);
        buf.push('\n');
        value
    });

    let out = capture.clone();
    let reads = stream.clone();
    engine.register_fn("input", move || -> String {
        let value = reads.borrow_mut().next_or_default();
        let mut buf = out.borrow_mut();
        buf.push_str(&value);
        buf.push('\n');
        value
    });

    let mut warnings = Vec::new();
    if code.contains("input(") {
        warnings.push(MOCK_INPUT_WARNING.to_string());
    }

    debug!(len = code.len(), "evaluating embedded snippet");
    match engine.run(code) {
        Ok(()) => {
            let output = capture.borrow().clone();
            ExecutionResult {
                status: ExecutionStatus::Success,
                output: if output.is_empty() {
                    NO_OUTPUT_PLACEHOLDER.to_string()
                } else {
                    output
                },
                errors: Vec::new(),
                warnings,
            }
        }
        Err(err) => {
            // Whatever was printed before the fault is preserved.
            let partial = capture.borrow().clone();
            ExecutionResult {
                status: classify_fault(&err),
                output: partial,
                errors: vec![format_fault(&err)],
                warnings,
            }
        }
    }
}

/// A runtime fault that signals an end-of-input condition is classified
/// separately from generic evaluation faults. The substituted `input`
/// primitive never signals it (it falls back to a fixed default), so this
/// only surfaces when the snippet raises the condition itself.
fn classify_fault(err: &EvalAltResult) -> ExecutionStatus {
    match err {
        EvalAltResult::ErrorRuntime(value, _) if value.to_string().starts_with("EOF") => {
            ExecutionStatus::InputExhausted
        }
        _ => ExecutionStatus::RuntimeError,
    }
}

/// Diagnostic format: `Line <n>: <error>` when the fault position carries
/// a line inside the evaluated snippet, else the bare error text.
fn format_fault(err: &EvalAltResult) -> String {
    match err.position().line() {
        Some(line) => format!("Line {line}: {err}"),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_program_prints() {
        let res = evaluate(r#"print("Hello")"#, &[]);
        assert_eq!(res.status, ExecutionStatus::Success);
        assert!(res.output.contains("Hello"));
        assert!(res.errors.is_empty());
    }

    #[test]
    fn debug_statements_use_plain_line_numbers() {
        let res = evaluate(r#"debug("trace");"#, &[]);
        assert_eq!(res.status, ExecutionStatus::Success);
        assert!(res.output.contains(r#""trace" (line 1)"#), "got {}", res.output);
        assert!(!res.output.contains('@'));
    }

    #[test]
    fn no_output_yields_placeholder() {
        let res = evaluate("let x = 1 + 1;", &[]);
        assert_eq!(res.status, ExecutionStatus::Success);
        assert_eq!(res.output, NO_OUTPUT_PLACEHOLDER);
    }

    #[test]
    fn reads_echo_in_order_before_computed_output() {
        let code = r#"
            let a = input("a: ");
            let b = input("b: ");
            print(a + b);
        "#;
        let inputs = vec!["3".to_string(), "4".to_string()];
        let res = evaluate(code, &inputs);
        assert_eq!(res.status, ExecutionStatus::Success);
        let first = res.output.find("a: 3").unwrap();
        let second = res.output.find("b: 4").unwrap();
        let computed = res.output.find("34").unwrap();
        assert!(first < second && second < computed);
        assert_eq!(res.warnings, vec![MOCK_INPUT_WARNING.to_string()]);
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let code = r#"print(input("x: ") + "!");"#;
        let inputs = vec!["7".to_string()];
        let a = evaluate(code, &inputs);
        let b = evaluate(code, &inputs);
        assert_eq!(a.output, b.output);
    }

    #[test]
    fn surplus_inputs_do_not_change_output() {
        let code = r#"print(input());"#;
        let short = evaluate(code, &["1".to_string()]);
        let long = evaluate(code, &["1".to_string(), "2".to_string(), "3".to_string()]);
        assert_eq!(short.output, long.output);
    }

    #[test]
    fn exhausted_stream_substitutes_fixed_default() {
        let code = r#"
            let a = input();
            let b = input();
            print(b);
        "#;
        let res = evaluate(code, &["only".to_string()]);
        assert_eq!(res.status, ExecutionStatus::Success);
        assert!(res.output.contains("default"));
    }

    #[test]
    fn empty_inputs_use_seeded_mock_values() {
        let res = evaluate(r#"print(input());"#, &[]);
        assert_eq!(res.status, ExecutionStatus::Success);
        // First seeded default value.
        assert!(res.output.contains('5'));
    }

    #[test]
    fn fault_preserves_partial_output_and_line_number() {
        let code = "print(\"before\");\nundefined_fn();";
        let res = evaluate(code, &[]);
        assert_eq!(res.status, ExecutionStatus::RuntimeError);
        assert!(res.output.contains("before"));
        assert_eq!(res.errors.len(), 1);
        assert!(res.errors[0].starts_with("Line 2:"), "got {}", res.errors[0]);
    }

    #[test]
    fn raised_end_of_input_is_classified_separately() {
        let res = evaluate(r#"throw "EOF: no more input";"#, &[]);
        assert_eq!(res.status, ExecutionStatus::InputExhausted);
    }
}
