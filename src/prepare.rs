//! Source preparation
//!
//! Two best-effort textual transformations applied before execution:
//! entry-class extraction for languages whose artifact name must match a
//! declared type, and interactive-read rewriting for languages whose read
//! primitive has no batch-mode equivalent.

use std::sync::OnceLock;

use regex::Regex;

/// Fallback entry-class name when the snippet declares none.
pub const DEFAULT_ENTRY_CLASS: &str = "Main";

fn public_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"public\s+class\s+(\w+)").expect("valid regex"))
}

fn any_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"class\s+(\w+)").expect("valid regex"))
}

/// Extract the entry-class name from a Java snippet: the first public
/// class wins (its name must match the source filename), then any class,
/// then [`DEFAULT_ENTRY_CLASS`].
pub fn entry_class(code: &str) -> String {
    public_class_re()
        .captures(code)
        .or_else(|| any_class_re().captures(code))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_ENTRY_CLASS.to_string())
}

/// One-token stdin read replacing an interactive `readline(...)` call.
const SCAN_STDIN: &str = r#"scan("stdin", what=character(), n=1, quiet=TRUE)"#;

/// Rewrite R's interactive `readline(...)` calls into batch-compatible
/// stdin reads. Conversion-wrapped forms are rewritten first so the bare
/// pattern cannot eat their closing parenthesis; left-to-right read order
/// is preserved throughout, since it determines which input value each
/// call consumes. Textual rewrite only: nested or multi-line call forms
/// are out of contract.
pub fn rewrite_read_calls(code: &str) -> String {
    static INTEGER: OnceLock<Regex> = OnceLock::new();
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    static CHARACTER: OnceLock<Regex> = OnceLock::new();
    static BARE: OnceLock<Regex> = OnceLock::new();

    let integer = INTEGER.get_or_init(|| {
        Regex::new(r"as\.integer\s*\(\s*readline\s*\([^)]*\)\s*\)").expect("valid regex")
    });
    let numeric = NUMERIC.get_or_init(|| {
        Regex::new(r"as\.numeric\s*\(\s*readline\s*\([^)]*\)\s*\)").expect("valid regex")
    });
    let character = CHARACTER.get_or_init(|| {
        Regex::new(r"character\s*\(\s*readline\s*\([^)]*\)\s*\)").expect("valid regex")
    });
    let bare = BARE.get_or_init(|| Regex::new(r"readline\s*\([^)]*\)").expect("valid regex"));

    let code = integer.replace_all(code, format!("as.integer({SCAN_STDIN})").as_str());
    let code = numeric.replace_all(&code, format!("as.numeric({SCAN_STDIN})").as_str());
    let code = character.replace_all(&code, SCAN_STDIN);
    bare.replace_all(&code, SCAN_STDIN).into_owned()
}
