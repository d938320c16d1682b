//! Tabular-query strategy
//!
//! No process is spawned: statements run against a fresh in-memory
//! SQLite store, so each request starts empty and nothing survives it.
//! Comment lines are stripped, statements split on `;`, and each
//! statement commits independently; a failing statement is recorded as an
//! error naming it and does not roll back or halt the rest.

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;

use super::LanguageStrategy;
use crate::error::ExecError;
use crate::types::{ExecutionRequest, ExecutionResult, ExecutionStatus};

const SQL_NO_OUTPUT: &str = "SQL executed successfully (no output)";

pub struct SqlStrategy;

#[async_trait]
impl LanguageStrategy for SqlStrategy {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        let code = request.code.clone();
        let result = tokio::task::spawn_blocking(move || run_statements(&code)).await??;
        Ok(result)
    }
}

fn run_statements(code: &str) -> Result<ExecutionResult, ExecError> {
    let conn = Connection::open_in_memory()?;

    let mut output_lines: Vec<String> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for statement in split_statements(code) {
        debug!(statement = %summarize(&statement), "executing sql statement");
        let outcome = if statement.to_uppercase().starts_with("SELECT") {
            run_query(&conn, &statement, &mut output_lines)
        } else {
            run_command(&conn, &statement, &mut output_lines)
        };

        if let Err(e) = outcome {
            errors.push(format!(
                "SQL error in statement:\n  {}\n  {e}",
                summarize(&statement)
            ));
        }
    }

    let output = if output_lines.is_empty() {
        SQL_NO_OUTPUT.to_string()
    } else {
        output_lines.join("\n")
    };

    Ok(ExecutionResult {
        status: ExecutionStatus::Success,
        output,
        errors,
        warnings: Vec::new(),
    })
}

/// Strip `--` comment lines, then split on the statement terminator.
fn split_statements(code: &str) -> Vec<String> {
    let cleaned: String = code
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    cleaned
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(str::to_string)
        .collect()
}

/// First 100 characters of a statement, for diagnostics.
fn summarize(statement: &str) -> String {
    statement.chars().take(100).collect()
}

fn run_query(
    conn: &Connection,
    statement: &str,
    output_lines: &mut Vec<String>,
) -> Result<(), rusqlite::Error> {
    let mut prepared = conn.prepare(statement)?;
    let columns: Vec<String> = prepared.column_names().iter().map(|c| c.to_string()).collect();

    let mut rendered_rows: Vec<String> = Vec::new();
    let mut rows = prepared.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            values.push(render_value(row.get_ref(idx)?));
        }
        rendered_rows.push(values.join(" | "));
    }

    if rendered_rows.is_empty() {
        output_lines.push("Query returned 0 rows.\n".to_string());
    } else {
        let header = columns.join(" | ");
        output_lines.push(format!("\n{header}"));
        output_lines.push("-".repeat(header.len()));
        output_lines.extend(rendered_rows);
        output_lines.push(String::new());
    }
    Ok(())
}

fn run_command(
    conn: &Connection,
    statement: &str,
    output_lines: &mut Vec<String>,
) -> Result<(), rusqlite::Error> {
    // Autocommit connection: the statement's effect is durable for the
    // rest of the request regardless of later failures.
    conn.execute_batch(statement)?;

    let verb = statement
        .split_whitespace()
        .next()
        .unwrap_or("statement")
        .to_uppercase();
    output_lines.push(format!("{verb} executed successfully"));
    Ok(())
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(text) => String::from_utf8_lossy(text).to_string(),
        ValueRef::Blob(blob) => format!("<blob {} bytes>", blob.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_insert_select_renders_table() {
        let code = "
            CREATE TABLE users (id INTEGER, name TEXT);
            INSERT INTO users VALUES (1, 'ada');
            INSERT INTO users VALUES (2, 'grace');
            SELECT * FROM users;
        ";
        let res = run_statements(code).unwrap();
        assert_eq!(res.status, ExecutionStatus::Success);
        assert!(res.errors.is_empty());
        assert!(res.output.contains("CREATE executed successfully"));
        assert!(res.output.contains("id | name"));
        assert!(res.output.contains("1 | ada"));
        assert!(res.output.contains("2 | grace"));
    }

    #[test]
    fn failing_statement_does_not_halt_or_roll_back() {
        let code = "
            CREATE TABLE t (x INTEGER);
            INSERT INTO missing VALUES (1);
            INSERT INTO t VALUES (42);
            SELECT x FROM t;
        ";
        let res = run_statements(code).unwrap();
        // First statement's effect persisted and the third executed.
        assert!(res.output.contains("42"));
        assert_eq!(res.errors.len(), 1);
        assert!(res.errors[0].contains("INSERT INTO missing"));
    }

    #[test]
    fn comment_lines_are_stripped() {
        let code = "-- setup\nCREATE TABLE t (x);\n-- done\n";
        let res = run_statements(code).unwrap();
        assert!(res.errors.is_empty());
        assert!(res.output.contains("CREATE executed successfully"));
    }

    #[test]
    fn empty_select_reports_zero_rows() {
        let code = "CREATE TABLE t (x); SELECT * FROM t;";
        let res = run_statements(code).unwrap();
        assert!(res.output.contains("Query returned 0 rows."));
    }

    #[test]
    fn no_statements_yields_placeholder() {
        let res = run_statements("-- nothing but comments\n").unwrap();
        assert_eq!(res.output, SQL_NO_OUTPUT);
    }

    #[test]
    fn null_values_render_as_null() {
        let code = "CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (NULL); SELECT x FROM t;";
        let res = run_statements(code).unwrap();
        assert!(res.output.contains("NULL"));
    }
}
