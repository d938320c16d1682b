//! Toolchain discovery
//!
//! Locates compiler/interpreter binaries by probing an ordered candidate
//! list with a fast version invocation. Successful resolutions are cached
//! for the process lifetime (write-once per tool; a later install needs a
//! restart to be observed). Failed probes are never cached, so a binary
//! installed mid-session is picked up on the next request.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ExecError;
use crate::runner::{self, RunOutcome, PROBE_CEILING};

/// Discovery configuration for one tool.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    /// Candidate locations, bare command name first.
    pub candidates: Vec<String>,
    /// Arguments for the version probe invocation.
    pub probe: Vec<String>,
    /// Installation guidance returned when no candidate responds.
    pub hint: String,
}

static CONFIG: OnceLock<HashMap<String, ToolConfig>> = OnceLock::new();
static RESOLVED: OnceLock<Mutex<HashMap<String, PathBuf>>> = OnceLock::new();

/// Load tool configurations: the `TOOLCHAINS_CONFIG` env var may point at
/// an alternate TOML file, otherwise the embedded defaults are used.
fn config() -> Result<&'static HashMap<String, ToolConfig>, ExecError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let content = match std::env::var("TOOLCHAINS_CONFIG") {
        Ok(path) => std::fs::read_to_string(&path)?,
        Err(_) => {
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/files/toolchains.toml")).to_string()
        }
    };
    let parsed: HashMap<String, ToolConfig> = toml::from_str(&content)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(CONFIG.get_or_init(|| parsed))
}

fn cache() -> &'static Mutex<HashMap<String, PathBuf>> {
    RESOLVED.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Resolve a tool to a working binary path, probing candidates in order.
pub async fn resolve(tool: &str) -> Result<PathBuf, ExecError> {
    if let Some(path) = cache().lock().ok().and_then(|map| map.get(tool).cloned()) {
        return Ok(path);
    }

    let entry = config()?.get(tool).cloned().ok_or_else(|| ExecError::ToolMissing {
        hint: format!("No toolchain configuration for '{tool}'"),
    })?;

    for candidate in &entry.candidates {
        if probe(candidate, &entry.probe).await {
            let path = PathBuf::from(candidate);
            info!(tool, candidate, "toolchain resolved");
            if let Ok(mut map) = cache().lock() {
                map.entry(tool.to_string()).or_insert_with(|| path.clone());
            }
            return Ok(path);
        }
        debug!(tool, candidate, "probe failed");
    }

    Err(ExecError::ToolMissing { hint: entry.hint })
}

/// True when the candidate responds to its version probe within the
/// probe ceiling. Spawn failures and timeouts both disqualify it.
async fn probe(candidate: &str, probe_args: &[String]) -> bool {
    match runner::run_with_timeout(candidate, probe_args, None, None, PROBE_CEILING).await {
        Ok(RunOutcome::Completed(out)) => out.is_success(),
        Ok(RunOutcome::TimedOut) | Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses_and_covers_all_tools() {
        let config = config().unwrap();
        for tool in [
            "gcc", "g++", "javac", "java", "go", "php", "python3", "Rscript", "node", "ts-node",
            "tsc",
        ] {
            let entry = config.get(tool).unwrap_or_else(|| panic!("missing {tool}"));
            assert!(!entry.candidates.is_empty());
            assert!(!entry.hint.is_empty());
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_tool_missing() {
        let err = resolve("not-a-configured-tool").await.unwrap_err();
        assert!(matches!(err, ExecError::ToolMissing { .. }));
    }

    #[tokio::test]
    async fn probe_rejects_missing_binary() {
        assert!(!probe("definitely-not-a-real-binary", &["--version".to_string()]).await);
    }
}
