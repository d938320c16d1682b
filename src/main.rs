use std::io::Read;

use anyhow::{Context, Result};
use tracing::info;

use polyrun::{Engine, ExecutionRequest};

/// Reads one JSON `ExecutionRequest` (from a file path argument, or from
/// stdin when none is given), executes it, and writes the JSON
/// `ExecutionResult` to stdout.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyrun=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let request: ExecutionRequest = match std::env::args().nth(1) {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read request file {path}"))?;
            serde_json::from_str(&content).context("Failed to parse execution request")?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read request from stdin")?;
            serde_json::from_str(&buffer).context("Failed to parse execution request")?
        }
    };

    info!(
        language = %request.language,
        inputs = request.inputs.len(),
        "processing execution request"
    );

    let engine = Engine::new();
    let result = engine.execute(&request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
