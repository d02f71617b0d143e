//! support-case - opens, inspects and resolves an AWS Support test case
//!
//! # Configuration
//!
//! Credentials come from the standard AWS chain. Set `AWS_PROFILE` (or use a
//! `.env` file) to pick a profile.
//!
//! # Usage
//!
//! ```bash
//! AWS_PROFILE=dev ./support-case
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use support_case::config::{AwsConfigProvider, Config};
use support_case::support_client::SupportClient;
use support_case::workflow::{SupportCaseWorkflow, WorkflowSettings};

/// Any error is returned from `main`, which prints its context chain once
/// on stderr and exits with a non-zero status.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the service listing and case dumps
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("support_case=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting support-case v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;
    let provider = AwsConfigProvider::new(config);

    let client = SupportClient::connect(&provider)
        .await
        .context("Failed to create Support client")?;

    let workflow = SupportCaseWorkflow::new(client, WorkflowSettings::default());

    let outcome = workflow
        .run(&mut std::io::stdout())
        .await
        .context("Support case workflow failed")?;

    tracing::info!(
        case_id = %outcome.case_id,
        service_code = %outcome.service.code,
        "Support case opened and resolved"
    );

    Ok(())
}
