use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use trail_indexer::{load_event, telemetry, Dependencies, IndexingError, Settings};

#[derive(Parser)]
#[command(name = "trail-indexer")]
#[command(about = "Index audit trail archives from object-store notifications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one invocation for a notification event
    Invoke {
        /// Path to the event document, or `-` for stdin
        #[arg(long, default_value = "-")]
        event: String,

        /// Seconds to wait for in-flight deliveries before exiting
        #[arg(long)]
        drain_timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv::dotenv().ok();
    telemetry::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Invoke {
            event,
            drain_timeout_secs,
        } => invoke(&event, drain_timeout_secs).await,
    };

    if let Err(e) = &result {
        error!(error = %e, "Invocation failed");
    }
    result
}

async fn invoke(source: &str, drain_timeout_secs: Option<u64>) -> Result<(), IndexingError> {
    let settings = Settings::from_env()?;
    let dependencies = Dependencies::new(&settings).await?;
    let trigger = load_event(source).await?;

    let invocation = dependencies.orchestrator.invoke(&trigger).await;
    let invocation_id = invocation.invocation_id;
    let stages = invocation
        .stages
        .iter()
        .map(|stage| stage.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");

    match invocation.outcome.into_result() {
        Ok(message) => {
            println!("{}", message);
            info!(invocation_id = %invocation_id, stages = %stages, "Invocation completed");
        }
        Err(e) => {
            // Nothing was dispatched on a failed invocation.
            warn!(invocation_id = %invocation_id, stages = %stages, "Invocation did not complete");
            return Err(e.into());
        }
    }

    let timeout = drain_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(dependencies.drain_timeout);
    let pending = invocation.deliveries.len();
    if pending > 0 {
        info!(pending, timeout_secs = timeout.as_secs(), "Waiting for in-flight deliveries");
    }

    let summary = invocation.deliveries.drain(timeout).await;
    info!(
        invocation_id = %invocation_id,
        delivered = summary.delivered,
        rejected = summary.rejected,
        failed = summary.failed,
        abandoned = summary.abandoned,
        never_attempted = summary.never_attempted,
        "Deliveries drained"
    );

    Ok(())
}
