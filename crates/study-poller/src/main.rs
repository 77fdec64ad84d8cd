use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use study_poller::{Cli, Poller, PollerConfig, ProlificClient, SystemDesktop};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = PollerConfig::from_cli(&cli)?;

    tracing::info!("Starting study poller");
    tracing::info!("Logging listings to {}", config.log_file.display());
    if let Some(participant_id) = &config.participant_id {
        tracing::info!("Reservations enabled for participant {}", participant_id);
    }

    let client = ProlificClient::new(&config)?;
    let mut poller = Poller::new(client, SystemDesktop, &config);

    if cli.once {
        let found = poller.run_cycle().await;
        return Ok(if found {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    tokio::select! {
        _ = poller.run() => {}
        result = signal::ctrl_c() => {
            result?;
            tracing::info!("Shutdown signal received, stopping...");
        }
    }

    tracing::info!("Study poller stopped");
    Ok(ExitCode::SUCCESS)
}
