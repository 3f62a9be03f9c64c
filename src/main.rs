use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use classifica::leaderboard::Leaderboard;
use classifica::service::{api, logging, Ingestor, ServiceArgs, ServiceError};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment and flags still apply.
    dotenvy::dotenv().ok();

    let args = ServiceArgs::parse();
    if let Err(e) = logging::try_init(args.log_format) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "classifica stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ServiceArgs) -> Result<(), ServiceError> {
    let config = args.validate()?;
    info!(
        base_uri = %config.base_uri,
        bearer_token = %config.redacted_token(),
        podium_size = config.podium_size,
        lock_timeout_ms = config.lock_timeout.as_millis() as u64,
        "starting classifica"
    );

    let board = Arc::new(
        Leaderboard::new(config.podium_size)?.with_lock_timeout(config.lock_timeout),
    );
    let cancel = CancellationToken::new();

    let ingestor = Ingestor::new(&config, board.clone());
    let ingest_cancel = cancel.clone();
    let ingest = tokio::spawn(async move {
        let result = ingestor.run(ingest_cancel.clone()).await;
        if let Err(ref e) = result {
            error!(error = %e, "ingestor failed, shutting down");
            ingest_cancel.cancel();
        }
        result
    });

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, shutting down");
                ctrl_c_cancel.cancel();
            }
            Err(e) => error!(error = %e, "unable to listen for Ctrl-C"),
        }
    });

    let listener = TcpListener::bind(config.bind).await?;
    api::serve(listener, api::router(board), cancel.clone()).await?;

    // The server only stops once the token fires; make sure the ingestor sees it too.
    cancel.cancel();
    ingest.await??;
    Ok(())
}
