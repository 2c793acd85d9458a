mod metrics;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teller_core::{
    load_config, validate_config, Dispatcher, HeapScheduler, LoggingProcessor, MemoryQueue,
    MessageQueue, Processor, Scheduler,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = VERSION, "Starting tellerd");

    // Determine config path
    let config_path = std::env::var("TELLER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!(
        workers = config.dispatcher.worker_count,
        backoff_ms = config.dispatcher.backoff_ms,
        "Configuration loaded successfully"
    );

    // Wire up the pipeline: queue -> intake -> scheduler -> workers
    let queue = Arc::new(MemoryQueue::new(config.queue.buffer));
    let scheduler: Arc<dyn Scheduler> = Arc::new(HeapScheduler::new(config.scheduler.max_pending));
    let processor: Arc<dyn Processor> = Arc::new(LoggingProcessor);

    let dispatcher = Dispatcher::new(
        config.dispatcher.clone(),
        Arc::clone(&queue) as Arc<dyn MessageQueue>,
        scheduler,
        processor,
    );

    dispatcher.start().await;
    info!("Dispatcher started");

    // Feed transactions from stdin, one JSON object per line.
    let feeder = spawn_stdin_feeder(Arc::clone(&queue));

    // Run until shutdown signal
    shutdown_signal().await;

    info!("Shutting down...");
    dispatcher.stop().await;
    feeder.abort();

    let status = dispatcher.status();
    info!(pending = status.pending, "Dispatcher stopped");
    info!("Final metrics:\n{}", metrics::render());

    Ok(())
}

/// Read JSON lines from stdin and publish them onto the queue.
fn spawn_stdin_feeder(queue: Arc<MemoryQueue>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Err(e) = queue.publish(line.into_bytes()).await {
                        error!("Failed to publish message: {}", e);
                        break;
                    }
                }
                Ok(None) => {
                    info!("Stdin closed, feeder stopping");
                    break;
                }
                Err(e) => {
                    error!("Stdin read error: {}", e);
                    break;
                }
            }
        }
    })
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
