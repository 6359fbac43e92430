//! scoped-hotkeys: replay host for the scope-aware hotkey engine
//!
//! Reads JSON-line requests from stdin (key events, registrations,
//! scope changes) and writes JSON-line responses to stdout:
//! - A dedicated thread decodes input lines
//! - A single session owns the provider and applies requests in order
//! - Provider change notifications are logged to stderr

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use scoped_hotkeys::config::Config;
use scoped_hotkeys::ipc::{LineListener, Session};
use scoped_hotkeys::lifecycle::ShutdownSignal;
use scoped_hotkeys::{HotkeysProvider, ProviderEvent};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for responses
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "scoped-hotkeys starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(?config.initial_scopes, ?config.platform, "configuration loaded");

    let shutdown = ShutdownSignal::new();

    // Listener -> session
    let (request_tx, request_rx) = mpsc::channel(32);
    // Provider -> notification logger
    let (event_tx, _event_rx) = broadcast::channel::<ProviderEvent>(64);

    let provider = HotkeysProvider::with_events(config.provider_config(), event_tx.clone());
    let mut session = Session::new(provider, config.modifier_match);

    let listener = LineListener::new(request_tx);
    listener.start(std::io::BufReader::new(std::io::stdin()))?;
    info!("line listener started");

    let mut notifications = event_tx.subscribe();

    tokio::select! {
        // Apply requests until stdin closes
        result = session.run(request_rx, tokio::io::stdout()) => {
            if let Err(e) = result {
                error!(?e, "replay session error");
            }
        }

        // Log provider notifications
        _ = async {
            loop {
                match notifications.recv().await {
                    Ok(event) => debug!(%event, "provider event"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "notification receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        } => {
            info!("notification logger exited");
        }

        // Wait for shutdown signal
        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "failed to install signal handlers"),
            }
        }
    }

    info!("shutting down...");
    listener.stop();
    info!("scoped-hotkeys stopped");

    Ok(())
}
