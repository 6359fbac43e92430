//! Line listener feeding replay requests into the session
//!
//! Reads newline-delimited JSON from a blocking reader (stdin in the
//! binary). Runs on a dedicated thread so the async side never blocks.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::protocol::{self, ProtocolError, Request};

/// Messages sent from the listener to the session
#[derive(Debug)]
pub enum ListenerEvent {
    /// A well-formed request line
    Request(Request),
    /// A line that failed to decode
    Malformed(ProtocolError),
}

/// Listener that turns input lines into [`ListenerEvent`]s
pub struct LineListener {
    event_tx: mpsc::Sender<ListenerEvent>,
    running: Arc<AtomicBool>,
}

impl LineListener {
    /// Create a new line listener
    pub fn new(event_tx: mpsc::Sender<ListenerEvent>) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading from `reader` on a dedicated thread
    ///
    /// The thread exits at end of input, when `stop()` is called, or
    /// when the session drops its receiver.
    pub fn start<R>(&self, reader: R) -> Result<(), ListenerError>
    where
        R: BufRead + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ListenerError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("line-listener".to_string())
            .spawn(move || {
                info!("line listener thread started");
                read_lines(reader, &event_tx, &running);
                running.store(false, Ordering::SeqCst);
                info!("line listener thread stopped");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                ListenerError::ThreadSpawn(e.to_string())
            })?;

        Ok(())
    }

    /// Ask the listener to stop after the current line
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the listener is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur starting the listener
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("line listener is already running")]
    AlreadyRunning,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),
}

fn read_lines<R: BufRead>(reader: R, event_tx: &mpsc::Sender<ListenerEvent>, running: &AtomicBool) {
    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(?e, "failed to read input line");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let event = match protocol::decode_request(&line) {
            Ok(request) => {
                debug!(?request, "request decoded");
                ListenerEvent::Request(request)
            }
            Err(e) => {
                warn!(%e, "malformed input line");
                ListenerEvent::Malformed(e)
            }
        };

        // Not in an async context, so block until the session has room
        if event_tx.blocking_send(event).is_err() {
            warn!("failed to forward request - session closed?");
            break;
        }
    }
}
