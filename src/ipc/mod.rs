//! IPC module: JSON-line replay protocol for driving a provider
//!
//! The binary reads requests from stdin and writes responses to
//! stdout, so a provider can be exercised from scripts and tests.

mod listener;
pub mod protocol;
mod session;

pub use listener::{LineListener, ListenerError, ListenerEvent};
pub use protocol::{ProtocolError, ProviderStatus, Request, RequestOptions, Response};
pub use session::Session;
