//! Replay session driving one provider from protocol requests
//!
//! Requests are processed strictly in arrival order; each one is
//! fully applied before the next is read.

use anyhow::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::hotkey::ModifierMatch;
use crate::provider::{HotkeyHandle, HotkeysProvider};

use super::listener::ListenerEvent;
use super::protocol::{self, ProviderStatus, Request, Response};

/// Owns a provider and answers replay requests
pub struct Session {
    provider: HotkeysProvider,
    /// Modifier policy for registrations that leave `modifier_match` unset
    default_modifier_match: ModifierMatch,
}

impl Session {
    pub fn new(provider: HotkeysProvider, default_modifier_match: ModifierMatch) -> Self {
        Self {
            provider,
            default_modifier_match,
        }
    }

    pub fn provider(&self) -> &HotkeysProvider {
        &self.provider
    }

    /// Run until the listener closes, writing one JSON line per response
    pub async fn run<W>(&mut self, mut event_rx: mpsc::Receiver<ListenerEvent>, mut out: W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        info!("replay session started");

        while let Some(event) = event_rx.recv().await {
            let responses = match event {
                ListenerEvent::Request(request) => self.process(request),
                ListenerEvent::Malformed(err) => vec![Response::from(&err)],
            };

            for response in &responses {
                let mut line = protocol::encode_response(response)?;
                line.push('\n');
                out.write_all(line.as_bytes()).await?;
            }
            out.flush().await?;
        }

        info!("replay session stopped");
        Ok(())
    }

    /// Apply one request and return its responses
    pub fn process(&mut self, request: Request) -> Vec<Response> {
        debug!(?request, "processing request");

        match request {
            Request::Ping => vec![Response::Pong],

            Request::Key { event } => {
                let fired = self.provider.handle_event(&event);
                let count = fired.len();
                let mut responses: Vec<Response> = fired.into_iter().map(Response::Triggered).collect();
                responses.push(Response::Handled { count });
                responses
            }

            Request::Register { keys, options } => {
                let options = options.resolve(self.default_modifier_match);
                let handle = self.provider.register(
                    &keys,
                    |event, hotkey| debug!(key = %event.key, %hotkey, "replay callback"),
                    options,
                );
                vec![Response::Registered { id: handle.id() }]
            }

            Request::Update { id, keys, options } => {
                let options = options.resolve(self.default_modifier_match);
                let changed = self.provider.update(HotkeyHandle::from(id), &keys, options);
                vec![Response::Ack { changed }]
            }

            Request::Unregister { id } => {
                let changed = self.provider.unregister(HotkeyHandle::from(id));
                vec![Response::Ack { changed }]
            }

            Request::ActivateScope { scope } => {
                self.provider.activate_scope(&scope);
                vec![self.scopes()]
            }

            Request::DeactivateScope { scope } => {
                self.provider.deactivate_scope(&scope);
                vec![self.scopes()]
            }

            Request::ToggleScope { scope } => {
                self.provider.toggle_scope(&scope);
                vec![self.scopes()]
            }

            Request::Status => vec![Response::Status(self.status())],
        }
    }

    /// Snapshot of the provider's observable state
    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            active_scopes: self.provider.active_scopes().to_vec(),
            hotkeys: self.provider.hotkeys().into_iter().cloned().collect(),
            pressed: self.provider.pressed_keys().to_vec(),
        }
    }

    fn scopes(&self) -> Response {
        Response::Scopes {
            active: self.provider.active_scopes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::{KeyboardEvent, Platform};
    use crate::ipc::protocol::decode_request;
    use crate::provider::ProviderConfig;
    use crate::registry::HotkeyId;

    fn create_session() -> Session {
        let provider = HotkeysProvider::new(ProviderConfig {
            initial_scopes: Vec::new(),
            platform: Platform::Other,
        });
        Session::new(provider, ModifierMatch::Exact)
    }

    fn request(json: &str) -> Request {
        decode_request(json).unwrap()
    }

    #[test]
    fn test_register_and_trigger() {
        let mut session = create_session();

        let responses = session.process(request(r#"{"type":"register","keys":"mod+s"}"#));
        assert!(matches!(responses[..], [Response::Registered { id: HotkeyId(0) }]));

        let responses = session.process(Request::Key {
            event: KeyboardEvent::down("s").with_ctrl(),
        });
        assert_eq!(responses.len(), 2);
        assert!(matches!(&responses[0], Response::Triggered(t) if t.id == HotkeyId(0)));
        assert!(matches!(responses[1], Response::Handled { count: 1 }));
    }

    #[test]
    fn test_scope_requests() {
        let mut session = create_session();
        session.process(request(
            r#"{"type":"register","keys":"a","options":{"scopes":["foo"]}}"#,
        ));
        assert!(session.status().hotkeys.is_empty());

        let responses = session.process(request(r#"{"type":"activate_scope","scope":"foo"}"#));
        assert!(matches!(&responses[..], [Response::Scopes { active }] if active == &["foo"]));
        assert_eq!(session.status().hotkeys.len(), 1);

        let responses = session.process(request(r#"{"type":"toggle_scope","scope":"foo"}"#));
        assert!(matches!(&responses[..], [Response::Scopes { active }] if active == &["*"]));
        assert!(session.status().hotkeys.is_empty());
    }

    #[test]
    fn test_unregister_ack() {
        let mut session = create_session();
        session.process(request(r#"{"type":"register","keys":"a"}"#));

        let first = session.process(request(r#"{"type":"unregister","id":0}"#));
        let second = session.process(request(r#"{"type":"unregister","id":0}"#));
        assert!(matches!(first[..], [Response::Ack { changed: true }]));
        assert!(matches!(second[..], [Response::Ack { changed: false }]));
    }

    #[test]
    fn test_default_modifier_policy_applies() {
        let provider = HotkeysProvider::new(ProviderConfig::default());
        let mut session = Session::new(provider, ModifierMatch::Ignore);
        session.process(request(r#"{"type":"register","keys":"a"}"#));

        let responses = session.process(Request::Key {
            event: KeyboardEvent::down("a").with_ctrl(),
        });
        assert!(matches!(responses.last(), Some(Response::Handled { count: 1 })));
    }

    #[test]
    fn test_default_modifier_policy_with_partial_options() {
        let provider = HotkeysProvider::new(ProviderConfig::default());
        let mut session = Session::new(provider, ModifierMatch::Ignore);
        session.process(request(
            r#"{"type":"register","keys":"a","options":{"description":"x"}}"#,
        ));

        let responses = session.process(Request::Key {
            event: KeyboardEvent::down("a").with_ctrl(),
        });
        assert!(matches!(responses.last(), Some(Response::Handled { count: 1 })));
        assert_eq!(session.status().hotkeys[0].description.as_deref(), Some("x"));
    }

    #[test]
    fn test_explicit_modifier_policy_overrides_default() {
        let provider = HotkeysProvider::new(ProviderConfig::default());
        let mut session = Session::new(provider, ModifierMatch::Ignore);
        session.process(request(
            r#"{"type":"register","keys":"a","options":{"modifier_match":"exact"}}"#,
        ));

        let responses = session.process(Request::Key {
            event: KeyboardEvent::down("a").with_ctrl(),
        });
        assert!(matches!(responses[..], [Response::Handled { count: 0 }]));
    }

    #[test]
    fn test_update_applies_default_policy() {
        let provider = HotkeysProvider::new(ProviderConfig::default());
        let mut session = Session::new(provider, ModifierMatch::Ignore);
        session.process(request(r#"{"type":"register","keys":"a"}"#));
        let responses = session.process(request(
            r#"{"type":"update","id":0,"keys":"b","options":{"enabled":true}}"#,
        ));
        assert!(matches!(responses[..], [Response::Ack { changed: true }]));

        let responses = session.process(Request::Key {
            event: KeyboardEvent::down("b").with_shift(),
        });
        assert!(matches!(responses.last(), Some(Response::Handled { count: 1 })));
    }

    #[test]
    fn test_run_writes_lines() {
        let mut session = create_session();
        let (tx, rx) = mpsc::channel(8);
        let mut out: Vec<u8> = Vec::new();

        tokio_test::block_on(async {
            tx.send(ListenerEvent::Request(Request::Ping)).await.unwrap();
            tx.send(ListenerEvent::Malformed(decode_request("nope").unwrap_err()))
                .await
                .unwrap();
            tx.send(ListenerEvent::Request(Request::Status)).await.unwrap();
            drop(tx);

            session.run(rx, &mut out).await.unwrap();
        });

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"type":"pong"}"#);
        assert!(lines[1].contains("malformed_request"));
        assert!(lines[2].starts_with(r#"{"type":"status","active_scopes":["*"]"#));
    }
}
