//! Reconnecting WebSocket transport.
//!
//! Owns the single full-duplex connection to the monitor backend. Inbound
//! frames are normalized and fanned out through the [`Dispatcher`]; the
//! connection lifecycle itself is surfaced as `connection` and `error`
//! events on the same dispatcher.
//!
//! Reconnect policy: after an abnormal close, the n-th attempt is scheduled
//! `n * base_delay` later (linear backoff), up to `reconnect_attempts`
//! attempts. An explicit [`SocketClient::disconnect`] marks the close as
//! intentional so the close path stays terminal. A later explicit
//! [`SocketClient::connect`] clears the intent and, on success, resets the
//! attempt counter.
//!
//! Nothing here returns an error to the caller: credential failures skip the
//! connect, dial and transport failures become dispatched `error` events,
//! malformed frames are dropped and logged.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use cradle_auth::CredentialProvider;
use cradle_core::{
    reconnect_delay, CanonicalEvent, ConnectionStatus, NormalizedMessage, RealtimeEvent,
};
use cradle_settings::SocketSettings;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::normalize::normalize;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport configuration.
#[derive(Clone, Debug)]
pub struct SocketConfig {
    /// WebSocket endpoint; user id and token are appended at connect.
    pub url: String,
    /// Maximum automatic reconnect attempts after an abnormal close.
    pub reconnect_attempts: u32,
    /// Base delay of the linear reconnect backoff in milliseconds.
    pub reconnect_base_delay_ms: u64,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self::from(&SocketSettings::default())
    }
}

impl From<&SocketSettings> for SocketConfig {
    fn from(settings: &SocketSettings) -> Self {
        Self {
            url: settings.url.clone(),
            reconnect_attempts: settings.reconnect_attempts,
            reconnect_base_delay_ms: settings.reconnect_base_delay_ms,
        }
    }
}

/// Lifecycle of the single transport handle.
enum Link {
    /// No live handle.
    Down,
    /// A connect is in flight.
    Dialing,
    /// A live open handle exists; cancelling the token tears it down.
    Up { cancel: CancellationToken },
}

struct Inner {
    config: SocketConfig,
    credentials: Arc<dyn CredentialProvider>,
    dispatcher: Arc<Dispatcher>,
    link: Mutex<Link>,
    attempts: AtomicU32,
    intentional: AtomicBool,
}

/// Reconnecting WebSocket client.
///
/// Cheap to clone; all clones share the same connection state.
#[derive(Clone)]
pub struct SocketClient {
    inner: Arc<Inner>,
}

impl SocketClient {
    /// Create a client. No connection is attempted until [`connect`].
    ///
    /// [`connect`]: SocketClient::connect
    #[must_use]
    pub fn new(
        config: SocketConfig,
        credentials: Arc<dyn CredentialProvider>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                credentials,
                dispatcher,
                link: Mutex::new(Link::Down),
                attempts: AtomicU32::new(0),
                intentional: AtomicBool::new(false),
            }),
        }
    }

    /// Open the connection.
    ///
    /// No-op if a connection already exists or is being dialed. Skips
    /// silently (logged) when no credential is available. Never returns an
    /// error: failures surface as dispatched `error` events.
    ///
    /// A successful explicit connect resets the reconnect-attempt counter;
    /// scheduled reconnects do not, so a flapping link exhausts its budget.
    pub async fn connect(&self) {
        self.inner.intentional.store(false, Ordering::SeqCst);
        self.establish(true).await;
    }

    /// Close the connection and suppress reconnection.
    ///
    /// The close handler still emits the `disconnected` event, but treats
    /// this close as terminal rather than transient.
    pub fn disconnect(&self) {
        self.inner.intentional.store(true, Ordering::SeqCst);
        let previous = std::mem::replace(&mut *self.inner.link.lock(), Link::Down);
        if let Link::Up { cancel } = previous {
            debug!("websocket disconnect requested");
            cancel.cancel();
        }
    }

    /// Whether a live open handle exists.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(*self.inner.link.lock(), Link::Up { .. })
    }

    /// Reconnect attempts consumed since the last successful connect.
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    /// Dial and, on success, install the handle and spawn the read task.
    ///
    /// `reset_attempts` distinguishes an explicit connect (which zeroes the
    /// attempt counter on success, before the read task can observe a close)
    /// from a scheduled reconnect (which must keep accumulating attempts so a
    /// flapping link still exhausts its budget).
    async fn establish(&self, reset_attempts: bool) {
        {
            let mut link = self.inner.link.lock();
            match *link {
                Link::Down => *link = Link::Dialing,
                Link::Dialing | Link::Up { .. } => return,
            }
        }

        let credentials = &self.inner.credentials;
        let (token, user) = match (credentials.token().await, credentials.current_user().await) {
            (Ok(token), Ok(user)) => (token, user),
            (Err(e), _) | (_, Err(e)) => {
                debug!(error = %e, "no credential available, skipping connect");
                *self.inner.link.lock() = Link::Down;
                return;
            }
        };

        let url = format!(
            "{}/{}?token={token}",
            self.inner.config.url.trim_end_matches('/'),
            user.id
        );

        match connect_async(url.as_str()).await {
            Ok((stream, _response)) => {
                // A disconnect() issued while the dial was in flight wins.
                if self.inner.intentional.load(Ordering::SeqCst) {
                    debug!("connect cancelled during dial");
                    *self.inner.link.lock() = Link::Down;
                    return;
                }
                if reset_attempts {
                    self.inner.attempts.store(0, Ordering::SeqCst);
                }
                let cancel = CancellationToken::new();
                *self.inner.link.lock() = Link::Up {
                    cancel: cancel.clone(),
                };
                info!(user_id = user.id, "websocket connected");
                self.emit_connection(ConnectionStatus::Connected);

                let client = self.clone();
                let _ = tokio::spawn(async move {
                    client.read_loop(stream, cancel).await;
                });
            }
            Err(e) => {
                warn!(error = %e, "websocket dial failed");
                *self.inner.link.lock() = Link::Down;
                self.emit_error(format!("connection failed: {e}"));
                self.schedule_reconnect();
            }
        }
    }

    /// Single read task owning the stream for one connection's lifetime.
    async fn read_loop(self, mut stream: WsStream, cancel: CancellationToken) {
        let cancelled = loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    let _ = stream.close(None).await;
                    break true;
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_frame(&text),
                    Some(Ok(Message::Close(_))) | None => break false,
                    Some(Ok(_)) => {} // binary/ping/pong frames carry no events
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket transport error");
                        self.emit_error(e.to_string());
                    }
                }
            }
        };

        *self.inner.link.lock() = Link::Down;
        info!("websocket disconnected");
        self.emit_connection(ConnectionStatus::Disconnected);

        if !cancelled && !self.inner.intentional.load(Ordering::SeqCst) {
            self.schedule_reconnect();
        }
    }

    /// Parse, normalize, and fan out one inbound text frame.
    ///
    /// Malformed frames are dropped here; they never reach subscribers.
    fn handle_frame(&self, raw: &str) {
        match normalize(raw) {
            Ok(message) => self.dispatch_message(message),
            Err(e) => warn!(error = %e, "dropping malformed frame"),
        }
    }

    /// Emit under the canonical name, then re-broadcast on the generic
    /// `health_update` channel so generic listeners never miss an update.
    fn dispatch_message(&self, message: NormalizedMessage) {
        let rebroadcast = message.event != CanonicalEvent::HealthUpdate;
        let name = message.event.as_str().to_owned();
        let payload = RealtimeEvent::Message(message);
        self.inner.dispatcher.emit(&name, &payload);
        if rebroadcast {
            self.inner
                .dispatcher
                .emit(CanonicalEvent::HealthUpdate.as_str(), &payload);
        }
    }

    fn schedule_reconnect(&self) {
        if self.inner.intentional.load(Ordering::SeqCst) {
            return;
        }
        let attempt = self.inner.attempts.load(Ordering::SeqCst) + 1;
        if attempt > self.inner.config.reconnect_attempts {
            warn!(
                attempts = self.inner.config.reconnect_attempts,
                "reconnect attempts exhausted, staying disconnected"
            );
            return;
        }
        self.inner.attempts.store(attempt, Ordering::SeqCst);

        let delay = reconnect_delay(attempt, self.inner.config.reconnect_base_delay_ms);
        debug!(
            attempt,
            delay_ms = u64::from(attempt) * self.inner.config.reconnect_base_delay_ms,
            "scheduling reconnect"
        );

        let client = self.clone();
        let _ = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if client.inner.intentional.load(Ordering::SeqCst) {
                return;
            }
            client.establish(false).await;
        });
    }

    fn emit_connection(&self, status: ConnectionStatus) {
        let payload = RealtimeEvent::Connection { status };
        self.inner
            .dispatcher
            .emit(CanonicalEvent::Connection.as_str(), &payload);
    }

    fn emit_error(&self, message: String) {
        let payload = RealtimeEvent::Error { message };
        self.inner
            .dispatcher
            .emit(CanonicalEvent::Error.as_str(), &payload);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
