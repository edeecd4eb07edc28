//! In-game side of the relay: a reconnecting WebSocket subscriber that turns
//! broadcasts into [`XpGrant`]s.

use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::validation::XpBroadcast;
use crate::config::RelayConfig;
use crate::core::events::XpGrant;

const GRANT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Connection bookkeeping, independent of the transport.
///
/// At most one connection attempt and one pending reconnect exist at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectState {
    state: ConnectionState,
    reconnect_pending: bool,
    delay: Duration,
}

impl ReconnectState {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_pending: false,
            delay,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns false when an attempt is in flight or already connected.
    pub fn begin_connect(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    pub fn on_open(&mut self) {
        self.state = ConnectionState::Connected;
        self.reconnect_pending = false;
    }

    /// Connection lost or attempt failed. Returns true if a reconnect timer
    /// should be started; false if one is already pending.
    pub fn on_close(&mut self) -> bool {
        self.state = ConnectionState::Disconnected;
        if self.reconnect_pending {
            return false;
        }
        self.reconnect_pending = true;
        true
    }

    /// The reconnect timer elapsed.
    pub fn timer_fired(&mut self) {
        self.reconnect_pending = false;
    }

    /// Explicit shutdown: no reconnect follows.
    pub fn disconnect(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.reconnect_pending = false;
    }
}

/// Decodes one broadcast frame.
pub fn decode_broadcast(text: &str) -> Result<XpGrant, serde_json::Error> {
    let msg: XpBroadcast = serde_json::from_str(text)?;
    Ok(msg.to_grant())
}

/// Subscriber that forwards grants until the receiving side is dropped.
pub struct RelayClient {
    url: String,
    reconnect: ReconnectState,
    grants: mpsc::Sender<XpGrant>,
}

impl RelayClient {
    pub fn new(config: &RelayConfig, grants: mpsc::Sender<XpGrant>) -> Self {
        Self {
            url: config.server_url.clone(),
            reconnect: ReconnectState::new(Duration::from_millis(config.reconnect_delay_ms)),
            grants,
        }
    }

    /// Spawns a client on the current runtime and returns the grant stream.
    pub fn spawn(config: &RelayConfig) -> (mpsc::Receiver<XpGrant>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(GRANT_CHANNEL_CAPACITY);
        let client = Self::new(config, tx);
        (rx, tokio::spawn(client.run()))
    }

    pub async fn run(mut self) {
        loop {
            if self.grants.is_closed() {
                self.reconnect.disconnect();
                return;
            }
            if self.reconnect.begin_connect() {
                self.connect_once().await;
            }
            if self.reconnect.on_close() {
                debug!(delay_ms = self.reconnect.delay().as_millis() as u64, "reconnect scheduled");
                tokio::select! {
                    _ = tokio::time::sleep(self.reconnect.delay()) => {}
                    _ = self.grants.closed() => {}
                }
                self.reconnect.timer_fired();
            }
        }
    }

    async fn connect_once(&mut self) {
        let mut ws_stream = match tokio_tungstenite::connect_async(self.url.as_str()).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(e) => {
                warn!(url = %self.url, error = %e, "xp relay not available");
                return;
            }
        };
        self.reconnect.on_open();
        info!(url = %self.url, "connected to xp relay");

        loop {
            let msg = tokio::select! {
                msg = ws_stream.next() => msg,
                _ = self.grants.closed() => {
                    debug!("grant receiver dropped");
                    let _ = ws_stream.close(None).await;
                    return;
                }
            };
            match msg {
                Some(Ok(Message::Text(text))) => match decode_broadcast(&text) {
                    Ok(grant) => {
                        debug!(amount = grant.xp_amount, source = %grant.source_label, "xp event");
                        if self.grants.send(grant).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to parse xp event"),
                },
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
        info!("disconnected from xp relay");
    }
}
