//! Wallet Session Adapter - Channel-Backed Session State
//!
//! Implements the `WalletSession` port over a `tokio::sync::watch` channel.
//! The embedding application (or the CLI) holds the sender and pushes a new
//! `SessionState` whenever the wallet connects, disconnects, or switches
//! chains; the client reads the latest value before every operation, which
//! is what keeps profile resolution tied to the live chain id.
//!
//! Connect prompts and chain-switch requests cannot be served by a headless
//! adapter, so they are recorded for the embedder to drain and act on.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::ports::wallet::{SessionState, WalletSession};

/// A provider action the client asked for but this adapter cannot perform
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    /// Open the wallet connect prompt.
    Connect,
    /// Switch the session to this chain id.
    SwitchChain(u64),
}

/// `WalletSession` fed by a watch channel.
pub struct WatchSession {
    state: watch::Receiver<SessionState>,
    requests: Mutex<Vec<SessionRequest>>,
}

impl WatchSession {
    /// Create a session with its controlling sender.
    pub fn channel(initial: SessionState) -> (watch::Sender<SessionState>, Self) {
        let (tx, rx) = watch::channel(initial);
        (
            tx,
            Self {
                state: rx,
                requests: Mutex::new(Vec::new()),
            },
        )
    }

    /// Drain the provider actions requested since the last call.
    pub fn take_requests(&self) -> Vec<SessionRequest> {
        std::mem::take(&mut *self.requests.lock().expect("requests lock poisoned"))
    }
}

#[async_trait]
impl WalletSession for WatchSession {
    fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    async fn prompt_connect(&self) {
        info!("Connect prompt requested");
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(SessionRequest::Connect);
    }

    async fn request_chain_switch(&self, chain_id: u64) {
        info!(chain_id, "Chain switch requested");
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(SessionRequest::SwitchChain(chain_id));
    }
}
