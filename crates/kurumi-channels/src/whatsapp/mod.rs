//! WhatsApp connection: pure Rust implementation via `whatsapp-rust`.
//!
//! Uses the WhatsApp Web protocol (Noise handshake + Signal encryption).
//! Pairing is done by scanning the QR code printed to the terminal.
//! Session is persisted to `{data_dir}/session/whatsapp.db`.

mod bot;
mod connection;
mod events;
mod qr;
mod send;
mod sent;
mod state;

#[cfg(test)]
mod tests;

pub use qr::generate_qr_terminal;
pub use state::ConnectionState;

use kurumi_core::config::BotConfig;
use kurumi_core::message::InboundEvent;
use sent::SentIds;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

/// WhatsApp session owned by the bot process.
pub struct WhatsAppConnection {
    pub(super) device_name: String,
    pub(super) session_dir: PathBuf,
    /// Client handle for sending messages: set once the bot is built.
    pub(super) client: Arc<Mutex<Option<Arc<whatsapp_rust::client::Client>>>>,
    /// Recent message IDs we sent: used to ignore our own echo.
    pub(super) sent_ids: Arc<Mutex<SentIds>>,
    /// Event sender: stored so `reconnect()` can reuse it.
    pub(super) event_tx: Arc<Mutex<Option<mpsc::Sender<InboundEvent>>>>,
    pub(super) state_tx: Arc<watch::Sender<ConnectionState>>,
    /// Background task driving the current bot.
    pub(super) run_handle: Mutex<Option<JoinHandle<()>>>,
}

impl WhatsAppConnection {
    /// Create a connection from the bot config. Nothing connects until `start()`.
    pub fn new(config: &BotConfig) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Connecting);
        Self {
            device_name: config.name.clone(),
            session_dir: config.session_dir(),
            client: Arc::new(Mutex::new(None)),
            sent_ids: Arc::new(Mutex::new(SentIds::default())),
            event_tx: Arc::new(Mutex::new(None)),
            state_tx: Arc::new(state_tx),
            run_handle: Mutex::new(None),
        }
    }

    /// Subscribe to lifecycle state changes.
    pub fn states(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state_tx.borrow().clone()
    }

    /// Check if the WhatsApp client is currently connected.
    pub fn is_connected(&self) -> bool {
        matches!(self.state(), ConnectionState::Open)
    }

    /// Get the session database path, creating its directory.
    pub(super) fn session_db_path(&self) -> Result<String, std::io::Error> {
        std::fs::create_dir_all(&self.session_dir)?;
        Ok(self
            .session_dir
            .join("whatsapp.db")
            .to_string_lossy()
            .into_owned())
    }
}
