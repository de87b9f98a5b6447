//! Bot lifecycle: building, running, and rebuilding the WhatsApp bot.

use super::events::handle_whatsapp_message;
use super::qr::generate_qr_terminal;
use super::{ConnectionState, WhatsAppConnection};
use kurumi_core::{error::KurumiError, message::InboundEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use wacore::types::events::Event;
use whatsapp_rust::bot::Bot;
use whatsapp_rust_sqlite_storage::SqliteStore;
use whatsapp_rust_tokio_transport::TokioWebSocketTransportFactory;
use whatsapp_rust_ureq_http_client::UreqHttpClient;

impl WhatsAppConnection {
    /// Start the session and return the stream of inbound events.
    pub async fn start(&self) -> Result<mpsc::Receiver<InboundEvent>, KurumiError> {
        let (tx, rx) = mpsc::channel(64);
        *self.event_tx.lock().await = Some(tx.clone());
        self.build_and_run_bot(tx).await?;
        info!("WhatsApp connection started");
        Ok(rx)
    }

    /// Tear down the current bot and run a fresh one on the same session store.
    pub async fn reconnect(&self) -> Result<(), KurumiError> {
        let tx = self
            .event_tx
            .lock()
            .await
            .clone()
            .ok_or_else(|| KurumiError::Channel("WhatsApp not started yet".into()))?;

        if let Some(handle) = self.run_handle.lock().await.take() {
            handle.abort();
        }
        *self.client.lock().await = None;

        info!("WhatsApp reconnecting...");
        let result = self.build_and_run_bot(tx).await;
        if let Err(e) = &result {
            self.state_tx.send_replace(ConnectionState::ClosedRetryable {
                reason: e.to_string(),
            });
        }
        result
    }

    /// Stop the running bot.
    pub async fn stop(&self) {
        if let Some(handle) = self.run_handle.lock().await.take() {
            handle.abort();
        }
        *self.client.lock().await = None;
        info!("WhatsApp connection stopped");
    }

    /// Build a WhatsApp bot with the event handler and run it in the background.
    ///
    /// Shared by `start()` and `reconnect()`. The event handler updates the
    /// same `Arc`-wrapped fields regardless of which bot is running.
    async fn build_and_run_bot(&self, tx: mpsc::Sender<InboundEvent>) -> Result<(), KurumiError> {
        self.state_tx.send_replace(ConnectionState::Connecting);

        let db_path = self.session_db_path()?;
        info!("WhatsApp bot building (session: {db_path})...");

        let backend = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .map_err(|e| KurumiError::Channel(format!("whatsapp store init failed: {e}")))?,
        );

        let client_for_event = self.client.clone();
        let sent_ids_for_event = self.sent_ids.clone();
        let state_for_event = self.state_tx.clone();

        let mut bot = Bot::builder()
            .with_backend(backend)
            .with_transport_factory(TokioWebSocketTransportFactory::new())
            .with_http_client(UreqHttpClient::new())
            .with_device_props(
                Some(self.device_name.clone()),
                None,
                Some(waproto::whatsapp::device_props::PlatformType::Desktop),
            )
            .on_event(move |event, client| {
                let tx = tx.clone();
                let client_store = client_for_event.clone();
                let sent_ids = sent_ids_for_event.clone();
                let state = state_for_event.clone();
                async move {
                    match event {
                        Event::PairingQrCode { code, .. } => {
                            info!("QR available. Scan via WhatsApp > Linked devices.");
                            debug!("QR data: {code}");
                            match generate_qr_terminal(&code) {
                                Ok(qr) => println!("{qr}"),
                                Err(e) => warn!("cannot render QR: {e}"),
                            }
                        }
                        Event::PairSuccess(_) => {
                            info!("WhatsApp pairing successful!");
                        }
                        Event::Connected(_) => {
                            info!("Connected to WhatsApp");
                            *client_store.lock().await = Some(client);
                            state.send_replace(ConnectionState::Open);
                        }
                        Event::Disconnected(_) => {
                            warn!("WhatsApp disconnected");
                            *client_store.lock().await = None;
                            state.send_replace(ConnectionState::ClosedRetryable {
                                reason: "disconnected".into(),
                            });
                        }
                        Event::LoggedOut(_) => {
                            error!("WhatsApp logged out, session invalidated");
                            *client_store.lock().await = None;
                            state.send_replace(ConnectionState::ClosedTerminal {
                                reason: "logged out".into(),
                            });
                        }
                        Event::Message(msg, info) => {
                            handle_whatsapp_message(*msg, info, &tx, &sent_ids).await;
                        }
                        _ => {}
                    }
                }
            })
            .build()
            .await
            .map_err(|e| KurumiError::Channel(format!("whatsapp bot build failed: {e}")))?;

        // Store client reference immediately so sends work as soon as we connect.
        *self.client.lock().await = Some(bot.client());

        let handle = bot
            .run()
            .await
            .map_err(|e| KurumiError::Channel(format!("whatsapp bot run failed: {e}")))?;
        *self.run_handle.lock().await = Some(handle);

        info!("WhatsApp bot started");
        Ok(())
    }
}
