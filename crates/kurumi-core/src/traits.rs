use crate::{
    error::{FetchError, KurumiError},
    message::{GroupMetadata, MediaRef, OutgoingMessage, Presence},
};
use async_trait::async_trait;
use std::future::Future;
use tracing::debug;

/// Chat connection trait: everything a command may ask of the transport.
///
/// The WhatsApp session implements this; tests use a recording double.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Human-readable transport name.
    fn name(&self) -> &str;

    /// Show or clear the "typing..." indicator in a chat.
    async fn send_presence(&self, chat: &str, presence: Presence) -> Result<(), KurumiError>;

    /// Send one message to a chat.
    async fn send(&self, chat: &str, message: OutgoingMessage) -> Result<(), KurumiError>;

    /// Group subject and participants. `Ok(None)` when `chat` is not a group.
    async fn group_metadata(&self, chat: &str) -> Result<Option<GroupMetadata>, KurumiError>;

    /// Download and decrypt a media attachment.
    async fn download_media(&self, media: &MediaRef) -> Result<Vec<u8>, KurumiError>;
}

/// Raw body and content type of a successful HTTP GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// HTTP GET source used by commands.
///
/// Implementations report non-success statuses as errors; time budgets are
/// enforced by the caller (`kurumi_media::fetch::fetch_bounded`).
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<Fetched, FetchError>;
}

/// Run `body` between a composing and a paused presence update.
///
/// The paused update is sent whatever `body` returns. Presence failures are
/// cosmetic and only logged.
pub async fn with_presence<F, T>(conn: &dyn Connection, chat: &str, body: F) -> T
where
    F: Future<Output = T>,
{
    if let Err(e) = conn.send_presence(chat, Presence::Composing).await {
        debug!("presence composing failed for {chat}: {e}");
    }
    let out = body.await;
    if let Err(e) = conn.send_presence(chat, Presence::Paused).await {
        debug!("presence paused failed for {chat}: {e}");
    }
    out
}
