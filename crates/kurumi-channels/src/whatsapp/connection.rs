//! Connection trait implementation for WhatsApp.

use super::send::{
    downloadable_image, image_message, sniff_image_mime, sticker_message, text_message,
    video_message, Uploaded,
};
use super::WhatsAppConnection;
use async_trait::async_trait;
use kurumi_core::{
    error::KurumiError,
    message::{is_group_jid, GroupMetadata, MediaRef, OutgoingMessage, Payload, Presence},
    traits::Connection,
};
use std::sync::Arc;
use tracing::debug;
use wacore_binary::jid::Jid;
use whatsapp_rust::client::Client;
use whatsapp_rust::download::MediaType;

fn parse_jid(jid_str: &str) -> Result<Jid, KurumiError> {
    jid_str
        .parse()
        .map_err(|e| KurumiError::Channel(format!("invalid whatsapp JID '{jid_str}': {e}")))
}

impl WhatsAppConnection {
    async fn connected_client(&self) -> Result<Arc<Client>, KurumiError> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or_else(|| KurumiError::Channel("whatsapp client not connected".into()))
    }

    async fn upload(
        &self,
        client: &Client,
        data: Vec<u8>,
        media_type: MediaType,
    ) -> Result<Uploaded, KurumiError> {
        let upload = client
            .upload(data, media_type)
            .await
            .map_err(|e| KurumiError::Channel(format!("whatsapp upload failed: {e}")))?;
        Ok(Uploaded {
            url: upload.url,
            direct_path: upload.direct_path,
            media_key: upload.media_key,
            file_enc_sha256: upload.file_enc_sha256,
            file_sha256: upload.file_sha256,
            file_length: upload.file_length,
        })
    }
}

#[async_trait]
impl Connection for WhatsAppConnection {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send_presence(&self, chat: &str, presence: Presence) -> Result<(), KurumiError> {
        let client = self.connected_client().await?;
        let jid = parse_jid(chat)?;
        let result = match presence {
            Presence::Composing => client.chatstate().send_composing(&jid).await,
            Presence::Paused => client.chatstate().send_paused(&jid).await,
        };
        result.map_err(|e| KurumiError::Channel(format!("whatsapp chat state failed: {e}")))
    }

    async fn send(&self, chat: &str, message: OutgoingMessage) -> Result<(), KurumiError> {
        let client = self.connected_client().await?;
        let jid = parse_jid(chat)?;
        let quoted = message.quoted.as_ref();
        let kind = message.payload.kind();

        let msg = match message.payload {
            Payload::Text { text, mentions } => text_message(&text, quoted, &mentions),
            Payload::Image { data, caption } => {
                let mime = sniff_image_mime(&data);
                let upload = self.upload(&client, data, MediaType::Image).await?;
                image_message(upload, mime, caption.as_deref(), quoted)
            }
            Payload::Sticker { data } => {
                let upload = self.upload(&client, data, MediaType::Sticker).await?;
                sticker_message(upload, quoted)
            }
            Payload::Video {
                data,
                caption,
                gif_playback,
                mentions,
            } => {
                let upload = self.upload(&client, data, MediaType::Video).await?;
                video_message(upload, caption.as_deref(), gif_playback, quoted, &mentions)
            }
        };

        let msg_id = client
            .send_message(jid, msg)
            .await
            .map_err(|e| KurumiError::Channel(format!("whatsapp send failed: {e}")))?;
        debug!("sent {kind} {msg_id} to {chat}");
        // Track sent message ID to ignore our own echo.
        self.sent_ids.lock().await.insert(msg_id);
        Ok(())
    }

    async fn group_metadata(&self, chat: &str) -> Result<Option<GroupMetadata>, KurumiError> {
        if !is_group_jid(chat) {
            return Ok(None);
        }
        let client = self.connected_client().await?;
        let jid = parse_jid(chat)?;
        let meta = client
            .groups()
            .get_metadata(&jid)
            .await
            .map_err(|e| KurumiError::Channel(format!("group metadata failed: {e}")))?;

        Ok(Some(GroupMetadata {
            id: chat.to_string(),
            subject: meta.subject.clone(),
            participants: meta
                .participants
                .iter()
                .map(|p| p.jid.to_string())
                .collect(),
        }))
    }

    async fn download_media(&self, media: &MediaRef) -> Result<Vec<u8>, KurumiError> {
        let client = self.connected_client().await?;
        let image = downloadable_image(media);
        client
            .download(&image)
            .await
            .map_err(|e| KurumiError::Channel(format!("whatsapp media download failed: {e}")))
    }
}
