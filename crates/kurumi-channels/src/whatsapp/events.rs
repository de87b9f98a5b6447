//! Incoming WhatsApp message handling: unwrapping, translation, and forwarding.

use super::sent::SentIds;
use kurumi_core::message::{
    ImageContent, InboundEvent, InboundMessage, MediaRef, MessageContent, MessageKey,
    VideoContent,
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};
use waproto::whatsapp::Message;

/// Translate and forward one live WhatsApp message.
pub(super) async fn handle_whatsapp_message(
    msg: Message,
    info: wacore::types::message::MessageInfo,
    tx: &mpsc::Sender<InboundEvent>,
    sent_ids: &Arc<Mutex<SentIds>>,
) {
    if sent_ids.lock().await.remove(&info.id) {
        debug!("skipping own echo: {}", info.id);
        return;
    }

    let participant = if info.source.is_group {
        Some(info.source.sender.to_string())
    } else {
        None
    };

    let inbound = InboundMessage {
        key: MessageKey {
            remote_jid: info.source.chat.to_string(),
            id: info.id.clone(),
            from_me: info.source.is_from_me,
            participant,
        },
        push_name: info.push_name.clone(),
        content: translate(unwrap_inner(&msg)),
    };

    if tx.send(InboundEvent::notify(inbound)).await.is_err() {
        info!("whatsapp event receiver dropped");
    }
}

/// Unwrap nested wrappers (device_sent, ephemeral, view_once).
pub(super) fn unwrap_inner(msg: &Message) -> &Message {
    msg.device_sent_message
        .as_ref()
        .and_then(|d| d.message.as_deref())
        .or_else(|| {
            msg.ephemeral_message
                .as_ref()
                .and_then(|e| e.message.as_deref())
        })
        .or_else(|| {
            msg.view_once_message
                .as_ref()
                .and_then(|v| v.message.as_deref())
        })
        .unwrap_or(msg)
}

/// Map a protocol message onto the payload kinds the router understands.
///
/// Shapes are checked in a fixed order; the first present one wins.
pub(super) fn translate(inner: &Message) -> Option<MessageContent> {
    if let Some(text) = inner.conversation.as_ref().filter(|t| !t.is_empty()) {
        return Some(MessageContent::Conversation(text.clone()));
    }

    if let Some(ext) = inner.extended_text_message.as_ref() {
        let quoted = ext
            .context_info
            .as_ref()
            .and_then(|ci| ci.quoted_message.as_ref())
            .and_then(|q| translate(q))
            .map(Box::new);
        return Some(MessageContent::ExtendedText {
            text: ext.text.clone().unwrap_or_default(),
            quoted,
        });
    }

    if let Some(img) = inner.image_message.as_ref() {
        return Some(MessageContent::Image(ImageContent {
            caption: img.caption.clone(),
            media: MediaRef {
                url: img.url.clone(),
                direct_path: img.direct_path.clone(),
                media_key: img.media_key.clone(),
                file_sha256: img.file_sha256.clone(),
                file_enc_sha256: img.file_enc_sha256.clone(),
                file_length: img.file_length,
                mimetype: img.mimetype.clone(),
            },
        }));
    }

    if let Some(vid) = inner.video_message.as_ref() {
        return Some(MessageContent::Video(VideoContent {
            caption: vid.caption.clone(),
        }));
    }

    if let Some(button) = inner.buttons_response_message.as_ref() {
        return Some(MessageContent::ButtonsResponse {
            selected_button_id: button.selected_button_id.clone().unwrap_or_default(),
        });
    }

    if let Some(list) = inner.list_response_message.as_ref() {
        let row = list
            .single_select_reply
            .as_ref()
            .and_then(|r| r.selected_row_id.clone())
            .unwrap_or_default();
        return Some(MessageContent::ListResponse {
            selected_row_id: row,
        });
    }

    if *inner == Message::default() {
        return None;
    }
    Some(MessageContent::Unsupported)
}
