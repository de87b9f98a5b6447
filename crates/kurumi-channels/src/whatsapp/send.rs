//! Outbound message encoding: payload kinds to protocol messages.

use kurumi_core::message::{MediaRef, QuotedRef};
use waproto::whatsapp::message::{
    ExtendedTextMessage, ImageMessage, StickerMessage, VideoMessage,
};
use waproto::whatsapp::{ContextInfo, Message};

/// Location and keys of an uploaded, encrypted media blob.
pub(super) struct Uploaded {
    pub url: String,
    pub direct_path: String,
    pub media_key: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
}

/// Context info carrying reply quoting and mentions, if either is present.
pub(super) fn context_info(quoted: Option<&QuotedRef>, mentions: &[String]) -> Option<ContextInfo> {
    if quoted.is_none() && mentions.is_empty() {
        return None;
    }
    let mut ci = ContextInfo {
        mentioned_jid: mentions.to_vec(),
        ..Default::default()
    };
    if let Some(q) = quoted {
        ci.stanza_id = Some(q.id.clone());
        ci.participant = Some(q.participant.clone());
        ci.quoted_message = Some(
            Message {
                conversation: Some(q.text.clone()),
                ..Default::default()
            }
            .into(),
        );
    }
    Some(ci)
}

/// Text message. Uses the extended form whenever quoting or mentioning.
pub(super) fn text_message(text: &str, quoted: Option<&QuotedRef>, mentions: &[String]) -> Message {
    match context_info(quoted, mentions) {
        None => Message {
            conversation: Some(text.to_string()),
            ..Default::default()
        },
        Some(ci) => Message {
            extended_text_message: Some(
                ExtendedTextMessage {
                    text: Some(text.to_string()),
                    context_info: Some(ci.into()),
                    ..Default::default()
                }
                .into(),
            ),
            ..Default::default()
        },
    }
}

pub(super) fn image_message(
    upload: Uploaded,
    mimetype: &str,
    caption: Option<&str>,
    quoted: Option<&QuotedRef>,
) -> Message {
    Message {
        image_message: Some(
            ImageMessage {
                mimetype: Some(mimetype.to_string()),
                caption: caption.map(str::to_string),
                url: Some(upload.url),
                direct_path: Some(upload.direct_path),
                media_key: Some(upload.media_key),
                file_enc_sha256: Some(upload.file_enc_sha256),
                file_sha256: Some(upload.file_sha256),
                file_length: Some(upload.file_length),
                context_info: context_info(quoted, &[]).map(Into::into),
                ..Default::default()
            }
            .into(),
        ),
        ..Default::default()
    }
}

pub(super) fn sticker_message(upload: Uploaded, quoted: Option<&QuotedRef>) -> Message {
    Message {
        sticker_message: Some(
            StickerMessage {
                mimetype: Some("image/webp".to_string()),
                width: Some(512),
                height: Some(512),
                url: Some(upload.url),
                direct_path: Some(upload.direct_path),
                media_key: Some(upload.media_key),
                file_enc_sha256: Some(upload.file_enc_sha256),
                file_sha256: Some(upload.file_sha256),
                file_length: Some(upload.file_length),
                context_info: context_info(quoted, &[]).map(Into::into),
                ..Default::default()
            }
            .into(),
        ),
        ..Default::default()
    }
}

pub(super) fn video_message(
    upload: Uploaded,
    caption: Option<&str>,
    gif_playback: bool,
    quoted: Option<&QuotedRef>,
    mentions: &[String],
) -> Message {
    Message {
        video_message: Some(
            VideoMessage {
                mimetype: Some("video/mp4".to_string()),
                caption: caption.map(str::to_string),
                gif_playback: Some(gif_playback),
                url: Some(upload.url),
                direct_path: Some(upload.direct_path),
                media_key: Some(upload.media_key),
                file_enc_sha256: Some(upload.file_enc_sha256),
                file_sha256: Some(upload.file_sha256),
                file_length: Some(upload.file_length),
                context_info: context_info(quoted, mentions).map(Into::into),
                ..Default::default()
            }
            .into(),
        ),
        ..Default::default()
    }
}

/// Rebuild the downloadable image descriptor from a media reference.
pub(super) fn downloadable_image(media: &MediaRef) -> ImageMessage {
    ImageMessage {
        url: media.url.clone(),
        direct_path: media.direct_path.clone(),
        media_key: media.media_key.clone(),
        file_sha256: media.file_sha256.clone(),
        file_enc_sha256: media.file_enc_sha256.clone(),
        file_length: media.file_length,
        mimetype: media.mimetype.clone(),
        ..Default::default()
    }
}

/// Sniff an image MIME type from magic bytes. Defaults to JPEG.
pub(super) fn sniff_image_mime(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if data.starts_with(b"GIF8") {
        "image/gif"
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}
