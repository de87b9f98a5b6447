use super::events::{translate, unwrap_inner};
use super::qr::generate_qr_terminal;
use super::send::{context_info, sniff_image_mime, text_message, video_message, Uploaded};
use super::sent::{SentIds, SENT_ID_CAPACITY};
use super::ConnectionState;
use kurumi_core::message::{MessageContent, QuotedRef};
use wacore_binary::jid::{Jid, JidExt};
use waproto::whatsapp::message::{DeviceSentMessage, ExtendedTextMessage, ImageMessage};
use waproto::whatsapp::{ContextInfo, Message};

fn conversation(text: &str) -> Message {
    Message {
        conversation: Some(text.to_string()),
        ..Default::default()
    }
}

fn image(caption: Option<&str>) -> Message {
    Message {
        image_message: Some(
            ImageMessage {
                caption: caption.map(str::to_string),
                url: Some("https://mmg.whatsapp.net/x".into()),
                mimetype: Some("image/jpeg".into()),
                file_length: Some(1234),
                ..Default::default()
            }
            .into(),
        ),
        ..Default::default()
    }
}

fn quote() -> QuotedRef {
    QuotedRef {
        id: "3EB0ABC".into(),
        participant: "628111@s.whatsapp.net".into(),
        text: ".brat halo".into(),
    }
}

fn uploaded() -> Uploaded {
    Uploaded {
        url: "https://mmg.whatsapp.net/v".into(),
        direct_path: "/v/t62".into(),
        media_key: vec![1; 32],
        file_enc_sha256: vec![2; 32],
        file_sha256: vec![3; 32],
        file_length: 512,
    }
}

#[test]
fn test_jid_group_detection() {
    let group_jid: Jid = "120363001234567890@g.us".parse().unwrap();
    assert!(group_jid.is_group(), "g.us JID should be detected as group");

    let personal_jid: Jid = "5511999887766@s.whatsapp.net".parse().unwrap();
    assert!(!personal_jid.is_group());
}

#[test]
fn test_generate_qr_terminal() {
    let qr = generate_qr_terminal("test-data").unwrap();
    assert!(!qr.is_empty());
    // Quiet zone: first line is blank.
    let first = qr.lines().next().unwrap();
    assert!(first.chars().all(|c| c == ' ' || c == '▄'));
}

#[test]
fn test_translate_conversation() {
    assert_eq!(
        translate(&conversation(".menu")),
        Some(MessageContent::Conversation(".menu".into()))
    );
}

#[test]
fn test_translate_empty_message_is_none() {
    assert_eq!(translate(&Message::default()), None);
}

#[test]
fn test_translate_image_caption_and_media() {
    match translate(&image(Some(".stiker"))) {
        Some(MessageContent::Image(img)) => {
            assert_eq!(img.caption.as_deref(), Some(".stiker"));
            assert_eq!(img.media.url.as_deref(), Some("https://mmg.whatsapp.net/x"));
            assert_eq!(img.media.file_length, Some(1234));
        }
        other => panic!("expected image, got {other:?}"),
    }
}

#[test]
fn test_translate_reply_to_image() {
    let msg = Message {
        extended_text_message: Some(
            ExtendedTextMessage {
                text: Some(".s".into()),
                context_info: Some(
                    ContextInfo {
                        quoted_message: Some(image(None).into()),
                        ..Default::default()
                    }
                    .into(),
                ),
                ..Default::default()
            }
            .into(),
        ),
        ..Default::default()
    };
    match translate(&msg) {
        Some(MessageContent::ExtendedText { text, quoted }) => {
            assert_eq!(text, ".s");
            assert!(matches!(quoted.as_deref(), Some(MessageContent::Image(_))));
        }
        other => panic!("expected extended text, got {other:?}"),
    }
}

#[test]
fn test_unwrap_device_sent() {
    let wrapped = Message {
        device_sent_message: Some(
            DeviceSentMessage {
                message: Some(Box::new(conversation(".neko"))),
                ..Default::default()
            }
            .into(),
        ),
        ..Default::default()
    };
    assert_eq!(
        translate(unwrap_inner(&wrapped)),
        Some(MessageContent::Conversation(".neko".into()))
    );
}

#[test]
fn test_unwrap_plain_is_identity() {
    let plain = conversation("hi");
    assert_eq!(unwrap_inner(&plain), &plain);
}

#[test]
fn test_context_info_absent_without_quote_or_mentions() {
    assert!(context_info(None, &[]).is_none());
}

#[test]
fn test_context_info_carries_quote() {
    let ci = context_info(Some(&quote()), &[]).unwrap();
    assert_eq!(ci.stanza_id.as_deref(), Some("3EB0ABC"));
    assert_eq!(ci.participant.as_deref(), Some("628111@s.whatsapp.net"));
    let quoted = ci.quoted_message.as_ref().unwrap();
    assert_eq!(quoted.conversation.as_deref(), Some(".brat halo"));
    assert!(ci.mentioned_jid.is_empty());
}

#[test]
fn test_text_message_plain_vs_extended() {
    let plain = text_message("halo", None, &[]);
    assert_eq!(plain.conversation.as_deref(), Some("halo"));
    assert!(plain.extended_text_message.is_none());

    let mentions = vec!["628111@s.whatsapp.net".to_string()];
    let reply = text_message("halo", Some(&quote()), &mentions);
    assert!(reply.conversation.is_none());
    let ext = reply.extended_text_message.as_ref().unwrap();
    assert_eq!(ext.text.as_deref(), Some("halo"));
    let ci = ext.context_info.as_ref().unwrap();
    assert_eq!(ci.mentioned_jid, mentions);
    assert_eq!(ci.stanza_id.as_deref(), Some("3EB0ABC"));
}

#[test]
fn test_video_message_gif_playback() {
    let mentions = vec!["1@s.whatsapp.net".to_string(), "2@s.whatsapp.net".to_string()];
    let msg = video_message(uploaded(), Some("menu"), true, None, &mentions);
    let video = msg.video_message.as_ref().unwrap();
    assert_eq!(video.gif_playback, Some(true));
    assert_eq!(video.mimetype.as_deref(), Some("video/mp4"));
    assert_eq!(video.caption.as_deref(), Some("menu"));
    assert_eq!(video.file_length, Some(512));
    assert_eq!(video.context_info.as_ref().unwrap().mentioned_jid, mentions);
}

#[test]
fn test_sniff_image_mime() {
    assert_eq!(sniff_image_mime(&[0x89, b'P', b'N', b'G', 0x0D]), "image/png");
    assert_eq!(sniff_image_mime(b"GIF89a"), "image/gif");
    assert_eq!(sniff_image_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
    assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF]), "image/jpeg");
    assert_eq!(sniff_image_mime(&[]), "image/jpeg");
}

#[test]
fn test_connection_state() {
    assert!(!ConnectionState::Connecting.is_closed());
    assert!(!ConnectionState::Open.is_closed());
    let lost = ConnectionState::ClosedRetryable {
        reason: "disconnected".into(),
    };
    assert!(lost.is_closed());
    assert_eq!(lost.to_string(), "closed (retryable): disconnected");
    assert_eq!(
        ConnectionState::ClosedTerminal {
            reason: "logged out".into()
        }
        .to_string(),
        "closed (terminal): logged out"
    );
}

#[test]
fn test_sent_ids_echo_removed_once() {
    let mut sent = SentIds::new(4);
    sent.insert("A1".into());
    assert!(sent.remove("A1"));
    assert!(!sent.remove("A1"));
    assert_eq!(sent.len(), 0);
}

#[test]
fn test_sent_ids_bounded_when_echoes_never_arrive() {
    let mut sent = SentIds::default();
    for i in 0..SENT_ID_CAPACITY * 3 {
        sent.insert(format!("id-{i}"));
    }
    assert_eq!(sent.len(), SENT_ID_CAPACITY);
    // Oldest evicted, newest kept.
    assert!(!sent.remove("id-0"));
    assert!(sent.remove(&format!("id-{}", SENT_ID_CAPACITY * 3 - 1)));
    assert_eq!(sent.len(), SENT_ID_CAPACITY - 1);
}

#[test]
fn test_sent_ids_duplicate_insert_counts_once() {
    let mut sent = SentIds::new(2);
    sent.insert("A".into());
    sent.insert("A".into());
    sent.insert("B".into());
    assert_eq!(sent.len(), 2);
    assert!(sent.remove("A"));
    assert!(sent.remove("B"));
}
