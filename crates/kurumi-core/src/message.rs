use serde::{Deserialize, Serialize};

/// How a batch of messages reached us. Only `Notify` is live traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertKind {
    /// A new message delivered in real time.
    Notify,
    /// History or offline backlog appended to the store.
    Append,
}

/// An inbound event from the connection layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub kind: UpsertKind,
    pub message: Option<InboundMessage>,
}

impl InboundEvent {
    /// A live message notification.
    pub fn notify(message: InboundMessage) -> Self {
        Self {
            kind: UpsertKind::Notify,
            message: Some(message),
        }
    }
}

/// Addressing of a message inside a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageKey {
    /// Chat the message belongs to (user or group JID).
    pub remote_jid: String,
    pub id: String,
    /// Sent from the bot's own number.
    #[serde(default)]
    pub from_me: bool,
    /// Author inside a group chat.
    #[serde(default)]
    pub participant: Option<String>,
}

/// A message as delivered by the connection layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    pub key: MessageKey,
    #[serde(default)]
    pub push_name: String,
    pub content: Option<MessageContent>,
}

/// The finite set of payload shapes we understand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain conversational text.
    Conversation(String),
    /// Text with formatting, links, or a reply to another message.
    ExtendedText {
        text: String,
        quoted: Option<Box<MessageContent>>,
    },
    Image(ImageContent),
    Video(VideoContent),
    ButtonsResponse { selected_button_id: String },
    ListResponse { selected_row_id: String },
    /// Anything else (stickers, reactions, protocol messages...).
    Unsupported,
}

impl MessageContent {
    /// Text carried by this payload, or `""` when it has none.
    pub fn text(&self) -> &str {
        match self {
            Self::Conversation(text) => text,
            Self::ExtendedText { text, .. } => text,
            Self::Image(img) => img.caption.as_deref().unwrap_or(""),
            Self::Video(vid) => vid.caption.as_deref().unwrap_or(""),
            Self::ButtonsResponse { selected_button_id } => selected_button_id,
            Self::ListResponse { selected_row_id } => selected_row_id,
            Self::Unsupported => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub caption: Option<String>,
    pub media: MediaRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoContent {
    pub caption: Option<String>,
}

/// Everything the connection layer needs to download an encrypted media blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: Option<String>,
    pub direct_path: Option<String>,
    pub media_key: Option<Vec<u8>>,
    pub file_sha256: Option<Vec<u8>>,
    pub file_enc_sha256: Option<Vec<u8>>,
    pub file_length: Option<u64>,
    pub mimetype: Option<String>,
}

impl InboundMessage {
    /// Extracted text, `""` if the message has no text-bearing payload.
    pub fn text(&self) -> &str {
        self.content.as_ref().map(MessageContent::text).unwrap_or("")
    }

    /// The image attached to this message, or else the image it replies to.
    pub fn image(&self) -> Option<&ImageContent> {
        match self.content.as_ref()? {
            MessageContent::Image(img) => Some(img),
            MessageContent::ExtendedText {
                quoted: Some(quoted),
                ..
            } => match quoted.as_ref() {
                MessageContent::Image(img) => Some(img),
                _ => None,
            },
            _ => None,
        }
    }

    /// Who wrote the message: the group participant, or the chat itself.
    pub fn sender(&self) -> &str {
        self.key
            .participant
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.key.remote_jid)
    }

    /// Reference used to quote this message in a reply.
    pub fn quote(&self) -> QuotedRef {
        QuotedRef {
            id: self.key.id.clone(),
            participant: self.sender().to_string(),
            text: self.text().to_string(),
        }
    }
}

/// Whether a JID addresses a group chat.
pub fn is_group_jid(jid: &str) -> bool {
    jid.ends_with("@g.us")
}

/// The user part of a JID (`62812@s.whatsapp.net` -> `62812`).
pub fn jid_user(jid: &str) -> &str {
    jid.split('@').next().unwrap_or("").trim()
}

/// Chat-state signal shown while a command is working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Composing,
    Paused,
}

/// The message a reply quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedRef {
    pub id: String,
    pub participant: String,
    pub text: String,
}

/// An outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub payload: Payload,
    pub quoted: Option<QuotedRef>,
}

/// Outbound payload kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text {
        text: String,
        mentions: Vec<String>,
    },
    Image {
        data: Vec<u8>,
        caption: Option<String>,
    },
    /// 512x512 lossy WebP.
    Sticker { data: Vec<u8> },
    Video {
        data: Vec<u8>,
        caption: Option<String>,
        /// Loop silently like an animated GIF.
        gif_playback: bool,
        mentions: Vec<String>,
    },
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Sticker { .. } => "sticker",
            Self::Video { .. } => "video",
        }
    }
}

/// Group subject and member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMetadata {
    pub id: String,
    pub subject: String,
    /// Participant JIDs in roster order.
    pub participants: Vec<String>,
}
