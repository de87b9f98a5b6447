//! Test doubles for the connection and fetch seams.

use async_trait::async_trait;
use kurumi_core::{
    command::{CommandDeps, SharedContext},
    config::Config,
    error::{FetchError, KurumiError},
    message::{
        GroupMetadata, InboundMessage, MediaRef, MessageContent, MessageKey, OutgoingMessage,
        Presence,
    },
    traits::{Connection, Fetched, Fetcher},
};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const CHAT: &str = "628111@s.whatsapp.net";
pub const GROUP: &str = "120363001234567890@g.us";

/// Records everything a handler asks of the connection.
#[derive(Default)]
pub struct RecordingConnection {
    pub sent: Mutex<Vec<(String, OutgoingMessage)>>,
    pub presence: Mutex<Vec<(String, Presence)>>,
    pub groups: HashMap<String, GroupMetadata>,
    pub media: Option<Vec<u8>>,
    /// Number of group metadata lookups made.
    pub metadata_calls: AtomicUsize,
    /// Fail sends whose payload kind matches.
    pub fail_kind: Option<&'static str>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: GroupMetadata) -> Self {
        self.groups.insert(group.id.clone(), group);
        self
    }

    pub fn with_media(mut self, bytes: Vec<u8>) -> Self {
        self.media = Some(bytes);
        self
    }

    pub fn failing(mut self, kind: &'static str) -> Self {
        self.fail_kind = Some(kind);
        self
    }

    pub fn sent(&self) -> Vec<(String, OutgoingMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn presence(&self) -> Vec<Presence> {
        self.presence
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| *p)
            .collect()
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_presence(&self, chat: &str, presence: Presence) -> Result<(), KurumiError> {
        self.presence
            .lock()
            .unwrap()
            .push((chat.to_string(), presence));
        Ok(())
    }

    async fn send(&self, chat: &str, message: OutgoingMessage) -> Result<(), KurumiError> {
        if self.fail_kind == Some(message.payload.kind()) {
            return Err(KurumiError::Channel("send refused".into()));
        }
        self.sent.lock().unwrap().push((chat.to_string(), message));
        Ok(())
    }

    async fn group_metadata(&self, chat: &str) -> Result<Option<GroupMetadata>, KurumiError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.groups.get(chat).cloned())
    }

    async fn download_media(&self, _media: &MediaRef) -> Result<Vec<u8>, KurumiError> {
        self.media
            .clone()
            .ok_or_else(|| KurumiError::Channel("no media".into()))
    }
}

/// Canned HTTP responses keyed by URL prefix.
#[derive(Default)]
pub struct StubFetcher {
    routes: Vec<(String, Result<Fetched, u16>)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        self.routes.push((
            prefix.to_string(),
            Ok(Fetched {
                bytes,
                content_type: content_type.map(str::to_string),
            }),
        ));
        self
    }

    pub fn status(mut self, prefix: &str, status: u16) -> Self {
        self.routes.push((prefix.to_string(), Err(status)));
        self
    }

    /// Every request sleeps this long before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.routes.iter().find(|(prefix, _)| url.starts_with(prefix)) {
            Some((_, Ok(fetched))) => Ok(fetched.clone()),
            Some((_, Err(status))) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// A solid-colour PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Whether `data` is a lossy WebP of `size`x`size`.
pub fn is_lossy_webp(data: &[u8], size: u32) -> bool {
    if data.len() < 16 || &data[..4] != b"RIFF" || &data[8..12] != b"WEBP" {
        return false;
    }
    let has_vp8 = data.windows(4).any(|w| w == b"VP8 ");
    let dims = image::load_from_memory_with_format(data, image::ImageFormat::WebP)
        .map(|img| img.width() == size && img.height() == size)
        .unwrap_or(false);
    has_vp8 && dims
}

pub fn text_message(chat: &str, text: &str) -> InboundMessage {
    InboundMessage {
        key: MessageKey {
            remote_jid: chat.to_string(),
            id: "3EB0TEST".into(),
            from_me: false,
            participant: None,
        },
        push_name: "Tester".into(),
        content: Some(MessageContent::Conversation(text.to_string())),
    }
}

pub fn deps(fetcher: Arc<dyn Fetcher>) -> CommandDeps {
    CommandDeps {
        config: Arc::new(Config::default()),
        fetcher,
    }
}

pub fn shared(registry: &kurumi_core::registry::Registry) -> SharedContext {
    SharedContext {
        prefix: ".".into(),
        commands: registry.descriptors().to_vec(),
        bot: Config::default().bot,
        started_at: Instant::now(),
    }
}
