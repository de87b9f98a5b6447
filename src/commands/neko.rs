//! `.neko [gif]`: a random SFW neko picture, optionally animated.

use async_trait::async_trait;
use kurumi_core::{
    command::{CommandDeps, CommandHandler, CommandManifest, InvocationContext},
    error::KurumiError,
    message::Payload,
    traits::{with_presence, Fetcher},
};
use kurumi_media::fetch::{fetch_bounded, fetch_json, is_gif};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

const NOT_FOUND: &str = "Maaf, gagal mengambil gambar neko. Coba lagi ya.";
const FAILED: &str = "Terjadi kesalahan saat mengambil gambar. Coba lagi nanti.";

pub fn load(deps: &CommandDeps) -> Result<CommandManifest, KurumiError> {
    let handler = Neko {
        fetcher: deps.fetcher.clone(),
        gif_source: deps.config.endpoints.neko_json.clone(),
        fallback: deps.config.endpoints.neko_fallback.clone(),
        lookup_timeout: deps.config.timeouts.lookup(),
        media_timeout: deps.config.timeouts.media(),
    };
    Ok(CommandManifest::new("neko", Arc::new(handler))
        .description("Kirim gambar neko (SFW). Tambahkan \"gif\" untuk animasi.")
        .usage(&format!("{}neko [gif]", deps.config.bot.prefix))
        .category("fun"))
}

#[derive(Debug, Deserialize)]
pub(super) struct NekoResults {
    #[serde(default)]
    pub results: Vec<NekoItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NekoItem {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NekoUrl {
    url: Option<String>,
}

/// First GIF among the results, else the first result's URL.
pub(super) fn pick_url(results: &NekoResults) -> Option<String> {
    results
        .results
        .iter()
        .filter_map(|item| item.url.as_deref())
        .find(|url| is_gif(url, None))
        .or_else(|| results.results.first().and_then(|item| item.url.as_deref()))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

struct Neko {
    fetcher: Arc<dyn Fetcher>,
    gif_source: String,
    fallback: String,
    lookup_timeout: Duration,
    media_timeout: Duration,
}

impl Neko {
    async fn resolve_url(&self, want_gif: bool) -> Result<Option<String>, KurumiError> {
        if want_gif {
            let results: NekoResults =
                fetch_json(self.fetcher.as_ref(), &self.gif_source, self.lookup_timeout).await?;
            if let Some(url) = pick_url(&results) {
                return Ok(Some(url));
            }
            debug!("neko gif lookup had no url, using fallback");
        }

        let fallback: NekoUrl =
            fetch_json(self.fetcher.as_ref(), &self.fallback, self.lookup_timeout).await?;
        Ok(fallback.url.filter(|u| !u.is_empty()))
    }

    async fn send(&self, ctx: &InvocationContext<'_>, want_gif: bool) -> Result<(), KurumiError> {
        let Some(url) = self.resolve_url(want_gif).await? else {
            return ctx.reply_text(NOT_FOUND).await;
        };

        let media = fetch_bounded(self.fetcher.as_ref(), &url, self.media_timeout).await?;
        let animated = want_gif && is_gif(&url, media.content_type.as_deref());
        let payload = if animated {
            Payload::Video {
                data: media.bytes,
                caption: None,
                gif_playback: true,
                mentions: Vec::new(),
            }
        } else {
            Payload::Image {
                data: media.bytes,
                caption: None,
            }
        };
        ctx.reply(payload).await
    }

    async fn run(&self, ctx: &InvocationContext<'_>) -> Result<(), KurumiError> {
        let want_gif = ctx
            .args
            .first()
            .is_some_and(|arg| arg.eq_ignore_ascii_case("gif"));

        if let Err(e) = self.send(ctx, want_gif).await {
            error!("neko failed: {e}");
            ctx.reply_text(FAILED).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for Neko {
    async fn execute(&self, ctx: InvocationContext<'_>) -> Result<(), KurumiError> {
        with_presence(ctx.conn, ctx.chat, self.run(&ctx)).await
    }
}
