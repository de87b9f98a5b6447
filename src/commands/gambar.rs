//! `.gambar <teks>`: AI image generation from a prompt.

use super::base_url;
use async_trait::async_trait;
use kurumi_core::{
    command::{CommandDeps, CommandHandler, CommandManifest, InvocationContext},
    error::KurumiError,
    message::Payload,
    traits::{with_presence, Fetcher},
};
use kurumi_media::fetch::fetch_bounded;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

const FAILED: &str = "⚠️ Gagal membuat gambar. Coba lagi dengan teks berbeda.";

pub fn load(deps: &CommandDeps) -> Result<CommandManifest, KurumiError> {
    let endpoints = &deps.config.endpoints;
    let handler = Gambar {
        fetcher: deps.fetcher.clone(),
        base: endpoints.image_generation.clone(),
        width: endpoints.image_width,
        height: endpoints.image_height,
        timeout: deps.config.timeouts.image_generation(),
    };
    Ok(CommandManifest::new("gambar", Arc::new(handler))
        .aliases(&["img", "image", "gbr"])
        .description("Buat gambar dari teks dengan AI (Pollinations)")
        .usage(&format!("{}gambar <teks>", deps.config.bot.prefix))
        .category("fun"))
}

pub(super) fn prompt_url(base: &str, prompt: &str, width: u32, height: u32) -> String {
    format!(
        "{}/prompt/{}?nologo=true&width={width}&height={height}",
        base_url(base),
        urlencoding::encode(prompt)
    )
}

struct Gambar {
    fetcher: Arc<dyn Fetcher>,
    base: String,
    width: u32,
    height: u32,
    timeout: Duration,
}

impl Gambar {
    async fn run(&self, ctx: &InvocationContext<'_>) -> Result<(), KurumiError> {
        let prompt = ctx.joined_args();
        if prompt.is_empty() {
            return ctx
                .reply_text(format!(
                    "❌ Masukkan teks.\nContoh: *{}gambar ayam lucu*",
                    ctx.shared.prefix
                ))
                .await;
        }

        let url = prompt_url(&self.base, &prompt, self.width, self.height);
        let sent = async {
            let image = fetch_bounded(self.fetcher.as_ref(), &url, self.timeout).await?;
            ctx.reply(Payload::Image {
                data: image.bytes,
                caption: None,
            })
            .await
        }
        .await;

        if let Err(e) = sent {
            error!("gambar failed: {e}");
            ctx.reply_text(FAILED).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for Gambar {
    async fn execute(&self, ctx: InvocationContext<'_>) -> Result<(), KurumiError> {
        with_presence(ctx.conn, ctx.chat, self.run(&ctx)).await
    }
}
