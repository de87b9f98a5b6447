//! `.brat <teks>`: black text on white, as a sticker.

use super::{base_url, transcode};
use async_trait::async_trait;
use kurumi_core::{
    command::{CommandDeps, CommandHandler, CommandManifest, InvocationContext},
    error::KurumiError,
    message::Payload,
    traits::{with_presence, Fetcher},
};
use kurumi_media::{fetch::fetch_bounded, sticker::TEXT_STICKER};
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

const FAILED: &str = "⚠️ Gagal membuat stiker. Coba lagi nanti.";

pub fn load(deps: &CommandDeps) -> Result<CommandManifest, KurumiError> {
    let handler = Brat {
        fetcher: deps.fetcher.clone(),
        base: deps.config.endpoints.text_render.clone(),
        timeout: deps.config.timeouts.text_render(),
    };
    Ok(CommandManifest::new("brat", Arc::new(handler))
        .description("Buat stiker teks background putih")
        .usage(&format!("{}brat <teks>", deps.config.bot.prefix))
        .category("fun"))
}

/// Renderer URL for `text`: 512x512, white background, black text, PNG.
pub(super) fn render_url(base: &str, text: &str) -> String {
    format!(
        "{}/512x512/ffffff/000.png&text={}",
        base_url(base),
        urlencoding::encode(text)
    )
}

struct Brat {
    fetcher: Arc<dyn Fetcher>,
    base: String,
    timeout: Duration,
}

impl Brat {
    async fn run(&self, ctx: &InvocationContext<'_>) -> Result<(), KurumiError> {
        let text = ctx.joined_args();
        if text.is_empty() {
            return ctx
                .reply_text(format!(
                    "❌ Masukkan teks.\nContoh: *{}brat malas*",
                    ctx.shared.prefix
                ))
                .await;
        }

        let sent = async {
            let rendered =
                fetch_bounded(self.fetcher.as_ref(), &render_url(&self.base, &text), self.timeout)
                    .await?;
            let data = transcode(rendered.bytes, TEXT_STICKER).await?;
            ctx.reply(Payload::Sticker { data }).await
        }
        .await;

        if let Err(e) = sent {
            error!("brat failed: {e}");
            ctx.reply_text(FAILED).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for Brat {
    async fn execute(&self, ctx: InvocationContext<'_>) -> Result<(), KurumiError> {
        with_presence(ctx.conn, ctx.chat, self.run(&ctx)).await
    }
}
