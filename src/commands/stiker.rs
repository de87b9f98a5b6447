//! `.stiker`: turn the attached or replied-to image into a sticker.

use super::transcode;
use async_trait::async_trait;
use kurumi_core::{
    command::{CommandDeps, CommandHandler, CommandManifest, InvocationContext},
    error::KurumiError,
    message::Payload,
    traits::with_presence,
};
use kurumi_media::sticker::IMAGE_STICKER;
use std::sync::Arc;
use tracing::error;

const FAILED: &str = "Gagal bikin stiker. Coba gambar lain ya.";

pub fn load(deps: &CommandDeps) -> Result<CommandManifest, KurumiError> {
    Ok(CommandManifest::new("stiker", Arc::new(Stiker))
        .aliases(&["sticker", "s"])
        .description("Ubah gambar jadi stiker (reply atau kirim gambar + .stiker)")
        .usage(&format!("{}stiker", deps.config.bot.prefix))
        .category("media"))
}

struct Stiker;

impl Stiker {
    async fn run(&self, ctx: &InvocationContext<'_>) -> Result<(), KurumiError> {
        let Some(image) = ctx.message.image() else {
            let p = &ctx.shared.prefix;
            return ctx
                .reply_text(format!(
                    "Kirim gambar dengan caption *{p}stiker* atau reply gambar lalu ketik *{p}stiker*."
                ))
                .await;
        };

        let sent = async {
            let bytes = ctx.conn.download_media(&image.media).await?;
            let data = transcode(bytes, IMAGE_STICKER).await?;
            ctx.reply(Payload::Sticker { data }).await
        }
        .await;

        if let Err(e) = sent {
            error!("stiker failed: {e}");
            ctx.reply_text(FAILED).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for Stiker {
    async fn execute(&self, ctx: InvocationContext<'_>) -> Result<(), KurumiError> {
        with_presence(ctx.conn, ctx.chat, self.run(&ctx)).await
    }
}
