//! `.tagall [teks]`: mention every member of the current group.

use async_trait::async_trait;
use kurumi_core::{
    command::{CommandDeps, CommandHandler, CommandManifest, InvocationContext},
    error::KurumiError,
    message::{jid_user, GroupMetadata, Payload},
    traits::with_presence,
};
use std::sync::Arc;
use tracing::{debug, error};

const NOT_A_GROUP: &str = "Perintah ini hanya bisa digunakan di grup.";
const FAILED: &str = "Gagal melakukan tagall.";
const DEFAULT_TEXT: &str = "📢 Tag semua member grup!";

pub fn load(deps: &CommandDeps) -> Result<CommandManifest, KurumiError> {
    Ok(CommandManifest::new("tagall", Arc::new(TagAll))
        .aliases(&["all", "mentionall"])
        .description("Tag semua anggota grup")
        .usage(&format!("{}tagall", deps.config.bot.prefix))
        .category("group"))
}

/// `*subject*`, the announcement, then one numbered `@user` line per member.
pub(super) fn caption(meta: &GroupMetadata, text: &str) -> String {
    let text = if text.is_empty() { DEFAULT_TEXT } else { text };
    let list = meta
        .participants
        .iter()
        .enumerate()
        .map(|(i, jid)| format!("{}. @{}", i + 1, jid_user(jid)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("*{}*\n{text}\n\n{list}", meta.subject)
}

struct TagAll;

impl TagAll {
    async fn run(&self, ctx: &InvocationContext<'_>) -> Result<(), KurumiError> {
        let meta = match ctx.conn.group_metadata(ctx.chat).await {
            Ok(Some(meta)) => meta,
            Ok(None) => return ctx.reply_text(NOT_A_GROUP).await,
            Err(e) => {
                debug!("group metadata unavailable: {e}");
                return ctx.reply_text(NOT_A_GROUP).await;
            }
        };

        let payload = Payload::Text {
            text: caption(&meta, &ctx.joined_args()),
            mentions: meta.participants.clone(),
        };
        if let Err(e) = ctx.reply(payload).await {
            error!("tagall failed: {e}");
            ctx.reply_text(FAILED).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for TagAll {
    async fn execute(&self, ctx: InvocationContext<'_>) -> Result<(), KurumiError> {
        with_presence(ctx.conn, ctx.chat, self.run(&ctx)).await
    }
}
