//! `.menu`: greeting, bot info, and the command list as video + caption.

use async_trait::async_trait;
use chrono::Timelike;
use kurumi_core::{
    command::{CommandDeps, CommandHandler, CommandManifest, InvocationContext, SharedContext},
    error::KurumiError,
    message::{jid_user, Payload},
    traits::with_presence,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

pub fn load(deps: &CommandDeps) -> Result<CommandManifest, KurumiError> {
    let handler = Menu {
        video: PathBuf::from(kurumi_core::config::shellexpand(
            &deps.config.commands.menu_video,
        )),
    };
    Ok(CommandManifest::new("menu", Arc::new(handler))
        .aliases(&["help", "h"])
        .description("Tampilkan menu sebagai video + caption")
        .usage(&format!("{}menu", deps.config.bot.prefix))
        .category("main"))
}

/// Time-of-day greeting for a local hour (0-23).
pub(super) fn greeting(hour: u32) -> &'static str {
    match hour {
        h if h < 11 => "Selamat pagi",
        h if h < 15 => "Selamat siang",
        h if h < 18 => "Selamat sore",
        _ => "Selamat malam",
    }
}

/// Compact uptime: `1j 2m 3d`, hours and minutes omitted when zero.
pub(super) fn uptime_text(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    let mut parts = Vec::with_capacity(3);
    if h > 0 {
        parts.push(format!("{h}j"));
    }
    if m > 0 {
        parts.push(format!("{m}m"));
    }
    parts.push(format!("{s}d"));
    parts.join(" ")
}

pub(super) fn caption(shared: &SharedContext, greet: &str, tag: &str, uptime_secs: u64) -> String {
    let p = &shared.prefix;
    let bot = &shared.bot;

    let main_items: Vec<String> = [
        ("brat", "👑", "brat"),
        ("stiker", "🎨", "stiker"),
        ("gambar", "🖼️", "gambar"),
        ("neko", "🐾", "neko"),
        ("neko", "🎞️", "neko gif"),
    ]
    .iter()
    .filter(|(name, _, _)| shared.has_command(name))
    .map(|(_, icon, label)| format!("│{icon} {p}{label}"))
    .collect();

    let mut menu = String::from("╭─〔 📜 MAIN MENU 〕\n");
    for item in &main_items {
        menu.push_str(item);
        menu.push('\n');
    }
    menu.push_str("╰────────────────");

    if shared.has_command("tagall") {
        menu.push_str("\n╭─〔 👥 GROUP MENU 〕\n");
        menu.push_str(&format!("│📣 {p}tagall\n"));
        menu.push_str("╰────────────────");
    }

    format!(
        "{greet} {tag} 👋\n\
         *{name}*\n\
         \n\
         ╭─〔 🤖 BOT INFO 〕\n\
         │🏷️ Nama Bot  : {name}\n\
         │🌐 Mode      : {mode}\n\
         │🛠️ Versi     : {version}\n\
         │👨‍💻 Developer: {developer}\n\
         │⌛ Runtime   : {uptime}\n\
         │📊 Total Fitur: {total}\n\
         ╰────────────────\n\
         \n\
         {menu}\n\
         \n\
         💡 Tip: Kirim gambar + caption *{p}stiker* untuk langsung jadi stiker.",
        name = bot.name,
        mode = bot.mode,
        version = bot.version,
        developer = bot.developer,
        uptime = uptime_text(uptime_secs),
        total = shared.commands.len(),
    )
}

struct Menu {
    video: PathBuf,
}

impl Menu {
    async fn run(&self, ctx: &InvocationContext<'_>) -> Result<(), KurumiError> {
        let at = ctx.message.sender().to_string();
        let tag = format!("@{}", jid_user(&at));
        let hour = chrono::Local::now().hour();
        let uptime = ctx.shared.started_at.elapsed().as_secs();
        let text = caption(ctx.shared, greeting(hour), &tag, uptime);

        match tokio::fs::read(&self.video).await {
            Ok(data) => {
                let video = Payload::Video {
                    data,
                    caption: Some(text.clone()),
                    gif_playback: false,
                    mentions: vec![at.clone()],
                };
                match ctx.reply(video).await {
                    Ok(()) => return Ok(()),
                    Err(e) => warn!(parent: &ctx.span, "menu video send failed: {e}"),
                }
            }
            Err(e) => debug!(
                parent: &ctx.span,
                "menu video {} unavailable: {e}",
                self.video.display()
            ),
        }

        ctx.reply(Payload::Text {
            text,
            mentions: vec![at],
        })
        .await
    }
}

#[async_trait]
impl CommandHandler for Menu {
    async fn execute(&self, ctx: InvocationContext<'_>) -> Result<(), KurumiError> {
        with_presence(ctx.conn, ctx.chat, self.run(&ctx)).await
    }
}
