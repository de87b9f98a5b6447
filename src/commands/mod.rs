//! Built-in chat commands. Each unit exports a loader returning its manifest.

mod brat;
mod gambar;
mod menu;
mod neko;
mod stiker;
mod tagall;


use kurumi_core::{command::CommandUnit, error::KurumiError};
use kurumi_media::sticker::{to_sticker, StickerOptions};

/// The static command manifest, in load order.
pub const BUILTIN: &[CommandUnit] = &[
    CommandUnit {
        unit: "brat",
        load: brat::load,
    },
    CommandUnit {
        unit: "gambar",
        load: gambar::load,
    },
    CommandUnit {
        unit: "menu",
        load: menu::load,
    },
    CommandUnit {
        unit: "neko",
        load: neko::load,
    },
    CommandUnit {
        unit: "stiker",
        load: stiker::load,
    },
    CommandUnit {
        unit: "tagall",
        load: tagall::load,
    },
];

/// Run the sticker transcode off the async workers.
async fn transcode(bytes: Vec<u8>, options: StickerOptions) -> Result<Vec<u8>, KurumiError> {
    tokio::task::spawn_blocking(move || to_sticker(&bytes, options))
        .await
        .map_err(|e| KurumiError::Transcode(format!("transcode task failed: {e}")))?
}

/// Endpoint base without a trailing slash.
fn base_url(base: &str) -> &str {
    base.trim_end_matches('/')
}
