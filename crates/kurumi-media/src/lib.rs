//! # kurumi-media
//!
//! Bounded HTTP fetch and image-to-sticker transcoding shared by the commands.

pub mod fetch;
pub mod sticker;
