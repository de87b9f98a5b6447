//! # kurumi-channels
//!
//! The WhatsApp connection manager: session lifecycle, event translation,
//! and outbound message encoding.

pub mod whatsapp;
