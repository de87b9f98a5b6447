//! # kurumi-core
//!
//! Core types, traits, configuration, command registry, and error handling
//! for the Kurumi bot.

pub mod command;
pub mod config;
pub mod error;
pub mod message;
pub mod registry;
pub mod traits;
