//! Piratarr - pirate-speak subtitles for Sonarr and Radarr libraries
//!
//! This library crate exposes the service internals for integration testing.

pub mod arr;
pub mod config;
pub mod processor;
pub mod scanner;
pub mod server;
pub mod settings;
