//! Database query modules.

pub mod config;
pub mod jobs;
pub mod media;
