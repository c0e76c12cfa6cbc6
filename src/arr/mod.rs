//! Radarr and Sonarr integration.

mod client;
mod types;

pub use client::{MediaSource, RadarrClient, SonarrClient};
pub use types::*;

use crate::settings::Settings;

/// Builds the media sources to scan from the current settings.
///
/// The scanner asks for a fresh set every cycle so that edited URLs and keys
/// take effect without a restart.
pub trait SourceProvider: Send + Sync {
    fn sources(&self, settings: &Settings) -> Vec<Box<dyn MediaSource>>;
}

/// Radarr and/or Sonarr, whichever has both a URL and an API key.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrSourceProvider;

impl SourceProvider for ArrSourceProvider {
    fn sources(&self, settings: &Settings) -> Vec<Box<dyn MediaSource>> {
        let mut sources: Vec<Box<dyn MediaSource>> = Vec::new();
        if settings.radarr_configured() {
            sources.push(Box::new(RadarrClient::new(
                &settings.radarr_url,
                &settings.radarr_api_key,
            )));
        }
        if settings.sonarr_configured() {
            sources.push(Box::new(SonarrClient::new(
                &settings.sonarr_url,
                &settings.sonarr_api_key,
            )));
        }
        sources
    }
}

/// Build a client for one named service, as used by the connection test.
pub fn client_for(service: &str, url: &str, api_key: &str) -> Option<Box<dyn MediaSource>> {
    match service {
        "radarr" => Some(Box::new(RadarrClient::new(url, api_key))),
        "sonarr" => Some(Box::new(SonarrClient::new(url, api_key))),
        _ => None,
    }
}
