//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`]: an in-memory database, a [`ScanService`] wired
//! to scripted media sources, a fixed clock and a temporary media library.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use tempfile::TempDir;

use piratarr::arr::{MediaItem, MediaSource, SourceProvider};
use piratarr::scanner::ScanService;
use piratarr::server::{create_router, AppContext};
use piratarr::settings::Settings;
use piratarr_common::Clock;
use piratarr_db::pool::{init_memory_pool, DbPool, PooledConnection};

pub const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nHello my friend.\n\n\
                              2\n00:00:05,000 --> 00:00:07,250\nWhere is the money?\n";

/// Always reports the same instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 9, 19, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A media source that returns a scripted listing.
#[derive(Clone)]
pub struct FakeSource {
    pub name: String,
    pub items: Result<Vec<MediaItem>, String>,
    pub delay: Option<Duration>,
}

impl FakeSource {
    pub fn ok(name: &str, items: Vec<MediaItem>) -> Self {
        Self {
            name: name.to_string(),
            items: Ok(items),
            delay: None,
        }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            items: Err(message.to_string()),
            delay: None,
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait::async_trait]
impl MediaSource for FakeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_media(&self) -> anyhow::Result<Vec<MediaItem>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.items.clone().map_err(|e| anyhow!(e))
    }

    async fn test_connection(&self) -> anyhow::Result<bool> {
        Ok(self.items.is_ok())
    }
}

/// Hands out whatever sources the test installed, ignoring settings.
#[derive(Default)]
pub struct FakeProvider {
    sources: RwLock<Vec<FakeSource>>,
}

impl FakeProvider {
    pub fn set(&self, sources: Vec<FakeSource>) {
        *self.sources.write() = sources;
    }
}

impl SourceProvider for FakeProvider {
    fn sources(&self, _settings: &Settings) -> Vec<Box<dyn MediaSource>> {
        self.sources
            .read()
            .iter()
            .cloned()
            .map(|s| Box::new(s) as Box<dyn MediaSource>)
            .collect()
    }
}

pub struct TestHarness {
    pub db: DbPool,
    pub scanner: Arc<ScanService>,
    pub provider: Arc<FakeProvider>,
    pub library: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let provider = Arc::new(FakeProvider::default());
        let scanner = Arc::new(ScanService::new(
            db.clone(),
            provider.clone(),
            Arc::new(FixedClock::default()),
        ));
        let library = tempfile::tempdir().expect("failed to create media library");

        Self {
            db,
            scanner,
            provider,
            library,
        }
    }

    pub fn conn(&self) -> PooledConnection {
        self.db.get().expect("failed to get connection")
    }

    pub fn ctx(&self) -> AppContext {
        AppContext::new(self.db.clone(), self.scanner.clone())
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx())
    }

    pub fn settings(&self) -> Settings {
        Settings::load(&self.conn()).expect("failed to load settings")
    }

    pub fn save_settings(&self, settings: &Settings) {
        settings.save(&self.conn()).expect("failed to save settings");
    }

    /// Create a file (and its parent directories) under the library root.
    pub fn write_file(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.library.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create directory");
        }
        std::fs::write(&path, content).expect("failed to write file");
        path
    }

    /// A movie file with a matching English subtitle next to it.
    pub fn movie_with_subtitle(&self, external_id: i64, name: &str) -> (MediaItem, PathBuf) {
        let media = self.write_file(&format!("{name}/{name}.mkv"), b"");
        let subtitle = self.write_file(&format!("{name}/{name}.en.srt"), SAMPLE_SRT);
        let item = MediaItem::movie(external_id, name, Some(1999), media.to_string_lossy());
        (item, subtitle)
    }

    pub fn root(&self) -> &Path {
        self.library.path()
    }
}
