//! Library scanner and translation queue.
//!
//! A scan asks every configured media source for its files, records them in
//! the media cache, queues translation jobs for subtitles without a pirate
//! copy and then drains the queue. One scan (or media translation) runs at a
//! time; a second request while the lock is held fails with
//! [`ScanError::Busy`].

pub mod discovery;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use piratarr_common::{Clock, Error, JobStatus, MediaId, MediaKind};
use piratarr_db::models::TranslationJob;
use piratarr_db::pool::DbPool;
use piratarr_db::queries::{jobs, media};
use piratarr_subtitle::pirate_output_path;
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::arr::{MediaItem, SourceProvider};
use crate::processor;
use crate::settings::{apply_path_mapping, Settings};

pub use discovery::find_subtitle_files;

/// Upper bound on waiting for the background loop in [`ScanService::stop`]
const STOP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Scan already in progress")]
    Busy,

    #[error(transparent)]
    Common(#[from] Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ScanError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Busy => 409,
            Self::Common(e) => e.http_status(),
            Self::Join(_) => 500,
        }
    }
}

type ScanResult<T> = std::result::Result<T, ScanError>;

/// Totals reported after a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub movies_found: usize,
    pub episodes_found: usize,
    pub subtitles_found: usize,
    pub translations_queued: usize,
    pub jobs_completed: usize,
    pub jobs_failed: usize,
}

/// Result of [`ScanService::translate_media`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaTranslation {
    pub media_found: usize,
    pub subtitles_found: usize,
    pub jobs_created: usize,
    pub jobs_completed: usize,
    pub jobs_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStatus {
    pub running: bool,
    pub scanning: bool,
    pub last_scan: Option<DateTime<Utc>>,
}

/// Owns the scan lock and the background scan loop.
pub struct ScanService {
    inner: Arc<Inner>,
    task: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

struct Inner {
    db: DbPool,
    provider: Arc<dyn SourceProvider>,
    clock: Arc<dyn Clock>,
    lock: tokio::sync::Mutex<()>,
    scanning: AtomicBool,
    last_scan: RwLock<Option<DateTime<Utc>>>,
}

/// Clears the `scanning` flag however the critical section ends.
struct ScanningFlag<'a>(&'a AtomicBool);

impl<'a> ScanningFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ScanningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ScanService {
    pub fn new(db: DbPool, provider: Arc<dyn SourceProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                db,
                provider,
                clock,
                lock: tokio::sync::Mutex::new(()),
                scanning: AtomicBool::new(false),
                last_scan: RwLock::new(None),
            }),
            task: Mutex::new(None),
        }
    }

    /// Spawn the background loop: wait `startup_delay`, then scan every
    /// `scan_interval` seconds until [`stop`](Self::stop) is called.
    pub fn start(&self, startup_delay: Duration) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|(_, handle)| !handle.is_finished()) {
            tracing::warn!("Scanner is already running");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(self.inner.clone(), startup_delay, cancel.clone()));
        *task = Some((cancel, handle));
        tracing::info!("Scanner started");
    }

    /// Cancel the background loop and wait briefly for it to finish.
    ///
    /// A scan in progress is not interrupted; if it outlasts the wait the
    /// task is left to finish on its own.
    pub async fn stop(&self) {
        let Some((cancel, handle)) = self.task.lock().take() else {
            return;
        };
        cancel.cancel();
        match tokio::time::timeout(STOP_TIMEOUT, handle).await {
            Ok(_) => tracing::info!("Scanner stopped"),
            Err(_) => tracing::warn!("Scanner did not stop within {:?}", STOP_TIMEOUT),
        }
    }

    pub fn status(&self) -> ScanStatus {
        let running = self
            .task
            .lock()
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished());
        ScanStatus {
            running,
            scanning: self.inner.scanning.load(Ordering::SeqCst),
            last_scan: *self.inner.last_scan.read(),
        }
    }

    /// Run a full scan now, failing with [`ScanError::Busy`] if one is
    /// already running.
    pub async fn scan_now(&self) -> ScanResult<ScanSummary> {
        self.inner.try_scan().await
    }

    /// Translate a single `.srt` file outside the queue.
    ///
    /// The job is created directly in `processing`. A failed translation is
    /// recorded on the returned job rather than returned as an error. Fails
    /// with [`ScanError::Busy`] while a scan or media translation holds the
    /// lock, since both may write the same output file.
    pub async fn translate_file(&self, path: &Path) -> ScanResult<TranslationJob> {
        let is_srt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"));
        if !path.exists() {
            return Err(Error::not_found("file", path.display()).into());
        }
        if !is_srt {
            return Err(Error::validation("File must be an SRT file").into());
        }
        let _guard = self.inner.lock.try_lock().map_err(|_| ScanError::Busy)?;

        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let job = {
            let conn = self.inner.conn()?;
            jobs::create_job(
                &conn,
                &title,
                MediaKind::Manual,
                &path.to_string_lossy(),
                JobStatus::Processing,
                self.inner.clock.now(),
            )?
        };

        Ok(processor::run_job(&self.inner.db, self.inner.clock.as_ref(), &job).await?)
    }

    /// Queue and run translations for the subtitles of cached media rows.
    ///
    /// Ignores the auto-translate setting. Unknown ids are skipped.
    pub async fn translate_media(&self, ids: &[MediaId]) -> ScanResult<MediaTranslation> {
        let _guard = self.inner.lock.try_lock().map_err(|_| ScanError::Busy)?;
        let _flag = ScanningFlag::raise(&self.inner.scanning);
        self.inner.translate_media_locked(ids.to_vec()).await
    }
}

impl Inner {
    fn conn(&self) -> piratarr_common::Result<piratarr_db::pool::PooledConnection> {
        piratarr_db::pool::get_conn(&self.db)
    }

    async fn try_scan(&self) -> ScanResult<ScanSummary> {
        let _guard = self.lock.try_lock().map_err(|_| ScanError::Busy)?;
        let _flag = ScanningFlag::raise(&self.scanning);
        self.scan_locked().await
    }

    async fn scan_locked(&self) -> ScanResult<ScanSummary> {
        let settings = Settings::load(&*self.conn()?)?;
        let mut summary = ScanSummary::default();

        for source in self.provider.sources(&settings) {
            let items = match source.list_media().await {
                Ok(items) => items,
                Err(e) => {
                    tracing::error!(source = source.name(), "Media listing failed: {:#}", e);
                    continue;
                }
            };
            tracing::info!(source = source.name(), items = items.len(), "Fetched media");

            for item in &items {
                match item.kind {
                    MediaKind::Movie => summary.movies_found += 1,
                    MediaKind::Episode => summary.episodes_found += 1,
                    MediaKind::Manual => {}
                }
            }

            let db = self.db.clone();
            let clock = self.clock.clone();
            let settings = settings.clone();
            let catalogued = tokio::task::spawn_blocking(move || {
                let conn = piratarr_db::pool::get_conn(&db)?;
                catalogue(&conn, clock.as_ref(), &items, &settings)
            })
            .await?;

            match catalogued {
                Ok(counts) => {
                    summary.subtitles_found += counts.subtitles_found;
                    summary.translations_queued += counts.jobs_created;
                }
                Err(e) => {
                    tracing::error!(source = source.name(), "Failed to record media: {}", e);
                }
            }
        }

        let (completed, failed) = self.drain_pending().await?;
        summary.jobs_completed = completed;
        summary.jobs_failed = failed;

        *self.last_scan.write() = Some(self.clock.now());
        tracing::info!(
            movies = summary.movies_found,
            episodes = summary.episodes_found,
            subtitles = summary.subtitles_found,
            queued = summary.translations_queued,
            completed = summary.jobs_completed,
            failed = summary.jobs_failed,
            "Scan complete"
        );
        Ok(summary)
    }

    async fn translate_media_locked(&self, ids: Vec<MediaId>) -> ScanResult<MediaTranslation> {
        let db = self.db.clone();
        let clock = self.clock.clone();
        let (mut outcome, touched) = tokio::task::spawn_blocking(move || {
            let conn = piratarr_db::pool::get_conn(&db)?;
            let mut outcome = MediaTranslation::default();
            let mut touched = Vec::new();

            for id in ids {
                let Some(entry) = media::get_media(&conn, id)? else {
                    tracing::debug!(media_id = %id, "Skipping unknown media");
                    continue;
                };
                outcome.media_found += 1;

                let subtitles = find_subtitle_files(Path::new(&entry.path));
                let counts = queue_subtitles(
                    &conn,
                    clock.as_ref(),
                    &QueueTarget { id: entry.id, title: &entry.title, kind: entry.media_kind },
                    &subtitles,
                    true,
                )?;
                outcome.subtitles_found += counts.subtitles_found;
                outcome.jobs_created += counts.jobs_created;
                if counts.jobs_created > 0 {
                    touched.push(entry.id);
                }
            }
            Ok::<_, Error>((outcome, touched))
        })
        .await??;

        if outcome.jobs_created > 0 {
            let (completed, failed) = self.drain_pending().await?;
            outcome.jobs_completed = completed;
            outcome.jobs_failed = failed;

            let conn = self.conn()?;
            for id in touched {
                media::set_pirate_subtitle(&conn, id)?;
            }
        }
        Ok(outcome)
    }

    /// Run every pending job in creation order. Returns (completed, failed).
    async fn drain_pending(&self) -> ScanResult<(usize, usize)> {
        let pending = jobs::list_pending_jobs(&*self.conn()?)?;
        if pending.is_empty() {
            return Ok((0, 0));
        }
        tracing::info!(jobs = pending.len(), "Processing pending translations");

        let (mut completed, mut failed) = (0, 0);
        for job in &pending {
            match processor::claim_and_run(&self.db, self.clock.as_ref(), job).await {
                Ok(Some(done)) if done.status == JobStatus::Completed => completed += 1,
                Ok(Some(_)) => failed += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(job_id = %job.id, "Failed to run job: {}", e);
                    failed += 1;
                }
            }
        }
        Ok((completed, failed))
    }

    fn scan_interval(&self) -> Duration {
        let secs = self
            .conn()
            .and_then(|conn| Settings::load(&conn))
            .map(|s| s.scan_interval)
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to read scan interval: {}", e);
                crate::settings::DEFAULT_SCAN_INTERVAL
            });
        Duration::from_secs(secs)
    }
}

async fn run_loop(inner: Arc<Inner>, startup_delay: Duration, cancel: CancellationToken) {
    tokio::select! {
        _ = tokio::time::sleep(startup_delay) => {}
        _ = cancel.cancelled() => { return; }
    }

    loop {
        match inner.try_scan().await {
            Ok(_) => {}
            Err(ScanError::Busy) => {
                tracing::info!("Skipping scheduled scan, another scan is running");
            }
            Err(e) => tracing::error!("Scheduled scan failed: {}", e),
        }

        let interval = inner.scan_interval();
        tracing::debug!("Next scan in {:?}", interval);
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => { break; }
        }
    }

    tracing::info!("Scanner loop exited");
}

#[derive(Debug, Default, Clone, Copy)]
struct QueueCounts {
    subtitles_found: usize,
    jobs_created: usize,
}

struct QueueTarget<'a> {
    id: MediaId,
    title: &'a str,
    kind: MediaKind,
}

/// Record one source's media in the cache and queue their subtitles.
fn catalogue(
    conn: &Connection,
    clock: &dyn Clock,
    items: &[MediaItem],
    settings: &Settings,
) -> piratarr_common::Result<QueueCounts> {
    let mut totals = QueueCounts::default();

    for item in items {
        let local_path = apply_path_mapping(&item.path, &settings.path_mappings);
        let subtitles = find_subtitle_files(Path::new(&local_path));
        let title = item.display_title();

        let entry = media::upsert_media(
            conn,
            item.external_id,
            item.kind,
            &title,
            &local_path,
            !subtitles.is_empty(),
            clock.now(),
        )?;

        let counts = queue_subtitles(
            conn,
            clock,
            &QueueTarget { id: entry.id, title: &title, kind: item.kind },
            &subtitles,
            settings.auto_translate,
        )?;
        totals.subtitles_found += counts.subtitles_found;
        totals.jobs_created += counts.jobs_created;
    }

    Ok(totals)
}

/// Queue a job for each subtitle that has no pirate copy and no active job.
///
/// An existing pirate copy marks the media row instead. With `create` off
/// nothing is queued, but subtitles are still counted.
fn queue_subtitles(
    conn: &Connection,
    clock: &dyn Clock,
    target: &QueueTarget<'_>,
    subtitles: &[PathBuf],
    create: bool,
) -> piratarr_common::Result<QueueCounts> {
    let mut counts = QueueCounts::default();

    for subtitle in subtitles {
        counts.subtitles_found += 1;

        if pirate_output_path(subtitle).exists() {
            media::set_pirate_subtitle(conn, target.id)?;
            continue;
        }

        let source = subtitle.to_string_lossy();
        if jobs::find_active_job_for_source(conn, &source)?.is_some() {
            tracing::debug!(path = %source, "Translation already queued");
            continue;
        }

        if create {
            let job = jobs::create_job(
                conn,
                target.title,
                target.kind,
                &source,
                JobStatus::Pending,
                clock.now(),
            )?;
            tracing::debug!(job_id = %job.id, path = %source, "Queued translation");
            counts.jobs_created += 1;
        }
    }

    Ok(counts)
}
