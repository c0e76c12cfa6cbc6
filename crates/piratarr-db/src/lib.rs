//! Piratarr-DB: Database schema, migrations, and query operations
//!
//! SQLite via rusqlite with r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Embedded schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database rows
//! - `queries` - Translation jobs, media cache, and the config key/value store
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use piratarr_common::{JobStatus, MediaKind};
//! use piratarr_db::pool::{get_conn, init_pool};
//! use piratarr_db::queries::jobs;
//!
//! let pool = init_pool("/config/piratarr.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let job = jobs::create_job(
//!     &conn,
//!     "Alien (1979)",
//!     MediaKind::Movie,
//!     "/movies/Alien/Alien.en.srt",
//!     JobStatus::Pending,
//!     Utc::now(),
//! )
//! .unwrap();
//! println!("Queued job {}", job.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
