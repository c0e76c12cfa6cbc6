//! Piratarr-Common: Shared types, IDs, and errors.
//!
//! This crate provides functionality used across the piratarr crates:
//!
//! - **Typed IDs**: UUID wrappers for translation jobs and cached media
//! - **Core Types**: Media kinds and the job lifecycle status
//! - **Clock**: An injectable time source for the scanner
//! - **Error Handling**: The unified error type and result alias
//!
//! # Examples
//!
//! ```
//! use piratarr_common::{Error, JobId, JobStatus, Result};
//!
//! let id = JobId::new();
//! assert!(JobStatus::Pending.is_active());
//!
//! fn lookup(id: JobId) -> Result<()> {
//!     Err(Error::not_found("job", id))
//! }
//! assert!(lookup(id).is_err());
//! ```

pub mod clock;
pub mod error;
pub mod ids;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
