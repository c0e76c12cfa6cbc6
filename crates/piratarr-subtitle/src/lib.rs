//! # piratarr-subtitle
//!
//! SubRip (`.srt`) parsing and writing plus the pirate-speak translator.
//!
//! The crate is pure: no database, no network, no async. Everything the
//! scanner needs to turn one subtitle file into its pirate counterpart lives
//! here.
//!
//! ## Quick Start
//!
//! ```
//! use piratarr_subtitle::{srt, translate};
//!
//! let doc = srt::parse("1\n00:00:01,000 --> 00:00:04,000\nHello friend.\n");
//! assert_eq!(doc.count(), 1);
//!
//! let pirate = translate::translate_document(&doc, Some(42));
//! assert!(pirate.entries()[0].text.starts_with("Ahoy matey."));
//! assert_eq!(pirate.entries()[0].start, "00:00:01,000");
//! ```
//!
//! ## Output Paths
//!
//! ```
//! use piratarr_subtitle::pirate_output_path;
//! use std::path::Path;
//!
//! let out = pirate_output_path(Path::new("/movies/Alien/Alien.en.srt"));
//! assert_eq!(out, Path::new("/movies/Alien/Alien.pirate.en.srt"));
//! ```

pub mod error;
pub mod output;
pub mod rules;
pub mod srt;
pub mod translate;

pub use error::SubtitleError;
pub use output::{is_pirate_output, pirate_output_path};
pub use srt::{SubtitleDocument, SubtitleEntry};
pub use translate::{translate, translate_document, translate_with_rng};
