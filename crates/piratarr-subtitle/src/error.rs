use std::path::PathBuf;

/// Failure while reading or writing a subtitle file.
///
/// Malformed subtitle content is never an error; the parser drops blocks it
/// cannot understand.
#[derive(Debug, thiserror::Error)]
pub enum SubtitleError {
    #[error("Failed to read subtitle file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write subtitle file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
