//! Where translated subtitles are written.
//!
//! Media players pick the subtitle language from the last dotted segments
//! of the file name, so `.pirate` goes in front of any English language
//! marker instead of after it.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `.en`, `.eng` or `.english`, optionally followed by one subtitle tag.
static LANGUAGE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\.(en|eng|english))(\.(hi|sdh|forced|cc|default))?$")
        .expect("Invalid language suffix regex")
});

const PIRATE_MARKER: &str = ".pirate";

/// Output path for the pirate translation of `source`, in the same directory.
///
/// `Movie.srt` becomes `Movie.pirate.srt`, `Movie.en.srt` becomes
/// `Movie.pirate.en.srt` and `S01E01.en.sdh.srt` becomes
/// `S01E01.pirate.en.sdh.srt`.
pub fn pirate_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let name = match LANGUAGE_SUFFIX.find(&stem) {
        Some(m) => format!(
            "{}{PIRATE_MARKER}{}{extension}",
            &stem[..m.start()],
            &stem[m.start()..]
        ),
        None => format!("{stem}{PIRATE_MARKER}{extension}"),
    };

    source.with_file_name(name)
}

/// Whether a file name already carries the pirate marker.
pub fn is_pirate_output(file_name: &str) -> bool {
    file_name.to_lowercase().contains(".pirate.")
}
