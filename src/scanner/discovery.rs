//! Locate subtitle files that belong to a media file.

use piratarr_subtitle::is_pirate_output;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Subdirectory some release groups use for subtitles
const SUBS_DIR: &str = "Subs";

/// Find `.srt` files for the media file at `media_path`.
///
/// Matches files next to the media whose name starts with the media's base
/// name, plus every `.srt` in a sibling `Subs` directory. Pirate outputs are
/// never returned. A missing directory yields an empty list.
pub fn find_subtitle_files(media_path: &Path) -> Vec<PathBuf> {
    let Some(media_dir) = media_path.parent().filter(|d| d.is_dir()) else {
        debug!("Media directory missing for {:?}", media_path);
        return Vec::new();
    };
    let media_base = media_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut found: Vec<PathBuf> = srt_files_in(media_dir)
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(&media_base))
        })
        .collect();

    let subs_dir = media_dir.join(SUBS_DIR);
    if subs_dir.is_dir() {
        found.extend(srt_files_in(&subs_dir));
    }

    found.sort();
    found
}

fn srt_files_in(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.to_lowercase().ends_with(".srt") && !is_pirate_output(&name)
        })
        .map(|e| e.into_path())
}
