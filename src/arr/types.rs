use piratarr_common::MediaKind;
use serde::Deserialize;

/// A movie or episode with a file on disk, as reported by Radarr/Sonarr.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub title: String,
    pub year: Option<i32>,
    /// Media file path as the *arr instance sees it
    pub path: String,
    pub kind: MediaKind,
    /// Movie or episode id in the *arr instance
    pub external_id: i64,
    pub series_title: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
}

impl MediaItem {
    pub fn movie(external_id: i64, title: impl Into<String>, year: Option<i32>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year,
            path: path.into(),
            kind: MediaKind::Movie,
            external_id,
            series_title: None,
            season_number: None,
            episode_number: None,
        }
    }

    pub fn episode(
        external_id: i64,
        series_title: impl Into<String>,
        season_number: i32,
        episode_number: i32,
        title: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year: None,
            path: path.into(),
            kind: MediaKind::Episode,
            external_id,
            series_title: Some(series_title.into()),
            season_number: Some(season_number),
            episode_number: Some(episode_number),
        }
    }

    /// `"Series S01E02 - Title"` for episodes, `"Title (Year)"` for movies.
    pub fn display_title(&self) -> String {
        if self.kind == MediaKind::Episode {
            if let Some(series) = &self.series_title {
                return format!(
                    "{} S{:02}E{:02} - {}",
                    series,
                    self.season_number.unwrap_or(0),
                    self.episode_number.unwrap_or(0),
                    self.title
                );
            }
        }
        match self.year {
            Some(year) if year > 0 => format!("{} ({})", self.title, year),
            _ => self.title.clone(),
        }
    }
}

/// Entry from Radarr `GET /api/v3/movie`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrMovie {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub has_file: bool,
    pub movie_file: Option<RadarrMovieFile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrMovieFile {
    pub id: Option<i64>,
    pub path: Option<String>,
}

/// Entry from Sonarr `GET /api/v3/series`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeries {
    pub id: i64,
    pub title: String,
}

/// Entry from Sonarr `GET /api/v3/episode?seriesId=`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrEpisode {
    pub id: i64,
    pub title: Option<String>,
    #[serde(default)]
    pub season_number: i32,
    #[serde(default)]
    pub episode_number: i32,
    #[serde(default)]
    pub has_file: bool,
    pub episode_file_id: Option<i64>,
}

/// Entry from Sonarr `GET /api/v3/episodefile?seriesId=`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrEpisodeFile {
    pub id: i64,
    pub path: Option<String>,
}
