// src/app/types.rs
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One resolved library entry. Cache identity derives from the video file
/// name, not the full path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieRecord {
    pub title: String,
    /// Kept as text; catalog ordering compares the strings.
    pub year: String,
    pub genres: BTreeSet<String>,
    pub plot: String,
    pub poster_url: String,
    pub imdb_rating: String,
    pub director: String,
    pub runtime_minutes: u32,
    pub video_path: PathBuf,
    pub subtitle_path: Option<PathBuf>,
    /// Lowercase title/director tokens plus the year; superset search.
    pub search_tags: BTreeSet<String>,
}

/// Field set pulled from one API response (or its cached copy).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: String,
    pub genre: String,
    pub plot: String,
    pub poster_url: String,
    pub imdb_rating: String,
    pub director: String,
    pub runtime_minutes: u32,
}

/// Catalog sort criteria: one enum mapped to comparison functions instead of
/// one comparator type per ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    YearAsc,
    YearDesc,
    Title,
    RatingAsc,
    RatingDesc,
    RuntimeAsc,
    RuntimeDesc,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YearAsc => "year_asc",
            Self::YearDesc => "year_desc",
            Self::Title => "title",
            Self::RatingAsc => "rating_asc",
            Self::RatingDesc => "rating_desc",
            Self::RuntimeAsc => "runtime_asc",
            Self::RuntimeDesc => "runtime_desc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "year_asc" => Some(Self::YearAsc),
            "year_desc" => Some(Self::YearDesc),
            "title" => Some(Self::Title),
            "rating_asc" => Some(Self::RatingAsc),
            "rating_desc" => Some(Self::RatingDesc),
            "runtime_asc" => Some(Self::RuntimeAsc),
            "runtime_desc" => Some(Self::RuntimeDesc),
            _ => None,
        }
    }
}
