use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use super::parse::ParsedName;
use super::types::{MovieMetadata, MovieRecord};

/// Split the comma-separated genre field into a set. Negative results carry
/// an empty field and yield the empty set.
fn split_genres(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase word tokens of title and director plus the year, punctuation
/// trimmed off the edges.
fn search_tags(title: &str, director: &str, year: &str) -> BTreeSet<String> {
    let mut tags: BTreeSet<String> = title
        .split_whitespace()
        .chain(director.split_whitespace())
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    tags.insert(year.to_string());
    tags
}

/// Combine parser output, resolved metadata and the subtitle index into a
/// record. Pure, no I/O; the subtitle lookup key is the lowercased, trimmed
/// parsed title against extension-stripped subtitle stems.
pub fn build_record(
    video_path: &Path,
    parsed: &ParsedName,
    meta: MovieMetadata,
    subtitles: &HashMap<String, PathBuf>,
) -> MovieRecord {
    let subtitle_path = subtitles.get(&parsed.title.trim().to_lowercase()).cloned();
    let search_tags = search_tags(&meta.title, &meta.director, &meta.year);
    MovieRecord {
        title: meta.title,
        year: meta.year,
        genres: split_genres(&meta.genre),
        plot: meta.plot,
        poster_url: meta.poster_url,
        imdb_rating: meta.imdb_rating,
        director: meta.director,
        runtime_minutes: meta.runtime_minutes,
        video_path: video_path.to_path_buf(),
        subtitle_path,
        search_tags,
    }
}
