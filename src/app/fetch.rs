use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use tracing::warn;

use crate::config::NOT_FOUND_POSTER;

use super::error::LibraryError;
use super::types::MovieMetadata;

const FETCH_TIMEOUT_SECS: u64 = 20;

/// Blocking client for the remote movie-database API. One lookup per cache
/// miss; no retries.
pub struct MetadataClient {
    http: Client,
    host: String,
    api_key: String,
}

impl MetadataClient {
    pub fn new(host: &str, api_key: &str) -> Result<Self, LibraryError> {
        let http = Client::builder()
            .user_agent("movex/metadata")
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .default_headers({
                let mut h = HeaderMap::new();
                h.insert(ACCEPT, HeaderValue::from_static("application/json"));
                h
            })
            .build()?;
        Ok(Self {
            http,
            host: host.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// One GET against the templated endpoint. Any transport failure or a
    /// body that is not JSON returns `None`: the caller skips the file for
    /// this run and caches nothing. A returned body is valid JSON, raw bytes
    /// plus parsed value.
    pub fn lookup(&self, year: &str, query_title: &str) -> Option<(String, Value)> {
        let url = format!(
            "https://{}/?t={}&y={}&apikey={}",
            self.host, query_title, year, self.api_key
        );
        let raw = match self
            .http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
        {
            Ok(body) => body,
            Err(err) => {
                warn!("metadata request failed for {query_title} ({year}): {err}");
                return None;
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Some((raw, value)),
            Err(err) => {
                warn!("metadata response for {query_title} ({year}) is not JSON: {err}");
                None
            }
        }
    }
}

/// Map one response object to record fields.
///
/// A response carrying an `Error` field is the cacheable negative result:
/// the filename-derived title and year stand in, every descriptive field is
/// empty and the poster points at the not-found placeholder.
pub fn build_metadata(
    value: &Value,
    fallback_title: &str,
    fallback_year: &str,
) -> Result<MovieMetadata, LibraryError> {
    if value.get("Error").is_some() {
        return Ok(MovieMetadata {
            title: fallback_title.to_string(),
            year: fallback_year.to_string(),
            poster_url: NOT_FOUND_POSTER.to_string(),
            ..MovieMetadata::default()
        });
    }

    let field = |name: &str| -> String {
        value
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    // Runtime arrives as "<N> min"; the leading integer is the only part kept.
    let runtime_raw = field("Runtime");
    let runtime_minutes = runtime_raw
        .split(' ')
        .next()
        .and_then(|tok| tok.parse::<u32>().ok())
        .ok_or_else(|| LibraryError::MalformedField {
            value: runtime_raw.clone(),
        })?;

    Ok(MovieMetadata {
        title: field("Title"),
        year: field("Year"),
        genre: field("Genre"),
        plot: field("Plot"),
        poster_url: field("Poster"),
        imdb_rating: field("imdbRating"),
        director: field("Director"),
        runtime_minutes,
    })
}
