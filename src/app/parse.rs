use once_cell::sync::Lazy;
use regex::Regex;

/// `"<4-digit year> - <title>.<3-char ext>"`; anything else is skipped.
static FILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4}) - (.*)\.[A-Za-z0-9]{3}$").unwrap());

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedName {
    pub year: String,
    /// Display title, spaces kept.
    pub title: String,
    /// Title with spaces replaced by `+` for the query string.
    pub query_title: String,
}

pub fn parse_file_name(name: &str) -> Option<ParsedName> {
    let caps = FILE_PATTERN.captures(name)?;
    let year = caps.get(1)?.as_str().to_string();
    let title = caps.get(2)?.as_str().to_string();
    let query_title = title.replace(' ', "+");
    Some(ParsedName {
        year,
        title,
        query_title,
    })
}
