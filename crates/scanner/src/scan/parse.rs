//! Filename metadata heuristics.
//!
//! Archive filenames are the only metadata source we have (the archives
//! themselves are never opened), so titles and authors are guessed from the
//! common naming conventions: `Title - Author`, `Title by Author` and
//! `Title (Author)`.

/// Author used when no naming convention matches.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Derive `(title, author)` from a filename stem (no extension).
///
/// Rules are tried in order and the first match wins:
/// 1. `" - "`: split on the first occurrence.
/// 2. `" by "`: split on the first occurrence.
/// 3. `Title (Author)`: text before the first `(`, author between the
///    parentheses, provided `(` comes before `)`.
/// 4. Anything else: the whole stem is the title, author is unknown.
///
/// All parts are trimmed of surrounding whitespace.
pub fn parse_title_author(stem: &str) -> (String, String) {
    if let Some((title, author)) = stem.split_once(" - ") {
        return (title.trim().to_string(), author.trim().to_string());
    }
    if let Some((title, author)) = stem.split_once(" by ") {
        return (title.trim().to_string(), author.trim().to_string());
    }
    if let (Some(open), Some(close)) = (stem.find('('), stem.find(')'))
        && open < close
    {
        let title = stem[..open].trim();
        let author = stem[open + 1..close].trim();
        return (title.to_string(), author.to_string());
    }
    (stem.trim().to_string(), UNKNOWN_AUTHOR.to_string())
}
