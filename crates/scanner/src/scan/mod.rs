pub(crate) mod error;
mod parse;
mod stream;

pub use self::parse::{UNKNOWN_AUTHOR, parse_title_author};
pub use self::stream::{ScanEvent, ScanOptions, scan};

/// Archive extensions the scanner will index (matched case-insensitively,
/// without the dot).
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["cbz", "cbr", "zip", "pdf", "rar", "7z"];

/// Genre assigned to freshly indexed files; filenames carry no genre
/// information so everything starts out unknown.
pub const UNKNOWN_GENRE: &str = "Unknown";
