use time::UtcDateTime;
use time::macros::format_description;

/// Default username for a freshly initialised profile.
pub const DEFAULT_USERNAME: &str = "Otaku";

/// The single per-installation user record.
///
/// Exactly one row exists; it is created lazily on first access and only
/// reset by a full catalog reset. Aggregate reading statistics are *not*
/// part of the profile; they are derived from the records table on demand
/// (see the views crate).
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub username: String,
    /// Set once when the profile row is first created; immutable afterwards.
    pub member_since: UtcDateTime,
}

impl Profile {
    /// Membership date formatted as `dd/mm/yyyy`.
    pub fn member_since_text(&self) -> String {
        let format = format_description!("[day]/[month]/[year]");
        // The format description is static and only uses date components,
        // so formatting cannot fail.
        self.member_since.format(&format).unwrap_or_default()
    }
}
