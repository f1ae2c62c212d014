mod profile;
mod record;
mod row;
mod status;

pub use self::profile::{DEFAULT_USERNAME, Profile};
pub use self::record::{DerivedField, NewRecord, RATING_MAX, Record, Updated};
pub use self::status::ReadingStatus;

pub(crate) use self::row::{ProfileRow, RecordRow, path_to_string};
