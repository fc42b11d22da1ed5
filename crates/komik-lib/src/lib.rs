pub mod error;
pub mod models;

/// Maximum number of entries kept in the reading history
pub const HISTORY_CAP: usize = 50;
/// Local storage key holding the reading history
pub const HISTORY_KEY: &str = "fmc_history";
/// Local storage key holding the bookmarks
pub const BOOKMARKS_KEY: &str = "fmc_bookmarks";
/// Length of an opaque id, a hyphenated uuid
pub const OPAQUE_ID_LEN: usize = 36;

/// Whether a path segment looks like an opaque id rather than a slug
pub fn is_opaque_id(value: &str) -> bool {
    value.len() == OPAQUE_ID_LEN
}
