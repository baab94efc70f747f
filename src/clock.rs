//! Wall-clock and process identity helpers for record headers.
//!
//! Timestamps are local time with millisecond precision and always render to
//! the same width, so headers line up when the log is read in a pager.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Local};

/// Layout of every header timestamp: `2024-05-01 13:07:42.031`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Width in bytes of a formatted timestamp.
pub const TIMESTAMP_WIDTH: usize = 23;

/// Formats the current local time.
///
/// # Examples
///
/// ```
/// # use pixlog::clock::{format_now, TIMESTAMP_WIDTH};
/// let ts = format_now();
/// assert_eq!(ts.len(), TIMESTAMP_WIDTH);
/// ```
pub fn format_now() -> String {
    format_timestamp(&Local::now())
}

/// Formats a given instant with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Id of the current process.
#[inline(always)]
pub fn process_id() -> u32 {
    std::process::id()
}

/// Short tag for the current thread: the low 16 bits of its id's hash.
///
/// Stable for the lifetime of a thread, and distinct threads usually (not
/// always) get distinct tags.
pub fn thread_tag() -> u16 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish() as u16
}
