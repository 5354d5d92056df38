//! Gateway timestamp formatting.
//!
//! The gateway expects `YYYYDDMMHHMMSS` (day before month), six zero digits of
//! sub-second precision it ignores, then the UTC offset in minutes as a signed
//! number zero-padded to at least three digits including the sign.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use securepay::timestamp::format_timestamp;
//!
//! let instant = Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap();
//! assert_eq!(format_timestamp(&instant), "20120101000000000000+000");
//! ```

use chrono::{DateTime, Offset, TimeZone};

/// Formats `instant` as a gateway `messageTimestamp`.
///
/// The offset padding never varies with magnitude: `+000`, `+600`, `-030`.
#[must_use]
pub fn format_timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    let offset_minutes = instant.offset().fix().local_minus_utc() / 60;
    format!("{}000000{offset_minutes:+04}", instant.naive_local().format("%Y%d%m%H%M%S"))
}
