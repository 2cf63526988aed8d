// ── Local wall-clock editing of schedule timestamps ──
//
// Schedules are stored as absolute UTC instants but shown and typed as
// zone-less local date-times (`YYYY-MM-DDTHH:MM`). Display shifts the
// instant by the local UTC offset; parsing reinterprets the zone-less text
// as local time and converts back to UTC.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::CoreError;

/// Zone-less format used for display and input.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const ACCEPTED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Render an instant as zone-less wall-clock text in `tz`.
pub fn to_local_input<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String {
    at.with_timezone(tz)
        .naive_local()
        .format(INPUT_FORMAT)
        .to_string()
}

/// Interpret zone-less wall-clock text in `tz` and return the UTC instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// times skipped by a DST jump are rejected.
pub fn from_local_input<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Utc>, CoreError> {
    let trimmed = input.trim();
    let naive = ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            CoreError::validation(format!(
                "invalid date/time {trimmed:?} (expected YYYY-MM-DDTHH:MM)"
            ))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            CoreError::validation(format!("{trimmed} does not exist in the local time zone"))
        })
}

/// [`to_local_input`] in the machine's time zone.
pub fn display_local(at: DateTime<Utc>) -> String {
    to_local_input(at, &Local)
}

/// Wire representation of an instant (`2099-01-01T00:00:00.000Z`).
pub fn to_wire(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
