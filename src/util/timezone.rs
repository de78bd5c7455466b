use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

pub fn localized_datetime(time: OffsetDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    let utc = time.to_offset(UtcOffset::UTC);
    let seconds = utc.unix_timestamp();
    let nanos: u32 = utc.nanosecond();
    let datetime_utc = DateTime::<Utc>::from_timestamp(seconds, nanos)
        .or_else(|| DateTime::<Utc>::from_timestamp(seconds, 0))?;
    Some(tz.from_utc_datetime(&datetime_utc.naive_utc()))
}

/// Short Japanese-locale calendar date (`2024/5/1`) in `tz`.
pub fn display_date(time: OffsetDateTime, tz: Tz) -> String {
    match localized_datetime(time, tz) {
        Some(local) => format!("{}/{}/{}", local.year(), local.month(), local.day()),
        None => {
            let utc = time.to_offset(UtcOffset::UTC);
            format!("{}/{}/{}", utc.year(), u8::from(utc.month()), utc.day())
        }
    }
}

/// RFC 3339 UTC timestamp for machine-readable `datetime` attributes.
pub fn machine_datetime(time: OffsetDateTime) -> String {
    time.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .unwrap_or_default()
}
