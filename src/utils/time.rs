use chrono::{DateTime, SecondsFormat, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time at the millisecond precision BSON stores.
pub fn now_bson() -> bson::DateTime {
    bson::DateTime::from_chrono(now())
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
