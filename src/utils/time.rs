use chrono::{DateTime, FixedOffset, TimeZone, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Last millisecond (23:59:59.999) of the calendar day that contains `at`,
/// where the day is reckoned in `offset`.
pub fn end_of_day(at: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local_date = at.with_timezone(&offset).date_naive();
    let last_instant = local_date
        .and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|naive| offset.from_local_datetime(&naive).single());
    match last_instant {
        Some(local) => local.with_timezone(&Utc),
        None => at,
    }
}

/// `10 Jan 2025` style date used by the dashboard summary.
pub fn format_visit_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%d %b %Y").to_string()
}
