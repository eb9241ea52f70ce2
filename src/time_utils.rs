use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

/// First day of the calendar month containing `instant` (UTC).
pub fn month_start(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive().with_day(1).unwrap_or(instant.date_naive())
}

/// Shifts a first-of-month date by `months` (negative goes back).
pub fn add_months(first_of_month: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = first_of_month.year() * 12 + first_of_month.month0() as i32 + months;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
