use chrono::{Datelike, NaiveDate};
use hijri_date::HijriDate;

const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

/// "3 Ramadan 1447" for the given Gregorian date, or `None` when the date is
/// outside the converter's range.
pub fn hijri_string(date: NaiveDate) -> Option<String> {
    let hd = HijriDate::from_gr(
        date.year() as usize,
        date.month() as usize,
        date.day() as usize,
    )
    .ok()?;
    let month = HIJRI_MONTH_NAMES.get(hd.month().checked_sub(1)?)?;
    Some(format!("{} {} {}", hd.day(), month, hd.year()))
}
