pub mod calculator;

pub use calculator::{DailyTimes, PrayerTimeProvider, SalahProvider, prayer_entries};
