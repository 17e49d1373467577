//! Prayer-time countdown and alert scheduling.
//!
//! The foreground [`schedule::CountdownEngine`] drives the dashboard countdown and
//! in-app alerts; the background [`schedule::AlarmScheduler`] keeps a table of
//! wake-ups so OS notifications fire with no dashboard open. Both read the same
//! [`config::SettingsStore`] and [`prayer_times::PrayerTimeProvider`].

pub mod alerts;
pub mod config;
pub mod daemon;
pub mod error;
pub mod models;
pub mod prayer_times;
pub mod schedule;
pub mod utils;
