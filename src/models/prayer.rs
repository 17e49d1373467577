use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the six daily time points, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerKey {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerKey {
    pub const ALL: [PrayerKey; 6] = [
        PrayerKey::Fajr,
        PrayerKey::Sunrise,
        PrayerKey::Dhuhr,
        PrayerKey::Asr,
        PrayerKey::Maghrib,
        PrayerKey::Isha,
    ];

    /// Keys that get a background wake-up. Sunrise is shown on the dashboard
    /// but is not a prayer, so it never gets an OS alarm.
    pub const ALERTING: [PrayerKey; 5] = [
        PrayerKey::Fajr,
        PrayerKey::Dhuhr,
        PrayerKey::Asr,
        PrayerKey::Maghrib,
        PrayerKey::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerKey::Fajr => "fajr",
            PrayerKey::Sunrise => "sunrise",
            PrayerKey::Dhuhr => "dhuhr",
            PrayerKey::Asr => "asr",
            PrayerKey::Maghrib => "maghrib",
            PrayerKey::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerKey::Fajr => "Fajr",
            PrayerKey::Sunrise => "Sunrise",
            PrayerKey::Dhuhr => "Dhuhr",
            PrayerKey::Asr => "Asr",
            PrayerKey::Maghrib => "Maghrib",
            PrayerKey::Isha => "Isha",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PrayerKey::Fajr => "🌙",
            PrayerKey::Sunrise => "🌅",
            PrayerKey::Dhuhr => "☀️",
            PrayerKey::Asr => "🌤️",
            PrayerKey::Maghrib => "🌇",
            PrayerKey::Isha => "🌃",
        }
    }
}

impl std::fmt::Display for PrayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerKey::Fajr),
            "sunrise" | "shuruq" => Ok(PrayerKey::Sunrise),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerKey::Dhuhr),
            "asr" => Ok(PrayerKey::Asr),
            "maghrib" => Ok(PrayerKey::Maghrib),
            "isha" => Ok(PrayerKey::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

/// A prayer's adjusted instant for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrayerTimeEntry {
    pub key: PrayerKey,
    pub name: String,
    pub time: DateTime<Local>,
}

impl PrayerTimeEntry {
    pub fn new(key: PrayerKey, time: DateTime<Local>) -> Self {
        Self {
            key,
            name: key.display_name().to_string(),
            time,
        }
    }
}
