use serde::{Deserialize, Serialize};

use crate::models::{CalculationMethod, Madhab, PrayerKey};

pub const MIN_POPUP_MINUTES: u32 = 1;
pub const MAX_POPUP_MINUTES: u32 = 60;

/// Range check shared by every place that accepts coordinates. An exact 0
/// is refused because [`Settings::has_coordinates`] reads it as unset.
pub fn check_coordinate(value: f64, bound: f64, what: &str) -> Result<f64, String> {
    if !(-bound..=bound).contains(&value) {
        return Err(format!("The {what} must be between -{bound} and {bound}"));
    }
    if value == 0.0 {
        return Err(format!("A {what} of exactly 0 reads as unset, nudge it slightly"));
    }
    Ok(value)
}

fn default_latitude() -> f64 {
    21.4225
}
fn default_longitude() -> f64 {
    39.8262
}
fn default_popup_duration() -> u32 {
    15
}
fn default_true() -> bool {
    true
}

/// Per-prayer fine-tuning in whole minutes, added to the computed instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    #[serde(default)]
    pub fajr: i32,
    #[serde(default)]
    pub sunrise: i32,
    #[serde(default)]
    pub dhuhr: i32,
    #[serde(default)]
    pub asr: i32,
    #[serde(default)]
    pub maghrib: i32,
    #[serde(default)]
    pub isha: i32,
}

impl Adjustments {
    pub fn get(&self, key: PrayerKey) -> i32 {
        match key {
            PrayerKey::Fajr => self.fajr,
            PrayerKey::Sunrise => self.sunrise,
            PrayerKey::Dhuhr => self.dhuhr,
            PrayerKey::Asr => self.asr,
            PrayerKey::Maghrib => self.maghrib,
            PrayerKey::Isha => self.isha,
        }
    }

    pub fn set(&mut self, key: PrayerKey, minutes: i32) {
        let slot = match key {
            PrayerKey::Fajr => &mut self.fajr,
            PrayerKey::Sunrise => &mut self.sunrise,
            PrayerKey::Dhuhr => &mut self.dhuhr,
            PrayerKey::Asr => &mut self.asr,
            PrayerKey::Maghrib => &mut self.maghrib,
            PrayerKey::Isha => &mut self.isha,
        };
        *slot = minutes;
    }
}

/// The single settings record for this installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default)]
    pub method: CalculationMethod,
    #[serde(default)]
    pub madhab: Madhab,
    /// Master switch for background alarms.
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default)]
    pub popup_notifications: bool,
    #[serde(default = "default_popup_duration")]
    popup_duration_minutes: u32,
    #[serde(default)]
    pub os_notifications: bool,
    /// Empty until onboarding has run.
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub adjustments: Adjustments,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            method: CalculationMethod::default(),
            madhab: Madhab::default(),
            notifications: true,
            popup_notifications: false,
            popup_duration_minutes: default_popup_duration(),
            os_notifications: false,
            location_name: String::new(),
            adjustments: Adjustments::default(),
        }
    }
}

impl Settings {
    pub fn needs_onboarding(&self) -> bool {
        self.location_name.trim().is_empty()
    }

    /// Zero on either axis is treated as "never set".
    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 && self.longitude != 0.0
    }

    pub fn has_location(&self) -> bool {
        !self.needs_onboarding() && self.has_coordinates()
    }

    pub fn popup_duration_minutes(&self) -> u32 {
        self.popup_duration_minutes
            .clamp(MIN_POPUP_MINUTES, MAX_POPUP_MINUTES)
    }

    pub fn set_popup_duration_minutes(&mut self, minutes: u32) {
        self.popup_duration_minutes = minutes.clamp(MIN_POPUP_MINUTES, MAX_POPUP_MINUTES);
    }

    /// Turning the master switch off also silences OS alerts in the
    /// foreground, matching what the settings editor does.
    pub fn set_notifications(&mut self, enabled: bool) {
        self.notifications = enabled;
        if !enabled {
            self.os_notifications = false;
        }
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.popup_duration_minutes = self.popup_duration_minutes();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_check_refuses_zero_and_out_of_range() {
        assert_eq!(check_coordinate(51.5, 90.0, "latitude"), Ok(51.5));
        assert_eq!(check_coordinate(-180.0, 180.0, "longitude"), Ok(-180.0));
        assert!(check_coordinate(0.0, 90.0, "latitude").is_err());
        assert!(check_coordinate(90.5, 90.0, "latitude").is_err());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let settings: Settings = toml::from_str(
            r#"
            location_name = "London"
            latitude = 51.5
            longitude = -0.12

            [adjustments]
            fajr = 2
            "#,
        )
        .unwrap();

        assert_eq!(settings.location_name, "London");
        assert_eq!(settings.method, CalculationMethod::MuslimWorldLeague);
        assert!(settings.notifications);
        assert!(!settings.popup_notifications);
        assert_eq!(settings.popup_duration_minutes(), 15);
        assert_eq!(settings.adjustments.get(PrayerKey::Fajr), 2);
        assert_eq!(settings.adjustments.get(PrayerKey::Isha), 0);
    }

    #[test]
    fn empty_file_is_the_onboarding_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.needs_onboarding());
        assert!(settings.has_coordinates());
        assert!(!settings.has_location());
    }

    #[test]
    fn popup_duration_is_clamped() {
        let mut settings = Settings::default();
        settings.set_popup_duration_minutes(0);
        assert_eq!(settings.popup_duration_minutes(), 1);
        settings.set_popup_duration_minutes(500);
        assert_eq!(settings.popup_duration_minutes(), 60);

        let raw: Settings = toml::from_str("popup_duration_minutes = 90").unwrap();
        assert_eq!(raw.popup_duration_minutes(), 60);
    }

    #[test]
    fn disabling_notifications_disables_os_alerts() {
        let mut settings = Settings::default();
        settings.os_notifications = true;
        settings.set_notifications(false);
        assert!(!settings.notifications);
        assert!(!settings.os_notifications);
    }

    #[test]
    fn zero_coordinate_means_unset() {
        let settings = Settings {
            location_name: "Null Island".to_string(),
            latitude: 0.0,
            longitude: 12.0,
            ..Settings::default()
        };
        assert!(!settings.has_coordinates());
        assert!(!settings.has_location());
    }
}
