use serde::Serialize;

/// What the countdown panel shows for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownState {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub label: String,
    pub target_prayer: String,
}

impl CountdownState {
    pub fn from_total_seconds(total: u64, label: String, target_prayer: String) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
            label,
            target_prayer,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl std::fmt::Display for CountdownState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
