pub mod settings;
pub mod store;

pub use settings::{Adjustments, Settings};
pub use store::{FileSettingsStore, SettingsStore, update_settings};
