use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "ramadan-time",
    version,
    author,
    about = "Prayer times, a live countdown and prayer-time alerts in your terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Onboarding wizard (location, calculation method, madhab, alerts)
    Setup {
        /// Reconfigure even if a location is already set
        #[arg(long)]
        reset: bool,
    },
    /// Show today's prayer times and countdown to next prayer
    Times {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the wake-ups the background scheduler would register right now
    Alarms,
    /// Run the background alarm scheduler in the foreground of this shell
    Daemon,
    /// Read or change settings
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set location name and coordinates
    #[command(allow_negative_numbers = true)]
    Location {
        #[arg(long)]
        name: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
    },
    /// Set the calculation method (e.g. MuslimWorldLeague, ISNA, Egyptian)
    Method { name: String },
    /// Set the madhab used for Asr (shafi or hanafi)
    Madhab { name: String },
    /// Shift one prayer by whole minutes (negative moves it earlier)
    #[command(allow_negative_numbers = true)]
    Adjust { prayer: String, minutes: i32 },
    /// Master switch for alerts
    Notifications { state: Toggle },
    /// In-app popup and chime
    Popup {
        state: Toggle,
        /// Minutes the popup stays on screen (1-60)
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Desktop notifications
    OsNotifications { state: Toggle },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}
