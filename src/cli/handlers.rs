use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use ramadan_time::config::settings::check_coordinate;
use ramadan_time::config::{FileSettingsStore, Settings, SettingsStore, update_settings};
use ramadan_time::models::{CalculationMethod, CountdownState, Madhab, PrayerKey};
use ramadan_time::prayer_times::{PrayerTimeProvider, prayer_entries};
use ramadan_time::schedule::{AlarmScheduler, SchedulePass, WakeupTable, select_next_prayer};
use ramadan_time::schedule::decision::countdown;
use ramadan_time::utils::format::{format_duration_secs, format_offset, format_time};

use crate::cli::args::ConfigCommands;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Setup wizard ────────────────────────────────────────────────────────────

/// Returns false when the wizard was cancelled.
pub async fn handle_setup(store: &FileSettingsStore, reset: bool) -> Result<bool> {
    let current = store.get().await;
    if !reset && !current.needs_onboarding() {
        println!(
            "Already configured for {}. Use --reset to reconfigure.",
            current.location_name
        );
        return Ok(true);
    }
    crate::cli::setup_tui::run_setup_tui(store, current).await
}

// ─── Times ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TimesEntry {
    prayer: PrayerKey,
    name: &'static str,
    time: DateTime<Local>,
    adjustment_minutes: i32,
}

#[derive(Serialize)]
struct TimesReport<'a> {
    location: &'a str,
    method: CalculationMethod,
    madhab: Madhab,
    date: String,
    prayers: Vec<TimesEntry>,
    countdown: Option<CountdownState>,
}

pub async fn handle_times(
    store: &FileSettingsStore,
    provider: &dyn PrayerTimeProvider,
    json: bool,
) -> Result<()> {
    let settings = store.get().await;
    let now = Local::now();
    let today = now.date_naive();

    let entries = prayer_entries(provider, &settings, today, &PrayerKey::ALL).await;
    let state = countdown(&entries, now);

    if json {
        let report = TimesReport {
            location: &settings.location_name,
            method: settings.method,
            madhab: settings.madhab,
            date: today.format("%Y-%m-%d").to_string(),
            prayers: entries
                .iter()
                .map(|e| TimesEntry {
                    prayer: e.key,
                    name: e.key.display_name(),
                    time: e.time,
                    adjustment_minutes: settings.adjustments.get(e.key),
                })
                .collect(),
            countdown: state,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Serializing prayer times")?
        );
        return Ok(());
    }

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        settings.location_name,
        today.format("%Y-%m-%d")
    );
    println!();

    if entries.is_empty() {
        println_colored!(AMBER, "  Prayer times could not be calculated for this location.");
        println!();
        return Ok(());
    }

    let next_key = select_next_prayer(&entries, now).and_then(|next| {
        entries
            .iter()
            .find(|e| e.time == next.target)
            .map(|e| e.key)
    });

    for entry in &entries {
        let offset = format_offset(settings.adjustments.get(entry.key));
        let line = format!(
            "  {:<10}  {:>8}  {}",
            entry.name,
            format_time(entry.time),
            offset
        );
        if Some(entry.key) == next_key {
            println_colored!(AMBER, "{}  ◀", line);
        } else if entry.time <= now {
            println_colored!(DIM, "{}", line);
        } else {
            println_colored!(BOLD, "{}", line);
        }
    }

    if let Some(state) = state {
        println!();
        println_colored!(
            AMBER,
            "  {}: {}  ({})",
            state.label,
            state,
            format_duration_secs(state.total_seconds() as i64)
        );
    }
    println!();
    Ok(())
}

// ─── Alarms ──────────────────────────────────────────────────────────────────

pub async fn handle_alarms(
    store: Arc<FileSettingsStore>,
    provider: Arc<dyn PrayerTimeProvider>,
) -> Result<()> {
    let scheduler = AlarmScheduler::new(store, provider);
    let mut table = WakeupTable::new();

    println!();
    match scheduler.schedule_prayer_alarms(Local::now(), &mut table).await {
        SchedulePass::Disabled => {
            println_colored!(
                AMBER,
                "  Background alarms are off (no location set or notifications disabled)"
            );
        }
        SchedulePass::Scheduled { prayers, .. } => {
            println_colored!(GOLD, "  Pending wake-ups ({} prayers)", prayers.len());
            println!();
            for (id, when) in table.pending() {
                println!("  {:<18}  {}", id.to_string(), when.format("%Y-%m-%d %H:%M"));
            }
        }
    }
    println!();
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub async fn handle_config(store: &FileSettingsStore, action: ConfigCommands) -> Result<()> {
    let settings = match action {
        ConfigCommands::Show { json } => {
            let settings = store.get().await;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&settings).context("Serializing settings")?
                );
            } else {
                print_settings(&settings, store);
            }
            return Ok(());
        }
        ConfigCommands::Location { name, lat, lng } => {
            anyhow::ensure!(!name.trim().is_empty(), "Location name must not be empty");
            let lat = check_coordinate(lat, 90.0, "latitude").map_err(anyhow::Error::msg)?;
            let lng = check_coordinate(lng, 180.0, "longitude").map_err(anyhow::Error::msg)?;
            update_settings(store, move |s| {
                s.location_name = name.trim().to_string();
                s.latitude = lat;
                s.longitude = lng;
            })
            .await
        }
        ConfigCommands::Method { name } => {
            let method = CalculationMethod::from_str(&name)?;
            update_settings(store, move |s| s.method = method).await
        }
        ConfigCommands::Madhab { name } => {
            let madhab = Madhab::from_str(&name)?;
            update_settings(store, move |s| s.madhab = madhab).await
        }
        ConfigCommands::Adjust { prayer, minutes } => {
            let key = PrayerKey::from_str(&prayer)?;
            update_settings(store, move |s| s.adjustments.set(key, minutes)).await
        }
        ConfigCommands::Notifications { state } => {
            update_settings(store, move |s| s.set_notifications(state.enabled())).await
        }
        ConfigCommands::Popup { state, duration } => {
            update_settings(store, move |s| {
                s.popup_notifications = state.enabled();
                if let Some(minutes) = duration {
                    s.set_popup_duration_minutes(minutes);
                }
            })
            .await
        }
        ConfigCommands::OsNotifications { state } => {
            update_settings(store, move |s| s.os_notifications = state.enabled()).await
        }
    }
    .context("Saving settings")?;

    println_colored!(GREEN, "  ✓ Settings saved");
    print_settings(&settings, store);
    Ok(())
}

fn print_settings(settings: &Settings, store: &FileSettingsStore) {
    let on_off = |b: bool| if b { "on" } else { "off" };

    println!();
    println_colored!(GOLD, "  Settings");
    println_colored!(DIM, "  {}", store.path().display());
    println!();
    let location = if settings.location_name.is_empty() {
        "(not set)"
    } else {
        settings.location_name.as_str()
    };
    println!("  {:<16}  {}", "Location", location);
    println!(
        "  {:<16}  {:.4}, {:.4}",
        "Coordinates", settings.latitude, settings.longitude
    );
    println!("  {:<16}  {}", "Method", settings.method);
    println!("  {:<16}  {}", "Madhab", settings.madhab);
    println!("  {:<16}  {}", "Notifications", on_off(settings.notifications));
    println!(
        "  {:<16}  {} ({} min)",
        "Popup",
        on_off(settings.popup_notifications),
        settings.popup_duration_minutes()
    );
    println!("  {:<16}  {}", "OS alerts", on_off(settings.os_notifications));

    let adjusted: Vec<String> = PrayerKey::ALL
        .iter()
        .filter(|k| settings.adjustments.get(**k) != 0)
        .map(|k| format!("{} {}", k.display_name(), format_offset(settings.adjustments.get(*k))))
        .collect();
    if !adjusted.is_empty() {
        println!("  {:<16}  {}", "Adjustments", adjusted.join(", "));
    }
    println!();
}
