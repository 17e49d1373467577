pub mod alarms;
pub mod countdown;
pub mod decision;

pub use alarms::{
    AlarmScheduler, FiredAction, SchedulePass, WakeupId, WakeupRegistrar, WakeupTable,
};
pub use countdown::{CountdownEngine, NotifiedSet};
pub use decision::{
    NextPrayer, countdown_label, is_within_alert_window, next_local_midnight, select_next_prayer,
};
