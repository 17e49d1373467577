pub mod countdown;
pub mod method;
pub mod prayer;

pub use countdown::CountdownState;
pub use method::{CalculationMethod, Madhab};
pub use prayer::{PrayerKey, PrayerTimeEntry};
