use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use log::{debug, warn};
use salah::prelude::{
    Configuration, Coordinates, Madhab as SalahMadhab, Method, Prayer, PrayerSchedule,
};

use crate::config::Settings;
use crate::error::ProviderError;
use crate::models::{CalculationMethod, Madhab, PrayerKey, PrayerTimeEntry};

/// The six unadjusted instants for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTimes {
    pub fajr: DateTime<Local>,
    pub sunrise: DateTime<Local>,
    pub dhuhr: DateTime<Local>,
    pub asr: DateTime<Local>,
    pub maghrib: DateTime<Local>,
    pub isha: DateTime<Local>,
}

impl DailyTimes {
    pub fn get(&self, key: PrayerKey) -> DateTime<Local> {
        match key {
            PrayerKey::Fajr => self.fajr,
            PrayerKey::Sunrise => self.sunrise,
            PrayerKey::Dhuhr => self.dhuhr,
            PrayerKey::Asr => self.asr,
            PrayerKey::Maghrib => self.maghrib,
            PrayerKey::Isha => self.isha,
        }
    }
}

/// Astronomical calculator: coordinates + method + date in, six instants out.
#[async_trait]
pub trait PrayerTimeProvider: Send + Sync {
    async fn compute(
        &self,
        latitude: f64,
        longitude: f64,
        method: CalculationMethod,
        madhab: Madhab,
        date: NaiveDate,
    ) -> Result<DailyTimes, ProviderError>;
}

/// Offline calculation backed by the `salah` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalahProvider;

#[async_trait]
impl PrayerTimeProvider for SalahProvider {
    async fn compute(
        &self,
        latitude: f64,
        longitude: f64,
        method: CalculationMethod,
        madhab: Madhab,
        date: NaiveDate,
    ) -> Result<DailyTimes, ProviderError> {
        let params = Configuration::with(salah_method(method), salah_madhab(madhab));

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(Coordinates::new(latitude, longitude))
            .with_configuration(params)
            .calculate()
            .map_err(|e| ProviderError::Calculation(e.to_string()))?;

        let local = |utc: DateTime<Utc>| utc.with_timezone(&Local);

        Ok(DailyTimes {
            fajr: local(times.time(Prayer::Fajr)),
            sunrise: local(times.time(Prayer::Sunrise)),
            dhuhr: local(times.time(Prayer::Dhuhr)),
            asr: local(times.time(Prayer::Asr)),
            maghrib: local(times.time(Prayer::Maghrib)),
            isha: local(times.time(Prayer::Isha)),
        })
    }
}

/// Computes the adjusted entries for `keys` on `date`, sorted by time.
///
/// A failing provider yields an empty list: callers show no countdown and
/// register no prayer wake-ups until the next recomputation.
pub async fn prayer_entries(
    provider: &dyn PrayerTimeProvider,
    settings: &Settings,
    date: NaiveDate,
    keys: &[PrayerKey],
) -> Vec<PrayerTimeEntry> {
    let times = match provider
        .compute(
            settings.latitude,
            settings.longitude,
            settings.method,
            settings.madhab,
            date,
        )
        .await
    {
        Ok(times) => times,
        Err(e) => {
            warn!("no prayer times for {}: {}", date, e);
            return Vec::new();
        }
    };

    let mut entries: Vec<PrayerTimeEntry> = keys
        .iter()
        .map(|&key| {
            let offset = Duration::minutes(settings.adjustments.get(key) as i64);
            PrayerTimeEntry::new(key, times.get(key) + offset)
        })
        .collect();
    entries.sort_by_key(|e| e.time);
    debug!("computed {} prayer times for {}", entries.len(), date);
    entries
}

fn salah_method(method: CalculationMethod) -> Method {
    match method {
        CalculationMethod::MuslimWorldLeague => Method::MuslimWorldLeague,
        CalculationMethod::NorthAmerica => Method::NorthAmerica,
        CalculationMethod::Egyptian => Method::Egyptian,
        CalculationMethod::Karachi => Method::Karachi,
        CalculationMethod::UmmAlQura => Method::UmmAlQura,
        CalculationMethod::Dubai => Method::Dubai,
        CalculationMethod::MoonsightingCommittee => Method::MoonsightingCommittee,
        CalculationMethod::Kuwait => Method::Kuwait,
        CalculationMethod::Qatar => Method::Qatar,
        CalculationMethod::Singapore => Method::Singapore,
        CalculationMethod::Tehran => Method::Tehran,
        CalculationMethod::Turkey => Method::Turkey,
    }
}

fn salah_madhab(madhab: Madhab) -> SalahMadhab {
    match madhab {
        Madhab::Shafi => SalahMadhab::Shafi,
        Madhab::Hanafi => SalahMadhab::Hanafi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};

    #[tokio::test]
    async fn salah_returns_six_ordered_times() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let times = SalahProvider
            .compute(51.5, -0.12, CalculationMethod::MuslimWorldLeague, Madhab::Shafi, date)
            .await
            .unwrap();

        let ordered: Vec<_> = PrayerKey::ALL.iter().map(|&k| times.get(k)).collect();
        assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    }

    struct FixedProvider;

    #[async_trait]
    impl PrayerTimeProvider for FixedProvider {
        async fn compute(
            &self,
            _latitude: f64,
            _longitude: f64,
            _method: CalculationMethod,
            _madhab: Madhab,
            date: NaiveDate,
        ) -> Result<DailyTimes, ProviderError> {
            let at = |h, m| {
                Local
                    .from_local_datetime(&date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap()))
                    .unwrap()
            };
            Ok(DailyTimes {
                fajr: at(5, 0),
                sunrise: at(6, 30),
                dhuhr: at(12, 15),
                asr: at(15, 0),
                maghrib: at(17, 45),
                isha: at(19, 15),
            })
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl PrayerTimeProvider for BrokenProvider {
        async fn compute(
            &self,
            _latitude: f64,
            _longitude: f64,
            _method: CalculationMethod,
            _madhab: Madhab,
            _date: NaiveDate,
        ) -> Result<DailyTimes, ProviderError> {
            Err(ProviderError::Calculation("polar night".to_string()))
        }
    }

    #[tokio::test]
    async fn adjustments_shift_each_prayer() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let mut settings = Settings::default();
        settings.adjustments.set(PrayerKey::Fajr, 2);
        settings.adjustments.set(PrayerKey::Isha, -5);

        let entries = prayer_entries(&FixedProvider, &settings, date, &PrayerKey::ALL).await;

        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].key, PrayerKey::Fajr);
        assert_eq!(entries[0].time.time(), NaiveTime::from_hms_opt(5, 2, 0).unwrap());
        assert_eq!(entries[5].time.time(), NaiveTime::from_hms_opt(19, 10, 0).unwrap());
    }

    #[tokio::test]
    async fn large_adjustment_keeps_list_sorted() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let mut settings = Settings::default();
        settings.adjustments.set(PrayerKey::Sunrise, -120);

        let entries = prayer_entries(&FixedProvider, &settings, date, &PrayerKey::ALL).await;

        assert_eq!(entries[0].key, PrayerKey::Sunrise);
        assert!(entries.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty_list() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let entries =
            prayer_entries(&BrokenProvider, &Settings::default(), date, &PrayerKey::ALL).await;
        assert!(entries.is_empty());
    }
}
