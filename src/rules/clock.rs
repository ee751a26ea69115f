//! Time normalization against a fixed IANA zone.
//!
//! Every date decision in the tracker goes through [`LocalClock`] so the
//! behavior is deployment-independent: the host OS timezone is never
//! consulted, and offsets are resolved per-date (DST and historical
//! transitions included) rather than hard-coded.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::TickError;

/// Local calendar fields of an instant in the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl LocalParts {
    /// Canonical local date string, `YYYY-MM-DD` with zero padding.
    pub fn date_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    tz: Tz,
}

impl LocalClock {
    pub fn new(name: &str) -> Result<Self, TickError> {
        let tz = name
            .parse::<Tz>()
            .map_err(|_| TickError::InvalidTimezone(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn zone_name(&self) -> &'static str {
        self.tz.name()
    }

    pub fn local_parts(&self, instant: DateTime<Utc>) -> LocalParts {
        let local = instant.with_timezone(&self.tz);
        LocalParts {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
        }
    }

    pub fn local_date_string(&self, instant: DateTime<Utc>) -> String {
        self.local_parts(instant).date_string()
    }

    /// Inverse conversion: the absolute instant of a wall-clock time on the
    /// local calendar date carried by `parts`. Ambiguous local times (DST
    /// fold) resolve to the earlier occurrence; nonexistent ones (DST gap)
    /// fall back to interpreting the naive time as UTC.
    ///
    /// Returns `None` only for out-of-range calendar fields.
    pub fn instant_at(
        &self,
        parts: &LocalParts,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<DateTime<Utc>> {
        let naive = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day)?
            .and_hms_opt(hour, minute, second)?;
        let instant = match self.tz.from_local_datetime(&naive).single() {
            Some(dt) => dt.with_timezone(&Utc),
            None => self
                .tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc()),
        };
        Some(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_zone_name() {
        let result = LocalClock::new("Not/AZone");
        assert!(matches!(result, Err(TickError::InvalidTimezone(name)) if name == "Not/AZone"));
    }

    #[test]
    fn local_parts_in_phnom_penh() {
        // Phnom Penh is UTC+7 year round.
        let clock = LocalClock::new("Asia/Phnom_Penh").unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 0, 54, 59).unwrap();
        let parts = clock.local_parts(instant);
        assert_eq!(
            parts,
            LocalParts {
                year: 2024,
                month: 3,
                day: 1,
                hour: 7,
                minute: 54,
                second: 59,
            }
        );
        assert_eq!(parts.date_string(), "2024-03-01");
    }

    #[test]
    fn date_string_is_zero_padded() {
        let clock = LocalClock::new("Asia/Phnom_Penh").unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        assert_eq!(clock.local_date_string(instant), "2024-03-04");
    }

    #[test]
    fn date_rolls_over_at_local_midnight() {
        let clock = LocalClock::new("Asia/Phnom_Penh").unwrap();
        // 17:30 UTC is already 00:30 the next day in UTC+7.
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 17, 30, 0).unwrap();
        assert_eq!(clock.local_date_string(instant), "2024-03-01");
    }

    #[test]
    fn instant_at_reconstructs_wall_clock_time() {
        let clock = LocalClock::new("Asia/Phnom_Penh").unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap();
        let parts = clock.local_parts(instant);
        assert_eq!(parts.hour, 8);
        let rebuilt = clock.instant_at(&parts, 8, 0, 0).unwrap();
        assert_eq!(rebuilt, instant);
    }

    #[test]
    fn instant_at_uses_per_date_offset() {
        let clock = LocalClock::new("Europe/Berlin").unwrap();

        // Before the spring transition Berlin is UTC+1.
        let winter = clock.local_parts(Utc.with_ymd_and_hms(2026, 3, 28, 0, 0, 0).unwrap());
        let noon_winter = clock.instant_at(&winter, 12, 0, 0).unwrap();
        assert_eq!(noon_winter, Utc.with_ymd_and_hms(2026, 3, 28, 11, 0, 0).unwrap());

        // After it, UTC+2: same wall-clock time, different offset.
        let summer = clock.local_parts(Utc.with_ymd_and_hms(2026, 3, 30, 12, 0, 0).unwrap());
        let noon_summer = clock.instant_at(&summer, 12, 0, 0).unwrap();
        assert_eq!(noon_summer, Utc.with_ymd_and_hms(2026, 3, 30, 10, 0, 0).unwrap());
    }

    #[test]
    fn instant_at_rejects_out_of_range_fields() {
        let clock = LocalClock::new("Asia/Phnom_Penh").unwrap();
        let parts = clock.local_parts(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(clock.instant_at(&parts, 24, 0, 0), None);
        assert_eq!(clock.instant_at(&parts, 12, 60, 0), None);
    }
}
