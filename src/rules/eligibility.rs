//! The slot-timing rule: "can this employee tick this slot right now".
//!
//! Pure compute, no I/O. The rule only decides timing permission;
//! uniqueness of the resulting tick is the store's job.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::error::TickError;
use crate::model::slot::{SlotCatalog, parse_slot_key};
use crate::rules::clock::{LocalClock, LocalParts};

/// Date-level allow policy. Deployments may restrict by weekday or holiday;
/// the shipped policy accepts every day.
pub type DateAllowFn = Arc<dyn Fn(DateTime<Utc>, &LocalParts) -> bool + Send + Sync>;

pub fn allow_every_day() -> DateAllowFn {
    Arc::new(|_, _| true)
}

/// The absolute window for a slot on one local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    /// Opening of the early window, `slot_instant - early_minutes`.
    pub earliest: DateTime<Utc>,
    /// The slot's nominal local time resolved to an absolute instant.
    pub slot_instant: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TickRules {
    catalog: SlotCatalog,
    clock: LocalClock,
    early_minutes: i64,
    date_allow: DateAllowFn,
}

impl TickRules {
    pub fn new(
        catalog: SlotCatalog,
        clock: LocalClock,
        early_minutes: i64,
        date_allow: DateAllowFn,
    ) -> Self {
        Self {
            catalog,
            clock,
            early_minutes,
            date_allow,
        }
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    pub fn clock(&self) -> &LocalClock {
        &self.clock
    }

    pub fn early_minutes(&self) -> i64 {
        self.early_minutes
    }

    pub fn date_allowed(&self, now: DateTime<Utc>) -> bool {
        let parts = self.clock.local_parts(now);
        (self.date_allow)(now, &parts)
    }

    /// Decide whether `slot` may be ticked at `now`.
    ///
    /// Allowed from `early_minutes` before the slot's wall-clock time
    /// (boundary inclusive) with no late cutoff. Rejections carry the
    /// window so callers can report when the slot opens.
    pub fn check(&self, now: DateTime<Utc>, slot: &str) -> Result<SlotWindow, TickError> {
        let (hour, minute) = self
            .catalog
            .get(slot)
            .and_then(|s| parse_slot_key(&s.key))
            .ok_or_else(|| TickError::UnknownSlot(slot.to_string()))?;

        let parts = self.clock.local_parts(now);
        if !(self.date_allow)(now, &parts) {
            return Err(TickError::DateNotAllowed);
        }

        let slot_instant = self
            .clock
            .instant_at(&parts, hour, minute, 0)
            .ok_or_else(|| TickError::UnknownSlot(slot.to_string()))?;
        let earliest = slot_instant - Duration::minutes(self.early_minutes);

        if now >= earliest {
            Ok(SlotWindow {
                earliest,
                slot_instant,
            })
        } else {
            Err(TickError::TooEarly {
                earliest,
                slot_instant,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn rules_with(date_allow: DateAllowFn) -> TickRules {
        let clock = LocalClock::new("Asia/Phnom_Penh").unwrap();
        TickRules::new(SlotCatalog::default_catalog(), clock, 5, date_allow)
    }

    fn rules() -> TickRules {
        rules_with(allow_every_day())
    }

    /// 08:00 local in Phnom Penh (UTC+7) is 01:00 UTC.
    fn utc_at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, second).unwrap()
    }

    #[test]
    fn too_early_one_second_before_window() {
        // Local 07:54:59 for the 08:00 slot.
        let err = rules().check(utc_at(0, 54, 59), "08:00").unwrap_err();
        match err {
            TickError::TooEarly {
                earliest,
                slot_instant,
            } => {
                assert_eq!(earliest, utc_at(0, 55, 0));
                assert_eq!(slot_instant, utc_at(1, 0, 0));
            }
            other => panic!("expected TooEarly, got {other:?}"),
        }
    }

    #[test]
    fn window_opens_exactly_at_boundary() {
        // Local 07:55:00, boundary inclusive.
        let window = rules().check(utc_at(0, 55, 0), "08:00").unwrap();
        assert_eq!(window.earliest, utc_at(0, 55, 0));
        assert_eq!(window.slot_instant, utc_at(1, 0, 0));
    }

    #[test]
    fn no_late_cutoff() {
        // Local 08:30:00 and even hours later stay allowed.
        assert!(rules().check(utc_at(1, 30, 0), "08:00").is_ok());
        assert!(rules().check(utc_at(16, 0, 0), "08:00").is_ok());
    }

    #[test]
    fn every_catalog_slot_honors_the_early_window() {
        let rules = rules();
        for slot in rules.catalog().slots().to_vec() {
            let (hour, minute) = parse_slot_key(&slot.key).unwrap();
            let parts = rules.clock().local_parts(utc_at(1, 0, 0));
            let slot_instant = rules.clock().instant_at(&parts, hour, minute, 0).unwrap();
            let earliest = slot_instant - Duration::minutes(5);

            assert!(matches!(
                rules.check(earliest - Duration::seconds(1), &slot.key),
                Err(TickError::TooEarly { .. })
            ));
            assert!(rules.check(earliest, &slot.key).is_ok());
            assert!(rules.check(slot_instant, &slot.key).is_ok());
        }
    }

    #[test]
    fn unknown_slot_is_rejected_before_timing() {
        let err = rules().check(utc_at(1, 0, 0), "09:99").unwrap_err();
        assert!(matches!(err, TickError::UnknownSlot(slot) if slot == "09:99"));
    }

    #[test]
    fn date_allow_predicate_is_consulted() {
        let closed = rules_with(Arc::new(|_, _| false));
        let err = closed.check(utc_at(1, 0, 0), "08:00").unwrap_err();
        assert!(matches!(err, TickError::DateNotAllowed));
        assert!(!closed.date_allowed(utc_at(1, 0, 0)));
        assert!(rules().date_allowed(utc_at(1, 0, 0)));
    }

    #[test]
    fn predicate_sees_local_calendar_fields() {
        // Reject weekends based on the local date, not the UTC one.
        let weekday_only: DateAllowFn = Arc::new(|now, parts| {
            use chrono::Datelike;
            let date = chrono::NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day);
            let _ = now;
            date.is_some_and(|d| d.weekday().number_from_monday() <= 5)
        });
        let rules = rules_with(weekday_only);
        // 2024-03-01 is a Friday, 2024-03-02 a Saturday.
        assert!(rules.check(utc_at(1, 0, 0), "08:00").is_ok());
        let saturday = Utc.with_ymd_and_hms(2024, 3, 2, 1, 0, 0).unwrap();
        assert!(matches!(
            rules.check(saturday, "08:00"),
            Err(TickError::DateNotAllowed)
        ));
    }
}
