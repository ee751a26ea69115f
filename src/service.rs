//! Orchestration of one tick attempt: validate, consult the timing rule,
//! then a single conditional write. Zero store writes on any rejection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::TickError;
use crate::model::tick::Tick;
use crate::rules::eligibility::TickRules;
use crate::store::{AttendanceStore, InsertOutcome};

/// Final outcome of a valid, well-timed tick attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Recorded(Tick),
    /// The (employee, date, slot) triple already has a row. Final and
    /// non-retryable, not an error.
    Duplicate,
}

#[derive(Clone)]
pub struct TickService {
    store: Arc<dyn AttendanceStore>,
    rules: TickRules,
}

impl TickService {
    pub fn new(store: Arc<dyn AttendanceStore>, rules: TickRules) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> &TickRules {
        &self.rules
    }

    pub fn store(&self) -> &Arc<dyn AttendanceStore> {
        &self.store
    }

    pub async fn record_tick(
        &self,
        employee: &str,
        slot: &str,
        now: DateTime<Utc>,
        client_ip: &str,
        user_agent: &str,
    ) -> Result<TickOutcome, TickError> {
        if employee.trim().is_empty() {
            return Err(TickError::InvalidInput("employee"));
        }
        if slot.trim().is_empty() {
            return Err(TickError::InvalidInput("slot"));
        }

        self.rules.check(now, slot)?;

        if !self.store.employee_exists(employee).await? {
            return Err(TickError::UnknownEmployee(employee.to_string()));
        }

        let tick = Tick {
            employee: employee.to_string(),
            date: self.rules.clock().local_date_string(now),
            slot: slot.to_string(),
            timestamp: now,
            ip: client_ip.to_string(),
            user_agent: user_agent.to_string(),
        };

        match self.store.insert_tick_if_absent(tick).await? {
            InsertOutcome::Inserted(record) => {
                debug!(employee, slot, date = %record.date, "Tick recorded");
                Ok(TickOutcome::Recorded(record))
            }
            InsertOutcome::AlreadyExists => Ok(TickOutcome::Duplicate),
        }
    }
}
