//! In-process store, the document-store stand-in. All state lives behind
//! one mutex, so the check-and-insert in `insert_tick_if_absent` is a
//! single critical section.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{AttendanceStore, HISTORY_MAX_LIMIT, InsertOutcome, StoreError};
use crate::model::tick::Tick;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    employees: BTreeSet<String>,
    ticks: Vec<Tick>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn list_employee_names(&self) -> Result<Vec<String>, StoreError> {
        // BTreeSet iteration is already sorted.
        Ok(self.lock()?.employees.iter().cloned().collect())
    }

    async fn employee_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.employees.contains(name))
    }

    async fn ticks_for(&self, employee: &str, date: &str) -> Result<Vec<Tick>, StoreError> {
        let mut rows: Vec<Tick> = self
            .lock()?
            .ticks
            .iter()
            .filter(|t| t.employee == employee && t.date == date)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.timestamp);
        Ok(rows)
    }

    async fn ticks_history(
        &self,
        employee: &str,
        date: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Tick>, StoreError> {
        let limit = limit.clamp(1, HISTORY_MAX_LIMIT);
        let mut rows: Vec<Tick> = self
            .lock()?
            .ticks
            .iter()
            .filter(|t| t.employee == employee && date.is_none_or(|d| t.date == d))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn insert_tick_if_absent(&self, tick: Tick) -> Result<InsertOutcome, StoreError> {
        let mut inner = self.lock()?;
        let exists = inner
            .ticks
            .iter()
            .any(|t| t.employee == tick.employee && t.date == tick.date && t.slot == tick.slot);
        if exists {
            return Ok(InsertOutcome::AlreadyExists);
        }
        inner.ticks.push(tick.clone());
        Ok(InsertOutcome::Inserted(tick))
    }

    async fn seed_default_employees_if_empty(&self, names: &[String]) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.employees.is_empty() {
            inner.employees.extend(names.iter().cloned());
        }
        Ok(())
    }

    async fn count_ticks(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.ticks.len() as u64)
    }

    async fn all_ticks_sorted(&self) -> Result<Vec<Tick>, StoreError> {
        let mut rows = self.lock()?.ticks.clone();
        rows.sort_by(|a, b| {
            (&a.date, &a.employee, &a.slot).cmp(&(&b.date, &b.employee, &b.slot))
        });
        Ok(rows)
    }
}
