//! Relational driver on SQLite via sqlx. Tick uniqueness is backed by a
//! unique index over (employee, date, slot); `insert_tick_if_absent` is a
//! single `INSERT .. ON CONFLICT DO NOTHING`.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::{AttendanceStore, HISTORY_MAX_LIMIT, InsertOutcome, StoreError};
use crate::model::tick::Tick;

const CREATE_EMPLOYEES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    name TEXT PRIMARY KEY
)
"#;

const CREATE_TICKS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ticks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee TEXT NOT NULL,
    date TEXT NOT NULL,
    slot TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    ip TEXT NOT NULL DEFAULT '',
    user_agent TEXT NOT NULL DEFAULT '',
    UNIQUE (employee, date, slot)
)
"#;

const TICK_COLUMNS: &str = "employee, date, slot, timestamp, ip, user_agent";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (and creates if missing) the database at `database_url` and
    /// ensures the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StoreError::from)?
            .create_if_missing(true);
        // One connection keeps in-memory databases shared and lets SQLite
        // serialize writes itself.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_EMPLOYEES_SQL).execute(&self.pool).await?;
        sqlx::query(CREATE_TICKS_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn list_employee_names(&self) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM employees ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn employee_exists(&self, name: &str) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn ticks_for(&self, employee: &str, date: &str) -> Result<Vec<Tick>, StoreError> {
        let sql = format!(
            "SELECT {TICK_COLUMNS} FROM ticks WHERE employee = ? AND date = ? ORDER BY timestamp ASC"
        );
        let rows = sqlx::query_as::<_, Tick>(&sql)
            .bind(employee)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ticks_history(
        &self,
        employee: &str,
        date: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Tick>, StoreError> {
        let limit = limit.clamp(1, HISTORY_MAX_LIMIT);

        let mut conditions = vec!["employee = ?"];
        if date.is_some() {
            conditions.push("date = ?");
        }
        let sql = format!(
            "SELECT {TICK_COLUMNS} FROM ticks WHERE {} ORDER BY timestamp DESC LIMIT ?",
            conditions.join(" AND ")
        );
        debug!(sql = %sql, employee, ?date, limit, "Fetching tick history");

        let mut query = sqlx::query_as::<_, Tick>(&sql).bind(employee);
        if let Some(date) = date {
            query = query.bind(date);
        }
        let rows = query.bind(limit as i64).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert_tick_if_absent(&self, tick: Tick) -> Result<InsertOutcome, StoreError> {
        let sql = format!(
            "INSERT INTO ticks ({TICK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT (employee, date, slot) DO NOTHING"
        );
        let result = sqlx::query(&sql)
            .bind(&tick.employee)
            .bind(&tick.date)
            .bind(&tick.slot)
            .bind(tick.timestamp)
            .bind(&tick.ip)
            .bind(&tick.user_agent)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Inserted(tick))
        }
    }

    async fn seed_default_employees_if_empty(&self, names: &[String]) -> Result<(), StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }
        for name in names {
            sqlx::query("INSERT OR IGNORE INTO employees (name) VALUES (?)")
                .bind(name)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn count_ticks(&self) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ticks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn all_ticks_sorted(&self) -> Result<Vec<Tick>, StoreError> {
        let sql = format!(
            "SELECT {TICK_COLUMNS} FROM ticks ORDER BY date ASC, employee ASC, slot ASC"
        );
        let rows = sqlx::query_as::<_, Tick>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    fn tick(employee: &str, date: &str, slot: &str, hour: u32, minute: u32) -> Tick {
        Tick {
            employee: employee.to_string(),
            date: date.to_string(),
            slot: slot.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap(),
            ip: "203.0.113.7".to_string(),
            user_agent: "curl/8".to_string(),
        }
    }

    #[actix_web::test]
    async fn seeding_is_idempotent_and_sorted() {
        let store = store().await;
        let names = vec!["Riya".to_string(), "Heang".to_string(), "Kdey".to_string()];
        store.seed_default_employees_if_empty(&names).await.unwrap();
        store.seed_default_employees_if_empty(&names).await.unwrap();

        assert_eq!(
            store.list_employee_names().await.unwrap(),
            vec!["Heang".to_string(), "Kdey".to_string(), "Riya".to_string()]
        );
        assert!(store.employee_exists("Kdey").await.unwrap());
        assert!(!store.employee_exists("Bob").await.unwrap());
    }

    #[actix_web::test]
    async fn unique_index_rejects_second_insert() {
        let store = store().await;
        let first = store
            .insert_tick_if_absent(tick("Heang", "2024-03-01", "12:00", 5, 0))
            .await
            .unwrap();
        assert!(matches!(first, InsertOutcome::Inserted(_)));

        let second = store
            .insert_tick_if_absent(tick("Heang", "2024-03-01", "12:00", 5, 2))
            .await
            .unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists);
        assert_eq!(store.count_ticks().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn round_trips_every_field() {
        let store = store().await;
        let original = tick("Heang", "2024-03-01", "08:00", 1, 2);
        store.insert_tick_if_absent(original.clone()).await.unwrap();

        let rows = store.ticks_for("Heang", "2024-03-01").await.unwrap();
        assert_eq!(rows, vec![original]);
    }

    #[actix_web::test]
    async fn today_ascends_history_descends_with_filter_and_limit() {
        let store = store().await;
        for (date, slot, hour, minute) in [
            ("2024-03-01", "12:00", 5, 0),
            ("2024-03-01", "08:00", 1, 0),
            ("2024-03-02", "08:00", 18, 0),
        ] {
            store
                .insert_tick_if_absent(tick("Heang", date, slot, hour, minute))
                .await
                .unwrap();
        }

        let today = store.ticks_for("Heang", "2024-03-01").await.unwrap();
        let slots: Vec<&str> = today.iter().map(|t| t.slot.as_str()).collect();
        assert_eq!(slots, vec!["08:00", "12:00"]);

        let history = store.ticks_history("Heang", None, 200).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let filtered = store
            .ticks_history("Heang", Some("2024-03-02"), 200)
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, "2024-03-02");

        let limited = store.ticks_history("Heang", None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].date, "2024-03-02");
    }

    #[actix_web::test]
    async fn export_orders_by_date_employee_slot() {
        let store = store().await;
        for (employee, date, slot) in [
            ("Riya", "2024-03-02", "08:00"),
            ("Heang", "2024-03-02", "12:00"),
            ("Heang", "2024-03-01", "17:30"),
            ("Heang", "2024-03-02", "08:00"),
        ] {
            store
                .insert_tick_if_absent(tick(employee, date, slot, 1, 0))
                .await
                .unwrap();
        }

        let rows = store.all_ticks_sorted().await.unwrap();
        let keys: Vec<(String, String, String)> = rows
            .into_iter()
            .map(|t| (t.date, t.employee, t.slot))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-03-01".into(), "Heang".into(), "17:30".into()),
                ("2024-03-02".into(), "Heang".into(), "08:00".into()),
                ("2024-03-02".into(), "Heang".into(), "12:00".into()),
                ("2024-03-02".into(), "Riya".into(), "08:00".into()),
            ]
        );
    }
}
