use std::env;

use dotenvy::dotenv;

use crate::model::slot::{DEFAULT_SLOTS, Slot, parse_slot_key};

const DEFAULT_EMPLOYEES: [&str; 6] = ["Heang", "Riya", "Kdey", "Chi Vorn", "Nith", "Savath"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub time_zone: String,
    pub early_minutes: i64,
    /// Empty string disables the admin gate.
    pub admin_key: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub slots: Vec<Slot>,
    pub default_employees: Vec<String>,

    // Rate limiting
    pub rate_tick_per_min: u32,
    pub rate_read_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            time_zone: env::var("APP_TZ").unwrap_or_else(|_| "Asia/Phnom_Penh".to_string()),
            early_minutes: env::var("EARLY_MINUTES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("EARLY_MINUTES must be a number"),
            admin_key: env::var("ADMIN_KEY").unwrap_or_default(),
            store_backend: match env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "sqlite".to_string())
                .as_str()
            {
                "sqlite" => StoreBackend::Sqlite,
                "memory" => StoreBackend::Memory,
                other => panic!("STORE_BACKEND must be sqlite or memory, got {other}"),
            },
            database_url: env::var("DATABASE_URL").ok(),
            slots: env::var("SLOTS")
                .map(|raw| parse_slots(&raw))
                .unwrap_or_else(|_| DEFAULT_SLOTS.clone()),
            default_employees: env::var("DEFAULT_EMPLOYEES")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| DEFAULT_EMPLOYEES.iter().map(|s| s.to_string()).collect()),

            rate_tick_per_min: env::var("RATE_TICK_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_TICK_PER_MIN must be a number"),
            rate_read_per_min: env::var("RATE_READ_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("RATE_READ_PER_MIN must be a number"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}

/// Parses a SLOTS override: `KEY=Label` pairs separated by `;`, e.g.
/// `08:00=08:00 AM;12:30=12:30 PM`.
fn parse_slots(raw: &str) -> Vec<Slot> {
    let slots: Vec<Slot> = raw
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (key, label) = pair
                .split_once('=')
                .unwrap_or_else(|| panic!("SLOTS entry must be KEY=Label, got {pair}"));
            let key = key.trim();
            if parse_slot_key(key).is_none() {
                panic!("SLOTS key must be a valid HH:MM time, got {key}");
            }
            Slot::new(key, label.trim())
        })
        .collect();
    if slots.is_empty() {
        panic!("SLOTS must contain at least one entry");
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slot_overrides_in_order() {
        let slots = parse_slots("08:00=08:00 AM; 12:30=12:30 PM ;17:30=05:30 PM");
        let keys: Vec<&str> = slots.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["08:00", "12:30", "17:30"]);
        assert_eq!(slots[1].label, "12:30 PM");
    }

    #[test]
    #[should_panic(expected = "SLOTS key must be a valid HH:MM time")]
    fn rejects_bad_slot_keys() {
        parse_slots("25:00=Never");
    }

    #[test]
    #[should_panic(expected = "SLOTS entry must be KEY=Label")]
    fn rejects_entries_without_labels() {
        parse_slots("08:00");
    }
}
