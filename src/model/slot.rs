use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One tickable point in the day. The key is the local wall-clock time
/// "HH:MM"; the label is what clients display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Slot {
    #[schema(example = "08:00")]
    pub key: String,
    #[schema(example = "08:00 AM")]
    pub label: String,
}

impl Slot {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Catalog shipped when no SLOTS override is configured.
pub static DEFAULT_SLOTS: Lazy<Vec<Slot>> = Lazy::new(|| {
    vec![
        Slot::new("08:00", "08:00 AM"),
        Slot::new("12:00", "12:00 PM"),
        Slot::new("12:20", "12:20 PM"),
        Slot::new("17:30", "05:30 PM"),
    ]
});

/// Parse a slot key into (hour, minute). Returns `None` unless the key is
/// a valid "HH:MM" wall-clock time.
pub fn parse_slot_key(key: &str) -> Option<(u32, u32)> {
    let (hh, mm) = key.split_once(':')?;
    if hh.len() != 2 || mm.len() != 2 {
        return None;
    }
    let hour: u32 = hh.parse().ok()?;
    let minute: u32 = mm.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Ordered, immutable slot catalog. Order is display and evaluation order;
/// keys are unique but nothing may assume they sort lexicographically.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    slots: Vec<Slot>,
}

impl SlotCatalog {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn default_catalog() -> Self {
        Self::new(DEFAULT_SLOTS.clone())
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
