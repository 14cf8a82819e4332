//! Inventory item record.

use serde::{Deserialize, Serialize};

/// Item identifier. Persisted under `item:<id>`.
pub type ItemId = u32;

/// Seconds per day, for expiry arithmetic.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Consume history kept per item, oldest dropped first.
pub const MAX_CONSUME_RECORDS: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageState {
    /// Chilled.
    #[default]
    Fresh,
    Frozen,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageState {
    #[default]
    Sealed,
    Opened,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Vegetable,
    Fruit,
    Meat,
    Egg,
    Dairy,
    Cooked,
    Seasoning,
    Beverage,
    /// Instant and ready-to-heat food.
    Quick,
    #[default]
    Other,
}

impl ItemCategory {
    pub const ALL: [Self; 10] = [
        Self::Vegetable,
        Self::Fruit,
        Self::Meat,
        Self::Egg,
        Self::Dairy,
        Self::Cooked,
        Self::Seasoning,
        Self::Beverage,
        Self::Quick,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetable => "vegetable",
            Self::Fruit => "fruit",
            Self::Meat => "meat",
            Self::Egg => "egg",
            Self::Dairy => "dairy",
            Self::Cooked => "cooked",
            Self::Seasoning => "seasoning",
            Self::Beverage => "beverage",
            Self::Quick => "quick",
            Self::Other => "other",
        }
    }
}

/// Expiry severity of an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    #[default]
    None,
    /// Expires within the alert window.
    Warning,
    /// Already expired.
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumeRecord {
    pub time: i64,
    pub amount: f32,
}

/// One stored food item. Times are Unix seconds; `0` means unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub quantity: f32,
    /// Free-form unit such as `g`, `ml` or `pcs`.
    pub unit: String,
    pub state: StorageState,
    pub package_state: PackageState,
    pub add_time: i64,
    pub expire_time: i64,
    pub last_update_time: i64,
    /// When the package was first opened.
    pub open_time: i64,
    pub consume_history: Vec<ConsumeRecord>,
}

impl Item {
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expire_time > 0 && now >= self.expire_time
    }

    /// Whole days until expiry, rounded up. `None` without an expiry time,
    /// `Some(0)` once expired.
    #[must_use]
    pub fn remaining_days(&self, now: i64) -> Option<i64> {
        if self.expire_time <= 0 {
            return None;
        }
        if self.is_expired(now) {
            return Some(0);
        }
        Some((self.expire_time - now + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
    }

    /// Critical when expired, Warning when `1..=alert_days` days remain.
    #[must_use]
    pub fn alert_level(&self, now: i64, alert_days: i64) -> AlertLevel {
        if self.is_expired(now) {
            return AlertLevel::Critical;
        }
        match self.remaining_days(now) {
            Some(days) if (1..=alert_days).contains(&days) => AlertLevel::Warning,
            _ => AlertLevel::None,
        }
    }

    /// Append a consume record, dropping the oldest beyond the limit.
    pub fn record_consume(&mut self, record: ConsumeRecord) {
        self.consume_history.push(record);
        if self.consume_history.len() > MAX_CONSUME_RECORDS {
            let excess = self.consume_history.len() - MAX_CONSUME_RECORDS;
            self.consume_history.drain(..excess);
        }
    }

    /// Mark the package opened. The first opening time is kept.
    pub fn open(&mut self, now: i64) {
        self.package_state = PackageState::Opened;
        if self.open_time == 0 {
            self.open_time = now;
        }
    }
}

/// Parameters for a new item. The inventory assigns the id and times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: ItemCategory,
    pub quantity: f32,
    pub unit: String,
    pub expire_time: i64,
    pub state: StorageState,
}

impl NewItem {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: ItemCategory,
        quantity: f32,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            quantity,
            unit: unit.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn expires_at(mut self, expire_time: i64) -> Self {
        self.expire_time = expire_time;
        self
    }

    #[must_use]
    pub fn stored(mut self, state: StorageState) -> Self {
        self.state = state;
        self
    }

    pub(crate) fn into_item(self, id: ItemId, now: i64) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            unit: self.unit,
            state: self.state,
            package_state: PackageState::Sealed,
            add_time: now,
            expire_time: self.expire_time,
            last_update_time: now,
            open_time: 0,
            consume_history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn item(expire_time: i64) -> Item {
        NewItem::new("milk", ItemCategory::Dairy, 1.0, "l")
            .expires_at(expire_time)
            .into_item(1001, NOW)
    }

    #[test]
    fn test_remaining_days_rounds_up() {
        assert_eq!(item(0).remaining_days(NOW), None);
        assert_eq!(item(NOW).remaining_days(NOW), Some(0));
        assert_eq!(item(NOW + 1).remaining_days(NOW), Some(1));
        assert_eq!(item(NOW + SECONDS_PER_DAY).remaining_days(NOW), Some(1));
        assert_eq!(item(NOW + SECONDS_PER_DAY + 1).remaining_days(NOW), Some(2));
    }

    #[test]
    fn test_alert_levels() {
        assert_eq!(item(NOW - 1).alert_level(NOW, 3), AlertLevel::Critical);
        assert_eq!(item(NOW + 2 * SECONDS_PER_DAY).alert_level(NOW, 3), AlertLevel::Warning);
        assert_eq!(item(NOW + 10 * SECONDS_PER_DAY).alert_level(NOW, 3), AlertLevel::None);
        assert_eq!(item(0).alert_level(NOW, 3), AlertLevel::None);
    }

    #[test]
    fn test_consume_history_is_bounded() {
        let mut it = item(0);
        for i in 0..6 {
            it.record_consume(ConsumeRecord {
                time: i,
                amount: 0.1,
            });
        }
        let times: Vec<i64> = it.consume_history.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_open_keeps_first_time() {
        let mut it = item(0);
        it.open(NOW + 5);
        it.open(NOW + 50);
        assert_eq!(it.package_state, PackageState::Opened);
        assert_eq!(it.open_time, NOW + 5);
    }

    #[test]
    fn test_json_uses_lowercase_categories() {
        let json = serde_json::to_string(&item(NOW)).unwrap();
        assert!(json.contains("\"category\":\"dairy\""));
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item(NOW));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let it: Item = serde_json::from_str(r#"{"id":1002,"name":"egg"}"#).unwrap();
        assert_eq!(it.id, 1002);
        assert_eq!(it.category, ItemCategory::Other);
        assert!(it.consume_history.is_empty());
    }
}
