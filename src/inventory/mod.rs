//! Fridge inventory.
//!
//! [`Inventory`] keeps food items in memory and mirrors every change into a
//! [`KvStore`] as one JSON record per item under `item:<id>`. The store is
//! passed in at construction, so tests and the UI can use
//! [`MemoryStore`] while a device build plugs in its flash store.
//!
//! All time-dependent methods take `now` (Unix seconds) explicitly.
//!
//! ```
//! use epaper_ui::inventory::{Inventory, ItemCategory, MemoryStore, NewItem};
//!
//! let now = 1_700_000_000;
//! let mut fridge = Inventory::open(MemoryStore::new())?;
//! let id = fridge.add_item(NewItem::new("eggs", ItemCategory::Egg, 6.0, "pcs"), now)?;
//! assert_eq!(id, 1001);
//! fridge.consume(id, 2.0, now)?;
//! assert_eq!(fridge.item(id).map(|i| i.quantity), Some(4.0));
//! # Ok::<(), epaper_ui::Error>(())
//! ```

mod item;
mod store;

pub use item::{
    AlertLevel, ConsumeRecord, Item, ItemCategory, ItemId, MAX_CONSUME_RECORDS, NewItem,
    PackageState, SECONDS_PER_DAY, StorageState,
};
pub use store::{KvStore, MemoryStore};

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Inventory configuration options.
#[derive(Clone, Copy, Debug)]
pub struct InventoryOptions {
    /// First id handed out.
    pub id_start: ItemId,
    /// Size of the id range, and so the item limit.
    pub max_items: u32,
    /// Days before expiry an item starts raising a warning.
    pub alert_days: i64,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            id_start: 1001,
            max_items: 200,
            alert_days: 3,
        }
    }
}

/// Filter for [`Inventory::query`]. Unset criteria match everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemQuery {
    pub category: Option<ItemCategory>,
    pub only_expired: bool,
    /// Keep items with `0..=expiring_days` days left.
    pub expiring_soon: bool,
    pub expiring_days: i64,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            category: None,
            only_expired: false,
            expiring_soon: false,
            expiring_days: 7,
        }
    }
}

/// Counts over the whole inventory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub expired: usize,
    /// Not expired, expiring within the alert window.
    pub expiring_soon: usize,
    /// Every category, including empty ones.
    pub by_category: BTreeMap<ItemCategory, usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alert {
    pub id: ItemId,
    pub level: AlertLevel,
    pub trigger_time: i64,
}

fn storage_key(id: ItemId) -> String {
    format!("item:{id}")
}

/// Item collection persisted through a [`KvStore`].
#[derive(Debug)]
pub struct Inventory<S> {
    store: S,
    items: BTreeMap<ItemId, Item>,
    options: InventoryOptions,
}

impl<S: KvStore> Inventory<S> {
    /// Load every item found in `store`.
    pub fn open(store: S) -> Result<Self> {
        Self::with_options(store, InventoryOptions::default())
    }

    /// Load items by probing every key of the id range. Records that fail
    /// to decode are logged and skipped.
    pub fn with_options(store: S, options: InventoryOptions) -> Result<Self> {
        let mut items = BTreeMap::new();
        for offset in 0..options.max_items {
            let Some(id) = options.id_start.checked_add(offset) else {
                break;
            };
            let Some(json) = store.get(&storage_key(id))? else {
                continue;
            };
            match serde_json::from_str::<Item>(&json) {
                Ok(mut item) => {
                    item.id = id;
                    debug!(id, name = %item.name, "loaded item");
                    items.insert(id, item);
                }
                Err(e) => warn!(id, error = %e, "skipping undecodable item record"),
            }
        }
        if items.is_empty() {
            info!("no stored items");
        } else {
            info!(count = items.len(), "loaded items");
        }
        Ok(Self {
            store,
            items,
            options,
        })
    }

    #[must_use]
    pub fn options(&self) -> &InventoryOptions {
        &self.options
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lowest free id of the range.
    fn next_id(&self) -> Result<ItemId> {
        let start = self.options.id_start;
        (0..self.options.max_items)
            .filter_map(|offset| start.checked_add(offset))
            .find(|id| !self.items.contains_key(id))
            .ok_or(Error::InventoryFull {
                max_items: self.options.max_items,
            })
    }

    fn save(&mut self, item: &Item) -> Result<()> {
        let json = serde_json::to_string(item)?;
        self.store.set(&storage_key(item.id), &json)
    }

    /// Store a new item under the lowest free id.
    pub fn add_item(&mut self, new: NewItem, now: i64) -> Result<ItemId> {
        let id = self.next_id()?;
        let item = new.into_item(id, now);
        self.save(&item)?;
        info!(id, name = %item.name, category = item.category.as_str(), "added item");
        self.items.insert(id, item);
        Ok(id)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item> {
        if !self.items.contains_key(&id) {
            warn!(id, "remove of unknown item");
            return Err(Error::ItemNotFound(id));
        }
        self.store.erase(&storage_key(id))?;
        let removed = self.items.remove(&id).ok_or(Error::ItemNotFound(id))?;
        info!(id, name = %removed.name, "removed item");
        Ok(removed)
    }

    /// Remove every item. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let ids: Vec<ItemId> = self.items.keys().copied().collect();
        for id in &ids {
            self.remove_item(*id)?;
        }
        info!(count = ids.len(), "cleared inventory");
        Ok(ids.len())
    }

    /// Replace a stored item with `item` (matched by id).
    ///
    /// `last_update_time` is set to `now`, and an item newly marked opened
    /// gets its `open_time` if it had none.
    pub fn update_item(&mut self, mut item: Item, now: i64) -> Result<()> {
        if !self.items.contains_key(&item.id) {
            warn!(id = item.id, "update of unknown item");
            return Err(Error::ItemNotFound(item.id));
        }
        item.last_update_time = now;
        if item.package_state == PackageState::Opened && item.open_time == 0 {
            item.open_time = now;
        }
        self.save(&item)?;
        info!(id = item.id, name = %item.name, "updated item");
        self.items.insert(item.id, item);
        Ok(())
    }

    /// Take `amount` out of an item. Returns the quantity left.
    pub fn consume(&mut self, id: ItemId, amount: f32, now: i64) -> Result<f32> {
        let Some(current) = self.items.get(&id) else {
            warn!(id, "consume of unknown item");
            return Err(Error::ItemNotFound(id));
        };
        if current.quantity < amount {
            warn!(id, available = current.quantity, requested = amount, "insufficient quantity");
            return Err(Error::InsufficientQuantity {
                id,
                available: current.quantity,
                requested: amount,
            });
        }

        let mut item = current.clone();
        item.quantity -= amount;
        item.last_update_time = now;
        item.record_consume(ConsumeRecord { time: now, amount });
        self.save(&item)?;
        let remaining = item.quantity;
        info!(id, amount, remaining, "consumed item");
        self.items.insert(id, item);
        Ok(remaining)
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// All items in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    #[must_use]
    pub fn query(&self, query: &ItemQuery, now: i64) -> Vec<&Item> {
        let found: Vec<&Item> = self
            .items
            .values()
            .filter(|item| query.category.is_none_or(|c| item.category == c))
            .filter(|item| !query.only_expired || item.is_expired(now))
            .filter(|item| {
                !query.expiring_soon
                    || item
                        .remaining_days(now)
                        .is_some_and(|days| days <= query.expiring_days)
            })
            .collect();
        debug!(count = found.len(), "query");
        found
    }

    /// Items with at most `days` days left, expired ones included.
    #[must_use]
    pub fn expiring_soon(&self, days: i64, now: i64) -> Vec<&Item> {
        self.query(
            &ItemQuery {
                expiring_soon: true,
                expiring_days: days,
                ..ItemQuery::default()
            },
            now,
        )
    }

    #[must_use]
    pub fn statistics(&self, now: i64) -> Statistics {
        let mut stats = Statistics {
            total: self.items.len(),
            by_category: ItemCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            ..Statistics::default()
        };
        for item in self.items.values() {
            *stats.by_category.entry(item.category).or_default() += 1;
            if item.is_expired(now) {
                stats.expired += 1;
            } else if item
                .remaining_days(now)
                .is_some_and(|days| days <= self.options.alert_days)
            {
                stats.expiring_soon += 1;
            }
        }
        stats
    }

    /// One alert per item that is expired or about to expire.
    #[must_use]
    pub fn alerts(&self, now: i64) -> Vec<Alert> {
        self.items
            .values()
            .filter_map(|item| {
                let level = item.alert_level(now, self.options.alert_days);
                (level != AlertLevel::None).then_some(Alert {
                    id: item.id,
                    level,
                    trigger_time: now,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn fridge() -> Inventory<MemoryStore> {
        Inventory::open(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_ids_reuse_lowest_free() {
        let mut inv = fridge();
        let a = inv.add_item(NewItem::new("a", ItemCategory::Fruit, 1.0, "pcs"), NOW).unwrap();
        let b = inv.add_item(NewItem::new("b", ItemCategory::Fruit, 1.0, "pcs"), NOW).unwrap();
        assert_eq!((a, b), (1001, 1002));
        inv.remove_item(a).unwrap();
        let c = inv.add_item(NewItem::new("c", ItemCategory::Fruit, 1.0, "pcs"), NOW).unwrap();
        assert_eq!(c, 1001);
    }

    #[test]
    fn test_full_inventory_is_rejected() {
        let options = InventoryOptions {
            max_items: 2,
            ..InventoryOptions::default()
        };
        let mut inv = Inventory::with_options(MemoryStore::new(), options).unwrap();
        for _ in 0..2 {
            inv.add_item(NewItem::new("x", ItemCategory::Other, 1.0, ""), NOW).unwrap();
        }
        let err = inv.add_item(NewItem::new("x", ItemCategory::Other, 1.0, ""), NOW);
        assert!(matches!(err, Err(Error::InventoryFull { max_items: 2 })));
    }

    #[test]
    fn test_consume_checks_quantity() {
        let mut inv = fridge();
        let id = inv.add_item(NewItem::new("milk", ItemCategory::Dairy, 1.0, "l"), NOW).unwrap();
        assert_eq!(inv.consume(id, 0.25, NOW + 1).unwrap(), 0.75);
        let err = inv.consume(id, 2.0, NOW + 2).unwrap_err();
        assert!(matches!(err, Error::InsufficientQuantity { .. }));
        assert!(matches!(inv.consume(9999, 1.0, NOW), Err(Error::ItemNotFound(9999))));

        let item = inv.item(id).unwrap();
        assert_eq!(item.consume_history.len(), 1);
        assert_eq!(item.last_update_time, NOW + 1);
    }

    #[test]
    fn test_persisted_and_reloaded() {
        let mut inv = fridge();
        let id = inv
            .add_item(
                NewItem::new("beef", ItemCategory::Meat, 500.0, "g")
                    .stored(StorageState::Frozen)
                    .expires_at(NOW + 30 * SECONDS_PER_DAY),
                NOW,
            )
            .unwrap();
        let store = inv.store().clone();
        assert!(store.get("item:1001").unwrap().is_some());

        let reloaded = Inventory::open(store).unwrap();
        let item = reloaded.item(id).unwrap();
        assert_eq!(item.name, "beef");
        assert_eq!(item.state, StorageState::Frozen);
    }

    #[test]
    fn test_corrupt_record_is_skipped() {
        let mut store = MemoryStore::new();
        store.set("item:1001", "{not json").unwrap();
        store.set("item:1002", r#"{"name":"jam","category":"seasoning"}"#).unwrap();
        let inv = Inventory::open(store).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.item(1002).unwrap().id, 1002);
    }

    #[test]
    fn test_storage_failure_leaves_memory_untouched() {
        let mut inv = fridge();
        inv.store_mut().set_read_only(true);
        let err = inv.add_item(NewItem::new("a", ItemCategory::Fruit, 1.0, ""), NOW);
        assert!(matches!(err, Err(Error::Storage(_))));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_update_sets_open_time() {
        let mut inv = fridge();
        let id = inv.add_item(NewItem::new("jam", ItemCategory::Seasoning, 1.0, "jar"), NOW).unwrap();
        let mut item = inv.item(id).unwrap().clone();
        item.package_state = PackageState::Opened;
        inv.update_item(item, NOW + 60).unwrap();
        assert_eq!(inv.item(id).unwrap().open_time, NOW + 60);

        let ghost = Item {
            id: 4242,
            ..Item::default()
        };
        assert!(matches!(inv.update_item(ghost, NOW), Err(Error::ItemNotFound(4242))));
    }

    #[test]
    fn test_queries_statistics_alerts() {
        let mut inv = fridge();
        let day = SECONDS_PER_DAY;
        let expired = inv
            .add_item(NewItem::new("old", ItemCategory::Cooked, 1.0, "").expires_at(NOW - day), NOW)
            .unwrap();
        let soon = inv
            .add_item(NewItem::new("soon", ItemCategory::Fruit, 1.0, "").expires_at(NOW + 2 * day), NOW)
            .unwrap();
        let later = inv
            .add_item(NewItem::new("later", ItemCategory::Fruit, 1.0, "").expires_at(NOW + 5 * day), NOW)
            .unwrap();
        inv.add_item(NewItem::new("salt", ItemCategory::Seasoning, 1.0, ""), NOW).unwrap();

        let ids = |items: Vec<&Item>| items.iter().map(|i| i.id).collect::<Vec<_>>();
        assert_eq!(ids(inv.expiring_soon(3, NOW)), vec![expired, soon]);
        assert_eq!(ids(inv.expiring_soon(7, NOW)), vec![expired, soon, later]);
        let fruit = ItemQuery {
            category: Some(ItemCategory::Fruit),
            ..ItemQuery::default()
        };
        assert_eq!(ids(inv.query(&fruit, NOW)), vec![soon, later]);
        let only_expired = ItemQuery {
            only_expired: true,
            ..ItemQuery::default()
        };
        assert_eq!(ids(inv.query(&only_expired, NOW)), vec![expired]);

        let stats = inv.statistics(NOW);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.expiring_soon, 1);
        assert_eq!(stats.by_category[&ItemCategory::Fruit], 2);
        assert_eq!(stats.by_category[&ItemCategory::Egg], 0);
        assert_eq!(stats.by_category.len(), ItemCategory::ALL.len());

        let alerts = inv.alerts(NOW);
        assert_eq!(
            alerts,
            vec![
                Alert {
                    id: expired,
                    level: AlertLevel::Critical,
                    trigger_time: NOW
                },
                Alert {
                    id: soon,
                    level: AlertLevel::Warning,
                    trigger_time: NOW
                },
            ]
        );
    }

    #[test]
    fn test_clear_erases_store() {
        let mut inv = fridge();
        inv.add_item(NewItem::new("a", ItemCategory::Egg, 1.0, ""), NOW).unwrap();
        inv.add_item(NewItem::new("b", ItemCategory::Egg, 1.0, ""), NOW).unwrap();
        assert_eq!(inv.clear().unwrap(), 2);
        assert!(inv.is_empty());
        assert!(inv.store().is_empty());
    }
}
