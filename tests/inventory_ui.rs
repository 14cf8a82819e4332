//! Inventory data flowing into dynamic labels.

mod common;

use common::{display, font, take_calls};
use epaper_ui::inventory::{
    AlertLevel, Inventory, ItemCategory, MemoryStore, NewItem, SECONDS_PER_DAY,
};
use epaper_ui::label::{Label, TextShape, TextSource};
use epaper_ui::panel::PanelCall;
use parking_lot::Mutex;
use std::sync::Arc;

const NOW: i64 = 1_700_000_000;

type SharedFridge = Arc<Mutex<Inventory<MemoryStore>>>;

fn stocked() -> SharedFridge {
    let mut fridge = Inventory::open(MemoryStore::new()).unwrap();
    fridge
        .add_item(
            NewItem::new("milk", ItemCategory::Dairy, 1.0, "L").expires_at(NOW + 2 * SECONDS_PER_DAY),
            NOW,
        )
        .unwrap();
    fridge
        .add_item(
            NewItem::new("eggs", ItemCategory::Egg, 6.0, "pcs").expires_at(NOW + 20 * SECONDS_PER_DAY),
            NOW,
        )
        .unwrap();
    Arc::new(Mutex::new(fridge))
}

fn summary(fridge: &SharedFridge) -> TextSource {
    let fridge = Arc::clone(fridge);
    TextSource::dynamic(move || {
        let stats = fridge.lock().statistics(NOW);
        format!("{} items, {} expiring", stats.total, stats.expiring_soon)
    })
}

fn drawn_texts(calls: Vec<PanelCall>) -> Vec<String> {
    calls
        .into_iter()
        .filter_map(|c| match c {
            PanelCall::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

#[test]
fn summary_label_tracks_inventory() {
    let fridge = stocked();
    let display = display();
    display
        .add_label(
            "summary",
            Label::text(4, 20, TextShape::new(summary(&fridge), Some(font(6, 10, -2)))),
        )
        .unwrap();

    display.update_label("summary").unwrap();
    assert_eq!(
        drawn_texts(take_calls(&display)).last().map(String::as_str),
        Some("2 items, 1 expiring")
    );

    fridge
        .lock()
        .add_item(NewItem::new("butter", ItemCategory::Dairy, 1.0, "pcs"), NOW)
        .unwrap();
    display.update_label("summary").unwrap();
    assert_eq!(
        drawn_texts(take_calls(&display)).last().map(String::as_str),
        Some("3 items, 1 expiring")
    );
}

#[test]
fn growing_summary_widens_refresh_window() {
    let fridge = stocked();
    let display = display();
    display
        .add_label(
            "summary",
            Label::text(4, 20, TextShape::new(summary(&fridge), Some(font(6, 10, -2)))),
        )
        .unwrap();
    display.update_label("summary").unwrap();
    let before = display.stats().unwrap().last_window.unwrap();

    let mut fridge_guard = fridge.lock();
    for n in 0..10 {
        fridge_guard
            .add_item(NewItem::new(format!("jar {n}"), ItemCategory::Other, 1.0, "pcs"), NOW)
            .unwrap();
    }
    drop(fridge_guard);

    display.update_label("summary").unwrap();
    let after = display.stats().unwrap().last_window.unwrap();
    assert!(after.width > before.width);
    assert!(after.contains_rect(&before));
}

#[test]
fn alert_labels_follow_expiry() {
    let fridge = stocked();
    let display = display();

    let alerts = fridge.lock().alerts(NOW);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);

    for (row, alert) in alerts.iter().enumerate() {
        let name = fridge.lock().item(alert.id).map(|i| i.name.clone()).unwrap();
        display
            .add_label(
                format!("alert_{}", alert.id),
                Label::text(4, 40 + row as i32 * 14, TextShape::new(name, Some(font(6, 10, -2)))),
            )
            .unwrap();
    }
    display.update_ui(true).unwrap();
    let texts = drawn_texts(take_calls(&display));
    assert!(texts.iter().any(|t| t == "milk"));
    assert!(!texts.iter().any(|t| t == "eggs"));

    // Eating the milk removes the alert and its label.
    let milk = alerts[0].id;
    fridge.lock().remove_item(milk).unwrap();
    assert!(fridge.lock().alerts(NOW).is_empty());
    display.hide(&format!("alert_{milk}")).unwrap();
    assert_eq!(display.with_panel(|p| p.ink_count()).unwrap(), 0);
}

#[test]
fn inventory_survives_reload() {
    let fridge = stocked();
    let store = fridge.lock().store().clone();
    let reloaded = Inventory::open(store).unwrap();
    assert_eq!(reloaded.len(), 2);
    let names: Vec<&str> = reloaded.items().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["milk", "eggs"]);
}
