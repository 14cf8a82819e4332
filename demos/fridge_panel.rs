//! Fridge panel demo
//!
//! Builds the two pages of a 2.9" fridge display over an in-memory panel:
//! 1. Page 1: status time, inventory summary and expiry alerts
//! 2. Page 2: the full item list
//! 3. A timed notification that dismisses itself
//!
//! Each step prints the panel as ASCII art. Debug logging shows the refresh
//! windows the reconciler picks.

use chrono::DateTime;
use epaper_ui::inventory::{AlertLevel, Inventory, ItemCategory, MemoryStore, NewItem, SECONDS_PER_DAY};
use epaper_ui::label::{Align, Label, TextShape, TextSource};
use epaper_ui::{Display, FontHandle, MemoryPanel, MonoFont};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const NOW: i64 = 1_760_000_000;

fn print_panel(title: &str, display: &Display<MemoryPanel>) -> epaper_ui::Result<()> {
    let art = display.with_panel(|p| p.to_ascii())?;
    println!("== {title} ==");
    print!("{art}");
    Ok(())
}

fn main() -> epaper_ui::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let small: FontHandle = Arc::new(MonoFont::new(6, 10, -2));
    let large: FontHandle = Arc::new(MonoFont::new(12, 20, -4));

    let mut fridge = Inventory::open(MemoryStore::new())?;
    for (name, category, qty, unit, days) in [
        ("milk", ItemCategory::Dairy, 1.0, "L", 2),
        ("eggs", ItemCategory::Egg, 10.0, "pcs", 14),
        ("spinach", ItemCategory::Vegetable, 0.3, "kg", 1),
        ("leftover rice", ItemCategory::Cooked, 1.0, "box", -1),
    ] {
        fridge.add_item(
            NewItem::new(name, category, qty, unit).expires_at(NOW + days * SECONDS_PER_DAY),
            NOW,
        )?;
    }
    let fridge = Arc::new(Mutex::new(fridge));

    let display = Display::new(MemoryPanel::new());
    {
        let mut ui = display.lock()?;
        ui.add_label(
            "status-time",
            Label::text(148, 26, TextShape::new("--:--", Some(large.clone())).align(Align::Center)),
        );
        let summary = {
            let fridge = Arc::clone(&fridge);
            TextSource::dynamic(move || {
                let stats = fridge.lock().statistics(NOW);
                format!(
                    "{} items  {} expired  {} soon",
                    stats.total, stats.expired, stats.expiring_soon
                )
            })
        };
        ui.add_label("summary", Label::text(4, 48, TextShape::new(summary, Some(small.clone()))));
        ui.add_label("rule", Label::line(0, 54, 295, 54, 2));

        let alerts = fridge.lock().alerts(NOW);
        for (row, alert) in alerts.iter().enumerate() {
            let Some(name) = fridge.lock().item(alert.id).map(|i| i.name.clone()) else {
                continue;
            };
            let marker = if alert.level == AlertLevel::Critical { "!!" } else { "! " };
            let y = 70 + row as i32 * 14;
            ui.add_label(
                format!("alert_{}", alert.id),
                Label::text(4, y, TextShape::new(format!("{marker} {name}"), Some(small.clone()))),
            );
        }

        for (row, item) in fridge.lock().items().enumerate() {
            let line = format!("{:<14}{:>5.1} {}", item.name, item.quantity, item.unit);
            ui.add_label(
                format!("item_{}", item.id),
                Label::text(4, 16 + row as i32 * 14, TextShape::new(line, Some(small.clone())))
                    .on_page(2),
            );
        }

        ui.add_label(
            "notification",
            Label::text(186, 118, TextShape::new("", Some(small.clone()))).hidden(),
        );
        if let Some(now) = DateTime::from_timestamp(NOW, 0) {
            ui.update_status_time(now.naive_utc(), true);
        }
        ui.update_ui(true);
    }
    print_panel("page 1", &display)?;

    // A minute on, past the status interval.
    if let Some(later) = DateTime::from_timestamp(NOW + 60, 0) {
        display.update_status_time(later.naive_utc(), false)?;
    }
    fridge.lock().consume(1001, 1.0, NOW)?;
    display.update_label("summary")?;
    print_panel("page 1 after partial refreshes", &display)?;

    display.show_notification("milk finished", Some(Duration::from_millis(200)))?;
    print_panel("notification", &display)?;
    thread::sleep(Duration::from_millis(400));

    display.set_page(2)?;
    print_panel("page 2", &display)?;

    let stats = display.stats()?;
    println!(
        "{} full, {} partial refreshes, {} page passes",
        stats.full_refreshes, stats.partial_refreshes, stats.page_passes
    );
    Ok(())
}
