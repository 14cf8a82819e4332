//! Display lock and public entry points.
//!
//! A [`Display`] owns one panel and one scene behind a single mutex. Every
//! public operation takes the lock once, runs to completion (including the
//! panel I/O) and releases it. The notification timer thread goes through
//! the same lock, so application and timer mutations are totally ordered.
//!
//! Use [`Display::lock`] to batch several operations under one acquisition:
//!
//! ```
//! use epaper_ui::display::Display;
//! use epaper_ui::font::{FontHandle, MonoFont};
//! use epaper_ui::label::{Label, TextShape};
//! use epaper_ui::panel::MemoryPanel;
//! use std::sync::Arc;
//!
//! let font: FontHandle = Arc::new(MonoFont::default());
//! let display = Display::new(MemoryPanel::new());
//! {
//!     let mut ui = display.lock()?;
//!     ui.add_label("title", Label::text(4, 20, TextShape::new("Fridge", Some(font))));
//!     ui.add_label("rule", Label::line(0, 26, 295, 26, 2));
//!     ui.update_ui(true);
//! }
//! display.set_text("title", "Fridge (3)")?;
//! # Ok::<(), epaper_ui::Error>(())
//! ```

mod render;
mod state;
mod timer;

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::label::{Label, TextSource};
use crate::panel::PanelDriver;
use crate::scene::SceneStore;
use chrono::NaiveDateTime;
use parking_lot::{Mutex, MutexGuard};
use state::DisplayState;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Display configuration options.
#[derive(Clone, Debug)]
pub struct DisplayOptions {
    /// Give up on the display lock after this long. `None` blocks.
    pub lock_timeout: Option<Duration>,
    /// Refresh window used when a computed region is empty or off-panel.
    pub fallback_size: (u32, u32),
    /// Region cleared for a text label without a font, as
    /// `(dx, dy, width, height)` relative to its anchor.
    pub unbound_font_region: (i32, i32, u32, u32),
    /// Extra pixels between wrapped lines.
    pub line_gap: i32,
    /// Page active after construction.
    pub initial_page: u16,
    /// Key of the text label used by [`Display::show_notification`].
    pub notification_key: String,
    /// Key of the `HH:MM` label written by [`Display::update_status_time`].
    pub status_time_key: String,
    /// Minimum time between two unforced status time updates.
    pub status_interval: Duration,
    /// Clocks reporting an earlier year are treated as not yet synced.
    pub min_clock_year: i32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            lock_timeout: None,
            fallback_size: (100, 30),
            unbound_font_region: (0, -20, 100, 30),
            line_gap: crate::bounds::DEFAULT_LINE_GAP,
            initial_page: crate::label::DEFAULT_PAGE,
            notification_key: "notification".to_string(),
            status_time_key: "status-time".to_string(),
            status_interval: Duration::from_secs(10),
            min_clock_year: 2025,
        }
    }
}

/// Refresh statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub partial_refreshes: u64,
    pub full_refreshes: u64,
    pub page_passes: u64,
    /// Visible labels drawn, counted once per page pass.
    pub labels_drawn: u64,
    /// Refreshes that had to fall back to the default window.
    pub fallback_regions: u64,
    pub last_window: Option<Rect>,
}

/// Shared handle to a panel and its labels. Clones refer to the same display.
pub struct Display<P> {
    shared: Arc<Mutex<DisplayState<P>>>,
    lock_timeout: Option<Duration>,
}

impl<P> Clone for Display<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            lock_timeout: self.lock_timeout,
        }
    }
}

impl<P: PanelDriver> Display<P> {
    /// Take ownership of `panel`, initialise it and clear it to white.
    pub fn new(panel: P) -> Self {
        Self::with_options(panel, DisplayOptions::default())
    }

    pub fn with_options(panel: P, options: DisplayOptions) -> Self {
        let lock_timeout = options.lock_timeout;
        let shared =
            Arc::new_cyclic(|this| Mutex::new(DisplayState::new(panel, options, this.clone())));
        shared.lock().initial_clear();
        Self {
            shared,
            lock_timeout,
        }
    }

    /// Acquire the display lock, honouring the configured timeout.
    pub fn lock(&self) -> Result<DisplayGuard<'_, P>> {
        match self.lock_timeout {
            Some(timeout) => self.try_lock_for(timeout),
            None => Ok(DisplayGuard {
                state: self.shared.lock(),
            }),
        }
    }

    /// Acquire the display lock, failing after `timeout`.
    pub fn try_lock_for(&self, timeout: Duration) -> Result<DisplayGuard<'_, P>> {
        match self.shared.try_lock_for(timeout) {
            Some(state) => Ok(DisplayGuard { state }),
            None => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms, "display lock timed out");
                Err(Error::LockTimeout { timeout_ms })
            }
        }
    }

    /// See [`DisplayGuard::add_label`].
    pub fn add_label(&self, key: impl Into<String>, label: Label) -> Result<Option<Label>> {
        Ok(self.lock()?.add_label(key, label))
    }

    pub fn remove_label(&self, key: &str) -> Result<Option<Label>> {
        Ok(self.lock()?.remove_label(key))
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.contains(key))
    }

    /// Run `f` on a label under the lock. The panel is not touched; follow
    /// with [`update_label`](Self::update_label) to show the change.
    pub fn with_label<R>(&self, key: &str, f: impl FnOnce(&mut Label) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        let label = guard
            .label_mut(key)
            .ok_or_else(|| Error::LabelNotFound(key.to_string()))?;
        Ok(f(label))
    }

    pub fn show(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.show(key))
    }

    pub fn hide(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.hide(key))
    }

    pub fn update_label(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.update_label(key))
    }

    pub fn update_ui(&self, full: bool) -> Result<()> {
        self.lock()?.update_ui(full);
        Ok(())
    }

    pub fn set_page(&self, page: u16) -> Result<()> {
        self.lock()?.set_page(page);
        Ok(())
    }

    pub fn current_page(&self) -> Result<u16> {
        Ok(self.lock()?.current_page())
    }

    pub fn set_text(&self, key: &str, text: impl Into<TextSource>) -> Result<bool> {
        Ok(self.lock()?.set_text(key, text))
    }

    pub fn dismiss_notification(&self) -> Result<bool> {
        Ok(self.lock()?.dismiss_notification())
    }

    pub fn update_status_time(&self, now: NaiveDateTime, force: bool) -> Result<bool> {
        Ok(self.lock()?.update_status_time(now, force))
    }

    pub fn stats(&self) -> Result<RefreshStats> {
        Ok(self.lock()?.stats())
    }

    pub fn is_dirty(&self) -> Result<bool> {
        Ok(self.lock()?.is_dirty())
    }

    /// Run `f` on the panel under the lock.
    pub fn with_panel<R>(&self, f: impl FnOnce(&mut P) -> R) -> Result<R> {
        Ok(f(self.lock()?.panel_mut()))
    }
}

impl<P: PanelDriver + Send + 'static> Display<P> {
    /// See [`DisplayGuard::show_notification`].
    pub fn show_notification(
        &self,
        text: impl Into<TextSource>,
        duration: Option<Duration>,
    ) -> Result<bool> {
        Ok(self.lock()?.show_notification(text, duration))
    }
}

/// Exclusive access to a display. Releases the lock on drop.
///
/// Operations on a guard never re-acquire the lock, so any number of them
/// can be chained under one acquisition. Unknown keys are logged and
/// reported as `false`.
pub struct DisplayGuard<'a, P> {
    state: MutexGuard<'a, DisplayState<P>>,
}

impl<P: PanelDriver> DisplayGuard<'_, P> {
    /// Insert or replace a label without touching the panel. Returns the
    /// label that was replaced.
    pub fn add_label(&mut self, key: impl Into<String>, label: Label) -> Option<Label> {
        self.state.add_label(key.into(), label)
    }

    /// Drop a label without touching the panel. Whatever it drew stays
    /// until the next page refresh.
    pub fn remove_label(&mut self, key: &str) -> Option<Label> {
        self.state.remove_label(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.state.scene.contains(key)
    }

    #[must_use]
    pub fn label(&self, key: &str) -> Option<&Label> {
        self.state.scene.get(key)
    }

    /// Mutable access for direct field edits. Call
    /// [`update_label`](Self::update_label) afterwards to refresh.
    pub fn label_mut(&mut self, key: &str) -> Option<&mut Label> {
        self.state.scene.get_mut(key)
    }

    #[must_use]
    pub fn scene(&self) -> &SceneStore {
        &self.state.scene
    }

    /// Make a label visible and, if it is on the active page, draw it.
    pub fn show(&mut self, key: &str) -> bool {
        self.state.show(key)
    }

    /// Hide a label and clear what it drew. Hiding a hidden label does no
    /// panel I/O.
    pub fn hide(&mut self, key: &str) -> bool {
        self.state.hide(key)
    }

    /// Partial refresh of the region a label covers now and covered before.
    pub fn update_label(&mut self, key: &str) -> bool {
        self.state.refresh_label(key)
    }

    /// Redraw every label of the active page.
    pub fn update_ui(&mut self, full: bool) {
        self.state.update_ui(full);
    }

    /// Switch pages with a full refresh. Switching to the active page is a
    /// no-op.
    pub fn set_page(&mut self, page: u16) {
        self.state.set_page(page);
    }

    #[must_use]
    pub fn current_page(&self) -> u16 {
        self.state.current_page()
    }

    /// Replace a text label's text and refresh it if it is on screen.
    pub fn set_text(&mut self, key: &str, text: impl Into<TextSource>) -> bool {
        self.state.set_text(key, text.into())
    }

    /// Hide the notification label now and cancel its pending dismiss.
    pub fn dismiss_notification(&mut self) -> bool {
        self.state.dismiss_notification()
    }

    /// Show `now` as `HH:MM` in the status time label.
    ///
    /// Unforced calls within `status_interval` of the last update are
    /// skipped, as are clocks that have not been synced yet. Returns true
    /// when the label text was written.
    pub fn update_status_time(&mut self, now: NaiveDateTime, force: bool) -> bool {
        self.state.update_status_time(now, force)
    }

    #[must_use]
    pub fn stats(&self) -> RefreshStats {
        self.state.stats.clone()
    }

    /// Whether labels were added or removed since the last page refresh.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.scene.is_dirty()
    }

    #[must_use]
    pub fn options(&self) -> &DisplayOptions {
        &self.state.options
    }

    #[must_use]
    pub fn panel(&self) -> &P {
        &self.state.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.state.panel
    }
}

impl<P: PanelDriver + Send + 'static> DisplayGuard<'_, P> {
    /// Write `text` into the notification label and show it. With a
    /// duration, a timer hides it again unless a newer notification or a
    /// dismiss comes first.
    pub fn show_notification(&mut self, text: impl Into<TextSource>, duration: Option<Duration>) -> bool {
        self.state.show_notification(text.into(), duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::font::{FontHandle, MonoFont};
    use crate::label::TextShape;
    use crate::panel::{MemoryPanel, MemoryPanelOptions, PanelCall};

    fn font() -> Option<FontHandle> {
        Some(Arc::new(MonoFont::new(8, 10, -2)))
    }

    fn display() -> Display<MemoryPanel> {
        Display::new(MemoryPanel::with_options(MemoryPanelOptions {
            width: 64,
            height: 128,
            page_height: 32,
        }))
    }

    #[test]
    fn test_construction_clears_once() {
        let display = display();
        let calls = display.with_panel(|p| p.take_calls()).unwrap();
        assert_eq!(calls[0], PanelCall::Init);
        assert_eq!(calls[1], PanelCall::FullWindow);
        assert_eq!(display.stats().unwrap().full_refreshes, 1);
        assert_eq!(display.stats().unwrap().page_passes, 4);
    }

    #[test]
    fn test_lock_timeout_is_reported() {
        let display = display();
        let _held = display.lock().unwrap();
        let err = display
            .try_lock_for(Duration::from_millis(10))
            .err()
            .unwrap();
        assert!(matches!(err, Error::LockTimeout { timeout_ms: 10 }));
    }

    #[test]
    fn test_with_label_reports_missing_key() {
        let display = display();
        let err = display.with_label("nope", |l| l.x).unwrap_err();
        assert!(matches!(err, Error::LabelNotFound(ref k) if k == "nope"));
    }

    #[test]
    fn test_update_label_draws_and_records_region() {
        let display = display();
        display
            .add_label("t", Label::text(4, 20, TextShape::new("hi", font())))
            .unwrap();
        assert!(display.update_label("t").unwrap());

        let ui = display.lock().unwrap();
        let region = ui.label("t").unwrap().drawn_region().unwrap();
        assert_eq!(region, Rect::new(4, 10, 16, 12));
        assert_eq!(ui.stats().last_window, Some(region));
        assert!(ui.panel().ink_in(region) > 0);
        assert_eq!(ui.panel().ink_in(region), ui.panel().ink_count());
    }

    #[test]
    fn test_shrinking_text_leaves_no_ink_behind() {
        let display = display();
        display
            .add_label("t", Label::text(0, 20, TextShape::new("wide text", font())))
            .unwrap();
        display.update_label("t").unwrap();
        display.set_text("t", "a").unwrap();

        let ui = display.lock().unwrap();
        // Only the single remaining glyph cell is inked.
        assert_eq!(ui.panel().ink_count(), 7 * 12);
    }

    #[test]
    fn test_neighbour_survives_partial_refresh() {
        let display = display();
        {
            let mut ui = display.lock().unwrap();
            ui.add_label("box", Label::rect(0, 0, 30, 30, true).with_rotation(0));
            ui.add_label("dot", Label::rect(10, 10, 4, 4, true).with_rotation(0));
            ui.update_ui(false);
        }
        display.hide("dot").unwrap();
        let ui = display.lock().unwrap();
        assert_eq!(ui.panel().pixel(11, 11), Color::Black, "box must be redrawn");
    }

    #[test]
    fn test_degenerate_region_uses_fallback() {
        let display = display();
        display
            .add_label("empty", Label::rect(-50, -50, 0, 0, false))
            .unwrap();
        display.update_label("empty").unwrap();
        let stats = display.stats().unwrap();
        assert_eq!(stats.fallback_regions, 1);
        let window = stats.last_window.unwrap();
        assert_eq!((window.x, window.y), (0, 0));
        assert!(!window.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_noops() {
        let display = display();
        display.with_panel(|p| p.take_calls()).unwrap();
        assert!(!display.show("ghost").unwrap());
        assert!(!display.hide("ghost").unwrap());
        assert!(!display.update_label("ghost").unwrap());
        assert!(display.remove_label("ghost").unwrap().is_none());
        assert!(display.with_panel(|p| p.take_calls()).unwrap().is_empty());
    }

    #[test]
    fn test_replacement_inherits_drawn_region() {
        let display = display();
        display
            .add_label("a", Label::rect(0, 0, 20, 20, true).with_rotation(0))
            .unwrap();
        display.update_label("a").unwrap();
        display
            .add_label("a", Label::rect(0, 0, 5, 5, true).with_rotation(0))
            .unwrap();
        display.update_label("a").unwrap();
        let ui = display.lock().unwrap();
        assert_eq!(ui.panel().ink_count(), 25);
    }
}
