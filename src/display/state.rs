//! Refresh reconciler.
//!
//! [`DisplayState`] owns the scene and the panel. Every method here assumes
//! the display lock is held, which is only true when it is reached through a
//! [`DisplayGuard`](super::DisplayGuard).

use super::render::render_label;
use super::timer::DismissTimer;
use super::{DisplayOptions, RefreshStats};
use crate::bounds::covering_region;
use crate::color::Color;
use crate::geometry::Rect;
use crate::label::{Label, TextSource};
use crate::panel::PanelDriver;
use crate::scene::SceneStore;
use chrono::{Datelike, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::Weak;
use std::time::Duration;
use tracing::{debug, warn};

/// Which labels a draw pass covers.
#[derive(Clone, Copy, Debug)]
enum Scope {
    /// Every label of the active page.
    Page,
    /// Active-page labels in `rotation` that touch `window`.
    Window { window: Rect, rotation: u8 },
}

pub(crate) struct DisplayState<P> {
    pub(super) panel: P,
    pub(super) scene: SceneStore,
    pub(super) options: DisplayOptions,
    pub(super) stats: RefreshStats,
    page: u16,
    /// Rotation last handed to the panel.
    rotation: Option<u8>,
    notification_generation: u64,
    /// Wall-clock time of the last status time write.
    last_status_update: Option<NaiveDateTime>,
    timer: Option<DismissTimer>,
    this: Weak<Mutex<DisplayState<P>>>,
}

/// Region a label covers in its current state. Text without a font gets
/// the configured conservative region around its anchor.
fn covering(label: &Label, options: &DisplayOptions) -> Rect {
    covering_region(label, options.line_gap).unwrap_or_else(|| {
        let (dx, dy, w, h) = options.unbound_font_region;
        Rect::new(label.x + dx, label.y + dy, w, h)
    })
}

impl Scope {
    fn includes(&self, label: &Label, options: &DisplayOptions) -> bool {
        match *self {
            Self::Page => true,
            Self::Window { window, rotation } => {
                let region = if label.visible {
                    (label.rotation == rotation).then(|| covering(label, options))
                } else {
                    label.drawn.filter(|(_, r)| *r == rotation).map(|(r, _)| r)
                };
                region.is_some_and(|r| r.intersect(&window).is_some())
            }
        }
    }
}

impl<P: PanelDriver> DisplayState<P> {
    pub(super) fn new(panel: P, options: DisplayOptions, this: Weak<Mutex<Self>>) -> Self {
        Self {
            panel,
            scene: SceneStore::new(),
            page: options.initial_page,
            options,
            stats: RefreshStats::default(),
            rotation: None,
            notification_generation: 0,
            last_status_update: None,
            timer: None,
            this,
        }
    }

    /// Bring the panel up and wipe whatever the last power cycle left on it.
    pub(super) fn initial_clear(&mut self) {
        self.panel.init();
        self.panel.set_full_window();
        self.paged(|state| state.panel.fill_screen(Color::BACKGROUND));
        self.stats.full_refreshes += 1;
    }

    pub(super) fn current_page(&self) -> u16 {
        self.page
    }

    /// Insert or replace a label. A replacement inherits the region its
    /// predecessor left on the panel, so the next refresh clears it.
    pub(super) fn add_label(&mut self, key: String, mut label: Label) -> Option<Label> {
        if let Some(previous) = self.scene.get(&key) {
            label.drawn = previous.drawn;
        }
        self.scene.add(key, label)
    }

    pub(super) fn remove_label(&mut self, key: &str) -> Option<Label> {
        let removed = self.scene.remove(key);
        if removed.is_none() {
            warn!(key, "remove of unknown label ignored");
        }
        removed
    }

    pub(super) fn show(&mut self, key: &str) -> bool {
        let Some(label) = self.scene.get_mut(key) else {
            warn!(key, "show of unknown label ignored");
            return false;
        };
        label.visible = true;
        if label.page == self.page {
            self.refresh_label(key);
        }
        true
    }

    pub(super) fn hide(&mut self, key: &str) -> bool {
        let Some(label) = self.scene.get_mut(key) else {
            warn!(key, "hide of unknown label ignored");
            return false;
        };
        if !label.visible {
            return true;
        }
        label.visible = false;
        if label.page == self.page {
            self.refresh_label(key);
        }
        true
    }

    pub(super) fn set_text(&mut self, key: &str, text: TextSource) -> bool {
        let Some(label) = self.scene.get_mut(key) else {
            warn!(key, "set_text on unknown label ignored");
            return false;
        };
        if !label.set_text(text) {
            warn!(key, kind = label.shape.kind(), "set_text on a non-text label ignored");
            return false;
        }
        if label.visible && label.page == self.page {
            self.refresh_label(key);
        }
        true
    }

    /// Write `now` as `HH:MM` into the status time label and refresh it.
    ///
    /// Runs at most once per `status_interval` unless `force` is set. A
    /// clock earlier than `min_clock_year` has not been synced yet and is
    /// not shown.
    pub(super) fn update_status_time(&mut self, now: NaiveDateTime, force: bool) -> bool {
        if let Some(last) = self.last_status_update.filter(|_| !force) {
            let elapsed = (now - last).to_std().unwrap_or_default();
            if elapsed <= self.options.status_interval {
                debug!(?elapsed, "status time update throttled");
                return false;
            }
        }
        if now.year() < self.options.min_clock_year {
            warn!(year = now.year(), "wall clock not set, status time skipped");
            return false;
        }

        let text = now.format("%H:%M").to_string();
        let key = self.options.status_time_key.clone();
        debug!(key = %key, time = %text, "updating status time");
        let updated = self.set_text(&key, TextSource::from(text));
        self.last_status_update = Some(now);
        updated
    }

    /// Partial refresh of one label.
    ///
    /// The window is the union of what the label last drew and what it
    /// covers now, clipped to the panel. Every active-page label touching
    /// the window is redrawn on each page pass so the white fill does not
    /// eat neighbours.
    ///
    /// A label whose rotation was edited since its last draw first gets a
    /// pass over its old region in the old rotation, since the two regions
    /// live in different coordinate frames.
    pub(super) fn refresh_label(&mut self, key: &str) -> bool {
        let Some(label) = self.scene.get(key) else {
            warn!(key, "update of unknown label ignored");
            return false;
        };
        if label.page != self.page {
            debug!(key, page = label.page, active = self.page, "label not on active page, skipped");
            return true;
        }

        let rotation = label.rotation;
        let visible = label.visible;
        if let Some((old, old_rotation)) = label.drawn.filter(|(_, r)| *r != rotation) {
            debug!(key, old_rotation, rotation, "rotation changed, clearing old region");
            let window = self.partial_pass(old, old_rotation);
            self.note_redrawn_neighbours(key, window, old_rotation);
            if let Some(label) = self.scene.get_mut(key) {
                label.drawn = None;
            }
            if !visible {
                return true;
            }
        }

        let Some(label) = self.scene.get(key) else {
            return false;
        };
        let region = self.invalidated_region(label);
        let window = self.partial_pass(region, rotation);
        debug!(key, ?window, "partial refresh");

        self.note_redrawn_neighbours(key, window, rotation);
        let options = &self.options;
        if let Some(label) = self.scene.get_mut(key) {
            label.drawn = label.visible.then(|| (covering(label, options), rotation));
        }
        true
    }

    /// One partial-window paged cycle over `region` in `rotation`. Returns
    /// the window actually used.
    fn partial_pass(&mut self, region: Rect, rotation: u8) -> Rect {
        self.rotate(rotation);
        let window = self.clamp_window(region);
        self.panel.set_partial_window(window);
        self.paged(|state| state.draw_pass(Scope::Window { window, rotation }));
        self.stats.partial_refreshes += 1;
        self.stats.last_window = Some(window);
        window
    }

    /// Record that visible labels in `rotation` touching `window` were
    /// redrawn by the last pass.
    fn note_redrawn_neighbours(&mut self, key: &str, window: Rect, rotation: u8) {
        let page = self.page;
        let options = &self.options;
        for (k, label) in self.scene.iter_mut() {
            if k == key || label.page != page || !label.visible || label.rotation != rotation {
                continue;
            }
            let region = covering(label, options);
            if region.intersect(&window).is_none() {
                continue;
            }
            label.drawn = match label.drawn {
                None => Some((region, rotation)),
                Some((drawn, r)) if r == rotation => Some((drawn.union(&region), rotation)),
                // Still owes a clear in its old rotation.
                other => other,
            };
        }
    }

    /// Redraw the active page. A full refresh flashes the whole panel; a
    /// partial one runs the same pass over a whole-screen partial window.
    pub(super) fn update_ui(&mut self, full: bool) {
        if full {
            self.panel.set_full_window();
        } else {
            let screen = self.screen();
            self.panel.set_partial_window(screen);
        }
        debug!(full, page = self.page, "page refresh");
        self.paged(|state| state.draw_pass(Scope::Page));
        if full {
            self.stats.full_refreshes += 1;
        } else {
            self.stats.partial_refreshes += 1;
        }
        self.stats.last_window = Some(self.screen());
        self.sync_drawn_regions();
        self.scene.mark_clean();
    }

    /// Switch the active page and redraw it over the full window.
    pub(super) fn set_page(&mut self, page: u16) {
        if page == self.page {
            debug!(page, "page already active");
            return;
        }
        self.page = page;
        self.update_ui(true);
    }

    fn invalidated_region(&self, label: &Label) -> Rect {
        let now = label.visible.then(|| covering(label, &self.options));
        match (label.drawn_region(), now) {
            (Some(drawn), Some(now)) => drawn.union(&now),
            (Some(drawn), None) => drawn,
            (None, Some(now)) => now,
            (None, None) => covering(label, &self.options),
        }
    }

    fn screen(&self) -> Rect {
        Rect::new(0, 0, self.panel.width(), self.panel.height())
    }

    /// Clip `region` to the panel, substituting the fallback size when
    /// nothing of it is left.
    fn clamp_window(&mut self, region: Rect) -> Rect {
        let screen = self.screen();
        if let Some(window) = region.intersect(&screen) {
            return window;
        }
        self.stats.fallback_regions += 1;
        let (width, height) = self.options.fallback_size;
        let x = region.x.clamp(0, (screen.right() - 1).max(0));
        let y = region.y.clamp(0, (screen.bottom() - 1).max(0));
        let fallback = Rect::new(x, y, width.max(1), height.max(1));
        warn!(?region, ?fallback, "degenerate refresh region replaced");
        fallback.intersect(&screen).unwrap_or(fallback)
    }

    fn rotate(&mut self, rotation: u8) {
        if self.rotation != Some(rotation) {
            self.panel.set_rotation(rotation);
            self.rotation = Some(rotation);
        }
    }

    fn paged(&mut self, mut pass: impl FnMut(&mut Self)) {
        self.panel.first_page();
        loop {
            self.stats.page_passes += 1;
            pass(self);
            if !self.panel.next_page() {
                break;
            }
        }
    }

    /// One page pass: clear to white, then let hidden labels clear their
    /// old regions before any visible label draws.
    fn draw_pass(&mut self, scope: Scope) {
        self.panel.fill_screen(Color::BACKGROUND);
        let gap = self.options.line_gap;
        for visible in [false, true] {
            for (_, label) in self.scene.iter_page(self.page) {
                if label.visible != visible || !scope.includes(label, &self.options) {
                    continue;
                }
                // Hidden labels clear in the frame they were drawn in.
                let rotation = if visible {
                    label.rotation
                } else {
                    label.drawn_rotation().unwrap_or(label.rotation)
                };
                if self.rotation != Some(rotation) {
                    self.panel.set_rotation(rotation);
                    self.rotation = Some(rotation);
                }
                render_label(&mut self.panel, label, gap);
                if visible {
                    self.stats.labels_drawn += 1;
                }
            }
        }
    }

    fn sync_drawn_regions(&mut self) {
        let page = self.page;
        let options = &self.options;
        for (_, label) in self.scene.iter_mut() {
            label.drawn = (label.page == page && label.visible)
                .then(|| (covering(label, options), label.rotation));
        }
    }

    pub(super) fn dismiss_notification(&mut self) -> bool {
        self.notification_generation += 1;
        if let Some(timer) = &self.timer {
            timer.cancel();
        }
        let key = self.options.notification_key.clone();
        self.hide(&key)
    }

    fn expire_notification(&mut self, generation: u64) {
        if generation != self.notification_generation {
            debug!(generation, current = self.notification_generation, "stale dismiss ignored");
            return;
        }
        let key = self.options.notification_key.clone();
        self.hide(&key);
    }
}

impl<P: PanelDriver + Send + 'static> DisplayState<P> {
    /// Put `text` into the notification label and show it. With a
    /// duration, the label hides itself once it elapses unless another
    /// notification replaces it first.
    pub(super) fn show_notification(&mut self, text: TextSource, duration: Option<Duration>) -> bool {
        self.notification_generation += 1;
        let generation = self.notification_generation;
        let key = self.options.notification_key.clone();

        let Some(label) = self.scene.get_mut(&key) else {
            warn!(key = %key, "no notification label registered");
            return false;
        };
        if !label.set_text(text) {
            warn!(key = %key, kind = label.shape.kind(), "notification label is not text");
            return false;
        }
        label.visible = true;
        if label.page == self.page {
            self.refresh_label(&key);
        }

        match duration {
            Some(delay) => self.arm_dismiss(delay, generation),
            None => {
                if let Some(timer) = &self.timer {
                    timer.cancel();
                }
            }
        }
        true
    }

    fn arm_dismiss(&mut self, delay: Duration, generation: u64) {
        if self.timer.is_none() {
            let this = self.this.clone();
            let timeout = self.options.lock_timeout;
            match DismissTimer::spawn(move |generation| expire(&this, timeout, generation)) {
                Ok(timer) => self.timer = Some(timer),
                Err(e) => {
                    warn!(error = %e, "could not start dismiss timer");
                    return;
                }
            }
        }
        if let Some(timer) = &self.timer {
            timer.arm(delay, generation);
        }
    }
}

/// Timer-thread side of an auto-dismiss: take the display lock like any
/// other caller, then hide the notification if nothing re-armed it.
fn expire<P: PanelDriver>(
    this: &Weak<Mutex<DisplayState<P>>>,
    timeout: Option<Duration>,
    generation: u64,
) {
    let Some(shared) = this.upgrade() else {
        return;
    };
    let guard = match timeout {
        Some(timeout) => shared.try_lock_for(timeout),
        None => Some(shared.lock()),
    };
    let Some(mut state) = guard else {
        warn!(generation, "display lock timed out, notification left visible");
        return;
    };
    state.expire_notification(generation);
}
