//! Keyed label storage.

use crate::label::Label;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Owns every label of one display, keyed by a caller-chosen string.
///
/// Iteration order is by key. Nothing in the refresh logic depends on it,
/// but a stable order keeps overlapping labels painting the same way from
/// one refresh to the next.
#[derive(Debug, Default)]
pub struct SceneStore {
    labels: BTreeMap<String, Label>,
    dirty: bool,
}

impl SceneStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a label. Returns the label that was replaced.
    pub fn add(&mut self, key: impl Into<String>, label: Label) -> Option<Label> {
        self.dirty = true;
        match self.labels.entry(key.into()) {
            Entry::Occupied(mut slot) => Some(std::mem::replace(slot.get_mut(), label)),
            Entry::Vacant(slot) => {
                slot.insert(label);
                None
            }
        }
    }

    /// Remove and return a label.
    pub fn remove(&mut self, key: &str) -> Option<Label> {
        let removed = self.labels.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Label> {
        self.labels.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Label> {
        self.labels.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Label)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Label)> {
        self.labels.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Labels tagged with `page`.
    pub fn iter_page(&self, page: u16) -> impl Iterator<Item = (&str, &Label)> {
        self.iter().filter(move |(_, l)| l.page == page)
    }

    /// Keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    /// Whether labels were added or removed since the last full redraw.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Drop every label.
    pub fn clear(&mut self) {
        if !self.labels.is_empty() {
            self.dirty = true;
        }
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_get_remove() {
        let mut scene = SceneStore::new();
        assert!(scene.add("a", Label::pixel(1, 1)).is_none());
        assert!(scene.contains("a"));
        assert_eq!(scene.get("a").unwrap().x, 1);

        scene.get_mut("a").unwrap().x = 5;
        assert_eq!(scene.get("a").unwrap().x, 5);

        let removed = scene.remove("a").unwrap();
        assert_eq!(removed.x, 5);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_add_replaces_existing() {
        let mut scene = SceneStore::new();
        scene.add("a", Label::pixel(1, 1));
        let old = scene.add("a", Label::pixel(2, 2)).unwrap();
        assert_eq!(old.x, 1);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get("a").unwrap().x, 2);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut scene = SceneStore::new();
        assert!(!scene.is_dirty());
        scene.add("a", Label::pixel(0, 0));
        assert!(scene.is_dirty());
        scene.mark_clean();
        assert!(scene.remove("missing").is_none());
        assert!(!scene.is_dirty());
        scene.remove("a");
        assert!(scene.is_dirty());
    }

    #[test]
    fn test_iter_page_filters() {
        let mut scene = SceneStore::new();
        scene.add("a", Label::pixel(0, 0).on_page(1));
        scene.add("b", Label::pixel(0, 0).on_page(2));
        scene.add("c", Label::pixel(0, 0).on_page(2));
        let keys: Vec<&str> = scene.iter_page(2).map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert_eq!(scene.iter_page(9).count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut scene = SceneStore::new();
        scene.add("a", Label::pixel(0, 0));
        scene.mark_clean();
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.is_dirty());
    }
}
