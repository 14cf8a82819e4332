//! `epaper_ui` - retained-mode label UI for paged e-paper panels
//!
//! Labels (text, shapes, bitmaps) live in a keyed scene. Each change is
//! pushed to the panel as the smallest partial refresh that covers both the
//! old and the new pixels, while page switches repaint the full window.
//! A small fridge inventory feeds dynamic text into the UI.

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Quantities are small
#![allow(clippy::cast_possible_wrap)] // Intentional coordinate conversions
#![allow(clippy::module_name_repetitions)] // Allow label::LabelShape etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::too_many_arguments)] // GFX-style draw signatures
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod bounds;
pub mod color;
pub mod display;
pub mod error;
pub mod font;
pub mod geometry;
pub mod inventory;
pub mod label;
pub mod panel;
pub mod scene;
pub mod text;

// Re-export core types at crate root
pub use color::Color;
pub use error::{Error, Result};
pub use geometry::Rect;

pub use bounds::{TextLayout, covering_region, layout_text, text_bounds};
pub use display::{Display, DisplayGuard, DisplayOptions, RefreshStats};
pub use font::{FontHandle, MonoFont, TextMetrics};
pub use label::{Align, Label, Shape, TextShape, TextSource};
pub use panel::{MemoryPanel, MemoryPanelOptions, PanelDriver};
pub use scene::SceneStore;

// Re-export inventory types
pub use inventory::{Inventory, InventoryOptions, Item, ItemCategory, ItemId, KvStore, MemoryStore};
