//! Error types for epaper_ui.

use crate::inventory::ItemId;
use std::fmt;

/// Result type alias for epaper_ui operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for epaper_ui operations.
///
/// Rendering problems (unbound fonts, degenerate regions, failed scratch
/// allocations) are not represented here: they degrade to "draw nothing"
/// and are only logged.
#[derive(Debug)]
pub enum Error {
    /// The display lock could not be acquired within the configured timeout.
    LockTimeout { timeout_ms: u64 },
    /// No label is registered under the given key.
    LabelNotFound(String),
    /// No inventory item has the given id.
    ItemNotFound(ItemId),
    /// A consume request asked for more than the item holds.
    InsufficientQuantity {
        id: ItemId,
        available: f32,
        requested: f32,
    },
    /// Every id in the inventory's id range is taken.
    InventoryFull { max_items: u32 },
    /// A persisted record could not be encoded or decoded.
    Json(serde_json::Error),
    /// The key-value store rejected an operation.
    Storage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockTimeout { timeout_ms } => {
                write!(f, "display lock not acquired within {timeout_ms} ms")
            }
            Self::LabelNotFound(key) => write!(f, "label '{key}' not found"),
            Self::ItemNotFound(id) => write!(f, "item {id} not found"),
            Self::InsufficientQuantity {
                id,
                available,
                requested,
            } => {
                write!(
                    f,
                    "item {id}: insufficient quantity (have {available:.2}, consume {requested:.2})"
                )
            }
            Self::InventoryFull { max_items } => {
                write!(f, "inventory full ({max_items} items)")
            }
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::LockTimeout { timeout_ms: 250 };
        assert!(err.to_string().contains("250 ms"));

        let err = Error::LabelNotFound("status-time".to_string());
        assert!(err.to_string().contains("'status-time'"));

        let err = Error::InsufficientQuantity {
            id: 1001,
            available: 1.0,
            requested: 2.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("1001"));
        assert!(msg.contains("2.50"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
