//! Board persistence.
//!
//! A snapshot carries the elements plus viewport, drawing defaults, and
//! rules. Loading is deliberately forgiving: missing or mistyped fields
//! fall back to defaults and malformed elements are skipped with a log
//! line, so a damaged board never refuses to open.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drc::RuleSet;
use crate::editor::DrawingDefaults;
use crate::element::Element;

/// Key the editor saves the working board under.
pub const DEFAULT_BOARD_KEY: &str = "copperdraft.board.v1";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no board stored under key {0:?}")]
    NotFound(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSnapshot {
    pub elements: Vec<Element>,
    pub viewport: Viewport,
    pub defaults: DrawingDefaults,
    pub rules: RuleSet,
}

impl BoardSnapshot {
    /// Parse a snapshot, recovering whatever is usable. Field-level
    /// defaulting: a broken `elements` entry is dropped, a broken or
    /// missing section resets to its default.
    pub fn from_json_lossy(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("snapshot is not valid json, starting empty: {err}");
                return Self::default();
            }
        };

        let mut snapshot = Self::default();
        match value.get("elements") {
            Some(serde_json::Value::Array(items)) => {
                for item in items {
                    match serde_json::from_value::<Element>(item.clone()) {
                        Ok(element) => {
                            // Structurally valid but geometrically degenerate
                            // elements are dropped too: a trace needs two points
                            if let Element::Trace(t) = &element {
                                if t.points.len() < 2 {
                                    log::warn!(
                                        "skipping trace with {} point(s)",
                                        t.points.len()
                                    );
                                    continue;
                                }
                            }
                            snapshot.elements.push(element);
                        }
                        Err(err) => log::warn!("skipping malformed element: {err}"),
                    }
                }
            }
            Some(_) => log::warn!("elements field is not a list, resetting to empty"),
            None => {}
        }
        snapshot.viewport = recover(&value, "viewport");
        snapshot.defaults = recover(&value, "defaults");
        snapshot.rules = recover(&value, "rules");
        snapshot
    }
}

fn recover<T: Default + for<'de> Deserialize<'de>>(value: &serde_json::Value, field: &str) -> T {
    match value.get(field) {
        Some(section) => serde_json::from_value(section.clone()).unwrap_or_else(|err| {
            log::warn!("recovering {field} with defaults: {err}");
            T::default()
        }),
        None => T::default(),
    }
}

/// Synchronous key/value persistence for board snapshots.
pub trait Storage {
    fn save(&self, key: &str, snapshot: &BoardSnapshot) -> Result<(), StorageError>;
    fn load(&self, key: &str) -> Result<BoardSnapshot, StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
    fn exists(&self, key: &str) -> bool;
    fn list(&self) -> Result<Vec<String>, StorageError>;
}
