//! CopperDraft core: data model and editing logic for a 2D PCB layout
//! editor.
//!
//! Everything here is headless. World coordinates are `f64` millimeters
//! with the y axis pointing down; the [`camera`] maps them to screen
//! pixels. An [`editor::Editor`] owns one board document, its undo
//! history, the active tool, and the design rules; rendering and UI live
//! in downstream crates built on the [`editor`] state and the
//! `copperdraft-render` display list.

pub mod board;
pub mod camera;
pub mod drc;
pub mod editor;
pub mod element;
pub mod export;
pub mod footprint;
pub mod geometry;
pub mod history;
pub mod input;
pub mod net;
pub mod route;
pub mod snap;
pub mod storage;
pub mod tools;

pub use board::BoardDocument;
pub use camera::Camera;
pub use drc::{RuleKind, RuleSet, Violation};
pub use editor::{DrawingDefaults, Editor, LayerSettings, RuleField};
pub use element::{Element, ElementId, Layer};
pub use history::{History, MAX_HISTORY};
pub use input::{Modifiers, PointerButton, PointerEvent};
pub use net::PadRef;
pub use snap::{SnapKind, SnapResult};
pub use storage::{BoardSnapshot, FileStorage, MemoryStorage, Storage, DEFAULT_BOARD_KEY};
pub use tools::ToolKind;
