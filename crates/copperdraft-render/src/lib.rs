//! Display-list renderer for CopperDraft.
//!
//! [`build_scene`] turns editor state into an ordered list of fill and
//! stroke primitives. The list is backend-neutral: a GPU canvas, a CPU
//! rasterizer, or a test can all walk it the same way.

pub mod scene;

pub use scene::{build_scene, Primitive, Scene, SceneInput};
