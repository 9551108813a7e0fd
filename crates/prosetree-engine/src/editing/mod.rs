//! # Editing core
//!
//! Everything that turns user intent into validated tree rewrites:
//!
//! - **`state`**: [`EditorState`], document root plus selection, replaced
//!   atomically by every successful transform.
//! - **`selection`**: anchor/focus selections and the annotation mechanism
//!   that carries them through whole-tree rewrites.
//! - **`commands`**: the [`CommandMap`] binding input events to ordered
//!   transform lists, run first-match-wins.
//! - **`lists`**: split/lift/wrap/join transforms for lists, the most
//!   demanding consumer of the node operations.

pub mod commands;
pub mod lists;
pub mod selection;
pub mod state;

pub use commands::{CommandMap, Transform};
pub use selection::{SELECTION_ANCHOR, SELECTION_FOCUS, Selection};
pub use state::EditorState;
