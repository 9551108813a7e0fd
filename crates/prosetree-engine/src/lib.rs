pub mod editing;
pub mod error;
pub mod model;
pub mod path;
pub mod schema;

// Re-export key types for easier usage
pub use editing::{CommandMap, EditorState, Selection, Transform};
pub use error::EditError;
pub use model::{Attrs, Block, Children, Inline, InlineLeaf, Mark, Node, TextRun};
pub use path::Path;
pub use schema::{ContentKind, MarkDefinition, NodeDefinition, Schema};
