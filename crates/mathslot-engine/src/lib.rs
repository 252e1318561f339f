pub mod editing;
pub mod error;
pub mod kinds;
pub mod options;
pub mod serialize;
pub mod tree;
pub mod view;

// Re-export key types for easier usage
pub use editing::{commands::*, cursor::*, range::*, selection::*};
pub use error::TreeError;
pub use options::EditorOptions;
pub use serialize::Token;
pub use tree::{Dir, Document, GroupId, NodeId, NodeKind, VDir, VertExit};
pub use view::{Arrangement, Extent, Geometry, NoGeometry, Renderer, ViewHandle};
