//! Seams between the tree and whatever draws it.
//!
//! The tree never lays anything out itself. A [`Renderer`] is told which
//! nodes changed after each edit and hands back opaque [`ViewHandle`]s; a
//! [`Geometry`] answers where those views ended up on screen. Vertical
//! movement and pointer placement read positions only through `Geometry`,
//! which is passed by shared reference next to the document and therefore
//! cannot change the tree while a walk is in progress.

pub mod headless;

use serde::{Deserialize, Serialize};

use crate::tree::{Document, GroupId, NodeId};

/// Opaque token identifying a node's rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewHandle(u64);

impl ViewHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Horizontal span of a rendered node or group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub left: f32,
    pub right: f32,
}

impl Extent {
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn mid(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// Half-open containment: the right edge belongs to the next span.
    pub fn contains(&self, pos: f32) -> bool {
        self.left <= pos && pos < self.right
    }
}

/// How a node's child groups are placed relative to each other.
///
/// Purely a hint for hosts; navigation never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Arrangement {
    /// No children: the node draws its own text.
    Leaf,
    /// Children side by side, between `padding` on each side.
    Row { padding: f32 },
    /// Children on top of each other, each centred.
    Stack { padding: f32 },
    /// Children row-major in `columns` columns, `gap` between cells.
    Grid {
        columns: usize,
        padding: f32,
        gap: f32,
    },
}

/// Receives view resynchronisation requests at the end of each edit.
pub trait Renderer {
    /// (Re)render `node` and return its handle. Called innermost first, so
    /// child nodes already carry fresh handles.
    fn render(&mut self, doc: &Document, node: NodeId) -> ViewHandle;

    /// `view` will not be referenced again.
    fn discard(&mut self, view: ViewHandle) {
        let _ = view;
    }
}

/// Screen positions of rendered views, as measured by the host.
pub trait Geometry {
    fn extent(&self, view: ViewHandle) -> Option<Extent>;

    /// Span of a child group's content area.
    fn group_extent(&self, group: GroupId) -> Option<Extent>;
}

/// Geometry of a document that has not been laid out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl Geometry for NoGeometry {
    fn extent(&self, _view: ViewHandle) -> Option<Extent> {
        None
    }

    fn group_extent(&self, _group: GroupId) -> Option<Extent> {
        None
    }
}
