use crate::editing::{range::Range, selection::Selection};
use crate::tree::{Dir, Document, GroupId, NodeId};
use crate::view::Geometry;

/// A zero-width position between two nodes of one group.
///
/// Only the right neighbour is stored; the left one is derived on demand.
/// Cursors are not updated by mutations: one whose right neighbour has been
/// removed must be replaced by a cursor taken from the mutation's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub group: GroupId,
    /// Node immediately to the right, `None` at the group's right end.
    pub right: Option<NodeId>,
}

/// Result of a navigation or deletion request.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Moved,
    /// Nothing to move into or out of; the caller decides what happens next
    /// (for instance handing focus to a neighbouring widget).
    Blocked,
}

impl Movement {
    pub fn moved(self) -> bool {
        self == Movement::Moved
    }
}

/// Where an ancestor chain passes through a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landmark {
    /// The original cursor, in its own group.
    Cursor(Cursor),
    /// An enclosing node, reached through its child group `via`.
    Node { node: NodeId, via: GroupId },
}

/// One level of a cursor's ancestor chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestor {
    pub group: GroupId,
    pub at: Landmark,
}

impl Cursor {
    pub fn new(group: GroupId, right: Option<NodeId>) -> Self {
        Self { group, right }
    }

    /// Cursor at the `side` end of `group`.
    pub fn at_end(doc: &Document, group: GroupId, side: Dir) -> Self {
        match side {
            Dir::Left => Self::new(group, doc.end(group, Dir::Left)),
            Dir::Right => Self::new(group, None),
        }
    }

    /// Cursor immediately on the `side` side of `node`; `None` if detached.
    pub fn beside(doc: &Document, node: NodeId, side: Dir) -> Option<Self> {
        let group = doc.parent(node)?;
        let right = match side {
            Dir::Left => Some(node),
            Dir::Right => doc.sibling(node, Dir::Right),
        };
        Some(Self::new(group, right))
    }

    pub fn left(&self, doc: &Document) -> Option<NodeId> {
        match self.right {
            Some(right) => doc.sibling(right, Dir::Left),
            None => doc.end(self.group, Dir::Right),
        }
    }

    pub fn neighbor(&self, doc: &Document, dir: Dir) -> Option<NodeId> {
        match dir {
            Dir::Left => self.left(doc),
            Dir::Right => self.right,
        }
    }

    /// Whether the cursor still addresses a live position.
    pub fn is_valid(&self, doc: &Document) -> bool {
        doc.contains_group(self.group)
            && self
                .right
                .is_none_or(|right| doc.parent(right) == Some(self.group))
    }

    /// The point range at this cursor.
    pub fn span(&self, doc: &Document) -> Range {
        Range::new(self.group, self.left(doc), self.right)
    }

    /// An empty selection anchored here.
    pub fn selection(&self, doc: &Document) -> Selection {
        Selection::point(doc, *self)
    }

    /// Ancestor chain, innermost first: this cursor in its own group, then
    /// each enclosing node in the group that contains it.
    pub fn parents(&self, doc: &Document) -> Vec<Ancestor> {
        let mut chain = vec![Ancestor {
            group: self.group,
            at: Landmark::Cursor(*self),
        }];
        let mut group = self.group;
        while let Some(node) = doc.owner(group) {
            let Some(parent) = doc.parent(node) else {
                break;
            };
            chain.push(Ancestor {
                group: parent,
                at: Landmark::Node { node, via: group },
            });
            group = parent;
        }
        chain
    }

    /// Insert the detached group `block` here, leaving the cursor on the
    /// `dir` side of the inserted content.
    pub fn insert(&mut self, doc: &mut Document, block: GroupId, dir: Dir) {
        let left = self.left(doc);
        if let Some((first, _)) = doc.insert(self.group, block, left, self.right)
            && dir == Dir::Left
        {
            self.right = Some(first);
        }
    }

    /// Delete towards `dir`.
    ///
    /// A neighbouring node decides what deleting it means; at a group's end
    /// the enclosing node decides what losing that group means.
    pub fn delete(&mut self, doc: &mut Document, dir: Dir) -> Movement {
        if let Some(node) = self.neighbor(doc, dir)
            && let Some(kind) = doc.kind(node)
        {
            kind.delete(doc, node, self, dir.opposite());
            return Movement::Moved;
        }
        if let Some(owner) = doc.owner(self.group)
            && doc.parent(owner).is_some()
            && let Some(kind) = doc.kind(owner)
        {
            let group = self.group;
            kind.delete_block(doc, owner, self, dir, group);
            return Movement::Moved;
        }
        Movement::Blocked
    }

    /// Cursor nearest to `pos` inside `group`, for pointer placement.
    pub fn seek(doc: &Document, group: GroupId, pos: f32, geometry: &dyn Geometry) -> Self {
        let Some(node) = doc.command_at(group, pos, geometry) else {
            return Self::at_end(doc, group, Dir::Right);
        };
        doc.kind(node)
            .and_then(|kind| kind.focus(doc, node, pos, geometry))
            .unwrap_or(Self::new(group, Some(node)))
    }

    /// Which side of `node` `pos` is closer to, by the half of its span it
    /// falls in. Exact midpoints follow [`EditorOptions::vertical_tie`].
    ///
    /// [`EditorOptions::vertical_tie`]: crate::EditorOptions::vertical_tie
    pub fn nearest_side(doc: &Document, node: NodeId, pos: f32, geometry: &dyn Geometry) -> Dir {
        let Some(extent) = doc.view(node).and_then(|view| geometry.extent(view)) else {
            return Dir::Left;
        };
        let mid = extent.mid();
        if pos < mid {
            Dir::Left
        } else if pos > mid {
            Dir::Right
        } else {
            doc.options().vertical_tie
        }
    }
}
