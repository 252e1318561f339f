use log::debug;

use crate::editing::cursor::{Ancestor, Cursor, Landmark};
use crate::editing::range::Range;
use crate::error::TreeError;
use crate::tree::{Dir, Document, NodeId};

/// A [`Range`] with a direction: one boundary is the *focus* that moves when
/// the selection is extended, the other is the *anchor* side.
///
/// The selection always lives in the shallowest group containing both ends,
/// but extending it must still remember where the user started, which may be
/// nested deeper. That original position is kept as [`Selection::anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    range: Range,
    focus: Dir,
    anchor: Cursor,
}

impl Selection {
    /// Build the selection spanning `anchor` to `focus`.
    ///
    /// The cursors may sit in arbitrarily nested groups; the selection is
    /// normalised to the deepest group common to both ancestor chains. Fails
    /// with [`TreeError::DisjointTrees`] when the chains never meet, which
    /// means the cursors were not taken from the same tree.
    pub fn of(doc: &Document, anchor: Cursor, focus: Cursor) -> Result<Self, TreeError> {
        let anchor_chain = anchor.parents(doc);
        let focus_chain = focus.parents(doc);
        let (a, f) = anchor_chain
            .iter()
            .find_map(|a| {
                focus_chain
                    .iter()
                    .find(|f| f.group == a.group)
                    .map(|f| (*a, *f))
            })
            .ok_or(TreeError::DisjointTrees)?;

        let group = a.group;
        let (range, side) = if precedes(doc, &a, &f) {
            (Range::new(group, lower(doc, &a), upper(doc, &f)), Dir::Right)
        } else {
            (Range::new(group, lower(doc, &f), upper(doc, &a)), Dir::Left)
        };
        debug!(
            "selection normalised to {group:?} ({} levels above anchor), focus {side:?}",
            anchor_chain.iter().position(|x| x.group == group).unwrap_or(0)
        );
        Ok(Self {
            range,
            focus: side,
            anchor,
        })
    }

    /// Empty selection at `cursor`.
    pub fn point(doc: &Document, cursor: Cursor) -> Self {
        Self {
            range: cursor.span(doc),
            focus: Dir::Right,
            anchor: cursor,
        }
    }

    /// Exactly `node`, with the focus on its `dir` side.
    ///
    /// Only a node linked into a group can be selected.
    pub fn select(doc: &Document, node: NodeId, dir: Dir) -> Result<Self, TreeError> {
        if !doc.contains_node(node) {
            return Err(TreeError::StaleNode(node));
        }
        let (Some(range), Some(anchor)) = (
            Range::around(doc, node),
            Cursor::beside(doc, node, dir.opposite()),
        ) else {
            return Err(TreeError::Detached(node));
        };
        Ok(Self {
            range,
            focus: dir,
            anchor,
        })
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Which boundary is the focus.
    pub fn focus_side(&self) -> Dir {
        self.focus
    }

    /// The true anchor, possibly nested below [`Selection::range`]'s group.
    pub fn anchor(&self) -> Cursor {
        self.anchor
    }

    pub fn focus_cursor(&self, doc: &Document) -> Cursor {
        self.range.cursor(doc, self.focus)
    }

    pub fn is_point(&self, doc: &Document) -> bool {
        self.range.is_empty(doc)
    }

    pub fn contents(&self, doc: &Document) -> Vec<NodeId> {
        self.range.contents(doc)
    }

    /// Swap focus and anchor sides without changing the content.
    pub fn flip(self, doc: &Document) -> Self {
        Self {
            range: self.range,
            focus: self.focus.opposite(),
            anchor: self.range.cursor(doc, self.focus),
        }
    }

    /// Extend or shrink by one node at the focus.
    ///
    /// Shrinking away the node that holds a nested anchor re-enters that node
    /// instead, so the selection returns to the level the anchor lives on.
    pub fn move_focus(self, doc: &Document, dir: Dir) -> Option<Self> {
        self.step(doc, dir, Range::move_boundary)
    }

    /// Word-wise variant of [`Selection::move_focus`].
    pub fn move_focus_by_word(self, doc: &Document, dir: Dir) -> Option<Self> {
        self.step(doc, dir, Range::move_by_word)
    }

    /// Extend from the anchor to the `dir` end of the current group.
    pub fn move_focus_to_end(self, doc: &Document, dir: Dir) -> Option<Self> {
        let end = Cursor::at_end(doc, self.range.group, dir);
        let next = Self::of(doc, self.anchor, end).ok()?;
        (next != self).then_some(next)
    }

    /// Jump to selecting the whole enclosing node.
    ///
    /// At the top level, where nothing encloses the selection, this extends
    /// to the end instead.
    pub fn move_focus_fast(self, doc: &Document, dir: Dir) -> Option<Self> {
        match self.range.escape(doc) {
            Some(range) => Some(Self {
                range,
                focus: dir,
                anchor: self.anchor,
            }),
            None => self.move_focus_to_end(doc, dir),
        }
    }

    fn step(
        self,
        doc: &Document,
        dir: Dir,
        advance: fn(Range, &Document, Dir, Dir) -> Option<Range>,
    ) -> Option<Self> {
        let point = self.range.is_empty(doc);
        let side = if point { dir } else { self.focus };

        if !point && dir != side {
            if let Some(nested) = self.redescend(doc) {
                return Some(nested);
            }
        }

        let range = advance(self.range, doc, side, dir)?;
        Some(Self {
            range,
            focus: side,
            anchor: self.anchor,
        })
    }

    /// When the node about to be shrunk off the focus side contains the
    /// anchor, reselect from the anchor to the focus-side end of the child
    /// group the anchor sits in.
    fn redescend(&self, doc: &Document) -> Option<Self> {
        let inner = self.range.at(doc, self.focus)?;
        let via = self.anchor.parents(doc).into_iter().find_map(|Ancestor { at, .. }| match at {
            Landmark::Node { node, via } if node == inner => Some(via),
            _ => None,
        })?;
        debug!("re-entering {inner:?} through {via:?} towards the anchor");
        Self::of(doc, self.anchor, Cursor::at_end(doc, via, self.focus)).ok()
    }
}

/// Left gap of an ancestor landmark.
fn lower(doc: &Document, landmark: &Ancestor) -> Option<NodeId> {
    match landmark.at {
        Landmark::Cursor(cursor) => cursor.left(doc),
        Landmark::Node { node, .. } => doc.sibling(node, Dir::Left),
    }
}

/// Right gap of an ancestor landmark.
fn upper(doc: &Document, landmark: &Ancestor) -> Option<NodeId> {
    match landmark.at {
        Landmark::Cursor(cursor) => cursor.right,
        Landmark::Node { node, .. } => doc.sibling(node, Dir::Right),
    }
}

fn start(landmark: &Ancestor) -> Option<NodeId> {
    match landmark.at {
        Landmark::Cursor(cursor) => cursor.right,
        Landmark::Node { node, .. } => Some(node),
    }
}

/// Whether `a` begins no later than `b` in their shared group, found by
/// walking right siblings from `a`.
fn precedes(doc: &Document, a: &Ancestor, b: &Ancestor) -> bool {
    let (from, target) = (start(a), start(b));
    if from == target {
        return match (a.at, b.at) {
            (Landmark::Node { node, via: va }, Landmark::Node { via: vb, .. }) => {
                doc.child_index(node, va) <= doc.child_index(node, vb)
            }
            // a cursor just left of a node comes before the node
            (Landmark::Node { .. }, Landmark::Cursor(_)) => false,
            _ => true,
        };
    }
    let mut current = from;
    while let Some(node) = current {
        current = doc.sibling(node, Dir::Right);
        if current == target {
            return true;
        }
    }
    false
}
