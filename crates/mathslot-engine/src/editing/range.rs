use log::trace;

use crate::editing::cursor::Cursor;
use crate::tree::{Dir, Document, GroupId, NodeId};

/// A contiguous, possibly empty, run of nodes inside one group.
///
/// The run is delimited by two *excluded* boundary nodes; `None` stands for
/// the group's end on that side. A range is a view, not an owner: any number
/// of ranges may overlap, but once one of them has been consumed by
/// [`Range::splice`] or [`Range::remove`] the others must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub group: GroupId,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Range {
    /// # Preconditions
    ///
    /// Both boundaries belong to `group`, with `left` strictly before `right`.
    pub fn new(group: GroupId, left: Option<NodeId>, right: Option<NodeId>) -> Self {
        Self { group, left, right }
    }

    /// Everything in `group`.
    pub fn all(group: GroupId) -> Self {
        Self::new(group, None, None)
    }

    /// Exactly `node`; `None` when it is detached.
    pub fn around(doc: &Document, node: NodeId) -> Option<Self> {
        let group = doc.parent(node)?;
        Some(Self::new(
            group,
            doc.sibling(node, Dir::Left),
            doc.sibling(node, Dir::Right),
        ))
    }

    /// `first` through `last` inclusive, which must share a group in that order.
    pub fn between(doc: &Document, first: NodeId, last: NodeId) -> Option<Self> {
        let group = doc.parent(first)?;
        Some(Self::new(
            group,
            doc.sibling(first, Dir::Left),
            doc.sibling(last, Dir::Right),
        ))
    }

    pub fn bound(&self, side: Dir) -> Option<NodeId> {
        match side {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    pub fn with_bound(self, side: Dir, bound: Option<NodeId>) -> Self {
        match side {
            Dir::Left => Self { left: bound, ..self },
            Dir::Right => Self {
                right: bound,
                ..self
            },
        }
    }

    /// The node just inside the `side` boundary.
    ///
    /// For an empty range this is the opposite boundary node itself.
    pub fn at(&self, doc: &Document, side: Dir) -> Option<NodeId> {
        match self.bound(side) {
            Some(bound) => doc.sibling(bound, side.opposite()),
            None => doc.end(self.group, side),
        }
    }

    pub fn is_empty(&self, doc: &Document) -> bool {
        self.at(doc, Dir::Left) == self.right
    }

    /// Lazy left-to-right walk over the contained nodes. Ranges are `Copy`,
    /// so the walk can be restarted by calling this again.
    pub fn nodes<'a>(&self, doc: &'a Document) -> RangeNodes<'a> {
        RangeNodes {
            doc,
            next: self.at(doc, Dir::Left),
            stop: self.right,
        }
    }

    pub fn each(&self, doc: &Document, f: impl FnMut(NodeId)) {
        self.nodes(doc).for_each(f);
    }

    pub fn contents(&self, doc: &Document) -> Vec<NodeId> {
        self.nodes(doc).collect()
    }

    /// Cursor in the gap at the `side` boundary.
    pub fn cursor(&self, doc: &Document, side: Dir) -> Cursor {
        match side {
            Dir::Left => Cursor::new(self.group, self.at(doc, Dir::Left)),
            Dir::Right => Cursor::new(self.group, self.right),
        }
    }

    /// Detach the contained nodes into a new owner-less group and close the
    /// gap they leave behind, in one edit.
    pub fn splice(self, doc: &mut Document) -> GroupId {
        doc.edit(|doc| {
            let fragment = doc.create_group();
            if !doc.contains_group(self.group) || self.is_empty(doc) {
                return fragment;
            }
            let (Some(first), Some(last)) = (self.at(doc, Dir::Left), self.at(doc, Dir::Right))
            else {
                return fragment;
            };

            doc.link(self.group, self.left, self.right);

            let mut next = Some(first);
            while let Some(node) = next {
                next = if node == last {
                    None
                } else {
                    doc.sibling(node, Dir::Right)
                };
                if let Some(data) = doc.nodes.get_mut(node) {
                    data.parent = Some(fragment);
                }
            }
            doc.link(fragment, None, Some(first));
            doc.link(fragment, Some(last), None);

            for node in [self.left, self.right, Some(first), Some(last)] {
                doc.mark_dirty(node);
            }
            doc.mark_group_dirty(self.group);
            trace!("spliced {first:?}..={last:?} out of {:?}", self.group);
            fragment
        })
    }

    /// Like [`Range::splice`], but the nodes are freed. Returns the cursor
    /// left in the gap.
    pub fn remove(self, doc: &mut Document) -> Cursor {
        let gap = Cursor::new(self.group, self.right);
        doc.edit(|doc| {
            let fragment = self.splice(doc);
            doc.discard_group(fragment);
        });
        gap
    }

    /// Move the `side` boundary one node towards `towards`.
    ///
    /// Growing past the group's end widens the range to the owning node one
    /// level up, so a range always lives in exactly one group. Returns `None`
    /// when nothing can move: shrinking an empty range, or growing at the
    /// root's end.
    pub fn move_boundary(self, doc: &Document, side: Dir, towards: Dir) -> Option<Self> {
        if side == towards {
            match self.bound(side) {
                Some(bound) => Some(self.with_bound(side, doc.sibling(bound, side))),
                None => self.escape(doc),
            }
        } else {
            if self.is_empty(doc) {
                return None;
            }
            let inner = self.at(doc, side)?;
            Some(self.with_bound(side, Some(inner)))
        }
    }

    /// Word-wise variant of [`Range::move_boundary`].
    ///
    /// The crossed node's `move_across_word` hook decides how far a word
    /// reaches. Shrinking never crosses the opposite boundary: it stops with
    /// an empty range there instead.
    pub fn move_by_word(self, doc: &Document, side: Dir, towards: Dir) -> Option<Self> {
        if side == towards {
            let gap = self.cursor(doc, side);
            let Some(node) = gap.neighbor(doc, towards) else {
                return self.escape(doc);
            };
            let reached = cross_word(doc, gap, node, towards);
            match reached {
                Some(cursor) if cursor.group == self.group => {
                    Some(self.with_bound(side, boundary_of(doc, cursor, side)))
                }
                _ => self.move_boundary(doc, side, towards),
            }
        } else {
            if self.is_empty(doc) {
                return None;
            }
            let gap = self.cursor(doc, side);
            let node = gap.neighbor(doc, towards)?;
            let contents = self.contents(doc);
            let shrunk = cross_word(doc, gap, node, towards)
                .filter(|cursor| cursor.group == self.group)
                .map(|cursor| boundary_of(doc, cursor, side))
                .filter(|bound| bound.is_some_and(|bound| contents.contains(&bound)));
            Some(match shrunk {
                Some(bound) => self.with_bound(side, bound),
                None => self.with_bound(side, self.at(doc, side.opposite())),
            })
        }
    }

    /// Open the `dir` boundary up to the group's end.
    pub fn extend_to_end(self, dir: Dir) -> Self {
        self.with_bound(dir, None)
    }

    /// The range covering this group's owning node, one level up.
    pub fn escape(self, doc: &Document) -> Option<Self> {
        let owner = doc.owner(self.group)?;
        Self::around(doc, owner)
    }
}

fn cross_word(doc: &Document, from: Cursor, node: NodeId, dir: Dir) -> Option<Cursor> {
    let kind = doc.kind(node)?;
    let mut cursor = from;
    kind.move_across_word(doc, node, &mut cursor, dir);
    Some(cursor)
}

/// The excluded boundary node a range needs for its `side` to sit at `cursor`.
fn boundary_of(doc: &Document, cursor: Cursor, side: Dir) -> Option<NodeId> {
    match side {
        Dir::Left => cursor.left(doc),
        Dir::Right => cursor.right,
    }
}

/// Iterator over the nodes of a [`Range`].
pub struct RangeNodes<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
    stop: Option<NodeId>,
}

impl Iterator for RangeNodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.next?;
        if Some(node) == self.stop {
            self.next = None;
            return None;
        }
        self.next = self.doc.sibling(node, Dir::Right);
        Some(node)
    }
}
