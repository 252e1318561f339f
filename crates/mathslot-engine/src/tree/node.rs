//! The contract every node kind implements against the core tree.
//!
//! Concrete kinds (fractions, brackets, matrices, ...) are plugins. The core
//! only ever talks to them through [`NodeKind`], and supplies defaults that
//! make a kind with no child groups behave as an atomic symbol and a kind with
//! child groups behave as a simple container.

use std::any::Any;
use std::fmt;
use std::ops::ControlFlow;

use crate::editing::cursor::Cursor;
use crate::editing::range::Range;
use crate::serialize::Token;
use crate::tree::{Dir, Document, GroupId, NodeId, VDir};
use crate::view::{Arrangement, Geometry};

/// Outcome of asking an enclosing node to handle vertical movement out of
/// one of its child groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertExit {
    /// The node already repositioned the cursor.
    Handled,
    /// Continue the search by descending into this group.
    Descend(GroupId),
    /// Not handled here; keep walking up.
    Decline,
}

/// Coarse classification used to group adjacent symbols into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordClass {
    Alphanumeric,
    Operator,
}

pub trait NodeKind: fmt::Debug {
    /// Stable, lowercase name of the kind (`"fraction"`, `"symbol"`, ...).
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Number of child groups created with the node. Never changes afterwards.
    fn arity(&self) -> usize {
        0
    }

    /// Grouping constructs that exist only for precedence.
    fn is_transparent_wrapper(&self) -> bool {
        false
    }

    /// Nodes that give an enclosing transparent wrapper real meaning, such as
    /// list separators inside parentheses.
    fn invalidates_transparent_wrapper(&self) -> bool {
        false
    }

    fn word_class(&self) -> Option<WordClass> {
        None
    }

    /// Layout hint for hosts; the core never reads it.
    fn arrangement(&self) -> Arrangement {
        if self.arity() == 0 {
            Arrangement::Leaf
        } else {
            Arrangement::Row { padding: 0.0 }
        }
    }

    // ============ Serialization ============

    /// Structured source form that round-trips to an equivalent tree.
    fn latex(&self, doc: &Document, node: NodeId) -> String;

    /// Plain-text approximation.
    fn text(&self, doc: &Document, node: NodeId) -> String;

    /// Screen-reader narration.
    fn speech(&self, doc: &Document, node: NodeId) -> String {
        self.text(doc, node)
    }

    /// Append semantic tokens to `out`. `Break` marks a document terminator
    /// and stops emission for the whole document.
    fn ir(&self, doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()>;

    // ============ Horizontal navigation ============

    /// The cursor approaches `node` travelling `dir` and must land inside it
    /// or pass over it.
    fn move_into(&self, doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir) {
        enter_from(doc, node, cursor, dir);
    }

    /// The cursor reached the `dir` end of child group `from`.
    fn move_out_of(&self, doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir, from: GroupId) {
        let _ = from;
        if let Some(beside) = Cursor::beside(doc, node, dir) {
            *cursor = beside;
        }
    }

    /// Word-wise movement across `node`; jumps straight to the far side.
    fn move_across_word(&self, doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir) {
        if let Some(beside) = Cursor::beside(doc, node, dir) {
            *cursor = beside;
        }
    }

    /// Tab-style traversal: visit the next child group in `dir`, or leave.
    fn tab_out_of(&self, doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir, from: GroupId) {
        let next = doc.child_index(node, from).and_then(|index| match dir {
            Dir::Right => doc.child(node, index + 1),
            Dir::Left => index.checked_sub(1).and_then(|prev| doc.child(node, prev)),
        });
        match next {
            Some(group) => *cursor = Cursor::at_end(doc, group, dir.opposite()),
            None => {
                if let Some(beside) = Cursor::beside(doc, node, dir) {
                    *cursor = beside;
                }
            }
        }
    }

    // ============ Vertical navigation ============

    /// Vertical movement arrives at `node` from the opposite side of `dir`
    /// while seeking `pos`. Returns the child group to descend into.
    fn vert_into(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        pos: f32,
        geometry: &dyn Geometry,
    ) -> Option<GroupId> {
        let _ = (doc, node, dir, pos, geometry);
        None
    }

    /// The cursor sits on `from_side` of `node` and moves `dir`.
    fn vert_from_side(&self, doc: &Document, node: NodeId, dir: VDir, from_side: Dir) -> Option<GroupId> {
        let _ = (doc, node, dir, from_side);
        None
    }

    /// The cursor moves `dir` from inside `child`.
    fn vert_out_of(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        child: GroupId,
        cursor: &mut Cursor,
    ) -> VertExit {
        let _ = (doc, node, dir, child, cursor);
        VertExit::Decline
    }

    // ============ Deletion ============

    /// Deletion reaches `node` from its `from` side.
    ///
    /// Containers with content are entered instead of deleted; anything else
    /// is removed and the cursor left in the gap.
    fn delete(&self, doc: &mut Document, node: NodeId, cursor: &mut Cursor, from: Dir) {
        let has_content = doc.children(node).iter().any(|&group| !doc.is_empty(group));
        if has_content {
            self.move_into(doc, node, cursor, from.opposite());
        } else if let Some(gap) = Range::around(doc, node).map(|range| range.remove(doc)) {
            *cursor = gap;
        }
    }

    /// Deletion ran off the `at` end of `child`.
    fn delete_block(&self, doc: &mut Document, node: NodeId, cursor: &mut Cursor, at: Dir, child: GroupId) {
        let _ = (at, child);
        flatten_children(doc, node, cursor);
    }

    // ============ Pointer placement ============

    /// Nearest cursor to horizontal position `pos` within `node`.
    fn focus(&self, doc: &Document, node: NodeId, pos: f32, geometry: &dyn Geometry) -> Option<Cursor> {
        for &group in doc.children(node) {
            if geometry
                .group_extent(group)
                .is_some_and(|extent| extent.contains(pos))
            {
                return Some(Cursor::seek(doc, group, pos, geometry));
            }
        }
        let side = Cursor::nearest_side(doc, node, pos, geometry);
        Cursor::beside(doc, node, side)
    }
}

/// Default entry: pass over leaves, enter the nearest child group otherwise.
pub fn enter_from(doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir) {
    let children = doc.children(node);
    let target = match dir {
        Dir::Right => children.first(),
        Dir::Left => children.last(),
    };
    let next = match target {
        Some(&group) => Some(Cursor::at_end(doc, group, dir.opposite())),
        None => Cursor::beside(doc, node, dir),
    };
    if let Some(next) = next {
        *cursor = next;
    }
}

/// Replace `node` with the concatenation of its child groups, keeping the
/// cursor at the same position relative to the surviving content.
pub fn flatten_children(doc: &mut Document, node: NodeId, cursor: &mut Cursor) {
    let Some(parent) = doc.parent(node) else {
        return;
    };
    let children = doc.children(node).to_vec();
    let right = match cursor.right {
        Some(right) if children.contains(&cursor.group) => Some(right),
        _ => {
            let after = children
                .iter()
                .position(|&group| group == cursor.group)
                .map_or(children.len(), |index| index + 1);
            children[after..]
                .iter()
                .find_map(|&group| doc.end(group, Dir::Left))
                .or_else(|| doc.sibling(node, Dir::Right))
        }
    };

    doc.edit(|doc| {
        let fragment = doc.create_group();
        for &group in &children {
            let moved = Range::all(group).splice(doc);
            let last = doc.end(fragment, Dir::Right);
            doc.insert(fragment, moved, last, None);
        }
        if let Some(range) = Range::around(doc, node) {
            let mut gap = range.remove(doc);
            gap.insert(doc, fragment, Dir::Right);
        }
    });
    *cursor = Cursor::new(parent, right);
}
