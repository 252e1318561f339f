//! Group-level mutation primitives and queries.

use log::trace;

use crate::editing::range::Range;
use crate::tree::{Dir, Document, GroupId, NodeId};
use crate::view::Geometry;

impl Document {
    /// Move the contents of the detached group `block` between `lhs` and
    /// `rhs` in `group`, returning the first and last inserted nodes.
    ///
    /// # Preconditions
    ///
    /// `lhs` and `rhs` must already be adjacent in `group` (`None` meaning the
    /// group's end). This is not checked: violating it silently corrupts the
    /// sibling chain. An empty `block` makes this a no-op.
    ///
    /// A consumed owner-less `block` is freed; an owned one is left empty.
    pub fn insert(
        &mut self,
        group: GroupId,
        block: GroupId,
        lhs: Option<NodeId>,
        rhs: Option<NodeId>,
    ) -> Option<(NodeId, NodeId)> {
        if !self.contains_group(group) || group == block {
            return None;
        }
        let owned = self.owner(block).is_some();
        let (Some(first), Some(last)) = (self.end(block, Dir::Left), self.end(block, Dir::Right))
        else {
            if !owned {
                self.groups.remove(block);
            }
            return None;
        };

        self.edit(|doc| {
            let mut next = Some(first);
            while let Some(node) = next {
                next = doc.sibling(node, Dir::Right);
                if let Some(data) = doc.nodes.get_mut(node) {
                    data.parent = Some(group);
                }
                doc.mark_dirty(Some(node));
            }
            doc.link(group, lhs, Some(first));
            doc.link(group, Some(last), rhs);

            if owned {
                if let Some(data) = doc.groups.get_mut(block) {
                    data.ends = [None, None];
                }
                doc.mark_group_dirty(block);
            } else {
                doc.groups.remove(block);
            }
            doc.mark_dirty(lhs);
            doc.mark_dirty(rhs);
            doc.mark_group_dirty(group);
        });
        trace!("inserted {first:?}..={last:?} into {group:?}");
        Some((first, last))
    }

    /// Insert `block` on the `dir` side of `node`, inside `node`'s group.
    ///
    /// No-op when `node` is detached.
    pub fn attach(&mut self, block: GroupId, node: NodeId, dir: Dir) -> Option<(NodeId, NodeId)> {
        let group = self.parent(node)?;
        let (lhs, rhs) = match dir {
            Dir::Left => (self.sibling(node, Dir::Left), Some(node)),
            Dir::Right => (Some(node), self.sibling(node, Dir::Right)),
        };
        self.insert(group, block, lhs, rhs)
    }

    /// Remove and free every node of `group`.
    pub fn clear(&mut self, group: GroupId) {
        if self.contains_group(group) {
            let _ = Range::all(group).remove(self);
        }
    }

    /// Elide a purely grouping wrapper.
    ///
    /// If `group` holds exactly one transparent-wrapper node with exactly one
    /// child group, and nothing beneath that child invalidates transparency,
    /// the child group itself is returned. Otherwise `group` is.
    pub fn unwrap_group(&self, group: GroupId) -> GroupId {
        let (Some(first), Some(last)) = (self.end(group, Dir::Left), self.end(group, Dir::Right))
        else {
            return group;
        };
        if first != last {
            return group;
        }
        let Some(kind) = self.kind(first) else {
            return group;
        };
        let [inner] = self.children(first) else {
            return group;
        };
        if !kind.is_transparent_wrapper() || self.has_transparency_breaker(*inner) {
            return group;
        }
        *inner
    }

    fn has_transparency_breaker(&self, group: GroupId) -> bool {
        let mut pending = vec![group];
        while let Some(group) = pending.pop() {
            for node in self.nodes(group) {
                if self
                    .kind(node)
                    .is_some_and(|kind| kind.invalidates_transparent_wrapper())
                {
                    return true;
                }
                pending.extend_from_slice(self.children(node));
            }
        }
        false
    }

    /// The first node of `group` whose rendered span contains or lies past
    /// `pos`, or `None` when `pos` is beyond the right end.
    ///
    /// Nodes the geometry provider cannot measure are skipped.
    pub fn command_at(&self, group: GroupId, pos: f32, geometry: &dyn Geometry) -> Option<NodeId> {
        self.nodes(group).find(|&node| {
            self.view(node)
                .and_then(|view| geometry.extent(view))
                .is_some_and(|extent| pos < extent.right)
        })
    }

    /// Left-to-right scan of `group`, stopping at the first match.
    pub fn some(&self, group: GroupId, predicate: impl FnMut(NodeId) -> bool) -> bool {
        self.nodes(group).any(predicate)
    }
}
