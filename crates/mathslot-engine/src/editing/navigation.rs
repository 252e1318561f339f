//! Horizontal, word-wise, tab and vertical cursor movement.
//!
//! Every algorithm here only reads the tree. Node kinds decide what entering
//! or leaving them means; the cursor just dispatches to the right hook.

use log::debug;

use crate::editing::cursor::{Cursor, Movement};
use crate::tree::{Dir, Document, GroupId, NodeId, NodeKind, VDir, VertExit};
use crate::view::Geometry;

/// Where the upward walk of a vertical move ended.
enum VertTarget {
    Group(GroupId),
    Handled,
}

impl Cursor {
    /// Move one step towards `dir`.
    ///
    /// A neighbouring node on that side receives the cursor through
    /// `move_into`; at a group's end the enclosing node's `move_out_of`
    /// decides; at the end of the document nothing moves.
    pub fn move_horizontal(&mut self, doc: &Document, dir: Dir) -> Movement {
        if let Some(node) = self.neighbor(doc, dir)
            && let Some(kind) = doc.kind(node)
        {
            kind.move_into(doc, node, self, dir);
            return Movement::Moved;
        }
        self.leave_group(doc, |kind, doc, node, cursor, from| {
            kind.move_out_of(doc, node, cursor, dir, from);
        })
    }

    /// Move one word towards `dir`.
    pub fn move_by_word(&mut self, doc: &Document, dir: Dir) -> Movement {
        if let Some(node) = self.neighbor(doc, dir)
            && let Some(kind) = doc.kind(node)
        {
            kind.move_across_word(doc, node, self, dir);
            return Movement::Moved;
        }
        self.leave_group(doc, |kind, doc, node, cursor, from| {
            kind.move_out_of(doc, node, cursor, dir, from);
        })
    }

    /// Jump to the next child group of the enclosing node in `dir`, or out
    /// of it after the last one.
    pub fn tab(&mut self, doc: &Document, dir: Dir) -> Movement {
        self.leave_group(doc, |kind, doc, node, cursor, from| {
            kind.tab_out_of(doc, node, cursor, dir, from);
        })
    }

    fn leave_group(
        &mut self,
        doc: &Document,
        hook: impl FnOnce(&dyn NodeKind, &Document, NodeId, &mut Cursor, GroupId),
    ) -> Movement {
        let Some(owner) = doc.owner(self.group) else {
            return Movement::Blocked;
        };
        if doc.parent(owner).is_none() {
            return Movement::Blocked;
        }
        let Some(kind) = doc.kind(owner) else {
            return Movement::Blocked;
        };
        let before = *self;
        let from = self.group;
        hook(kind.as_ref(), doc, owner, self, from);
        if *self == before {
            Movement::Blocked
        } else {
            Movement::Moved
        }
    }

    /// Move to the row above or below, keeping the horizontal position.
    ///
    /// 1. The current horizontal position is read from `geometry`; without
    ///    it nothing moves.
    /// 2. A neighbouring node may offer a child group to step into from the
    ///    side (a superscript, a numerator).
    /// 3. Otherwise each enclosing node, innermost first, may handle the move
    ///    itself, name a sibling group to descend into, or decline.
    /// 4. In the chosen group, the node under the tracked position is either
    ///    descended into (when it offers a group on the side being entered)
    ///    or the cursor is placed on its nearer side.
    pub fn move_vertical(&mut self, doc: &Document, dir: VDir, geometry: &dyn Geometry) -> Movement {
        let Some(pos) = self.position(doc, geometry) else {
            debug!("vertical move {dir:?} without geometry");
            return Movement::Blocked;
        };

        let target = match self.side_entry(doc, dir) {
            Some(group) => VertTarget::Group(group),
            None => match self.climb(doc, dir) {
                Some(target) => target,
                None => return Movement::Blocked,
            },
        };
        let mut group = match target {
            VertTarget::Handled => return Movement::Moved,
            VertTarget::Group(group) => group,
        };

        loop {
            let Some(node) = doc.command_at(group, pos, geometry) else {
                *self = Cursor::at_end(doc, group, Dir::Right);
                break;
            };
            let within = doc
                .view(node)
                .and_then(|view| geometry.extent(view))
                .is_some_and(|extent| extent.contains(pos));
            if within
                && let Some(kind) = doc.kind(node)
                && let Some(inner) = kind.vert_into(doc, node, dir, pos, geometry)
            {
                group = inner;
                continue;
            }
            let side = Cursor::nearest_side(doc, node, pos, geometry);
            if let Some(beside) = Cursor::beside(doc, node, side) {
                *self = beside;
            }
            break;
        }
        debug!("vertical move {dir:?} landed in {:?} at x={pos}", self.group);
        Movement::Moved
    }

    /// Horizontal screen position of the cursor.
    pub fn position(&self, doc: &Document, geometry: &dyn Geometry) -> Option<f32> {
        let extent_of = |node| doc.view(node).and_then(|view| geometry.extent(view));
        if let Some(left) = self.left(doc) {
            return extent_of(left).map(|extent| extent.right);
        }
        if let Some(right) = self.right {
            return extent_of(right).map(|extent| extent.left);
        }
        geometry.group_extent(self.group).map(|extent| extent.left)
    }

    fn side_entry(&self, doc: &Document, dir: VDir) -> Option<GroupId> {
        [(self.right, Dir::Left), (self.left(doc), Dir::Right)]
            .into_iter()
            .find_map(|(node, from_side)| {
                let node = node?;
                doc.kind(node)?.vert_from_side(doc, node, dir, from_side)
            })
    }

    fn climb(&mut self, doc: &Document, dir: VDir) -> Option<VertTarget> {
        let mut group = self.group;
        loop {
            let owner = doc.owner(group)?;
            let kind = doc.kind(owner)?;
            match kind.vert_out_of(doc, owner, dir, group, self) {
                VertExit::Handled => return Some(VertTarget::Handled),
                VertExit::Descend(target) => return Some(VertTarget::Group(target)),
                VertExit::Decline => {}
            }
            group = doc.parent(owner)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Fraction, Matrix, Power, Symbol};
    use crate::view::headless::{HeadlessLayout, HeadlessRenderer};
    use rstest::rstest;

    fn document() -> Document {
        let mut doc = Document::new();
        doc.set_renderer(Box::new(HeadlessRenderer::default()));
        doc
    }

    fn put(doc: &mut Document, group: GroupId, text: &str) -> Vec<NodeId> {
        let nodes: Vec<_> = text.chars().map(|ch| Symbol::create(doc, ch)).collect();
        let block = doc.fragment(nodes.clone());
        let last = doc.end(group, Dir::Right);
        doc.insert(group, block, last, None);
        nodes
    }

    fn place(doc: &mut Document, node: NodeId) {
        let block = doc.fragment([node]);
        let root = doc.root();
        let last = doc.end(root, Dir::Right);
        doc.insert(root, block, last, None);
    }

    #[test]
    fn test_move_left_twice_from_between_b_and_c() {
        let mut doc = document();
        let root = doc.root();
        let nodes = put(&mut doc, root, "abc");
        let mut cursor = Cursor::new(root, Some(nodes[2]));

        assert_eq!(cursor.move_horizontal(&doc, Dir::Left), Movement::Moved);
        assert_eq!(cursor.move_horizontal(&doc, Dir::Left), Movement::Moved);

        assert_eq!(cursor, Cursor::new(root, Some(nodes[0])));
        assert_eq!(cursor.move_horizontal(&doc, Dir::Left), Movement::Blocked);
    }

    #[test]
    fn test_move_through_fraction() {
        let mut doc = document();
        let root = doc.root();
        let frac = Fraction::create(&mut doc);
        let (numerator, denominator) = (doc.child(frac, 0).unwrap(), doc.child(frac, 1).unwrap());
        put(&mut doc, numerator, "1");
        put(&mut doc, denominator, "2");
        place(&mut doc, frac);
        let mut cursor = Cursor::new(root, Some(frac));

        let _ = cursor.move_horizontal(&doc, Dir::Right);
        assert_eq!(cursor.group, numerator);
        let _ = cursor.move_horizontal(&doc, Dir::Right);
        let _ = cursor.move_horizontal(&doc, Dir::Right);
        assert_eq!(cursor, Cursor::new(root, None));

        let _ = cursor.move_horizontal(&doc, Dir::Left);
        assert_eq!(cursor, Cursor::at_end(&doc, denominator, Dir::Right));
    }

    #[test]
    fn test_word_move_skips_fraction_and_runs() {
        let mut doc = document();
        let root = doc.root();
        let frac = Fraction::create(&mut doc);
        place(&mut doc, frac);
        let nodes = put(&mut doc, root, "ab+");
        let mut cursor = Cursor::new(root, Some(frac));

        let _ = cursor.move_by_word(&doc, Dir::Right);
        assert_eq!(cursor.right, Some(nodes[0]));
        let _ = cursor.move_by_word(&doc, Dir::Right);
        assert_eq!(cursor.right, Some(nodes[2]));
    }

    #[test]
    fn test_tab_visits_children_in_order() {
        let mut doc = document();
        let root = doc.root();
        let frac = Fraction::create(&mut doc);
        place(&mut doc, frac);
        let (numerator, denominator) = (doc.child(frac, 0).unwrap(), doc.child(frac, 1).unwrap());
        let mut cursor = Cursor::at_end(&doc, numerator, Dir::Left);

        assert!(cursor.tab(&doc, Dir::Right).moved());
        assert_eq!(cursor.group, denominator);
        assert!(cursor.tab(&doc, Dir::Right).moved());
        assert_eq!(cursor, Cursor::new(root, None));
        assert_eq!(cursor.tab(&doc, Dir::Right), Movement::Blocked);
    }

    #[test]
    fn test_vertical_without_geometry_is_blocked() {
        let mut doc = Document::new();
        let frac = Fraction::create(&mut doc);
        place(&mut doc, frac);
        let numerator = doc.child(frac, 0).unwrap();
        let mut cursor = Cursor::at_end(&doc, numerator, Dir::Left);

        assert_eq!(
            cursor.move_vertical(&doc, VDir::Down, &crate::view::NoGeometry),
            Movement::Blocked
        );
    }

    #[test]
    fn test_vertical_between_fraction_parts() {
        let mut doc = document();
        let frac = Fraction::create(&mut doc);
        let (numerator, denominator) = (doc.child(frac, 0).unwrap(), doc.child(frac, 1).unwrap());
        let top = put(&mut doc, numerator, "12");
        let bottom = put(&mut doc, denominator, "34");
        place(&mut doc, frac);
        let layout = HeadlessLayout::compute(&doc);
        let mut cursor = Cursor::new(numerator, Some(top[1]));

        assert!(cursor.move_vertical(&doc, VDir::Down, &layout).moved());
        assert_eq!(cursor, Cursor::new(denominator, Some(bottom[1])));

        assert!(cursor.move_vertical(&doc, VDir::Up, &layout).moved());
        assert_eq!(cursor, Cursor::new(numerator, Some(top[1])));

        assert_eq!(cursor.move_vertical(&doc, VDir::Up, &layout), Movement::Blocked);
    }

    #[test]
    fn test_vertical_side_entry_into_superscript() {
        let mut doc = document();
        let root = doc.root();
        let x = put(&mut doc, root, "x");
        let power = Power::create(&mut doc);
        let sup = doc.child(power, 0).unwrap();
        put(&mut doc, sup, "2");
        place(&mut doc, power);
        let layout = HeadlessLayout::compute(&doc);
        let mut cursor = Cursor::new(root, Some(power));
        assert_eq!(cursor.left(&doc), Some(x[0]));

        assert!(cursor.move_vertical(&doc, VDir::Up, &layout).moved());
        assert_eq!(cursor.group, sup);

        assert!(cursor.move_vertical(&doc, VDir::Down, &layout).moved());
        assert_eq!(cursor, Cursor::new(root, None));
    }

    #[test]
    fn test_vertical_descends_into_nested_fraction() {
        let mut doc = document();
        let outer = Fraction::create(&mut doc);
        let (numerator, denominator) = (doc.child(outer, 0).unwrap(), doc.child(outer, 1).unwrap());
        put(&mut doc, numerator, "1");
        let inner = Fraction::create(&mut doc);
        let inner_top = doc.child(inner, 0).unwrap();
        put(&mut doc, inner_top, "5");
        let block = doc.fragment([inner]);
        doc.insert(denominator, block, None, None);
        place(&mut doc, outer);
        let layout = HeadlessLayout::compute(&doc);
        let mut cursor = Cursor::at_end(&doc, numerator, Dir::Left);

        assert!(cursor.move_vertical(&doc, VDir::Down, &layout).moved());

        assert_eq!(cursor.group, inner_top);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(0, 1)]
    #[case(1, 2)]
    #[case(1, 0)]
    fn test_matrix_vertical_round_trip(#[case] column: usize, #[case] offset: usize) {
        let mut doc = document();
        let matrix = Matrix::create(&mut doc, 2, 2);
        let cells: Vec<_> = doc.children(matrix).to_vec();
        let rows = ["ab", "c", "def", "gh"];
        let top = put(&mut doc, cells[column], rows[column]);
        put(&mut doc, cells[2 + column], rows[2 + column]);
        place(&mut doc, matrix);
        let layout = HeadlessLayout::compute(&doc);

        let start = Cursor::new(cells[column], top.get(offset).copied());
        let mut cursor = start;
        let before = cursor.position(&doc, &layout).unwrap();

        assert!(cursor.move_vertical(&doc, VDir::Down, &layout).moved());
        assert_eq!(cursor.group, cells[2 + column]);
        assert!(cursor.move_vertical(&doc, VDir::Up, &layout).moved());
        assert_eq!(cursor.group, cells[column]);

        let after = cursor.position(&doc, &layout).unwrap();
        assert!((after - before).abs() <= 1.0);

        let mut again = start;
        let _ = again.move_vertical(&doc, VDir::Down, &layout);
        let _ = again.move_vertical(&doc, VDir::Up, &layout);
        assert_eq!(again, cursor);
    }

    #[test]
    fn test_vertical_tie_follows_option() {
        let mut doc = document();
        let frac = Fraction::create(&mut doc);
        let (numerator, denominator) = (doc.child(frac, 0).unwrap(), doc.child(frac, 1).unwrap());
        let top = put(&mut doc, numerator, "12");
        let bottom = put(&mut doc, denominator, "3");
        place(&mut doc, frac);
        let layout = HeadlessLayout::compute(&doc);
        // numerator "12" spans one unit either side of the single
        // denominator symbol's midpoint
        let start = Cursor::new(numerator, Some(top[1]));

        let mut left = start;
        let _ = left.move_vertical(&doc, VDir::Down, &layout);
        assert_eq!(left, Cursor::new(denominator, Some(bottom[0])));

        let mut options = doc.options().clone();
        options.vertical_tie = Dir::Right;
        doc.set_options(options);
        let mut right = start;
        let _ = right.move_vertical(&doc, VDir::Down, &layout);
        assert_eq!(right, Cursor::new(denominator, None));
    }
}
