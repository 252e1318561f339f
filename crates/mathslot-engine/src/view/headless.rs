//! A renderer and layout engine that need no display.
//!
//! Used by tests, benchmarks and command-line hosts. Every symbol is one unit
//! wide per character of its plain-text form, empty groups are one unit wide
//! so the cursor always has somewhere to sit, and child groups are placed
//! according to each node's [`Arrangement`].

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use crate::tree::{Dir, Document, GroupId, NodeId};
use crate::view::{Arrangement, Extent, Geometry, Renderer, ViewHandle};

/// Running totals of a [`HeadlessRenderer`], shared with whoever asked for
/// them so they stay readable after the renderer is boxed into a document.
#[derive(Debug, Default)]
pub struct RenderCounts {
    rendered: Cell<usize>,
    discarded: Cell<usize>,
}

impl RenderCounts {
    pub fn rendered(&self) -> usize {
        self.rendered.get()
    }

    pub fn discarded(&self) -> usize {
        self.discarded.get()
    }

    /// Handles issued and not yet discarded.
    pub fn live(&self) -> usize {
        self.rendered().saturating_sub(self.discarded())
    }
}

/// Hands out fresh view handles and counts what it was asked to do.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next: u64,
    counts: Rc<RenderCounts>,
}

impl HeadlessRenderer {
    pub fn counts(&self) -> Rc<RenderCounts> {
        Rc::clone(&self.counts)
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, _doc: &Document, _node: NodeId) -> ViewHandle {
        self.next += 1;
        self.counts.rendered.set(self.counts.rendered() + 1);
        ViewHandle::new(self.next)
    }

    fn discard(&mut self, _view: ViewHandle) {
        self.counts.discarded.set(self.counts.discarded() + 1);
    }
}

/// Computed horizontal positions for every rendered node and every group.
#[derive(Debug, Default)]
pub struct HeadlessLayout {
    views: HashMap<ViewHandle, Extent>,
    groups: HashMap<GroupId, Extent>,
}

impl HeadlessLayout {
    /// Lay out the whole document, starting with the root group at zero.
    ///
    /// Nodes without a view handle still take up space but cannot be looked
    /// up afterwards.
    pub fn compute(doc: &Document) -> Self {
        let mut layout = Self::default();
        let mut widths = Widths::default();
        measure_group(doc, doc.root(), &mut widths);
        layout.place_group(doc, doc.root(), 0.0, &widths);
        trace!(
            "laid out {} views and {} groups",
            layout.views.len(),
            layout.groups.len()
        );
        layout
    }

    fn place_group(&mut self, doc: &Document, group: GroupId, left: f32, widths: &Widths) {
        let width = widths.group(group);
        self.groups.insert(group, Extent::new(left, left + width));
        let mut x = left;
        for node in doc.nodes(group) {
            let width = widths.node(node);
            if let Some(view) = doc.view(node) {
                self.views.insert(view, Extent::new(x, x + width));
            }
            self.place_children(doc, node, x, width, widths);
            x += width;
        }
    }

    fn place_children(&mut self, doc: &Document, node: NodeId, left: f32, width: f32, widths: &Widths) {
        let Some(kind) = doc.kind(node) else {
            return;
        };
        let children = doc.children(node);
        match kind.arrangement() {
            Arrangement::Leaf => {}
            Arrangement::Row { padding } => {
                let mut x = left + padding;
                for &group in children {
                    self.place_group(doc, group, x, widths);
                    x += widths.group(group);
                }
            }
            Arrangement::Stack { .. } => {
                for &group in children {
                    let x = left + (width - widths.group(group)) / 2.0;
                    self.place_group(doc, group, x, widths);
                }
            }
            Arrangement::Grid {
                columns,
                padding,
                gap,
            } => {
                let column_widths = grid_columns(children, columns, widths);
                for (index, &group) in children.iter().enumerate() {
                    let column = index % columns.max(1);
                    let offset: f32 = column_widths[..column].iter().sum();
                    let x = left + padding + offset + gap * column as f32;
                    self.place_group(doc, group, x, widths);
                }
            }
        }
    }

    /// Where a cursor at the `side` end of `group` would be drawn.
    pub fn group_edge(&self, group: GroupId, side: Dir) -> Option<f32> {
        let extent = self.groups.get(&group)?;
        Some(match side {
            Dir::Left => extent.left,
            Dir::Right => extent.right,
        })
    }
}

impl Geometry for HeadlessLayout {
    fn extent(&self, view: ViewHandle) -> Option<Extent> {
        self.views.get(&view).copied()
    }

    fn group_extent(&self, group: GroupId) -> Option<Extent> {
        self.groups.get(&group).copied()
    }
}

#[derive(Default)]
struct Widths {
    nodes: HashMap<NodeId, f32>,
    groups: HashMap<GroupId, f32>,
}

impl Widths {
    fn node(&self, node: NodeId) -> f32 {
        self.nodes.get(&node).copied().unwrap_or(1.0)
    }

    fn group(&self, group: GroupId) -> f32 {
        self.groups.get(&group).copied().unwrap_or(1.0)
    }
}

fn measure_group(doc: &Document, group: GroupId, widths: &mut Widths) -> f32 {
    let width = if doc.is_empty(group) {
        1.0
    } else {
        doc.nodes(group)
            .map(|node| measure_node(doc, node, widths))
            .sum()
    };
    widths.groups.insert(group, width);
    width
}

fn measure_node(doc: &Document, node: NodeId, widths: &mut Widths) -> f32 {
    let Some(kind) = doc.kind(node) else {
        return 0.0;
    };
    let children = doc.children(node);
    let inner: Vec<f32> = children
        .iter()
        .map(|&group| measure_group(doc, group, widths))
        .collect();
    let width = match kind.arrangement() {
        Arrangement::Leaf => kind.text(doc, node).chars().count().max(1) as f32,
        Arrangement::Row { padding } => 2.0 * padding + inner.iter().sum::<f32>(),
        Arrangement::Stack { padding } => 2.0 * padding + inner.iter().copied().fold(0.0, f32::max),
        Arrangement::Grid {
            columns,
            padding,
            gap,
        } => {
            let column_widths = grid_columns(children, columns, widths);
            let gaps = gap * column_widths.len().saturating_sub(1) as f32;
            2.0 * padding + column_widths.iter().sum::<f32>() + gaps
        }
    };
    widths.nodes.insert(node, width);
    width
}

/// Widest cell of each column; cells are in row-major order.
fn grid_columns(cells: &[GroupId], columns: usize, widths: &Widths) -> Vec<f32> {
    let columns = columns.max(1);
    let mut column_widths = vec![0.0_f32; columns.min(cells.len().max(1))];
    for (index, &group) in cells.iter().enumerate() {
        let column = index % columns;
        column_widths[column] = column_widths[column].max(widths.group(group));
    }
    column_widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Fraction, Matrix, Symbol};
    use pretty_assertions::assert_eq;

    fn rendered() -> Document {
        let mut doc = Document::new();
        doc.set_renderer(Box::new(HeadlessRenderer::default()));
        doc
    }

    fn append(doc: &mut Document, group: GroupId, nodes: Vec<NodeId>) {
        let block = doc.fragment(nodes);
        let last = doc.end(group, Dir::Right);
        doc.insert(group, block, last, None);
    }

    fn extent_of(doc: &Document, layout: &HeadlessLayout, node: NodeId) -> Extent {
        layout.extent(doc.view(node).unwrap()).unwrap()
    }

    #[test]
    fn test_symbols_sit_side_by_side() {
        let mut doc = rendered();
        let root = doc.root();
        let nodes: Vec<_> = "ab".chars().map(|ch| Symbol::create(&mut doc, ch)).collect();
        append(&mut doc, root, nodes.clone());

        let layout = HeadlessLayout::compute(&doc);

        assert_eq!(extent_of(&doc, &layout, nodes[0]), Extent::new(0.0, 1.0));
        assert_eq!(extent_of(&doc, &layout, nodes[1]), Extent::new(1.0, 2.0));
        assert_eq!(layout.group_extent(root), Some(Extent::new(0.0, 2.0)));
    }

    #[test]
    fn test_empty_group_has_unit_width() {
        let doc = rendered();

        let layout = HeadlessLayout::compute(&doc);

        assert_eq!(layout.group_extent(doc.root()), Some(Extent::new(0.0, 1.0)));
        assert_eq!(layout.group_edge(doc.root(), Dir::Right), Some(1.0));
    }

    #[test]
    fn test_fraction_centres_shorter_part() {
        let mut doc = rendered();
        let frac = Fraction::create(&mut doc);
        let (numerator, denominator) = (doc.child(frac, 0).unwrap(), doc.child(frac, 1).unwrap());
        let top: Vec<_> = "123".chars().map(|ch| Symbol::create(&mut doc, ch)).collect();
        append(&mut doc, numerator, top);
        let bottom = vec![Symbol::create(&mut doc, '4')];
        append(&mut doc, denominator, bottom);
        let root = doc.root();
        append(&mut doc, root, vec![frac]);

        let layout = HeadlessLayout::compute(&doc);
        let whole = extent_of(&doc, &layout, frac);
        let top = layout.group_extent(numerator).unwrap();
        let bottom = layout.group_extent(denominator).unwrap();

        assert_eq!(top.width(), 3.0);
        assert_eq!(bottom.width(), 1.0);
        assert_eq!(top.mid(), whole.mid());
        assert_eq!(bottom.mid(), whole.mid());
    }

    #[test]
    fn test_matrix_aligns_columns() {
        let mut doc = rendered();
        let matrix = Matrix::create(&mut doc, 2, 2);
        let cells = doc.children(matrix).to_vec();
        let wide: Vec<_> = "abc".chars().map(|ch| Symbol::create(&mut doc, ch)).collect();
        append(&mut doc, cells[2], wide);
        let root = doc.root();
        append(&mut doc, root, vec![matrix]);

        let layout = HeadlessLayout::compute(&doc);
        let first = layout.group_extent(cells[1]).unwrap();
        let second = layout.group_extent(cells[3]).unwrap();

        assert_eq!(first.left, second.left);
        assert_eq!(
            layout.group_extent(cells[0]).unwrap().left,
            layout.group_extent(cells[2]).unwrap().left
        );
        assert!(first.left >= layout.group_extent(cells[2]).unwrap().right);
    }

    #[test]
    fn test_renderer_counts_renders_and_discards() {
        let renderer = HeadlessRenderer::default();
        let counts = renderer.counts();
        let mut doc = Document::new();
        doc.set_renderer(Box::new(renderer));
        let root = doc.root();
        let x = Symbol::create(&mut doc, 'x');
        append(&mut doc, root, vec![x]);
        assert_eq!(counts.rendered(), 1);

        doc.clear(root);

        assert_eq!(counts.discarded(), 1);
        assert_eq!(counts.live(), 0);
    }
}
