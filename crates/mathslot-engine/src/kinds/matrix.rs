use std::any::Any;
use std::cmp::Ordering;
use std::ops::ControlFlow;
use std::rc::Rc;

use log::debug;

use crate::editing::cursor::Cursor;
use crate::editing::range::Range;
use crate::error::TreeError;
use crate::serialize::Token;
use crate::tree::{Dir, Document, GroupId, NodeId, NodeKind, VDir, VertExit};
use crate::view::{Arrangement, Geometry};

/// A rectangular grid of cells, stored row-major as the node's child groups.
///
/// A node's arity never changes, so growing or shrinking a matrix builds a
/// replacement node, moves the surviving cells across and swaps it in. The
/// shape-changing operations return the replacement's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    columns: usize,
}

impl Matrix {
    /// Zero dimensions are raised to one.
    pub fn create(doc: &mut Document, rows: usize, columns: usize) -> NodeId {
        doc.create_node(Rc::new(Self {
            rows: rows.max(1),
            columns: columns.max(1),
        }))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell(&self, doc: &Document, node: NodeId, row: usize, column: usize) -> Option<GroupId> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        doc.child(node, row * self.columns + column)
    }

    /// Row and column of `group` within `node`.
    pub fn position(&self, doc: &Document, node: NodeId, group: GroupId) -> Option<(usize, usize)> {
        let index = doc.child_index(node, group)?;
        Some((index / self.columns, index % self.columns))
    }

    fn shape(doc: &Document, node: NodeId) -> Result<Self, TreeError> {
        if !doc.contains_node(node) {
            return Err(TreeError::StaleNode(node));
        }
        doc.kind_as::<Self>(node)
            .copied()
            .ok_or(TreeError::KindMismatch {
                node,
                expected: "matrix",
            })
    }

    /// Keep the top-left `rows` by `columns` block of cells, padding with
    /// empty cells where the matrix grows.
    pub fn resize(doc: &mut Document, node: NodeId, rows: usize, columns: usize) -> Result<NodeId, TreeError> {
        let old = Self::shape(doc, node)?;
        Self::rebuild(doc, node, rows, columns, |row, column| {
            (row < old.rows && column < old.columns).then_some((row, column))
        })
    }

    /// Insert an empty row before row `at` (clamped to the end).
    pub fn insert_row(doc: &mut Document, node: NodeId, at: usize) -> Result<NodeId, TreeError> {
        let old = Self::shape(doc, node)?;
        let at = at.min(old.rows);
        Self::rebuild(doc, node, old.rows + 1, old.columns, |row, column| match row.cmp(&at) {
            Ordering::Less => Some((row, column)),
            Ordering::Equal => None,
            Ordering::Greater => Some((row - 1, column)),
        })
    }

    /// Insert an empty column before column `at` (clamped to the end).
    pub fn insert_column(doc: &mut Document, node: NodeId, at: usize) -> Result<NodeId, TreeError> {
        let old = Self::shape(doc, node)?;
        let at = at.min(old.columns);
        Self::rebuild(doc, node, old.rows, old.columns + 1, |row, column| match column.cmp(&at) {
            Ordering::Less => Some((row, column)),
            Ordering::Equal => None,
            Ordering::Greater => Some((row, column - 1)),
        })
    }

    /// Remove row `at` and its contents. The last remaining row is kept.
    pub fn remove_row(doc: &mut Document, node: NodeId, at: usize) -> Result<NodeId, TreeError> {
        let old = Self::shape(doc, node)?;
        if old.rows == 1 || at >= old.rows {
            return Ok(node);
        }
        Self::rebuild(doc, node, old.rows - 1, old.columns, |row, column| {
            Some((if row < at { row } else { row + 1 }, column))
        })
    }

    /// Remove column `at` and its contents. The last remaining column is kept.
    pub fn remove_column(doc: &mut Document, node: NodeId, at: usize) -> Result<NodeId, TreeError> {
        let old = Self::shape(doc, node)?;
        if old.columns == 1 || at >= old.columns {
            return Ok(node);
        }
        Self::rebuild(doc, node, old.rows, old.columns - 1, |row, column| {
            Some((row, if column < at { column } else { column + 1 }))
        })
    }

    /// Build a `rows` by `columns` replacement whose cell `(r, c)` takes the
    /// contents of old cell `source(r, c)`, then swap it in for `node`.
    fn rebuild(
        doc: &mut Document,
        node: NodeId,
        rows: usize,
        columns: usize,
        source: impl Fn(usize, usize) -> Option<(usize, usize)>,
    ) -> Result<NodeId, TreeError> {
        let old = Self::shape(doc, node)?;
        let shape = Self {
            rows: rows.max(1),
            columns: columns.max(1),
        };
        let replacement = doc.edit(|doc| {
            let replacement = doc.create_node(Rc::new(shape));
            for row in 0..shape.rows {
                for column in 0..shape.columns {
                    let Some((from_row, from_column)) = source(row, column) else {
                        continue;
                    };
                    let (Some(from), Some(to)) = (
                        old.cell(doc, node, from_row, from_column),
                        shape.cell(doc, replacement, row, column),
                    ) else {
                        continue;
                    };
                    let moved = Range::all(from).splice(doc);
                    doc.insert(to, moved, None, None);
                }
            }
            match Range::around(doc, node) {
                Some(range) => {
                    let mut gap = range.remove(doc);
                    let block = doc.fragment([replacement]);
                    gap.insert(doc, block, Dir::Right);
                }
                None => {
                    let holder = doc.fragment([node]);
                    doc.discard_group(holder);
                }
            }
            replacement
        });
        debug!(
            "rebuilt matrix {node:?} as {replacement:?} ({}x{} -> {}x{})",
            old.rows, old.columns, shape.rows, shape.columns
        );
        Ok(replacement)
    }

    fn rows_of<'a>(&self, doc: &'a Document, node: NodeId) -> impl Iterator<Item = &'a [GroupId]> {
        doc.children(node).chunks(self.columns)
    }
}

impl NodeKind for Matrix {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arity(&self) -> usize {
        self.rows * self.columns
    }

    fn arrangement(&self) -> Arrangement {
        Arrangement::Grid {
            columns: self.columns,
            padding: 0.5,
            gap: 1.0,
        }
    }

    fn latex(&self, doc: &Document, node: NodeId) -> String {
        let body = self
            .rows_of(doc, node)
            .map(|row| {
                row.iter()
                    .map(|&cell| doc.latex(cell))
                    .collect::<Vec<_>>()
                    .join("&")
            })
            .collect::<Vec<_>>()
            .join(r"\\");
        format!("\\begin{{matrix}}{body}\\end{{matrix}}")
    }

    fn text(&self, doc: &Document, node: NodeId) -> String {
        let body = self
            .rows_of(doc, node)
            .map(|row| {
                row.iter()
                    .map(|&cell| doc.text(cell))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join(";");
        format!("[{body}]")
    }

    fn speech(&self, doc: &Document, node: NodeId) -> String {
        let mut parts = vec![format!("StartMatrix {} By {}", self.rows, self.columns)];
        for (index, row) in self.rows_of(doc, node).enumerate() {
            let cells = row
                .iter()
                .map(|&cell| doc.speech(cell))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Row {} {cells}", index + 1));
        }
        parts.push("EndMatrix".to_string());
        parts.join(" ")
    }

    fn ir(&self, doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()> {
        out.push(Token::marker("matrix_start", node));
        for (row, cells) in self.rows_of(doc, node).enumerate() {
            if row > 0 {
                out.push(Token::marker("row_sep", node));
            }
            for (column, &cell) in cells.iter().enumerate() {
                if column > 0 {
                    out.push(Token::marker("col_sep", node));
                }
                if doc.ir_into(cell, out).is_break() {
                    return ControlFlow::Break(());
                }
            }
        }
        out.push(Token::marker("matrix_end", node));
        ControlFlow::Continue(())
    }

    /// Horizontal movement steps between cells of a row before leaving.
    fn move_out_of(&self, doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir, from: GroupId) {
        let next = self.position(doc, node, from).and_then(|(row, column)| match dir {
            Dir::Right => self.cell(doc, node, row, column + 1),
            Dir::Left => column.checked_sub(1).and_then(|prev| self.cell(doc, node, row, prev)),
        });
        let target = match next {
            Some(group) => Some(Cursor::at_end(doc, group, dir.opposite())),
            None => Cursor::beside(doc, node, dir),
        };
        if let Some(target) = target {
            *cursor = target;
        }
    }

    /// Enters the first row from above or the last row from below, in the
    /// column under `pos`.
    fn vert_into(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        pos: f32,
        geometry: &dyn Geometry,
    ) -> Option<GroupId> {
        let row = match dir {
            VDir::Down => 0,
            VDir::Up => self.rows - 1,
        };
        let column = (0..self.columns)
            .rev()
            .find(|&column| {
                self.cell(doc, node, row, column)
                    .and_then(|cell| geometry.group_extent(cell))
                    .is_some_and(|extent| extent.left <= pos)
            })
            .unwrap_or(0);
        self.cell(doc, node, row, column)
    }

    fn vert_out_of(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        child: GroupId,
        _cursor: &mut Cursor,
    ) -> VertExit {
        let Some((row, column)) = self.position(doc, node, child) else {
            return VertExit::Decline;
        };
        let target = match dir {
            VDir::Down => self.cell(doc, node, row + 1, column),
            VDir::Up => row.checked_sub(1).and_then(|above| self.cell(doc, node, above, column)),
        };
        target.map_or(VertExit::Decline, VertExit::Descend)
    }

    /// Backspacing out of a cell continues in the previous cell; an entirely
    /// empty matrix is removed instead.
    fn delete_block(&self, doc: &mut Document, node: NodeId, cursor: &mut Cursor, at: Dir, child: GroupId) {
        if doc.children(node).iter().all(|&cell| doc.is_empty(cell)) {
            if let Some(range) = Range::around(doc, node) {
                *cursor = range.remove(doc);
            }
            return;
        }
        let next = doc.child_index(node, child).and_then(|index| match at {
            Dir::Left => index.checked_sub(1).and_then(|prev| doc.child(node, prev)),
            Dir::Right => doc.child(node, index + 1),
        });
        let target = match next {
            Some(group) => Some(Cursor::at_end(doc, group, at.opposite())),
            None => Cursor::beside(doc, node, at),
        };
        if let Some(target) = target {
            *cursor = target;
        }
    }
}
