use log::debug;

use crate::editing::cursor::Cursor;
use crate::editing::selection::Selection;
use crate::tree::{Dir, Document, GroupId, VDir};
use crate::view::Geometry;

/// Editing commands, one per discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Move { dir: Dir },
    MoveWord { dir: Dir },
    MoveVert { dir: VDir },
    Tab { dir: Dir },
    /// Extend the selection by one node.
    Select { dir: Dir },
    SelectWord { dir: Dir },
    SelectToEnd { dir: Dir },
    /// Grow the selection to the smallest enclosing node.
    SelectLevel { dir: Dir },
    SelectAll,
    ClearSelection,
    Delete { dir: Dir },
    /// Insert the contents of a detached group at the cursor.
    Insert { block: GroupId },
}

/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    pub version: u64,
    pub cursor: Cursor,
    pub selection: Option<Selection>,
    /// Whether anything moved or changed; `false` lets the host hand the
    /// key press to someone else.
    pub moved: bool,
}

/// A document together with the user's cursor and selection.
///
/// The cursor is re-derived from the result of every mutation, and a live
/// selection always takes precedence over the cursor: moving collapses it,
/// inserting or deleting replaces its contents.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    cursor: Cursor,
    selection: Option<Selection>,
}

impl Editor {
    /// Cursor starts at the end of the document.
    pub fn new(document: Document) -> Self {
        let cursor = Cursor::at_end(&document, document.root(), Dir::Right);
        Self {
            document,
            cursor,
            selection: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for building detached content to insert.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Place the cursor, dropping any selection.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.selection = None;
    }

    pub fn apply(&mut self, cmd: Cmd, geometry: &dyn Geometry) -> Patch {
        if !self.cursor.is_valid(&self.document) {
            debug!("cursor {:?} went stale, resetting to document end", self.cursor);
            self.set_cursor(Cursor::at_end(&self.document, self.document.root(), Dir::Right));
        }

        let moved = match cmd {
            Cmd::Move { dir } => self
                .collapse(dir)
                .unwrap_or_else(|| self.cursor.move_horizontal(&self.document, dir).moved()),
            Cmd::MoveWord { dir } => self
                .collapse(dir)
                .unwrap_or_else(|| self.cursor.move_by_word(&self.document, dir).moved()),
            Cmd::MoveVert { dir } => {
                self.clear_selection();
                self.cursor.move_vertical(&self.document, dir, geometry).moved()
            }
            Cmd::Tab { dir } => {
                self.clear_selection();
                self.cursor.tab(&self.document, dir).moved()
            }
            Cmd::Select { dir } => self.extend(|sel, doc| sel.move_focus(doc, dir)),
            Cmd::SelectWord { dir } => self.extend(|sel, doc| sel.move_focus_by_word(doc, dir)),
            Cmd::SelectToEnd { dir } => self.extend(|sel, doc| sel.move_focus_to_end(doc, dir)),
            Cmd::SelectLevel { dir } => self.extend(|sel, doc| sel.move_focus_fast(doc, dir)),
            Cmd::SelectAll => {
                let root = self.document.root();
                let start = Cursor::at_end(&self.document, root, Dir::Left);
                let end = Cursor::at_end(&self.document, root, Dir::Right);
                self.adopt(Selection::of(&self.document, start, end).ok())
            }
            Cmd::ClearSelection => self.clear_selection(),
            Cmd::Delete { dir } => self.delete_selection() || self.cursor.delete(&mut self.document, dir).moved(),
            Cmd::Insert { block } => {
                self.delete_selection();
                self.cursor.insert(&mut self.document, block, Dir::Right);
                true
            }
        };

        debug!("{cmd:?} -> moved={moved}, cursor={:?}", self.cursor);
        Patch {
            version: self.document.version(),
            cursor: self.cursor,
            selection: self.selection,
            moved,
        }
    }

    /// Collapse a selection onto its `dir` edge. `None` when there was none.
    fn collapse(&mut self, dir: Dir) -> Option<bool> {
        let selection = self.selection.take()?;
        self.cursor = selection.range().cursor(&self.document, dir);
        Some(true)
    }

    /// Drop the selection, leaving the cursor at its focus.
    fn clear_selection(&mut self) -> bool {
        match self.selection.take() {
            Some(selection) => {
                self.cursor = selection.focus_cursor(&self.document);
                true
            }
            None => false,
        }
    }

    fn extend(&mut self, step: impl FnOnce(Selection, &Document) -> Option<Selection>) -> bool {
        let current = self
            .selection
            .unwrap_or_else(|| self.cursor.selection(&self.document));
        self.adopt(step(current, &self.document))
    }

    fn adopt(&mut self, next: Option<Selection>) -> bool {
        let Some(next) = next else {
            return false;
        };
        self.cursor = next.focus_cursor(&self.document);
        self.selection = (!next.is_point(&self.document)).then_some(next);
        true
    }

    /// Remove the selected nodes. Returns whether there was anything selected.
    fn delete_selection(&mut self) -> bool {
        let Some(selection) = self.selection.take() else {
            return false;
        };
        if selection.is_point(&self.document) {
            return false;
        }
        self.cursor = selection.range().remove(&mut self.document);
        true
    }
}
