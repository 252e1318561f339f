/*!
 * # Editing
 *
 * Positions and spans inside a [`Document`](crate::Document), and the
 * operations that move them around.
 *
 * ## Value Types
 *
 * - [`Cursor`](cursor::Cursor): a gap between two nodes of one group
 * - [`Range`](range::Range): a contiguous run of nodes in one group,
 *   delimited by two excluded boundary nodes
 * - [`Selection`](selection::Selection): a range plus the side the user is
 *   extending and the position the selection started from
 *
 * All three are `Copy` and hold only keys. They are never updated when the
 * tree changes; every mutation hands back the position to continue from.
 *
 * ## Movement
 *
 * **`navigation`** adds horizontal, word-wise, tab and vertical movement to
 * [`Cursor`](cursor::Cursor). Vertical movement needs measured positions and
 * takes a [`Geometry`](crate::view::Geometry) alongside the document.
 *
 * **`commands`** wraps a document, a cursor and a selection into an
 * [`Editor`](commands::Editor) driven by [`Cmd`](commands::Cmd) values.
 */

pub mod commands;
pub mod cursor;
pub mod navigation;
pub mod range;
pub mod selection;
