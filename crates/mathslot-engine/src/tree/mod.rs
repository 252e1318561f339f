/*!
 * # Document Tree
 *
 * The mutable, cursor-addressable tree that holds a math expression while it
 * is being typed.
 *
 * ## Shape
 *
 * - A **node** owns a fixed number of child **groups**, created with the node.
 *   Nodes whose arity must change (matrices growing a row) are replaced by a
 *   fresh node instead.
 * - A **group** is an ordered, doubly-linked run of nodes: one slot of
 *   content, such as a numerator. The root group has no owning node.
 *
 * ## Arena Storage
 *
 * Nodes and groups live in two `slotmap` arenas inside [`Document`]. Parent,
 * owner and sibling links are plain keys, so the structure never fights the
 * borrow checker. Keys are generation-checked: once a node is removed its key
 * resolves to nothing, and any cursor still pointing at it degrades into
 * no-ops rather than reading a recycled slot.
 *
 * ## Invariants
 *
 * After every public mutation returns:
 *
 * - a group's ends are both `None` (empty) or both `Some`;
 * - walking right siblings from the left end reaches the right end, visiting
 *   every node whose parent is that group exactly once, and the left-sibling
 *   walk reproduces the same sequence reversed;
 * - every child group's owner lists it among its children.
 *
 * [`invariants::check`] asserts all of these and is used throughout the tests.
 *
 * ## Module Structure
 *
 * - **`document`**: the arena, node/group accessors, edit transactions and
 *   view resynchronisation
 * - **`group`**: group-level mutation primitives (`insert`, `attach`, `clear`)
 *   and queries (`unwrap_group`, `command_at`, `some`)
 * - **`node`**: the [`NodeKind`] plugin contract and its default behaviours
 * - **`dir`**: horizontal and vertical directions
 * - **`invariants`** / **`outline`**: structural checks and a printable outline
 */

pub mod dir;
pub mod document;
pub mod group;
pub mod invariants;
pub mod node;
pub mod outline;

pub use dir::{Dir, VDir};
pub use document::{Document, GroupId, GroupNodes, NodeId};
pub use node::{NodeKind, VertExit, WordClass};
