use std::any::Any;
use std::fmt;
use std::rc::Rc;

use log::trace;
use slotmap::{SlotMap, new_key_type};

use crate::options::EditorOptions;
use crate::tree::{Dir, NodeKind};
use crate::view::{Renderer, ViewHandle};

new_key_type! {
    /// Generation-checked handle to a node in a [`Document`].
    pub struct NodeId;
    /// Generation-checked handle to a group in a [`Document`].
    pub struct GroupId;
}

pub(crate) struct NodeData {
    pub(crate) kind: Rc<dyn NodeKind>,
    /// The group directly containing this node; `None` while detached.
    pub(crate) parent: Option<GroupId>,
    /// `[left, right]` siblings within `parent`.
    pub(crate) siblings: [Option<NodeId>; 2],
    pub(crate) children: Vec<GroupId>,
    pub(crate) view: Option<ViewHandle>,
    pub(crate) serial: u64,
}

pub(crate) struct GroupData {
    /// `[leftmost, rightmost]`, both `None` when the group is empty.
    pub(crate) ends: [Option<NodeId>; 2],
    pub(crate) owner: Option<NodeId>,
}

/// Arena holding every node and group of one editable expression.
///
/// The document is the only owner of tree structure. Cursors, ranges and
/// selections are `Copy` values holding keys into it; they are recomputed
/// after every edit and never kept in sync automatically.
///
/// ## Edits
///
/// Every structural mutation runs inside [`Document::edit`]. Nodes whose
/// rendering is affected are queued while the edit runs and pushed through
/// the installed [`Renderer`] once the outermost edit returns, so a renderer
/// never observes a half-linked tree.
///
/// ```rust
/// use mathslot_engine::{Cursor, Dir, Document, kinds::Symbol};
///
/// let mut doc = Document::new();
/// let x = Symbol::create(&mut doc, 'x');
/// let fragment = doc.fragment([x]);
///
/// let mut cursor = Cursor::at_end(&doc, doc.root(), Dir::Right);
/// cursor.insert(&mut doc, fragment, Dir::Right);
///
/// assert_eq!(doc.latex(doc.root()), "x");
/// ```
pub struct Document {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    pub(crate) groups: SlotMap<GroupId, GroupData>,
    root: GroupId,
    version: u64,
    next_serial: u64,
    options: EditorOptions,
    renderer: Option<Box<dyn Renderer>>,
    /// Nodes queued for view resynchronisation
    dirty: Vec<NodeId>,
    edit_depth: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("groups", &self.groups.len())
            .field("version", &self.version)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create an empty document with default options and no renderer.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        let mut groups = SlotMap::with_key();
        let root = groups.insert(GroupData {
            ends: [None, None],
            owner: None,
        });
        Self {
            nodes: SlotMap::with_key(),
            groups,
            root,
            version: 0,
            next_serial: 0,
            options,
            renderer: None,
            dirty: Vec::new(),
            edit_depth: 0,
        }
    }

    /// Install the renderer that receives view resynchronisation requests.
    ///
    /// Views handed out by the previous renderer are discarded through it,
    /// then every live node is rendered so that each one holds a handle from
    /// the new renderer.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        let _ = self.take_renderer();
        self.renderer = Some(renderer);
        self.dirty = self.nodes.keys().collect();
        self.flush_views();
    }

    /// Uninstall the renderer, discarding every view it handed out.
    ///
    /// Nodes are left without a view until another renderer is installed.
    pub fn take_renderer(&mut self) -> Option<Box<dyn Renderer>> {
        let mut renderer = self.renderer.take();
        let mut released = 0;
        for data in self.nodes.values_mut() {
            let Some(view) = data.view.take() else {
                continue;
            };
            released += 1;
            if let Some(renderer) = renderer.as_mut() {
                renderer.discard(view);
            }
        }
        trace!("released {released} views");
        renderer
    }

    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_deref()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EditorOptions) {
        self.options = options;
    }

    /// The top-level group; it has no owner and is never removed.
    pub fn root(&self) -> GroupId {
        self.root
    }

    /// Incremented once per outermost [`Document::edit`].
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    // ============ Construction ============

    /// Allocate a detached node of `kind`, together with its child groups.
    ///
    /// This is the factory entry point for node kinds: the document doubles
    /// as the construction context that hands out serial numbers.
    pub fn create_node(&mut self, kind: Rc<dyn NodeKind>) -> NodeId {
        let arity = kind.arity();
        self.next_serial += 1;
        let serial = self.next_serial;
        let node = self.nodes.insert(NodeData {
            kind,
            parent: None,
            siblings: [None, None],
            children: Vec::with_capacity(arity),
            view: None,
            serial,
        });
        let children: Vec<GroupId> = (0..arity)
            .map(|_| {
                self.groups.insert(GroupData {
                    ends: [None, None],
                    owner: Some(node),
                })
            })
            .collect();
        if let Some(data) = self.nodes.get_mut(node) {
            data.children = children;
        }
        trace!("created {} node {node:?} with {arity} groups", self.kind_name(node));
        node
    }

    /// Allocate an empty, owner-less group to carry nodes between positions.
    pub fn create_group(&mut self) -> GroupId {
        self.groups.insert(GroupData {
            ends: [None, None],
            owner: None,
        })
    }

    /// Collect detached nodes, in order, into a new owner-less group.
    pub fn fragment(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> GroupId {
        let group = self.create_group();
        self.edit(|doc| {
            for node in nodes {
                doc.append_node(group, node);
            }
        });
        group
    }

    // ============ Transactions ============

    /// Run `f` as one edit.
    ///
    /// Edits nest; only when the outermost one returns is the version bumped
    /// and the queued view resynchronisation flushed. Node kinds performing
    /// several primitive mutations should wrap them in a single edit.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.edit_depth += 1;
        let result = f(self);
        self.edit_depth -= 1;
        if self.edit_depth == 0 {
            self.version += 1;
            self.flush_views();
        }
        result
    }

    /// Queue `node` for re-rendering. Duplicates are dropped at flush time.
    pub(crate) fn mark_dirty(&mut self, node: Option<NodeId>) {
        if let Some(node) = node {
            self.dirty.push(node);
        }
    }

    /// Queue the owner of `group` and every enclosing node above it.
    pub(crate) fn mark_group_dirty(&mut self, group: GroupId) {
        let mut current = group;
        while let Some(owner) = self.owner(current) {
            self.mark_dirty(Some(owner));
            match self.parent(owner) {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    /// Re-render every queued node, innermost first.
    fn flush_views(&mut self) {
        let mut dirty = std::mem::take(&mut self.dirty);
        let Some(mut renderer) = self.renderer.take() else {
            return;
        };
        dirty.sort_unstable();
        dirty.dedup();
        dirty.retain(|&node| self.nodes.contains_key(node));
        dirty.sort_by_key(|&node| std::cmp::Reverse(self.depth(node)));
        trace!("resyncing {} views", dirty.len());
        for node in dirty {
            let view = renderer.render(self, node);
            if let Some(old) = self.set_view_handle(node, view)
                && old != view
            {
                renderer.discard(old);
            }
        }
        self.renderer = Some(renderer);
    }

    /// Replace the view handle of `node`, returning the previous one.
    pub fn set_view_handle(&mut self, node: NodeId, view: ViewHandle) -> Option<ViewHandle> {
        self.nodes
            .get_mut(node)
            .and_then(|data| data.view.replace(view))
    }

    // ============ Node accessors ============

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn contains_group(&self, group: GroupId) -> bool {
        self.groups.contains_key(group)
    }

    pub fn kind(&self, node: NodeId) -> Option<Rc<dyn NodeKind>> {
        self.nodes.get(node).map(|data| Rc::clone(&data.kind))
    }

    /// Borrow the kind of `node` as a concrete plugin type.
    pub fn kind_as<K: Any>(&self, node: NodeId) -> Option<&K> {
        self.nodes
            .get(node)
            .and_then(|data| data.kind.as_any().downcast_ref::<K>())
    }

    pub fn kind_name(&self, node: NodeId) -> &'static str {
        self.nodes
            .get(node)
            .map(|data| data.kind.name())
            .unwrap_or("stale")
    }

    pub fn parent(&self, node: NodeId) -> Option<GroupId> {
        self.nodes.get(node).and_then(|data| data.parent)
    }

    pub fn sibling(&self, node: NodeId, dir: Dir) -> Option<NodeId> {
        self.nodes
            .get(node)
            .and_then(|data| data.siblings[dir.index()])
    }

    pub fn children(&self, node: NodeId) -> &[GroupId] {
        self.nodes
            .get(node)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child(&self, node: NodeId, index: usize) -> Option<GroupId> {
        self.children(node).get(index).copied()
    }

    /// Position of `group` among the children of `node`.
    pub fn child_index(&self, node: NodeId, group: GroupId) -> Option<usize> {
        self.children(node).iter().position(|&child| child == group)
    }

    pub fn serial(&self, node: NodeId) -> Option<u64> {
        self.nodes.get(node).map(|data| data.serial)
    }

    pub fn view(&self, node: NodeId) -> Option<ViewHandle> {
        self.nodes.get(node).and_then(|data| data.view)
    }

    /// Number of nodes enclosing `node`.
    pub fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(node).and_then(|group| self.owner(group));
        while let Some(owner) = current {
            depth += 1;
            current = self.parent(owner).and_then(|group| self.owner(group));
        }
        depth
    }

    // ============ Group accessors ============

    pub fn end(&self, group: GroupId, dir: Dir) -> Option<NodeId> {
        self.groups.get(group).and_then(|data| data.ends[dir.index()])
    }

    pub fn owner(&self, group: GroupId) -> Option<NodeId> {
        self.groups.get(group).and_then(|data| data.owner)
    }

    pub fn is_empty(&self, group: GroupId) -> bool {
        self.end(group, Dir::Left).is_none()
    }

    /// Left-to-right iterator over the nodes of `group`.
    pub fn nodes(&self, group: GroupId) -> GroupNodes<'_> {
        GroupNodes {
            doc: self,
            next: self.end(group, Dir::Left),
        }
    }

    pub fn len(&self, group: GroupId) -> usize {
        self.nodes(group).count()
    }

    // ============ Linkage ============

    /// Make `left` and `right` adjacent in `group`, `None` standing for the
    /// group's ends.
    pub(crate) fn link(&mut self, group: GroupId, left: Option<NodeId>, right: Option<NodeId>) {
        match left {
            Some(node) => {
                if let Some(data) = self.nodes.get_mut(node) {
                    data.siblings[Dir::Right.index()] = right;
                }
            }
            None => {
                if let Some(data) = self.groups.get_mut(group) {
                    data.ends[Dir::Left.index()] = right;
                }
            }
        }
        match right {
            Some(node) => {
                if let Some(data) = self.nodes.get_mut(node) {
                    data.siblings[Dir::Left.index()] = left;
                }
            }
            None => {
                if let Some(data) = self.groups.get_mut(group) {
                    data.ends[Dir::Right.index()] = left;
                }
            }
        }
    }

    /// Attach a detached node at the right end of `group`.
    fn append_node(&mut self, group: GroupId, node: NodeId) {
        if !self.groups.contains_key(group) {
            return;
        }
        let Some(data) = self.nodes.get_mut(node) else {
            return;
        };
        if data.parent.is_some() {
            trace!("refusing to append attached node {node:?}");
            return;
        }
        data.parent = Some(group);
        let last = self.end(group, Dir::Right);
        self.link(group, last, Some(node));
        self.link(group, Some(node), None);
        self.mark_dirty(last);
        self.mark_dirty(Some(node));
        self.mark_group_dirty(group);
    }

    // ============ Disposal ============

    /// Free every node in `group` (recursively) and then the group itself.
    pub(crate) fn discard_group(&mut self, group: GroupId) {
        let mut pending = vec![group];
        while let Some(group) = pending.pop() {
            let Some(data) = self.groups.remove(group) else {
                continue;
            };
            let mut next = data.ends[Dir::Left.index()];
            while let Some(node) = next {
                let Some(node_data) = self.nodes.remove(node) else {
                    break;
                };
                next = node_data.siblings[Dir::Right.index()];
                pending.extend(node_data.children);
                if let (Some(view), Some(renderer)) = (node_data.view, self.renderer.as_mut()) {
                    renderer.discard(view);
                }
            }
        }
    }
}

/// Iterator over the nodes of one group, left to right.
pub struct GroupNodes<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for GroupNodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.next?;
        self.next = self.doc.sibling(node, Dir::Right);
        Some(node)
    }
}
