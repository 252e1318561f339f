//! Whole-group serialisation.
//!
//! Each node kind renders itself; these entry points walk a group left to
//! right and combine the pieces. LaTeX and plain text are concatenated as-is,
//! speech fragments are joined with single spaces, and the semantic token
//! stream stops early when a node reports a document terminator.

use std::ops::ControlFlow;

use serde::Serialize;

use crate::tree::{Document, GroupId, NodeId};

/// One entry of the semantic token stream consumed by evaluators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token category (`"number"`, `"operator"`, `"frac_start"`, ...).
    pub kind: &'static str,
    pub text: String,
    /// Node the token came from, for mapping evaluation errors back.
    #[serde(skip)]
    pub node: Option<NodeId>,
}

impl Token {
    pub fn new(kind: &'static str, text: impl Into<String>, node: Option<NodeId>) -> Self {
        Self {
            kind,
            text: text.into(),
            node,
        }
    }

    /// A structural marker with no text of its own.
    pub fn marker(kind: &'static str, node: NodeId) -> Self {
        Self::new(kind, "", Some(node))
    }
}

impl Document {
    pub fn latex(&self, group: GroupId) -> String {
        self.nodes(group)
            .filter_map(|node| self.kind(node).map(|kind| kind.latex(self, node)))
            .collect()
    }

    pub fn text(&self, group: GroupId) -> String {
        self.nodes(group)
            .filter_map(|node| self.kind(node).map(|kind| kind.text(self, node)))
            .collect()
    }

    pub fn speech(&self, group: GroupId) -> String {
        self.nodes(group)
            .filter_map(|node| self.kind(node).map(|kind| kind.speech(self, node)))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Semantic tokens for `group`, up to and including the first terminator.
    pub fn ir(&self, group: GroupId) -> Vec<Token> {
        let mut out = Vec::new();
        let _ = self.ir_into(group, &mut out);
        out
    }

    /// Append the tokens of `group` to `out`; used by container kinds for
    /// their child groups.
    pub fn ir_into(&self, group: GroupId, out: &mut Vec<Token>) -> ControlFlow<()> {
        for node in self.nodes(group) {
            let Some(kind) = self.kind(node) else {
                continue;
            };
            if kind.ir(self, node, out).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
