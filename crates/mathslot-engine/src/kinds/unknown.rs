use std::any::Any;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::serialize::Token;
use crate::tree::{Document, NodeId, NodeKind};

/// Source text that could not be understood, kept visible in the tree so it
/// can be corrected in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknown {
    source: String,
}

impl Unknown {
    pub fn create(doc: &mut Document, source: impl Into<String>) -> NodeId {
        doc.create_node(Rc::new(Self {
            source: source.into(),
        }))
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl NodeKind for Unknown {
    fn name(&self) -> &'static str {
        "unknown"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn latex(&self, _doc: &Document, _node: NodeId) -> String {
        self.source.clone()
    }

    fn text(&self, _doc: &Document, _node: NodeId) -> String {
        self.source.clone()
    }

    fn speech(&self, _doc: &Document, _node: NodeId) -> String {
        format!("unrecognized {}", self.source)
    }

    /// Nothing after an unparseable node can be evaluated meaningfully.
    fn ir(&self, _doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()> {
        out.push(Token::new("error", self.source.as_str(), Some(node)));
        ControlFlow::Break(())
    }
}
