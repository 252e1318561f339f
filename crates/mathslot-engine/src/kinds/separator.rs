use std::any::Any;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::serialize::Token;
use crate::tree::{Document, NodeId, NodeKind, WordClass};

/// A list separator such as `,` or `;`.
///
/// Parentheses holding a separator delimit a tuple or argument list rather
/// than grouping for precedence, so its presence keeps them from being
/// unwrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    ch: char,
}

impl Separator {
    pub fn create(doc: &mut Document, ch: char) -> NodeId {
        doc.create_node(Rc::new(Self { ch }))
    }
}

impl NodeKind for Separator {
    fn name(&self) -> &'static str {
        "separator"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn invalidates_transparent_wrapper(&self) -> bool {
        true
    }

    fn word_class(&self) -> Option<WordClass> {
        Some(WordClass::Operator)
    }

    fn latex(&self, _doc: &Document, _node: NodeId) -> String {
        self.ch.to_string()
    }

    fn text(&self, _doc: &Document, _node: NodeId) -> String {
        self.ch.to_string()
    }

    fn speech(&self, _doc: &Document, _node: NodeId) -> String {
        match self.ch {
            ',' => "comma".to_string(),
            ';' => "semicolon".to_string(),
            ch => ch.to_string(),
        }
    }

    fn ir(&self, _doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()> {
        out.push(Token::new("separator", self.ch, Some(node)));
        ControlFlow::Continue(())
    }
}
