use std::any::Any;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::editing::cursor::Cursor;
use crate::serialize::Token;
use crate::tree::{Dir, Document, NodeId, NodeKind, WordClass};

/// A single typed character: a digit, a letter or an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    ch: char,
}

impl Symbol {
    pub fn create(doc: &mut Document, ch: char) -> NodeId {
        doc.create_node(Rc::new(Self { ch }))
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    fn token_kind(&self) -> &'static str {
        if self.ch.is_ascii_digit() || self.ch == '.' {
            "number"
        } else if self.ch.is_alphabetic() {
            "variable"
        } else {
            "operator"
        }
    }
}

impl NodeKind for Symbol {
    fn name(&self) -> &'static str {
        "symbol"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn word_class(&self) -> Option<WordClass> {
        if self.ch.is_alphanumeric() || self.ch == '.' {
            Some(WordClass::Alphanumeric)
        } else {
            Some(WordClass::Operator)
        }
    }

    fn latex(&self, _doc: &Document, _node: NodeId) -> String {
        match self.ch {
            '{' | '}' | '%' | '#' | '&' | '_' | '$' => format!("\\{}", self.ch),
            '*' => r"\cdot ".to_string(),
            ch => ch.to_string(),
        }
    }

    fn text(&self, _doc: &Document, _node: NodeId) -> String {
        self.ch.to_string()
    }

    fn speech(&self, _doc: &Document, _node: NodeId) -> String {
        match self.ch {
            '+' => "plus".to_string(),
            '-' => "minus".to_string(),
            '*' => "times".to_string(),
            '/' => "divided by".to_string(),
            '=' => "equals".to_string(),
            '<' => "less than".to_string(),
            '>' => "greater than".to_string(),
            ch => ch.to_string(),
        }
    }

    fn ir(&self, _doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()> {
        out.push(Token::new(self.token_kind(), self.ch, Some(node)));
        ControlFlow::Continue(())
    }

    /// Crosses the whole run of neighbouring nodes sharing this symbol's
    /// word class, unless word boundaries are switched off.
    fn move_across_word(&self, doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir) {
        let mut last = node;
        if doc.options().word_boundaries {
            let class = self.word_class();
            while let Some(next) = doc.sibling(last, dir)
                && doc.kind(next).is_some_and(|kind| kind.word_class() == class)
            {
                last = next;
            }
        }
        if let Some(beside) = Cursor::beside(doc, last, dir) {
            *cursor = beside;
        }
    }
}
