use std::any::Any;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::serialize::Token;
use crate::tree::{Document, NodeId, NodeKind};
use crate::view::Arrangement;

/// A matched pair of delimiters around one child group.
///
/// Round parentheses are a transparent wrapper: they only group for
/// precedence and may be elided when their content is reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket {
    open: char,
    close: char,
}

impl Bracket {
    pub fn create(doc: &mut Document, open: char, close: char) -> NodeId {
        doc.create_node(Rc::new(Self { open, close }))
    }

    pub fn delimiters(&self) -> (char, char) {
        (self.open, self.close)
    }

    fn latex_delimiter(ch: char) -> String {
        match ch {
            '{' | '}' => format!("\\{ch}"),
            ch => ch.to_string(),
        }
    }

    fn spoken(ch: char) -> &'static str {
        match ch {
            '(' => "left-parenthesis",
            ')' => "right-parenthesis",
            '[' => "left-bracket",
            ']' => "right-bracket",
            '{' => "left-brace",
            '}' => "right-brace",
            '|' => "pipe",
            _ => "delimiter",
        }
    }
}

impl NodeKind for Bracket {
    fn name(&self) -> &'static str {
        "bracket"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arity(&self) -> usize {
        1
    }

    fn is_transparent_wrapper(&self) -> bool {
        self.open == '(' && self.close == ')'
    }

    fn arrangement(&self) -> Arrangement {
        Arrangement::Row { padding: 1.0 }
    }

    fn latex(&self, doc: &Document, node: NodeId) -> String {
        let inner = doc.child(node, 0).map(|group| doc.latex(group)).unwrap_or_default();
        format!(
            "\\left{}{inner}\\right{}",
            Self::latex_delimiter(self.open),
            Self::latex_delimiter(self.close)
        )
    }

    fn text(&self, doc: &Document, node: NodeId) -> String {
        let inner = doc.child(node, 0).map(|group| doc.text(group)).unwrap_or_default();
        format!("{}{inner}{}", self.open, self.close)
    }

    fn speech(&self, doc: &Document, node: NodeId) -> String {
        let inner = doc.child(node, 0).map(|group| doc.speech(group)).unwrap_or_default();
        [Self::spoken(self.open), inner.as_str(), Self::spoken(self.close)]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn ir(&self, doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()> {
        out.push(Token::new("open", self.open, Some(node)));
        if let Some(group) = doc.child(node, 0)
            && doc.ir_into(group, out).is_break()
        {
            return ControlFlow::Break(());
        }
        out.push(Token::new("close", self.close, Some(node)));
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Symbol;
    use crate::tree::Dir;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializations_wrap_content() {
        let mut doc = Document::new();
        let paren = Bracket::create(&mut doc, '(', ')');
        let inner = doc.child(paren, 0).unwrap();
        let x = Symbol::create(&mut doc, 'x');
        let block = doc.fragment([x]);
        doc.insert(inner, block, None, None);
        let root = doc.root();
        let block = doc.fragment([paren]);
        let last = doc.end(root, Dir::Right);
        doc.insert(root, block, last, None);

        assert_eq!(doc.latex(root), r"\left(x\right)");
        assert_eq!(doc.text(root), "(x)");
        assert_eq!(doc.speech(root), "left-parenthesis x right-parenthesis");
        let kinds: Vec<_> = doc.ir(root).iter().map(|token| token.kind).collect();
        assert_eq!(kinds, vec!["open", "variable", "close"]);
    }

    #[test]
    fn test_only_round_parens_are_transparent() {
        assert!(Bracket { open: '(', close: ')' }.is_transparent_wrapper());
        assert!(!Bracket { open: '[', close: ']' }.is_transparent_wrapper());
        assert!(!Bracket { open: '{', close: '}' }.is_transparent_wrapper());
    }
}
