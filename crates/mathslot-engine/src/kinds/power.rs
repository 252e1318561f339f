use std::any::Any;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::editing::cursor::Cursor;
use crate::serialize::Token;
use crate::tree::{Dir, Document, GroupId, NodeId, NodeKind, VDir, VertExit};
use crate::view::Geometry;

/// A superscript raised over the baseline.
///
/// The superscript is reachable vertically from either side of the node:
/// pressing up next to it steps into the exponent, and pressing down inside
/// the exponent drops back to the baseline just after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Power;

impl Power {
    pub fn create(doc: &mut Document) -> NodeId {
        doc.create_node(Rc::new(Self))
    }

    fn exponent(doc: &Document, node: NodeId) -> Option<GroupId> {
        doc.child(node, 0)
    }
}

impl NodeKind for Power {
    fn name(&self) -> &'static str {
        "power"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arity(&self) -> usize {
        1
    }

    fn latex(&self, doc: &Document, node: NodeId) -> String {
        let inner = Self::exponent(doc, node).map(|group| doc.latex(group)).unwrap_or_default();
        format!("^{{{inner}}}")
    }

    fn text(&self, doc: &Document, node: NodeId) -> String {
        let inner = Self::exponent(doc, node).map(|group| doc.text(group)).unwrap_or_default();
        format!("^({inner})")
    }

    fn speech(&self, doc: &Document, node: NodeId) -> String {
        let inner = Self::exponent(doc, node).map(|group| doc.speech(group)).unwrap_or_default();
        format!("Superscript {inner} Baseline")
    }

    fn ir(&self, doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()> {
        out.push(Token::marker("sup_start", node));
        if let Some(group) = Self::exponent(doc, node)
            && doc.ir_into(group, out).is_break()
        {
            return ControlFlow::Break(());
        }
        out.push(Token::marker("sup_end", node));
        ControlFlow::Continue(())
    }

    fn vert_into(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        _pos: f32,
        _geometry: &dyn Geometry,
    ) -> Option<GroupId> {
        match dir {
            VDir::Down => Self::exponent(doc, node),
            VDir::Up => None,
        }
    }

    fn vert_from_side(&self, doc: &Document, node: NodeId, dir: VDir, _from_side: Dir) -> Option<GroupId> {
        match dir {
            VDir::Up => Self::exponent(doc, node),
            VDir::Down => None,
        }
    }

    fn vert_out_of(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        _child: GroupId,
        cursor: &mut Cursor,
    ) -> VertExit {
        match (dir, Cursor::beside(doc, node, Dir::Right)) {
            (VDir::Down, Some(after)) => {
                *cursor = after;
                VertExit::Handled
            }
            _ => VertExit::Decline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Symbol;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializations() {
        let mut doc = Document::new();
        let root = doc.root();
        let x = Symbol::create(&mut doc, 'x');
        let power = Power::create(&mut doc);
        let two = Symbol::create(&mut doc, '2');
        let block = doc.fragment([two]);
        if let Some(exponent) = doc.child(power, 0) {
            doc.insert(exponent, block, None, None);
        }
        let block = doc.fragment([x, power]);
        doc.insert(root, block, None, None);

        assert_eq!(doc.latex(root), "x^{2}");
        assert_eq!(doc.text(root), "x^(2)");
        assert_eq!(doc.speech(root), "x Superscript 2 Baseline");
    }

    #[test]
    fn test_detached_power_declines_vertical_exit() {
        let mut doc = Document::new();
        let power = Power::create(&mut doc);
        let exponent = doc.child(power, 0).unwrap();
        let mut cursor = Cursor::at_end(&doc, exponent, Dir::Left);

        assert_eq!(
            Power.vert_out_of(&doc, power, VDir::Down, exponent, &mut cursor),
            VertExit::Decline
        );
    }
}
