use std::any::Any;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::editing::cursor::Cursor;
use crate::serialize::Token;
use crate::tree::node::enter_from;
use crate::tree::{Dir, Document, GroupId, NodeId, NodeKind, VDir, VertExit};
use crate::view::{Arrangement, Geometry};

const NUMERATOR: usize = 0;
const DENOMINATOR: usize = 1;

/// Numerator stacked over denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fraction;

impl Fraction {
    pub fn create(doc: &mut Document) -> NodeId {
        doc.create_node(Rc::new(Self))
    }

    fn part(doc: &Document, node: NodeId, dir: VDir) -> Option<GroupId> {
        match dir {
            VDir::Up => doc.child(node, NUMERATOR),
            VDir::Down => doc.child(node, DENOMINATOR),
        }
    }

    fn parts(doc: &Document, node: NodeId) -> (String, String) {
        let part = |index| doc.child(node, index);
        (
            part(NUMERATOR).map(|group| doc.latex(group)).unwrap_or_default(),
            part(DENOMINATOR).map(|group| doc.latex(group)).unwrap_or_default(),
        )
    }
}

impl NodeKind for Fraction {
    fn name(&self) -> &'static str {
        "fraction"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arity(&self) -> usize {
        2
    }

    fn arrangement(&self) -> Arrangement {
        Arrangement::Stack { padding: 0.5 }
    }

    fn latex(&self, doc: &Document, node: NodeId) -> String {
        let (numerator, denominator) = Self::parts(doc, node);
        format!("\\frac{{{numerator}}}{{{denominator}}}")
    }

    fn text(&self, doc: &Document, node: NodeId) -> String {
        let text = |index| doc.child(node, index).map(|group| doc.text(group)).unwrap_or_default();
        format!("({})/({})", text(NUMERATOR), text(DENOMINATOR))
    }

    fn speech(&self, doc: &Document, node: NodeId) -> String {
        let speech = |index| doc.child(node, index).map(|group| doc.speech(group)).unwrap_or_default();
        format!(
            "StartFraction {} Over {} EndFraction",
            speech(NUMERATOR),
            speech(DENOMINATOR)
        )
    }

    fn ir(&self, doc: &Document, node: NodeId, out: &mut Vec<Token>) -> ControlFlow<()> {
        out.push(Token::marker("frac_start", node));
        for (index, &group) in doc.children(node).iter().enumerate() {
            if index == DENOMINATOR {
                out.push(Token::marker("frac_over", node));
            }
            if doc.ir_into(group, out).is_break() {
                return ControlFlow::Break(());
            }
        }
        out.push(Token::marker("frac_end", node));
        ControlFlow::Continue(())
    }

    /// Enters the part named by [`EditorOptions::left_right_into`], or the
    /// nearer end otherwise.
    ///
    /// [`EditorOptions::left_right_into`]: crate::EditorOptions::left_right_into
    fn move_into(&self, doc: &Document, node: NodeId, cursor: &mut Cursor, dir: Dir) {
        match doc
            .options()
            .left_right_into
            .and_then(|part| Self::part(doc, node, part))
        {
            Some(group) => *cursor = Cursor::at_end(doc, group, dir.opposite()),
            None => enter_from(doc, node, cursor, dir),
        }
    }

    fn vert_into(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        _pos: f32,
        _geometry: &dyn Geometry,
    ) -> Option<GroupId> {
        Self::part(doc, node, dir.opposite())
    }

    fn vert_out_of(
        &self,
        doc: &Document,
        node: NodeId,
        dir: VDir,
        child: GroupId,
        _cursor: &mut Cursor,
    ) -> VertExit {
        let index = doc.child_index(node, child);
        match (dir, index) {
            (VDir::Down, Some(NUMERATOR)) => Self::part(doc, node, VDir::Down)
                .map_or(VertExit::Decline, VertExit::Descend),
            (VDir::Up, Some(DENOMINATOR)) => Self::part(doc, node, VDir::Up)
                .map_or(VertExit::Decline, VertExit::Descend),
            _ => VertExit::Decline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorOptions;
    use crate::kinds::Symbol;
    use crate::tree::invariants;
    use pretty_assertions::assert_eq;

    fn half(doc: &mut Document) -> NodeId {
        let frac = Fraction::create(doc);
        for (index, ch) in [(NUMERATOR, '1'), (DENOMINATOR, '2')] {
            let symbol = Symbol::create(doc, ch);
            let block = doc.fragment([symbol]);
            if let Some(group) = doc.child(frac, index) {
                doc.insert(group, block, None, None);
            }
        }
        let root = doc.root();
        let block = doc.fragment([frac]);
        doc.insert(root, block, None, None);
        frac
    }

    #[test]
    fn test_empty_fraction_latex() {
        let mut doc = Document::new();
        let frac = Fraction::create(&mut doc);

        assert_eq!(Fraction.latex(&doc, frac), r"\frac{}{}");
    }

    #[test]
    fn test_left_right_into_picks_part() {
        let mut doc = Document::with_options(EditorOptions {
            left_right_into: Some(VDir::Down),
            ..EditorOptions::default()
        });
        let frac = half(&mut doc);
        let denominator = doc.child(frac, DENOMINATOR).unwrap();
        let mut cursor = Cursor::new(doc.root(), Some(frac));

        Fraction.move_into(&doc, frac, &mut cursor, Dir::Right);

        assert_eq!(cursor, Cursor::at_end(&doc, denominator, Dir::Left));
    }

    #[test]
    fn test_vertical_hooks() {
        let mut doc = Document::new();
        let frac = half(&mut doc);
        let (numerator, denominator) = (doc.child(frac, 0).unwrap(), doc.child(frac, 1).unwrap());
        let mut cursor = Cursor::at_end(&doc, numerator, Dir::Left);

        assert_eq!(
            Fraction.vert_out_of(&doc, frac, VDir::Down, numerator, &mut cursor),
            VertExit::Descend(denominator)
        );
        assert_eq!(
            Fraction.vert_out_of(&doc, frac, VDir::Up, numerator, &mut cursor),
            VertExit::Decline
        );
        assert_eq!(
            Fraction.vert_into(&doc, frac, VDir::Up, 0.0, &crate::view::NoGeometry),
            Some(denominator)
        );
    }

    #[test]
    fn test_backspace_at_denominator_start_flattens() {
        let mut doc = Document::new();
        let frac = half(&mut doc);
        let denominator = doc.child(frac, DENOMINATOR).unwrap();
        let root = doc.root();
        let mut cursor = Cursor::at_end(&doc, denominator, Dir::Left);

        assert!(cursor.delete(&mut doc, Dir::Left).moved());

        assert_eq!(doc.latex(root), "12");
        assert_eq!(cursor.group, root);
        assert_eq!(cursor.left(&doc).and_then(|n| doc.kind_as::<Symbol>(n)).map(Symbol::ch), Some('1'));
        invariants::check(&doc);
    }

    #[test]
    fn test_delete_enters_non_empty_fraction() {
        let mut doc = Document::new();
        let frac = half(&mut doc);
        let denominator = doc.child(frac, DENOMINATOR).unwrap();
        let mut cursor = Cursor::new(doc.root(), None);

        assert!(cursor.delete(&mut doc, Dir::Left).moved());

        assert!(doc.contains_node(frac));
        assert_eq!(cursor, Cursor::at_end(&doc, denominator, Dir::Right));
    }
}
