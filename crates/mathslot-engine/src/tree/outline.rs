//! Indented text rendering of a group's structure, for snapshot tests and
//! debug logging.

use std::fmt::Write;

use crate::tree::{Document, GroupId};

/// One line per node, with each child group introduced by its index:
///
/// ```text
/// symbol "x"
/// fraction
///   #0
///     symbol "1"
///   #1
/// ```
///
/// Leaf nodes show their plain-text form.
pub fn format_group(doc: &Document, group: GroupId) -> String {
    let mut out = String::new();
    write_group(doc, group, 0, &mut out);
    out
}

fn write_group(doc: &Document, group: GroupId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    for node in doc.nodes(group) {
        let Some(kind) = doc.kind(node) else {
            continue;
        };
        let children = doc.children(node);
        if children.is_empty() {
            let _ = writeln!(out, "{prefix}{} {:?}", kind.name(), kind.text(doc, node));
            continue;
        }
        let _ = writeln!(out, "{prefix}{}", kind.name());
        for (index, &child) in children.iter().enumerate() {
            let _ = writeln!(out, "{prefix}  #{index}");
            write_group(doc, child, indent + 2, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Fraction, Symbol};
    use crate::tree::Dir;
    use insta::assert_snapshot;

    #[test]
    fn snapshot_fraction_outline() {
        let mut doc = Document::new();
        let root = doc.root();
        let x = Symbol::create(&mut doc, 'x');
        let frac = Fraction::create(&mut doc);
        let one = Symbol::create(&mut doc, '1');
        let block = doc.fragment([one]);
        if let Some(numerator) = doc.child(frac, 0) {
            doc.insert(numerator, block, None, None);
        }
        let block = doc.fragment([x, frac]);
        let last = doc.end(root, Dir::Right);
        doc.insert(root, block, last, None);

        assert_snapshot!(format_group(&doc, root), @r#"
        symbol "x"
        fraction
          #0
            symbol "1"
          #1
        "#);
    }
}
