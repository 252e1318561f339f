#![allow(dead_code)]

use mathslot_engine::kinds::{Fraction, Matrix, Symbol};
use mathslot_engine::view::headless::HeadlessRenderer;
use mathslot_engine::{Dir, Document, GroupId, NodeId};

pub fn append(doc: &mut Document, group: GroupId, nodes: Vec<NodeId>) {
    let block = doc.fragment(nodes);
    let last = doc.end(group, Dir::Right);
    doc.insert(group, block, last, None);
}

pub fn symbols(doc: &mut Document, text: &str) -> Vec<NodeId> {
    text.chars().map(|ch| Symbol::create(doc, ch)).collect()
}

/// A flat root group of `len` symbols.
pub fn flat_document(len: usize) -> Document {
    let mut doc = Document::new();
    let text: String = "x+1=".chars().cycle().take(len).collect();
    let nodes = symbols(&mut doc, &text);
    let root = doc.root();
    append(&mut doc, root, nodes);
    doc
}

/// `depth` fractions nested through their denominators, each numerator
/// holding a short run of symbols, rendered by the headless host.
pub fn nested_fractions(depth: usize) -> (Document, Vec<NodeId>) {
    let mut doc = Document::new();
    doc.set_renderer(Box::new(HeadlessRenderer::default()));
    let mut group = doc.root();
    let mut fractions = Vec::with_capacity(depth);
    for _ in 0..depth {
        let frac = Fraction::create(&mut doc);
        append(&mut doc, group, vec![frac]);
        if let Some(numerator) = doc.child(frac, 0) {
            let nodes = symbols(&mut doc, "a+b");
            append(&mut doc, numerator, nodes);
        }
        fractions.push(frac);
        match doc.child(frac, 1) {
            Some(denominator) => group = denominator,
            None => break,
        }
    }
    (doc, fractions)
}

/// A `rows` by `columns` matrix whose cells each hold two symbols.
pub fn filled_matrix(rows: usize, columns: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    doc.set_renderer(Box::new(HeadlessRenderer::default()));
    let matrix = Matrix::create(&mut doc, rows, columns);
    for cell in doc.children(matrix).to_vec() {
        let nodes = symbols(&mut doc, "12");
        append(&mut doc, cell, nodes);
    }
    let root = doc.root();
    append(&mut doc, root, vec![matrix]);
    (doc, matrix)
}
