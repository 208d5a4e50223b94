//! Maps a selected span to the node a refactoring should act on.

use sharpen_syntax::{Document, NodeRef, TextRange};

/// The widest accepted node lying entirely inside `span`.
///
/// Ties keep the first node in preorder, i.e. the outermost one.
pub(crate) fn widest_contained<'a>(
    doc: &'a Document,
    span: TextRange,
    accept: impl Fn(NodeRef<'a>) -> bool,
) -> Option<NodeRef<'a>> {
    let mut best: Option<(NodeRef<'a>, usize)> = None;
    for node in doc.root().preorder() {
        let Some(range) = doc.range(node.id()) else {
            continue;
        };
        if !span.contains_range(range) || !accept(node) {
            continue;
        }
        if best.map_or(true, |(_, width)| range.len() > width) {
            best = Some((node, range.len()));
        }
    }
    best.map(|(node, _)| node)
}

/// The smallest accepted node containing `span`; a caret (empty span)
/// counts as the character after it.
///
/// Ties keep the first node in preorder.
pub(crate) fn narrowest_containing<'a>(
    doc: &'a Document,
    span: TextRange,
    accept: impl Fn(NodeRef<'a>) -> bool,
) -> Option<NodeRef<'a>> {
    let span = if span.is_empty() {
        TextRange::new(span.start, span.start + 1)
    } else {
        span
    };
    let mut best: Option<(NodeRef<'a>, usize)> = None;
    for node in doc.root().preorder() {
        let Some(range) = doc.range(node.id()) else {
            continue;
        };
        if !range.contains_range(span) || !accept(node) {
            continue;
        }
        if best.map_or(true, |(_, width)| range.len() < width) {
            best = Some((node, range.len()));
        }
    }
    best.map(|(node, _)| node)
}

/// The innermost accepted node whose range contains `offset`.
pub(crate) fn innermost_at<'a>(
    doc: &'a Document,
    offset: usize,
    accept: impl Fn(NodeRef<'a>) -> bool,
) -> Option<NodeRef<'a>> {
    let mut best: Option<(NodeRef<'a>, usize)> = None;
    for node in doc.root().preorder() {
        let Some(range) = doc.range(node.id()) else {
            continue;
        };
        if !range.contains_inclusive(offset) || !accept(node) {
            continue;
        }
        if best.map_or(true, |(_, width)| range.len() <= width) {
            best = Some((node, range.len()));
        }
    }
    best.map(|(node, _)| node)
}
