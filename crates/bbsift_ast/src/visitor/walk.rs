//! Walk functions for tag tree traversal.

use std::ops::ControlFlow;

use crate::{Document, Node, NodeId};

use super::visit::{VisitResult, Visitor};

/// Walks every root node of `doc` in order.
pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) -> VisitResult {
    walk_children(visitor, doc, doc.roots())
}

/// Walks a node by dispatching to `visit_tag` or `visit_text`.
///
/// `enter_node` runs before the dispatch and `exit_node` after it.
pub fn walk_node<V: Visitor>(visitor: &mut V, doc: &Document, id: NodeId) -> VisitResult {
    visitor.enter_node(doc, id)?;

    match doc.node(id) {
        Node::Tag(tag) => visitor.visit_tag(doc, id, tag)?,
        Node::Text(text) => visitor.visit_text(doc, id, text)?,
    }

    visitor.exit_node(doc, id)
}

/// Walks a sequence of sibling nodes, stopping at the first `Break`.
#[inline]
pub fn walk_children<V: Visitor>(visitor: &mut V, doc: &Document, ids: &[NodeId]) -> VisitResult {
    for &id in ids {
        walk_node(visitor, doc, id)?;
    }
    ControlFlow::Continue(())
}
