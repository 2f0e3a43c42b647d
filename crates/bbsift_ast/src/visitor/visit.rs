//! Visitor trait for traversing tag trees.

use std::ops::ControlFlow;

use crate::{Document, NodeId, TagNode, TextNode};

use super::walk::walk_children;

/// Result type for visitor methods to control traversal.
///
/// - `ControlFlow::Continue(())` - continue visiting
/// - `ControlFlow::Break(())` - stop traversal early
pub type VisitResult = ControlFlow<()>;

/// Visitor trait for traversing a [`Document`] without modification.
///
/// `visit_tag` walks children by default, so override only what you need.
/// Return `ControlFlow::Break(())` to stop early; the `?` operator
/// propagates it.
pub trait Visitor: Sized {
    /// Called before visiting any node.
    #[inline]
    fn enter_node(&mut self, _doc: &Document, _id: NodeId) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after visiting a node and all its children.
    #[inline]
    fn exit_node(&mut self, _doc: &Document, _id: NodeId) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Visit a tag node.
    fn visit_tag(&mut self, doc: &Document, _id: NodeId, node: &TagNode) -> VisitResult {
        walk_children(self, doc, &node.children)
    }

    /// Visit a text node.
    fn visit_text(&mut self, _doc: &Document, _id: NodeId, _node: &TextNode) -> VisitResult {
        ControlFlow::Continue(())
    }
}
