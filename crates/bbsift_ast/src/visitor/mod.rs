//! Visitor pattern for tag tree traversal.
//!
//! Downstream renderers walk a [`crate::Document`] through these traits
//! rather than matching on nodes by hand.
//!
//! # Overview
//!
//! - [`Visitor`] - Read-only traversal trait
//! - [`walk_document`] - Visit every root node in order
//! - [`walk_node`] - Dispatch a single node to the matching `visit_*` method
//! - [`walk_children`] - Traverse the children of a tag node
//!
//! # Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use std::sync::Arc;
//! use bbsift_ast::{Document, Node, NodeId, TagNode, TextNode};
//! use bbsift_ast::visitor::{VisitResult, Visitor, walk_document};
//! use bbsift_dictionary::TagDefinition;
//!
//! struct TextCollector {
//!     texts: Vec<String>,
//! }
//!
//! impl Visitor for TextCollector {
//!     fn visit_text(&mut self, _doc: &Document, _id: NodeId, node: &TextNode) -> VisitResult {
//!         self.texts.push(node.text.clone());
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let mut doc = Document::new();
//! let bold = doc.alloc(Node::Tag(TagNode::new("b", Arc::new(TagDefinition::default()))));
//! doc.push_root(bold);
//! let text = doc.alloc(Node::Text(TextNode::new("hello")));
//! doc.append_child(bold, text);
//!
//! let mut collector = TextCollector { texts: Vec::new() };
//! let _ = walk_document(&mut collector, &doc);
//! assert_eq!(collector.texts, vec!["hello"]);
//! ```

mod visit;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use walk::{walk_children, walk_document, walk_node};
