//! # bbsift_ast
//!
//! Tree types produced by the bbsift markup parser.
//!
//! ## Architecture
//!
//! - Nodes live in an index arena owned by a [`Document`]
//! - [`NodeId`] is a copyable handle into that arena
//! - Tag nodes keep a shared reference to their dictionary definition
//! - Errors are a single append-only log; per-node lists are a view over it
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bbsift_ast::{Document, Node, TagNode, TextNode};
//! use bbsift_dictionary::TagDefinition;
//!
//! let mut doc = Document::new();
//! let bold = doc.alloc(Node::Tag(TagNode::new("b", Arc::new(TagDefinition::default()))));
//! doc.push_root(bold);
//! let text = doc.alloc(Node::Text(TextNode::new("bold")));
//! doc.append_child(bold, text);
//!
//! assert_eq!(doc.roots().len(), 1);
//! assert_eq!(doc.children(bold), &[text]);
//! ```

mod document;
mod node;
mod params;
pub mod visitor;

pub use document::{Document, NodeError};
pub use node::{Node, NodeId, NodeKind, TagIdentity, TagNode, TextNode};
pub use params::Params;

pub use visitor::{VisitResult, Visitor};
