//! Node definitions.

use std::sync::Arc;

use bbsift_dictionary::TagDefinition;
use serde::Serialize;

use crate::Params;

/// Handle to a node inside a [`crate::Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena index of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Discriminates the two node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Tag,
    Text,
}

/// A node of the tag tree.
#[derive(Debug, Clone)]
pub enum Node {
    Tag(TagNode),
    Text(TextNode),
}

impl Node {
    /// Returns the kind of this node.
    #[inline]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Node::Tag(_) => NodeKind::Tag,
            Node::Text(_) => NodeKind::Text,
        }
    }

    #[inline]
    pub const fn is_tag(&self) -> bool {
        matches!(self, Node::Tag(_))
    }

    #[inline]
    pub const fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn as_tag(&self) -> Option<&TagNode> {
        match self {
            Node::Tag(tag) => Some(tag),
            Node::Text(_) => None,
        }
    }

    pub fn as_tag_mut(&mut self) -> Option<&mut TagNode> {
        match self {
            Node::Tag(tag) => Some(tag),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            Node::Tag(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            Node::Text(text) => Some(text),
            Node::Tag(_) => None,
        }
    }
}

/// How a tag node's name and definition were determined.
///
/// A multi-tag placeholder starts out [`TagIdentity::Pending`] and transitions
/// exactly once, on the first text seen inside it, to either
/// [`TagIdentity::Resolved`] or [`TagIdentity::Unresolved`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TagIdentity {
    /// An ordinary tag.
    Concrete,
    /// A multi-tag placeholder that has not seen any text yet.
    Pending,
    /// A multi-tag placeholder replaced by one of its concrete tags.
    Resolved { placeholder: String },
    /// A multi-tag placeholder whose text matched no concrete tag.
    Unresolved,
}

/// A tag node: `[name params]children[/name]`.
#[derive(Debug, Clone)]
pub struct TagNode {
    /// Lower-cased tag name.
    pub name: String,

    /// Definition from the dictionary.
    pub definition: Arc<TagDefinition>,

    /// Resolution state of the name and definition.
    pub identity: TagIdentity,

    /// Parameters in supply order.
    pub params: Params,

    /// Text directly inside the tag, for tags that require it.
    pub between: Option<String>,

    /// Child nodes in document order.
    pub children: Vec<NodeId>,

    /// The quick parameter did not match the tag's format.
    pub invalid_quick_param: bool,

    /// False once end of input is reached with the tag still open.
    pub closed: bool,
}

impl TagNode {
    /// Creates a tag node with no parameters and no children.
    pub fn new(name: impl Into<String>, definition: Arc<TagDefinition>) -> Self {
        let identity = if definition.multi_tag {
            TagIdentity::Pending
        } else {
            TagIdentity::Concrete
        };
        Self {
            name: name.into(),
            definition,
            identity,
            params: Params::new(),
            between: None,
            children: Vec::new(),
            invalid_quick_param: false,
            closed: true,
        }
    }

    /// Sets the parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Returns true if this node is a placeholder still waiting for text.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.identity == TagIdentity::Pending
    }

    /// Replaces a pending placeholder with a concrete tag.
    pub fn resolve(&mut self, name: impl Into<String>, definition: Arc<TagDefinition>) {
        let placeholder = std::mem::replace(&mut self.name, name.into());
        self.definition = definition;
        self.identity = TagIdentity::Resolved { placeholder };
    }

    /// Marks a pending placeholder as impossible to resolve.
    pub fn mark_unresolved(&mut self) {
        self.identity = TagIdentity::Unresolved;
    }

    /// Returns true if no parameter has been set.
    #[inline]
    pub fn params_not_set(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns true if the between-text may be used as the first parameter.
    pub fn takes_between_as_param(&self) -> bool {
        self.definition.allow_between_as_param && self.params_not_set() && !self.invalid_quick_param
    }
}

/// A run of literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Removes one trailing line break (`\r\n`, `\n` or `\r`).
    pub fn chomp(&mut self) {
        if self.text.ends_with("\r\n") {
            self.text.truncate(self.text.len() - 2);
        } else if self.text.ends_with('\n') || self.text.ends_with('\r') {
            self.text.pop();
        }
    }
}
