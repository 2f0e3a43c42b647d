//! The parsed document.

use serde::Serialize;
use serde::ser::{SerializeSeq, SerializeStruct};

use crate::{Node, NodeId, TagNode, TextNode};

/// An error message, optionally attached to the node it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeError {
    /// Human readable message.
    pub message: String,

    /// The node the error is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
}

/// A tag tree plus the errors found while building it.
///
/// The document owns every node. Root nodes are the siblings at depth 0;
/// everything else is reachable through [`TagNode::children`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    errors: Vec<NodeError>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a node without attaching it anywhere.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Appends a node to the root sequence.
    pub fn push_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    /// Appends `child` to the children of the tag node `parent`.
    ///
    /// Returns false, leaving the document unchanged, if `parent` is not a
    /// tag node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes.get_mut(parent.0) {
            Some(Node::Tag(tag)) => {
                tag.children.push(child);
                true
            }
            _ => false,
        }
    }

    /// Returns the root sequence.
    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Resolves a node id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Resolves a node id mutably.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Resolves a node id to a tag node.
    pub fn tag(&self, id: NodeId) -> Option<&TagNode> {
        self.node(id).as_tag()
    }

    /// Resolves a node id to a mutable tag node.
    pub fn tag_mut(&mut self, id: NodeId) -> Option<&mut TagNode> {
        self.node_mut(id).as_tag_mut()
    }

    /// Resolves a node id to a text node.
    pub fn text(&self, id: NodeId) -> Option<&TextNode> {
        self.node(id).as_text()
    }

    /// Resolves a node id to a mutable text node.
    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut TextNode> {
        self.node_mut(id).as_text_mut()
    }

    /// Returns the children of a node; text nodes have none.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Tag(tag) => &tag.children,
            Node::Text(_) => &[],
        }
    }

    /// Returns the total number of nodes at any depth.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the document has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends an error to the log and returns its position.
    pub fn record_error(&mut self, message: impl Into<String>, node: Option<NodeId>) -> usize {
        self.errors.push(NodeError {
            message: message.into(),
            node,
        });
        self.errors.len() - 1
    }

    /// Attaches an already recorded error to a node.
    ///
    /// Errors found before their node exists are recorded detached and
    /// attached once the node is built, keeping the log in discovery order.
    pub fn attach_error(&mut self, index: usize, node: NodeId) {
        if let Some(error) = self.errors.get_mut(index) {
            error.node = Some(node);
        }
    }

    /// Returns the full error log in the order errors were found.
    #[inline]
    pub fn error_log(&self) -> &[NodeError] {
        &self.errors
    }

    /// Iterates over every error message.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.message.as_str())
    }

    /// Returns the messages attached to `id`.
    pub fn errors_of(&self, id: NodeId) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.node == Some(id))
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Returns true if no error was recorded.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Concatenates all text below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Node::Text(text) => out.push_str(&text.text),
            Node::Tag(tag) => {
                if let Some(between) = &tag.between
                    && tag.children.is_empty()
                {
                    out.push_str(between);
                }
                for &child in &tag.children {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

/// Serializes a node subtree.
struct NodeView<'a> {
    doc: &'a Document,
    id: NodeId,
}

/// Serializes a sequence of sibling nodes.
struct NodesView<'a> {
    doc: &'a Document,
    ids: &'a [NodeId],
}

impl Serialize for NodeView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let errors = self.doc.errors_of(self.id);
        match self.doc.node(self.id) {
            Node::Text(text) => {
                let mut state = serializer.serialize_struct("TextNode", 3)?;
                state.serialize_field("type", "text")?;
                state.serialize_field("text", &text.text)?;
                state.serialize_field("errors", &errors)?;
                state.end()
            }
            Node::Tag(tag) => {
                let mut len = 6;
                if tag.between.is_some() {
                    len += 1;
                }
                let mut state = serializer.serialize_struct("TagNode", len)?;
                state.serialize_field("type", "tag")?;
                state.serialize_field("name", &tag.name)?;
                state.serialize_field("params", &tag.params)?;
                if let Some(between) = &tag.between {
                    state.serialize_field("between", between)?;
                }
                state.serialize_field("closed", &tag.closed)?;
                state.serialize_field("errors", &errors)?;
                state.serialize_field(
                    "children",
                    &NodesView {
                        doc: self.doc,
                        ids: &tag.children,
                    },
                )?;
                state.end()
            }
        }
    }
}

impl Serialize for NodesView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.ids.len()))?;
        for &id in self.ids {
            seq.serialize_element(&NodeView { doc: self.doc, id })?;
        }
        seq.end()
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Document", 3)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors().collect::<Vec<_>>())?;
        state.serialize_field(
            "nodes",
            &NodesView {
                doc: self,
                ids: &self.roots,
            },
        )?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bbsift_dictionary::TagDefinition;
    use pretty_assertions::assert_eq;

    use super::*;

    fn bold_document() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let bold = doc.alloc(Node::Tag(TagNode::new("b", Arc::new(TagDefinition::default()))));
        doc.push_root(bold);
        let text = doc.alloc(Node::Text(TextNode::new("bold")));
        doc.append_child(bold, text);
        (doc, bold, text)
    }

    #[test]
    fn test_alloc_and_append() {
        let (doc, bold, text) = bold_document();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.roots(), &[bold]);
        assert_eq!(doc.children(bold), &[text]);
        assert!(doc.children(text).is_empty());
        assert_eq!(doc.text(text).unwrap().text, "bold");
    }

    #[test]
    fn test_error_views_share_one_log() {
        let (mut doc, bold, text) = bold_document();
        doc.record_error("first", Some(bold));
        doc.record_error("second", Some(text));
        doc.record_error("third", None);
        doc.record_error("fourth", Some(bold));

        assert!(!doc.is_valid());
        assert_eq!(
            doc.errors().collect::<Vec<_>>(),
            vec!["first", "second", "third", "fourth"]
        );
        assert_eq!(doc.errors_of(bold), vec!["first", "fourth"]);
        assert_eq!(doc.errors_of(text), vec!["second"]);
    }

    #[test]
    fn test_attach_error_later() {
        let (mut doc, bold, _) = bold_document();
        let index = doc.record_error("detached", None);
        assert!(doc.errors_of(bold).is_empty());

        doc.attach_error(index, bold);

        assert_eq!(doc.errors_of(bold), vec!["detached"]);
        assert_eq!(doc.error_log()[index].node, Some(bold));
    }

    #[test]
    fn test_text_content() {
        let (mut doc, bold, _) = bold_document();
        let url = doc.alloc(Node::Tag(TagNode::new("url", Arc::new(TagDefinition::default()))));
        doc.append_child(bold, url);
        doc.tag_mut(url).unwrap().between = Some("http://example.com".to_string());

        assert_eq!(doc.text_content(bold), "boldhttp://example.com");
    }

    #[test]
    fn test_append_to_text_is_rejected() {
        let (mut doc, bold, text) = bold_document();
        let other = doc.alloc(Node::Text(TextNode::new("x")));

        assert!(!doc.append_child(text, other));
        assert!(!doc.append_child(NodeId(99), other));
        assert!(doc.append_child(bold, other));
        assert_eq!(doc.children(bold).len(), 2);
    }

    #[test]
    fn test_serialization() {
        let (mut doc, bold, _) = bold_document();
        doc.tag_mut(bold).unwrap().params.insert("style", "x");
        doc.record_error("oops", Some(bold));

        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0], "oops");
        let node = &json["nodes"][0];
        assert_eq!(node["type"], "tag");
        assert_eq!(node["name"], "b");
        assert_eq!(node["params"]["style"], "x");
        assert_eq!(node["closed"], true);
        assert_eq!(node["errors"][0], "oops");
        assert!(node.get("between").is_none());
        assert_eq!(node["children"][0]["type"], "text");
        assert_eq!(node["children"][0]["text"], "bold");
        assert!(node["children"][0]["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert!(doc.is_valid());

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["nodes"].as_array().unwrap().is_empty());
    }
}
