//! Stack-based tree assembler.

use bbsift_ast::{Document, Node, NodeId, TagNode};

/// Builds a [`Document`] while tracking the chain of open tags.
///
/// The last entry of the stack is the cursor: the node new children are
/// appended to. An empty stack means the cursor is the root sequence.
#[derive(Debug, Default)]
pub struct BbTree {
    doc: Document,
    stack: Vec<NodeId>,
}

impl BbTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an already built tag node onto the stack, making it the cursor.
    pub fn escalate(&mut self, id: NodeId) {
        self.stack.push(id);
    }

    /// Closes the innermost open tag and returns it.
    ///
    /// When the closed tag is self-closable, one trailing line break is
    /// removed from its first child and, if another tag stays open, from
    /// that tag's first child. A line break between two self-closing tags
    /// separates them rather than being content.
    pub fn retrogress(&mut self) -> Option<NodeId> {
        let &top = self.stack.last()?;

        if self.doc.tag(top).is_some_and(|t| t.definition.self_closable) {
            self.chomp_first_child(top);
            if self.stack.len() >= 2 {
                let below = self.stack[self.stack.len() - 2];
                self.chomp_first_child(below);
            }
        }

        self.stack.pop()
    }

    fn chomp_first_child(&mut self, id: NodeId) {
        if let Some(&first) = self.doc.children(id).first()
            && let Some(text) = self.doc.text_mut(first)
        {
            text.chomp();
        }
    }

    /// Stores `node` as the last child of the cursor and returns its id.
    ///
    /// Does not touch the stack. A node the cursor cannot hold goes to the
    /// root sequence.
    pub fn build_up_new_tag(&mut self, node: Node) -> NodeId {
        let id = self.doc.alloc(node);
        let attached = self
            .stack
            .last()
            .is_some_and(|&parent| self.doc.append_child(parent, id));
        if !attached {
            self.doc.push_root(id);
        }
        id
    }

    /// Returns the cursor, or `None` at the root.
    #[inline]
    pub fn current_node(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    /// Returns the innermost open tag.
    pub fn current_tag(&self) -> Option<&TagNode> {
        self.current_node().and_then(|id| self.doc.tag(id))
    }

    pub fn current_tag_mut(&mut self) -> Option<&mut TagNode> {
        self.current_node().and_then(|id| self.doc.tag_mut(id))
    }

    /// Returns true if any tag is open.
    #[inline]
    pub fn within_open_tag(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Returns the tag an incoming token would be placed in.
    ///
    /// This is the nearest open ancestor of the next node, i.e. the cursor.
    pub fn parent_tag(&self) -> Option<&TagNode> {
        self.current_tag()
    }

    /// Returns true if the parent tag restricts its child tags.
    pub fn parent_has_constraints_on_children(&self) -> bool {
        self.parent_tag()
            .is_some_and(|t| t.definition.has_child_restriction())
    }

    /// Returns the open tags, outermost first.
    #[inline]
    pub fn open_tags(&self) -> &[NodeId] {
        &self.stack
    }

    /// Returns the number of nodes at depth 0.
    #[inline]
    pub fn root_len(&self) -> usize {
        self.doc.roots().len()
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bbsift_ast::TextNode;
    use bbsift_dictionary::TagDefinition;
    use pretty_assertions::assert_eq;

    use super::*;

    fn tag(name: &str, self_closable: bool) -> Node {
        let definition = TagDefinition {
            self_closable,
            ..Default::default()
        };
        Node::Tag(TagNode::new(name, Arc::new(definition)))
    }

    fn open(tree: &mut BbTree, node: Node) -> NodeId {
        let id = tree.build_up_new_tag(node);
        tree.escalate(id);
        id
    }

    fn text_of(tree: &BbTree, id: NodeId) -> &str {
        &tree.document().text(id).unwrap().text
    }

    #[test]
    fn test_initial_state() {
        let tree = BbTree::new();
        assert!(!tree.within_open_tag());
        assert!(tree.current_node().is_none());
        assert!(tree.parent_tag().is_none());
        assert_eq!(tree.root_len(), 0);
    }

    #[test]
    fn test_escalate_and_retrogress() {
        let mut tree = BbTree::new();
        let b = open(&mut tree, tag("b", false));
        let i = open(&mut tree, tag("i", false));

        assert_eq!(tree.open_tags(), &[b, i]);
        assert_eq!(tree.current_tag().unwrap().name, "i");

        assert_eq!(tree.retrogress(), Some(i));
        assert_eq!(tree.current_node(), Some(b));
        assert_eq!(tree.retrogress(), Some(b));
        assert!(!tree.within_open_tag());
        assert_eq!(tree.retrogress(), None);

        let doc = tree.into_document();
        assert_eq!(doc.roots(), &[b]);
        assert_eq!(doc.children(b), &[i]);
    }

    #[test]
    fn test_build_up_appends_to_cursor() {
        let mut tree = BbTree::new();
        let root_text = tree.build_up_new_tag(Node::Text(TextNode::new("a")));
        let b = open(&mut tree, tag("b", false));
        let inner = tree.build_up_new_tag(Node::Text(TextNode::new("b")));

        assert_eq!(tree.document().roots(), &[root_text, b]);
        assert_eq!(tree.document().children(b), &[inner]);
        assert_eq!(tree.open_tags(), &[b]);
    }

    #[test]
    fn test_build_up_under_text_cursor_goes_to_root() {
        let mut tree = BbTree::new();
        let text = open(&mut tree, Node::Text(TextNode::new("a")));
        let next = tree.build_up_new_tag(Node::Text(TextNode::new("b")));

        assert_eq!(tree.document().roots(), &[text, next]);
        assert!(tree.current_tag().is_none());
    }

    #[test]
    fn test_retrogress_self_closable_chomps() {
        let mut tree = BbTree::new();
        let list = open(&mut tree, tag("list", false));
        let separator = tree.build_up_new_tag(Node::Text(TextNode::new("\n")));
        open(&mut tree, tag("*", true));
        let item = tree.build_up_new_tag(Node::Text(TextNode::new("one\r\n")));

        tree.retrogress();

        assert_eq!(text_of(&tree, item), "one");
        assert_eq!(text_of(&tree, separator), "");
        assert_eq!(tree.current_node(), Some(list));
    }

    #[test]
    fn test_retrogress_plain_tag_keeps_newlines() {
        let mut tree = BbTree::new();
        open(&mut tree, tag("b", false));
        let text = tree.build_up_new_tag(Node::Text(TextNode::new("bold\n")));

        tree.retrogress();

        assert_eq!(text_of(&tree, text), "bold\n");
    }

    #[test]
    fn test_retrogress_self_closable_at_root_level() {
        let mut tree = BbTree::new();
        let before = tree.build_up_new_tag(Node::Text(TextNode::new("x\n")));
        open(&mut tree, tag("hr", true));

        tree.retrogress();

        assert_eq!(text_of(&tree, before), "x\n");
        assert!(!tree.within_open_tag());
    }

    #[test]
    fn test_parent_constraints() {
        let mut tree = BbTree::new();
        let definition = TagDefinition {
            only_allow: Some(vec!["*".to_string()]),
            ..Default::default()
        };
        open(&mut tree, Node::Tag(TagNode::new("list", Arc::new(definition))));
        assert!(tree.parent_has_constraints_on_children());

        open(&mut tree, tag("b", false));
        assert!(!tree.parent_has_constraints_on_children());
    }
}
