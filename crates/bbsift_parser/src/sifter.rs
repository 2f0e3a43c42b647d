//! Parse driver.

use std::sync::Arc;

use bbsift_ast::{Document, Node, NodeId, TagNode, TextNode};
use bbsift_dictionary::{TagDefinition, TagDictionary};
use tracing::{debug, trace, warn};

use crate::messages::{self, Offending};
use crate::tag_info::TagInfo;
use crate::tokenizer::tokenize;
use crate::transition::{self, Action, Transition};
use crate::tree::BbTree;

/// Maximum number of root nodes before the depth guard trips.
pub const MAX_ROOT_NODES: usize = 2200;

/// Consumes a token stream and builds a validated [`Document`].
///
/// Each token is classified, validated against the current tree state and
/// then applied through a [`Transition`]. Validation failures are recorded
/// and never stop the parse.
pub struct TagSifter<'d> {
    dictionary: &'d TagDictionary,
    tree: BbTree,
    /// Errors found for the current token before its node exists.
    pending: Vec<usize>,
}

impl<'d> TagSifter<'d> {
    pub fn new(dictionary: &'d TagDictionary) -> Self {
        Self {
            dictionary,
            tree: BbTree::new(),
            pending: Vec::new(),
        }
    }

    /// Parses `text`, which must already be escaped if escaping is wanted.
    pub fn sift(mut self, text: &str) -> Document {
        debug!("Parsing {} bytes", text.len());
        let mut token_count = 0usize;

        for token in tokenize(text) {
            token_count += 1;
            let mut info = TagInfo::classify(&token, self.dictionary);
            trace!(kind = ?info.kind, tag = %info.name, span = ?token.span, "token");

            self.validate(&mut info);
            let plan = transition::plan(self.tree.current_tag(), &info);
            let node = self.apply(plan, info);
            self.flush_pending(node);
        }

        self.finish();

        let doc = self.tree.into_document();
        debug!(
            tokens = token_count,
            nodes = doc.len(),
            errors = doc.error_log().len(),
            "Parse finished"
        );
        doc
    }

    fn error(&mut self, message: impl Into<String>) {
        let index = self.tree.document_mut().record_error(message, None);
        self.pending.push(index);
    }

    fn error_on(&mut self, message: impl Into<String>, node: NodeId) {
        self.tree.document_mut().record_error(message, Some(node));
    }

    /// Attaches the current token's errors to the node built for it, or to
    /// the cursor when the token produced no node.
    fn flush_pending(&mut self, node: Option<NodeId>) {
        let target = node.or_else(|| self.tree.current_node());
        let pending = std::mem::take(&mut self.pending);
        if let Some(target) = target {
            for index in pending {
                self.tree.document_mut().attach_error(index, target);
            }
        }
    }

    fn validate(&mut self, info: &mut TagInfo) {
        if (info.is_text() || info.is_opening_tag())
            && (!self.valid_opening_tag(info) || !self.valid_constraints_on_child(info))
        {
            return;
        }
        if !self.valid_closing_tag(info) {
            return;
        }
        self.valid_param_supplied_as_text(info);
    }

    fn valid_opening_tag(&mut self, info: &TagInfo) -> bool {
        if !info.is_opening_tag() {
            return true;
        }
        let Some(definition) = info.definition.clone() else {
            return true;
        };

        if let Some(allowed) = &definition.only_in {
            let parent = self.tree.parent_tag().map(|p| p.name.clone());
            let misplaced = parent.as_deref().is_none_or(|p| !definition.allowed_in(p));
            if misplaced
                && !transition::reaches_self_closing_sibling(self.tree.current_tag(), &info.name)
            {
                self.error(messages::only_in(&info.name, allowed, parent.as_deref()));
                return false;
            }
        }

        if let Some(value) = &info.invalid_quick_param {
            self.error(definition.quick_param_error(value));
            return false;
        }

        self.check_params(info, &definition);
        true
    }

    /// Reports missing required and undeclared parameters.
    ///
    /// Skipped when the tag declares no parameters, or when it will take its
    /// between-text as parameter instead.
    fn check_params(&mut self, info: &TagInfo, definition: &TagDefinition) {
        let Some(tokens) = &definition.param_tokens else {
            return;
        };
        if definition.allow_between_as_param && info.params_not_set() {
            return;
        }

        for token in tokens.iter().filter(|t| !t.optional) {
            if !info.params.contains_key(&token.token) {
                self.error(messages::missing_param(&info.name, &token.token));
            }
        }
        for key in info.params.keys() {
            if definition.param_token(key).is_none() {
                self.error(messages::unknown_param(&info.name, key));
            }
        }
    }

    fn valid_constraints_on_child(&mut self, info: &TagInfo) -> bool {
        if !self.tree.parent_has_constraints_on_children() {
            return true;
        }
        let Some(parent) = self.tree.parent_tag() else {
            return true;
        };
        let definition = &parent.definition;

        let offending = if info.is_tag() {
            (!definition.allows_child(&info.name)).then(|| Offending::Tag(&info.name))
        } else {
            (!definition.require_between && !info.text.trim_start().is_empty())
                .then(|| Offending::Text(&info.text))
        };

        match offending {
            Some(offending) => {
                let allowed = definition.only_allow.clone().unwrap_or_default();
                let message = messages::only_allow(&parent.name, &allowed, offending);
                self.error(message);
                false
            }
            None => true,
        }
    }

    fn valid_closing_tag(&mut self, info: &mut TagInfo) -> bool {
        if !info.is_closing_tag() {
            return true;
        }
        let Some(closer) = info.definition.clone() else {
            return true;
        };

        let Some(parent) = self.tree.parent_tag() else {
            self.error(messages::unmatched_closer(&info.name));
            info.mark_wrong_closing();
            return false;
        };

        // A closer that implicitly ends a self-closing item is matched against
        // the tag below it.
        let auto_close = transition::closes_self_closing(Some(parent), &closer);
        let target = if auto_close {
            let open = self.tree.open_tags();
            open.len().checked_sub(2).map(|i| open[i])
        } else {
            self.tree.current_node()
        };
        let Some(target) = target else {
            self.error(messages::unmatched_closer(&info.name));
            info.mark_wrong_closing();
            return false;
        };
        let Some(closing) = self.tree.document().tag(target) else {
            return true;
        };

        if closing.name != info.name
            && !transition::closes_multi_tag(closing, &info.name, &closer)
        {
            let message = messages::mismatched_closer(&info.name, &closing.name);
            self.error(message);
            info.mark_wrong_closing();
            return false;
        }

        // An invalid quick parameter already reported the missing content.
        if closing.definition.require_between
            && !closing.invalid_quick_param
            && closing.between.is_none()
            && closing.children.is_empty()
        {
            let message = messages::no_text_between(&info.name, closing.is_pending());
            self.error_on(message, target);
            return false;
        }
        true
    }

    fn valid_param_supplied_as_text(&mut self, info: &TagInfo) -> bool {
        let Some(cursor) = self.tree.current_tag() else {
            return true;
        };
        if !cursor.takes_between_as_param() {
            return true;
        }

        if info.is_opening_tag() && cursor.children.is_empty() && cursor.between.is_none() {
            self.error(messages::BETWEEN_NOT_PLAIN_TEXT);
            return false;
        }

        let definition = &cursor.definition;
        if info.is_text()
            && definition.require_between
            && definition.quick_param_format.is_some()
        {
            let between = definition.extract_url_id(&info.text);
            if !definition.matches_quick_param_format(&between) {
                let message = definition.quick_param_error(&between);
                self.error(message);
                return false;
            }
        }
        true
    }

    /// Executes a planned transition and returns the node built for the token.
    fn apply(&mut self, plan: Transition, info: TagInfo) -> Option<NodeId> {
        if plan.auto_close {
            self.tree.retrogress();
        }

        match plan.action {
            Action::Open => Some(self.open_tag(info)),
            Action::Text => self.text(info),
            Action::Close => {
                self.tree.retrogress();
                None
            }
            Action::CloserAsText => {
                let info = info.handle_tag_as_text();
                Some(self.create_text_element(info.text))
            }
        }
    }

    fn open_tag(&mut self, info: TagInfo) -> NodeId {
        let definition = info.definition.unwrap_or_default();
        let mut params = info.params;
        if !definition.url_matches.is_empty() {
            for value in params.values_mut() {
                *value = definition.extract_url_id(value);
            }
        }

        let mut node = TagNode::new(info.name, definition).with_params(params);
        node.invalid_quick_param = info.invalid_quick_param.is_some();

        let id = self.tree.build_up_new_tag(Node::Tag(node));
        self.tree.escalate(id);
        id
    }

    fn text(&mut self, info: TagInfo) -> Option<NodeId> {
        if self.tree.current_tag().is_some_and(TagNode::is_pending) {
            self.set_multi_tag_to_actual_tag(&info.text);
        }

        let Some(cursor) = self.tree.current_tag_mut() else {
            return Some(self.create_text_element(info.text));
        };
        let definition = Arc::clone(&cursor.definition);
        if !definition.require_between {
            return Some(self.create_text_element(info.text));
        }

        // The quick parameter error already covers this content.
        if cursor.invalid_quick_param {
            cursor.between = None;
            return None;
        }

        let between = definition.extract_url_id(&info.text);
        if !cursor.takes_between_as_param() {
            cursor.between = Some(between);
            return None;
        }

        match definition.quick_param_values(&between) {
            Some(values) => {
                if let Some(tokens) = &definition.param_tokens {
                    for (token, value) in tokens.iter().zip(values) {
                        if let Some(value) = value {
                            cursor.params.insert(token.token.clone(), value);
                        }
                    }
                }
                cursor.between = Some(between);
                None
            }
            None => {
                cursor.between = None;
                Some(self.create_text_element(info.text))
            }
        }
    }

    fn create_text_element(&mut self, text: String) -> NodeId {
        self.tree.build_up_new_tag(Node::Text(TextNode::new(text)))
    }

    /// Replaces a pending multi-tag cursor with the first supported tag whose
    /// URL patterns match `text`.
    fn set_multi_tag_to_actual_tag(&mut self, text: &str) {
        let Some(id) = self.tree.current_node() else {
            return;
        };
        let Some(placeholder) = self.tree.document().tag(id) else {
            return;
        };

        let resolved = placeholder
            .definition
            .supported_tags
            .iter()
            .find_map(|name| {
                self.dictionary
                    .lookup(name)
                    .filter(|d| d.matches_url(text))
                    .map(|d| (name.clone(), Arc::clone(d)))
            });
        let name = placeholder.name.clone();

        match resolved {
            Some((tag, definition)) => {
                debug!("Resolved multi-tag [{}] to [{}]", name, tag);
                if let Some(node) = self.tree.document_mut().tag_mut(id) {
                    node.resolve(tag, definition);
                }
            }
            None => {
                warn!("Unknown multi-tag type for [{}]", name);
                self.error_on(messages::unknown_multi_tag(&name), id);
                if let Some(node) = self.tree.document_mut().tag_mut(id) {
                    node.mark_unresolved();
                }
            }
        }
    }

    /// Reports tags left open and applies the depth guard.
    fn finish(&mut self) {
        let open = self.tree.open_tags().to_vec();
        for id in open {
            let doc = self.tree.document_mut();
            let Some(tag) = doc.tag_mut(id) else {
                continue;
            };
            tag.closed = false;
            let message = messages::not_closed(&tag.name);
            doc.record_error(message, Some(id));
        }

        let roots = self.tree.root_len();
        if roots > MAX_ROOT_NODES {
            warn!(roots, limit = MAX_ROOT_NODES, "Depth guard tripped");
            self.tree.document_mut().record_error(messages::TOO_DEEP, None);
        }
    }
}
