//! Pure transition planning for the open-tag stack.
//!
//! [`plan`] decides what a classified token does to the tree given only the
//! cursor tag. The driver executes the plan; nothing here mutates state, so
//! every implicit-close rule can be tested as a table entry.

use bbsift_ast::{TagIdentity, TagNode};
use bbsift_dictionary::TagDefinition;

use crate::tag_info::TagInfo;
use crate::tokenizer::TokenKind;

/// Tree operation for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append a tag node to the cursor and push it.
    Open,
    /// Append text to the cursor, or store it as the cursor's between-text.
    Text,
    /// Pop the cursor.
    Close,
    /// Append the closing tag's literal text to the cursor.
    CloserAsText,
}

/// A planned transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Pop the self-closable cursor before running `action`.
    pub auto_close: bool,
    pub action: Action,
}

impl Transition {
    const fn new(action: Action) -> Self {
        Self {
            auto_close: false,
            action,
        }
    }

    const fn auto_closing(action: Action) -> Self {
        Self {
            auto_close: true,
            action,
        }
    }
}

/// Plans the transition for `token` with `cursor` as the innermost open tag.
pub fn plan(cursor: Option<&TagNode>, token: &TagInfo) -> Transition {
    match token.kind {
        TokenKind::Text => Transition::new(Action::Text),
        TokenKind::OpeningTag => {
            if reaches_self_closing_sibling(cursor, &token.name) {
                Transition::auto_closing(Action::Open)
            } else {
                Transition::new(Action::Open)
            }
        }
        TokenKind::ClosingTag if token.wrong_closing => Transition::new(Action::CloserAsText),
        TokenKind::ClosingTag => match &token.definition {
            Some(definition) if closes_self_closing(cursor, definition) => {
                Transition::auto_closing(Action::Close)
            }
            _ => Transition::new(Action::Close),
        },
    }
}

/// Returns true if opening `tag` implicitly closes a self-closable cursor of
/// the same tag, making the two siblings.
pub fn reaches_self_closing_sibling(cursor: Option<&TagNode>, tag: &str) -> bool {
    cursor.is_some_and(|c| c.definition.self_closable && c.name == tag)
}

/// Returns true if a closer with `closer` as definition implicitly closes a
/// self-closable cursor it declares as an allowed child.
pub fn closes_self_closing(cursor: Option<&TagNode>, closer: &TagDefinition) -> bool {
    cursor.is_some_and(|c| c.definition.self_closable && closer.lists_child(&c.name))
}

/// Returns true if closer `tag` legitimately ends a multi-tag `parent`
/// whose name differs from it.
pub fn closes_multi_tag(parent: &TagNode, tag: &str, closer: &TagDefinition) -> bool {
    matches!(&parent.identity, TagIdentity::Resolved { placeholder } if placeholder == tag)
        || closer.supports(&parent.name)
        || parent.definition.supports(tag)
}
