//! Token classification against the tag dictionary.

use std::sync::{Arc, LazyLock};

use bbsift_ast::Params;
use bbsift_dictionary::{TagDefinition, TagDictionary};
use regex::Regex;

use crate::tokenizer::{Token, TokenKind};

/// `key=value`, `key="value"`, `key='value'` or `key=&quot;value&quot;`.
static NAMED_PARAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)=(?:"([^"]*)"|'([^']*)'|&quot;(.*?)&quot;|([^\s"']+))"#)
        .expect("Invalid named parameter regex")
});

/// A classified token.
///
/// Tags missing from the dictionary are classified as text before any
/// validation runs, so every tag-kind `TagInfo` carries a definition.
#[derive(Debug, Clone)]
pub struct TagInfo {
    /// Token kind after classification.
    pub kind: TokenKind,

    /// Lower-cased tag name; empty for text.
    pub name: String,

    /// Parameters parsed from the opening tag.
    pub params: Params,

    /// Definition of the tag; `None` for text.
    pub definition: Option<Arc<TagDefinition>>,

    /// The quick parameter value that failed the tag's format.
    pub invalid_quick_param: Option<String>,

    /// The closing tag matched no open tag.
    pub wrong_closing: bool,

    /// Literal text of the token.
    pub text: String,
}

impl TagInfo {
    /// Classifies a raw token.
    pub fn classify(token: &Token<'_>, dictionary: &TagDictionary) -> Self {
        let mut info = Self {
            kind: token.kind,
            name: String::new(),
            params: Params::new(),
            definition: None,
            invalid_quick_param: None,
            wrong_closing: false,
            text: token.raw.to_string(),
        };

        let Some(name) = token.name else {
            return info;
        };
        let name = name.to_lowercase();
        let Some(definition) = dictionary.lookup(&name) else {
            return info.handle_tag_as_text();
        };

        if token.kind == TokenKind::OpeningTag {
            info.parse_params(token.params, definition);
        }
        info.name = name;
        info.definition = Some(Arc::clone(definition));
        info
    }

    /// Reinterprets the token as literal text.
    pub fn handle_tag_as_text(mut self) -> Self {
        self.kind = TokenKind::Text;
        self.name.clear();
        self.params = Params::new();
        self.definition = None;
        self.invalid_quick_param = None;
        self
    }

    /// Flags a closing tag that matches no open tag.
    pub fn mark_wrong_closing(&mut self) {
        self.wrong_closing = true;
    }

    #[inline]
    pub fn is_opening_tag(&self) -> bool {
        self.kind == TokenKind::OpeningTag
    }

    #[inline]
    pub fn is_closing_tag(&self) -> bool {
        self.kind == TokenKind::ClosingTag
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }

    /// Returns true for opening and closing tags.
    #[inline]
    pub fn is_tag(&self) -> bool {
        !self.is_text()
    }

    /// Returns true if the parameter list was empty or entirely ignored.
    pub fn params_not_set(&self) -> bool {
        self.params.is_empty()
    }

    fn parse_params(&mut self, raw: &str, definition: &TagDefinition) {
        if let Some(value) = raw.strip_prefix('=') {
            if definition.allow_quick_param {
                self.parse_quick_param(unquote(value.trim()), definition);
            }
            return;
        }

        for captures in NAMED_PARAM_REGEX.captures_iter(raw) {
            let value = (2..=5).find_map(|i| captures.get(i)).map_or("", |m| m.as_str());
            self.params.insert(captures[1].to_lowercase(), value);
        }
    }

    fn parse_quick_param(&mut self, value: &str, definition: &TagDefinition) {
        let Some(values) = definition.quick_param_values(value) else {
            self.invalid_quick_param = Some(value.to_string());
            return;
        };
        let Some(tokens) = &definition.param_tokens else {
            return;
        };
        for (token, value) in tokens.iter().zip(values) {
            if let Some(value) = value {
                self.params.insert(token.token.clone(), value);
            }
        }
    }
}

/// Strips one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ["&quot;", "\"", "'"] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
