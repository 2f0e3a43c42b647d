//! Tag definition records.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::DictionaryError;

/// Placeholder replaced by the offending value in format error templates.
const PARAM_PLACEHOLDER: &str = "%param%";

const DEFAULT_FORMAT_DESCRIPTION: &str = "The parameter '%param%' has an invalid format";

/// A named parameter a tag accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamToken {
    /// Parameter name, as written in `[tag name=value]`.
    pub token: String,

    /// Whether the parameter may be omitted.
    #[serde(default)]
    pub optional: bool,
}

impl ParamToken {
    /// Creates a required parameter token.
    pub fn required(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            optional: false,
        }
    }
}

/// Grammar rules for a single tag.
///
/// Definitions are configuration data: every behavior the parser applies to a
/// tag (nesting, parameters, self-closing, multi-tag resolution) is read from
/// these fields rather than coded per tag name.
#[derive(Debug, Clone, Default)]
pub struct TagDefinition {
    /// Human readable description.
    pub description: Option<String>,

    /// Usage example.
    pub example: Option<String>,

    /// Tags this tag may appear in. `None` allows any parent, including the root.
    pub only_in: Option<Vec<String>>,

    /// Tags this tag may contain. `None` allows any child.
    pub only_allow: Option<Vec<String>>,

    /// The tag closes implicitly when a sibling of the same type or its parent's
    /// closer arrives.
    pub self_closable: bool,

    /// The tag must contain text between its opening and closing tag.
    pub require_between: bool,

    /// `[tag=value]` shorthand is accepted.
    pub allow_quick_param: bool,

    /// The between-text may stand in for the first parameter.
    pub allow_between_as_param: bool,

    /// Pattern a quick parameter must match. Capture groups feed
    /// [`Self::param_tokens`] in order.
    pub quick_param_format: Option<Regex>,

    /// Error template for a value that fails [`Self::quick_param_format`].
    pub quick_param_format_description: Option<String>,

    /// Declared parameters. `None` disables named-parameter validation.
    pub param_tokens: Option<Vec<ParamToken>>,

    /// The tag is a placeholder resolved to one of [`Self::supported_tags`].
    pub multi_tag: bool,

    /// Concrete tags a multi-tag placeholder can resolve to.
    pub supported_tags: Vec<String>,

    /// Patterns whose first capture group extracts an id from a URL.
    pub url_matches: Vec<Regex>,
}

impl TagDefinition {
    /// Returns true if this tag may be placed inside `parent`.
    pub fn allowed_in(&self, parent: &str) -> bool {
        self.only_in
            .as_ref()
            .is_none_or(|parents| parents.iter().any(|p| p == parent))
    }

    /// Returns true if this tag restricts its child tags.
    pub fn has_child_restriction(&self) -> bool {
        self.only_allow.is_some()
    }

    /// Returns true if `child` may be placed directly inside this tag.
    pub fn allows_child(&self, child: &str) -> bool {
        self.only_allow
            .as_ref()
            .is_none_or(|children| children.iter().any(|c| c == child))
    }

    /// Returns true if `child` is explicitly listed in `only_allow`.
    ///
    /// Unlike [`Self::allows_child`], an unrestricted tag lists nothing.
    pub fn lists_child(&self, child: &str) -> bool {
        self.only_allow
            .as_ref()
            .is_some_and(|children| children.iter().any(|c| c == child))
    }

    /// Returns true if `tag` is one of the concrete tags of a multi-tag.
    pub fn supports(&self, tag: &str) -> bool {
        self.supported_tags.iter().any(|t| t == tag)
    }

    /// Looks up a declared parameter by name.
    pub fn param_token(&self, name: &str) -> Option<&ParamToken> {
        self.param_tokens
            .as_ref()
            .and_then(|tokens| tokens.iter().find(|t| t.token == name))
    }

    /// Matches a quick parameter against [`Self::quick_param_format`].
    ///
    /// Returns the values to assign to the declared parameters, in order, or
    /// `None` when the value does not match. Without capture groups the whole
    /// match is the single value. A definition without a format accepts any
    /// value as is.
    pub fn quick_param_values(&self, value: &str) -> Option<Vec<Option<String>>> {
        let Some(format) = &self.quick_param_format else {
            return Some(vec![Some(value.to_string())]);
        };
        let captures = format.captures(value)?;
        if captures.len() == 1 {
            return Some(vec![captures.get(0).map(|m| m.as_str().to_string())]);
        }
        Some(
            captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Returns true if `value` satisfies the quick parameter format.
    pub fn matches_quick_param_format(&self, value: &str) -> bool {
        self.quick_param_format
            .as_ref()
            .is_none_or(|format| format.is_match(value))
    }

    /// Renders the format error template for `value`.
    pub fn quick_param_error(&self, value: &str) -> String {
        self.quick_param_format_description
            .as_deref()
            .unwrap_or(DEFAULT_FORMAT_DESCRIPTION)
            .replace(PARAM_PLACEHOLDER, value)
    }

    /// Extracts an id from `url` using the first matching URL pattern.
    ///
    /// Falls back to `url` itself when no pattern matches or the matching
    /// pattern has no capture group.
    pub fn extract_url_id(&self, url: &str) -> String {
        self.url_matches
            .iter()
            .find_map(|pattern| pattern.captures(url))
            .and_then(|captures| captures.get(1))
            .map_or_else(|| url.to_string(), |id| id.as_str().to_string())
    }

    /// Returns true if any URL pattern of this definition matches `text`.
    pub fn matches_url(&self, text: &str) -> bool {
        self.url_matches.iter().any(|pattern| pattern.is_match(text))
    }
}

/// Serialized form of a [`TagDefinition`], with patterns as source strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawTagDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_allow: Option<Vec<String>>,
    #[serde(default)]
    pub self_closable: bool,
    #[serde(default)]
    pub require_between: bool,
    #[serde(default)]
    pub allow_quick_param: bool,
    #[serde(default)]
    pub allow_between_as_param: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_param_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_param_format_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_tokens: Option<Vec<ParamToken>>,
    #[serde(default)]
    pub multi_tag: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url_matches: Vec<String>,
}

impl RawTagDefinition {
    /// Compiles patterns and normalizes tag names to lower case.
    pub(crate) fn compile(self, tag: &str) -> Result<TagDefinition, DictionaryError> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| DictionaryError::invalid_pattern(tag, pattern, e.to_string()))
        };

        let quick_param_format = self.quick_param_format.as_deref().map(compile).transpose()?;
        let url_matches = self
            .url_matches
            .iter()
            .map(|pattern| compile(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TagDefinition {
            description: self.description,
            example: self.example,
            only_in: self.only_in.map(lowercase_all),
            only_allow: self.only_allow.map(lowercase_all),
            self_closable: self.self_closable,
            require_between: self.require_between,
            allow_quick_param: self.allow_quick_param,
            allow_between_as_param: self.allow_between_as_param,
            quick_param_format,
            quick_param_format_description: self.quick_param_format_description,
            param_tokens: self.param_tokens,
            multi_tag: self.multi_tag,
            supported_tags: lowercase_all(self.supported_tags),
            url_matches,
        })
    }
}

fn lowercase_all(names: Vec<String>) -> Vec<String> {
    names.into_iter().map(|n| n.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn size_definition() -> TagDefinition {
        TagDefinition {
            allow_quick_param: true,
            quick_param_format: Some(Regex::new(r"^(\d+)$").unwrap()),
            quick_param_format_description: Some(
                "The size parameter '%param%' is incorrect".to_string(),
            ),
            param_tokens: Some(vec![ParamToken::required("size")]),
            ..Default::default()
        }
    }

    #[test]
    fn test_allowed_in_without_restriction() {
        let def = TagDefinition::default();
        assert!(def.allowed_in("anything"));
    }

    #[test]
    fn test_allowed_in_with_restriction() {
        let def = TagDefinition {
            only_in: Some(vec!["list".to_string()]),
            ..Default::default()
        };
        assert!(def.allowed_in("list"));
        assert!(!def.allowed_in("b"));
    }

    #[test]
    fn test_allows_child_and_lists_child() {
        let unrestricted = TagDefinition::default();
        assert!(unrestricted.allows_child("b"));
        assert!(!unrestricted.lists_child("b"));

        let list = TagDefinition {
            only_allow: Some(vec!["*".to_string()]),
            ..Default::default()
        };
        assert!(list.allows_child("*"));
        assert!(list.lists_child("*"));
        assert!(!list.allows_child("b"));
    }

    #[test]
    fn test_quick_param_values_with_groups() {
        let def = TagDefinition {
            quick_param_format: Some(Regex::new(r"^(\d+)x(\d+)$").unwrap()),
            ..Default::default()
        };
        assert_eq!(
            def.quick_param_values("640x480"),
            Some(vec![Some("640".to_string()), Some("480".to_string())])
        );
        assert_eq!(def.quick_param_values("640"), None);
    }

    #[test]
    fn test_quick_param_values_without_groups() {
        let def = TagDefinition {
            quick_param_format: Some(Regex::new(r"^\w+$").unwrap()),
            ..Default::default()
        };
        assert_eq!(
            def.quick_param_values("red"),
            Some(vec![Some("red".to_string())])
        );
    }

    #[test]
    fn test_quick_param_values_without_format() {
        let def = TagDefinition::default();
        assert_eq!(
            def.quick_param_values("anything goes"),
            Some(vec![Some("anything goes".to_string())])
        );
    }

    #[test]
    fn test_quick_param_error_template() {
        let def = size_definition();
        assert_eq!(
            def.quick_param_error("big"),
            "The size parameter 'big' is incorrect"
        );
        assert_eq!(
            TagDefinition::default().quick_param_error("x"),
            "The parameter 'x' has an invalid format"
        );
    }

    #[test]
    fn test_extract_url_id() {
        let def = TagDefinition {
            url_matches: vec![
                Regex::new(r"youtube\.com.*[v]=([^&]*)").unwrap(),
                Regex::new(r"youtu\.be/([^&]*)").unwrap(),
            ],
            ..Default::default()
        };
        assert_eq!(
            def.extract_url_id("https://www.youtube.com/watch?v=E4Fbk52Mk1w&t=3"),
            "E4Fbk52Mk1w"
        );
        assert_eq!(def.extract_url_id("https://youtu.be/E4Fbk52Mk1w"), "E4Fbk52Mk1w");
        assert_eq!(def.extract_url_id("E4Fbk52Mk1w"), "E4Fbk52Mk1w");
    }

    #[test]
    fn test_extract_url_id_is_stable() {
        let def = TagDefinition {
            url_matches: vec![Regex::new(r"vimeo\.com/([^&]*)").unwrap()],
            ..Default::default()
        };
        let once = def.extract_url_id("http://vimeo.com/46141955");
        assert_eq!(def.extract_url_id(&once), once);
    }

    #[test]
    fn test_param_token_lookup() {
        let def = size_definition();
        assert_eq!(def.param_token("size"), Some(&ParamToken::required("size")));
        assert!(def.param_token("color").is_none());
    }

    #[test]
    fn test_compile_lowercases_references() {
        let raw = RawTagDefinition {
            only_in: Some(vec!["LIST".to_string()]),
            supported_tags: vec!["YouTube".to_string()],
            ..Default::default()
        };
        let def = raw.compile("item").unwrap();
        assert_eq!(def.only_in, Some(vec!["list".to_string()]));
        assert_eq!(def.supported_tags, vec!["youtube".to_string()]);
    }

    #[test]
    fn test_compile_rejects_bad_pattern() {
        let raw = RawTagDefinition {
            quick_param_format: Some("(unclosed".to_string()),
            ..Default::default()
        };
        let err = raw.compile("size").unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidPattern { ref tag, .. } if tag == "size"));
    }
}
