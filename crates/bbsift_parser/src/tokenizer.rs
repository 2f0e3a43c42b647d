//! Lexical layer: splits markup into tag-shaped and text tokens.

use std::borrow::Cow;
use std::iter::Peekable;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

/// One pattern for every token shape.
///
/// Groups: 1 closing name, 2 opening name, 3 opening parameters.
/// A `[` that starts no tag matches the last alternative on its own.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[/(\*|\w+)\]|\[(\*|\w+)((?:=|\s)[^\[\]]*)?\]|[^\[]+|\[")
        .expect("Invalid token regex")
});

/// Shape of a raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `[name]`, `[name=value]` or `[name key=value ...]`.
    OpeningTag,
    /// `[/name]`.
    ClosingTag,
    /// Anything else.
    Text,
}

/// A raw token borrowed from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t> {
    /// Token shape.
    pub kind: TokenKind,
    /// The complete token text, brackets included.
    pub raw: &'t str,
    /// Tag name as written (tags only).
    pub name: Option<&'t str>,
    /// Everything between the tag name and `]`, e.g. `=red` (opening tags only).
    pub params: &'t str,
    /// Byte range in the tokenized text.
    pub span: Range<usize>,
}

/// Replaces `<`, `>` and `"` with their HTML entities.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Splits `text` into tokens lazily.
///
/// Every call starts a fresh scan from the beginning of `text`.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        matches: TOKEN_REGEX.captures_iter(text).peekable(),
    }
}

/// Iterator over the tokens of a text.
///
/// Adjacent text matches (a stray `[` followed by ordinary text) are merged,
/// so text tokens are always maximal and never empty.
pub struct Tokens<'t> {
    text: &'t str,
    matches: Peekable<CaptureMatches<'static, 't>>,
}

impl<'t> Iterator for Tokens<'t> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.matches.next()?;
        let whole = captures.get(0)?;

        if let Some(name) = captures.get(1) {
            return Some(Token {
                kind: TokenKind::ClosingTag,
                raw: whole.as_str(),
                name: Some(name.as_str()),
                params: "",
                span: whole.range(),
            });
        }

        if let Some(name) = captures.get(2) {
            return Some(Token {
                kind: TokenKind::OpeningTag,
                raw: whole.as_str(),
                name: Some(name.as_str()),
                params: captures.get(3).map_or("", |m| m.as_str()),
                span: whole.range(),
            });
        }

        let mut span = whole.range();
        while let Some(next) = self.matches.peek() {
            if next.get(1).is_some() || next.get(2).is_some() {
                break;
            }
            if let Some(m) = next.get(0) {
                span.end = m.end();
            }
            self.matches.next();
        }

        Some(Token {
            kind: TokenKind::Text,
            raw: &self.text[span.clone()],
            name: None,
            params: "",
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn raws(text: &str) -> Vec<&str> {
        tokenize(text).map(|t| t.raw).collect()
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tag() {
        assert_eq!(raws("[b]bold[/b]"), vec!["[b]", "bold", "[/b]"]);
        assert_eq!(
            kinds("[b]bold[/b]"),
            vec![TokenKind::OpeningTag, TokenKind::Text, TokenKind::ClosingTag]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").next().is_none());
    }

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(raws("just some text\nwith lines"), vec!["just some text\nwith lines"]);
    }

    #[rstest]
    #[case::quick_param("[size=32]", "size", "=32")]
    #[case::named_params("[img width=10 height=20]", "img", " width=10 height=20")]
    #[case::bare_word("[b foo]", "b", " foo")]
    #[case::star("[*]", "*", "")]
    #[case::upper_case("[URL=http://x.org]", "URL", "=http://x.org")]
    fn test_opening_tag_parts(#[case] text: &str, #[case] name: &str, #[case] params: &str) {
        let token = tokenize(text).next().unwrap();
        assert_eq!(token.kind, TokenKind::OpeningTag);
        assert_eq!(token.name, Some(name));
        assert_eq!(token.params, params);
        assert_eq!(token.span, 0..text.len());
    }

    #[test]
    fn test_closing_tag() {
        let token = tokenize("[/LIST]").next().unwrap();
        assert_eq!(token.kind, TokenKind::ClosingTag);
        assert_eq!(token.name, Some("LIST"));
    }

    #[rstest]
    #[case::lone_bracket("a [ b", vec!["a [ b"])]
    #[case::unterminated("[b", vec!["[b"])]
    #[case::nested_bracket("[b[i]x", vec!["[b", "[i]", "x"])]
    #[case::dash_after_name("[b-x]", vec!["[b-x]"])]
    #[case::closer_with_params("[/b x]", vec!["[/b x]"])]
    #[case::empty_brackets("[]", vec!["[]"])]
    fn test_stray_brackets_stay_text(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(raws(text), expected);
    }

    #[test]
    fn test_stray_bracket_kinds() {
        assert_eq!(
            kinds("[b[i]x"),
            vec![TokenKind::Text, TokenKind::OpeningTag, TokenKind::Text]
        );
    }

    #[test]
    fn test_tokens_cover_input() {
        let text = "x [b]y[/b] [ [url=a]z[/url] [";
        let joined: String = raws(text).concat();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_no_empty_tokens() {
        for token in tokenize("[b][/b][i][[[/i]") {
            assert!(!token.raw.is_empty());
        }
    }

    #[test]
    fn test_spans_slice_source() {
        let text = "ab[i]cd[/i]";
        for token in tokenize(text) {
            assert_eq!(&text[token.span.clone()], token.raw);
        }
    }

    #[test]
    fn test_restartable() {
        let text = "[b]x[/b]";
        assert_eq!(tokenize(text).count(), 3);
        assert_eq!(tokenize(text).count(), 3);
    }

    #[rstest]
    #[case::no_change("plain", "plain")]
    #[case::tags("<b>", "&lt;b&gt;")]
    #[case::quotes(r#"say "hi""#, "say &quot;hi&quot;")]
    #[case::ampersand_untouched("a & b", "a & b")]
    fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_html(input), expected);
    }

    #[test]
    fn test_escape_html_borrows_when_clean() {
        assert!(matches!(escape_html("clean"), Cow::Borrowed(_)));
    }
}
