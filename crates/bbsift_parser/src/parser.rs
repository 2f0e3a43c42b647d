//! Public parsing entry points.

use bbsift_ast::Document;
use bbsift_dictionary::TagDictionary;

use crate::sifter::TagSifter;
use crate::tokenizer::escape_html;

/// Parse options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Escape `<`, `>` and `"` before tokenizing.
    pub escape_html: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { escape_html: true }
    }
}

/// Parser for bracket-tag markup.
///
/// Borrows the dictionary immutably; one dictionary may back any number of
/// parsers, on any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct BbcodeParser<'d> {
    dictionary: &'d TagDictionary,
    options: ParseOptions,
}

impl<'d> BbcodeParser<'d> {
    /// Creates a parser with default options.
    pub fn new(dictionary: &'d TagDictionary) -> Self {
        Self::with_options(dictionary, ParseOptions::default())
    }

    pub fn with_options(dictionary: &'d TagDictionary, options: ParseOptions) -> Self {
        Self {
            dictionary,
            options,
        }
    }

    /// Returns the parser name.
    pub fn name(&self) -> &'static str {
        "bbcode"
    }

    /// Returns the file extensions this parser handles.
    pub fn extensions(&self) -> &[&str] {
        &["bbcode", "bb"]
    }

    /// Returns true if this parser handles files with `extension`.
    pub fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Parses `text` into a document.
    ///
    /// Never fails: structural problems are recorded in the result.
    pub fn parse(&self, text: &str) -> ParseResult {
        let document = if self.options.escape_html {
            TagSifter::new(self.dictionary).sift(&escape_html(text))
        } else {
            TagSifter::new(self.dictionary).sift(text)
        };
        ParseResult { document }
    }
}

/// Outcome of one parse.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub document: Document,
}

impl ParseResult {
    /// Returns true if no error was recorded.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.document.is_valid()
    }

    /// Returns every error message in discovery order.
    pub fn errors(&self) -> Vec<&str> {
        self.document.errors().collect()
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Parses `text` with default options and returns its errors, if any.
pub fn validity_check(text: &str, dictionary: &TagDictionary) -> Result<(), Vec<String>> {
    let result = BbcodeParser::new(dictionary).parse(text);
    if result.is_valid() {
        Ok(())
    } else {
        Err(result.document.errors().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_default_options_escape() {
        assert!(ParseOptions::default().escape_html);
    }

    #[test]
    fn test_escaping_applies_before_tokenizing() {
        let dictionary = TagDictionary::builtin();
        let result = BbcodeParser::new(dictionary).parse("[b]<i>[/b]");
        let doc = &result.document;
        let bold = doc.roots()[0];
        let text = doc.children(bold)[0];
        assert_eq!(doc.text(text).unwrap().text, "&lt;i&gt;");
    }

    #[test]
    fn test_escaping_disabled() {
        let dictionary = TagDictionary::builtin();
        let options = ParseOptions { escape_html: false };
        let result = BbcodeParser::with_options(dictionary, options).parse("<i>");
        let doc = &result.document;
        assert_eq!(doc.text(doc.roots()[0]).unwrap().text, "<i>");
    }

    #[rstest]
    #[case::bbcode("bbcode", true)]
    #[case::short("bb", true)]
    #[case::upper("BB", true)]
    #[case::markdown("md", false)]
    fn test_can_parse(#[case] extension: &str, #[case] expected: bool) {
        let parser = BbcodeParser::new(TagDictionary::builtin());
        assert_eq!(parser.can_parse(extension), expected);
    }

    #[test]
    fn test_name() {
        let parser = BbcodeParser::new(TagDictionary::builtin());
        assert_eq!(parser.name(), "bbcode");
    }

    #[test]
    fn test_validity_check() {
        let dictionary = TagDictionary::builtin();
        assert_eq!(validity_check("[b]ok[/b]", dictionary), Ok(()));
        assert_eq!(
            validity_check("[b]oops", dictionary),
            Err(vec!["[b] not closed".to_string()])
        );
    }
}
