#![allow(dead_code)]

use bbsift_ast::{Document, NodeId, TagNode};
use bbsift_parser::{BbcodeParser, ParseResult, TagDictionary};

/// A small dictionary exercising restrictions the built-in set does not.
pub const CUSTOM_DICTIONARY: &str = r#"{
  "tags": {
    "b": {},
    "list": { "only_allow": ["item"] },
    "item": { "only_in": ["list"] },
    "tag": {
      "allow_quick_param": true,
      "param_tokens": [{ "token": "id" }]
    },
    "hr": { "self_closable": true },
    "link": {
      "require_between": true,
      "allow_between_as_param": true,
      "param_tokens": [{ "token": "href" }]
    }
  }
}"#;

pub fn custom_dictionary() -> TagDictionary {
    TagDictionary::from_json(CUSTOM_DICTIONARY).unwrap()
}

pub fn parse(text: &str) -> ParseResult {
    BbcodeParser::new(TagDictionary::builtin()).parse(text)
}

pub fn parse_with(dictionary: &TagDictionary, text: &str) -> ParseResult {
    BbcodeParser::new(dictionary).parse(text)
}

pub fn tag(doc: &Document, id: NodeId) -> &TagNode {
    doc.tag(id).unwrap()
}

pub fn text(doc: &Document, id: NodeId) -> &str {
    &doc.text(id).unwrap().text
}
