//! # bbsift_parser
//!
//! Error-tolerant parser for bracket-tag markup (`[b]bold[/b]`).
//!
//! The pipeline is strictly one-directional:
//!
//! 1. [`tokenizer`] splits the text with a single regular expression.
//! 2. [`TagInfo`] classifies each token against the [`TagDictionary`].
//! 3. [`TagSifter`] validates the token against the open-tag stack and applies
//!    a [`transition::plan`] to the [`BbTree`].
//!
//! Parsing never fails. Every structural problem becomes an error message
//! attached to the most relevant node, and the caller decides what to do with
//! an invalid document.
//!
//! ## Example
//!
//! ```rust
//! use bbsift_dictionary::TagDictionary;
//! use bbsift_parser::BbcodeParser;
//!
//! let parser = BbcodeParser::new(TagDictionary::builtin());
//!
//! let result = parser.parse("[b]bold[/b]");
//! assert!(result.is_valid());
//!
//! let result = parser.parse("[b]bold");
//! assert_eq!(result.errors(), vec!["[b] not closed"]);
//! ```

pub mod messages;
mod parser;
mod sifter;
mod tag_info;
pub mod tokenizer;
pub mod transition;
mod tree;

pub use bbsift_dictionary::TagDictionary;
pub use parser::{BbcodeParser, ParseOptions, ParseResult, validity_check};
pub use sifter::{MAX_ROOT_NODES, TagSifter};
pub use tag_info::TagInfo;
pub use tree::BbTree;
