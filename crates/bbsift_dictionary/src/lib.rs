//! # bbsift_dictionary
//!
//! Tag dictionary for the bbsift markup parser.
//!
//! This crate provides:
//! - [`TagDefinition`], the declarative grammar rules of a single tag
//! - [`TagDictionary`], the read-only table the parser consults
//! - JSON loading with schema validation and a built-in default tag set
//!
//! ## Example
//!
//! ```rust
//! use bbsift_dictionary::TagDictionary;
//!
//! let dictionary = TagDictionary::builtin();
//! let bold = dictionary.lookup("B").unwrap();
//! assert!(!bold.self_closable);
//! ```
//!
//! A dictionary is immutable once handed to a parser and is `Send + Sync`, so
//! one instance can be shared by any number of concurrent parses.

mod definition;
mod dictionary;
mod error;

pub use definition::{ParamToken, TagDefinition};
pub use dictionary::TagDictionary;
pub use error::DictionaryError;
