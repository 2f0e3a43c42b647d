//! The tag dictionary.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::definition::RawTagDefinition;
use crate::{DictionaryError, TagDefinition};

// Path is relative to this file: ../../../schemas/v1/dictionary.json
const DICTIONARY_SCHEMA_JSON: &str = include_str!("../../../schemas/v1/dictionary.json");
const BUILTIN_DICTIONARY_JSON: &str = include_str!("builtin.json");

static SCHEMA: OnceLock<Validator> = OnceLock::new();
static BUILTIN: OnceLock<TagDictionary> = OnceLock::new();

#[derive(Deserialize)]
struct DictionaryDocument {
    tags: BTreeMap<String, RawTagDefinition>,
}

/// Read-only table mapping tag names to their definitions.
///
/// Names are stored lower-cased and lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct TagDictionary {
    tags: HashMap<String, Arc<TagDefinition>>,
}

impl TagDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in dictionary with the conventional BBCode tag set.
    pub fn builtin() -> &'static TagDictionary {
        BUILTIN.get_or_init(|| {
            Self::from_json(BUILTIN_DICTIONARY_JSON).expect("Invalid built-in dictionary")
        })
    }

    /// Loads a dictionary from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Loading tag dictionary from {}", path.display());
        Self::from_json(&content)
    }

    /// Parses a dictionary from a JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        let instance: Value = serde_json::from_str(json)?;

        let schema = SCHEMA.get_or_init(|| {
            let schema_json: Value =
                serde_json::from_str(DICTIONARY_SCHEMA_JSON).expect("Invalid embedded schema");
            Validator::new(&schema_json).expect("Invalid schema compilation")
        });

        if let Err(e) = schema.validate(&instance) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(DictionaryError::validation(error_msg));
        }

        let document: DictionaryDocument = serde_json::from_value(instance)?;

        let mut dictionary = Self::new();
        for (name, raw) in document.tags {
            let definition = raw.compile(&name)?;
            dictionary.insert(name, definition);
        }
        dictionary.check_references()?;

        debug!("Loaded tag dictionary with {} tags", dictionary.len());
        Ok(dictionary)
    }

    /// Adds or replaces a tag definition, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: TagDefinition,
    ) -> Option<Arc<TagDefinition>> {
        self.tags
            .insert(name.into().to_lowercase(), Arc::new(definition))
    }

    /// Looks up the definition of a tag.
    pub fn lookup(&self, name: &str) -> Option<&Arc<TagDefinition>> {
        match self.tags.get(name) {
            Some(definition) => Some(definition),
            None => self.tags.get(&name.to_lowercase()),
        }
    }

    /// Returns true if the dictionary defines `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns all tag names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterates over all `(name, definition)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<TagDefinition>)> {
        let mut entries: Vec<_> = self
            .tags
            .iter()
            .map(|(name, def)| (name.as_str(), def))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries.into_iter()
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the dictionary defines no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Ensures multi-tag candidates refer to defined tags.
    fn check_references(&self) -> Result<(), DictionaryError> {
        for (name, definition) in self.iter() {
            if let Some(missing) = definition
                .supported_tags
                .iter()
                .find(|tag| !self.contains(tag))
            {
                return Err(DictionaryError::unknown_reference(name, missing.as_str()));
            }
        }
        Ok(())
    }
}
