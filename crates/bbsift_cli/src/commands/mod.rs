//! Command implementations and the state they share.

pub mod check;
pub mod tags;
pub mod tree;

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use bbsift_dictionary::TagDictionary;
use bbsift_parser::{BbcodeParser, ParseOptions};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::info;

use crate::cli::Cli;
use crate::config::SifterConfig;

/// Dictionary and parse options resolved from flags and configuration.
pub struct Context {
    pub dictionary: Cow<'static, TagDictionary>,
    pub options: ParseOptions,
}

impl Context {
    /// Resolves the context; flags take precedence over the configuration.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => SifterConfig::from_file(path).into_diagnostic()?,
            None => find_config()?,
        };

        let dictionary = match cli.dictionary.clone().or_else(|| config.dictionary_path()) {
            Some(path) => {
                info!("Using dictionary: {}", path.display());
                let dictionary = TagDictionary::from_file(&path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to load dictionary {}", path.display()))?;
                Cow::Owned(dictionary)
            }
            None => Cow::Borrowed(TagDictionary::builtin()),
        };

        let options = ParseOptions {
            escape_html: config.escape_html && !cli.no_escape_html,
        };

        Ok(Self {
            dictionary,
            options,
        })
    }

    pub fn parser(&self) -> BbcodeParser<'_> {
        BbcodeParser::with_options(&self.dictionary, self.options)
    }
}

/// Loads `.bbsift.json` from the working directory, or the defaults.
pub fn find_config() -> Result<SifterConfig> {
    if let Some(path) = SifterConfig::discover(".") {
        info!("Using config: {}", path.display());
        return SifterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(SifterConfig::new())
}

pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}
