use crate::llm::openai::DEFAULT_MODEL;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional settings file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "md-translate-de.toml";

pub const ENV_PREFIX: &str = "MD_TRANSLATE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Directory whose documents get translated.
    pub directory: PathBuf,
    pub model: String,
    /// Takes precedence over `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    /// Print each translation to stdout.
    pub echo: bool,
    pub continue_on_error: bool,
    /// Run the pipeline with the offline echo translator.
    pub dry_run: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            directory: PathBuf::from("."),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            api_base: None,
            echo: true,
            continue_on_error: false,
            dry_run: false,
        }
    }
}

impl TranslationConfig {
    /// Loads the settings file from `dir` (if any), then `MD_TRANSLATE_*` variables.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        Self::load_with_env(dir, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(dir: &Path, env: Environment) -> anyhow::Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Config::builder()
            .add_source(File::from(config_path.as_path()).required(false))
            .add_source(env.prefix_separator("_").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<TranslationConfig>())
            .with_context(|| format!("Invalid configuration in {:?} or environment", config_path))
    }
}
