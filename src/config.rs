use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".glotwirerc.json";

/// Placeholder substituted with the locale code in `dictionaryFile`.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// What to do when a synthesized key already holds a different text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollisionPolicy {
    /// Skip the candidate and report a diagnostic.
    #[default]
    Reject,
    /// Keep the existing entry and wire the candidate to its key.
    FirstWriterWins,
    /// Store the text under the first free numbered leaf (`name2`, `name3`, ...).
    Suffix,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default = "default_hook_name")]
    pub hook_name: String,
    #[serde(default = "default_translator_name")]
    pub translator_name: String,
    #[serde(default = "default_alias_name")]
    pub alias_name: String,
    #[serde(default = "default_checked_attributes")]
    pub checked_attributes: Vec<String>,
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default = "default_dictionaries_dir")]
    pub dictionaries_dir: String,
    #[serde(default = "default_dictionary_file")]
    pub dictionary_file: String,
    #[serde(default)]
    pub apply_command: Vec<String>,
}

fn default_source_root() -> String {
    "src/app/dashboard".to_string()
}

fn default_file_name() -> String {
    "page.tsx".to_string()
}

fn default_catalog_path() -> String {
    "src/lib/translations/en.json".to_string()
}

fn default_hook_name() -> String {
    "useTranslation".to_string()
}

fn default_translator_name() -> String {
    "t".to_string()
}

fn default_alias_name() -> String {
    "tr".to_string()
}

fn default_checked_attributes() -> Vec<String> {
    ["label", "placeholder", "title"].map(String::from).to_vec()
}

fn default_namespace() -> String {
    "common".to_string()
}

fn default_locales() -> Vec<String> {
    ["ht", "ru", "ko", "vi", "tl"].map(String::from).to_vec()
}

fn default_dictionaries_dir() -> String {
    "./".to_string()
}

fn default_dictionary_file() -> String {
    format!("_{}_dict.json", LOCALE_PLACEHOLDER)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            file_name: default_file_name(),
            ignores: Vec::new(),
            catalog_path: default_catalog_path(),
            hook_name: default_hook_name(),
            translator_name: default_translator_name(),
            alias_name: default_alias_name(),
            checked_attributes: default_checked_attributes(),
            default_namespace: default_namespace(),
            namespaces: BTreeMap::new(),
            collision_policy: CollisionPolicy::default(),
            locales: default_locales(),
            dictionaries_dir: default_dictionaries_dir(),
            dictionary_file: default_dictionary_file(),
            apply_command: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid `ignores` glob patterns, identifiers that
    /// cannot be used as JS bindings, or a dictionary file name without the
    /// `{locale}` placeholder.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for (field, name) in [
            ("hookName", &self.hook_name),
            ("translatorName", &self.translator_name),
            ("aliasName", &self.alias_name),
        ] {
            if !is_identifier(name) {
                bail!("'{}' must be a valid identifier, got \"{}\"", field, name);
            }
        }

        if self.translator_name == self.alias_name {
            bail!("'aliasName' must differ from 'translatorName'");
        }

        if !self.dictionary_file.contains(LOCALE_PLACEHOLDER) {
            bail!(
                "'dictionaryFile' must contain the {} placeholder, got \"{}\"",
                LOCALE_PLACEHOLDER,
                self.dictionary_file
            );
        }

        Ok(())
    }

    /// Path of the flat dictionary for `locale`.
    pub fn dictionary_path(&self, locale: &str) -> PathBuf {
        Path::new(&self.dictionaries_dir)
            .join(self.dictionary_file.replace(LOCALE_PLACEHOLDER, locale))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
