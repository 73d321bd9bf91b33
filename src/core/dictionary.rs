//! Flat per-locale dictionaries (`_ko_dict.json`): source text → translated text.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// Result of adding one pair to a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New source text, pair added.
    Added,
    /// Source text already present with the same translation.
    Unchanged,
    /// Source text already present with a different translation, which was kept.
    Kept,
}

/// One locale's dictionary.
///
/// Keys are matched byte-for-byte; `"Save "` and `"Save"` are different entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleDictionary {
    locale: String,
    entries: Map<String, Value>,
}

impl LocaleDictionary {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            entries: Map::new(),
        }
    }

    /// Load a dictionary, starting empty if the file does not exist yet.
    pub fn load(locale: &str, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(locale));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::from_document(locale, &content)
            .with_context(|| format!("Invalid dictionary: {}", path.display()))
    }

    /// Parse a flat JSON object of strings.
    pub fn from_document(locale: &str, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).context("Failed to parse JSON")?;
        let Value::Object(entries) = value else {
            bail!("Root of dictionary must be an object");
        };
        if let Some((key, _)) = entries.iter().find(|(_, v)| !v.is_string()) {
            bail!("Value for \"{}\" must be a string", key);
        }
        Ok(Self {
            locale: locale.to_string(),
            entries,
        })
    }

    pub fn to_document(&self) -> Result<String> {
        let content =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize JSON")?;
        Ok(format!("{}\n", content))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, self.to_document()?)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).and_then(Value::as_str)
    }

    /// Add a pair unless the source text is already translated.
    pub fn insert(&mut self, source: &str, translated: &str) -> MergeOutcome {
        match self.get(source) {
            Some(existing) if existing == translated => MergeOutcome::Unchanged,
            Some(_) => MergeOutcome::Kept,
            None => {
                self.entries
                    .insert(source.to_string(), Value::String(translated.to_string()));
                MergeOutcome::Added
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
