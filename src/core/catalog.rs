//! The source-language translation catalog (e.g. `en.json`).
//!
//! A nested JSON object whose leaves are strings, addressed by dotted key
//! paths (`settings.displayName`). The catalog is loaded once, mutated in
//! memory while wiring, and written back in a single [`TranslationCatalog::flush`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// Result of inserting a key. Existing entries are never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was created.
    Added,
    /// The key already holds exactly this text.
    Exists,
    /// The key already holds a different text.
    Conflict { existing: String },
    /// A segment of the path is a string leaf, or the leaf is an object.
    Blocked,
}

pub struct TranslationCatalog {
    file_path: PathBuf,
    data: Map<String, Value>,
    /// First key path (in document order) for every leaf text.
    text_index: HashMap<String, String>,
    dirty: bool,
}

impl TranslationCatalog {
    /// An empty catalog that will be written to `path` on flush.
    pub fn new(path: &Path) -> Self {
        Self {
            file_path: path.to_path_buf(),
            data: Map::new(),
            text_index: HashMap::new(),
            dirty: false,
        }
    }

    /// Open an existing catalog, or start an empty one if the file does not exist.
    ///
    /// A file that exists but is not a JSON object is an error: silently
    /// starting over would drop every key on the next flush.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(path));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::from_document(path, &content)
    }

    /// Parse catalog `content` that belongs to `path`.
    pub fn from_document(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
        let data = match value {
            Value::Object(map) => map,
            _ => bail!("Root of JSON file must be an object: {}", path.display()),
        };

        let mut text_index = HashMap::new();
        index_leaves(&data, "", &mut text_index);

        Ok(Self {
            file_path: path.to_path_buf(),
            data,
            text_index,
            dirty: false,
        })
    }

    /// Key path of the first leaf whose value is exactly `text`.
    pub fn find_key_by_text(&self, text: &str) -> Option<&str> {
        self.text_index.get(text).map(String::as_str)
    }

    /// Text stored at a dotted key path.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut parts = key.split('.');
        let mut current = self.data.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        current.as_str()
    }

    /// Insert `text` at a dotted key path, creating intermediate objects.
    pub fn insert(&mut self, key: &str, text: &str) -> InsertOutcome {
        let parts: Vec<&str> = key.split('.').collect();
        let outcome = insert_nested(&mut self.data, &parts, text);
        if outcome == InsertOutcome::Added {
            self.dirty = true;
            self.text_index
                .entry(text.to_string())
                .or_insert_with(|| key.to_string());
        }
        outcome
    }

    pub fn leaf_count(&self) -> usize {
        count_leaves(&self.data)
    }

    /// True if keys were added since the catalog was loaded or last flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Serialize with 2-space indentation and a trailing newline.
    ///
    /// Non-ASCII text is written as-is, not as `\u` escapes.
    pub fn to_document(&self) -> Result<String> {
        let content = serde_json::to_string_pretty(&self.data).context("Failed to serialize JSON")?;
        Ok(format!("{}\n", content))
    }

    /// Write the whole catalog back to its file if it changed.
    ///
    /// Returns `true` if the file was written.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }

        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&self.file_path, self.to_document()?)
            .with_context(|| format!("Failed to write file: {}", self.file_path.display()))?;

        self.dirty = false;
        Ok(true)
    }
}

fn index_leaves(map: &Map<String, Value>, prefix: &str, index: &mut HashMap<String, String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => index_leaves(inner, &path, index),
            Value::String(text) => {
                index.entry(text.clone()).or_insert(path);
            }
            _ => {}
        }
    }
}

fn count_leaves(map: &Map<String, Value>) -> usize {
    map.values()
        .map(|value| match value {
            Value::Object(inner) => count_leaves(inner),
            Value::String(_) => 1,
            _ => 0,
        })
        .sum()
}

fn insert_nested(root: &mut Map<String, Value>, path: &[&str], text: &str) -> InsertOutcome {
    let Some((first, rest)) = path.split_first() else {
        return InsertOutcome::Blocked;
    };

    if rest.is_empty() {
        return match root.get(*first) {
            None => {
                root.insert(first.to_string(), Value::String(text.to_string()));
                InsertOutcome::Added
            }
            Some(Value::String(existing)) if existing == text => InsertOutcome::Exists,
            Some(Value::String(existing)) => InsertOutcome::Conflict {
                existing: existing.clone(),
            },
            Some(_) => InsertOutcome::Blocked,
        };
    }

    match root.get(*first) {
        Some(Value::Object(_)) | None => {}
        Some(_) => return InsertOutcome::Blocked,
    }

    let next_level = root
        .entry(first.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    match next_level.as_object_mut() {
        Some(inner) => insert_nested(inner, rest, text),
        None => InsertOutcome::Blocked,
    }
}
