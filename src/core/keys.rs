//! Key synthesis: namespaces from page paths, camelCase keys from English text.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::CollisionPolicy;
use crate::core::catalog::{InsertOutcome, TranslationCatalog};

/// Maximum length of a synthesized leaf name.
pub const MAX_KEY_LEN: usize = 50;

static NON_KEY_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9 ]").unwrap());

/// Convert English text to a camelCase leaf name.
///
/// Returns `None` when nothing is left after removing punctuation.
///
/// ```
/// use glotwire::core::keys::text_to_camel;
///
/// assert_eq!(text_to_camel("Claim #").as_deref(), Some("claim"));
/// assert_eq!(text_to_camel("City/State/Zip").as_deref(), Some("citystatezip"));
/// assert_eq!(text_to_camel("No GPS data").as_deref(), Some("noGpsData"));
/// assert_eq!(text_to_camel("& / #"), None);
/// ```
pub fn text_to_camel(text: &str) -> Option<String> {
    let clean = NON_KEY_CHARS_REGEX.replace_all(text, "");
    let mut words = clean.split_whitespace();

    let mut result = words.next()?.to_lowercase();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(&chars.as_str().to_lowercase());
        }
    }

    result.truncate(MAX_KEY_LEN);
    Some(result)
}

/// Convert a hyphen-case path segment to camelCase (`tool-checkout` → `toolCheckout`).
pub fn hyphen_to_camel(segment: &str) -> String {
    let mut result = String::with_capacity(segment.len());
    for (i, part) in segment.split('-').filter(|p| !p.is_empty()).enumerate() {
        let part: String = part.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        if i == 0 {
            result.push_str(&part);
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.push_str(chars.as_str());
            }
        }
    }
    result
}

/// Namespace for a page, from its directory relative to the source root.
///
/// `relative_dir` uses `/` separators (`properties/leases/[id]`). The
/// explicit table wins; otherwise the first segment that is neither a
/// route group `(…)` nor a dynamic segment `[…]` is camel-cased; otherwise
/// `default` is used.
pub fn namespace_for_path(
    relative_dir: &str,
    table: &BTreeMap<String, String>,
    default: &str,
) -> String {
    if let Some(namespace) = table.get(relative_dir) {
        return namespace.clone();
    }

    relative_dir
        .split('/')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !is_route_group(segment) && !is_dynamic_segment(segment))
        .map(hyphen_to_camel)
        .find(|namespace| !namespace.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn is_route_group(segment: &str) -> bool {
    segment.starts_with('(') && segment.ends_with(')')
}

fn is_dynamic_segment(segment: &str) -> bool {
    segment.starts_with('[') && segment.ends_with(']')
}

/// How a candidate text was mapped to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResolution {
    /// The text was already in the catalog under this key.
    Existing(String),
    /// A new key was added to the catalog.
    Created(String),
    /// The synthesized slot holds another text; the candidate is wired to it
    /// but its own text is not stored (`firstWriterWins`).
    Shared { key: String, existing: String },
    /// The synthesized slot is taken and the policy rejects the candidate.
    Collision { key: String, existing: Option<String> },
    /// Nothing usable was left of the text.
    Dropped,
}

impl KeyResolution {
    /// The key to wire, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            KeyResolution::Existing(key)
            | KeyResolution::Created(key)
            | KeyResolution::Shared { key, .. } => Some(key),
            KeyResolution::Collision { .. } | KeyResolution::Dropped => None,
        }
    }
}

/// Maps candidate texts to catalog keys, growing the catalog as it goes.
#[derive(Debug, Clone, Copy)]
pub struct KeySynthesizer {
    policy: CollisionPolicy,
}

impl KeySynthesizer {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    pub fn resolve(
        &self,
        catalog: &mut TranslationCatalog,
        namespace: &str,
        text: &str,
    ) -> KeyResolution {
        if let Some(key) = catalog.find_key_by_text(text) {
            return KeyResolution::Existing(key.to_string());
        }

        let Some(leaf) = text_to_camel(text) else {
            return KeyResolution::Dropped;
        };
        let key = format!("{}.{}", namespace, leaf);

        match catalog.insert(&key, text) {
            InsertOutcome::Added => KeyResolution::Created(key),
            InsertOutcome::Exists => KeyResolution::Existing(key),
            InsertOutcome::Conflict { existing } => match self.policy {
                CollisionPolicy::Reject => KeyResolution::Collision {
                    key,
                    existing: Some(existing),
                },
                CollisionPolicy::FirstWriterWins => KeyResolution::Shared { key, existing },
                CollisionPolicy::Suffix => self.insert_with_suffix(catalog, namespace, &leaf, text),
            },
            InsertOutcome::Blocked => KeyResolution::Collision {
                key,
                existing: None,
            },
        }
    }

    fn insert_with_suffix(
        &self,
        catalog: &mut TranslationCatalog,
        namespace: &str,
        leaf: &str,
        text: &str,
    ) -> KeyResolution {
        let mut n = 2;
        loop {
            let key = format!("{}.{}{}", namespace, leaf, n);
            match catalog.insert(&key, text) {
                InsertOutcome::Added => return KeyResolution::Created(key),
                InsertOutcome::Exists => return KeyResolution::Existing(key),
                InsertOutcome::Conflict { .. } => n += 1,
                InsertOutcome::Blocked => {
                    return KeyResolution::Collision {
                        key,
                        existing: None,
                    };
                }
            }
        }
    }
}
