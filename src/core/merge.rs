//! Merging a batch of translations into the per-locale dictionaries.
//!
//! A batch is a JSON object keyed by source text:
//!
//! ```json
//! { "No tags": { "ko": "태그 없음", "ru": "Нет тегов" } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::core::apply::LocaleApplier;
use crate::core::dictionary::{LocaleDictionary, MergeOutcome};
use crate::issues::{ApplyFailedIssue, IoErrorIssue, Issue, UnknownLocaleIssue};

/// Source text → (locale → translation), in document order.
#[derive(Debug, Clone, Default)]
pub struct TranslationBatch {
    entries: Vec<(String, Vec<(String, String)>)>,
}

impl TranslationBatch {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::from_document(&content).with_context(|| format!("Invalid batch: {}", path.display()))
    }

    pub fn from_document(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).context("Failed to parse JSON")?;
        let Value::Object(root) = value else {
            bail!("Root of batch must be an object");
        };
        Self::from_map(root)
    }

    fn from_map(root: Map<String, Value>) -> Result<Self> {
        let mut entries = Vec::with_capacity(root.len());
        for (source, translations) in root {
            let Value::Object(translations) = translations else {
                bail!("Translations for \"{}\" must be an object", source);
            };
            let mut pairs = Vec::with_capacity(translations.len());
            for (locale, translated) in translations {
                let Value::String(translated) = translated else {
                    bail!("Translation of \"{}\" for {} must be a string", source, locale);
                };
                pairs.push((locale, translated));
            }
            entries.push((source, pairs));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Translations for `locale`, in batch order.
    fn for_locale<'a>(&'a self, locale: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries.iter().filter_map(move |(source, pairs)| {
            pairs
                .iter()
                .find(|(l, _)| l == locale)
                .map(|(_, translated)| (source.as_str(), translated.as_str()))
        })
    }

    /// Locales the batch uses, with their entry counts.
    fn locales(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for (_, pairs) in &self.entries {
            for (locale, _) in pairs {
                *counts.entry(locale.as_str()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// What the merge did to one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleMergeStats {
    pub locale: String,
    pub dictionary_path: String,
    pub added: usize,
    pub unchanged: usize,
    /// Existing translations that differ from the batch and were kept.
    pub kept: usize,
    /// Dictionary written to disk.
    pub saved: bool,
    /// Apply step ran and succeeded.
    pub applied: bool,
}

#[derive(Debug, Default)]
pub struct MergeReport {
    pub locales: Vec<LocaleMergeStats>,
    pub issues: Vec<Issue>,
}

impl MergeReport {
    pub fn added(&self) -> usize {
        self.locales.iter().map(|l| l.added).sum()
    }
}

/// Merge `batch` into every configured locale dictionary.
///
/// Dictionaries are loaded up front, so a malformed one aborts before
/// anything is written. A dictionary that cannot be saved is reported and
/// skips its apply step; the other locales carry on. With `write` unset
/// nothing is saved or applied.
pub fn merge_batch<A: LocaleApplier>(
    config: &Config,
    batch: &TranslationBatch,
    batch_path: &str,
    applier: &A,
    write: bool,
) -> Result<MergeReport> {
    let mut report = MergeReport::default();

    for (locale, entry_count) in batch.locales() {
        if !config.locales.iter().any(|l| l == locale) {
            report.issues.push(Issue::UnknownLocale(UnknownLocaleIssue {
                batch_path: batch_path.to_string(),
                locale: locale.to_string(),
                entry_count,
            }));
        }
    }

    let mut dictionaries = Vec::with_capacity(config.locales.len());
    for locale in &config.locales {
        let path = config.dictionary_path(locale);
        dictionaries.push((LocaleDictionary::load(locale, &path)?, path));
    }

    for (mut dictionary, path) in dictionaries {
        let mut stats = LocaleMergeStats {
            locale: dictionary.locale().to_string(),
            dictionary_path: path.display().to_string(),
            ..Default::default()
        };

        for (source, translated) in batch.for_locale(&stats.locale) {
            match dictionary.insert(source, translated) {
                MergeOutcome::Added => stats.added += 1,
                MergeOutcome::Unchanged => stats.unchanged += 1,
                MergeOutcome::Kept => stats.kept += 1,
            }
        }

        if write && stats.added > 0 {
            if let Err(e) = dictionary.save(&path) {
                report.issues.push(Issue::IoError(IoErrorIssue {
                    file_path: stats.dictionary_path.clone(),
                    error: format!("{:#}", e),
                }));
                report.locales.push(stats);
                continue;
            }
            stats.saved = true;

            match applier.apply_locale(&stats.locale, &path) {
                Ok(()) => stats.applied = true,
                Err(e) => report.issues.push(Issue::ApplyFailed(ApplyFailedIssue {
                    locale: stats.locale.clone(),
                    dictionary_path: stats.dictionary_path.clone(),
                    error: format!("{:#}", e),
                })),
            }
        }

        report.locales.push(stats);
    }

    Ok(report)
}
