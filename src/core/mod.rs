//! The wiring engine and the dictionary stores it maintains.
//!
//! - `scan`: top-level component functions and their hook state
//! - `extract`: candidate literals inside a function
//! - `keys`: namespaces and key synthesis against the catalog
//! - `rewrite`: line-slice edits that wire candidates
//! - `pipeline`: the per-file `wire` run over a source tree
//! - `catalog`, `dictionary`, `merge`, `apply`: translation storage and locale updates

pub mod apply;
pub mod catalog;
pub mod dictionary;
pub mod extract;
pub mod files;
pub mod keys;
pub mod merge;
pub mod parsers;
pub mod pipeline;
pub mod rewrite;
pub mod scan;
pub mod source;

pub use apply::{Applier, CommandApplier, LocaleApplier, SkipApply};
pub use catalog::{InsertOutcome, TranslationCatalog};
pub use dictionary::{LocaleDictionary, MergeOutcome};
pub use merge::{LocaleMergeStats, MergeReport, TranslationBatch, merge_batch};
pub use pipeline::{ModifiedFile, Pipeline, WireSummary, WiredCandidate};
