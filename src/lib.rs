//! glotwire - wires hardcoded UI text in Next.js pages to translation calls
//!
//! A one-time migration aid. It finds user-facing literal text in page
//! components, replaces it with translator calls, grows the translation
//! catalog as it goes, and keeps the per-locale dictionaries in step.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Scanner, extractor, key synthesizer, rewriter, and dictionary stores
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
