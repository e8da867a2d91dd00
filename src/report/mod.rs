//! Report renderers for classification results.
//!
//! - [`terminal`]: summary count table and per-dependency table; respects `--quiet`.
//!
//! JSON output is a direct `serde_json` dump of the dependency list.

pub mod terminal;
