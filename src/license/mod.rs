//! Mapping raw license text to a canonical license id.
//!
//! - [`sanitize`]: escapes query-language operators in raw text.
//! - [`matcher`]: queries the index with a verbatim-then-escaped retry and
//!   derives fallback hints for unmatched text.

pub mod matcher;
pub mod sanitize;
