use tracing::debug;

use crate::error::QueryError;
use crate::index::LicenseSearch;
use crate::license::sanitize::sanitize;

/// Byte length of the excerpt kept for unmatched license files.
pub const HINT_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    pub id: String,
}

impl MatchResult {
    fn hit(id: String) -> Self {
        Self { matched: true, id }
    }

    fn miss() -> Self {
        Self {
            matched: false,
            id: String::new(),
        }
    }
}

/// Match raw license text against the index.
///
/// The text is first queried verbatim. If the index rejects that query, the
/// escaped form is tried once; a second failure is returned to the caller.
/// Only the top-ranked hit counts, and no hits is a miss rather than an
/// error.
pub fn match_license<S>(index: &S, raw: &str) -> Result<MatchResult, QueryError>
where
    S: LicenseSearch + ?Sized,
{
    debug!("searching the index");
    let hits = match index.search(raw, 1) {
        Ok(hits) => hits,
        Err(err) => {
            debug!(error = %err, "verbatim query rejected, retrying escaped");
            index.search(&sanitize(raw), 1)?
        }
    };

    Ok(match hits.into_iter().next() {
        Some(top) => {
            debug!(licence_id = %top.id, score = top.score, "top hit");
            MatchResult::hit(top.id)
        }
        None => MatchResult::miss(),
    })
}

/// First [`HINT_LEN`] bytes of `text`, for human review of unmatched files.
///
/// The cut is byte based; if it would split a multi-byte character it moves
/// back to the previous character boundary.
pub fn fallback_hint(text: &str) -> String {
    if text.len() <= HINT_LEN {
        return text.to_string();
    }
    let mut end = HINT_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
