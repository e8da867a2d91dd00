//! Bundled canonical license texts.
//!
//! Records live under `data/licenses/` as SPDX detail JSON and are embedded
//! at compile time, so the binary needs no network or data directory to
//! build its index.

use crate::error::CorpusError;
use crate::models::LicenseRecord;

/// Embedded records as `(file name, json)`.
static EMBEDDED: &[(&str, &str)] = &[
    ("0BSD.json", include_str!("../data/licenses/0BSD.json")),
    ("Apache-2.0.json", include_str!("../data/licenses/Apache-2.0.json")),
    ("BSD-2-Clause.json", include_str!("../data/licenses/BSD-2-Clause.json")),
    ("BSD-3-Clause.json", include_str!("../data/licenses/BSD-3-Clause.json")),
    ("BSL-1.0.json", include_str!("../data/licenses/BSL-1.0.json")),
    ("ISC.json", include_str!("../data/licenses/ISC.json")),
    ("MIT.json", include_str!("../data/licenses/MIT.json")),
    ("MIT-0.json", include_str!("../data/licenses/MIT-0.json")),
    ("Unlicense.json", include_str!("../data/licenses/Unlicense.json")),
    ("WTFPL.json", include_str!("../data/licenses/WTFPL.json")),
    ("Zlib.json", include_str!("../data/licenses/Zlib.json")),
];

/// Load every embedded license record.
///
/// A single malformed record fails the whole load.
pub fn load() -> Result<Vec<LicenseRecord>, CorpusError> {
    load_from(EMBEDDED)
}

fn load_from(entries: &[(&str, &str)]) -> Result<Vec<LicenseRecord>, CorpusError> {
    if entries.is_empty() {
        return Err(CorpusError::Empty);
    }

    entries
        .iter()
        .map(|(file, json)| parse_record(file, json))
        .collect()
}

fn parse_record(file: &str, json: &str) -> Result<LicenseRecord, CorpusError> {
    let record: LicenseRecord =
        serde_json::from_str(json).map_err(|source| CorpusError::Parse {
            file: file.to_string(),
            source,
        })?;

    let missing = if record.id.trim().is_empty() {
        Some("licenseId")
    } else if record.text.trim().is_empty() {
        Some("licenseText")
    } else {
        None
    };

    match missing {
        Some(field) => Err(CorpusError::MissingField {
            file: file.to_string(),
            field,
        }),
        None => Ok(record),
    }
}
