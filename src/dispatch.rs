//! Concurrent classification of many dependencies.
//!
//! Each dependency is one blocking unit of work (probe, read, query) run on
//! tokio's blocking pool. At most `jobs` units are in flight; results come
//! back in input order and are written into the dependency they belong to,
//! so units never share mutable state. Only the index is shared, read-only.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tracing::{debug, debug_span, warn};

use crate::config::FailurePolicy;
use crate::error::ClassifyError;
use crate::index::LicenseSearch;
use crate::license::matcher::{fallback_hint, match_license};
use crate::models::{Classification, Dependency};
use crate::probe;

#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    /// Upper bound on classifications running at once.
    pub jobs: usize,
    pub on_error: FailurePolicy,
}

/// Classify every dependency in place.
///
/// Under [`FailurePolicy::Abort`] the error returned is the first one in
/// input order, not the first to occur in time: results are consumed in
/// order, so an earlier dependency's failure is reported even when a later
/// one failed sooner. The remaining classifications are abandoned. Under
/// [`FailurePolicy::Continue`] the error is recorded on the dependency and
/// the run goes on.
pub async fn classify_all<S>(
    index: Arc<S>,
    deps: &mut [Dependency],
    opts: DispatchOptions,
    progress: Option<&ProgressBar>,
) -> Result<(), ClassifyError>
where
    S: LicenseSearch + 'static,
{
    let work: Vec<(String, String, PathBuf)> = deps
        .iter()
        .map(|d| (d.path.clone(), d.version.clone(), d.source_dir.clone()))
        .collect();

    let mut results = stream::iter(work)
        .map(|(module, version, dir)| {
            let index = Arc::clone(&index);
            async move {
                let label = module.clone();
                tokio::task::spawn_blocking(move || {
                    let span = debug_span!("classify", module = %module, version = %version);
                    let _guard = span.enter();
                    classify_one(index.as_ref(), &module, &dir)
                })
                .await
                .map_err(|source| ClassifyError::Task {
                    dependency: label,
                    source,
                })
                .and_then(|outcome| outcome)
            }
        })
        .buffered(opts.jobs.max(1));

    for dep in deps.iter_mut() {
        let Some(outcome) = results.next().await else {
            break;
        };

        match outcome {
            Ok(classification) => dep.classification = classification,
            Err(err) if opts.on_error == FailurePolicy::Continue => {
                warn!(module = %dep.path, error = %err, "classification failed");
                dep.classification = Classification::failed(err.license_found(), err.to_string());
            }
            Err(err) => return Err(err),
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    Ok(())
}

fn classify_one<S>(index: &S, module: &str, source_dir: &Path) -> Result<Classification, ClassifyError>
where
    S: LicenseSearch + ?Sized,
{
    debug!("checking files in module dir");
    let found = probe::find_license_file(source_dir).map_err(|source| ClassifyError::Probe {
        dependency: module.to_string(),
        source,
    })?;
    let Some(path) = found else {
        debug!("no license found");
        return Ok(Classification::default());
    };

    debug!(licence_path = %path.display(), "found licence");
    let text = probe::read_license_text(&path).map_err(|source| ClassifyError::Read {
        dependency: module.to_string(),
        source,
    })?;

    let result = match_license(index, &text).map_err(|source| ClassifyError::Query {
        dependency: module.to_string(),
        source,
    })?;

    if result.matched {
        debug!(licence_id = %result.id, "matched licence");
        Ok(Classification::matched(result.id))
    } else {
        debug!("no licence match found");
        Ok(Classification::unmatched(fallback_hint(&text)))
    }
}
