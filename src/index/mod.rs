//! Full-text index over the license corpus.
//!
//! The index is an SQLite FTS5 table stored as `licenses.db` inside the
//! index directory. It is built once, on first use, and opened read-only
//! afterwards. Readers share an r2d2 connection pool; the pool is closed
//! when the last [`LicenseIndex`] reference is dropped.

pub mod query;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use crate::corpus;
use crate::error::{IndexError, QueryError};
use crate::models::LicenseRecord;
use query::Query;

pub const DB_FILE: &str = "licenses.db";

const SCHEMA: &str = "
    CREATE VIRTUAL TABLE licenses USING fts5(
        license_id,
        name,
        body,
        tokenize = 'unicode61'
    );
";

const INSERT_SQL: &str = "INSERT INTO licenses (license_id, name, body) VALUES (?1, ?2, ?3)";

// bm25() is lower-is-better.
const SEARCH_SQL: &str = "
    SELECT license_id, bm25(licenses)
    FROM licenses
    WHERE licenses MATCH ?1
    ORDER BY bm25(licenses), license_id
    LIMIT ?2
";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    /// Relevance, higher is better.
    pub score: f64,
}

/// Ranked full-text search over canonical license texts.
///
/// Implementations must tolerate concurrent readers.
pub trait LicenseSearch: Send + Sync {
    /// Run `query` (see [`query`] for the grammar) and return up to `limit`
    /// hits, best first. Zero hits is not an error.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, QueryError>;
}

pub struct LicenseIndex {
    dir: PathBuf,
    pool: Pool<SqliteConnectionManager>,
}

impl LicenseIndex {
    /// Open the index at `dir`, building it from the embedded corpus first
    /// when no index exists there yet.
    pub fn open_or_build(dir: &Path, readers: u32) -> Result<Self, IndexError> {
        if !dir.join(DB_FILE).is_file() {
            let records = corpus::load()?;
            build(&records, dir)?;
        }
        Self::open(dir, readers)
    }

    pub fn open(dir: &Path, readers: u32) -> Result<Self, IndexError> {
        let db = dir.join(DB_FILE);
        if !db.is_file() {
            return Err(IndexError::open(dir, "no index database found"));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        // SQLite opens lazily; touch the table so corruption shows up here.
        let conn = Connection::open_with_flags(&db, flags).map_err(|e| IndexError::open(dir, e))?;
        let licenses: i64 = conn
            .query_row("SELECT count(*) FROM licenses", [], |row| row.get(0))
            .map_err(|e| IndexError::open(dir, e))?;
        drop(conn);

        let manager = SqliteConnectionManager::file(&db).with_flags(flags);
        let pool = Pool::builder()
            .max_size(readers.max(1))
            .min_idle(Some(1))
            .connection_timeout(Duration::from_secs(5))
            .build(manager)
            .map_err(|e| IndexError::open(dir, e))?;

        debug!(index = %dir.display(), licenses, "opened index");

        Ok(Self {
            dir: dir.to_path_buf(),
            pool,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LicenseSearch for LicenseIndex {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, QueryError> {
        let Some(expr) = Query::parse(query)?.to_fts5() else {
            return Ok(Vec::new());
        };

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare_cached(SEARCH_SQL)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let hits = stmt
            .query_map(params![expr, limit], |row| {
                Ok(SearchHit {
                    id: row.get(0)?,
                    score: -row.get::<_, f64>(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }
}

impl Drop for LicenseIndex {
    fn drop(&mut self) {
        debug!(index = %self.dir.display(), "closing index");
    }
}

/// Build a fresh index from `records` at `dest`.
///
/// The database is written into a temporary sibling directory and renamed
/// into place, so readers never observe a half-built index. When another
/// process finishes first, its index is kept and this build is discarded.
pub fn build(records: &[LicenseRecord], dest: &Path) -> Result<(), IndexError> {
    info!(index = %dest.display(), "creating index");

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| IndexError::build(dest, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".license-index-")
        .tempdir_in(&parent)
        .map_err(|e| IndexError::build(dest, e))?;

    write_index(records, &staging.path().join(DB_FILE), dest)?;

    match fs::rename(staging.path(), dest) {
        Ok(()) => {
            // The staging path now names `dest`; only a failed rename cleans it up.
            let _ = staging.keep();
            info!(index = %dest.display(), licenses = records.len(), "created index");
            Ok(())
        }
        Err(_) if dest.join(DB_FILE).is_file() => {
            info!(index = %dest.display(), "index was built concurrently; keeping existing one");
            Ok(())
        }
        Err(e) => Err(IndexError::build(dest, e)),
    }
}

fn write_index(records: &[LicenseRecord], db: &Path, dest: &Path) -> Result<(), IndexError> {
    let mut ids = HashSet::new();
    for record in records {
        if !ids.insert(record.id.as_str()) {
            return Err(IndexError::DuplicateId(record.id.clone()));
        }
    }

    let mut conn = Connection::open(db).map_err(|e| IndexError::build(dest, e))?;
    conn.execute_batch(SCHEMA)
        .map_err(|e| IndexError::build(dest, e))?;

    let tx = conn.transaction().map_err(|e| IndexError::build(dest, e))?;
    {
        let mut stmt = tx
            .prepare(INSERT_SQL)
            .map_err(|e| IndexError::build(dest, e))?;
        for record in records {
            stmt.execute(params![record.id, record.name, record.text])
                .map_err(|e| IndexError::build(dest, format!("{}: {}", record.id, e)))?;
        }
    }
    tx.commit().map_err(|e| IndexError::build(dest, e))?;

    conn.execute("INSERT INTO licenses (licenses) VALUES ('optimize')", [])
        .map_err(|e| IndexError::build(dest, e))?;

    Ok(())
}
