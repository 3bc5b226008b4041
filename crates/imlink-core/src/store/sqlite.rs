//! SQLite-backed reference store

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use tracing::debug;

use super::{AuthorAffiliation, ReferenceStore};
use crate::domain::{ReferenceRecord, WorkKey};
use crate::error::{LinkError, Result, StoreError};

/// Table holding the reference corpus
pub const REFERENCE_TABLE: &str = "author_references";

/// Bound parameters per `IN (...)` query
const IN_CLAUSE_BATCH: usize = 500;

// Identifiers are read as text whatever the declared column type
const RECORD_COLUMNS: &str = "CAST(work_id AS TEXT), CAST(doi AS TEXT), author_name, \
     normalized_author_name, affiliation_name, normalized_affiliation_name, \
     normalized_affiliation_key, affiliation_ror";

/// Read-only view of a pre-built reference database.
pub struct SqliteReferenceStore {
    conn: Connection,
}

impl SqliteReferenceStore {
    /// Open an existing database read-only.
    ///
    /// A missing file or a database without the reference table is a
    /// [`LinkError::MissingResource`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LinkError::MissingResource(format!(
                "reference database not found: {}",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::from_connection(conn)
    }

    /// Wrap an existing connection, checking the reference table exists
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            [REFERENCE_TABLE],
            |row| row.get(0),
        )?;

        if exists == 0 {
            return Err(LinkError::MissingResource(format!(
                "reference database has no '{}' table",
                REFERENCE_TABLE
            )));
        }

        Ok(Self { conn })
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ReferenceRecord> {
        Ok(ReferenceRecord {
            work_id: non_blank(row.get(0)?),
            doi: non_blank(row.get(1)?),
            author_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            normalized_author_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            affiliation_name: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            normalized_affiliation_name: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            normalized_affiliation_key: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            affiliation_ror: non_blank(row.get(7)?),
        })
    }

    fn query_records<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> std::result::Result<Vec<ReferenceRecord>, StoreError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let records = stmt
            .query_map(params, Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ReferenceStore for SqliteReferenceStore {
    fn authors_for_work(
        &self,
        key: &WorkKey,
    ) -> std::result::Result<Vec<AuthorAffiliation>, StoreError> {
        if key.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT author_name, COALESCE(normalized_affiliation_name, '') \
             FROM {REFERENCE_TABLE} \
             WHERE (doi = ?1 OR work_id = ?2) \
               AND author_name IS NOT NULL AND TRIM(author_name) <> '' \
             ORDER BY 1, 2"
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let pairs = stmt
            .query_map(rusqlite::params![key.doi, key.work_id], |row| {
                Ok(AuthorAffiliation {
                    author_name: row.get(0)?,
                    affiliation: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(doi = ?key.doi, work_id = ?key.work_id, candidates = pairs.len(), "Fetched authors");
        Ok(pairs)
    }

    fn records_by_affiliation_key(
        &self,
        key: &str,
    ) -> std::result::Result<Vec<ReferenceRecord>, StoreError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM {REFERENCE_TABLE} WHERE normalized_affiliation_key = ?1"
        );
        self.query_records(&sql, [key])
    }

    fn records_containing(
        &self,
        entity_key: &str,
        org_names: &[String],
    ) -> std::result::Result<Vec<ReferenceRecord>, StoreError> {
        if org_names.is_empty() {
            return Ok(Vec::new());
        }

        let org_clause = (0..org_names.len())
            .map(|i| format!("instr(normalized_affiliation_key, ?{}) > 0", i + 2))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM {REFERENCE_TABLE} \
             WHERE instr(normalized_affiliation_key, ?1) > 0 AND ({org_clause})"
        );

        let params = std::iter::once(entity_key).chain(org_names.iter().map(String::as_str));
        self.query_records(&sql, params_from_iter(params))
    }

    fn original_affiliation_names(
        &self,
        normalized: &[String],
    ) -> std::result::Result<HashMap<String, String>, StoreError> {
        let mut originals = HashMap::new();

        for batch in normalized.chunks(IN_CLAUSE_BATCH) {
            let placeholders = vec!["?"; batch.len()].join(", ");
            let sql = format!(
                "SELECT normalized_affiliation_name, MIN(affiliation_name) \
                 FROM {REFERENCE_TABLE} \
                 WHERE normalized_affiliation_name IN ({placeholders}) \
                   AND affiliation_name IS NOT NULL \
                 GROUP BY normalized_affiliation_name"
            );

            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(batch.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (normalized_name, original) = row?;
                originals.insert(normalized_name, original);
            }
        }

        Ok(originals)
    }

    fn record_count(&self) -> std::result::Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {REFERENCE_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
