//! SQLite staging store for annotation files
//!
//! A whole annotation file is bulk-loaded into one table, committing every
//! `batch_size` rows, and indexed on `seqname` once loading is done. After
//! that the store is only read. Raw attribute text is stored as-is and parsed
//! when features are queried.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};

use super::{chromosome_aliases, AnnotationSource};
use crate::error::{ChunkError, ChunkResult};
use crate::feature::SourceKind;
use crate::io::{GffReader, GffRecord};
use crate::types::*;

/// Rows per committed transaction during bulk loading.
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

const COLUMNS: &str = r#"seqname, source, feature, start, "end", score, strand, frame, attributes"#;

pub struct SqliteSource {
    name: String,
    kind: SourceKind,
    db_path: PathBuf,
    connection: Connection,
}

impl SqliteSource {
    /// Stage `input` into a fresh database at `db_path`.
    ///
    /// An existing file at `db_path` is removed first.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        kind: SourceKind,
        input: P,
        db_path: Q,
        batch_size: usize,
    ) -> ChunkResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if db_path.exists() {
            std::fs::remove_file(&db_path)?;
        }
        log::info!(
            "Staging {} features from {} into {}",
            kind,
            input.as_ref().display(),
            db_path.display()
        );

        let mut connection = Connection::open(&db_path)?;
        Self::create_table(&connection, kind)?;
        let records = GffReader::from_path(&input)?;
        let rows = Self::insert_records(&mut connection, kind, records, batch_size.max(1))?;
        Self::create_index(&connection, kind)?;
        log::info!("Staged {} rows into {}", rows, kind.table_name());

        Ok(Self {
            name: kind.tag().to_string(),
            kind,
            db_path,
            connection,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn row_count(&self) -> ChunkResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.kind.table_name());
        let count: i64 = self.connection.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn create_table(connection: &Connection, kind: SourceKind) -> rusqlite::Result<()> {
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                seqname TEXT,
                source TEXT,
                feature TEXT,
                start INTEGER,
                "end" INTEGER,
                score TEXT,
                strand TEXT,
                frame TEXT,
                attributes TEXT
            )"#,
            kind.table_name()
        );
        connection.execute(&sql, ())?;
        Ok(())
    }

    fn insert_records<R: std::io::BufRead>(
        connection: &mut Connection,
        kind: SourceKind,
        mut records: GffReader<R>,
        batch_size: usize,
    ) -> ChunkResult<u64> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            kind.table_name(),
            COLUMNS
        );

        let mut total = 0u64;
        loop {
            let transaction = connection.transaction()?;
            let mut inserted = 0usize;
            {
                let mut insert = transaction.prepare_cached(&sql)?;
                while inserted < batch_size {
                    let record = match records.next() {
                        Some(record) => record?,
                        None => break,
                    };
                    insert.execute(params![
                        record.seqname,
                        record.source,
                        record.feature,
                        record.start as i64,
                        record.end as i64,
                        record.score,
                        record.strand,
                        record.frame,
                        record.attributes,
                    ])?;
                    inserted += 1;
                }
            }
            transaction.commit()?;
            total += inserted as u64;

            if inserted < batch_size {
                break;
            }
            log::debug!("Committed {} rows into {}", total, kind.table_name());
        }

        Ok(total)
    }

    fn create_index(connection: &Connection, kind: SourceKind) -> rusqlite::Result<()> {
        log::debug!("Creating seqname index on {}", kind.table_name());
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {table}_seqname_idx ON {table}(seqname)",
            table = kind.table_name()
        );
        connection.execute(&sql, ())?;
        Ok(())
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<GffRecord> {
        let start: i64 = row.get(3)?;
        let end: i64 = row.get(4)?;
        Ok(GffRecord {
            seqname: row.get(0)?,
            source: row.get(1)?,
            feature: row.get(2)?,
            start: start.max(0) as GenomicPos,
            end: end.max(0) as GenomicPos,
            score: row.get(5)?,
            strand: row.get(6)?,
            frame: row.get(7)?,
            attributes: row.get(8)?,
        })
    }

    fn query_features<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> ChunkResult<Vec<Feature>> {
        let mut statement = self.connection.prepare_cached(sql)?;
        let records = statement
            .query_map(params, Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        records
            .iter()
            .map(|record| self.kind.extract(record))
            .collect()
    }
}

impl AnnotationSource for SqliteSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_chromosomes(&self) -> ChunkResult<BTreeSet<String>> {
        let sql = format!("SELECT DISTINCT seqname FROM {}", self.kind.table_name());
        let mut statement = self.connection.prepare(&sql)?;
        let labels = statement
            .query_map([], |row| row.get::<_, Option<String>>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(ChunkError::from)?;
        Ok(labels
            .into_iter()
            .map(|label| label.unwrap_or_default().trim().to_string())
            .collect())
    }

    fn features_for_chromosome(&self, chromosome: &str) -> ChunkResult<Vec<Feature>> {
        let (bare, prefixed) = chromosome_aliases(chromosome);
        let sql = format!(
            "SELECT {} FROM {} WHERE seqname = ?1 OR seqname = ?2 ORDER BY rowid",
            COLUMNS,
            self.kind.table_name()
        );
        self.query_features(&sql, params![bare, prefixed])
    }

    fn features_in_range(
        &self,
        chromosome: &str,
        start: GenomicPos,
        end: GenomicPos,
    ) -> ChunkResult<Vec<Feature>> {
        let (bare, prefixed) = chromosome_aliases(chromosome);
        let sql = format!(
            r#"SELECT {} FROM {}
               WHERE (seqname = ?1 OR seqname = ?2) AND start <= ?3 AND "end" >= ?4
               ORDER BY rowid"#,
            COLUMNS,
            self.kind.table_name()
        );
        self.query_features(&sql, params![bare, prefixed, end as i64, start as i64])
    }
}
