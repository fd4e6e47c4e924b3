//! Record store for translation rows

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::translation::error::StoreError;
use crate::translation::types::{ProjectType, TranslationRecord, VersionCandidate};

/// Source of candidate translation records
#[cfg_attr(test, automock)]
pub trait RecordStore: Send + Sync {
    /// All active records for a project, across every language
    fn active_records(
        &self,
        project_type: ProjectType,
        domain: &str,
    ) -> Result<Vec<TranslationRecord>, StoreError>;

    /// Every record for one language of a project, active or not
    fn language_records(
        &self,
        project_type: ProjectType,
        domain: &str,
        language: &str,
    ) -> Result<Vec<VersionCandidate>, StoreError>;
}

/// Schema migrations
/// Each version contains a list of SQL statements to execute
const MIGRATIONS: &[&[&str]] = &[
    // v1: active flag
    &["ALTER TABLE language_packs ADD COLUMN active INTEGER NOT NULL DEFAULT 1"],
    // v2: single-language lookups
    &[
        "CREATE INDEX IF NOT EXISTS idx_language_packs_language ON language_packs(type, domain, language)",
    ],
];

/// SQLite-backed record store over a `language_packs` table
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        info!("Opening record store at {:?}", db_path);
        Self::with_connection(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating record store schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS language_packs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                domain TEXT NOT NULL,
                language TEXT NOT NULL,
                version TEXT NOT NULL,
                updated TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_language_packs_domain ON language_packs(type, domain)",
            [],
        )?;

        Self::apply_migrations(&conn)?;
        Ok(())
    }

    /// Apply pending migrations based on user_version pragma
    fn apply_migrations(conn: &Connection) -> Result<(), StoreError> {
        let current_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        for (i, statements) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                for sql in *statements {
                    match conn.execute(sql, []) {
                        Ok(_) => {}
                        Err(rusqlite::Error::SqliteFailure(_, Some(ref msg)))
                            if msg.contains("duplicate column name") =>
                        {
                            debug!("Column already exists, skipping: {}", sql);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                debug!("Applied migration v{}", version);
            }
        }

        let target_version = MIGRATIONS.len() as i32;
        if target_version > current_version {
            conn.pragma_update(None, "user_version", target_version)?;
        }

        Ok(())
    }

    /// Insert a translation record
    pub fn insert_record(
        &self,
        project_type: ProjectType,
        domain: &str,
        record: &TranslationRecord,
        active: bool,
    ) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO language_packs (type, domain, language, version, updated, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            (
                project_type.as_str(),
                domain,
                &record.language,
                &record.version,
                &record.updated,
                active,
            ),
        )?;
        Ok(())
    }

    /// Insert many records in one transaction. Nothing is written when any
    /// insert fails.
    pub fn insert_records<'a>(
        &self,
        rows: impl IntoIterator<Item = (ProjectType, &'a str, &'a TranslationRecord, bool)>,
    ) -> Result<usize, StoreError> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO language_packs (type, domain, language, version, updated, active)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for (project_type, domain, record, active) in rows {
                stmt.execute((
                    project_type.as_str(),
                    domain,
                    &record.language,
                    &record.version,
                    &record.updated,
                    active,
                ))?;
                inserted += 1;
            }
        }

        tx.commit()?;
        debug!("Inserted {} translation records", inserted);
        Ok(inserted)
    }

    /// Flip the active flag of every row matching a language pack.
    /// Returns the number of rows changed.
    pub fn set_active(
        &self,
        project_type: ProjectType,
        domain: &str,
        language: &str,
        version: &str,
        active: bool,
    ) -> Result<usize, StoreError> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE language_packs SET active = ?1
            WHERE type = ?2 AND domain = ?3 AND language = ?4 AND version = ?5
            "#,
            (active, project_type.as_str(), domain, language, version),
        )?;
        Ok(changed)
    }
}

impl RecordStore for SqliteRecordStore {
    fn active_records(
        &self,
        project_type: ProjectType,
        domain: &str,
    ) -> Result<Vec<TranslationRecord>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT language, version, updated FROM language_packs
            WHERE type = ?1 AND domain = ?2 AND active = 1
            ORDER BY id
            "#,
        )?;

        let records = stmt
            .query_map((project_type.as_str(), domain), |row| {
                Ok(TranslationRecord {
                    language: row.get(0)?,
                    version: row.get(1)?,
                    updated: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Found {} active records for {}/{}",
            records.len(),
            project_type,
            domain
        );
        Ok(records)
    }

    fn language_records(
        &self,
        project_type: ProjectType,
        domain: &str,
        language: &str,
    ) -> Result<Vec<VersionCandidate>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT version, updated FROM language_packs
            WHERE type = ?1 AND domain = ?2 AND language = ?3
            ORDER BY id
            "#,
        )?;

        let candidates = stmt
            .query_map((project_type.as_str(), domain, language), |row| {
                Ok(VersionCandidate {
                    version: row.get(0)?,
                    updated: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(candidates)
    }
}
