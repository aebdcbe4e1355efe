use super::{unix_millis, LeadStore, StoreError};
use crate::config::StoreConfig;
use async_trait::async_trait;
use funil_model::{Lead, LeadCompany, LeadEmail, LeadId, LeadName, LeadPhone, NewLead};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::info;

pub const SQLITE_SCHEMA_VERSION: i64 = 1;

/// SQLite-backed lead store. One connection guarded by an async mutex;
/// every write runs inside a transaction so a failed insert leaves no row
/// behind. The connection closes when the store is dropped after shutdown.
pub struct SqliteLeadStore {
    conn: Mutex<Connection>,
}

impl SqliteLeadStore {
    pub fn open(cfg: &StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = cfg.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError(e.to_string()))?;
            }
        }
        let conn = Connection::open(&cfg.db_path).map_err(|e| StoreError(e.to_string()))?;
        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA busy_timeout={};",
            cfg.busy_timeout.as_millis()
        ))
        .map_err(|e| StoreError(e.to_string()))?;
        Self::migrate(&conn)?;
        info!(path = %cfg.db_path.display(), "lead store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database for tests that do not want a file on disk.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError(e.to_string()))?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn migrate(conn: &Connection) -> Result<(), StoreError> {
        // AUTOINCREMENT keeps identifiers strictly increasing for the
        // lifetime of the database, not merely unique.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS leads (
               id INTEGER PRIMARY KEY AUTOINCREMENT,
               name TEXT NOT NULL,
               phone TEXT NOT NULL,
               email TEXT NOT NULL,
               company TEXT,
               created_at_ms INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS funil_meta (
               k TEXT PRIMARY KEY,
               v TEXT NOT NULL
             ) WITHOUT ROWID;",
        )
        .map_err(|e| StoreError(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO funil_meta (k, v) VALUES ('schema_version', ?1)",
            params![SQLITE_SCHEMA_VERSION.to_string()],
        )
        .map_err(|e| StoreError(e.to_string()))?;
        conn.execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(())
    }
}

fn row_to_lead(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, String, String, Option<String>, i64)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn decode_lead(
    (id, name, phone, email, company, created_at_ms): (i64, String, String, String, Option<String>, i64),
) -> Result<Lead, StoreError> {
    Ok(Lead {
        id: LeadId::new(id).map_err(|e| StoreError(e.0))?,
        name: LeadName::parse(&name).map_err(|e| StoreError(e.0))?,
        phone: LeadPhone::parse(&phone).map_err(|e| StoreError(e.0))?,
        email: LeadEmail::parse(&email).map_err(|e| StoreError(e.0))?,
        company: match company {
            Some(c) => LeadCompany::parse_optional(&c).map_err(|e| StoreError(e.0))?,
            None => None,
        },
        created_at_unix_ms: created_at_ms,
    })
}

#[async_trait]
impl LeadStore for SqliteLeadStore {
    async fn insert_lead(&self, lead: NewLead) -> Result<Lead, StoreError> {
        let created_at_ms = unix_millis();
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(|e| StoreError(e.to_string()))?;
        tx.execute(
            "INSERT INTO leads (name, phone, email, company, created_at_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                lead.name.as_str(),
                lead.phone.as_str(),
                lead.email.as_str(),
                lead.company.as_ref().map(LeadCompany::as_str),
                created_at_ms
            ],
        )
        .map_err(|e| StoreError(e.to_string()))?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(|e| StoreError(e.to_string()))?;
        Ok(Lead {
            id: LeadId::new(id).map_err(|e| StoreError(e.0))?,
            name: lead.name,
            phone: lead.phone,
            email: lead.email,
            company: lead.company,
            created_at_unix_ms: created_at_ms,
        })
    }

    async fn fetch_lead(&self, id: LeadId) -> Result<Option<Lead>, StoreError> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, name, phone, email, company, created_at_ms
                 FROM leads WHERE id = ?1",
                params![id.as_i64()],
                row_to_lead,
            )
            .optional()
            .map_err(|e| StoreError(e.to_string()))?;
        row.map(decode_lead).transpose()
    }

    async fn lead_count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funil_model::LeadDraft;

    fn new_lead(name: &str) -> NewLead {
        LeadDraft {
            name: Some(name.to_string()),
            phone: Some("+55 11 91234-5678".to_string()),
            email: Some("lead@example.com".to_string()),
            company: Some("ACME".to_string()),
        }
        .validate()
        .expect("valid draft")
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_round_trips() {
        let store = SqliteLeadStore::open_in_memory().expect("open");
        let first = store.insert_lead(new_lead("Ana")).await.expect("insert");
        let second = store.insert_lead(new_lead("Bia")).await.expect("insert");
        assert!(second.id.as_i64() > first.id.as_i64());
        assert!(first.created_at_unix_ms > 0);

        let fetched = store
            .fetch_lead(first.id)
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched, first);
        assert_eq!(store.lead_count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn fetch_of_unknown_id_is_none() {
        let store = SqliteLeadStore::open_in_memory().expect("open");
        let missing = store
            .fetch_lead(LeadId::new(99).expect("id"))
            .await
            .expect("fetch");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_store() {
        let store = SqliteLeadStore::open_in_memory().expect("open");
        store.ping().await.expect("ping");
    }
}
