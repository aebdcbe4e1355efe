use async_trait::async_trait;
use funil_model::{Lead, LeadId, NewLead};

pub mod fake;
pub mod sqlite;

pub use fake::FakeLeadStore;
pub use sqlite::SqliteLeadStore;

#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

/// Persistence seam for leads. Constructed once at startup and injected into
/// handlers through `AppState`; handlers never reach for ambient storage.
#[async_trait]
pub trait LeadStore: Send + Sync + 'static {
    /// Persists a validated lead atomically and returns the stored record
    /// with its assigned identifier and creation timestamp. On failure
    /// nothing is persisted.
    async fn insert_lead(&self, lead: NewLead) -> Result<Lead, StoreError>;

    async fn fetch_lead(&self, id: LeadId) -> Result<Option<Lead>, StoreError>;

    async fn lead_count(&self) -> Result<u64, StoreError>;

    /// Cheap reachability probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

pub(crate) fn unix_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}
