use super::{unix_millis, LeadStore, StoreError};
use async_trait::async_trait;
use funil_model::{Lead, LeadId, NewLead};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::Mutex;

/// In-memory store for tests: same contract as the SQLite store plus a
/// failure toggle so handlers can be exercised against a broken backend.
pub struct FakeLeadStore {
    leads: Mutex<Vec<Lead>>,
    next_id: AtomicI64,
    pub fail_writes: AtomicBool,
    pub insert_calls: AtomicI64,
}

impl Default for FakeLeadStore {
    fn default() -> Self {
        Self {
            leads: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_writes: AtomicBool::new(false),
            insert_calls: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl LeadStore for FakeLeadStore {
    async fn insert_lead(&self, lead: NewLead) -> Result<Lead, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError("injected write failure".to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = Lead {
            id: LeadId::new(id).map_err(|e| StoreError(e.0))?,
            name: lead.name,
            phone: lead.phone,
            email: lead.email,
            company: lead.company,
            created_at_unix_ms: unix_millis(),
        };
        self.leads.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_lead(&self, id: LeadId) -> Result<Option<Lead>, StoreError> {
        Ok(self
            .leads
            .lock()
            .await
            .iter()
            .find(|lead| lead.id == id)
            .cloned())
    }

    async fn lead_count(&self) -> Result<u64, StoreError> {
        Ok(self.leads.lock().await.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError("injected store outage".to_string()));
        }
        Ok(())
    }
}
