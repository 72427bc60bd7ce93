use crate::domain::model::{ContactFilter, ContactPatch, ContactRecord};
use crate::domain::ports::ContactStore;
use crate::utils::error::{ContactError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The contact collection keyed by id. Shared by the in-memory and file stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ContactRecord>", into = "Vec<ContactRecord>")]
pub(crate) struct ContactTable {
    rows: HashMap<Uuid, ContactRecord>,
}

impl From<Vec<ContactRecord>> for ContactTable {
    fn from(records: Vec<ContactRecord>) -> Self {
        Self {
            rows: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }
}

impl From<ContactTable> for Vec<ContactRecord> {
    fn from(table: ContactTable) -> Self {
        let mut records: Vec<ContactRecord> = table.rows.into_values().collect();
        sort_records(&mut records);
        records
    }
}

fn sort_records(records: &mut [ContactRecord]) {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

impl ContactTable {
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn insert(&mut self, record: ContactRecord) -> Result<()> {
        if self.rows.contains_key(&record.id) {
            return Err(ContactError::store(format!("duplicate contact id {}", record.id)));
        }
        self.rows.insert(record.id, record);
        Ok(())
    }

    /// All-or-nothing: ids are checked before anything is written.
    pub(crate) fn insert_all(&mut self, records: Vec<ContactRecord>) -> Result<usize> {
        let mut incoming = std::collections::HashSet::with_capacity(records.len());
        for record in &records {
            if self.rows.contains_key(&record.id) || !incoming.insert(record.id) {
                return Err(ContactError::store(format!("duplicate contact id {}", record.id)));
            }
        }

        let count = records.len();
        self.rows.extend(records.into_iter().map(|r| (r.id, r)));
        Ok(count)
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<ContactRecord> {
        self.rows.get(&id).cloned()
    }

    pub(crate) fn filter(&self, filter: &ContactFilter) -> Vec<ContactRecord> {
        let mut records: Vec<ContactRecord> = self
            .rows
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_records(&mut records);
        records
    }

    pub(crate) fn update(&mut self, id: Uuid, patch: &ContactPatch) -> Option<ContactRecord> {
        let record = self.rows.get_mut(&id)?;
        patch.apply(record);
        Some(record.clone())
    }

    pub(crate) fn remove(&mut self, id: Uuid) -> bool {
        self.rows.remove(&id).is_some()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    table: RwLock<ContactTable>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert_one(&self, record: ContactRecord) -> Result<ContactRecord> {
        self.table.write().await.insert(record.clone())?;
        Ok(record)
    }

    async fn insert_many(&self, records: Vec<ContactRecord>) -> Result<usize> {
        self.table.write().await.insert_all(records)
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<ContactRecord>> {
        Ok(self.table.read().await.get(id))
    }

    async fn find_many(&self, filter: &ContactFilter) -> Result<Vec<ContactRecord>> {
        Ok(self.table.read().await.filter(filter))
    }

    async fn update_one(&self, id: Uuid, patch: &ContactPatch) -> Result<Option<ContactRecord>> {
        Ok(self.table.write().await.update(id, patch))
    }

    async fn delete_one(&self, id: Uuid) -> Result<bool> {
        Ok(self.table.write().await.remove(id))
    }
}
