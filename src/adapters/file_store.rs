use crate::adapters::memory_store::ContactTable;
use crate::domain::model::{ContactFilter, ContactPatch, ContactRecord};
use crate::domain::ports::ContactStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Contact collection persisted as a single JSON document.
///
/// Every write stages the next table, saves it, then swaps it in, so a
/// failed save leaves both the file and the in-memory view unchanged.
#[derive(Debug)]
pub struct JsonFileContactStore {
    path: PathBuf,
    table: RwLock<ContactTable>,
}

impl JsonFileContactStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let table = match tokio::fs::read(&path).await {
            Ok(data) if data.iter().all(u8::is_ascii_whitespace) => ContactTable::default(),
            Ok(data) => serde_json::from_slice(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ContactTable::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "Opened contact store {} ({} records)",
            path.display(),
            table.len()
        );
        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, table: &ContactTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(table)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &data).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        tracing::debug!("Saved {} contacts to {}", table.len(), self.path.display());
        Ok(())
    }

    async fn mutate<T>(&self, change: impl FnOnce(&mut ContactTable) -> Result<T>) -> Result<T> {
        let mut guard = self.table.write().await;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        self.save(&next).await?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl ContactStore for JsonFileContactStore {
    async fn insert_one(&self, record: ContactRecord) -> Result<ContactRecord> {
        let stored = record.clone();
        self.mutate(move |table| table.insert(record)).await?;
        Ok(stored)
    }

    async fn insert_many(&self, records: Vec<ContactRecord>) -> Result<usize> {
        self.mutate(move |table| table.insert_all(records)).await
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<ContactRecord>> {
        Ok(self.table.read().await.get(id))
    }

    async fn find_many(&self, filter: &ContactFilter) -> Result<Vec<ContactRecord>> {
        Ok(self.table.read().await.filter(filter))
    }

    async fn update_one(&self, id: Uuid, patch: &ContactPatch) -> Result<Option<ContactRecord>> {
        if self.table.read().await.get(id).is_none() {
            return Ok(None);
        }
        self.mutate(|table| Ok(table.update(id, patch))).await
    }

    async fn delete_one(&self, id: Uuid) -> Result<bool> {
        if self.table.read().await.get(id).is_none() {
            return Ok(false);
        }
        self.mutate(|table| Ok(table.remove(id))).await
    }
}
