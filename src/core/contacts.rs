use crate::domain::model::{ContactFilter, ContactKey, ContactPatch, ContactRecord, NewContact};
use crate::domain::ports::ContactStore;
use crate::utils::error::{ContactError, Result};
use std::sync::Arc;

/// Single-record operations over the contact store.
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn ContactStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, contact: NewContact, owner: Option<&str>) -> Result<ContactRecord> {
        let record = contact.into_record(owner)?;
        let record = self.store.insert_one(record).await?;
        tracing::info!("Created contact {}", record.id);
        Ok(record)
    }

    /// Looks up a contact by id, or by name when the name is unique.
    pub async fn get(&self, key: &ContactKey) -> Result<ContactRecord> {
        match key {
            ContactKey::Id(id) => self
                .store
                .find_one(*id)
                .await?
                .ok_or_else(|| ContactError::not_found(key)),
            ContactKey::Name(name) => {
                let mut matches = self.store.find_many(&ContactFilter::by_name(name)).await?;
                match matches.len() {
                    0 => Err(ContactError::not_found(key)),
                    1 => Ok(matches.remove(0)),
                    count => Err(ContactError::AmbiguousKey {
                        name: name.clone(),
                        matches: count,
                    }),
                }
            }
        }
    }

    pub async fn list(&self, filter: &ContactFilter) -> Result<Vec<ContactRecord>> {
        self.store.find_many(filter).await
    }

    pub async fn update(&self, key: &ContactKey, patch: &ContactPatch) -> Result<ContactRecord> {
        patch.validate()?;
        let current = self.get(key).await?;

        let updated = self
            .store
            .update_one(current.id, patch)
            .await?
            .ok_or_else(|| ContactError::not_found(key))?;

        tracing::info!("Updated contact {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, key: &ContactKey) -> Result<ContactRecord> {
        let current = self.get(key).await?;

        if !self.store.delete_one(current.id).await? {
            return Err(ContactError::not_found(key));
        }

        tracing::info!("Deleted contact {}", current.id);
        Ok(current)
    }
}
