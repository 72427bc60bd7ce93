use crate::domain::model::{
    AuthSession, AuthUser, ContactFilter, ContactPatch, ContactRecord, SignUpRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

/// Document store holding the contact collection.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_one(&self, record: ContactRecord) -> Result<ContactRecord>;

    /// Inserts every record or none of them.
    async fn insert_many(&self, records: Vec<ContactRecord>) -> Result<usize>;

    async fn find_one(&self, id: Uuid) -> Result<Option<ContactRecord>>;

    async fn find_many(&self, filter: &ContactFilter) -> Result<Vec<ContactRecord>>;

    async fn update_one(&self, id: Uuid, patch: &ContactPatch) -> Result<Option<ContactRecord>>;

    async fn delete_one(&self, id: Uuid) -> Result<bool>;
}

/// Upstream identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthUser>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    async fn get_user(&self, token: &str) -> Result<AuthUser>;
}

/// Incremental byte source for an uploaded file.
#[async_trait]
pub trait ChunkSource: Send {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}
