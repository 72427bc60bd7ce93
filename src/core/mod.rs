pub mod contacts;
pub mod import;
pub mod upload;

pub use crate::domain::model::{ContactRecord, ImportSummary, RowError};
pub use crate::domain::ports::{ChunkSource, ContactStore, IdentityProvider};
pub use crate::utils::error::Result;
