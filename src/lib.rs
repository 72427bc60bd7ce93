pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{InMemoryContactStore, JsonFileContactStore, SupabaseAuth};
pub use app::{router, AppState};
pub use config::{CliArgs, Settings};
pub use crate::core::{contacts::ContactService, import::ImportPipeline};
pub use utils::error::{ContactError, Result};
