// Adapters layer: concrete implementations of the domain ports.

pub mod file_store;
pub mod memory_store;
pub mod supabase;

pub use file_store::JsonFileContactStore;
pub use memory_store::InMemoryContactStore;
pub use supabase::SupabaseAuth;
