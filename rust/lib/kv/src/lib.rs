pub mod error;
pub mod memory;
pub mod redb;
pub mod traits;
pub mod upstash;

pub use error::KVError;
pub use memory::MemoryStore;
pub use redb::RedbStore;
pub use traits::KVStore;
pub use upstash::{UpstashConfig, UpstashStore};
