pub mod file;
pub mod memory;
pub mod redis;
pub mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use store::{PreferenceStore, StoreAdapter, StoreKey};
