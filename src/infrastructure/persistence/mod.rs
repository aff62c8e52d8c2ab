mod pg_pool;
mod repositories;
mod storage_factory;

pub use repositories::InMemoryConversationRepository;
pub use repositories::PgConversationRepository;
pub use storage_factory::{Storage, StorageFactory};

pub use pg_pool::create_pool;
