pub mod filter;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

pub use filter::IdFilter;
pub use memory::InMemoryStore;
pub use postgres::{create_pool, PgStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use store::MovieStore;

#[cfg(test)]
pub use store::MockMovieStore;
