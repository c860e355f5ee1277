// Service exports
pub mod cache;
pub mod embedding;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use embedding::{CachedEmbeddingProvider, CohereClient, EmbeddingError, EmbeddingProvider, COHERE_MAX_BATCH};
pub use postgres::PostgresClient;
pub use store::{InMemoryUserStore, StoreError, UserStore};
