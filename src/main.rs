use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use diversity_pairing::config::{LoggingSettings, Settings};
use diversity_pairing::core::DiversityMatcher;
use diversity_pairing::routes::{self, AppState};
use diversity_pairing::services::{
    CacheManager, CachedEmbeddingProvider, CohereClient, EmbeddingProvider, InMemoryUserStore,
    PostgresClient, UserStore,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting diversity pairing service...");

    // Embedding provider behind the two-tier cache
    let cohere = CohereClient::new(
        settings.embedding.endpoint.clone(),
        settings.embedding.api_key.clone(),
        settings.embedding.model.clone(),
        settings.embedding.input_type.clone(),
        Duration::from_secs(settings.embedding.timeout_secs.unwrap_or(30)),
    )
    .map_err(|e| startup_error("Failed to create embedding client", e))?;
    let cohere = match settings.embedding.batch_size {
        Some(batch_size) => cohere.with_batch_size(batch_size),
        None => cohere,
    };

    if settings.embedding.api_key.is_empty() {
        warn!("No embedding API key configured; embedding requests will be rejected upstream");
    }

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(86_400);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(10_000);

    let cache = match settings.cache.redis_url.as_deref() {
        Some(redis_url) => match CacheManager::new(redis_url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized with Redis (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), running with in-memory cache only", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => {
            info!("Cache manager initialized in-memory (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            CacheManager::in_memory(l1_cache_size, cache_ttl)
        }
    };

    let embeddings: Arc<dyn EmbeddingProvider> =
        Arc::new(CachedEmbeddingProvider::new(Arc::new(cohere), Arc::new(cache)));

    info!("Embedding provider initialized (model: {})", embeddings.model());

    // User store
    let store: Arc<dyn UserStore> = match settings.database.url.as_deref() {
        Some(url) => {
            let postgres = PostgresClient::from_settings(
                url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!(
                "PostgreSQL user store initialized (max: {} connections)",
                settings.database.max_connections.unwrap_or(10)
            );
            Arc::new(postgres)
        }
        None => {
            warn!("No database URL configured, users are kept in memory");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let matcher = DiversityMatcher::new(settings.pairing.max_profiles);

    info!("Matcher initialized (max profiles: {})", matcher.max_profiles());

    let app_state = AppState {
        embeddings,
        store,
        matcher,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors)
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
