use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::services::cache::{CacheError, CacheKey, CacheManager};

/// Largest number of texts the Cohere embed endpoint accepts per call
pub const COHERE_MAX_BATCH: usize = 96;

/// Errors that can occur when requesting embeddings
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Embedding API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized: invalid embedding API key")]
    Unauthorized,

    #[error("Rate limited by embedding API")]
    RateLimited,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of embedding vectors
///
/// Implementations return exactly one vector per input text, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model name, used in cache keys and health output
    fn model(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
    model: &'a str,
    input_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Cohere embed API client
pub struct CohereClient {
    base_url: String,
    api_key: String,
    model: String,
    input_type: String,
    batch_size: usize,
    client: Client,
}

impl CohereClient {
    /// Create a new Cohere client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        input_type: String,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            input_type,
            batch_size: COHERE_MAX_BATCH,
            client,
        })
    }

    /// Override the number of texts sent per request (clamped to 1..=96)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, COHERE_MAX_BATCH);
        self
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embed", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                texts,
                model: &self.model,
                input_type: &self.input_type,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbeddingError::Unauthorized,
                StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited,
                _ => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unable to read body".to_string());
                    tracing::error!("Embedding request failed: {} - {}", status, body);
                    EmbeddingError::ApiError {
                        status: status.as_u16(),
                        message: body,
                    }
                }
            });
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(format!("Failed to parse embeddings: {}", e)))?;

        if body.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                body.embeddings.len()
            )));
        }

        Ok(body.embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for CohereClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(self.embed_batch(batch).await?);
        }

        tracing::debug!(
            "Generated {} embeddings with model {}",
            embeddings.len(),
            self.model
        );

        Ok(embeddings)
    }
}

/// Embedding provider that consults the cache before calling upstream
///
/// Only cache misses are sent to the wrapped provider. Cache failures are
/// logged and treated as misses.
pub struct CachedEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Arc<CacheManager>,
}

impl CachedEmbeddingProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbeddingProvider {
    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = self.inner.model();
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut misses = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            match self.cache.get::<Vec<f32>>(&CacheKey::embedding(model, text)).await {
                Ok(vector) => results.push(Some(vector)),
                Err(CacheError::CacheMiss(_)) => {
                    results.push(None);
                    misses.push(i);
                }
                Err(e) => {
                    tracing::warn!("Embedding cache lookup failed, treating as miss: {}", e);
                    results.push(None);
                    misses.push(i);
                }
            }
        }

        tracing::debug!(
            "Embedding cache: {} hits, {} misses",
            texts.len() - misses.len(),
            misses.len()
        );

        if !misses.is_empty() {
            let miss_texts: Vec<String> = misses.iter().map(|&i| texts[i].clone()).collect();
            let fetched = self.inner.embed(&miss_texts).await?;

            if fetched.len() != miss_texts.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "Expected {} embeddings, got {}",
                    miss_texts.len(),
                    fetched.len()
                )));
            }

            for (i, vector) in misses.into_iter().zip(fetched) {
                if let Err(e) = self
                    .cache
                    .set(&CacheKey::embedding(model, &texts[i]), &vector)
                    .await
                {
                    tracing::warn!("Failed to cache embedding: {}", e);
                }
                results[i] = Some(vector);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }
}
