//! Vector index of course embeddings
//!
//! Course documents are embedded once at startup and written to every
//! configured index. The in-memory index is always populated; when Chroma is
//! configured and reachable it serves queries first, and any Chroma failure
//! falls through to the in-memory scan.

pub mod chroma;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
pub use chroma::ChromaVectorStore;
pub use memory::cosine_similarity;
pub use memory::InMemoryVectorStore;
use tokio::sync::RwLock;
use tracing::info;
use tracing::warn;

use crate::catalog::CourseCatalog;
use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::errors::RecommenderError;
use crate::errors::Result;
use crate::models::ScoredDocument;
use crate::models::ServiceStatus;
use crate::models::VectorDocument;

/// Nearest-neighbour index over course documents
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Prepare the index for use
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, documents: Vec<VectorDocument>) -> Result<()>;

    /// Hits with similarity at or above `threshold`, best first, at most `limit`
    async fn query(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>>;

    async fn count(&self) -> Result<usize>;

    fn name(&self) -> &'static str;
}

/// Readiness reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexHealth {
    /// Embedding model readiness
    pub models: ServiceStatus,
    pub vector_store: ServiceStatus,
}

pub struct VectorStoreService {
    embedder: Arc<dyn Embedder>,
    primary: Option<Arc<dyn VectorIndex>>,
    memory: Arc<InMemoryVectorStore>,
    primary_active: RwLock<bool>,
    health: RwLock<IndexHealth>,
}

impl VectorStoreService {
    pub fn new(embedder: Arc<dyn Embedder>, primary: Option<Arc<dyn VectorIndex>>) -> Self {
        Self {
            embedder,
            primary,
            memory: Arc::new(InMemoryVectorStore::new()),
            primary_active: RwLock::new(false),
            health: RwLock::new(IndexHealth::default()),
        }
    }

    /// In-memory index only
    pub fn in_memory(embedder: Arc<dyn Embedder>) -> Self {
        Self::new(embedder, None)
    }

    /// Build from configuration; Chroma is used when the backend says so
    pub fn from_config(config: &AppConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let primary: Option<Arc<dyn VectorIndex>> = if config.vector_store.uses_chroma() {
            Some(Arc::new(ChromaVectorStore::new(&config.vector_store)?))
        } else {
            None
        };
        Ok(Self::new(embedder, primary))
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Embed and index every catalog course; returns the number indexed
    pub async fn initialize(&self, catalog: &CourseCatalog) -> Result<usize> {
        *self.health.write().await = IndexHealth::default();

        let mut documents: Vec<VectorDocument> =
            catalog.all().iter().map(VectorDocument::from_course).collect();
        let contents: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();

        let embeddings = match self.embedder.embed_batch(&contents).await {
            Ok(embeddings) if embeddings.len() == documents.len() => embeddings,
            Ok(embeddings) => {
                self.mark_failed().await;
                return Err(RecommenderError::EmbeddingError(format!(
                    "Expected {} embeddings, got {}",
                    documents.len(),
                    embeddings.len()
                )));
            }
            Err(e) => {
                self.mark_failed().await;
                return Err(e);
            }
        };
        self.health.write().await.models = ServiceStatus::Ready;

        for (document, embedding) in documents.iter_mut().zip(embeddings) {
            document.embedding = embedding;
        }

        if let Some(primary) = &self.primary {
            let indexed = async {
                primary.connect().await?;
                primary.upsert(documents.clone()).await
            }
            .await;

            match indexed {
                Ok(()) => {
                    *self.primary_active.write().await = true;
                    info!("📦 Indexed {} courses in {}", documents.len(), primary.name());
                }
                Err(e) => {
                    warn!(
                        "⚠️ {} unavailable, using in-memory vector store: {}",
                        primary.name(),
                        e
                    );
                }
            }
        }

        let count = documents.len();
        self.memory.upsert(documents).await?;
        self.health.write().await.vector_store = ServiceStatus::Ready;
        info!("📦 Indexed {} courses in memory", count);

        Ok(count)
    }

    async fn mark_failed(&self) {
        *self.health.write().await = IndexHealth {
            models: ServiceStatus::Error,
            vector_store: ServiceStatus::Error,
        };
    }

    /// Query by embedding, preferring the primary index
    pub async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        if *self.primary_active.read().await {
            if let Some(primary) = &self.primary {
                match primary.query(embedding, limit, threshold).await {
                    Ok(hits) => return Ok(hits),
                    Err(e) => warn!(
                        "⚠️ {} query failed, using in-memory vector store: {}",
                        primary.name(),
                        e
                    ),
                }
            }
        }

        self.memory.query(embedding, limit, threshold).await
    }

    /// Embed free text and query
    pub async fn search_text(
        &self,
        text: &str,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        let embedding = self.embedder.embed(text).await?;
        self.search(&embedding, limit, threshold).await
    }

    pub async fn health(&self) -> IndexHealth {
        *self.health.read().await
    }

    /// Name of the index currently answering queries
    pub async fn active_backend(&self) -> &'static str {
        let primary_active = *self.primary_active.read().await;
        match &self.primary {
            Some(primary) if primary_active => primary.name(),
            _ => self.memory.name(),
        }
    }

    pub async fn count(&self) -> Result<usize> {
        self.memory.count().await
    }
}
