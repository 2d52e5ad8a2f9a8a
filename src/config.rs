use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::errors::RecommenderError;
use crate::errors::Result;

/// Prefix for environment variable overrides, e.g. `RECOMMENDER__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "RECOMMENDER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8003,
            enable_cors: true,
            max_concurrent_requests: 100,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: "logs".to_string(),
            file_output: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in catalog is used when it is missing
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/course-catalog.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    /// `ollama` or `openai`; empty means infer from the endpoint
    pub provider: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            model: "all-minilm".to_string(),
            dimension: 384,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// When disabled, intent parsing always uses the keyword rules
    pub enabled: bool,
    pub llm_endpoint: String,
    pub llm_key: String,
    pub llm_model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            llm_endpoint: "http://localhost:11434".to_string(),
            llm_key: "ollama".to_string(),
            llm_model: "llama3.2".to_string(),
            temperature: 0.2,
            max_tokens: 200,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// `chroma` tries the external database first; `memory` never leaves the process
    pub backend: String,
    pub chroma_host: String,
    pub chroma_port: u16,
    pub collection: String,
    pub timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: "chroma".to_string(),
            chroma_host: "localhost".to_string(),
            chroma_port: 8000,
            collection: "course_embeddings".to_string(),
            timeout_secs: 10,
        }
    }
}

impl VectorStoreConfig {
    pub fn chroma_url(&self) -> String {
        format!("http://{}:{}", self.chroma_host, self.chroma_port)
    }

    pub fn uses_chroma(&self) -> bool {
        self.backend.eq_ignore_ascii_case("chroma")
    }
}

/// Scoring weights and thresholds for the matching pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub max_results: usize,
    pub max_results_limit: usize,
    pub exact_match_threshold: f32,
    /// Threshold used by the pipeline's similarity stage
    pub similarity_threshold: f32,
    /// Threshold used for direct index queries
    pub index_similarity_threshold: f32,
    pub level_weight: f32,
    pub keyword_weight: f32,
    pub price_weight: f32,
    pub feature_weight: f32,
    pub fallback_count: usize,
    pub fallback_confidence: f32,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_results_limit: 20,
            exact_match_threshold: 0.4,
            similarity_threshold: 0.6,
            index_similarity_threshold: 0.7,
            level_weight: 0.4,
            keyword_weight: 0.3,
            price_weight: 0.2,
            feature_weight: 0.1,
            fallback_count: 2,
            fallback_confidence: 0.5,
        }
    }
}

impl RecommendationConfig {
    /// Clamp a caller-supplied result count into `[1, max_results_limit]`
    pub fn clamp_max_results(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.max_results)
            .clamp(1, self.max_results_limit.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Mount the `/api/recommend` route family
    pub enabled: bool,
    pub engine_url: String,
    pub timeout_ms: u64,
    pub health_timeout_ms: u64,
    /// Authoritative catalog for enrichment; defaults to the engine catalog
    pub catalog_path: Option<PathBuf>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine_url: "http://localhost:8003".to_string(),
            timeout_ms: 4000,
            health_timeout_ms: 2000,
            catalog_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub vector_store: VectorStoreConfig,
    pub recommendation: RecommendationConfig,
    pub proxy: ProxyConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default file locations plus environment overrides
    ///
    /// Looks for `config.toml`, then `config.example.toml`; with neither present the
    /// built-in defaults are used. `RECOMMENDER__<SECTION>__<KEY>` variables win over files.
    pub fn load() -> Result<Self> {
        Self::load_layered(None, None)
    }

    /// Load from an explicit file plus environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_layered(Some(path.as_ref()), None)
    }

    /// Layered load; `env` replaces the process environment when given
    pub fn load_layered(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if Path::new("config.toml").exists() {
                    builder = builder.add_source(config::File::from(Path::new("config.toml")));
                } else if Path::new("config.example.toml").exists() {
                    eprintln!(
                        "Warning: Using config.example.toml. Please create config.toml for production use."
                    );
                    builder =
                        builder.add_source(config::File::from(Path::new("config.example.toml")));
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the services cannot start with
    pub fn validate(&self) -> Result<()> {
        for (name, endpoint) in [
            ("embeddings.endpoint", self.embeddings.endpoint.as_str()),
            ("llm.llm_endpoint", self.llm.llm_endpoint.as_str()),
            ("proxy.engine_url", self.proxy.engine_url.as_str()),
        ] {
            Url::parse(endpoint).map_err(|e| {
                RecommenderError::ConfigError(format!("{name} is not a valid URL ({endpoint}): {e}"))
            })?;
        }

        let rec = &self.recommendation;
        for (name, value) in [
            ("exact_match_threshold", rec.exact_match_threshold),
            ("similarity_threshold", rec.similarity_threshold),
            ("index_similarity_threshold", rec.index_similarity_threshold),
            ("fallback_confidence", rec.fallback_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RecommenderError::ConfigError(format!(
                    "recommendation.{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if rec.max_results_limit == 0 || rec.max_results == 0 {
            return Err(RecommenderError::ConfigError(
                "recommendation.max_results and max_results_limit must be positive".to_string(),
            ));
        }

        if rec.fallback_count == 0 {
            return Err(RecommenderError::ConfigError(
                "recommendation.fallback_count must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Catalog used by the proxy for enrichment
    pub fn proxy_catalog_path(&self) -> &Path {
        self.proxy
            .catalog_path
            .as_deref()
            .unwrap_or(self.catalog.path.as_path())
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
