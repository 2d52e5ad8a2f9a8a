//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::*;
    use crate::errors::RecommenderError;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    // ====== Default Value Tests ======

    #[test]
    fn test_default_recommendation_values() {
        let rec = RecommendationConfig::default();
        assert_eq!(rec.max_results, 5);
        assert_eq!(rec.max_results_limit, 20);
        assert_eq!(rec.exact_match_threshold, 0.4);
        assert_eq!(rec.similarity_threshold, 0.6);
        assert_eq!(rec.fallback_count, 2);
        assert_eq!(rec.fallback_confidence, 0.5);
        let weights = rec.level_weight + rec.keyword_weight + rec.price_weight + rec.feature_weight;
        assert!((weights - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_app_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:8003");
        assert_eq!(config.vector_store.chroma_url(), "http://localhost:8000");
        assert!(config.vector_store.uses_chroma());
        assert!(config.proxy.enabled);
        assert_eq!(config.proxy.timeout_ms, 4000);
    }

    #[test]
    fn test_clamp_max_results() {
        let rec = RecommendationConfig::default();
        assert_eq!(rec.clamp_max_results(None), 5);
        assert_eq!(rec.clamp_max_results(Some(0)), 1);
        assert_eq!(rec.clamp_max_results(Some(50)), 20);
        assert_eq!(rec.clamp_max_results(Some(7)), 7);
    }

    #[test]
    fn test_proxy_catalog_defaults_to_engine_catalog() {
        let mut config = AppConfig::default();
        assert_eq!(config.proxy_catalog_path(), config.catalog.path.as_path());
        config.proxy.catalog_path = Some("other.json".into());
        assert_eq!(config.proxy_catalog_path(), std::path::Path::new("other.json"));
    }

    // ====== File Loading Tests ======

    #[test]
    fn test_from_file_partial_toml() {
        let file = write_config(
            r#"
[server]
port = 9100

[recommendation]
similarity_threshold = 0.65
fallback_count = 3

[vector_store]
backend = "memory"
"#,
        );

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.recommendation.similarity_threshold, 0.65);
        assert_eq!(config.recommendation.fallback_count, 3);
        assert!(!config.vector_store.uses_chroma());
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let file = write_config("[server\nport = ");
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(RecommenderError::TomlParsing(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            AppConfig::from_file("/definitely/not/here.toml"),
            Err(RecommenderError::Io(_))
        ));
    }

    // ====== Layered Loading Tests ======

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[server]\nport = 9100\n");
        let config = AppConfig::load_layered(
            Some(file.path()),
            Some(env(&[
                ("RECOMMENDER__SERVER__PORT", "9200"),
                ("RECOMMENDER__LLM__ENABLED", "false"),
            ])),
        )
        .unwrap();

        assert_eq!(config.server.port, 9200);
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_env_only_uses_defaults() {
        let file = write_config("");
        let config = AppConfig::load_layered(
            Some(file.path()),
            Some(env(&[("RECOMMENDER__VECTOR_STORE__BACKEND", "memory")])),
        )
        .unwrap();

        assert_eq!(config.vector_store.backend, "memory");
        assert_eq!(config.recommendation.max_results, 5);
    }

    // ====== Validation Tests ======

    #[test]
    fn test_validation_rejects_bad_url() {
        let mut config = AppConfig::default();
        config.embeddings.endpoint = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("embeddings.endpoint"));
    }

    #[test]
    fn test_validation_rejects_out_of_range_threshold() {
        let mut config = AppConfig::default();
        config.recommendation.similarity_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(RecommenderError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_counts() {
        let mut config = AppConfig::default();
        config.recommendation.fallback_count = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.recommendation.max_results_limit = 0;
        assert!(config.validate().is_err());
    }
}
