pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod intent;
pub mod llm;
pub mod logging;
pub mod models;
pub mod proxy;
pub mod recommend;
pub mod vector_store;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod recommend_tests;

pub use catalog::CourseCatalog;
pub use config::AppConfig;
pub use errors::*;
pub use recommend::RecommendationRequest;
pub use recommend::RecommendationService;
