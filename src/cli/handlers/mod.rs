//! CLI command handlers module
//!
//! - serve: API server
//! - recommend: one-shot pipeline runs
//! - catalog: catalog listing and lookup
//! - info: effective configuration

pub mod catalog;
pub mod info;
pub mod recommend;
pub mod serve;

// Re-export all public handlers
pub use catalog::*;
pub use info::*;
pub use recommend::*;
pub use serve::*;
