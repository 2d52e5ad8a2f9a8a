//! Course matching pipeline
//!
//! A request flows through up to three stages and stops at the first one that
//! produces results:
//!
//! 1. [`matcher`]: weighted rules over level, title keywords, budget and features
//! 2. [`similarity`]: embedding nearest neighbours from the vector index
//! 3. [`fallback`]: the cheapest courses with a persuasive note
//!
//! [`formatter`] wraps the chosen stage's output into the response envelope.

pub mod fallback;
pub mod formatter;
pub mod matcher;
pub mod pipeline;
pub mod similarity;

pub use fallback::FixedSelector;
pub use fallback::MessageSelector;
pub use fallback::RandomSelector;
pub use formatter::RecommendationResponse;
pub use matcher::ExactMatcher;
pub use pipeline::RecommendationRequest;
pub use pipeline::RecommendationService;
pub use similarity::SimilaritySearcher;
