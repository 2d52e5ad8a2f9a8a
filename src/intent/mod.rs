//! Learner query understanding

pub mod parser;
pub mod rules;

pub use parser::IntentParser;
pub use rules::parse_with_rules;

/// Query text used for matching: the free text followed by any UI chips
pub fn enhanced_query(user_query: &str, chips: &[String]) -> String {
    let mut parts = vec![user_query.trim()];
    parts.extend(chips.iter().map(|c| c.trim()).filter(|c| !c.is_empty()));
    parts.join(" ")
}
