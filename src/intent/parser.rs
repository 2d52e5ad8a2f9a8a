//! Intent parser: LLM extraction with a deterministic rules fallback

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use super::rules;
use crate::errors::RecommenderError;
use crate::errors::Result;
use crate::llm::IntentPrompts;
use crate::llm::TextGenerator;
use crate::models::CourseLevel;
use crate::models::IntentSource;
use crate::models::PriceRange;
use crate::models::UserIntent;

/// Shape requested from the model; every field is optional on the way in
#[derive(Debug, Default, Deserialize)]
struct ExtractedIntent {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    price_max: Option<Value>,
    #[serde(default)]
    price_min: Option<Value>,
    #[serde(default)]
    features: Vec<String>,
}

pub struct IntentParser {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl IntentParser {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Parser that never calls a model
    pub fn rules_only() -> Self {
        Self { generator: None }
    }

    pub fn uses_llm(&self) -> bool {
        self.generator.is_some()
    }

    /// Parse a query; never fails
    pub async fn parse(&self, query: &str) -> UserIntent {
        if let Some(generator) = &self.generator {
            match self.parse_with_llm(generator.as_ref(), query).await {
                Ok(intent) => {
                    debug!("LLM intent: {:?}", intent);
                    return intent;
                }
                Err(e) => warn!("⚠️ LLM intent parsing failed, using keyword rules: {}", e),
            }
        }

        let intent = rules::parse_with_rules(query);
        debug!("Rules intent: {:?}", intent);
        intent
    }

    async fn parse_with_llm(&self, generator: &dyn TextGenerator, query: &str) -> Result<UserIntent> {
        let prompt = IntentPrompts::render_intent_extraction(query);
        let raw = generator.generate(&prompt).await?;
        parse_model_output(&raw, query)
    }
}

/// Turn a model reply into an intent; the first JSON object in the reply is used
pub fn parse_model_output(raw: &str, query: &str) -> Result<UserIntent> {
    let json = first_json_object(raw).ok_or_else(|| {
        RecommenderError::LlmError("no JSON object in model output".to_string())
    })?;
    let extracted: ExtractedIntent = serde_json::from_str(json)?;

    let mut keywords: Vec<String> = Vec::new();
    for keyword in &extracted.keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    let summary = extracted
        .intent
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    if summary.is_none() && keywords.is_empty() {
        return Err(RecommenderError::LlmError(
            "model output has neither intent nor keywords".to_string(),
        ));
    }

    let price_range = PriceRange {
        min: extracted.price_min.as_ref().and_then(amount_from_value),
        max: extracted.price_max.as_ref().and_then(amount_from_value),
    };

    let mut features: Vec<String> = Vec::new();
    for feature in &extracted.features {
        let feature = feature.trim().to_lowercase();
        if !feature.is_empty() && !features.contains(&feature) {
            features.push(feature);
        }
    }

    Ok(UserIntent {
        intent: summary.unwrap_or_else(|| rules::summarize(&keywords)),
        intent_type: rules::detect_intent_type(query),
        topics: rules::topics_for(&keywords),
        level: extracted
            .level
            .as_deref()
            .and_then(|level| level.parse::<CourseLevel>().ok())
            // "any level" is no preference, not a request for all_levels courses
            .filter(|level| *level != CourseLevel::AllLevels),
        price_range: (!price_range.is_empty()).then_some(price_range),
        features: (!features.is_empty()).then_some(features),
        source: IntentSource::Llm,
        keywords,
    })
}

/// Slice of the first balanced `{ ... }` block, ignoring braces inside strings
fn first_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

fn amount_from_value(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let digits: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse().ok()?
        }
        _ => return None,
    };
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::IntentType;

    struct CannedGenerator(std::result::Result<String, String>);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.0.clone().map_err(RecommenderError::LlmError)
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    fn parser_with(reply: std::result::Result<&str, &str>) -> IntentParser {
        let generator = CannedGenerator(reply.map(String::from).map_err(String::from));
        IntentParser::new(Some(Arc::new(generator)))
    }

    #[tokio::test]
    async fn test_llm_output_is_used() {
        let parser = parser_with(Ok(
            r#"Sure! Here it is: {"intent": "Learn Python basics", "keywords": ["Python", "python"], "level": "Beginner", "price_max": "₹1,500", "price_min": null, "features": ["Certificate"]} hope that helps"#,
        ));

        let intent = parser.parse("python for beginners under 1500").await;
        assert_eq!(intent.source, IntentSource::Llm);
        assert_eq!(intent.intent, "Learn Python basics");
        assert_eq!(intent.keywords, vec!["python"]);
        assert_eq!(intent.level, Some(CourseLevel::Beginner));
        assert_eq!(intent.max_price(), Some(1500.0));
        assert_eq!(intent.requested_features(), &["certificate".to_string()]);
        assert_eq!(intent.topics, vec!["programming languages"]);
    }

    #[test]
    fn test_any_level_means_no_level_preference() {
        for level in ["any", "all", "All Levels"] {
            let raw = format!(r#"{{"intent": "Learn Python", "keywords": ["python"], "level": "{level}"}}"#);
            let intent = parse_model_output(&raw, "python course").unwrap();
            assert_eq!(intent.level, None, "level: {level}");
        }
    }

    #[tokio::test]
    async fn test_generator_error_falls_back_to_rules() {
        let parser = parser_with(Err("connection refused"));
        let intent = parser.parse("I want to learn Python for beginners").await;
        assert_eq!(intent.source, IntentSource::Rules);
        assert_eq!(intent.level, Some(CourseLevel::Beginner));
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back_to_rules() {
        for reply in ["no json here", "{\"intent\": ", "{}", "{\"keywords\": []}"] {
            let parser = parser_with(Ok(reply));
            let intent = parser.parse("build a react app").await;
            assert_eq!(intent.source, IntentSource::Rules, "reply: {reply}");
            assert_eq!(intent.intent_type, IntentType::Build);
        }
    }

    #[tokio::test]
    async fn test_rules_only_parser() {
        let parser = IntentParser::rules_only();
        assert!(!parser.uses_llm());
        let intent = parser.parse("machine learning course").await;
        assert_eq!(intent.keywords, vec!["machine learning"]);
    }

    #[test]
    fn test_first_json_object_handles_nested_and_strings() {
        let raw = r#"x {"a": {"b": "}"}, "c": 1} trailing {"d": 2}"#;
        assert_eq!(first_json_object(raw), Some(r#"{"a": {"b": "}"}, "c": 1}"#));
        assert_eq!(first_json_object("{ unclosed"), None);
    }
}
