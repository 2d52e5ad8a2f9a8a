use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::RecommenderError;

/// Course difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    AllLevels,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
            CourseLevel::AllLevels => "all_levels",
        }
    }

    /// Whether a course at this level satisfies a requested level
    pub fn satisfies(&self, requested: CourseLevel) -> bool {
        *self == requested || *self == CourseLevel::AllLevels
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseLevel {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "beginner" | "basic" | "intro" | "introductory" => Ok(CourseLevel::Beginner),
            "intermediate" => Ok(CourseLevel::Intermediate),
            "advanced" | "expert" => Ok(CourseLevel::Advanced),
            "all_levels" | "all" | "any" => Ok(CourseLevel::AllLevels),
            _ => Err(RecommenderError::Validation(format!("unknown course level: {s}"))),
        }
    }
}

impl TryFrom<String> for CourseLevel {
    type Error = RecommenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Purchasable course as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub level: CourseLevel,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootcamps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Course {
    pub fn has_certificate(&self) -> bool {
        self.certificate.unwrap_or(false)
    }

    /// Case-insensitive feature lookup; `certificate` also honours the certificate flag
    pub fn has_feature(&self, feature: &str) -> bool {
        let needle = feature.to_lowercase();
        self.features
            .iter()
            .any(|f| f.to_lowercase().contains(&needle))
            || (needle == "certificate" && self.has_certificate())
    }

    /// Price rendered with the currency symbol, e.g. `₹1299`
    pub fn display_price(&self) -> String {
        let symbol = match self.currency.to_uppercase().as_str() {
            "INR" => "₹",
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            _ => "",
        };
        if symbol.is_empty() {
            format!("{} {}", format_amount(self.price), self.currency)
        } else {
            format!("{symbol}{}", format_amount(self.price))
        }
    }

    /// Text rendering used for embedding and vector storage
    pub fn to_document_text(&self) -> String {
        let mut parts = vec![
            format!("Title: {}", self.title),
            format!("Level: {}", self.level),
            format!("Price: {}", self.display_price()),
            format!("Features: {}", self.features.join(", ")),
        ];

        if let Some(description) = &self.description {
            parts.push(format!("Description: {description}"));
        }

        if let Some(refund) = &self.refund_policy {
            parts.push(format!("Refund: {refund}"));
        }

        parts.join("\n")
    }
}

pub(crate) fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

/// What the learner is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    #[default]
    Learn,
    Build,
    Explore,
    Compare,
}

/// Where a parsed intent came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentSource {
    Llm,
    #[default]
    Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Structured signals extracted from a learner query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserIntent {
    pub intent: String,
    #[serde(default)]
    pub intent_type: IntentType,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<CourseLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub source: IntentSource,
}

impl UserIntent {
    pub fn max_price(&self) -> Option<f64> {
        self.price_range.and_then(|range| range.max)
    }

    pub fn requested_features(&self) -> &[String] {
        self.features.as_deref().unwrap_or_default()
    }
}

/// Which pipeline stage produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Similar,
    Fallback,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Similar => "similar",
            MatchType::Fallback => "fallback",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub course: Course,
    pub confidence_score: f32,
    pub reasoning: String,
    pub match_type: MatchType,
}

impl Recommendation {
    /// Build a recommendation, clamping the score into `[0, 1]`
    pub fn new(
        course: Course,
        confidence_score: f32,
        reasoning: impl Into<String>,
        match_type: MatchType,
    ) -> Self {
        let confidence_score = if confidence_score.is_nan() {
            0.0
        } else {
            confidence_score.clamp(0.0, 1.0)
        };
        Self {
            course,
            confidence_score,
            reasoning: reasoning.into(),
            match_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMetadata {
    pub course_id: String,
    pub course_title: String,
    pub level: CourseLevel,
    pub price: f64,
    pub features: Vec<String>,
}

/// A course's text rendering plus its embedding, owned by the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDocument {
    pub id: String,
    pub content: String,
    pub metadata: VectorMetadata,
    #[serde(default)]
    pub embedding: Vec<f32>,
}

impl VectorDocument {
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            content: course.to_document_text(),
            metadata: VectorMetadata {
                course_id: course.id.clone(),
                course_title: course.title.clone(),
                level: course.level,
                price: course.price,
                features: course.features.clone(),
            },
            embedding: Vec::new(),
        }
    }
}

/// Vector index hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: VectorDocument,
    pub score: f32,
}

/// Readiness of a startup-initialized service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Loading,
    Ready,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        serde_json::from_value(serde_json::json!({
            "id": "python-beginner-1299",
            "title": "Python Beginner",
            "level": "Beginner",
            "price": 1299,
            "features": ["Certificate of completion", "2 bootcamps (30% OFF)"],
            "refund_policy": "30% refund via scholarship test"
        }))
        .unwrap()
    }

    #[test]
    fn test_level_parsing_is_case_insensitive() {
        assert_eq!("Beginner".parse::<CourseLevel>().unwrap(), CourseLevel::Beginner);
        assert_eq!("ALL LEVELS".parse::<CourseLevel>().unwrap(), CourseLevel::AllLevels);
        assert!("wizard".parse::<CourseLevel>().is_err());
    }

    #[test]
    fn test_course_defaults_currency() {
        let course = sample_course();
        assert_eq!(course.currency, "INR");
        assert_eq!(course.display_price(), "₹1299");
    }

    #[test]
    fn test_has_feature_uses_certificate_flag() {
        let mut course = sample_course();
        course.features.clear();
        assert!(!course.has_feature("certificate"));
        course.certificate = Some(true);
        assert!(course.has_feature("certificate"));
        assert!(!course.has_feature("bootcamp"));
    }

    #[test]
    fn test_document_text_includes_optional_parts() {
        let text = sample_course().to_document_text();
        assert!(text.starts_with("Title: Python Beginner\nLevel: beginner"));
        assert!(text.contains("Refund: 30% refund via scholarship test"));
        assert!(!text.contains("Description:"));
    }

    #[test]
    fn test_recommendation_score_is_clamped() {
        let rec = Recommendation::new(sample_course(), 1.7, "x", MatchType::Exact);
        assert!((rec.confidence_score - 1.0).abs() < f32::EPSILON);
        let rec = Recommendation::new(sample_course(), f32::NAN, "x", MatchType::Similar);
        assert_eq!(rec.confidence_score, 0.0);
    }

    #[test]
    fn test_all_levels_satisfies_any_request() {
        assert!(CourseLevel::AllLevels.satisfies(CourseLevel::Advanced));
        assert!(!CourseLevel::Beginner.satisfies(CourseLevel::Advanced));
    }
}
