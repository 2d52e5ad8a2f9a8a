//! Additive rule scoring of catalog courses against a parsed intent

use tracing::debug;

use crate::config::RecommendationConfig;
use crate::models::format_amount;
use crate::models::Course;
use crate::models::MatchType;
use crate::models::Recommendation;
use crate::models::UserIntent;

/// Absorbs f32 rounding when a score lands exactly on the threshold
const SCORE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct ExactMatcher {
    level_weight: f32,
    keyword_weight: f32,
    price_weight: f32,
    feature_weight: f32,
    threshold: f32,
}

impl ExactMatcher {
    pub fn new(config: &RecommendationConfig) -> Self {
        Self {
            level_weight: config.level_weight,
            keyword_weight: config.keyword_weight,
            price_weight: config.price_weight,
            feature_weight: config.feature_weight,
            threshold: config.exact_match_threshold,
        }
    }

    /// Raw score and the reasons that contributed to it
    pub fn score(&self, course: &Course, intent: &UserIntent) -> (f32, Vec<String>) {
        let mut score = 0.0f32;
        let mut reasons = Vec::new();

        if let Some(level) = intent.level {
            if course.level.satisfies(level) {
                score += self.level_weight;
                reasons.push(format!("matches your {level} level"));
            }
        }

        let title = course.title.to_lowercase();
        for keyword in &intent.keywords {
            if title.contains(&keyword.to_lowercase()) {
                score += self.keyword_weight;
                reasons.push(format!("covers {keyword}"));
            }
        }

        if let Some(max) = intent.max_price() {
            if course.price <= max {
                score += self.price_weight;
                reasons.push(format!("within your budget of ₹{}", format_amount(max)));
            }
        }

        for feature in intent.requested_features() {
            if course.has_feature(feature) {
                score += self.feature_weight;
                reasons.push(format!("includes {feature}"));
            }
        }

        (score, reasons)
    }

    /// Courses at or above the threshold, best first, catalog order on ties
    pub fn find_matches(
        &self,
        courses: &[Course],
        intent: &UserIntent,
        max_results: usize,
    ) -> Vec<Recommendation> {
        let mut matches: Vec<Recommendation> = courses
            .iter()
            .filter_map(|course| {
                let (score, reasons) = self.score(course, intent);
                debug!("Exact score for {}: {:.2}", course.id, score);
                (score + SCORE_EPSILON >= self.threshold).then(|| {
                    Recommendation::new(
                        course.clone(),
                        score.min(1.0),
                        format!("Perfect match: {}", reasons.join(", ")),
                        MatchType::Exact,
                    )
                })
            })
            .collect();

        matches.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));
        matches.truncate(max_results);
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_courses;
    use crate::intent::parse_with_rules;
    use crate::models::CourseLevel;

    fn matcher() -> ExactMatcher {
        ExactMatcher::new(&RecommendationConfig::default())
    }

    #[test]
    fn test_beginner_python_is_exact_match() {
        let intent = parse_with_rules("I want to learn Python for beginners");
        let matches = matcher().find_matches(&default_courses(), &intent, 5);

        assert_eq!(matches[0].course.id, "python-beginner-1299");
        assert!((matches[0].confidence_score - 0.7).abs() < 1e-5);
        assert_eq!(
            matches[0].reasoning,
            "Perfect match: matches your beginner level, covers python"
        );
        // Title keyword alone is below the threshold
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_score_is_capped_at_one() {
        let intent = parse_with_rules(
            "beginner python under 2000 with certificate, bootcamp and refund",
        );
        let matches = matcher().find_matches(&default_courses(), &intent, 5);
        assert!(matches.iter().all(|m| m.confidence_score <= 1.0));
        assert_eq!(matches[0].confidence_score, 1.0);
    }

    #[test]
    fn test_all_levels_course_matches_any_level() {
        let mut course = default_courses().remove(0);
        course.level = CourseLevel::AllLevels;
        course.title = "Cooking".to_string();

        let intent = parse_with_rules("advanced material");
        let (score, reasons) = matcher().score(&course, &intent);
        assert!((score - 0.4).abs() < 1e-6);
        assert_eq!(reasons, vec!["matches your advanced level"]);
    }

    #[test]
    fn test_ties_keep_catalog_order_and_truncate() {
        let mut courses = default_courses();
        for course in &mut courses {
            course.level = CourseLevel::Beginner;
        }
        let intent = parse_with_rules("beginner");

        let matches = matcher().find_matches(&courses, &intent, 5);
        let ids: Vec<&str> = matches.iter().map(|m| m.course.id.as_str()).collect();
        assert_eq!(ids, vec!["python-beginner-1299", "python-bounder-1899"]);

        assert_eq!(matcher().find_matches(&courses, &intent, 1).len(), 1);
    }

    #[test]
    fn test_price_and_feature_reasons() {
        let intent = parse_with_rules("python under ₹1,500 with certificate");
        let course = &default_courses()[0];
        let (score, reasons) = matcher().score(course, &intent);
        assert!((score - 0.6).abs() < 1e-5);
        assert!(reasons.contains(&"within your budget of ₹1500".to_string()));
        assert!(reasons.contains(&"includes certificate".to_string()));
    }

    #[test]
    fn test_deterministic_results() {
        let intent = parse_with_rules("intermediate python");
        let a = matcher().find_matches(&default_courses(), &intent, 5);
        let b = matcher().find_matches(&default_courses(), &intent, 5);
        assert_eq!(a, b);
    }
}
