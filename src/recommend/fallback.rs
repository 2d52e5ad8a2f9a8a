//! Cheapest-first fallback suggestions with a persuasive note

use std::sync::Arc;

use rand::Rng;

use crate::models::Course;
use crate::models::MatchType;
use crate::models::Recommendation;

/// Picks which persuasive template to use
pub trait MessageSelector: Send + Sync {
    /// Index in `0..count`; `count` is never zero
    fn select(&self, count: usize) -> usize;
}

/// Uniformly random choice
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl MessageSelector for RandomSelector {
    fn select(&self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Always the same template (wrapped into range)
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl MessageSelector for FixedSelector {
    fn select(&self, count: usize) -> usize {
        self.0 % count
    }
}

pub fn persuasive_messages(course: &Course) -> [String; 4] {
    let price = course.display_price();
    [
        format!(
            "While this {} {} might not be exactly what you searched for, it's a great starting point",
            course.level, course.title
        ),
        format!(
            "This course offers excellent value at {} and includes {} key features",
            price,
            course.features.len()
        ),
        format!(
            "Many students start with our {} courses and love the comprehensive approach",
            course.level
        ),
        format!(
            "At just {}, this gives you {} - perfect for building foundation skills",
            price,
            course.features.join(", ")
        ),
    ]
}

pub struct FallbackRanker {
    count: usize,
    confidence: f32,
    selector: Arc<dyn MessageSelector>,
}

impl FallbackRanker {
    pub fn new(count: usize, confidence: f32, selector: Arc<dyn MessageSelector>) -> Self {
        Self {
            count,
            confidence,
            selector,
        }
    }

    /// The `limit` (at most the configured count) cheapest courses
    pub fn rank(&self, courses: &[Course], limit: usize) -> Vec<Recommendation> {
        let mut by_price: Vec<&Course> = courses.iter().collect();
        by_price.sort_by(|a, b| a.price.total_cmp(&b.price));

        by_price
            .into_iter()
            .take(self.count.min(limit))
            .map(|course| {
                let messages = persuasive_messages(course);
                let index = self.selector.select(messages.len());
                Recommendation::new(
                    course.clone(),
                    self.confidence,
                    messages[index].clone(),
                    MatchType::Fallback,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_courses;

    fn ranker(selector: usize) -> FallbackRanker {
        FallbackRanker::new(2, 0.5, Arc::new(FixedSelector(selector)))
    }

    #[test]
    fn test_two_cheapest_with_fixed_confidence() {
        let mut courses = default_courses();
        courses.reverse();
        let mut pricey = courses[0].clone();
        pricey.id = "pricey".to_string();
        pricey.price = 9999.0;
        courses.insert(0, pricey);

        let recs = ranker(0).rank(&courses, 5);
        let ids: Vec<&str> = recs.iter().map(|r| r.course.id.as_str()).collect();
        assert_eq!(ids, vec!["python-beginner-1299", "python-bounder-1899"]);
        assert!(recs.iter().all(|r| r.confidence_score == 0.5));
        assert!(recs.iter().all(|r| r.match_type == MatchType::Fallback));
    }

    #[test]
    fn test_message_templates() {
        let recs = ranker(1).rank(&default_courses(), 5);
        assert_eq!(
            recs[0].reasoning,
            "This course offers excellent value at ₹1299 and includes 4 key features"
        );

        let recs = ranker(4).rank(&default_courses(), 5);
        assert!(recs[0].reasoning.starts_with("While this beginner Python Beginner"));
    }

    #[test]
    fn test_random_selector_stays_in_range() {
        let selector = RandomSelector;
        for _ in 0..100 {
            assert!(selector.select(4) < 4);
        }
    }

    #[test]
    fn test_limit_and_empty_catalog() {
        assert_eq!(ranker(0).rank(&default_courses(), 1).len(), 1);
        assert!(ranker(0).rank(&[], 5).is_empty());
    }
}
