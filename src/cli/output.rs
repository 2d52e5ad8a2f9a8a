//! CLI output formatting utilities

use crate::models::Course;
use crate::recommend::RecommendationResponse;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print a list header
pub fn print_list_header(what: &str, count: usize) {
    println!("📋 {what} ({count} found)");
}

/// Print course table
pub fn print_course_list(courses: &[&Course]) {
    print_list_header("Courses", courses.len());
    for course in courses {
        println!(
            "  - {} | {} | {} | {}",
            course.id,
            truncate_str(&course.title, 48),
            course.level,
            course.display_price()
        );
    }
}

/// Print one course in full
pub fn print_course_detail(course: &Course) {
    println!("📘 {}", course.title);
    println!("  id:       {}", course.id);
    println!("  level:    {}", course.level);
    println!("  price:    {}", course.display_price());
    if let Some(description) = &course.description {
        println!("  about:    {description}");
    }
    if let Some(refund) = &course.refund_policy {
        println!("  refund:   {refund}");
    }
    if !course.features.is_empty() {
        println!("  features:");
        for feature in &course.features {
            println!("    • {feature}");
        }
    }
}

/// One-line summary printed to stderr after a pipeline run
pub fn recommendation_summary(response: &RecommendationResponse) -> String {
    format!(
        "🎯 {} result(s), match type: {} | {}",
        response.total_results, response.match_type, response.message
    )
}
