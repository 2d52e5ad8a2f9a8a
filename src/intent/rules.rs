//! Deterministic keyword and regex intent extraction

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::CourseLevel;
use crate::models::IntentSource;
use crate::models::IntentType;
use crate::models::PriceRange;
use crate::models::UserIntent;

/// Known technology keyword: canonical name, spellings, skill category
struct TechKeyword {
    canonical: &'static str,
    spellings: &'static [&'static str],
    category: &'static str,
}

const TECH_KEYWORDS: &[TechKeyword] = &[
    TechKeyword { canonical: "python", spellings: &["python"], category: "programming languages" },
    TechKeyword { canonical: "java", spellings: &["java"], category: "programming languages" },
    TechKeyword { canonical: "rust", spellings: &["rust"], category: "programming languages" },
    TechKeyword { canonical: "golang", spellings: &["golang"], category: "programming languages" },
    TechKeyword { canonical: "c++", spellings: &["c++", "cpp"], category: "programming languages" },
    TechKeyword { canonical: "kotlin", spellings: &["kotlin"], category: "mobile development" },
    TechKeyword { canonical: "swift", spellings: &["swift"], category: "mobile development" },
    TechKeyword { canonical: "flutter", spellings: &["flutter"], category: "mobile development" },
    TechKeyword { canonical: "android", spellings: &["android"], category: "mobile development" },
    TechKeyword { canonical: "javascript", spellings: &["javascript", "js"], category: "web development" },
    TechKeyword { canonical: "typescript", spellings: &["typescript", "ts"], category: "web development" },
    TechKeyword { canonical: "react", spellings: &["react", "reactjs", "react.js"], category: "web development" },
    TechKeyword { canonical: "html", spellings: &["html"], category: "web development" },
    TechKeyword { canonical: "css", spellings: &["css"], category: "web development" },
    TechKeyword { canonical: "node", spellings: &["node", "nodejs", "node.js"], category: "backend development" },
    TechKeyword { canonical: "django", spellings: &["django"], category: "backend development" },
    TechKeyword { canonical: "flask", spellings: &["flask"], category: "backend development" },
    TechKeyword { canonical: "backend", spellings: &["backend", "back-end", "back end"], category: "backend development" },
    TechKeyword { canonical: "sql", spellings: &["sql", "mysql", "postgres", "postgresql"], category: "data science" },
    TechKeyword { canonical: "data science", spellings: &["data science"], category: "data science" },
    TechKeyword { canonical: "machine learning", spellings: &["machine learning", "ml"], category: "data science" },
    TechKeyword { canonical: "ai", spellings: &["ai", "artificial intelligence"], category: "data science" },
    TechKeyword { canonical: "docker", spellings: &["docker"], category: "devops" },
    TechKeyword { canonical: "kubernetes", spellings: &["kubernetes", "k8s"], category: "devops" },
    TechKeyword { canonical: "aws", spellings: &["aws"], category: "devops" },
];

const FEATURE_WORDS: &[(&str, &[&str])] = &[
    ("certificate", &["certificate", "certification", "certified"]),
    ("bootcamp", &["bootcamp", "boot camp"]),
    ("refund", &["refund", "money back", "money-back"]),
];

lazy_static! {
    static ref KEYWORD_PATTERNS: Vec<(Regex, usize)> = TECH_KEYWORDS
        .iter()
        .enumerate()
        .map(|(index, keyword)| {
            let alternatives = keyword
                .spellings
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            // Word boundary that also treats `+` and `#` as word characters; a
            // leading `.` is part of the previous token (`node.js` is not `js`)
            let pattern = format!(r"(?i)(?:^|[^a-z0-9_+#.])(?:{alternatives})(?:$|[^a-z0-9_+#])");
            (Regex::new(&pattern).expect("keyword pattern is valid"), index)
        })
        .collect();
    static ref BEGINNER_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:beginners?|basics?|start\w*|introduct\w*|intro|fundamentals?|novice|newbie)\b"
    )
    .expect("beginner pattern is valid");
    static ref ADVANCED_PATTERN: Regex =
        Regex::new(r"(?i)\b(?:advanced|expert\w*|master\w*)\b").expect("advanced pattern is valid");
    static ref INTERMEDIATE_PATTERN: Regex =
        Regex::new(r"(?i)\bintermediate\b").expect("intermediate pattern is valid");
    static ref PRICE_MAX_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:under|below|less\s+than|up\s*to|max(?:imum)?|within|budget\s+of)\s*(?:₹|rs\.?|inr)?\s*(\d[\d,]*(?:\.\d+)?)\s*(k\b)?"
    )
    .expect("price max pattern is valid");
    static ref PRICE_MIN_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:above|over|more\s+than|at\s+least|min(?:imum)?)\s*(?:₹|rs\.?|inr)?\s*(\d[\d,]*(?:\.\d+)?)\s*(k\b)?"
    )
    .expect("price min pattern is valid");
    static ref COMPARE_PATTERN: Regex =
        Regex::new(r"(?i)\b(?:compare|comparison|vs|versus|difference|better\s+than|or)\b")
            .expect("compare pattern is valid");
    static ref BUILD_PATTERN: Regex =
        Regex::new(r"(?i)\b(?:build|create|make|develop|project|projects|app|website)\b")
            .expect("build pattern is valid");
    static ref EXPLORE_PATTERN: Regex =
        Regex::new(r"(?i)\b(?:explore|curious|overview|discover|try|what\s+is)\b")
            .expect("explore pattern is valid");
}

/// Parse a query with keyword rules only
pub fn parse_with_rules(query: &str) -> UserIntent {
    let keywords = extract_keywords(query);
    let topics = topics_for(&keywords);

    let price_range = extract_price_range(query);
    let features = extract_features(query);

    UserIntent {
        intent: summarize(&keywords),
        intent_type: detect_intent_type(query),
        topics,
        level: detect_level(query),
        price_range: (!price_range.is_empty()).then_some(price_range),
        features: (!features.is_empty()).then_some(features),
        source: IntentSource::Rules,
        keywords,
    }
}

/// Technology keywords in order of first appearance in the query
pub fn extract_keywords(query: &str) -> Vec<String> {
    let mut found: Vec<(usize, usize)> = KEYWORD_PATTERNS
        .iter()
        .filter_map(|(pattern, index)| pattern.find(query).map(|m| (m.start(), *index)))
        .collect();
    found.sort_by_key(|(position, index)| (*position, *index));

    let mut keywords: Vec<String> = Vec::new();
    for (_, index) in found {
        let canonical = TECH_KEYWORDS[index].canonical;
        if !keywords.iter().any(|k| k == canonical) {
            keywords.push(canonical.to_string());
        }
    }
    keywords
}

/// Skill categories for known keywords, deduplicated in keyword order
pub fn topics_for(keywords: &[String]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for keyword in keywords {
        let category = TECH_KEYWORDS
            .iter()
            .find(|k| k.canonical == keyword.to_lowercase())
            .map(|k| k.category);
        if let Some(category) = category {
            if !topics.iter().any(|t| t == category) {
                topics.push(category.to_string());
            }
        }
    }
    topics
}

/// Beginner words win over advanced words, which win over `intermediate`
pub fn detect_level(query: &str) -> Option<CourseLevel> {
    if BEGINNER_PATTERN.is_match(query) {
        Some(CourseLevel::Beginner)
    } else if ADVANCED_PATTERN.is_match(query) {
        Some(CourseLevel::Advanced)
    } else if INTERMEDIATE_PATTERN.is_match(query) {
        Some(CourseLevel::Intermediate)
    } else {
        None
    }
}

pub fn detect_intent_type(query: &str) -> IntentType {
    if COMPARE_PATTERN.is_match(query) {
        // "or" only counts when it joins two technologies
        let strong = COMPARE_PATTERN
            .find_iter(query)
            .any(|m| !m.as_str().eq_ignore_ascii_case("or"));
        if strong || extract_keywords(query).len() >= 2 {
            return IntentType::Compare;
        }
    }

    if BUILD_PATTERN.is_match(query) {
        IntentType::Build
    } else if EXPLORE_PATTERN.is_match(query) {
        IntentType::Explore
    } else {
        IntentType::Learn
    }
}

pub fn extract_price_range(query: &str) -> PriceRange {
    PriceRange {
        min: capture_amount(&PRICE_MIN_PATTERN, query),
        max: capture_amount(&PRICE_MAX_PATTERN, query),
    }
}

fn capture_amount(pattern: &Regex, query: &str) -> Option<f64> {
    let captures = pattern.captures(query)?;
    let amount: f64 = captures.get(1)?.as_str().replace(',', "").parse().ok()?;
    if captures.get(2).is_some() {
        Some(amount * 1000.0)
    } else {
        Some(amount)
    }
}

pub fn extract_features(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    FEATURE_WORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(feature, _)| (*feature).to_string())
        .collect()
}

/// `Learn a, b` or a generic summary when nothing specific was found
pub fn summarize(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "General programming course".to_string()
    } else {
        format!("Learn {}", keywords.join(", "))
    }
}
