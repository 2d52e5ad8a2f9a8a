//! Course catalog: the authoritative set of purchasable courses
//!
//! The catalog is loaded once at startup from a JSON file and is read-only
//! afterwards. Two file layouts are accepted:
//!
//! - a plain JSON array of courses
//! - an object with a `courses` array (processed catalog exports)
//!
//! A missing or unreadable file falls back to a built-in two-course catalog so
//! the engine can always answer.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::errors::RecommenderError;
use crate::errors::Result;
use crate::models::Course;
use crate::models::CourseLevel;

/// Where the loaded courses came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    BuiltIn,
    Inline,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Course>),
    Wrapped { courses: Vec<Course> },
}

impl CatalogFile {
    fn into_courses(self) -> Vec<Course> {
        match self {
            CatalogFile::List(courses) | CatalogFile::Wrapped { courses } => courses,
        }
    }
}

/// Optional filters for catalog search
#[derive(Debug, Clone, Default)]
pub struct CourseFilters {
    pub level: Option<CourseLevel>,
    pub max_price: Option<f64>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    source: CatalogSource,
}

impl CourseCatalog {
    /// Build a catalog from courses; later duplicates of an id are dropped
    pub fn new(courses: Vec<Course>) -> Self {
        Self::with_source(courses, CatalogSource::Inline)
    }

    fn with_source(courses: Vec<Course>, source: CatalogSource) -> Self {
        let mut seen = HashSet::new();
        let courses = courses
            .into_iter()
            .filter(|course| {
                let fresh = seen.insert(course.id.clone());
                if !fresh {
                    warn!("Dropping duplicate course id in catalog: {}", course.id);
                }
                fresh
            })
            .collect();

        Self { courses, source }
    }

    /// The catalog shipped with the engine
    pub fn built_in() -> Self {
        Self::with_source(default_courses(), CatalogSource::BuiltIn)
    }

    /// Strictly load a catalog file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let parsed: CatalogFile = serde_json::from_str(&content).map_err(|e| {
            RecommenderError::CatalogError(format!("{}: {e}", path.display()))
        })?;
        Ok(Self::with_source(
            parsed.into_courses(),
            CatalogSource::File(path.to_path_buf()),
        ))
    }

    /// Load a catalog file, falling back to the built-in catalog on any failure
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "📋 Course catalog not found at {}, using default data",
                path.display()
            );
            return Self::built_in();
        }

        match Self::from_file(path) {
            Ok(catalog) => {
                info!(
                    "📚 Loaded {} courses from {}",
                    catalog.len(),
                    path.display()
                );
                catalog
            }
            Err(e) => {
                warn!("Failed to load course catalog, using default data: {}", e);
                Self::built_in()
            }
        }
    }

    pub fn all(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Text search over title, description and features with optional filters
    pub fn search(&self, query: &str, filters: &CourseFilters) -> Vec<&Course> {
        let needle = query.trim().to_lowercase();
        debug!("Catalog search: {:?} with {:?}", needle, filters);

        self.courses
            .iter()
            .filter(|course| {
                needle.is_empty()
                    || course.title.to_lowercase().contains(&needle)
                    || course
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || course
                        .features
                        .iter()
                        .any(|f| f.to_lowercase().contains(&needle))
            })
            .filter(|course| filters.level.map_or(true, |level| course.level.satisfies(level)))
            .filter(|course| filters.max_price.map_or(true, |max| course.price <= max))
            .filter(|course| filters.features.iter().all(|f| course.has_feature(f)))
            .collect()
    }

    /// Resolve a free-form title to a catalog course
    ///
    /// Exact case-insensitive title match first, then the first course whose title
    /// contains the first word of `title`.
    pub fn find_by_title(&self, title: &str) -> Option<&Course> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(course) = self
            .courses
            .iter()
            .find(|course| course.title.to_lowercase() == wanted)
        {
            return Some(course);
        }

        let first_word = wanted.split_whitespace().next()?;
        self.courses
            .iter()
            .find(|course| course.title.to_lowercase().contains(first_word))
    }
}

/// Built-in catalog used when no catalog file is available
pub fn default_courses() -> Vec<Course> {
    vec![
        Course {
            id: "python-beginner-1299".to_string(),
            title: "Python Beginner".to_string(),
            level: CourseLevel::Beginner,
            price: 1299.0,
            currency: "INR".to_string(),
            features: vec![
                "30% refund via scholarship test".to_string(),
                "20 tokens (missed class buyback)".to_string(),
                "2 bootcamps (30% OFF)".to_string(),
                "Certificate of completion".to_string(),
            ],
            refund_policy: Some("30% refund via scholarship test".to_string()),
            tokens: Some(20),
            bootcamps: Some("2 bootcamps (30% OFF)".to_string()),
            discount: None,
            certificate: Some(true),
            description: Some(
                "Perfect for beginners starting their Python journey. Comprehensive coverage of \
                 Python fundamentals with hands-on projects."
                    .to_string(),
            ),
        },
        Course {
            id: "python-bounder-1899".to_string(),
            title: "Python Bounder (Beginner → Intermediate)".to_string(),
            level: CourseLevel::Intermediate,
            price: 1899.0,
            currency: "INR".to_string(),
            features: vec![
                "50% refund option".to_string(),
                "Beginner to Intermediate progression".to_string(),
                "Advanced Python concepts".to_string(),
                "Real-world projects".to_string(),
                "Certificate of completion".to_string(),
            ],
            refund_policy: Some("50% refund option".to_string()),
            tokens: None,
            bootcamps: None,
            discount: None,
            certificate: Some(true),
            description: Some(
                "Take your Python skills to the next level. This course bridges the gap between \
                 beginner and intermediate Python programming."
                    .to_string(),
            ),
        },
    ]
}
