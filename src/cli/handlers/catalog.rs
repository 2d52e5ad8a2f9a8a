//! Catalog inspection

use crate::catalog::CatalogSource;
use crate::catalog::CourseCatalog;
use crate::catalog::CourseFilters;
use crate::cli::output::*;
use crate::errors::RecommenderError;
use crate::AppConfig;
use crate::Result;

pub fn handle_catalog_command(
    config: &AppConfig,
    id: Option<String>,
    search: Option<String>,
    level: Option<String>,
    json: bool,
) -> Result<()> {
    let catalog = CourseCatalog::load(&config.catalog.path);
    match catalog.source() {
        CatalogSource::File(path) => eprintln!("📚 Catalog: {}", path.display()),
        CatalogSource::BuiltIn | CatalogSource::Inline => eprintln!("📚 Catalog: built-in"),
    }

    if let Some(id) = id {
        let course = catalog
            .get(&id)
            .ok_or_else(|| RecommenderError::NotFound(format!("Course not found: {id}")))?;
        if json {
            println!("{}", serde_json::to_string_pretty(course)?);
        } else {
            print_course_detail(course);
        }
        return Ok(());
    }

    let filters = CourseFilters {
        level: level.as_deref().map(str::parse).transpose()?,
        ..Default::default()
    };
    let courses = catalog.search(search.as_deref().unwrap_or_default(), &filters);

    if json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
    } else {
        print_course_list(&courses);
    }
    Ok(())
}
