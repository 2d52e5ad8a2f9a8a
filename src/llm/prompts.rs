//! Prompt templates for intent extraction

use std::collections::HashMap;

/// Template for generating prompts
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template with variables
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut result = self.template.clone();
        for var in &self.variables {
            if let Some(value) = values.get(var) {
                result = result.replace(&format!("{{{{{var}}}}}"), value);
            }
        }
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                chars.next();
                if ch == '}' {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        break;
                    }
                } else {
                    var_name.push(ch);
                }
            }
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

pub struct IntentPrompts;

impl IntentPrompts {
    /// Structured extraction of a learner's course query
    #[must_use]
    pub fn intent_extraction() -> PromptTemplate {
        PromptTemplate::new(
            r#"Analyze this course query and extract structured information.
Query: "{{query}}"

Return ONLY a JSON object with these fields:
- "intent": short summary of what they want to learn
- "keywords": array of technologies or topics mentioned, lowercase
- "level": "beginner", "intermediate", "advanced" or null
- "price_max": maximum budget as a number, or null
- "price_min": minimum price as a number, or null
- "features": array drawn from "certificate", "bootcamp", "refund"

JSON:"#,
        )
    }

    /// Render the extraction prompt for a query
    #[must_use]
    pub fn render_intent_extraction(query: &str) -> String {
        let mut values = HashMap::new();
        values.insert("query".to_string(), query.replace('"', "'"));
        Self::intent_extraction().render(&values)
    }
}
