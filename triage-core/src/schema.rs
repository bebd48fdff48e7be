//! Response schemas embedded into prompts
//!
//! A schema describes the JSON object the model is asked to return. It is
//! rendered into prompt text as guidance; the completion client never
//! enforces it. Callers that want a mechanical check can use
//! [`ResponseSchema::check`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;

/// JSON type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Number,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Number => value.is_number(),
        }
    }
}

/// One expected output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "enum")]
    pub allowed: Option<Vec<String>>,
    pub description: String,
}

impl SchemaField {
    pub fn new(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            allowed: None,
            description: description.to_string(),
        }
    }

    pub fn one_of(name: &str, allowed: &[&str], description: &str) -> Self {
        Self {
            allowed: Some(allowed.iter().map(|v| v.to_string()).collect()),
            ..Self::new(name, FieldType::String, description)
        }
    }
}

/// A named description of the expected model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSchema {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

/// A field-level mismatch reported by [`ResponseSchema::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    NotAnObject,
    Missing { field: String },
    WrongType { field: String, expected: FieldType },
    NotAllowed { field: String, value: String },
}

impl ResponseSchema {
    pub fn new(name: &str, fields: Vec<SchemaField>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    /// Render as tag-per-field text for inclusion in a prompt.
    ///
    /// ```text
    /// <comment_analysis>
    /// <reproductionProvided type="boolean">...</reproductionProvided>
    /// </comment_analysis>
    /// ```
    pub fn to_prompt(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "<{}>", self.name);
        for field in &self.fields {
            let _ = write!(out, "<{} type=\"{}\"", field.name, field.field_type.as_str());
            if let Some(allowed) = &field.allowed {
                let _ = write!(out, " enum=\"{}\"", allowed.join("|"));
            }
            let _ = writeln!(out, ">{}</{}>", field.description, field.name);
        }
        let _ = write!(out, "</{}>", self.name);
        out
    }

    /// Compare a decoded response against this schema.
    ///
    /// Extra fields are ignored.
    pub fn check(&self, value: &Value) -> Result<(), Vec<SchemaViolation>> {
        let Some(object) = value.as_object() else {
            return Err(vec![SchemaViolation::NotAnObject]);
        };

        let mut violations = Vec::new();
        for field in &self.fields {
            let Some(actual) = object.get(&field.name) else {
                violations.push(SchemaViolation::Missing {
                    field: field.name.clone(),
                });
                continue;
            };

            if !field.field_type.matches(actual) {
                violations.push(SchemaViolation::WrongType {
                    field: field.name.clone(),
                    expected: field.field_type,
                });
                continue;
            }

            if let (Some(allowed), Some(text)) = (&field.allowed, actual.as_str()) {
                if !allowed.iter().any(|a| a == text) {
                    violations.push(SchemaViolation::NotAllowed {
                        field: field.name.clone(),
                        value: text.to_string(),
                    });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

const REPRODUCTION_PROVIDED: &str =
    "Whether the issue includes a link or steps that reproduce the problem";
const POSSIBLE_REGRESSION: &str =
    "Whether the problem appeared after upgrading from a version where it worked";

/// Classification of a newly opened issue
pub fn issue_categorization() -> ResponseSchema {
    ResponseSchema::new(
        "issue_categorization",
        vec![
            SchemaField::one_of(
                "issueType",
                &["bug", "enhancement", "documentation", "spam"],
                "The kind of issue",
            ),
            SchemaField::new("reproductionProvided", FieldType::Boolean, REPRODUCTION_PROVIDED),
            SchemaField::new(
                "spokenLanguage",
                FieldType::String,
                "Two-letter ISO 639-1 code of the language the issue is written in",
            ),
            SchemaField::new("possibleRegression", FieldType::Boolean, POSSIBLE_REGRESSION),
            SchemaField::new(
                "nitro",
                FieldType::Boolean,
                "Whether the problem lies in the server engine rather than the framework",
            ),
        ],
    )
}

/// Analysis of a follow-up comment
pub fn comment_analysis() -> ResponseSchema {
    ResponseSchema::new(
        "comment_analysis",
        vec![
            SchemaField::new("reproductionProvided", FieldType::Boolean, REPRODUCTION_PROVIDED),
            SchemaField::new("possibleRegression", FieldType::Boolean, POSSIBLE_REGRESSION),
        ],
    )
}

/// Analysis deciding whether a closed issue should be reopened
pub fn reopen_analysis() -> ResponseSchema {
    ResponseSchema::new(
        "reopen_analysis",
        vec![
            SchemaField::new("reproductionProvided", FieldType::Boolean, REPRODUCTION_PROVIDED),
            SchemaField::new("possibleRegression", FieldType::Boolean, POSSIBLE_REGRESSION),
            SchemaField::new(
                "shouldReopen",
                FieldType::Boolean,
                "Whether the new information justifies reopening the issue",
            ),
            SchemaField::new(
                "isDifferentFromDuplicate",
                FieldType::Boolean,
                "Whether the issue is distinct from the one it was closed as a duplicate of",
            ),
            SchemaField::one_of(
                "confidence",
                &["low", "medium", "high"],
                "Confidence in this assessment",
            ),
        ],
    )
}

/// Translation of an issue into English
pub fn translation() -> ResponseSchema {
    ResponseSchema::new(
        "translation",
        vec![
            SchemaField::new("translatedTitle", FieldType::String, "The title in English"),
            SchemaField::new("translatedBody", FieldType::String, "The body in English"),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Bug,
    Enhancement,
    Documentation,
    Spam,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

/// Typed target for [`issue_categorization`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueCategorization {
    pub issue_type: Option<IssueType>,
    pub reproduction_provided: bool,
    pub spoken_language: String,
    pub possible_regression: bool,
    pub nitro: bool,
}

impl Default for IssueCategorization {
    fn default() -> Self {
        Self {
            issue_type: None,
            reproduction_provided: false,
            spoken_language: crate::normalize::FALLBACK_LANGUAGE.to_string(),
            possible_regression: false,
            nitro: false,
        }
    }
}

/// Typed target for [`comment_analysis`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentAnalysis {
    pub reproduction_provided: bool,
    pub possible_regression: bool,
}

/// Typed target for [`reopen_analysis`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReopenAnalysis {
    pub reproduction_provided: bool,
    pub possible_regression: bool,
    pub should_reopen: bool,
    pub is_different_from_duplicate: bool,
    pub confidence: Confidence,
}

/// Typed target for [`translation`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Translation {
    pub translated_title: String,
    pub translated_body: String,
}
