use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One rejected input field, as reported back to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens a garde report into per-field violations.
pub fn violations_from_report(report: &garde::Report) -> Vec<FieldViolation> {
    report
        .iter()
        .map(|(path, error)| {
            let field = path.to_string();
            let field = if field.is_empty() { "value".to_string() } else { field };
            FieldViolation::new(field, error.message().to_string())
        })
        .collect()
}
