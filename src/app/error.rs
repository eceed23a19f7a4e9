use crate::domain::FieldViolation;

/// Failures surfaced by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Bad pagination or sort parameters. Raised before any storage access.
    #[error("invalid request: {}", describe(.0))]
    InvalidRequest(Vec<FieldViolation>),

    #[error("product '{0}' not found")]
    NotFound(String),

    /// The store could not be reached or returned an error. Not retried here.
    #[error("storage unavailable")]
    StorageUnavailable(#[source] anyhow::Error),
}

impl CatalogError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::InvalidRequest(vec![FieldViolation::new(field, message)])
    }
}

impl From<Vec<FieldViolation>> for CatalogError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        CatalogError::InvalidRequest(violations)
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}
