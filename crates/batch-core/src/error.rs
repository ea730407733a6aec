//! 条目级错误

use derive_more::Display;
use errors::AppError;
use ports::DependentRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 校验错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    #[display("missing required field")]
    MissingRequiredField,
    #[display("invalid reference")]
    InvalidReference,
    #[display("conflict")]
    Conflict,
    #[display("invalid value")]
    InvalidValue,
}

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {field}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MissingRequiredField, field)
    }

    pub fn invalid_reference(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidReference, field)
    }

    pub fn conflict(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::Conflict, field)
    }

    pub fn invalid_value(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidValue, field)
    }
}

/// 单个条目的失败原因
///
/// 除 `Fatal` 外都会被记录为该条目的失败结果，批处理继续
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("not found")]
    NotFound,

    #[error("referenced by {}", join_refs(.0))]
    Referenced(Vec<DependentRef>),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Fatal(AppError),
}

impl ItemError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl From<AppError> for ItemError {
    fn from(err: AppError) -> Self {
        if err.is_fatal() {
            Self::Fatal(err)
        } else {
            Self::Rejected(err.to_string())
        }
    }
}

fn join_refs(refs: &[DependentRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        assert_eq!(
            ValidationError::missing("name").to_string(),
            "missing required field: name"
        );
        assert_eq!(
            ValidationError::invalid_reference("warehouse_id").to_string(),
            "invalid reference: warehouse_id"
        );
    }

    #[test]
    fn test_referenced_names_every_dependent() {
        let err = ItemError::Referenced(vec![
            DependentRef::new("delivery", "D-1"),
            DependentRef::new("delivery", "D-2"),
        ]);
        assert_eq!(err.to_string(), "referenced by delivery:D-1, delivery:D-2");
    }

    #[test]
    fn test_app_error_classification() {
        let conflict = ItemError::from(AppError::conflict("duplicate brand name 'Acme'"));
        assert!(!conflict.is_fatal());
        assert_eq!(conflict.to_string(), "Conflict: duplicate brand name 'Acme'");

        let unavailable = ItemError::from(AppError::unavailable("connection refused"));
        assert!(unavailable.is_fatal());
    }

    #[test]
    fn test_not_found_reason() {
        assert_eq!(ItemError::NotFound.to_string(), "not found");
    }
}
