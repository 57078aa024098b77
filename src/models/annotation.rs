use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotationValidationError {
    #[error("page_number must be >= 1")]
    InvalidPage,
    #[error("width and height must be > 0")]
    NonPositiveSize,
    #[error("x and y must be >= 0")]
    NegativeOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i32,
    pub document_id: i32,
    pub page_number: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub highlighted_text: Option<String>,
    pub annotation_note: Option<String>,
    pub session_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Annotation {
    pub fn validate(
        page_number: i32,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), AnnotationValidationError> {
        if page_number < 1 {
            return Err(AnnotationValidationError::InvalidPage);
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(AnnotationValidationError::NonPositiveSize);
        }
        if x < 0.0 || y < 0.0 {
            return Err(AnnotationValidationError::NegativeOrigin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_rectangle() {
        assert_eq!(
            Annotation::validate(1, 0.0, 0.0, 0.0, 10.0),
            Err(AnnotationValidationError::NonPositiveSize)
        );
    }

    #[test]
    fn rejects_page_zero() {
        assert_eq!(
            Annotation::validate(0, 0.0, 0.0, 10.0, 10.0),
            Err(AnnotationValidationError::InvalidPage)
        );
    }

    #[test]
    fn accepts_well_formed_rectangle() {
        assert_eq!(Annotation::validate(1, 0.0, 0.0, 10.0, 10.0), Ok(()));
    }
}
