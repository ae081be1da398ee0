pub mod ingredients;
pub mod recipes;
pub mod tags;

use std::collections::HashMap;

use crate::error::ApiError;

/// Reject blank required string fields before anything touches the store.
pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), "This field may not be blank".to_string());
        return Err(ApiError::validation_error(
            "Validation failed",
            Some(field_errors),
        ));
    }
    Ok(())
}
