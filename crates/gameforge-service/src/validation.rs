//! Request validation helpers shared by the services.

use validator::{Validate, ValidationError};

use gameforge_core::error::AppError;
use gameforge_core::result::AppResult;

/// Run derived `validator` rules and map failures to a validation error.
pub fn validate_request<T: Validate>(request: &T) -> AppResult<()> {
    request
        .validate()
        .map_err(|errors| AppError::validation(format!("Invalid request: {errors}")))
}

/// Field rule: the value must contain something other than whitespace.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

/// Reject content larger than the configured limit.
pub fn check_content_size(content: &str, max_bytes: usize) -> AppResult<()> {
    if content.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Content is {} bytes, limit is {max_bytes}",
            content.len()
        )));
    }
    Ok(())
}
