//! Turning a validator's violations into an outcome.
//!
//! Every check in the workspace reports through these two functions so that
//! failures share one error shape.

use chatwhisk_core::ValidationError;

use crate::shape::Validator;

/// Run `validator`; fail with `VALIDATION_FAILED` if it reports anything.
///
/// `message` overrides the default "Action parameters are invalid".
pub fn validate<V>(validator: &V, message: Option<&str>) -> Result<(), ValidationError>
where
    V: Validator + ?Sized,
{
    let violations = validator.run();
    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = violations.len(), "Validation failed");
        Err(ValidationError::failed(message, violations))
    }
}

/// Like [`validate`], then compute `then` only if validation passed.
pub fn validate_then<V, T, F>(validator: &V, message: Option<&str>, then: F) -> Result<T, ValidationError>
where
    V: Validator + ?Sized,
    F: FnOnce() -> T,
{
    validate(validator, message)?;
    Ok(then())
}
