pub mod enrollmentdtos;
pub mod plandtos;
pub mod servicedtos;
pub mod userdtos;

use validator::ValidationError;

/// Names are trimmed before they are stored, so whitespace alone counts as empty.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Name cannot be blank".into());
        return Err(error);
    }
    Ok(())
}
