use crate::controller::FormFields;
use crate::error::ValidationError;
use crate::format::{PHONE_DIGIT_LIMIT, format_phone_for_submission, phone_digits};
use crate::transport::LeadSubmission;

#[must_use]
pub fn is_complete_name(first_name: &str, last_name: &str) -> bool {
    !first_name.trim().is_empty() && !last_name.trim().is_empty()
}

#[must_use]
pub fn is_valid_phone(display_or_raw: &str) -> bool {
    phone_digits(display_or_raw).len() == PHONE_DIGIT_LIMIT
}

#[must_use]
pub fn has_consent(flag: bool) -> bool {
    flag
}

/// Runs the field checks in submit order (name, phone, consent) and builds
/// the outbound payload. The first failing check wins.
pub fn validate_submission(
    fields: &FormFields,
    consent: bool,
    consent_required: bool,
) -> Result<LeadSubmission, ValidationError> {
    if !is_complete_name(&fields.first_name, &fields.last_name) {
        return Err(ValidationError::IncompleteName);
    }
    if !is_valid_phone(&fields.phone_display) {
        return Err(ValidationError::InvalidPhone);
    }
    if consent_required && !has_consent(consent) {
        return Err(ValidationError::MissingConsent);
    }

    let mobile_phone =
        format_phone_for_submission(&fields.phone_display).ok_or(ValidationError::InvalidPhone)?;

    Ok(LeadSubmission {
        first_name: fields.first_name.trim().to_string(),
        last_name: fields.last_name.trim().to_string(),
        mobile_phone,
    })
}
