use thiserror::Error;

/// Shown when the remote call fails without a usable message.
pub const REMOTE_FALLBACK_MESSAGE: &str = "An error occurred. Please try again.";

/// Pre-network field checks, in the order they run on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    IncompleteName,
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
    #[error("Please check the box to agree to receive communications and continue.")]
    MissingConsent,
}

/// Every way a submission attempt can end short of a code.
///
/// None of these are fatal: the form stays editable after each one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please wait a moment before trying again.")]
    RateLimited,
    #[error("Session expired. Please try again.")]
    SessionExpired,
    #[error("{message}")]
    Remote { message: String },
    #[error("A submission is already in progress.")]
    SubmissionInFlight,
}

impl FormError {
    /// Remote failure carrying the server message, or the generic fallback.
    pub fn remote(message: Option<String>) -> Self {
        let message = message
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string());
        Self::Remote { message }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::RateLimited => "rate_limited",
            Self::SessionExpired => "session_expired",
            Self::Remote { .. } => "remote",
            Self::SubmissionInFlight => "in_flight",
        }
    }
}
