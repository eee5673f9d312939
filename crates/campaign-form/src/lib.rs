//! Form-state engine for the free wash lead form.
//!
//! Pure formatting and validation, the submission guard (cooldown and
//! inactivity expiry), the controller state machine, and the transport seam.
//! Hosts supply the clock, the expiry timer and the transport.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod clock;
pub mod controller;
pub mod copy;
pub mod error;
pub mod format;
pub mod guard;
#[cfg(feature = "http")]
pub mod http;
pub mod transport;
pub mod validate;
pub mod view;

pub use clock::{Millis, unix_millis_now};
pub use controller::{
    FieldId, FormController, FormFields, FormOptions, PendingSubmission, SubmissionState,
    SubmissionTicket,
};
pub use error::{FormError, REMOTE_FALLBACK_MESSAGE, ValidationError};
pub use format::{
    PHONE_DISPLAY_MAX_LEN, PHONE_DISPLAY_PLACEHOLDER, format_name_display, format_phone_display,
    format_phone_for_submission, mask_phone_for_log,
};
pub use guard::{
    DEFAULT_SESSION_TIMEOUT, DEFAULT_SUBMISSION_COOLDOWN, ExpiryTimer, GuardClock,
    NoopExpiryTimer, can_submit_now, schedule_session_expiry,
};
#[cfg(feature = "http")]
pub use http::{Endpoint, HttpTransport, TransportBuildError};
pub use transport::{
    AUTH_HEADER, DEFAULT_REQUEST_TIMEOUT, LeadSubmission, RELAY_SUBMIT_PATH, RemoteResult,
    SubmitTransport, classify_response,
};
pub use validate::{has_consent, is_complete_name, is_valid_phone, validate_submission};
pub use view::{FormView, Panel};
