//! The lead form state machine.
//!
//! `Editing -> Submitting -> {Success, AlreadyRedeemed, Error}`, and back to
//! `Editing` on the next edit or an explicit retry. Validation and cooldown
//! failures go straight from `Editing` to `Error` without a network call.
//!
//! A submission is split in two so UI hosts never keep the controller
//! borrowed across the network await: [`FormController::begin_submit`] hands
//! out a ticketed payload, [`FormController::complete_submit`] takes the
//! classified reply. [`FormController::submit`] chains both for hosts that
//! own the controller outright.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock::Millis;
use crate::error::FormError;
use crate::format::{format_name_display, format_phone_display, mask_phone_for_log};
use crate::guard::{
    DEFAULT_SESSION_TIMEOUT, DEFAULT_SUBMISSION_COOLDOWN, ExpiryTimer, GuardClock, GuardSettings,
    NoopExpiryTimer, SubmissionGuard,
};
use crate::transport::{LeadSubmission, RemoteResult, SubmitTransport};
use crate::validate::validate_submission;

/// Switches covering the product iterations of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    pub consent_required: bool,
    pub session_timeout_enabled: bool,
    pub cooldown_enabled: bool,
    pub cooldown: Duration,
    pub session_timeout: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            consent_required: true,
            session_timeout_enabled: true,
            cooldown_enabled: true,
            cooldown: DEFAULT_SUBMISSION_COOLDOWN,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }
}

impl FormOptions {
    fn guard_settings(self) -> GuardSettings {
        GuardSettings {
            cooldown_enabled: self.cooldown_enabled,
            cooldown: self.cooldown,
            session_timeout_enabled: self.session_timeout_enabled,
            session_timeout: self.session_timeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    FirstName,
    LastName,
    MobilePhone,
}

impl FieldId {
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::MobilePhone];

    /// Input `name` attribute, matching the wire field names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::MobilePhone => "mobile_phone",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

/// Field values as displayed. Names are title-cased and the phone is masked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub first_name: String,
    pub last_name: String,
    pub phone_display: String,
}

impl FormFields {
    #[must_use]
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::FirstName => &self.first_name,
            FieldId::LastName => &self.last_name,
            FieldId::MobilePhone => &self.phone_display,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Editing,
    Submitting,
    Success { message: Option<String> },
    AlreadyRedeemed,
    Error(FormError),
}

impl SubmissionState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Success { .. } => "success",
            Self::AlreadyRedeemed => "already_redeemed",
            Self::Error(_) => "error",
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FormError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Outcome states that replace the form with a result panel.
    #[must_use]
    pub fn is_outcome(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::AlreadyRedeemed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// Payload released by a successful `Editing -> Submitting` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub lead: LeadSubmission,
}

pub struct FormController {
    options: FormOptions,
    fields: FormFields,
    consent: bool,
    state: SubmissionState,
    guard: SubmissionGuard,
    next_ticket: u64,
    in_flight: Option<SubmissionTicket>,
}

impl FormController {
    pub fn new(options: FormOptions, timer: Box<dyn ExpiryTimer>) -> Self {
        Self {
            options,
            fields: FormFields::default(),
            consent: false,
            state: SubmissionState::Editing,
            guard: SubmissionGuard::new(options.guard_settings(), timer),
            next_ticket: 0,
            in_flight: None,
        }
    }

    /// Controller for hosts with no session timer.
    pub fn without_expiry_timer(options: FormOptions) -> Self {
        Self::new(options, Box::new(NoopExpiryTimer))
    }

    #[must_use]
    pub fn options(&self) -> FormOptions {
        self.options
    }

    #[must_use]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    #[must_use]
    pub fn consent(&self) -> bool {
        self.consent
    }

    #[must_use]
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    #[must_use]
    pub fn guard_clock(&self) -> GuardClock {
        self.guard.clock()
    }

    /// Formats `raw` for `field`, stores it, and returns the stored value so
    /// the host can write it back into the input.
    ///
    /// Edits made while `Submitting` are kept only until the reply lands:
    /// Success and AlreadyRedeemed clear the fields. Hosts lock their inputs
    /// for that window (see `FormView::inputs_disabled`).
    pub fn set_field(&mut self, field: FieldId, raw: &str) -> &str {
        self.return_to_editing();
        match field {
            FieldId::FirstName => {
                self.fields.first_name = format_name_display(raw);
                &self.fields.first_name
            }
            FieldId::LastName => {
                self.fields.last_name = format_name_display(raw);
                &self.fields.last_name
            }
            FieldId::MobilePhone => {
                self.fields.phone_display = format_phone_display(raw);
                &self.fields.phone_display
            }
        }
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
        self.return_to_editing();
    }

    /// Pointer or key activity; pushes the session expiry out.
    pub fn record_activity(&mut self, now: Millis) -> Option<Millis> {
        self.guard.record_activity(now)
    }

    /// Called by the host when its expiry timer fires. Returns true when the
    /// form was reset.
    pub fn handle_session_expiry(&mut self, now: Millis) -> bool {
        if !self.guard.take_expiry(now) {
            return false;
        }
        info!(state = self.state.as_str(), "lead form session expired");
        self.fields = FormFields::default();
        self.consent = false;
        self.in_flight = None;
        self.state = SubmissionState::Error(FormError::SessionExpired);
        true
    }

    pub fn begin_submit(&mut self, now: Millis) -> Result<PendingSubmission, FormError> {
        if self.in_flight.is_some() {
            return Err(FormError::SubmissionInFlight);
        }

        let lead = validate_submission(&self.fields, self.consent, self.options.consent_required)
            .map_err(|error| self.fail(error.into()))?;

        if !self.guard.allows_submission(now) {
            return Err(self.fail(FormError::RateLimited));
        }

        self.guard.record_submission(now);
        self.next_ticket += 1;
        let ticket = SubmissionTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        self.state = SubmissionState::Submitting;
        info!(
            phone = %mask_phone_for_log(&lead.mobile_phone),
            "lead submission started"
        );

        Ok(PendingSubmission { ticket, lead })
    }

    /// Applies the reply for `ticket`. Replies for a ticket that is no longer
    /// in flight are dropped and false is returned.
    pub fn complete_submit(&mut self, ticket: SubmissionTicket, result: RemoteResult) -> bool {
        if self.in_flight != Some(ticket) {
            debug!(outcome = result.as_str(), "dropping stale submission reply");
            return false;
        }
        self.in_flight = None;

        self.state = match result {
            RemoteResult::Issued { message } => {
                info!("promotional code issued");
                self.fields = FormFields::default();
                SubmissionState::Success { message }
            }
            RemoteResult::AlreadyRedeemed => {
                info!("customer already redeemed a code");
                self.fields = FormFields::default();
                SubmissionState::AlreadyRedeemed
            }
            RemoteResult::Failed { message } => {
                let error = FormError::remote(message);
                warn!(%error, "lead submission failed");
                SubmissionState::Error(error)
            }
        };
        true
    }

    /// Runs one full attempt against `transport`.
    pub async fn submit<T>(&mut self, now: Millis, transport: &T) -> &SubmissionState
    where
        T: SubmitTransport + ?Sized,
    {
        if let Ok(pending) = self.begin_submit(now) {
            let result = transport.submit(&pending.lead).await;
            self.complete_submit(pending.ticket, result);
        }
        &self.state
    }

    /// Leaves an error or result panel without touching the fields.
    pub fn retry(&mut self) {
        self.return_to_editing();
    }

    pub fn reset(&mut self) {
        self.fields = FormFields::default();
        self.consent = false;
        self.in_flight = None;
        self.state = SubmissionState::Editing;
    }

    /// Cancels the pending session expiry. Dropping the controller does the
    /// same.
    pub fn teardown(mut self) {
        self.guard.release();
    }

    fn return_to_editing(&mut self) {
        if !matches!(
            self.state,
            SubmissionState::Editing | SubmissionState::Submitting
        ) {
            debug!(from = self.state.as_str(), "lead form back to editing");
            self.state = SubmissionState::Editing;
        }
    }

    fn fail(&mut self, error: FormError) -> FormError {
        debug!(kind = error.kind(), "lead submission rejected before sending");
        self.state = SubmissionState::Error(error.clone());
        error
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{REMOTE_FALLBACK_MESSAGE, ValidationError};

    struct ScriptedTransport {
        reply: RemoteResult,
        sent: RefCell<Vec<LeadSubmission>>,
    }

    impl ScriptedTransport {
        fn new(reply: RemoteResult) -> Self {
            Self {
                reply,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl SubmitTransport for ScriptedTransport {
        async fn submit(&self, lead: &LeadSubmission) -> RemoteResult {
            self.sent.borrow_mut().push(lead.clone());
            self.reply.clone()
        }
    }

    #[derive(Clone, Default)]
    struct CountingTimer {
        armed: Rc<RefCell<u32>>,
        cancelled: Rc<RefCell<u32>>,
    }

    impl ExpiryTimer for CountingTimer {
        fn arm(&mut self, _delay: Duration) {
            *self.armed.borrow_mut() += 1;
        }

        fn cancel(&mut self) {
            *self.cancelled.borrow_mut() += 1;
        }
    }

    fn filled_controller() -> FormController {
        let mut controller = FormController::without_expiry_timer(FormOptions::default());
        controller.set_field(FieldId::FirstName, "jane");
        controller.set_field(FieldId::LastName, "doe");
        controller.set_field(FieldId::MobilePhone, "5551234567");
        controller.set_consent(true);
        controller
    }

    #[test]
    fn field_edits_store_formatted_values() {
        let mut controller = FormController::without_expiry_timer(FormOptions::default());
        assert_eq!(controller.set_field(FieldId::FirstName, "jOHN   smith"), "John   Smith");
        assert_eq!(controller.set_field(FieldId::MobilePhone, "555123"), "(555)-123");
        assert_eq!(controller.fields().get(FieldId::MobilePhone), "(555)-123");
    }

    #[test]
    fn field_names_round_trip_through_input_names() {
        for field in FieldId::ALL {
            assert_eq!(FieldId::from_name(field.as_str()), Some(field));
        }
        assert_eq!(FieldId::from_name("consent"), None);
    }

    #[tokio::test]
    async fn successful_submission_sends_one_title_cased_payload() {
        let mut controller = filled_controller();
        let transport = ScriptedTransport::new(RemoteResult::Issued {
            message: Some("CODE123".to_string()),
        });

        let state = controller.submit(1_000, &transport).await.clone();

        assert_eq!(
            state,
            SubmissionState::Success {
                message: Some("CODE123".to_string())
            }
        );
        assert_eq!(
            *transport.sent.borrow(),
            vec![LeadSubmission {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                mobile_phone: "+15551234567".to_string(),
            }]
        );
        assert_eq!(controller.fields(), &FormFields::default());
        assert!(controller.consent());
    }

    #[tokio::test]
    async fn falsy_code_lands_in_already_redeemed() {
        let mut controller = filled_controller();
        let transport = ScriptedTransport::new(RemoteResult::AlreadyRedeemed);
        let state = controller.submit(1_000, &transport).await;
        assert_eq!(state, &SubmissionState::AlreadyRedeemed);
        assert!(state.is_outcome());
    }

    #[tokio::test]
    async fn network_failure_surfaces_fallback_message_once() {
        let mut controller = filled_controller();
        let transport = ScriptedTransport::new(RemoteResult::Failed { message: None });
        let state = controller.submit(1_000, &transport).await;
        assert_eq!(
            state,
            &SubmissionState::Error(FormError::Remote {
                message: REMOTE_FALLBACK_MESSAGE.to_string()
            })
        );
        assert_eq!(transport.sent.borrow().len(), 1);
        assert_eq!(controller.fields().first_name, "Jane");
    }

    #[tokio::test]
    async fn nine_digit_phone_never_reaches_the_network() {
        let mut controller = filled_controller();
        controller.set_field(FieldId::MobilePhone, "555123456");
        let transport = ScriptedTransport::new(RemoteResult::AlreadyRedeemed);

        let state = controller.submit(1_000, &transport).await;

        assert_eq!(
            state,
            &SubmissionState::Error(FormError::Validation(ValidationError::InvalidPhone))
        );
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(controller.guard_clock().last_submission_at, None);
    }

    #[test]
    fn missing_consent_blocks_when_required() {
        let mut controller = filled_controller();
        controller.set_consent(false);
        let error = controller.begin_submit(1_000).expect_err("consent required");
        assert_eq!(error, FormError::Validation(ValidationError::MissingConsent));

        let mut relaxed = FormController::without_expiry_timer(FormOptions {
            consent_required: false,
            ..FormOptions::default()
        });
        relaxed.set_field(FieldId::FirstName, "jane");
        relaxed.set_field(FieldId::LastName, "doe");
        relaxed.set_field(FieldId::MobilePhone, "5551234567");
        assert!(relaxed.begin_submit(1_000).is_ok());
    }

    #[test]
    fn submission_timestamp_is_recorded_before_the_reply() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit(7_000).expect("begin submit");
        assert_eq!(controller.state(), &SubmissionState::Submitting);
        assert_eq!(controller.guard_clock().last_submission_at, Some(7_000));
        assert_eq!(pending.lead.mobile_phone, "+15551234567");
    }

    #[test]
    fn second_submit_while_in_flight_is_refused_without_state_change() {
        let mut controller = filled_controller();
        controller.begin_submit(1_000).expect("first submit");
        let error = controller.begin_submit(1_001).expect_err("in flight");
        assert_eq!(error, FormError::SubmissionInFlight);
        assert_eq!(controller.state(), &SubmissionState::Submitting);
        assert_eq!(controller.guard_clock().last_submission_at, Some(1_000));
    }

    #[test]
    fn cooldown_rejects_rapid_resubmission_without_moving_the_clock() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit(1_000).expect("first submit");
        controller.complete_submit(pending.ticket, RemoteResult::Failed { message: None });

        let error = controller.begin_submit(30_999).expect_err("cooldown");
        assert_eq!(error, FormError::RateLimited);
        assert_eq!(controller.state(), &SubmissionState::Error(FormError::RateLimited));
        assert_eq!(controller.guard_clock().last_submission_at, Some(1_000));

        assert!(controller.begin_submit(31_000).is_ok());
    }

    #[test]
    fn validation_runs_before_cooldown() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit(1_000).expect("first submit");
        controller.complete_submit(pending.ticket, RemoteResult::Failed { message: None });
        controller.set_field(FieldId::LastName, " ");

        let error = controller.begin_submit(1_500).expect_err("incomplete name");
        assert_eq!(error, FormError::Validation(ValidationError::IncompleteName));
    }

    #[test]
    fn next_edit_clears_an_error() {
        let mut controller = filled_controller();
        controller.set_field(FieldId::MobilePhone, "555");
        controller.begin_submit(1_000).expect_err("invalid phone");
        assert!(controller.state().error().is_some());

        controller.set_field(FieldId::MobilePhone, "5551234567");
        assert_eq!(controller.state(), &SubmissionState::Editing);
    }

    #[test]
    fn retry_leaves_error_but_keeps_fields() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit(1_000).expect("submit");
        controller.complete_submit(
            pending.ticket,
            RemoteResult::Failed {
                message: Some("Workflow is paused".to_string()),
            },
        );
        assert_eq!(
            controller.state().error().map(ToString::to_string).as_deref(),
            Some("Workflow is paused")
        );

        controller.retry();
        assert_eq!(controller.state(), &SubmissionState::Editing);
        assert_eq!(controller.fields().last_name, "Doe");
    }

    #[test]
    fn session_expiry_resets_fields_and_consent() {
        let timer = CountingTimer::default();
        let mut controller = FormController::new(FormOptions::default(), Box::new(timer.clone()));
        controller.set_field(FieldId::FirstName, "jane");
        controller.set_consent(true);
        controller.record_activity(0);
        controller.record_activity(100_000);

        assert!(!controller.handle_session_expiry(300_000));
        assert_eq!(controller.fields().first_name, "Jane");
        assert_eq!(*timer.armed.borrow(), 3);

        assert!(controller.handle_session_expiry(400_000));
        assert_eq!(controller.fields(), &FormFields::default());
        assert!(!controller.consent());
        assert_eq!(
            controller.state(),
            &SubmissionState::Error(FormError::SessionExpired)
        );
        assert_eq!(*timer.armed.borrow(), 3);
    }

    #[test]
    fn early_expiry_firing_keeps_a_timer_pending() {
        let timer = CountingTimer::default();
        let mut controller = FormController::new(FormOptions::default(), Box::new(timer.clone()));
        controller.set_field(FieldId::FirstName, "jane");
        controller.record_activity(1_000);

        assert!(!controller.handle_session_expiry(300_999));
        assert_eq!(controller.fields().first_name, "Jane");
        assert_eq!(controller.guard_clock().session_deadline, Some(301_000));
        assert_eq!(*timer.armed.borrow(), 2);

        assert!(controller.handle_session_expiry(301_000));
        assert_eq!(controller.fields(), &FormFields::default());
    }

    #[test]
    fn reply_after_session_expiry_is_dropped() {
        let mut controller = filled_controller();
        controller.record_activity(0);

        let pending = controller.begin_submit(1_000).expect("submit");
        assert!(controller.handle_session_expiry(300_000));
        assert!(!controller.complete_submit(pending.ticket, RemoteResult::AlreadyRedeemed));
        assert_eq!(
            controller.state(),
            &SubmissionState::Error(FormError::SessionExpired)
        );
    }

    #[test]
    fn teardown_cancels_the_session_timer() {
        let timer = CountingTimer::default();
        let cancelled = Rc::clone(&timer.cancelled);
        let mut controller = FormController::new(FormOptions::default(), Box::new(timer));
        controller.record_activity(0);
        controller.teardown();
        assert!(*cancelled.borrow() >= 1);
    }

    #[test]
    fn reset_returns_to_an_empty_editing_form() {
        let mut controller = filled_controller();
        controller.begin_submit(1_000).expect("submit");
        controller.reset();
        assert_eq!(controller.state(), &SubmissionState::Editing);
        assert_eq!(controller.fields(), &FormFields::default());
        assert!(!controller.consent());
    }
}
