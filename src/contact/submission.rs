//! The contact form submission workflow.
//!
//! validate every field -> disable the submit control -> take a rate-limit
//! slot -> hand the message to the transport -> reset on success.
//! A failed validation or a busy control never consumes a slot and never
//! reaches the transport.

use crate::contact::rate_limiter::SubmissionRateLimiter;
use crate::contact::transport::{ContactMessage, Transport};
use crate::contact::validator::{validate_field, FieldValidationResult, FormField};
use crate::i18n::{Language, LanguageStrings};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

/// Terminal state of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Accepted,
    RejectedValidation,
    /// The control was already disabled by a submission still sending.
    RejectedInProgress,
    RejectedRateLimited,
    RejectedTransport,
}

impl SubmissionOutcome {
    /// Banner shown for this outcome. Validation failures are reported
    /// inline per field and have no banner.
    pub fn banner(&self, language: Language) -> Option<&'static str> {
        let strings = LanguageStrings::for_language(language);
        match self {
            SubmissionOutcome::Accepted => Some(strings.submit_success),
            SubmissionOutcome::RejectedValidation => None,
            SubmissionOutcome::RejectedInProgress => Some(strings.submission_in_progress),
            SubmissionOutcome::RejectedRateLimited => Some(strings.rate_limited),
            SubmissionOutcome::RejectedTransport => Some(strings.transport_failed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub name: String,
    #[serde(flatten)]
    pub result: FieldValidationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub outcome: SubmissionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub fields: Vec<FieldReport>,
}

/// The form's controls and their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    fields: Vec<FormField>,
}

impl ContactForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn validate(&self, language: Language) -> Vec<FieldReport> {
        self.fields
            .iter()
            .map(|field| FieldReport {
                name: field.name.clone(),
                result: validate_field(field, language),
            })
            .collect()
    }

    /// Clear every value, keeping the controls.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
    }

    pub fn to_message(&self, language: Language) -> ContactMessage {
        ContactMessage {
            language,
            fields: self
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.value.trim().to_string()))
                .collect(),
        }
    }
}

/// The submit button: disabled while a message is being sent.
#[derive(Debug, Default)]
pub struct SubmitControl {
    disabled: AtomicBool,
}

impl SubmitControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Button label for the current state.
    pub fn label(&self, language: Language) -> &'static str {
        let strings = LanguageStrings::for_language(language);
        if self.is_disabled() {
            strings.sending
        } else {
            strings.send
        }
    }

    /// Disable the control until the returned guard is dropped.
    ///
    /// Returns `None` when the control is already disabled.
    pub fn disable(&self) -> Option<SubmitGuard<'_>> {
        self.disabled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SubmitGuard { control: self })
    }
}

/// Re-enables its control on drop, including during unwinding.
#[derive(Debug)]
pub struct SubmitGuard<'a> {
    control: &'a SubmitControl,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.control.disabled.store(false, Ordering::SeqCst);
    }
}

/// Something that admits or refuses a submission at a point in time.
pub trait SubmissionGate {
    fn try_acquire(&mut self, now_millis: i64) -> bool;
}

impl SubmissionGate for &mut SubmissionRateLimiter {
    fn try_acquire(&mut self, now_millis: i64) -> bool {
        SubmissionRateLimiter::try_acquire(self, now_millis)
    }
}

impl SubmissionGate for &Mutex<SubmissionRateLimiter> {
    fn try_acquire(&mut self, now_millis: i64) -> bool {
        let mut limiter = match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        limiter.try_acquire(now_millis)
    }
}

/// Run one submission attempt.
///
/// If the control is already disabled (a previous attempt is still
/// sending) the attempt is refused as in progress before the rate limit
/// is consulted.
pub async fn submit<G, T>(
    form: &mut ContactForm,
    mut gate: G,
    control: &SubmitControl,
    transport: &T,
    language: Language,
    now_millis: i64,
) -> SubmissionReport
where
    G: SubmissionGate,
    T: Transport,
{
    let fields = form.validate(language);

    if fields.iter().any(|f| !f.result.valid) {
        info!(
            "Contact submission rejected: {} invalid field(s)",
            fields.iter().filter(|f| !f.result.valid).count()
        );
        return SubmissionReport {
            outcome: SubmissionOutcome::RejectedValidation,
            message: None,
            fields,
        };
    }

    let outcome = {
        let Some(_guard) = control.disable() else {
            info!("Contact submission rejected: another is still sending");
            return report(SubmissionOutcome::RejectedInProgress, language, fields);
        };

        if !gate.try_acquire(now_millis) {
            info!("Contact submission rejected: rate limit reached");
            return report(SubmissionOutcome::RejectedRateLimited, language, fields);
        }

        match transport.send(&form.to_message(language)).await {
            Ok(()) => SubmissionOutcome::Accepted,
            Err(e) => {
                warn!("Contact submission transport failed: {}", e);
                SubmissionOutcome::RejectedTransport
            }
        }
    };

    if outcome == SubmissionOutcome::Accepted {
        info!("Contact submission accepted");
        form.reset();
    }

    report(outcome, language, fields)
}

fn report(
    outcome: SubmissionOutcome,
    language: Language,
    fields: Vec<FieldReport>,
) -> SubmissionReport {
    SubmissionReport {
        outcome,
        message: outcome.banner(language).map(str::to_string),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::rate_limiter::RateLimiterConfig;
    use crate::contact::transport::TransportError;
    use std::future::Future;
    use std::sync::atomic::AtomicU32;

    #[derive(Default)]
    struct RecordingTransport {
        calls: AtomicU32,
        fail: bool,
        saw_disabled: AtomicBool,
        control: Option<std::sync::Arc<SubmitControl>>,
    }

    impl Transport for RecordingTransport {
        fn send(
            &self,
            _message: &ContactMessage,
        ) -> impl Future<Output = Result<(), TransportError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(control) = &self.control {
                self.saw_disabled
                    .store(control.is_disabled(), Ordering::SeqCst);
            }
            let fail = self.fail;
            async move {
                if fail {
                    Err(TransportError::Status {
                        status: 500,
                        body: "boom".to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    fn valid_form() -> ContactForm {
        ContactForm::new(vec![
            FormField::new("name", "Kamal Silva", true),
            FormField::new("email", "kamal@example.com", true),
            FormField::new("phone", "0771234567", false),
            FormField::new("message", "Milk collection times?", true),
        ])
    }

    fn invalid_form() -> ContactForm {
        ContactForm::new(vec![
            FormField::new("name", "", true),
            FormField::new("email", "not-an-email", true),
        ])
    }

    fn limiter() -> SubmissionRateLimiter {
        SubmissionRateLimiter::new(RateLimiterConfig::default())
    }

    #[tokio::test]
    async fn test_accepted_submission_resets_form() {
        let mut form = valid_form();
        let mut limiter = limiter();
        let control = SubmitControl::new();
        let transport = RecordingTransport::default();

        let report = submit(
            &mut form,
            &mut limiter,
            &control,
            &transport,
            Language::ENGLISH,
            0,
        )
        .await;

        assert_eq!(report.outcome, SubmissionOutcome::Accepted);
        assert_eq!(
            report.message.as_deref(),
            Some("Thank you! Your message has been sent successfully.")
        );
        assert!(form.fields().iter().all(|f| f.value.is_empty()));
        assert_eq!(form.fields().len(), 4);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(limiter.len(), 1);
        assert!(!control.is_disabled());
    }

    #[tokio::test]
    async fn test_validation_failure_consumes_no_slot() {
        let mut form = invalid_form();
        let mut limiter = limiter();
        let control = SubmitControl::new();
        let transport = RecordingTransport::default();

        let before = limiter.remaining(0);
        let report = submit(
            &mut form,
            &mut limiter,
            &control,
            &transport,
            Language::ENGLISH,
            0,
        )
        .await;

        assert_eq!(report.outcome, SubmissionOutcome::RejectedValidation);
        assert!(report.message.is_none());
        assert_eq!(limiter.remaining(0), before);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(form, invalid_form());

        let name = &report.fields[0];
        assert_eq!(name.result.message.as_deref(), Some("This field is required"));
        let email = &report.fields[1];
        assert_eq!(
            email.result.message.as_deref(),
            Some("Please enter a valid email address")
        );
    }

    #[tokio::test]
    async fn test_fourth_submission_is_rate_limited() {
        let mut limiter = limiter();
        let control = SubmitControl::new();
        let transport = RecordingTransport::default();

        for t in 0..3 {
            let mut form = valid_form();
            let report = submit(
                &mut form,
                &mut limiter,
                &control,
                &transport,
                Language::SINHALA,
                t * 1000,
            )
            .await;
            assert_eq!(report.outcome, SubmissionOutcome::Accepted);
        }

        let mut form = valid_form();
        let report = submit(
            &mut form,
            &mut limiter,
            &control,
            &transport,
            Language::SINHALA,
            4000,
        )
        .await;

        assert_eq!(report.outcome, SubmissionOutcome::RejectedRateLimited);
        assert_eq!(
            report.message.as_deref(),
            Some("බොහෝ ඉල්ලීම්. කරුණාකර පසුව නැවත උත්සාහ කරන්න.")
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        // A throttled form keeps what the user typed
        assert_eq!(form, valid_form());
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_form_and_reenables_control() {
        let mut form = valid_form();
        let mut limiter = limiter();
        let control = std::sync::Arc::new(SubmitControl::new());
        let transport = RecordingTransport {
            fail: true,
            control: Some(control.clone()),
            ..Default::default()
        };

        let report = submit(
            &mut form,
            &mut limiter,
            control.as_ref(),
            &transport,
            Language::ENGLISH,
            0,
        )
        .await;

        assert_eq!(report.outcome, SubmissionOutcome::RejectedTransport);
        assert_eq!(
            report.message.as_deref(),
            Some("Sorry, there was an error sending your message. Please try again.")
        );
        assert!(transport.saw_disabled.load(Ordering::SeqCst));
        assert!(!control.is_disabled());
        assert_eq!(form, valid_form());
        // The slot was spent even though delivery failed
        assert_eq!(limiter.len(), 1);
    }

    #[tokio::test]
    async fn test_mutex_gate() {
        let limiter = Mutex::new(limiter());
        let control = SubmitControl::new();
        let transport = RecordingTransport::default();

        for _ in 0..3 {
            let mut form = valid_form();
            let report =
                submit(&mut form, &limiter, &control, &transport, Language::ENGLISH, 0).await;
            assert_eq!(report.outcome, SubmissionOutcome::Accepted);
        }

        let mut form = valid_form();
        let report = submit(&mut form, &limiter, &control, &transport, Language::ENGLISH, 1).await;
        assert_eq!(report.outcome, SubmissionOutcome::RejectedRateLimited);
    }

    #[tokio::test]
    async fn test_busy_control_consumes_no_slot() {
        let mut form = valid_form();
        let mut limiter = limiter();
        let control = SubmitControl::new();
        let transport = RecordingTransport::default();

        let _sending = control.disable();
        let report = submit(
            &mut form,
            &mut limiter,
            &control,
            &transport,
            Language::ENGLISH,
            0,
        )
        .await;

        assert_eq!(report.outcome, SubmissionOutcome::RejectedInProgress);
        assert_eq!(
            report.message.as_deref(),
            Some("Your message is already being sent.")
        );
        assert_eq!(limiter.len(), 0);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(form, valid_form());
        // Still held by the first submission
        assert!(control.is_disabled());
    }

    #[tokio::test]
    async fn test_rate_limited_attempt_reenables_control() {
        let mut limiter = SubmissionRateLimiter::new(RateLimiterConfig::new(
            0,
            std::time::Duration::from_secs(60),
        ));
        let control = SubmitControl::new();
        let transport = RecordingTransport::default();

        let mut form = valid_form();
        let report = submit(
            &mut form,
            &mut limiter,
            &control,
            &transport,
            Language::ENGLISH,
            0,
        )
        .await;

        assert_eq!(report.outcome, SubmissionOutcome::RejectedRateLimited);
        assert!(!control.is_disabled());
    }

    #[test]
    fn test_submit_control_guard() {
        let control = SubmitControl::new();
        assert_eq!(control.label(Language::ENGLISH), "Send Message");

        {
            let guard = control.disable();
            assert!(guard.is_some());
            assert!(control.is_disabled());
            assert!(control.disable().is_none());
            assert_eq!(control.label(Language::ENGLISH), "Sending...");
            assert_eq!(control.label(Language::SINHALA), "යවමින්...");
        }

        assert!(!control.is_disabled());
    }

    #[test]
    fn test_submit_control_reenabled_after_panic() {
        let control = SubmitControl::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = control.disable();
            panic!("transport blew up");
        }));

        assert!(result.is_err());
        assert!(!control.is_disabled());
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&SubmissionOutcome::RejectedRateLimited).unwrap();
        assert_eq!(json, "\"rejected_rate_limited\"");
    }

    #[test]
    fn test_to_message_trims_values() {
        let form = ContactForm::new(vec![FormField::new("email", "  a@b.lk ", true)]);
        let message = form.to_message(Language::ENGLISH);
        assert_eq!(message.fields["email"], "a@b.lk");
    }
}
