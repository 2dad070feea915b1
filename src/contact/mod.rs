//! Contact form: field validation, submission throttling and delivery.

pub mod rate_limiter;
pub mod submission;
pub mod transport;
pub mod validator;

pub use rate_limiter::{RateLimiterConfig, SubmissionRateLimiter};
pub use submission::{
    submit, ContactForm, FieldReport, SubmissionGate, SubmissionOutcome, SubmissionReport,
    SubmitControl, SubmitGuard,
};
pub use transport::{
    ContactMessage, ContactTransport, HttpTransport, SimulatedTransport, Transport, TransportError,
};
pub use validator::{validate_field, FieldKind, FieldValidationResult, FormField};
