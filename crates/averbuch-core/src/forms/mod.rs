//! Contact inquiry and job application forms
//!
//! Forms are validated locally, flattened to a key/value payload and posted
//! once to a hosted endpoint. There are exactly two outcomes, submitted or
//! failed, and nothing is retried.

pub mod client;
pub mod models;
pub mod phone;
pub mod validate;

pub use client::{
    FormClient, FormState, FormTransport, HttpTransport, Receipt, SubmissionOutcome, SubmissionStatus,
};
pub use models::{ApplicationForm, FormKind, FormPayload, InquiryForm, Position};
pub use phone::format_phone;
pub use validate::{is_valid_email, FieldError, Validate};
