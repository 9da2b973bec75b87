use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use super::models::{FormKind, FormPayload};
use super::validate::Validate;
use crate::config::AppConfig;
use crate::{Error, Result};

/// Sends a flat payload to a hosted form endpoint
#[async_trait::async_trait]
pub trait FormTransport: Send + Sync {
    /// POST `payload` as JSON; returns the HTTP status code
    async fn post(&self, endpoint: &Url, payload: &Map<String, Value>) -> Result<u16>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("averbuch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl FormTransport for HttpTransport {
    async fn post(&self, endpoint: &Url, payload: &Map<String, Value>) -> Result<u16> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}

/// Proof of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub kind: FormKind,
    pub status: u16,
    pub submitted_at: DateTime<Utc>,
}

/// Outcome of one submission attempt; never retried
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Submitted(Receipt),
    Failed { kind: FormKind, reason: String },
}

impl SubmissionOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted(_))
    }

    pub fn kind(&self) -> FormKind {
        match self {
            SubmissionOutcome::Submitted(receipt) => receipt.kind,
            SubmissionOutcome::Failed { kind, .. } => *kind,
        }
    }

    /// Inline message shown under the form
    pub fn message(&self) -> &'static str {
        messages(self.kind(), self.is_submitted())
    }
}

fn messages(kind: FormKind, success: bool) -> &'static str {
    match (kind, success) {
        (FormKind::Inquiry, true) => {
            "Thank you! Your inquiry has been sent successfully. We'll get back to you soon."
        }
        (FormKind::Inquiry, false) => {
            "There was an error sending your inquiry. Please try again or contact us directly."
        }
        (FormKind::Application, true) => {
            "Thank you! Your application has been submitted successfully. We'll review it and get back to you soon."
        }
        (FormKind::Application, false) => {
            "There was an error submitting your application. Please try again or contact us directly."
        }
    }
}

/// Lifecycle of a form on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Per-form submission state, driving the button label and status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormState {
    kind: FormKind,
    status: SubmissionStatus,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            status: SubmissionStatus::Idle,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Enter `Submitting`; refused while a submission is in flight
    pub fn begin(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.status = SubmissionStatus::Submitting;
        true
    }

    /// Record the outcome of the in-flight submission
    pub fn finish(&mut self, outcome: &SubmissionOutcome) {
        self.status = if outcome.is_submitted() {
            SubmissionStatus::Success
        } else {
            SubmissionStatus::Error
        };
    }

    /// Client-side rejection before anything was sent
    pub fn reject(&mut self) {
        self.status = SubmissionStatus::Error;
    }

    pub fn button_label(&self) -> &'static str {
        match (self.kind, self.is_submitting()) {
            (FormKind::Inquiry, true) => "Sending...",
            (FormKind::Inquiry, false) => "Send Inquiry",
            (FormKind::Application, true) => "Submitting...",
            (FormKind::Application, false) => "Submit Application",
        }
    }

    /// Status message, if one should be shown
    pub fn message(&self) -> Option<&'static str> {
        match self.status {
            SubmissionStatus::Success => Some(messages(self.kind, true)),
            SubmissionStatus::Error => Some(messages(self.kind, false)),
            _ => None,
        }
    }
}

/// Submits forms to their configured endpoints
pub struct FormClient<T: FormTransport> {
    transport: T,
    inquiry_endpoint: Url,
    application_endpoint: Url,
}

impl FormClient<HttpTransport> {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Self::new(
            transport,
            &config.forms.inquiry_endpoint,
            &config.forms.application_endpoint,
        )
    }
}

impl<T: FormTransport> FormClient<T> {
    pub fn new(transport: T, inquiry_endpoint: &str, application_endpoint: &str) -> Result<Self> {
        Ok(Self {
            transport,
            inquiry_endpoint: Url::parse(inquiry_endpoint)?,
            application_endpoint: Url::parse(application_endpoint)?,
        })
    }

    pub fn endpoint(&self, kind: FormKind) -> &Url {
        match kind {
            FormKind::Inquiry => &self.inquiry_endpoint,
            FormKind::Application => &self.application_endpoint,
        }
    }

    /// Validate, then send exactly once.
    ///
    /// Validation failures are returned as `Err` and nothing is sent; every
    /// transport outcome (including network errors) becomes a
    /// [`SubmissionOutcome`].
    pub async fn submit<F>(&self, form: &F) -> Result<SubmissionOutcome>
    where
        F: FormPayload + Validate + Sync,
    {
        form.validate()?;
        Ok(self.send(form.kind(), form.payload()).await)
    }

    async fn send(&self, kind: FormKind, payload: Map<String, Value>) -> SubmissionOutcome {
        let endpoint = self.endpoint(kind);
        tracing::debug!(%kind, %endpoint, fields = payload.len(), "Submitting form");

        match self.transport.post(endpoint, &payload).await {
            Ok(status) if (200..300).contains(&status) => {
                tracing::info!(%kind, status, "Form submitted");
                SubmissionOutcome::Submitted(Receipt {
                    kind,
                    status,
                    submitted_at: Utc::now(),
                })
            }
            Ok(status) => {
                tracing::warn!(%kind, status, "Form endpoint rejected submission");
                SubmissionOutcome::Failed {
                    kind,
                    reason: format!("endpoint returned HTTP {}", status),
                }
            }
            Err(e) => {
                tracing::error!(%kind, "Form submission error: {}", e);
                SubmissionOutcome::Failed {
                    kind,
                    reason: e.to_string(),
                }
            }
        }
    }
}
