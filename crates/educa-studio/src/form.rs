//! Form lifecycle shared by every generator view.
//!
//! A form is `Idle` until submitted, `Submitting` while its request is in
//! flight, then `Succeeded` or `Failed`. The status is a tagged enum, so a
//! form cannot be submitting and failed at the same time.
//!
//! ```text
//! Idle ──submit──> Submitting ──ok──> Succeeded ──submit──> Submitting
//!                      ├──abandoned──> Idle
//!                      └──err──> Failed ──edit / dismiss──> Idle
//!                                  └──submit──> Submitting
//! ```

use chrono::{DateTime, Utc};
use educa_genai::{ContentClient, GenerationError, GenerationTask};
use educa_render::Artifact;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FormError, Result, StudioError};

// ============================================================================
// FormStatus
// ============================================================================

/// Where a form is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormStatus {
    /// Waiting for input.
    #[default]
    Idle,
    /// A request is in flight.
    Submitting {
        /// Identifies the in-flight request.
        ticket: u64,
    },
    /// The last request produced a result.
    Succeeded,
    /// The last request failed.
    Failed {
        /// What went wrong, for display.
        message: String,
    },
}

impl FormStatus {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Returns `true` if the last request failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitting { ticket } => write!(f, "submitting (#{ticket})"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed { message } => write!(f, "failed: {message}"),
        }
    }
}

/// Proof of an in-flight submission, handed back to [`FormSession::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

impl SubmitTicket {
    /// Numeric id, as shown in [`FormStatus::Submitting`].
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// What [`FormSession::settle`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The result was stored and the form succeeded.
    Succeeded,
    /// The form moved to `Failed`.
    Failed,
    /// The ticket no longer matches; the result was dropped.
    Stale,
}

// ============================================================================
// FormSpec
// ============================================================================

/// Help text for one input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldHint {
    /// Wire name of the field.
    pub field: &'static str,
    /// pt-BR label.
    pub label: &'static str,
    /// pt-BR placeholder or example.
    pub placeholder: &'static str,
    /// Whether the field must be filled in.
    pub required: bool,
}

/// The typed input of one generator view.
pub trait FormSpec: Clone + Serialize + Send + Sync + 'static {
    /// Decoded result type.
    type Output: Clone + Serialize + Send + Sync + 'static;

    /// Generation task built from the input.
    type Task: GenerationTask<Output = Self::Output> + Send + Sync;

    /// Whether an in-flight request hides the previous result.
    const CLEARS_RESULT_ON_SUBMIT: bool = false;

    /// Required fields, as `(wire name, value)` pairs.
    fn required_fields(&self) -> Vec<(&'static str, &str)>;

    /// Label and placeholder of every field.
    fn hints(&self) -> Vec<FieldHint>;

    /// Builds the generation task for the current input.
    fn to_task(&self) -> Self::Task;

    /// Wraps a result for rendering.
    fn artifact(&self, output: &Self::Output) -> Artifact;

    /// Replaces the input with `incoming`. Forms with fixed settings
    /// override this to keep them.
    fn merge(&mut self, incoming: Self) {
        *self = incoming;
    }

    /// First required field that is blank, if any.
    fn first_missing(&self) -> Option<&'static str> {
        self.required_fields()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

// ============================================================================
// FormSession
// ============================================================================

/// Input, status and last result of one generator view.
#[derive(Debug, Clone)]
pub struct FormSession<F: FormSpec> {
    input: F,
    status: FormStatus,
    result: Option<F::Output>,
    completed_at: Option<DateTime<Utc>>,
    next_ticket: u64,
}

/// Serializable view of a session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot<'a, F: FormSpec> {
    /// Current input.
    pub input: &'a F,
    /// Lifecycle status.
    pub status: &'a FormStatus,
    /// Whether a submit would be accepted now.
    pub can_submit: bool,
    /// Last successful result.
    pub result: Option<&'a F::Output>,
    /// When the result was produced.
    pub completed_at: Option<DateTime<Utc>>,
    /// Field labels and placeholders.
    pub hints: Vec<FieldHint>,
}

impl<F: FormSpec> FormSession<F> {
    /// Creates an idle session with `input`.
    #[must_use]
    pub const fn new(input: F) -> Self {
        Self {
            input,
            status: FormStatus::Idle,
            result: None,
            completed_at: None,
            next_ticket: 1,
        }
    }

    /// Current input.
    #[must_use]
    pub const fn input(&self) -> &F {
        &self.input
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Last successful result.
    #[must_use]
    pub const fn result(&self) -> Option<&F::Output> {
        self.result.as_ref()
    }

    /// When the last result was produced.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns `true` iff every required field is filled in and no request
    /// is in flight.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.status.is_submitting() && self.input.first_missing().is_none()
    }

    /// Edits the input in place. A failed form goes back to `Idle`.
    pub fn edit(&mut self, f: impl FnOnce(&mut F)) {
        f(&mut self.input);
        self.clear_failure();
    }

    /// Replaces the input through [`FormSpec::merge`]. A failed form goes
    /// back to `Idle`.
    pub fn update(&mut self, incoming: F) {
        self.input.merge(incoming);
        self.clear_failure();
    }

    /// Acknowledges a failure. Returns `true` if the form was `Failed`.
    pub fn dismiss(&mut self) -> bool {
        self.clear_failure()
    }

    /// Drops the result and any in-flight request, keeping the input.
    pub fn reset(&mut self) {
        self.status = FormStatus::Idle;
        self.result = None;
        self.completed_at = None;
    }

    fn clear_failure(&mut self) -> bool {
        if self.status.is_failed() {
            self.status = FormStatus::Idle;
            true
        } else {
            false
        }
    }

    /// Starts a submission.
    ///
    /// # Errors
    ///
    /// Returns `FormError::AlreadySubmitting` while a request is in flight
    /// and `FormError::MissingField` when a required field is blank.
    pub fn begin_submit(&mut self) -> std::result::Result<SubmitTicket, FormError> {
        if self.status.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        if let Some(field) = self.input.first_missing() {
            return Err(FormError::MissingField { field });
        }

        let ticket = SubmitTicket(self.next_ticket);
        self.next_ticket += 1;
        self.status = FormStatus::Submitting { ticket: ticket.0 };
        if F::CLEARS_RESULT_ON_SUBMIT {
            self.result = None;
            self.completed_at = None;
        }
        debug!(ticket = ticket.0, "Form submitted");
        Ok(ticket)
    }

    /// Applies the outcome of the submission identified by `ticket`.
    ///
    /// Outcomes for any other ticket are dropped. On failure the previous
    /// result and the input are kept.
    pub fn settle(
        &mut self,
        ticket: SubmitTicket,
        outcome: std::result::Result<F::Output, GenerationError>,
    ) -> Settled {
        match outcome {
            Ok(output) => self.settle_success(ticket, output),
            Err(e) => self.settle_failure(ticket, e.to_string()),
        }
    }

    /// Returns the form to `Idle` when the caller gave up on `ticket`
    /// before it settled. Returns `false` if that submission is no longer
    /// the one in flight.
    pub fn abandon(&mut self, ticket: SubmitTicket) -> bool {
        if self.status != (FormStatus::Submitting { ticket: ticket.0 }) {
            return false;
        }
        warn!(ticket = ticket.0, "Submission abandoned before it settled");
        self.status = FormStatus::Idle;
        true
    }

    fn is_current(&self, ticket: SubmitTicket) -> bool {
        let current = self.status == (FormStatus::Submitting { ticket: ticket.0 });
        if !current {
            warn!(
                ticket = ticket.0,
                status = %self.status,
                "Dropping stale generation result"
            );
        }
        current
    }

    fn settle_success(&mut self, ticket: SubmitTicket, output: F::Output) -> Settled {
        if !self.is_current(ticket) {
            return Settled::Stale;
        }
        self.result = Some(output);
        self.completed_at = Some(Utc::now());
        self.status = FormStatus::Succeeded;
        Settled::Succeeded
    }

    fn settle_failure(&mut self, ticket: SubmitTicket, message: String) -> Settled {
        if !self.is_current(ticket) {
            return Settled::Stale;
        }
        self.status = FormStatus::Failed { message };
        Settled::Failed
    }

    /// Submits and waits for the result in one call.
    ///
    /// For callers that own the session outright; shared sessions go through
    /// [`Self::begin_submit`] and [`Self::settle`] so no lock is held while
    /// the provider works.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Form` when the submission is rejected locally
    /// and `StudioError::Generation` when the provider call fails.
    pub async fn submit(&mut self, client: &ContentClient) -> Result<&F::Output> {
        let ticket = self.begin_submit()?;
        let task = self.input.to_task();

        match client.run(&task).await {
            Ok(output) => match self.settle_success(ticket, output) {
                Settled::Succeeded => self.result.as_ref().ok_or(StudioError::StaleResult),
                Settled::Failed | Settled::Stale => Err(StudioError::StaleResult),
            },
            Err(e) => {
                self.settle_failure(ticket, e.to_string());
                Err(StudioError::generation(e))
            }
        }
    }

    /// The last result wrapped for rendering.
    #[must_use]
    pub fn artifact(&self) -> Option<Artifact> {
        self.result.as_ref().map(|r| self.input.artifact(r))
    }

    /// Serializable view of the session.
    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot<'_, F> {
        FormSnapshot {
            input: &self.input,
            status: &self.status,
            can_submit: self.can_submit(),
            result: self.result.as_ref(),
            completed_at: self.completed_at,
            hints: self.input.hints(),
        }
    }

    /// Replaces the stored result.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NoResult` before the first success and
    /// `FormError::AlreadySubmitting` while a request is in flight.
    pub(crate) fn replace_result(
        &mut self,
        output: F::Output,
    ) -> std::result::Result<(), FormError> {
        if self.status.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        match self.result.as_mut() {
            Some(current) => {
                *current = output;
                Ok(())
            }
            None => Err(FormError::NoResult),
        }
    }
}

impl<F: FormSpec + Default> Default for FormSession<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}
