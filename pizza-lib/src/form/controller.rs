//! Order form controller
//!
//! Owns the field values, per-field messages, the derived submit flag and
//! the outcome banners. Work that suspends (field validation, the POST) is
//! handed out as self-contained jobs so the owner can run them anywhere and
//! feed the results back in:
//!
//! ```ignore
//! let check = form.change(FieldChange::Name("Alice".into()));
//! form.apply_check(check.run().await);
//!
//! let submission = form.begin_submit()?;
//! let result = submission.send(&client).await;
//! form.finish_submit(result);
//! ```

use std::sync::Arc;

use log::{debug, info, warn};

use super::outcome::{DEFAULT_SUCCESS_MESSAGE, GENERIC_FAILURE_MESSAGE, Outcome};
use crate::client::OrderSink;
use crate::error::ApiError;
use crate::model::{OrderResponse, OrderValues};
use crate::validation::{Field, FieldErrors, Schema};

/// One user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    /// New text in the name input.
    Name(String),
    /// New value of the size select.
    Size(String),
    /// A topping checkbox was ticked or cleared.
    Topping { id: String, checked: bool },
}

impl FieldChange {
    /// The field this edit touches.
    pub fn field(&self) -> Field {
        match self {
            Self::Name(_) => Field::Name,
            Self::Size(_) => Field::Size,
            Self::Topping { .. } => Field::Toppings,
        }
    }
}

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Accepting edits.
    #[default]
    Editing,
    /// A submission is in flight.
    Submitting,
}

/// Why a submit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// At least one field fails the schema.
    #[error("the form has invalid fields")]
    Invalid,
    /// The previous submission has not finished.
    #[error("a submission is already in progress")]
    InFlight,
}

/// Pending validation of one field against a snapshot of the values.
#[derive(Debug)]
pub struct FieldCheck {
    schema: Arc<Schema>,
    values: OrderValues,
    field: Field,
    field_revision: u64,
    form_revision: u64,
}

impl FieldCheck {
    /// Runs the field's rules, then the whole-record check.
    pub async fn run(self) -> FieldChecked {
        let message = self
            .schema
            .validate_field_async(self.field, &self.values)
            .await
            .err();
        let form_valid = self.schema.is_valid_async(&self.values).await;

        debug!(
            "Validated {} (rev {}): {}",
            self.field,
            self.field_revision,
            message.as_deref().unwrap_or("ok")
        );

        FieldChecked {
            field: self.field,
            message,
            form_valid,
            field_revision: self.field_revision,
            form_revision: self.form_revision,
        }
    }
}

/// Finished field validation, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChecked {
    /// The field that was checked.
    pub field: Field,
    /// Error message, or `None` when the field passed.
    pub message: Option<String>,
    /// Whether the whole snapshot passed.
    pub form_valid: bool,
    field_revision: u64,
    form_revision: u64,
}

/// An order on its way to the server.
#[derive(Debug)]
pub struct Submission {
    id: u64,
    values: OrderValues,
}

impl Submission {
    /// Sends the order. One attempt, no retry.
    pub async fn send<S: OrderSink + ?Sized>(self, sink: &S) -> SubmitResult {
        let result = sink.place_order(&self.values).await;
        SubmitResult {
            id: self.id,
            result,
        }
    }
}

/// Server reply for a [`Submission`].
#[derive(Debug)]
pub struct SubmitResult {
    id: u64,
    result: Result<OrderResponse, ApiError>,
}

/// State of the order form.
#[derive(Debug)]
pub struct FormController {
    schema: Arc<Schema>,
    values: OrderValues,
    errors: FieldErrors,
    valid: bool,
    outcome: Outcome,
    phase: Phase,
    form_revision: u64,
    field_revisions: [u64; 3],
    submissions: u64,
}

impl FormController {
    /// Creates a controller using the shared order schema.
    pub fn new() -> Self {
        Self::with_schema(Schema::shared())
    }

    /// Creates a controller with a custom schema.
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        let values = OrderValues::default();
        let valid = schema.is_valid(&values);
        Self {
            schema,
            values,
            errors: FieldErrors::default(),
            valid,
            outcome: Outcome::None,
            phase: Phase::Editing,
            form_revision: 0,
            field_revisions: [0; 3],
            submissions: 0,
        }
    }

    /// Current field values.
    pub fn values(&self) -> &OrderValues {
        &self.values
    }

    /// Current per-field messages.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether every field passes the schema.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.valid && self.phase == Phase::Editing
    }

    /// Outcome of the last submit attempt.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Applies an edit and returns the validation job for the edited field.
    ///
    /// The submit flag is re-derived from the full record immediately so a
    /// stale `true` never outlives the edit that broke it.
    pub fn change(&mut self, change: FieldChange) -> FieldCheck {
        let field = change.field();
        match change {
            FieldChange::Name(name) => self.values.name = name,
            FieldChange::Size(size) => self.values.size = size,
            FieldChange::Topping { id, checked } => self.values.set_topping(id, checked),
        }

        self.form_revision += 1;
        self.field_revisions[field.index()] = self.form_revision;
        self.valid = self.schema.is_valid(&self.values);

        FieldCheck {
            schema: Arc::clone(&self.schema),
            values: self.values.clone(),
            field,
            field_revision: self.form_revision,
            form_revision: self.form_revision,
        }
    }

    /// Stores the result of a field check.
    ///
    /// Results for an older edit of the same field are dropped, and the
    /// whole-record flag is only taken from a check of the latest values.
    /// Returns `true` if the message was stored.
    pub fn apply_check(&mut self, checked: FieldChecked) -> bool {
        if checked.form_revision == self.form_revision {
            self.valid = checked.form_valid;
        }

        if checked.field_revision != self.field_revisions[checked.field.index()] {
            debug!("Dropping stale check for {}", checked.field);
            return false;
        }

        self.errors.set(checked.field, checked.message);
        true
    }

    /// Applies an edit and waits for its validation.
    pub async fn change_and_validate(&mut self, change: FieldChange) {
        let checked = self.change(change).run().await;
        self.apply_check(checked);
    }

    /// Starts a submission of the current values.
    ///
    /// Refused while the form is invalid or another submission is pending.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.phase == Phase::Submitting {
            return Err(SubmitRejected::InFlight);
        }
        if !self.valid {
            return Err(SubmitRejected::Invalid);
        }

        self.submissions += 1;
        self.phase = Phase::Submitting;
        info!("Submitting order #{}", self.submissions);

        Ok(Submission {
            id: self.submissions,
            values: self.values.clone(),
        })
    }

    /// Applies the server's reply and returns to editing.
    ///
    /// Success resets the values and shows the server's message; failure
    /// keeps the values and shows the server's message or a generic one.
    pub fn finish_submit(&mut self, result: SubmitResult) {
        if self.phase != Phase::Submitting || result.id != self.submissions {
            warn!("Ignoring reply for unknown submission #{}", result.id);
            return;
        }

        self.phase = Phase::Editing;

        match result.result {
            Ok(reply) => {
                let message = if reply.message.is_empty() {
                    DEFAULT_SUCCESS_MESSAGE.to_string()
                } else {
                    reply.message
                };
                self.reset();
                self.outcome = Outcome::Success(message);
            }
            Err(error) => {
                let message = error
                    .server_message()
                    .unwrap_or(GENERIC_FAILURE_MESSAGE)
                    .to_string();
                self.outcome = Outcome::Failure(message);
            }
        }
    }

    /// Submits the current values through `sink` and waits for the reply.
    pub async fn submit<S: OrderSink + ?Sized>(&mut self, sink: &S) -> Result<(), SubmitRejected> {
        let submission = self.begin_submit()?;
        let result = submission.send(sink).await;
        self.finish_submit(result);
        Ok(())
    }

    fn reset(&mut self) {
        self.values = OrderValues::default();
        self.errors.clear();
        self.valid = self.schema.is_valid(&self.values);
        // invalidate checks still running against the old values
        self.form_revision += 1;
        self.field_revisions = [self.form_revision; 3];
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}
