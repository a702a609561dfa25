//! Survey flow controller.
//!
//! One `SurveyFlow` owns a session: the flat step index, the answer record,
//! and the error state the view renders. The view talks to it only through
//! `advance`, `retreat`, `update_field`, and `submit`.
use super::record::{RecordError, SurveyRecord};
use super::schema::{
    step_at, step_index_for_field, Field, InputKind, Role, StepDescriptor, StepKey, PREFIX_LEN,
};
use super::validate::{validate_record, validate_step, FieldError};
use crate::gateway::{
    Gateway, GatewayError, SubmissionPayload, SubmissionReceipt, NETWORK_ERROR_MESSAGE,
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Inline errors keyed by field, in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(Field, String)>,
}

impl FieldErrors {
    /// Collect errors for known fields; a repeated field keeps its first
    /// position and its last message.
    pub fn from_errors(errors: &[FieldError]) -> Self {
        let mut map = FieldErrors::default();
        for error in errors {
            if let Some(field) = error.known_field() {
                map.insert(field, error.message.clone());
            }
        }
        map
    }

    fn insert(&mut self, field: Field, message: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == field) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((field, message)),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field.as_str(), message)?;
        }
        map.end()
    }
}

/// Why an input event was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("the role can only be changed on the role selection step")]
    RoleLocked,
    #[error("a submission is in progress")]
    Submitting,
    #[error("the survey has already been submitted")]
    Closed,
}

/// Why an `advance` was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ignored {
    /// The event names a step other than the one on screen.
    StaleStep,
    /// The index resolves to nothing to render.
    NoStep,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted(SubmissionReceipt),
    /// Field-level refusal; the controller may have jumped to the first
    /// offending step.
    Rejected { jumped_to: Option<usize> },
    /// Refusal or transport failure shown as a single global message.
    Failed,
    Ignored(Ignored),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved { from: usize, to: usize },
    Blocked { errors: Vec<FieldError> },
    Submission(SubmitOutcome),
    Ignored(Ignored),
}

/// Render input for the step on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub index: usize,
    pub key: StepKey,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub input: InputKind,
    pub options: &'static [&'static str],
    pub fields: Vec<Field>,
    /// 1-based position within the role sequence; `None` for shared steps.
    pub position: Option<usize>,
    pub total: Option<usize>,
    pub is_last: bool,
}

/// Everything the view needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    pub current_step: Option<StepView>,
    pub field_errors: Option<FieldErrors>,
    pub server_errors: Option<Vec<String>>,
    pub server_error_message: Option<String>,
    pub is_submitting: bool,
    pub is_submitted: bool,
}

pub struct SurveyFlow<G> {
    gateway: G,
    step_index: usize,
    record: SurveyRecord,
    field_errors: Option<FieldErrors>,
    server_errors: Option<Vec<String>>,
    server_error_message: Option<String>,
    is_submitting: bool,
    is_submitted: bool,
}

impl<G: Gateway> SurveyFlow<G> {
    pub fn new(gateway: G) -> Self {
        SurveyFlow {
            gateway,
            step_index: 0,
            record: SurveyRecord::default(),
            field_errors: None,
            server_errors: None,
            server_error_message: None,
            is_submitting: false,
            is_submitted: false,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn record(&self) -> &SurveyRecord {
        &self.record
    }

    pub fn role(&self) -> Option<Role> {
        self.record.role()
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.field_errors.as_ref()
    }

    pub fn server_errors(&self) -> Option<&[String]> {
        self.server_errors.as_deref()
    }

    pub fn server_error_message(&self) -> Option<&str> {
        self.server_error_message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    /// Step on screen, or `None` when the index resolves to nothing.
    pub fn current_step(&self) -> Option<&'static StepDescriptor> {
        step_at(self.step_index, self.record.role())
    }

    pub fn step_view(&self) -> Option<StepView> {
        let step = self.current_step()?;
        let (position, total) = match self.record.role() {
            Some(role) if self.step_index >= PREFIX_LEN => (
                Some(self.step_index - PREFIX_LEN + 1),
                Some(role.steps().len()),
            ),
            _ => (None, None),
        };
        Some(StepView {
            index: self.step_index,
            key: step.key,
            title: step.title,
            subtitle: step.subtitle,
            input: step.input,
            options: step.options,
            fields: step.fields().collect(),
            position,
            total,
            is_last: step.is_terminal(),
        })
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            current_step: self.step_view(),
            field_errors: self.field_errors.clone(),
            server_errors: self.server_errors.clone(),
            server_error_message: self.server_error_message.clone(),
            is_submitting: self.is_submitting,
            is_submitted: self.is_submitted,
        }
    }

    /// Apply one input event to the record.
    pub fn update_field(&mut self, field: Field, value: &str) -> Result<(), UpdateError> {
        if self.is_submitted {
            return Err(UpdateError::Closed);
        }
        if self.is_submitting {
            return Err(UpdateError::Submitting);
        }
        if field == Field::Role
            && self.record.role().is_some()
            && self.current_step().map(|step| step.key) != Some(StepKey::Role)
        {
            return Err(UpdateError::RoleLocked);
        }
        self.record.set(field, value)?;
        Ok(())
    }

    /// Try to leave step `key`.
    ///
    /// The step's bound fields are validated first; on failure the errors are
    /// kept for inline display and the index does not move. On the terminal
    /// step this submits instead of moving.
    pub fn advance(&mut self, key: StepKey) -> Advance {
        if self.is_submitted {
            return Advance::Ignored(Ignored::Submitted);
        }
        if self.is_submitting {
            return Advance::Ignored(Ignored::Submitting);
        }
        let Some(step) = self.current_step() else {
            return Advance::Ignored(Ignored::NoStep);
        };
        if step.key != key {
            tracing::debug!(expected = %step.key, got = %key, "ignoring stale advance");
            return Advance::Ignored(Ignored::StaleStep);
        }
        if step.is_terminal() {
            return Advance::Submission(self.submit());
        }

        self.server_errors = None;
        self.server_error_message = None;
        let validation = validate_step(&self.record, key, self.record.role());
        if !validation.is_valid {
            tracing::debug!(
                step = %key,
                errors = validation.errors.len(),
                "advance blocked by validation"
            );
            self.field_errors = Some(FieldErrors::from_errors(&validation.errors));
            return Advance::Blocked {
                errors: validation.errors,
            };
        }
        self.field_errors = None;
        let from = self.step_index;
        self.step_index += 1;
        tracing::debug!(from, to = self.step_index, step = %key, "advanced");
        Advance::Moved {
            from,
            to: self.step_index,
        }
    }

    /// Step back one screen without validating; entered values are kept.
    pub fn retreat(&mut self) -> bool {
        if self.step_index == 0 || self.is_submitted {
            return false;
        }
        self.step_index -= 1;
        tracing::debug!(to = self.step_index, "retreated");
        true
    }

    pub fn dismiss_server_errors(&mut self) {
        self.server_errors = None;
    }

    pub fn dismiss_server_error_message(&mut self) {
        self.server_error_message = None;
    }

    /// Hand the record to the gateway and reconcile the answer.
    pub fn submit(&mut self) -> SubmitOutcome {
        match self.begin_submission() {
            Ok(payload) => {
                let result = self.gateway.submit(&payload);
                self.finish_submission(result)
            }
            Err(outcome) => outcome,
        }
    }

    /// First half of a submission: guard re-entry, run the final record
    /// check, and serialize. While the returned payload is outstanding
    /// `is_submitting` is set and further submissions are ignored.
    pub fn begin_submission(&mut self) -> Result<SubmissionPayload, SubmitOutcome> {
        if self.is_submitted {
            return Err(SubmitOutcome::Ignored(Ignored::Submitted));
        }
        if self.is_submitting {
            return Err(SubmitOutcome::Ignored(Ignored::Submitting));
        }
        self.server_errors = None;
        self.server_error_message = None;

        let validation = validate_record(&self.record);
        if !validation.is_valid {
            tracing::warn!(
                errors = validation.errors.len(),
                "record failed final validation"
            );
            let jumped_to = self.apply_rejection(&validation.errors);
            return Err(SubmitOutcome::Rejected { jumped_to });
        }

        self.is_submitting = true;
        tracing::info!(
            role = self.record.role().map(|role| role.as_str()).unwrap_or(""),
            "submitting survey"
        );
        Ok(SubmissionPayload::from_record(&self.record))
    }

    /// Second half of a submission: record the gateway's answer.
    pub fn finish_submission(
        &mut self,
        result: Result<SubmissionReceipt, GatewayError>,
    ) -> SubmitOutcome {
        self.is_submitting = false;
        match result {
            Ok(receipt) => {
                tracing::info!(record_id = ?receipt.record_id, "survey submitted");
                self.is_submitted = true;
                self.field_errors = None;
                SubmitOutcome::Accepted(receipt)
            }
            Err(GatewayError::Rejected { message, details }) if !details.is_empty() => {
                tracing::warn!(%message, details = details.len(), "gateway rejected fields");
                let jumped_to = self.apply_rejection(&details);
                SubmitOutcome::Rejected { jumped_to }
            }
            Err(GatewayError::Rejected { message, .. }) => {
                tracing::warn!(%message, "gateway rejected submission");
                self.server_error_message = Some(message);
                SubmitOutcome::Failed
            }
            Err(GatewayError::Transport(detail)) => {
                tracing::warn!(%detail, "gateway unreachable");
                self.server_error_message = Some(NETWORK_ERROR_MESSAGE.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Show field-level failures and move to the first step that can fix one.
    fn apply_rejection(&mut self, details: &[FieldError]) -> Option<usize> {
        self.server_errors = Some(details.iter().map(|d| d.message.clone()).collect());
        let field_errors = FieldErrors::from_errors(details);
        if field_errors.is_empty() {
            return None;
        }
        let role = self.record.role();
        let jumped_to = field_errors
            .iter()
            .find_map(|(field, _)| step_index_for_field(field, role));
        if let Some(index) = jumped_to {
            tracing::debug!(from = self.step_index, to = index, "jumping to failing step");
            self.step_index = index;
        }
        self.field_errors = Some(field_errors);
        jumped_to
    }
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
