//! Non-interactive sessions from a JSON answer sheet.
//!
//! An answer sheet is a JSON object keyed by field identifiers, the same
//! shape the submission payload uses. Replaying it walks the controller one
//! step at a time exactly as the terminal view would, so the sheet goes
//! through step validation, final validation, and the gateway.
use crate::gateway::{Gateway, SubmissionReceipt};
use crate::survey::record::SurveyRecord;
use crate::survey::schema::{Field, StepKey};
use crate::survey::{Advance, FieldErrors, SubmitOutcome, SurveyFlow};
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// How a replayed session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStatus {
    Submitted,
    /// A step's validation refused the sheet.
    Blocked,
    /// The gateway refused individual fields.
    Rejected,
    /// The gateway refused the record as a whole or could not be reached.
    Failed,
}

impl ReplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayStatus::Submitted => "submitted",
            ReplayStatus::Blocked => "blocked",
            ReplayStatus::Rejected => "rejected",
            ReplayStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub status: ReplayStatus,
    /// Step the session stopped on, when it did not submit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<SubmissionReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_error_message: Option<String>,
}

/// Parsed answer sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    record: SurveyRecord,
    has_country_code: bool,
}

impl AnswerSheet {
    pub fn from_value(value: &Value) -> Result<AnswerSheet> {
        let map: &Map<String, Value> = value
            .as_object()
            .ok_or_else(|| anyhow!("answer sheet must be a JSON object"))?;
        let record = SurveyRecord::from_wire(map).context("apply answer sheet")?;
        let has_country_code = map
            .get(Field::CountryCode.as_str())
            .is_some_and(|value| !value.is_null());
        Ok(AnswerSheet {
            record,
            has_country_code,
        })
    }

    pub fn record(&self) -> &SurveyRecord {
        &self.record
    }
}

pub fn load_answer_sheet(path: &Path) -> Result<AnswerSheet> {
    let bytes = fs::read(path).with_context(|| format!("read answer sheet {}", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse answer sheet {}", path.display()))?;
    AnswerSheet::from_value(&value)
}

/// Feed `sheet` through `flow` step by step until it submits or stops.
pub fn replay<G: Gateway>(flow: &mut SurveyFlow<G>, sheet: &AnswerSheet) -> Result<ReplayReport> {
    loop {
        let Some(step) = flow.current_step() else {
            bail!("no step to answer at index {}", flow.step_index());
        };
        for field in step.fields() {
            if field == Field::Role && sheet.record.role().is_none() {
                continue;
            }
            let value = sheet.record.value(field);
            flow.update_field(field, &value)
                .with_context(|| format!("answer {} on step {}", field, step.key))?;
        }
        if step.key == StepKey::Contact && sheet.has_country_code {
            flow.update_field(Field::CountryCode, &sheet.record.country_code)
                .context("answer country code")?;
        }

        let status = match flow.advance(step.key) {
            Advance::Moved { .. } => continue,
            Advance::Blocked { .. } => ReplayStatus::Blocked,
            Advance::Submission(SubmitOutcome::Accepted(receipt)) => {
                return Ok(ReplayReport {
                    status: ReplayStatus::Submitted,
                    step: None,
                    receipt: Some(receipt),
                    field_errors: None,
                    server_errors: None,
                    server_error_message: None,
                });
            }
            Advance::Submission(SubmitOutcome::Rejected { .. }) => ReplayStatus::Rejected,
            Advance::Submission(SubmitOutcome::Failed) => ReplayStatus::Failed,
            Advance::Submission(SubmitOutcome::Ignored(reason)) | Advance::Ignored(reason) => {
                bail!("step {} was not accepted: {reason:?}", step.key)
            }
        };
        let stopped_on = flow.current_step().map(|step| step.key);
        tracing::info!(status = status.as_str(), step = ?stopped_on, "replay stopped");
        return Ok(ReplayReport {
            status,
            step: stopped_on,
            receipt: None,
            field_errors: flow.field_errors().cloned(),
            server_errors: flow.server_errors().map(<[String]>::to_vec),
            server_error_message: flow.server_error_message().map(str::to_string),
        });
    }
}
