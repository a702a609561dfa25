//! Submission gateway boundary.
//!
//! The flow controller hands a finished record to a `Gateway` and reconciles
//! whatever comes back. Implementations decide where the record goes: a
//! remote survey endpoint, the datastore directly, or nowhere (dry run).
mod airtable;
mod dry_run;
mod endpoint;

use crate::survey::format::whatsapp_with_country_code;
use crate::survey::record::SurveyRecord;
use crate::survey::validate::FieldError;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub use airtable::{
    airtable_record, AirtableFields, AirtableGateway, AirtableRecord, AirtableSettings,
    AIRTABLE_CONFIG_MISSING, AIRTABLE_SAVE_FAILED, DEFAULT_TABLE_NAME,
};
pub use dry_run::DryRunGateway;
pub use endpoint::{interpret_response, EndpointGateway};

/// Banner shown when no response could be obtained.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
/// Error text the server half uses when a record fails final validation.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Failure reported by a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The sink answered and refused the record. `details` is empty when the
    /// refusal is not attributable to individual fields.
    #[error("{message}")]
    Rejected {
        message: String,
        details: Vec<FieldError>,
    },
    /// No response could be obtained.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            message: message.into(),
            details: Vec::new(),
        }
    }
}

/// Successful submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Opaque identifier assigned by the sink, when it reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Stored column values, when the sink echoes them back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
}

/// Serialized form of a finished record.
///
/// The WhatsApp number is already joined with its country code (or empty),
/// so `record().whatsapp` here is the international form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    record: SurveyRecord,
}

impl SubmissionPayload {
    pub fn from_record(record: &SurveyRecord) -> Self {
        let mut record = record.clone();
        record.whatsapp = whatsapp_with_country_code(&record.country_code, &record.whatsapp);
        SubmissionPayload { record }
    }

    pub fn record(&self) -> &SurveyRecord {
        &self.record
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.record.to_wire())
    }
}

impl Serialize for SubmissionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.to_wire().serialize(serializer)
    }
}

/// Destination for finished survey records.
pub trait Gateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError>;
}

impl<G: Gateway + ?Sized> Gateway for Box<G> {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError> {
        (**self).submit(payload)
    }
}

impl<G: Gateway + ?Sized> Gateway for &G {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError> {
        (**self).submit(payload)
    }
}
