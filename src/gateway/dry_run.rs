use super::airtable::{prepare, AirtableRecord};
use super::{Gateway, GatewayError, SubmissionPayload, SubmissionReceipt};
use std::cell::RefCell;

/// Runs the server-side checks and row mapping but writes nothing.
///
/// The prepared row is echoed back in the receipt and kept for inspection.
#[derive(Debug, Default)]
pub struct DryRunGateway {
    prepared: RefCell<Vec<AirtableRecord>>,
}

impl DryRunGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows accepted so far, oldest first.
    pub fn prepared(&self) -> Vec<AirtableRecord> {
        self.prepared.borrow().clone()
    }
}

impl Gateway for DryRunGateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError> {
        let row = prepare(payload)?;
        let fields = serde_json::to_value(&row.fields)
            .map_err(|err| GatewayError::rejected(format!("serialize row: {err}")))?;
        tracing::info!(role = %row.fields.role, "dry run: record not sent");
        self.prepared.borrow_mut().push(row);
        Ok(SubmissionReceipt {
            record_id: None,
            fields: Some(fields),
        })
    }
}
