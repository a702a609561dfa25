//! Server half of the submission: final validation and the datastore write.
//!
//! Records are flattened into one unified row so every role lands in the same
//! table; role-specific answers map onto the shared columns.
use super::{
    Gateway, GatewayError, SubmissionPayload, SubmissionReceipt, VALIDATION_FAILED,
};
use crate::survey::format::parse_money_to_number;
use crate::survey::record::{RoleAnswers, SurveyRecord};
use crate::survey::validate::validate_record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use ureq::Agent;

pub const AIRTABLE_API_BASE: &str = "https://api.airtable.com/v0";
pub const DEFAULT_TABLE_NAME: &str = "Survey Responses";
pub const AIRTABLE_CONFIG_MISSING: &str = "Airtable configuration missing. Please add AIRTABLE_BASE_ID and AIRTABLE_API_KEY environment variables.";
pub const AIRTABLE_SAVE_FAILED: &str = "Failed to save to Airtable. Please try again.";

/// Connection settings; missing values surface as a configuration error at
/// submission time rather than at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirtableSettings {
    pub base_id: Option<String>,
    pub table_name: String,
    pub api_key: Option<String>,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        AirtableSettings {
            base_id: None,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            api_key: None,
        }
    }
}

/// Unified datastore row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirtableFields {
    pub name: String,
    pub role: String,
    pub location: String,
    pub rent_frequency: Option<String>,
    pub rent_amount: Option<u64>,
    pub pain_level: Option<u8>,
    pub challenge: String,
    pub interest_level: String,
    pub email: String,
    #[serde(rename = "WhatsApp")]
    pub whatsapp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirtableRecord {
    pub fields: AirtableFields,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| value.to_string())
}

/// Flatten a record into the unified row.
pub fn airtable_record(record: &SurveyRecord) -> AirtableRecord {
    let mut fields = AirtableFields {
        name: record.name.clone(),
        role: record
            .role()
            .map(|role| role.sink_label().to_string())
            .unwrap_or_default(),
        location: String::new(),
        rent_frequency: None,
        rent_amount: None,
        pain_level: None,
        challenge: String::new(),
        interest_level: String::new(),
        email: record.email.clone(),
        whatsapp: record.whatsapp.clone(),
    };
    match &record.answers {
        RoleAnswers::Unselected => {}
        RoleAnswers::Tenant(answers) => {
            fields.location = answers.location.clone();
            fields.rent_frequency = non_empty(&answers.rent_frequency);
            fields.rent_amount = parse_money_to_number(&answers.rent_amount);
            fields.pain_level = answers.pain_level;
            fields.interest_level = answers.interest.clone();
        }
        RoleAnswers::Landlord(answers) => {
            fields.location = answers.location.clone();
            fields.rent_frequency = non_empty(&answers.payment_practice);
            fields.rent_amount = parse_money_to_number(&answers.average_rent);
            fields.challenge = answers.challenge.clone();
            fields.interest_level = answers.interest.clone();
        }
        RoleAnswers::Both(answers) => {
            fields.location = answers.residence_location.clone();
            fields.rent_frequency = non_empty(&answers.rent_frequency);
            fields.challenge = answers.challenge.clone();
            fields.interest_level = answers.interest.clone();
        }
        RoleAnswers::Other(answers) => {
            fields.location = answers.business_location.clone();
            fields.challenge = answers.biggest_challenge.clone();
            fields.interest_level = answers.interest.clone();
        }
    }
    AirtableRecord { fields }
}

/// Re-validate the whole record and build the row, as the server does before
/// any write.
pub(crate) fn prepare(payload: &SubmissionPayload) -> Result<AirtableRecord, GatewayError> {
    let validation = validate_record(payload.record());
    if !validation.is_valid {
        return Err(GatewayError::Rejected {
            message: VALIDATION_FAILED.to_string(),
            details: validation.errors,
        });
    }
    Ok(airtable_record(payload.record()))
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    id: String,
    #[serde(default)]
    fields: Option<Value>,
}

pub struct AirtableGateway {
    settings: AirtableSettings,
    api_base: String,
    agent: Agent,
}

impl AirtableGateway {
    pub fn new(settings: AirtableSettings, timeout: Option<Duration>) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();
        AirtableGateway {
            settings,
            api_base: AIRTABLE_API_BASE.to_string(),
            agent,
        }
    }

    /// Point the client at a different API root (proxies, local stubs).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn table_url(&self, base_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_base.trim_end_matches('/'),
            base_id,
            urlencoding::encode(&self.settings.table_name)
        )
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let base_id = self.settings.base_id.as_deref().filter(|v| !v.trim().is_empty())?;
        let api_key = self.settings.api_key.as_deref().filter(|v| !v.trim().is_empty())?;
        Some((base_id, api_key))
    }
}

impl Gateway for AirtableGateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError> {
        let Some((base_id, api_key)) = self.credentials() else {
            tracing::error!("airtable base id or api key not configured");
            return Err(GatewayError::rejected(AIRTABLE_CONFIG_MISSING));
        };
        let row = prepare(payload)?;
        let url = self.table_url(base_id);

        let start = Instant::now();
        let mut response = self
            .agent
            .post(url.as_str())
            .header("Authorization", format!("Bearer {api_key}"))
            .send_json(&row)
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let elapsed_ms = start.elapsed().as_millis();

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), elapsed_ms, body = %body, "airtable api error");
            return Err(GatewayError::rejected(AIRTABLE_SAVE_FAILED));
        }
        tracing::info!(status = status.as_u16(), elapsed_ms, "airtable record created");
        let created: CreatedRecord = serde_json::from_str(&body).map_err(|err| {
            tracing::error!(error = %err, "unreadable airtable response");
            GatewayError::rejected(AIRTABLE_SAVE_FAILED)
        })?;
        Ok(SubmissionReceipt {
            record_id: Some(created.id),
            fields: created.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::schema::Field;
    use serde_json::json;

    fn filled(role: &str, answers: &[(Field, &str)]) -> SurveyRecord {
        let mut record = SurveyRecord::default();
        record.set(Field::Role, role).expect("role");
        record.set(Field::Name, "Ada").expect("name");
        record.set(Field::Email, "ada@example.com").expect("email");
        for (field, value) in answers {
            record.set(*field, value).expect("answer");
        }
        record
    }

    #[test]
    fn tenant_row_uses_numeric_amount_and_pain_level() {
        let record = filled(
            "tenant",
            &[
                (Field::TenantLocation, "Lagos"),
                (Field::RentFrequency, "Yearly"),
                (Field::RentAmount, "1,200,000"),
                (Field::PainLevel, "4"),
                (Field::TenantInterest, "Definitely"),
            ],
        );
        let row = serde_json::to_value(airtable_record(&record)).expect("serialize");
        assert_eq!(
            row,
            json!({"fields": {
                "Name": "Ada",
                "Role": "Tenant",
                "Location": "Lagos",
                "RentFrequency": "Yearly",
                "RentAmount": 1200000,
                "PainLevel": 4,
                "Challenge": "",
                "InterestLevel": "Definitely",
                "Email": "ada@example.com",
                "WhatsApp": ""
            }})
        );
    }

    #[test]
    fn landlord_practice_and_average_rent_fill_shared_columns() {
        let record = filled(
            "landlord",
            &[
                (Field::LandlordLocation, "Oyo"),
                (Field::UnitsManaged, "4"),
                (Field::AverageRent, "800,000"),
                (Field::CurrentPaymentPractice, "Monthly"),
                (Field::Challenges, "Tenant default"),
                (Field::LandlordInterest, "Maybe"),
            ],
        );
        let row = airtable_record(&record).fields;
        assert_eq!(row.role, "Landlord");
        assert_eq!(row.rent_frequency.as_deref(), Some("Monthly"));
        assert_eq!(row.rent_amount, Some(800_000));
        assert_eq!(row.pain_level, None);
        assert_eq!(row.challenge, "Tenant default");
    }

    #[test]
    fn other_role_has_no_rent_columns() {
        let record = filled(
            "other",
            &[
                (Field::RoleDescription, "Agent"),
                (Field::BusinessLocation, "Kano"),
                (Field::BiggestChallenge, "Legal processes"),
                (Field::OtherInterest, "Maybe"),
            ],
        );
        let row = airtable_record(&record).fields;
        assert_eq!(row.role, "Other");
        assert_eq!(row.location, "Kano");
        assert_eq!(row.rent_frequency, None);
        assert_eq!(row.rent_amount, None);
    }

    #[test]
    fn prepare_rejects_incomplete_records_with_details() {
        let payload = SubmissionPayload::from_record(&filled("both", &[]));
        let err = prepare(&payload).unwrap_err();
        let GatewayError::Rejected { message, details } = err else {
            panic!("expected rejection");
        };
        assert_eq!(message, VALIDATION_FAILED);
        assert_eq!(
            details[0].field.as_deref(),
            Some(Field::BothResidenceLocation.as_str())
        );
    }

    #[test]
    fn missing_credentials_reject_before_any_request() {
        let gateway = AirtableGateway::new(AirtableSettings::default(), None);
        let payload = SubmissionPayload::from_record(&SurveyRecord::default());
        assert_eq!(
            gateway.submit(&payload).unwrap_err(),
            GatewayError::rejected(AIRTABLE_CONFIG_MISSING)
        );
    }

    #[test]
    fn table_name_is_path_encoded() {
        let gateway = AirtableGateway::new(
            AirtableSettings {
                base_id: Some("appXYZ".to_string()),
                table_name: DEFAULT_TABLE_NAME.to_string(),
                api_key: Some("key".to_string()),
            },
            None,
        )
        .with_api_base("http://localhost:9/v0/");
        assert_eq!(
            gateway.table_url("appXYZ"),
            "http://localhost:9/v0/appXYZ/Survey%20Responses"
        );
    }
}
