//! The answer record accumulated across one survey session.
//!
//! Role-specific answers live in a tagged union selected once the respondent
//! picks a role, so only the chosen role's fields can ever be populated.
use super::format::{digits_only, parse_money};
use super::schema::{is_known_country_code, Field, Role, DEFAULT_COUNTRY_CODE};
use serde_json::{Map, Value};
use thiserror::Error;

/// Rejected field mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("unknown role {0:?} (expected tenant, landlord, both, or other)")]
    InvalidRole(String),
    #[error("{field} is not collected for {}", role_label(.role))]
    FieldNotInRole { field: Field, role: Option<Role> },
    #[error("pain level must be a whole number from 1 to 5 (got {0:?})")]
    InvalidPainLevel(String),
    #[error("unsupported country code {0:?}")]
    UnknownCountryCode(String),
    #[error("{field}: {reason}")]
    InvalidValue { field: Field, reason: String },
}

fn role_label(role: &Option<Role>) -> &'static str {
    role.map(|role| role.as_str()).unwrap_or("an unselected role")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantAnswers {
    pub location: String,
    pub rent_frequency: String,
    pub rent_amount: String,
    pub pain_level: Option<u8>,
    pub interest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandlordAnswers {
    pub location: String,
    pub units_managed: String,
    pub average_rent: String,
    pub payment_practice: String,
    pub challenge: String,
    pub interest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BothAnswers {
    pub residence_location: String,
    pub rent_frequency: String,
    pub challenge: String,
    pub interest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtherAnswers {
    pub role_description: String,
    pub business_location: String,
    pub biggest_challenge: String,
    pub interest: String,
}

/// Role-specific answers; the variant doubles as the selected role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoleAnswers {
    #[default]
    Unselected,
    Tenant(TenantAnswers),
    Landlord(LandlordAnswers),
    Both(BothAnswers),
    Other(OtherAnswers),
}

impl RoleAnswers {
    fn fresh(role: Role) -> RoleAnswers {
        match role {
            Role::Tenant => RoleAnswers::Tenant(TenantAnswers::default()),
            Role::Landlord => RoleAnswers::Landlord(LandlordAnswers::default()),
            Role::Both => RoleAnswers::Both(BothAnswers::default()),
            Role::Other => RoleAnswers::Other(OtherAnswers::default()),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            RoleAnswers::Unselected => None,
            RoleAnswers::Tenant(_) => Some(Role::Tenant),
            RoleAnswers::Landlord(_) => Some(Role::Landlord),
            RoleAnswers::Both(_) => Some(Role::Both),
            RoleAnswers::Other(_) => Some(Role::Other),
        }
    }

    fn text(&self, field: Field) -> Option<&String> {
        match (self, field) {
            (RoleAnswers::Tenant(a), Field::TenantLocation) => Some(&a.location),
            (RoleAnswers::Tenant(a), Field::RentFrequency) => Some(&a.rent_frequency),
            (RoleAnswers::Tenant(a), Field::RentAmount) => Some(&a.rent_amount),
            (RoleAnswers::Tenant(a), Field::TenantInterest) => Some(&a.interest),
            (RoleAnswers::Landlord(a), Field::LandlordLocation) => Some(&a.location),
            (RoleAnswers::Landlord(a), Field::UnitsManaged) => Some(&a.units_managed),
            (RoleAnswers::Landlord(a), Field::AverageRent) => Some(&a.average_rent),
            (RoleAnswers::Landlord(a), Field::CurrentPaymentPractice) => Some(&a.payment_practice),
            (RoleAnswers::Landlord(a), Field::Challenges) => Some(&a.challenge),
            (RoleAnswers::Landlord(a), Field::LandlordInterest) => Some(&a.interest),
            (RoleAnswers::Both(a), Field::BothResidenceLocation) => Some(&a.residence_location),
            (RoleAnswers::Both(a), Field::BothRentFrequency) => Some(&a.rent_frequency),
            (RoleAnswers::Both(a), Field::BothChallenges) => Some(&a.challenge),
            (RoleAnswers::Both(a), Field::BothInterest) => Some(&a.interest),
            (RoleAnswers::Other(a), Field::RoleDescription) => Some(&a.role_description),
            (RoleAnswers::Other(a), Field::BusinessLocation) => Some(&a.business_location),
            (RoleAnswers::Other(a), Field::BiggestChallenge) => Some(&a.biggest_challenge),
            (RoleAnswers::Other(a), Field::OtherInterest) => Some(&a.interest),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match (self, field) {
            (RoleAnswers::Tenant(a), Field::TenantLocation) => Some(&mut a.location),
            (RoleAnswers::Tenant(a), Field::RentFrequency) => Some(&mut a.rent_frequency),
            (RoleAnswers::Tenant(a), Field::RentAmount) => Some(&mut a.rent_amount),
            (RoleAnswers::Tenant(a), Field::TenantInterest) => Some(&mut a.interest),
            (RoleAnswers::Landlord(a), Field::LandlordLocation) => Some(&mut a.location),
            (RoleAnswers::Landlord(a), Field::UnitsManaged) => Some(&mut a.units_managed),
            (RoleAnswers::Landlord(a), Field::AverageRent) => Some(&mut a.average_rent),
            (RoleAnswers::Landlord(a), Field::CurrentPaymentPractice) => {
                Some(&mut a.payment_practice)
            }
            (RoleAnswers::Landlord(a), Field::Challenges) => Some(&mut a.challenge),
            (RoleAnswers::Landlord(a), Field::LandlordInterest) => Some(&mut a.interest),
            (RoleAnswers::Both(a), Field::BothResidenceLocation) => {
                Some(&mut a.residence_location)
            }
            (RoleAnswers::Both(a), Field::BothRentFrequency) => Some(&mut a.rent_frequency),
            (RoleAnswers::Both(a), Field::BothChallenges) => Some(&mut a.challenge),
            (RoleAnswers::Both(a), Field::BothInterest) => Some(&mut a.interest),
            (RoleAnswers::Other(a), Field::RoleDescription) => Some(&mut a.role_description),
            (RoleAnswers::Other(a), Field::BusinessLocation) => Some(&mut a.business_location),
            (RoleAnswers::Other(a), Field::BiggestChallenge) => Some(&mut a.biggest_challenge),
            (RoleAnswers::Other(a), Field::OtherInterest) => Some(&mut a.interest),
            _ => None,
        }
    }
}

/// Everything the respondent has entered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRecord {
    pub name: String,
    pub answers: RoleAnswers,
    pub email: String,
    /// National number digits; the country code is joined on submission.
    pub whatsapp: String,
    pub country_code: String,
}

impl Default for SurveyRecord {
    fn default() -> Self {
        SurveyRecord {
            name: String::new(),
            answers: RoleAnswers::Unselected,
            email: String::new(),
            whatsapp: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl SurveyRecord {
    pub fn role(&self) -> Option<Role> {
        self.answers.role()
    }

    /// Choose a role. Re-selecting the current role keeps its answers;
    /// switching starts the new role's answer set from scratch.
    pub fn select_role(&mut self, role: Role) {
        if self.role() != Some(role) {
            self.answers = RoleAnswers::fresh(role);
        }
    }

    /// Current value of `field` as text; empty when unset or not collected.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::Role => self
                .role()
                .map(|role| role.as_str().to_string())
                .unwrap_or_default(),
            Field::Name => self.name.clone(),
            Field::Email => self.email.clone(),
            Field::Whatsapp => self.whatsapp.clone(),
            Field::CountryCode => self.country_code.clone(),
            Field::PainLevel => self
                .pain_level()
                .map(|level| level.to_string())
                .unwrap_or_default(),
            _ => self.answers.text(field).cloned().unwrap_or_default(),
        }
    }

    pub fn is_filled(&self, field: Field) -> bool {
        !self.value(field).trim().is_empty()
    }

    pub fn pain_level(&self) -> Option<u8> {
        match &self.answers {
            RoleAnswers::Tenant(answers) => answers.pain_level,
            _ => None,
        }
    }

    /// Apply one input event to the record.
    ///
    /// Currency fields drop their separators, phone and unit counts keep only
    /// digits, and the pain level must be 1 to 5 (empty clears it).
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), RecordError> {
        match field {
            Field::Role => {
                let role = Role::parse(raw).ok_or_else(|| RecordError::InvalidRole(raw.into()))?;
                self.select_role(role);
            }
            Field::Name => self.name = raw.to_string(),
            Field::Email => self.email = raw.trim().to_string(),
            Field::Whatsapp => self.whatsapp = digits_only(raw),
            Field::CountryCode => {
                let code = raw.trim();
                if !is_known_country_code(code) {
                    return Err(RecordError::UnknownCountryCode(code.to_string()));
                }
                self.country_code = code.to_string();
            }
            Field::PainLevel => {
                let role = self.answers.role();
                let RoleAnswers::Tenant(answers) = &mut self.answers else {
                    return Err(RecordError::FieldNotInRole { field, role });
                };
                answers.pain_level = parse_pain_level(raw)?;
            }
            _ => {
                let role = self.answers.role();
                let slot = self
                    .answers
                    .text_mut(field)
                    .ok_or(RecordError::FieldNotInRole { field, role })?;
                *slot = match field {
                    Field::RentAmount | Field::AverageRent => parse_money(raw),
                    Field::UnitsManaged => digits_only(raw),
                    _ => raw.to_string(),
                };
            }
        }
        Ok(())
    }

    /// Render the record as a JSON object keyed by field identifiers.
    ///
    /// Only the selected role's fields appear; the pain level is numeric.
    pub fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            Field::Role.as_str().to_string(),
            self.role()
                .map(|role| Value::String(role.as_str().to_string()))
                .unwrap_or(Value::Null),
        );
        map.insert(
            Field::Name.as_str().to_string(),
            Value::String(self.name.clone()),
        );
        if let Some(role) = self.role() {
            for field in role_fields(role) {
                let value = if field == Field::PainLevel {
                    self.pain_level().map(Value::from).unwrap_or(Value::Null)
                } else {
                    Value::String(self.value(field))
                };
                map.insert(field.as_str().to_string(), value);
            }
        }
        map.insert(
            Field::Email.as_str().to_string(),
            Value::String(self.email.clone()),
        );
        map.insert(
            Field::Whatsapp.as_str().to_string(),
            Value::String(self.whatsapp.clone()),
        );
        map.insert(
            Field::CountryCode.as_str().to_string(),
            Value::String(self.country_code.clone()),
        );
        map
    }

    /// Build a record from a JSON object keyed by field identifiers.
    ///
    /// The role is applied first so role-specific keys land in the right
    /// answer set; null values are skipped.
    pub fn from_wire(map: &Map<String, Value>) -> Result<SurveyRecord, RecordError> {
        let mut record = SurveyRecord::default();
        if let Some(value) = map.get(Field::Role.as_str()).filter(|v| !v.is_null()) {
            record.set(Field::Role, &wire_text(Field::Role, value)?)?;
        }
        for (key, value) in map {
            let field = Field::parse(key).ok_or_else(|| RecordError::UnknownField(key.clone()))?;
            if field == Field::Role || value.is_null() {
                continue;
            }
            record.set(field, &wire_text(field, value)?)?;
        }
        Ok(record)
    }
}

/// Role-owned fields in step order.
pub fn role_fields(role: Role) -> impl Iterator<Item = Field> {
    role.steps()
        .iter()
        .flat_map(|step| step.fields())
        .filter(|field| field.owner().is_some())
}

fn parse_pain_level(raw: &str) -> Result<Option<u8>, RecordError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u8>() {
        Ok(level @ 1..=5) => Ok(Some(level)),
        _ => Err(RecordError::InvalidPainLevel(trimmed.to_string())),
    }
}

fn wire_text(field: Field, value: &Value) -> Result<String, RecordError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(RecordError::InvalidValue {
            field,
            reason: "expected a string or number".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_record_has_no_role_and_default_country_code() {
        let record = SurveyRecord::default();
        assert_eq!(record.role(), None);
        assert_eq!(record.country_code, "+234");
        assert!(!record.is_filled(Field::Name));
    }

    #[test]
    fn switching_role_discards_previous_answers() {
        let mut record = SurveyRecord::default();
        record.set(Field::Role, "tenant").expect("tenant");
        record.set(Field::TenantLocation, "Lagos").expect("location");
        record.set(Field::Role, "tenant").expect("same role");
        assert_eq!(record.value(Field::TenantLocation), "Lagos");

        record.set(Field::Role, "landlord").expect("landlord");
        assert_eq!(record.value(Field::TenantLocation), "");
        assert_eq!(record.role(), Some(Role::Landlord));
    }

    #[test]
    fn foreign_role_fields_are_rejected() {
        let mut record = SurveyRecord::default();
        let err = record.set(Field::RentAmount, "100").unwrap_err();
        assert_eq!(
            err,
            RecordError::FieldNotInRole {
                field: Field::RentAmount,
                role: None
            }
        );

        record.set(Field::Role, "other").expect("other");
        assert!(record.set(Field::PainLevel, "3").is_err());
        assert!(record.set(Field::BusinessLocation, "Kano").is_ok());
    }

    #[test]
    fn input_normalization_per_field() {
        let mut record = SurveyRecord::default();
        record.set(Field::Role, "landlord").expect("role");
        record.set(Field::AverageRent, "1,500,000").expect("rent");
        record.set(Field::UnitsManaged, "12 units").expect("units");
        record.set(Field::Whatsapp, "0803 123 4567").expect("whatsapp");
        assert_eq!(record.value(Field::AverageRent), "1500000");
        assert_eq!(record.value(Field::UnitsManaged), "12");
        record.set(Field::AverageRent, "₦1 500 000").expect("rent with symbol");
        assert_eq!(record.value(Field::AverageRent), "1500000");
        assert_eq!(record.whatsapp, "08031234567");
        assert!(record.set(Field::CountryCode, "+1").is_err());
        record.set(Field::CountryCode, "+254").expect("kenya");
        assert_eq!(record.country_code, "+254");
    }

    #[test]
    fn pain_level_accepts_one_through_five() {
        let mut record = SurveyRecord::default();
        record.set(Field::Role, "tenant").expect("role");
        for bad in ["0", "6", "three", "-1"] {
            assert!(record.set(Field::PainLevel, bad).is_err(), "{bad}");
        }
        record.set(Field::PainLevel, "4").expect("four");
        assert_eq!(record.pain_level(), Some(4));
        record.set(Field::PainLevel, "").expect("clear");
        assert_eq!(record.pain_level(), None);
    }

    #[test]
    fn wire_form_contains_only_selected_role_fields() {
        let mut record = SurveyRecord::default();
        record.set(Field::Role, "tenant").expect("role");
        record.set(Field::Name, "Ada").expect("name");
        record.set(Field::PainLevel, "2").expect("pain");
        let wire = record.to_wire();
        assert_eq!(wire.get("role"), Some(&json!("tenant")));
        assert_eq!(wire.get("painLevel"), Some(&json!(2)));
        assert!(wire.contains_key("tenantLocation"));
        assert!(!wire.contains_key("landlordLocation"));
        assert_eq!(wire.get("countryCode"), Some(&json!("+234")));
    }

    #[test]
    fn from_wire_applies_role_before_role_fields() {
        let value = json!({
            "tenantLocation": "Oyo",
            "painLevel": 5,
            "role": "Tenant",
            "name": "Bola",
            "whatsapp": null
        });
        let record = SurveyRecord::from_wire(value.as_object().expect("object")).expect("decode");
        assert_eq!(record.role(), Some(Role::Tenant));
        assert_eq!(record.value(Field::TenantLocation), "Oyo");
        assert_eq!(record.pain_level(), Some(5));
        assert_eq!(record.whatsapp, "");
    }

    #[test]
    fn from_wire_rejects_unknown_keys_and_bad_types() {
        let unknown = json!({"role": "tenant", "favourite": "x"});
        assert_eq!(
            SurveyRecord::from_wire(unknown.as_object().expect("object")).unwrap_err(),
            RecordError::UnknownField("favourite".to_string())
        );
        let bad = json!({"name": ["Ada"]});
        assert!(matches!(
            SurveyRecord::from_wire(bad.as_object().expect("object")),
            Err(RecordError::InvalidValue { field: Field::Name, .. })
        ));
    }
}
