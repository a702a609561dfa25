//! Declarative per-role survey schema.
//!
//! Every step the survey can show is described once here: its key, the copy
//! the view renders, the input control, and the fields it binds together with
//! the rule each field is checked against. The validation engine, the flow
//! controller, and the terminal view all read the same tables.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of role-independent steps that open every session.
pub const PREFIX_LEN: usize = 3;

/// Country code preselected for the WhatsApp number.
pub const DEFAULT_COUNTRY_CODE: &str = "+234";

/// Respondent category; selects the role-specific step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tenant,
    Landlord,
    Both,
    Other,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Tenant, Role::Landlord, Role::Both, Role::Other];

    /// Return the stable identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Landlord => "landlord",
            Role::Both => "both",
            Role::Other => "other",
        }
    }

    /// Case-insensitive lookup of a wire identifier.
    pub fn parse(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Tenant => "Tenant",
            Role::Landlord => "Landlord / Property Owner",
            Role::Both => "Both Tenant & Landlord",
            Role::Other => "Other",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Tenant => "I rent a property",
            Role::Landlord => "I own rental properties",
            Role::Both => "I rent and own properties",
            Role::Other => "Property manager, agent, etc.",
        }
    }

    /// Option value the datastore's single-select column expects.
    pub fn sink_label(&self) -> &'static str {
        match self {
            Role::Tenant => "Tenant",
            Role::Landlord => "Landlord",
            Role::Both => "Both",
            Role::Other => "Other",
        }
    }

    /// Ordered role-specific steps, ending with contact and closing.
    pub fn steps(&self) -> &'static [StepDescriptor] {
        match self {
            Role::Tenant => TENANT_STEPS,
            Role::Landlord => LANDLORD_STEPS,
            Role::Both => BOTH_STEPS,
            Role::Other => OTHER_STEPS,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of one question within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKey {
    Welcome,
    Role,
    Name,
    Location,
    Residence,
    Type,
    Frequency,
    Amount,
    Units,
    Rent,
    Practice,
    Pain,
    Challenges,
    Challenge,
    Interest,
    Contact,
    Closing,
}

impl StepKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKey::Welcome => "welcome",
            StepKey::Role => "role",
            StepKey::Name => "name",
            StepKey::Location => "location",
            StepKey::Residence => "residence",
            StepKey::Type => "type",
            StepKey::Frequency => "frequency",
            StepKey::Amount => "amount",
            StepKey::Units => "units",
            StepKey::Rent => "rent",
            StepKey::Practice => "practice",
            StepKey::Pain => "pain",
            StepKey::Challenges => "challenges",
            StepKey::Challenge => "challenge",
            StepKey::Interest => "interest",
            StepKey::Contact => "contact",
            StepKey::Closing => "closing",
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every data field the survey can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Role,
    Name,
    TenantLocation,
    RentFrequency,
    RentAmount,
    PainLevel,
    TenantInterest,
    LandlordLocation,
    UnitsManaged,
    AverageRent,
    CurrentPaymentPractice,
    Challenges,
    LandlordInterest,
    BothResidenceLocation,
    BothRentFrequency,
    BothChallenges,
    BothInterest,
    RoleDescription,
    BusinessLocation,
    BiggestChallenge,
    OtherInterest,
    Email,
    Whatsapp,
    CountryCode,
}

impl Field {
    pub const ALL: [Field; 24] = [
        Field::Role,
        Field::Name,
        Field::TenantLocation,
        Field::RentFrequency,
        Field::RentAmount,
        Field::PainLevel,
        Field::TenantInterest,
        Field::LandlordLocation,
        Field::UnitsManaged,
        Field::AverageRent,
        Field::CurrentPaymentPractice,
        Field::Challenges,
        Field::LandlordInterest,
        Field::BothResidenceLocation,
        Field::BothRentFrequency,
        Field::BothChallenges,
        Field::BothInterest,
        Field::RoleDescription,
        Field::BusinessLocation,
        Field::BiggestChallenge,
        Field::OtherInterest,
        Field::Email,
        Field::Whatsapp,
        Field::CountryCode,
    ];

    /// Return the field identifier used in payloads and error details.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Role => "role",
            Field::Name => "name",
            Field::TenantLocation => "tenantLocation",
            Field::RentFrequency => "rentFrequency",
            Field::RentAmount => "rentAmount",
            Field::PainLevel => "painLevel",
            Field::TenantInterest => "tenantInterest",
            Field::LandlordLocation => "landlordLocation",
            Field::UnitsManaged => "unitsManaged",
            Field::AverageRent => "averageRent",
            Field::CurrentPaymentPractice => "currentPaymentPractice",
            Field::Challenges => "challenges",
            Field::LandlordInterest => "landlordInterest",
            Field::BothResidenceLocation => "bothResidenceLocation",
            Field::BothRentFrequency => "bothRentFrequency",
            Field::BothChallenges => "bothChallenges",
            Field::BothInterest => "bothInterest",
            Field::RoleDescription => "roleDescription",
            Field::BusinessLocation => "businessLocation",
            Field::BiggestChallenge => "biggestChallenge",
            Field::OtherInterest => "otherInterest",
            Field::Email => "email",
            Field::Whatsapp => "whatsapp",
            Field::CountryCode => "countryCode",
        }
    }

    /// Exact lookup of a field identifier; unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.as_str() == raw)
    }

    /// Human label used in full-record validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Role => "Role selection",
            Field::Name => "Name",
            Field::TenantLocation => "Location",
            Field::RentFrequency => "Rent frequency",
            Field::RentAmount => "Rent amount",
            Field::PainLevel => "Stress level",
            Field::TenantInterest
            | Field::LandlordInterest
            | Field::BothInterest
            | Field::OtherInterest => "Interest level",
            Field::LandlordLocation => "Property location",
            Field::UnitsManaged => "Number of units",
            Field::AverageRent => "Average rent",
            Field::CurrentPaymentPractice => "Payment practice",
            Field::Challenges | Field::BothChallenges | Field::BiggestChallenge => "Challenge",
            Field::BothResidenceLocation => "Residence location",
            Field::BothRentFrequency => "Rent frequency",
            Field::RoleDescription => "Role description",
            Field::BusinessLocation => "Business location",
            Field::Email => "Email",
            Field::Whatsapp => "WhatsApp number",
            Field::CountryCode => "Country code",
        }
    }

    /// Role whose answer set owns this field; `None` for shared fields.
    pub fn owner(&self) -> Option<Role> {
        match self {
            Field::TenantLocation
            | Field::RentFrequency
            | Field::RentAmount
            | Field::PainLevel
            | Field::TenantInterest => Some(Role::Tenant),
            Field::LandlordLocation
            | Field::UnitsManaged
            | Field::AverageRent
            | Field::CurrentPaymentPractice
            | Field::Challenges
            | Field::LandlordInterest => Some(Role::Landlord),
            Field::BothResidenceLocation
            | Field::BothRentFrequency
            | Field::BothChallenges
            | Field::BothInterest => Some(Role::Both),
            Field::RoleDescription
            | Field::BusinessLocation
            | Field::BiggestChallenge
            | Field::OtherInterest => Some(Role::Other),
            Field::Role | Field::Name | Field::Email | Field::Whatsapp | Field::CountryCode => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check applied to a bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty.
    Required,
    /// Non-empty and a well-formed address.
    Email,
    /// Non-empty and a national phone-number shape.
    Phone,
}

/// One field bound to a step, with its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub field: Field,
    pub rule: Rule,
}

const fn required(field: Field) -> Binding {
    Binding {
        field,
        rule: Rule::Required,
    }
}

/// Input control a step renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Intro,
    Location,
    SingleChoice,
    FreeText,
    Number,
    Currency,
    MultiLineText,
    Scale,
    ContactPair,
    Terminal,
}

/// Static definition of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    pub key: StepKey,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub input: InputKind,
    pub options: &'static [&'static str],
    pub bindings: &'static [Binding],
}

impl StepDescriptor {
    pub fn is_terminal(&self) -> bool {
        self.input == InputKind::Terminal
    }

    /// Fields bound to this step, in check order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.bindings.iter().map(|binding| binding.field)
    }

    /// Fields a respondent can correct on this step: the bound fields plus
    /// the dialling prefix chosen next to a phone number.
    pub fn edited_fields(&self) -> impl Iterator<Item = Field> + '_ {
        let prefix = self
            .bindings
            .iter()
            .any(|binding| binding.rule == Rule::Phone)
            .then_some(Field::CountryCode);
        self.fields().chain(prefix)
    }

    /// The single data field a one-input step edits.
    pub fn primary_field(&self) -> Option<Field> {
        match self.bindings {
            [binding] => Some(binding.field),
            _ => None,
        }
    }
}

const ROLE_OPTIONS: &[&str] = &["tenant", "landlord", "both", "other"];
const INTEREST_OPTIONS: &[&str] = &["Definitely", "Maybe", "Not interested"];
const CONTACT_BINDINGS: &[Binding] = &[
    Binding {
        field: Field::Email,
        rule: Rule::Email,
    },
    Binding {
        field: Field::Whatsapp,
        rule: Rule::Phone,
    },
];

const CONTACT_STEP: StepDescriptor = StepDescriptor {
    key: StepKey::Contact,
    title: "Contact Information",
    subtitle: "We'll use this to keep you updated on our launch",
    input: InputKind::ContactPair,
    options: &[],
    bindings: CONTACT_BINDINGS,
};

const CLOSING_STEP: StepDescriptor = StepDescriptor {
    key: StepKey::Closing,
    title: "Thanks for sharing your experience!",
    subtitle: "Your input helps bring monthly rent to Nigeria. We'll keep you updated on launch and early access.",
    input: InputKind::Terminal,
    options: &[],
    bindings: &[],
};

/// Welcome, role selection, and name: shared by every role.
pub static PREFIX_STEPS: [StepDescriptor; PREFIX_LEN] = [
    StepDescriptor {
        key: StepKey::Welcome,
        title: "Take this quick survey",
        subtitle: "Answer a few quick questions (2–3 min). Your feedback will be valuable in helping us to better serve you.",
        input: InputKind::Intro,
        options: &[],
        bindings: &[],
    },
    StepDescriptor {
        key: StepKey::Role,
        title: "Which best describes you?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: ROLE_OPTIONS,
        bindings: &[required(Field::Role)],
    },
    StepDescriptor {
        key: StepKey::Name,
        title: "What's your name?",
        subtitle: "We'd love to know who we're talking to",
        input: InputKind::FreeText,
        options: &[],
        bindings: &[required(Field::Name)],
    },
];

static TENANT_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        key: StepKey::Location,
        title: "Where do you currently rent?",
        subtitle: "",
        input: InputKind::Location,
        options: &[],
        bindings: &[required(Field::TenantLocation)],
    },
    StepDescriptor {
        key: StepKey::Frequency,
        title: "How do you currently pay rent?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: &["Yearly", "Every 6 months", "Monthly", "Other"],
        bindings: &[required(Field::RentFrequency)],
    },
    StepDescriptor {
        key: StepKey::Amount,
        title: "Approximate yearly rent for your current home (₦)?",
        subtitle: "",
        input: InputKind::Currency,
        options: &[],
        bindings: &[required(Field::RentAmount)],
    },
    StepDescriptor {
        key: StepKey::Pain,
        title: "In a scale of 1-5, how financially stressful is it for you to renew your rent?",
        subtitle: "1 = Not stressful, 5 = Extremely stressful",
        input: InputKind::Scale,
        options: &[],
        bindings: &[required(Field::PainLevel)],
    },
    StepDescriptor {
        key: StepKey::Interest,
        title: "Would you consider using a service that lets you effectively split your rent on a monthly basis to ease of the burden of lump sum payments when it's time for renewal?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: INTEREST_OPTIONS,
        bindings: &[required(Field::TenantInterest)],
    },
    CONTACT_STEP,
    CLOSING_STEP,
];

static LANDLORD_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        key: StepKey::Location,
        title: "Where is your rental property located?",
        subtitle: "",
        input: InputKind::Location,
        options: &[],
        bindings: &[required(Field::LandlordLocation)],
    },
    StepDescriptor {
        key: StepKey::Units,
        title: "How many units do you manage?",
        subtitle: "",
        input: InputKind::Number,
        options: &[],
        bindings: &[required(Field::UnitsManaged)],
    },
    StepDescriptor {
        key: StepKey::Rent,
        title: "Average yearly rent per unit (₦)?",
        subtitle: "",
        input: InputKind::Currency,
        options: &[],
        bindings: &[required(Field::AverageRent)],
    },
    StepDescriptor {
        key: StepKey::Practice,
        title: "How do your tenants typically pay rent?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: &["Yearly", "6-month installments", "Monthly", "Other"],
        bindings: &[required(Field::CurrentPaymentPractice)],
    },
    StepDescriptor {
        key: StepKey::Challenges,
        title: "What is your biggest challenge with rent collection?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: &[
            "Late rent Payment",
            "Tenant default",
            "Tracking multiple",
            "Paperwork & reminders",
            "Other",
        ],
        bindings: &[required(Field::Challenges)],
    },
    StepDescriptor {
        key: StepKey::Interest,
        title: "Would you consider a service that collects monthly rent for you just to make sure that you are paid on time when it's time for your tenants to renew their rent?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: INTEREST_OPTIONS,
        bindings: &[required(Field::LandlordInterest)],
    },
    CONTACT_STEP,
    CLOSING_STEP,
];

static BOTH_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        key: StepKey::Residence,
        title: "Where do you currently receive or pay rent?",
        subtitle: "",
        input: InputKind::Location,
        options: &[],
        bindings: &[required(Field::BothResidenceLocation)],
    },
    StepDescriptor {
        key: StepKey::Frequency,
        title: "How do you pay or receive your rent?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: &["Yearly", "6 months", "Monthly", "Other"],
        bindings: &[required(Field::BothRentFrequency)],
    },
    StepDescriptor {
        key: StepKey::Challenges,
        title: "What's your biggest rent-related challenge in both roles?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: &[
            "Balancing payment schedules",
            "Cash flow planning",
            "Tenant maintenance",
            "Property maintenance",
            "Other",
        ],
        bindings: &[required(Field::BothChallenges)],
    },
    StepDescriptor {
        key: StepKey::Interest,
        title: "Do you think you would be interested in a rent-splitting or monthly rent payment system for Nigeria's rental market?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: INTEREST_OPTIONS,
        bindings: &[required(Field::BothInterest)],
    },
    CONTACT_STEP,
    CLOSING_STEP,
];

static OTHER_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        key: StepKey::Type,
        title: "Which best describes your role?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: &[
            "Agent",
            "Property manager",
            "Developer",
            "Real estate investor",
            "Other",
        ],
        bindings: &[required(Field::RoleDescription)],
    },
    StepDescriptor {
        key: StepKey::Location,
        title: "Where does your realty business operate?",
        subtitle: "",
        input: InputKind::Location,
        options: &[],
        bindings: &[required(Field::BusinessLocation)],
    },
    StepDescriptor {
        key: StepKey::Challenge,
        title: "What's your main challenge in Nigeria's rental market?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: &[
            "Tenant defaults",
            "Lack of financing options",
            "Finding reliable tenants",
            "Legal processes",
            "Other",
        ],
        bindings: &[required(Field::BiggestChallenge)],
    },
    StepDescriptor {
        key: StepKey::Interest,
        title: "Do you think you would be interested in a rent-splitting or monthly rent payment system for Nigeria's rental market?",
        subtitle: "",
        input: InputKind::SingleChoice,
        options: INTEREST_OPTIONS,
        bindings: &[required(Field::OtherInterest)],
    },
    CONTACT_STEP,
    CLOSING_STEP,
];

/// Resolve a flat step index; `None` past the end or before a role is chosen.
pub fn step_at(index: usize, role: Option<Role>) -> Option<&'static StepDescriptor> {
    if index < PREFIX_LEN {
        return PREFIX_STEPS.get(index);
    }
    role?.steps().get(index - PREFIX_LEN)
}

/// Look up the step bound to `key` for the given role.
pub fn find_step(key: StepKey, role: Option<Role>) -> Option<&'static StepDescriptor> {
    if let Some(step) = PREFIX_STEPS.iter().find(|step| step.key == key) {
        return Some(step);
    }
    role?.steps().iter().find(|step| step.key == key)
}

/// Flat index of the step that collects `field` in the role's sequence.
pub fn step_index_for_field(field: Field, role: Option<Role>) -> Option<usize> {
    if let Some(idx) = PREFIX_STEPS
        .iter()
        .position(|step| step.edited_fields().any(|edited| edited == field))
    {
        return Some(idx);
    }
    role?
        .steps()
        .iter()
        .position(|step| step.edited_fields().any(|edited| edited == field))
        .map(|idx| PREFIX_LEN + idx)
}

/// Selectable dialling prefix for the WhatsApp number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryCode {
    pub code: &'static str,
    pub country: &'static str,
}

pub const COUNTRY_CODES: &[CountryCode] = &[
    CountryCode {
        code: "+234",
        country: "Nigeria",
    },
    CountryCode {
        code: "+91",
        country: "India",
    },
    CountryCode {
        code: "+27",
        country: "South Africa",
    },
    CountryCode {
        code: "+254",
        country: "Kenya",
    },
    CountryCode {
        code: "+256",
        country: "Uganda",
    },
    CountryCode {
        code: "+233",
        country: "Ghana",
    },
    CountryCode {
        code: "+212",
        country: "Morocco",
    },
    CountryCode {
        code: "+20",
        country: "Egypt",
    },
];

pub fn is_known_country_code(code: &str) -> bool {
    COUNTRY_CODES.iter().any(|entry| entry.code == code)
}

/// Choices offered by location steps.
pub const NIGERIAN_STATES: &[&str] = &[
    "Abia",
    "Adamawa",
    "Akwa Ibom",
    "Anambra",
    "Bauchi",
    "Bayelsa",
    "Benue",
    "Borno",
    "Cross River",
    "Delta",
    "Ebonyi",
    "Edo",
    "Ekiti",
    "Enugu",
    "FCT (Abuja)",
    "Gombe",
    "Imo",
    "Jigawa",
    "Kaduna",
    "Kano",
    "Katsina",
    "Kebbi",
    "Kogi",
    "Kwara",
    "Lagos",
    "Nasarawa",
    "Niger",
    "Ogun",
    "Ondo",
    "Osun",
    "Oyo",
    "Plateau",
    "Rivers",
    "Sokoto",
    "Taraba",
    "Yobe",
    "Zamfara",
];

/// Case-insensitive substring search over the state list.
pub fn search_states(term: &str) -> Vec<&'static str> {
    let needle = term.trim().to_lowercase();
    NIGERIAN_STATES
        .iter()
        .copied()
        .filter(|state| state.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_sequence_ends_with_contact_then_closing() {
        for role in Role::ALL {
            let steps = role.steps();
            let keys: Vec<StepKey> = steps.iter().rev().take(2).map(|step| step.key).collect();
            assert_eq!(keys, vec![StepKey::Closing, StepKey::Contact], "{role}");
            assert!(steps.last().is_some_and(StepDescriptor::is_terminal));
        }
    }

    #[test]
    fn role_specific_fields_belong_to_their_role() {
        for role in Role::ALL {
            for step in role.steps() {
                for field in step.fields() {
                    let owner = field.owner();
                    assert!(
                        owner.is_none() || owner == Some(role),
                        "{field} bound under {role}"
                    );
                }
            }
        }
    }

    #[test]
    fn field_identifiers_round_trip_through_parse() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
        assert_eq!(Field::parse("favouriteColour"), None);
    }

    #[test]
    fn email_maps_to_contact_step_for_each_role() {
        assert_eq!(step_index_for_field(Field::Email, Some(Role::Tenant)), Some(8));
        assert_eq!(step_index_for_field(Field::Email, Some(Role::Landlord)), Some(9));
        assert_eq!(step_index_for_field(Field::Whatsapp, Some(Role::Both)), Some(7));
        assert_eq!(step_index_for_field(Field::Email, Some(Role::Other)), Some(7));
        assert_eq!(step_index_for_field(Field::Name, None), Some(2));
        assert_eq!(step_index_for_field(Field::Role, None), Some(1));
        assert_eq!(step_index_for_field(Field::Email, None), None);
        assert_eq!(
            step_index_for_field(Field::CountryCode, Some(Role::Tenant)),
            Some(8)
        );
        assert_eq!(
            step_index_for_field(Field::TenantLocation, Some(Role::Landlord)),
            None
        );
    }

    #[test]
    fn step_at_returns_none_past_the_end() {
        assert_eq!(step_at(0, None).map(|step| step.key), Some(StepKey::Welcome));
        assert!(step_at(3, None).is_none());
        assert_eq!(
            step_at(3, Some(Role::Other)).map(|step| step.key),
            Some(StepKey::Type)
        );
        assert!(step_at(PREFIX_LEN + Role::Tenant.steps().len(), Some(Role::Tenant)).is_none());
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("Tenant"), Some(Role::Tenant));
        assert_eq!(Role::parse(" BOTH "), Some(Role::Both));
        assert_eq!(Role::parse("agent"), None);
    }

    #[test]
    fn state_search_matches_substrings() {
        assert_eq!(search_states("lag"), vec!["Lagos"]);
        assert_eq!(search_states("abuja"), vec!["FCT (Abuja)"]);
        assert_eq!(search_states("").len(), NIGERIAN_STATES.len());
        assert!(search_states("ni").contains(&"Niger"));
    }

    #[test]
    fn default_country_code_is_selectable() {
        assert!(is_known_country_code(DEFAULT_COUNTRY_CODE));
        assert!(!is_known_country_code("+1"));
    }
}
