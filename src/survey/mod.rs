//! Survey core: schema, answer record, formatting, validation, and the flow
//! controller that ties them together.
pub mod flow;
pub mod format;
pub mod record;
pub mod schema;
pub mod validate;

pub use flow::{
    Advance, FieldErrors, FlowSnapshot, Ignored, StepView, SubmitOutcome, SurveyFlow, UpdateError,
};
pub use record::{RecordError, RoleAnswers, SurveyRecord};
pub use schema::{Field, InputKind, Role, StepDescriptor, StepKey};
pub use validate::{validate_record, validate_step, FieldError, ValidationResult};
