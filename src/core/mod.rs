//! Core field validation types.

mod aggregator;
mod cache;
mod context;
mod form;
mod input;
mod predicate;
mod registry;
mod rule;
mod validator;

pub use aggregator::{DEFAULT_SAVE_CONTROL, SaveControlAggregator, SaveState};
pub use cache::ValueCache;
pub use context::{ValidationContext, ValidationContextBuilder};
pub use form::FieldSet;
pub use input::{FieldId, RawInput, ValidationOutcome};
pub use predicate::{TypePredicate, is_nullable_string, parses_as_number};
pub use registry::{RegistrySnapshot, Ticket, ValidationRegistry};
pub use rule::{
    EMPTY_REQUIRED, EmptyPolicy, INVALID_JSON, INVALID_TIME_ZONE, NOT_AN_OBJECT, Rule, Shape,
};
pub use validator::{FieldValidator, VALIDATING_STATUS};
