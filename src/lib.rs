//! # formgate
//!
//! Per-field validation for settings forms, gating a single save control.
//!
//! ## Overview
//!
//! `formgate` validates the values a user types into a settings form before
//! they are persisted:
//! - Each field has a [`FieldValidator`](core::FieldValidator) built from a
//!   declarative [`Rule`](core::Rule)
//! - Inline status and error text is pushed to the field's element
//! - A shared registry tracks which fields are validating or invalid
//! - The save control is disabled and relabelled until every field is valid
//!
//! ## Quick Start
//!
//! ```rust
//! use formgate::prelude::*;
//! use formgate::ui::memory::MemoryDocument;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! let document = Arc::new(
//!     MemoryDocument::new()
//!         .with_field("timezone")
//!         .with_field("course-code-n")
//!         .with_save_control("save-button", "Save"),
//! );
//! let context = ValidationContext::new(document);
//!
//! let timezone = FieldValidator::time_zone(&context, "timezone")?;
//! let course_code = FieldValidator::required_number(&context, "course-code-n")?;
//!
//! assert!(timezone.validate("Pacific/Auckland").await.is_accepted());
//! assert!(!course_code.validate("two").await.is_accepted());
//!
//! assert_eq!(context.save_state(), SaveState::Blocked { invalid: 1 });
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `metrics`: OpenTelemetry counters and durations for validations

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod settings;
pub mod sources;
pub mod ui;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        FieldId, FieldSet, FieldValidator, RawInput, Rule, SaveState, ValidationContext,
        ValidationOutcome,
    };
    pub use crate::error::{FormError, Rejection, Result};
    pub use crate::settings::FormSettings;
}
