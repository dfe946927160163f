//! Built-in metrics for field validation.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Validations started
//! - Accepted and rejected outcomes
//! - Stale results discarded after a newer validation of the same field
//! - Rule evaluation duration
//!
//! # Examples
//!
//! ```rust,no_run
//! use formgate::prelude::*;
//! use formgate::metrics::ValidationMetrics;
//! use formgate::ui::memory::MemoryDocument;
//! use opentelemetry::global;
//! use std::sync::Arc;
//!
//! let meter = global::meter("my-app");
//!
//! let context = ValidationContext::builder(Arc::new(MemoryDocument::new()))
//!     .with_metrics(ValidationMetrics::new(meter))
//!     .build();
//! ```

mod validation_metrics;

pub use validation_metrics::ValidationMetrics;
