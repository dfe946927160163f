//! Validation metrics tracking using OpenTelemetry.

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};
use std::time::Instant;

/// Metrics collector for field validations.
///
/// # Examples
///
/// ```rust,no_run
/// use formgate::metrics::ValidationMetrics;
/// use opentelemetry::global;
///
/// let meter = global::meter("formgate");
/// let metrics = ValidationMetrics::new(meter);
///
/// let timer = metrics.start_validation("timezone");
/// // ... evaluate the rule ...
/// metrics.record_accepted("timezone", timer);
/// ```
#[derive(Clone)]
pub struct ValidationMetrics {
    started: Counter<u64>,
    accepted: Counter<u64>,
    rejected: Counter<u64>,
    stale: Counter<u64>,
    duration: Histogram<f64>,
}

impl ValidationMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let started = meter
            .u64_counter("formgate.validation.started")
            .with_description("Total number of field validations started")
            .build();

        let accepted = meter
            .u64_counter("formgate.validation.accepted")
            .with_description("Number of validations that accepted the input")
            .build();

        let rejected = meter
            .u64_counter("formgate.validation.rejected")
            .with_description("Number of validations that rejected the input")
            .build();

        let stale = meter
            .u64_counter("formgate.validation.stale")
            .with_description("Number of results discarded because a newer validation started")
            .build();

        let duration = meter
            .f64_histogram("formgate.validation.duration")
            .with_description("Duration of validations in seconds")
            .with_unit("s")
            .build();

        Self {
            started,
            accepted,
            rejected,
            stale,
            duration,
        }
    }

    /// Count a started validation and return its timer.
    pub fn start_validation(&self, field: &str) -> Instant {
        self.started.add(1, &[field_attr(field)]);
        Instant::now()
    }

    /// Record an accepted input.
    pub fn record_accepted(&self, field: &str, start: Instant) {
        self.accepted.add(1, &[field_attr(field)]);
        self.record_duration(field, start);
    }

    /// Record a rejected input.
    pub fn record_rejected(&self, field: &str, start: Instant) {
        self.rejected.add(1, &[field_attr(field)]);
        self.record_duration(field, start);
    }

    /// Record a result that was discarded as stale.
    pub fn record_stale(&self, field: &str) {
        self.stale.add(1, &[field_attr(field)]);
    }

    fn record_duration(&self, field: &str, start: Instant) {
        self.duration
            .record(start.elapsed().as_secs_f64(), &[field_attr(field)]);
    }
}

fn field_attr(field: &str) -> KeyValue {
    KeyValue::new("field", field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::global;

    #[test]
    fn test_metrics_creation() {
        let metrics = ValidationMetrics::new(global::meter("test"));

        // Test basic operations don't panic
        let timer = metrics.start_validation("a");
        metrics.record_accepted("a", timer);

        let timer = metrics.start_validation("b");
        metrics.record_rejected("b", timer);

        metrics.record_stale("a");
    }

    #[test]
    fn test_metrics_clone() {
        let metrics = ValidationMetrics::new(global::meter("test"));
        let metrics2 = metrics.clone();

        let timer1 = metrics.start_validation("a");
        let timer2 = metrics2.start_validation("a");

        metrics.record_accepted("a", timer1);
        metrics2.record_accepted("a", timer2);
    }
}
