//! Field validators.

use crate::core::context::ValidationContext;
use crate::core::input::{FieldId, RawInput, ValidationOutcome};
use crate::core::registry::Ticket;
use crate::core::rule::Rule;
use crate::error::{FormError, Rejection, Result};
use crate::ui::FieldElement;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg(feature = "metrics")]
use std::time::Instant;

/// Status text shown beside a field while it validates.
pub const VALIDATING_STATUS: &str = "Validating input...";

/// Validates one form field and reports the result to its element, the
/// registry and the save control.
///
/// # Examples
///
/// ```rust
/// use formgate::prelude::*;
/// use formgate::ui::memory::MemoryDocument;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<()> {
/// let document = Arc::new(MemoryDocument::new().with_field("course-code-n"));
/// let context = ValidationContext::new(document);
///
/// let validator = FieldValidator::required_number(&context, "course-code-n")?;
/// let outcome = validator.validate("2").await;
/// assert_eq!(outcome, ValidationOutcome::Accepted(Some("2".to_string())));
/// # Ok(())
/// # }
/// ```
pub struct FieldValidator {
    id: FieldId,
    element: Arc<dyn FieldElement>,
    rule: Rule,
    context: ValidationContext,
    /// The rejection currently displayed, kept so an abandoned revalidation
    /// can put it back.
    last_rejection: Mutex<Option<Rejection>>,
}

impl FieldValidator {
    /// Bind a validator for `id` to its element.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Binding`] if the document has no element for `id`.
    pub fn new(context: &ValidationContext, id: impl Into<FieldId>, rule: Rule) -> Result<Self> {
        let id = id.into();
        let Some(element) = context.document().field(&id) else {
            warn!(field = %id, "no element for field");
            return Err(FormError::binding(id));
        };

        Ok(Self {
            id,
            element,
            rule,
            context: context.clone(),
            last_rejection: Mutex::new(None),
        })
    }

    /// An optional string field.
    pub fn string(context: &ValidationContext, id: impl Into<FieldId>) -> Result<Self> {
        Self::new(context, id, Rule::string())
    }

    /// A required string field.
    pub fn required_string(context: &ValidationContext, id: impl Into<FieldId>) -> Result<Self> {
        Self::new(context, id, Rule::required_string())
    }

    /// A required numeric field.
    pub fn required_number(context: &ValidationContext, id: impl Into<FieldId>) -> Result<Self> {
        Self::new(context, id, Rule::required_number())
    }

    /// A JSON object of strings.
    pub fn json_string_object(
        context: &ValidationContext,
        id: impl Into<FieldId>,
    ) -> Result<Self> {
        Self::new(context, id, Rule::json_string_object())
    }

    /// A JSON object of allowed emoji.
    pub fn json_emoji_object(
        context: &ValidationContext,
        id: impl Into<FieldId>,
        allowed: BTreeSet<String>,
    ) -> Result<Self> {
        Self::new(context, id, Rule::json_emoji_object(allowed))
    }

    /// An optional IANA time-zone field.
    pub fn time_zone(context: &ValidationContext, id: impl Into<FieldId>) -> Result<Self> {
        Self::new(context, id, Rule::time_zone())
    }

    /// The field this validator is bound to.
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// The rule applied to inputs.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The last value this field accepted, if its rule caches accepted values.
    pub fn cached_input(&self) -> Option<String> {
        self.context.cache().get(&self.id)
    }

    /// Validate `input`.
    ///
    /// The field is marked as validating while the rule runs. When several
    /// validations of the same field overlap, each caller gets its own outcome
    /// but only the most recently started one updates the field's error
    /// display, the invalid set and the cache.
    pub async fn validate(&self, input: impl Into<RawInput>) -> ValidationOutcome {
        let input = input.into();
        let mut in_flight = InFlight {
            validator: self,
            ticket: Some(self.begin()),
        };

        tokio::task::yield_now().await;

        #[cfg(feature = "metrics")]
        let timer = self
            .context
            .metrics()
            .map(|metrics| metrics.start_validation(self.id.as_str()))
            .unwrap_or_else(Instant::now);

        let outcome = ValidationOutcome::from(self.rule.evaluate(&input));

        if let Some(ticket) = in_flight.ticket.take() {
            let latest = self.finish(&ticket);
            if latest {
                self.report(&input, &outcome);
            } else {
                debug!(field = %self.id, "discarding stale validation result");
            }

            #[cfg(feature = "metrics")]
            if let Some(metrics) = self.context.metrics() {
                match (&outcome, latest) {
                    (_, false) => metrics.record_stale(self.id.as_str()),
                    (ValidationOutcome::Accepted(_), true) => {
                        metrics.record_accepted(self.id.as_str(), timer)
                    }
                    (ValidationOutcome::Rejected(_), true) => {
                        metrics.record_rejected(self.id.as_str(), timer)
                    }
                }
            }
        }

        self.context.refresh();
        outcome
    }

    fn begin(&self) -> Ticket {
        debug!(field = %self.id, "validating");
        let ticket = self.context.registry().begin(&self.id);

        self.element.clear_error();
        self.element.set_invalid_marker(false);
        self.element.show_status(VALIDATING_STATUS);

        self.context.refresh();
        ticket
    }

    fn finish(&self, ticket: &Ticket) -> bool {
        let latest = self.context.registry().finish(ticket);
        if !self.context.registry().is_validating(&self.id) {
            self.element.clear_status();
        }
        latest
    }

    fn report(&self, input: &RawInput, outcome: &ValidationOutcome) {
        match outcome {
            ValidationOutcome::Accepted(value) => {
                self.context.registry().clear_invalid(&self.id);
                *self.last_rejection.lock() = None;
                self.element.clear_error();
                self.element.set_invalid_marker(false);

                // Values substituted for empty input are never cached.
                if self.rule.caches_accepted() && !input.is_empty() {
                    if let Some(value) = value {
                        self.context.cache().store(&self.id, value);
                    }
                }
                debug!(field = %self.id, "input accepted");
            }
            ValidationOutcome::Rejected(rejection) => {
                self.context.registry().mark_invalid(&self.id);
                *self.last_rejection.lock() = Some(rejection.clone());
                self.show_rejection(rejection);
                debug!(field = %self.id, reason = %rejection, "input rejected");
            }
        }
    }

    fn show_rejection(&self, rejection: &Rejection) {
        self.element.set_invalid_marker(true);
        self.element.show_error(rejection.message());
    }

    /// Redisplay the standing rejection after the latest validation of a
    /// still-invalid field was abandoned.
    fn restore_rejection(&self) {
        if !self.context.registry().is_invalid(&self.id) {
            return;
        }
        if let Some(rejection) = self.last_rejection.lock().as_ref() {
            debug!(field = %self.id, "validation abandoned, restoring previous rejection");
            self.show_rejection(rejection);
        }
    }
}

impl std::fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldValidator")
            .field("id", &self.id)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

/// Releases the field's registry entry if a validation future is dropped
/// before its rule finished.
struct InFlight<'a> {
    validator: &'a FieldValidator,
    ticket: Option<Ticket>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            if self.validator.finish(&ticket) {
                self.validator.restore_rejection();
            }
            self.validator.context.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::SaveState;
    use crate::core::rule::{EMPTY_REQUIRED, INVALID_TIME_ZONE};
    use crate::ui::memory::MemoryDocument;

    fn setup(fields: &[&str]) -> (Arc<MemoryDocument>, ValidationContext) {
        let document = MemoryDocument::new().with_save_control("save-button", "Save");
        for field in fields {
            document.add_field(*field);
        }
        let document = Arc::new(document);
        let context = ValidationContext::new(document.clone());
        (document, context)
    }

    #[test]
    fn test_missing_element_is_binding_error() {
        let (_document, context) = setup(&[]);
        let err = FieldValidator::string(&context, "ghost").unwrap_err();
        assert!(matches!(err, FormError::Binding { field } if field.as_str() == "ghost"));
    }

    #[tokio::test]
    async fn test_rejection_is_displayed_and_registered() {
        let (document, context) = setup(&["breadcrumbs"]);
        let validator = FieldValidator::required_string(&context, "breadcrumbs").unwrap();

        let outcome = validator.validate("").await;
        assert_eq!(outcome, ValidationOutcome::Rejected(Rejection::new(EMPTY_REQUIRED)));

        let element = document.memory_field("breadcrumbs").unwrap();
        assert_eq!(element.error().as_deref(), Some(EMPTY_REQUIRED));
        assert!(element.is_marked_invalid());
        assert_eq!(element.status(), None);
        assert!(context.registry().is_invalid(validator.id()));
        assert_eq!(context.save_state(), SaveState::Blocked { invalid: 1 });
    }

    #[tokio::test]
    async fn test_acceptance_clears_previous_rejection() {
        let (document, context) = setup(&["timezone"]);
        let validator = FieldValidator::time_zone(&context, "timezone").unwrap();

        assert!(!validator.validate("Not/AZone").await.is_accepted());
        assert!(context.registry().is_invalid(validator.id()));

        let outcome = validator.validate("Pacific/Auckland").await;
        assert_eq!(
            outcome,
            ValidationOutcome::Accepted(Some("Pacific/Auckland".to_string()))
        );

        let element = document.memory_field("timezone").unwrap();
        assert_eq!(element.error(), None);
        assert!(!element.is_marked_invalid());
        assert!(!context.registry().is_invalid(validator.id()));
        assert_eq!(context.save_state(), SaveState::Ready);

        let control = document.memory_save_control("save-button").unwrap();
        assert_eq!(control.label(), "Save");
        assert!(control.is_enabled());
    }

    #[tokio::test]
    async fn test_time_zone_message() {
        let (_document, context) = setup(&["timezone"]);
        let validator = FieldValidator::time_zone(&context, "timezone").unwrap();
        let outcome = validator.validate("Not/AZone").await;
        assert_eq!(outcome.rejection().map(Rejection::message), Some(INVALID_TIME_ZONE));
    }

    #[tokio::test]
    async fn test_pending_while_rule_runs() {
        let (document, context) = setup(&["a"]);
        let validator = FieldValidator::string(&context, "a").unwrap();
        let control = document.memory_save_control("save-button").unwrap();

        let mut states = context.subscribe();
        let validation = validator.validate("x");
        tokio::pin!(validation);

        // Drive the future up to its first suspension point.
        assert!(futures::poll!(validation.as_mut()).is_pending());
        assert_eq!(*states.borrow_and_update(), SaveState::Pending { validating: 1 });
        assert_eq!(control.label(), "Validating 1 input...");
        assert!(!control.is_enabled());
        assert_eq!(
            document.memory_field("a").unwrap().status().as_deref(),
            Some(VALIDATING_STATUS)
        );

        assert!(validation.await.is_accepted());
        assert_eq!(context.save_state(), SaveState::Ready);
    }

    #[tokio::test]
    async fn test_dropped_validation_releases_field() {
        let (_document, context) = setup(&["a"]);
        let validator = FieldValidator::string(&context, "a").unwrap();

        {
            let validation = validator.validate("x");
            tokio::pin!(validation);
            assert!(futures::poll!(validation.as_mut()).is_pending());
            assert!(context.registry().is_validating(validator.id()));
        }

        assert!(!context.registry().is_validating(validator.id()));
        assert_eq!(context.save_state(), SaveState::Ready);
    }

    #[tokio::test]
    async fn test_dropped_revalidation_keeps_rejection_visible() {
        let (document, context) = setup(&["a"]);
        let validator = FieldValidator::required_string(&context, "a").unwrap();
        let element = document.memory_field("a").unwrap();

        validator.validate("").await;

        {
            let validation = validator.validate("x");
            tokio::pin!(validation);
            assert!(futures::poll!(validation.as_mut()).is_pending());
            assert_eq!(element.error(), None);
            assert!(!element.is_marked_invalid());
        }

        assert!(context.registry().is_invalid(validator.id()));
        assert_eq!(element.error().as_deref(), Some(EMPTY_REQUIRED));
        assert!(element.is_marked_invalid());
        assert_eq!(element.status(), None);

        let control = document.memory_save_control("save-button").unwrap();
        assert_eq!(control.label(), "1 invalid input!");
    }

    #[tokio::test]
    async fn test_dropping_latest_of_overlapping_validations() {
        let (document, context) = setup(&["n"]);
        let validator = FieldValidator::required_number(&context, "n").unwrap();
        let element = document.memory_field("n").unwrap();

        validator.validate("abc").await;

        let older = validator.validate("42");
        tokio::pin!(older);
        assert!(futures::poll!(older.as_mut()).is_pending());
        {
            let newer = validator.validate("7");
            tokio::pin!(newer);
            assert!(futures::poll!(newer.as_mut()).is_pending());
        }

        // The rejection is back while the older call is still running.
        assert_eq!(element.error().as_deref(), Some("Input must be a number!"));
        assert!(element.is_marked_invalid());
        assert!(context.registry().is_validating(validator.id()));

        // The older call is stale and leaves the standing rejection alone.
        assert!(older.await.is_accepted());
        assert!(context.registry().is_invalid(validator.id()));
        assert!(element.is_marked_invalid());
        assert_eq!(context.save_state(), SaveState::Blocked { invalid: 1 });
    }

    #[tokio::test]
    async fn test_dropped_validation_of_accepted_field_shows_nothing() {
        let (document, context) = setup(&["a"]);
        let validator = FieldValidator::required_string(&context, "a").unwrap();

        validator.validate("").await;
        validator.validate("ok").await;
        {
            let validation = validator.validate("again");
            tokio::pin!(validation);
            assert!(futures::poll!(validation.as_mut()).is_pending());
        }

        let element = document.memory_field("a").unwrap();
        assert_eq!(element.error(), None);
        assert!(!element.is_marked_invalid());
        assert_eq!(context.save_state(), SaveState::Ready);
    }

    #[tokio::test]
    async fn test_cached_rule_ignores_value_substituted_for_empty_input() {
        let (_document, context) = setup(&["overrides"]);
        let validator =
            FieldValidator::new(&context, "overrides", Rule::json_string_object().cached())
                .unwrap();

        assert!(validator.validate("").await.is_accepted());
        assert_eq!(validator.cached_input(), None);

        validator.validate(r#"{"a":"b"}"#).await;
        validator.validate("").await;
        assert_eq!(validator.cached_input(), Some(r#"{"a":"b"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_cached_rule_stores_accepted_values() {
        let (_document, context) = setup(&["notion-key"]);
        let validator =
            FieldValidator::new(&context, "notion-key", Rule::required_string().cached()).unwrap();

        validator.validate("foo").await;
        assert_eq!(validator.cached_input(), Some("foo".to_string()));

        validator.validate("").await;
        assert_eq!(validator.cached_input(), Some("foo".to_string()));
    }
}
