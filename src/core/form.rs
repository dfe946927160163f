//! A form's complete set of field validators.

use crate::core::aggregator::SaveState;
use crate::core::context::ValidationContext;
use crate::core::input::{FieldId, RawInput, ValidationOutcome};
use crate::core::validator::FieldValidator;
use crate::error::{FormError, Result};
use crate::settings::FormSettings;
use futures::future::join_all;
use std::collections::HashMap;

/// Every validator of one form, sharing one [`ValidationContext`].
///
/// # Examples
///
/// ```rust
/// use formgate::prelude::*;
/// use formgate::settings::{FieldKind, FieldSpec};
/// use formgate::ui::memory::MemoryDocument;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<()> {
/// let document = Arc::new(MemoryDocument::new().with_field("timezone"));
/// let settings = FormSettings::default()
///     .with_field(FieldSpec::new("timezone", FieldKind::TimeZone));
/// let context = ValidationContext::for_settings(document, &settings);
///
/// let form = FieldSet::from_settings(&context, &settings)?;
/// form.validate("timezone", "Pacific/Auckland").await?;
/// assert!(form.is_ready());
/// # Ok(())
/// # }
/// ```
pub struct FieldSet {
    context: ValidationContext,
    validators: Vec<FieldValidator>,
    index: HashMap<FieldId, usize>,
    defaults: HashMap<FieldId, Option<String>>,
}

impl FieldSet {
    /// Create an empty field set.
    pub fn new(context: &ValidationContext) -> Self {
        Self {
            context: context.clone(),
            validators: Vec::new(),
            index: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// Build one validator per field described in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::SaveControlMismatch`] if `context` drives a
    /// different save control than `settings` name,
    /// [`FormError::Binding`] if a field has no element, or
    /// [`FormError::DuplicateField`] if a field is listed twice.
    pub fn from_settings(context: &ValidationContext, settings: &FormSettings) -> Result<Self> {
        let actual = context.aggregator().control_id();
        if actual != settings.save_control {
            return Err(FormError::SaveControlMismatch {
                expected: settings.save_control.clone(),
                actual: actual.to_string(),
            });
        }

        let emojis = settings.emoji_set();
        let mut set = Self::new(context);

        for spec in &settings.fields {
            let validator = FieldValidator::new(context, &spec.id, spec.rule(&emojis))?;
            set.insert(validator)?;
            set.defaults.insert(spec.id.clone(), spec.default.clone());
        }

        Ok(set)
    }

    /// Add a validator.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DuplicateField`] if the set already has a
    /// validator for the same field.
    pub fn insert(&mut self, validator: FieldValidator) -> Result<()> {
        if self.index.contains_key(validator.id()) {
            return Err(FormError::DuplicateField(validator.id().clone()));
        }
        self.index.insert(validator.id().clone(), self.validators.len());
        self.defaults.entry(validator.id().clone()).or_insert(None);
        self.validators.push(validator);
        Ok(())
    }

    /// The validator for `id`.
    pub fn get(&self, id: &str) -> Option<&FieldValidator> {
        self.index.get(id).map(|&at| &self.validators[at])
    }

    /// Field ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.validators.iter().map(FieldValidator::id)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the set has no fields.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validate one field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if the set has no such field.
    pub async fn validate(
        &self,
        id: &str,
        input: impl Into<RawInput>,
    ) -> Result<ValidationOutcome> {
        let validator = self
            .get(id)
            .ok_or_else(|| FormError::UnknownField(FieldId::from(id)))?;
        Ok(validator.validate(input).await)
    }

    /// Validate several fields together.
    ///
    /// All ids are checked before anything is validated. Outcomes are returned
    /// in field order.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] for the first id the set does not know.
    pub async fn validate_all<I, K, V>(
        &self,
        inputs: I,
    ) -> Result<Vec<(FieldId, ValidationOutcome)>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawInput>,
    {
        let mut pending = Vec::new();
        for (id, input) in inputs {
            let id = id.as_ref();
            let at = *self
                .index
                .get(id)
                .ok_or_else(|| FormError::UnknownField(FieldId::from(id)))?;
            pending.push((at, input.into()));
        }
        pending.sort_by_key(|(at, _)| *at);

        let validations = pending.into_iter().map(|(at, input)| async move {
            let validator = &self.validators[at];
            (validator.id().clone(), validator.validate(input).await)
        });

        Ok(join_all(validations).await)
    }

    /// The default value of every field.
    pub fn defaults(&self) -> &HashMap<FieldId, Option<String>> {
        &self.defaults
    }

    /// The last cached value of `id`.
    pub fn cached_input(&self, id: &str) -> Option<String> {
        self.get(id).and_then(FieldValidator::cached_input)
    }

    /// The save control's current state.
    pub fn save_state(&self) -> SaveState {
        self.context.save_state()
    }

    /// Whether the form may be saved.
    pub fn is_ready(&self) -> bool {
        self.save_state().is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FieldKind, FieldSpec};
    use crate::ui::memory::MemoryDocument;
    use std::sync::Arc;

    fn form(settings: &FormSettings) -> (ValidationContext, FieldSet) {
        let document = MemoryDocument::new().with_save_control(&settings.save_control, "Save");
        for field in &settings.fields {
            document.add_field(&field.id);
        }
        let context = ValidationContext::for_settings(Arc::new(document), settings);
        let set = FieldSet::from_settings(&context, settings).unwrap();
        (context, set)
    }

    fn sample_settings() -> FormSettings {
        FormSettings::default()
            .with_allowed_emojis(["📚"])
            .with_field(
                FieldSpec::new("timezone", FieldKind::TimeZone).with_default("Pacific/Auckland"),
            )
            .with_field(
                FieldSpec::new("course-code-n", FieldKind::RequiredNumber).with_default("2"),
            )
            .with_field(FieldSpec::new("course-emojis", FieldKind::JsonEmojiObject))
            .with_field(FieldSpec::new("notion-key", FieldKind::RequiredString).cached())
    }

    #[test]
    fn test_from_settings() {
        let (_context, set) = form(&sample_settings());
        assert_eq!(set.len(), 4);
        assert!(set.get("timezone").is_some());
        assert_eq!(
            set.defaults().get(&FieldId::from("course-code-n")),
            Some(&Some("2".to_string()))
        );
        assert_eq!(set.defaults().get(&FieldId::from("notion-key")), Some(&None));
    }

    #[test]
    fn test_missing_element_fails() {
        let context = ValidationContext::new(Arc::new(MemoryDocument::new()));
        let result = FieldSet::from_settings(&context, &sample_settings());
        assert!(matches!(result, Err(FormError::Binding { .. })));
    }

    #[test]
    fn test_save_control_mismatch() {
        let mut settings = sample_settings();
        settings.save_control = "apply".to_string();
        let document = Arc::new(MemoryDocument::new().with_save_control("apply", "Apply"));
        for field in &settings.fields {
            document.add_field(&field.id);
        }

        let context = ValidationContext::new(document.clone());
        let result = FieldSet::from_settings(&context, &settings);
        assert!(matches!(
            result,
            Err(FormError::SaveControlMismatch { expected, actual })
                if expected == "apply" && actual == "save-button"
        ));

        let context = ValidationContext::for_settings(document, &settings);
        assert!(FieldSet::from_settings(&context, &settings).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_field() {
        let (_context, set) = form(&sample_settings());
        let result = set.validate("nope", "x").await;
        assert!(matches!(result, Err(FormError::UnknownField(id)) if id.as_str() == "nope"));
    }

    #[tokio::test]
    async fn test_validate_all_in_field_order() {
        let (context, set) = form(&sample_settings());

        let outcomes = set
            .validate_all([
                ("notion-key", ""),
                ("course-emojis", r#"{"COMP":"📚"}"#),
                ("timezone", "Europe/London"),
            ])
            .await
            .unwrap();

        let ids: Vec<_> = outcomes.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["timezone", "course-emojis", "notion-key"]);
        assert!(outcomes[0].1.is_accepted());
        assert!(outcomes[1].1.is_accepted());
        assert!(!outcomes[2].1.is_accepted());

        assert_eq!(context.save_state(), SaveState::Blocked { invalid: 1 });
        assert!(!set.is_ready());
    }

    #[tokio::test]
    async fn test_validate_all_checks_ids_first() {
        let (context, set) = form(&sample_settings());
        let result = set.validate_all([("notion-key", ""), ("ghost", "x")]).await;
        assert!(matches!(result, Err(FormError::UnknownField(_))));
        assert_eq!(context.registry().count_invalid(), 0);
    }

    #[tokio::test]
    async fn test_cached_input() {
        let (_context, set) = form(&sample_settings());
        set.validate("notion-key", "secret_abc").await.unwrap();
        assert_eq!(set.cached_input("notion-key"), Some("secret_abc".to_string()));
        assert_eq!(set.cached_input("timezone"), None);
    }

    #[test]
    fn test_insert_duplicate() {
        let document = Arc::new(MemoryDocument::new().with_field("a"));
        let context = ValidationContext::new(document);
        let mut set = FieldSet::new(&context);

        set.insert(FieldValidator::string(&context, "a").unwrap()).unwrap();
        let result = set.insert(FieldValidator::string(&context, "a").unwrap());
        assert!(matches!(result, Err(FormError::DuplicateField(_))));
    }
}
