//! Partial form descriptions and how they combine.

use super::{FieldKind, FieldSpec, FormSettings, default_save_control};
use crate::core::FieldId;
use crate::error::{FormError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

/// The part of a form description provided by one source.
///
/// Layers are merged in priority order. A later `save_control` or
/// `allowed_emojis` replaces the earlier one. Fields are matched by id: an
/// entry for a field already described changes only the keys it sets, and an
/// entry for a new field is appended.
///
/// # Examples
///
/// ```rust
/// use formgate::settings::{FieldKind, FieldOverlay, SettingsLayer};
///
/// let layer = SettingsLayer::default()
///     .with_save_control("apply")
///     .with_field(FieldOverlay::new("course-code-n").with_default("3"));
/// assert_eq!(layer.fields[0].kind, None::<FieldKind>);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsLayer {
    /// Id of the save control.
    #[serde(default)]
    pub save_control: Option<String>,
    /// Tokens accepted as values of emoji object fields.
    #[serde(default)]
    pub allowed_emojis: Option<Vec<String>>,
    /// Field entries, in display order.
    #[serde(default)]
    pub fields: Vec<FieldOverlay>,
}

/// One field entry of a [`SettingsLayer`]. Unset keys leave earlier layers alone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldOverlay {
    /// The field's id.
    pub id: FieldId,
    /// What the field holds.
    #[serde(default)]
    pub kind: Option<FieldKind>,
    /// Keep the last accepted value in the value cache.
    #[serde(default)]
    pub cached: Option<bool>,
    /// The value used when nothing has been saved yet.
    #[serde(default)]
    pub default: Option<String>,
}

impl FieldOverlay {
    /// An entry that only names the field.
    pub fn new(id: impl Into<FieldId>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            cached: None,
            default: None,
        }
    }

    /// Set the field's kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set whether accepted values are cached.
    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = Some(cached);
        self
    }

    /// Set the field's default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn apply(&mut self, over: FieldOverlay) {
        if over.kind.is_some() {
            self.kind = over.kind;
        }
        if over.cached.is_some() {
            self.cached = over.cached;
        }
        if over.default.is_some() {
            self.default = over.default;
        }
    }

    fn into_spec(self) -> Result<FieldSpec> {
        let invalid = |reason: &str| FormError::InvalidField {
            field: self.id.to_string(),
            reason: reason.to_string(),
        };

        let kind = self.kind.ok_or_else(|| invalid("no kind given"))?;
        let cached = self.cached.unwrap_or(false);
        if cached && !kind.is_required() {
            return Err(invalid("only required fields can be cached"));
        }

        Ok(FieldSpec {
            id: self.id,
            kind,
            cached,
            default: self.default,
        })
    }
}

impl SettingsLayer {
    /// Set the save control.
    pub fn with_save_control(mut self, id: impl Into<String>) -> Self {
        self.save_control = Some(id.into());
        self
    }

    /// Set the emoji allow-list.
    pub fn with_allowed_emojis<I, S>(mut self, emojis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_emojis = Some(emojis.into_iter().map(Into::into).collect());
        self
    }

    /// Add a field entry.
    pub fn with_field(mut self, field: FieldOverlay) -> Self {
        self.fields.push(field);
        self
    }

    /// The first field id this layer lists more than once, if any.
    pub fn duplicate_field(&self) -> Option<&FieldId> {
        let mut seen = BTreeSet::new();
        self.fields
            .iter()
            .map(|field| &field.id)
            .find(|id| !seen.insert(*id))
    }

    /// Lay `over` on top of this layer.
    pub fn merge(&mut self, over: SettingsLayer) {
        if over.save_control.is_some() {
            self.save_control = over.save_control;
        }
        if over.allowed_emojis.is_some() {
            self.allowed_emojis = over.allowed_emojis;
        }
        for field in over.fields {
            match self.fields.iter_mut().find(|known| known.id == field.id) {
                Some(known) => known.apply(field),
                None => self.fields.push(field),
            }
        }
    }

    /// Turn the merged layers into a complete form description.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidField`] for a field with no kind, or a
    /// cached field whose kind is not required.
    pub fn into_settings(self) -> Result<FormSettings> {
        let fields = self
            .fields
            .into_iter()
            .map(FieldOverlay::into_spec)
            .collect::<Result<Vec<_>>>()?;

        Ok(FormSettings {
            save_control: self.save_control.unwrap_or_else(default_save_control),
            allowed_emojis: self.allowed_emojis.unwrap_or_default(),
            fields,
        })
    }
}
