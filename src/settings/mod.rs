//! Declarative form settings.
//!
//! A settings document names the save control, the emoji allow-list and every
//! field with its kind and default value. [`SettingsBuilder`] loads one
//! [`SettingsLayer`] per file or custom source and merges them, so a local file
//! can change a single field's default without restating the form.
//!
//! ```yaml
//! save_control: save-button
//! allowed_emojis: ["📚", "🧪"]
//! fields:
//!   - id: timezone
//!     kind: time-zone
//!     default: Pacific/Auckland
//!   - id: notion-key
//!     kind: required-string
//!     cached: true
//! ```

mod builder;
mod layer;
mod loader;

pub use builder::SettingsBuilder;
pub use layer::{FieldOverlay, SettingsLayer};
pub(crate) use loader::SettingsLoader;

use crate::core::{DEFAULT_SAVE_CONTROL, FieldId, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Optional text.
    String,
    /// Non-empty text.
    RequiredString,
    /// Non-empty numeric text.
    RequiredNumber,
    /// A JSON object of strings.
    JsonStringObject,
    /// A JSON object of allowed emoji.
    JsonEmojiObject,
    /// An optional IANA time-zone name.
    TimeZone,
}

impl FieldKind {
    /// Whether empty input is rejected.
    pub fn is_required(self) -> bool {
        matches!(self, Self::RequiredString | Self::RequiredNumber)
    }
}

/// One field of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The field's id, also the id of its element.
    pub id: FieldId,
    /// What the field holds.
    pub kind: FieldKind,
    /// Keep the last accepted value in the value cache. Only required kinds
    /// may be cached when settings are loaded from sources.
    #[serde(default)]
    pub cached: bool,
    /// The value used when nothing has been saved yet.
    #[serde(default)]
    pub default: Option<String>,
}

impl FieldSpec {
    /// Create a field spec without a default.
    pub fn new(id: impl Into<FieldId>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
            cached: false,
            default: None,
        }
    }

    /// Cache accepted values of this field.
    pub fn cached(mut self) -> Self {
        self.cached = true;
        self
    }

    /// Set the field's default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The rule validating this field.
    pub fn rule(&self, allowed_emojis: &BTreeSet<String>) -> Rule {
        let rule = match self.kind {
            FieldKind::String => Rule::string(),
            FieldKind::RequiredString => Rule::required_string(),
            FieldKind::RequiredNumber => Rule::required_number(),
            FieldKind::JsonStringObject => Rule::json_string_object(),
            FieldKind::JsonEmojiObject => Rule::json_emoji_object(allowed_emojis.clone()),
            FieldKind::TimeZone => Rule::time_zone(),
        };
        if self.cached { rule.cached() } else { rule }
    }
}

/// A complete form description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    /// Id of the save control.
    #[serde(default = "default_save_control")]
    pub save_control: String,
    /// Tokens accepted as values of emoji object fields.
    #[serde(default)]
    pub allowed_emojis: Vec<String>,
    /// The form's fields, in display order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_save_control() -> String {
    DEFAULT_SAVE_CONTROL.to_string()
}

impl FormSettings {
    /// Create a new builder for loading settings.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the emoji allow-list.
    pub fn with_allowed_emojis<I, S>(mut self, emojis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_emojis = emojis.into_iter().map(Into::into).collect();
        self
    }

    /// The emoji allow-list as a set.
    pub fn emoji_set(&self) -> BTreeSet<String> {
        self.allowed_emojis.iter().cloned().collect()
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            save_control: default_save_control(),
            allowed_emojis: Vec::new(),
            fields: Vec::new(),
        }
    }
}
