//! Settings loader that merges the layers of every source.

use crate::error::{FormError, Result};
use crate::settings::{FormSettings, SettingsLayer};
use crate::sources::SettingsSource;
use tracing::{trace, warn};

/// Loads one layer per source and merges them into a [`FormSettings`].
///
/// Sources are merged from lowest to highest priority. Sources with equal
/// priority are merged in the order they were added.
pub(crate) struct SettingsLoader {
    sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn add_source(&mut self, source: Box<dyn SettingsSource>) {
        self.sources.push(source);
    }

    /// Load and merge every source.
    ///
    /// # Errors
    ///
    /// Returns an error if no source was added, a source cannot be read, one
    /// source lists a field twice, or a merged field is unusable.
    pub fn load(&self) -> Result<FormSettings> {
        if self.sources.is_empty() {
            return Err(FormError::LoadError("No settings sources specified".to_string()));
        }

        let mut merged = SettingsLayer::default();
        for source in self.sorted_sources() {
            let layer = source.load()?;
            if let Some(duplicate) = layer.duplicate_field() {
                warn!(source = %source.name(), field = %duplicate, "field listed twice");
                return Err(FormError::DuplicateField(duplicate.clone()));
            }

            trace!(
                source = %source.name(),
                priority = source.priority(),
                fields = layer.fields.len(),
                "merging settings layer"
            );
            merged.merge(layer);
        }

        merged.into_settings()
    }

    /// Source names in merge order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted_sources().iter().map(|s| s.name()).collect()
    }

    fn sorted_sources(&self) -> Vec<&dyn SettingsSource> {
        let mut sorted: Vec<&dyn SettingsSource> =
            self.sources.iter().map(|s| s.as_ref()).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }
}
