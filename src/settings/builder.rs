//! Builder for loading FormSettings documents.

use crate::error::Result;
use crate::settings::{FormSettings, SettingsLoader};
use crate::sources::{FileSource, SettingsSource};
use std::path::PathBuf;
use tracing::trace;

/// Builder for loading [`FormSettings`].
///
/// # Examples
///
/// ```rust,no_run
/// use formgate::prelude::*;
///
/// # fn example() -> Result<()> {
/// let settings = FormSettings::builder()
///     .with_file("settings/form.yaml")
///     .with_file("settings/local.yaml")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SettingsBuilder {
    file_paths: Vec<PathBuf>,
    custom_sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            custom_sources: Vec::new(),
        }
    }

    /// Add a file source with automatic format detection.
    ///
    /// Supported formats: YAML (.yaml, .yml), TOML (.toml), JSON (.json)
    ///
    /// Later files are merged over earlier ones, field by field.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add a custom settings source, merged according to its priority.
    pub fn with_source<S: SettingsSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Load the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source was added, or a source cannot be read
    /// - One source lists a field id twice
    /// - A field has no kind, an unknown kind, or is cached but not required
    pub fn build(self) -> Result<FormSettings> {
        let mut loader = SettingsLoader::new();

        // Add file sources with increasing priority
        for (index, path) in self.file_paths.iter().enumerate() {
            let priority = 100 + (index as i32 * 10); // 100, 110, 120, etc.
            loader.add_source(Box::new(FileSource::new(path).with_priority(priority)));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        trace!(sources = ?loader.source_names(), "loading form settings");
        loader.load()
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
