//! Settings files.

use super::SettingsSource;
use crate::error::{FormError, Result};
use crate::settings::{FieldOverlay, SettingsLayer};
use config::File;
use serde::Deserialize;
use std::path::PathBuf;

/// A form settings document in a YAML, TOML or JSON file.
///
/// The format is picked from the extension (`.yaml`, `.yml`, `.toml`,
/// `.json`). Field entries are read one at a time so a malformed entry is
/// reported with its id, or with its position when it has none.
///
/// # Examples
///
/// ```rust,no_run
/// use formgate::sources::{FileSource, SettingsSource};
///
/// let layer = FileSource::new("settings/form.yaml").load()?;
/// # Ok::<(), formgate::error::FormError>(())
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
}

/// The top level of a settings file, with field entries left unparsed.
#[derive(Deserialize)]
struct RawDocument {
    save_control: Option<String>,
    allowed_emojis: Option<Vec<String>>,
    #[serde(default)]
    fields: Vec<config::Value>,
}

impl FileSource {
    /// Read settings from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
        }
    }

    /// Set the merge priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn check_extension(&self) -> Result<()> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml" | "toml" | "json") => Ok(()),
            Some(extension) => Err(FormError::LoadError(format!(
                "Unsupported settings file extension: {extension}"
            ))),
            None => Err(FormError::LoadError(format!(
                "Unable to determine settings file format for: {}",
                self.path.display()
            ))),
        }
    }

    fn field(&self, position: usize, entry: config::Value) -> Result<FieldOverlay> {
        let label = entry_id(&entry).unwrap_or_else(|| format!("#{}", position + 1));
        entry.try_deserialize().map_err(|e| FormError::InvalidField {
            field: label,
            reason: format!("{e} in {}", self.path.display()),
        })
    }
}

fn entry_id(entry: &config::Value) -> Option<String> {
    let table = entry.clone().into_table().ok()?;
    table.get("id")?.clone().into_string().ok()
}

impl SettingsSource for FileSource {
    fn load(&self) -> Result<SettingsLayer> {
        self.check_extension()?;

        if !self.path.exists() {
            return Err(FormError::LoadError(format!(
                "Settings file not found: {}",
                self.path.display()
            )));
        }

        let document = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| {
                FormError::LoadError(format!("Failed to read {}: {e}", self.path.display()))
            })?;

        let raw: RawDocument = document.try_deserialize().map_err(|e| {
            FormError::DeserializationError(format!("{}: {e}", self.path.display()))
        })?;

        let fields = raw
            .fields
            .into_iter()
            .enumerate()
            .map(|(position, entry)| self.field(position, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(SettingsLayer {
            save_control: raw.save_control,
            allowed_emojis: raw.allowed_emojis,
            fields,
        })
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
