//! Where form settings come from.

mod file;

pub use file::FileSource;

use crate::error::Result;
use crate::settings::SettingsLayer;

/// A provider of part of a form description.
///
/// Implement this to supply settings from somewhere other than a file, such
/// as a table compiled into the host or a store of per-user defaults.
pub trait SettingsSource: Send + Sync {
    /// Read this source's layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or a field entry is
    /// malformed.
    fn load(&self) -> Result<SettingsLayer>;

    /// A human-readable name for logs.
    fn name(&self) -> String;

    /// Merge order; higher priorities are merged later and win.
    ///
    /// Files added to a [`SettingsBuilder`](crate::settings::SettingsBuilder)
    /// get 100, 110, 120, ... in the order they were added.
    fn priority(&self) -> i32 {
        100
    }
}
