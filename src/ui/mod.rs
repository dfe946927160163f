//! Host UI seams.
//!
//! The validation engine never touches a concrete widget toolkit. A host
//! supplies a [`Document`] that resolves field elements and the save control.

pub mod memory;

use crate::core::FieldId;
use std::sync::Arc;

/// The element bound to one form field.
pub trait FieldElement: Send + Sync {
    /// Insert or replace the inline status text beside the field.
    fn show_status(&self, text: &str);

    /// Remove the inline status text, if present.
    fn clear_status(&self);

    /// Insert or replace the inline error text beside the field.
    fn show_error(&self, text: &str);

    /// Remove the inline error text, if present.
    fn clear_error(&self);

    /// Add or remove the "invalid input" marker on the field.
    fn set_invalid_marker(&self, invalid: bool);
}

/// The single control that saves the form.
pub trait SaveControl: Send + Sync {
    /// Prevent the user from saving.
    fn disable(&self);

    /// Allow the user to save.
    fn enable(&self);

    /// Replace the control's label.
    fn set_label(&self, text: &str);

    /// Restore the control's original label.
    fn reset_label(&self);

    /// Mark the control as being in a negative state.
    fn add_negative_marker(&self);

    /// Clear the negative marking.
    fn remove_negative_marker(&self);
}

/// Resolves UI handles by id.
pub trait Document: Send + Sync {
    /// The element bound to `field`, if it exists.
    fn field(&self, field: &FieldId) -> Option<Arc<dyn FieldElement>>;

    /// The save control with `id`, if it exists.
    fn save_control(&self, id: &str) -> Option<Arc<dyn SaveControl>>;
}
