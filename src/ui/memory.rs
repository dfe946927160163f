//! In-memory UI for headless hosts and tests.

use super::{Document, FieldElement, SaveControl};
use crate::core::FieldId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
struct FieldState {
    status: Option<String>,
    error: Option<String>,
    invalid: bool,
}

/// A field element that records what would be displayed.
#[derive(Debug, Default)]
pub struct MemoryField {
    state: Mutex<FieldState>,
}

impl MemoryField {
    /// Create a field with nothing displayed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The inline status text currently shown.
    pub fn status(&self) -> Option<String> {
        self.state.lock().status.clone()
    }

    /// The inline error text currently shown.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Whether the invalid marker is set.
    pub fn is_marked_invalid(&self) -> bool {
        self.state.lock().invalid
    }
}

impl FieldElement for MemoryField {
    fn show_status(&self, text: &str) {
        self.state.lock().status = Some(text.to_string());
    }

    fn clear_status(&self) {
        self.state.lock().status = None;
    }

    fn show_error(&self, text: &str) {
        self.state.lock().error = Some(text.to_string());
    }

    fn clear_error(&self) {
        self.state.lock().error = None;
    }

    fn set_invalid_marker(&self, invalid: bool) {
        self.state.lock().invalid = invalid;
    }
}

#[derive(Debug, Clone)]
struct ControlState {
    label: String,
    enabled: bool,
    negative: bool,
}

/// A save control that records its label and flags.
#[derive(Debug)]
pub struct MemorySaveControl {
    default_label: String,
    state: Mutex<ControlState>,
}

impl MemorySaveControl {
    /// Create an enabled control showing `default_label`.
    pub fn new(default_label: impl Into<String>) -> Self {
        let default_label = default_label.into();
        Self {
            state: Mutex::new(ControlState {
                label: default_label.clone(),
                enabled: true,
                negative: false,
            }),
            default_label,
        }
    }

    /// The current label.
    pub fn label(&self) -> String {
        self.state.lock().label.clone()
    }

    /// Whether the control is enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Whether the negative marker is set.
    pub fn is_negative(&self) -> bool {
        self.state.lock().negative
    }
}

impl SaveControl for MemorySaveControl {
    fn disable(&self) {
        self.state.lock().enabled = false;
    }

    fn enable(&self) {
        self.state.lock().enabled = true;
    }

    fn set_label(&self, text: &str) {
        self.state.lock().label = text.to_string();
    }

    fn reset_label(&self) {
        self.state.lock().label = self.default_label.clone();
    }

    fn add_negative_marker(&self) {
        self.state.lock().negative = true;
    }

    fn remove_negative_marker(&self) {
        self.state.lock().negative = false;
    }
}

/// A document holding [`MemoryField`]s and [`MemorySaveControl`]s.
///
/// # Examples
///
/// ```rust
/// use formgate::ui::memory::MemoryDocument;
///
/// let document = MemoryDocument::new()
///     .with_field("timezone")
///     .with_save_control("save-button", "Save");
///
/// assert!(document.memory_field("timezone").is_some());
/// ```
#[derive(Default)]
pub struct MemoryDocument {
    fields: RwLock<HashMap<FieldId, Arc<MemoryField>>>,
    controls: RwLock<HashMap<String, Arc<MemorySaveControl>>>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field element.
    pub fn with_field(self, field: impl Into<FieldId>) -> Self {
        self.add_field(field);
        self
    }

    /// Add a save control.
    pub fn with_save_control(self, id: impl Into<String>, default_label: &str) -> Self {
        self.add_save_control(id, default_label);
        self
    }

    /// Add a field element, returning it.
    pub fn add_field(&self, field: impl Into<FieldId>) -> Arc<MemoryField> {
        let element = Arc::new(MemoryField::new());
        self.fields.write().insert(field.into(), Arc::clone(&element));
        element
    }

    /// Add a save control, returning it.
    pub fn add_save_control(
        &self,
        id: impl Into<String>,
        default_label: &str,
    ) -> Arc<MemorySaveControl> {
        let control = Arc::new(MemorySaveControl::new(default_label));
        self.controls.write().insert(id.into(), Arc::clone(&control));
        control
    }

    /// The concrete element for `field`.
    pub fn memory_field(&self, field: impl Into<FieldId>) -> Option<Arc<MemoryField>> {
        let field: FieldId = field.into();
        self.fields.read().get(&field).cloned()
    }

    /// The concrete save control with `id`.
    pub fn memory_save_control(&self, id: &str) -> Option<Arc<MemorySaveControl>> {
        self.controls.read().get(id).cloned()
    }
}

impl Document for MemoryDocument {
    fn field(&self, field: &FieldId) -> Option<Arc<dyn FieldElement>> {
        self.fields
            .read()
            .get(field)
            .map(|element| Arc::clone(element) as Arc<dyn FieldElement>)
    }

    fn save_control(&self, id: &str) -> Option<Arc<dyn SaveControl>> {
        self.controls
            .read()
            .get(id)
            .map(|control| Arc::clone(control) as Arc<dyn SaveControl>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_records_display() {
        let field = MemoryField::new();
        field.show_error("bad");
        field.set_invalid_marker(true);
        assert_eq!(field.error().as_deref(), Some("bad"));
        assert!(field.is_marked_invalid());

        field.clear_error();
        field.set_invalid_marker(false);
        assert_eq!(field.error(), None);
        assert!(!field.is_marked_invalid());
    }

    #[test]
    fn test_control_reset_label() {
        let control = MemorySaveControl::new("Save");
        control.set_label("1 invalid input!");
        control.disable();
        assert_eq!(control.label(), "1 invalid input!");
        assert!(!control.is_enabled());

        control.reset_label();
        assert_eq!(control.label(), "Save");
    }

    #[test]
    fn test_document_lookup() {
        let document = MemoryDocument::new().with_field("a");
        assert!(document.field(&FieldId::from("a")).is_some());
        assert!(document.field(&FieldId::from("b")).is_none());
        assert!(document.save_control("save-button").is_none());
    }
}
