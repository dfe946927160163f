//! Derives the save control's state from the validation registry.

use crate::core::registry::{RegistrySnapshot, ValidationRegistry};
use crate::ui::{Document, SaveControl};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tracing::{debug, trace};

/// Default id of the save control.
pub const DEFAULT_SAVE_CONTROL: &str = "save-button";

/// The aggregate state of a form, as shown on its save control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Every field is valid and nothing is validating.
    Ready,
    /// No field is invalid but some are still validating.
    Pending {
        /// Number of fields validating
        validating: usize,
    },
    /// At least one field is invalid.
    Blocked {
        /// Number of invalid fields
        invalid: usize,
    },
}

impl SaveState {
    /// Derive the state from registry counts.
    ///
    /// Invalid fields take precedence over validating ones.
    pub fn derive(snapshot: RegistrySnapshot) -> Self {
        if snapshot.invalid > 0 {
            Self::Blocked {
                invalid: snapshot.invalid,
            }
        } else if snapshot.validating > 0 {
            Self::Pending {
                validating: snapshot.validating,
            }
        } else {
            Self::Ready
        }
    }

    /// The label shown on the control, or `None` for its default label.
    pub fn label(&self) -> Option<String> {
        match *self {
            Self::Ready => None,
            Self::Pending { validating } => {
                Some(format!("Validating {validating} input{}...", plural(validating)))
            }
            Self::Blocked { invalid } => {
                Some(format!("{invalid} invalid input{}!", plural(invalid)))
            }
        }
    }

    /// Whether the form may be saved.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

fn plural(count: usize) -> &'static str {
    if count > 1 { "s" } else { "" }
}

/// Pushes the aggregate state to the form's save control.
///
/// The control is looked up on first use and kept once found. When the
/// document has no such control every update is a no-op; the derived state is
/// still tracked and published to subscribers.
pub struct SaveControlAggregator {
    document: Arc<dyn Document>,
    control_id: String,
    control: OnceLock<Arc<dyn SaveControl>>,
    reported_missing: AtomicBool,
    state: watch::Sender<SaveState>,
}

impl SaveControlAggregator {
    /// Create an aggregator for the control with `control_id`.
    pub fn new(document: Arc<dyn Document>, control_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SaveState::Ready);
        Self {
            document,
            control_id: control_id.into(),
            control: OnceLock::new(),
            reported_missing: AtomicBool::new(false),
            state,
        }
    }

    /// The id of the control this aggregator drives.
    pub fn control_id(&self) -> &str {
        &self.control_id
    }

    /// Recompute the state from `registry` and apply it.
    pub fn refresh(&self, registry: &ValidationRegistry) -> SaveState {
        let state = SaveState::derive(registry.snapshot());
        trace!(control = %self.control_id, ?state, "refreshing save control");

        if let Some(control) = self.control() {
            apply(control.as_ref(), state);
        }

        self.state.send_replace(state);
        state
    }

    /// The most recently applied state.
    pub fn state(&self) -> SaveState {
        *self.state.borrow()
    }

    /// Watch every state the aggregator applies.
    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.state.subscribe()
    }

    fn control(&self) -> Option<&Arc<dyn SaveControl>> {
        if let Some(control) = self.control.get() {
            return Some(control);
        }

        match self.document.save_control(&self.control_id) {
            Some(control) => Some(self.control.get_or_init(|| control)),
            None => {
                if !self.reported_missing.swap(true, Ordering::Relaxed) {
                    debug!(control = %self.control_id, "save control not found, skipping updates");
                }
                None
            }
        }
    }
}

fn apply(control: &dyn SaveControl, state: SaveState) {
    match state {
        SaveState::Blocked { .. } | SaveState::Pending { .. } => {
            if let Some(label) = state.label() {
                control.set_label(&label);
            }
            control.disable();
            if matches!(state, SaveState::Blocked { .. }) {
                control.add_negative_marker();
            } else {
                control.remove_negative_marker();
            }
        }
        SaveState::Ready => {
            control.reset_label();
            control.enable();
            control.remove_negative_marker();
        }
    }
}
