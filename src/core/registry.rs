//! Tracking of fields that are mid-validation or invalid.

use crate::core::input::FieldId;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Marks one in-flight validation of a field.
///
/// Returned by [`ValidationRegistry::begin`] and handed back to
/// [`ValidationRegistry::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    field: FieldId,
    generation: u64,
}

impl Ticket {
    /// The field being validated.
    pub fn field(&self) -> &FieldId {
        &self.field
    }
}

/// Counts taken from the registry at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    /// Number of distinct fields with at least one validation in flight.
    pub validating: usize,
    /// Number of fields whose latest completed validation was rejected.
    pub invalid: usize,
}

#[derive(Default)]
struct RegistryInner {
    /// In-flight validation count per field.
    validating: HashMap<FieldId, usize>,
    invalid: HashSet<FieldId>,
    /// Generation of the most recently started validation per field.
    latest: HashMap<FieldId, u64>,
    next_generation: u64,
}

/// The set of fields currently validating and the set currently invalid.
///
/// One registry is shared by every validator of a form through a
/// [`ValidationContext`](crate::core::ValidationContext). Separate registries
/// never observe each other.
///
/// Overlapping validations of the same field are counted, so a field leaves
/// the validating set only when its last in-flight call finishes. Each call
/// gets a generation; only the newest call for a field may report its result.
#[derive(Default)]
pub struct ValidationRegistry {
    inner: Mutex<RegistryInner>,
}

impl ValidationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a validation of `field` as started.
    pub fn begin(&self, field: &FieldId) -> Ticket {
        let mut inner = self.inner.lock();
        let generation = inner.next_generation;
        inner.next_generation += 1;
        *inner.validating.entry(field.clone()).or_insert(0) += 1;
        inner.latest.insert(field.clone(), generation);

        Ticket {
            field: field.clone(),
            generation,
        }
    }

    /// Mark a validation as finished.
    ///
    /// Returns `true` when no newer validation of the same field has started
    /// since this ticket was issued.
    pub fn finish(&self, ticket: &Ticket) -> bool {
        let mut inner = self.inner.lock();
        if let Some(count) = inner.validating.get_mut(&ticket.field) {
            *count -= 1;
            if *count == 0 {
                inner.validating.remove(&ticket.field);
            }
        }
        inner.latest.get(&ticket.field) == Some(&ticket.generation)
    }

    /// Record that the latest validation of `field` was rejected.
    pub fn mark_invalid(&self, field: &FieldId) {
        self.inner.lock().invalid.insert(field.clone());
    }

    /// Record that `field` is no longer invalid.
    pub fn clear_invalid(&self, field: &FieldId) {
        self.inner.lock().invalid.remove(field);
    }

    /// Whether `field` has a validation in flight.
    pub fn is_validating(&self, field: &FieldId) -> bool {
        self.inner.lock().validating.contains_key(field)
    }

    /// Whether `field` is currently invalid.
    pub fn is_invalid(&self, field: &FieldId) -> bool {
        self.inner.lock().invalid.contains(field)
    }

    /// Number of fields with a validation in flight.
    pub fn count_validating(&self) -> usize {
        self.inner.lock().validating.len()
    }

    /// Number of invalid fields.
    pub fn count_invalid(&self) -> usize {
        self.inner.lock().invalid.len()
    }

    /// Both counts, read under one lock.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let inner = self.inner.lock();
        RegistrySnapshot {
            validating: inner.validating.len(),
            invalid: inner.invalid.len(),
        }
    }

    /// The invalid fields, sorted.
    pub fn invalid_fields(&self) -> Vec<FieldId> {
        let mut fields: Vec<_> = self.inner.lock().invalid.iter().cloned().collect();
        fields.sort();
        fields
    }
}
