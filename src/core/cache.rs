//! Last accepted values of cached required fields.

use crate::core::input::FieldId;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps each cached field to the last non-empty value it accepted.
///
/// Reads are lock-free snapshots via `arc-swap`; writes replace the map
/// atomically. Entries are only ever added or overwritten.
pub struct ValueCache {
    values: ArcSwap<HashMap<FieldId, String>>,
}

impl ValueCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            values: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Store `value` as the last accepted value of `field`.
    pub fn store(&self, field: &FieldId, value: &str) {
        self.values.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(field.clone(), value.to_string());
            next
        });
    }

    /// The last accepted value of `field`, if any.
    pub fn get(&self, field: &FieldId) -> Option<String> {
        self.values.load().get(field).cloned()
    }

    /// A snapshot of every cached value.
    pub fn snapshot(&self) -> Arc<HashMap<FieldId, String>> {
        self.values.load_full()
    }
}

impl Default for ValueCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_overwrite() {
        let cache = ValueCache::new();
        let field = FieldId::from("notion-key");
        assert_eq!(cache.get(&field), None);

        cache.store(&field, "secret_a");
        assert_eq!(cache.get(&field), Some("secret_a".to_string()));

        cache.store(&field, "secret_b");
        assert_eq!(cache.get(&field), Some("secret_b".to_string()));
    }

    #[test]
    fn test_snapshot_is_stable() {
        let cache = ValueCache::new();
        let field = FieldId::from("database-id");
        cache.store(&field, "one");

        let before = cache.snapshot();
        cache.store(&field, "two");

        assert_eq!(before.get(&field).map(String::as_str), Some("one"));
        assert_eq!(cache.snapshot().len(), 1);
    }
}
