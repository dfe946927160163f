//! Shared services used by every validator of one form.

use crate::core::aggregator::{DEFAULT_SAVE_CONTROL, SaveControlAggregator, SaveState};
use crate::core::cache::ValueCache;
use crate::core::registry::ValidationRegistry;
use crate::settings::FormSettings;
use crate::ui::Document;
use std::sync::Arc;
use tokio::sync::watch;

#[cfg(feature = "metrics")]
use crate::metrics::ValidationMetrics;

struct ContextInner {
    document: Arc<dyn Document>,
    registry: ValidationRegistry,
    cache: ValueCache,
    aggregator: SaveControlAggregator,
    #[cfg(feature = "metrics")]
    metrics: Option<ValidationMetrics>,
}

/// The registry, value cache and save-control aggregator of one form.
///
/// Cloning is cheap and every clone shares the same state. Validators built
/// from different contexts never see each other's fields.
///
/// # Examples
///
/// ```rust
/// use formgate::prelude::*;
/// use formgate::ui::memory::MemoryDocument;
/// use std::sync::Arc;
///
/// let document = Arc::new(MemoryDocument::new().with_save_control("save-button", "Save"));
/// let context = ValidationContext::new(document);
///
/// assert_eq!(context.save_state(), SaveState::Ready);
/// ```
#[derive(Clone)]
pub struct ValidationContext {
    inner: Arc<ContextInner>,
}

impl ValidationContext {
    /// Create a context driving the default save control.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self::builder(document).build()
    }

    /// Create a context driving the save control named by `settings`.
    pub fn for_settings(document: Arc<dyn Document>, settings: &FormSettings) -> Self {
        Self::builder(document)
            .with_save_control(settings.save_control.as_str())
            .build()
    }

    /// Create a builder for a context.
    pub fn builder(document: Arc<dyn Document>) -> ValidationContextBuilder {
        ValidationContextBuilder::new(document)
    }

    /// The host document.
    pub fn document(&self) -> &Arc<dyn Document> {
        &self.inner.document
    }

    /// The validating/invalid field registry.
    pub fn registry(&self) -> &ValidationRegistry {
        &self.inner.registry
    }

    /// The last accepted values of cached fields.
    pub fn cache(&self) -> &ValueCache {
        &self.inner.cache
    }

    /// The save-control aggregator.
    pub fn aggregator(&self) -> &SaveControlAggregator {
        &self.inner.aggregator
    }

    /// Recompute and apply the save control's state.
    pub fn refresh(&self) -> SaveState {
        self.inner.aggregator.refresh(&self.inner.registry)
    }

    /// The most recently applied save state.
    pub fn save_state(&self) -> SaveState {
        self.inner.aggregator.state()
    }

    /// Watch every save state applied by this context.
    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.inner.aggregator.subscribe()
    }

    #[cfg(feature = "metrics")]
    pub(crate) fn metrics(&self) -> Option<&ValidationMetrics> {
        self.inner.metrics.as_ref()
    }
}

/// Builder for a [`ValidationContext`].
pub struct ValidationContextBuilder {
    document: Arc<dyn Document>,
    save_control: String,
    #[cfg(feature = "metrics")]
    metrics: Option<ValidationMetrics>,
}

impl ValidationContextBuilder {
    fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            save_control: DEFAULT_SAVE_CONTROL.to_string(),
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Drive the save control with `id` instead of the default one.
    pub fn with_save_control(mut self, id: impl Into<String>) -> Self {
        self.save_control = id.into();
        self
    }

    /// Record validation metrics.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: ValidationMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the context.
    pub fn build(self) -> ValidationContext {
        let aggregator = SaveControlAggregator::new(Arc::clone(&self.document), self.save_control);
        ValidationContext {
            inner: Arc::new(ContextInner {
                document: self.document,
                registry: ValidationRegistry::new(),
                cache: ValueCache::new(),
                aggregator,
                #[cfg(feature = "metrics")]
                metrics: self.metrics,
            }),
        }
    }
}
