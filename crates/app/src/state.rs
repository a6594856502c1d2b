use std::sync::Arc;

use store::{DocumentStore, MemStore};

use crate::actions::Actions;
use crate::generate::{ContentGenerator, OfflineGenerator};
use crate::invalidate::{CacheInvalidator, LoggingInvalidator};
use crate::upload::{ImageUploader, OfflineUploader};

/// Shared per-process state. Everything behind an `Arc` so axum can clone
/// it per request cheaply.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub actions: Actions,
    pub generator: Arc<dyn ContentGenerator>,
    pub uploader: Arc<dyn ImageUploader>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        invalidator: Arc<dyn CacheInvalidator>,
        generator: Arc<dyn ContentGenerator>,
        uploader: Arc<dyn ImageUploader>,
    ) -> Self {
        let actions = Actions::new(store.clone(), invalidator);
        Self {
            store,
            actions,
            generator,
            uploader,
        }
    }

    /// In-memory wiring: the reference store, log-only invalidation, and
    /// offline external services. What the binary runs with until a real
    /// backend is configured.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemStore::new()),
            Arc::new(LoggingInvalidator),
            Arc::new(OfflineGenerator),
            Arc::new(OfflineUploader),
        )
    }
}
