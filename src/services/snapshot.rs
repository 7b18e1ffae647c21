use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::models::Provider;
use super::{ProviderSource, SourceError};

/// Immutable set of providers loaded at one point in time
#[derive(Debug, Clone)]
pub struct ProviderSnapshot {
    pub providers: Vec<Provider>,
    pub loaded_at: DateTime<Utc>,
    pub source: &'static str,
}

impl ProviderSnapshot {
    pub fn new(providers: Vec<Provider>, source: &'static str) -> Self {
        Self {
            providers,
            loaded_at: Utc::now(),
            source,
        }
    }
}

/// Holds the current snapshot and swaps it whole on refresh
///
/// Readers clone the `Arc` and keep matching against that version even if a
/// refresh lands mid-request. The lock only guards the pointer swap.
pub struct SnapshotStore {
    current: RwLock<Arc<ProviderSnapshot>>,
}

impl SnapshotStore {
    pub fn new(snapshot: ProviderSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in effect right now
    pub fn current(&self) -> Arc<ProviderSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Replace the snapshot, returning the previous one
    pub fn swap(&self, snapshot: ProviderSnapshot) -> Arc<ProviderSnapshot> {
        let next = Arc::new(snapshot);
        std::mem::replace(&mut *self.current.write(), next)
    }
}

/// Load a fresh snapshot from the source and swap it in
pub async fn refresh_once(store: &SnapshotStore, source: &ProviderSource) -> Result<usize, SourceError> {
    let providers = source.load().await?;
    let count = providers.len();
    store.swap(ProviderSnapshot::new(providers, source.kind()));
    tracing::info!("Provider snapshot refreshed from {} source ({} providers)", source.kind(), count);
    Ok(count)
}

/// Periodically reload the snapshot in the background
///
/// A failed reload keeps the previous snapshot in place.
pub fn spawn_refresh(
    store: Arc<SnapshotStore>,
    source: Arc<ProviderSource>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick fires immediately; the initial load already happened
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = refresh_once(&store, &source).await {
                tracing::warn!("Provider refresh failed, keeping previous snapshot: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{FileFormat, StaticFileSource};

    fn provider(id: &str) -> Provider {
        Provider {
            id: id.to_string(),
            name: id.to_string(),
            city: String::new(),
            lat: None,
            lng: None,
            rating: 4.0,
            reviews_count: 0,
            services: vec![],
            expertise: vec![],
            availability: vec![],
        }
    }

    #[test]
    fn test_swap_leaves_held_snapshot_untouched() {
        let store = SnapshotStore::new(ProviderSnapshot::new(vec![provider("a")], "static"));

        let held = store.current();
        let previous = store.swap(ProviderSnapshot::new(vec![provider("b"), provider("c")], "static"));

        assert_eq!(held.providers.len(), 1);
        assert!(Arc::ptr_eq(&held, &previous));
        assert_eq!(store.current().providers.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let store = SnapshotStore::new(ProviderSnapshot::new(vec![provider("a")], "static"));
        let source = ProviderSource::Static(StaticFileSource::new(
            "/nonexistent/catalog.json",
            FileFormat::Canonical,
        ));

        assert!(refresh_once(&store, &source).await.is_err());
        assert_eq!(store.current().providers[0].id, "a");
    }

    #[tokio::test]
    async fn test_refresh_records_source_kind() {
        let store = SnapshotStore::new(ProviderSnapshot::new(vec![], "document"));
        let path = format!("{}/sample_data/nurses.json", env!("CARGO_MANIFEST_DIR"));
        let source = ProviderSource::Static(StaticFileSource::new(path, FileFormat::Canonical));

        let count = refresh_once(&store, &source).await.unwrap();
        let current = store.current();
        assert_eq!(current.source, "static");
        assert_eq!(current.providers.len(), count);
    }
}
