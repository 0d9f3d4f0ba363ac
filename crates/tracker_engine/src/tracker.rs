use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracker_core::TabEvent;

use crate::{
    BadgeMonitor, BadgeSurface, EditorSurface, ListManager, ListSurface, LocalStore,
    StatusEditor, StatusStore, StoreError, TabSource, TrackerConfig,
};

/// Wires one shared status store and the browser to the three observers.
///
/// The observers never talk to each other; each one learns about the others'
/// writes only through the store's change notifications.
pub struct Tracker {
    config: TrackerConfig,
    store: Arc<dyn StatusStore>,
    tabs: Arc<dyn TabSource>,
    shutdown: CancellationToken,
}

impl Tracker {
    /// Opens the store named by the config (in memory when no path is set).
    pub fn open(config: TrackerConfig, tabs: Arc<dyn TabSource>) -> Result<Self, StoreError> {
        let store: Arc<dyn StatusStore> = match &config.store_path {
            Some(path) => Arc::new(LocalStore::open(path.clone())?),
            None => Arc::new(LocalStore::in_memory()),
        };
        Ok(Self::with_store(config, store, tabs))
    }

    pub fn with_store(
        config: TrackerConfig,
        store: Arc<dyn StatusStore>,
        tabs: Arc<dyn TabSource>,
    ) -> Self {
        Self {
            config,
            store,
            tabs,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn StatusStore> {
        self.store.clone()
    }

    pub fn badge_monitor(&self, surface: Arc<dyn BadgeSurface>) -> BadgeMonitor {
        BadgeMonitor::new(
            self.config.monitor_state(),
            self.store.clone(),
            self.tabs.clone(),
            surface,
        )
    }

    /// Starts the badge monitor on the current tokio runtime.
    pub fn spawn_badge_monitor(
        &self,
        surface: Arc<dyn BadgeSurface>,
        tab_events: mpsc::UnboundedReceiver<TabEvent>,
    ) -> JoinHandle<()> {
        let monitor = self.badge_monitor(surface);
        tokio::spawn(monitor.run(tab_events, self.shutdown.child_token()))
    }

    pub fn status_editor(&self, surface: Arc<dyn EditorSurface>) -> StatusEditor {
        StatusEditor::new(self.store.clone(), self.tabs.clone(), surface)
    }

    pub fn list_manager(&self, surface: Arc<dyn ListSurface>) -> ListManager {
        ListManager::new(self.store.clone(), surface)
    }

    /// Token that observer loops started by the caller can share with the tracker.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Stops every observer loop between inputs.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
