use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracker_core::{update_monitor, MonitorEffect, MonitorMsg, MonitorState, TabEvent};
use tracker_logging::{tracker_debug, tracker_error, tracker_info, tracker_trace, tracker_warn};

use crate::{apply_badge, BadgeSurface, StatusStore, StoreChange, TabSource};

/// Keeps the toolbar badge in line with the stored status of the relevant tab.
pub struct BadgeMonitor {
    state: MonitorState,
    store: Arc<dyn StatusStore>,
    tabs: Arc<dyn TabSource>,
    surface: Arc<dyn BadgeSurface>,
    changes: broadcast::Receiver<StoreChange>,
}

impl BadgeMonitor {
    /// Subscribes to the store immediately, so changes made after construction are seen by `run`.
    pub fn new(
        state: MonitorState,
        store: Arc<dyn StatusStore>,
        tabs: Arc<dyn TabSource>,
        surface: Arc<dyn BadgeSurface>,
    ) -> Self {
        let changes = store.subscribe();
        Self {
            state,
            store,
            tabs,
            surface,
            changes,
        }
    }

    /// Applies a message and every effect it leads to before returning.
    pub async fn dispatch(&mut self, msg: MonitorMsg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            tracker_trace!("Badge monitor handling {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update_monitor(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(next) = self.run_effect(effect).await {
                    inbox.push_back(next);
                }
            }
        }
    }

    async fn run_effect(&self, effect: MonitorEffect) -> Option<MonitorMsg> {
        match effect {
            MonitorEffect::ResolveTab { tab_id } => match self.tabs.get(tab_id).await {
                Ok(tab) => Some(MonitorMsg::TabResolved {
                    tab_id,
                    url: tab.url,
                }),
                Err(err) => {
                    tracker_error!("Error updating badge for tab {}: {}", tab_id, err);
                    None
                }
            },
            MonitorEffect::ResolveActiveTab => match self.tabs.active_tab().await {
                Ok(tab) => Some(MonitorMsg::ActiveTabResolved(tab.map(|tab| tab.id))),
                Err(err) => {
                    tracker_error!("Error resolving active tab: {}", err);
                    None
                }
            },
            MonitorEffect::LookupStatus { tab_id, address } => {
                match self.store.status_of(&address).await {
                    Ok(status) => Some(MonitorMsg::StatusLoaded { tab_id, status }),
                    Err(err) => {
                        tracker_error!("Error updating badge for tab {}: {}", tab_id, err);
                        None
                    }
                }
            }
            MonitorEffect::SetBadge { tab_id, badge } => {
                tracker_debug!("Badge for tab {} set to {:?}", tab_id, badge.text);
                apply_badge(self.surface.as_ref(), tab_id, &badge);
                None
            }
        }
    }

    /// Processes tab events and store changes one at a time until shutdown
    /// or until either source closes.
    pub async fn run(
        mut self,
        mut tab_events: mpsc::UnboundedReceiver<TabEvent>,
        shutdown: CancellationToken,
    ) {
        tracker_info!("Page status tracker installed");
        loop {
            let msg = tokio::select! {
                _ = shutdown.cancelled() => break,
                event = tab_events.recv() => match event {
                    Some(event) => MonitorMsg::Tab(event),
                    None => break,
                },
                change = self.changes.recv() => match change {
                    Ok(_) => MonitorMsg::StoreChanged,
                    Err(RecvError::Lagged(skipped)) => {
                        tracker_warn!("Badge monitor skipped {} store changes", skipped);
                        self.changes = self.changes.resubscribe();
                        MonitorMsg::StoreChanged
                    }
                    Err(RecvError::Closed) => break,
                },
            };
            self.dispatch(msg).await;
        }
        tracker_debug!("Badge monitor stopped");
    }
}
