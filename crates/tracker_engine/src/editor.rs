use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracker_core::{update_editor, EditorEffect, EditorMsg, EditorState, EditorView, Status};
use tracker_logging::{tracker_error, tracker_trace, tracker_warn};

use crate::{EditorSurface, StatusStore, StoreChange, Tab, TabSource};

/// Popup editor for the status of the active tab's address.
pub struct StatusEditor {
    state: EditorState,
    store: Arc<dyn StatusStore>,
    tabs: Arc<dyn TabSource>,
    surface: Arc<dyn EditorSurface>,
    changes: broadcast::Receiver<StoreChange>,
}

impl StatusEditor {
    pub fn new(
        store: Arc<dyn StatusStore>,
        tabs: Arc<dyn TabSource>,
        surface: Arc<dyn EditorSurface>,
    ) -> Self {
        let changes = store.subscribe();
        Self {
            state: EditorState::new(),
            store,
            tabs,
            surface,
            changes,
        }
    }

    pub fn view(&self) -> EditorView {
        self.state.view()
    }

    pub async fn open(&mut self) {
        self.dispatch(EditorMsg::Opened).await;
    }

    pub async fn select(&mut self, status: Status) {
        self.dispatch(EditorMsg::StatusSelected(status)).await;
    }

    /// Applies a message and every effect it leads to, then renders if the view changed.
    pub async fn dispatch(&mut self, msg: EditorMsg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            tracker_trace!("Status editor handling {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update_editor(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(next) = self.run_effect(effect).await {
                    inbox.push_back(next);
                }
            }
        }

        if self.state.consume_dirty() {
            self.surface.render(&self.state.view());
        }
    }

    async fn run_effect(&self, effect: EditorEffect) -> Option<EditorMsg> {
        match effect {
            EditorEffect::ResolveActiveAddress => {
                let address = match self.tabs.active_tab().await {
                    Ok(Some(Tab { url: Some(url), .. })) => Some(url),
                    Ok(_) => {
                        tracker_warn!("Active tab has no address");
                        None
                    }
                    Err(err) => {
                        tracker_error!("Error getting current tab: {}", err);
                        None
                    }
                };
                Some(EditorMsg::AddressResolved(address))
            }
            EditorEffect::LoadStatus { address } => match self.store.status_of(&address).await {
                Ok(status) => Some(EditorMsg::StatusLoaded(status)),
                Err(err) => {
                    tracker_error!("Error loading status: {}", err);
                    Some(EditorMsg::StatusLoadFailed)
                }
            },
            EditorEffect::SaveStatus { address, status } => {
                match self.store.write_status(&address, status).await {
                    Ok(()) => Some(EditorMsg::StatusSaved(status)),
                    Err(err) => {
                        tracker_error!("Error saving status: {}", err);
                        None
                    }
                }
            }
        }
    }

    /// Processes user messages and store changes one at a time until shutdown.
    pub async fn run(
        mut self,
        mut inbox: mpsc::UnboundedReceiver<EditorMsg>,
        shutdown: CancellationToken,
    ) {
        loop {
            let msg = tokio::select! {
                _ = shutdown.cancelled() => break,
                msg = inbox.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                change = self.changes.recv() => match change {
                    Ok(_) => EditorMsg::StoreChanged,
                    Err(RecvError::Lagged(skipped)) => {
                        tracker_warn!("Status editor skipped {} store changes", skipped);
                        self.changes = self.changes.resubscribe();
                        EditorMsg::StoreChanged
                    }
                    Err(RecvError::Closed) => break,
                },
            };
            self.dispatch(msg).await;
        }
    }
}
