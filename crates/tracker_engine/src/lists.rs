use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracker_core::{update_lists, Group, ListsEffect, ListsMsg, ListsState, ListsView, Mutation};
use tracker_logging::{tracker_error, tracker_trace, tracker_warn};

use crate::{Keys, ListSurface, StatusStore, StoreChange, StoreError};

/// Management view over every tracked address, grouped by status.
pub struct ListManager {
    state: ListsState,
    store: Arc<dyn StatusStore>,
    surface: Arc<dyn ListSurface>,
    changes: broadcast::Receiver<StoreChange>,
}

impl ListManager {
    pub fn new(store: Arc<dyn StatusStore>, surface: Arc<dyn ListSurface>) -> Self {
        let changes = store.subscribe();
        Self {
            state: ListsState::new(),
            store,
            surface,
            changes,
        }
    }

    pub fn view(&self) -> ListsView {
        self.state.view()
    }

    pub async fn open(&mut self) {
        self.dispatch(ListsMsg::Opened).await;
    }

    pub async fn move_item(&mut self, address: impl Into<String>, from: Group) {
        let address = address.into();
        self.dispatch(ListsMsg::MoveClicked { address, from }).await;
    }

    pub async fn remove_item(&mut self, address: impl Into<String>) {
        let address = address.into();
        self.dispatch(ListsMsg::RemoveClicked { address }).await;
    }

    pub async fn delete_all(&mut self, group: Group) {
        self.dispatch(ListsMsg::DeleteAllClicked(group)).await;
    }

    pub async fn select_group(&mut self, group: Group) {
        self.dispatch(ListsMsg::GroupSelected(group)).await;
    }

    /// Applies a message and every effect it leads to, then renders if the view changed.
    pub async fn dispatch(&mut self, msg: ListsMsg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            tracker_trace!("List manager handling {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update_lists(state, msg);
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

    async fn run_effect(&self, effect: ListsEffect) -> Option<ListsMsg> {
        match effect {
            ListsEffect::LoadAll => match self.store.get(Keys::All).await {
                Ok(entries) => Some(ListsMsg::EntriesLoaded(entries)),
                Err(err) => {
                    tracker_error!("Error loading data: {}", err);
                    Some(ListsMsg::LoadFailed)
                }
            },
            ListsEffect::WriteStatus {
                mutation,
                address,
                status,
            } => {
                let result = self.store.write_status(&address, status).await;
                Some(mutation_outcome(mutation, result))
            }
            ListsEffect::RemoveAddresses {
                mutation,
                addresses,
            } => {
                let result = self.store.remove(addresses).await;
                Some(mutation_outcome(mutation, result))
            }
            ListsEffect::Alert(message) => {
                self.surface.alert(message);
                None
            }
        }
    }

    /// Processes user messages and store changes one at a time until shutdown.
    pub async fn run(
        mut self,
        mut inbox: mpsc::UnboundedReceiver<ListsMsg>,
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
                    Ok(_) => ListsMsg::StoreChanged,
                    Err(RecvError::Lagged(skipped)) => {
                        tracker_warn!("List manager skipped {} store changes", skipped);
                        self.changes = self.changes.resubscribe();
                        ListsMsg::StoreChanged
                    }
                    Err(RecvError::Closed) => break,
                },
            };
            self.dispatch(msg).await;
        }
    }
}

fn mutation_outcome(mutation: Mutation, result: Result<(), StoreError>) -> ListsMsg {
    match result {
        Ok(()) => ListsMsg::MutationApplied(mutation),
        Err(err) => {
            tracker_error!("Error applying {:?}: {}", mutation, err);
            ListsMsg::MutationFailed(mutation)
        }
    }
}
