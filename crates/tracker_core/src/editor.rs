use crate::Status;

/// Address label shown when the active tab cannot be resolved.
pub const ERROR_LOADING_URL: &str = "Error loading URL";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Opening,
    Failed,
    Loading {
        address: String,
    },
    Ready {
        address: String,
        status: Status,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    phase: Phase,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMsg {
    /// The editor surface was opened.
    Opened,
    /// Active tab address lookup finished; `None` when it could not be resolved.
    AddressResolved(Option<String>),
    /// Stored status for the address was read.
    StatusLoaded(Status),
    /// Reading the stored status failed.
    StatusLoadFailed,
    /// User clicked one of the status buttons.
    StatusSelected(Status),
    /// The selected status was written to the store.
    StatusSaved(Status),
    /// The status store reported a mutation.
    StoreChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEffect {
    ResolveActiveAddress,
    LoadStatus { address: String },
    SaveStatus { address: String, status: Status },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub text: &'static str,
    pub class: &'static str,
}

impl StatusDisplay {
    pub fn for_status(status: Status) -> Self {
        match status {
            Status::NotVisited => Self {
                text: "⚪ Not Visited",
                class: "status-not-visited",
            },
            Status::Ongoing => Self {
                text: "🟡 Ongoing",
                class: "status-ongoing",
            },
            Status::Completed => Self {
                text: "🟢 Completed",
                class: "status-completed",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorView {
    pub address_label: String,
    pub status: Option<StatusDisplay>,
    /// Status whose button is highlighted.
    pub active: Option<Status>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(&self) -> Option<&str> {
        match &self.phase {
            Phase::Loading { address } | Phase::Ready { address, .. } => Some(address),
            Phase::Opening | Phase::Failed => None,
        }
    }

    pub fn view(&self) -> EditorView {
        match &self.phase {
            Phase::Opening => EditorView::default(),
            Phase::Failed => EditorView {
                address_label: ERROR_LOADING_URL.to_string(),
                status: None,
                active: None,
            },
            Phase::Loading { address } => EditorView {
                address_label: address.clone(),
                status: None,
                active: None,
            },
            Phase::Ready { address, status } => EditorView {
                address_label: address.clone(),
                status: Some(StatusDisplay::for_status(*status)),
                active: Some(*status),
            },
        }
    }

    /// Returns whether the view changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }

    fn show_status(&mut self, status: Status) -> Vec<EditorEffect> {
        if let Some(address) = self.address().map(ToOwned::to_owned) {
            self.set_phase(Phase::Ready { address, status });
        }
        Vec::new()
    }
}

/// Pure update function for the single-address status editor.
pub fn update_editor(mut state: EditorState, msg: EditorMsg) -> (EditorState, Vec<EditorEffect>) {
    let effects = match msg {
        EditorMsg::Opened => {
            state.set_phase(Phase::Opening);
            vec![EditorEffect::ResolveActiveAddress]
        }
        EditorMsg::AddressResolved(Some(address)) => {
            state.set_phase(Phase::Loading {
                address: address.clone(),
            });
            vec![EditorEffect::LoadStatus { address }]
        }
        EditorMsg::AddressResolved(None) => {
            state.set_phase(Phase::Failed);
            Vec::new()
        }
        EditorMsg::StatusLoaded(status) | EditorMsg::StatusSaved(status) => {
            state.show_status(status)
        }
        EditorMsg::StatusLoadFailed => state.show_status(Status::NotVisited),
        EditorMsg::StatusSelected(status) => match &state.phase {
            Phase::Ready { address, .. } => vec![EditorEffect::SaveStatus {
                address: address.clone(),
                status,
            }],
            _ => Vec::new(),
        },
        EditorMsg::StoreChanged => match &state.phase {
            Phase::Ready { address, .. } => vec![EditorEffect::LoadStatus {
                address: address.clone(),
            }],
            _ => Vec::new(),
        },
    };

    (state, effects)
}
