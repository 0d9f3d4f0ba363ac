use crate::{Badge, Status};

pub type TabId = u32;

/// Address prefixes of browser-internal pages that never carry a badge.
pub const DEFAULT_INTERNAL_SCHEMES: &[&str] = &["chrome://", "chrome-extension://"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Complete,
}

/// Tab lifecycle notifications delivered by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    Activated {
        tab_id: TabId,
    },
    Updated {
        tab_id: TabId,
        load: LoadState,
        url: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorMsg {
    /// Browser tab lifecycle event.
    Tab(TabEvent),
    /// The status store reported a mutation.
    StoreChanged,
    /// Result of asking the browser for the active tab.
    ActiveTabResolved(Option<TabId>),
    /// Result of asking the browser for a tab's current address.
    TabResolved { tab_id: TabId, url: Option<String> },
    /// Status lookup for a tab's address finished.
    StatusLoaded { tab_id: TabId, status: Status },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEffect {
    ResolveTab { tab_id: TabId },
    ResolveActiveTab,
    LookupStatus { tab_id: TabId, address: String },
    SetBadge { tab_id: TabId, badge: Badge },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    internal_schemes: Vec<String>,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new(DEFAULT_INTERNAL_SCHEMES.iter().map(|s| s.to_string()).collect())
    }
}

impl MonitorState {
    pub fn new(internal_schemes: Vec<String>) -> Self {
        Self { internal_schemes }
    }

    pub fn is_internal(&self, address: &str) -> bool {
        self.internal_schemes
            .iter()
            .any(|prefix| address.starts_with(prefix.as_str()))
    }
}

/// Pure update function for the badge monitor.
pub fn update_monitor(state: MonitorState, msg: MonitorMsg) -> (MonitorState, Vec<MonitorEffect>) {
    let effects = match msg {
        MonitorMsg::Tab(TabEvent::Activated { tab_id }) => {
            vec![MonitorEffect::ResolveTab { tab_id }]
        }
        MonitorMsg::Tab(TabEvent::Updated {
            tab_id,
            load: LoadState::Complete,
            url: Some(_),
        }) => vec![MonitorEffect::ResolveTab { tab_id }],
        MonitorMsg::Tab(TabEvent::Updated { .. }) => Vec::new(),
        // The changed key cannot be mapped back to a tab, so only the active tab is refreshed.
        MonitorMsg::StoreChanged => vec![MonitorEffect::ResolveActiveTab],
        MonitorMsg::ActiveTabResolved(Some(tab_id)) => vec![MonitorEffect::ResolveTab { tab_id }],
        MonitorMsg::ActiveTabResolved(None) => Vec::new(),
        MonitorMsg::TabResolved { tab_id, url } => match url {
            Some(address) if !state.is_internal(&address) => {
                vec![MonitorEffect::LookupStatus { tab_id, address }]
            }
            _ => vec![MonitorEffect::SetBadge {
                tab_id,
                badge: Badge::cleared(),
            }],
        },
        MonitorMsg::StatusLoaded { tab_id, status } => vec![MonitorEffect::SetBadge {
            tab_id,
            badge: Badge::for_status(status),
        }],
    };

    (state, effects)
}
