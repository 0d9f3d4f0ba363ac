use std::collections::BTreeMap;

use crate::{derive_title, Group, Status};

/// Count label shown for both groups when the store cannot be read.
pub const ERROR_LOADING_DATA: &str = "Error loading data";

/// Destructive list action, used to report which one failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Move,
    Remove,
    DeleteAll,
}

impl Mutation {
    pub fn alert_message(self) -> &'static str {
        match self {
            Mutation::Move => "Error moving item. Please try again.",
            Mutation::Remove => "Error removing item. Please try again.",
            Mutation::DeleteAll => "Error deleting items. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListsState {
    completed: Vec<String>,
    ongoing: Vec<String>,
    load_failed: bool,
    selected: Group,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListsMsg {
    /// The list surface was opened.
    Opened,
    /// The status store reported a mutation.
    StoreChanged,
    /// Full store contents, address to raw status token.
    EntriesLoaded(BTreeMap<String, String>),
    /// Reading the full store failed.
    LoadFailed,
    /// User switched between the Completed and Ongoing tabs.
    GroupSelected(Group),
    /// User clicked the move button of an item shown in `from`.
    MoveClicked { address: String, from: Group },
    /// User clicked the remove button of an item.
    RemoveClicked { address: String },
    /// User clicked delete-all on a group.
    DeleteAllClicked(Group),
    MutationApplied(Mutation),
    MutationFailed(Mutation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListsEffect {
    LoadAll,
    WriteStatus {
        mutation: Mutation,
        address: String,
        status: Status,
    },
    RemoveAddresses {
        mutation: Mutation,
        addresses: Vec<String>,
    },
    Alert(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemView {
    pub address: String,
    pub title: String,
    pub status: Status,
    pub move_label: &'static str,
    pub move_glyph: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub text: &'static str,
    pub subtext: String,
}

impl EmptyState {
    fn for_group(group: Group) -> Self {
        let (icon, text) = match group {
            Group::Completed => ("✅", "No completed items yet"),
            Group::Ongoing => ("📖", "No ongoing items yet"),
        };
        Self {
            icon,
            text,
            subtext: format!("Start marking pages as {} to see them here", group.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub group: Group,
    pub count_label: String,
    pub items: Vec<ListItemView>,
    pub empty_state: Option<EmptyState>,
    pub delete_all_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListsView {
    pub selected: Group,
    pub completed: GroupView,
    pub ongoing: GroupView,
}

/// `1 completed item`, `3 ongoing items`.
pub fn count_label(group: Group, count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {} item{plural}", group.label())
}

impl ListsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses currently attributed to `group`, in display order.
    pub fn addresses(&self, group: Group) -> &[String] {
        match group {
            Group::Completed => &self.completed,
            Group::Ongoing => &self.ongoing,
        }
    }

    pub fn view(&self) -> ListsView {
        ListsView {
            selected: self.selected,
            completed: self.group_view(Group::Completed),
            ongoing: self.group_view(Group::Ongoing),
        }
    }

    /// Returns whether the view changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn group_view(&self, group: Group) -> GroupView {
        let addresses = self.addresses(group);
        let (move_label, move_glyph) = match group {
            Group::Completed => ("Move to Ongoing", "⏪"),
            Group::Ongoing => ("Move to Completed", "✅"),
        };
        let items: Vec<ListItemView> = addresses
            .iter()
            .map(|address| ListItemView {
                address: address.clone(),
                title: derive_title(address),
                status: group.status(),
                move_label,
                move_glyph,
            })
            .collect();
        let count_label = if self.load_failed {
            ERROR_LOADING_DATA.to_string()
        } else {
            count_label(group, items.len())
        };

        GroupView {
            group,
            count_label,
            empty_state: items.is_empty().then(|| EmptyState::for_group(group)),
            delete_all_enabled: !items.is_empty(),
            items,
        }
    }

    fn replace_entries(&mut self, entries: BTreeMap<String, String>) {
        let mut completed = Vec::new();
        let mut ongoing = Vec::new();
        for (address, token) in entries {
            match token.parse::<Status>().ok().and_then(Status::group) {
                Some(Group::Completed) => completed.push(address),
                Some(Group::Ongoing) => ongoing.push(address),
                None => {}
            }
        }
        completed.sort_by(|a, b| b.cmp(a));
        ongoing.sort_by(|a, b| b.cmp(a));

        self.completed = completed;
        self.ongoing = ongoing;
        self.load_failed = false;
        self.dirty = true;
    }
}

/// Pure update function for the list manager.
pub fn update_lists(mut state: ListsState, msg: ListsMsg) -> (ListsState, Vec<ListsEffect>) {
    let effects = match msg {
        ListsMsg::Opened | ListsMsg::StoreChanged | ListsMsg::MutationApplied(_) => {
            vec![ListsEffect::LoadAll]
        }
        ListsMsg::EntriesLoaded(entries) => {
            state.replace_entries(entries);
            Vec::new()
        }
        ListsMsg::LoadFailed => {
            state.load_failed = true;
            state.dirty = true;
            Vec::new()
        }
        ListsMsg::GroupSelected(group) => {
            if state.selected != group {
                state.selected = group;
                state.dirty = true;
            }
            Vec::new()
        }
        ListsMsg::MoveClicked { address, from } => vec![ListsEffect::WriteStatus {
            mutation: Mutation::Move,
            address,
            status: from.other().status(),
        }],
        ListsMsg::RemoveClicked { address } => vec![ListsEffect::RemoveAddresses {
            mutation: Mutation::Remove,
            addresses: vec![address],
        }],
        ListsMsg::DeleteAllClicked(group) => {
            let addresses = state.addresses(group).to_vec();
            if addresses.is_empty() {
                Vec::new()
            } else {
                vec![ListsEffect::RemoveAddresses {
                    mutation: Mutation::DeleteAll,
                    addresses,
                }]
            }
        }
        ListsMsg::MutationFailed(mutation) => vec![ListsEffect::Alert(mutation.alert_message())],
    };

    (state, effects)
}
