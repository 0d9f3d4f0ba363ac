//! Tracker core: status model, pure observer state machines and view-model helpers.
mod badge;
mod editor;
mod lists;
mod monitor;
mod status;
mod title;

pub use badge::{Badge, Tone};
pub use editor::{
    update_editor, EditorEffect, EditorMsg, EditorState, EditorView, StatusDisplay,
    ERROR_LOADING_URL,
};
pub use lists::{
    count_label, update_lists, EmptyState, GroupView, ListItemView, ListsEffect, ListsMsg,
    ListsState, ListsView, Mutation, ERROR_LOADING_DATA,
};
pub use monitor::{
    update_monitor, LoadState, MonitorEffect, MonitorMsg, MonitorState, TabEvent, TabId,
    DEFAULT_INTERNAL_SCHEMES,
};
pub use status::{Group, ParseStatusError, Status};
pub use title::derive_title;
