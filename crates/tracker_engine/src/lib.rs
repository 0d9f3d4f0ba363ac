//! Tracker engine: status store capability, browser seams and observer runners.
mod browser;
mod config;
mod editor;
mod lists;
mod local_store;
mod monitor;
mod persist;
mod store;
mod tracker;

pub use browser::{
    apply_badge, BadgeSurface, BrowserError, EditorSurface, ListSurface, Tab, TabSource,
};
pub use config::TrackerConfig;
pub use editor::StatusEditor;
pub use lists::ListManager;
pub use local_store::LocalStore;
pub use monitor::BadgeMonitor;
pub use persist::{ensure_parent_dir, AtomicFileWriter, PersistError};
pub use store::{Keys, StatusStore, StoreChange, StoreError, ValueChange};
pub use tracker::Tracker;
