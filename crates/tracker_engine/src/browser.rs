use async_trait::async_trait;
use thiserror::Error;
use tracker_core::{Badge, EditorView, ListsView, TabId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    /// Undefined for tabs the browser does not expose an address for.
    pub url: Option<String>,
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("no tab with id {0}")]
    TabNotFound(TabId),
    #[error("browser unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the browser's tabs.
#[async_trait]
pub trait TabSource: Send + Sync {
    async fn get(&self, tab_id: TabId) -> Result<Tab, BrowserError>;

    /// Active tab of the current window, if any.
    async fn active_tab(&self) -> Result<Option<Tab>, BrowserError>;
}

/// Per-tab toolbar badge.
pub trait BadgeSurface: Send + Sync {
    fn set_badge_text(&self, tab_id: TabId, text: &str);
    fn set_badge_background(&self, tab_id: TabId, color: &str);
}

pub trait EditorSurface: Send + Sync {
    fn render(&self, view: &EditorView);
}

pub trait ListSurface: Send + Sync {
    fn render(&self, view: &ListsView);
    /// Blocking alert shown when a destructive action failed.
    fn alert(&self, message: &str);
}

/// Sets the badge text, and the background only for a non-empty badge.
pub fn apply_badge(surface: &dyn BadgeSurface, tab_id: TabId, badge: &Badge) {
    surface.set_badge_text(tab_id, badge.text);
    if let Some(tone) = badge.tone {
        surface.set_badge_background(tab_id, tone.color());
    }
}
