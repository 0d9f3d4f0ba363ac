#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracker_core::{EditorView, ListsView, TabId};
use tracker_engine::{
    BadgeSurface, BrowserError, EditorSurface, Keys, ListSurface, LocalStore, StatusStore,
    StoreChange, StoreError, Tab, TabSource,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

/// Polls `done` until it holds, failing the test after about a second.
pub async fn wait_for(mut done: impl FnMut() -> bool) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

pub fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(address, token)| (address.to_string(), token.to_string()))
        .collect()
}

/// Browser with a fixed set of tabs and one active tab.
#[derive(Default)]
pub struct FakeTabs {
    tabs: Mutex<HashMap<TabId, Tab>>,
    active: Mutex<Option<TabId>>,
    unavailable: AtomicBool,
}

impl FakeTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, id: TabId, url: Option<&str>) {
        let tab = Tab {
            id,
            url: url.map(ToOwned::to_owned),
        };
        self.tabs.lock().unwrap().insert(id, tab);
    }

    pub fn activate(&self, id: TabId) {
        *self.active.lock().unwrap() = Some(id);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), BrowserError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(BrowserError::Unavailable("tabs api down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TabSource for FakeTabs {
    async fn get(&self, tab_id: TabId) -> Result<Tab, BrowserError> {
        self.check()?;
        self.tabs
            .lock()
            .unwrap()
            .get(&tab_id)
            .cloned()
            .ok_or(BrowserError::TabNotFound(tab_id))
    }

    async fn active_tab(&self) -> Result<Option<Tab>, BrowserError> {
        self.check()?;
        let active = *self.active.lock().unwrap();
        Ok(active.and_then(|id| self.tabs.lock().unwrap().get(&id).cloned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeCall {
    Text(TabId, String),
    Background(TabId, String),
}

#[derive(Default)]
pub struct RecordingBadges {
    calls: Mutex<Vec<BadgeCall>>,
}

impl RecordingBadges {
    pub fn snapshot(&self) -> Vec<BadgeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<BadgeCall> {
        self.calls.lock().unwrap().drain(..).collect()
    }
}

impl BadgeSurface for RecordingBadges {
    fn set_badge_text(&self, tab_id: TabId, text: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(BadgeCall::Text(tab_id, text.to_string()));
    }

    fn set_badge_background(&self, tab_id: TabId, color: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(BadgeCall::Background(tab_id, color.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingEditor {
    renders: Mutex<Vec<EditorView>>,
}

impl RecordingEditor {
    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<EditorView> {
        self.renders.lock().unwrap().last().cloned()
    }
}

impl EditorSurface for RecordingEditor {
    fn render(&self, view: &EditorView) {
        self.renders.lock().unwrap().push(view.clone());
    }
}

#[derive(Default)]
pub struct RecordingLists {
    renders: Mutex<Vec<ListsView>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingLists {
    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<ListsView> {
        self.renders.lock().unwrap().last().cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl ListSurface for RecordingLists {
    fn render(&self, view: &ListsView) {
        self.renders.lock().unwrap().push(view.clone());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// In-memory store whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: LocalStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
}

impl FlakyStore {
    pub fn with_entries(pairs: &[(&str, &str)]) -> Self {
        Self {
            inner: LocalStore::with_entries(entries(pairs)),
            ..Self::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StatusStore for FlakyStore {
    async fn get(&self, keys: Keys) -> Result<BTreeMap<String, String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_reads)?;
        self.inner.get(keys).await
    }

    async fn set(&self, entries: BTreeMap<String, String>) -> Result<(), StoreError> {
        Self::check(&self.fail_writes)?;
        self.inner.set(entries).await
    }

    async fn remove(&self, keys: Vec<String>) -> Result<(), StoreError> {
        Self::check(&self.fail_writes)?;
        self.inner.remove(keys).await
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.subscribe()
    }
}

