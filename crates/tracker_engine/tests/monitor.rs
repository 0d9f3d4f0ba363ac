mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracker_core::{LoadState, MonitorMsg, MonitorState, Status, TabEvent};
use tracker_engine::{BadgeMonitor, LocalStore, StatusStore};

use support::{
    entries, init_logging, wait_for, BadgeCall, FakeTabs, FlakyStore, RecordingBadges,
};

struct Harness {
    store: Arc<LocalStore>,
    tabs: Arc<FakeTabs>,
    badges: Arc<RecordingBadges>,
    monitor: BadgeMonitor,
}

fn harness(pairs: &[(&str, &str)]) -> Harness {
    init_logging();
    let store = Arc::new(LocalStore::with_entries(entries(pairs)));
    let tabs = Arc::new(FakeTabs::new());
    let badges = Arc::new(RecordingBadges::default());
    let monitor = BadgeMonitor::new(
        MonitorState::default(),
        store.clone(),
        tabs.clone(),
        badges.clone(),
    );
    Harness {
        store,
        tabs,
        badges,
        monitor,
    }
}

fn text(tab_id: u32, text: &str) -> BadgeCall {
    BadgeCall::Text(tab_id, text.to_string())
}

fn background(tab_id: u32, color: &str) -> BadgeCall {
    BadgeCall::Background(tab_id, color.to_string())
}

#[tokio::test]
async fn activation_renders_status_badge() {
    let mut h = harness(&[
        ("https://a.com/", "completed"),
        ("https://b.com/", "ongoing"),
    ]);
    h.tabs.open(1, Some("https://a.com/"));
    h.tabs.open(2, Some("https://b.com/"));
    h.tabs.open(3, Some("https://c.com/"));

    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 1 }))
        .await;
    assert_eq!(h.badges.take(), vec![text(1, "✓"), background(1, "#17a2b8")]);

    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 2 }))
        .await;
    assert_eq!(h.badges.take(), vec![text(2, "●"), background(2, "#ffc107")]);

    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 3 }))
        .await;
    assert_eq!(h.badges.take(), vec![text(3, "")]);
}

#[tokio::test]
async fn internal_scheme_is_always_cleared() {
    let mut h = harness(&[("chrome://settings", "completed")]);
    h.tabs.open(1, Some("chrome://settings"));
    h.tabs.open(2, None);

    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 1 }))
        .await;
    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 2 }))
        .await;
    assert_eq!(h.badges.take(), vec![text(1, ""), text(2, "")]);
}

#[tokio::test]
async fn navigation_updates_badge_only_when_complete() {
    let mut h = harness(&[("https://a.com/", "ongoing")]);
    h.tabs.open(1, Some("https://a.com/"));

    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Updated {
            tab_id: 1,
            load: LoadState::Loading,
            url: Some("https://a.com/".to_string()),
        }))
        .await;
    assert!(h.badges.take().is_empty());

    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Updated {
            tab_id: 1,
            load: LoadState::Complete,
            url: Some("https://a.com/".to_string()),
        }))
        .await;
    assert_eq!(h.badges.take(), vec![text(1, "●"), background(1, "#ffc107")]);
}

#[tokio::test]
async fn store_change_refreshes_active_tab_and_leaves_background_tabs_stale() {
    let mut h = harness(&[]);
    h.tabs.open(1, Some("https://a.com/"));
    h.tabs.open(2, Some("https://b.com/"));
    h.tabs.activate(1);

    h.store
        .write_status("https://b.com/", Status::Completed)
        .await
        .unwrap();
    h.monitor.dispatch(MonitorMsg::StoreChanged).await;

    assert_eq!(h.badges.take(), vec![text(1, "")]);
}

#[tokio::test]
async fn store_change_without_active_tab_does_nothing() {
    let mut h = harness(&[]);
    h.monitor.dispatch(MonitorMsg::StoreChanged).await;
    assert!(h.badges.take().is_empty());
}

#[tokio::test]
async fn lookup_failures_abandon_the_update() {
    let mut h = harness(&[("https://a.com/", "finished")]);
    h.tabs.open(1, Some("https://a.com/"));

    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 1 }))
        .await;
    h.monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 99 }))
        .await;
    h.tabs.set_unavailable(true);
    h.monitor.dispatch(MonitorMsg::StoreChanged).await;

    assert!(h.badges.take().is_empty());
}

#[tokio::test]
async fn store_read_failure_abandons_the_update() {
    init_logging();
    let store = Arc::new(FlakyStore::with_entries(&[("https://a.com/", "ongoing")]));
    let tabs = Arc::new(FakeTabs::new());
    let badges = Arc::new(RecordingBadges::default());
    tabs.open(1, Some("https://a.com/"));
    let mut monitor = BadgeMonitor::new(
        MonitorState::default(),
        store.clone(),
        tabs.clone(),
        badges.clone(),
    );

    store.fail_reads(true);
    monitor
        .dispatch(MonitorMsg::Tab(TabEvent::Activated { tab_id: 1 }))
        .await;
    assert!(badges.take().is_empty());
}

#[tokio::test]
async fn run_loop_reacts_to_tab_events_and_store_changes() {
    let h = harness(&[]);
    h.tabs.open(1, Some("https://a.com/"));
    h.tabs.activate(1);

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(h.monitor.run(events_rx, shutdown.clone()));

    events_tx.send(TabEvent::Activated { tab_id: 1 }).unwrap();
    wait_for(|| h.badges.snapshot() == vec![text(1, "")]).await;
    h.badges.take();

    h.store
        .write_status("https://a.com/", Status::Ongoing)
        .await
        .unwrap();
    wait_for(|| h.badges.snapshot() == vec![text(1, "●"), background(1, "#ffc107")]).await;

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn lagging_behind_the_store_refreshes_once() {
    init_logging();
    let store = Arc::new(FlakyStore::default());
    let tabs = Arc::new(FakeTabs::new());
    let badges = Arc::new(RecordingBadges::default());
    tabs.open(1, Some("https://a.com/"));
    tabs.activate(1);
    let monitor = BadgeMonitor::new(
        MonitorState::default(),
        store.clone(),
        tabs.clone(),
        badges.clone(),
    );

    for i in 0..100 {
        let status = if i % 2 == 0 { Status::Ongoing } else { Status::Completed };
        store.write_status("https://a.com/", status).await.unwrap();
    }

    let (_events_tx, events_rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(monitor.run(events_rx, shutdown.clone()));

    wait_for(|| store.read_count() == 1).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(store.read_count(), 1);
    assert_eq!(badges.take(), vec![text(1, "✓"), background(1, "#17a2b8")]);

    shutdown.cancel();
    handle.await.unwrap();
}
