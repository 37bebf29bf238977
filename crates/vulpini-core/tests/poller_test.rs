// Poll-cycle behavior against a mock backend: fetch ordering, the
// down-backend skip, tab gating, and loop lifecycle.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vulpini_api::MonitorClient;
use vulpini_core::{PollEvent, PollPhase, Poller, StateStore, Tab};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MonitorClient) {
    let server = MockServer::start().await;
    let client = MonitorClient::new(
        server.uri().parse().unwrap(),
        Duration::from_secs(2),
    )
    .unwrap();
    (server, client)
}

struct Harness {
    poller: Poller,
    tab: watch::Sender<Tab>,
    events: mpsc::UnboundedReceiver<PollEvent>,
    cancel: CancellationToken,
    phase: watch::Receiver<PollPhase>,
}

fn harness(client: MonitorClient, tab: Tab, delay: Duration) -> Harness {
    let (tab_tx, tab_rx) = watch::channel(tab);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let (poller, phase) = Poller::new(client, delay, tab_rx, event_tx, cancel.clone());
    Harness { poller, tab: tab_tx, events: event_rx, cancel, phase }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<PollEvent>) -> Vec<PollEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn apply_all(store: &mut StateStore, events: Vec<PollEvent>) {
    for event in events {
        match event {
            PollEvent::Health(h) => store.apply_health(h),
            PollEvent::Stats(s) => store.apply_stats(s),
            PollEvent::Ips(list) => store.apply_ips(list),
            PollEvent::Anomalies(list) => store.apply_anomalies(list),
            PollEvent::CycleFinished => {}
        }
    }
}

async fn mount_health(server: &MockServer, success: bool, status: &str) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": success,
            "status": status,
        })))
        .mount(server)
        .await;
}

async fn mount_stats(server: &MockServer, rps: f64) {
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "total_requests": 1500,
                "requests_per_second": rps,
            }
        })))
        .mount(server)
        .await;
}

// ── Single cycle ────────────────────────────────────────────────────

#[tokio::test]
async fn test_cycle_emits_results_in_fetch_order() {
    let (server, client) = setup().await;
    mount_health(&server, true, "healthy").await;
    mount_stats(&server, 7.0).await;

    let mut h = harness(client, Tab::Dashboard, Duration::from_millis(20));
    h.poller.cycle().await;

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], PollEvent::Health(Some(probe)) if probe.success));
    assert!(matches!(&events[1], PollEvent::Stats(_)));
    assert_eq!(events[2], PollEvent::CycleFinished);
}

#[tokio::test]
async fn test_cycle_applied_to_store_end_to_end() {
    let (server, client) = setup().await;
    mount_health(&server, true, "healthy").await;
    mount_stats(&server, 42.7).await;

    let mut h = harness(client, Tab::Dashboard, Duration::from_millis(20));
    h.poller.cycle().await;

    let mut store = StateStore::new();
    apply_all(&mut store, drain(&mut h.events));

    assert!(store.view.running);
    assert_eq!(store.status_label, "healthy");
    assert!((store.stats.requests_per_second - 42.7).abs() < f64::EPSILON);
    assert_eq!(store.traffic.len(), 1);
    // the chart sample is the floored rate
    assert_eq!(store.traffic.latest().unwrap().value, 42);
}

#[tokio::test]
async fn test_down_backend_skips_all_data_fetches() {
    let (server, client) = setup().await;
    mount_health(&server, false, "unhealthy").await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ips"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // the IPs tab is active, so only the down backend gates the fetch
    let mut h = harness(client, Tab::Ips, Duration::from_millis(20));
    h.poller.cycle().await;

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], PollEvent::Health(Some(probe)) if !probe.success));
    assert_eq!(events[1], PollEvent::CycleFinished);

    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_backend_yields_health_none() {
    // nothing listens on port 1 without elevated privileges
    let client = MonitorClient::new(
        "http://127.0.0.1:1".parse().unwrap(),
        Duration::from_millis(300),
    )
    .unwrap();

    let mut h = harness(client, Tab::Dashboard, Duration::from_millis(20));
    h.poller.cycle().await;

    let mut store = StateStore::new();
    store.view.running = true;
    apply_all(&mut store, drain(&mut h.events));

    assert!(!store.view.running);
    assert_eq!(store.status_label, "unreachable");
}

#[tokio::test]
async fn test_stats_failure_leaves_history_untouched() {
    let (server, client) = setup().await;
    mount_health(&server, true, "healthy").await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut h = harness(client, Tab::Dashboard, Duration::from_millis(20));
    h.poller.cycle().await;

    let events = drain(&mut h.events);
    assert!(events.iter().all(|e| !matches!(e, PollEvent::Stats(_))));
    assert_eq!(events.last(), Some(&PollEvent::CycleFinished));

    let mut store = StateStore::new();
    apply_all(&mut store, events);
    assert!(store.traffic.is_empty());
}

// ── Tab gating ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_ip_fetches_follow_the_active_tab() {
    let (server, client) = setup().await;
    mount_health(&server, true, "healthy").await;
    mount_stats(&server, 1.0).await;

    Mock::given(method("GET"))
        .and(path("/api/ips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"address": "10.0.0.1", "port": 1080}]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/anomalies"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = harness(client, Tab::Dashboard, Duration::from_millis(20));

    // dashboard active: no pool fetch
    h.poller.cycle().await;
    // user moves to the IPs tab: the next two cycles fetch
    h.tab.send(Tab::Ips).unwrap();
    h.poller.cycle().await;
    h.poller.cycle().await;

    let ip_batches = drain(&mut h.events)
        .into_iter()
        .filter(|e| matches!(e, PollEvent::Ips(_)))
        .count();
    assert_eq!(ip_batches, 2);

    server.verify().await;
}

#[tokio::test]
async fn test_anomaly_fetches_only_on_logs_tab() {
    let (server, client) = setup().await;
    mount_health(&server, true, "healthy").await;
    mount_stats(&server, 1.0).await;

    Mock::given(method("GET"))
        .and(path("/api/anomalies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": "a1", "anomaly_type": "trafficspike", "severity": "high"},
                {"id": "a2", "anomaly_type": "latencyspike", "severity": "low"},
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ips"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = harness(client, Tab::Logs, Duration::from_millis(20));
    h.poller.cycle().await;

    let mut store = StateStore::new();
    apply_all(&mut store, drain(&mut h.events));
    assert_eq!(store.anomalies.len(), 2);
    assert_eq!(store.anomalies[0].id, "a1");

    server.verify().await;
}

// ── Loop lifecycle ──────────────────────────────────────────────────

#[tokio::test]
async fn test_loop_waits_after_each_cycle_and_honors_cancel() {
    let (server, client) = setup().await;
    mount_stats(&server, 1.0).await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "healthy",
        })))
        .expect(1)
        .mount(&server)
        .await;

    // an hour-long delay: the loop must sit in the wait state after
    // the first cycle instead of starting another
    let mut h = harness(client, Tab::Dashboard, Duration::from_secs(3600));
    let handle = h.poller.start();

    tokio::time::timeout(
        Duration::from_secs(5),
        h.phase.wait_for(|p| *p == PollPhase::ScheduledWait),
    )
    .await
    .expect("poller never reached the wait state")
    .unwrap();

    h.cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller did not stop after cancel")
        .unwrap();

    assert_eq!(*h.phase.borrow(), PollPhase::Idle);
    assert_eq!(drain(&mut h.events).len(), 3);

    server.verify().await;
}

#[tokio::test]
async fn test_loop_exits_when_receiver_is_dropped() {
    let (server, client) = setup().await;
    mount_health(&server, true, "healthy").await;

    let h = harness(client, Tab::Dashboard, Duration::from_millis(20));
    drop(h.events);

    let handle = h.poller.start();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller did not stop after the UI hung up")
        .unwrap();
}
