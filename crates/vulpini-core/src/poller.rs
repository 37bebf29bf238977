// ── Self-rescheduling poll loop ──
//
// Drives the whole monitor: one cycle probes health, then fetches
// whatever the active tab needs, emitting each result as a PollEvent
// for the UI task to apply. The next cycle is scheduled a fixed delay
// after the previous one finishes, so a slow backend throttles polling
// instead of stacking overlapping requests. Exactly one cycle is in
// flight at any time.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use vulpini_api::{AnomalyEvent, HealthStatus, IpRecord, MonitorClient, StatsSnapshot};

use crate::tab::Tab;

/// One fetched result, in the order the cycle produced it.
///
/// The receiver applies these to the [`StateStore`](crate::StateStore)
/// in arrival order; the channel is the only writer path, so ordering
/// is preserved by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// Health probe result. `None` means the probe itself failed.
    Health(Option<HealthStatus>),
    Stats(StatsSnapshot),
    Ips(Vec<IpRecord>),
    Anomalies(Vec<AnomalyEvent>),
    /// Marks the end of a cycle; the UI repaints on this.
    CycleFinished,
}

/// Where the poll loop currently is. Published through a `watch`
/// channel so the status bar can show it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollPhase {
    #[default]
    Idle,
    Polling,
    ScheduledWait,
}

impl PollPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::ScheduledWait => "waiting",
        }
    }
}

/// Background poll loop.
///
/// Reads the active tab through a `watch` channel so tab-gated fetches
/// (IP pool, anomaly log) only happen while the user is looking at
/// them.
pub struct Poller {
    client: MonitorClient,
    delay: Duration,
    active_tab: watch::Receiver<Tab>,
    events: mpsc::UnboundedSender<PollEvent>,
    cancel: CancellationToken,
    phase: watch::Sender<PollPhase>,
}

impl Poller {
    /// Creates a poller and the phase channel observers read from.
    pub fn new(
        client: MonitorClient,
        delay: Duration,
        active_tab: watch::Receiver<Tab>,
        events: mpsc::UnboundedSender<PollEvent>,
        cancel: CancellationToken,
    ) -> (Self, watch::Receiver<PollPhase>) {
        let (phase, phase_rx) = watch::channel(PollPhase::Idle);
        let poller = Self { client, delay, active_tab, events, cancel, phase };
        (poller, phase_rx)
    }

    /// Spawns the loop onto the runtime. The first cycle starts
    /// immediately; the delay only separates subsequent cycles.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        info!(
            interval_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
            backend = %self.client.base_url(),
            "poll loop started"
        );

        loop {
            if self.cancel.is_cancelled() || self.events.is_closed() {
                break;
            }

            self.phase.send_replace(PollPhase::Polling);
            self.cycle().await;
            self.phase.send_replace(PollPhase::ScheduledWait);

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.delay) => {}
            }
        }

        self.phase.send_replace(PollPhase::Idle);
        debug!("poll loop stopped");
    }

    /// Runs one poll cycle, strict order: health first, then stats,
    /// then the tab-gated collections, then the cycle marker. Stats
    /// and collection fetches are skipped entirely while the backend
    /// is down.
    pub async fn cycle(&mut self) {
        let health = self.client.health().await;
        let running = health.as_ref().is_some_and(|h| h.success);
        self.emit(PollEvent::Health(health));

        if running {
            if let Some(stats) = self.client.stats().await {
                self.emit(PollEvent::Stats(stats));
            }

            if self.current_tab() == Tab::Ips {
                let ips = self.client.ips().await;
                self.emit(PollEvent::Ips(ips));
            }

            if self.current_tab() == Tab::Logs {
                let anomalies = self.client.anomalies().await;
                self.emit(PollEvent::Anomalies(anomalies));
            }
        } else {
            debug!("backend down, skipping stats and collection fetches");
        }

        self.emit(PollEvent::CycleFinished);
    }

    fn current_tab(&self) -> Tab {
        *self.active_tab.borrow()
    }

    fn emit(&self, event: PollEvent) {
        // A closed channel means the UI is gone; the run loop exits on
        // the next iteration.
        let _ = self.events.send(event);
    }
}
