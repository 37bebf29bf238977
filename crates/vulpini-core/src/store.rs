// ── Monitor state store ──
//
// Single owner of everything the screens render. All mutation goes
// through the apply/set methods below; collections are replaced
// wholesale on refresh rather than diffed, so a stale entry can never
// outlive the snapshot that superseded it.

use chrono::Local;
use vulpini_api::{AnomalyEvent, HealthStatus, IpRecord, StatsSnapshot};

use crate::history::{TrafficHistory, TrafficPoint};
use crate::tab::Tab;

/// Anomalies retained for display. The API may return more; older
/// entries past this cutoff are dropped on apply.
pub const MAX_ANOMALIES: usize = 50;

/// Process-local view flags, owned by the UI and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub active_tab: Tab,
    /// Whether the backend is considered up. Overwritten by every
    /// health probe; the user toggle flips it between probes.
    pub running: bool,
    pub dark_mode: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { active_tab: Tab::default(), running: false, dark_mode: true }
    }
}

/// All monitor data in one place.
#[derive(Debug, Default)]
pub struct StateStore {
    pub view: ViewState,
    /// Last reported backend status string, or "unreachable" when the
    /// health probe failed.
    pub status_label: String,
    pub stats: StatsSnapshot,
    pub traffic: TrafficHistory,
    pub ips: Vec<IpRecord>,
    pub anomalies: Vec<AnomalyEvent>,
}

impl StateStore {
    pub fn new() -> Self {
        Self { status_label: "unknown".to_owned(), ..Self::default() }
    }

    // ── Poll-driven updates ──────────────────────────────────────────

    /// Applies a health probe result. `None` means the probe failed,
    /// which marks the backend down regardless of prior state.
    pub fn apply_health(&mut self, health: Option<HealthStatus>) {
        match health {
            Some(h) => {
                self.view.running = h.success;
                self.status_label = h.status;
            }
            None => {
                self.view.running = false;
                self.status_label = "unreachable".to_owned();
            }
        }
    }

    /// Replaces the stats snapshot and records one traffic sample:
    /// the floored requests-per-second value, labelled with the
    /// wall-clock time the sample arrived.
    pub fn apply_stats(&mut self, stats: StatsSnapshot) {
        let label = Local::now().format("%H:%M:%S").to_string();
        self.record_sample(label, &stats);
        self.stats = stats;
    }

    /// As [`apply_stats`](Self::apply_stats), with the sample label
    /// supplied by the caller.
    pub fn apply_stats_labelled(&mut self, stats: StatsSnapshot, label: impl Into<String>) {
        self.record_sample(label.into(), &stats);
        self.stats = stats;
    }

    fn record_sample(&mut self, label: String, stats: &StatsSnapshot) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = stats.requests_per_second.max(0.0).floor() as u64;
        self.traffic.push(TrafficPoint::new(label, value));
    }

    pub fn apply_ips(&mut self, ips: Vec<IpRecord>) {
        self.ips = ips;
    }

    pub fn apply_anomalies(&mut self, mut anomalies: Vec<AnomalyEvent>) {
        anomalies.truncate(MAX_ANOMALIES);
        self.anomalies = anomalies;
    }

    // ── User-driven updates ──────────────────────────────────────────

    pub fn set_tab(&mut self, tab: Tab) {
        self.view.active_tab = tab;
    }

    pub fn set_theme(&mut self, dark_mode: bool) {
        self.view.dark_mode = dark_mode;
    }

    /// View-only flip of the running flag. The next health probe will
    /// overwrite it with the backend's own answer.
    pub fn set_running(&mut self, running: bool) {
        self.view.running = running;
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Finds an IP record by its address, the stable identity that
    /// survives wholesale list replacement.
    pub fn ip_by_address(&self, address: &str) -> Option<&IpRecord> {
        self.ips.iter().find(|ip| ip.address == address)
    }
}
