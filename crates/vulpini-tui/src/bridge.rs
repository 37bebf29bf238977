//! Poll bridge — connects the poll loop's event stream to TUI actions.
//!
//! Runs as a background task: every [`PollEvent`] the poller emits is
//! forwarded as an [`Action`] into the app's single action queue, so
//! store writes stay serialized with user input by construction.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use vulpini_core::PollEvent;

use crate::action::Action;

/// Spawn the bridge task. It runs until either channel closes.
pub fn spawn_poll_bridge(
    mut events: mpsc::UnboundedReceiver<PollEvent>,
    action_tx: mpsc::UnboundedSender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let action = match event {
                PollEvent::Health(health) => Action::HealthUpdated(health),
                PollEvent::Stats(stats) => Action::StatsUpdated(stats),
                PollEvent::Ips(ips) => Action::IpsUpdated(ips),
                PollEvent::Anomalies(anomalies) => Action::AnomaliesUpdated(anomalies),
                PollEvent::CycleFinished => Action::PollCycleFinished,
            };
            if action_tx.send(action).is_err() {
                break;
            }
        }
        debug!("poll bridge shut down");
    })
}
