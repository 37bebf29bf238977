//! Core state and polling machinery for the vulpini monitor.
//!
//! Everything the terminal front end needs that is not rendering lives
//! here: the [`StateStore`] the view reads from, the bounded
//! [`TrafficHistory`] behind the chart, the self-rescheduling [`Poller`]
//! that keeps the store fresh, and configuration loading. The crate is
//! UI-agnostic; the TUI consumes it through [`PollEvent`]s and plain
//! references.

pub mod config;
pub mod history;
pub mod poller;
pub mod store;
pub mod tab;

pub use config::{ConfigError, MonitorConfig};
pub use history::{TrafficHistory, TrafficPoint};
pub use poller::{PollEvent, PollPhase, Poller};
pub use store::{StateStore, ViewState};
pub use tab::Tab;
