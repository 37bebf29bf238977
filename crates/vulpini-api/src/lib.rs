// vulpini-api: Async client for the vulpini proxy management API
//
// The proxy exposes a small JSON API on its management port (stats, IP
// pool, anomalies, health, config reload). This crate wraps it behind
// [`MonitorClient`], whose public surface never fails: every transport
// error, non-2xx status, or malformed body collapses to a documented
// neutral fallback so callers render "backend unavailable" instead of
// handling errors.

pub mod client;
pub mod error;
pub mod types;

pub use client::MonitorClient;
pub use error::Error;
pub use types::{
    AnomalyEvent, AnomalyKind, HealthStatus, IpRecord, MutationOutcome, NewIp, NodeHealth,
    Severity, StatsSnapshot,
};
