//! All possible UI actions. Actions are the sole mechanism for state
//! mutation: key handlers and background tasks emit them, and the app
//! loop applies them to the store one at a time, in arrival order.

use std::fmt;

use vulpini_api::{AnomalyEvent, HealthStatus, IpRecord, NewIp, StatsSnapshot};
use vulpini_core::Tab;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Pending confirmation action. Destructive commands pass through here
/// before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteIp { address: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteIp { address } => {
                write!(f, "Delete {address} from the pool? This cannot be undone.")
            }
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Resize(u16, u16),

    // ── View toggles ───────────────────────────────────────────────
    SwitchTab(Tab),
    ToggleTheme,
    ToggleRunning,
    ToggleHelp,

    // ── Poll results (from the poll loop, via the bridge) ──────────
    HealthUpdated(Option<HealthStatus>),
    StatsUpdated(StatsSnapshot),
    IpsUpdated(Vec<IpRecord>),
    AnomaliesUpdated(Vec<AnomalyEvent>),
    /// One poll cycle completed; repaint the visible tab.
    PollCycleFinished,

    // ── Pool mutations ─────────────────────────────────────────────
    SubmitAddIp(NewIp),
    RequestDeleteIp(String),
    RequestToggleIp(String),
    RequestReload,

    // ── Confirm dialog ─────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ──────────────────────────────────────────────
    Notify(Notification),
}
