//! Tab identifier for the four dashboard views.

use std::fmt;

/// Identifies each tab, navigable by number keys 1-4.
///
/// The poller reads the active tab to decide whether the IP pool and
/// anomaly log are worth fetching, so this type lives in core rather
/// than the TUI crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Dashboard, // 1
    Config, // 2
    Ips,    // 3
    Logs,   // 4
}

impl Tab {
    /// All tabs in bar order.
    pub const ALL: [Tab; 4] = [Self::Dashboard, Self::Config, Self::Ips, Self::Logs];

    /// Numeric key (1-4) for this tab.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Config => 2,
            Self::Ips => 3,
            Self::Logs => 4,
        }
    }

    /// Tab from a numeric key (1-4). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dashboard),
            2 => Some(Self::Config),
            3 => Some(Self::Ips),
            4 => Some(Self::Logs),
            _ => None,
        }
    }

    /// Next tab in bar order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous tab in bar order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Config => "Config",
            Self::Ips => "IPs",
            Self::Logs => "Logs",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_number(tab.number()), Some(tab));
        }
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(5), None);
    }

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(Tab::Logs.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Logs);
        assert_eq!(Tab::Config.next(), Tab::Ips);
        assert_eq!(Tab::Ips.prev(), Tab::Config);
    }
}
