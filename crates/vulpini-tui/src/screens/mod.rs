//! Screen implementations. Each tab is one Screen.

pub mod config;
pub mod dashboard;
pub mod ips;
pub mod logs;

use std::collections::HashMap;

use vulpini_core::{MonitorConfig, Tab};

use crate::component::Screen;

/// Create the screen for every tab.
pub fn create_screens(config: &MonitorConfig) -> HashMap<Tab, Box<dyn Screen>> {
    let mut screens: HashMap<Tab, Box<dyn Screen>> = HashMap::new();
    screens.insert(Tab::Dashboard, Box::new(dashboard::DashboardScreen::new()));
    screens.insert(Tab::Config, Box::new(config::ConfigScreen::new(config.clone())));
    screens.insert(Tab::Ips, Box::new(ips::IpsScreen::new()));
    screens.insert(Tab::Logs, Box::new(logs::LogsScreen::new()));
    screens
}
