//! Config screen — read-only view of the effective monitor settings.
//!
//! Proxy configuration itself is edited out of band; this tab shows what
//! the monitor is running with and offers the hot-reload action.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use vulpini_core::{MonitorConfig, StateStore};

use crate::action::Action;
use crate::component::Screen;
use crate::theme::Theme;

pub struct ConfigScreen {
    config: MonitorConfig,
}

impl ConfigScreen {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    fn setting<'a>(label: &'a str, value: String, theme: &Theme) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {label:<18}"), Style::default().fg(theme.muted)),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    }
}

impl Screen for ConfigScreen {
    fn handle_key(&mut self, key: KeyEvent, _store: &StateStore) -> Option<Action> {
        match key.code {
            KeyCode::Char('r') => Some(Action::RequestReload),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, store: &StateStore, theme: &Theme) {
        let block = Block::default()
            .title(" Monitor settings ")
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // settings
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let log_file = self.config.log_file.as_ref().map_or_else(
            || "(disabled)".to_owned(),
            |p| p.display().to_string(),
        );
        let mode = if store.view.dark_mode { "dark" } else { "light" };

        let lines = vec![
            Line::from(""),
            Self::setting("Endpoint", self.config.url.clone(), theme),
            Self::setting(
                "Poll interval",
                format!("{} ms (after each cycle)", self.config.poll_interval_ms),
                theme,
            ),
            Self::setting(
                "Request timeout",
                format!("{} s", self.config.request_timeout_secs),
                theme,
            ),
            Self::setting("Theme", mode.to_owned(), theme),
            Self::setting("Log file", log_file, theme),
            Line::from(""),
            Line::from(Span::styled(
                "  Proxy-side configuration is reloaded from the proxy's own file;",
                Style::default().fg(theme.muted),
            )),
            Line::from(Span::styled(
                "  nothing is edited from here.",
                Style::default().fg(theme.muted),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), layout[0]);

        let hints = Line::from(vec![
            Span::styled("  r ", theme.key_hint_key()),
            Span::styled("reload proxy config", theme.key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}
