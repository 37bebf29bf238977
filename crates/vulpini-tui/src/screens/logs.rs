//! Logs screen — anomaly list, newest first, with pause-and-scroll.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use vulpini_core::StateStore;

use crate::action::Action;
use crate::component::Screen;
use crate::theme::Theme;
use crate::widgets::fmt;

pub struct LogsScreen {
    /// While following, the view sticks to the newest entry. Scrolling
    /// is only meaningful when paused.
    follow: bool,
    /// Offset into the list, 0 = newest.
    scroll_offset: usize,
}

impl LogsScreen {
    pub fn new() -> Self {
        Self { follow: true, scroll_offset: 0 }
    }
}

impl Screen for LogsScreen {
    fn handle_key(&mut self, key: KeyEvent, store: &StateStore) -> Option<Action> {
        let last = store.anomalies.len().saturating_sub(1);
        match key.code {
            KeyCode::Char(' ') => {
                self.follow = !self.follow;
                if self.follow {
                    self.scroll_offset = 0;
                }
            }
            KeyCode::Char('j') | KeyCode::Down if !self.follow => {
                self.scroll_offset = (self.scroll_offset + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up if !self.follow => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Char('g') if !self.follow => {
                self.scroll_offset = 0;
            }
            KeyCode::Char('G') if !self.follow => {
                self.scroll_offset = last;
            }
            _ => {}
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, store: &StateStore, theme: &Theme) {
        let live = if self.follow {
            Span::styled("● LIVE", Style::default().fg(theme.success))
        } else {
            Span::styled("PAUSED", Style::default().fg(theme.warning))
        };

        let block = Block::default()
            .title(format!(" Anomalies ({}) ", store.anomalies.len()))
            .title_style(theme.title())
            .title_top(Line::from(live).right_aligned())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // entries
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let visible = layout[0].height.saturating_sub(1) as usize;
        let offset = if self.follow { 0 } else { self.scroll_offset };

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("  Time      ", theme.table_header()),
            Span::styled("Sev     ", theme.table_header()),
            Span::styled("Type           ", theme.table_header()),
            Span::styled("Value/Thresh     ", theme.table_header()),
            Span::styled("Description", theme.table_header()),
        ]));

        let msg_width = usize::from(layout[0].width.saturating_sub(52).max(12));
        for event in store.anomalies.iter().skip(offset).take(visible) {
            let color = theme.severity_color(&event.severity);
            let description: String = event.description.chars().take(msg_width).collect();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<10}", fmt::fmt_anomaly_time(event.timestamp)),
                    Style::default().fg(theme.warning),
                ),
                Span::styled(format!("{:<8}", event.severity.as_str()), Style::default().fg(color)),
                Span::styled(
                    format!("{:<15}", event.kind.label()),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!("{:>7.1}/{:<8.1} ", event.value, event.threshold),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(description, Style::default().fg(color)),
            ]));
        }

        if store.anomalies.is_empty() {
            lines.push(Line::from(Span::styled(
                "  no anomalies detected",
                Style::default().fg(theme.muted),
            )));
        }

        frame.render_widget(Paragraph::new(lines), layout[0]);

        let hints = Line::from(vec![
            Span::styled("  Space ", theme.key_hint_key()),
            Span::styled("pause/follow  ", theme.key_hint()),
            Span::styled("j/k ", theme.key_hint_key()),
            Span::styled("scroll (paused)  ", theme.key_hint()),
            Span::styled("g/G ", theme.key_hint_key()),
            Span::styled("newest/oldest", theme.key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}
