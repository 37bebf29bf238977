//! Dashboard screen — stat cards over the traffic chart, the home tab.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use vulpini_core::StateStore;

use crate::action::Action;
use crate::chart;
use crate::component::Screen;
use crate::theme::Theme;
use crate::widgets::fmt;

pub struct DashboardScreen;

impl DashboardScreen {
    pub fn new() -> Self {
        Self
    }

    fn render_card(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        value: String,
        accent: Color,
        theme: &Theme,
    ) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(Style::default().fg(theme.text))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = Line::from(Span::styled(
            value,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), inner);
    }

    fn render_down_banner(frame: &mut Frame, area: Rect, store: &StateStore, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.error));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = Line::from(vec![
            Span::styled("backend unavailable", Style::default().fg(theme.error)),
            Span::styled(
                format!("  ({})  retrying on the next poll", store.status_label),
                Style::default().fg(theme.muted),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), inner);
    }
}

impl Screen for DashboardScreen {
    fn handle_key(&mut self, _key: KeyEvent, _store: &StateStore) -> Option<Action> {
        // Dashboard has no screen-specific keys beyond globals.
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, store: &StateStore, theme: &Theme) {
        let down = !store.view.running;
        let layout = Layout::vertical([
            Constraint::Length(if down { 3 } else { 0 }),
            Constraint::Length(3), // first card row
            Constraint::Length(3), // second card row
            Constraint::Min(8),    // chart
        ])
        .split(area);

        if down {
            Self::render_down_banner(frame, layout[0], store, theme);
        }

        let stats = &store.stats;
        let error_color = if stats.error_rate < 0.01 {
            theme.success
        } else if stats.error_rate < 0.05 {
            theme.warning
        } else {
            theme.error
        };

        let top = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(layout[1]);
        Self::render_card(
            frame,
            top[0],
            "Requests",
            fmt::fmt_count(stats.total_requests),
            theme.highlight,
            theme,
        );
        Self::render_card(
            frame,
            top[1],
            "Req/s",
            format!("{:.1}", stats.requests_per_second),
            theme.accent,
            theme,
        );
        Self::render_card(
            frame,
            top[2],
            "Connections",
            stats.active_connections.to_string(),
            theme.info,
            theme,
        );
        Self::render_card(
            frame,
            top[3],
            "Error rate",
            fmt::fmt_percent(stats.error_rate),
            error_color,
            theme,
        );

        let bottom = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(layout[2]);
        Self::render_card(
            frame,
            bottom[0],
            "Avg latency",
            fmt::fmt_latency(stats.avg_latency_ms),
            theme.info,
            theme,
        );
        Self::render_card(
            frame,
            bottom[1],
            "Throughput",
            fmt::fmt_rate(stats.bytes_per_second),
            theme.highlight,
            theme,
        );
        Self::render_card(
            frame,
            bottom[2],
            "Bytes in",
            fmt::fmt_bytes(stats.total_bytes_in),
            theme.text,
            theme,
        );
        Self::render_card(
            frame,
            bottom[3],
            "Bytes out",
            fmt::fmt_bytes(stats.total_bytes_out),
            theme.text,
            theme,
        );

        chart::render(frame, layout[3], &store.traffic, theme);
    }
}
