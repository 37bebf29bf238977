//! IPs screen — pool table with add form, toggle, and confirmed delete.
//!
//! The table is keyed by address: the poll loop replaces the whole list
//! every cycle, so the selection is remembered as an address and
//! re-located in the fresh list at render time instead of trusting a
//! positional index.

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use vulpini_core::StateStore;

use crate::action::{Action, ConfirmAction};
use crate::component::Screen;
use crate::dispatch;
use crate::theme::Theme;
use crate::widgets::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FormField {
    #[default]
    Address,
    Port,
    Country,
    Isp,
}

impl FormField {
    const ALL: [FormField; 4] = [Self::Address, Self::Port, Self::Country, Self::Isp];

    fn label(self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::Port => "Port",
            Self::Country => "Country",
            Self::Isp => "ISP",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Add-IP form state. Exists only while the form is open; closing the
/// form (submit or cancel) drops the typed values.
#[derive(Default)]
struct AddIpForm {
    field: FormField,
    address: Input,
    port: Input,
    country: Input,
    isp: Input,
    error: Option<String>,
}

impl AddIpForm {
    fn active_mut(&mut self) -> &mut Input {
        match self.field {
            FormField::Address => &mut self.address,
            FormField::Port => &mut self.port,
            FormField::Country => &mut self.country,
            FormField::Isp => &mut self.isp,
        }
    }

    fn input(&self, field: FormField) -> &Input {
        match field {
            FormField::Address => &self.address,
            FormField::Port => &self.port,
            FormField::Country => &self.country,
            FormField::Isp => &self.isp,
        }
    }
}

pub struct IpsScreen {
    /// Address of the selected row; survives wholesale list replacement.
    selected: Option<String>,
    form: Option<AddIpForm>,
}

impl IpsScreen {
    pub fn new() -> Self {
        Self { selected: None, form: None }
    }

    /// Index of the selected address in the current list, clamped to
    /// the first row when the address is gone.
    fn selected_index(&self, store: &StateStore) -> Option<usize> {
        if store.ips.is_empty() {
            return None;
        }
        let found = self
            .selected
            .as_deref()
            .and_then(|addr| store.ips.iter().position(|ip| ip.address == addr));
        Some(found.unwrap_or(0))
    }

    fn move_selection(&mut self, store: &StateStore, delta: isize) {
        let Some(current) = self.selected_index(store) else {
            return;
        };
        #[allow(clippy::cast_possible_wrap)]
        let last = (store.ips.len() - 1) as isize;
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let next = (current as isize + delta).clamp(0, last) as usize;
        self.selected = Some(store.ips[next].address.clone());
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                None
            }
            KeyCode::Enter => {
                let result = dispatch::validate_new_ip(
                    form.address.value(),
                    form.port.value(),
                    form.country.value(),
                    form.isp.value(),
                );
                match result {
                    Ok(ip) => {
                        self.form = None;
                        Some(Action::SubmitAddIp(ip))
                    }
                    Err(message) => {
                        form.error = Some(message);
                        None
                    }
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                form.field = form.field.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.field = form.field.prev();
                None
            }
            _ => {
                form.active_mut().handle_event(&CrosstermEvent::Key(key));
                form.error = None;
                None
            }
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, store: &StateStore, theme: &Theme) {
        let title = format!(" IP pool ({}) ", store.ips.len());
        let block = Block::default()
            .title(title)
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if store.ips.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "  pool is empty, press a to add a node",
                Style::default().fg(theme.muted),
            )));
            frame.render_widget(empty, inner);
            return;
        }

        let header = Row::new(vec![
            "Address", "Port", "Country", "ISP", "Latency", "Status", "Enabled", "Uses",
        ])
        .style(theme.table_header());

        let rows: Vec<Row> = store
            .ips
            .iter()
            .map(|ip| {
                let row_style = if ip.enabled {
                    theme.table_row()
                } else {
                    Style::default().fg(theme.muted).add_modifier(Modifier::DIM)
                };
                let latency = if ip.latency_ms > 0.0 {
                    fmt::fmt_latency(ip.latency_ms)
                } else {
                    fmt::fmt_latency(ip.avg_latency_ms)
                };
                Row::new(vec![
                    Cell::from(ip.address.clone()),
                    Cell::from(ip.port.to_string()),
                    Cell::from(ip.country.clone().unwrap_or_else(|| "-".to_owned())),
                    Cell::from(ip.isp.clone().unwrap_or_else(|| "-".to_owned())),
                    Cell::from(latency),
                    Cell::from(ip.status.to_string())
                        .style(Style::default().fg(theme.node_health_color(&ip.status))),
                    Cell::from(if ip.enabled { "yes" } else { "no" }),
                    Cell::from(fmt::fmt_count(ip.total_uses.max(ip.use_count))),
                ])
                .style(row_style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(16),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Min(6),
            ],
        )
        .header(header)
        .row_highlight_style(theme.table_selected())
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(self.selected_index(store));
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(form) = &self.form else { return };

        let block = Block::default()
            .title(" Add IP ")
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        for field in FormField::ALL {
            let label_style = if field == form.field {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<8}: ", field.label()), label_style),
                Span::styled(form.input(field).value().to_owned(), theme.table_row()),
            ]));
        }

        lines.push(match &form.error {
            Some(message) => Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(theme.error),
            )),
            None => Line::from(""),
        });

        lines.push(Line::from(vec![
            Span::styled("  Enter ", theme.key_hint_key()),
            Span::styled("submit  ", theme.key_hint()),
            Span::styled("Tab ", theme.key_hint_key()),
            Span::styled("next field  ", theme.key_hint()),
            Span::styled("Esc ", theme.key_hint_key()),
            Span::styled("cancel", theme.key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);

        // Cursor on the active input.
        let row = FormField::ALL
            .iter()
            .position(|&f| f == form.field)
            .unwrap_or(0);
        #[allow(clippy::cast_possible_truncation)]
        let cursor_x = inner.x + 12 + form.input(form.field).visual_cursor() as u16;
        let cursor_y = inner.y + row as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), cursor_y));
    }
}

impl Screen for IpsScreen {
    fn handle_key(&mut self, key: KeyEvent, store: &StateStore) -> Option<Action> {
        if self.form.is_some() {
            return self.handle_form_key(key);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(store, 1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(store, -1);
                None
            }
            KeyCode::Char('a') => {
                self.form = Some(AddIpForm::default());
                None
            }
            KeyCode::Char('e') => {
                let idx = self.selected_index(store)?;
                Some(Action::RequestToggleIp(store.ips[idx].address.clone()))
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let idx = self.selected_index(store)?;
                Some(Action::ShowConfirm(ConfirmAction::DeleteIp {
                    address: store.ips[idx].address.clone(),
                }))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, store: &StateStore, theme: &Theme) {
        let form_height = if self.form.is_some() { 9 } else { 0 };
        let layout = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(form_height),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_table(frame, layout[0], store, theme);
        if self.form.is_some() {
            self.render_form(frame, layout[1], theme);
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme.key_hint_key()),
            Span::styled("select  ", theme.key_hint()),
            Span::styled("a ", theme.key_hint_key()),
            Span::styled("add  ", theme.key_hint()),
            Span::styled("e ", theme.key_hint_key()),
            Span::styled("enable/disable  ", theme.key_hint()),
            Span::styled("d ", theme.key_hint_key()),
            Span::styled("delete", theme.key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn wants_input(&self) -> bool {
        self.form.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use vulpini_api::IpRecord;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn store_with(addresses: &[&str]) -> StateStore {
        let mut store = StateStore::new();
        store.apply_ips(
            addresses
                .iter()
                .map(|a| IpRecord { address: (*a).to_owned(), ..IpRecord::default() })
                .collect(),
        );
        store
    }

    #[test]
    fn selection_survives_list_replacement_by_address() {
        let mut screen = IpsScreen::new();
        let mut store = store_with(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        screen.move_selection(&store, 1);
        assert_eq!(screen.selected.as_deref(), Some("10.0.0.2"));

        // The list is replaced wholesale and the row moves position.
        store = store_with(&["10.0.0.2", "10.0.0.9"]);
        assert_eq!(screen.selected_index(&store), Some(0));

        // A vanished address falls back to the first row.
        store = store_with(&["10.0.0.7"]);
        assert_eq!(screen.selected_index(&store), Some(0));
    }

    #[test]
    fn delete_key_asks_for_confirmation_first() {
        let mut screen = IpsScreen::new();
        let store = store_with(&["10.0.0.1"]);

        let action = screen.handle_key(key(KeyCode::Char('d')), &store);

        assert_eq!(
            action,
            Some(Action::ShowConfirm(ConfirmAction::DeleteIp {
                address: "10.0.0.1".to_owned()
            }))
        );
    }

    #[test]
    fn submitting_an_empty_address_stays_in_the_form() {
        let mut screen = IpsScreen::new();
        let store = store_with(&[]);
        screen.handle_key(key(KeyCode::Char('a')), &store);

        let action = screen.handle_key(key(KeyCode::Enter), &store);

        assert_eq!(action, None);
        let form = screen.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("address is required"));
    }

    #[test]
    fn valid_form_submits_and_closes() {
        let mut screen = IpsScreen::new();
        let store = store_with(&[]);
        screen.handle_key(key(KeyCode::Char('a')), &store);
        for c in "10.0.0.4".chars() {
            screen.handle_key(key(KeyCode::Char(c)), &store);
        }

        let action = screen.handle_key(key(KeyCode::Enter), &store);

        match action {
            Some(Action::SubmitAddIp(ip)) => {
                assert_eq!(ip.address, "10.0.0.4");
                assert_eq!(ip.port, dispatch::DEFAULT_PORT);
            }
            other => panic!("expected SubmitAddIp, got {other:?}"),
        }
        assert!(screen.form.is_none());
    }
}
