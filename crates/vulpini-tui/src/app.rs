//! Application core — event loop, tab management, action processing.
//!
//! Two repaint strategies, chosen by trigger. Structural changes (tab
//! switch, theme or running toggle, resize, overlay open/close) request
//! a full rebuild: the terminal buffer is cleared and the frame redrawn
//! from scratch. Poll-driven data refresh on an unchanged tab requests a
//! targeted patch: a plain draw that diffs against the previous buffer,
//! leaving selection and scroll state untouched. Everything funnels
//! through one action queue, so store writes are serialized in arrival
//! order and the last write to a field wins.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use vulpini_api::MonitorClient;
use vulpini_core::{MonitorConfig, PollEvent, PollPhase, Poller, StateStore, Tab};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::bridge::spawn_poll_bridge;
use crate::component::Screen;
use crate::dispatch;
use crate::event::{Event, EventReader};
use crate::screens::create_screens;
use crate::theme::Theme;
use crate::tui::Tui;

/// How long a toast stays up before the tick loop clears it.
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Repaint requested by the actions processed this iteration. Requests
/// only escalate: a patch never downgrades a pending full rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Repaint {
    None,
    Patch,
    Full,
}

impl Repaint {
    fn bump(&mut self, other: Repaint) {
        if other > *self {
            *self = other;
        }
    }
}

/// Top-level application state and event loop.
pub struct App {
    config: MonitorConfig,
    client: MonitorClient,
    store: StateStore,
    theme: Theme,
    screens: HashMap<Tab, Box<dyn Screen>>,
    running: bool,
    help_visible: bool,
    confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Publishes the active tab to the poll loop (tab-gated fetches).
    tab_tx: watch::Sender<Tab>,
    phase: watch::Receiver<PollPhase>,
    cancel: CancellationToken,
    poller: Option<Poller>,
    poll_rx: Option<mpsc::UnboundedReceiver<PollEvent>>,
}

impl App {
    pub fn new(client: MonitorClient, config: MonitorConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (tab_tx, tab_rx) = watch::channel(Tab::default());
        let (poll_tx, poll_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let (poller, phase) = Poller::new(
            client.clone(),
            config.poll_interval(),
            tab_rx,
            poll_tx,
            cancel.clone(),
        );

        let mut store = StateStore::new();
        store.set_theme(!config.light_mode);
        let theme = Theme::for_mode(store.view.dark_mode);
        let screens = create_screens(&config);

        Self {
            config,
            client,
            store,
            theme,
            screens,
            running: true,
            help_visible: false,
            confirm: None,
            notification: None,
            action_tx,
            action_rx,
            tab_tx,
            phase,
            cancel,
            poller: Some(poller),
            poll_rx: Some(poll_rx),
        }
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        if let Some(poller) = self.poller.take() {
            poller.start();
        }
        if let Some(poll_rx) = self.poll_rx.take() {
            spawn_poll_bridge(poll_rx, self.action_tx.clone());
        }

        let mut events = EventReader::new(Duration::from_millis(250));
        info!("monitor event loop started");

        tui.draw(|frame| self.render_frame(frame))?;

        while self.running {
            let mut repaint = Repaint::None;

            tokio::select! {
                maybe_event = events.next() => {
                    let Some(event) = maybe_event else { break };
                    match event {
                        Event::Key(key) => {
                            if let Some(action) = self.handle_key(key) {
                                self.process(action, &mut repaint);
                            }
                        }
                        Event::Resize(w, h) => self.process(Action::Resize(w, h), &mut repaint),
                        Event::Tick => self.process(Action::Tick, &mut repaint),
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.process(action, &mut repaint);
                }
            }

            // Drain whatever else queued up before painting once.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process(action, &mut repaint);
            }

            match repaint {
                Repaint::Full => {
                    tui.terminal.clear()?;
                    tui.draw(|frame| self.render_frame(frame))?;
                }
                Repaint::Patch => tui.draw(|frame| self.render_frame(frame))?,
                Repaint::None => {}
            }
        }

        self.cancel.cancel();
        events.stop();
        tui.exit()?;
        info!("monitor event loop ended");
        Ok(())
    }

    // ── Input routing ────────────────────────────────────────────────

    /// Map a key event to an action. Precedence: modal text input,
    /// confirm dialog, help overlay, global keys, active screen.
    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let active = self.store.view.active_tab;
        let wants_input = self
            .screens
            .get(&active)
            .is_some_and(|screen| screen.wants_input());
        if wants_input {
            let store = &self.store;
            return self
                .screens
                .get_mut(&active)
                .and_then(|screen| screen.handle_key(key, store));
        }

        if self.confirm.is_some() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::ToggleHelp),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('s') => Some(Action::ToggleRunning),
            KeyCode::Char(c @ '1'..='4') => Tab::from_number(c as u8 - b'0').map(Action::SwitchTab),
            KeyCode::Tab => Some(Action::SwitchTab(active.next())),
            KeyCode::BackTab => Some(Action::SwitchTab(active.prev())),
            _ => {
                let store = &self.store;
                self.screens
                    .get_mut(&active)
                    .and_then(|screen| screen.handle_key(key, store))
            }
        }
    }

    // ── Action processing ────────────────────────────────────────────

    fn process(&mut self, action: Action, repaint: &mut Repaint) {
        let active = self.store.view.active_tab;
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                let expired = self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() >= NOTIFICATION_TTL);
                if expired {
                    self.notification = None;
                    repaint.bump(Repaint::Patch);
                }
            }

            Action::Resize(..) => repaint.bump(Repaint::Full),

            Action::SwitchTab(tab) => {
                if tab != active {
                    debug!("switching tab: {active} -> {tab}");
                    self.store.set_tab(tab);
                    let _ = self.tab_tx.send(tab);
                    repaint.bump(Repaint::Full);
                }
            }

            Action::ToggleTheme => {
                self.store.set_theme(!self.store.view.dark_mode);
                self.theme = Theme::for_mode(self.store.view.dark_mode);
                repaint.bump(Repaint::Full);
            }

            // Advisory only: the next health probe overwrites it with
            // the backend's own answer.
            Action::ToggleRunning => {
                self.store.set_running(!self.store.view.running);
                repaint.bump(Repaint::Full);
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
                repaint.bump(Repaint::Full);
            }

            // Poll results are always applied, even for a hidden tab,
            // so the data is fresh when the user switches back. Only
            // the visible tab earns a repaint.
            Action::HealthUpdated(health) => self.store.apply_health(health),
            Action::StatsUpdated(stats) => self.store.apply_stats(stats),
            Action::IpsUpdated(ips) => {
                self.store.apply_ips(ips);
                if active == Tab::Ips {
                    repaint.bump(Repaint::Patch);
                }
            }
            Action::AnomaliesUpdated(anomalies) => {
                self.store.apply_anomalies(anomalies);
                if active == Tab::Logs {
                    repaint.bump(Repaint::Patch);
                }
            }
            Action::PollCycleFinished => repaint.bump(Repaint::Patch),

            Action::SubmitAddIp(ip) => {
                let client = self.client.clone();
                self.spawn_dispatch(async move { dispatch::add_ip(&client, ip).await });
            }

            Action::RequestDeleteIp(address) => {
                self.confirm = Some(ConfirmAction::DeleteIp { address });
                repaint.bump(Repaint::Patch);
            }

            Action::RequestToggleIp(address) => {
                let client = self.client.clone();
                self.spawn_dispatch(async move { dispatch::toggle_ip(&client, &address).await });
            }

            Action::RequestReload => {
                let client = self.client.clone();
                self.spawn_dispatch(async move { dispatch::reload_config(&client).await });
            }

            Action::ShowConfirm(confirm) => {
                self.confirm = Some(confirm);
                repaint.bump(Repaint::Patch);
            }

            Action::ConfirmYes => {
                if let Some(ConfirmAction::DeleteIp { address }) = self.confirm.take() {
                    let client = self.client.clone();
                    self.spawn_dispatch(
                        async move { dispatch::delete_ip(&client, &address).await },
                    );
                }
                repaint.bump(Repaint::Full);
            }

            Action::ConfirmNo => {
                self.confirm = None;
                repaint.bump(Repaint::Full);
            }

            Action::Notify(notification) => {
                self.notification = Some((notification, Instant::now()));
                repaint.bump(Repaint::Patch);
            }
        }
    }

    /// Run a dispatcher operation in the background, forwarding its
    /// resulting actions into the queue.
    fn spawn_dispatch<F>(&self, operation: F)
    where
        F: Future<Output = Vec<Action>> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            for action in operation.await {
                if tx.send(action).is_err() {
                    break;
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_frame(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.background).fg(self.theme.text)),
            area,
        );

        let layout = Layout::vertical([
            Constraint::Min(1),    // screen content
            Constraint::Length(1), // tab bar
            Constraint::Length(1), // status bar
        ])
        .split(area);

        let active = self.store.view.active_tab;
        let theme = self.theme;
        let store = &self.store;
        if let Some(screen) = self.screens.get_mut(&active) {
            screen.render(frame, layout[0], store, &theme);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some(confirm) = &self.confirm {
            Self::render_confirm_overlay(frame, area, confirm, &theme);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area, &theme);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.store.view.active_tab;
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|&tab| {
                let style = if tab == active {
                    self.theme.tab_active()
                } else {
                    self.theme.tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", tab.number(), tab.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", self.theme.key_hint()))
            .select(Tab::ALL.iter().position(|&t| t == active).unwrap_or(0));

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = if self.store.view.running {
            Span::styled(
                format!("● {}", self.store.status_label),
                Style::default().fg(self.theme.success),
            )
        } else {
            Span::styled(
                format!("○ {}", self.store.status_label),
                Style::default().fg(self.theme.error),
            )
        };

        let phase = *self.phase.borrow();
        let mut spans = vec![
            Span::raw(" "),
            indicator,
            Span::styled(
                format!(
                    "  {} · every {}ms",
                    phase.label(),
                    self.config.poll_interval_ms
                ),
                self.theme.key_hint(),
            ),
        ];

        if let Some((notification, _)) = &self.notification {
            let color = match notification.level {
                NotificationLevel::Info => self.theme.info,
                NotificationLevel::Success => self.theme.success,
                NotificationLevel::Warning => self.theme.warning,
                NotificationLevel::Error => self.theme.error,
            };
            spans.push(Span::styled(
                format!("  │ {}", notification.message),
                Style::default().fg(color),
            ));
        } else {
            spans.push(Span::styled("  │ ? help  q quit", self.theme.key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_confirm_overlay(frame: &mut Frame, area: Rect, confirm: &ConfirmAction, theme: &Theme) {
        let prompt = confirm.to_string();
        #[allow(clippy::cast_possible_truncation)]
        let width = (prompt.len() as u16 + 6).min(area.width.saturating_sub(4));
        let overlay = centered(area, width, 5);

        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(Style::default().fg(theme.warning))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.warning))
            .style(Style::default().bg(theme.surface));

        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let lines = vec![
            Line::from(Span::styled(
                format!(" {prompt}"),
                Style::default().fg(theme.text),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", theme.key_hint_key()),
                Span::styled("delete   ", theme.key_hint()),
                Span::styled("n ", theme.key_hint_key()),
                Span::styled("cancel", theme.key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
        let overlay = centered(area, 46, 15);

        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .title(" Help ")
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_focused())
            .style(Style::default().bg(theme.surface));

        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let entry = |keys: &'static str, help: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), theme.key_hint_key()),
                Span::styled(help, Style::default().fg(theme.text)),
            ])
        };

        let lines = vec![
            Line::from(""),
            entry("1-4", "switch tab"),
            entry("Tab/S-Tab", "next / previous tab"),
            entry("t", "toggle dark/light theme"),
            entry("s", "toggle running flag (view only)"),
            entry("j/k", "move selection / scroll"),
            entry("a", "add IP (IPs tab)"),
            entry("e", "enable/disable IP (IPs tab)"),
            entry("d", "delete IP (IPs tab)"),
            entry("r", "reload proxy config (Config tab)"),
            entry("Space", "pause/follow log (Logs tab)"),
            entry("?", "toggle this help"),
            entry("q", "quit"),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Center a `width` x `height` box inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repaint_requests_only_escalate() {
        let mut repaint = Repaint::None;
        repaint.bump(Repaint::Patch);
        assert_eq!(repaint, Repaint::Patch);
        repaint.bump(Repaint::Full);
        assert_eq!(repaint, Repaint::Full);
        repaint.bump(Repaint::Patch);
        assert_eq!(repaint, Repaint::Full);
    }

    #[test]
    fn centered_box_is_clamped_to_the_area() {
        let area = Rect::new(0, 0, 20, 10);
        let overlay = centered(area, 100, 100);
        assert_eq!(overlay, area);

        let overlay = centered(area, 10, 4);
        assert_eq!(overlay, Rect::new(5, 3, 10, 4));
    }
}
