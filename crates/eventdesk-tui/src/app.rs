//! Application loop: key routing, background requests, and overlays.
//!
//! Network work is spawned onto tokio tasks that report back as actions, so
//! the loop never blocks on the event service.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use eventdesk_core::{Command, Controller, ModalTab, SaveOutcome};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::{EditModalScreen, EventsScreen};
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    running: bool,
    help_visible: bool,
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    events: EventsScreen,
    /// Open edit dialog. Dropping it discards its drafts.
    editor: Option<EditModalScreen>,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    /// Bumped per list fetch; older responses are dropped on arrival.
    events_generation: u64,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            help_visible: false,
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            controller,
            events: EventsScreen::new(),
            editor: None,
            pending_confirm: None,
            notification: None,
            events_generation: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        self.action_tx.send(Action::RefreshEvents)?;
        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Overlays capture input first, then
    /// the edit dialog, then global keys, then the events screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // The dialog takes every other key, since text fields need q and ?
        if let Some(editor) = self.editor.as_mut() {
            return editor.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => Ok(Some(Action::Quit)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                Ok(Some(Action::ToggleHelp))
            }
            _ => self.events.handle_key_event(key),
        }
    }

    /// Apply one action to app state, spawning network work where needed.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => self.terminal_size = (*w, *h),
            Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() >= NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.forward(action)?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::DismissNotification => self.notification = None,

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::RefreshEvents => {
                self.forward(action)?;
                self.events_generation += 1;
                self.fetch_events(self.events_generation);
            }
            Action::EventsLoaded { generation, .. } if *generation != self.events_generation => {
                debug!(
                    generation,
                    latest = self.events_generation,
                    "dropping stale event list"
                );
            }
            Action::EventsLoaded { .. } => self.forward(action)?,

            Action::OpenEditor(event) => {
                debug!(event_id = %event.id, "opening editor");
                self.editor = Some(EditModalScreen::new(event.clone()));
                self.fetch_tickets(event.id.clone());
            }
            Action::CloseEditor => self.editor = None,
            Action::TicketsLoaded { .. } => self.forward(action)?,

            Action::ExecuteSave { tab, command } => self.execute_save(*tab, command.clone()),
            Action::SaveFinished {
                event_id,
                tab,
                result,
            } => {
                let outcome = match self.editor.as_mut() {
                    Some(editor) if editor.event_id() == event_id => {
                        Some(editor.finish_save(*tab, result.clone()))
                    }
                    _ => None,
                };
                match outcome {
                    Some(SaveOutcome::Saved { message, close }) => {
                        self.notification = Some((Notification::success(message), Instant::now()));
                        if close {
                            self.editor = None;
                        }
                        self.action_tx.send(Action::RefreshEvents)?;
                    }
                    Some(SaveOutcome::Failed { message }) => {
                        self.notification = Some((Notification::error(message), Instant::now()));
                    }
                    // The dialog is gone; still resync the list on success
                    None => {
                        if result.is_ok() {
                            self.action_tx.send(Action::RefreshEvents)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Let both screens see an action; queue whatever they return.
    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.events.update(action)? {
            debug!(component = self.events.id(), ?follow_up, "follow-up action");
            self.action_tx.send(follow_up)?;
        }
        if let Some(editor) = self.editor.as_mut() {
            if let Some(follow_up) = editor.update(action)? {
                debug!(component = editor.id(), ?follow_up, "follow-up action");
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Background work ─────────────────────────────────────────

    fn fetch_events(&self, generation: u64) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = controller.list_events().await;
            if let Err(ref e) = result {
                warn!(error = %e, generation, "event list fetch failed");
            }
            let _ = tx.send(Action::EventsLoaded { generation, result });
        });
    }

    fn fetch_tickets(&self, event_id: String) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = controller.ticket_details(&event_id).await;
            if let Err(ref e) = result {
                warn!(error = %e, %event_id, "ticket details fetch failed");
            }
            let _ = tx.send(Action::TicketsLoaded { event_id, result });
        });
    }

    fn execute_save(&self, tab: ModalTab, command: Command) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let event_id = command.event_id().to_owned();
            let result = controller.execute(command).await;
            match &result {
                Ok(_) => info!(%event_id, %tab, "save completed"),
                Err(e) => warn!(error = %e, %event_id, %tab, "save failed"),
            }
            let _ = tx.send(Action::SaveFinished {
                event_id,
                tab,
                result,
            });
        });
    }

    /// Run a confirmed action; success re-fetches the list.
    fn execute_confirm(&self, confirm: ConfirmAction) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match confirm {
                ConfirmAction::DeleteEvent { id, name } => {
                    match controller.execute(Command::DeleteEvent { event_id: id.clone() }).await {
                        Ok(_) => {
                            info!(event_id = %id, "event deleted");
                            let _ = tx.send(Action::Notify(Notification::success(format!(
                                "Deleted {name}"
                            ))));
                            let _ = tx.send(Action::RefreshEvents);
                        }
                        Err(e) => {
                            warn!(error = %e, event_id = %id, "delete failed");
                            let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                        }
                    }
                }
            }
        });
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),    // screen content
            Constraint::Length(1), // status bar
        ])
        .split(area);

        self.events.render(frame, layout[0]);
        if let Some(ref editor) = self.editor {
            editor.render(frame, layout[0]);
        }
        self.render_status_bar(frame, layout[1]);

        // Overlays: last = topmost
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let config = self.controller.config();
        let host = config.url.host_str().unwrap_or("?");
        let line = Line::from(vec![
            Span::styled(" ● ", Style::default().fg(theme::GREEN)),
            Span::styled(config.organiser_id.clone(), Style::default().fg(theme::CYAN)),
            Span::styled(format!(" @ {host}"), theme::key_hint()),
            Span::styled(" │ ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let width = 60u16.min(area.width.saturating_sub(4));
        let height = 24u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::CYAN)))
        };
        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            section("Events"),
            key("j/k ↑/↓", "Move up/down"),
            key("g/G", "Top / bottom"),
            key("t", "Cycle type filter"),
            key("s", "Cycle status filter"),
            key("c", "Clear filters"),
            key("Enter", "Show all fields"),
            key("e", "Edit (upcoming events)"),
            key("d", "Delete"),
            key("r", "Refresh / retry"),
            Line::from(""),
            section("Edit dialog"),
            key("Tab", "Next tab"),
            key("Enter", "Edit field / toggle yes-no"),
            key("Ctrl-s", "Save the current tab"),
            key("p a x", "Pricing, add / remove tier"),
            key("Esc", "Close (twice with unsaved edits)"),
            Line::from(""),
            key("?", "This help"),
            key("q", "Quit"),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let width = 60u16.min(area.width.saturating_sub(4));
        let height = 8u16.min(area.height);
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, dialog_area);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::YELLOW))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!(" {confirm}"),
                Style::default().fg(theme::TEXT),
            )),
            Line::from(Span::styled(format!(" {}", confirm.warning()), theme::error_text())),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(7).clamp(20, 70).min(area.width);
        let height = 3u16.min(area.height);

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 1);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::GREEN, "✓"),
            NotificationLevel::Error => (theme::RED, "✗"),
            NotificationLevel::Info => (theme::CYAN, "·"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
