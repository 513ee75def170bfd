//! Application loop for the TUI.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::info;

use crate::app::catalog::{Catalog, LoadState};
use crate::app::fetch::{FetchHandle, FetchOutcome};
use crate::domain::model::Munro;
use crate::infra::api::MunroApi;
use crate::infra::config::Config;
use crate::ui::components::detail::Detail;
use crate::ui::components::munro_list::{MunroList, MunroListState};

/// Primary entry point for running the interactive TUI.
///
/// Sole owner of mutable state: the load-state machine, the list state, and
/// the current selection. State changes happen only through the fetch
/// outcome and key handlers, both driven from the single event loop.
pub struct UiApp {
    config: Config,
    api: MunroApi,
    load: LoadState,
    list: MunroListState,
    list_component: MunroList,
    detail_component: Detail,
    selected: Option<Munro>,
    fetch: Option<FetchHandle>,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl UiApp {
    /// Build the app from configuration. No fetch is issued until [`run`]
    /// (or an explicit outcome is applied).
    ///
    /// [`run`]: UiApp::run
    pub fn new(config: Config) -> Result<Self> {
        let api = MunroApi::new(&config)?;
        Ok(Self {
            config,
            api,
            load: LoadState::Loading,
            list: MunroListState::default(),
            list_component: MunroList,
            detail_component: Detail,
            selected: None,
            fetch: None,
            status: None,
            should_quit: false,
        })
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        self.bootstrap();

        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result
    }

    fn bootstrap(&mut self) {
        info!(url = self.api.url(), "starting munro browser");
        self.fetch = Some(FetchHandle::spawn(self.api.clone()));
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms.max(1));
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.should_quit {
                break;
            }

            if event::poll(tick_rate)? {
                let ev = event::read()?;
                self.handle_event(ev);
            }
        }
        Ok(())
    }

    /// The current selection, if the user has committed one.
    pub fn selected(&self) -> Option<&Munro> {
        self.selected.as_ref()
    }

    /// The container-level load state.
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Read access to the list state, mainly for assertions in tests.
    pub fn list_state(&self) -> &MunroListState {
        &self.list
    }

    /// Apply the outcome of the background fetch.
    pub fn apply_fetch_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Loaded(munros) => {
                self.list = MunroListState::from_munros(&munros);
                self.set_status(
                    StatusLevel::Info,
                    format!("{} munros loaded", munros.len()),
                );
                self.load = LoadState::Ready(Catalog::new(munros));
            }
            FetchOutcome::Failed(reason) => {
                self.set_status(StatusLevel::Error, reason.clone());
                self.load = LoadState::Failed { reason };
            }
        }
    }

    /// Render the whole frame: list pane, detail pane, status line.
    pub fn render(&self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(size);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(30)])
            .split(layout[0]);

        match &self.load {
            LoadState::Loading => {
                render_pane_message(
                    frame,
                    main_chunks[0],
                    "Munros",
                    "Fetching munros…",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                );
            }
            LoadState::Failed { reason } => {
                let message = format!(
                    "Failed to load munros: {reason}\n\npress {} to retry",
                    self.config.keybindings.retry
                );
                render_pane_message(
                    frame,
                    main_chunks[0],
                    "Munros",
                    &message,
                    Style::default().fg(Color::Red),
                );
            }
            LoadState::Ready(_) => {
                self.list_component.render(
                    frame,
                    main_chunks[0],
                    &self.list,
                    self.selected.as_ref(),
                );
            }
        }

        self.detail_component
            .render(frame, main_chunks[1], self.selected.as_ref());

        self.render_status(frame, layout[1]);
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let line = match &self.status {
            Some(status) => {
                let style = match status.level {
                    StatusLevel::Info => Style::default().fg(Color::Gray),
                    StatusLevel::Success => Style::default().fg(Color::Green),
                    StatusLevel::Error => Style::default().fg(Color::Red),
                };
                Line::styled(status.text.clone(), style)
            }
            None => self.hints_line(),
        };
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
    }

    fn hints_line(&self) -> Line<'static> {
        let keys = &self.config.keybindings;
        let key_style = Style::default().fg(Color::Cyan);
        Line::from(vec![
            Span::styled(format!("{}/{}", keys.down, keys.up), key_style),
            Span::raw(" move · "),
            Span::styled(keys.select.clone(), key_style),
            Span::raw(" select · "),
            Span::styled(keys.filter.clone(), key_style),
            Span::raw(" filter · "),
            Span::styled("q", key_style),
            Span::raw(" quit"),
        ])
        .style(Style::default().fg(Color::Gray))
    }

    fn tick(&mut self) {
        if let Some(outcome) = self.fetch.as_ref().and_then(|handle| handle.poll()) {
            self.fetch = None;
            self.apply_fetch_outcome(outcome);
        }

        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Resize(..) => {}
            Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
    }

    /// Feed one key event through the container's state machine.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.list.is_filter_active() {
            self.handle_filter_input(key);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        let keys = self.config.keybindings.clone();
        match &self.load {
            LoadState::Loading => {}
            LoadState::Failed { .. } => {
                if binding_matches(&keys.retry, &key) {
                    self.retry_fetch();
                }
            }
            LoadState::Ready(_) => {
                if key.code == KeyCode::Down || binding_matches(&keys.down, &key) {
                    self.list.select_next();
                } else if key.code == KeyCode::Up || binding_matches(&keys.up, &key) {
                    self.list.select_previous();
                } else if binding_matches(&keys.select, &key) {
                    self.commit_selection();
                } else if binding_matches(&keys.filter, &key) {
                    self.list.begin_filter();
                }
            }
        }
    }

    fn handle_filter_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.list.end_filter();
            }
            KeyCode::Backspace => {
                self.list.pop_filter_char();
            }
            KeyCode::Char(ch) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.list.push_filter_char(ch);
                }
            }
            _ => {}
        }
    }

    /// Overwrite the selection with the record under the cursor. Repeating
    /// the same choice leaves the selection unchanged; there is no clear
    /// affordance.
    fn commit_selection(&mut self) {
        if let Some(munro) = self.list.selected_munro().cloned() {
            self.set_status(StatusLevel::Success, format!("Selected {}", munro.name));
            self.selected = Some(munro);
        }
    }

    fn retry_fetch(&mut self) {
        info!(url = self.api.url(), "retrying munro fetch");
        self.load = LoadState::Loading;
        self.set_status(StatusLevel::Info, "Retrying…");
        self.fetch = Some(FetchHandle::spawn(self.api.clone()));
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

fn render_pane_message(frame: &mut Frame<'_>, area: Rect, title: &str, text: &str, style: Style) {
    let block = Block::default().title(title.to_owned()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let paragraph = Paragraph::new(text.to_owned())
        .style(style)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn binding_matches(binding: &str, key: &KeyEvent) -> bool {
    let binding = binding.trim().to_ascii_lowercase();
    let (wants_ctrl, name) = match binding.strip_prefix("ctrl+") {
        Some(rest) => (true, rest.to_owned()),
        None => (false, binding),
    };
    if wants_ctrl != key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match name.as_str() {
        "enter" => key.code == KeyCode::Enter,
        "space" => key.code == KeyCode::Char(' '),
        "esc" => key.code == KeyCode::Esc,
        "tab" => key.code == KeyCode::Tab,
        "up" => key.code == KeyCode::Up,
        "down" => key.code == KeyCode::Down,
        "left" => key.code == KeyCode::Left,
        "right" => key.code == KeyCode::Right,
        name => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => key.code == KeyCode::Char(ch),
                _ => false,
            }
        }
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusLevel {
    Info,
    Success,
    Error,
}
