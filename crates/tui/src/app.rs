use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use apexdraft_core::{
    catalog::{Catalog, CatalogEvent, CatalogSync, ConstructorSort, DriverSort, OpenF1Client},
    models::{Constructor, Driver, DriverStats},
    storage::FileStore,
    DraftResult, DraftStore, MAX_CONSTRUCTORS, MAX_DRIVERS, TOTAL_BUDGET,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{error, info, warn};

use crate::banner;

const TICK_RATE: Duration = Duration::from_millis(250);
const TITLE: &str = "ApexDraft";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Red,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::LightRed,
        }
    }
}

impl Theme {
    /// Gauge colour for the share of budget already spent.
    fn budget_color(&self, spent_percent: f64) -> Color {
        if spent_percent > 90.0 {
            self.danger
        } else if spent_percent > 70.0 {
            self.warning
        } else {
            self.accent
        }
    }
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let hex = input.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Drivers,
    Constructors,
}

impl Tab {
    fn index(self) -> usize {
        match self {
            Tab::Drivers => 0,
            Tab::Constructors => 1,
        }
    }

    fn toggle(self) -> Self {
        match self {
            Tab::Drivers => Tab::Constructors,
            Tab::Constructors => Tab::Drivers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Catalog,
    Board,
}

enum CatalogStatus {
    Loading,
    Ready,
    Failed(String),
}

enum AppEvent {
    Input(Event),
    Tick,
    StatsLoaded(u32, Result<DriverStats>),
}

struct StatsPopup {
    driver: Driver,
    stats: Option<Result<DriverStats, String>>,
}

/// What the board cursor points at.
enum BoardEntry {
    Driver(usize, Driver),
    Constructor(Constructor),
}

/// Terminal front end over the draft store and catalog.
pub struct DraftApp {
    client: OpenF1Client,
    store: DraftStore<FileStore>,
    catalog: Catalog,
    catalog_status: CatalogStatus,
    state: UiState,
    theme: Theme,
    stats: Option<StatsPopup>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    catalog_tx: mpsc::Sender<CatalogEvent>,
    catalog_rx: mpsc::Receiver<CatalogEvent>,
}

impl DraftApp {
    pub fn new(client: OpenF1Client, store: DraftStore<FileStore>) -> Self {
        let (catalog_tx, catalog_rx) = mpsc::channel(4);
        Self {
            client,
            store,
            catalog: Catalog::default(),
            catalog_status: CatalogStatus::Loading,
            state: UiState::default(),
            theme: Theme::default(),
            stats: None,
            event_tx: None,
            catalog_tx,
            catalog_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state.set_status(format!(
            "Restored {} drafted • fetching catalog…",
            self.store.drafted_count()
        ));
        self.spawn_catalog_fetch();

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        let outcome = self.event_loop(&mut terminal, event_rx).await;
        let restored = restore_terminal(&mut terminal);
        self.shutdown(outcome.and(restored))
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        mut event_rx: mpsc::Receiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                return Ok(());
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    if !self.process_app_event(maybe_event) {
                        return Ok(());
                    }
                }
                Some(event) = self.catalog_rx.recv() => {
                    self.handle_catalog_event(event);
                }
            }
        }
    }

    /// Flush pending picks whatever way the session ended.
    fn shutdown(&mut self, outcome: Result<()>) -> Result<()> {
        self.event_tx = None;
        if let Err(err) = self.store.flush() {
            error!(?err, "Final draft flush failed");
        }
        outcome
    }

    fn spawn_catalog_fetch(&mut self) {
        self.catalog_status = CatalogStatus::Loading;
        let sync = CatalogSync::new(self.client.clone());
        let sender = self.catalog_tx.clone();
        spawn(async move {
            if let Err(err) = sync.run(sender).await {
                error!("Catalog fetch task error: {err}");
            }
        });
    }

    fn handle_catalog_event(&mut self, event: CatalogEvent) {
        match event {
            CatalogEvent::Loaded {
                drivers,
                constructors,
            } => {
                self.catalog = Catalog::new(drivers, constructors);
                self.catalog_status = CatalogStatus::Ready;
                self.state.clamp_catalog_cursor(self.catalog_len());
                self.state.set_status(format!(
                    "Loaded {} drivers and {} constructors",
                    self.catalog.drivers().len(),
                    self.catalog.constructors().len()
                ));
            }
            CatalogEvent::Error(err) => {
                error!(?err, "Catalog fetch failed");
                let message = format!("{err:#}");
                self.state
                    .set_status(format!("ERROR: FAILED TO LOAD DATA ({message})"));
                self.catalog_status = CatalogStatus::Failed(message);
            }
        }
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::StatsLoaded(number, result)) => {
                if let Some(popup) = self.stats.as_mut() {
                    if popup.driver.id == number {
                        popup.stats = Some(result.map_err(|err| format!("{err:#}")));
                    }
                }
                true
            }
            None => false,
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.stats.is_some() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('i')
            ) {
                self.stats = None;
            }
            return Ok(());
        }
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Tab => {
                self.state.focus = match self.state.focus {
                    Focus::Catalog => Focus::Board,
                    Focus::Board => Focus::Catalog,
                };
                self.state.clamp_board_cursor(self.store.drafted_count());
            }
            KeyCode::Char('1') => self.switch_tab(Tab::Drivers),
            KeyCode::Char('2') => self.switch_tab(Tab::Constructors),
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.switch_tab(self.state.tab.toggle())
            }
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('r') => {
                self.spawn_catalog_fetch();
                self.state.set_status("Refreshing catalog…".to_string());
            }
            KeyCode::Char('c') => {
                self.store.clear_draft();
                self.state.board_cursor = 0;
                self.report("Draft board has been cleared.".to_string());
            }
            _ => match self.state.focus {
                Focus::Catalog => self.handle_catalog_key(key),
                Focus::Board => self.handle_board_key(key),
            },
        }
        Ok(())
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        let len = self.catalog_len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_catalog_cursor(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_catalog_cursor(-1, len),
            KeyCode::Home | KeyCode::Char('g') => self.state.catalog_cursor = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.state.catalog_cursor = len.saturating_sub(1)
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.draft_selected(),
            KeyCode::Char('i') => {
                if self.state.tab == Tab::Drivers {
                    if let Some(driver) = self.visible_drivers().get(self.state.catalog_cursor) {
                        self.open_stats(driver.clone());
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        let len = self.store.drafted_count();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_board_cursor(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_board_cursor(-1, len),
            KeyCode::Char('J') => self.shift_driver(1),
            KeyCode::Char('K') => self.shift_driver(-1),
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => self.remove_selected(),
            KeyCode::Char('i') => {
                if let Some(BoardEntry::Driver(_, driver)) = self.board_entry() {
                    self.open_stats(driver);
                }
            }
            _ => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.state.tab != tab {
            self.state.tab = tab;
            self.state.catalog_cursor = 0;
        }
        self.state.focus = Focus::Catalog;
    }

    fn cycle_sort(&mut self) {
        let label = match self.state.tab {
            Tab::Drivers => {
                self.state.driver_sort = self.state.driver_sort.next();
                self.state.driver_sort.label()
            }
            Tab::Constructors => {
                self.state.constructor_sort = self.state.constructor_sort.next();
                self.state.constructor_sort.label()
            }
        };
        self.state.set_status(format!("Sorted by {label}"));
    }

    fn draft_selected(&mut self) {
        let cursor = self.state.catalog_cursor;
        let result = match self.state.tab {
            Tab::Drivers => self
                .visible_drivers()
                .get(cursor)
                .cloned()
                .map(|driver| self.store.add_driver(driver)),
            Tab::Constructors => self
                .visible_constructors()
                .get(cursor)
                .cloned()
                .map(|team| self.store.add_constructor(team)),
        };
        if let Some(result) = result {
            self.report_result(&result);
        }
    }

    fn remove_selected(&mut self) {
        let Some(entry) = self.board_entry() else {
            return;
        };
        let name = match entry {
            BoardEntry::Driver(_, driver) => {
                self.store.remove_driver(driver.id);
                driver.name
            }
            BoardEntry::Constructor(team) => {
                self.store.remove_constructor(team.id);
                team.name
            }
        };
        self.state.clamp_board_cursor(self.store.drafted_count());
        self.report(format!("{name} removed from draft."));
    }

    fn shift_driver(&mut self, delta: isize) {
        let Some(BoardEntry::Driver(index, driver)) = self.board_entry() else {
            return;
        };
        let Some(dest) = index.checked_add_signed(delta) else {
            return;
        };
        if self.store.reorder_drivers(index, dest) {
            self.state.board_cursor = dest;
            self.report(format!("{} moved to pick {}", driver.name, dest + 1));
        }
    }

    fn open_stats(&mut self, driver: Driver) {
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        let number = driver.id;
        let client = self.client.clone();
        self.stats = Some(StatsPopup {
            driver,
            stats: None,
        });
        spawn(async move {
            let result = client.driver_stats(number).await;
            if let Err(err) = &result {
                warn!(driver_number = number, "Driver stats fetch failed: {err:#}");
            }
            let _ = sender.send(AppEvent::StatsLoaded(number, result)).await;
        });
    }

    fn report_result(&mut self, result: &DraftResult) {
        info!(success = result.success, message = %result.message, "Draft attempt");
        self.report(result.message.clone());
    }

    /// Show `message`, with any persistence warning appended.
    fn report(&mut self, message: String) {
        match self.store.take_persist_warning() {
            Some(warning) => self.state.set_status(format!("{message} • {warning}")),
            None => self.state.set_status(message),
        }
    }

    fn visible_drivers(&self) -> Vec<Driver> {
        self.catalog.sorted_drivers(self.state.driver_sort)
    }

    fn visible_constructors(&self) -> Vec<Constructor> {
        self.catalog.sorted_constructors(self.state.constructor_sort)
    }

    fn catalog_len(&self) -> usize {
        match self.state.tab {
            Tab::Drivers => self.catalog.drivers().len(),
            Tab::Constructors => self.catalog.constructors().len(),
        }
    }

    fn board_entry(&self) -> Option<BoardEntry> {
        let drivers = self.store.drafted_drivers();
        let cursor = self.state.board_cursor;
        if cursor < drivers.len() {
            return Some(BoardEntry::Driver(cursor, drivers[cursor].clone()));
        }
        self.store
            .drafted_constructors()
            .get(cursor - drivers.len())
            .cloned()
            .map(BoardEntry::Constructor)
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let banner_lines = banner::render(TITLE);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner::HEIGHT as u16 + 2),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(banner::width(&banner_lines) as u16 + 4),
                Constraint::Min(24),
            ])
            .split(chunks[0]);
        self.render_banner(frame, header[0], &banner_lines);
        self.render_budget(frame, header[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(chunks[1]);
        self.render_catalog(frame, body[0]);
        self.render_board(frame, body[1]);
        self.render_status(frame, chunks[2]);

        if let Some(popup) = &self.stats {
            self.render_stats(frame, popup);
        }
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, lines: &[String]) {
        let content: Vec<Line> = lines
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let paragraph = Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_budget(&self, frame: &mut Frame, area: Rect) {
        let spent = self.store.budget_spent_percent();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Budget"))
            .gauge_style(Style::default().fg(self.theme.budget_color(spent)))
            .ratio((spent / 100.0).clamp(0.0, 1.0))
            .label(format!(
                "{} / {}",
                self.store.remaining_budget(),
                TOTAL_BUDGET
            ));
        frame.render_widget(gauge, rows[0]);

        let drafted = self.store.drafted_count();
        let summary = Paragraph::new(Line::from(vec![
            Span::styled("Drafted ", Style::default().fg(self.theme.muted)),
            Span::styled(
                format!("{drafted}/{}", MAX_DRIVERS + MAX_CONSTRUCTORS),
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  spent {}", self.store.total_cost()),
                Style::default().fg(self.theme.muted),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(summary, rows[1]);
    }

    fn render_catalog(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == Focus::Catalog;
        let sort_label = match self.state.tab {
            Tab::Drivers => self.state.driver_sort.label(),
            Tab::Constructors => self.state.constructor_sort.label(),
        };
        let block = self
            .pane_block(focused)
            .title(format!("Catalog • sort: {sort_label} (s)"));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let tabs = Tabs::new(vec!["1 Drivers", "2 Constructors"])
            .select(self.state.tab.index())
            .style(Style::default().fg(self.theme.muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, rows[0]);

        match &self.catalog_status {
            CatalogStatus::Loading if self.catalog.is_empty() => {
                let loading = Paragraph::new("Loading catalog…")
                    .style(Style::default().fg(self.theme.muted))
                    .alignment(Alignment::Center);
                frame.render_widget(loading, rows[1]);
                return;
            }
            CatalogStatus::Failed(message) if self.catalog.is_empty() => {
                let failure = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "ERROR: FAILED TO LOAD DATA",
                        Style::default()
                            .fg(self.theme.danger)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(message.clone()),
                    Line::from("Press r to retry."),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
                frame.render_widget(failure, rows[1]);
                return;
            }
            _ => {}
        }

        let items: Vec<ListItem> = match self.state.tab {
            Tab::Drivers => self
                .visible_drivers()
                .iter()
                .map(|driver| self.driver_item(driver, self.store.is_driver_drafted(driver.id)))
                .collect(),
            Tab::Constructors => self
                .visible_constructors()
                .iter()
                .map(|team| {
                    self.constructor_item(team, self.store.is_constructor_drafted(team.id))
                })
                .collect(),
        };

        let mut list_state = ListState::default();
        if focused && !items.is_empty() {
            list_state.select(Some(self.state.catalog_cursor.min(items.len() - 1)));
        }
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, rows[1], &mut list_state);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == Focus::Board;
        let title = if self.store.is_complete() {
            "Draft Board • Team Complete! Ready to race."
        } else {
            "Draft Board"
        };
        let block = self.pane_block(focused).title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(MAX_DRIVERS as u16 + 1),
                Constraint::Length(MAX_CONSTRUCTORS as u16 + 1),
                Constraint::Min(0),
            ])
            .split(inner);

        let drivers = self.store.drafted_drivers();
        let constructors = self.store.drafted_constructors();
        let driver_items: Vec<ListItem> = drivers
            .iter()
            .enumerate()
            .map(|(pick, driver)| self.board_driver_item(pick, driver))
            .collect();
        let constructor_items: Vec<ListItem> = constructors
            .iter()
            .map(|team| self.constructor_item(team, false))
            .collect();

        let cursor = self.state.board_cursor;
        let mut driver_state = ListState::default();
        let mut constructor_state = ListState::default();
        if focused {
            if cursor < drivers.len() {
                driver_state.select(Some(cursor));
            } else if cursor - drivers.len() < constructors.len() {
                constructor_state.select(Some(cursor - drivers.len()));
            }
        }

        self.render_board_section(
            frame,
            rows[0],
            format!("DRIVERS ({}/{MAX_DRIVERS})", drivers.len()),
            driver_items,
            "No drivers drafted.",
            &mut driver_state,
        );
        self.render_board_section(
            frame,
            rows[1],
            format!("CONSTRUCTORS ({}/{MAX_CONSTRUCTORS})", constructors.len()),
            constructor_items,
            "No constructors drafted.",
            &mut constructor_state,
        );

        let help = Paragraph::new(vec![
            Line::from("Tab focus • Enter draft • x remove • J/K reorder"),
            Line::from("c clear • i stats • r reload • q quit"),
        ])
        .style(Style::default().fg(self.theme.muted))
        .wrap(Wrap { trim: true });
        frame.render_widget(help, rows[2]);
    }

    fn render_board_section(
        &self,
        frame: &mut Frame,
        area: Rect,
        heading: String,
        items: Vec<ListItem>,
        empty: &str,
        list_state: &mut ListState,
    ) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        let heading = Paragraph::new(Span::styled(
            heading,
            Style::default()
                .fg(self.theme.primary_fg)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(heading, rows[0]);

        if items.is_empty() {
            let empty = Paragraph::new(empty.to_string())
                .style(Style::default().fg(self.theme.muted))
                .alignment(Alignment::Center);
            frame.render_widget(empty, rows[1]);
            return;
        }
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, rows[1], list_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(Line::from(self.state.status.clone()))
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_stats(&self, frame: &mut Frame, popup: &StatsPopup) {
        let area = centered_rect(44, 11, frame.size());
        frame.render_widget(Clear, area);

        let driver = &popup.driver;
        let mut lines = vec![
            Line::from(Span::styled(
                driver.display_name(),
                Style::default()
                    .fg(team_color(driver.team_colour.as_deref(), self.theme.accent))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                driver.team_name.clone(),
                Style::default().fg(self.theme.muted),
            )),
            Line::from(""),
        ];
        match &popup.stats {
            None => lines.push(Line::from("Loading stats…")),
            Some(Err(message)) => lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(self.theme.danger),
            ))),
            Some(Ok(stats)) => {
                lines.push(stat_line("Position", stats.position.map(|p| format!("P{p}"))));
                lines.push(stat_line("Points", stats.points.map(|p| format!("{p}"))));
                lines.push(stat_line(
                    "Fastest lap",
                    stats.fastest_lap_time.clone().map(|time| match stats.fastest_lap_rank {
                        Some(rank) => format!("{time} (#{rank})"),
                        None => time,
                    }),
                ));
                lines.push(stat_line("Laps", Some(stats.laps_completed.to_string())));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Driver Stats")
                    .border_style(Style::default().fg(self.theme.accent)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn pane_block(&self, focused: bool) -> Block<'static> {
        let border = if focused {
            self.theme.accent
        } else {
            self.theme.muted
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
    }

    fn driver_item(&self, driver: &Driver, drafted: bool) -> ListItem<'static> {
        let marker = if drafted { "✓ " } else { "  " };
        let points = driver
            .points
            .map(|points| format!("{points} pts"))
            .unwrap_or_else(|| "--".to_string());
        ListItem::new(Line::from(vec![
            Span::styled(
                "▌",
                Style::default().fg(team_color(driver.team_colour.as_deref(), self.theme.muted)),
            ),
            Span::styled(marker, Style::default().fg(self.theme.success)),
            Span::styled(
                format!("{:<22}", driver.display_name()),
                Style::default().fg(self.theme.primary_fg),
            ),
            Span::styled(
                format!("{:<20}", driver.team_name),
                Style::default().fg(self.theme.muted),
            ),
            Span::styled(format!("{points:>8} "), Style::default().fg(self.theme.muted)),
            Span::styled(
                driver.price.to_string(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
    }

    fn board_driver_item(&self, pick: usize, driver: &Driver) -> ListItem<'static> {
        ListItem::new(Line::from(vec![
            Span::styled(
                "▌",
                Style::default().fg(team_color(driver.team_colour.as_deref(), self.theme.muted)),
            ),
            Span::styled(format!("{}. ", pick + 1), Style::default().fg(self.theme.muted)),
            Span::styled(
                format!("{:<22}", driver.display_name()),
                Style::default().fg(self.theme.primary_fg),
            ),
            Span::styled(
                driver.price.to_string(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
    }

    fn constructor_item(&self, team: &Constructor, drafted: bool) -> ListItem<'static> {
        let marker = if drafted { "✓ " } else { "  " };
        ListItem::new(Line::from(vec![
            Span::styled(
                "▌",
                Style::default().fg(team_color(team.team_colour.as_deref(), self.theme.muted)),
            ),
            Span::styled(marker, Style::default().fg(self.theme.success)),
            Span::styled(
                format!("{:<24}", team.name),
                Style::default().fg(self.theme.primary_fg),
            ),
            Span::styled(
                team.price.to_string(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
    }
}

fn team_color(hex: Option<&str>, fallback: Color) -> Color {
    hex.and_then(parse_hex_color).unwrap_or(fallback)
}

fn stat_line(label: &str, value: Option<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
        Span::raw(value.unwrap_or_else(|| "N/A".to_string())),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    tab: Tab,
    focus: Focus,
    driver_sort: DriverSort,
    constructor_sort: ConstructorSort,
    catalog_cursor: usize,
    board_cursor: usize,
    status: String,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: Tab::Drivers,
            focus: Focus::Catalog,
            driver_sort: DriverSort::default(),
            constructor_sort: ConstructorSort::default(),
            catalog_cursor: 0,
            board_cursor: 0,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn move_catalog_cursor(&mut self, delta: isize, len: usize) {
        self.catalog_cursor = step(self.catalog_cursor, delta, len);
    }

    fn move_board_cursor(&mut self, delta: isize, len: usize) {
        self.board_cursor = step(self.board_cursor, delta, len);
    }

    fn clamp_catalog_cursor(&mut self, len: usize) {
        self.catalog_cursor = self.catalog_cursor.min(len.saturating_sub(1));
    }

    fn clamp_board_cursor(&mut self, len: usize) {
        self.board_cursor = self.board_cursor.min(len.saturating_sub(1));
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use apexdraft_core::{config::AppConfig, CommitMode, Price, STORAGE_KEY};
    use tempfile::tempdir;

    #[test]
    fn parses_team_colours() {
        assert_eq!(parse_hex_color("3671C6"), Some(Color::Rgb(0x36, 0x71, 0xC6)));
        assert_eq!(parse_hex_color("#e8002d"), Some(Color::Rgb(0xE8, 0x00, 0x2D)));
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(team_color(None, Color::Blue), Color::Blue);
    }

    #[test]
    fn budget_colour_thresholds() {
        let theme = Theme::default();
        assert_eq!(theme.budget_color(50.0), theme.accent);
        assert_eq!(theme.budget_color(75.0), theme.warning);
        assert_eq!(theme.budget_color(95.0), theme.danger);
    }

    #[test]
    fn cursor_steps_stay_in_range() {
        assert_eq!(step(0, -1, 5), 0);
        assert_eq!(step(4, 1, 5), 4);
        assert_eq!(step(2, 1, 5), 3);
        assert_eq!(step(3, 1, 0), 0);

        let mut state = UiState::default();
        state.board_cursor = 6;
        state.clamp_board_cursor(3);
        assert_eq!(state.board_cursor, 2);
    }

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 30, 8);
        let rect = centered_rect(44, 11, area);
        assert_eq!(rect, Rect::new(0, 0, 30, 8));
        let rect = centered_rect(10, 4, Rect::new(0, 0, 30, 8));
        assert_eq!(rect, Rect::new(10, 2, 10, 4));
    }

    #[test]
    fn shutdown_flushes_deferred_picks_after_a_failed_session() -> Result<()> {
        let dir = tempdir()?;
        let mut store =
            DraftStore::new(FileStore::new(dir.path())).with_commit_mode(CommitMode::Deferred);
        let max = Driver::new(1, "Max Verstappen", "Red Bull Racing", Price::from_tenths(305));
        assert!(store.add_driver(max).success);
        assert!(store.is_dirty());

        let client = OpenF1Client::new(&AppConfig::default())?;
        let mut app = DraftApp::new(client, store);
        let outcome = app.shutdown(Err(anyhow!("draw failed")));

        assert!(outcome.is_err());
        assert!(!app.store.is_dirty());
        assert!(app.store.storage().path_for(STORAGE_KEY).exists());
        Ok(())
    }
}
