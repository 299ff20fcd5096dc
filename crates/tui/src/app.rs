use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamevault_core::{
    distinct_genres, distinct_platforms, query, stats, CatalogError, CatalogStats, FileStore,
    FilterKind, GameFields, GameRecord, QueryParams, RawForm, RecordStore, SortKey,
    TRACKED_PLATFORMS,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_FIELD_LEN: usize = 256;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    favorite: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            favorite: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Title,
    Developer,
    Genre,
    ReleaseYear,
    Platforms,
    Rating,
    Description,
    ImageUrl,
}

impl FormField {
    const ALL: [FormField; 8] = [
        FormField::Title,
        FormField::Developer,
        FormField::Genre,
        FormField::ReleaseYear,
        FormField::Platforms,
        FormField::Rating,
        FormField::Description,
        FormField::ImageUrl,
    ];

    fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Developer => "Developer",
            FormField::Genre => "Genre",
            FormField::ReleaseYear => "Release year",
            FormField::Platforms => "Platforms",
            FormField::Rating => "Rating (0-10)",
            FormField::Description => "Description",
            FormField::ImageUrl => "Image URL",
        }
    }
}

/// Add/edit dialog. `target` is the id being edited, `None` when adding.
struct GameFormModal {
    target: Option<String>,
    form: RawForm,
    focus: usize,
    error: Option<String>,
}

impl GameFormModal {
    fn new_game() -> Self {
        Self {
            target: None,
            form: RawForm::default(),
            focus: 0,
            error: None,
        }
    }

    fn edit(record: &GameRecord) -> Self {
        Self {
            target: Some(record.id.clone()),
            form: RawForm::from_record(record),
            focus: 0,
            error: None,
        }
    }

    fn title(&self) -> &'static str {
        if self.target.is_some() {
            "Edit Game"
        } else {
            "Add New Game"
        }
    }

    fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    fn move_focus(&mut self, delta: isize) {
        let len = FormField::ALL.len() as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(len) as usize;
    }

    fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.form.title,
            FormField::Developer => &self.form.developer,
            FormField::Genre => &self.form.genre,
            FormField::ReleaseYear => &self.form.release_year,
            FormField::Platforms => &self.form.platforms,
            FormField::Rating => &self.form.rating,
            FormField::Description => &self.form.description,
            FormField::ImageUrl => &self.form.image_url,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.form.title,
            FormField::Developer => &mut self.form.developer,
            FormField::Genre => &mut self.form.genre,
            FormField::ReleaseYear => &mut self.form.release_year,
            FormField::Platforms => &mut self.form.platforms,
            FormField::Rating => &mut self.form.rating,
            FormField::Description => &mut self.form.description,
            FormField::ImageUrl => &mut self.form.image_url,
        }
    }

    fn insert(&mut self, ch: char) {
        let field = self.focused();
        let value = self.value_mut(field);
        if value.chars().count() < MAX_FIELD_LEN {
            value.push(ch);
        }
    }

    fn backspace(&mut self) {
        let field = self.focused();
        self.value_mut(field).pop();
    }
}

/// Terminal frontend over a file-backed catalog.
pub struct GameVaultApp {
    store: RecordStore<FileStore>,
    state: UiState,
    theme: Theme,
    form: Option<GameFormModal>,
    pending_delete: Option<GameRecord>,
}

impl GameVaultApp {
    pub fn new(store: RecordStore<FileStore>) -> Self {
        Self {
            store,
            state: UiState::default(),
            theme: Theme::default(),
            form: None,
            pending_delete: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.refresh_view();
        self.state
            .set_status(format!("Loaded {} games", self.store.list().len()));

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
        }

        restore_terminal(&mut terminal)
    }

    /// Recompute the visible list, facets and stats after any change.
    fn refresh_view(&mut self) {
        let selected = self.state.current_game().map(|game| game.id.clone());
        let records = self.store.list();
        self.state.filtered = query(records, &self.state.params);
        self.state.genres = distinct_genres(records);
        self.state.platforms = distinct_platforms(records);
        self.state.stats = stats(records, self.store.favorites());
        match selected {
            Some(id) => {
                if !self.state.select_game(&id) {
                    self.state.clamp_cursor();
                }
            }
            None => self.state.clamp_cursor(),
        }
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if let Err(err) = self.handle_key(key) {
                    error!(?err, "Key handling failed");
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => true,
            None => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.form.is_some() {
            return self.handle_form_key(key);
        }
        if self.pending_delete.is_some() {
            return self.handle_confirm_key(key);
        }
        match self.state.mode {
            Mode::Search => self.handle_search_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state.set_status(self.filter_summary());
            }
            KeyCode::Backspace => {
                self.state.params.search_term.pop();
                self.refresh_view();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.params.search_term.push(c);
                    self.refresh_view();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Home => self.state.move_to(0),
            KeyCode::End => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Search;
                self.state.set_status("Type to search".to_string());
            }
            KeyCode::Char('g') => {
                self.state.params.genre = cycle_value(&self.state.genres, &self.state.params.genre);
                self.apply_filters();
            }
            KeyCode::Char('p') => {
                self.state.params.platform =
                    cycle_value(&self.state.platforms, &self.state.params.platform);
                self.apply_filters();
            }
            KeyCode::Char('s') => {
                self.state.params.sort = cycle_sort(self.state.params.sort);
                self.apply_filters();
            }
            KeyCode::Char('c') => {
                self.state.params = QueryParams {
                    sort: self.state.params.sort,
                    ..QueryParams::default()
                };
                self.apply_filters();
            }
            KeyCode::Char('1') => self.remove_filter(FilterKind::Search),
            KeyCode::Char('2') => self.remove_filter(FilterKind::Genre),
            KeyCode::Char('3') => self.remove_filter(FilterKind::Platform),
            KeyCode::Char('f') => self.toggle_favorite(),
            KeyCode::Char('a') => {
                self.form = Some(GameFormModal::new_game());
                self.state.set_status("Adding a new game".to_string());
            }
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form()?,
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(game) = self.state.current_game().cloned() {
                    self.state
                        .set_status(format!("Delete {}? (y/n)", game.title));
                    self.pending_delete = Some(game);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(game) = self.pending_delete.take() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let result = self.store.delete(&game.id);
                self.refresh_view();
                match result {
                    Ok(()) => self.state.set_status(format!("Deleted {}", game.title)),
                    Err(err) => self.report_error("Delete", err),
                }
            }
            _ => self.state.set_status("Delete cancelled".to_string()),
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(modal) = self.form.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.state.set_status("Edit cancelled".to_string());
            }
            KeyCode::Tab | KeyCode::Down => modal.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => modal.move_focus(-1),
            KeyCode::Backspace => modal.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    modal.insert(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_form(&mut self) {
        let Some(modal) = self.form.as_mut() else {
            return;
        };
        let fields = GameFields::from_form(&modal.form);
        let result = match modal.target.clone() {
            Some(id) => self.store.update(&id, fields).map(|game| (game, "updated")),
            None => self.store.create(fields).map(|game| (game, "added")),
        };
        match result {
            Ok((game, verb)) => {
                self.form = None;
                self.refresh_view();
                self.state.select_game(&game.id);
                self.state.set_status(format!("{} {verb}", game.title));
            }
            Err(CatalogError::Validation(err)) => {
                modal.error = Some(err.to_string());
            }
            Err(err) => {
                self.form = None;
                self.refresh_view();
                self.report_error("Save", err);
            }
        }
    }

    fn open_edit_form(&mut self) -> Result<()> {
        let Some(id) = self.state.current_game().map(|game| game.id.clone()) else {
            self.state.set_status("No game selected".to_string());
            return Ok(());
        };
        match self.store.get(&id) {
            Ok(record) => {
                self.form = Some(GameFormModal::edit(record));
                self.state.set_status(format!("Editing {}", record.title));
            }
            Err(err) => {
                self.refresh_view();
                self.report_error("Edit", err);
            }
        }
        Ok(())
    }

    fn toggle_favorite(&mut self) {
        let Some(game) = self.state.current_game().cloned() else {
            return;
        };
        let result = self.store.toggle_favorite(&game.id);
        self.refresh_view();
        match result {
            Ok(true) => self
                .state
                .set_status(format!("{} added to favorites", game.title)),
            Ok(false) => self
                .state
                .set_status(format!("{} removed from favorites", game.title)),
            Err(err) => self.report_error("Favorite", err),
        }
    }

    fn remove_filter(&mut self, kind: FilterKind) {
        self.state.params.clear(kind);
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        self.state.cursor = 0;
        self.state.offset = 0;
        self.refresh_view();
        self.state.set_status(self.filter_summary());
    }

    fn filter_summary(&self) -> String {
        format!(
            "Showing {} of {} games",
            self.state.filtered.len(),
            self.store.list().len()
        )
    }

    fn report_error(&mut self, action: &str, err: CatalogError) {
        error!(%err, action, "Catalog operation failed");
        self.state.set_status(format!("{action} failed: {err}"));
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(size);

        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.render_header(frame, chunks[0]);
        self.render_game_list(frame, body_chunks[0]);
        self.render_game_info(frame, body_chunks[1]);
        self.render_status(frame, chunks[2]);

        if let Some(modal) = &self.form {
            self.render_form(frame, modal);
        }
        if let Some(game) = &self.pending_delete {
            self.render_confirm(frame, game);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let stats: &CatalogStats = &self.state.stats;
        let mut counts = vec![Span::styled(
            format!("Total {}", stats.total),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for platform in TRACKED_PLATFORMS {
            counts.push(Span::raw(format!(
                "  {platform} {}",
                stats.platform_count(platform)
            )));
        }
        counts.push(Span::styled(
            format!("  ★ {}", stats.favorite_count),
            Style::default().fg(self.theme.favorite),
        ));

        let mut filters: Vec<Span> = self
            .state
            .params
            .active_filters()
            .iter()
            .map(|filter| {
                Span::styled(
                    format!("[{}] {filter}  ", chip_key(filter.kind)),
                    Style::default().fg(self.theme.accent),
                )
            })
            .collect();
        let sort = self
            .state
            .params
            .sort
            .map(SortKey::as_str)
            .unwrap_or("insertion order");
        filters.push(Span::styled(
            format!("Sort: {sort}"),
            Style::default().fg(self.theme.muted),
        ));

        let paragraph = Paragraph::new(vec![Line::from(counts), Line::from(filters)])
            .block(Block::default().borders(Borders::ALL).title("GameVault"));
        frame.render_widget(paragraph, area);
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(2) as usize;
        self.state.clamp_cursor();
        self.state.ensure_cursor_visible();

        let mut list_state = ListState::default();
        let height = self.state.list_height;
        let games = self.state.visible_games(height);
        if !games.is_empty() {
            let selected = self
                .state
                .cursor
                .saturating_sub(self.state.offset)
                .min(games.len().saturating_sub(1));
            list_state.select(Some(selected));
        }
        let items: Vec<ListItem> = games
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let is_selected = self.state.cursor == self.state.offset + idx;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let star = if self.store.is_favorite(&game.id) {
                    Span::styled("★ ", Style::default().fg(self.theme.favorite))
                } else {
                    Span::raw("  ")
                };
                let title = Span::styled(
                    game.title.clone(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                );
                let rating = Span::styled(
                    format!(" · {}", game.display_rating()),
                    Style::default().fg(self.theme.muted),
                );
                ListItem::new(Line::from(vec![marker, star, title, rating]))
            })
            .collect();

        let title = format!("Games ({})", self.state.filtered.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_game_info(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Game Details");
        let Some(game) = self.state.current_game() else {
            let message = if self.store.list().is_empty() {
                "No games yet. Press `a` to add one to your collection."
            } else {
                "No games match the current filters."
            };
            let paragraph = Paragraph::new(message).block(block).wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        };

        let mut lines = vec![Line::from(vec![Span::styled(
            game.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )])];
        lines.push(Line::from(Span::styled(
            format!("{} • {} • {}", game.developer, game.release_year, game.genre),
            Style::default().fg(self.theme.muted),
        )));
        lines.push(Line::from(format!("Rating: {}", game.display_rating())));
        lines.push(Line::from(format!("Platforms: {}", game.platform_list())));
        lines.push(Line::from(format!("Description: {}", game.description_text())));
        lines.push(Line::from(format!("Image: {}", game.image_url)));
        lines.push(Line::from(format!(
            "Added: {}",
            game.created_at.format("%Y-%m-%d")
        )));
        lines.push(Line::from(format!(
            "Updated: {}",
            game.updated_at.format("%Y-%m-%d %H:%M UTC")
        )));
        if self.store.is_favorite(&game.id) {
            lines.push(Line::from(Span::styled(
                "★ Favorite",
                Style::default().fg(self.theme.favorite),
            )));
        }
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Search {
            format!("Search: {}_", self.state.params.search_term)
        } else {
            self.state.status.clone()
        };
        let help = "/ search  g genre  p platform  s sort  c clear  a add  e edit  d delete  f favorite  q quit";
        let paragraph = Paragraph::new(vec![Line::from(vec![
            Span::raw(primary),
            Span::styled(format!("   {help}"), Style::default().fg(self.theme.muted)),
        ])])
        .block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_form(&self, frame: &mut Frame, modal: &GameFormModal) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(72_u16, frame_area.width.saturating_sub(4)), 30_u16);
        let height = (FormField::ALL.len() as u16 + 5).min(frame_area.height);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let focused = idx == modal.focus;
                let label_style = if focused {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                let cursor = if focused { "_" } else { "" };
                Line::from(vec![
                    Span::styled(format!("{:>14}: ", field.label()), label_style),
                    Span::raw(format!("{}{cursor}", modal.value(*field))),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        match &modal.error {
            Some(message) => lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(self.theme.danger),
            ))),
            None => lines.push(Line::from(Span::styled(
                "Platforms are comma-separated, e.g. PC, PlayStation",
                Style::default().fg(self.theme.muted),
            ))),
        }
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" save  "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" next field  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(modal.title()));
        frame.render_widget(paragraph, area);
    }

    fn render_confirm(&self, frame: &mut Frame, game: &GameRecord) {
        let area = centered_rect(50, 5, frame.size());
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(vec![
            Line::from(format!("Delete {}?", game.title)),
            Line::from(vec![
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" confirm  "),
                Span::styled("any other key", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel"),
            ]),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm")
                .border_style(Style::default().fg(self.theme.danger)),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    info!("Terminal restored");
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

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Key that clears the chip for `kind`.
fn chip_key(kind: FilterKind) -> char {
    match kind {
        FilterKind::Search => '1',
        FilterKind::Genre => '2',
        FilterKind::Platform => '3',
    }
}

/// Next facet after `current`, wrapping through "" (no filter).
fn cycle_value(options: &[String], current: &str) -> String {
    if current.is_empty() {
        return options.first().cloned().unwrap_or_default();
    }
    match options.iter().position(|option| option == current) {
        Some(idx) => options.get(idx + 1).cloned().unwrap_or_default(),
        None => String::new(),
    }
}

/// Next sort key, wrapping through `None` (insertion order).
fn cycle_sort(current: Option<SortKey>) -> Option<SortKey> {
    match current {
        None => SortKey::ALL.first().copied(),
        Some(key) => {
            let idx = SortKey::ALL.iter().position(|candidate| *candidate == key)?;
            SortKey::ALL.get(idx + 1).copied()
        }
    }
}

struct UiState {
    params: QueryParams,
    filtered: Vec<GameRecord>,
    genres: Vec<String>,
    platforms: Vec<String>,
    stats: CatalogStats,
    cursor: usize,
    offset: usize,
    list_height: usize,
    status: String,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            params: QueryParams::default(),
            filtered: Vec::new(),
            genres: Vec::new(),
            platforms: Vec::new(),
            stats: CatalogStats::default(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            status: "Ready".to_string(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len() as isize;
        let idx = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = index.min(self.filtered.len() - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        self.move_to(self.filtered.len().saturating_sub(1));
    }

    fn page_down(&mut self) {
        if self.list_height == 0 {
            return;
        }
        self.move_cursor(self.list_height as isize);
    }

    fn page_up(&mut self) {
        if self.list_height == 0 {
            return;
        }
        self.move_cursor(-(self.list_height as isize));
    }

    fn visible_games(&self, height: usize) -> &[GameRecord] {
        if self.filtered.is_empty() {
            return &[];
        }
        let end = (self.offset + height).min(self.filtered.len());
        &self.filtered[self.offset..end]
    }

    fn current_game(&self) -> Option<&GameRecord> {
        self.filtered.get(self.cursor)
    }

    fn select_game(&mut self, game_id: &str) -> bool {
        match self.filtered.iter().position(|game| game.id == game_id) {
            Some(pos) => {
                self.cursor = pos;
                self.ensure_cursor_visible();
                true
            }
            None => false,
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn clamp_cursor(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = self.filtered.len().saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gamevault_core::samples::sample_records;

    #[test]
    fn facet_cycle_wraps_through_unfiltered() {
        let options = vec!["RPG".to_string(), "Ação".to_string()];
        assert_eq!(cycle_value(&options, ""), "RPG");
        assert_eq!(cycle_value(&options, "RPG"), "Ação");
        assert_eq!(cycle_value(&options, "Ação"), "");
        assert_eq!(cycle_value(&options, "Removed"), "");
        assert_eq!(cycle_value(&[], ""), "");
    }

    #[test]
    fn sort_cycle_visits_every_key() {
        let mut current = None;
        let mut seen = Vec::new();
        loop {
            current = cycle_sort(current);
            match current {
                Some(key) => seen.push(key),
                None => break,
            }
        }
        assert_eq!(seen, SortKey::ALL);
    }

    #[test]
    fn form_focus_wraps_and_edits_focused_field() {
        let mut modal = GameFormModal::new_game();
        modal.move_focus(-1);
        assert_eq!(modal.focused(), FormField::ImageUrl);
        modal.move_focus(1);
        assert_eq!(modal.focused(), FormField::Title);
        for ch in "Hades!".chars() {
            modal.insert(ch);
        }
        modal.backspace();
        assert_eq!(modal.form.title, "Hades");
        assert_eq!(modal.title(), "Add New Game");

        let record = &sample_records(Utc::now())[0];
        let modal = GameFormModal::edit(record);
        assert_eq!(modal.target.as_deref(), Some("1"));
        assert_eq!(modal.value(FormField::Platforms), "PC, PlayStation, Xbox");
    }

    #[test]
    fn cursor_stays_within_filtered_list() {
        let mut state = UiState {
            filtered: sample_records(Utc::now()),
            list_height: 2,
            ..UiState::default()
        };
        state.move_cursor(10);
        assert_eq!(state.cursor, 2);
        assert_eq!(state.offset, 1);
        state.page_up();
        assert_eq!(state.cursor, 0);
        assert!(state.select_game("3"));
        assert_eq!(state.current_game().map(|g| g.id.as_str()), Some("3"));
        state.filtered.truncate(1);
        state.clamp_cursor();
        assert_eq!(state.cursor, 0);
    }
}
