use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use open::that as open_path;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::export;
use crate::models::Participant;
use crate::session::Session;
use crate::store::{clear_store, save_session};

use super::forms::{BulkForm, CountForm, GenerateField, GenerateForm, TextForm};
use super::helpers::{centered_rect, surface_error};
use super::screens::{visible_window, RosterPane};

/// Header space for the event title banner.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// How long the suspense animation runs before a pending draw resolves.
const DRAW_SUSPENSE: Duration = Duration::from_millis(4000);

/// Fine-grained interaction modes. The main screen never changes; every
/// dialog, confirmation, and the draw itself is a mode layered on top of it,
/// and each key press is funnelled through the active mode.
enum Mode {
    Normal,
    AddingBulk(BulkForm),
    AddingSingle(TextForm),
    EditingTitle(TextForm),
    Generating(GenerateForm),
    SettingCount(CountForm),
    ConfirmReset,
    ConfirmClear,
    Drawing(DrawAnimation),
    Reveal(Vec<Participant>),
}

/// Presentation state of a draw in flight: when it started and the name the
/// suspense panel currently flashes. The displayed name is resampled every
/// tick from its own RNG stream and has no bearing on who actually wins.
struct DrawAnimation {
    started: Instant,
    display_name: String,
}

impl DrawAnimation {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            display_name: "?".to_string(),
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the session, the
/// store connection, and the active mode; every mutation is persisted before
/// the next frame renders.
pub struct App {
    conn: Connection,
    session: Session,
    roster: RosterPane,
    mode: Mode,
    draw_count: usize,
    muted: bool,
    status: Option<StatusMessage>,
    last_export: Option<PathBuf>,
    draw_rng: StdRng,
}

impl App {
    /// Construct the app around a loaded session and a live store connection.
    /// The draw RNG is seeded from the OS once and used exclusively for
    /// winner selection.
    pub fn new(conn: Connection, session: Session) -> Self {
        Self {
            conn,
            session,
            roster: RosterPane::default(),
            mode: Mode::Normal,
            draw_count: 1,
            muted: false,
            status: None,
            last_export: None,
            draw_rng: StdRng::from_os_rng(),
        }
    }

    /// Top-level key dispatcher. Every key goes through the active `Mode`,
    /// which returns the next mode to run. The boolean result tells the outer
    /// loop whether the user requested an exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBulk(form) => self.handle_bulk_add(code, form)?,
            Mode::AddingSingle(form) => self.handle_single_add(code, form)?,
            Mode::EditingTitle(form) => self.handle_edit_title(code, form)?,
            Mode::Generating(form) => self.handle_generate(code, form)?,
            Mode::SettingCount(form) => self.handle_set_count(code, form)?,
            Mode::ConfirmReset => self.handle_confirm_reset(code)?,
            Mode::ConfirmClear => self.handle_confirm_clear(code)?,
            // A draw runs to completion; keys are swallowed until the reveal.
            Mode::Drawing(anim) => Mode::Drawing(anim),
            Mode::Reveal(winners) => Self::handle_reveal(code, winners),
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Advance the suspense animation and resolve the draw once its fixed
    /// delay has elapsed. Called by the event loop on every iteration, with
    /// or without input.
    pub(crate) fn on_tick(&mut self) -> Result<()> {
        if !matches!(self.mode, Mode::Drawing(_)) {
            return Ok(());
        }

        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = if let Mode::Drawing(mut anim) = mode {
            if anim.started.elapsed() >= DRAW_SUSPENSE {
                let winners = self
                    .session
                    .resolve_draw(&mut self.draw_rng)
                    .unwrap_or_default();
                self.roster.ensure_in_bounds(self.session.registry().len());
                self.persist()?;
                if !self.muted {
                    super::terminal::ring_bell();
                }
                Mode::Reveal(winners)
            } else {
                if let Some(pick) = self.session.registry().choose(&mut rand::rng()) {
                    anim.display_name = pick.name.clone();
                }
                Mode::Drawing(anim)
            }
        } else {
            mode
        };

        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let len = self.session.registry().len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.roster.move_selection(-1, len),
            KeyCode::Down => self.roster.move_selection(1, len),
            KeyCode::PageUp => self.roster.move_selection(-5, len),
            KeyCode::PageDown => self.roster.move_selection(5, len),
            KeyCode::Home => self.roster.select_first(),
            KeyCode::End => self.roster.select_last(len),
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.clear_status();
                return Ok(Mode::AddingBulk(BulkForm::default()));
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Ok(Mode::AddingSingle(TextForm::default()));
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.clear_status();
                return Ok(Mode::Generating(GenerateForm::default()));
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.clear_status();
                return Ok(Mode::EditingTitle(TextForm::with_value(
                    self.session.event_title(),
                )));
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.clear_status();
                return Ok(Mode::SettingCount(CountForm::with_value(self.draw_count)));
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                return Ok(self.start_draw());
            }
            KeyCode::Char('-') | KeyCode::Delete => self.remove_selected()?,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.session.ledger().is_empty() {
                    self.set_status("No winners to return yet.", StatusKind::Info);
                } else {
                    self.clear_status();
                    return Ok(Mode::ConfirmReset);
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.clear_status();
                return Ok(Mode::ConfirmClear);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_winners(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_export(),
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.muted = !self.muted;
                let message = if self.muted { "Sound muted." } else { "Sound on." };
                self.set_status(message, StatusKind::Info);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Validate and start a draw. Rejections (empty pool, zero count, draw
    /// already running) surface in the footer and leave everything untouched.
    fn start_draw(&mut self) -> Mode {
        match self.session.begin_draw(self.draw_count) {
            Ok(()) => {
                self.clear_status();
                Mode::Drawing(DrawAnimation::new())
            }
            Err(err) => {
                self.set_status(err.to_string(), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    /// Remove the highlighted participant. Removal is immediate; only reset
    /// and clear-all go through a confirmation dialog.
    fn remove_selected(&mut self) -> Result<()> {
        let selected = self.session.registry().get(self.roster.selected).cloned();
        if let Some(participant) = selected {
            self.session.remove(participant.id);
            self.roster.ensure_in_bounds(self.session.registry().len());
            self.persist()?;
            self.set_status(format!("Removed {}.", participant.name), StatusKind::Info);
        } else {
            self.set_status("No participant selected to remove.", StatusKind::Error);
        }
        Ok(())
    }

    fn handle_bulk_add(&mut self, code: KeyCode, mut form: BulkForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Bulk add cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => {
                if form.submit_on_enter() {
                    let text = form.text();
                    if text.trim().is_empty() {
                        self.set_status("No names entered.", StatusKind::Info);
                        return Ok(Mode::Normal);
                    }
                    let added = self.session.add_bulk(&text);
                    self.persist()?;
                    let plural = if added == 1 { "" } else { "s" };
                    self.set_status(format!("Added {added} participant{plural}."), StatusKind::Info);
                    Ok(Mode::Normal)
                } else {
                    form.commit_line();
                    Ok(Mode::AddingBulk(form))
                }
            }
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::AddingBulk(form))
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
                Ok(Mode::AddingBulk(form))
            }
            _ => Ok(Mode::AddingBulk(form)),
        }
    }

    fn handle_single_add(&mut self, code: KeyCode, mut form: TextForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Add cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => {
                let name = form.value.trim().to_string();
                if name.is_empty() {
                    form.error = Some("Name is required.".to_string());
                    Ok(Mode::AddingSingle(form))
                } else if self.session.add_single(&name) == 1 {
                    self.persist()?;
                    self.set_status(format!("Added {name}."), StatusKind::Info);
                    Ok(Mode::Normal)
                } else {
                    form.error = Some(format!("{name} is already in the pool."));
                    Ok(Mode::AddingSingle(form))
                }
            }
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::AddingSingle(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::AddingSingle(form))
            }
            _ => Ok(Mode::AddingSingle(form)),
        }
    }

    fn handle_edit_title(&mut self, code: KeyCode, mut form: TextForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => {
                self.session.set_event_title(form.value.clone());
                self.persist()?;
                self.set_status("Event title updated.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::EditingTitle(form))
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
                Ok(Mode::EditingTitle(form))
            }
            _ => Ok(Mode::EditingTitle(form)),
        }
    }

    fn handle_generate(&mut self, code: KeyCode, mut form: GenerateForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Generate cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Tab | KeyCode::BackTab => {
                form.toggle_field();
                Ok(Mode::Generating(form))
            }
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::Generating(form))
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok((prefix, count)) => {
                    let added = self.session.add_generated(&prefix, count);
                    self.persist()?;
                    let plural = if added == 1 { "" } else { "s" };
                    self.set_status(
                        format!("Added {added} generated name{plural}."),
                        StatusKind::Info,
                    );
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                    Ok(Mode::Generating(form))
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::Generating(form))
            }
            _ => Ok(Mode::Generating(form)),
        }
    }

    fn handle_set_count(&mut self, code: KeyCode, mut form: CountForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Enter => match form.parse() {
                Ok(count) => {
                    self.draw_count = count;
                    let plural = if count == 1 { "" } else { "s" };
                    self.set_status(
                        format!("Each draw will pick {count} winner{plural}."),
                        StatusKind::Info,
                    );
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    form.error = Some(surface_error(&err));
                    Ok(Mode::SettingCount(form))
                }
            },
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::SettingCount(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::SettingCount(form))
            }
            _ => Ok(Mode::SettingCount(form)),
        }
    }

    /// Confirmation dialog for returning every winner to the pool. Escape
    /// cancels, enter confirms.
    fn handle_confirm_reset(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Reset cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.session.reset();
                self.roster.ensure_in_bounds(self.session.registry().len());
                match self.persist() {
                    Ok(()) => {
                        self.set_status(
                            "All winners returned to the draw pool.",
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmReset),
        }
    }

    /// Confirmation dialog for wiping the whole session, including the
    /// persisted snapshot.
    fn handle_confirm_clear(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Clear cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_clear() {
                    Ok(()) => {
                        self.set_status("All data cleared.", StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Ok(Mode::ConfirmClear)
                    }
                }
            }
            _ => Ok(Mode::ConfirmClear),
        }
    }

    fn perform_clear(&mut self) -> Result<()> {
        self.session.clear();
        self.roster.select_first();
        clear_store(&self.conn)
    }

    fn handle_reveal(code: KeyCode, winners: Vec<Participant>) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc => Mode::Normal,
            _ => Mode::Reveal(winners),
        }
    }

    /// Write the winner history as CSV. An empty ledger is an informational
    /// footer message, not an error, and produces no file.
    fn export_winners(&mut self) {
        if self.session.ledger().is_empty() {
            self.set_status("No winners to export yet.", StatusKind::Info);
            return;
        }

        let result = export::export_dir().and_then(|dir| {
            export::export_winners(
                self.session.ledger(),
                self.session.event_title(),
                &dir,
                Local::now().date_naive(),
            )
        });

        match result {
            Ok(path) => {
                self.set_status(format!("Exported {}.", path.display()), StatusKind::Info);
                self.last_export = Some(path);
            }
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn open_last_export(&mut self) {
        match &self.last_export {
            Some(path) => {
                if let Err(err) = open_path(path) {
                    self.set_status(format!("Failed to open export: {err}"), StatusKind::Error);
                } else {
                    self.set_status(format!("Opened {}.", path.display()), StatusKind::Info);
                }
            }
            None => self.set_status("Nothing has been exported yet.", StatusKind::Info),
        }
    }

    /// Flush the full session snapshot to the store. Called after every
    /// mutation so a crash never loses more than the in-flight change.
    fn persist(&mut self) -> Result<()> {
        save_session(&mut self.conn, &self.session)
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Main render routine invoked each tick by Ratatui. Splits the frame
    /// into header, content, and footer regions, then layers the active
    /// dialog on top.
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(chunks[1]);

        self.draw_roster(frame, content[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(content[1]);

        self.draw_draw_panel(frame, right[0]);
        self.draw_ledger(frame, right[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingBulk(form) => self.draw_bulk_form(frame, area, form),
            Mode::AddingSingle(form) => {
                self.draw_text_form(frame, area, "Add Participant", "Name", form)
            }
            Mode::EditingTitle(form) => {
                self.draw_text_form(frame, area, "Edit Event Title", "Title", form)
            }
            Mode::Generating(form) => self.draw_generate_form(frame, area, form),
            Mode::SettingCount(form) => self.draw_count_form(frame, area, form),
            Mode::ConfirmReset => self.draw_confirm(
                frame,
                area,
                "Confirm Reset",
                &[
                    "Return every winner to the draw pool?",
                    "The winner history will be emptied.",
                ],
            ),
            Mode::ConfirmClear => self.draw_confirm(
                frame,
                area,
                "Confirm Clear All",
                &[
                    "Erase the event title, all participants,",
                    "and the entire winner history?",
                ],
            ),
            Mode::Reveal(winners) => self.draw_reveal(frame, area, winners),
            Mode::Drawing(_) | Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let sound = if self.muted { "  [muted]" } else { "" };
        let line = Line::from(vec![
            Span::styled(
                self.session.event_title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(sound.to_string(), Style::default().fg(Color::DarkGray)),
        ]);
        let paragraph = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_roster(&self, frame: &mut Frame, area: Rect) {
        let registry = self.session.registry();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Draw Pool ({})", registry.len()));

        if registry.is_empty() {
            let message = Paragraph::new("No participants yet. Press 'b' to paste a list.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let capacity = area.height.saturating_sub(2) as usize;
        let (start, end) = visible_window(registry.len(), capacity, self.roster.selected);

        let mut lines = Vec::with_capacity(end - start);
        for (offset, participant) in registry[start..end].iter().enumerate() {
            let index = start + offset;
            if index == self.roster.selected {
                lines.push(Line::from(Span::styled(
                    format!("> {}", participant.name),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(format!("  {}", participant.name)));
            }
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_draw_panel(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Lucky Draw");

        let lines = match &self.mode {
            Mode::Drawing(anim) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    anim.display_name.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Drawing...",
                    Style::default().fg(Color::Gray),
                )),
            ],
            _ => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "?",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Winners per draw: {}", self.draw_count)),
            ],
        };

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_ledger(&self, frame: &mut Frame, area: Rect) {
        let ledger = self.session.ledger();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Winners ({})", ledger.len()));

        if ledger.is_empty() {
            let message = Paragraph::new("No winners yet.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let capacity = area.height.saturating_sub(2) as usize;
        let mut lines = Vec::new();
        for (index, winner) in ledger.iter().take(capacity).enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("#{:<4}", self.session.rank(index)),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(winner.name.clone()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Drawing(_) => Line::from(Span::styled(
                "Drawing winners...",
                Style::default().fg(Color::Gray),
            )),
            Mode::Reveal(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Close"),
            ]),
            Mode::AddingBulk(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Next line (empty line saves)   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Generating(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::AddingSingle(_) | Mode::EditingTitle(_) | Mode::SettingCount(_) => {
                Line::from(vec![
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Save   "),
                    Span::styled("[Esc]", key_style),
                    Span::raw(" Cancel"),
                ])
            }
            Mode::ConfirmReset | Mode::ConfirmClear => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[b]", key_style),
                Span::raw(" Bulk   "),
                Span::styled("[a]", key_style),
                Span::raw(" Add   "),
                Span::styled("[g]", key_style),
                Span::raw(" Generate   "),
                Span::styled("[-]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[n]", key_style),
                Span::raw(" Count   "),
                Span::styled("[d]", key_style),
                Span::raw(" Draw   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reset   "),
                Span::styled("[c]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[x]", key_style),
                Span::raw(" Export   "),
                Span::styled("[o]", key_style),
                Span::raw(" Open   "),
                Span::styled("[t]", key_style),
                Span::raw(" Title   "),
                Span::styled("[m]", key_style),
                Span::raw(" Mute   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_text_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        label: &str,
        form: &TextForm,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(label), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = label.len() as u16 + 2;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_bulk_form(&self, frame: &mut Frame, area: Rect, form: &BulkForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Bulk Add").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let staged = form.entry_count();
        let plural = if staged == 1 { "" } else { "s" };
        let mut lines = vec![
            Line::from(format!("{staged} name{plural} staged")),
            Line::from(""),
        ];

        // Show the tail of what has been committed so a paste is visibly
        // landing.
        let tail_len = form.lines.len().min(3);
        for line in &form.lines[form.lines.len() - tail_len..] {
            lines.push(Line::from(Span::styled(
                line.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(form.current.clone(), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Type or paste one name per line. Enter on an empty line saves, Esc cancels.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_y = inner.y + 2 + tail_len as u16;
        let cursor_x = inner.x + 2 + form.current.chars().count() as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_generate_form(&self, frame: &mut Frame, area: Rect, form: &GenerateForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Generate Names").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let prefix_line = form.build_line("Prefix", GenerateField::Prefix);
        let count_line = form.build_line("Count", GenerateField::Count);
        let mut lines = vec![prefix_line, count_line, Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (cursor_x, cursor_y) = match form.active {
            GenerateField::Prefix => {
                let prefix = "Prefix: ".len() as u16;
                (
                    inner.x + prefix + form.value_len(GenerateField::Prefix) as u16,
                    inner.y,
                )
            }
            GenerateField::Count => {
                let prefix = "Count: ".len() as u16;
                (
                    inner.x + prefix + form.value_len(GenerateField::Count) as u16,
                    inner.y + 1,
                )
            }
        };
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_count_form(&self, frame: &mut Frame, area: Rect, form: &CountForm) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Winners per Draw")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line("Winners"), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Winners: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, body: &[&str]) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = body.iter().map(|text| Line::from(*text)).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_reveal(&self, frame: &mut Frame, area: Rect, winners: &[Participant]) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Winners").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(Span::styled(
                "Congratulations!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for winner in winners {
            lines.push(Line::from(Span::styled(
                winner.name.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to close.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
