//! TUI (Terminal User Interface) module for HangBrain
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Layout
//! - Brain panel: an ASCII brain whose regions light up one by one as wrong
//!   guesses accumulate.
//! - Game panel: the display mask and an on-screen alphabet whose badges
//!   show untried, correct, and incorrect letters.
//! - Information panel: round outcome, tallies, and region info.
//!
//! # State Machine
//! - `Playing`: letters and the alphabet cursor submit guesses.
//! - `RoundOver`: ENTER or N starts a new round.

use crate::game_state::{GameInterface, UserAction};
use crate::lookup::RegionInfo;
use crate::session::{GuessOutcome, LetterStatus, RoundStatus, RoundView};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ALPHABET_ROW_LENGTH: usize = 13;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const LOOKUP_PENDING_MESSAGE: &str = "Looking up this region...";

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const FAILURE_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const MASK_STYLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Brain outline; digits mark which overlay region a cell belongs to.
const BRAIN_MAP: [&str; 11] = [
    "          1111122222            ",
    "       111111112222222          ",
    "     11111111111222222224       ",
    "    1111111111112222222444      ",
    "   111111111111122222224444     ",
    "   1111111111133322222244444    ",
    "    11111113333333332224444     ",
    "      1113333333333333554       ",
    "         33333333   655555      ",
    "                    66555       ",
    "                    66          ",
];

const REGIONS: [(&str, Color); 6] = [
    ("Frontal lobe", Color::Red),
    ("Parietal lobe", Color::Yellow),
    ("Temporal lobe", Color::Green),
    ("Occipital lobe", Color::Cyan),
    ("Cerebellum", Color::Blue),
    ("Brainstem", Color::Magenta),
];

/// How many overlay regions are colored after `wrong` of `max` misses.
/// Scales so the last region lights exactly when the round is lost.
pub fn regions_revealed(wrong: u8, max: u8) -> usize {
    if max == 0 {
        return REGIONS.len();
    }
    (usize::from(wrong) * REGIONS.len())
        .div_ceil(usize::from(max))
        .min(REGIONS.len())
}

fn badge_colors(status: LetterStatus) -> (Color, Color) {
    match status {
        LetterStatus::Untried => (Color::DarkGray, Color::White),
        LetterStatus::Correct => (Color::Green, Color::Black),
        LetterStatus::Incorrect => (Color::Red, Color::White),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    Playing,
    RoundOver,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    view: Option<&'a RoundView>,
    cursor: usize,
    state: TuiState,
    region_info: Option<&'a RegionInfo>,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    view: Option<RoundView>,
    cursor: usize,
    state: TuiState,
    region_info: Option<RegionInfo>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: raw mode, alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            view: None,
            cursor: 0,
            state: TuiState::Playing,
            region_info: None,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            view: self.view.as_ref(),
            cursor: self.cursor,
            state: self.state,
            region_info: self.region_info.as_ref(),
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Length(15), // Brain + game panels
                Constraint::Min(6),     // Info panel
                Constraint::Length(3),  // Status line
                Constraint::Length(3),  // Instructions
            ])
            .split(f.area());

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        Self::render_title(f, chunks[0]);
        if let Some(view) = ctx.view {
            Self::render_brain(f, panels[0], view);
            Self::render_game(f, panels[1], view, ctx.cursor, ctx.state);
        }
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("HANGBRAIN - Guess the brain region before all areas are colored!")
            .style(HEADER_STYLE)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_brain(f: &mut Frame, area: Rect, view: &RoundView) {
        let revealed = regions_revealed(view.wrong_count, view.max_wrong_guesses);
        let mut lines: Vec<Line> = BRAIN_MAP
            .iter()
            .map(|row| Self::brain_row(row, revealed))
            .collect();

        let badge_style = if view.wrong_count >= view.max_wrong_guesses {
            FAILURE_STYLE
        } else {
            INFO_STYLE
        };
        lines.push(Line::from(Span::styled(
            format!(
                "Wrong guesses: {}/{}",
                view.wrong_count, view.max_wrong_guesses
            ),
            badge_style,
        )));
        if revealed > 0 {
            let names: Vec<&str> = REGIONS[..revealed].iter().map(|(name, _)| *name).collect();
            lines.push(Line::from(names.join(", ")));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Brain Progress").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn brain_row(row: &str, revealed: usize) -> Line<'static> {
        let spans: Vec<Span> = row
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(region) => {
                    let index = region as usize - 1;
                    if index < revealed {
                        Span::styled("█", Style::default().fg(REGIONS[index].1))
                    } else {
                        Span::styled("░", Style::default().fg(Color::DarkGray))
                    }
                }
                None => Span::raw(" "),
            })
            .collect();
        Line::from(spans)
    }

    fn render_game(f: &mut Frame, area: Rect, view: &RoundView, cursor: usize, state: TuiState) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(view.mask.clone(), MASK_STYLE)),
            Line::from(""),
            Line::from(format!("Brain Region ({} letters)", view.word_length)),
            Line::from(format!("Remaining attempts: {}", view.remaining_attempts())),
            Line::from(""),
        ];

        for (row_index, row) in view.alphabet.chunks(ALPHABET_ROW_LENGTH).enumerate() {
            let mut spans = Vec::with_capacity(row.len() * 2);
            for (column, &(letter, status)) in row.iter().enumerate() {
                let (bg_color, fg_color) = badge_colors(status);
                let mut style = Style::default().fg(fg_color).bg(bg_color);
                if state == TuiState::Playing && row_index * ALPHABET_ROW_LENGTH + column == cursor {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                spans.push(Span::styled(
                    format!(" {} ", letter.to_ascii_uppercase()),
                    style,
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Game").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        if let Some(view) = ctx.view {
            match view.status {
                RoundStatus::Won => lines.push(Line::from(Span::styled(
                    format!(
                        "Congratulations! You correctly guessed: {}",
                        view.answer.as_deref().unwrap_or_default()
                    ),
                    SUCCESS_STYLE,
                ))),
                RoundStatus::Lost => lines.push(Line::from(Span::styled(
                    format!(
                        "Game Over! The brain region was: {}",
                        view.answer.as_deref().unwrap_or_default()
                    ),
                    FAILURE_STYLE,
                ))),
                RoundStatus::Playing => {}
            }
            lines.push(Line::from(format!(
                "Wins: {}  Losses: {}",
                view.stats.wins, view.stats.losses
            )));
        }

        if let Some(info) = ctx.region_info {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(info.title.clone(), HEADER_STYLE)));
            lines.push(Line::from(info.description.clone()));
            lines.push(Line::from(Span::styled(info.url.clone(), MESSAGE_STYLE)));
        }

        if !ctx.message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.message, MESSAGE_STYLE)));
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.error_message, ERROR_STYLE)));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::Playing => {
                "Type a letter or use ARROWS + ENTER to guess | ESC: Quit"
            }
            TuiState::RoundOver => "ENTER/N: Play again | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    /// Waits up to one poll interval for a key; `Ok(None)` on timeout or
    /// on events that do not map to an action.
    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        // Mouse, focus, paste and resize events carry no action
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        // Garbage from escape sequences when alt-tabbing
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }

        if key.code == KeyCode::Esc {
            info_log!("handle_input() - ESC pressed, returning Exit");
            return Ok(Some(UserAction::Exit));
        }

        Ok(match self.state {
            TuiState::Playing => self.handle_playing_input(key),
            TuiState::RoundOver => Self::handle_round_over_input(key),
        })
    }

    fn handle_playing_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        if Self::has_modifier_keys(&key) {
            debug_log!("handle_playing_input() - Ignoring key with modifier: {:?}", key.modifiers);
            return None;
        }

        match key.code {
            KeyCode::Char(c) => Some(UserAction::Guess(c.to_string())),
            KeyCode::Enter => {
                let letter = self
                    .view
                    .as_ref()
                    .and_then(|view| view.alphabet.get(self.cursor))
                    .map(|&(letter, _)| letter)?;
                Some(UserAction::Guess(letter.to_string()))
            }
            KeyCode::Left => {
                self.cursor = move_cursor(self.cursor, -1);
                None
            }
            KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, 1);
                None
            }
            KeyCode::Up => {
                self.cursor = move_cursor(self.cursor, -(ALPHABET_ROW_LENGTH as isize));
                None
            }
            KeyCode::Down => {
                self.cursor = move_cursor(self.cursor, ALPHABET_ROW_LENGTH as isize);
                None
            }
            _ => {
                debug_log!("handle_playing_input() - Ignoring key: {:?}", key.code);
                None
            }
        }
    }

    fn handle_round_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n' | 'N') => Some(UserAction::NewGame),
            _ => None,
        }
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// Moves the alphabet cursor by `delta`, wrapping around the 26 letters.
fn move_cursor(cursor: usize, delta: isize) -> usize {
    (cursor as isize + delta).rem_euclid(26) as usize
}

impl GameInterface for TuiInterface {
    fn display_round(&mut self, view: &RoundView) {
        let new_round = self
            .view
            .as_ref()
            .is_none_or(|current| current.generation != view.generation);
        if new_round {
            self.region_info = None;
            self.message.clear();
            self.error_message.clear();
            self.state = TuiState::Playing;
            self.status = format!("New round - {} letters", view.word_length);
        }
        self.view = Some(view.clone());
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        if self.draw().is_err() {
            info_log!("read_action() - Draw failed, returning Exit");
            return Some(UserAction::Exit);
        }
        match self.handle_input() {
            Ok(action) => action,
            Err(e) => {
                info_log!("read_action() - Error handling input: {}", e);
                Some(UserAction::Exit)
            }
        }
    }

    fn display_guess_outcome(&mut self, outcome: GuessOutcome) {
        self.error_message.clear();
        match outcome {
            GuessOutcome::Invalid => {
                self.error_message = "Only letters A-Z can be guessed!".to_string();
            }
            GuessOutcome::RoundOver => {
                self.error_message = "This round is over.".to_string();
            }
            GuessOutcome::Duplicate(c) => {
                self.error_message =
                    format!("You already guessed '{}'!", c.to_ascii_uppercase());
            }
            GuessOutcome::Correct(c) => {
                self.status = format!("'{}' is in the word", c.to_ascii_uppercase());
            }
            GuessOutcome::Wrong(c) => {
                self.status = format!("'{}' is not in the word", c.to_ascii_uppercase());
            }
        }
        self.draw_or_log();
    }

    fn display_round_over(&mut self, view: &RoundView) {
        self.state = TuiState::RoundOver;
        self.view = Some(view.clone());
        self.status = match view.status {
            RoundStatus::Won => "You won!".to_string(),
            _ => "Round lost".to_string(),
        };
        self.draw_or_log();
    }

    fn display_region_lookup_started(&mut self) {
        self.message = LOOKUP_PENDING_MESSAGE.to_string();
        self.draw_or_log();
    }

    fn display_region_info(&mut self, info: Option<&RegionInfo>) {
        self.region_info = info.cloned();
        if self.message == LOOKUP_PENDING_MESSAGE {
            self.message.clear();
        }
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_revealed_default_threshold() {
        let revealed: Vec<usize> = (0..=6).map(|wrong| regions_revealed(wrong, 6)).collect();
        assert_eq!(revealed, [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_regions_revealed_scales_to_threshold() {
        assert_eq!(regions_revealed(0, 3), 0);
        assert_eq!(regions_revealed(1, 3), 2);
        assert_eq!(regions_revealed(3, 3), 6);
        assert_eq!(regions_revealed(1, 12), 1);
        assert_eq!(regions_revealed(11, 12), 6);
        assert_eq!(regions_revealed(7, 6), 6);
    }

    #[test]
    fn test_brain_map_uses_known_regions() {
        for row in BRAIN_MAP {
            for c in row.chars() {
                match c.to_digit(10) {
                    Some(region) => assert!((1..=REGIONS.len() as u32).contains(&region)),
                    None => assert_eq!(c, ' '),
                }
            }
        }
        for region in 1..=REGIONS.len() {
            let digit = char::from_digit(region as u32, 10).unwrap();
            assert!(BRAIN_MAP.iter().any(|row| row.contains(digit)));
        }
    }

    #[test]
    fn test_move_cursor_wraps() {
        assert_eq!(move_cursor(0, -1), 25);
        assert_eq!(move_cursor(25, 1), 0);
        assert_eq!(move_cursor(3, 13), 16);
        assert_eq!(move_cursor(20, 13), 7);
        assert_eq!(move_cursor(5, -13), 18);
    }

    #[test]
    fn test_round_over_keys() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let n = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(TuiInterface::handle_round_over_input(enter), Some(UserAction::NewGame));
        assert_eq!(TuiInterface::handle_round_over_input(n), Some(UserAction::NewGame));
        assert_eq!(TuiInterface::handle_round_over_input(other), None);
    }

    #[test]
    fn test_badge_colors_distinguish_states() {
        let untried = badge_colors(LetterStatus::Untried);
        let correct = badge_colors(LetterStatus::Correct);
        let incorrect = badge_colors(LetterStatus::Incorrect);
        assert_ne!(untried, correct);
        assert_ne!(correct, incorrect);
        assert_ne!(untried, incorrect);
    }
}
