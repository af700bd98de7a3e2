//! Round state and guess handling.
//!
//! A [`GameSession`] owns the vocabulary, the current [`Puzzle`], and the
//! win/loss tallies. It is driven by two inputs, [`GameSession::submit_guess`]
//! and [`GameSession::start_new_round`], and exposes a [`RoundView`] for
//! rendering.
//!
//! # State Machine
//! `Playing` → `Won` when every distinct letter of the word has been guessed.
//! `Playing` → `Lost` when the wrong-guess count reaches the threshold.
//! Both terminal states only exit through `start_new_round`.

use crate::stats::{Outcome, SessionStats, StatsStore};
use crate::vocabulary::Vocabulary;
use crate::{debug_log, info_log};
use rand::Rng;
use rand::rngs::StdRng;

pub const DEFAULT_MAX_WRONG_GUESSES: u8 = 6;
pub const MAX_WRONG_GUESSES_LIMIT: u8 = 26;
pub const MASK_PLACEHOLDER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Playing,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Badge state of one letter of the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterStatus {
    Untried,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Input was not exactly one letter a-z.
    Invalid,
    /// The round already ended.
    RoundOver,
    Duplicate(char),
    Correct(char),
    Wrong(char),
}

impl GuessOutcome {
    /// Whether the guess changed the puzzle.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Correct(_) | Self::Wrong(_))
    }
}

/// Source of randomness for word selection.
pub trait WordPicker {
    /// Returns an index in `0..len`; `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl WordPicker for StdRng {
    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub max_wrong_guesses: u8,
}

impl GameConfig {
    pub fn new(max_wrong_guesses: u8) -> Self {
        Self {
            max_wrong_guesses: max_wrong_guesses.clamp(1, MAX_WRONG_GUESSES_LIMIT),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WRONG_GUESSES)
    }
}

/// Folds `input` to a single lowercase letter, or `None` if it is anything else.
pub fn normalize_guess(input: &str) -> Option<char> {
    let mut chars = input.chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() || !letter.is_ascii_lowercase() {
        return None;
    }
    Some(letter)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    word: String,
    guessed: Vec<char>,
    wrong_count: u8,
    status: RoundStatus,
}

impl Puzzle {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            guessed: Vec::new(),
            wrong_count: 0,
            status: RoundStatus::Playing,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Guessed letters in the order they were entered.
    pub fn guessed_letters(&self) -> &[char] {
        &self.guessed
    }

    pub fn wrong_count(&self) -> u8 {
        self.wrong_count
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed.contains(&letter)
    }

    pub fn is_solved(&self) -> bool {
        self.word.chars().all(|c| self.has_guessed(c))
    }

    pub fn letter_status(&self, letter: char) -> LetterStatus {
        if !self.has_guessed(letter) {
            LetterStatus::Untried
        } else if self.word.contains(letter) {
            LetterStatus::Correct
        } else {
            LetterStatus::Incorrect
        }
    }

    /// The word with unguessed letters replaced by `_`, space separated.
    pub fn display_mask(&self) -> String {
        let mut mask = String::with_capacity(self.word.len() * 2);
        for (i, c) in self.word.chars().enumerate() {
            if i > 0 {
                mask.push(' ');
            }
            mask.push(if self.has_guessed(c) { c } else { MASK_PLACEHOLDER });
        }
        mask
    }

    /// Records an unseen letter; returns whether it occurs in the word.
    fn record(&mut self, letter: char) -> bool {
        self.guessed.push(letter);
        let hit = self.word.contains(letter);
        if !hit {
            self.wrong_count += 1;
        }
        hit
    }

    /// Moves a playing round into its terminal state if one is reached.
    /// Returns the outcome only on the transition itself.
    fn resolve(&mut self, max_wrong_guesses: u8) -> Option<Outcome> {
        if self.status != RoundStatus::Playing {
            return None;
        }
        let outcome = if self.wrong_count >= max_wrong_guesses {
            Outcome::Loss
        } else if self.is_solved() {
            Outcome::Win
        } else {
            return None;
        };
        self.status = match outcome {
            Outcome::Win => RoundStatus::Won,
            Outcome::Loss => RoundStatus::Lost,
        };
        Some(outcome)
    }
}

/// Everything a presentation layer needs to draw the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundView {
    pub generation: u64,
    pub mask: String,
    pub word_length: usize,
    pub wrong_count: u8,
    pub max_wrong_guesses: u8,
    pub status: RoundStatus,
    pub guessed: Vec<(char, LetterStatus)>,
    pub alphabet: Vec<(char, LetterStatus)>,
    pub stats: SessionStats,
    /// The hidden word, only once the round is over.
    pub answer: Option<String>,
}

impl RoundView {
    pub fn remaining_attempts(&self) -> u8 {
        self.max_wrong_guesses.saturating_sub(self.wrong_count)
    }
}

pub struct GameSession {
    vocabulary: Vocabulary,
    config: GameConfig,
    picker: Box<dyn WordPicker>,
    stats_store: Box<dyn StatsStore>,
    stats: SessionStats,
    puzzle: Puzzle,
    generation: u64,
}

impl GameSession {
    /// Loads the stored tallies and starts the first round.
    pub fn new(
        vocabulary: Vocabulary,
        config: GameConfig,
        mut picker: Box<dyn WordPicker>,
        stats_store: Box<dyn StatsStore>,
    ) -> Self {
        let stats = stats_store.load();
        info_log!(
            "GameSession::new() - {} words, max wrong {}, stats {:?}",
            vocabulary.len(),
            config.max_wrong_guesses,
            stats
        );
        let puzzle = Puzzle::new(pick_word(&vocabulary, picker.as_mut()));
        Self {
            vocabulary,
            config,
            picker,
            stats_store,
            stats,
            puzzle,
            generation: 1,
        }
    }

    pub fn start_new_round(&mut self) {
        self.puzzle = Puzzle::new(pick_word(&self.vocabulary, self.picker.as_mut()));
        self.generation += 1;
        log::info!(
            "Round {} started ({} letters)",
            self.generation,
            self.puzzle.word.len()
        );
    }

    pub fn submit_guess(&mut self, input: &str) -> GuessOutcome {
        let Some(letter) = normalize_guess(input) else {
            debug_log!("submit_guess() - Rejected input {:?}", input);
            return GuessOutcome::Invalid;
        };
        if self.puzzle.status.is_terminal() {
            debug_log!("submit_guess() - Round over, ignoring '{}'", letter);
            return GuessOutcome::RoundOver;
        }
        if self.puzzle.has_guessed(letter) {
            return GuessOutcome::Duplicate(letter);
        }

        let outcome = if self.puzzle.record(letter) {
            GuessOutcome::Correct(letter)
        } else {
            GuessOutcome::Wrong(letter)
        };
        debug_log!(
            "submit_guess() - {:?}, wrong {}/{}",
            outcome,
            self.puzzle.wrong_count,
            self.config.max_wrong_guesses
        );

        if let Some(finished) = self.puzzle.resolve(self.config.max_wrong_guesses) {
            self.record_outcome(finished);
        }
        outcome
    }

    fn record_outcome(&mut self, outcome: Outcome) {
        self.stats.record(outcome);
        log::info!(
            "Round {} finished: {:?} (wins {}, losses {})",
            self.generation,
            outcome,
            self.stats.wins,
            self.stats.losses
        );
        if let Err(e) = self.stats_store.increment(outcome) {
            log::warn!("Could not persist stats: {e}");
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn status(&self) -> RoundStatus {
        self.puzzle.status
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Identifies the current round; bumped by every `start_new_round`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn remaining_attempts(&self) -> u8 {
        self.config
            .max_wrong_guesses
            .saturating_sub(self.puzzle.wrong_count)
    }

    pub fn view(&self) -> RoundView {
        let puzzle = &self.puzzle;
        RoundView {
            generation: self.generation,
            mask: puzzle.display_mask(),
            word_length: puzzle.word.chars().count(),
            wrong_count: puzzle.wrong_count,
            max_wrong_guesses: self.config.max_wrong_guesses,
            status: puzzle.status,
            guessed: puzzle
                .guessed
                .iter()
                .map(|&c| (c, puzzle.letter_status(c)))
                .collect(),
            alphabet: ('a'..='z').map(|c| (c, puzzle.letter_status(c))).collect(),
            stats: self.stats,
            answer: puzzle.status.is_terminal().then(|| puzzle.word.clone()),
        }
    }
}

fn pick_word(vocabulary: &Vocabulary, picker: &mut dyn WordPicker) -> String {
    let index = picker.pick_index(vocabulary.len()) % vocabulary.len();
    vocabulary.words()[index].clone()
}
