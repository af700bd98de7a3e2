use crate::game_state::{GameInterface, UserAction};
use crate::lookup::{RegionInfo, RegionInfoLookup, WikipediaSource};
use crate::session::{
    DEFAULT_MAX_WRONG_GUESSES, GameConfig, GuessOutcome, LetterStatus, RoundStatus, RoundView,
};
use crate::stats::{FileStatsStore, MemoryStatsStore, StatsStore};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_REGION_INFO_WAIT: Duration = Duration::from_secs(3);

/// HangBrain: guess the brain region before the whole brain lights up
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited vocabulary file
    #[arg(short = 'w', long = "words")]
    pub words_path: Option<PathBuf>,

    /// Wrong guesses allowed before the round is lost
    #[arg(
        short = 'm',
        long = "max-wrong",
        default_value_t = DEFAULT_MAX_WRONG_GUESSES,
        value_parser = clap::value_parser!(u8).range(1..=26)
    )]
    pub max_wrong_guesses: u8,

    /// Seed for reproducible word selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to keep win/loss counters (default: user data dir)
    #[arg(long = "stats-file")]
    pub stats_path: Option<PathBuf>,

    /// Keep win/loss counters in memory only
    #[arg(long = "no-stats", conflicts_with = "stats_path")]
    pub no_stats: bool,

    /// Skip looking up the solved word online
    #[arg(long)]
    pub offline: bool,

    /// Line-oriented input/output instead of the full-screen interface
    #[arg(long)]
    pub plain: bool,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.max_wrong_guesses)
    }

    pub fn stats_store(&self) -> Box<dyn StatsStore> {
        if self.no_stats {
            return Box::new(MemoryStatsStore::default());
        }
        match self.stats_path.clone().or_else(FileStatsStore::default_path) {
            Some(path) => Box::new(FileStatsStore::new(path)),
            None => {
                log::warn!("No data directory available; stats will not be saved");
                Box::new(MemoryStatsStore::default())
            }
        }
    }

    pub fn region_lookup(&self) -> RegionInfoLookup {
        if self.offline {
            return RegionInfoLookup::disabled();
        }
        match WikipediaSource::new() {
            Ok(source) => RegionInfoLookup::new(Arc::new(source)),
            Err(e) => {
                log::warn!("Region info lookup unavailable: {e}");
                RegionInfoLookup::disabled()
            }
        }
    }
}

// UI Input/Output functions

pub fn parse_action(line: &str) -> UserAction {
    let input = line.trim();
    match input.to_ascii_lowercase().as_str() {
        "exit" | "quit" => UserAction::Exit,
        "new" | "next" => UserAction::NewGame,
        _ => UserAction::Guess(input.to_string()),
    }
}

/// `P O [X] [Z]`: hits upper case, misses bracketed.
pub fn format_guessed(guessed: &[(char, LetterStatus)]) -> String {
    guessed
        .iter()
        .map(|&(letter, status)| {
            let letter = letter.to_ascii_uppercase();
            match status {
                LetterStatus::Incorrect => format!("[{letter}]"),
                LetterStatus::Correct | LetterStatus::Untried => letter.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_round_result(view: &RoundView) -> String {
    let answer = view.answer.as_deref().unwrap_or_default();
    match view.status {
        RoundStatus::Won => format!("Congratulations! You correctly guessed: {answer}"),
        RoundStatus::Lost => format!("Game Over! The brain region was: {answer}"),
        RoundStatus::Playing => String::new(),
    }
}

pub fn format_outcome(outcome: GuessOutcome) -> String {
    match outcome {
        GuessOutcome::Invalid => "Invalid guess. Please enter a single letter a-z.".to_string(),
        GuessOutcome::RoundOver => "This round is over. Type 'new' to play again.".to_string(),
        GuessOutcome::Duplicate(c) => format!("You already guessed '{}'.", c.to_ascii_uppercase()),
        GuessOutcome::Correct(c) => format!("'{}' is in the word.", c.to_ascii_uppercase()),
        GuessOutcome::Wrong(c) => format!("'{}' is not in the word.", c.to_ascii_uppercase()),
    }
}

pub fn display_round(view: &RoundView) {
    println!("\n{}", view.mask);
    println!("Brain Region ({} letters)", view.word_length);
    println!(
        "Wrong guesses: {}/{}",
        view.wrong_count, view.max_wrong_guesses
    );
    if !view.guessed.is_empty() {
        println!("Guessed letters: {}", format_guessed(&view.guessed));
    }
}

pub fn display_round_over(view: &RoundView) {
    println!("{}", format_round_result(view));
    println!("Wins: {}  Losses: {}", view.stats.wins, view.stats.losses);
}

pub fn display_region_info(info: &RegionInfo) {
    println!("About {}: {}", info.title, info.description);
    println!("{}", info.url);
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
    region_info_wait: Duration,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            region_info_wait: DEFAULT_REGION_INFO_WAIT,
        }
    }

    #[must_use]
    pub fn with_region_info_wait(mut self, wait: Duration) -> Self {
        self.region_info_wait = wait;
        self
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_round(&mut self, view: &RoundView) {
        display_round(view);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        println!("\nGuess a letter ('new' for a new round, 'exit' to quit):");
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => Some(UserAction::Exit),
            Ok(_) => Some(parse_action(&input)),
            Err(e) => {
                log::warn!("Failed to read input: {e}");
                Some(UserAction::Exit)
            }
        }
    }

    fn display_guess_outcome(&mut self, outcome: GuessOutcome) {
        if !outcome.is_accepted() {
            println!("{}", format_outcome(outcome));
        }
    }

    fn display_round_over(&mut self, view: &RoundView) {
        display_round_over(view);
    }

    fn display_region_info(&mut self, info: Option<&RegionInfo>) {
        if let Some(info) = info {
            display_region_info(info);
        }
    }

    fn display_exit_message(&mut self) {
        println!("Exiting.");
    }

    fn region_info_wait(&self) -> Duration {
        self.region_info_wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SessionStats;
    use std::io::Cursor;

    fn view(status: RoundStatus, answer: Option<&str>) -> RoundView {
        RoundView {
            generation: 1,
            mask: "p _ _ _".to_string(),
            word_length: 4,
            wrong_count: 2,
            max_wrong_guesses: 6,
            status,
            guessed: vec![('p', LetterStatus::Correct), ('x', LetterStatus::Incorrect)],
            alphabet: Vec::new(),
            stats: SessionStats::default(),
            answer: answer.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["hangbrain"]).unwrap();
        assert_eq!(cli.words_path, None);
        assert_eq!(cli.max_wrong_guesses, 6);
        assert_eq!(cli.seed, None);
        assert!(!cli.no_stats);
        assert!(!cli.offline);
        assert!(!cli.plain);
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "hangbrain",
            "-w",
            "words.txt",
            "-m",
            "5",
            "--seed",
            "7",
            "--stats-file",
            "/tmp/stats.json",
            "--offline",
            "--plain",
        ])
        .unwrap();
        assert_eq!(cli.words_path, Some(PathBuf::from("words.txt")));
        assert_eq!(cli.max_wrong_guesses, 5);
        assert_eq!(cli.game_config().max_wrong_guesses, 5);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.stats_path, Some(PathBuf::from("/tmp/stats.json")));
        assert!(cli.offline);
        assert!(cli.plain);
    }

    #[test]
    fn test_parse_cli_rejects_out_of_range_threshold() {
        assert!(Cli::try_parse_from(["hangbrain", "-m", "0"]).is_err());
        assert!(Cli::try_parse_from(["hangbrain", "-m", "27"]).is_err());
    }

    #[test]
    fn test_no_stats_conflicts_with_stats_file() {
        assert!(Cli::try_parse_from(["hangbrain", "--no-stats", "--stats-file", "x.json"]).is_err());
    }

    #[test]
    fn test_offline_lookup_is_disabled() {
        let cli = Cli::try_parse_from(["hangbrain", "--offline"]).unwrap();
        assert!(!cli.region_lookup().is_enabled());
    }

    #[test]
    fn test_no_stats_store_starts_at_zero() {
        let cli = Cli::try_parse_from(["hangbrain", "--no-stats"]).unwrap();
        assert_eq!(cli.stats_store().load(), SessionStats::default());
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("exit\n"), UserAction::Exit);
        assert_eq!(parse_action("QUIT"), UserAction::Exit);
        assert_eq!(parse_action(" new "), UserAction::NewGame);
        assert_eq!(parse_action("Next"), UserAction::NewGame);
        assert_eq!(parse_action("P\n"), UserAction::Guess("P".to_string()));
        assert_eq!(parse_action("ab"), UserAction::Guess("ab".to_string()));
        assert_eq!(parse_action("\n"), UserAction::Guess(String::new()));
    }

    #[test]
    fn test_format_guessed() {
        let guessed = [
            ('p', LetterStatus::Correct),
            ('x', LetterStatus::Incorrect),
            ('o', LetterStatus::Correct),
        ];
        assert_eq!(format_guessed(&guessed), "P [X] O");
        assert_eq!(format_guessed(&[]), "");
    }

    #[test]
    fn test_format_round_result() {
        assert_eq!(
            format_round_result(&view(RoundStatus::Won, Some("pons"))),
            "Congratulations! You correctly guessed: pons"
        );
        assert_eq!(
            format_round_result(&view(RoundStatus::Lost, Some("pons"))),
            "Game Over! The brain region was: pons"
        );
        assert_eq!(format_round_result(&view(RoundStatus::Playing, None)), "");
    }

    #[test]
    fn test_format_outcome() {
        assert_eq!(
            format_outcome(GuessOutcome::Duplicate('p')),
            "You already guessed 'P'."
        );
        assert_eq!(
            format_outcome(GuessOutcome::Wrong('x')),
            "'X' is not in the word."
        );
    }

    #[test]
    fn test_read_action_from_reader() {
        let mut interface = CliInterface::new(Cursor::new("p\nnew\nexit\n"));
        assert_eq!(
            interface.read_action(),
            Some(UserAction::Guess("p".to_string()))
        );
        assert_eq!(interface.read_action(), Some(UserAction::NewGame));
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }

    #[test]
    fn test_read_action_eof_exits() {
        let mut interface = CliInterface::new(Cursor::new(""));
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }

    #[test]
    fn test_region_info_wait_is_configurable() {
        let interface =
            CliInterface::new(Cursor::new("")).with_region_info_wait(Duration::from_millis(10));
        assert_eq!(interface.region_info_wait(), Duration::from_millis(10));
        assert_eq!(
            CliInterface::new(Cursor::new("")).region_info_wait(),
            DEFAULT_REGION_INFO_WAIT
        );
    }
}
