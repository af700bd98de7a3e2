// Library interface for hangbrain
// This allows integration tests to access internal modules

pub mod cli;
pub mod game_state;
pub mod logging;
pub mod lookup;
pub mod session;
pub mod stats;
pub mod tui;
pub mod vocabulary;

/// Directory name under the platform data dir for stats and logs.
pub const APP_DIR_NAME: &str = "hangbrain";

// Re-export commonly used items for easier testing
pub use game_state::{GameInterface, UserAction, game_loop};
pub use lookup::{RegionInfo, RegionInfoLookup, RegionInfoSource};
pub use session::{
    GameConfig, GameSession, GuessOutcome, LetterStatus, RoundStatus, RoundView, WordPicker,
};
pub use stats::{FileStatsStore, MemoryStatsStore, Outcome, SessionStats, StatsStore};
pub use vocabulary::{Vocabulary, load_vocabulary_from_file, load_vocabulary_from_str};
