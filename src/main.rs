use anyhow::Context;
use hangbrain::cli::{CliInterface, parse_cli};
use hangbrain::logging::init_logging;
use hangbrain::session::{GameSession, WordPicker};
use hangbrain::tui::TuiInterface;
use hangbrain::vocabulary::{Vocabulary, load_vocabulary_from_file};
use hangbrain::game_loop;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    let log_path = init_logging();
    log::info!("Starting hangbrain, logging to {:?}", log_path);

    let vocabulary = match &cli.words_path {
        Some(path) => load_vocabulary_from_file(path)
            .with_context(|| format!("Failed to load word list from '{}'", path.display()))?,
        None => Vocabulary::embedded().context("Built-in word list is unusable")?,
    };

    let picker: Box<dyn WordPicker> = Box::new(match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    });
    let mut session = GameSession::new(vocabulary, cli.game_config(), picker, cli.stats_store());
    let lookup = cli.region_lookup();

    if cli.plain {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&mut session, &lookup, &mut interface);
    } else {
        let mut interface = TuiInterface::new().context("Failed to set up the terminal")?;
        game_loop(&mut session, &lookup, &mut interface);
    }

    let stats = session.stats();
    log::info!("Exiting with {} wins, {} losses", stats.wins, stats.losses);
    Ok(())
}
