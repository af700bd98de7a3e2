use crate::lookup::{RegionInfo, RegionInfoLookup};
use crate::session::{GameSession, GuessOutcome, RoundView};
use crate::{debug_log, info_log};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    NewGame,
    Exit,
}

/// Presentation boundary driven by [`game_loop`].
pub trait GameInterface {
    fn display_round(&mut self, view: &RoundView);

    /// `None` means no input is ready yet; the loop will call again right
    /// away, so an implementation returning `None` must block or sleep first.
    fn read_action(&mut self) -> Option<UserAction>;

    fn display_guess_outcome(&mut self, outcome: GuessOutcome);

    fn display_round_over(&mut self, view: &RoundView);

    /// Called once a region info lookup has been started for the round.
    fn display_region_lookup_started(&mut self) {}

    /// The lookup for the current round finished; `None` if it found nothing.
    fn display_region_info(&mut self, info: Option<&RegionInfo>);

    fn display_exit_message(&mut self);

    /// How long to block for region info once a round ends.
    /// Interfaces that keep polling `read_action` can leave this at zero.
    fn region_info_wait(&self) -> Duration {
        Duration::ZERO
    }
}

pub fn game_loop<I: GameInterface + ?Sized>(
    session: &mut GameSession,
    lookup: &RegionInfoLookup,
    interface: &mut I,
) {
    interface.display_round(&session.view());

    loop {
        if let Some(info) = lookup.poll(session.generation()) {
            interface.display_region_info(info.as_ref());
        }

        let Some(action) = interface.read_action() else {
            continue;
        };
        debug_log!("game_loop() - {:?}", action);

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::NewGame => {
                session.start_new_round();
                interface.display_round(&session.view());
            }
            UserAction::Guess(input) => {
                let outcome = session.submit_guess(&input);
                interface.display_guess_outcome(outcome);
                if outcome.is_accepted() {
                    let view = session.view();
                    interface.display_round(&view);
                    if view.status.is_terminal() {
                        finish_round(session, lookup, interface, &view);
                    }
                }
            }
        }
    }
}

fn finish_round<I: GameInterface + ?Sized>(
    session: &GameSession,
    lookup: &RegionInfoLookup,
    interface: &mut I,
    view: &RoundView,
) {
    interface.display_round_over(view);

    let generation = session.generation();
    if !lookup.request(session.puzzle().word(), generation) {
        return;
    }
    info_log!("Requested region info for round {}", generation);
    interface.display_region_lookup_started();

    let wait = interface.region_info_wait();
    if !wait.is_zero()
        && let Some(info) = lookup.wait(generation, wait)
    {
        interface.display_region_info(info.as_ref());
    }
}
