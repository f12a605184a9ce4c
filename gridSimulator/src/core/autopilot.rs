// Greedy built-in player, used for batch runs and replay tests
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::config::game_config::GameConfig;
use crate::config::tech_type::TechType;
use crate::core::commands::Command;
use crate::core::phase::Phase;
use crate::core::session::Session;
use crate::models::generation_unit::GenerationUnit;
use crate::utils::logging::{self, OperationCategory};
use crate::utils::traits::Dispatch;

const MAX_AUTOPILOT_STEPS: usize = 50_000;

// Stage-up preference while short of demand
const RAISE_ORDER: [TechType; 11] = [
    TechType::Solar,
    TechType::Wind,
    TechType::Tidal,
    TechType::Wave,
    TechType::Hydro,
    TechType::Storage,
    TechType::Fission,
    TechType::Geothermal,
    TechType::Combined,
    TechType::Coal,
    TechType::Peaker,
];

// Stage-down preference while the surplus cannot be stored
const LOWER_ORDER: [TechType; 6] = [
    TechType::Peaker,
    TechType::Coal,
    TechType::Combined,
    TechType::Storage,
    TechType::Geothermal,
    TechType::Hydro,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Allocation {
    Stage,
    Advance,
}

/// Chooses one command at a time by looking at the session state
#[derive(Debug, Clone)]
pub struct Autopilot {
    portfolio: Vec<TechType>,
    allocation: Allocation,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(vec![
            TechType::Combined,
            TechType::Hydro,
            TechType::Storage,
            TechType::Wind,
            TechType::Solar,
            TechType::Coal,
        ])
    }
}

/// Outcome of one autopiloted session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoplayOutcome {
    pub seed: u64,
    pub score: f64,
    pub rounds: usize,
    pub unpowered_rounds: usize,
    pub final_smog_ratio: f64,
    pub completed: bool,
}

fn would_change(unit: &GenerationUnit, up: bool) -> bool {
    let mut probe = unit.clone();
    if up {
        probe.stage_up();
    } else {
        probe.stage_down();
    }
    probe.mustered() != unit.mustered()
}

fn storage_headroom(session: &Session) -> u32 {
    session
        .units()
        .iter()
        .flatten()
        .filter(|u| u.tech() == TechType::Storage)
        .filter_map(|u| u.store().map(|s| s.headroom()))
        .sum()
}

impl Autopilot {
    /// The portfolio should include at least one 1-token technology so any token
    /// remainder can be spent.
    pub fn new(portfolio: Vec<TechType>) -> Self {
        Self {
            portfolio,
            allocation: Allocation::Stage,
        }
    }

    /// Next command for the session, or None once the day is over
    pub fn next_command(&mut self, session: &Session) -> Option<Command> {
        match session.phase() {
            Phase::Menu | Phase::GeothermalExploration => Some(Command::Confirm),
            Phase::SelectTechnology => Some(self.select(session)),
            Phase::AllocateCapacity => Some(self.allocate(session)),
            Phase::ActivePlay => Some(self.dispatch(session)),
            Phase::GameOver => None,
        }
    }

    fn select(&self, session: &Session) -> Command {
        let selection = session.selection();
        let wanted = self.portfolio.get(selection.index).copied();
        if selection.selected() != wanted {
            Command::StageUp
        } else if selection.index + 1 < self.portfolio.len().min(selection.slots.len()) {
            Command::SlotRight
        } else {
            Command::Confirm
        }
    }

    fn allocate(&mut self, session: &Session) -> Command {
        if session.tokens() == 0 {
            return Command::Confirm;
        }
        let affordable = session.units()[session.selection().index]
            .as_ref()
            .map_or(false, |u| u.tech().token_cost() <= session.tokens());
        if self.allocation == Allocation::Stage && affordable {
            self.allocation = Allocation::Advance;
            Command::StageUp
        } else {
            self.allocation = Allocation::Stage;
            Command::SlotRight
        }
    }

    fn dispatch(&self, session: &Session) -> Command {
        let demand = session.demand().current;
        let staged: u32 = session.units().iter().flatten().map(|u| u.mustered()).sum();
        let target = if staged < demand {
            self.pick(session, &RAISE_ORDER, true)
        } else if staged > demand + storage_headroom(session) {
            self.pick(session, &LOWER_ORDER, false)
        } else {
            None
        };
        match target {
            Some((slot, up)) if slot == session.selection().index => {
                if up { Command::StageUp } else { Command::StageDown }
            }
            Some(_) => Command::SlotRight,
            None => Command::Confirm,
        }
    }

    fn pick(&self, session: &Session, order: &[TechType], up: bool) -> Option<(usize, bool)> {
        order.iter().find_map(|tech| {
            session.units().iter().enumerate().find_map(|(slot, unit)| {
                unit.as_ref()
                    .filter(|u| u.tech() == *tech && would_change(u, up))
                    .map(|_| (slot, up))
            })
        })
    }
}

/// Plays one session to the end of the day
pub fn play_session(config: &GameConfig, seed: u64, mut autopilot: Autopilot) -> (Session, AutoplayOutcome) {
    let mut session = Session::new(config.clone(), seed);
    let mut steps = 0;
    while let Some(command) = autopilot.next_command(&session) {
        session.apply(command);
        session.run_transition();
        steps += 1;
        if steps >= MAX_AUTOPILOT_STEPS {
            warn!("Autopilot gave up on seed {} after {} steps", seed, steps);
            break;
        }
    }
    let outcome = AutoplayOutcome {
        seed,
        score: session.score(),
        rounds: session.rounds().len(),
        unpowered_rounds: session.rounds().iter().filter(|r| !r.powered).count(),
        final_smog_ratio: session.resources().smog_ratio,
        completed: session.phase() == Phase::GameOver,
    };
    (session, outcome)
}

/// Plays `seeds.len()` independent sessions in parallel
pub fn run_autoplay(config: &GameConfig, seeds: &[u64], show_progress: bool) -> Vec<AutoplayOutcome> {
    let _timing = logging::start_timing("run_autoplay", OperationCategory::Session);
    let progress = if show_progress {
        let bar = ProgressBar::new(seeds.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} sessions")
        {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let outcomes: Vec<AutoplayOutcome> = seeds
        .par_iter()
        .map(|&seed| {
            let (_, outcome) = play_session(config, seed, Autopilot::default());
            progress.inc(1);
            outcome
        })
        .collect();
    progress.finish_and_clear();

    let mean = outcomes.iter().map(|o| o.score).sum::<f64>() / outcomes.len().max(1) as f64;
    info!("Autoplay finished {} sessions, mean score {:.2}", outcomes.len(), mean);
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> GameConfig {
        GameConfig {
            forecast_trials: 16,
            ..GameConfig::default()
        }
    }

    #[test]
    fn autopilot_finishes_the_day() {
        let (session, outcome) = play_session(&quick_config(), 3, Autopilot::default());
        assert!(outcome.completed);
        assert_eq!(outcome.rounds, 24);
        assert_eq!(session.tokens(), 0);
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn autopilot_keeps_the_lights_on_with_firm_capacity() {
        let pilot = Autopilot::new(vec![TechType::Peaker, TechType::Coal]);
        let (_, outcome) = play_session(&quick_config(), 12, pilot);
        assert!(outcome.completed);
        assert_eq!(outcome.unpowered_rounds, 0);
    }

    #[test]
    fn batch_results_come_back_in_seed_order() {
        let outcomes = run_autoplay(&quick_config(), &[4, 5, 6], false);
        assert_eq!(outcomes.iter().map(|o| o.seed).collect::<Vec<_>>(), vec![4, 5, 6]);
        assert!(outcomes.iter().all(|o| o.completed));
    }
}
