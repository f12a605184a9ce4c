// Session: owns every piece of game state and applies one command at a time
use std::collections::BTreeMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::config::constants::*;
use crate::config::game_config::GameConfig;
use crate::config::tech_type::TechType;
use crate::config::texts::{KEY_BINDING_PAGES, TUTORIAL_PAGES};
use crate::core::allocation::{build_unit, decrease_capacity, increase_capacity};
use crate::core::commands::{Command, GameEvent, Overlay, Prompt};
use crate::core::exploration::DiceRoll;
use crate::core::phase::{Phase, SlotSelection};
use crate::core::settlement::{settle, SettlementReport};
use crate::core::transition::advance_frame;
use crate::models::generation_unit::GenerationUnit;
use crate::resources::demand::DemandSeries;
use crate::resources::forecast::{run_forecast, Forecast};
use crate::resources::generators::{current_sample, roll_initial_state, roll_next_targets, roll_tidal_offset};
use crate::resources::state::ResourceState;
use crate::utils::logging::{self, OperationCategory};
use crate::utils::traits::Dispatch;

/// Pending load deferral while the player picks an amount and a target hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDeferral {
    pub load: u32,
    pub max_load: u32,
    pub target_hour: usize,
}

/// One settled round, as exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub hour: u32,
    pub demand: u32,
    pub total_dispatch: u32,
    pub dispatch_by_tech: BTreeMap<TechType, u32>,
    pub stored: u32,
    pub unstored: u32,
    pub score_delta: f64,
    pub score: f64,
    pub smog_ratio: f64,
    pub powered: bool,
}

/// Per-slot state a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitView {
    pub tech: TechType,
    pub capacity_gw: u32,
    pub mustered: u32,
    pub last_committed: Option<u32>,
    pub fill_ratio: f64,
    pub running: bool,
    pub charge: Option<u32>,
    pub energy_capacity: Option<u32>,
    pub charge_ratio: Option<f64>,
    pub rolls_left: Option<u32>,
}

impl UnitView {
    fn from_unit(unit: &GenerationUnit) -> Self {
        let store = unit.store();
        Self {
            tech: unit.tech(),
            capacity_gw: unit.capacity_gw(),
            mustered: unit.mustered(),
            last_committed: unit.core().last_committed(),
            fill_ratio: unit.core().fill_ratio(),
            running: unit.core().running,
            charge: store.map(|s| s.charge),
            energy_capacity: store.map(|s| s.energy_capacity),
            charge_ratio: store.map(|s| s.charge_ratio()),
            rolls_left: unit.as_geothermal().map(|g| g.rolls_left),
        }
    }
}

/// Snapshot of everything observable about a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub selection_index: usize,
    pub slots: Vec<Option<TechType>>,
    pub tokens: u32,
    pub units: Vec<Option<UnitView>>,
    pub hour: f64,
    pub demand: u32,
    pub demand_history: Vec<u32>,
    pub forecast: Forecast,
    pub resources: ResourceState,
    pub score: f64,
    pub powered: bool,
    pub summary: String,
    pub transitioning: bool,
    pub overlay: Option<Overlay>,
    pub overlay_text: Option<String>,
    pub prompt: Option<Prompt>,
    pub deferral: Option<LoadDeferral>,
    pub can_defer: bool,
    pub dice: DiceRoll,
    pub quit_requested: bool,
}

pub struct Session {
    config: GameConfig,
    rng: StdRng,
    phase: Phase,
    selection: SlotSelection,
    tokens: u32,
    units: Vec<Option<GenerationUnit>>,
    resources: ResourceState,
    demand: DemandSeries,
    forecast: Forecast,
    score: f64,
    powered: bool,
    transitioning: bool,
    overlay: Option<Overlay>,
    prompt: Option<Prompt>,
    deferral: Option<LoadDeferral>,
    can_defer: bool,
    dice: DiceRoll,
    quit_requested: bool,
    last_report: Option<SettlementReport>,
    summary: String,
    rounds: Vec<RoundRecord>,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let tidal_offset = roll_tidal_offset(&mut rng);
        let phase = if config.skip_menu { Phase::SelectTechnology } else { Phase::Menu };
        info!("New session (seed {}), starting at {}", seed, phase);
        Self {
            tokens: config.total_tokens,
            config,
            rng,
            phase,
            selection: SlotSelection::default(),
            units: vec![None; SLOT_COUNT],
            resources: ResourceState::new(tidal_offset),
            demand: DemandSeries::default(),
            forecast: Forecast::default(),
            score: 0.0,
            powered: true,
            transitioning: false,
            overlay: None,
            prompt: None,
            deferral: None,
            can_defer: true,
            dice: DiceRoll::default(),
            quit_requested: false,
            last_report: None,
            summary: String::new(),
            rounds: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> &SlotSelection {
        &self.selection
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    pub fn units(&self) -> &[Option<GenerationUnit>] {
        &self.units
    }

    pub fn resources(&self) -> &ResourceState {
        &self.resources
    }

    pub fn demand(&self) -> &DemandSeries {
        &self.demand
    }

    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn deferral(&self) -> Option<LoadDeferral> {
        self.deferral
    }

    pub fn can_defer(&self) -> bool {
        self.can_defer
    }

    pub fn dice(&self) -> &DiceRoll {
        &self.dice
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn last_report(&self) -> Option<&SettlementReport> {
        self.last_report.as_ref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn selected_unit_mut(&mut self) -> Option<&mut GenerationUnit> {
        self.units[self.selection.index].as_mut()
    }

    fn set_phase(&mut self, to: Phase, events: &mut Vec<GameEvent>) {
        if self.phase == to {
            return;
        }
        info!("Phase change: {} -> {}", self.phase, to);
        events.push(GameEvent::PhaseChanged { from: self.phase, to });
        self.phase = to;
    }

    /// Applies one command. Commands that do not fit the current state are ignored.
    pub fn apply(&mut self, command: Command) -> Vec<GameEvent> {
        let _timing = logging::start_timing("apply_command", OperationCategory::Session);
        let mut events = Vec::new();
        debug!("Command {:?} in {}", command, self.phase);

        if self.phase == Phase::GameOver {
            self.reset(&mut events);
            return events;
        }

        if self.transitioning {
            if command == Command::Confirm {
                self.resources.snap_to_targets();
                self.finish_transition(&mut events);
            }
            return events;
        }

        if let Some(prompt) = self.prompt {
            self.answer_prompt(prompt, command, &mut events);
            return events;
        }

        if self.deferral.is_some() {
            self.apply_deferral(command, &mut events);
            return events;
        }

        match command {
            Command::Cancel => {
                self.open_prompt(Prompt::QuitGame, &mut events);
                return events;
            }
            Command::ToggleEnergyOverlay | Command::ToggleForecastOverlay
            | Command::ShowInfo | Command::ShowTutorial | Command::ShowKeyBindings => {
                self.toggle_overlay(command, &mut events);
                return events;
            }
            _ => {}
        }

        match self.phase {
            Phase::Menu => {
                if command == Command::Confirm {
                    self.set_phase(Phase::SelectTechnology, &mut events);
                }
            }
            Phase::SelectTechnology => self.apply_select(command, &mut events),
            Phase::AllocateCapacity => self.apply_allocate(command, &mut events),
            Phase::GeothermalExploration => {
                if command == Command::Confirm {
                    self.explore_step(&mut events);
                }
            }
            Phase::ActivePlay => self.apply_play(command, &mut events),
            Phase::GameOver => {}
        }
        events
    }

    /// Advances one frame: the inter-round transition and the die animation
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.transitioning {
            let complete = advance_frame(
                &mut self.resources,
                self.config.hours_per_frame(),
                self.config.weather_step_per_frame,
            );
            if complete {
                self.finish_transition(&mut events);
            }
        } else if self.phase == Phase::GeothermalExploration {
            self.dice.animate();
        }
        events
    }

    /// Ticks until the pending transition, if any, has finished
    pub fn run_transition(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while self.transitioning {
            events.extend(self.tick());
        }
        events
    }

    fn answer_prompt(&mut self, prompt: Prompt, command: Command, events: &mut Vec<GameEvent>) {
        match (prompt, command) {
            (Prompt::QuitRound, Command::Yes) => {
                self.prompt = None;
                events.push(GameEvent::PromptClosed { prompt });
                self.reset(events);
            }
            (Prompt::QuitGame, Command::Yes) => {
                self.prompt = None;
                self.quit_requested = true;
                info!("Quit requested");
                events.push(GameEvent::PromptClosed { prompt });
                events.push(GameEvent::QuitRequested);
            }
            (_, Command::No) | (_, Command::Cancel) => {
                self.prompt = None;
                events.push(GameEvent::PromptClosed { prompt });
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self, prompt: Prompt, events: &mut Vec<GameEvent>) {
        self.prompt = Some(prompt);
        events.push(GameEvent::PromptOpened { prompt });
    }

    fn toggle_overlay(&mut self, command: Command, events: &mut Vec<GameEvent>) {
        let next = match (command, self.overlay) {
            (Command::ToggleEnergyOverlay, Some(Overlay::Energy)) => None,
            (Command::ToggleEnergyOverlay, _) if self.phase == Phase::ActivePlay => Some(Overlay::Energy),
            (Command::ToggleForecastOverlay, Some(Overlay::Forecast)) => None,
            (Command::ToggleForecastOverlay, _) if self.phase == Phase::ActivePlay => Some(Overlay::Forecast),
            (Command::ShowInfo, Some(Overlay::Info)) => None,
            (Command::ShowInfo, _) if self.selection.selected().is_some() => Some(Overlay::Info),
            (Command::ShowTutorial, Some(Overlay::Tutorial { page })) => {
                Some(Overlay::Tutorial { page: page + 1 }).filter(|_| page + 1 < TUTORIAL_PAGES.len())
            }
            (Command::ShowTutorial, _) => Some(Overlay::Tutorial { page: 0 }),
            (Command::ShowKeyBindings, Some(Overlay::KeyBindings { page })) => {
                Some(Overlay::KeyBindings { page: page + 1 }).filter(|_| page + 1 < KEY_BINDING_PAGES.len())
            }
            (Command::ShowKeyBindings, _) => Some(Overlay::KeyBindings { page: 0 }),
            _ => return,
        };
        if next != self.overlay {
            self.overlay = next;
            events.push(GameEvent::OverlayChanged { overlay: next });
        }
    }

    /// Text behind the current overlay, if it has any
    pub fn overlay_text(&self) -> Option<String> {
        match self.overlay? {
            Overlay::Info => self.selection.selected().map(|tech| tech.info_text().to_string()),
            Overlay::Tutorial { page } => TUTORIAL_PAGES.get(page).map(|s| s.to_string()),
            Overlay::KeyBindings { page } => KEY_BINDING_PAGES.get(page).map(|s| s.to_string()),
            Overlay::Energy | Overlay::Forecast => None,
        }
    }

    fn apply_select(&mut self, command: Command, events: &mut Vec<GameEvent>) {
        match command {
            Command::SlotLeft => self.selection.move_left(),
            Command::SlotRight => self.selection.move_right(),
            Command::StageUp => self.selection.cycle_forward(),
            Command::StageDown => self.selection.cycle_backward(),
            Command::Confirm => {
                self.confirm_selection(events);
                return;
            }
            _ => return,
        }
        events.push(GameEvent::SlotSelected {
            slot: self.selection.index,
            tech: self.selection.selected(),
        });
    }

    fn confirm_selection(&mut self, events: &mut Vec<GameEvent>) {
        if self.selection.chosen_count() == 0 {
            return;
        }
        for (slot, tech) in self.selection.slots.iter().enumerate() {
            self.units[slot] = tech.map(|tech| build_unit(tech, &mut self.tokens));
        }
        info!("Built {} plants, {} tokens left", self.selection.chosen_count(), self.tokens);
        self.selection.reset_to_first_valid();
        self.set_phase(Phase::AllocateCapacity, events);
    }

    fn apply_allocate(&mut self, command: Command, events: &mut Vec<GameEvent>) {
        match command {
            Command::SlotLeft => self.selection.index = self.selection.prev_valid_index(),
            Command::SlotRight => self.selection.index = self.selection.next_valid_index(),
            Command::StageUp | Command::StageDown => {
                let slot = self.selection.index;
                let mut tokens = self.tokens;
                let Some(unit) = self.units[slot].as_mut() else {
                    return;
                };
                let changed = if command == Command::StageUp {
                    increase_capacity(unit, &mut tokens)
                } else {
                    decrease_capacity(unit, &mut tokens)
                };
                if changed {
                    events.push(GameEvent::CapacityChanged {
                        slot,
                        tech: unit.tech(),
                        capacity_gw: unit.capacity_gw(),
                        tokens_left: tokens,
                    });
                }
                self.tokens = tokens;
            }
            Command::Confirm => self.begin_play(events),
            _ => {}
        }
    }

    fn begin_play(&mut self, events: &mut Vec<GameEvent>) {
        if self.tokens != 0 {
            return;
        }
        let mut exploring = false;
        for unit in self.units.iter_mut().flatten() {
            if unit.tech() != TechType::Hydro {
                unit.set_running(false);
            }
            if let Some(geo) = unit.as_geothermal_mut() {
                geo.begin_exploration(GEOTHERMAL_GW_PER_ROLL);
                exploring |= geo.rolls_left > 0;
            }
        }
        self.selection.reset_to_first_valid();
        self.dice = DiceRoll::default();

        roll_initial_state(&mut self.resources, &mut self.rng);
        self.produce_variable_output();
        self.demand.roll(0, &mut self.rng);
        self.refresh_forecast();

        let next = if exploring { Phase::GeothermalExploration } else { Phase::ActivePlay };
        self.set_phase(next, events);
    }

    fn explore_step(&mut self, events: &mut Vec<GameEvent>) {
        let _timing = logging::start_timing("explore_step", OperationCategory::Exploration);
        let exploring_slot = self
            .units
            .iter()
            .position(|slot| slot.as_ref().and_then(|u| u.as_geothermal()).map_or(false, |g| g.rolls_left > 0));

        if self.dice.rolling {
            let Some(slot) = exploring_slot else {
                self.set_phase(Phase::ActivePlay, events);
                return;
            };
            let stopped = self.dice.stop(&mut self.rng);
            let Some(geo) = self.units[slot].as_mut().and_then(|u| u.as_geothermal_mut()) else {
                return;
            };
            geo.award(stopped.awarded);
            if stopped.cycle_complete {
                geo.rolls_left -= 1;
                events.push(GameEvent::ExplorationCycleFinished { slot, rolls_left: geo.rolls_left });
            }
            debug!(
                "Geothermal slot {} roll {} landed {}, awarded {} GW",
                slot, stopped.roll, stopped.face, stopped.awarded
            );
            events.push(GameEvent::DieStopped {
                slot,
                roll: stopped.roll,
                face: stopped.face,
                awarded: stopped.awarded,
            });
        } else {
            self.dice.restart();
            if exploring_slot.is_none() {
                self.set_phase(Phase::ActivePlay, events);
            }
        }
    }

    fn apply_play(&mut self, command: Command, events: &mut Vec<GameEvent>) {
        match command {
            Command::SlotLeft => self.selection.index = self.selection.prev_valid_index(),
            Command::SlotRight => self.selection.index = self.selection.next_valid_index(),
            Command::StageUp | Command::StageDown => {
                let slot = self.selection.index;
                let Some(unit) = self.selected_unit_mut() else {
                    return;
                };
                let before = unit.mustered();
                if command == Command::StageUp {
                    unit.stage_up();
                } else {
                    unit.stage_down();
                }
                if unit.mustered() != before {
                    events.push(GameEvent::Staged { slot, tech: unit.tech(), mustered: unit.mustered() });
                }
            }
            Command::Confirm => self.settle_round(events),
            Command::DeferLoad => self.begin_deferral(),
            Command::QuitRound => self.open_prompt(Prompt::QuitRound, events),
            _ => {}
        }
    }

    fn settle_round(&mut self, events: &mut Vec<GameEvent>) {
        let hour = self.resources.hour_index();
        let report = settle(&mut self.units, self.demand.current, self.resources.smog_ratio, hour == 0);

        self.score += report.score_delta;
        self.powered = report.powered;
        self.resources.next_smog_ratio = report.next_smog_ratio;
        self.summary = report.summary();

        let mut dispatch_by_tech = BTreeMap::new();
        for (slot, committed) in report.dispatch_by_slot.iter().enumerate() {
            if let (Some(tech), Some(gwh)) = (self.units[slot].as_ref().map(|u| u.tech()), committed) {
                dispatch_by_tech.insert(tech, *gwh);
            }
        }
        self.rounds.push(RoundRecord {
            hour: hour as u32,
            demand: report.demand,
            total_dispatch: report.total_dispatch,
            dispatch_by_tech,
            stored: report.stored,
            unstored: report.unstored,
            score_delta: report.score_delta,
            score: self.score,
            smog_ratio: report.next_smog_ratio,
            powered: report.powered,
        });
        debug!(
            "Hour {} settled: dispatch {} GWh, demand {} GWh, {:+} points (score {})",
            hour, report.total_dispatch, report.demand, report.score_delta, self.score
        );
        events.push(GameEvent::RoundSettled {
            hour: hour as u32,
            demand: report.demand,
            dispatch: report.total_dispatch,
            score_delta: report.score_delta,
            powered: report.powered,
        });
        self.last_report = Some(report);

        roll_next_targets(&mut self.resources, &mut self.rng);
        self.resources.next_hour = hour as f64 + 1.0;
        self.transitioning = true;
    }

    fn finish_transition(&mut self, events: &mut Vec<GameEvent>) {
        self.transitioning = false;
        self.selection.reset_to_first_valid();
        let hour = self.resources.hour_index();
        events.push(GameEvent::TransitionFinished { hour: hour as u32 });

        if hour >= HOURS_PER_DAY as usize {
            self.overlay = Some(Overlay::Energy);
            info!("Day complete, final score {}", self.score);
            self.set_phase(Phase::GameOver, events);
            return;
        }

        self.produce_variable_output();
        self.demand.roll(hour, &mut self.rng);
        self.refresh_forecast();
    }

    fn produce_variable_output(&mut self) {
        let sample = current_sample(&self.resources, &mut self.rng);
        for unit in self.units.iter_mut().flatten() {
            unit.produce(&sample);
        }
    }

    fn refresh_forecast(&mut self) {
        self.forecast = run_forecast(
            &self.units,
            &self.resources,
            &self.demand,
            self.config.forecast_trials,
            &mut self.rng,
        );
    }

    fn storage_gw(&self) -> u32 {
        self.units
            .iter()
            .flatten()
            .filter(|u| u.tech() == TechType::Storage)
            .map(|u| u.capacity_gw())
            .sum()
    }

    fn begin_deferral(&mut self) {
        let hour = self.resources.hour_index();
        let storage_gw = self.storage_gw();
        if !self.can_defer
            || storage_gw == 0
            || self.demand.current < MIN_DEFERRAL_GW
            || hour + 1 > self.demand.last_deferrable_hour()
        {
            return;
        }
        self.can_defer = false;
        self.deferral = Some(LoadDeferral {
            load: MIN_DEFERRAL_GW,
            max_load: storage_gw.min(self.demand.current),
            target_hour: hour + 1,
        });
    }

    fn apply_deferral(&mut self, command: Command, events: &mut Vec<GameEvent>) {
        let Some(mut deferral) = self.deferral else {
            return;
        };
        let hour = self.resources.hour_index();
        match command {
            Command::StageUp => deferral.load = (deferral.load + 1).min(deferral.max_load),
            Command::StageDown => deferral.load = deferral.load.saturating_sub(1).max(MIN_DEFERRAL_GW),
            Command::SlotRight => {
                deferral.target_hour = (deferral.target_hour + 1).min(self.demand.last_deferrable_hour())
            }
            Command::SlotLeft => deferral.target_hour = deferral.target_hour.saturating_sub(1).max(hour + 1),
            Command::Cancel => {
                self.deferral = None;
                self.can_defer = true;
                events.push(GameEvent::DeferralCancelled);
                return;
            }
            Command::Confirm => {
                self.deferral = None;
                if self.demand.defer(hour, deferral.load, deferral.target_hour) {
                    info!("Deferred {} GW from hour {} to hour {}", deferral.load, hour, deferral.target_hour);
                    events.push(GameEvent::LoadDeferred {
                        load: deferral.load,
                        from_hour: hour as u32,
                        to_hour: deferral.target_hour as u32,
                    });
                    self.refresh_forecast();
                } else {
                    self.can_defer = true;
                }
                return;
            }
            _ => return,
        }
        self.deferral = Some(deferral);
    }

    fn reset(&mut self, events: &mut Vec<GameEvent>) {
        let tidal_offset = roll_tidal_offset(&mut self.rng);
        self.selection = SlotSelection::default();
        self.tokens = self.config.total_tokens;
        self.units = vec![None; SLOT_COUNT];
        self.resources = ResourceState::new(tidal_offset);
        self.demand = DemandSeries::default();
        self.forecast = Forecast::default();
        self.score = 0.0;
        self.powered = true;
        self.transitioning = false;
        self.overlay = None;
        self.prompt = None;
        self.deferral = None;
        self.can_defer = true;
        self.dice = DiceRoll::default();
        self.last_report = None;
        self.summary.clear();
        self.rounds.clear();
        info!("Session reset");
        events.push(GameEvent::SessionReset);
        self.set_phase(Phase::SelectTechnology, events);
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            selection_index: self.selection.index,
            slots: self.selection.slots.to_vec(),
            tokens: self.tokens,
            units: self.units.iter().map(|u| u.as_ref().map(UnitView::from_unit)).collect(),
            hour: self.resources.hour,
            demand: self.demand.current,
            demand_history: self.demand.actual.clone(),
            forecast: self.forecast.clone(),
            resources: self.resources.clone(),
            score: self.score,
            powered: self.powered,
            summary: self.summary.clone(),
            transitioning: self.transitioning,
            overlay: self.overlay,
            overlay_text: self.overlay_text(),
            prompt: self.prompt,
            deferral: self.deferral,
            can_defer: self.can_defer,
            dice: self.dice.clone(),
            quit_requested: self.quit_requested,
        }
    }
}
