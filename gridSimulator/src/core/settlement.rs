// Round settlement: dispatch totals, score delta, smog and storage charging
use std::collections::BTreeMap;
use std::fmt::Write;
use serde::{Deserialize, Serialize};
use crate::config::constants::EXCESS_PENALTY_PER_GWH;
use crate::config::tech_type::TechType;
use crate::models::generation_unit::GenerationUnit;
use crate::utils::logging::{self, OperationCategory};
use crate::utils::traits::Dispatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub demand: u32,
    pub total_dispatch: u32,
    pub demand_points: f64,
    pub emission_points: f64,
    pub excess_points: f64,
    pub score_delta: f64,
    pub next_smog_ratio: f64,
    pub powered: bool,
    pub stored: u32,
    pub unstored: u32,
    pub emitting_dispatch: BTreeMap<TechType, u32>,
    pub dispatch_by_slot: Vec<Option<u32>>,
    pub charged_slots: Vec<usize>,
}

/// Settles one round. Staged output is read before commit, every unit is
/// committed, then the surplus is offered to grid storage in slot order.
pub fn settle(
    units: &mut [Option<GenerationUnit>],
    demand: u32,
    smog_ratio: f64,
    first_round: bool,
) -> SettlementReport {
    let _timing = logging::start_timing("settle", OperationCategory::Settlement);

    let mut total_dispatch = 0;
    let mut emission_points = 0.0;
    let mut next_smog_ratio = smog_ratio;
    let mut emitting_dispatch = BTreeMap::new();

    for unit in units.iter().flatten() {
        let tech = unit.tech();
        let mustered = unit.mustered();
        total_dispatch += mustered;
        if tech.is_emitting() && mustered > 0 {
            emission_points -= tech.emission_penalty() * mustered as f64;
            next_smog_ratio += tech.smog_rate() * mustered as f64;
            *emitting_dispatch.entry(tech).or_insert(0) += mustered;
        }
    }
    next_smog_ratio = next_smog_ratio.min(1.0);

    let demand_points = if total_dispatch >= demand {
        demand as f64
    } else {
        total_dispatch as f64 - demand as f64
    };

    let dispatch_by_slot: Vec<Option<u32>> = units
        .iter_mut()
        .map(|slot| slot.as_mut().map(|unit| unit.commit()))
        .collect();

    if first_round {
        for unit in units.iter_mut().flatten() {
            unit.set_has_run(true);
        }
    }

    let surplus = total_dispatch.saturating_sub(demand);
    let mut unstored = surplus;
    let mut charged_slots = Vec::new();
    for (slot, unit) in units.iter_mut().enumerate() {
        if unstored == 0 {
            break;
        }
        if let Some(unit) = unit.as_mut().filter(|u| u.tech() == TechType::Storage) {
            let before = unstored;
            unstored = unit.commit_charge(unstored);
            if unstored < before {
                charged_slots.push(slot);
            }
        }
    }
    let excess_points = -(unstored as f64) * EXCESS_PENALTY_PER_GWH;

    SettlementReport {
        demand,
        total_dispatch,
        demand_points,
        emission_points,
        excess_points,
        score_delta: demand_points + emission_points + excess_points,
        next_smog_ratio,
        powered: total_dispatch >= demand,
        stored: surplus - unstored,
        unstored,
        emitting_dispatch,
        dispatch_by_slot,
        charged_slots,
    }
}

impl SettlementReport {
    /// Human readable line items. The total always equals `score_delta`.
    pub fn summary(&self) -> String {
        let mut text = String::new();
        if self.total_dispatch >= self.demand {
            let _ = write!(text, "Satisfied demand of {} GWh!\nPoints: +{}\n", self.demand, self.demand);
        } else {
            let _ = write!(
                text,
                "Unmet demand of {} GWh!\nPoints: {}\n",
                self.demand - self.total_dispatch,
                self.demand_points
            );
        }
        for (tech, gwh) in &self.emitting_dispatch {
            let _ = write!(
                text,
                "{} dispatch of {} GWh.\nPoints: -{}\n",
                tech.dispatch_label(),
                gwh,
                tech.emission_penalty() * *gwh as f64
            );
        }
        if self.unstored > 0 {
            let _ = write!(
                text,
                "{} GWh of excess production could not be stored!\nPoints: -{}\n",
                self.unstored,
                self.unstored as f64 * EXCESS_PENALTY_PER_GWH
            );
        }
        let sign = if self.score_delta > 0.0 { "+" } else { "" };
        let _ = write!(text, "\nTOTAL THIS HOUR\nPoints: {}{}", sign, self.score_delta);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(tech: TechType, capacity: u32, output: u32) -> Option<GenerationUnit> {
        let mut unit = GenerationUnit::new(tech);
        unit.set_capacity(capacity);
        for _ in 0..output {
            unit.stage_up();
        }
        Some(unit)
    }

    #[test]
    fn shortfall_costs_exactly_the_missing_energy() {
        let mut units = vec![staged(TechType::Peaker, 12, 12), staged(TechType::Fission, 5, 5), None];
        let report = settle(&mut units, 20, 0.0, false);
        assert_eq!(report.total_dispatch, 17);
        assert_eq!(report.demand_points, -3.0);
        assert!(!report.powered);
        assert_eq!(report.emission_points, -9.0);
        assert!(report.summary().starts_with("Unmet demand of 3 GWh!\nPoints: -3\n"));
    }

    #[test]
    fn emissions_accumulate_smog_up_to_one() {
        let mut units = vec![staged(TechType::Coal, 10, 10), staged(TechType::Combined, 4, 4)];
        let report = settle(&mut units, 14, 0.995, true);
        assert_eq!(report.score_delta, 14.0 - 10.0 - 2.0);
        assert_eq!(report.next_smog_ratio, 1.0);
        assert!(units.iter().flatten().all(|u| u.core().has_run));
        let summary = report.summary();
        assert!(summary.contains("Coal dispatch of 10 GWh.\nPoints: -10\n"));
        assert!(summary.contains("Combined Cycle dispatch of 4 GWh.\nPoints: -2\n"));
        assert!(summary.ends_with("TOTAL THIS HOUR\nPoints: +2"));
    }

    #[test]
    fn unstorable_surplus_is_penalized() {
        let mut units = vec![staged(TechType::Fission, 9, 9)];
        let report = settle(&mut units, 6, 0.0, false);
        assert_eq!(report.unstored, 3);
        assert_eq!(report.score_delta, 3.0);
        assert!(report.summary().contains("3 GWh of excess production could not be stored!"));
    }

    #[test]
    fn fractional_penalties_print_without_trailing_zeros() {
        let mut units = vec![staged(TechType::Peaker, 3, 3)];
        let report = settle(&mut units, 3, 0.0, false);
        assert_eq!(report.score_delta, 0.75);
        assert!(report.summary().contains("Peaker dispatch of 3 GWh.\nPoints: -2.25\n"));
        assert!(report.summary().ends_with("Points: +0.75"));
    }
}
