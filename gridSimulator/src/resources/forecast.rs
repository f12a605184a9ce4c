// Monte Carlo forecast of next-round production for variable-output plants
use std::collections::BTreeMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::config::tech_type::TechType;
use crate::models::generation_unit::GenerationUnit;
use crate::resources::demand::DemandSeries;
use crate::resources::generators::next_round_sample;
use crate::resources::state::ResourceState;
use crate::utils::logging::{self, OperationCategory};

/// Rounded mean production and worst-case absolute error, both in GWh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForecastBand {
    pub mean: u32,
    pub error: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub demand: u32,
    pub bands: BTreeMap<TechType, ForecastBand>,
}

impl Forecast {
    pub fn band(&self, tech: TechType) -> Option<ForecastBand> {
        self.bands.get(&tech).copied()
    }
}

/// Summarizes trial outputs. The error band never exceeds the mean.
pub fn summarize_trials(outputs: &[f64]) -> ForecastBand {
    if outputs.is_empty() {
        return ForecastBand::default();
    }
    let mean = outputs.iter().sum::<f64>() / outputs.len() as f64;
    let max_error = outputs
        .iter()
        .map(|x| (x - mean).abs())
        .fold(0.0_f64, f64::max);
    let rounded_mean = mean.round().max(0.0) as u32;
    let error = (max_error.ceil().max(0.0) as u32).min(rounded_mean);
    ForecastBand { mean: rounded_mean, error }
}

fn trial_outputs(unit: &GenerationUnit, state: &ResourceState, trials: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..trials)
        .map(|_| {
            let sample = next_round_sample(state, &mut rng);
            unit.output_for(&sample).unwrap_or(0.0)
        })
        .collect()
}

/// Forecasts next round for every variable-output unit. Each unit gets its own
/// sub-seed drawn in slot order, so results do not depend on thread scheduling.
pub fn run_forecast<R: Rng + ?Sized>(
    units: &[Option<GenerationUnit>],
    state: &ResourceState,
    demand: &DemandSeries,
    trials: usize,
    rng: &mut R,
) -> Forecast {
    let _timing = logging::start_timing("run_forecast", OperationCategory::Forecast);

    let jobs: Vec<(TechType, &GenerationUnit, u64)> = units
        .iter()
        .flatten()
        .filter(|unit| unit.tech().is_variable())
        .map(|unit| (unit.tech(), unit, rng.gen::<u64>()))
        .collect();

    let bands: BTreeMap<TechType, ForecastBand> = jobs
        .par_iter()
        .map(|(tech, unit, seed)| {
            let outputs = trial_outputs(unit, state, trials, *seed);
            (*tech, summarize_trials(&outputs))
        })
        .collect();

    Forecast {
        demand: demand.forecast(state.hour_index()),
        bands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::generators::roll_initial_state;

    fn variable_units() -> Vec<Option<GenerationUnit>> {
        [TechType::Solar, TechType::Wind, TechType::Tidal, TechType::Wave, TechType::Coal]
            .iter()
            .map(|tech| {
                let mut unit = GenerationUnit::new(*tech);
                unit.set_capacity(6);
                Some(unit)
            })
            .chain(std::iter::once(None))
            .collect()
    }

    #[test]
    fn summary_clamps_error_to_mean() {
        let band = summarize_trials(&[0.0, 0.0, 0.0, 2.0]);
        assert_eq!(band.mean, 1);
        assert_eq!(band.error, 1);
        assert_eq!(summarize_trials(&[]), ForecastBand::default());
        let flat = summarize_trials(&[3.0, 3.0]);
        assert_eq!(flat, ForecastBand { mean: 3, error: 0 });
    }

    #[test]
    fn bands_are_bounded_by_their_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = ResourceState::new(4);
        roll_initial_state(&mut state, &mut rng);
        for hour in [0.0, 7.0, 12.0, 16.0] {
            state.hour = hour;
            let forecast = run_forecast(&variable_units(), &state, &DemandSeries::default(), 256, &mut rng);
            assert_eq!(forecast.bands.len(), 4);
            for band in forecast.bands.values() {
                assert!(band.error <= band.mean);
                assert!(band.mean <= 6);
            }
            assert!(forecast.band(TechType::Coal).is_none());
        }
    }

    #[test]
    fn same_seed_gives_same_forecast() {
        let mut state = ResourceState::new(2);
        state.hour = 9.0;
        state.wind_speed_ratio = 0.4;
        state.cloud_cover_ratio = 0.3;
        state.wave_period = 9.0;
        let units = variable_units();
        let a = run_forecast(&units, &state, &DemandSeries::default(), 128, &mut StdRng::seed_from_u64(8));
        let b = run_forecast(&units, &state, &DemandSeries::default(), 128, &mut StdRng::seed_from_u64(8));
        assert_eq!(a, b);
        assert_eq!(a.demand, DemandSeries::default().table[10]);
    }
}
