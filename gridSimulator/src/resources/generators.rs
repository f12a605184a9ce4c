// Stochastic weather processes. Every draw goes through the caller's RNG handle.
use rand::Rng;
use crate::config::constants::*;
use crate::models::variable::significant_wave_height;
use crate::resources::state::{ResourceSample, ResourceState};

/// One Markov step on a [0, 1] ratio: the lower the ratio the likelier it rises
pub fn markov_step<R: Rng + ?Sized>(previous: f64, bound: f64, rng: &mut R) -> f64 {
    let increase_probability = 1.0 - previous;
    let roll: f64 = rng.gen();
    let step = bound * rng.gen::<f64>();
    let next = if roll <= increase_probability {
        previous + step
    } else {
        previous - step
    };
    next.clamp(0.0, 1.0)
}

pub fn next_wind_ratio<R: Rng + ?Sized>(previous: f64, rng: &mut R) -> f64 {
    markov_step(previous, MARKOV_STEP_BOUND, rng)
}

pub fn next_cloud_ratio<R: Rng + ?Sized>(previous: f64, rng: &mut R) -> f64 {
    markov_step(previous, MARKOV_STEP_BOUND, rng)
}

fn normalize_period(period: f64) -> f64 {
    ((period - MIN_WAVE_PERIOD) / (MAX_WAVE_PERIOD - MIN_WAVE_PERIOD)).clamp(0.0, 1.0)
}

fn denormalize_period(norm: f64) -> f64 {
    (MAX_WAVE_PERIOD - MIN_WAVE_PERIOD) * norm + MIN_WAVE_PERIOD
}

/// Wave period steps on its normalized range, then maps back to seconds
pub fn next_wave_period<R: Rng + ?Sized>(previous: f64, rng: &mut R) -> f64 {
    let norm = markov_step(normalize_period(previous), WAVE_STEP_BOUND, rng);
    denormalize_period(norm)
}

/// Trapezoidal day profile scaled by cloud and smog
pub fn solar_resource(hour: f64, cloud_cover_ratio: f64, smog_ratio: f64) -> f64 {
    if hour <= DAWN_HOUR || hour >= DUSK_HOUR {
        return 0.0;
    }
    let profile = if hour <= SOLAR_PLATEAU_START {
        (2.0 / 9.0) * hour - (11.0 / 9.0)
    } else if hour >= SOLAR_PLATEAU_END {
        (-2.0 / 7.0) * hour + 5.0
    } else {
        1.0
    };
    profile * (1.0 - cloud_cover_ratio) * (1.0 - smog_ratio)
}

/// Diurnal tidal table read with fresh jitter on every call
pub fn tidal_resource<R: Rng + ?Sized>(hour: usize, offset: usize, rng: &mut R) -> f64 {
    let base = TIDAL_TABLE[(hour + offset) % TIDAL_TABLE.len()];
    let jitter = 2.0 * TIDAL_JITTER * rng.gen::<f64>() - TIDAL_JITTER;
    (base * (1.0 + jitter)).clamp(0.0, 1.0)
}

pub fn roll_tidal_offset<R: Rng + ?Sized>(rng: &mut R) -> usize {
    (TIDAL_TABLE.len() as f64 * rng.gen::<f64>()).round() as usize
}

pub fn sample_wave_height<R: Rng + ?Sized>(period: f64, rng: &mut R) -> f64 {
    significant_wave_height(period, rng.gen())
}

/// Fresh weather when play begins
pub fn roll_initial_state<R: Rng + ?Sized>(state: &mut ResourceState, rng: &mut R) {
    state.wind_speed_ratio = rng.gen();
    state.cloud_cover_ratio = rng.gen();
    state.wave_period = denormalize_period(rng.gen());
    state.next_wind_speed_ratio = state.wind_speed_ratio;
    state.next_cloud_cover_ratio = state.cloud_cover_ratio;
    state.next_wave_period = state.wave_period;
}

/// Rolls the targets the transition interpolates toward
pub fn roll_next_targets<R: Rng + ?Sized>(state: &mut ResourceState, rng: &mut R) {
    state.next_wind_speed_ratio = next_wind_ratio(state.wind_speed_ratio, rng);
    state.next_cloud_cover_ratio = next_cloud_ratio(state.cloud_cover_ratio, rng);
    state.next_wave_period = next_wave_period(state.wave_period, rng);
}

/// Resources as they stand for the current round
pub fn current_sample<R: Rng + ?Sized>(state: &ResourceState, rng: &mut R) -> ResourceSample {
    ResourceSample {
        solar: solar_resource(state.hour, state.cloud_cover_ratio, state.smog_ratio),
        wind: state.wind_speed_ratio,
        tidal: tidal_resource(state.hour_index(), state.tidal_offset, rng),
        wave_period: state.wave_period,
        wave_height: sample_wave_height(state.wave_period, rng),
    }
}

/// One possible next round, as the forecast imagines it
pub fn next_round_sample<R: Rng + ?Sized>(state: &ResourceState, rng: &mut R) -> ResourceSample {
    let next_hour = state.hour.floor() + 1.0;
    let cloud = next_cloud_ratio(state.cloud_cover_ratio, rng);
    let wave_period = next_wave_period(state.wave_period, rng);
    ResourceSample {
        solar: solar_resource(next_hour, cloud, state.smog_ratio),
        wind: next_wind_ratio(state.wind_speed_ratio, rng),
        tidal: tidal_resource(state.hour_index() + 1, state.tidal_offset, rng),
        wave_period,
        wave_height: sample_wave_height(wave_period, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn markov_ratios_stay_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut wind = 0.5;
        let mut cloud = 0.0;
        for _ in 0..500 {
            wind = next_wind_ratio(wind, &mut rng);
            cloud = next_cloud_ratio(cloud, &mut rng);
            assert!((0.0..=1.0).contains(&wind));
            assert!((0.0..=1.0).contains(&cloud));
        }
    }

    #[test]
    fn full_ratio_can_only_fall() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(markov_step(1.0, 0.5, &mut rng) <= 1.0);
            assert!(markov_step(0.0, 0.5, &mut rng) >= 0.0);
        }
    }

    #[test]
    fn wave_period_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut period = MIN_WAVE_PERIOD;
        for _ in 0..500 {
            period = next_wave_period(period, &mut rng);
            assert!((MIN_WAVE_PERIOD..=MAX_WAVE_PERIOD).contains(&period));
        }
    }

    #[test]
    fn solar_profile_is_dark_at_night_and_flat_at_noon() {
        assert_eq!(solar_resource(3.0, 0.0, 0.0), 0.0);
        assert_eq!(solar_resource(20.0, 0.0, 0.0), 0.0);
        assert_eq!(solar_resource(12.0, 0.0, 0.0), 1.0);
        assert_eq!(solar_resource(12.0, 0.5, 0.5), 0.25);
        let morning = solar_resource(8.0, 0.0, 0.0);
        assert!(morning > 0.0 && morning < 1.0);
    }

    #[test]
    fn tidal_jitter_stays_within_five_percent() {
        let mut rng = StdRng::seed_from_u64(1);
        for hour in 0..24 {
            let base = TIDAL_TABLE[hour % TIDAL_TABLE.len()];
            let value = tidal_resource(hour, 0, &mut rng);
            assert!(value >= base * 0.95 - 1e-12);
            assert!(value <= (base * 1.05).min(1.0) + 1e-12);
        }
    }

    #[test]
    fn initial_wave_period_lies_in_range() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let mut state = ResourceState::new(0);
            roll_initial_state(&mut state, &mut rng);
            assert!((MIN_WAVE_PERIOD..=MAX_WAVE_PERIOD).contains(&state.wave_period));
        }
    }
}
