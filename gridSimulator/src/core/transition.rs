// Inter-round interpolation, advanced one frame per scheduler tick
use crate::config::constants::SETTLE_TOLERANCE;
use crate::resources::state::ResourceState;

fn step_toward(current: f64, target: f64, step: f64) -> f64 {
    if (target - current).abs() <= step {
        target
    } else if target > current {
        current + step
    } else {
        current - step
    }
}

fn settled(current: f64, target: f64) -> bool {
    (target - current).abs() < SETTLE_TOLERANCE
}

/// Moves the clock and weather one frame toward their targets. Wave period
/// jumps straight to its target. Returns true once everything has arrived.
pub fn advance_frame(state: &mut ResourceState, hours_per_frame: f64, weather_step: f64) -> bool {
    state.hour = (state.hour + hours_per_frame).min(state.next_hour);
    state.wind_speed_ratio = step_toward(state.wind_speed_ratio, state.next_wind_speed_ratio, weather_step);
    state.cloud_cover_ratio = step_toward(state.cloud_cover_ratio, state.next_cloud_cover_ratio, weather_step);
    state.smog_ratio = step_toward(state.smog_ratio, state.next_smog_ratio, weather_step);
    state.wave_period = state.next_wave_period;

    let complete = state.hour >= state.next_hour
        && settled(state.wind_speed_ratio, state.next_wind_speed_ratio)
        && settled(state.cloud_cover_ratio, state.next_cloud_cover_ratio)
        && settled(state.smog_ratio, state.next_smog_ratio);
    if complete {
        state.snap_to_targets();
    }
    complete
}
