use serde::{Deserialize, Serialize};
use crate::config::constants::MIN_WAVE_PERIOD;

/// Resource levels a variable-output plant reads when producing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceSample {
    pub solar: f64,             // irradiance fraction, already scaled by cloud and smog
    pub wind: f64,              // wind speed ratio
    pub tidal: f64,             // tidal speed ratio
    pub wave_period: f64,       // seconds
    pub wave_height: f64,       // significant wave height, metres
}

/// Process-wide weather for the current round and the targets of the next one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub hour: f64,
    pub next_hour: f64,
    pub wind_speed_ratio: f64,
    pub next_wind_speed_ratio: f64,
    pub cloud_cover_ratio: f64,
    pub next_cloud_cover_ratio: f64,
    pub smog_ratio: f64,
    pub next_smog_ratio: f64,
    pub wave_period: f64,
    pub next_wave_period: f64,
    pub tidal_offset: usize,
}

impl ResourceState {
    pub fn new(tidal_offset: usize) -> Self {
        Self {
            hour: 0.0,
            next_hour: 0.0,
            wind_speed_ratio: 0.0,
            next_wind_speed_ratio: 0.0,
            cloud_cover_ratio: 0.0,
            next_cloud_cover_ratio: 0.0,
            smog_ratio: 0.0,
            next_smog_ratio: 0.0,
            wave_period: MIN_WAVE_PERIOD,
            next_wave_period: MIN_WAVE_PERIOD,
            tidal_offset,
        }
    }

    /// Whole hour of the current round
    pub fn hour_index(&self) -> usize {
        self.hour.max(0.0).floor() as usize
    }

    /// Jumps every interpolated value to its target
    pub fn snap_to_targets(&mut self) {
        self.hour = self.next_hour;
        self.wind_speed_ratio = self.next_wind_speed_ratio;
        self.cloud_cover_ratio = self.next_cloud_cover_ratio;
        self.smog_ratio = self.next_smog_ratio;
        self.wave_period = self.next_wave_period;
    }
}
