use serde::{Deserialize, Serialize};
use crate::config::constants::*;
use crate::config::tech_type::TechType;
use crate::models::plant::PlantCore;
use crate::resources::state::ResourceSample;
use crate::utils::traits::Dispatch;

/// Solar output fraction: the irradiance fraction itself
pub fn solar_efficiency(resource: f64) -> f64 {
    resource.clamp(0.0, 1.0)
}

fn turbine_speed(resource: f64, design_speed: f64) -> f64 {
    (resource - design_speed) / design_speed
}

/// Dimensionless wind turbine curve
pub fn wind_efficiency(resource: f64) -> f64 {
    if resource <= 0.0 {
        return 0.0;
    }
    let ts = turbine_speed(resource, WIND_DESIGN_SPEED);
    let prod = if ts < WIND_CUT_IN || ts > WIND_CUT_OUT {
        0.0
    } else if ts <= 0.0 {
        1.03273 * (-5.97588 * ts.powi(2)).exp() - 0.03273
    } else {
        0.16154 * (-9.30254 * ts.powi(2)).exp() + 0.83846
    };
    prod.clamp(0.0, 1.0)
}

/// Dimensionless tidal turbine curve, flat at rated output above design speed
pub fn tidal_efficiency(resource: f64) -> f64 {
    if resource <= 0.0 {
        return 0.0;
    }
    let ts = turbine_speed(resource, TIDAL_DESIGN_SPEED);
    let prod = if ts < TIDAL_CUT_IN || ts > TIDAL_CUT_OUT {
        0.0
    } else if ts <= 0.0 {
        1.69215 * (1.25909 * ts).exp() - 0.69215
    } else {
        1.0
    };
    prod.clamp(0.0, 1.0)
}

/// Significant wave height from a Rayleigh draw scaled by the wave period.
/// `roll` is a uniform sample in [0, 1].
pub fn significant_wave_height(period: f64, roll: f64) -> f64 {
    let period = period.max(0.0);
    let roll = if roll >= 1.0 { 0.999999 } else { roll.max(0.0) };
    let scalar = WAVE_RAYLEIGH_SIGMA * (2.0 * (1.0 / (1.0 - roll)).ln()).sqrt();
    let height = scalar * period.powi(2);
    if height > WAVE_BREAKING_RATIO * period.powi(2) {
        WAVE_BROKEN_RATIO * period.powi(2)
    } else {
        height
    }
}

/// Quadratic fit of wave converter output against height and period
pub fn wave_efficiency(height: f64, period: f64) -> f64 {
    if height <= 0.0 {
        return 0.0;
    }
    let period = period.max(0.0);
    let prod = 0.289 * height - 0.00111 * height.powi(2) * period - 0.0169 * period;
    prod.clamp(0.0, 1.0)
}

/// Solar, Tidal, Wave and Wind plants: the resource sets the staged output each round,
/// after which the player restages it freely within capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablePlant {
    pub core: PlantCore,
    pub tech: TechType,
    pub last_resource: f64,
}

impl VariablePlant {
    pub fn new(tech: TechType) -> Self {
        Self {
            core: PlantCore::new(tech.token_cost()),
            tech,
            last_resource: 0.0,
        }
    }

    /// Output in GW for a sample, before rounding
    pub fn output_for(&self, sample: &ResourceSample) -> f64 {
        let capacity = self.core.capacity_gw as f64;
        let efficiency = match self.tech {
            TechType::Solar => solar_efficiency(sample.solar),
            TechType::Wind => wind_efficiency(sample.wind),
            TechType::Tidal => tidal_efficiency(sample.tidal),
            TechType::Wave => wave_efficiency(sample.wave_height, sample.wave_period),
            _ => 0.0,
        };
        (capacity * efficiency).min(capacity)
    }

    fn resource_of(&self, sample: &ResourceSample) -> f64 {
        match self.tech {
            TechType::Solar => sample.solar,
            TechType::Wind => sample.wind,
            TechType::Tidal => sample.tidal,
            TechType::Wave => sample.wave_height,
            _ => 0.0,
        }
    }
}

impl Dispatch for VariablePlant {
    fn core(&self) -> &PlantCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        &mut self.core
    }

    fn produce(&mut self, sample: &ResourceSample) -> Option<f64> {
        let output = self.output_for(sample);
        let rounded = output.round() as u32;
        self.last_resource = self.resource_of(sample);
        self.core.mustered = rounded;
        self.core.running = rounded > 0;
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn wind_curve_shape() {
        assert_eq!(wind_efficiency(0.0), 0.0);
        assert!(approx(wind_efficiency(WIND_DESIGN_SPEED), 1.0));
        // above cut-out
        assert_eq!(wind_efficiency(WIND_DESIGN_SPEED * 1.7), 0.0);
        let half = wind_efficiency(WIND_DESIGN_SPEED * 0.7);
        assert!(half > 0.0 && half < 1.0);
    }

    #[test]
    fn tidal_curve_plateaus_above_design_speed() {
        assert!(approx(tidal_efficiency(TIDAL_DESIGN_SPEED), 1.0));
        assert_eq!(tidal_efficiency(TIDAL_DESIGN_SPEED * 1.5), 1.0);
        assert_eq!(tidal_efficiency(TIDAL_DESIGN_SPEED * 0.2), 0.0);
        assert_eq!(tidal_efficiency(-0.3), 0.0);
    }

    #[test]
    fn wave_height_stays_under_breaking_limit() {
        let period = 10.0;
        let height = significant_wave_height(period, 1.0);
        assert!(height > 0.0);
        assert!(height <= WAVE_BREAKING_RATIO * period * period);
        assert_eq!(significant_wave_height(period, 0.0), 0.0);
        assert_eq!(wave_efficiency(0.0, period), 0.0);
        let eff = wave_efficiency(significant_wave_height(period, 0.5), period);
        assert!((0.0..=1.0).contains(&eff));
    }

    #[test]
    fn produce_stages_rounded_output_then_restages_up_to_capacity() {
        let mut solar = VariablePlant::new(TechType::Solar);
        solar.core.capacity_gw = 4;
        let sample = ResourceSample { solar: 0.6, ..ResourceSample::default() };
        let output = solar.produce(&sample);
        assert_eq!(output, Some(2.4));
        assert_eq!(solar.core.mustered, 2);
        assert!(solar.core.running);

        solar.stage_up();
        assert_eq!(solar.core.mustered, 3);
        solar.stage_up();
        solar.stage_up();
        assert_eq!(solar.core.mustered, 4);
        solar.stage_down();
        assert_eq!(solar.core.mustered, 3);
    }

    #[test]
    fn solar_output_never_exceeds_capacity() {
        let mut solar = VariablePlant::new(TechType::Solar);
        solar.core.capacity_gw = 3;
        let sample = ResourceSample { solar: 4.0, ..ResourceSample::default() };
        assert_eq!(solar.produce(&sample), Some(3.0));
        let dark = ResourceSample { solar: -1.0, ..ResourceSample::default() };
        assert_eq!(solar.produce(&dark), Some(0.0));
        assert!(!solar.core.running);
    }
}
