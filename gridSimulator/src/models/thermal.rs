use serde::{Deserialize, Serialize};
use crate::config::tech_type::TechType;
use crate::models::plant::PlantCore;
use crate::utils::traits::Dispatch;

/// Steam plant with a ramp band around its previous commit (Coal, Combined Cycle).
/// The committed level stays staged for the next round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampedPlant {
    pub core: PlantCore,
    pub tech: TechType,
}

impl RampedPlant {
    pub fn new(tech: TechType) -> Self {
        Self {
            core: PlantCore::new(tech.token_cost()),
            tech,
        }
    }

    pub fn ramp_limit(&self) -> u32 {
        self.tech.ramp_limit().unwrap_or(u32::MAX)
    }
}

impl Dispatch for RampedPlant {
    fn core(&self) -> &PlantCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        &mut self.core
    }

    fn stage_up(&mut self) {
        if self.core.ramp_blocks_up(self.ramp_limit()) {
            return;
        }
        self.core.stage_up();
    }

    fn stage_down(&mut self) {
        if self.core.ramp_blocks_down(self.ramp_limit()) {
            return;
        }
        self.core.stage_down();
    }

    fn commit(&mut self) -> u32 {
        let committed = self.core.record_commit();
        self.core.last_production = committed;
        committed
    }
}

/// Ramped plant whose capacity is realised by exploration rolls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeothermalPlant {
    pub plant: RampedPlant,
    pub rolls_left: u32,
}

impl GeothermalPlant {
    pub fn new() -> Self {
        Self {
            plant: RampedPlant::new(TechType::Geothermal),
            rolls_left: 0,
        }
    }

    /// Converts invested capacity into exploration cycles and resets capacity to
    /// what the rolls will earn.
    pub fn begin_exploration(&mut self, gw_per_roll: u32) {
        self.rolls_left = self.plant.core.capacity_gw / gw_per_roll.max(1);
        self.plant.core.capacity_gw = 0;
    }

    pub fn award(&mut self, gw: u32) {
        self.plant.core.capacity_gw += gw;
    }
}

impl Default for GeothermalPlant {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for GeothermalPlant {
    fn core(&self) -> &PlantCore {
        &self.plant.core
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        &mut self.plant.core
    }

    fn stage_up(&mut self) {
        self.plant.stage_up();
    }

    fn stage_down(&mut self) {
        self.plant.stage_down();
    }

    fn commit(&mut self) -> u32 {
        self.plant.commit()
    }
}

/// Base load plant: output is chosen in the first round and then locked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FissionPlant {
    pub core: PlantCore,
}

impl FissionPlant {
    pub fn new() -> Self {
        Self { core: PlantCore::new(TechType::Fission.token_cost()) }
    }
}

impl Default for FissionPlant {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for FissionPlant {
    fn core(&self) -> &PlantCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        &mut self.core
    }

    fn stage_up(&mut self) {
        if self.core.has_run {
            return;
        }
        self.core.stage_up();
    }

    fn stage_down(&mut self) {
        if self.core.has_run {
            return;
        }
        self.core.stage_down();
    }

    fn commit(&mut self) -> u32 {
        let committed = self.core.record_commit();
        self.core.last_production = committed;
        committed
    }
}

/// Gas peaker: no operational constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakerPlant {
    pub core: PlantCore,
}

impl PeakerPlant {
    pub fn new() -> Self {
        Self { core: PlantCore::new(TechType::Peaker.token_cost()) }
    }
}

impl Default for PeakerPlant {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for PeakerPlant {
    fn core(&self) -> &PlantCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coal_after_first_commit(committed: u32) -> RampedPlant {
        let mut coal = RampedPlant::new(TechType::Coal);
        coal.core.capacity_gw = 10;
        for _ in 0..committed {
            coal.stage_up();
        }
        coal.commit();
        coal
    }

    #[test]
    fn coal_ramp_halts_one_above_last_commit() {
        let mut coal = coal_after_first_commit(5);
        assert!(coal.core.has_run);
        assert_eq!(coal.core.mustered, 5);
        for _ in 0..3 {
            coal.stage_up();
        }
        assert_eq!(coal.core.mustered, 6);
        for _ in 0..5 {
            coal.stage_down();
        }
        assert_eq!(coal.core.mustered, 4);
    }

    #[test]
    fn combined_cycle_ramps_two() {
        let mut plant = RampedPlant::new(TechType::Combined);
        plant.core.capacity_gw = 10;
        plant.stage_up();
        plant.stage_up();
        plant.stage_up();
        plant.commit();
        for _ in 0..5 {
            plant.stage_up();
        }
        assert_eq!(plant.core.mustered, 5);
        plant.commit();
        assert_eq!(plant.core.last_production, 5);
        for _ in 0..5 {
            plant.stage_down();
        }
        assert_eq!(plant.core.mustered, 3);
    }

    #[test]
    fn ramp_is_free_before_first_run() {
        let mut coal = RampedPlant::new(TechType::Coal);
        coal.core.capacity_gw = 6;
        for _ in 0..6 {
            coal.stage_up();
        }
        assert_eq!(coal.core.mustered, 6);
    }

    #[test]
    fn fission_locks_after_first_commit() {
        let mut fission = FissionPlant::new();
        fission.core.capacity_gw = 6;
        for _ in 0..4 {
            fission.stage_up();
        }
        assert_eq!(fission.commit(), 4);
        fission.stage_up();
        fission.stage_down();
        assert_eq!(fission.core.mustered, 4);
        assert_eq!(fission.commit(), 4);
        assert_eq!(fission.core.history, vec![4, 4]);
    }

    #[test]
    fn geothermal_exploration_converts_capacity_into_rolls() {
        let mut geo = GeothermalPlant::new();
        geo.plant.core.capacity_gw = 9;
        geo.begin_exploration(3);
        assert_eq!(geo.rolls_left, 3);
        assert_eq!(geo.core().capacity_gw, 0);
        geo.award(1);
        geo.award(1);
        assert_eq!(geo.core().capacity_gw, 2);
    }

    #[test]
    fn peaker_moves_freely() {
        let mut peaker = PeakerPlant::new();
        peaker.core.capacity_gw = 4;
        for _ in 0..4 {
            peaker.stage_up();
        }
        peaker.commit();
        assert_eq!(peaker.core.mustered, 0);
        for _ in 0..4 {
            peaker.stage_up();
        }
        assert_eq!(peaker.core.mustered, 4);
    }
}
