use serde::{Deserialize, Serialize};
use crate::config::constants::HYDRO_MIN_DISCHARGE;
use crate::config::tech_type::TechType;
use crate::models::plant::PlantCore;
use crate::utils::traits::Dispatch;

/// Energy held by a reservoir or store, in GWh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyStore {
    pub energy_capacity: u32,
    pub charge: u32,
}

impl EnergyStore {
    pub fn empty() -> Self {
        Self { energy_capacity: 0, charge: 0 }
    }

    pub fn headroom(&self) -> u32 {
        self.energy_capacity.saturating_sub(self.charge)
    }

    pub fn set_charge(&mut self, charge: u32) {
        self.charge = charge.min(self.energy_capacity);
    }

    /// Draws committed output from the store, 1 GWh per GW for the round
    pub fn discharge(&mut self, gw: u32) {
        self.charge = self.charge.saturating_sub(gw);
    }

    /// Accepts up to the remaining headroom and returns what could not be stored
    pub fn accept(&mut self, offered: u32) -> u32 {
        let accepted = offered.min(self.headroom());
        self.charge += accepted;
        offered - accepted
    }

    pub fn charge_ratio(&self) -> f64 {
        if self.energy_capacity == 0 {
            return 0.0;
        }
        self.charge as f64 / self.energy_capacity as f64
    }
}

/// Hydro dam: a reservoir filled once per session that must discharge at least 1 GW
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydroPlant {
    pub core: PlantCore,
    pub store: EnergyStore,
}

impl HydroPlant {
    pub fn new() -> Self {
        let mut core = PlantCore::new(TechType::Hydro.token_cost());
        core.mustered = HYDRO_MIN_DISCHARGE;
        Self { core, store: EnergyStore::empty() }
    }

    /// Resizes the reservoir and refills it
    pub fn set_energy_capacity(&mut self, gwh: u32) {
        self.store.energy_capacity = gwh;
        self.store.charge = gwh;
    }
}

impl Default for HydroPlant {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for HydroPlant {
    fn core(&self) -> &PlantCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        &mut self.core
    }

    fn stage_up(&mut self) {
        if self.core.mustered >= self.core.capacity_gw || self.core.mustered >= self.store.charge {
            return;
        }
        self.core.mustered += 1;
    }

    fn stage_down(&mut self) {
        if self.core.mustered <= HYDRO_MIN_DISCHARGE {
            return;
        }
        self.core.mustered -= 1;
    }

    fn commit(&mut self) -> u32 {
        let committed = self.core.record_commit();
        self.store.discharge(committed);
        if self.store.charge > 0 {
            self.core.mustered = HYDRO_MIN_DISCHARGE.min(self.core.capacity_gw).min(self.store.charge);
        } else {
            self.core.mustered = 0;
            self.core.running = false;
        }
        committed
    }
}

/// Grid storage: charged from excess production, discharged by committing output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoragePlant {
    pub core: PlantCore,
    pub store: EnergyStore,
}

impl StoragePlant {
    pub fn new() -> Self {
        Self {
            core: PlantCore::new(TechType::Storage.token_cost()),
            store: EnergyStore::empty(),
        }
    }

    /// Resizes the store and empties it
    pub fn set_energy_capacity(&mut self, gwh: u32) {
        self.store.energy_capacity = gwh;
        self.store.charge = 0;
    }

    /// Offers excess production to the store and returns the unaccepted remainder
    pub fn commit_charge(&mut self, offered: u32) -> u32 {
        self.store.accept(offered)
    }
}

impl Default for StoragePlant {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for StoragePlant {
    fn core(&self) -> &PlantCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        &mut self.core
    }

    fn stage_up(&mut self) {
        if self.core.mustered >= self.core.capacity_gw || self.core.mustered >= self.store.charge {
            return;
        }
        self.core.mustered += 1;
    }

    fn commit(&mut self) -> u32 {
        let committed = self.core.commit();
        self.store.discharge(committed);
        committed
    }
}
