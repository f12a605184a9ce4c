use serde::{Deserialize, Serialize};
use crate::config::tech_type::TechType;
use crate::models::plant::PlantCore;
use crate::models::storage::{EnergyStore, HydroPlant, StoragePlant};
use crate::models::thermal::{FissionPlant, GeothermalPlant, PeakerPlant, RampedPlant};
use crate::models::variable::VariablePlant;
use crate::resources::state::ResourceSample;
use crate::utils::traits::Dispatch;

/// One built plant in a slot, one case per technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationUnit {
    Coal(RampedPlant),
    Combined(RampedPlant),
    Fission(FissionPlant),
    Geothermal(GeothermalPlant),
    Hydro(HydroPlant),
    Peaker(PeakerPlant),
    Solar(VariablePlant),
    Storage(StoragePlant),
    Tidal(VariablePlant),
    Wave(VariablePlant),
    Wind(VariablePlant),
}

impl GenerationUnit {
    /// Builds an empty plant of the given technology
    pub fn new(tech: TechType) -> Self {
        match tech {
            TechType::Coal => GenerationUnit::Coal(RampedPlant::new(TechType::Coal)),
            TechType::Combined => GenerationUnit::Combined(RampedPlant::new(TechType::Combined)),
            TechType::Fission => GenerationUnit::Fission(FissionPlant::new()),
            TechType::Geothermal => GenerationUnit::Geothermal(GeothermalPlant::new()),
            TechType::Hydro => GenerationUnit::Hydro(HydroPlant::new()),
            TechType::Peaker => GenerationUnit::Peaker(PeakerPlant::new()),
            TechType::Solar => GenerationUnit::Solar(VariablePlant::new(TechType::Solar)),
            TechType::Storage => GenerationUnit::Storage(StoragePlant::new()),
            TechType::Tidal => GenerationUnit::Tidal(VariablePlant::new(TechType::Tidal)),
            TechType::Wave => GenerationUnit::Wave(VariablePlant::new(TechType::Wave)),
            TechType::Wind => GenerationUnit::Wind(VariablePlant::new(TechType::Wind)),
        }
    }

    pub fn tech(&self) -> TechType {
        match self {
            GenerationUnit::Coal(_) => TechType::Coal,
            GenerationUnit::Combined(_) => TechType::Combined,
            GenerationUnit::Fission(_) => TechType::Fission,
            GenerationUnit::Geothermal(_) => TechType::Geothermal,
            GenerationUnit::Hydro(_) => TechType::Hydro,
            GenerationUnit::Peaker(_) => TechType::Peaker,
            GenerationUnit::Solar(_) => TechType::Solar,
            GenerationUnit::Storage(_) => TechType::Storage,
            GenerationUnit::Tidal(_) => TechType::Tidal,
            GenerationUnit::Wave(_) => TechType::Wave,
            GenerationUnit::Wind(_) => TechType::Wind,
        }
    }

    fn as_dispatch(&self) -> &dyn Dispatch {
        match self {
            GenerationUnit::Coal(p) | GenerationUnit::Combined(p) => p,
            GenerationUnit::Fission(p) => p,
            GenerationUnit::Geothermal(p) => p,
            GenerationUnit::Hydro(p) => p,
            GenerationUnit::Peaker(p) => p,
            GenerationUnit::Storage(p) => p,
            GenerationUnit::Solar(p)
            | GenerationUnit::Tidal(p)
            | GenerationUnit::Wave(p)
            | GenerationUnit::Wind(p) => p,
        }
    }

    fn as_dispatch_mut(&mut self) -> &mut dyn Dispatch {
        match self {
            GenerationUnit::Coal(p) | GenerationUnit::Combined(p) => p,
            GenerationUnit::Fission(p) => p,
            GenerationUnit::Geothermal(p) => p,
            GenerationUnit::Hydro(p) => p,
            GenerationUnit::Peaker(p) => p,
            GenerationUnit::Storage(p) => p,
            GenerationUnit::Solar(p)
            | GenerationUnit::Tidal(p)
            | GenerationUnit::Wave(p)
            | GenerationUnit::Wind(p) => p,
        }
    }

    pub fn capacity_gw(&self) -> u32 {
        self.core().capacity_gw
    }

    pub fn set_capacity(&mut self, gw: u32) {
        self.core_mut().capacity_gw = gw;
    }

    pub fn mustered(&self) -> u32 {
        self.core().mustered
    }

    pub fn set_running(&mut self, running: bool) {
        self.core_mut().running = running;
    }

    pub fn set_has_run(&mut self, has_run: bool) {
        self.core_mut().has_run = has_run;
    }

    pub fn store(&self) -> Option<&EnergyStore> {
        match self {
            GenerationUnit::Hydro(p) => Some(&p.store),
            GenerationUnit::Storage(p) => Some(&p.store),
            _ => None,
        }
    }

    /// Offers excess production to a grid store. Plants without one return it all.
    pub fn commit_charge(&mut self, offered: u32) -> u32 {
        match self {
            GenerationUnit::Storage(p) => p.commit_charge(offered),
            _ => offered,
        }
    }

    pub fn as_geothermal_mut(&mut self) -> Option<&mut GeothermalPlant> {
        match self {
            GenerationUnit::Geothermal(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_geothermal(&self) -> Option<&GeothermalPlant> {
        match self {
            GenerationUnit::Geothermal(p) => Some(p),
            _ => None,
        }
    }

    /// Unrounded output for a hypothetical sample, without touching plant state
    pub fn output_for(&self, sample: &ResourceSample) -> Option<f64> {
        match self {
            GenerationUnit::Solar(p)
            | GenerationUnit::Tidal(p)
            | GenerationUnit::Wave(p)
            | GenerationUnit::Wind(p) => Some(p.output_for(sample)),
            _ => None,
        }
    }
}

impl Dispatch for GenerationUnit {
    fn core(&self) -> &PlantCore {
        self.as_dispatch().core()
    }

    fn core_mut(&mut self) -> &mut PlantCore {
        self.as_dispatch_mut().core_mut()
    }

    fn stage_up(&mut self) {
        self.as_dispatch_mut().stage_up();
    }

    fn stage_down(&mut self) {
        self.as_dispatch_mut().stage_down();
    }

    fn commit(&mut self) -> u32 {
        self.as_dispatch_mut().commit()
    }

    fn produce(&mut self, sample: &ResourceSample) -> Option<f64> {
        self.as_dispatch_mut().produce(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn built(tech: TechType, capacity: u32) -> GenerationUnit {
        let mut unit = GenerationUnit::new(tech);
        unit.set_capacity(capacity);
        match &mut unit {
            GenerationUnit::Hydro(p) => p.set_energy_capacity(40),
            GenerationUnit::Storage(p) => {
                p.set_energy_capacity(capacity);
                p.store.set_charge(capacity / 2);
            }
            _ => {}
        }
        unit
    }

    #[test]
    fn every_technology_round_trips_its_tag() {
        for tech in TechType::ALL {
            assert_eq!(GenerationUnit::new(tech).tech(), tech);
        }
    }

    #[test]
    fn random_staging_stays_inside_capacity_and_ramp() {
        let mut rng = StdRng::seed_from_u64(7);
        for tech in TechType::ALL {
            let mut unit = built(tech, 8);
            for _round in 0..6 {
                let last = unit.core().last_production;
                let has_run = unit.core().has_run;
                for _ in 0..20 {
                    if rng.gen_bool(0.5) {
                        unit.stage_up();
                    } else {
                        unit.stage_down();
                    }
                    let mustered = unit.mustered();
                    assert!(mustered <= unit.capacity_gw(), "{} over capacity", tech);
                    if let (true, Some(limit)) = (has_run, tech.ramp_limit()) {
                        assert!(mustered <= last + limit, "{} over ramp", tech);
                        assert!(mustered + limit >= last, "{} under ramp", tech);
                    }
                    if let Some(store) = unit.store() {
                        assert!(mustered <= store.charge.max(1), "{} over charge", tech);
                    }
                }
                unit.commit();
                if let Some(store) = unit.store() {
                    assert!(store.charge <= store.energy_capacity);
                }
            }
        }
    }

    #[test]
    fn staging_round_trip_restores_mustered_output() {
        let mut rng = StdRng::seed_from_u64(11);
        for tech in [TechType::Coal, TechType::Combined, TechType::Peaker, TechType::Fission] {
            let mut unit = built(tech, 10);
            for _ in 0..3 {
                unit.stage_up();
            }
            unit.commit();
            let before = unit.mustered();
            let n = rng.gen_range(1..5);
            let mut ups = 0;
            for _ in 0..n {
                let prior = unit.mustered();
                unit.stage_up();
                if unit.mustered() != prior {
                    ups += 1;
                }
            }
            for _ in 0..ups {
                unit.stage_down();
            }
            assert_eq!(unit.mustered(), before, "{}", tech);
        }
    }

    #[test]
    fn every_fresh_technology_stages_up_to_full_capacity() {
        let sample = ResourceSample { solar: 0.5, ..ResourceSample::default() };
        for tech in TechType::ALL {
            let mut unit = built(tech, 8);
            if let GenerationUnit::Storage(p) = &mut unit {
                p.store.set_charge(8);
            }
            unit.produce(&sample);
            for _ in 0..unit.capacity_gw() {
                unit.stage_up();
            }
            assert_eq!(unit.mustered(), unit.capacity_gw(), "{} stalled below capacity", tech);
        }
    }

    #[test]
    fn only_grid_storage_accepts_charge() {
        let mut hydro = built(TechType::Hydro, 2);
        assert_eq!(hydro.commit_charge(3), 3);
        let mut storage = built(TechType::Storage, 4);
        assert_eq!(storage.commit_charge(3), 1);
        assert_eq!(storage.store().map(|s| s.charge), Some(4));
    }
}
