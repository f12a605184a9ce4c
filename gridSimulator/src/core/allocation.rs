// Capacity token accounting for the selection and allocation phases
use crate::config::constants::HYDRO_STORAGE_TABLE;
use crate::config::tech_type::TechType;
use crate::models::generation_unit::GenerationUnit;

/// Reservoir size for a hydro plant of `gw`, clamped to the last table entry
pub fn hydro_storage_for(gw: u32) -> u32 {
    if gw == 0 {
        return 0;
    }
    let index = (gw as usize).min(HYDRO_STORAGE_TABLE.len()) - 1;
    HYDRO_STORAGE_TABLE[index]
}

fn resize_store(unit: &mut GenerationUnit) {
    let capacity = unit.capacity_gw();
    match unit {
        GenerationUnit::Hydro(p) => p.set_energy_capacity(hydro_storage_for(capacity)),
        GenerationUnit::Storage(p) => p.set_energy_capacity(capacity),
        _ => {}
    }
}

/// Builds a freshly selected plant at its minimum capacity and charges its price
pub fn build_unit(tech: TechType, tokens: &mut u32) -> GenerationUnit {
    let mut unit = GenerationUnit::new(tech);
    unit.set_capacity(tech.capacity_step());
    unit.set_running(true);
    resize_store(&mut unit);
    *tokens = tokens.saturating_sub(tech.token_cost());
    unit
}

/// Buys one capacity step. Returns false when tokens or the cap prevent it.
pub fn increase_capacity(unit: &mut GenerationUnit, tokens: &mut u32) -> bool {
    let tech = unit.tech();
    let cost = tech.token_cost();
    if *tokens < cost {
        return false;
    }
    let next = unit.capacity_gw() + tech.capacity_step();
    if tech.soft_cap().map_or(false, |cap| next > cap) {
        return false;
    }
    unit.set_capacity(next);
    *tokens -= cost;
    resize_store(unit);
    true
}

/// Sells one capacity step back. A plant never drops below its minimum step.
pub fn decrease_capacity(unit: &mut GenerationUnit, tokens: &mut u32) -> bool {
    let tech = unit.tech();
    let step = tech.capacity_step();
    if unit.capacity_gw() <= step {
        return false;
    }
    unit.set_capacity(unit.capacity_gw() - step);
    *tokens += tech.token_cost();
    resize_store(unit);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::traits::Dispatch;

    #[test]
    fn hydro_table_clamps_past_its_end() {
        assert_eq!(hydro_storage_for(0), 0);
        assert_eq!(hydro_storage_for(1), HYDRO_STORAGE_TABLE[0]);
        assert_eq!(hydro_storage_for(18), HYDRO_STORAGE_TABLE[17]);
        assert_eq!(hydro_storage_for(40), HYDRO_STORAGE_TABLE[17]);
    }

    #[test]
    fn building_charges_each_technology_its_price() {
        let mut tokens = 36;
        let geo = build_unit(TechType::Geothermal, &mut tokens);
        let fission = build_unit(TechType::Fission, &mut tokens);
        let storage = build_unit(TechType::Storage, &mut tokens);
        let wind = build_unit(TechType::Wind, &mut tokens);
        assert_eq!(tokens, 36 - 3 - 2 - 3 - 1);
        assert_eq!(geo.capacity_gw(), 3);
        assert_eq!(fission.capacity_gw(), 1);
        assert_eq!(storage.store().map(|s| (s.energy_capacity, s.charge)), Some((1, 0)));
        assert_eq!(wind.capacity_gw(), 1);
        assert!(wind.core().running);
    }

    #[test]
    fn hydro_refills_on_every_capacity_change() {
        let mut tokens = 5;
        let mut hydro = build_unit(TechType::Hydro, &mut tokens);
        assert_eq!(hydro.store().map(|s| s.charge), Some(16));
        assert!(increase_capacity(&mut hydro, &mut tokens));
        assert!(increase_capacity(&mut hydro, &mut tokens));
        assert_eq!(hydro.capacity_gw(), 3);
        assert_eq!(hydro.store().map(|s| (s.energy_capacity, s.charge)), Some((40, 40)));
        assert!(decrease_capacity(&mut hydro, &mut tokens));
        assert_eq!(hydro.store().map(|s| s.charge), Some(29));
        assert_eq!(tokens, 3);
    }

    #[test]
    fn tokens_and_minimum_step_bound_allocation() {
        let mut tokens = 1;
        let mut peaker = build_unit(TechType::Peaker, &mut tokens);
        assert_eq!(tokens, 0);
        tokens = 1;
        assert!(!increase_capacity(&mut peaker, &mut tokens));
        assert!(!decrease_capacity(&mut peaker, &mut tokens));
        tokens = 2;
        assert!(increase_capacity(&mut peaker, &mut tokens));
        assert_eq!(peaker.capacity_gw(), 2);
        assert!(decrease_capacity(&mut peaker, &mut tokens));
        assert_eq!(tokens, 2);
    }

    #[test]
    fn geothermal_moves_in_whole_cycles() {
        let mut tokens = 9;
        let mut geo = build_unit(TechType::Geothermal, &mut tokens);
        assert!(increase_capacity(&mut geo, &mut tokens));
        assert_eq!(geo.capacity_gw(), 6);
        assert_eq!(tokens, 3);
        assert!(decrease_capacity(&mut geo, &mut tokens));
        assert!(!decrease_capacity(&mut geo, &mut tokens));
        assert_eq!(tokens, 6);
    }
}
