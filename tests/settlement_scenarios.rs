use marbles::core::settlement::settle;
use marbles::models::generation_unit::GenerationUnit;
use marbles::utils::traits::Dispatch;
use marbles::TechType;

fn staged(tech: TechType, capacity: u32, output: u32) -> GenerationUnit {
    let mut unit = GenerationUnit::new(tech);
    unit.set_capacity(capacity);
    match &mut unit {
        GenerationUnit::Hydro(p) => p.set_energy_capacity(40),
        GenerationUnit::Storage(p) => p.set_energy_capacity(capacity),
        _ => {}
    }
    while unit.mustered() < output {
        let before = unit.mustered();
        unit.stage_up();
        assert_ne!(unit.mustered(), before, "{} cannot reach {}", tech, output);
    }
    unit
}

#[test]
fn shortfall_without_storage_loses_the_gap() {
    let mut units = vec![
        Some(staged(TechType::Fission, 12, 12)),
        Some(staged(TechType::Geothermal, 5, 5)),
    ];
    let report = settle(&mut units, 20, 0.0, false);
    assert_eq!(report.total_dispatch, 17);
    assert_eq!(report.score_delta, -3.0);
    assert!(!report.powered);
    assert_eq!(report.unstored, 0);
}

#[test]
fn surplus_charges_storage_before_any_penalty() {
    let mut units = vec![
        Some(staged(TechType::Fission, 10, 10)),
        Some(staged(TechType::Geothermal, 8, 8)),
        Some(staged(TechType::Hydro, 4, 4)),
        Some(staged(TechType::Storage, 10, 0)),
    ];
    let report = settle(&mut units, 18, 0.0, false);
    assert_eq!(report.total_dispatch, 22);
    assert_eq!(report.score_delta, 18.0);
    assert_eq!(report.stored, 4);
    assert_eq!(report.excess_points, 0.0);
    assert!(report.powered);
    assert_eq!(report.charged_slots, vec![3]);
    let charge = units[3].as_ref().and_then(|u| u.store()).map(|s| s.charge);
    assert_eq!(charge, Some(4));
}

#[test]
fn coal_ramp_halts_one_above_the_last_commit() {
    let mut coal = staged(TechType::Coal, 10, 5);
    coal.commit();
    assert!(coal.core().has_run);
    for _ in 0..3 {
        coal.stage_up();
    }
    assert_eq!(coal.mustered(), 6);
}

#[test]
fn settlement_is_reproducible_from_identical_inputs() {
    let units = vec![
        Some(staged(TechType::Coal, 8, 8)),
        Some(staged(TechType::Peaker, 6, 3)),
        None,
        Some(staged(TechType::Storage, 3, 0)),
    ];
    let mut first = units.clone();
    let mut second = units;
    let a = settle(&mut first, 9, 0.2, true);
    let b = settle(&mut second, 9, 0.2, true);
    assert_eq!(a, b);
    assert_eq!(first, second);
    assert_eq!(a.unstored, 0);
    assert_eq!(a.stored, 2);
    assert_eq!(a.score_delta, 9.0 - 8.0 - 2.25);
}
