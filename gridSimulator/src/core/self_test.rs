// Commit and charge paths on a handful of plants, run by `--test`
use anyhow::{bail, Result};
use tracing::info;
use crate::config::tech_type::TechType;
use crate::models::generation_unit::GenerationUnit;
use crate::utils::traits::Dispatch;

const SELF_TEST_CAPACITY: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct SelfTestCheck {
    pub tech: TechType,
    pub committed: u32,
    pub expected: u32,
}

impl SelfTestCheck {
    pub fn passed(&self) -> bool {
        self.committed == self.expected
    }
}

fn exercise(tech: TechType) -> SelfTestCheck {
    let mut unit = GenerationUnit::new(tech);
    unit.set_capacity(SELF_TEST_CAPACITY);
    if let GenerationUnit::Storage(p) = &mut unit {
        p.set_energy_capacity(SELF_TEST_CAPACITY);
        p.commit_charge(SELF_TEST_CAPACITY);
    }
    for _ in 0..SELF_TEST_CAPACITY {
        unit.stage_up();
    }
    let committed = unit.commit();
    SelfTestCheck {
        tech,
        committed,
        expected: SELF_TEST_CAPACITY,
    }
}

/// Runs every check and fails if any plant did not commit its full capacity
pub fn run_self_test() -> Result<Vec<SelfTestCheck>> {
    let checks: Vec<SelfTestCheck> = [TechType::Coal, TechType::Fission, TechType::Storage, TechType::Combined]
        .iter()
        .map(|tech| exercise(*tech))
        .collect();
    for check in &checks {
        info!("Self-test {}: committed {} of {} GW", check.tech, check.committed, check.expected);
    }
    if let Some(failed) = checks.iter().find(|c| !c.passed()) {
        bail!(
            "self-test failed for {}: committed {} GW, expected {}",
            failed.tech, failed.committed, failed.expected
        );
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_test_passes() {
        let checks = run_self_test().unwrap();
        assert_eq!(checks.len(), 4);
        assert!(checks.iter().all(SelfTestCheck::passed));
    }
}
