use serde::{Deserialize, Serialize};

/// State shared by every generation technology. Output is counted in whole GW ("marbles").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantCore {
    pub capacity_gw: u32,
    pub mustered: u32,              // staged output for the coming commit
    pub last_production: u32,       // ramp baseline
    pub has_run: bool,
    pub running: bool,
    pub price_per_gw: u32,
    pub history: Vec<u32>,          // committed output per round
}

impl PlantCore {
    pub fn new(price_per_gw: u32) -> Self {
        Self {
            capacity_gw: 0,
            mustered: 0,
            last_production: 0,
            has_run: false,
            running: false,
            price_per_gw,
            history: Vec::new(),
        }
    }

    pub fn stage_up(&mut self) {
        if self.mustered >= self.capacity_gw {
            return;
        }
        self.mustered += 1;
    }

    pub fn stage_down(&mut self) {
        if self.mustered == 0 {
            return;
        }
        self.mustered -= 1;
    }

    /// Records the staged output as this round's dispatch and returns it.
    /// Leaves `mustered` untouched; callers decide what is staged next.
    pub fn record_commit(&mut self) -> u32 {
        let committed = self.mustered;
        if committed == 0 {
            self.running = false;
        } else {
            self.running = true;
            self.has_run = true;
        }
        self.history.push(committed);
        committed
    }

    /// Plain commit: dispatch the staged output and clear the stage
    pub fn commit(&mut self) -> u32 {
        let committed = self.record_commit();
        self.mustered = 0;
        committed
    }

    pub fn ramp_blocks_up(&self, limit: u32) -> bool {
        self.has_run && self.mustered >= self.last_production + limit
    }

    pub fn ramp_blocks_down(&self, limit: u32) -> bool {
        self.has_run && self.mustered <= self.last_production.saturating_sub(limit)
    }

    /// Staged output as a fraction of capacity, 0 for an unbuilt plant
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity_gw == 0 {
            return 0.0;
        }
        self.mustered as f64 / self.capacity_gw as f64
    }

    pub fn last_committed(&self) -> Option<u32> {
        self.history.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_is_bounded_by_capacity() {
        let mut core = PlantCore::new(1);
        core.capacity_gw = 2;
        for _ in 0..5 {
            core.stage_up();
        }
        assert_eq!(core.mustered, 2);
        for _ in 0..5 {
            core.stage_down();
        }
        assert_eq!(core.mustered, 0);
    }

    #[test]
    fn commit_sets_flags_and_history() {
        let mut core = PlantCore::new(1);
        core.capacity_gw = 3;
        core.commit();
        assert!(!core.running);
        assert!(!core.has_run);

        core.stage_up();
        core.stage_up();
        assert_eq!(core.commit(), 2);
        assert!(core.running);
        assert!(core.has_run);
        assert_eq!(core.mustered, 0);
        assert_eq!(core.history, vec![0, 2]);
    }

    #[test]
    fn zero_capacity_fill_ratio_is_zero() {
        let core = PlantCore::new(1);
        assert_eq!(core.fill_ratio(), 0.0);
        assert!(core.last_committed().is_none());
    }
}
