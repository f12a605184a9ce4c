use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::config::constants::*;

/// Hourly demand: the base table (mutable by load deferral), the current round's
/// realized value and the append-only history of realized values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSeries {
    pub table: Vec<u32>,
    pub current: u32,
    pub actual: Vec<u32>,
}

impl Default for DemandSeries {
    fn default() -> Self {
        Self {
            table: BASE_DEMAND_TABLE.to_vec(),
            current: 0,
            actual: Vec::new(),
        }
    }
}

impl DemandSeries {
    fn jitter<R: Rng + ?Sized>(rng: &mut R) -> i32 {
        (DEMAND_JITTER_SPAN * rng.gen::<f64>()) as i32 - DEMAND_JITTER_OFFSET
    }

    /// Base table entry for an hour; hours past the table wrap to its start
    pub fn base_for(&self, hour: usize) -> u32 {
        if hour < self.table.len() {
            self.table[hour]
        } else {
            self.table[0]
        }
    }

    /// Realizes demand for `hour` with jitter and appends it to the history
    pub fn roll<R: Rng + ?Sized>(&mut self, hour: usize, rng: &mut R) -> u32 {
        let realized = self.base_for(hour) as i32 + Self::jitter(rng);
        self.current = realized.max(0) as u32;
        self.actual.push(self.current);
        self.current
    }

    /// Next round's demand as shown in the forecast: the plain table entry
    pub fn forecast(&self, hour: usize) -> u32 {
        self.table[(hour + 1) % self.table.len()]
    }

    /// Latest hour a load can be deferred to
    pub fn last_deferrable_hour(&self) -> usize {
        self.table.len() - 1
    }

    /// Moves `load` GW from the current round to `target_hour` of the base table
    pub fn defer(&mut self, hour: usize, load: u32, target_hour: usize) -> bool {
        if load == 0 || load > self.current || target_hour <= hour || target_hour >= self.table.len() {
            return false;
        }
        self.current -= load;
        if let Some(entry) = self.actual.get_mut(hour) {
            *entry = self.current;
        } else if let Some(last) = self.actual.last_mut() {
            *last = self.current;
        }
        self.table[target_hour] += load;
        true
    }
}
