use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::config::constants::{DIE_FACES, ROLLS_PER_CYCLE};

/// GW awarded by the die stopped at `roll` (0, 1 or 2) of an exploration cycle.
/// Later thresholds depend on how the earlier rolls landed.
pub fn ladder_award(roll: usize, rolls: &[u8; ROLLS_PER_CYCLE]) -> u32 {
    let [r0, r1, r2] = *rolls;
    let hit = match roll {
        0 => r0 <= 3,
        1 => (r0 <= 3 && r1 <= 4) || (r0 > 3 && r1 <= 2),
        2 => {
            (r0 <= 3 && r1 <= 4 && r2 <= 5)
                || (r0 <= 3 && r1 > 4 && r2 <= 3)
                || (r0 > 3 && r1 <= 2 && r2 <= 3)
                || (r0 > 3 && r1 > 2 && r2 <= 1)
        }
        _ => false,
    };
    hit as u32
}

/// Draws a face in 1..=6 that differs from `previous`
pub fn roll_die<R: Rng + ?Sized>(previous: u8, rng: &mut R) -> u8 {
    loop {
        let face = rng.gen_range(1..=DIE_FACES);
        if face != previous {
            return face;
        }
    }
}

/// Die state for the unit currently exploring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub face: u8,
    pub roll_num: usize,
    pub rolling: bool,
    pub rolls: [u8; ROLLS_PER_CYCLE],
    pub last_success: Option<bool>,
}

impl Default for DiceRoll {
    fn default() -> Self {
        Self {
            face: 1,
            roll_num: 0,
            rolling: true,
            rolls: [0; ROLLS_PER_CYCLE],
            last_success: None,
        }
    }
}

/// Result of stopping the die
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppedRoll {
    pub roll: usize,
    pub face: u8,
    pub awarded: u32,
    pub cycle_complete: bool,
}

impl DiceRoll {
    /// Spins the displayed face while rolling. Cosmetic only, draws nothing from the session RNG.
    pub fn animate(&mut self) {
        if self.rolling {
            self.face = self.face % DIE_FACES + 1;
        }
    }

    /// Stops the die on a fresh face and scores it against the ladder
    pub fn stop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StoppedRoll {
        self.rolling = false;
        self.face = roll_die(self.face, rng);
        self.rolls[self.roll_num] = self.face;
        let awarded = ladder_award(self.roll_num, &self.rolls);
        self.last_success = Some(awarded > 0);
        StoppedRoll {
            roll: self.roll_num,
            face: self.face,
            awarded,
            cycle_complete: self.roll_num + 1 >= ROLLS_PER_CYCLE,
        }
    }

    /// Starts the next roll, clearing the record after a full cycle
    pub fn restart(&mut self) {
        self.rolling = true;
        self.roll_num += 1;
        if self.roll_num >= ROLLS_PER_CYCLE {
            self.roll_num = 0;
            self.rolls = [0; ROLLS_PER_CYCLE];
        }
    }
}
