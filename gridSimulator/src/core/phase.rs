// Phase tags and the six-slot technology selection cursor
use std::fmt;
use serde::{Deserialize, Serialize};
use crate::config::constants::SLOT_COUNT;
use crate::config::tech_type::TechType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Menu,
    ActivePlay,
    SelectTechnology,
    AllocateCapacity,
    GeothermalExploration,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Phase::Menu => write!(f, "Menu"),
            Phase::ActivePlay => write!(f, "Active Play"),
            Phase::SelectTechnology => write!(f, "Select Technology"),
            Phase::AllocateCapacity => write!(f, "Allocate Capacity"),
            Phase::GeothermalExploration => write!(f, "Geothermal Exploration"),
            Phase::GameOver => write!(f, "Game Over"),
        }
    }
}

/// Slot cursor plus the technology chosen for each slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelection {
    pub index: usize,
    pub slots: [Option<TechType>; SLOT_COUNT],
}

impl Default for SlotSelection {
    fn default() -> Self {
        Self {
            index: 0,
            slots: [None; SLOT_COUNT],
        }
    }
}

impl SlotSelection {
    pub fn selected(&self) -> Option<TechType> {
        self.slots[self.index]
    }

    /// Technologies already placed in the other slots
    pub fn taboo(&self) -> Vec<TechType> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.index)
            .filter_map(|(_, tech)| *tech)
            .collect()
    }

    pub fn chosen_count(&self) -> usize {
        self.slots.iter().filter(|tech| tech.is_some()).count()
    }

    pub fn move_right(&mut self) {
        self.index = (self.index + 1) % SLOT_COUNT;
    }

    pub fn move_left(&mut self) {
        self.index = (self.index + SLOT_COUNT - 1) % SLOT_COUNT;
    }

    /// Steps the current slot through None, Coal .. Wind, None, skipping taboo entries
    pub fn cycle_forward(&mut self) {
        self.cycle(1);
    }

    pub fn cycle_backward(&mut self) {
        self.cycle(TechType::ALL.len());
    }

    // positions: 0 is None, 1..=11 are the technologies in slot order
    fn cycle(&mut self, step: usize) {
        let positions = TechType::ALL.len() + 1;
        let taboo = self.taboo();
        let mut position = self.slots[self.index].map_or(0, |tech| tech.index() + 1);
        loop {
            position = (position + step) % positions;
            let candidate = position.checked_sub(1).and_then(TechType::from_index);
            match candidate {
                Some(tech) if taboo.contains(&tech) => continue,
                _ => {
                    self.slots[self.index] = candidate;
                    return;
                }
            }
        }
    }

    /// Next occupied slot after the cursor, wrapping. Stays put when none is occupied.
    pub fn next_valid_index(&self) -> usize {
        (1..=SLOT_COUNT)
            .map(|offset| (self.index + offset) % SLOT_COUNT)
            .find(|&i| self.slots[i].is_some())
            .unwrap_or(self.index)
    }

    pub fn prev_valid_index(&self) -> usize {
        (1..=SLOT_COUNT)
            .map(|offset| (self.index + SLOT_COUNT - offset) % SLOT_COUNT)
            .find(|&i| self.slots[i].is_some())
            .unwrap_or(self.index)
    }

    /// Moves the cursor to the lowest occupied slot
    pub fn reset_to_first_valid(&mut self) {
        self.index = self.slots.iter().position(|tech| tech.is_some()).unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_over_six_slots() {
        let mut selection = SlotSelection::default();
        selection.move_left();
        assert_eq!(selection.index, 5);
        selection.move_right();
        assert_eq!(selection.index, 0);
    }

    #[test]
    fn cycling_wraps_through_none() {
        let mut selection = SlotSelection::default();
        selection.cycle_forward();
        assert_eq!(selection.selected(), Some(TechType::Coal));
        selection.cycle_backward();
        assert_eq!(selection.selected(), None);
        selection.cycle_backward();
        assert_eq!(selection.selected(), Some(TechType::Wind));
    }

    #[test]
    fn cycling_skips_technologies_in_other_slots() {
        let mut selection = SlotSelection::default();
        selection.cycle_forward();
        selection.move_right();
        selection.cycle_forward();
        assert_eq!(selection.selected(), Some(TechType::Combined));
        assert_eq!(selection.taboo(), vec![TechType::Coal]);

        selection.cycle_backward();
        selection.cycle_backward();
        assert_eq!(selection.selected(), Some(TechType::Wind));
    }

    #[test]
    fn valid_index_skips_empty_slots() {
        let mut selection = SlotSelection::default();
        selection.slots[1] = Some(TechType::Solar);
        selection.slots[4] = Some(TechType::Hydro);
        selection.reset_to_first_valid();
        assert_eq!(selection.index, 1);
        assert_eq!(selection.next_valid_index(), 4);
        selection.index = 4;
        assert_eq!(selection.next_valid_index(), 1);
        assert_eq!(selection.prev_valid_index(), 1);

        let empty = SlotSelection::default();
        assert_eq!(empty.next_valid_index(), 0);
    }
}
