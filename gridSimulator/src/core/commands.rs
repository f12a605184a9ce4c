use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::config::tech_type::TechType;
use crate::core::phase::Phase;

/// Discrete player input, one per key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    SlotLeft,
    SlotRight,
    StageUp,
    StageDown,
    Confirm,
    Cancel,
    Yes,
    No,
    ToggleEnergyOverlay,
    ToggleForecastOverlay,
    ShowInfo,
    ShowTutorial,
    ShowKeyBindings,
    DeferLoad,
    QuitRound,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "left" => Ok(Command::SlotLeft),
            "d" | "right" => Ok(Command::SlotRight),
            "w" | "up" => Ok(Command::StageUp),
            "s" | "down" => Ok(Command::StageDown),
            "space" | "confirm" => Ok(Command::Confirm),
            "esc" | "escape" => Ok(Command::Cancel),
            "y" => Ok(Command::Yes),
            "n" => Ok(Command::No),
            "e" => Ok(Command::ToggleEnergyOverlay),
            "f" => Ok(Command::ToggleForecastOverlay),
            "i" => Ok(Command::ShowInfo),
            "t" => Ok(Command::ShowTutorial),
            "b" => Ok(Command::ShowKeyBindings),
            "l" => Ok(Command::DeferLoad),
            "p" => Ok(Command::QuitRound),
            _ => Err(format!("Unknown command key: {}", s)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let key = match self {
            Command::SlotLeft => "a",
            Command::SlotRight => "d",
            Command::StageUp => "w",
            Command::StageDown => "s",
            Command::Confirm => "space",
            Command::Cancel => "esc",
            Command::Yes => "y",
            Command::No => "n",
            Command::ToggleEnergyOverlay => "e",
            Command::ToggleForecastOverlay => "f",
            Command::ShowInfo => "i",
            Command::ShowTutorial => "t",
            Command::ShowKeyBindings => "b",
            Command::DeferLoad => "l",
            Command::QuitRound => "p",
        };
        write!(f, "{}", key)
    }
}

/// Parses a whitespace separated key stream. `#` starts a comment to end of line.
pub fn parse_script(script: &str) -> Result<Vec<Command>, String> {
    script
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
        .map(str::parse)
        .collect()
}

/// Observable outcome of applying a command or advancing a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    SlotSelected { slot: usize, tech: Option<TechType> },
    CapacityChanged { slot: usize, tech: TechType, capacity_gw: u32, tokens_left: u32 },
    Staged { slot: usize, tech: TechType, mustered: u32 },
    RoundSettled { hour: u32, demand: u32, dispatch: u32, score_delta: f64, powered: bool },
    TransitionFinished { hour: u32 },
    DieStopped { slot: usize, roll: usize, face: u8, awarded: u32 },
    ExplorationCycleFinished { slot: usize, rolls_left: u32 },
    LoadDeferred { load: u32, from_hour: u32, to_hour: u32 },
    DeferralCancelled,
    OverlayChanged { overlay: Option<Overlay> },
    PromptOpened { prompt: Prompt },
    PromptClosed { prompt: Prompt },
    SessionReset,
    QuitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Energy,
    Forecast,
    Info,
    Tutorial { page: usize },
    KeyBindings { page: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    QuitRound,
    QuitGame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_to_commands() {
        assert_eq!("W".parse::<Command>(), Ok(Command::StageUp));
        assert_eq!("space".parse::<Command>(), Ok(Command::Confirm));
        assert_eq!("esc".parse::<Command>(), Ok(Command::Cancel));
        assert!("q".parse::<Command>().is_err());
    }

    #[test]
    fn display_is_the_key_it_parses_from() {
        for key in ["a", "d", "w", "s", "space", "esc", "y", "n", "e", "f", "i", "t", "b", "l", "p"] {
            let command: Command = key.parse().unwrap();
            assert_eq!(command.to_string(), key);
        }
    }

    #[test]
    fn script_skips_comments_and_blank_lines() {
        let script = "space  # leave the menu\n\nd space\n  # nothing here\nw w";
        let commands = parse_script(script).unwrap();
        assert_eq!(
            commands,
            vec![Command::Confirm, Command::SlotRight, Command::Confirm, Command::StageUp, Command::StageUp]
        );
        assert!(parse_script("w x").is_err());
    }
}
