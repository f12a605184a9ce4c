// Tech Type module - the closed set of plant technologies and their rule tables
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::config::constants::*;
use crate::config::texts;

/// Generation technologies a slot can hold, in slot-selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TechType {
    Coal,
    Combined,
    Fission,
    Geothermal,
    Hydro,
    Peaker,
    Solar,
    Storage,
    Tidal,
    Wave,
    Wind,
}

impl FromStr for TechType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coal" => Ok(TechType::Coal),
            "combined" | "combinedcycle" => Ok(TechType::Combined),
            "fission" | "nuclear" => Ok(TechType::Fission),
            "geothermal" => Ok(TechType::Geothermal),
            "hydro" => Ok(TechType::Hydro),
            "peaker" => Ok(TechType::Peaker),
            "solar" => Ok(TechType::Solar),
            "storage" => Ok(TechType::Storage),
            "tidal" => Ok(TechType::Tidal),
            "wave" => Ok(TechType::Wave),
            "wind" => Ok(TechType::Wind),
            _ => Err(format!("Unknown technology: {}", s)),
        }
    }
}

impl fmt::Display for TechType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TechType::Coal => write!(f, "Coal"),
            TechType::Combined => write!(f, "Combined Cycle"),
            TechType::Fission => write!(f, "Fission"),
            TechType::Geothermal => write!(f, "Geothermal"),
            TechType::Hydro => write!(f, "Hydro"),
            TechType::Peaker => write!(f, "Peaker"),
            TechType::Solar => write!(f, "Solar"),
            TechType::Storage => write!(f, "Storage"),
            TechType::Tidal => write!(f, "Tidal"),
            TechType::Wave => write!(f, "Wave"),
            TechType::Wind => write!(f, "Wind"),
        }
    }
}

impl TechType {
    pub const ALL: [TechType; 11] = [
        TechType::Coal,
        TechType::Combined,
        TechType::Fission,
        TechType::Geothermal,
        TechType::Hydro,
        TechType::Peaker,
        TechType::Solar,
        TechType::Storage,
        TechType::Tidal,
        TechType::Wave,
        TechType::Wind,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<TechType> {
        Self::ALL.get(index).copied()
    }

    /// Output follows a resource the player cannot control
    pub fn is_variable(&self) -> bool {
        matches!(self,
            TechType::Solar |
            TechType::Tidal |
            TechType::Wave |
            TechType::Wind
        )
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, TechType::Hydro | TechType::Storage)
    }

    pub fn is_emitting(&self) -> bool {
        matches!(self, TechType::Coal | TechType::Combined | TechType::Peaker)
    }

    /// Tokens spent per capacity step during allocation
    pub fn token_cost(&self) -> u32 {
        match *self {
            TechType::Fission => FISSION_TOKENS_PER_GW,
            TechType::Peaker => PEAKER_TOKENS_PER_GW,
            TechType::Storage => STORAGE_TOKENS_PER_GW,
            TechType::Geothermal => GEOTHERMAL_GW_PER_ROLL,
            _ => 1,
        }
    }

    /// GW added per capacity step during allocation
    pub fn capacity_step(&self) -> u32 {
        match *self {
            TechType::Geothermal => GEOTHERMAL_GW_PER_ROLL,
            TechType::Storage => STORAGE_GW_PER_INCREMENT,
            _ => GW_PER_TOKEN,
        }
    }

    pub fn soft_cap(&self) -> Option<u32> {
        match *self {
            TechType::Fission => Some(FISSION_MAX_CAPACITY),
            TechType::Peaker => Some(PEAKER_MAX_CAPACITY),
            _ => None,
        }
    }

    /// Ramp band around the last commit once a plant has run. None means unconstrained.
    pub fn ramp_limit(&self) -> Option<u32> {
        match *self {
            TechType::Coal => Some(COAL_RAMP_LIMIT),
            TechType::Combined => Some(COMBINED_RAMP_LIMIT),
            TechType::Geothermal => Some(GEOTHERMAL_RAMP_LIMIT),
            TechType::Fission => Some(0),
            _ => None,
        }
    }

    pub fn emission_penalty(&self) -> f64 {
        match *self {
            TechType::Coal => COAL_PENALTY_PER_GWH,
            TechType::Combined => COMBINED_PENALTY_PER_GWH,
            TechType::Peaker => PEAKER_PENALTY_PER_GWH,
            _ => 0.0,
        }
    }

    pub fn smog_rate(&self) -> f64 {
        match *self {
            TechType::Coal => COAL_SMOG_RATE,
            TechType::Combined => COMBINED_SMOG_RATE,
            TechType::Peaker => PEAKER_SMOG_RATE,
            _ => 0.0,
        }
    }

    /// Label used in the settlement summary line items
    pub fn dispatch_label(&self) -> &'static str {
        match *self {
            TechType::Combined => "Combined Cycle",
            TechType::Peaker => "Peaker",
            TechType::Coal => "Coal",
            _ => "",
        }
    }

    pub fn info_text(&self) -> &'static str {
        match *self {
            TechType::Coal => texts::COAL_INFO,
            TechType::Combined => texts::COMBINED_INFO,
            TechType::Fission => texts::FISSION_INFO,
            TechType::Geothermal => texts::GEOTHERMAL_INFO,
            TechType::Hydro => texts::HYDRO_INFO,
            TechType::Peaker => texts::PEAKER_INFO,
            TechType::Solar => texts::SOLAR_INFO,
            TechType::Storage => texts::STORAGE_INFO,
            TechType::Tidal => texts::TIDAL_INFO,
            TechType::Wave => texts::WAVE_INFO,
            TechType::Wind => texts::WIND_INFO,
        }
    }
}
