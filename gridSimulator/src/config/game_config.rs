use std::fs::File;
use std::io::Read;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::config::constants::*;

#[derive(Debug)]
pub enum ConfigLoadError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    InvalidValue(String),
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(err: std::io::Error) -> Self {
        ConfigLoadError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(err: serde_json::Error) -> Self {
        ConfigLoadError::ParseError(err)
    }
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigLoadError::ParseError(e) => write!(f, "JSON error: {}", e),
            ConfigLoadError::InvalidValue(s) => write!(f, "Invalid config value: {}", s),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub total_tokens: u32,
    pub forecast_trials: usize,
    pub frames_per_second: f64,
    pub transition_hours_per_second: f64,
    pub weather_step_per_frame: f64,
    pub skip_menu: bool,            // start straight at technology selection
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_tokens: TOTAL_TOKENS,
            forecast_trials: FORECAST_TRIALS,
            frames_per_second: FRAMES_PER_SECOND,
            transition_hours_per_second: TRANSITION_HOURS_PER_SECOND,
            weather_step_per_frame: WEATHER_STEP_PER_FRAME,
            skip_menu: false,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let mut contents = String::new();
        File::open(path.as_ref())?.read_to_string(&mut contents)?;
        let config: GameConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.total_tokens == 0 {
            return Err(ConfigLoadError::InvalidValue("total_tokens must be positive".to_string()));
        }
        if self.forecast_trials == 0 {
            return Err(ConfigLoadError::InvalidValue("forecast_trials must be positive".to_string()));
        }
        if self.frames_per_second <= 0.0 || self.transition_hours_per_second <= 0.0 {
            return Err(ConfigLoadError::InvalidValue("transition rates must be positive".to_string()));
        }
        if self.weather_step_per_frame <= 0.0 {
            return Err(ConfigLoadError::InvalidValue("weather_step_per_frame must be positive".to_string()));
        }
        Ok(())
    }

    /// Simulated hours advanced per transition frame
    pub fn hours_per_frame(&self) -> f64 {
        self.transition_hours_per_second / self.frames_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "forecast_trials": 64 }"#).unwrap();
        assert_eq!(config.forecast_trials, 64);
        assert_eq!(config.total_tokens, TOTAL_TOKENS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_tokens_is_rejected() {
        let config = GameConfig { total_tokens: 0, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigLoadError::InvalidValue(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigLoadError::IoError(_)));
    }

    #[test]
    fn default_transition_takes_two_hundred_frames_per_hour() {
        let frames = (1.0 / GameConfig::default().hours_per_frame()).round();
        assert_eq!(frames, 200.0);
    }
}
