// Session Constants
pub const HOURS_PER_DAY: u32 = 24;
pub const SLOT_COUNT: usize = 6;
pub const FRAMES_PER_SECOND: f64 = 60.0;

// Capacity Tokens
pub const TOTAL_TOKENS: u32 = 36;
pub const GW_PER_TOKEN: u32 = 1;
pub const FISSION_TOKENS_PER_GW: u32 = 2;
pub const PEAKER_TOKENS_PER_GW: u32 = 2;
pub const STORAGE_TOKENS_PER_GW: u32 = 3;
pub const STORAGE_GW_PER_INCREMENT: u32 = 1;
pub const GEOTHERMAL_GW_PER_ROLL: u32 = 3;           // 3 tokens buy one exploration cycle
pub const FISSION_MAX_CAPACITY: u32 = 999;           // pricing enforces the real limit
pub const PEAKER_MAX_CAPACITY: u32 = 999;

// Ramp Limits (GW per round, after the first round)
pub const COAL_RAMP_LIMIT: u32 = 1;
pub const COMBINED_RAMP_LIMIT: u32 = 2;
pub const GEOTHERMAL_RAMP_LIMIT: u32 = 2;

// Scoring
pub const COAL_PENALTY_PER_GWH: f64 = 1.0;
pub const COMBINED_PENALTY_PER_GWH: f64 = 0.5;
pub const PEAKER_PENALTY_PER_GWH: f64 = 0.75;
pub const EXCESS_PENALTY_PER_GWH: f64 = 1.0;

// Smog contribution per GWh dispatched
pub const COAL_SMOG_RATE: f64 = 0.001;
pub const COMBINED_SMOG_RATE: f64 = 0.0005;
pub const PEAKER_SMOG_RATE: f64 = 0.00075;

// Demand
pub const BASE_DEMAND_TABLE: [u32; 23] = [
    13, 13, 13, 15, 16, 18,
    19, 20, 20, 20, 19, 18,
    18, 18, 19, 21, 22, 21,
    20, 18, 17, 15, 14,
];
pub const DEMAND_JITTER_SPAN: f64 = 4.0;             // jitter = int(4U) - 2
pub const DEMAND_JITTER_OFFSET: i32 = 2;
pub const MIN_DEFERRAL_GW: u32 = 1;

// Hydro reservoir size (GWh) by built capacity (GW)
pub const HYDRO_STORAGE_TABLE: [u32; 18] = [
    16, 29, 40, 49, 56, 63, 70, 77, 84,
    91, 98, 104, 110, 116, 122, 128, 134, 140,
];
pub const HYDRO_MIN_DISCHARGE: u32 = 1;

// Resource Generators
pub const MARKOV_STEP_BOUND: f64 = 0.5;
pub const WAVE_STEP_BOUND: f64 = 0.1;
pub const MIN_WAVE_PERIOD: f64 = 5.75;
pub const MAX_WAVE_PERIOD: f64 = 15.0;
pub const TIDAL_JITTER: f64 = 0.05;                  // +/- 5% per read
pub const TIDAL_TABLE: [f64; 23] = [
    0.125, 0.279, 0.265, 0.106, 0.076, 0.221,
    0.645, 0.918, 1.0, 0.913, 0.744, 0.487,
    0.104, 0.323, 0.621, 0.670, 0.621, 0.483,
    0.157, 0.181, 0.497, 0.609, 0.565,
];

// Solar day profile (hours)
pub const DAWN_HOUR: f64 = 5.5;
pub const DUSK_HOUR: f64 = 17.5;
pub const SOLAR_PLATEAU_START: f64 = 10.0;
pub const SOLAR_PLATEAU_END: f64 = 14.0;

// Production Curves
pub const WIND_DESIGN_SPEED: f64 = 0.47;
pub const WIND_CUT_IN: f64 = -0.76;
pub const WIND_CUT_OUT: f64 = 0.68;
pub const TIDAL_DESIGN_SPEED: f64 = 0.47;
pub const TIDAL_CUT_IN: f64 = -0.71;
pub const TIDAL_CUT_OUT: f64 = 0.65;
pub const WAVE_DESIGN_PERIOD: f64 = 8.5;
pub const WAVE_RAYLEIGH_SIGMA: f64 = 0.028;
pub const WAVE_BREAKING_RATIO: f64 = 0.2184;         // deep-water breaking limit on H/T^2
pub const WAVE_BROKEN_RATIO: f64 = 0.2;

// Forecast
pub const FORECAST_TRIALS: usize = 1024;

// Inter-round Transition
pub const TRANSITION_HOURS_PER_SECOND: f64 = 0.3;
pub const WEATHER_STEP_PER_FRAME: f64 = 0.005;
pub const SETTLE_TOLERANCE: f64 = 1e-6;

// Geothermal Exploration
pub const DIE_FACES: u8 = 6;
pub const ROLLS_PER_CYCLE: usize = 3;
