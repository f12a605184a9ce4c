// Player-facing texts shown by the info, tutorial and key-binding overlays

pub const COAL_INFO: &str = "COAL PLANT (tokens/GW: 1)\n\n\
Burns coal to raise steam for a turbine. Changing steam flow quickly damages the plant, \
so output moves slowly.\n\n\
RULES: After the first round output may change by at most 1 GW per hour.\n\n\
SCORING: -1 point per GWh dispatched.";

pub const COMBINED_INFO: &str = "COMBINED CYCLE GAS PLANT (tokens/GW: 1)\n\n\
Pairs a gas turbine with a steam turbine. More efficient than a peaker, less flexible.\n\n\
RULES: After the first round output may change by at most 2 GW per hour.\n\n\
SCORING: -0.5 points per GWh dispatched.";

pub const FISSION_INFO: &str = "NUCLEAR FISSION PLANT (tokens/GW: 2)\n\n\
A thermal base load plant that holds one output level all day.\n\n\
RULES: Output is fixed in the first round and cannot change afterwards.";

pub const GEOTHERMAL_INFO: &str = "GEOTHERMAL PLANT (tokens/3 GW: 3)\n\n\
Spins a steam turbine with water heated underground. Drilling is risky.\n\n\
RULES: Potential capacity is bought in 3 token increments and realised by exploration \
dice rolls before play. After the first round output may change by at most 2 GW per hour.";

pub const HYDRO_INFO: &str = "HYDROPOWER PLANT (tokens/GW: 1)\n\n\
A dam filled by rain and snow melt. The reservoir must last the whole day.\n\n\
RULES: Limited reservoir sized by built capacity. Minimum discharge of 1 GW every round.";

pub const PEAKER_INFO: &str = "PEAKER GAS PLANT (tokens/GW: 2)\n\n\
Close to a jet engine. Output changes freely, but building and running it is expensive.\n\n\
RULES: No operational constraints.\n\n\
SCORING: -0.75 points per GWh dispatched.";

pub const SOLAR_INFO: &str = "SOLAR PHOTOVOLTAIC PLANT (tokens/GW: 1)\n\n\
Output follows the sun and cannot be controlled.\n\n\
RULES: The solar resource depends on time of day, cloud cover and smog.";

pub const STORAGE_INFO: &str = "ENERGY STORAGE SYSTEM (tokens/GW: 3)\n\n\
3 tokens buy 1 GWh of storage and 1 GW of demand response.\n\n\
RULES: Excess production charges the store, committed output discharges it. \
Load deferral moves demand to a later hour once per game.";

pub const TIDAL_INFO: &str = "TIDAL PLANT (tokens/GW: 1)\n\n\
Output follows the tides and cannot be controlled.\n\n\
RULES: The tidal resource is generated every round and sets the output.";

pub const WAVE_INFO: &str = "WAVE PLANT (tokens/GW: 1)\n\n\
Output follows the sea state and cannot be controlled.\n\n\
RULES: The wave resource is generated every round and sets the output.";

pub const WIND_INFO: &str = "WIND TURBINE (tokens/GW: 1)\n\n\
Output follows the wind and cannot be controlled.\n\n\
RULES: The wind resource is generated every round and sets the output.";

pub const TUTORIAL_PAGES: &[&str] = &[
    "TUTORIAL\n\nSet up power plants, then meet electricity demand in every hour of the game day \
while keeping emissions down. Press [T] for this tutorial and [B] for key bindings.",
    "There are six plant slots. Cycle through them with [A] and [D], and through plant \
types with [W] and [S]. Press [Spacebar] once one or more plants are chosen.",
    "Spend all capacity tokens on your plants with [W] and [S], then press [Spacebar] \
to start the first round.",
    "Each round, muster output with [W] and [S] and press [Spacebar] to dispatch it. \
Each GWh of met demand scores a point; unmet demand costs a point per GWh.",
    "Coal costs 1 point, Peaker 0.75 and Combined Cycle 0.5 per GWh dispatched. \
Emissions raise smog, which dims the solar resource.",
    "Excess production that cannot be stored costs 1 point per GWh. The game ends after \
24 rounds. [E] shows the energy history and [F] the forecast for the next hour.",
];

pub const KEY_BINDING_PAGES: &[&str] = &[
    "KEY BINDINGS\n\n[A] and [D]: cycle plant slots.\n[W] and [S]: cycle plant types, \
assign tokens, muster output.\n[Spacebar]: select, commit, skip.\n[T]: tutorial.\n\
[B]: key bindings.\n[I]: plant information.",
    "[E]: toggle energy overlay.\n[F]: toggle forecast overlay.\n[L]: defer load.\n\
[P]: quit and restart.\n[Escape]: exit game.",
];
