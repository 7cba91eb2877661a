//! Constants of the event-display physics model
//!
//! These are visualization constants, not measured values. Distances are in
//! detector units (the muon spectrometer sits at radius 12), energies in GeV.

/// Solenoid field strength driving transverse curvature of charged tracks
pub const MAGNETIC_FIELD: f32 = 3.8;

/// Lower bound of the randomized base speed (units per second)
pub const BASE_SPEED_MIN: f32 = 8.0;

/// Upper bound (exclusive) of the randomized base speed
pub const BASE_SPEED_MAX: f32 = 12.0;

/// Speed multiplier applied to massless particles
pub const MASSLESS_SPEED_BOOST: f32 = 1.5;

/// Mass offset used when approximating momentum as `speed * (mass + offset)`
pub const MOMENTUM_MASS_OFFSET: f32 = 0.1;

/// Curvature multiplier for `helix_tight` tracks (electrons, pions)
pub const HELIX_TIGHT_FACTOR: f32 = 3.0;

/// Curvature multiplier for `helix_wide` tracks (muons, kaons)
pub const HELIX_WIDE_FACTOR: f32 = 0.8;

/// Transverse radius beyond which jets start depositing energy (calorimeter)
pub const JET_ABSORPTION_RADIUS: f32 = 5.0;

/// Per-tick retention factor for absorbed jets (speed and energy)
pub const JET_RETENTION: f32 = 0.95;

// Lifetime budgets (seconds of simulation time)

/// Beam particles live for a fixed budget
pub const BEAM_MAX_AGE: f32 = 8.0;

/// Stable particles live until they leave the detector, capped here
pub const STABLE_MAX_AGE: f32 = 30.0;

/// Short-lived resonances (`short`/`flash` tracks)
pub const SHORT_MAX_AGE_MIN: f32 = 0.3;
pub const SHORT_MAX_AGE_SPAN: f32 = 0.3;

/// Hadron jets
pub const JET_MAX_AGE_MIN: f32 = 2.0;
pub const JET_MAX_AGE_SPAN: f32 = 1.0;

/// Everything else
pub const DEFAULT_MAX_AGE_MIN: f32 = 5.0;
pub const DEFAULT_MAX_AGE_SPAN: f32 = 10.0;
