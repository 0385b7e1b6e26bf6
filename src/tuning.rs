/// Tuning parameters for the flight model and the launch loop.
/// Centralizes the constants that shape ascent, coast, descent and rewards.

// ==========================================
// Rocket Body
// ==========================================

/// Weight of an empty hull, added to the cargo weight
pub const HULL_WEIGHT: f64 = 20.0;

/// Fuel units burned per second, during preburn and ascent
pub const FUEL_BURN_RATE: f64 = 25.0;

/// A rocket is stable when preburn seconds × this factor covers its cargo weight
pub const STABILITY_FACTOR: f64 = 100.0;

// ==========================================
// Flight Profile
// ==========================================

/// Lerp parameter advance per second while the engine is burning
pub const ASCENT_RAMP_RATE: f64 = 0.5;

/// Lerp parameter advance per second while coasting after burnout
pub const COAST_RAMP_RATE: f64 = 1.0;

/// Altitude above which a burned-out rocket is in orbit
pub const ORBIT_ALTITUDE: f64 = 1000.0;

/// Lowest altitude a falling rocket can reach
pub const DESCENT_FLOOR: f64 = -1.0;

/// Upper bound (degrees, exclusive) of the per-tick tumble while falling
pub const TUMBLE_MAX_DEGREES: f64 = 2.0;

/// Upward lift applied when weight overwhelms thrust during ascent
pub const MIN_ASCENT_LIFT: f64 = 1.0;

/// Step used by the preburn increase/decrease controls
pub const PREBURN_STEP: f64 = 0.1;

/// Cargo order sizes for plain, shift and ctrl clicks
pub const SINGLE_ORDER: u32 = 1;
pub const SHIFT_ORDER: u32 = 10;
pub const CONTROL_ORDER: u32 = 100;

// ==========================================
// Altitude Bands
// ==========================================
// Bands are keyed on the lower bound (exclusive) in altitude units.
// Drag thins out with altitude so weight matters less higher up;
// gravity is the mirror image, strongest near the ground.

/// Drag divisor applied to weight while climbing.
pub fn drag_divisor(height: f64) -> f64 {
    if height > 800.0 {
        5.0
    } else if height > 600.0 {
        4.0
    } else if height > 400.0 {
        3.0
    } else if height > 200.0 {
        2.0
    } else {
        1.0
    }
}

/// Gravity factor applied to weight while falling.
pub fn gravity_factor(height: f64) -> f64 {
    if height > 800.0 {
        1.0
    } else if height > 600.0 {
        2.0
    } else if height > 400.0 {
        3.0
    } else if height > 200.0 {
        4.0
    } else {
        5.0
    }
}

/// Linear interpolation with `t` clamped to [0, 1].
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

// ==========================================
// Rewards
// ==========================================

/// Base reward divisor: every peak pays height / 2
pub const HEIGHT_REWARD_DIVISOR: f64 = 2.0;

/// Orbit bonus divisor: reaching orbit pays an extra height / 3
pub const ORBIT_BONUS_DIVISOR: f64 = 3.0;

/// Base reward for a peak height (never negative)
pub fn height_reward(height: f64) -> i64 {
    (height / HEIGHT_REWARD_DIVISOR).floor().max(0.0) as i64
}

/// Orbit bonus for a peak height (never negative)
pub fn orbit_bonus(height: f64) -> i64 {
    (height / ORBIT_BONUS_DIVISOR).floor().max(0.0) as i64
}
