//! Escape time to colour.  Points inside the set are white; the rest
//! sweep through the hue wheel at a rate set by the colour density.

use crate::colour::{hsl_to_rgb, Rgb, WHITE};
use crate::escape::EscapeResult;

/// The default colour density: iterations per turn of the hue
/// wheel, before scaling by the exit magnitude.
pub const BASE_DENSITY: f64 = 800.0;

/// When the sweep drives colour, density is this times the current
/// multiplier.
pub const SWEEP_DENSITY_SCALE: f64 = 100.0;

/// Picks the colour density.  A fixed density unless `color_sweep`
/// is set, in which case it follows the sweep factor.  A sweep
/// factor of zero (or anything else that leaves no usable density)
/// falls back to the fixed one.
pub fn density(color_sweep: bool, sweep_factor: f64) -> f64 {
    if !color_sweep {
        return BASE_DENSITY;
    }
    let k = SWEEP_DENSITY_SCALE * sweep_factor;
    if k.is_finite() && k > 0.0 {
        k
    } else {
        BASE_DENSITY
    }
}

/// Maps an escape result to a colour.
#[inline]
pub fn colorize(result: EscapeResult, limit: usize, density: f64) -> Rgb {
    if !result.escaped(limit) {
        return WHITE;
    }
    hsl_to_rgb(result.iterations as f64 / density * result.norm_sqr, 1.0, 0.5)
}
