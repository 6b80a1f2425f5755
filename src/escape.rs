//! The escape-time iteration for the quadratic map z <- z^2 + c.

use num::Complex;

/// The escape radius, squared.  Magnitude 2 is the standard bound
/// for the quadratic map; past it, the orbit is guaranteed to go to
/// infinity.
pub const ESCAPE_NORM_SQR: f64 = 4.0;

/// How a single point fared under iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeResult {
    /// The squared magnitude of z when iteration stopped.
    pub norm_sqr: f64,
    /// The 0-based iteration at which escape was detected, or the
    /// iteration limit if the point never escaped.
    pub iterations: usize,
}

impl EscapeResult {
    /// Did this orbit leave the escape radius before `limit`?
    #[inline]
    pub fn escaped(&self, limit: usize) -> bool {
        self.iterations < limit
    }
}

/// This is our classic iterator function.  The real and imaginary
/// parts are tracked separately so that x^2, y^2, and xy are each
/// computed once per pass: the squares of the new z serve both the
/// escape test and the following step.  Pass `i` produces z(i+1), so
/// a point already outside the radius reports escape at index 0.
#[inline]
pub fn escape(c: Complex<f64>, limit: usize) -> EscapeResult {
    let (mut x, mut y) = (0.0_f64, 0.0_f64);
    let (mut xx, mut yy) = (0.0_f64, 0.0_f64);
    for i in 0..limit {
        let xy = x * y;
        x = xx - yy + c.re;
        y = 2.0 * xy + c.im;
        xx = x * x;
        yy = y * y;
        if xx + yy > ESCAPE_NORM_SQR {
            return EscapeResult {
                norm_sqr: xx + yy,
                iterations: i,
            };
        }
    }
    EscapeResult {
        norm_sqr: xx + yy,
        iterations: limit,
    }
}
