// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration at the heart of every pixel.

use num::Complex;

/// Squared magnitude past which an orbit is known to diverge.
pub const BAILOUT: f64 = 4.0;

/// This is our classic iterator function.  It starts the orbit at the
/// point itself and returns the number of iterations completed before
/// the orbit left the bailout radius, or `max_iterations` if it never
/// did.  A point that starts outside the radius returns zero.
#[inline]
pub fn iterations(x0: f64, y0: f64, max_iterations: u32) -> u32 {
    let c = Complex::new(x0, y0);
    let mut z = c;
    let mut i = 0;
    while i < max_iterations && z.norm_sqr() <= BAILOUT {
        z = z * z + c;
        i += 1;
    }
    i
}
