// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps an escape count onto a pixel colour.

use image::Rgb;

/// The colour of points that never escaped.
pub const IN_SET: Rgb<u8> = Rgb([0, 0, 0]);

/// Escaped points get a grey ramp that brightens with the escape
/// count.  The square root lifts the slow-escaping fringe so that deep
/// iteration caps don't leave the image almost black.  Points that hit
/// the cap are painted `IN_SET`.
pub fn color_of(iterations: u32, max_iterations: u32) -> Rgb<u8> {
    if iterations >= max_iterations {
        return IN_SET;
    }
    let t = f64::from(iterations) / f64::from(max_iterations);
    let v = (255.0 * t.sqrt()).round() as u8;
    Rgb([v, v, v])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_the_darkest_value() {
        assert_eq!(color_of(0, 1000), Rgb([0, 0, 0]));
    }

    #[test]
    fn capped_points_are_in_the_set() {
        assert_eq!(color_of(1000, 1000), IN_SET);
        assert_eq!(color_of(0, 0), IN_SET);
    }

    #[test]
    fn ramp_is_monotonic_below_the_cap() {
        let max = 500;
        let mut last = 0;
        for i in 0..max {
            let Rgb([v, _, _]) = color_of(i, max);
            assert!(v >= last, "{} dropped below {} at {}", v, last, i);
            last = v;
        }
        assert!(last > 250);
    }
}
