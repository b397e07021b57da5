// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a rectangle on the
//! complex plane and maps the pixels of an integral plane with an
//! origin at 0,0 onto it.
use crate::error::{MandelError, Result};
use num::Complex;

/// Describes the x, y of a pixel in the integral plane: column, row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane an image covers.  Once built it
/// is never mutated; every frame of a movie gets its own.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge (real axis).
    pub xmin: f64,
    /// Right edge (real axis).
    pub xmax: f64,
    /// Bottom edge (imaginary axis).
    pub ymin: f64,
    /// Top edge (imaginary axis).
    pub ymax: f64,
}

impl Viewport {
    /// Constructor.  The edges must be finite and the rectangle must
    /// have a positive width and height.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Viewport> {
        if ![xmin, xmax, ymin, ymax].iter().all(|v| v.is_finite()) {
            return Err(MandelError::configuration(
                "viewport edges must be finite numbers",
            ));
        }
        if xmax <= xmin {
            return Err(MandelError::configuration(format!(
                "xmax ({}) is not to the right of xmin ({})",
                xmax, xmin
            )));
        }
        if ymax <= ymin {
            return Err(MandelError::configuration(format!(
                "ymax ({}) is not above ymin ({})",
                ymax, ymin
            )));
        }
        Ok(Viewport {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Builds the viewport centred on `center` whose real axis spans
    /// `scale`.  The imaginary span follows the image's aspect ratio so
    /// pixels stay square.
    pub fn from_center(center: Complex<f64>, scale: f64, width: usize, height: usize) -> Result<Viewport> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(MandelError::configuration(format!(
                "scale must be a positive number, got {}",
                scale
            )));
        }
        if width == 0 || height == 0 {
            return Err(MandelError::configuration(format!(
                "image must not be empty, got {}x{}",
                width, height
            )));
        }
        let yscale = scale / (width as f64) * (height as f64);
        Viewport::new(
            center.re - scale / 2.0,
            center.re + scale / 2.0,
            center.im - yscale / 2.0,
            center.im + yscale / 2.0,
        )
    }

    /// Width of the rectangle along the real axis.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the rectangle along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Given a pixel of a `width` x `height` image, return the point on
    /// the complex plane its upper-left corner maps to.
    pub fn pixel_to_point(&self, pixel: Pixel, width: usize, height: usize) -> Complex<f64> {
        Complex::new(
            self.xmin + (pixel.0 as f64) * self.width() / (width as f64),
            self.ymin + (pixel.1 as f64) * self.height() / (height as f64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_fails_on_bad_shape() {
        assert!(Viewport::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Viewport::new(-1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, std::f64::NAN, -1.0, 1.0).is_err());
    }

    #[test]
    fn viewport_passes_on_good_shape() {
        assert!(Viewport::new(-1.0, 1.0, -1.0, 1.0).is_ok());
    }

    #[test]
    fn from_center_follows_aspect_ratio() {
        let vp = Viewport::from_center(Complex::new(0.0, 0.0), 4.0, 1000, 500).unwrap();
        assert_eq!(vp, Viewport::new(-2.0, 2.0, -1.0, 1.0).unwrap());
    }

    #[test]
    fn from_center_rejects_non_positive_scale() {
        assert!(Viewport::from_center(Complex::new(0.0, 0.0), 0.0, 10, 10).is_err());
        assert!(Viewport::from_center(Complex::new(0.0, 0.0), -0.5, 10, 10).is_err());
        assert!(Viewport::from_center(Complex::new(0.0, 0.0), 1.0, 0, 10).is_err());
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let vp = Viewport::new(0.0, 5.0, 0.0, 5.0).unwrap();
        assert_eq!(vp.pixel_to_point(Pixel(0, 0), 5, 5), Complex::new(0.0, 0.0));
        assert_eq!(vp.pixel_to_point(Pixel(2, 2), 5, 5), Complex::new(2.0, 2.0));
        assert_eq!(vp.pixel_to_point(Pixel(4, 4), 5, 5), Complex::new(4.0, 4.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let vp = Viewport::new(-2.0, 2.0, -2.0, 2.0).unwrap();
        assert_eq!(vp.pixel_to_point(Pixel(2, 2), 4, 4), Complex::new(0.0, 0.0));
        assert_eq!(vp.pixel_to_point(Pixel(0, 0), 4, 4), Complex::new(-2.0, -2.0));
        assert_eq!(vp.pixel_to_point(Pixel(1, 3), 4, 4), Complex::new(-1.0, 1.0));
    }
}
