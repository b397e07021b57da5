// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The process-wide settings for a single render and for a movie.
//! Both are built once at start-up and never change afterwards.

use crate::error::{MandelError, Result};
use crate::partition::clamp_workers;
use crate::planes::Viewport;
use crate::pool::DEFAULT_JOBS;
use num::Complex;
use std::path::PathBuf;

/// Settings for one still image.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// The point at the middle of the image.
    pub center: Complex<f64>,
    /// Span of the real axis covered by the image.
    pub scale: f64,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration cap per point.
    pub max_iterations: u32,
    /// Worker threads; clamped to `[1, MAX_WORKERS]`.
    pub threads: usize,
    /// Where the image goes.  The extension picks the format.
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            center: Complex::new(0.0, 0.0),
            scale: 4.0,
            width: 1000,
            height: 1000,
            max_iterations: 1000,
            threads: 1,
            output: PathBuf::from("mandel.jpg"),
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MandelError::configuration(format!(
            "image dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    if width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(MandelError::configuration(format!(
            "image dimensions are too large: {}x{}",
            width, height
        )));
    }
    Ok(())
}

impl RenderConfig {
    /// Checks the settings and clamps the thread count.
    pub fn validate(mut self) -> Result<Self> {
        check_dimensions(self.width, self.height)?;
        self.viewport()?;
        self.threads = clamp_workers(self.threads);
        Ok(self)
    }

    /// The region of the complex plane this image covers.
    pub fn viewport(&self) -> Result<Viewport> {
        Viewport::from_center(self.center, self.scale, self.width, self.height)
    }
}

/// Settings for a zoom movie.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieConfig {
    /// The point the movie zooms into.
    pub center: Complex<f64>,
    /// Span of the real axis in frame 0.
    pub initial_scale: f64,
    /// Number of frames.
    pub frames: usize,
    /// Fraction of the initial scale removed per frame.
    pub zoom: f64,
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Iteration cap per point.
    pub max_iterations: u32,
    /// Worker threads inside each frame.
    pub threads: usize,
    /// How many frames may render at once.
    pub max_jobs: usize,
    /// Directory the frames are written to.
    pub output_dir: PathBuf,
    /// Image extension, which picks the encoder.
    pub extension: String,
}

impl Default for MovieConfig {
    fn default() -> Self {
        MovieConfig {
            center: Complex::new(0.0, 0.0),
            initial_scale: 4.0,
            frames: 50,
            zoom: 0.02,
            width: 1000,
            height: 1000,
            max_iterations: 1000,
            threads: 1,
            max_jobs: DEFAULT_JOBS,
            output_dir: PathBuf::from("."),
            extension: "jpg".to_string(),
        }
    }
}

impl MovieConfig {
    /// The real-axis span of frame `index`.
    pub fn frame_scale(&self, index: usize) -> f64 {
        self.initial_scale * (1.0 - (index as f64) * self.zoom)
    }

    /// Rejects any movie whose scale would reach zero or go negative
    /// before the last frame, along with the usual dimension checks.
    /// Thread and job counts are clamped.
    pub fn validate(mut self) -> Result<Self> {
        check_dimensions(self.width, self.height)?;
        if self.frames == 0 {
            return Err(MandelError::configuration("a movie needs at least one frame"));
        }
        if !self.zoom.is_finite() {
            return Err(MandelError::configuration(format!(
                "zoom factor must be a finite number, got {}",
                self.zoom
            )));
        }
        if !(self.initial_scale.is_finite() && self.initial_scale > 0.0) {
            return Err(MandelError::configuration(format!(
                "initial scale must be a positive number, got {}",
                self.initial_scale
            )));
        }
        // The scale is linear in the index, so checking both ends covers
        // every frame in between.
        let last = self.frame_scale(self.frames - 1);
        if !(last.is_finite() && last > 0.0) {
            return Err(MandelError::configuration(format!(
                "zoom {} over {} frames drives the scale to {}; it must stay positive",
                self.zoom, self.frames, last
            )));
        }
        let bad_char = |c: char| c == '/' || c == '\\' || c == '.';
        if self.extension.is_empty() || self.extension.contains(bad_char) {
            return Err(MandelError::configuration(format!(
                "invalid image extension {:?}",
                self.extension
            )));
        }
        self.threads = clamp_workers(self.threads);
        self.max_jobs = num::clamp(self.max_jobs, 1, crate::pool::max_jobs());
        Ok(self)
    }
}
