#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer and zoom-movie generator
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit `z -> z * z + c` stays bounded.  Each pixel of
//! an image is mapped onto a point, the orbit is iterated until it
//! leaves the bailout radius or an iteration cap is reached, and the
//! resulting escape count is turned into a colour.
//!
//! Two layers of concurrency are involved.  Inside one image, the
//! rows are split into contiguous bands and each band is filled by
//! its own scoped thread (see `renderer`).  Across a movie, every
//! frame is an independent job, and a `JobPool` caps how many of them
//! run at the same time (see `movie`).

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod colors;
pub mod config;
pub mod error;
pub mod escape;
pub mod movie;
pub mod output;
pub mod partition;
pub mod planes;
pub mod pool;
pub mod renderer;

pub use config::{MovieConfig, RenderConfig};
pub use error::{MandelError, Result};
pub use movie::{FrameScheduler, MovieReport, RenderJob};
pub use planes::Viewport;
pub use pool::JobPool;
pub use renderer::{render, PixelBuffer};
