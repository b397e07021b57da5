// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The multithreaded renderer.  One image is computed by a small pool
//! of scoped worker threads, each owning a band of rows.  The buffer
//! is split into disjoint mutable slices before the workers start, so
//! the only synchronisation is the final join.

use crate::colors::color_of;
use crate::error::{MandelError, Result};
use crate::escape::iterations;
use crate::partition::{partition, RowRange};
use crate::planes::{Pixel, Viewport};
use image::{Rgb, RgbImage};
use itertools::iproduct;
use std::io;
use tracing::debug;

/// A finished image, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb<u8>>,
}

impl PixelBuffer {
    fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![Rgb([0, 0, 0]); width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The colour at `column`, `row`.  Panics outside the image.
    pub fn get(&self, column: usize, row: usize) -> Rgb<u8> {
        assert!(
            column < self.width && row < self.height,
            "pixel ({}, {}) is outside a {}x{} image",
            column,
            row,
            self.width,
            self.height
        );
        self.pixels[row * self.width + column]
    }

    /// One row of the image.
    pub fn row(&self, row: usize) -> &[Rgb<u8>] {
        &self.pixels[row * self.width..(row + 1) * self.width]
    }

    /// Every pixel, row-major.
    pub fn pixels(&self) -> &[Rgb<u8>] {
        &self.pixels
    }

    /// Converts the buffer into an `image` crate buffer for encoding.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            self.get(x as usize, y as usize)
        })
    }
}

/// Fills `band`, which holds exactly the pixels of `rows`.
fn render_rows(
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iterations: u32,
    rows: RowRange,
    band: &mut [Rgb<u8>],
) {
    debug_assert_eq!(band.len(), rows.len() * width);
    for ((row, column), pixel) in iproduct!(rows.rows(), 0..width).zip(band.iter_mut()) {
        let point = viewport.pixel_to_point(Pixel(column, row), width, height);
        *pixel = color_of(iterations(point.re, point.im, max_iterations), max_iterations);
    }
}

/// Renders `viewport` into a `width` x `height` buffer using
/// `workers` threads (clamped to `[1, MAX_WORKERS]`).
///
/// The call returns only after every launched worker has been joined.
/// If a worker cannot be launched no further workers are started and
/// the call fails with `ResourceExhaustion` once the launched ones
/// have finished; a worker that panics fails the call with
/// `RenderFailure`.  A partially computed buffer is never returned.
#[tracing::instrument(level = "debug", skip(viewport))]
pub fn render(
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iterations: u32,
    workers: usize,
) -> Result<PixelBuffer> {
    render_with(
        viewport,
        width,
        height,
        max_iterations,
        workers,
        |_: usize| Ok(()),
        &|_: usize| (),
    )
}

/// `render`, with two hooks around each worker: `launch(k)` runs just
/// before worker `k` is spawned and can refuse it the way the platform
/// would, and `done(k)` runs on the worker once its rows are filled.
pub(crate) fn render_with<L, D>(
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iterations: u32,
    workers: usize,
    mut launch: L,
    done: &D,
) -> Result<PixelBuffer>
where
    L: FnMut(usize) -> io::Result<()>,
    D: Fn(usize) + Sync,
{
    if width == 0 || height == 0 {
        return Err(MandelError::configuration(format!(
            "image must not be empty, got {}x{}",
            width, height
        )));
    }
    if width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(MandelError::configuration(format!(
            "image is too large: {}x{}",
            width, height
        )));
    }

    let ranges = partition(height, workers);
    let mut buffer = PixelBuffer::new(width, height);
    let mut launch_error = None;

    {
        // One disjoint slice of the buffer per band of rows.
        let mut bands = Vec::with_capacity(ranges.len());
        let mut rest: &mut [Rgb<u8>] = &mut buffer.pixels;
        for &range in &ranges {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width);
            rest = tail;
            bands.push((range, band));
        }

        let joined = crossbeam::scope(|spawner| {
            for (k, (range, band)) in bands.into_iter().enumerate() {
                let launched = launch(k).and_then(|()| {
                    spawner
                        .builder()
                        .name(format!("mandel-worker-{}", k))
                        .spawn(move |_| {
                            debug!(worker = k, start = range.start, end = range.end, "rendering rows");
                            render_rows(viewport, width, height, max_iterations, range, band);
                            done(k);
                        })
                        .map(drop)
                });
                if let Err(cause) = launched {
                    launch_error = Some(MandelError::exhausted(format!("render worker {}", k), cause));
                    break;
                }
            }
        });
        if joined.is_err() && launch_error.is_none() {
            return Err(MandelError::render("a render worker panicked"));
        }
    }

    match launch_error {
        Some(e) => Err(e),
        None => Ok(buffer),
    }
}
