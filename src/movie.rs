// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The zoom movie.  Each frame is an independent render-and-encode job;
//! the scheduler works out every frame's viewport up front and hands
//! the jobs to a `JobPool`, which keeps at most `max_jobs` of them
//! running.  A failed frame is reported but never stops its siblings.

use crate::config::MovieConfig;
use crate::error::{MandelError, Result};
use crate::output::{frame_name, write_image};
use crate::planes::Viewport;
use crate::pool::{JobFailure, JobPool};
use crate::renderer::render;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Everything needed to produce one frame.  Built once, never changed.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderJob {
    /// Position of the frame in the movie.
    pub index: usize,
    /// Real-axis span of this frame.
    pub scale: f64,
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// The region rendered.
    pub viewport: Viewport,
    /// Iteration cap per point.
    pub max_iterations: u32,
    /// Render worker threads.
    pub threads: usize,
    /// Where the frame is written.
    pub output: PathBuf,
}

impl RenderJob {
    /// Renders the frame and writes it out.
    pub fn run(&self) -> Result<()> {
        let pixels = render(
            &self.viewport,
            self.width,
            self.height,
            self.max_iterations,
            self.threads,
        )?;
        write_image(&self.output, &pixels)
    }
}

/// How a movie went.
#[derive(Debug, Default)]
pub struct MovieReport {
    /// Frames the movie was asked for.
    pub frames: usize,
    /// Frames rendered and written.
    pub written: usize,
    /// Frames that failed, with their errors.
    pub failures: Vec<JobFailure>,
}

impl MovieReport {
    /// True when every frame was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.written == self.frames
    }
}

/// Plans and runs a zoom movie.
#[derive(Debug)]
pub struct FrameScheduler {
    config: MovieConfig,
}

impl FrameScheduler {
    /// Validates `config`; nothing is rendered if it is rejected.
    pub fn new(config: MovieConfig) -> Result<Self> {
        Ok(FrameScheduler {
            config: config.validate()?,
        })
    }

    /// The settings, after validation and clamping.
    pub fn config(&self) -> &MovieConfig {
        &self.config
    }

    /// The real-axis span of every frame, in frame order.
    pub fn frame_scales(&self) -> Vec<f64> {
        (0..self.config.frames)
            .map(|i| self.config.frame_scale(i))
            .collect()
    }

    /// One job per frame, in frame order.  The file name depends only
    /// on the frame's index.
    pub fn frame_jobs(&self) -> Result<Vec<RenderJob>> {
        let c = &self.config;
        self.frame_scales()
            .into_iter()
            .enumerate()
            .map(|(index, scale)| {
                Ok(RenderJob {
                    index,
                    scale,
                    width: c.width,
                    height: c.height,
                    viewport: Viewport::from_center(c.center, scale, c.width, c.height)?,
                    max_iterations: c.max_iterations,
                    threads: c.threads,
                    output: c.output_dir.join(frame_name(index, &c.extension)),
                })
            })
            .collect()
    }

    /// Renders every frame, at most `max_jobs` at a time, and waits for
    /// all of them.  Frame failures end up in the report.  An `Err` is
    /// returned only when the movie could not be started or a job
    /// thread could not be launched; in the latter case no further
    /// frames are submitted and the running ones are waited for.
    pub fn run(&self) -> Result<MovieReport> {
        self.run_in(&mut JobPool::new(self.config.max_jobs))
    }

    pub(crate) fn run_in(&self, pool: &mut JobPool) -> Result<MovieReport> {
        let c = &self.config;
        let jobs = self.frame_jobs()?;
        fs::create_dir_all(&c.output_dir).map_err(|e| MandelError::ArtifactWrite {
            path: c.output_dir.display().to_string(),
            cause: image::ImageError::IoError(e),
        })?;

        info!(
            frames = c.frames,
            max_jobs = c.max_jobs,
            "generating {} frames using up to {} jobs",
            c.frames,
            c.max_jobs
        );

        let mut launch_error = None;
        for job in jobs {
            let name = frame_name(job.index, &c.extension);
            let submitted = pool.submit(&name, move || {
                info!(frame = job.index, scale = job.scale, "generating {}", job.output.display());
                job.run()
            });
            if let Err(e) = submitted {
                launch_error = Some(e);
                break;
            }
        }

        let outcome = pool.wait_all();
        for failure in &outcome.failures {
            error!("frame {} failed: {}", failure.name, failure.error);
        }
        if let Some(e) = launch_error {
            return Err(e);
        }

        let report = MovieReport {
            frames: c.frames,
            written: outcome.completed,
            failures: outcome.failures,
        };
        if report.is_success() {
            info!("All frames generated successfully.");
        } else {
            warn!(
                "{} of {} frames failed",
                report.failures.len(),
                report.frames
            );
        }
        Ok(report)
    }
}
