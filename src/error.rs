// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error kinds shared by the renderer, the job pool and the movie
//! scheduler.

use failure::Fail;
use std::io;

/// Every failure the library can report.  Configuration errors are
/// raised before any work starts; the rest come out of a render call
/// or a frame job.
#[derive(Debug, Fail)]
pub enum MandelError {
    /// Invalid dimensions, scale, worker or job counts.
    #[fail(display = "invalid configuration: {}", _0)]
    Configuration(String),

    /// The platform refused to start another thread.
    #[fail(display = "could not launch {}: {}", what, cause)]
    ResourceExhaustion {
        /// What we were trying to start.
        what: String,
        /// The underlying spawn error.
        #[fail(cause)]
        cause: io::Error,
    },

    /// A worker died before finishing its rows.
    #[fail(display = "render failed: {}", _0)]
    RenderFailure(String),

    /// The encoder or the storage underneath it failed.
    #[fail(display = "could not write {}: {}", path, cause)]
    ArtifactWrite {
        /// The artifact we were writing.
        path: String,
        /// The encoder's error.
        #[fail(cause)]
        cause: image::ImageError,
    },
}

impl MandelError {
    /// Shorthand for a `Configuration` error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        MandelError::Configuration(msg.into())
    }

    /// Shorthand for a `RenderFailure`.
    pub fn render<S: Into<String>>(msg: S) -> Self {
        MandelError::RenderFailure(msg.into())
    }

    /// Shorthand for a `ResourceExhaustion` error.
    pub fn exhausted<S: Into<String>>(what: S, cause: io::Error) -> Self {
        MandelError::ResourceExhaustion {
            what: what.into(),
            cause,
        }
    }
}

/// The library's result type.
pub type Result<T> = std::result::Result<T, MandelError>;
