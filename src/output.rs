// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hands finished buffers to the `image` crate's encoders.

use crate::error::{MandelError, Result};
use crate::renderer::PixelBuffer;
use image::ColorType;
use std::path::Path;

/// The file name of frame `index`: `frame_<index, two digits>.<extension>`.
pub fn frame_name(index: usize, extension: &str) -> String {
    format!("frame_{:02}.{}", index, extension)
}

/// Encodes `pixels` to `path`; the format is picked from the extension.
pub fn write_image(path: &Path, pixels: &PixelBuffer) -> Result<()> {
    let img = pixels.to_image();
    image::save_buffer(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        ColorType::Rgb8,
    )
    .map_err(|cause| MandelError::ArtifactWrite {
        path: path.display().to_string(),
        cause,
    })
}
