// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Splits the rows of an image into one contiguous band per worker.

use std::ops::Range;

/// The most workers a single render will ever use.
pub const MAX_WORKERS: usize = 20;

/// A half-open band of rows, `[start, end)`, owned by one worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowRange {
    /// First row of the band.
    pub start: usize,
    /// One past the last row of the band.
    pub end: usize,
}

impl RowRange {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// A band with no rows.  Happens when there are more workers than rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The band as a standard range.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Clamps a requested worker count into `[1, MAX_WORKERS]`.
pub fn clamp_workers(workers: usize) -> usize {
    num::clamp(workers, 1, MAX_WORKERS)
}

/// Every worker but the last gets `height / workers` rows; the last
/// one takes whatever is left over, so the bands always cover exactly
/// `[0, height)`.
pub fn partition(height: usize, workers: usize) -> Vec<RowRange> {
    let workers = clamp_workers(workers);
    let base = height / workers;
    let mut start = 0;
    (0..workers)
        .map(|k| {
            let end = if k == workers - 1 { height } else { start + base };
            let range = RowRange { start, end };
            start = end;
            range
        })
        .collect()
}
