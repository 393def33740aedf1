// Copyright 2021 Tristam MacDonald
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::{
    grid::ScalarGrid2,
    interpolate::interpolate,
    marching_squares_tables::{SQUARE_CORNERS, SQUARE_EDGES, SQUARE_TABLE},
    math::{vec2, Vec2},
    outline::{stitch_segments, Outline, Segment},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for 2D contouring.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContourParams {
    /// Samples greater than or equal to this value are inside the contour.
    pub threshold: f64,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl ContourParams {
    /// Contour at the given threshold.
    #[must_use]
    pub fn at(threshold: f64) -> Self {
        Self { threshold }
    }
}

/// Extracts contour lines from 2D scalar grids using the marching squares
/// algorithm.
#[derive(Debug, Clone, Default)]
pub struct MarchingSquares {
    params: ContourParams,
}

impl MarchingSquares {
    /// Create a new MarchingSquares with the given parameters.
    pub fn new(params: ContourParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ContourParams {
        &self.params
    }

    /// Emit the raw line segments crossing each cell of the grid, in cell
    /// order, with no attempt to connect them.
    ///
    /// Points are in grid-index space: `x` is the column and `y` the row.
    /// Grids with fewer than 2 samples along either axis produce nothing.
    pub fn segments(&self, grid: &ScalarGrid2) -> Vec<Segment> {
        let threshold = self.params.threshold;
        let mut segments = vec![];

        if grid.width() < 2 || grid.height() < 2 {
            return segments;
        }

        let mut corners = [Vec2::zero(); 4];
        let mut values = [0f64; 4];

        for y in 0..grid.height() - 1 {
            for x in 0..grid.width() - 1 {
                let mut square_index = 0;
                for i in 0..4 {
                    let [dx, dy] = SQUARE_CORNERS[i];
                    corners[i] = vec2((x + dx) as f64, (y + dy) as f64);
                    values[i] = grid.get(x + dx, y + dy);
                    // NaN fails the comparison, so it counts as outside
                    if values[i] >= threshold {
                        square_index |= 1 << i;
                    }
                }

                let crossing = |edge: u8| {
                    let [u, v] = SQUARE_EDGES[edge as usize];
                    interpolate(corners[u], corners[v], values[u], values[v], threshold)
                };

                for pair in SQUARE_TABLE[square_index].chunks_exact(2) {
                    segments.push(Segment::new(crossing(pair[0]), crossing(pair[1])));
                }
            }
        }

        debug!(
            width = grid.width(),
            height = grid.height(),
            segments = segments.len(),
            "marching squares"
        );

        segments
    }

    /// Extract the contour of the grid as a set of connected outlines.
    pub fn extract(&self, grid: &ScalarGrid2) -> Vec<Outline> {
        let outlines = stitch_segments(&self.segments(grid));

        debug!(
            outlines = outlines.len(),
            closed = outlines.iter().filter(|o| o.closed).count(),
            "stitched contour"
        );

        outlines
    }
}

/// Contour `grid` at `threshold`.
#[must_use]
pub fn contour(grid: &ScalarGrid2, threshold: f64) -> Vec<Outline> {
    MarchingSquares::new(ContourParams::at(threshold)).extract(grid)
}
