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

//! Algorithms for extracting contours and isosurfaces from sampled grids.
//!
//! 2D scalar grids are contoured into polylines with marching squares, and
//! 3D scalar grids are meshed with marching cubes. On top of those sit a
//! decomposer that meshes every material of a label volume separately, and
//! a rasterizer that outlines the screen-space silhouette of a projected
//! surface.
//!
//! ```
//! use isocontour::{contour, ScalarGrid2};
//!
//! let grid = ScalarGrid2::from_rows(&[vec![0.0, 0.0], vec![0.0, 1.0]]).unwrap();
//! let outlines = contour(&grid, 0.5);
//! assert_eq!(outlines.len(), 1);
//! assert!(!outlines[0].closed);
//! ```

/// Common math types
pub mod math;

/// Dense sample grids.
pub mod grid;

pub mod error;

/// Utilities for outputting mesh data in specific formats.
pub mod extractor;

/// Linear interpolation of threshold crossings along cell edges.
pub mod interpolate;

/// Polylines, and stitching of unordered segments into them.
pub mod outline;

pub mod mesh;

mod index_cache;
mod labels;
mod marching_cubes;
mod marching_cubes_impl;
mod marching_cubes_tables;
mod marching_squares;
mod marching_squares_tables;
mod projection;

pub use self::{
    error::{GridError, GridResult},
    grid::{Grid2, Grid3, LabelGrid, ScalarGrid2, ScalarGrid3},
    labels::*,
    marching_cubes::*,
    marching_squares::*,
    mesh::Mesh,
    outline::{Outline, Segment},
    projection::*,
};
