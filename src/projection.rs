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

//! Screen-space silhouettes of projected surfaces.
//!
//! Projected vertices are splatted into a small occupancy grid covering
//! their bounding box, small gaps are closed, and the grid is contoured.
//! This tolerates sparse or unevenly distributed vertices, at the cost of
//! resolution.

use crate::{
    grid::ScalarGrid2,
    marching_squares::{ContourParams, MarchingSquares},
    math::{vec2, Mat4, Vec2, Vec3},
    outline::Outline,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coverage of each cell of a rasterized projection: 1.0 or 0.0.
pub type OccupancyGrid = ScalarGrid2;

/// Size of the render target in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Map normalized device coordinates to pixels, with the origin at the
    /// top left.
    pub fn to_pixels(&self, ndc: Vec3) -> Vec2 {
        vec2(
            (ndc.x * 0.5 + 0.5) * self.width,
            (-ndc.y * 0.5 + 0.5) * self.height,
        )
    }
}

/// Parameters for silhouette extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionParams {
    /// Cells along each side of the occupancy grid.
    pub resolution: usize,
    /// Margin added around the projected bounds, in pixels.
    pub padding: f64,
    /// Occupied neighbours needed to fill an empty cell while closing gaps.
    pub closing_neighbors: usize,
    /// Contour level of the occupancy grid.
    pub threshold: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            resolution: 64,
            padding: 5.0,
            closing_neighbors: 3,
            threshold: 0.5,
        }
    }
}

impl ProjectionParams {
    /// Default parameters at a different grid resolution.
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }
}

/// Vertices projected to pixel space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    pub points: Vec<Vec2>,
    /// `(min, max)` of `points`, or `None` when there are none.
    pub bounds: Option<(Vec2, Vec2)>,
}

/// Projects surfaces through a camera and outlines their silhouette.
#[derive(Debug, Clone, Default)]
pub struct ProjectionRasterizer {
    params: ProjectionParams,
}

impl ProjectionRasterizer {
    pub fn new(params: ProjectionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ProjectionParams {
        &self.params
    }

    /// Transform each vertex by `camera` (a combined model-view-projection
    /// matrix) and map it into the viewport.
    pub fn project(&self, vertices: &[Vec3], camera: &Mat4, viewport: Viewport) -> Projection {
        let points: Vec<Vec2> = vertices
            .iter()
            .map(|&v| viewport.to_pixels(camera.project_point(v)))
            .collect();

        let bounds = if points.is_empty() {
            None
        } else {
            let init = (
                vec2(f64::INFINITY, f64::INFINITY),
                vec2(f64::NEG_INFINITY, f64::NEG_INFINITY),
            );
            Some(
                points
                    .iter()
                    .fold(init, |(min, max), &p| (min.min(p), max.max(p))),
            )
        };

        Projection { points, bounds }
    }

    /// Size of one grid cell in pixels, per axis.
    fn cell_size(&self, (min, max): (Vec2, Vec2)) -> Vec2 {
        let padding = self.params.padding;
        (max - min + 2.0 * padding) / self.params.resolution as f64
    }

    /// Splat the projected points into a `resolution x resolution` grid
    /// spanning the padded bounds, then run a single closing pass.
    pub fn rasterize(&self, projection: &Projection) -> OccupancyGrid {
        let resolution = self.params.resolution;
        let mut cells = vec![0.0; resolution * resolution];

        if let Some(bounds) = projection.bounds {
            let (min, _) = bounds;
            let scale = self.cell_size(bounds);
            let padding = self.params.padding;
            let in_range = |c: f64| c >= 0.0 && c < resolution as f64;

            for p in &projection.points {
                let cx = ((p.x - min.x + padding) / scale.x).floor();
                let cy = ((p.y - min.y + padding) / scale.y).floor();
                if in_range(cx) && in_range(cy) {
                    cells[cy as usize * resolution + cx as usize] = 1.0;
                }
            }
        }

        let filled = close_gaps(&mut cells, resolution, self.params.closing_neighbors);
        debug!(resolution, filled, "rasterized projection");

        OccupancyGrid::from_fn(resolution, resolution, |x, y| cells[y * resolution + x])
    }

    /// Outline the silhouette of `vertices` as seen through `camera`, in
    /// pixel coordinates.
    pub fn outline(&self, vertices: &[Vec3], camera: &Mat4, viewport: Viewport) -> Vec<Outline> {
        let projection = self.project(vertices, camera, viewport);
        let bounds = match projection.bounds {
            Some(bounds) => bounds,
            None => return Vec::new(),
        };

        let grid = self.rasterize(&projection);
        let outlines = MarchingSquares::new(ContourParams::at(self.params.threshold)).extract(&grid);

        let (min, _) = bounds;
        let scale = self.cell_size(bounds);
        let origin = min - self.params.padding;

        debug!(
            vertices = vertices.len(),
            outlines = outlines.len(),
            "outlined projection"
        );
        outlines
            .iter()
            .map(|outline| {
                outline.map_points(|p| vec2(origin.x + p.x * scale.x, origin.y + p.y * scale.y))
            })
            .collect()
    }
}

/// Fill empty interior cells with at least `threshold` of their eight
/// neighbours occupied. Cells are updated in place in row-major order, so a
/// cell filled earlier in the pass counts towards later ones. Returns the
/// number of cells filled.
fn close_gaps(cells: &mut [f64], resolution: usize, threshold: usize) -> usize {
    let mut filled = 0;
    for y in 1..resolution.saturating_sub(1) {
        for x in 1..resolution - 1 {
            if cells[y * resolution + x] != 0.0 {
                continue;
            }

            let mut neighbors = 0.0;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if (nx, ny) != (x, y) {
                        neighbors += cells[ny * resolution + nx];
                    }
                }
            }

            if neighbors >= threshold as f64 {
                cells[y * resolution + x] = 1.0;
                filled += 1;
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extractor::OnlyVertices, marching_cubes::MarchingCubes, math::vec3, ScalarGrid3};
    use approx::assert_relative_eq;
    use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

    fn camera(eye: [f64; 3]) -> Mat4 {
        let projection = perspective(Deg(60.0), 1.0, 0.1, 100.0);
        let view = Matrix4::look_at(
            Point3::new(eye[0], eye[1], eye[2]),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let m: [[f64; 4]; 4] = (projection * view).into();
        Mat4::from(m)
    }

    /// A dense grid of points covering the square `[-1, 1]^2` at z = 0.
    fn square(n: usize) -> Vec<Vec3> {
        let step = 2.0 / (n - 1) as f64;
        let mut points = Vec::with_capacity(n * n);
        for j in 0..n {
            for i in 0..n {
                points.push(vec3(-1.0 + i as f64 * step, -1.0 + j as f64 * step, 0.0));
            }
        }
        points
    }

    #[test]
    fn test_viewport_mapping_flips_y() {
        let rasterizer = ProjectionRasterizer::default();
        let vertices = [
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(-1.0, -1.0, 0.5),
        ];
        let projection = rasterizer.project(&vertices, &Mat4::identity(), Viewport::new(100.0, 50.0));

        assert_eq!(
            projection.points,
            vec![vec2(50.0, 25.0), vec2(100.0, 0.0), vec2(0.0, 50.0)]
        );
        assert_eq!(
            projection.bounds,
            Some((vec2(0.0, 0.0), vec2(100.0, 50.0)))
        );
    }

    #[test]
    fn test_empty_input() {
        let rasterizer = ProjectionRasterizer::default();
        let projection = rasterizer.project(&[], &Mat4::identity(), Viewport::new(10.0, 10.0));
        assert_eq!(projection.bounds, None);
        assert!(rasterizer
            .outline(&[], &Mat4::identity(), Viewport::new(10.0, 10.0))
            .is_empty());

        let grid = rasterizer.rasterize(&projection);
        assert_eq!(grid.width(), 64);
        assert!(grid.as_slice().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_closing_sees_cells_filled_earlier_in_the_pass() {
        let rasterizer = ProjectionRasterizer::new(ProjectionParams {
            resolution: 4,
            padding: 0.0,
            ..ProjectionParams::default()
        });
        let projection = Projection {
            points: vec![vec2(0.5, 0.5), vec2(1.5, 0.5), vec2(2.5, 0.5)],
            bounds: Some((vec2(0.0, 0.0), vec2(4.0, 4.0))),
        };
        let grid = rasterizer.rasterize(&projection);

        let rows: Vec<Vec<f64>> = (0..4)
            .map(|y| (0..4).map(|x| grid.get(x, y)).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec![1.0, 1.0, 1.0, 0.0],
                // (0, 1) has three occupied neighbours, but lies on the border
                vec![0.0, 1.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
            ]
        );
    }

    #[test]
    fn test_points_on_max_bound_fall_outside_without_padding() {
        let rasterizer = ProjectionRasterizer::new(ProjectionParams {
            resolution: 4,
            padding: 0.0,
            closing_neighbors: 9,
            ..ProjectionParams::default()
        });
        let projection = Projection {
            points: vec![vec2(0.0, 0.0), vec2(4.0, 4.0)],
            bounds: Some((vec2(0.0, 0.0), vec2(4.0, 4.0))),
        };
        let grid = rasterizer.rasterize(&projection);
        assert_eq!(grid.get(0, 0), 1.0);
        assert_eq!(grid.as_slice().iter().filter(|&&c| c == 1.0).count(), 1);
    }

    #[test]
    fn test_square_silhouette() {
        let rasterizer = ProjectionRasterizer::default();
        let viewport = Viewport::new(400.0, 400.0);
        let camera = camera([0.0, 0.0, 5.0]);
        let vertices = square(200);

        let projection = rasterizer.project(&vertices, &camera, viewport);
        let (min, max) = projection.bounds.unwrap();
        let outlines = rasterizer.outline(&vertices, &camera, viewport);

        assert_eq!(outlines.len(), 1);
        let outline = &outlines[0];
        assert!(outline.closed);

        let padding = rasterizer.params().padding;
        for p in &outline.points {
            assert!(p.x >= min.x - padding && p.x <= max.x + padding);
            assert!(p.y >= min.y - padding && p.y <= max.y + padding);
        }

        let size = max - min;
        assert_relative_eq!(
            outline.signed_area().abs(),
            size.x * size.y,
            max_relative = 0.1
        );
    }

    #[test]
    fn test_scattered_points_still_outline_inside_bounds() {
        let rasterizer = ProjectionRasterizer::default();
        let viewport = Viewport::new(200.0, 150.0);
        let camera = camera([3.0, 2.0, 4.0]);
        let cube: Vec<Vec3> = (0..8)
            .map(|i| {
                vec3(
                    if i & 1 == 0 { -1.0 } else { 1.0 },
                    if i & 2 == 0 { -1.0 } else { 1.0 },
                    if i & 4 == 0 { -1.0 } else { 1.0 },
                )
            })
            .collect();

        let (min, max) = rasterizer
            .project(&cube, &camera, viewport)
            .bounds
            .unwrap();
        let outlines = rasterizer.outline(&cube, &camera, viewport);

        assert!(!outlines.is_empty());
        let padding = rasterizer.params().padding;
        for outline in &outlines {
            assert!(outline.closed);
            for p in &outline.points {
                assert!(p.x >= min.x - padding && p.x <= max.x + padding);
                assert!(p.y >= min.y - padding && p.y <= max.y + padding);
            }
        }
    }

    #[test]
    fn test_outline_of_extracted_surface() {
        let grid = ScalarGrid3::from_fn(16, 16, 16, |x, y, z| {
            (vec3(x as f64, y as f64, z as f64) - vec3(7.5, 7.5, 7.5)).len() - 5.0
        });
        let mut vertices = vec![];
        MarchingCubes::new(crate::SurfaceParams::at(0.0))
            .extract_into(&grid, &mut OnlyVertices::new(&mut vertices));
        assert!(!vertices.is_empty());

        // orthographic view mapping the volume onto [-1, 1]
        let mut camera = Mat4::identity();
        for i in 0..3 {
            camera.0[i][i] = 1.0 / 7.5;
            camera.0[3][i] = -1.0;
        }

        let rasterizer = ProjectionRasterizer::new(ProjectionParams::with_resolution(16));
        let viewport = Viewport::new(128.0, 128.0);
        let (min, max) = rasterizer
            .project(&vertices, &camera, viewport)
            .bounds
            .unwrap();
        let outlines = rasterizer.outline(&vertices, &camera, viewport);

        assert!(!outlines.is_empty());
        let padding = rasterizer.params().padding;
        for p in outlines.iter().flat_map(|o| o.points.iter()) {
            assert!(p.x >= min.x - padding && p.x <= max.x + padding);
            assert!(p.y >= min.y - padding && p.y <= max.y + padding);
        }
    }
}
