// Copyright 2018 Tristam MacDonald
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
    extractor::Extractor,
    grid::ScalarGrid3,
    marching_cubes_impl::{classify_corners, find_edge_crossings, march_cube, triangle_row},
    marching_cubes_tables::{CORNERS, EDGE_TABLE},
    math::Vec3,
    mesh::{Mesh, MeshBuilder},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parameters for surface extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceParams {
    /// Samples strictly below this value count as inside the surface.
    pub iso_level: f64,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self { iso_level: 0.5 }
    }
}

impl SurfaceParams {
    /// Extract at the given iso-level.
    #[must_use]
    pub fn at(iso_level: f64) -> Self {
        Self { iso_level }
    }
}

/// Counters gathered during a single extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractionStats {
    /// Cells examined.
    pub cells_visited: usize,
    /// Cells the surface passes through.
    pub active_cells: usize,
    /// Active cells dropped because no triangle row was available.
    pub skipped_cells: usize,
    /// Triangles emitted.
    pub triangles: usize,
    /// Distinct vertices emitted.
    pub vertices: usize,
}

/// Extracts triangle meshes from sampled volumes using the marching cubes
/// algorithm.
///
/// Sample `(x, y, z)` sits at grid-index coordinates `(x, y, z)`, so vertices
/// are expressed in voxel units. Vertices shared between neighbouring cells
/// are welded by exact position.
#[derive(Debug, Clone, Default)]
pub struct MarchingCubes {
    params: SurfaceParams,
}

impl MarchingCubes {
    pub fn new(params: SurfaceParams) -> MarchingCubes {
        MarchingCubes { params }
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Extract a mesh from the given volume.
    ///
    /// Volumes with fewer than two samples along any axis contain no cells,
    /// and produce an empty mesh.
    pub fn extract(&self, grid: &ScalarGrid3) -> Mesh {
        self.extract_with_stats(grid).0
    }

    /// Extract a mesh, along with counters describing the pass.
    pub fn extract_with_stats(&self, grid: &ScalarGrid3) -> (Mesh, ExtractionStats) {
        let mut mesh = Mesh::new();
        let stats = self.extract_into(grid, &mut mesh);
        (mesh, stats)
    }

    /// Extract the surface into an arbitrary [`Extractor`].
    ///
    /// Each distinct vertex is reported exactly once, before any index that
    /// refers to it. Indices arrive as triples, one per triangle.
    pub fn extract_into<E>(&self, grid: &ScalarGrid3, extractor: &mut E) -> ExtractionStats
    where
        E: Extractor,
    {
        let mut stats = ExtractionStats::default();
        let (width, height, depth) = (grid.width(), grid.height(), grid.depth());
        if width < 2 || height < 2 || depth < 2 {
            debug!(width, height, depth, "volume too small to contain cells");
            return stats;
        }

        let iso_level = self.params.iso_level;
        let mut builder = MeshBuilder::new(extractor);

        let mut corners = [Vec3::zero(); 8];
        let mut values = [0f64; 8];
        let mut crossings = [None; 12];

        for z in 0..depth - 1 {
            for y in 0..height - 1 {
                for x in 0..width - 1 {
                    stats.cells_visited += 1;

                    for i in 0..8 {
                        let [cx, cy, cz] = [x + CORNERS[i][0], y + CORNERS[i][1], z + CORNERS[i][2]];
                        corners[i] = Vec3::new(cx as f64, cy as f64, cz as f64);
                        values[i] = grid.get(cx, cy, cz);
                    }

                    let cube_index = classify_corners(&values, iso_level);
                    if EDGE_TABLE[cube_index] == 0 {
                        continue;
                    }
                    stats.active_cells += 1;

                    let row = match triangle_row(cube_index) {
                        Some(row) => row,
                        None => {
                            warn!(x, y, z, cube_index, "no triangle row for cube, skipping");
                            stats.skipped_cells += 1;
                            continue;
                        }
                    };

                    find_edge_crossings(cube_index, &corners, &values, iso_level, &mut crossings);

                    march_cube(row, |a, b, c| {
                        let (a, b, c) = match (crossings[a], crossings[b], crossings[c]) {
                            (Some(a), Some(b), Some(c)) => (a, b, c),
                            _ => return,
                        };
                        let a = builder.add_vertex(a);
                        let b = builder.add_vertex(b);
                        let c = builder.add_vertex(c);
                        builder.add_face(a, b, c);
                    });
                }
            }
        }

        stats.triangles = builder.triangle_count();
        stats.vertices = builder.vertex_count();
        debug!(
            cells = stats.cells_visited,
            active = stats.active_cells,
            skipped = stats.skipped_cells,
            vertices = stats.vertices,
            triangles = stats.triangles,
            "extracted isosurface"
        );
        stats
    }
}

/// Extract the surface of `grid` at `iso_level` with default settings.
#[must_use]
pub fn isosurface(grid: &ScalarGrid3, iso_level: f64) -> Mesh {
    MarchingCubes::new(SurfaceParams::at(iso_level)).extract(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extractor::IndexedVertices, index_cache::VertexKey, math::vec3};
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    /// Signed distance to a sphere, sampled on an `n^3` grid.
    fn sphere(n: usize, center: Vec3, radius: f64) -> ScalarGrid3 {
        ScalarGrid3::from_fn(n, n, n, |x, y, z| {
            (vec3(x as f64, y as f64, z as f64) - center).len() - radius
        })
    }

    fn check_well_formed(mesh: &Mesh) {
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
        for t in mesh.indices.chunks_exact(3) {
            assert!(!(t[0] == t[1] && t[1] == t[2]));
        }

        let keys: HashSet<_> = mesh.vertices.iter().map(|&v| VertexKey::new(v)).collect();
        assert_eq!(keys.len(), mesh.vertices.len());
    }

    #[test]
    fn test_uniform_volumes_are_empty() {
        let inside = ScalarGrid3::from_fn(4, 4, 4, |_, _, _| 0.0);
        let outside = ScalarGrid3::from_fn(4, 4, 4, |_, _, _| 1.0);

        for grid in &[inside, outside] {
            let (mesh, stats) = MarchingCubes::default().extract_with_stats(grid);
            assert!(mesh.is_empty());
            assert_eq!(stats.cells_visited, 27);
            assert_eq!(stats.active_cells, 0);
        }
    }

    #[test]
    fn test_too_small_is_empty() {
        let flat = ScalarGrid3::from_fn(3, 3, 1, |x, _, _| x as f64);
        let (mesh, stats) = MarchingCubes::default().extract_with_stats(&flat);
        assert!(mesh.is_empty());
        assert_eq!(stats.cells_visited, 0);
    }

    #[test]
    fn test_single_low_corner() {
        let grid = ScalarGrid3::from_fn(2, 2, 2, |x, y, z| {
            if (x, y, z) == (0, 0, 0) {
                0.0
            } else {
                1.0
            }
        });
        let mesh = isosurface(&grid, 0.5);

        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        let vertices: HashSet<_> = mesh.vertices.iter().map(|&v| VertexKey::new(v)).collect();
        for v in &[
            vec3(0.5, 0.0, 0.0),
            vec3(0.0, 0.5, 0.0),
            vec3(0.0, 0.0, 0.5),
        ] {
            assert!(vertices.contains(&VertexKey::new(*v)));
        }
    }

    #[test]
    fn test_value_at_level_counts_as_outside() {
        // a corner exactly at the level is not inside, so the cube is empty
        let grid = ScalarGrid3::from_fn(2, 2, 2, |_, _, _| 0.5);
        assert!(isosurface(&grid, 0.5).is_empty());
    }

    #[test]
    fn test_sphere_is_closed() {
        let center = vec3(7.3, 7.6, 7.45);
        let radius: f64 = 5.0;
        let grid = sphere(16, center, radius);

        let (mesh, stats) = MarchingCubes::new(SurfaceParams::at(0.0)).extract_with_stats(&grid);
        check_well_formed(&mesh);
        assert_eq!(stats.skipped_cells, 0);
        assert_eq!(stats.triangles, mesh.triangle_count());
        assert_eq!(stats.vertices, mesh.vertex_count());
        assert_eq!(mesh.euler_characteristic(), 2);

        for v in &mesh.vertices {
            assert!(((*v - center).len() - radius).abs() < 0.1);
        }

        let expected = 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3);
        assert_relative_eq!(mesh.volume(), expected, max_relative = 0.05);
        assert_relative_eq!(mesh.diameter(), 2.0 * radius * 3f64.sqrt(), max_relative = 0.05);
    }

    #[test]
    fn test_shared_vertices_are_welded() {
        // a slab crossing many cells: every interior vertex is shared by
        // four cells, and must only be emitted once
        let grid = ScalarGrid3::from_fn(5, 5, 5, |_, _, z| z as f64 / 4.0 + 0.01);
        let mesh = isosurface(&grid, 0.5);

        check_well_formed(&mesh);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        assert_eq!(mesh.euler_characteristic(), 1);
    }

    #[test]
    fn test_nan_samples_do_not_panic() {
        let grid = ScalarGrid3::from_fn(3, 3, 3, |x, y, z| {
            if (x, y, z) == (1, 1, 1) {
                f64::NAN
            } else {
                (x + y + z) as f64 / 6.0
            }
        });
        let mesh = isosurface(&grid, 0.5);
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_indexed_vertices_extractor() {
        let grid = sphere(8, vec3(3.5, 3.5, 3.5), 2.5);
        let mesh = isosurface(&grid, 0.0);

        let mut vertices = vec![];
        let mut indices = vec![];
        let stats = MarchingCubes::new(SurfaceParams::at(0.0))
            .extract_into(&grid, &mut IndexedVertices::new(&mut vertices, &mut indices));

        assert_eq!(vertices.len(), mesh.vertex_count() * 3);
        assert_eq!(indices, mesh.indices);
        assert_eq!(stats.triangles, mesh.triangle_count());
    }
}
