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

//! Splits a segmentation volume into one surface mesh per material label.

use crate::{
    grid::{LabelGrid, ScalarGrid3},
    marching_cubes::{MarchingCubes, SurfaceParams},
    mesh::Mesh,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// The label that marks empty space.
pub const BACKGROUND: u32 = 0;

/// The surface extracted for a single label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelMesh {
    pub label: u32,
    pub mesh: Mesh,
}

impl LabelGrid {
    /// Distinct non-background labels, in the order they first appear when
    /// scanning `[z][y][x]`.
    pub fn labels(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut labels = Vec::new();
        for &label in self.as_slice() {
            if label != BACKGROUND && seen.insert(label) {
                labels.push(label);
            }
        }
        labels
    }

    /// A binary occupancy volume of the same shape: 1.0 where the sample
    /// equals `label`, 0.0 elsewhere.
    pub fn mask(&self, label: u32) -> ScalarGrid3 {
        self.map(|&l| if l == label { 1.0 } else { 0.0 })
    }
}

/// Extracts an independent mesh for each label in a volume.
#[derive(Debug, Clone, Default)]
pub struct LabelDecomposer {
    marcher: MarchingCubes,
}

impl LabelDecomposer {
    pub fn new(params: SurfaceParams) -> Self {
        Self {
            marcher: MarchingCubes::new(params),
        }
    }

    /// March each label's mask in turn. Labels whose surface is empty (for
    /// example a label filling the whole volume) are left out.
    pub fn decompose(&self, grid: &LabelGrid) -> Vec<LabelMesh> {
        let labels = self.labels_of(grid);
        let total = labels.len();

        let meshes: Vec<_> = labels
            .into_iter()
            .filter_map(|label| {
                let mesh = self.marcher.extract(&grid.mask(label));
                debug!(
                    label,
                    vertices = mesh.vertex_count(),
                    triangles = mesh.triangle_count(),
                    "extracted label"
                );
                if mesh.is_empty() {
                    None
                } else {
                    Some(LabelMesh { label, mesh })
                }
            })
            .collect();

        info!(
            labels = total,
            meshes = meshes.len(),
            "decomposed label volume"
        );
        meshes
    }

    fn labels_of(&self, grid: &LabelGrid) -> Vec<u32> {
        let labels = grid.labels();
        debug!(count = labels.len(), shape = ?grid.shape(), "found labels");
        labels
    }
}

/// Extract one mesh per label, marching each binary mask at 0.5.
#[must_use]
pub fn decompose_labels(grid: &LabelGrid) -> Vec<LabelMesh> {
    LabelDecomposer::default().decompose(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_voxels(voxels: &[((usize, usize, usize), u32)]) -> LabelGrid {
        LabelGrid::from_fn(7, 3, 3, |x, y, z| {
            voxels
                .iter()
                .find(|(p, _)| *p == (x, y, z))
                .map_or(BACKGROUND, |&(_, l)| l)
        })
    }

    #[test]
    fn test_labels_in_first_occurrence_order() {
        let planes = vec![
            vec![vec![0, 7, 0], vec![2, 0, 7]],
            vec![vec![5, 2, 0], vec![0, 0, 9]],
        ];
        let grid = LabelGrid::from_planes(&planes).unwrap();
        assert_eq!(grid.labels(), vec![7, 2, 5, 9]);
    }

    #[test]
    fn test_masks_partition_the_labels() {
        let grid = LabelGrid::from_fn(4, 3, 2, |x, y, z| ((x * 7 + y * 3 + z) % 4) as u32);
        let masks: Vec<_> = grid.labels().iter().map(|&l| grid.mask(l)).collect();

        for (i, &label) in grid.as_slice().iter().enumerate() {
            let covering = masks.iter().filter(|m| m.as_slice()[i] == 1.0).count();
            if label == BACKGROUND {
                assert_eq!(covering, 0);
            } else {
                assert_eq!(covering, 1);
            }
        }
    }

    #[test]
    fn test_single_voxel_is_octahedron() {
        let grid = single_voxels(&[((1, 1, 1), 3)]);
        let meshes = decompose_labels(&grid);

        assert_eq!(meshes.len(), 1);
        let LabelMesh { label, mesh } = &meshes[0];
        assert_eq!(*label, 3);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_meshes_are_independent() {
        let grid = single_voxels(&[((5, 1, 1), 4), ((1, 1, 1), 8)]);
        let meshes = decompose_labels(&grid);

        let labels: Vec<_> = meshes.iter().map(|m| m.label).collect();
        assert_eq!(labels, vec![8, 4]);

        for LabelMesh { mesh, .. } in &meshes {
            assert_eq!(mesh.vertex_count(), 6);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < 6));
        }

        let (min, max) = meshes[1].mesh.bounds().unwrap();
        assert_eq!(min.x, 4.5);
        assert_eq!(max.x, 5.5);
    }

    #[test]
    fn test_labels_without_surface_are_dropped() {
        let full = LabelGrid::from_fn(3, 3, 3, |_, _, _| 6);
        assert_eq!(full.labels(), vec![6]);
        assert!(decompose_labels(&full).is_empty());

        let thin = LabelGrid::from_fn(3, 3, 1, |x, _, _| x as u32);
        assert!(decompose_labels(&thin).is_empty());

        let empty = LabelGrid::from_fn(3, 3, 3, |_, _, _| BACKGROUND);
        assert!(empty.labels().is_empty());
        assert!(decompose_labels(&empty).is_empty());
    }
}
