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

//! The per-cube steps of marching cubes.

use crate::{
    interpolate::interpolate,
    marching_cubes_tables::{EDGE_CONNECTION, EDGE_TABLE, TRIANGLE_CONNECTION},
    math::Vec3,
};

/// Build the cube index for a cell.
///
/// Bit `i` is set when corner `i` lies strictly below the iso-level, which is
/// the "inside" of a density or occupancy field.
pub fn classify_corners(values: &[f64; 8], iso_level: f64) -> usize {
    let mut cube_index = 0;
    for (i, &value) in values.iter().enumerate() {
        if value < iso_level {
            cube_index |= 1 << i;
        }
    }
    cube_index
}

/// Interpolate the crossing on each edge flagged for this cube index.
/// Edges the surface doesn't cross are left as `None`.
///
/// Each edge is interpolated from its lower corner towards its upper corner,
/// regardless of which way the cube numbers it. Neighbouring cells share the
/// edge with opposite numbering, and this keeps their crossings
/// bit-identical so the vertices weld.
pub fn find_edge_crossings(
    cube_index: usize,
    corners: &[Vec3; 8],
    values: &[f64; 8],
    iso_level: f64,
    crossings: &mut [Option<Vec3>; 12],
) {
    let edges = EDGE_TABLE[cube_index];
    for (edge, crossing) in crossings.iter_mut().enumerate() {
        *crossing = if edges & (1 << edge) != 0 {
            let [mut u, mut v] = EDGE_CONNECTION[edge];
            if corners[u] > corners[v] {
                std::mem::swap(&mut u, &mut v);
            }
            Some(interpolate(
                corners[u], corners[v], values[u], values[v], iso_level,
            ))
        } else {
            None
        };
    }
}

/// The triangle list for a cube index, if the table has one.
pub fn triangle_row(cube_index: usize) -> Option<&'static [i8; 16]> {
    TRIANGLE_CONNECTION.get(cube_index)
}

/// March a single cube, given its row of the triangle table.
///
/// The `triangle_func` will be invoked once for each triangle, with the
/// indices of the three edges on which its vertices fall.
pub fn march_cube<T>(row: &[i8; 16], mut triangle_func: T)
where
    T: FnMut(usize, usize, usize),
{
    for triangle in row.chunks_exact(3) {
        if triangle[0] < 0 {
            break;
        }

        triangle_func(
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
    }
}
