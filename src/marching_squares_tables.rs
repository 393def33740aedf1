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

//! Lookup tables for marching squares.
//!
//! Corners are numbered bottom-left, bottom-right, top-right, top-left, and
//! bit `i` of a case index is set when corner `i` is inside the contour.

/// Offsets of the 4 square corners from the cell origin, as `[x, y]`.
pub const SQUARE_CORNERS: [[usize; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

/// The pair of corners joined by each square edge: bottom, right, top, left.
pub const SQUARE_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];

/// For each square configuration, the crossed edges taken in pairs, one pair
/// per line segment.
///
/// The saddle configurations `0101` and `1010` list both diagonal cuts rather
/// than choosing between them, so those cells always emit two segments.
pub static SQUARE_TABLE: [&[u8]; 16] = [
    &[],           // 0000
    &[0, 3],       // 0001
    &[1, 0],       // 0010
    &[1, 3],       // 0011
    &[2, 1],       // 0100
    &[0, 3, 2, 1], // 0101
    &[2, 0],       // 0110
    &[2, 3],       // 0111
    &[3, 2],       // 1000
    &[0, 2],       // 1001
    &[1, 0, 3, 2], // 1010
    &[1, 2],       // 1011
    &[3, 1],       // 1100
    &[0, 1],       // 1101
    &[3, 0],       // 1110
    &[],           // 1111
];
