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

//! Locating threshold crossings along grid edges.

use std::ops::{Add, Mul, Sub};

/// Edges whose end values differ by no more than this are treated as flat.
pub const DEGENERATE_EPSILON: f64 = 1e-6;

/// Calculate the fractional position of the threshold crossing along an
/// edge, given the field value at either end.
///
/// Returns `None` when the two values are (nearly) equal, as the crossing is
/// then undefined. The offset is not clamped to `[0, 1]`: on an edge whose
/// end values straddle the threshold it lies in range by construction.
pub fn crossing_offset(value_a: f64, value_b: f64, threshold: f64) -> Option<f64> {
    let delta = value_b - value_a;
    if delta.abs() <= DEGENERATE_EPSILON {
        None
    } else {
        Some((threshold - value_a) / delta)
    }
}

/// Find the point between `a` and `b` where the linearly interpolated field
/// equals `threshold`.
///
/// Flat edges resolve to `a` unchanged.
pub fn interpolate<T>(a: T, b: T, value_a: f64, value_b: f64, threshold: f64) -> T
where
    T: Copy + Add<T, Output = T> + Sub<T, Output = T> + Mul<f64, Output = T>,
{
    match crossing_offset(value_a, value_b, threshold) {
        Some(t) => a + (b - a) * t,
        None => a,
    }
}
