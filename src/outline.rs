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

//! Reassembling independently generated line segments into polylines.

use crate::math::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Endpoints closer than this along both axes are considered the same point.
pub const STITCH_TOLERANCE: f64 = 1e-6;

/// A single line segment, as emitted by one grid cell.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

/// A connected polyline. When `closed` is set, the last point connects back
/// to the first, and the first point is not repeated at the end.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outline {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Outline {
    /// Number of points in the outline
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total length of the polyline, including the closing edge of a closed
    /// outline.
    pub fn perimeter(&self) -> f64 {
        let open: f64 = self
            .points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).len())
            .sum();

        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) => open + (first - last).len(),
            _ => open,
        }
    }

    /// Signed area enclosed by a closed outline (positive when wound
    /// counter-clockwise in a y-up frame). Open outlines enclose nothing.
    pub fn signed_area(&self) -> f64 {
        if !self.closed || self.points.len() < 3 {
            return 0.0;
        }

        let n = self.points.len();
        let twice_area: f64 = (0..n)
            .map(|i| self.points[i].perp_dot(self.points[(i + 1) % n]))
            .sum();
        0.5 * twice_area
    }

    /// Create a new outline by applying `f` to every point.
    pub fn map_points<F>(&self, f: F) -> Outline
    where
        F: Fn(Vec2) -> Vec2,
    {
        Outline {
            points: self.points.iter().map(|&p| f(p)).collect(),
            closed: self.closed,
        }
    }
}

fn same_point(a: Vec2, b: Vec2) -> bool {
    a.approx_eq(b, STITCH_TOLERANCE)
}

/// Link segments that share endpoints into maximal polylines.
///
/// Each outline is grown from the first unused segment by repeatedly sweeping
/// the remaining segments and attaching any that touch either end, until a
/// sweep attaches nothing. Every segment ends up in exactly one outline.
///
/// This is quadratic in the number of segments per connected component,
/// which is fine for the grid sizes contoured here, but would need a spatial
/// index for much larger inputs.
#[must_use]
pub fn stitch_segments(segments: &[Segment]) -> Vec<Outline> {
    let mut used = vec![false; segments.len()];
    let mut outlines = vec![];

    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;

        let mut points = VecDeque::new();
        points.push_back(segments[seed].start);
        points.push_back(segments[seed].end);

        let mut changed = true;
        while changed {
            changed = false;

            for (j, segment) in segments.iter().enumerate() {
                if used[j] {
                    continue;
                }

                let first = points[0];
                let last = points[points.len() - 1];

                if same_point(last, segment.start) {
                    points.push_back(segment.end);
                } else if same_point(last, segment.end) {
                    points.push_back(segment.start);
                } else if same_point(first, segment.end) {
                    points.push_front(segment.start);
                } else if same_point(first, segment.start) {
                    points.push_front(segment.end);
                } else {
                    continue;
                }

                used[j] = true;
                changed = true;
            }
        }

        let mut points: Vec<Vec2> = points.into_iter().collect();
        let closed = points.len() > 1 && same_point(points[0], points[points.len() - 1]);
        if closed {
            points.pop();
        }

        outlines.push(Outline { points, closed });
    }

    outlines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;

    fn square(offset: f64) -> Vec<Segment> {
        let a = vec2(offset, 0.0);
        let b = vec2(offset + 1.0, 0.0);
        let c = vec2(offset + 1.0, 1.0);
        let d = vec2(offset, 1.0);
        vec![
            Segment::new(a, b),
            Segment::new(c, d),
            Segment::new(b, c),
            Segment::new(a, d),
        ]
    }

    #[test]
    fn test_empty() {
        assert!(stitch_segments(&[]).is_empty());
    }

    #[test]
    fn test_closed_loop_out_of_order() {
        let outlines = stitch_segments(&square(0.0));
        assert_eq!(outlines.len(), 1);
        assert!(outlines[0].closed);
        assert_eq!(outlines[0].len(), 4);
        approx::assert_relative_eq!(outlines[0].perimeter(), 4.0);
        approx::assert_relative_eq!(outlines[0].signed_area().abs(), 1.0);
    }

    #[test]
    fn test_open_chain_grows_both_ends() {
        let segments = vec![
            Segment::new(vec2(1.0, 0.0), vec2(2.0, 0.0)),
            Segment::new(vec2(3.0, 0.0), vec2(2.0, 0.0)),
            Segment::new(vec2(0.0, 0.0), vec2(1.0, 0.0)),
        ];
        let outlines = stitch_segments(&segments);
        assert_eq!(outlines.len(), 1);
        assert!(!outlines[0].closed);
        assert_eq!(
            outlines[0].points,
            vec![
                vec2(0.0, 0.0),
                vec2(1.0, 0.0),
                vec2(2.0, 0.0),
                vec2(3.0, 0.0)
            ]
        );
        approx::assert_relative_eq!(outlines[0].perimeter(), 3.0);
        assert_eq!(outlines[0].signed_area(), 0.0);
    }

    #[test]
    fn test_separate_components_stay_separate() {
        let mut segments = square(0.0);
        segments.extend(square(5.0));
        let outlines = stitch_segments(&segments);
        assert_eq!(outlines.len(), 2);
        assert!(outlines.iter().all(|o| o.closed && o.len() == 4));
        // outlines follow seed order
        assert!(outlines[0].points.iter().all(|p| p.x <= 1.0));
        assert!(outlines[1].points.iter().all(|p| p.x >= 5.0));
    }

    #[test]
    fn test_closure_within_tolerance() {
        let segments = vec![
            Segment::new(vec2(0.0, 0.0), vec2(1.0, 0.0)),
            Segment::new(vec2(1.0, 0.0), vec2(0.5, 1.0)),
            Segment::new(vec2(0.5, 1.0), vec2(5e-7, -5e-7)),
        ];
        let outlines = stitch_segments(&segments);
        assert_eq!(outlines.len(), 1);
        assert!(outlines[0].closed);
        assert_eq!(outlines[0].len(), 3);
    }

    #[test]
    fn test_single_segment_is_open() {
        let outlines = stitch_segments(&[Segment::new(vec2(0.0, 0.0), vec2(1.0, 1.0))]);
        assert_eq!(outlines.len(), 1);
        assert!(!outlines[0].closed);
        assert_eq!(outlines[0].len(), 2);
    }

    #[test]
    fn test_map_points() {
        let outline = stitch_segments(&square(0.0)).remove(0);
        let scaled = outline.map_points(|p| p * 2.0);
        assert!(scaled.closed);
        approx::assert_relative_eq!(scaled.perimeter(), 8.0);
    }
}
