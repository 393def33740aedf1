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

use crate::error::{GridError, GridResult};

/// A dense, rectangular 2D array of samples, indexed `[row][col]`, i.e.
/// `(y, x)`.
///
/// Samples are stored row-major in a single buffer, so a grid is rectangular
/// by construction. Fallible constructors reject ragged input.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// A dense, rectangular 3D array of samples, indexed `[z][y][x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3<T> {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<T>,
}

/// Number of samples in a grid of the given `[x, y, z]` extent, or an error
/// if it does not fit in a `usize`.
fn sample_count(dimensions: [usize; 3]) -> GridResult<usize> {
    let [width, height, depth] = dimensions;
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(depth))
        .ok_or(GridError::SizeOverflow { dimensions })
}

/// Scalar field sampled on a 2D grid.
pub type ScalarGrid2 = Grid2<f64>;

/// Scalar field sampled on a 3D grid.
pub type ScalarGrid3 = Grid3<f64>;

/// Volume of material labels, where 0 denotes background.
pub type LabelGrid = Grid3<u32>;

impl<T: Copy> Grid2<T> {
    /// Wrap a row-major buffer of `width * height` samples.
    pub fn new(width: usize, height: usize, data: Vec<T>) -> GridResult<Self> {
        let expected = sample_count([width, height, 1])?;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(x, y)` at every sample.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a grid from nested rows, rejecting rows of unequal length.
    pub fn from_rows<R>(rows: &[R]) -> GridResult<Self>
    where
        R: AsRef<[T]>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());

        let mut data = Vec::with_capacity(sample_count([width, height, 1])?);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    axis: "row",
                    index,
                    expected: width,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The sample at column `x`, row `y`.
    ///
    /// Panics if the coordinate lies outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// The underlying row-major samples.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Copy> Grid3<T> {
    /// Wrap a `[z][y][x]`-ordered buffer of `width * height * depth` samples.
    pub fn new(width: usize, height: usize, depth: usize, data: Vec<T>) -> GridResult<Self> {
        let expected = sample_count([width, height, depth])?;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            data,
        })
    }

    /// Build a grid by evaluating `f(x, y, z)` at every sample.
    pub fn from_fn<F>(width: usize, height: usize, depth: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(width * height * depth);
        for z in 0..depth {
            for y in 0..height {
                for x in 0..width {
                    data.push(f(x, y, z));
                }
            }
        }
        Self {
            width,
            height,
            depth,
            data,
        }
    }

    /// Build a grid from nested `[z][y][x]` planes, rejecting ragged planes
    /// or rows.
    pub fn from_planes(planes: &[Vec<Vec<T>>]) -> GridResult<Self> {
        let depth = planes.len();
        let first = planes.first();
        let height = first.map_or(0, |plane| plane.len());
        let width = first
            .and_then(|plane| plane.first())
            .map_or(0, |row| row.len());

        let mut data = Vec::with_capacity(sample_count([width, height, depth])?);
        for (z, plane) in planes.iter().enumerate() {
            if plane.len() != height {
                return Err(GridError::Ragged {
                    axis: "plane",
                    index: z,
                    expected: height,
                    found: plane.len(),
                });
            }
            for (y, row) in plane.iter().enumerate() {
                if row.len() != width {
                    return Err(GridError::Ragged {
                        axis: "row",
                        index: z * height + y,
                        expected: width,
                        found: row.len(),
                    });
                }
                data.extend_from_slice(row);
            }
        }

        Ok(Self {
            width,
            height,
            depth,
            data,
        })
    }

    /// Gather a grid out of a strided buffer, as produced by chunked volume
    /// stores. `shape` and `strides` are both given in `[z, y, x]` order, with
    /// strides counted in elements.
    pub fn from_strided(data: &[T], shape: [usize; 3], strides: [usize; 3]) -> GridResult<Self> {
        let [depth, height, width] = shape;
        if depth == 0 || height == 0 || width == 0 {
            return Ok(Self {
                width,
                height,
                depth,
                data: Vec::new(),
            });
        }

        // zero strides can map a huge shape onto a short buffer
        sample_count([width, height, depth])?;

        let overflow = GridError::SizeOverflow {
            dimensions: [width, height, depth],
        };
        let last = [(depth - 1, strides[0]), (height - 1, strides[1]), (width - 1, strides[2])]
            .iter()
            .try_fold(0usize, |offset, &(index, stride)| {
                index
                    .checked_mul(stride)
                    .and_then(|step| offset.checked_add(step))
            })
            .ok_or(overflow)?;
        if last >= data.len() {
            return Err(GridError::StrideOutOfBounds {
                offset: last,
                len: data.len(),
            });
        }

        Ok(Self::from_fn(width, height, depth, |x, y, z| {
            data[z * strides[0] + y * strides[1] + x * strides[2]]
        }))
    }

    /// Extent along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Extent along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Extent along z.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `[depth, height, width]`, matching the `[z][y][x]` indexing order.
    pub fn shape(&self) -> [usize; 3] {
        [self.depth, self.height, self.width]
    }

    /// The sample at `(x, y, z)`.
    ///
    /// Panics if the coordinate lies outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> T {
        self.data[(z * self.height + y) * self.width + x]
    }

    /// The underlying `[z][y][x]`-ordered samples.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` to every sample, producing a grid of the same shape.
    pub fn map<U, F>(&self, f: F) -> Grid3<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid3 {
            width: self.width,
            height: self.height,
            depth: self.depth,
            data: self.data.iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let grid = ScalarGrid2::from_rows(&[vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(2, 0), 2.0);
        assert_eq!(grid.get(0, 1), 3.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = ScalarGrid2::from_rows(&[vec![0.0, 1.0], vec![3.0]]);
        assert_eq!(
            result,
            Err(GridError::Ragged {
                axis: "row",
                index: 1,
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_ragged_planes_rejected() {
        let planes = vec![
            vec![vec![0u32, 0], vec![0, 0]],
            vec![vec![0u32, 0]],
        ];
        match LabelGrid::from_planes(&planes) {
            Err(GridError::Ragged { axis, index, .. }) => {
                assert_eq!(axis, "plane");
                assert_eq!(index, 1);
            }
            other => panic!("expected ragged plane, got {:?}", other),
        }
    }

    #[test]
    fn test_data_length_checked() {
        assert_eq!(
            ScalarGrid3::new(2, 2, 2, vec![0.0; 7]),
            Err(GridError::DataLength {
                expected: 8,
                found: 7
            })
        );
    }

    #[test]
    fn test_indexing_order() {
        let grid = Grid3::from_fn(3, 4, 5, |x, y, z| x + 10 * y + 100 * z);
        assert_eq!(grid.shape(), [5, 4, 3]);
        assert_eq!(grid.get(2, 3, 4), 432);

        let planes = vec![vec![vec![1u32, 2], vec![3, 4]], vec![vec![5, 6], vec![7, 8]]];
        let grid = LabelGrid::from_planes(&planes).unwrap();
        assert_eq!(grid.get(1, 0, 1), 6);
        assert_eq!(grid.get(0, 1, 0), 3);
    }

    #[test]
    fn test_from_strided() {
        // Fortran-ordered 2x2x2 buffer: x varies slowest.
        let data: Vec<u32> = (0..8).collect();
        let grid = LabelGrid::from_strided(&data, [2, 2, 2], [1, 2, 4]).unwrap();
        assert_eq!(grid.get(1, 0, 0), 4);
        assert_eq!(grid.get(0, 1, 0), 2);
        assert_eq!(grid.get(0, 0, 1), 1);

        assert_eq!(
            LabelGrid::from_strided(&data[..7], [2, 2, 2], [1, 2, 4]),
            Err(GridError::StrideOutOfBounds { offset: 7, len: 7 })
        );
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let huge = 1usize << 63;
        assert_eq!(
            ScalarGrid2::new(huge, 2, vec![]),
            Err(GridError::SizeOverflow {
                dimensions: [huge, 2, 1]
            })
        );
        assert_eq!(
            ScalarGrid3::new(2, huge, 2, vec![]),
            Err(GridError::SizeOverflow {
                dimensions: [2, huge, 2]
            })
        );
    }

    #[test]
    fn test_strided_overflow_rejected() {
        let data: Vec<u32> = (0..8).collect();
        assert_eq!(
            LabelGrid::from_strided(&data, [2, 2, 2], [1, 2, usize::MAX]),
            Err(GridError::SizeOverflow {
                dimensions: [2, 2, 2]
            })
        );

        // zero strides alias every sample, but the shape still has to fit
        let huge = 1usize << 32;
        assert_eq!(
            LabelGrid::from_strided(&data, [huge, huge, 2], [0, 0, 0]),
            Err(GridError::SizeOverflow {
                dimensions: [2, huge, huge]
            })
        );
        let aliased = LabelGrid::from_strided(&data, [2, 2, 2], [0, 0, 0]).unwrap();
        assert!(aliased.as_slice().iter().all(|&l| l == 0));
    }

    #[test]
    fn test_empty_rows() {
        let rows: Vec<Vec<f64>> = vec![];
        let grid = ScalarGrid2::from_rows(&rows).unwrap();
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), 0);
    }
}
