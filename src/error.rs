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

//! Errors raised while constructing grids.
//!
//! Extraction itself never fails: once a grid exists it is rectangular by
//! construction, and numeric oddities propagate through the arithmetic.

use thiserror::Error;

/// Errors that can occur when building a grid from caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A row (or plane) does not have the same length as the first one.
    #[error("ragged {axis} at index {index}: expected length {expected}, found {found}")]
    Ragged {
        /// Which level of nesting was ragged ("row" or "plane").
        axis: &'static str,
        /// Position of the offending row or plane.
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A flat buffer does not match the requested dimensions.
    #[error("data length mismatch: dimensions require {expected} samples, found {found}")]
    DataLength { expected: usize, found: usize },

    /// A strided view addresses memory beyond the end of its buffer.
    #[error("strided view reaches offset {offset}, but the buffer holds {len} samples")]
    StrideOutOfBounds { offset: usize, len: usize },

    /// The requested dimensions or strides address more samples than fit in
    /// a `usize`.
    #[error("grid dimensions {dimensions:?} overflow the addressable size")]
    SizeOverflow { dimensions: [usize; 3] },
}

/// Result type for grid construction.
pub type GridResult<T> = std::result::Result<T, GridError>;
