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

//! Point types used for grid-index and pixel coordinates.
//!
//! Coordinates are `f64` so that the stitching tolerance (1e-6 grid units)
//! stays meaningful on large grids.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2 dimensional point or vector
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// A 3 dimensional point or vector
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

// Plus and multiply operators can't be used as separators in macro repetition,
// so I use a fold operation instead
macro_rules! fold {
    ($op:tt, $x:expr, $y:expr) => {
        $x $op $y
    };
    ($op:tt, $x:expr, $y:expr, $($rest:expr),+) => {
        fold!($op, ($x $op $y), $($rest),*)
    }
}

macro_rules! impl_arithmetic_op {
    ($name:ident, $op_name:ident, $op_small_name:ident, $op:tt { $($field:ident ),+ }) => {
        impl std::ops::$op_name for $name {
            type Output = $name;
            fn $op_small_name(self, other: $name) -> $name {
                $name::new($(self.$field $op other.$field),*)
            }
        }
        impl std::ops::$op_name<f64> for $name {
            type Output = $name;
            fn $op_small_name(self, other: f64) -> $name {
                $name::new($(self.$field $op other),*)
            }
        }
        impl std::ops::$op_name<$name> for f64 {
            type Output = $name;
            fn $op_small_name(self, other: $name) -> $name {
                $name::new($(self $op other.$field),*)
            }
        }
    };
}

macro_rules! impl_vector {
    ($name:ident { $($field:ident ),+ }) => {
        impl $name {
            /// Create a vector
            pub fn new($($field : f64),*) -> Self {
                Self { $($field),* }
            }

            /// Create a vector with all coordinates set to zero
            pub fn zero() -> Self {
                Self{ $($field: 0.0),*}
            }

            /// Squared Euclidean length of this vector
            pub fn len_sq(&self) -> f64 {
                fold!(+, $(self.$field * self.$field),*)
            }

            /// Euclidean length of this vector
            pub fn len(&self) -> f64 {
                self.len_sq().sqrt()
            }

            /// Create a vector by taking the min value of each component in
            /// this vector and another
            pub fn min(&self, other: Self) -> Self {
                $name::new($(self.$field.min(other.$field)),*)
            }

            /// Create a vector by taking the max value of each component in
            /// this vector and another
            pub fn max(&self, other: Self) -> Self {
                $name::new($(self.$field.max(other.$field)),*)
            }

            /// True if every component of the two vectors differs by strictly
            /// less than `tolerance`
            pub fn approx_eq(&self, other: Self, tolerance: f64) -> bool {
                fold!(&&, $((self.$field - other.$field).abs() < tolerance),*)
            }
        }

        impl std::default::Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl_arithmetic_op!($name, Add, add, + { $($field),* });
        impl_arithmetic_op!($name, Sub, sub, - { $($field),* });
        impl_arithmetic_op!($name, Mul, mul, * { $($field),* });
        impl_arithmetic_op!($name, Div, div, / { $($field),* });
    };
}

impl_vector!(Vec2 { x, y });
impl_vector!(Vec3 { x, y, z });

impl Vec2 {
    /// The z component of the cross product of this vector and another
    pub fn perp_dot(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Vec3 {
    /// Calculate the dot product of this vector and another
    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Compute the cross product of this vector and another
    pub fn cross(&self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_works() {
        assert_eq!(vec2(1.0, 2.0).len_sq(), 5.0);
        assert_eq!(vec3(1.0, 2.0, 3.0).len_sq(), 14.0);
    }

    #[test]
    fn test_approx_eq_is_strict() {
        let a = vec2(1.0, 1.0);
        assert!(a.approx_eq(vec2(1.0 + 5e-7, 1.0 - 5e-7), 1e-6));
        assert!(!a.approx_eq(vec2(1.0, 1.0 + 2e-6), 1e-6));
    }

    #[test]
    fn test_cross() {
        let x = vec3(1.0, 0.0, 0.0);
        let y = vec3(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), vec3(0.0, 0.0, 1.0));
        assert_eq!(vec2(1.0, 0.0).perp_dot(vec2(0.0, 1.0)), 1.0);
    }

    #[test]
    fn test_scalar_division() {
        // cell sizes are computed by dividing a padded extent by a resolution
        let extent = vec2(10.0, 6.0) - vec2(2.0, 2.0) + 2.0;
        assert_eq!(extent / 4.0, vec2(2.5, 1.5));
    }
}
