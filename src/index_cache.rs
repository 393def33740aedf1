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
use crate::math::Vec3;
use std::{cmp::Eq, collections::HashMap, hash::Hash};

/// Identifies a vertex by the exact bit pattern of its coordinates.
///
/// Two crossings computed from the same edge by neighbouring cells produce
/// bit-identical coordinates, so exact matching is enough to weld them.
/// Negative zero is folded into positive zero.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct VertexKey([u64; 3]);

impl VertexKey {
    pub fn new(v: Vec3) -> Self {
        // adding positive zero turns -0.0 into 0.0 and leaves everything else alone
        Self([
            (v.x + 0.0).to_bits(),
            (v.y + 0.0).to_bits(),
            (v.z + 0.0).to_bits(),
        ])
    }
}

/// Tracks vertex indices to avoid emitting duplicate vertices during marching
/// cubes mesh generation
pub struct IndexCache<K: Eq + Hash, I: Clone> {
    indices: HashMap<K, I>,
}

impl<K: Eq + Hash, I: Clone> IndexCache<K, I> {
    /// Create a new IndexCache
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
        }
    }

    /// Put an index in the cache under the given key
    pub fn put(&mut self, key: K, index: I) {
        self.indices.insert(key, index);
    }

    /// Retrieve an index from the cache for the given key
    pub fn get(&self, key: &K) -> Option<I> {
        self.indices.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

impl<K: Eq + Hash, I: Clone> Default for IndexCache<K, I> {
    fn default() -> Self {
        Self::new()
    }
}
