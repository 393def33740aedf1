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
use crate::{
    extractor::Extractor,
    index_cache::{IndexCache, VertexKey},
    math::Vec3,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An indexed triangle mesh.
///
/// Vertices are in grid-index space. `indices` holds one triple of vertex
/// indices per triangle.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// An edge within a mesh. Edges are bidirectional (i.e. Edge(u,v) and Edge(v,u)
/// represent the same edge)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
struct Edge(u32, u32);

impl Edge {
    /// Construct a new edge from the two vertices it connects.
    /// The edge direction will be normalised during construction.
    fn new(a: u32, b: u32) -> Edge {
        if a > b {
            Edge(b, a)
        } else {
            Edge(a, b)
        }
    }
}

impl Mesh {
    /// Create a new empty Mesh
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// A mesh is empty unless it has both vertices and faces.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Iterate over the corner positions of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |t| {
            [
                self.vertices[t[0] as usize],
                self.vertices[t[1] as usize],
                self.vertices[t[2] as usize],
            ]
        })
    }

    /// The axis-aligned bounding box of the vertices, as `(min, max)`.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
        )
    }

    /// Length of the bounding box diagonal, or zero for an empty mesh.
    pub fn diameter(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| (max - min).len())
    }

    /// Enclosed volume, from the sum of signed volumes of the tetrahedra
    /// formed by each triangle and the origin.
    ///
    /// Only meaningful for closed meshes. The sign is discarded, so the result
    /// does not depend on the winding convention.
    pub fn volume(&self) -> f64 {
        let signed: f64 = self
            .triangles()
            .map(|[a, b, c]| a.dot(b.cross(c)) / 6.0)
            .sum();
        signed.abs()
    }

    /// The Euler characteristic `V - E + F`. A single closed surface of genus
    /// zero has characteristic 2.
    pub fn euler_characteristic(&self) -> i64 {
        let mut edges = HashSet::new();
        for t in self.indices.chunks_exact(3) {
            edges.insert(Edge::new(t[0], t[1]));
            edges.insert(Edge::new(t[1], t[2]));
            edges.insert(Edge::new(t[2], t[0]));
        }

        self.vertex_count() as i64 - edges.len() as i64 + self.triangle_count() as i64
    }
}

impl Extractor for Mesh {
    fn extract_vertex(&mut self, vertex: Vec3) {
        self.vertices.push(vertex);
    }

    fn extract_index(&mut self, index: usize) {
        self.indices.push(index as u32);
    }
}

/// Welds vertices by position as triangles are added, forwarding unique
/// vertices and triangle indices to an [Extractor].
pub struct MeshBuilder<'a, E: Extractor> {
    index_cache: IndexCache<VertexKey, usize>,
    triangles: usize,
    extractor: &'a mut E,
}

impl<'a, E: Extractor> MeshBuilder<'a, E> {
    pub fn new(extractor: &'a mut E) -> Self {
        Self {
            index_cache: IndexCache::new(),
            triangles: 0,
            extractor,
        }
    }

    /// Return the index of the vertex at this exact position, emitting a new
    /// vertex if none has been seen yet.
    pub fn add_vertex(&mut self, vertex: Vec3) -> usize {
        let key = VertexKey::new(vertex);
        if let Some(index) = self.index_cache.get(&key) {
            index
        } else {
            let index = self.index_cache.len();
            self.index_cache.put(key, index);
            self.extractor.extract_vertex(vertex);
            index
        }
    }

    /// Add a triangle, unless all three corners are the same vertex.
    /// Returns whether the triangle was kept.
    pub fn add_face(&mut self, a: usize, b: usize, c: usize) -> bool {
        if a == b && b == c {
            return false;
        }
        self.extractor.extract_index(a);
        self.extractor.extract_index(b);
        self.extractor.extract_index(c);
        self.triangles += 1;
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.index_cache.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles
    }
}
