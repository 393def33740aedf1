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

/// Trait for outputting mesh vertices and indices.
///
/// Extraction calls `extract_vertex` once per unique vertex, in index order,
/// and `extract_index` three times per triangle.
pub trait Extractor {
    fn extract_vertex(&mut self, vertex: Vec3);
    fn extract_index(&mut self, index: usize);
}

/// Output vertices as a tightly packed array of single precision floats,
/// alongside a 32-bit index buffer, as expected by GPU upload and most mesh
/// file writers.
pub struct IndexedVertices<'a> {
    vertices: &'a mut Vec<f32>,
    indices: &'a mut Vec<u32>,
}

impl<'a> IndexedVertices<'a> {
    pub fn new(vertices: &'a mut Vec<f32>, indices: &'a mut Vec<u32>) -> Self {
        Self { vertices, indices }
    }
}

impl<'a> Extractor for IndexedVertices<'a> {
    fn extract_vertex(&mut self, v: Vec3) {
        self.vertices.push(v.x as f32);
        self.vertices.push(v.y as f32);
        self.vertices.push(v.z as f32);
    }

    fn extract_index(&mut self, index: usize) {
        self.indices.push(index as u32);
    }
}

/// Output vertices only, discarding any face data.
pub struct OnlyVertices<'a> {
    vertices: &'a mut Vec<Vec3>,
}

impl<'a> OnlyVertices<'a> {
    pub fn new(vertices: &'a mut Vec<Vec3>) -> Self {
        Self { vertices }
    }
}

impl<'a> Extractor for OnlyVertices<'a> {
    fn extract_vertex(&mut self, v: Vec3) {
        self.vertices.push(v);
    }

    fn extract_index(&mut self, _: usize) {}
}
