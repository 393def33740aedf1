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

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use isocontour::{
    contour, decompose_labels,
    extractor::IndexedVertices,
    math::{vec3, Mat4},
    LabelGrid, MarchingCubes, ProjectionRasterizer, ScalarGrid2, ScalarGrid3, SurfaceParams,
    Viewport,
};

/// Signed distance to a torus lying in the xy plane, centred in an `n^3` grid.
fn torus(n: usize) -> ScalarGrid3 {
    let c = (n - 1) as f64 / 2.0;
    let (major, minor) = (n as f64 * 0.25, n as f64 * 0.1);
    ScalarGrid3::from_fn(n, n, n, |x, y, z| {
        let p = vec3(x as f64 - c, y as f64 - c, z as f64 - c);
        let q = (p.x * p.x + p.y * p.y).sqrt() - major;
        (q * q + p.z * p.z).sqrt() - minor
    })
}

fn rings(n: usize) -> ScalarGrid2 {
    let c = (n - 1) as f64 / 2.0;
    ScalarGrid2::from_fn(n, n, |x, y| {
        let d = ((x as f64 - c).powi(2) + (y as f64 - c).powi(2)).sqrt();
        (d * 0.3).sin()
    })
}

/// Nested shells of alternating labels.
fn shells(n: usize) -> LabelGrid {
    let c = (n - 1) as f64 / 2.0;
    LabelGrid::from_fn(n, n, n, |x, y, z| {
        let d = vec3(x as f64 - c, y as f64 - c, z as f64 - c).len();
        (d / 6.0) as u32 % 4
    })
}

fn marching_squares_benchmark(c: &mut Criterion) {
    let grid = rings(256);
    c.bench_function("marching squares", |b| {
        b.iter(|| contour(black_box(&grid), 0.0))
    });
}

fn marching_cubes_benchmark(c: &mut Criterion) {
    let grid = torus(64);
    let marching_cubes = MarchingCubes::new(SurfaceParams::at(0.0));
    c.bench_function("marching cubes", |b| {
        b.iter(|| marching_cubes.extract(black_box(&grid)))
    });
    c.bench_function("marching cubes indexed", |b| {
        b.iter(|| {
            let mut vertices = vec![];
            let mut indices = vec![];
            let mut extractor = IndexedVertices::new(&mut vertices, &mut indices);
            marching_cubes.extract_into(black_box(&grid), &mut extractor)
        })
    });
}

fn labels_benchmark(c: &mut Criterion) {
    let grid = shells(48);
    c.bench_function("decompose labels", |b| {
        b.iter(|| decompose_labels(black_box(&grid)))
    });
}

fn projection_benchmark(c: &mut Criterion) {
    let mesh = MarchingCubes::new(SurfaceParams::at(0.0)).extract(&torus(64));
    let mut camera = Mat4::identity();
    for i in 0..3 {
        camera.0[i][i] = 1.0 / 64.0;
    }
    let rasterizer = ProjectionRasterizer::default();
    c.bench_function("projection outline", |b| {
        b.iter(|| rasterizer.outline(black_box(&mesh.vertices), &camera, Viewport::new(800.0, 600.0)))
    });
}

criterion_group!(
    benches,
    marching_squares_benchmark,
    marching_cubes_benchmark,
    labels_benchmark,
    projection_benchmark
);
criterion_main!(benches);
