use bevy::{log::debug, prelude::Vec3};
use ndarray::Array2;

use super::MeshView;
use crate::{
    error::{Result, SculptError},
    settings::NormalMethod,
    HeightMap,
};

/// Regular N×N grid mesh whose vertices only move along Y.
///
/// Vertex `row * N + col` sits at `(col * cell_size, height, row * cell_size)`.
/// Each cell is split into two triangles wound so that a flat cell's face
/// normal points along local `-Y`; the terrain is shown rolled over by
/// [`TerrainSculptor::placement`](crate::sculpt::TerrainSculptor::placement).
#[derive(Clone, Debug)]
pub struct HeightfieldMesh {
    vertex_size: usize,
    cell_size: f32,
    normal_method: NormalMethod,
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
    normals: Vec<Vec3>,
}

impl HeightfieldMesh {
    pub fn new(vertex_size: usize, cell_size: f32) -> Result<Self> {
        Self::with_normal_method(vertex_size, cell_size, NormalMethod::default())
    }

    pub fn with_normal_method(
        vertex_size: usize,
        cell_size: f32,
        normal_method: NormalMethod,
    ) -> Result<Self> {
        if vertex_size < 2 {
            return Err(SculptError::configuration(format!(
                "grid needs at least 2 vertices per side, got {vertex_size}"
            )));
        }
        if !cell_size.is_finite() || cell_size <= 0. {
            return Err(SculptError::configuration(format!(
                "cell size must be positive and finite, got {cell_size}"
            )));
        }
        let vertex_count = vertex_size
            .checked_mul(vertex_size)
            .filter(|&count| u32::try_from(count).is_ok())
            .ok_or_else(|| {
                SculptError::configuration(format!(
                    "{vertex_size}x{vertex_size} vertices can't be addressed with u32 indices"
                ))
            })?;

        let mut vertices = Vec::with_capacity(vertex_count);
        let mut triangles = Vec::with_capacity((vertex_size - 1) * (vertex_size - 1) * 6);
        let n = vertex_size as u32;

        for row in 0..vertex_size {
            for col in 0..vertex_size {
                vertices.push(Vec3::new(col as f32, 0., row as f32) * cell_size);

                if row < vertex_size - 1 && col < vertex_size - 1 {
                    let v = (row * vertex_size + col) as u32;
                    triangles.extend([v, v + n + 1, v + n]);
                    triangles.extend([v, v + 1, v + n + 1]);
                }
            }
        }

        let mut mesh = Self {
            vertex_size,
            cell_size,
            normal_method,
            vertices,
            triangles,
            normals: vec![Vec3::NEG_Y; vertex_count],
        };
        mesh.recalculate_normals();

        debug!(
            "built {vertex_size}x{vertex_size} heightfield ({} triangles, cell size {cell_size}, {:?} normals)",
            mesh.triangle_count(),
            mesh.normal_method()
        );

        Ok(mesh)
    }

    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn normal_method(&self) -> NormalMethod {
        self.normal_method
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn height(&self, index: usize) -> f32 {
        self.vertices[index].y
    }

    /// Caller guarantees `index < vertex_count()`.
    pub fn set_height(&mut self, index: usize, height: f32) {
        self.vertices[index].y = height;
    }

    /// Copy of the height channel as a `[[row, col]]` grid.
    pub fn height_map(&self) -> HeightMap {
        let n = self.vertex_size;
        HeightMap(Array2::from_shape_fn((n, n), |(row, col)| {
            self.vertices[row * n + col].y
        }))
    }

    /// Rebuilds every vertex normal from the current heights. Must run after
    /// a batch of [`set_height`](Self::set_height) calls before the mesh is
    /// emitted.
    pub fn recalculate_normals(&mut self) {
        match self.normal_method {
            NormalMethod::AreaWeighted => self.area_weighted_normals(),
            NormalMethod::CentralDifference => self.central_difference_normals(),
        }
    }

    fn area_weighted_normals(&mut self) {
        self.normals.fill(Vec3::ZERO);

        // The cross product's length is twice the triangle area, so summing
        // unnormalized face normals weights them by area.
        for tri in self.triangles.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = self.vertices[i0];
            let face_normal = (self.vertices[i1] - p0).cross(self.vertices[i2] - p0);
            self.normals[i0] += face_normal;
            self.normals[i1] += face_normal;
            self.normals[i2] += face_normal;
        }

        for normal in &mut self.normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::NEG_Y);
        }
    }

    fn central_difference_normals(&mut self) {
        let heights = self.height_map();
        let n = self.vertex_size;

        for row in 0..n {
            for col in 0..n {
                self.normals[row * n + col] = heights.normal_at(row, col, self.cell_size);
            }
        }
    }

    pub fn emit(&self) -> MeshView<'_> {
        MeshView {
            vertices: &self.vertices,
            indices: &self.triangles,
            normals: &self.normals,
        }
    }
}
