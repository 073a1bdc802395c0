use bevy::prelude::Vec3;
use ndarray::Array2;

/// Height channel of a terrain grid, indexed `[[row, col]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap(pub Array2<f32>);

impl HeightMap {
    pub fn height_at(&self, row: usize, col: usize) -> f32 {
        self.0[[row, col]]
    }

    /// Normal at a grid vertex from central differences (one-sided on the
    /// border), in the same orientation as the mesh's face normals: a flat
    /// map yields `-Y`.
    pub fn normal_at(&self, row: usize, col: usize, cell_size: f32) -> Vec3 {
        let (rows, cols) = self.dim();

        let dx = if cols < 2 {
            0.
        } else if col == 0 {
            self.0[[row, col + 1]] - self.0[[row, col]]
        } else if col == cols - 1 {
            self.0[[row, col]] - self.0[[row, col - 1]]
        } else {
            (self.0[[row, col + 1]] - self.0[[row, col - 1]]) / 2.
        };
        let dz = if rows < 2 {
            0.
        } else if row == 0 {
            self.0[[row + 1, col]] - self.0[[row, col]]
        } else if row == rows - 1 {
            self.0[[row, col]] - self.0[[row - 1, col]]
        } else {
            (self.0[[row + 1, col]] - self.0[[row - 1, col]]) / 2.
        };

        Vec3 {
            x: dx / cell_size,
            y: -1.,
            z: dz / cell_size,
        }
        .normalize()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }
}
