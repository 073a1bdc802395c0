//! Raising and lowering the terrain around a picked point.

use std::f32::consts::PI;

use bevy::{
    log::debug,
    prelude::{Quat, Transform, Vec3},
};
use ndarray::Array2;

use crate::{
    error::Result,
    meshing::{HeightfieldMesh, MeshConsumer, MeshView},
    pick::PickSource,
    settings::{validate_amount, validate_radius, SculptSettings, TerrainConfig},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaiseDirection {
    Up,
    Down,
}

impl RaiseDirection {
    pub fn sign(self) -> f32 {
        match self {
            RaiseDirection::Up => 1.,
            RaiseDirection::Down => -1.,
        }
    }
}

/// Grid position a world point snapped to. May lie outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub col: i64,
    pub row: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SculptOutcome {
    /// Heights changed; `touched` vertices received a delta.
    Applied { center: GridCoord, touched: usize },
    /// The point snapped outside the grid, nothing changed.
    OutOfRange(GridCoord),
    /// The pick source had nothing under the cursor.
    NoPick,
}

/// Height delta at Chebyshev distance `degree` from the brush center, for a
/// signed strength `amount`. Falls linearly from `amount` to zero at `radius`.
pub fn falloff(amount: f32, radius: u32, degree: u32) -> f32 {
    amount - (amount / radius as f32) * degree as f32
}

/// Owns the terrain mesh and applies brush strokes to it.
#[derive(Clone, Debug)]
pub struct TerrainSculptor {
    mesh: HeightfieldMesh,
}

impl TerrainSculptor {
    pub fn new(config: &TerrainConfig) -> Result<Self> {
        let mesh = HeightfieldMesh::with_normal_method(
            config.vertex_size,
            config.cell_size,
            config.normal_method,
        )?;
        Ok(Self { mesh })
    }

    pub fn from_mesh(mesh: HeightfieldMesh) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &HeightfieldMesh {
        &self.mesh
    }

    pub fn emit(&self) -> MeshView<'_> {
        self.mesh.emit()
    }

    /// Where the mesh has to sit in the scene for [`snap_to_grid`] to land on
    /// the vertex under a picked point: rolled half a turn about Z, then
    /// shifted back over the positive X axis.
    ///
    /// The roll also flips the mesh's local `-Y` to world up, so lowering a
    /// local height raises the visible surface.
    ///
    /// [`snap_to_grid`]: Self::snap_to_grid
    pub fn placement(&self) -> Transform {
        let extent = self.mesh.vertex_size() as f32 * self.mesh.cell_size();
        Transform::from_xyz(extent, 0., 0.).with_rotation(Quat::from_rotation_z(PI))
    }

    /// Coordinates too large for `i64` saturate, so they stay off the grid.
    pub fn snap_to_grid(&self, point: Vec3) -> GridCoord {
        let cell_size = self.mesh.cell_size();
        let col = self.mesh.vertex_size() as f64 - (point.x / cell_size).ceil() as f64;
        GridCoord {
            col: col as i64,
            row: (point.z / cell_size).ceil() as i64,
        }
    }

    fn index_of(&self, coord: GridCoord) -> Option<usize> {
        let n = self.mesh.vertex_size() as i64;
        ((0..n).contains(&coord.col) && (0..n).contains(&coord.row))
            .then(|| (coord.row * n + coord.col) as usize)
    }

    /// Applies one brush stroke centered on the vertex `point` snaps to and
    /// hands the updated mesh to `consumer`.
    ///
    /// `Up` subtracts from local heights, which reads as raising under
    /// [`placement`](Self::placement).
    pub fn raise(
        &mut self,
        point: Vec3,
        direction: RaiseDirection,
        amount: f32,
        radius: u32,
        consumer: &mut impl MeshConsumer,
    ) -> Result<SculptOutcome> {
        validate_amount(amount)?;
        validate_radius(radius)?;

        let center = self.snap_to_grid(point);
        if !point.is_finite() || self.index_of(center).is_none() {
            debug!("pick at {point} snapped to {center:?}, outside the terrain");
            return Ok(SculptOutcome::OutOfRange(center));
        }

        let signed_amount = direction.sign() * amount;
        let n = self.mesh.vertex_size() as i64;
        let reach = radius as i64 - 1;
        let cols = (center.col - reach).max(0)..=(center.col + reach).min(n - 1);
        let rows = (center.row - reach).max(0)..=(center.row + reach).min(n - 1);

        let deltas = Array2::from_shape_fn(
            (rows.clone().count(), cols.clone().count()),
            |(i, j)| {
                let row = rows.start() + i as i64;
                let col = cols.start() + j as i64;
                let degree = (row - center.row).abs().max((col - center.col).abs());
                falloff(signed_amount, radius, degree as u32)
            },
        );

        for ((i, j), delta) in deltas.indexed_iter() {
            let index = ((rows.start() + i as i64) * n + cols.start() + j as i64) as usize;
            let height = self.mesh.height(index);
            self.mesh.set_height(index, height - delta);
        }

        self.mesh.recalculate_normals();
        consumer.consume(self.mesh.emit());

        Ok(SculptOutcome::Applied {
            center,
            touched: deltas.len(),
        })
    }

    /// Asks `source` where to sculpt and applies a stroke with `settings`.
    pub fn sculpt(
        &mut self,
        source: &mut impl PickSource,
        direction: RaiseDirection,
        settings: &SculptSettings,
        consumer: &mut impl MeshConsumer,
    ) -> Result<SculptOutcome> {
        match source.pick_point(&self.mesh) {
            Some(point) => self.raise(
                point,
                direction,
                settings.amount(),
                settings.radius(),
                consumer,
            ),
            None => Ok(SculptOutcome::NoPick),
        }
    }
}
