//! Interactive heightfield sculpting.
//!
//! A [`TerrainSculptor`] owns a regular grid mesh and raises or lowers it
//! around a world-space pick point with a linear, square falloff. Picking and
//! display stay outside: a [`PickSource`] supplies the point and a
//! [`MeshConsumer`] receives the updated geometry.

pub mod error;
pub mod heightmap;
pub mod meshing;
pub mod pick;
pub mod sculpt;
pub mod settings;

pub use error::SculptError;
pub use heightmap::HeightMap;
pub use meshing::{HeightfieldMesh, MeshConsumer, MeshView};
pub use pick::{intersect_heightfield, PickSource};
pub use sculpt::{GridCoord, RaiseDirection, SculptOutcome, TerrainSculptor};
pub use settings::{NormalMethod, SculptSettings, TerrainConfig};
