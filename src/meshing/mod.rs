mod grid;

pub use grid::HeightfieldMesh;

use bevy::{
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology},
};

/// Borrowed snapshot of a [`HeightfieldMesh`], valid until its next mutation.
#[derive(Clone, Copy, Debug)]
pub struct MeshView<'a> {
    pub vertices: &'a [Vec3],
    pub indices: &'a [u32],
    pub normals: &'a [Vec3],
}

impl MeshView<'_> {
    pub fn into_render_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);
        mesh.consume(self);
        mesh
    }
}

/// Receives the terrain geometry after every edit, e.g. to upload it for
/// display.
pub trait MeshConsumer {
    fn consume(&mut self, view: MeshView<'_>);
}

impl MeshConsumer for Mesh {
    fn consume(&mut self, view: MeshView<'_>) {
        self.insert_attribute(Mesh::ATTRIBUTE_POSITION, view.vertices.to_vec());
        self.insert_attribute(Mesh::ATTRIBUTE_NORMAL, view.normals.to_vec());

        // Topology never changes after construction.
        if self.indices().map_or(true, |i| i.len() != view.indices.len()) {
            self.set_indices(Some(Indices::U32(view.indices.to_vec())));
        }
    }
}
