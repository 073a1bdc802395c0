//! Resolving where the user is pointing on the terrain.

use bevy::{
    math::Ray,
    prelude::{Transform, Vec3},
};

use crate::meshing::HeightfieldMesh;

/// Produces the world-space point a sculpt stroke should be applied at.
pub trait PickSource {
    fn pick_point(&mut self, mesh: &HeightfieldMesh) -> Option<Vec3>;
}

/// A fixed point, handy for scripted strokes.
impl PickSource for Vec3 {
    fn pick_point(&mut self, _mesh: &HeightfieldMesh) -> Option<Vec3> {
        Some(*self)
    }
}

impl PickSource for Option<Vec3> {
    fn pick_point(&mut self, _mesh: &HeightfieldMesh) -> Option<Vec3> {
        *self
    }
}

const EPSILON: f32 = 1e-7;

/// Nearest world-space intersection of `ray` with `mesh` placed by `transform`.
///
/// Both faces count as hits, since the mesh is shown rolled over.
pub fn intersect_heightfield(
    mesh: &HeightfieldMesh,
    transform: &Transform,
    ray: Ray,
) -> Option<Vec3> {
    let to_local = transform.compute_matrix().inverse();
    let origin = to_local.transform_point3(ray.origin);
    let direction = to_local.transform_vector3(ray.direction);

    let view = mesh.emit();
    let nearest = view
        .indices
        .chunks_exact(3)
        .filter_map(|tri| {
            intersect_triangle(
                origin,
                direction,
                [
                    view.vertices[tri[0] as usize],
                    view.vertices[tri[1] as usize],
                    view.vertices[tri[2] as usize],
                ],
            )
        })
        .min_by(|a, b| a.total_cmp(b))?;

    Some(transform.transform_point(origin + direction * nearest))
}

/// Möller–Trumbore; returns the ray parameter of the hit.
fn intersect_triangle(origin: Vec3, direction: Vec3, [p0, p1, p2]: [Vec3; 3]) -> Option<f32> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1. / det;
    let s = origin - p0;
    let u = s.dot(p) * inv_det;
    if !(0. ..=1.).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0. || u + v > 1. {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}
