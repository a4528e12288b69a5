//! Reference body: the fixed point set that gets rotated each tick.
//!
//! Faces are carried only so a renderer can draw the rotated body; the
//! pipeline never reads or changes them.

use serde::Serialize;

use crate::util::{DVec3, Error, Result, Vertex3D};

/// Planar quad face with a display color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    /// Indices into the body's vertex list, in winding order.
    pub indices: [usize; 4],
    /// Color name understood by the renderer.
    pub color: String,
}

impl Face {
    pub fn new(indices: [usize; 4], color: impl Into<String>) -> Self {
        Self { indices, color: color.into() }
    }
}

/// A face resolved against a (rotated) vertex set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FacePolygon {
    pub corners: [[f64; 3]; 4],
    pub color: String,
}

/// Immutable vertex set plus face table.
#[derive(Clone, Debug)]
pub struct ReferenceBody {
    vertices: Vec<Vertex3D>,
    faces: Vec<Face>,
}

/// Face colors of the default body: bottom, top, front, back, right, left.
const SLAB_COLORS: [&str; 6] = ["blue", "green", "red", "orange", "purple", "yellow"];

/// Quads of an 8-vertex box (bottom ring 0-3, top ring 4-7).
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3], // bottom
    [4, 5, 6, 7], // top
    [0, 1, 5, 4], // front
    [2, 3, 7, 6], // back
    [1, 2, 6, 5], // right
    [0, 3, 7, 4], // left
];

impl ReferenceBody {
    /// Build a body, checking every face index against the vertex count.
    pub fn new(vertices: Vec<Vertex3D>, faces: Vec<Face>) -> Result<Self> {
        if let Some(bad) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(Error::config(format!("vertex {bad} is not finite")));
        }
        for (face, f) in faces.iter().enumerate() {
            if let Some(&index) = f.indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(Error::FaceOutOfBounds { face, index, count: vertices.len() });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Bare point set without faces.
    pub fn points(vertices: Vec<Vertex3D>) -> Result<Self> {
        Self::new(vertices, Vec::new())
    }

    /// Axis-aligned box centered on the origin with the given half extents.
    pub fn cuboid(half: DVec3) -> Self {
        let (x, y, z) = (half.x, half.y, half.z);
        let vertices = vec![
            DVec3::new(-x, -y, -z),
            DVec3::new(x, -y, -z),
            DVec3::new(x, y, -z),
            DVec3::new(-x, y, -z),
            DVec3::new(-x, -y, z),
            DVec3::new(x, -y, z),
            DVec3::new(x, y, z),
            DVec3::new(-x, y, z),
        ];
        let faces = BOX_FACES
            .iter()
            .zip(SLAB_COLORS)
            .map(|(&indices, color)| Face::new(indices, color))
            .collect();
        Self { vertices, faces }
    }

    /// The default board-shaped body: 2 x 2 x 0.4, one color per face.
    pub fn slab() -> Self {
        Self::cuboid(DVec3::new(1.0, 1.0, 0.2))
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Resolve the face table against `vertices` (normally a rotated copy of
    /// this body's vertices).
    pub fn polygons(&self, vertices: &[Vertex3D]) -> Vec<FacePolygon> {
        self.faces
            .iter()
            .filter(|f| f.indices.iter().all(|&i| i < vertices.len()))
            .map(|f| FacePolygon {
                corners: f.indices.map(|i| vertices[i].to_array()),
                color: f.color.clone(),
            })
            .collect()
    }
}

impl Default for ReferenceBody {
    fn default() -> Self {
        Self::slab()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slab_shape() {
        let body = ReferenceBody::slab();
        assert_eq!(body.vertices().len(), 8);
        assert_eq!(body.faces().len(), 6);
        assert_eq!(body.vertices()[0], DVec3::new(-1.0, -1.0, -0.2));
        assert_eq!(body.vertices()[6], DVec3::new(1.0, 1.0, 0.2));
        assert_eq!(body.faces()[2].color, "red");
    }

    #[test]
    fn test_polygons_follow_face_table() {
        let body = ReferenceBody::slab();
        let polys = body.polygons(body.vertices());
        assert_eq!(polys.len(), 6);
        // top face: vertices 4..8
        assert_eq!(polys[1].corners[0], [-1.0, -1.0, 0.2]);
        assert_eq!(polys[1].corners[2], [1.0, 1.0, 0.2]);
        assert_eq!(polys[1].color, "green");
    }

    #[test]
    fn test_face_index_validation() {
        let verts = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let err = ReferenceBody::new(verts, vec![Face::new([0, 1, 2, 3], "red")]).unwrap_err();
        assert!(matches!(err, Error::FaceOutOfBounds { face: 0, index: 3, count: 3 }));
    }

    #[test]
    fn test_non_finite_vertex_rejected() {
        assert!(ReferenceBody::points(vec![DVec3::new(f64::NAN, 0.0, 0.0)]).is_err());
        assert!(ReferenceBody::points(vec![DVec3::ONE]).is_ok());
    }
}
