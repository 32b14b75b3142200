/// In-place rigid transforms over owned vertex lists
use crate::geometry::{Vector3, Vector3Ext};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector3,
    pub max: Vector3,
}

impl Bounds {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every vertex; a zero box when there are none.
    pub fn of(vertices: &[Vector3]) -> Self {
        let Some((first, rest)) = vertices.split_first() else {
            return Self::new(Vector3::zeros(), Vector3::zeros());
        };
        rest.iter().fold(Self::new(*first, *first), |b, v| {
            Self::new(b.min.inf(v), b.max.sup(v))
        })
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }
}

/// Anything that owns a vertex list and can be moved rigidly in place.
///
/// Transforms rewrite vertex values only; the number and order of vertices
/// never changes, so face index lists stay valid.
pub trait Transform {
    fn vertices(&self) -> &[Vector3];
    fn vertices_mut(&mut self) -> &mut [Vector3];

    /// Replaces every vertex with `f(vertex)`.
    fn map_vertices<F>(&mut self, mut f: F)
    where
        F: FnMut(&Vector3) -> Vector3,
    {
        for vertex in self.vertices_mut() {
            *vertex = f(vertex);
        }
    }

    fn rotate_x(&mut self, angle: f32) {
        self.map_vertices(|v| v.rotate_x(angle));
    }

    fn rotate_y(&mut self, angle: f32) {
        self.map_vertices(|v| v.rotate_y(angle));
    }

    fn rotate_z(&mut self, angle: f32) {
        self.map_vertices(|v| v.rotate_z(angle));
    }

    fn rotate_about(&mut self, axis: &Vector3, angle: f32) {
        self.map_vertices(|v| v.rotate_about(axis, angle));
    }

    fn translate(&mut self, delta: &Vector3) {
        self.map_vertices(|v| v + delta);
    }

    /// Uniform scale about the origin.
    fn scale(&mut self, factor: f32) {
        self.scale_about(factor, &Vector3::zeros());
    }

    /// Uniform scale about `center`; a factor of exactly 1 is a no-op.
    fn scale_about(&mut self, factor: f32, center: &Vector3) {
        if factor == 1.0 {
            return;
        }
        self.map_vertices(|v| center + (v - center) * factor);
    }

    fn bounds(&self) -> Bounds {
        Bounds::of(self.vertices())
    }
}

impl Transform for Vec<Vector3> {
    fn vertices(&self) -> &[Vector3] {
        self
    }

    fn vertices_mut(&mut self) -> &mut [Vector3] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_empty_bounds_are_zero() {
        let empty: Vec<Vector3> = Vec::new();
        let bounds = empty.bounds();
        assert_eq!(bounds.min, Vector3::zeros());
        assert_eq!(bounds.max, Vector3::zeros());
    }

    #[test]
    fn test_bounds_cover_all_vertices() {
        let vertices = vec![
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(-4.0, 5.0, 0.5),
            Vector3::new(2.0, 0.0, -1.0),
        ];
        let bounds = vertices.bounds();
        assert_eq!(bounds.min, Vector3::new(-4.0, -2.0, -1.0));
        assert_eq!(bounds.max, Vector3::new(2.0, 5.0, 3.0));
        assert_eq!(bounds.center(), Vector3::new(-1.0, 1.5, 1.0));
        assert_eq!(bounds.size(), Vector3::new(6.0, 7.0, 4.0));
    }

    #[test]
    fn test_translate_and_scale_in_place() {
        let mut vertices = vec![Vector3::new(1.0, 1.0, 1.0), Vector3::new(3.0, 1.0, 1.0)];
        vertices.translate(&Vector3::new(1.0, 0.0, -1.0));
        assert_eq!(vertices[0], Vector3::new(2.0, 1.0, 0.0));

        vertices.scale_about(2.0, &Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(vertices[0], Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(vertices[1], Vector3::new(6.0, 1.0, 0.0));

        vertices.scale(0.5);
        assert_eq!(vertices[1], Vector3::new(3.0, 0.5, 0.0));
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn test_unit_scale_leaves_vertices_untouched() {
        let mut vertices = vec![Vector3::new(f32::NAN, 0.0, 0.0)];
        vertices.scale_about(1.0, &Vector3::new(1.0, 1.0, 1.0));
        assert!(vertices[0].x.is_nan());
        assert_eq!(vertices[0].y, 0.0);
    }

    #[test]
    fn test_rotation_applies_to_every_vertex() {
        let mut vertices = vec![Vector3::x(), Vector3::y()];
        vertices.rotate_z(PI / 2.0);
        assert!((vertices[0] - Vector3::y()).norm() < 1e-6);
        assert!((vertices[1] + Vector3::x()).norm() < 1e-6);
    }
}
