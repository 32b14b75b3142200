/// Screen-space primitives: lines, triangles and closed polygons
use std::fmt;
use std::ops::Add;

use crate::geometry::{Point2, Vector2};

/// A directed line segment in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    pub from: Vector2,
    pub to: Vector2,
}

impl Line2 {
    pub fn new(from: Vector2, to: Vector2) -> Self {
        Self { from, to }
    }

    /// Line across the full screen width at height `y`.
    pub fn horizontal(y: f32, width: usize) -> Self {
        Self::new(Vector2::new(0.0, y), Vector2::new(width as f32, y))
    }

    /// Line across the full screen height at column `x`.
    pub fn vertical(x: f32, height: usize) -> Self {
        Self::new(Vector2::new(x, 0.0), Vector2::new(x, height as f32))
    }

    pub fn between(a: impl Into<Point2>, b: impl Into<Point2>) -> Self {
        Self::new(a.into().coords, b.into().coords)
    }

    /// Unit vector from `from` towards `to`; NaN when both ends coincide.
    pub fn direction(&self) -> Vector2 {
        (self.to - self.from).normalize()
    }

    /// Unit vector perpendicular to the line, rotated +90 degrees from the
    /// direction; NaN when both ends coincide.
    pub fn normal(&self) -> Vector2 {
        let d = self.to - self.from;
        Vector2::new(-d.y, d.x).normalize()
    }

    /// Larger of the two axis deltas, the number of cells the line spans.
    pub fn span(&self) -> f32 {
        let d = self.to - self.from;
        d.x.abs().max(d.y.abs())
    }

    /// Parallel line shifted `distance` along the normal.
    pub fn offset(&self, distance: f32) -> Self {
        *self + self.normal() * distance
    }
}

impl Add<Vector2> for Line2 {
    type Output = Line2;

    fn add(self, delta: Vector2) -> Line2 {
        Line2::new(self.from + delta, self.to + delta)
    }
}

impl fmt::Display for Line2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line:({},{})->({},{})",
            self.from.x, self.from.y, self.to.x, self.to.y
        )
    }
}

/// Convenience for building lines from positions.
pub trait LineTo {
    fn line_to(&self, other: impl Into<Point2>) -> Line2;
}

impl LineTo for Point2 {
    fn line_to(&self, other: impl Into<Point2>) -> Line2 {
        Line2::between(*self, other)
    }
}

/// A screen-space triangle with edges a->b, b->c, c->a
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle2 {
    pub a: Vector2,
    pub b: Vector2,
    pub c: Vector2,
}

impl Triangle2 {
    pub fn new(a: Vector2, b: Vector2, c: Vector2) -> Self {
        Self { a, b, c }
    }

    pub fn edges(&self) -> [Line2; 3] {
        [
            Line2::new(self.a, self.b),
            Line2::new(self.b, self.c),
            Line2::new(self.c, self.a),
        ]
    }
}

impl Add<Vector2> for Triangle2 {
    type Output = Triangle2;

    fn add(self, delta: Vector2) -> Triangle2 {
        Triangle2::new(self.a + delta, self.b + delta, self.c + delta)
    }
}

/// A closed ring of screen-space vertices.
///
/// The edge list is derived once on construction: for `n > 1` vertices there
/// are exactly `n` edges chaining `v0 -> v1 -> ... -> v(n-1) -> v0`. A single
/// vertex (or none) has no edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2 {
    vertices: Vec<Vector2>,
    edges: Vec<Line2>,
}

impl Polygon2 {
    pub fn new(vertices: Vec<Vector2>) -> Self {
        let edges = Self::ring_edges(&vertices);
        Self { vertices, edges }
    }

    fn ring_edges(vertices: &[Vector2]) -> Vec<Line2> {
        if vertices.len() < 2 {
            return Vec::new();
        }
        vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(from, to)| Line2::new(*from, *to))
            .collect()
    }

    pub fn vertices(&self) -> &[Vector2] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Line2] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl From<Triangle2> for Polygon2 {
    fn from(triangle: Triangle2) -> Self {
        Polygon2::new(vec![triangle.a, triangle.b, triangle.c])
    }
}

impl Add<Vector2> for Polygon2 {
    type Output = Polygon2;

    fn add(self, delta: Vector2) -> Polygon2 {
        Polygon2::new(self.vertices.into_iter().map(|v| v + delta).collect())
    }
}

impl fmt::Display for Polygon2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Poly({}):", self.vertices.len())?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "({},{})", v.x, v.y)?;
        }
        Ok(())
    }
}
