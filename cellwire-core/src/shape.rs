/// Bodies that can be placed in a scene: segments, triangles, meshes and
/// coordinate-frame markers
use std::f32::consts::PI;
use std::path::Path;

use crate::geometry::{Vector3, Vector3Ext};
use crate::projection::Viewport;
use crate::raster::{draw_polygon, Color, Surface};
use crate::scene::Scene;
use crate::stl::{self, StlError};
use crate::transform::Transform;

/// One face as an ordered ring of vertex positions
pub type Face = Vec<Vector3>;

/// Axis colors of a coordinate frame marker, in X, Y, Z order
pub const CSYS_COLORS: [Color; 3] = [Color::Red, Color::Yellow, Color::Magenta];

/// A straight segment between two points, drawn as a line
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    nodes: [Vector3; 2],
}

impl Segment {
    pub fn new(from: Vector3, to: Vector3) -> Self {
        Self { nodes: [from, to] }
    }

    pub fn from(&self) -> Vector3 {
        self.nodes[0]
    }

    pub fn to(&self) -> Vector3 {
        self.nodes[1]
    }
}

/// A single triangular face
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    nodes: [Vector3; 3],
}

impl Triangle {
    pub fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self { nodes: [a, b, c] }
    }
}

/// Coordinate frame marker: an origin and the tips of its three axes
#[derive(Debug, Clone, PartialEq)]
pub struct Csys {
    nodes: [Vector3; 4],
}

impl Csys {
    pub fn new(center: Vector3, size: f32) -> Self {
        Self {
            nodes: [
                center,
                center + Vector3::x() * size,
                center + Vector3::y() * size,
                center + Vector3::z() * size,
            ],
        }
    }

    pub fn center(&self) -> Vector3 {
        self.nodes[0]
    }

    pub fn axis_x(&self) -> Vector3 {
        self.nodes[1] - self.nodes[0]
    }

    pub fn axis_y(&self) -> Vector3 {
        self.nodes[2] - self.nodes[0]
    }

    pub fn axis_z(&self) -> Vector3 {
        self.nodes[3] - self.nodes[0]
    }
}

/// Indexed polygon mesh.
///
/// Vertices are shared between faces by value: adding a face whose vertex
/// equals one already stored reuses that index instead of appending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vector3>,
    faces: Vec<Vec<usize>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(faces),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Appends a face, deduplicating its vertices against existing ones.
    ///
    /// The lookup is a linear scan per vertex.
    pub fn add_face(&mut self, nodes: &[Vector3]) {
        let indices = nodes.iter().map(|node| self.index_of_or_insert(node)).collect();
        self.faces.push(indices);
    }

    fn index_of_or_insert(&mut self, node: &Vector3) -> usize {
        match self.vertices.iter().position(|v| v == node) {
            Some(index) => index,
            None => {
                self.vertices.push(*node);
                self.vertices.len() - 1
            }
        }
    }

    /// Vertex index lists, one per face
    pub fn face_indices(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Current vertex positions of every face, rebuilt on each call.
    pub fn faces(&self) -> Vec<Face> {
        self.faces
            .iter()
            .map(|indices| indices.iter().map(|&i| self.vertices[i]).collect())
            .collect()
    }
}

impl Transform for Mesh {
    fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    fn vertices_mut(&mut self) -> &mut [Vector3] {
        &mut self.vertices
    }
}

/// The closed set of shape geometries
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Segment(Segment),
    Triangle(Triangle),
    Mesh(Mesh),
    Csys(Csys),
}

impl Body {
    /// Current faces, rebuilt from the vertex values on each call.
    pub fn faces(&self) -> Vec<Face> {
        match self {
            Body::Segment(s) => vec![s.nodes.to_vec()],
            Body::Triangle(t) => vec![t.nodes.to_vec()],
            Body::Mesh(m) => m.faces(),
            Body::Csys(c) => {
                let [origin, x, y, z] = c.nodes;
                vec![vec![origin, x], vec![origin, y], vec![origin, z]]
            }
        }
    }
}

impl Transform for Body {
    fn vertices(&self) -> &[Vector3] {
        match self {
            Body::Segment(s) => &s.nodes,
            Body::Triangle(t) => &t.nodes,
            Body::Mesh(m) => m.vertices(),
            Body::Csys(c) => &c.nodes,
        }
    }

    fn vertices_mut(&mut self) -> &mut [Vector3] {
        match self {
            Body::Segment(s) => &mut s.nodes,
            Body::Triangle(t) => &mut t.nodes,
            Body::Mesh(m) => m.vertices_mut(),
            Body::Csys(c) => &mut c.nodes,
        }
    }
}

/// A colored body that draws itself through a scene's projection
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub color: Color,
    pub cull_back_faces: bool,
    body: Body,
}

impl Shape {
    pub fn new(body: Body, color: Color) -> Self {
        Self {
            color,
            cull_back_faces: false,
            body,
        }
    }

    pub fn with_culling(mut self, cull_back_faces: bool) -> Self {
        self.cull_back_faces = cull_back_faces;
        self
    }

    pub fn segment(from: Vector3, to: Vector3, color: Color) -> Self {
        Self::new(Body::Segment(Segment::new(from, to)), color)
    }

    pub fn triangle(a: Vector3, b: Vector3, c: Vector3, color: Color) -> Self {
        Self::new(Body::Triangle(Triangle::new(a, b, c)), color)
    }

    pub fn mesh(mesh: Mesh, color: Color) -> Self {
        Self::new(Body::Mesh(mesh), color)
    }

    pub fn csys(center: Vector3, size: f32) -> Self {
        Self::new(Body::Csys(Csys::new(center, size)), Color::default())
    }

    /// Flat `dx` by `dy` rectangle in the XY plane facing +Z.
    pub fn rectangle(center: Vector3, dx: f32, dy: f32, color: Color) -> Self {
        let (hx, hy) = (dx / 2.0, dy / 2.0);
        let mut mesh = Mesh::with_capacity(1);
        mesh.add_face(&[
            center + Vector3::new(-hx, -hy, 0.0),
            center + Vector3::new(hx, -hy, 0.0),
            center + Vector3::new(hx, hy, 0.0),
            center + Vector3::new(-hx, hy, 0.0),
        ]);
        Self::mesh(mesh, color)
    }

    /// Axis-aligned box with outward-wound faces in the order
    /// +Z, +X, -Z, -X, -Y, +Y.
    pub fn cuboid(center: Vector3, dx: f32, dy: f32, dz: f32, color: Color) -> Self {
        let (hx, hy, hz) = (dx / 2.0, dy / 2.0, dz / 2.0);
        let corner = |sx: f32, sy: f32, sz: f32| center + Vector3::new(sx * hx, sy * hy, sz * hz);

        let a = corner(-1.0, -1.0, 1.0);
        let b = corner(1.0, -1.0, 1.0);
        let c = corner(1.0, 1.0, 1.0);
        let d = corner(-1.0, 1.0, 1.0);
        let e = corner(-1.0, -1.0, -1.0);
        let f = corner(1.0, -1.0, -1.0);
        let g = corner(1.0, 1.0, -1.0);
        let h = corner(-1.0, 1.0, -1.0);

        let mut mesh = Mesh::with_capacity(6);
        mesh.add_face(&[a, b, c, d]);
        mesh.add_face(&[f, g, c, b]);
        mesh.add_face(&[e, h, g, f]);
        mesh.add_face(&[a, d, h, e]);
        mesh.add_face(&[b, a, e, f]);
        mesh.add_face(&[d, c, g, h]);
        Self::mesh(mesh, color).with_culling(true)
    }

    /// Tetrahedron with its base on a circle of `radius` at `z = -height/4`
    /// and its apex at `z = 3 * height / 4`, moved to `center`.
    pub fn tetrahedron(center: Vector3, radius: f32, height: f32, color: Color) -> Self {
        let base = -height / 4.0;
        let a = center + Vector3::from_cylindrical(radius, 0.0, base);
        let b = center + Vector3::from_cylindrical(radius, -2.0 * PI / 3.0, base);
        let c = center + Vector3::from_cylindrical(radius, 2.0 * PI / 3.0, base);
        let d = center + Vector3::new(0.0, 0.0, 3.0 * height / 4.0);

        let mut mesh = Mesh::with_capacity(4);
        mesh.add_face(&[a, b, c]);
        mesh.add_face(&[b, d, c]);
        mesh.add_face(&[c, d, a]);
        mesh.add_face(&[a, d, b]);
        Self::mesh(mesh, color).with_culling(true)
    }

    /// Loads a binary or ASCII STL file as a back-face-culled mesh.
    ///
    /// See [`stl::read_mesh`] for the recentering and orientation applied.
    pub fn stl(path: impl AsRef<Path>, color: Color, scale: f32) -> Result<Self, StlError> {
        let mesh = stl::read_mesh(path, scale)?;
        Ok(Self::mesh(mesh, color).with_culling(true))
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.body {
            Body::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.body {
            Body::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Current faces, rebuilt from the vertex values on each call so they
    /// always reflect the latest transform.
    pub fn faces(&self) -> Vec<Face> {
        self.body.faces()
    }

    /// Projects this shape through `scene` and rasterizes it onto `surface`.
    ///
    /// Coordinate frames ignore `color` and culling and paint each axis in
    /// its own color. Returns the number of marks placed.
    pub fn draw<S: Surface + ?Sized>(&self, scene: &Scene, surface: &mut S, viewport: Viewport) -> usize {
        match &self.body {
            Body::Csys(_) => scene
                .project(self.faces(), false, viewport)
                .zip(CSYS_COLORS)
                .map(|(axis, color)| draw_polygon(surface, &axis, color))
                .sum(),
            _ => scene
                .project(self.faces(), self.cull_back_faces, viewport)
                .map(|polygon| draw_polygon(surface, &polygon, self.color))
                .sum(),
        }
    }
}

impl Transform for Shape {
    fn vertices(&self) -> &[Vector3] {
        self.body.vertices()
    }

    fn vertices_mut(&mut self) -> &mut [Vector3] {
        self.body.vertices_mut()
    }
}
