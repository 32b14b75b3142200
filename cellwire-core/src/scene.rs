/// Scene: an ordered collection of shapes seen through one camera
use log::trace;

use crate::geometry::Vector3;
use crate::planar::Polygon2;
use crate::projection::{Camera, Viewport};
use crate::raster::Surface;
use crate::shape::{Face, Shape};
use crate::transform::Transform;

/// Owns every shape for its lifetime and draws them in insertion order.
///
/// There is no depth sorting: shapes added later paint over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            shapes: Vec::new(),
        }
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn add_shapes(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        self.shapes.extend(shapes);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Projects faces to screen-space polygons, lazily and in input order.
    ///
    /// With `cull_back_faces`, faces of three or more vertices that turn
    /// away from the camera are skipped; the survivors keep their relative
    /// order.
    pub fn project<'a, I>(
        &'a self,
        faces: I,
        cull_back_faces: bool,
        viewport: Viewport,
    ) -> impl Iterator<Item = Polygon2> + 'a
    where
        I: IntoIterator<Item = Face>,
        I::IntoIter: 'a,
    {
        let camera = self.camera;
        faces
            .into_iter()
            .filter(move |face| !(cull_back_faces && camera.is_back_facing(face)))
            .map(move |face| {
                Polygon2::new(
                    face.iter()
                        .map(|vertex| camera.project_point(vertex, viewport))
                        .collect(),
                )
            })
    }

    /// Draws every shape onto `surface`, querying its size once.
    ///
    /// Returns the number of marks placed.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let viewport = Viewport::from(surface.size());
        let placed: usize = self
            .shapes
            .iter()
            .map(|shape| shape.draw(self, surface, viewport))
            .sum();
        trace!(
            "drew {} shapes into {}x{}: {} marks",
            self.shapes.len(),
            viewport.width,
            viewport.height,
            placed
        );
        placed
    }

    pub fn rotate_x(&mut self, angle: f32) {
        for shape in &mut self.shapes {
            shape.rotate_x(angle);
        }
    }

    pub fn rotate_y(&mut self, angle: f32) {
        for shape in &mut self.shapes {
            shape.rotate_y(angle);
        }
    }

    pub fn rotate_z(&mut self, angle: f32) {
        for shape in &mut self.shapes {
            shape.rotate_z(angle);
        }
    }

    pub fn rotate_about(&mut self, axis: &Vector3, angle: f32) {
        for shape in &mut self.shapes {
            shape.rotate_about(axis, angle);
        }
    }

    pub fn translate(&mut self, delta: &Vector3) {
        for shape in &mut self.shapes {
            shape.translate(delta);
        }
    }
}
