/// Camera model and perspective projection onto the character grid
use crate::geometry::{face_center, face_normal, Vector2, Vector3};

/// Screen size in cells, read once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Half the shorter side, in whole cells; a model of nominal size
    /// reaches this far from the center.
    pub fn half_extent(&self) -> f32 {
        (self.width.min(self.height) / 2) as f32
    }

    /// Screen center in whole cells; odd sizes round down.
    pub fn center(&self) -> Vector2 {
        Vector2::new((self.width / 2) as f32, (self.height / 2) as f32)
    }
}

impl From<(usize, usize)> for Viewport {
    fn from((width, height): (usize, usize)) -> Self {
        Self::new(width, height)
    }
}

/// Pinhole camera on the +Z axis looking at the origin.
///
/// `model_size` normalizes the scene so that a model of that extent fills
/// most of the screen. `aspect` widens x to make up for character cells
/// being taller than they are wide. Projection is only well behaved while
/// every vertex stays in front of the camera (`z < distance`); vertices at or
/// behind it project to mirrored or non-finite coordinates, which the
/// rasterizer drops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub model_size: f32,
    pub distance: f32,
    pub aspect: f32,
}

impl Camera {
    pub const DEFAULT_ASPECT: f32 = 2.0;

    pub fn new(model_size: f32, distance: f32) -> Self {
        Self {
            model_size,
            distance,
            aspect: Self::DEFAULT_ASPECT,
        }
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Unit vector from the origin towards the camera
    pub fn axis() -> Vector3 {
        Vector3::z()
    }

    pub fn position(&self) -> Vector3 {
        Self::axis() * self.distance
    }

    /// Projects a model-space vertex to screen coordinates (x right, y down).
    pub fn project_point(&self, vertex: &Vector3, viewport: Viewport) -> Vector2 {
        let half = viewport.half_extent();
        let center = viewport.center();
        let perspective = self.distance / (self.model_size * (self.distance - vertex.z));
        Vector2::new(
            center.x + self.aspect * half * perspective * vertex.x,
            center.y - half * perspective * vertex.y,
        )
    }

    /// Whether a face turns its front away from the camera.
    ///
    /// The eye vector runs from the camera to the face centroid; a face is
    /// back-facing when its normal has a strictly positive component along
    /// it. Faces with fewer than three vertices, and zero-area faces whose
    /// normal vanishes, are never back-facing.
    pub fn is_back_facing(&self, face: &[Vector3]) -> bool {
        if face.len() < 3 {
            return false;
        }
        let normal = face_normal(face);
        let eye = face_center(face) - self.position();
        eye.dot(&normal) > 0.0
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(3.0, 8.0)
    }
}
