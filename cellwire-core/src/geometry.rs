/// Vector algebra shared by model space and screen space
use nalgebra as na;

/// A 2D vector in screen space (x grows right, y grows down)
pub type Vector2 = na::Vector2<f32>;

/// A 3D vector in model space (right-handed, camera on +Z)
pub type Vector3 = na::Vector3<f32>;

/// A position in screen space.
///
/// Every `Vector2` converts into a `Point2` with `.into()`, so functions
/// that take `impl Into<Point2>` accept either.
pub type Point2 = na::Point2<f32>;

/// 2D operations that nalgebra either lacks or defines differently.
pub trait Vector2Ext: Sized {
    /// Builds a vector from polar coordinates (angle in radians).
    fn from_polar(r: f32, theta: f32) -> Self;

    /// Unit vector in the same direction.
    ///
    /// Unlike `normalize`, the zero vector is returned unchanged instead of
    /// turning into NaN, and unit vectors are returned as-is.
    fn safe_normalize(&self) -> Self;

    /// Scalar 2D cross product `x * o.y - y * o.x`.
    fn wedge(&self, other: &Self) -> f32;

    /// Perpendicular vector `(y, -x)` scaled by `factor`.
    fn cross_scalar(&self, factor: f32) -> Self;

    /// Rotates counter-clockwise by `angle` radians.
    fn rotate(&self, angle: f32) -> Self;
}

impl Vector2Ext for Vector2 {
    fn from_polar(r: f32, theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Vector2::new(r * cos, r * sin)
    }

    fn safe_normalize(&self) -> Self {
        let m2 = self.norm_squared();
        if m2 > 0.0 && m2 != 1.0 {
            *self / m2.sqrt()
        } else {
            *self
        }
    }

    fn wedge(&self, other: &Self) -> f32 {
        self.perp(other)
    }

    fn cross_scalar(&self, factor: f32) -> Self {
        Vector2::new(self.y * factor, -self.x * factor)
    }

    fn rotate(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector2::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }
}

/// 3D operations that nalgebra either lacks or defines differently.
///
/// All rotations are right-handed with the angle in radians.
pub trait Vector3Ext: Sized {
    /// Builds a vector from cylindrical coordinates about the Z axis.
    fn from_cylindrical(r: f32, theta: f32, z: f32) -> Self;

    /// Unit vector in the same direction; the zero vector stays zero.
    fn safe_normalize(&self) -> Self;

    fn rotate_x(&self, angle: f32) -> Self;
    fn rotate_y(&self, angle: f32) -> Self;
    fn rotate_z(&self, angle: f32) -> Self;

    /// Rotates about an arbitrary axis through the origin (Rodrigues).
    ///
    /// The axis is normalized first. A zero axis leaves the vector unchanged.
    fn rotate_about(&self, axis: &Self, angle: f32) -> Self;
}

impl Vector3Ext for Vector3 {
    fn from_cylindrical(r: f32, theta: f32, z: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Vector3::new(r * cos, r * sin, z)
    }

    fn safe_normalize(&self) -> Self {
        let m2 = self.norm_squared();
        if m2 > 0.0 && m2 != 1.0 {
            *self / m2.sqrt()
        } else {
            *self
        }
    }

    fn rotate_x(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector3::new(
            self.x,
            self.y * cos - self.z * sin,
            self.y * sin + self.z * cos,
        )
    }

    fn rotate_y(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector3::new(
            self.x * cos + self.z * sin,
            self.y,
            -self.x * sin + self.z * cos,
        )
    }

    fn rotate_z(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector3::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    fn rotate_about(&self, axis: &Self, angle: f32) -> Self {
        let k = axis.safe_normalize();
        let (sin, cos) = angle.sin_cos();

        // v + sin(t) k x v + (1 - cos(t)) k x (k x v)
        let k_cross_v = k.cross(self);
        *self + k_cross_v * sin + k.cross(&k_cross_v) * (1.0 - cos)
    }
}

/// Mean of the face vertices; zero for an empty face.
pub fn face_center(face: &[Vector3]) -> Vector3 {
    if face.is_empty() {
        return Vector3::zeros();
    }
    let sum = face.iter().fold(Vector3::zeros(), |acc, v| acc + v);
    sum / face.len() as f32
}

/// Unit normal of a face from the sum of cross products around its ring.
///
/// This is Newell's method, so non-planar and nearly degenerate faces still
/// get a sensible direction. Counter-clockwise winding seen from the front
/// gives a normal pointing towards the viewer. Faces with fewer than three
/// vertices or zero area yield the zero vector.
pub fn face_normal(face: &[Vector3]) -> Vector3 {
    face.iter()
        .zip(face.iter().cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (a, b)| acc + a.cross(b))
        .safe_normalize()
}
