/// cellwire core library - wireframe scenes rasterized into character cells
///
/// This library holds everything that does not touch a terminal: vector
/// math, shapes and their transforms, the camera projection with back-face
/// culling, line rasterization onto an abstract cell surface, and STL loading.

pub mod geometry;
pub mod planar;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod shape;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use geometry::{Point2, Vector2, Vector2Ext, Vector3, Vector3Ext};
pub use planar::{Line2, LineTo, Polygon2, Triangle2};
pub use projection::{Camera, Viewport};
pub use raster::{Color, Mark, MarkKind, Surface};
pub use scene::Scene;
pub use shape::{Body, Face, Mesh, Shape};
pub use stl::StlError;
pub use transform::{Bounds, Transform};
