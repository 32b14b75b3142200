use std::f32::consts::PI;

use cellwire_core::{Camera, Color, Mark, MarkKind, Polygon2, Scene, Shape, Surface, Transform, Vector3, Viewport};

/// Keeps every accepted mark in placement order
struct Recorder {
    width: usize,
    height: usize,
    marks: Vec<(usize, usize, Mark)>,
}

impl Recorder {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            marks: Vec::new(),
        }
    }

    /// Distinct cells that received `color`, sorted by column then row
    fn cells(&self, color: Color) -> Vec<(usize, usize)> {
        let mut cells: Vec<_> = self
            .marks
            .iter()
            .filter(|(_, _, mark)| mark.color == color)
            .map(|&(col, row, _)| (col, row))
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }
}

impl Surface for Recorder {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn put(&mut self, col: usize, row: usize, mark: Mark) {
        self.marks.push((col, row, mark));
    }
}

fn cube_scene() -> Scene {
    let mut scene = Scene::new(Camera::new(3.0, 8.0));
    scene.add_shape(Shape::cuboid(Vector3::zeros(), 2.0, 2.0, 2.0, Color::Blue));
    scene
}

fn project_faces(scene: &Scene, keep: &[usize], viewport: Viewport) -> Vec<Polygon2> {
    let faces = scene.shapes()[0].faces();
    let picked: Vec<_> = keep.iter().map(|&i| faces[i].clone()).collect();
    scene.project(picked, false, viewport).collect()
}

#[test]
fn axis_aligned_cube_shows_only_its_front_face() {
    let scene = cube_scene();
    let viewport = Viewport::new(80, 40);

    let visible: Vec<_> = scene.project(scene.shapes()[0].faces(), true, viewport).collect();
    assert_eq!(visible, project_faces(&scene, &[0], viewport));

    let all: Vec<_> = scene.project(scene.shapes()[0].faces(), false, viewport).collect();
    assert_eq!(6, all.len());
}

#[test]
fn rotated_cube_culls_the_three_far_faces() {
    let mut scene = cube_scene();
    scene.rotate_y(-PI / 6.0);
    scene.rotate_x(PI / 6.0);
    let viewport = Viewport::new(80, 40);

    let visible: Vec<_> = scene.project(scene.shapes()[0].faces(), true, viewport).collect();
    assert_eq!(visible, project_faces(&scene, &[0, 1, 5], viewport));
}

#[test]
fn culling_is_skipped_when_disabled_on_the_shape() {
    let mut scene = Scene::new(Camera::new(3.0, 8.0));
    scene.add_shape(Shape::cuboid(Vector3::zeros(), 2.0, 2.0, 2.0, Color::Blue).with_culling(false));
    let mut culled = Recorder::new(80, 40);
    let mut full = Recorder::new(80, 40);

    cube_scene().draw(&mut culled);
    scene.draw(&mut full);
    assert!(full.marks.len() > culled.marks.len());
}

#[test]
fn segment_rasterizes_into_the_visible_cells() {
    let mut scene = Scene::new(Camera::new(1.0, 8.0).with_aspect(1.0));
    scene.add_shape(Shape::segment(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(4.0, 0.0, 0.0),
        Color::Green,
    ));

    // (5, 5) -> (25, 5) and back: only cells 5..=9 are on a 10x10 screen
    let mut surface = Recorder::new(10, 10);
    assert_eq!(10, scene.draw(&mut surface));
    assert_eq!(vec![(5, 5), (6, 5), (7, 5), (8, 5), (9, 5)], surface.cells(Color::Green));
    assert_eq!((5, 5, MarkKind::Node), (surface.marks[0].0, surface.marks[0].1, surface.marks[0].2.kind));
    assert!(surface.marks[1..9].iter().all(|m| m.2.kind == MarkKind::Stroke));
    assert_eq!((5, MarkKind::Node), (surface.marks[9].0, surface.marks[9].2.kind));

    // a larger model size shrinks the line to (5, 5) -> (7, 5)
    scene.camera.model_size = 10.0;
    let mut surface = Recorder::new(10, 10);
    assert_eq!(6, scene.draw(&mut surface));
    let kinds: Vec<_> = surface.marks.iter().map(|m| (m.0, m.1, m.2.kind)).collect();
    assert_eq!(
        vec![
            (5, 5, MarkKind::Node),
            (6, 5, MarkKind::Stroke),
            (7, 5, MarkKind::Node),
            (7, 5, MarkKind::Node),
            (6, 5, MarkKind::Stroke),
            (5, 5, MarkKind::Node),
        ],
        kinds
    );
}

#[test]
fn csys_paints_each_axis_in_its_own_color() {
    let mut scene = Scene::new(Camera::new(1.0, 8.0));
    scene.add_shape(Shape::csys(Vector3::zeros(), 0.2));
    let mut surface = Recorder::new(20, 20);
    scene.draw(&mut surface);

    assert_eq!(vec![(10, 10), (11, 10), (12, 10), (13, 10), (14, 10)], surface.cells(Color::Red));
    assert_eq!(vec![(10, 8), (10, 9), (10, 10)], surface.cells(Color::Yellow));
    // the Z axis points at the camera and collapses to a single node
    assert_eq!(vec![(10, 10)], surface.cells(Color::Magenta));
    assert!(surface
        .marks
        .iter()
        .filter(|m| m.2.color == Color::Magenta)
        .all(|m| m.2.kind == MarkKind::Node));
}

#[test]
fn odd_screen_centers_on_the_lower_middle_cell() {
    let mut scene = Scene::new(Camera::new(3.0, 8.0));
    scene.add_shape(Shape::segment(Vector3::zeros(), Vector3::zeros(), Color::Green));
    let mut surface = Recorder::new(81, 25);

    assert_eq!(2, scene.draw(&mut surface));
    assert_eq!(vec![(40, 12)], surface.cells(Color::Green));
}

#[test]
fn vertex_at_the_camera_plane_does_not_break_the_frame() {
    let mut scene = Scene::new(Camera::new(1.0, 8.0).with_aspect(1.0));
    scene.add_shape(Shape::segment(Vector3::zeros(), Vector3::new(0.0, 0.0, 8.0), Color::Red));
    let mut surface = Recorder::new(10, 10);

    assert_eq!(1, scene.draw(&mut surface));
    assert_eq!((5, 5), (surface.marks[0].0, surface.marks[0].1));
}

#[test]
fn later_shapes_paint_over_earlier_ones() {
    let mut scene = Scene::new(Camera::new(1.0, 8.0).with_aspect(1.0));
    scene.add_shapes([
        Shape::segment(Vector3::zeros(), Vector3::new(0.4, 0.0, 0.0), Color::Red),
        Shape::segment(Vector3::zeros(), Vector3::new(0.4, 0.0, 0.0), Color::Cyan),
    ]);
    let mut surface = Recorder::new(10, 10);
    scene.draw(&mut surface);

    assert_eq!(Color::Cyan, surface.marks.last().unwrap().2.color);
    assert_eq!(surface.cells(Color::Red), surface.cells(Color::Cyan));
}

#[test]
fn tetrahedron_always_hides_some_faces() {
    let mut scene = Scene::new(Camera::new(3.0, 8.0));
    scene.add_shape(Shape::tetrahedron(Vector3::zeros(), 1.0, 1.5, Color::White));
    let viewport = Viewport::new(80, 40);

    for step in 0..12 {
        scene.rotate_x(PI / 6.0);
        scene.rotate_about(&Vector3::new(1.0, 1.0, 0.0), step as f32 * 0.1);
        let faces = scene.shapes()[0].faces();
        let visible = scene.project(faces, true, viewport).count();
        assert!((1..4).contains(&visible), "{visible} faces visible at step {step}");
    }
    assert!(scene.shapes()[0].bounds().size().norm() > 0.0);
}
