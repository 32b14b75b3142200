/// Rasterization of screen-space primitives into character cells
use std::ops::RangeInclusive;

use crate::geometry::Point2;
use crate::planar::{Line2, Polygon2, Triangle2};

/// Lines shorter than this (in cells, along the longer axis) are drawn as a
/// single mark.
pub const HALF_CELL: f32 = 0.5;

/// The eight basic terminal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    #[default]
    White,
}

/// What kind of mark a cell receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Line endpoints and isolated points.
    Node,
    /// Interior steps of a line.
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mark {
    pub kind: MarkKind,
    pub color: Color,
}

impl Mark {
    pub fn node(color: Color) -> Self {
        Self { kind: MarkKind::Node, color }
    }

    pub fn stroke(color: Color) -> Self {
        Self { kind: MarkKind::Stroke, color }
    }
}

/// A grid of character cells that can receive marks.
///
/// Implementors provide the size and raw cell writes; validation of float
/// coordinates happens in [`Surface::try_place_mark`].
pub trait Surface {
    /// Width and height in cells.
    fn size(&self) -> (usize, usize);

    /// Writes a mark into an in-bounds cell.
    fn put(&mut self, col: usize, row: usize, mark: Mark);

    /// Places a mark at the cell nearest to `(x, y)`.
    ///
    /// Returns false, leaving the surface untouched, for NaN or infinite
    /// coordinates and for cells outside `[0, width) x [0, height)`.
    fn try_place_mark(&mut self, x: f32, y: f32, mark: Mark) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let col = (x + 0.5).floor();
        let row = (y + 0.5).floor();
        if col < 0.0 || row < 0.0 {
            return false;
        }
        let (width, height) = self.size();
        if col >= width as f32 || row >= height as f32 {
            return false;
        }
        self.put(col as usize, row as usize, mark);
        true
    }
}

/// Draws a single node mark at `point`.
pub fn draw_point<S: Surface + ?Sized>(surface: &mut S, point: impl Into<Point2>, color: Color) -> bool {
    let p = point.into();
    surface.try_place_mark(p.x, p.y, Mark::node(color))
}

/// Draws a line by stepping linearly from `from` to `to`.
///
/// The number of steps is the floor of the larger axis delta; both ends get
/// node marks and the steps in between get stroke marks. Lines spanning less
/// than a cell collapse to one node at `from`. Only the steps that can land
/// on the surface are visited, so lines running far off screen stay cheap.
/// Returns how many marks landed.
pub fn draw_line<S: Surface + ?Sized>(surface: &mut S, line: &Line2, color: Color) -> usize {
    let span = line.span();
    if !span.is_finite() || span < HALF_CELL {
        return usize::from(draw_point(surface, line.from, color));
    }
    let steps = span.floor() as usize;
    if steps == 0 {
        return usize::from(draw_point(surface, line.from, color));
    }
    let Some(visible) = visible_steps(line, steps, surface.size()) else {
        return 0;
    };

    let delta = line.to - line.from;
    let mut placed = 0;
    for i in visible {
        let at = line.from + delta * (i as f32 / steps as f32);
        let mark = if i == 0 || i == steps {
            Mark::node(color)
        } else {
            Mark::stroke(color)
        };
        if surface.try_place_mark(at.x, at.y, mark) {
            placed += 1;
        }
    }
    placed
}

/// Step indices of `line` whose points may round into a `(width, height)`
/// grid, padded by one step on each side; `None` when the line misses it.
fn visible_steps(line: &Line2, steps: usize, (width, height): (usize, usize)) -> Option<RangeInclusive<usize>> {
    let delta = line.to - line.from;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (start, d, cells) in [(line.from.x, delta.x, width), (line.from.y, delta.y, height)] {
        // cell c accepts coordinates in [c - 0.5, c + 0.5)
        let (lo, hi) = (-HALF_CELL, cells as f32 - HALF_CELL);
        if d == 0.0 {
            if start < lo || start >= hi {
                return None;
            }
        } else {
            let (a, b) = ((lo - start) / d, (hi - start) / d);
            t0 = t0.max(a.min(b));
            t1 = t1.min(a.max(b));
        }
    }
    if t0 > t1 {
        return None;
    }
    let n = steps as f32;
    let first = ((t0 * n).floor() as usize).saturating_sub(1).min(steps);
    let last = ((t1 * n).ceil() as usize).saturating_add(1).min(steps);
    Some(first..=last)
}

pub fn draw_triangle<S: Surface + ?Sized>(surface: &mut S, triangle: &Triangle2, color: Color) -> usize {
    triangle
        .edges()
        .iter()
        .map(|edge| draw_line(surface, edge, color))
        .sum()
}

/// Draws every edge of the polygon; a one-vertex polygon draws a node.
pub fn draw_polygon<S: Surface + ?Sized>(surface: &mut S, polygon: &Polygon2, color: Color) -> usize {
    match polygon.vertices() {
        [] => 0,
        [single] => usize::from(draw_point(surface, *single, color)),
        _ => polygon
            .edges()
            .iter()
            .map(|edge| draw_line(surface, edge, color))
            .sum(),
    }
}
