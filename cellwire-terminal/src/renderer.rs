/// Character-cell frame buffer and its output to the terminal
use crossterm::{
    cursor::{MoveRight, MoveTo},
    queue,
    style::{self, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

use cellwire_core::{Color, Mark, MarkKind, Surface};

/// Glyph for line endpoints and isolated points
pub const NODE_GLYPH: char = '■';

/// Glyph for the interior steps of a line
pub const STROKE_GLYPH: char = '·';

/// Maps a scene color onto the terminal's bright palette.
pub fn term_color(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Black,
        Color::Red => style::Color::Red,
        Color::Green => style::Color::Green,
        Color::Yellow => style::Color::Yellow,
        Color::Blue => style::Color::Blue,
        Color::Magenta => style::Color::Magenta,
        Color::Cyan => style::Color::Cyan,
        Color::White => style::Color::White,
    }
}

/// How a finished frame is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RenderMode {
    /// Rewrite every cell, blanks included, without clearing first.
    #[default]
    Overwrite,
    /// Clear the screen, then move the cursor over runs of blank cells.
    SkipBlanks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::White,
    };

    pub fn new(glyph: char, color: Color) -> Self {
        Self { glyph, color }
    }

    pub fn is_blank(&self) -> bool {
        self.glyph == ' '
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        let glyph = match mark.kind {
            MarkKind::Node => NODE_GLYPH,
            MarkKind::Stroke => STROKE_GLYPH,
        };
        Cell::new(glyph, mark.color)
    }
}

/// Row-major grid of cells that the scene rasterizes into
pub struct CellBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Changes the grid size; the contents are blanked when it changes.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Cell> {
        if col < self.width && row < self.height {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = cell;
        }
    }

    pub fn row_text(&self, row: usize) -> String {
        self.row(row).iter().map(|cell| cell.glyph).collect()
    }

    fn row(&self, row: usize) -> &[Cell] {
        let start = (row * self.width).min(self.cells.len());
        let end = (start + self.width).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Writes `text` starting at `(col, row)`.
    ///
    /// Text longer than `wrap` columns (or than the space left on the row)
    /// continues on the following rows at the same column; rows past the
    /// bottom are dropped.
    pub fn add_text(&mut self, col: usize, row: usize, text: &str, color: Color, wrap: Option<usize>) {
        if col >= self.width {
            return;
        }
        let glyphs: Vec<char> = text.chars().collect();
        let width = wrap.unwrap_or(glyphs.len()).min(self.width - col);
        if width == 0 {
            return;
        }
        for (line, chunk) in glyphs.chunks(width).enumerate() {
            let y = row + line;
            if y >= self.height {
                break;
            }
            for (dx, &glyph) in chunk.iter().enumerate() {
                self.set(col + dx, y, Cell::new(glyph, color));
            }
        }
    }

    /// `=` along the top and bottom rows, `#` down both sides.
    pub fn draw_border(&mut self, color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let rule = "=".repeat(self.width);
        self.add_text(0, 0, &rule, color, None);
        self.add_text(0, self.height - 1, &rule, color, None);
        for row in 0..self.height {
            self.set(0, row, Cell::new('#', color));
            self.set(self.width - 1, row, Cell::new('#', color));
        }
    }

    /// Queues the whole buffer onto `out`; the caller flushes.
    pub fn render<W: Write>(&self, out: &mut W, mode: RenderMode) -> io::Result<()> {
        if mode == RenderMode::SkipBlanks {
            queue!(out, Clear(ClearType::All))?;
        }
        for row in 0..self.height {
            queue!(out, MoveTo(0, row as u16))?;
            let mut rest = self.row(row);
            while !rest.is_empty() {
                let (run, tail) = rest.split_at(run_len(rest, mode));
                let blank_gap = mode == RenderMode::SkipBlanks && run[0].is_blank();
                if blank_gap {
                    if !tail.is_empty() {
                        queue!(out, MoveRight(run.len() as u16))?;
                    }
                } else {
                    let text: String = run.iter().map(|cell| cell.glyph).collect();
                    queue!(out, SetForegroundColor(term_color(run[0].color)), Print(text))?;
                }
                rest = tail;
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}

/// Length of the leading run of cells written with one command.
fn run_len(cells: &[Cell], mode: RenderMode) -> usize {
    let Some(first) = cells.first() else {
        return 0;
    };
    let same = |cell: &Cell| match mode {
        RenderMode::SkipBlanks if first.is_blank() => cell.is_blank(),
        RenderMode::SkipBlanks => !cell.is_blank() && cell.color == first.color,
        RenderMode::Overwrite => cell.color == first.color,
    };
    cells.iter().take_while(|cell| same(cell)).count()
}

impl Surface for CellBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn put(&mut self, col: usize, row: usize, mark: Mark) {
        self.set(col, row, Cell::from(mark));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(buffer: &CellBuffer, mode: RenderMode) -> String {
        let mut out = Vec::new();
        buffer.render(&mut out, mode).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_marks_become_glyphs() {
        let mut buffer = CellBuffer::new(10, 5);
        assert!(buffer.try_place_mark(2.0, 3.0, Mark::node(Color::Red)));
        assert!(buffer.try_place_mark(3.4, 2.6, Mark::stroke(Color::Blue)));
        assert!(!buffer.try_place_mark(10.0, 0.0, Mark::node(Color::Red)));

        assert_eq!(buffer.get(2, 3), Some(Cell::new(NODE_GLYPH, Color::Red)));
        assert_eq!(buffer.get(3, 3), Some(Cell::new(STROKE_GLYPH, Color::Blue)));
        assert_eq!(buffer.get(10, 0), None);
    }

    #[test]
    fn test_add_text_wraps_at_width() {
        let mut buffer = CellBuffer::new(10, 4);
        buffer.add_text(6, 1, "abcdefg", Color::White, Some(3));
        assert_eq!(buffer.row_text(1), "      abc ");
        assert_eq!(buffer.row_text(2), "      def ");
        assert_eq!(buffer.row_text(3), "      g   ");
    }

    #[test]
    fn test_add_text_wraps_at_right_edge() {
        let mut buffer = CellBuffer::new(10, 2);
        buffer.add_text(8, 0, "hello", Color::Yellow, None);
        assert_eq!(buffer.row_text(0), "        he");
        // "o" would need a third row
        assert_eq!(buffer.row_text(1), "        ll");

        buffer.add_text(12, 0, "offscreen", Color::Yellow, None);
        assert_eq!(buffer.row_text(0), "        he");
    }

    #[test]
    fn test_border_and_clear() {
        let mut buffer = CellBuffer::new(5, 3);
        buffer.draw_border(Color::White);
        assert_eq!(buffer.row_text(0), "#===#");
        assert_eq!(buffer.row_text(1), "#   #");
        assert_eq!(buffer.row_text(2), "#===#");

        buffer.clear();
        assert!((0..3).all(|row| buffer.row_text(row) == "     "));
    }

    #[test]
    fn test_resize_blanks_contents() {
        let mut buffer = CellBuffer::new(4, 4);
        buffer.add_text(0, 0, "ab", Color::White, None);
        buffer.resize(4, 4);
        assert_eq!(buffer.row_text(0), "ab  ");

        buffer.resize(6, 2);
        assert_eq!(buffer.size(), (6, 2));
        assert_eq!(buffer.row_text(0), "      ");
    }

    #[test]
    fn test_overwrite_writes_every_cell() {
        let mut buffer = CellBuffer::new(4, 2);
        buffer.put(1, 0, Mark::node(Color::Green));
        let out = rendered(&buffer, RenderMode::Overwrite);

        assert_eq!(out.matches(' ').count(), 7);
        assert_eq!(out.matches(NODE_GLYPH).count(), 1);
        assert!(!out.contains("\x1b[2J"));
    }

    #[test]
    fn test_skip_blanks_moves_over_gaps() {
        let mut buffer = CellBuffer::new(8, 1);
        buffer.put(5, 0, Mark::stroke(Color::Green));
        let out = rendered(&buffer, RenderMode::SkipBlanks);

        assert!(out.starts_with("\x1b[2J"));
        assert!(out.contains("\x1b[5C"));
        assert!(!out.contains(' '));
        assert_eq!(out.matches(STROKE_GLYPH).count(), 1);
    }
}
