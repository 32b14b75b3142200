/// Terminal front end: frame loop, key handling and the cell buffer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    terminal::{self},
};
use log::{debug, trace};
use std::f32::consts::PI;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use cellwire_core::{Color, Scene};

pub mod renderer;

pub use renderer::{CellBuffer, RenderMode};

/// Rotation applied per key press, in radians
pub const NUDGE: f32 = PI / 24.0;

/// Frame loop settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Rotation about X applied after each frame, in radians.
    pub spin: f32,
    /// Shortest time one frame may take; faster frames sleep the rest.
    pub frame_time: Duration,
    pub render_mode: RenderMode,
    /// Text shown in a narrow column at the top right.
    pub caption: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spin: PI / 32.0,
            frame_time: Duration::from_millis(50),
            render_mode: RenderMode::Overwrite,
            caption: "3D Wireframe of mesh and/or STL file.".to_string(),
        }
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    scene: Scene,
    config: AppConfig,
    buffer: CellBuffer,
    running: bool,
    paused: bool,
    frames: u32,
    started: Instant,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(scene, config, width as usize, height as usize))
    }

    pub fn with_size(scene: Scene, config: AppConfig, width: usize, height: usize) -> Self {
        Self {
            scene,
            config,
            buffer: CellBuffer::new(width, height),
            running: true,
            paused: false,
            frames: 0,
            started: Instant::now(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.started = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            if self.paused {
                self.frames = 0;
                self.started = frame_start;
            } else {
                self.frames += 1;
                self.compose_frame();
                self.present()?;
                self.scene.rotate_x(self.config.spin);
            }

            // Handle input
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < self.config.frame_time {
                std::thread::sleep(self.config.frame_time - elapsed);
            }
        }

        debug!("stopped after {} frames", self.frames);
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                debug!("terminal resized to {}x{}", width, height);
                self.buffer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
            }
            KeyCode::Char('w') | KeyCode::Up => self.scene.rotate_x(-NUDGE),
            KeyCode::Char('s') | KeyCode::Down => self.scene.rotate_x(NUDGE),
            KeyCode::Char('a') | KeyCode::Left => self.scene.rotate_y(-NUDGE),
            KeyCode::Char('d') | KeyCode::Right => self.scene.rotate_y(NUDGE),
            KeyCode::Char('e') => self.scene.rotate_z(NUDGE),
            KeyCode::Char('r') => self.scene.rotate_z(-NUDGE),
            _ => {}
        }
    }

    /// Rebuilds the buffer: border, caption, frame counter, then the scene
    /// on top of all of them.
    pub fn compose_frame(&mut self) {
        let width = self.buffer.width();
        self.buffer.clear();
        self.buffer.draw_border(Color::White);
        self.buffer
            .add_text(width.saturating_sub(12), 1, &self.config.caption, Color::White, Some(10));

        let seconds = self.started.elapsed().as_secs_f32();
        let fps = if seconds > 0.0 {
            self.frames as f32 / seconds
        } else {
            0.0
        };
        let status = format!("Frame={:<4}, FPS={:<6.2}", self.frames, fps);
        self.buffer.add_text(2, 1, &status, Color::Yellow, None);

        let placed = self.scene.draw(&mut self.buffer);
        trace!("frame {}: {} marks", self.frames, placed);
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.buffer.render(&mut stdout, self.config.render_mode)?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellwire_core::{Camera, Shape, Transform, Vector3};
    use crossterm::event::KeyModifiers;
    use renderer::{Cell, NODE_GLYPH};

    fn app() -> TerminalApp {
        let mut scene = Scene::new(Camera::default());
        scene.add_shape(Shape::cuboid(Vector3::zeros(), 2.0, 2.0, 2.0, Color::Blue));
        TerminalApp::with_size(scene, AppConfig::default(), 60, 24)
    }

    #[test]
    fn test_quit_and_pause_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char(' '));
        assert!(app.is_paused());
        app.handle_key(KeyCode::Char(' '));
        assert!(!app.is_paused());

        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_arrow_keys_rotate_the_scene() {
        let mut app = app();
        let before = app.scene().shapes()[0].vertices().to_vec();
        app.handle_key(KeyCode::Right);
        assert_ne!(before, app.scene().shapes()[0].vertices());

        app.handle_key(KeyCode::Left);
        for (a, b) in before.iter().zip(app.scene().shapes()[0].vertices()) {
            assert!((a - b).norm() < 1e-5);
        }
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_event(Event::Key(release));
        assert!(app.is_running());

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!app.is_running());
    }

    #[test]
    fn test_resize_event_resizes_buffer() {
        let mut app = app();
        app.handle_event(Event::Resize(30, 10));
        assert_eq!((app.buffer().width(), app.buffer().height()), (30, 10));
    }

    #[test]
    fn test_compose_frame_draws_border_status_and_scene() {
        let mut app = app();
        app.compose_frame();
        let buffer = app.buffer();

        assert!(buffer.row_text(0).starts_with("#==="));
        assert!(buffer.row_text(1).starts_with("# Frame=0"));
        let wire = (2..23)
            .flat_map(|row| buffer.row_text(row).chars().collect::<Vec<_>>())
            .filter(|&c| c == NODE_GLYPH || c == renderer::STROKE_GLYPH)
            .count();
        assert!(wire > 0);
    }

    #[test]
    fn test_scene_paints_over_the_status_line() {
        // centered at (30, 12) with half extent 12: this runs along row 1
        // from column 4 to column 10
        let mut scene = Scene::new(Camera::new(1.0, 8.0).with_aspect(1.0));
        scene.add_shape(Shape::segment(
            Vector3::new(-26.0 / 12.0, 11.0 / 12.0, 0.0),
            Vector3::new(-20.0 / 12.0, 11.0 / 12.0, 0.0),
            Color::Green,
        ));
        let mut app = TerminalApp::with_size(scene, AppConfig::default(), 60, 24);
        app.compose_frame();

        assert_eq!(app.buffer().get(4, 1), Some(Cell::new(NODE_GLYPH, Color::Green)));
        assert_eq!(app.buffer().get(2, 1).map(|cell| cell.glyph), Some('F'));
    }
}
