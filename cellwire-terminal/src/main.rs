/// cellwire - spinning wireframe models in the terminal
///
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - Space: Pause
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use cellwire_core::{Camera, Color, Scene, Shape, Transform, Vector3};
use cellwire_terminal::{AppConfig, RenderMode, TerminalApp};
use clap::{Parser, ValueEnum};
use std::f32::consts::PI;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Model {
    Cube,
    Tetrahedron,
    Plane,
    Stl,
}

#[derive(Debug, Parser)]
#[command(name = "cellwire", version)]
#[command(about = "Spinning wireframe models drawn with terminal characters.")]
struct Cli {
    #[arg(value_enum, default_value_t = Model::Cube)]
    model: Model,
    /// Mesh file to show with the `stl` model.
    #[arg(long, value_name = "PATH", required_if_eq("model", "stl"))]
    stl: Option<PathBuf>,
    /// Uniform scale applied to the model.
    #[arg(long, default_value_t = 2.0)]
    scale: f32,
    #[arg(long, default_value_t = 3.0)]
    model_size: f32,
    #[arg(long, default_value_t = 8.0)]
    camera_distance: f32,
    /// Width stretch making up for tall character cells.
    #[arg(long, default_value_t = Camera::DEFAULT_ASPECT)]
    aspect: f32,
    /// Rotation about X per frame, in radians.
    #[arg(long, default_value_t = PI / 32.0)]
    spin: f32,
    /// Frame rate cap.
    #[arg(long, default_value_t = 20)]
    fps: u32,
    /// Hide the coordinate frame marker.
    #[arg(long)]
    no_csys: bool,
    #[arg(long, value_enum, default_value_t = RenderMode::Overwrite)]
    render_mode: RenderMode,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let scene = build_scene(&cli)?;
    let config = AppConfig {
        spin: cli.spin,
        frame_time: Duration::from_secs_f32(1.0 / cli.fps.max(1) as f32),
        render_mode: cli.render_mode,
        ..AppConfig::default()
    };

    let mut app = TerminalApp::new(scene, config).context("failed to query the terminal size")?;
    app.run().context("terminal renderer failed")?;
    Ok(())
}

fn build_scene(cli: &Cli) -> Result<Scene> {
    let camera = Camera::new(cli.model_size, cli.camera_distance).with_aspect(cli.aspect);
    let mut scene = Scene::new(camera);

    scene.add_shape(build_model(cli)?);
    if !cli.no_csys {
        scene.add_shape(Shape::csys(Vector3::zeros(), 1.0));
    }
    scene.rotate_y(PI / 6.0);
    Ok(scene)
}

fn build_model(cli: &Cli) -> Result<Shape> {
    let shape = match cli.model {
        Model::Cube => {
            let mut shape = Shape::cuboid(Vector3::zeros(), 1.0, 1.0, 1.0, Color::Blue);
            shape.scale(cli.scale);
            shape
        }
        Model::Tetrahedron => {
            let mut shape = Shape::tetrahedron(Vector3::zeros(), 0.6, 1.0, Color::Blue);
            shape.scale(cli.scale);
            shape.rotate_y(PI / 4.0);
            shape
        }
        Model::Plane => {
            let mut shape = Shape::rectangle(Vector3::z(), 1.0, 1.0, Color::Blue);
            shape.scale_about(cli.scale, &Vector3::z());
            shape.rotate_x(-PI / 2.0);
            shape
        }
        Model::Stl => {
            let path = cli.stl.as_ref().context("--stl <PATH> is required for the stl model")?;
            Shape::stl(path, Color::Blue, cli.scale)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
    };
    Ok(shape)
}
