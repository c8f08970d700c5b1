use clap::{Parser, ValueEnum};
use imposter::light::LightingMode;
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Light rig selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Lighting {
    Full,
    Diffuse,
    Ambient,
}

impl From<Lighting> for LightingMode {
    fn from(lighting: Lighting) -> Self {
        match lighting {
            Lighting::Full => LightingMode::Full,
            Lighting::Diffuse => LightingMode::DiffuseOnly,
            Lighting::Ambient => LightingMode::AmbientOnly,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "imposter")]
#[command(about = "Renders spheres and cones as ray-cast imposters")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "640", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "480", help = "Image height in pixels")]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "4", help = "Number of samples per pixel")]
    pub samples_per_pixel: u32,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(short, long, default_value = "imposter.png", help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)")]
    pub output: String,

    /// Also write the depth buffer as a 16-bit grayscale PNG
    #[arg(long, help = "Also write the depth buffer as a 16-bit grayscale PNG")]
    pub depth_output: Option<String>,

    /// Rotation of the scene about the Y axis, in degrees
    #[arg(long, default_value = "0", allow_negative_numbers = true, help = "Rotation of the scene about the Y axis, in degrees")]
    pub yrot: f64,

    /// Number of frames; each frame rotates the scene one more degree
    #[arg(long, default_value = "1", help = "Number of frames; each frame rotates the scene one more degree")]
    pub frames: u32,

    /// Light rig
    #[arg(long, value_enum, default_value = "full", help = "Light rig")]
    pub lighting: Lighting,

    /// Paint bounding geometry where the surface is missed
    #[arg(long, help = "Paint bounding geometry where the surface is missed")]
    pub show_bounds: bool,
}
