use clap::Parser;
use log::info;

use imposter::camera::Camera;
use imposter::light::LightRig;
use imposter::scene::{model_view, Scene};

mod cli;
mod logger;
mod output;

use cli::Args;
use logger::init_logger;
use output::{numbered_path, save_depth_as_png, save_image_as_exr, save_image_as_png, ImageFormat};

/// Create camera from command line settings
fn create_camera(args: &Args) -> Camera {
    let mut camera = Camera::new();
    camera.image_width = args.width;
    camera.image_height = args.height;
    camera.samples_per_pixel = args.samples_per_pixel;
    camera.light = LightRig::new(args.lighting.into());
    camera.show_bounds = args.show_bounds;
    camera
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("Imposter - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let Some(format) = ImageFormat::from_path(&args.output) else {
        log::error!(
            "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
            std::path::Path::new(&args.output).extension().unwrap_or_default().to_string_lossy()
        );
        std::process::exit(1);
    };

    info!("Image resolution: {}x{}, samples per pixel: {}", args.width, args.height, args.samples_per_pixel);

    let camera = create_camera(&args);
    let world = Scene::demo();
    let frames = args.frames.max(1);

    for frame in 0..frames {
        let yrot = args.yrot + frame as f64;
        info!("Frame {}/{}: yrot = {:.1}", frame + 1, frames, yrot);

        let scene = world.to_eye(&model_view(yrot));
        let rendered = camera.render(&scene);

        let path = numbered_path(&args.output, frame, frames);
        match format {
            ImageFormat::Png => save_image_as_png(&rendered.color, &path),
            ImageFormat::Exr => save_image_as_exr(&rendered.color, &path),
        }

        if let Some(depth_output) = &args.depth_output {
            save_depth_as_png(&rendered.depth, &numbered_path(depth_output, frame, frames));
        }
    }
}
