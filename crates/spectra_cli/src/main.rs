//! Command line renderer.

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use spectra_core::{load_obj, write_ppm, Scene};
use spectra_renderer::{render, Bvh, Camera, RenderSettings};

mod args;

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let (width, height) = args.resolution();

    let mesh = load_obj(&args.scene)
        .with_context(|| format!("loading scene {}", args.scene.display()))?;

    let mut scene = Scene::new(mesh);
    for assignment in &args.materials {
        if !scene.set_material(&assignment.group, assignment.material.clone()) {
            bail!(
                "no face group named {:?} in {}",
                assignment.group,
                args.scene.display()
            );
        }
    }
    scene.validate().context("scene failed validation")?;

    let start = Instant::now();
    let bvh = Bvh::build(&scene.mesh.positions, &scene.mesh.faces);
    log::info!(
        "built BVH with {} nodes in {:.2?}",
        bvh.node_count(),
        start.elapsed()
    );

    let camera = Camera::new(args.eye, args.target, args.up, args.vfov, width, height);

    let settings = RenderSettings {
        width,
        height,
        samples_per_pixel: args.samples,
        termination: args.termination()?,
        background: args.background(),
        threads: args.threads,
    };

    // Report roughly every 10% of rows
    let progress = move |done: usize, total: usize| {
        let step = (total / 10).max(1);
        if done % step == 0 || done == total {
            log::info!("rendering: {done}/{total} rows");
        }
    };

    let start = Instant::now();
    let pixels = render(&scene, &bvh, &camera, &settings, Some(&progress));
    log::info!("rendered in {:.2?}", start.elapsed());

    write_image(&args.output, width, height, &pixels)?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}

fn write_image(path: &Path, width: u32, height: u32, pixels: &[Vec3]) -> Result<()> {
    match path.extension().and_then(OsStr::to_str) {
        Some("ppm") => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_ppm(BufWriter::new(file), width, height, pixels)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        Some(_) => {
            let image = image::RgbImage::from_fn(width, height, |x, y| {
                let p = pixels[(y * width + x) as usize];
                image::Rgb([
                    (p.x.clamp(0.0, 1.0) * 255.999) as u8,
                    (p.y.clamp(0.0, 1.0) * 255.999) as u8,
                    (p.z.clamp(0.0, 1.0) * 255.999) as u8,
                ])
            });
            image
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => bail!("output path {} has no extension", path.display()),
    }
    Ok(())
}
