use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use spectra_core::Material;
use spectra_renderer::{Background, Termination};

#[derive(Debug, Parser)]
#[command(version, about = "Spectra CPU path tracer")]
pub struct Args {
    /// Wavefront OBJ scene to render.
    pub scene: PathBuf,

    #[arg(short, long, default_value = "render.ppm")]
    /// Output image. A .ppm extension writes plain-text PPM; anything else
    /// is encoded through the image crate (.png, .jpg, ...).
    pub output: PathBuf,

    #[arg(long, default_value_t = 800)]
    /// Output width in pixels.
    pub width: u32,

    #[arg(long, conflicts_with = "aspect")]
    /// Output height in pixels. Derived from --aspect when omitted.
    pub height: Option<u32>,

    #[arg(long, default_value = "16:9", value_parser = aspect_value_parser)]
    /// Aspect ratio, as "W:H" or a decimal.
    pub aspect: f32,

    #[arg(short, long, default_value_t = 64)]
    /// Samples per pixel.
    pub samples: u32,

    #[arg(long, conflicts_with = "survival")]
    /// Cut paths after this many bounces instead of Russian roulette.
    pub max_depth: Option<u32>,

    #[arg(long, default_value_t = 0.9)]
    /// Russian roulette survival decay per bounce, in (0, 1].
    pub survival: f32,

    #[arg(long, default_value = "0,0,5", value_parser = vec3_value_parser)]
    /// Camera position.
    pub eye: Vec3,

    #[arg(long, default_value = "0,0,0", value_parser = vec3_value_parser)]
    /// Camera look-at target.
    pub target: Vec3,

    #[arg(long, default_value = "0,1,0", value_parser = vec3_value_parser)]
    /// Camera up vector.
    pub up: Vec3,

    #[arg(long, default_value_t = 40.0)]
    /// Vertical field of view in degrees.
    pub vfov: f32,

    #[arg(short, long, default_value_t = 0)]
    /// Worker threads; 0 uses every available core.
    pub threads: usize,

    #[arg(long, conflicts_with = "background")]
    /// Replace the constant background with a white-to-blue sky gradient.
    pub sky: bool,

    #[arg(long, default_value = "0,0,0", value_parser = vec3_value_parser)]
    /// Constant background radiance.
    pub background: Vec3,

    #[arg(long = "material", value_parser = material_value_parser)]
    /// Material for a face group, as
    /// "group=r,g,b,roughness,ior" or "group=r,g,b,roughness,ior,er,eg,eb"
    /// with an emission color appended. Repeatable.
    pub materials: Vec<GroupMaterial>,
}

/// A parsed --material assignment.
#[derive(Debug, Clone)]
pub struct GroupMaterial {
    pub group: String,
    pub material: Material,
}

impl Args {
    /// Final output resolution, with the height derived from the aspect
    /// ratio unless given explicitly.
    pub fn resolution(&self) -> (u32, u32) {
        let height = self
            .height
            .unwrap_or_else(|| ((self.width as f32 / self.aspect).round() as u32).max(1));
        (self.width, height)
    }

    pub fn termination(&self) -> Result<Termination> {
        if let Some(max) = self.max_depth {
            return Ok(Termination::MaxDepth(max));
        }
        if !(self.survival > 0.0 && self.survival <= 1.0) {
            bail!("--survival must be in (0, 1], got {}", self.survival);
        }
        Ok(Termination::RussianRoulette {
            decay: self.survival,
        })
    }

    pub fn background(&self) -> Background {
        if self.sky {
            Background::SkyGradient
        } else {
            Background::Color(self.background)
        }
    }
}

fn aspect_value_parser(raw: &str) -> Result<f32> {
    let ratio = match raw.split_once(':') {
        Some((w, h)) => {
            let w: f32 = w.trim().parse().context("bad aspect width")?;
            let h: f32 = h.trim().parse().context("bad aspect height")?;
            w / h
        }
        None => raw.trim().parse().context("bad aspect ratio")?,
    };
    if !(ratio.is_finite() && ratio > 0.0) {
        bail!("aspect ratio must be positive");
    }
    Ok(ratio)
}

fn vec3_value_parser(raw: &str) -> Result<Vec3> {
    let mut parts = raw.splitn(3, ',');
    let mut component = || -> Result<f32> {
        parts
            .next()
            .context("expected three comma-separated components")?
            .trim()
            .parse()
            .context("component is not a number")
    };
    Ok(Vec3::new(component()?, component()?, component()?))
}

fn material_value_parser(raw: &str) -> Result<GroupMaterial> {
    let (group, rest) = raw
        .split_once('=')
        .context("expected \"group=r,g,b,roughness,ior[,er,eg,eb]\"")?;

    let values: Vec<f32> = rest
        .split(',')
        .map(|v| v.trim().parse().context("material component is not a number"))
        .collect::<Result<_>>()?;

    let emission = match values.len() {
        5 => Vec3::ZERO,
        8 => Vec3::new(values[5], values[6], values[7]),
        n => bail!("expected 5 or 8 material components, got {n}"),
    };

    Ok(GroupMaterial {
        group: group.trim().to_string(),
        material: Material::new(
            Vec3::new(values[0], values[1], values[2]),
            emission,
            values[3],
            values[4],
        ),
    })
}
