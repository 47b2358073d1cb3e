//! Plain-text PPM (P3) raster writer.

use std::io::{self, Write};

use glam::Vec3;

/// Write a linear radiance buffer as a P3 PPM image.
///
/// Channels are clamped to [0, 1], scaled by 255.999 and truncated.
/// Pixels are row-major with the origin at the top-left; the buffer length
/// must be `width * height`.
pub fn write_ppm(
    mut w: impl Write,
    width: u32,
    height: u32,
    pixels: &[Vec3],
) -> io::Result<()> {
    debug_assert_eq!(pixels.len(), (width * height) as usize);

    write!(w, "P3\n{width} {height}\n255\n")?;

    for p in pixels {
        let r = (p.x.clamp(0.0, 1.0) * 255.999) as u8;
        let g = (p.y.clamp(0.0, 1.0) * 255.999) as u8;
        let b = (p.z.clamp(0.0, 1.0) * 255.999) as u8;
        writeln!(w, "{r} {g} {b}")?;
    }

    Ok(())
}
