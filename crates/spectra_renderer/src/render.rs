//! Multithreaded frame rendering.
//!
//! A fixed pool of worker threads pulls pixel rows from a shared FIFO
//! queue. Each queue entry carries the exclusive mutable slice of the
//! framebuffer it fills, so workers write pixels without any further
//! synchronization; the queue mutex is held only to pop a row and report
//! progress.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;

use glam::Vec3;
use rand::rngs::OsRng;
use rand::RngCore;
use spectra_core::Scene;

use crate::bvh::Bvh;
use crate::camera::Camera;
use crate::integrator::{Background, PathTracer, Termination};
use crate::rng::Xoshiro256pp;

/// Frame-level rendering parameters.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub termination: Termination,
    pub background: Background,
    /// Worker thread count; 0 selects the available hardware parallelism
    pub threads: usize,
}

/// One unit of work: a row index and the framebuffer slice backing it.
struct RowJob<'fb> {
    j: u32,
    pixels: &'fb mut [Vec3],
}

fn worker_count(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Render a full frame, returning pixels in row-major order.
///
/// Every worker owns an independent generator seeded from the operating
/// system, so repeated renders of the same scene differ in noise but not
/// in expectation. Each sample is clamped to [0, 1] per channel before
/// accumulation.
///
/// `progress` is invoked under the queue lock with (rows started, total
/// rows) each time a worker takes a row.
pub fn render(
    scene: &Scene,
    bvh: &Bvh,
    camera: &Camera,
    settings: &RenderSettings,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Vec<Vec3> {
    let width = settings.width as usize;
    let height = settings.height as usize;
    let samples = settings.samples_per_pixel.max(1);

    let mut framebuffer = vec![Vec3::ZERO; width * height];

    let jobs: VecDeque<RowJob> = framebuffer
        .chunks_mut(width)
        .enumerate()
        .map(|(j, pixels)| RowJob {
            j: j as u32,
            pixels,
        })
        .collect();
    let total_rows = jobs.len();
    let queue = Mutex::new(jobs);

    let threads = worker_count(settings.threads);
    let tracer = PathTracer::new(scene, bvh, settings.background, settings.termination);

    log::info!(
        "rendering {}x{} at {samples} spp on {threads} threads",
        settings.width,
        settings.height
    );

    thread::scope(|s| {
        for _ in 0..threads {
            let queue = &queue;
            let tracer = &tracer;
            let mut rng = Xoshiro256pp::new(OsRng.next_u64());

            s.spawn(move || loop {
                let job = {
                    let mut q = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    let job = q.pop_front();
                    if job.is_some() {
                        if let Some(report) = progress {
                            report(total_rows - q.len(), total_rows);
                        }
                    }
                    job
                };
                let Some(RowJob { j, pixels }) = job else {
                    break;
                };

                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let mut acc = Vec3::ZERO;
                    for _ in 0..samples {
                        let ray = camera.ray_jittered(i as u32, j, &mut rng);
                        acc += tracer.radiance(&ray, &mut rng).min(Vec3::ONE);
                    }
                    *pixel = acc / samples as f32;
                }
            });
        }
    });

    // The queue holds borrows into the framebuffer; release them first
    drop(queue);
    framebuffer
}
