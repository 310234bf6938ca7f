//! Path-tracing integrator and render driver.

use crate::bucket::{generate_buckets, render_bucket, Bucket, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, PrimitiveList, Ray};
use lux_math::Interval;
use rand::RngCore;
use rayon::prelude::*;
use std::io::{self, Write};
use thiserror::Error;

/// Errors surfaced at render setup. The render loops themselves never fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid viewport dimensions: {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}

/// Settings shared by every render path.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel; a single sample renders deterministic
    /// pixel-center rays
    pub samples_per_pixel: u32,
    /// Bounce limit per path
    pub max_depth: u32,
    /// Background color where rays escape the scene
    pub background: Color,
    /// Use the sky gradient instead of the solid background
    pub use_sky_gradient: bool,
    /// Base seed for the per-bucket sample generators
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            use_sky_gradient: false,
            seed: 0,
        }
    }
}

/// Hits closer than this are ignored, which suppresses shadow acne from
/// rays re-hitting the surface they scattered off.
const T_MIN: f64 = 0.001;

/// Compute the radiance arriving along a ray.
///
/// Walks the path iteratively: emission is accumulated through the running
/// attenuation product, and the walk ends on escape, absorption, or the
/// bounce limit.
pub fn ray_color(
    ray: &Ray,
    world: &PrimitiveList,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut color = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut current = *ray;

    for _ in 0..config.max_depth {
        let Some(rec) = world.hit(&current, Interval::new(T_MIN, f64::INFINITY)) else {
            // Escaped into the background.
            let background = if config.use_sky_gradient {
                sky_gradient(&current)
            } else {
                config.background
            };
            return color + throughput * background;
        };

        color += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&current, &rec, rng) {
            Some(scatter) => {
                throughput *= scatter.attenuation;
                current = scatter.scattered;
            }
            // Absorbed.
            None => return color,
        }
    }

    // Bounce limit reached; no more light is gathered.
    color
}

/// Background gradient blending white at the horizon to sky blue overhead.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    Color::ONE * (1.0 - a) + Color::new(0.5, 0.7, 1.0) * a
}

/// Gamma-2 transfer: square root of positive values, zero otherwise.
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Render one pixel, averaging the configured number of samples.
pub fn render_pixel(
    camera: &Camera,
    world: &PrimitiveList,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel <= 1 {
        // A lone sample goes through the pixel center, unjittered.
        return ray_color(&camera.center_ray(x, y), world, config, rng);
    }

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config, rng);
    }

    pixel_color / config.samples_per_pixel as f64
}

/// The render driver: owns the camera, the scene root, and the output
/// buffers.
///
/// Drivers assemble the scene through `world_mut`, configure the camera
/// and `config`, then call one of the render methods and read the result
/// through `pixel_data` or `rgba_data`.
pub struct RayTracer {
    camera: Camera,
    pub config: RenderConfig,
    world: PrimitiveList,
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    rgba: Vec<u8>,
}

impl RayTracer {
    /// Create a driver for the given viewport. Zero-sized viewports are
    /// rejected since the camera basis would be undefined.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let mut tracer = Self {
            camera: Camera::new(),
            config: RenderConfig::default(),
            world: PrimitiveList::new(),
            width: 0,
            height: 0,
            pixels: Vec::new(),
            rgba: Vec::new(),
        };
        tracer.resize_viewport(width, height)?;
        Ok(tracer)
    }

    /// Reallocate the output buffers for a new viewport size.
    pub fn resize_viewport(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport { width, height });
        }

        self.width = width;
        self.height = height;
        self.camera.image_width = width;
        self.camera.image_height = height;

        let pixel_count = (width as usize) * (height as usize);
        self.pixels.clear();
        self.pixels.resize(pixel_count, Color::ZERO);
        self.rgba.clear();
        self.rgba.resize(pixel_count * 4, 0);

        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Replace the camera; its resolution is pinned to the viewport.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera.with_resolution(self.width, self.height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the scene root for assembly before rendering.
    pub fn world_mut(&mut self) -> &mut PrimitiveList {
        &mut self.world
    }

    pub fn world(&self) -> &PrimitiveList {
        &self.world
    }

    /// Render the full viewport, one bucket at a time.
    pub fn render(&mut self) {
        self.camera.initialize();
        log::info!(
            "rendering {}x{} at {} spp, {} objects",
            self.width,
            self.height,
            self.config.samples_per_pixel,
            self.world.len()
        );

        for bucket in generate_buckets(self.width, self.height, DEFAULT_BUCKET_SIZE) {
            let colors = render_bucket(&bucket, &self.camera, &self.world, &self.config);
            self.blit(&bucket, &colors);
        }
    }

    /// Render the full viewport with buckets distributed across the rayon
    /// thread pool. Produces the same pixels as `render`.
    pub fn render_parallel(&mut self) {
        self.camera.initialize();
        log::info!(
            "rendering {}x{} at {} spp, {} objects ({} threads)",
            self.width,
            self.height,
            self.config.samples_per_pixel,
            self.world.len(),
            rayon::current_num_threads()
        );

        let buckets = generate_buckets(self.width, self.height, DEFAULT_BUCKET_SIZE);
        let camera = &self.camera;
        let world = &self.world;
        let config = &self.config;

        let results: Vec<(Bucket, Vec<Color>)> = buckets
            .par_iter()
            .map(|bucket| (*bucket, render_bucket(bucket, camera, world, config)))
            .collect();

        for (bucket, colors) in results {
            self.blit(&bucket, &colors);
        }
    }

    /// Render the half-open tile [x0, x1) x [y0, y1) for incremental
    /// drivers. Coordinates are clamped to the viewport.
    pub fn render_region(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        let x0 = x0.min(self.width);
        let y0 = y0.min(self.height);
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        self.camera.initialize();
        let bucket = Bucket::new(x0, y0, x1 - x0, y1 - y0);
        let colors = render_bucket(&bucket, &self.camera, &self.world, &self.config);
        self.blit(&bucket, &colors);
    }

    /// Copy a rendered bucket into the linear pixel buffer.
    fn blit(&mut self, bucket: &Bucket, colors: &[Color]) {
        for local_y in 0..bucket.height {
            let row_start =
                ((bucket.y + local_y) * self.width + bucket.x) as usize;
            let src_start = (local_y * bucket.width) as usize;
            self.pixels[row_start..row_start + bucket.width as usize]
                .copy_from_slice(&colors[src_start..src_start + bucket.width as usize]);
        }
    }

    /// Read-only access to the linear pixel buffer, row-major.
    pub fn pixel_data(&self) -> &[Color] {
        &self.pixels
    }

    /// Gamma-encode and pack the linear buffer to 8-bit RGBA.
    ///
    /// Channels are clamped to [0, 0.999] before byte conversion, so even
    /// non-finite pixel values pack to well-formed bytes.
    pub fn rgba_data(&mut self) -> &[u8] {
        const INTENSITY: Interval = Interval { min: 0.0, max: 0.999 };
        const BYTE_MAX: f64 = 256.0;

        for (pixel, out) in self.pixels.iter().zip(self.rgba.chunks_exact_mut(4)) {
            let r = linear_to_gamma(pixel.x);
            let g = linear_to_gamma(pixel.y);
            let b = linear_to_gamma(pixel.z);

            out[0] = (INTENSITY.clamp(r) * BYTE_MAX) as u8;
            out[1] = (INTENSITY.clamp(g) * BYTE_MAX) as u8;
            out[2] = (INTENSITY.clamp(b) * BYTE_MAX) as u8;
            out[3] = 255;
        }

        &self.rgba
    }
}

/// Write packed RGBA data as a plain-text PPM image.
///
/// Emits the `P3` header followed by one pixel per line, top-to-bottom and
/// left-to-right; the alpha channel is dropped.
pub fn write_ppm<W: Write>(writer: &mut W, width: u32, height: u32, rgba: &[u8]) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    for pixel in rgba.chunks_exact(4) {
        writeln!(writer, "{} {} {}", pixel[0], pixel[1], pixel[2])?;
    }

    Ok(())
}
