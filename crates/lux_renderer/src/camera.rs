//! Thin-lens camera and its ray generator.

use crate::{material::gen_f64, Ray};
use lux_math::Vec3;
use rand::RngCore;

/// Camera generating primary rays into the scene.
///
/// Positioning and lens parameters are set up front with the builder
/// methods; `initialize` derives the viewport frame and must run before
/// rays are generated (the render driver does this at the start of every
/// render call).
#[derive(Clone)]
pub struct Camera {
    // Output raster
    pub image_width: u32,
    pub image_height: u32,

    // Placement
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens
    vfov: f64,          // Vertical field of view in degrees
    defocus_angle: f64, // Aperture cone angle; 0 disables depth of field
    focus_dist: f64,    // Distance to the plane of perfect focus

    // Derived by initialize()
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Camera with a front-facing default setup at the origin.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Output resolution in pixels.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Where the camera sits, what it aims at, and which way is up.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Field of view, aperture angle, and focus distance.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Derive the viewport frame from the current settings.
    ///
    /// Must be called before generating rays, and again after any setting
    /// changes.
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Viewport dimensions at the focus distance
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Pixel-to-pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        // Location of the upper left pixel center
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a ray for pixel (x, y), jittered within the pixel and
    /// across the defocus disk.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((x as f64) + offset.x) * self.pixel_delta_u
            + ((y as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Deterministic ray through the exact center of pixel (x, y).
    ///
    /// Used for single-sample renders, where jitter would only add noise.
    pub fn center_ray(&self, x: u32, y: u32) -> Ray {
        let pixel_center = self.pixel00_loc
            + (x as f64) * self.pixel_delta_u
            + (y as f64) * self.pixel_delta_v;

        Ray::new(self.center, pixel_center - self.center)
    }

    /// Pick a lens point for depth-of-field jitter.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Random point in the unit square [-0.5, 0.5] x [-0.5, 0.5] at z = 0.
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

/// Random point in the xy unit disk at z = 0.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f64(rng) * 2.0 - 1.0, gen_f64(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
