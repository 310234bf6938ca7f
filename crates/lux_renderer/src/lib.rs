//! CPU path tracer.
//!
//! Monte Carlo integration of the rendering equation over a BVH-indexed
//! scene of spheres, planar shapes, transformed wrappers, and constant
//! density volumes. The driver produces a linear RGB pixel buffer plus an
//! 8-bit RGBA packing suitable for display or PPM output.

mod bitmap;
mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod perlin;
mod quad;
mod renderer;
mod sphere;
mod texture;
mod transform;
mod volume;

pub use bitmap::Bitmap;
pub use bucket::{generate_buckets, render_bucket, Bucket, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Primitive, PrimitiveList};
pub use material::{Color, Material, ScatterResult};
pub use perlin::Perlin;
pub use quad::{box_sides, PlanarShape, Quad};
pub use renderer::{
    linear_to_gamma, ray_color, render_pixel, sky_gradient, write_ppm, RayTracer, RenderConfig,
    RenderError,
};
pub use sphere::Sphere;
pub use texture::Texture;
pub use transform::{RotateY, Translate};
pub use volume::ConstantMedium;

/// Re-export the math types from lux_math
pub use lux_math::{Aabb, Interval, Ray, Vec3};
