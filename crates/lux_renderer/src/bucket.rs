//! Bucket-based tile decomposition.
//!
//! The image is divided into tiles (buckets) that render independently:
//! serially for incremental drivers, or in parallel via rayon. Each bucket
//! owns a deterministically seeded RNG so the two modes produce identical
//! pixels.

use crate::renderer::render_pixel;
use crate::{Camera, Color, PrimitiveList, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One rectangular tile of the output image.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// Top-left corner, in image coordinates
    pub x: u32,
    pub y: u32,
    /// Tile extent in pixels
    pub width: u32,
    pub height: u32,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels the tile covers.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Tile edge length used by the full-frame render paths.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering an image, ordered center-out.
///
/// Center-out ordering shows the most important part of the image first
/// when an incremental driver displays buckets as they complete.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_center_out(&mut buckets, width, height);
    buckets
}

/// Sort buckets by distance of their center from the image center.
fn sort_center_out(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let distance_sq = |b: &Bucket| {
        let bx = b.x as f64 + b.width as f64 / 2.0;
        let by = b.y as f64 + b.height as f64 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        distance_sq(a)
            .partial_cmp(&distance_sq(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Mix the config seed with a bucket's coordinates.
///
/// Distinct buckets must get distinct, stable streams regardless of the
/// order or thread they render on.
pub fn bucket_seed(seed: u64, x: u32, y: u32) -> u64 {
    let mut h = seed ^ (((x as u64) << 32) | y as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h
}

/// Render one tile into a freshly allocated color vector, row-major
/// within the tile.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &PrimitiveList,
    config: &RenderConfig,
) -> Vec<Color> {
    let mut rng = StdRng::seed_from_u64(bucket_seed(config.seed, bucket.x, bucket.y));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(
                camera,
                world,
                bucket.x + local_x,
                bucket.y + local_y,
                config,
                &mut rng,
            );
            pixels.push(color);
        }
    }

    pixels
}
