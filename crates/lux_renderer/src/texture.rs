//! Color fields sampled by materials.

use crate::{bitmap::Bitmap, perlin::Perlin, Color};
use lux_math::{Interval, Vec3};
use std::sync::Arc;

/// A color field over surface coordinates (u, v) and the hit point.
///
/// Every variant carries a multiplicative tint, white by default, applied
/// to the sampled value.
#[derive(Clone)]
pub enum Texture {
    /// Uniform color.
    Solid { tint: Color },
    /// 3D checkerboard alternating two sub-textures.
    Checker {
        inv_scale: f64,
        even: Arc<Texture>,
        odd: Arc<Texture>,
        tint: Color,
    },
    /// Marble-like band pattern driven by Perlin turbulence.
    Noise {
        noise: Perlin,
        scale: f64,
        tint: Color,
    },
    /// Nearest-pixel lookup into a decoded bitmap.
    Image { bitmap: Arc<Bitmap>, tint: Color },
}

impl Texture {
    /// Uniform color texture.
    pub fn solid(tint: Color) -> Self {
        Self::Solid { tint }
    }

    /// Checkerboard of two solid colors with the given cell scale.
    pub fn checker(scale: f64, even: Color, odd: Color) -> Self {
        Self::checker_textured(
            scale,
            Arc::new(Texture::solid(even)),
            Arc::new(Texture::solid(odd)),
        )
    }

    /// Checkerboard of two arbitrary sub-textures.
    pub fn checker_textured(scale: f64, even: Arc<Texture>, odd: Arc<Texture>) -> Self {
        Self::Checker {
            inv_scale: 1.0 / scale,
            even,
            odd,
            tint: Color::ONE,
        }
    }

    /// Noise texture with the given frequency scale.
    pub fn noise(scale: f64) -> Self {
        Self::Noise {
            noise: Perlin::new(),
            scale,
            tint: Color::ONE,
        }
    }

    /// Tinted noise texture.
    pub fn noise_tinted(tint: Color, scale: f64) -> Self {
        Self::Noise {
            noise: Perlin::new(),
            scale,
            tint,
        }
    }

    /// Image texture over a decoded bitmap.
    pub fn image(bitmap: Arc<Bitmap>) -> Self {
        Self::Image {
            bitmap,
            tint: Color::ONE,
        }
    }

    /// Tinted image texture.
    pub fn image_tinted(tint: Color, bitmap: Arc<Bitmap>) -> Self {
        Self::Image { bitmap, tint }
    }

    /// Sample the texture at surface coordinates (u, v) and hit point p.
    pub fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        match self {
            Self::Solid { tint } => *tint,

            Self::Checker {
                inv_scale,
                even,
                odd,
                tint,
            } => {
                let x = (inv_scale * p.x).floor() as i64;
                let y = (inv_scale * p.y).floor() as i64;
                let z = (inv_scale * p.z).floor() as i64;

                let is_even = (x + y + z) % 2 == 0;
                let cell = if is_even { even } else { odd };
                cell.value(u, v, p) * *tint
            }

            Self::Noise { noise, scale, tint } => {
                *tint
                    * Color::splat(0.5)
                    * (1.0 + (scale * p.z + 10.0 * noise.turb(p, 7)).sin())
            }

            Self::Image { bitmap, tint } => {
                // A missing bitmap samples as solid cyan as a debugging aid.
                if bitmap.is_empty() {
                    return Color::new(0.0, 1.0, 1.0);
                }

                let unit = Interval::new(0.0, 1.0);
                let u = unit.clamp(u);
                let v = 1.0 - unit.clamp(v); // Flip V to image coordinates

                let i = ((u * bitmap.width() as f64) as usize).min(bitmap.width() - 1);
                let j = ((v * bitmap.height() as f64) as usize).min(bitmap.height() - 1);

                *tint * bitmap.pixel(i, j)
            }
        }
    }
}
