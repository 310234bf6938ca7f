//! Surface scattering models.

use crate::{hittable::HitRecord, texture::Texture, Ray};
use lux_math::Vec3;
use rand::RngCore;
use std::sync::Arc;

/// Color type alias (linear RGB, typically 0-1 per channel)
pub type Color = Vec3;

/// Outcome of a scatter event at a surface interaction.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Multiplier applied to whatever radiance the follow-up ray returns
    pub attenuation: Color,
    /// Follow-up ray leaving the hit point
    pub scattered: Ray,
}

/// Shading model attached to a primitive.
///
/// One material instance is often bound to many primitives, so primitives
/// hold materials behind `Arc`. Matching is exhaustive; there is no dynamic
/// dispatch on the shading path.
#[derive(Clone)]
pub enum Material {
    /// Diffuse surface scattering into the normal hemisphere.
    Lambertian { texture: Arc<Texture> },
    /// Specular reflector with optional fuzz in [0, 1].
    Metal { albedo: Color, fuzz: f64 },
    /// Clear refractive surface described by its index of refraction.
    Dielectric { refraction_index: f64 },
    /// Emitter; never scatters.
    DiffuseLight { scale: f64, texture: Arc<Texture> },
    /// Uniform scattering in all directions (volume phase function).
    Isotropic { texture: Arc<Texture> },
}

impl Material {
    /// Diffuse material with a solid albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Self::Lambertian {
            texture: Arc::new(Texture::solid(albedo)),
        }
    }

    /// Diffuse material sampling an arbitrary texture.
    pub fn lambertian_textured(texture: Arc<Texture>) -> Self {
        Self::Lambertian { texture }
    }

    /// Metal with the given albedo and fuzz (clamped to [0, 1]).
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Self::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Dielectric with the given index of refraction
    /// (1.0 = air, 1.5 = glass, 2.4 = diamond).
    pub fn dielectric(refraction_index: f64) -> Self {
        Self::Dielectric { refraction_index }
    }

    /// Light emitting a solid color.
    pub fn diffuse_light(emit: Color) -> Self {
        Self::DiffuseLight {
            scale: 1.0,
            texture: Arc::new(Texture::solid(emit)),
        }
    }

    /// Light emitting a texture scaled by a brightness factor.
    pub fn diffuse_light_textured(scale: f64, texture: Arc<Texture>) -> Self {
        Self::DiffuseLight { scale, texture }
    }

    /// Isotropic phase function with a solid albedo.
    pub fn isotropic(albedo: Color) -> Self {
        Self::Isotropic {
            texture: Arc::new(Texture::solid(albedo)),
        }
    }

    /// Isotropic phase function sampling a texture.
    pub fn isotropic_textured(texture: Arc<Texture>) -> Self {
        Self::Isotropic { texture }
    }

    /// Scatter an incoming ray at a hit.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Self::Lambertian { texture } => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // A sample that cancels the normal leaves no direction
                if near_zero(scatter_direction) {
                    scatter_direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: texture.value(rec.u, rec.v, rec.p),
                    scattered: Ray::new(rec.p, scatter_direction),
                })
            }

            Self::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction, rec.normal).normalize()
                    + *fuzz * random_unit_vector(rng);

                // Absorb rays fuzzed below the surface
                if reflected.dot(rec.normal) > 0.0 {
                    Some(ScatterResult {
                        attenuation: *albedo,
                        scattered: Ray::new(rec.p, reflected),
                    })
                } else {
                    None
                }
            }

            Self::Dielectric { refraction_index } => {
                let ri = if rec.front_face {
                    1.0 / refraction_index
                } else {
                    *refraction_index
                };

                let unit_direction = ray_in.direction.normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = ri * sin_theta > 1.0;
                let direction = if cannot_refract
                    || reflectance(cos_theta, *refraction_index) > gen_f64(rng)
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, ri)
                };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }

            Self::DiffuseLight { .. } => None,

            Self::Isotropic { texture } => Some(ScatterResult {
                attenuation: texture.value(rec.u, rec.v, rec.p),
                scattered: Ray::new(rec.p, random_unit_vector(rng)),
            }),
        }
    }

    /// Emitted radiance at the given surface coordinates.
    ///
    /// Zero for everything except lights.
    pub fn emitted(&self, u: f64, v: f64, p: Vec3) -> Color {
        match self {
            Self::DiffuseLight { scale, texture } => *scale * texture.value(u, v, p),
            _ => Color::ZERO,
        }
    }
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
    let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

// =============================================================================
// Geometry and sampling helpers
// =============================================================================

/// Generate a random f64 in [0, 1) from an RngCore.
///
/// Needed because `dyn RngCore` can't use `Rng::gen()` directly.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    let bits = rng.next_u64();
    (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// True if every component's magnitude is below 1e-8.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const NEAR_ZERO: f64 = 1e-8;
    v.x.abs() < NEAR_ZERO && v.y.abs() < NEAR_ZERO && v.z.abs() < NEAR_ZERO
}

/// Mirror v across the surface plane with unit normal n.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with the given index ratio.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Generate a random unit vector, uniform on the unit sphere.
///
/// Rejection-samples the unit ball; the lower bound on the squared length
/// guards the normalization against denormal-length samples.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
        );
        let len_sq = p.length_squared();
        if len_sq > 1e-160 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random unit vector in the hemisphere around a normal.
pub fn random_on_hemisphere(rng: &mut dyn RngCore, normal: Vec3) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) > 0.0 {
        on_unit_sphere
    } else {
        -on_unit_sphere
    }
}
