//! Participating medium with constant density.

use crate::{
    hittable::{HitRecord, Primitive},
    material::{Color, Material},
    texture::Texture,
    Ray,
};
use lux_math::{Aabb, Interval, Vec3};
use rand::Rng;
use std::sync::Arc;

/// A volume of constant density bounded by another primitive.
///
/// Rays entering the boundary scatter after an exponentially distributed
/// free-flight distance; the phase function is isotropic.
#[derive(Clone)]
pub struct ConstantMedium {
    boundary: Box<Primitive>,
    neg_inv_density: f64,
    phase_function: Arc<Material>,
}

/// Nudge past the entry hit when probing for the exit hit.
const EXIT_PROBE_OFFSET: f64 = 1e-4;

impl ConstantMedium {
    /// Create a medium bounded by `boundary`, scattering with the given
    /// density and phase texture.
    pub fn new(boundary: impl Into<Primitive>, density: f64, texture: Arc<Texture>) -> Self {
        Self {
            boundary: Box::new(boundary.into()),
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Material::isotropic_textured(texture)),
        }
    }

    /// Create a medium with a solid phase color.
    pub fn from_color(boundary: impl Into<Primitive>, density: f64, albedo: Color) -> Self {
        Self {
            boundary: Box::new(boundary.into()),
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Material::isotropic(albedo)),
        }
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Find where the ray enters and exits the boundary, ignoring the
        // query interval first so a ray starting inside still registers.
        let entry = self.boundary.hit(ray, Interval::UNIVERSE)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_PROBE_OFFSET, f64::INFINITY))?;

        let mut t1 = entry.t.max(ray_t.min);
        let t2 = exit.t.min(ray_t.max);

        if t1 >= t2 {
            return None;
        }
        if t1 < 0.0 {
            t1 = 0.0;
        }

        let ray_length = ray.direction.length();
        let distance_inside_boundary = (t2 - t1) * ray_length;
        let hit_distance = self.neg_inv_density * rand::thread_rng().gen::<f64>().ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t1 + hit_distance / ray_length;

        // Carry surface UVs from the boundary when the query interval can
        // see it, so a textured phase function has something to sample.
        let (u, v) = self
            .boundary
            .hit(ray, ray_t)
            .map_or((0.0, 0.0), |probe| (probe.u, probe.v));

        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary; the isotropic phase function ignores both.
            normal: Vec3::X,
            material: self.phase_function.as_ref(),
            u,
            v,
            t,
            front_face: true,
        })
    }

    pub fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;

    fn boundary_sphere() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Material::dielectric(1.5).into(),
        )
    }

    #[test]
    fn test_dense_medium_scatters_inside_boundary() {
        // At this density the mean free path is microscopic, so a ray
        // through the boundary essentially always scatters inside it.
        let medium = ConstantMedium::from_color(boundary_sphere(), 1e6, Color::ONE);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let rec = medium
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("dense medium must scatter");
        // Scatter point lies within the boundary span [2, 4].
        assert!(rec.t >= 2.0 && rec.t <= 4.0);
        assert!(rec.front_face);
    }

    #[test]
    fn test_medium_miss_when_ray_misses_boundary() {
        let medium = ConstantMedium::from_color(boundary_sphere(), 1e6, Color::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        assert!(medium.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_medium_respects_query_interval() {
        let medium = ConstantMedium::from_color(boundary_sphere(), 1e6, Color::ONE);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        // The boundary span [2, 4] lies entirely beyond the interval.
        assert!(medium.hit(&ray, Interval::new(0.001, 1.0)).is_none());
    }

    #[test]
    fn test_thin_medium_mostly_passes_through() {
        let medium = ConstantMedium::from_color(boundary_sphere(), 1e-9, Color::ONE);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let mut misses = 0;
        for _ in 0..100 {
            if medium.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none() {
                misses += 1;
            }
        }
        assert!(misses > 90);
    }

    #[test]
    fn test_medium_bbox_is_boundary_bbox() {
        let sphere = boundary_sphere();
        let expected = sphere.bounding_box();
        let medium = ConstantMedium::from_color(sphere, 0.5, Color::ONE);
        assert_eq!(medium.bounding_box(), expected);
    }
}
