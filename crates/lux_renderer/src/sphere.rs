//! Sphere primitive.

use crate::{hittable::HitRecord, material::Material, Ray};
use lux_math::{Aabb, Interval, Vec3};
use std::f64::consts::PI;
use std::sync::Arc;

/// A sphere described by center, radius, and material.
#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f64, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// UV coordinates for a point on the unit sphere at the origin.
    ///
    /// u is the angle around the Y axis from X=-1, v the angle from Y=-1
    /// to Y=+1, both mapped to [0, 1].
    fn uv(p: Vec3) -> (f64, f64) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root that lies in the acceptable range.
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let (u, v) = Self::uv(outward_normal);

        Some(HitRecord::new(
            ray,
            p,
            outward_normal,
            root,
            u,
            v,
            &self.material,
        ))
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
