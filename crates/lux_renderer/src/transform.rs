//! Rigid transform wrappers around primitives.
//!
//! Instead of transforming the object, the incoming ray is moved into the
//! object's local space and the hit is mapped back out.

use crate::{
    hittable::{HitRecord, Primitive},
    Ray,
};
use lux_math::{Aabb, Interval, Vec3};

/// Translates a wrapped primitive by a fixed offset.
#[derive(Clone)]
pub struct Translate {
    object: Box<Primitive>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: impl Into<Primitive>, offset: Vec3) -> Self {
        let object = Box::new(object.into());
        let bbox = object.bounding_box().translate(offset);

        Self {
            object,
            offset,
            bbox,
        }
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Move the ray backwards by the offset
        let offset_ray = Ray::new(ray.origin - self.offset, ray.direction);

        // Intersect in local space, then move the hit point forward again
        let mut rec = self.object.hit(&offset_ray, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotates a wrapped primitive around the Y axis.
#[derive(Clone)]
pub struct RotateY {
    object: Box<Primitive>,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: impl Into<Primitive>, degrees: f64) -> Self {
        let object = Box::new(object.into());
        let radians = degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // World-space box of the eight rotated corners of the child's box.
        let child_bbox = object.bounding_box();
        let mut min = Vec3::splat(f64::INFINITY);
        let mut max = Vec3::splat(f64::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 0 { child_bbox.x.min } else { child_bbox.x.max };
                    let y = if j == 0 { child_bbox.y.min } else { child_bbox.y.max };
                    let z = if k == 0 { child_bbox.z.min } else { child_bbox.z.max };

                    let new_x = cos_theta * x + sin_theta * z;
                    let new_z = -sin_theta * x + cos_theta * z;

                    let tester = Vec3::new(new_x, y, new_z);
                    min = min.min(tester);
                    max = max.max(tester);
                }
            }
        }

        let bbox = Aabb::from_points(min, max);

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox,
        }
    }

    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Transform the ray from world space to object space.
        let rotated = Ray::new(self.to_local(ray.origin), self.to_local(ray.direction));

        // Intersect in object space, then rotate the hit back out.
        let mut rec = self.object.hit(&rotated, ray_t)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Material};
    use crate::sphere::Sphere;

    fn unit_sphere_at(center: Vec3) -> Sphere {
        Sphere::new(center, 1.0, Material::lambertian(Color::splat(0.5)).into())
    }

    #[test]
    fn test_translate_shifts_hit_location() {
        let translated = Translate::new(
            unit_sphere_at(Vec3::new(0.0, 0.0, -5.0)),
            Vec3::new(3.0, 0.0, 0.0),
        );

        // The sphere now sits at (3, 0, -5).
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), -Vec3::Z);
        let rec = translated
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("ray at translated center must hit");

        assert!((rec.t - 4.0).abs() < 1e-12);
        assert!((rec.p - Vec3::new(3.0, 0.0, -4.0)).length() < 1e-12);
        assert_eq!(rec.normal, Vec3::Z);

        // The original location misses.
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(translated.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_translate_bbox_shifted() {
        let translated = Translate::new(unit_sphere_at(Vec3::ZERO), Vec3::new(0.0, 10.0, 0.0));
        let bbox = translated.bounding_box();

        assert_eq!(bbox.y.min, 9.0);
        assert_eq!(bbox.y.max, 11.0);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // A sphere at +X rotated 90 degrees lands on -Z.
        let rotated = RotateY::new(unit_sphere_at(Vec3::new(5.0, 0.0, 0.0)), 90.0);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let rec = rotated
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("rotated sphere must sit on -Z");

        assert!((rec.t - 4.0).abs() < 1e-9);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-9);
        // World-space normal points back toward the ray origin.
        assert!((rec.normal - Vec3::Z).length() < 1e-9);

        // The untransformed position no longer hits.
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(rotated.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_rotate_y_bbox_covers_rotated_corners() {
        let rotated = RotateY::new(unit_sphere_at(Vec3::new(5.0, 0.0, 0.0)), 90.0);
        let bbox = rotated.bounding_box();

        // The rotated sphere spans z in [-6, -4].
        assert!(bbox.z.contains(-6.0));
        assert!(bbox.z.contains(-4.0));
        assert!(bbox.x.contains(0.0));
    }

    #[test]
    fn test_rotate_y_zero_angle_is_identity() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -5.0));
        let expected = sphere.bounding_box();
        let rotated = RotateY::new(sphere, 0.0);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let rec = rotated.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-12);

        let bbox = rotated.bounding_box();
        assert!((bbox.z.min - expected.z.min).abs() < 1e-9);
        assert!((bbox.z.max - expected.z.max).abs() < 1e-9);
    }
}
