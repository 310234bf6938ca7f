//! Hit records and the primitive variants they come from.

use crate::{
    bvh::BvhNode, material::Material, quad::Quad, sphere::Sphere, transform::Translate,
    transform::RotateY, volume::ConstantMedium, Ray,
};
use lux_math::{Aabb, Interval, Vec3};

/// Record of a ray-primitive intersection.
///
/// Created per intersection query; borrows the material of the primitive
/// that produced it.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// World-space location of the hit
    pub p: Vec3,
    /// Surface normal, always oriented against the incoming ray
    pub normal: Vec3,
    /// Shading model of the primitive that was hit
    pub material: &'a Material,
    /// Surface parameterization for texture lookup
    pub u: f64,
    pub v: f64,
    /// Ray parameter of the hit
    pub t: f64,
    /// True when the ray arrived from outside the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record from an outward normal, orienting it against the ray.
    ///
    /// `outward_normal` is assumed to have unit length.
    pub fn new(
        ray: &Ray,
        p: Vec3,
        outward_normal: Vec3,
        t: f64,
        u: f64,
        v: f64,
        material: &'a Material,
    ) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p,
            normal,
            material,
            u,
            v,
            t,
            front_face,
        }
    }
}

/// A surface or volume a ray can intersect.
///
/// Encoded as a closed set of variants so the intersection loop dispatches
/// with an exhaustive match. Wrappers and the BVH own their children by
/// value; shared materials sit behind `Arc` inside the leaf types.
#[derive(Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Quad(Quad),
    ConstantMedium(ConstantMedium),
    Translate(Translate),
    RotateY(RotateY),
    List(PrimitiveList),
    Bvh(BvhNode),
}

impl Primitive {
    /// Test the ray against this primitive within the given interval.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Self::Sphere(sphere) => sphere.hit(ray, ray_t),
            Self::Quad(quad) => quad.hit(ray, ray_t),
            Self::ConstantMedium(medium) => medium.hit(ray, ray_t),
            Self::Translate(translate) => translate.hit(ray, ray_t),
            Self::RotateY(rotate) => rotate.hit(ray, ray_t),
            Self::List(list) => list.hit(ray, ray_t),
            Self::Bvh(bvh) => bvh.hit(ray, ray_t),
        }
    }

    /// Get the axis-aligned bounding box of this primitive.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Self::Sphere(sphere) => sphere.bounding_box(),
            Self::Quad(quad) => quad.bounding_box(),
            Self::ConstantMedium(medium) => medium.bounding_box(),
            Self::Translate(translate) => translate.bounding_box(),
            Self::RotateY(rotate) => rotate.bounding_box(),
            Self::List(list) => list.bounding_box(),
            Self::Bvh(bvh) => bvh.bounding_box(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<Quad> for Primitive {
    fn from(quad: Quad) -> Self {
        Self::Quad(quad)
    }
}

impl From<ConstantMedium> for Primitive {
    fn from(medium: ConstantMedium) -> Self {
        Self::ConstantMedium(medium)
    }
}

impl From<Translate> for Primitive {
    fn from(translate: Translate) -> Self {
        Self::Translate(translate)
    }
}

impl From<RotateY> for Primitive {
    fn from(rotate: RotateY) -> Self {
        Self::RotateY(rotate)
    }
}

impl From<PrimitiveList> for Primitive {
    fn from(list: PrimitiveList) -> Self {
        Self::List(list)
    }
}

impl From<BvhNode> for Primitive {
    fn from(bvh: BvhNode) -> Self {
        Self::Bvh(bvh)
    }
}

/// A flat list of primitives, scanned closest-wins.
///
/// Doubles as the scene root that drivers assemble into before rendering.
#[derive(Clone)]
pub struct PrimitiveList {
    objects: Vec<Primitive>,
    bbox: Aabb,
}

impl PrimitiveList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add a primitive to the list.
    pub fn add(&mut self, object: impl Into<Primitive>) {
        let object = object.into();
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Clear all primitives from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    /// Get the number of primitives.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when no primitives have been added.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Read access to the primitives.
    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    /// Consume the list, yielding its primitives (e.g. for BVH construction).
    pub fn into_objects(self) -> Vec<Primitive> {
        self.objects
    }

    /// Find the closest hit across all primitives, if any.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

impl Default for PrimitiveList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Material};

    #[test]
    fn test_list_closest_wins() {
        // A small sphere in front of a huge ground sphere.
        let mut list = PrimitiveList::new();
        list.add(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::lambertian(Color::ONE).into(),
        ));
        list.add(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Material::lambertian(Color::ONE).into(),
        ));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let rec = list
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("ray toward both spheres must hit");
        assert!((rec.t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_list_empty_misses() {
        let list = PrimitiveList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(list.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_list_bbox_unions_members() {
        let mut list = PrimitiveList::new();
        list.add(Sphere::new(
            Vec3::new(-2.0, 0.0, 0.0),
            1.0,
            Material::lambertian(Color::ONE).into(),
        ));
        list.add(Sphere::new(
            Vec3::new(3.0, 0.0, 0.0),
            1.0,
            Material::lambertian(Color::ONE).into(),
        ));

        let bbox = list.bounding_box();
        assert!(bbox.x.contains(-3.0));
        assert!(bbox.x.contains(4.0));
    }
}
