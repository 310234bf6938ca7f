//! Planar primitives: parallelogram, triangle, ellipse, annulus, and the
//! six-sided box factory.

use crate::{hittable::HitRecord, hittable::PrimitiveList, material::Material, Ray};
use lux_math::{Aabb, Interval, Vec3};
use std::sync::Arc;

/// Interior predicate selecting which part of the plane counts as a hit.
#[derive(Clone, Copy, Debug)]
pub enum PlanarShape {
    /// Full parallelogram spanned by the two edge vectors.
    Parallelogram,
    /// Half of the parallelogram below the diagonal.
    Triangle,
    /// Ellipse inscribed in the parallelogram centered on Q.
    Ellipse,
    /// Ellipse with a concentric hole of the given relative inner radius.
    Annulus { inner: f64 },
}

/// A planar primitive on the parallelogram frame (Q, u, v).
///
/// For the parallelogram and triangle, Q is the corner the edge vectors
/// emanate from. For the ellipse and annulus, Q is the center and u/v are
/// the half-axis spans.
#[derive(Clone)]
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// Reciprocal basis vector for plane coordinates: (u x v) / |u x v|^2
    w: Vec3,
    normal: Vec3,
    d: f64,
    shape: PlanarShape,
    material: Arc<Material>,
    bbox: Aabb,
}

/// Rays closer than this to parallel with the plane are treated as misses.
const PARALLEL_EPSILON: f64 = 1e-8;

impl Quad {
    /// Create a parallelogram from corner Q and edge vectors u, v.
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        Self::with_shape(q, u, v, PlanarShape::Parallelogram, material)
    }

    /// Create a triangle with vertices Q, Q+u, Q+v.
    pub fn triangle(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        Self::with_shape(q, u, v, PlanarShape::Triangle, material)
    }

    /// Create an ellipse centered at Q with half-axis spans u and v.
    pub fn ellipse(center: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        Self::with_shape(center, u, v, PlanarShape::Ellipse, material)
    }

    /// Create an annulus centered at Q; `inner` is the hole radius relative
    /// to the outer edge.
    pub fn annulus(center: Vec3, u: Vec3, v: Vec3, inner: f64, material: Arc<Material>) -> Self {
        Self::with_shape(center, u, v, PlanarShape::Annulus { inner }, material)
    }

    fn with_shape(q: Vec3, u: Vec3, v: Vec3, shape: PlanarShape, material: Arc<Material>) -> Self {
        let bbox = Self::shape_bbox(q, u, v, shape);

        // For the centered shapes, plane coordinates are taken from the
        // corner so that (0.5, 0.5) lands on the center Q and the interior
        // predicate agrees with the bounding box.
        let q = match shape {
            PlanarShape::Parallelogram | PlanarShape::Triangle => q,
            PlanarShape::Ellipse | PlanarShape::Annulus { .. } => q - u / 2.0 - v / 2.0,
        };

        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            shape,
            material,
            bbox,
        }
    }

    fn shape_bbox(q: Vec3, u: Vec3, v: Vec3, shape: PlanarShape) -> Aabb {
        match shape {
            PlanarShape::Parallelogram | PlanarShape::Triangle => {
                // Box of all four vertices via the two diagonals.
                let diagonal1 = Aabb::from_points(q, q + u + v);
                let diagonal2 = Aabb::from_points(q + u, q + v);
                Aabb::surrounding(&diagonal1, &diagonal2)
            }
            PlanarShape::Ellipse | PlanarShape::Annulus { .. } => {
                // Centered shapes span half of each edge vector around Q.
                let half_u = u / 2.0;
                let half_v = v / 2.0;
                Aabb::from_points(q - half_u - half_v, q + half_u + half_v)
            }
        }
    }

    /// Decide whether plane coordinates (alpha, beta) fall inside the
    /// shape; on success yield the UV coordinates to record.
    fn is_interior(&self, alpha: f64, beta: f64) -> Option<(f64, f64)> {
        let inside = match self.shape {
            PlanarShape::Parallelogram => {
                let unit = Interval::new(0.0, 1.0);
                unit.contains(alpha) && unit.contains(beta)
            }
            PlanarShape::Triangle => alpha >= 0.0 && beta >= 0.0 && alpha + beta <= 1.0,
            PlanarShape::Ellipse => {
                // Plane coordinates run corner-to-corner; recenter on Q.
                let offset_a = alpha * 2.0 - 1.0;
                let offset_b = beta * 2.0 - 1.0;
                offset_a * offset_a + offset_b * offset_b <= 1.0
            }
            PlanarShape::Annulus { inner } => {
                let offset_a = alpha * 2.0 - 1.0;
                let offset_b = beta * 2.0 - 1.0;
                let center_dist = (offset_a * offset_a + offset_b * offset_b).sqrt();
                inner <= center_dist && center_dist <= 1.0
            }
        };

        inside.then_some((alpha, beta))
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction);

        // No hit if the ray is parallel to the plane.
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        // Reject if the plane crossing lies outside the query interval.
        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Express the crossing in plane coordinates and test the shape.
        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let (u, v) = self.is_interior(alpha, beta)?;

        Some(HitRecord::new(
            ray,
            intersection,
            self.normal,
            t,
            u,
            v,
            &self.material,
        ))
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Build the six faces of an axis-aligned box spanning two opposite
/// corners, each face oriented outward.
pub fn box_sides(a: Vec3, b: Vec3, material: Arc<Material>) -> PrimitiveList {
    let mut sides = PrimitiveList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front
    sides.add(Quad::new(
        Vec3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    ));
    // right
    sides.add(Quad::new(
        Vec3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    ));
    // back
    sides.add(Quad::new(
        Vec3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    ));
    // left
    sides.add(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    ));
    // top
    sides.add(Quad::new(
        Vec3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    ));
    // bottom
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material));

    sides
}
