use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used by the BVH and the transform wrappers.
///
/// The box is stored as one interval per axis. Every constructor pads
/// degenerate axes so that no side is narrower than `MIN_SIZE`; this keeps
/// the slab test well-defined for flat primitives such as quads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Minimum side length of any constructed box.
const MIN_SIZE: f64 = 1e-4;

impl Aabb {
    /// Build a box directly from one interval per axis.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Build the box spanning two opposite corners; the points may come in
    /// any coordinate order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// The tightest box covering both inputs, one axis at a time.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        let mut aabb = Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Interval along axis n, where 0/1/2 select x/y/z.
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// True if the ray passes through the box somewhere in `ray_t`.
    ///
    /// Slab method: each axis narrows the candidate t range; the box is hit
    /// iff the range stays non-empty. A zero direction component produces
    /// infinite slab times, which IEEE arithmetic resolves correctly given
    /// the minimum-pad invariant.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let ax = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];

            let t0 = (ax.min - r.origin[axis]) * adinv;
            let t1 = (ax.max - r.origin[axis]) * adinv;

            ray_t.min = ray_t.min.max(t0.min(t1));
            ray_t.max = ray_t.max.min(t0.max(t1));

            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Index of the widest axis, used to pick BVH split directions.
    pub fn longest_axis(&self) -> usize {
        if self.x.size() > self.y.size() {
            if self.x.size() > self.z.size() {
                0
            } else {
                2
            }
        } else if self.y.size() > self.z.size() {
            1
        } else {
            2
        }
    }

    /// The box moved rigidly by an offset.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Widen any axis thinner than `MIN_SIZE`, keeping flat primitives
    /// hittable by the slab test.
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_SIZE {
            self.x = self.x.expand(MIN_SIZE);
        }
        if self.y.size() < MIN_SIZE {
            self.y = self.y.expand(MIN_SIZE);
        }
        if self.z.size() < MIN_SIZE {
            self.z = self.z.expand(MIN_SIZE);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points_orders_extrema() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));

        assert_eq!(aabb.x.min, 0.0);
        assert_eq!(aabb.x.max, 10.0);
        assert_eq!(aabb.y.min, 0.0);
        assert_eq!(aabb.y.max, 10.0);
        assert_eq!(aabb.z.min, -5.0);
        assert_eq!(aabb.z.max, 5.0);
    }

    #[test]
    fn test_aabb_surrounding_contains_corners() {
        let box0 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box1 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box0, &box1);

        for b in [&box0, &box1] {
            for axis in 0..3 {
                assert!(surrounding.axis_interval(axis).contains(b.axis_interval(axis).min));
                assert!(surrounding.axis_interval(axis).contains(b.axis_interval(axis).max));
            }
        }
    }

    #[test]
    fn test_aabb_minimum_pad() {
        // A flat box (zero extent in y) still has every side >= 1e-4.
        let aabb = Aabb::from_points(Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 1.0, 4.0));

        assert!(aabb.x.size() >= 1e-4);
        assert!(aabb.y.size() >= 1e-4);
        assert!(aabb.z.size() >= 1e-4);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(2.0, -1.0, -3.0), Vec3::new(4.0, 1.0, -1.0));
        let toward = Vec3::new(3.0, 0.0, -2.0).normalize();

        // Aimed at the box from outside: the entry time falls in a wide
        // query interval but not a short one.
        let ray = Ray::new(Vec3::ZERO, toward);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 1.0)));

        // Negative t would be required once the box is behind the origin.
        let ray = Ray::new(Vec3::ZERO, -toward);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Slides past the box on the y slab.
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), toward);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_zero_direction_component() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Direction has a zero y component; the ray runs inside the slab.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Same direction but origin outside the y slab never enters the box.
        let ray = Ray::new(Vec3::new(0.0, 5.0, -5.0), Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_longest_axis() {
        // The winner depends on extent, not on where the box sits.
        let stretched_y = Aabb::from_points(Vec3::new(-1.0, -8.0, 2.0), Vec3::new(1.0, 5.0, 4.0));
        assert_eq!(stretched_y.longest_axis(), 1);

        let stretched_z = Aabb::from_points(Vec3::splat(-0.5), Vec3::new(0.5, 0.5, 20.0));
        assert_eq!(stretched_z.longest_axis(), 2);

        // On an exact tie between x and z, x is not preferred.
        let tied = Aabb::from_points(Vec3::ZERO, Vec3::new(3.0, 1.0, 3.0));
        assert_eq!(tied.longest_axis(), 2);
    }

    #[test]
    fn test_aabb_translate_preserves_size() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(1.0, 3.0, 4.0));
        let moved = aabb.translate(Vec3::new(10.0, -2.0, 0.5));

        assert_eq!(moved.x.min, 9.0);
        assert_eq!(moved.x.max, 11.0);
        assert_eq!(moved.y.min, 0.0);
        assert_eq!(moved.z.max, 4.5);
        for axis in 0..3 {
            assert_eq!(moved.axis_interval(axis).size(), aabb.axis_interval(axis).size());
        }
    }
}
