// Double-precision math kernel for the lux path tracer.

// Re-export glam's f64 vector as our Vec3; it is used interchangeably as a
// point, a direction, and a linear RGB colour.
pub use glam::DVec3 as Vec3;

mod interval;
pub use interval::Interval;

mod ray;
pub use ray::Ray;

mod aabb;
pub use aabb::Aabb;
