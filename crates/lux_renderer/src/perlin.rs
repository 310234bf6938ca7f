//! Gradient noise field for the procedural noise texture.

use crate::material::random_unit_vector;
use lux_math::Vec3;
use rand::Rng;

const POINT_COUNT: usize = 256;

/// A Perlin gradient-noise field.
///
/// Holds 256 random unit gradients and three shuffled permutation tables.
/// Lattice lookups xor-combine the tables so the three axes decorrelate.
#[derive(Clone)]
pub struct Perlin {
    rand_vec: [Vec3; POINT_COUNT],
    perm_x: [usize; POINT_COUNT],
    perm_y: [usize; POINT_COUNT],
    perm_z: [usize; POINT_COUNT],
}

impl Perlin {
    /// Create a noise field with freshly sampled gradients.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();

        let mut rand_vec = [Vec3::ZERO; POINT_COUNT];
        for v in &mut rand_vec {
            *v = random_unit_vector(&mut rng);
        }

        Self {
            rand_vec,
            perm_x: Self::generate_perm(&mut rng),
            perm_y: Self::generate_perm(&mut rng),
            perm_z: Self::generate_perm(&mut rng),
        }
    }

    /// Noise value at a point, in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f64 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let ix = self.perm_x[((i + di as i64) & 255) as usize];
                    let iy = self.perm_y[((j + dj as i64) & 255) as usize];
                    let iz = self.perm_z[((k + dk as i64) & 255) as usize];
                    *corner = self.rand_vec[ix ^ iy ^ iz];
                }
            }
        }

        Self::interp(&c, u, v, w)
    }

    /// Turbulence: sum of |noise| over `depth` octaves at doubling
    /// frequency and halving weight.
    pub fn turb(&self, p: Vec3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }

    /// Identity table shuffled with Fisher-Yates.
    fn generate_perm(rng: &mut impl Rng) -> [usize; POINT_COUNT] {
        let mut perm = [0usize; POINT_COUNT];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = i;
        }

        for i in (1..POINT_COUNT).rev() {
            let target = rng.gen_range(0..=i);
            perm.swap(i, target);
        }

        perm
    }

    /// Trilinear interpolation of gradient dot products, smoothed with the
    /// Hermite cubic 3t^2 - 2t^3.
    fn interp(c: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);
        let mut accum = 0.0;

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let (fi, fj, fk) = (i as f64, j as f64, k as f64);
                    let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * c[i][j][k].dot(weight_v);
                }
            }
        }

        accum
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic_per_field() {
        let perlin = Perlin::new();
        let p = Vec3::new(1.3, 2.7, -0.4);
        assert_eq!(perlin.noise(p), perlin.noise(p));
    }

    #[test]
    fn test_noise_bounded() {
        let perlin = Perlin::new();
        for i in 0..100 {
            let t = i as f64 * 0.37;
            let p = Vec3::new(t, t * 0.5 - 3.0, -t * 0.25 + 1.0);
            let n = perlin.noise(p);
            assert!(n.abs() <= 1.0, "noise out of range: {n}");
        }
    }

    #[test]
    fn test_noise_vanishes_on_lattice() {
        // On integer lattice points every fractional offset weight is zero
        // in the smoothed corner opposite the gradient, so the value is the
        // dot of the corner gradient with the zero vector.
        let perlin = Perlin::new();
        let n = perlin.noise(Vec3::new(3.0, -2.0, 7.0));
        assert!(n.abs() < 1e-12);
    }

    #[test]
    fn test_turbulence_non_negative() {
        let perlin = Perlin::new();
        for i in 0..50 {
            let p = Vec3::splat(i as f64 * 0.11);
            assert!(perlin.turb(p, 7) >= 0.0);
        }
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let mut rng = rand::thread_rng();
        let perm = Perlin::generate_perm(&mut rng);
        let mut seen = [false; POINT_COUNT];
        for &idx in &perm {
            assert!(!seen[idx]);
            seen[idx] = true;
        }
    }
}
