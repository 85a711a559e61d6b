//! 3D simplex noise.
//!
//! Port of the `glsl-noise/simplex/3d` function (Ian McEwan, Ashima Arts,
//! MIT licensed) that the tiled-noise fragment program includes as
//! `#include <simplex_noise>`. Keeping the arithmetic identical to the WGSL
//! chunk lets the CPU reference predict what the GPU draws.

use cgmath::{Vector3, Vector4};

type V4 = Vector4<f32>;

fn mod289_3(x: Vector3<f32>) -> Vector3<f32> {
    x.map(|c| c - (c * (1.0 / 289.0)).floor() * 289.0)
}

fn mod289_4(x: V4) -> V4 {
    x.map(|c| c - (c * (1.0 / 289.0)).floor() * 289.0)
}

fn permute(x: V4) -> V4 {
    mod289_4(x.map(|c| (c * 34.0 + 1.0) * c))
}

fn taylor_inv_sqrt(r: V4) -> V4 {
    r.map(|c| 1.79284291400159 - 0.85373472095314 * c)
}

fn floor3(v: Vector3<f32>) -> Vector3<f32> {
    v.map(f32::floor)
}

fn floor4(v: V4) -> V4 {
    v.map(f32::floor)
}

fn step3(edge: Vector3<f32>, x: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        super::step(edge.x, x.x),
        super::step(edge.y, x.y),
        super::step(edge.z, x.z),
    )
}

fn mul4(a: V4, b: V4) -> V4 {
    V4::new(a.x * b.x, a.y * b.y, a.z * b.z, a.w * b.w)
}

fn dot3(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Simplex noise in three dimensions, roughly in `[-1, 1]`.
pub fn simplex3(v: Vector3<f32>) -> f32 {
    let c = (1.0_f32 / 6.0, 1.0_f32 / 3.0);

    // First corner
    let skew = dot3(v, Vector3::new(c.1, c.1, c.1));
    let i = floor3(v + Vector3::new(skew, skew, skew));
    let unskew = dot3(i, Vector3::new(c.0, c.0, c.0));
    let x0 = v - i + Vector3::new(unskew, unskew, unskew);

    // Other corners
    let g = step3(Vector3::new(x0.y, x0.z, x0.x), x0);
    let l = Vector3::new(1.0 - g.x, 1.0 - g.y, 1.0 - g.z);
    let l_zxy = Vector3::new(l.z, l.x, l.y);
    let i1 = Vector3::new(g.x.min(l_zxy.x), g.y.min(l_zxy.y), g.z.min(l_zxy.z));
    let i2 = Vector3::new(g.x.max(l_zxy.x), g.y.max(l_zxy.y), g.z.max(l_zxy.z));

    let x1 = x0 - i1 + Vector3::new(c.0, c.0, c.0);
    let x2 = x0 - i2 + Vector3::new(c.1, c.1, c.1);
    let x3 = x0 - Vector3::new(0.5, 0.5, 0.5);

    // Permutations
    let i = mod289_3(i);
    let p = permute(
        permute(
            permute(V4::new(0.0, i1.z, i2.z, 1.0).map(|c| c + i.z))
                + V4::new(0.0, i1.y, i2.y, 1.0).map(|c| c + i.y),
        ) + V4::new(0.0, i1.x, i2.x, 1.0).map(|c| c + i.x),
    );

    // Gradients: 7x7 points over a square, mapped onto an octahedron.
    let n_ = 0.142857142857_f32;
    let ns = Vector3::new(n_ * 2.0, n_ * 0.5 - 1.0, n_);

    let j = p - floor4(p.map(|c| c * ns.z * ns.z)) * 49.0;

    let x_ = floor4(j.map(|c| c * ns.z));
    let y_ = floor4(j - x_ * 7.0);

    let x = x_.map(|c| c * ns.x + ns.y);
    let y = y_.map(|c| c * ns.x + ns.y);
    let h = V4::new(
        1.0 - x.x.abs() - y.x.abs(),
        1.0 - x.y.abs() - y.y.abs(),
        1.0 - x.z.abs() - y.z.abs(),
        1.0 - x.w.abs() - y.w.abs(),
    );

    let b0 = V4::new(x.x, x.y, y.x, y.y);
    let b1 = V4::new(x.z, x.w, y.z, y.w);

    let s0 = floor4(b0).map(|c| c * 2.0 + 1.0);
    let s1 = floor4(b1).map(|c| c * 2.0 + 1.0);
    let sh = h.map(|c| -super::step(c, 0.0));

    let a0 = V4::new(b0.x, b0.z, b0.y, b0.w)
        + mul4(V4::new(s0.x, s0.z, s0.y, s0.w), V4::new(sh.x, sh.x, sh.y, sh.y));
    let a1 = V4::new(b1.x, b1.z, b1.y, b1.w)
        + mul4(V4::new(s1.x, s1.z, s1.y, s1.w), V4::new(sh.z, sh.z, sh.w, sh.w));

    let p0 = Vector3::new(a0.x, a0.y, h.x);
    let p1 = Vector3::new(a0.z, a0.w, h.y);
    let p2 = Vector3::new(a1.x, a1.y, h.z);
    let p3 = Vector3::new(a1.z, a1.w, h.w);

    // Normalise gradients
    let norm = taylor_inv_sqrt(V4::new(
        dot3(p0, p0),
        dot3(p1, p1),
        dot3(p2, p2),
        dot3(p3, p3),
    ));
    let p0 = p0 * norm.x;
    let p1 = p1 * norm.y;
    let p2 = p2 * norm.z;
    let p3 = p3 * norm.w;

    // Mix final noise value
    let m = V4::new(
        0.6 - dot3(x0, x0),
        0.6 - dot3(x1, x1),
        0.6 - dot3(x2, x2),
        0.6 - dot3(x3, x3),
    )
    .map(|c| c.max(0.0));
    let m = mul4(m, m);
    let m4 = mul4(m, m);
    42.0 * (m4.x * dot3(p0, x0) + m4.y * dot3(p1, x1) + m4.z * dot3(p2, x2) + m4.w * dot3(p3, x3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_output() {
        let p = Vector3::new(7.0, 2.0, 1.25);
        assert_eq!(simplex3(p).to_bits(), simplex3(p).to_bits());
    }

    #[test]
    fn stays_in_range() {
        for ix in -8..8 {
            for iy in -8..8 {
                for t in 0..6 {
                    let n = simplex3(Vector3::new(ix as f32 * 0.73, iy as f32 * 1.31, t as f32 * 0.4));
                    assert!(n.is_finite());
                    assert!((-1.2..=1.2).contains(&n), "noise {} out of range", n);
                }
            }
        }
    }

    #[test]
    fn varies_between_neighbours() {
        let a = simplex3(Vector3::new(3.0, 4.0, 0.5));
        let b = simplex3(Vector3::new(4.0, 4.0, 0.5));
        let c = simplex3(Vector3::new(3.0, 5.0, 0.5));
        assert!(a != b || a != c);
    }
}
