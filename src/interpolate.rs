//! Interpolator (C2).
//!
//! Given four successive keys (`a, b, c, d`) and a normalized position
//! `u ∈ [0, 1]` within the `b → c` interval, produces the interpolated
//! output for one of the four interpolation modes crossed with the two
//! value kinds (scalar, quaternion). See spec.md §4.2.

use glam::{Quat, Vec3, Vec4};

/// Degenerate-math fallbacks never propagate as errors (spec.md §7); they
/// resolve locally to the value documented on each function.

/// `CONSTANT`: hold `b`'s value, no math.
#[inline]
pub fn constant(b: Vec4) -> Vec4 {
    b
}

/// `LINEAR`, scalar: `lerp(b, c, u)`.
#[inline]
pub fn lerp_scalar(b: Vec4, c: Vec4, u: f32) -> Vec4 {
    b.lerp(c, u)
}

/// `LINEAR`, quaternion: shortest-arc spherical linear interpolation.
///
/// Falls back to a normalized lerp when the two quaternions are nearly
/// parallel (slerp's `1/sin(theta)` term becomes numerically unstable there)
/// — the "quaternion slerp near-180°" fallback from spec.md §4.2.
pub fn slerp_quat(b: Quat, c: Quat, u: f32) -> Quat {
    let mut dot = b.dot(c);
    let c = if dot < 0.0 {
        dot = -dot;
        -c
    } else {
        c
    };

    if dot > 0.9995 {
        return nlerp(b, c, u);
    }

    let theta = dot.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let wa = ((1.0 - u) * theta).sin() / sin_theta;
    let wb = (u * theta).sin() / sin_theta;
    normalize_or_identity(Quat::from_xyzw(
        wa * b.x + wb * c.x,
        wa * b.y + wb * c.y,
        wa * b.z + wb * c.z,
        wa * b.w + wb * c.w,
    ))
}

fn nlerp(b: Quat, c: Quat, u: f32) -> Quat {
    normalize_or_identity(Quat::from_xyzw(
        b.x + (c.x - b.x) * u,
        b.y + (c.y - b.y) * u,
        b.z + (c.z - b.z) * u,
        b.w + (c.w - b.w) * u,
    ))
}

fn normalize_or_identity(q: Quat) -> Quat {
    let len_sq = q.length_squared();
    if len_sq < 1e-12 {
        Quat::IDENTITY
    } else {
        q / len_sq.sqrt()
    }
}

/// `CUBIC`, scalar: Catmull-Rom with the canonical 4-point weight matrix.
#[inline]
pub fn catmull_rom_scalar(a: Vec4, b: Vec4, c: Vec4, d: Vec4, u: f32) -> Vec4 {
    let u2 = u * u;
    let u3 = u2 * u;
    0.5 * (2.0 * b + (-a + c) * u + (2.0 * a - 5.0 * b + 4.0 * c - d) * u2
        + (-a + 3.0 * b - 3.0 * c + d) * u3)
}

/// `CUBIC`, quaternion: squad through intermediate control quaternions
/// derived from the four neighbouring keys.
///
/// Neighbourhoods are made consistent (shortest arc, chained sign flips)
/// before the intermediate control quaternions are built, per spec.md §4.2.
pub fn squad_quat(a: Quat, b: Quat, c: Quat, d: Quat, u: f32) -> Quat {
    let b = b;
    let a = if a.dot(b) < 0.0 { -a } else { a };
    let c = if b.dot(c) < 0.0 { -c } else { c };
    let d = if c.dot(d) < 0.0 { -d } else { d };

    let s_b = squad_tangent(a, b, c);
    let s_c = squad_tangent(b, c, d);

    let slerp_outer = slerp_shortest(b, c, u);
    let slerp_inner = slerp_shortest(s_b, s_c, u);
    slerp_shortest(slerp_outer, slerp_inner, 2.0 * u * (1.0 - u))
}

/// Shortest-arc slerp without the near-parallel fallback, used internally by
/// squad where both endpoints are already close to `q` and instability is
/// not a concern in practice; still guards the zero-length case.
fn slerp_shortest(b: Quat, c: Quat, u: f32) -> Quat {
    let mut dot = b.dot(c);
    let c = if dot < 0.0 {
        dot = -dot;
        -c
    } else {
        c
    };
    if dot > 0.9995 {
        return nlerp(b, c, u);
    }
    let theta = dot.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let wa = ((1.0 - u) * theta).sin() / sin_theta;
    let wb = (u * theta).sin() / sin_theta;
    normalize_or_identity(Quat::from_xyzw(
        wa * b.x + wb * c.x,
        wa * b.y + wb * c.y,
        wa * b.z + wb * c.z,
        wa * b.w + wb * c.w,
    ))
}

/// Shoemake's quaternion log: maps a unit quaternion to its rotation vector.
fn quat_log(q: Quat) -> Vec3 {
    let w = q.w.clamp(-1.0, 1.0);
    let v = Vec3::new(q.x, q.y, q.z);
    let vlen = v.length();
    if vlen < 1e-6 {
        Vec3::ZERO
    } else {
        v.normalize() * vlen.atan2(w)
    }
}

/// Shoemake's quaternion exp: the inverse of [`quat_log`].
fn quat_exp(v: Vec3) -> Quat {
    let theta = v.length();
    if theta < 1e-6 {
        Quat::IDENTITY
    } else {
        let (s, c) = theta.sin_cos();
        let axis = v / theta;
        Quat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c)
    }
}

fn squad_tangent(prev: Quat, q: Quat, next: Quat) -> Quat {
    let inv = q.inverse();
    let log_prev = quat_log(inv * prev);
    let log_next = quat_log(inv * next);
    q * quat_exp((log_prev + log_next) * -0.25)
}

/// `BEZIER`, scalar. `u` is first remapped through the time-domain Bezier
/// solve, then the value-domain Bezier is evaluated at the remapped
/// parameter. See spec.md §4.2.
///
/// `out_time`/`in_time` are the raw 8-bit tangent time offsets (already
/// scaled to `[0,1]` of the segment by the caller); `out_value`/`in_value`
/// are the value-domain tangent offsets relative to `v_b`/`v_c`.
pub fn bezier_scalar(
    v_b: f32,
    v_c: f32,
    out_value: f32,
    in_value: f32,
    out_time: f32,
    in_time: f32,
    u: f32,
) -> f32 {
    // Time control points in the unit interval: P0=0, P3=1.
    let p1 = out_time.clamp(0.0, 1.0);
    let p2 = (1.0 - in_time).clamp(0.0, 1.0);
    let u_prime = solve_cubic_bezier_time(p1, p2, u);

    let p0 = v_b;
    let p1v = v_b + out_value;
    let p2v = v_c - in_value;
    let p3v = v_c;
    cubic_bezier_1d(p0, p1v, p2v, p3v, u_prime)
}

/// Evaluate a 1D cubic Bezier curve at parameter `s`.
fn cubic_bezier_1d(p0: f32, p1: f32, p2: f32, p3: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    let inv2 = inv * inv;
    let inv3 = inv2 * inv;
    let s2 = s * s;
    let s3 = s2 * s;
    inv3 * p0 + 3.0 * inv2 * s * p1 + 3.0 * inv * s2 * p2 + s3 * p3
}

/// Solve `bezier(0, p1, p2, 1, s) = u` for `s`, via Newton-Raphson with a
/// bisection fallback. The curve is monotone for `p1, p2 ∈ [0, 1]`, so a
/// unique root always exists in `[0, 1]`.
fn solve_cubic_bezier_time(p1: f32, p2: f32, u: f32) -> f32 {
    if u <= 0.0 {
        return 0.0;
    }
    if u >= 1.0 {
        return 1.0;
    }

    let f = |s: f32| cubic_bezier_1d(0.0, p1, p2, 1.0, s) - u;
    let df = |s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    };

    let mut s = u;
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    for _ in 0..8 {
        let fs = f(s);
        if fs.abs() < 1e-6 {
            return s;
        }
        if fs > 0.0 {
            hi = s;
        } else {
            lo = s;
        }
        let d = df(s);
        let next = if d.abs() > 1e-6 { s - fs / d } else { s };
        s = if next > lo && next < hi {
            next
        } else {
            0.5 * (lo + hi)
        };
    }
    s.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_scalar_midpoint() {
        let b = Vec4::new(0.0, 0.0, 0.0, 0.0);
        let c = Vec4::new(2.0, 0.0, 0.0, 0.0);
        assert!((lerp_scalar(b, c, 0.5).x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn catmull_rom_matches_linear_on_straight_line() {
        // On a straight line, Catmull-Rom reproduces the linear interpolant.
        let a = Vec4::new(-1.0, 0.0, 0.0, 0.0);
        let b = Vec4::new(0.0, 0.0, 0.0, 0.0);
        let c = Vec4::new(1.0, 0.0, 0.0, 0.0);
        let d = Vec4::new(2.0, 0.0, 0.0, 0.0);
        let out = catmull_rom_scalar(a, b, c, d, 0.5);
        assert!((out.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn slerp_endpoints_are_exact() {
        let b = Quat::from_rotation_y(0.0);
        let c = Quat::from_rotation_y(1.0);
        assert!(slerp_quat(b, c, 0.0).abs_diff_eq(b, 1e-5));
        assert!(slerp_quat(b, c, 1.0).abs_diff_eq(c, 1e-5));
    }

    #[test]
    fn slerp_stays_unit_length() {
        let b = Quat::from_rotation_y(0.1);
        let c = Quat::from_rotation_x(0.4);
        for i in 0..=10 {
            let u = i as f32 / 10.0;
            let q = slerp_quat(b, c, u);
            assert!((q.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let b = Quat::from_xyzw(0.0, 0.0, 0.0, 1.0);
        let c = -b; // same rotation, opposite hemisphere
        let mid = slerp_quat(b, c, 0.5);
        assert!(mid.abs_diff_eq(b, 1e-4) || mid.abs_diff_eq(Quat::IDENTITY, 1e-4));
    }

    #[test]
    fn squad_endpoints_match_outer_keys() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(0.2);
        let c = Quat::from_rotation_y(0.6);
        let d = Quat::from_rotation_y(1.0);
        let at_0 = squad_quat(a, b, c, d, 0.0);
        let at_1 = squad_quat(a, b, c, d, 1.0);
        assert!(at_0.abs_diff_eq(b, 1e-3));
        assert!(at_1.abs_diff_eq(c, 1e-3));
    }

    #[test]
    fn bezier_scalar_endpoints() {
        let out = bezier_scalar(0.0, 1.0, 0.2, -0.2, 0.33, 0.33, 0.0);
        assert!((out - 0.0).abs() < 1e-5);
        let out = bezier_scalar(0.0, 1.0, 0.2, -0.2, 0.33, 0.33, 1.0);
        assert!((out - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bezier_time_solve_is_monotone() {
        let mut prev = 0.0;
        for i in 0..=10 {
            let u = i as f32 / 10.0;
            let s = solve_cubic_bezier_time(0.2, 0.8, u);
            assert!(s >= prev - 1e-6);
            prev = s;
        }
    }
}
