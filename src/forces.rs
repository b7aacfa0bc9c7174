//! Force laws evaluated over an immutable snapshot of the bodies.
//!
//! Every function here is pure: it reads `&[Body]` and returns one force per
//! body (indexed like the input). The simulation applies the returned deltas
//! once the whole phase has been computed, so the result does not depend on
//! the order in which bodies are visited.

use crate::body::Body;
use crate::vector::{Vector2, VectorExt};

use rayon::prelude::*;

/// Newtonian attraction on `a` exerted by `b`: `G * ma * mb / d^2` along `a -> b`.
///
/// Returns `None` when the two centres coincide. The force on `b` is the
/// exact negation of the returned value.
#[inline]
pub fn pair_gravity(a: &Body, b: &Body, gravitational_constant: f32) -> Option<Vector2> {
    let d = b.pos - a.pos;
    let dir = d.try_normalized()?;
    let dist_sq = d.mag_sq();
    Some(dir * (gravitational_constant * a.mass * b.mass / dist_sq))
}

/// Net mutual gravity on every body, summing each unordered pair once.
///
/// With `parallel` set, each body's total is gathered on the rayon pool.
/// Each pair force is still evaluated as `pair_gravity(lower, higher)` and
/// negated for the higher index, so Newton's third law holds exactly.
pub fn gravity_forces(bodies: &[Body], gravitational_constant: f32, parallel: bool) -> Vec<Vector2> {
    let n = bodies.len();
    if gravitational_constant == 0.0 {
        return vec![Vector2::zero(); n];
    }

    if parallel {
        return (0..n)
            .into_par_iter()
            .map(|i| {
                let mut total = Vector2::zero();
                for j in 0..n {
                    if j == i {
                        continue;
                    }
                    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
                    match pair_gravity(&bodies[lo], &bodies[hi], gravitational_constant) {
                        Some(f) if i == lo => total += f,
                        Some(f) => total -= f,
                        // reported by the lower index only
                        None if i == lo => log::trace!("gravity: bodies {lo} and {hi} coincide, pair skipped"),
                        None => {}
                    }
                }
                total
            })
            .collect();
    }

    let mut out = vec![Vector2::zero(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            match pair_gravity(&bodies[i], &bodies[j], gravitational_constant) {
                Some(f) => {
                    out[i] += f;
                    out[j] -= f;
                }
                None => log::trace!("gravity: bodies {i} and {j} coincide, pair skipped"),
            }
        }
    }
    out
}

/// Quadratic drag `-v_hat * |v|^2 * area * k`. `None` for a body at rest.
#[inline]
pub fn drag_force(body: &Body, drag_constant: f32) -> Option<Vector2> {
    let dir = body.vel.try_normalized()?;
    Some(-dir * body.vel.mag_sq() * body.surface_area() * drag_constant)
}

pub fn drag_forces(bodies: &[Body], drag_constant: f32, parallel: bool) -> Vec<Vector2> {
    let f = |body: &Body| drag_force(body, drag_constant).unwrap_or_else(Vector2::zero);
    if parallel {
        bodies.par_iter().map(f).collect()
    } else {
        bodies.iter().map(f).collect()
    }
}

/// Weight of a body in a uniform field: `field * mass`.
#[inline]
pub fn uniform_force(body: &Body, field: Vector2) -> Vector2 {
    field * body.mass
}
