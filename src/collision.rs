use crate::body::Body;
use crate::simulation::Extent;
use crate::vector::VectorExt;

use serde::{Deserialize, Serialize};

/// How the restitution of a colliding pair is derived from the two bodies' elasticities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestitutionRule {
    /// Elasticity of the lower-indexed body only. Order dependent, kept for
    /// compatibility with scenes tuned against that behaviour.
    First,
    /// The smaller of the two.
    #[default]
    Min,
    /// Arithmetic mean.
    Average,
    /// Product of both coefficients.
    Product,
}

impl RestitutionRule {
    #[inline]
    pub fn combine(self, first: f32, second: f32) -> f32 {
        match self {
            RestitutionRule::First => first,
            RestitutionRule::Min => first.min(second),
            RestitutionRule::Average => 0.5 * (first + second),
            RestitutionRule::Product => first * second,
        }
    }
}

/// The two circles overlap (strictly; touching is not a collision).
#[inline]
pub fn overlapping(a: &Body, b: &Body) -> bool {
    let r = a.radius + b.radius;
    (b.pos - a.pos).mag_sq() < r * r
}

/// Applies an impulse along the contact normal to two overlapping bodies.
///
/// Nothing happens when the bodies are already separating or when their
/// centres coincide (no usable normal). Positions are never corrected.
/// Returns whether an impulse was applied.
pub fn resolve_pair(a: &mut Body, b: &mut Body, rule: RestitutionRule) -> bool {
    let Some(normal) = (b.pos - a.pos).try_normalized() else {
        log::trace!("collision: coincident centres at {:?}, pair skipped", a.pos);
        return false;
    };

    let vel_along_normal = (b.vel - a.vel).dot(normal);
    if vel_along_normal > 0.0 {
        return false;
    }

    let e = rule.combine(a.elasticity, b.elasticity);
    let j = -(1.0 + e) * vel_along_normal / (1.0 / a.mass + 1.0 / b.mass);
    let impulse = normal * j;

    a.vel -= impulse / a.mass;
    b.vel += impulse / b.mass;
    true
}

/// Clamps a body back inside `extent` and reflects the velocity component
/// normal to every wall it crossed, scaled by the body's own elasticity.
///
/// Returns whether any wall was hit.
pub fn resolve_walls(body: &mut Body, extent: Extent) -> bool {
    let mut hit = false;

    if body.pos.x - body.radius < 0.0 {
        body.vel.x *= -body.elasticity;
        body.pos.x = body.radius;
        hit = true;
    }
    if body.pos.x + body.radius > extent.width {
        body.vel.x *= -body.elasticity;
        body.pos.x = extent.width - body.radius;
        hit = true;
    }
    if body.pos.y - body.radius < 0.0 {
        body.vel.y *= -body.elasticity;
        body.pos.y = body.radius;
        hit = true;
    }
    if body.pos.y + body.radius > extent.height {
        body.vel.y *= -body.elasticity;
        body.pos.y = extent.height - body.radius;
        hit = true;
    }

    hit
}
