use crate::body::Body;
use crate::error::Result;
use crate::simulation::Extent;
use crate::vector::Vector2;

/// Radius range of generated bodies.
pub const MIN_RADIUS: u32 = 5;
pub const MAX_RADIUS: u32 = 15;
/// Each velocity component is drawn from `[-MAX_SPEED, MAX_SPEED)`.
pub const MAX_SPEED: f32 = 2.0;

/// Generates `n` bodies scattered over `extent`, reproducible from `seed`.
/// - Radii are whole numbers in `MIN_RADIUS..=MAX_RADIUS`.
/// - Centres sit on whole coordinates anywhere in the extent (walls push them in on the first step).
/// - Velocities are uniform per component, density and elasticity are the body defaults.
pub fn random_bodies(n: usize, extent: Extent, seed: u64) -> Result<Vec<Body>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let max_x = extent.width.floor().max(0.0) as u32;
    let max_y = extent.height.floor().max(0.0) as u32;

    let mut bodies = Vec::with_capacity(n);
    for _ in 0..n {
        let radius = rng.u32(MIN_RADIUS..=MAX_RADIUS) as f32;
        let pos = Vector2::new(rng.u32(0..=max_x) as f32, rng.u32(0..=max_y) as f32);
        let vel = Vector2::new(
            (rng.f32() * 2.0 - 1.0) * MAX_SPEED,
            (rng.f32() * 2.0 - 1.0) * MAX_SPEED,
        );
        bodies.push(Body::new(pos, vel, radius)?);
    }

    Ok(bodies)
}
