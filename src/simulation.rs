use crate::{
    body::Body,
    collision::{self, RestitutionRule},
    error::{Error, Result},
    forces,
    utils,
    vector::{Vector2, VectorExt},
};

use serde::{Deserialize, Serialize};

/// Width and height of the world rectangle `[0, width] x [0, height]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let extent = Self { width, height };
        extent.validate()?;
        Ok(extent)
    }

    /// Both sides finite and > 0.
    pub fn validate(&self) -> Result<()> {
        let Self { width, height } = *self;
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidWorld(format!(
                "extent must be finite and > 0, got {width} x {height}"
            )));
        }
        Ok(())
    }

    /// Errors with [`Error::InvalidBody`] when the body's diameter exceeds either side.
    /// Such a body would touch both opposite walls at once.
    pub fn check_fits(&self, body: &Body) -> Result<()> {
        let diameter = 2.0 * body.radius;
        if diameter > self.width || diameter > self.height {
            return Err(Error::InvalidBody(format!(
                "radius {} does not fit extent {} x {}",
                body.radius, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Physical constants and tuning knobs of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldParams {
    /// Fixed time step per call to [`Simulation::step`].
    pub dt: f32,
    /// Uniform field applied to every body on every step (`force = gravity * mass`).
    pub gravity: Vector2,
    /// Strength of mutual attraction.
    pub gravitational_constant: f32,
    /// Strength of quadratic drag.
    pub drag_constant: f32,
    pub restitution: RestitutionRule,
    /// Evaluate gravity and drag on the rayon pool.
    pub parallel: bool,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            dt: Simulation::DEFAULT_DT,
            gravity: Vector2::zero(),
            gravitational_constant: Simulation::DEFAULT_GRAVITATIONAL_CONSTANT,
            drag_constant: Simulation::DEFAULT_DRAG_CONSTANT,
            restitution: RestitutionRule::default(),
            parallel: false,
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::InvalidWorld(format!("dt must be finite and > 0, got {}", self.dt)));
        }
        if !self.gravity.is_finite() {
            return Err(Error::InvalidWorld(format!("gravity must be finite, got {:?}", self.gravity)));
        }
        if !self.gravitational_constant.is_finite() {
            return Err(Error::InvalidWorld("gravitational constant must be finite".into()));
        }
        if !self.drag_constant.is_finite() || self.drag_constant < 0.0 {
            return Err(Error::InvalidWorld(format!(
                "drag constant must be finite and >= 0, got {}",
                self.drag_constant
            )));
        }
        Ok(())
    }
}

/// A fixed set of circular bodies advanced one time step at a time.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    /// Bodies in interaction order. Collision resolution visits pairs in this order.
    pub bodies: Vec<Body>,
    pub params: WorldParams,
    pub extent: Extent,
    /// Number of completed steps.
    pub frame: usize,
}

impl Simulation {
    /// Default constants.
    pub const DEFAULT_DT: f32 = 1.0;
    pub const DEFAULT_GRAVITATIONAL_CONSTANT: f32 = 1e-3;
    pub const DEFAULT_DRAG_CONSTANT: f32 = 1e-8;

    /// Initializes a world from already validated bodies.
    ///
    /// Errors when the extent or parameters are invalid, or when a body is
    /// wider than the world.
    pub fn with_bodies(bodies: Vec<Body>, extent: Extent, params: WorldParams) -> Result<Self> {
        extent.validate()?;
        params.validate()?;
        for body in &bodies {
            extent.check_fits(body)?;
        }
        log::debug!(
            "simulation created: {} bodies, extent {}x{}, {:?}",
            bodies.len(),
            extent.width,
            extent.height,
            params
        );
        Ok(Self {
            bodies,
            params,
            extent,
            frame: 0,
        })
    }

    /// World filled with `n` random bodies, reproducible from `seed`.
    pub fn random(n: usize, extent: Extent, params: WorldParams, seed: u64) -> Result<Self> {
        extent.validate()?;
        let bodies = utils::random_bodies(n, extent, seed)?;
        Self::with_bodies(bodies, extent, params)
    }

    /// Replaces all bodies with `n` random ones.
    pub fn reset(&mut self, n: usize, seed: u64) -> Result<()> {
        let bodies = utils::random_bodies(n, self.extent, seed)?;
        for body in &bodies {
            self.extent.check_fits(body)?;
        }
        self.bodies = bodies;
        self.frame = 0;
        Ok(())
    }

    pub fn add_body(&mut self, body: Body) -> Result<()> {
        self.extent.check_fits(&body)?;
        self.bodies.push(body);
        Ok(())
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advances the simulation by one step.
    ///
    /// Order: clear accelerations, body-body collisions, walls, mutual
    /// gravity, drag, uniform field, integration.
    pub fn step(&mut self) {
        self.reset_accelerations();
        self.collide();
        self.bounce();
        self.attract();
        self.drag();
        self.apply_field();
        self.iterate();
        self.frame += 1;
    }

    pub fn reset_accelerations(&mut self) {
        self.bodies.iter_mut().for_each(Body::reset_acceleration);
    }

    /// Resolves every overlapping pair `(i, j)`, `i < j`, in index order.
    ///
    /// Each resolution sees the velocities left by the previous one.
    /// Returns the number of impulses applied.
    pub fn collide(&mut self) -> usize {
        let rule = self.params.restitution;
        let n = self.bodies.len();
        let mut resolved = 0;

        for i in 0..n {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for (k, b) in tail.iter_mut().enumerate() {
                let j = i + 1 + k;
                if collision::overlapping(a, b) && collision::resolve_pair(a, b, rule) {
                    log::trace!("collision: bodies {i} and {j} resolved");
                    resolved += 1;
                }
            }
        }

        resolved
    }

    /// Keeps every body inside the extent. Returns the number of bodies that hit a wall.
    pub fn bounce(&mut self) -> usize {
        let extent = self.extent;
        let mut hits = 0;
        for (i, body) in self.bodies.iter_mut().enumerate() {
            if collision::resolve_walls(body, extent) {
                log::trace!("wall: body {i} reflected at {:?}", body.pos);
                hits += 1;
            }
        }
        hits
    }

    /// Accumulates mutual gravity into every body's acceleration.
    pub fn attract(&mut self) {
        let deltas = forces::gravity_forces(
            &self.bodies,
            self.params.gravitational_constant,
            self.params.parallel,
        );
        self.apply(deltas);
    }

    /// Accumulates drag into every moving body's acceleration.
    pub fn drag(&mut self) {
        let deltas = forces::drag_forces(&self.bodies, self.params.drag_constant, self.params.parallel);
        self.apply(deltas);
    }

    /// Accumulates the uniform field into every body's acceleration.
    pub fn apply_field(&mut self) {
        let field = self.params.gravity;
        if field == Vector2::zero() {
            return;
        }
        for body in &mut self.bodies {
            let f = forces::uniform_force(body, field);
            body.apply_force(f);
        }
    }

    /// Integrates all bodies by one time step.
    pub fn iterate(&mut self) {
        let dt = self.params.dt;
        self.bodies.iter_mut().for_each(|body| body.integrate(dt));
    }

    fn apply(&mut self, deltas: Vec<Vector2>) {
        debug_assert_eq!(deltas.len(), self.bodies.len());
        for (body, force) in self.bodies.iter_mut().zip(deltas) {
            body.apply_force(force);
        }
    }

    pub fn total_momentum(&self) -> Vector2 {
        self.bodies
            .iter()
            .fold(Vector2::zero(), |acc, body| acc + body.momentum())
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Body {
        Body::new(Vector2::new(x, y), Vector2::new(vx, vy), radius).unwrap()
    }

    fn quiet() -> WorldParams {
        WorldParams {
            dt: 0.1,
            gravitational_constant: 0.0,
            drag_constant: 0.0,
            ..WorldParams::default()
        }
    }

    #[test]
    fn invalid_world_rejected() {
        assert!(Extent::new(0.0, 10.0).is_err());
        assert!(Extent::new(10.0, f32::NAN).is_err());

        let extent = Extent::default();
        for params in [
            WorldParams { dt: 0.0, ..WorldParams::default() },
            WorldParams { dt: f32::INFINITY, ..WorldParams::default() },
            WorldParams { drag_constant: -1.0, ..WorldParams::default() },
            WorldParams { gravity: Vector2::new(f32::NAN, 0.0), ..WorldParams::default() },
        ] {
            assert!(matches!(
                Simulation::with_bodies(Vec::new(), extent, params),
                Err(Error::InvalidWorld(_))
            ));
        }
    }

    #[test]
    fn invalid_extent_rejected_by_every_constructor() {
        let params = WorldParams::default();
        for extent in [
            Extent { width: 0.0, height: 100.0 },
            Extent { width: -10.0, height: 100.0 },
            Extent { width: 100.0, height: f32::NAN },
            Extent { width: f32::INFINITY, height: 100.0 },
        ] {
            assert!(matches!(extent.validate(), Err(Error::InvalidWorld(_))));
            assert!(matches!(
                Simulation::with_bodies(vec![body(5.0, 5.0, 1.0, 0.0, 1.0)], extent, params),
                Err(Error::InvalidWorld(_))
            ));
            assert!(matches!(
                Simulation::random(3, extent, params, 0),
                Err(Error::InvalidWorld(_))
            ));
        }
    }

    #[test]
    fn bodies_wider_than_the_world_rejected() {
        let extent = Extent::new(100.0, 30.0).unwrap();
        assert!(matches!(
            Simulation::with_bodies(vec![body(50.0, 15.0, 0.0, 0.0, 16.0)], extent, quiet()),
            Err(Error::InvalidBody(_))
        ));

        let mut sim = Simulation::with_bodies(Vec::new(), extent, quiet()).unwrap();
        assert!(sim.add_body(body(50.0, 15.0, 0.0, 0.0, 15.0)).is_ok());
        assert!(matches!(
            sim.add_body(body(50.0, 15.0, 0.0, 0.0, 15.5)),
            Err(Error::InvalidBody(_))
        ));
        assert_eq!(sim.bodies.len(), 1);

        // random radii go up to 15
        let mut narrow = Simulation::with_bodies(Vec::new(), Extent::new(20.0, 400.0).unwrap(), quiet()).unwrap();
        assert!(narrow.reset(50, 4).is_err());
        assert!(narrow.bodies.is_empty());
    }

    #[test]
    fn gravity_sees_positions_after_the_wall_clamp() {
        let params = WorldParams {
            gravitational_constant: 1.0,
            ..quiet()
        };
        // Body 0 starts far outside the left wall; the clamp puts it at x = 5,
        // 95 away from body 1 instead of 200.
        let mut sim = Simulation::with_bodies(
            vec![body(-100.0, 200.0, 0.0, 0.0, 5.0), body(100.0, 200.0, 0.0, 0.0, 5.0)],
            Extent::default(),
            params,
        )
        .unwrap();
        let m = sim.bodies[1].mass;
        sim.step();

        let clamped = m / (95.0 * 95.0);
        let unclamped = m / (200.0 * 200.0);
        let acc = sim.bodies[0].acc.x;
        assert!((acc - clamped).abs() < 1e-4 * clamped, "acc {acc}, unclamped would be {unclamped}");
        assert!((sim.bodies[1].acc.x + clamped).abs() < 1e-4 * clamped);

        // integration used this step's acceleration, starting from the clamped position
        assert!((sim.bodies[0].vel.x - acc * 0.1).abs() < 1e-7);
        assert!((sim.bodies[0].pos.x - (5.0 + acc * 0.01)).abs() < 1e-4);
    }

    #[test]
    fn collisions_run_before_the_wall_clamp() {
        // Overlapping only once body 0 is clamped; collide() sees the raw
        // positions, so no impulse this step.
        let mut sim = Simulation::with_bodies(
            vec![body(-20.0, 200.0, 0.0, 0.0, 5.0), body(13.0, 200.0, -1.0, 0.0, 5.0)],
            Extent::default(),
            quiet(),
        )
        .unwrap();
        sim.step();
        assert_eq!(sim.bodies[0].vel, Vector2::zero());
        assert_eq!(sim.bodies[1].vel, Vector2::new(-1.0, 0.0));

        // next step they overlap and exchange velocities
        sim.step();
        assert!((sim.bodies[0].vel.x + 1.0).abs() < 1e-5);
        assert!(sim.bodies[1].vel.x.abs() < 1e-5);
    }

    #[test]
    fn defaults() {
        let sim = Simulation::default();
        assert_eq!(sim.extent, Extent { width: 400.0, height: 400.0 });
        assert_eq!(sim.params.dt, 1.0);
        assert_eq!(sim.params.gravitational_constant, 1e-3);
        assert_eq!(sim.params.drag_constant, 1e-8);
        assert_eq!(sim.params.gravity, Vector2::zero());
        assert!(sim.bodies.is_empty());
    }

    #[test]
    fn acceleration_does_not_leak_between_steps() {
        let params = WorldParams {
            gravity: Vector2::new(0.0, 2.0),
            ..quiet()
        };
        let mut sim =
            Simulation::with_bodies(vec![body(50.0, 50.0, 0.0, 0.0, 1.0)], Extent::new(100.0, 1e6).unwrap(), params)
                .unwrap();
        for _ in 0..5 {
            sim.step();
            assert!((sim.bodies[0].acc.y - 2.0).abs() < 1e-5);
        }
        assert_eq!(sim.frame(), 5);
    }

    #[test]
    fn collisions_are_sequential_in_index_order() {
        // Newton's cradle: 0 hits 1 which already touches 2.
        let mut sim = Simulation::with_bodies(
            vec![
                body(100.0, 100.0, 1.0, 0.0, 10.0),
                body(119.0, 100.0, 0.0, 0.0, 10.0),
                body(138.0, 100.0, 0.0, 0.0, 10.0),
            ],
            Extent::default(),
            quiet(),
        )
        .unwrap();

        assert_eq!(sim.collide(), 2);
        assert!(sim.bodies[0].vel.mag() < 1e-5);
        assert!(sim.bodies[1].vel.mag() < 1e-5);
        assert!((sim.bodies[2].vel.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bounce_counts_wall_hits() {
        let mut sim = Simulation::with_bodies(
            vec![body(1.0, 200.0, -1.0, 0.0, 5.0), body(200.0, 200.0, 0.0, 0.0, 5.0)],
            Extent::default(),
            quiet(),
        )
        .unwrap();
        assert_eq!(sim.bounce(), 1);
        assert_eq!(sim.bodies[0].pos.x, 5.0);
    }

    #[test]
    fn attract_pulls_bodies_together() {
        let params = WorldParams {
            gravitational_constant: 1.0,
            ..quiet()
        };
        let mut sim = Simulation::with_bodies(
            vec![body(100.0, 200.0, 0.0, 0.0, 5.0), body(300.0, 200.0, 0.0, 0.0, 5.0)],
            Extent::default(),
            params,
        )
        .unwrap();
        sim.step();
        assert!(sim.bodies[0].vel.x > 0.0);
        assert!(sim.bodies[1].vel.x < 0.0);
        assert!(sim.total_momentum().mag() < 1e-3);
    }

    #[test]
    fn drag_slows_bodies() {
        let params = WorldParams {
            drag_constant: 1e-3,
            ..quiet()
        };
        let mut sim =
            Simulation::with_bodies(vec![body(200.0, 200.0, 3.0, 0.0, 2.0)], Extent::default(), params).unwrap();
        let e0 = sim.kinetic_energy();
        sim.step();
        assert!(sim.kinetic_energy() < e0);
        assert!(sim.bodies[0].vel.x > 0.0);
    }

    #[test]
    fn reset_replaces_bodies() {
        let mut sim = Simulation::random(5, Extent::default(), WorldParams::default(), 1).unwrap();
        sim.step();
        sim.reset(8, 2).unwrap();
        assert_eq!(sim.bodies.len(), 8);
        assert_eq!(sim.frame(), 0);
    }
}
