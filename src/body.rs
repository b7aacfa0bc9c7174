use crate::error::{Error, Result};
use crate::vector::{Vector2, VectorExt};

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Rendering colour carried by a body. The physics never reads it.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0, 100, 0)
    }
}

/// A circular mass in the world.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Centre, in world coordinates.
    pub pos: Vector2,
    /// Velocity vector.
    pub vel: Vector2,
    /// Acceleration accumulated during the current step (zeroed at the start of each step).
    pub acc: Vector2,
    /// Derived from radius and density, always > 0.
    pub mass: f32,
    /// Radius of the circle, fixed for the body's lifetime.
    pub radius: f32,
    /// Coefficient of restitution in [0, 1].
    pub elasticity: f32,
    pub color: Color,
}

impl Body {
    pub const DEFAULT_DENSITY: f32 = 1.0;
    pub const DEFAULT_ELASTICITY: f32 = 1.0;

    /// Creates a body with unit density, perfect elasticity and the default colour.
    ///
    /// Errors with [`Error::InvalidBody`] when the radius is not finite and
    /// positive, or when position or velocity have a non-finite component.
    pub fn new(pos: Vector2, vel: Vector2, radius: f32) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidBody(format!(
                "radius must be finite and > 0, got {radius}"
            )));
        }
        if !pos.is_finite() {
            return Err(Error::InvalidBody(format!("position must be finite, got {pos:?}")));
        }
        if !vel.is_finite() {
            return Err(Error::InvalidBody(format!("velocity must be finite, got {vel:?}")));
        }

        Ok(Self {
            pos,
            vel,
            acc: Vector2::zero(),
            mass: Self::calc_mass(radius, Self::DEFAULT_DENSITY),
            radius,
            elasticity: Self::DEFAULT_ELASTICITY,
            color: Color::default(),
        })
    }

    /// Recomputes the mass from `density`.
    pub fn with_density(mut self, density: f32) -> Result<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(Error::InvalidBody(format!(
                "density must be finite and > 0, got {density}"
            )));
        }
        self.mass = Self::calc_mass(self.radius, density);
        Ok(self)
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&elasticity) {
            return Err(Error::InvalidBody(format!(
                "elasticity must be within [0, 1], got {elasticity}"
            )));
        }
        self.elasticity = elasticity;
        Ok(self)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Mass of a ball of the given radius: `density * 4/3 * pi * r^3`.
    ///
    /// The circle is weighed as if it were a sphere.
    #[inline]
    pub fn calc_mass(radius: f32, density: f32) -> f32 {
        density * (4.0 / 3.0) * PI * radius.powi(3)
    }

    /// Cross-sectional area `pi * r^2`, used as the drag coefficient.
    #[inline]
    pub fn surface_area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    /// Adds `force / mass` to the acceleration accumulator.
    #[inline]
    pub fn apply_force(&mut self, force: Vector2) {
        self.acc += force / self.mass;
    }

    /// Clears the acceleration accumulator.
    #[inline]
    pub fn reset_acceleration(&mut self) {
        self.acc = Vector2::zero();
    }

    /// Advances velocity and then position by `dt`.
    /// Uses semi-implicit Euler integration (velocity update first, then position).
    pub fn integrate(&mut self, dt: f32) {
        self.vel += self.acc * dt;
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn momentum(&self) -> Vector2 {
        self.vel * self.mass
    }

    /// Kinetic energy 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.mag_sq()
    }
}
