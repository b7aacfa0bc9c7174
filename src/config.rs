//! Scene descriptions loaded from YAML.
//!
//! A scene consists of:
//!
//! - [`WorldConfig`] – time step, physical constants and restitution rule
//! - [`Extent`] – size of the world rectangle, deserialized directly
//! - [`BodyConfig`] – initial state of each body
//! - [`SceneConfig`] – top-level wrapper
//!
//! Every field except a body's position and radius has a default, so a
//! minimal scene only lists bodies:
//!
//! ```yaml
//! world:
//!   dt: 0.5
//!   gravity: [0.0, 0.1]
//!   gravitational_constant: 1.0e-3
//!   drag_constant: 1.0e-8
//!   restitution: min        # first | min | average | product
//!   parallel: false
//! extent:
//!   width: 400
//!   height: 400
//! bodies:
//!   - position: [100, 100]
//!     velocity: [0, 2]
//!     radius: 10
//!   - position: [150, 300]
//!     radius: 12
//!     density: 2.0
//!     elasticity: 0.8
//!     color: { r: 200, g: 30, b: 30 }
//! ```
//!
//! [`SceneConfig::build`] validates everything and produces a [`Simulation`].

use crate::body::{Body, Color};
use crate::collision::RestitutionRule;
use crate::error::Result;
use crate::simulation::{Extent, Simulation, WorldParams};
use crate::vector::Vector2;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Global constants for a scene.
///
/// Mirrors [`WorldParams`] with plain arrays in place of vectors.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub dt: f32,
    pub gravity: [f32; 2],
    pub gravitational_constant: f32,
    pub drag_constant: f32,
    pub restitution: RestitutionRule,
    pub parallel: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldParams::default().into()
    }
}

impl From<WorldParams> for WorldConfig {
    fn from(p: WorldParams) -> Self {
        Self {
            dt: p.dt,
            gravity: [p.gravity.x, p.gravity.y],
            gravitational_constant: p.gravitational_constant,
            drag_constant: p.drag_constant,
            restitution: p.restitution,
            parallel: p.parallel,
        }
    }
}

impl From<&WorldConfig> for WorldParams {
    fn from(c: &WorldConfig) -> Self {
        Self {
            dt: c.dt,
            gravity: Vector2::new(c.gravity[0], c.gravity[1]),
            gravitational_constant: c.gravitational_constant,
            drag_constant: c.drag_constant,
            restitution: c.restitution,
            parallel: c.parallel,
        }
    }
}

/// Initial state of one body.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub position: [f32; 2],
    #[serde(default)]
    pub velocity: [f32; 2],
    pub radius: f32,
    #[serde(default = "default_density")]
    pub density: f32,
    #[serde(default = "default_elasticity")]
    pub elasticity: f32,
    #[serde(default)]
    pub color: Color,
}

fn default_density() -> f32 {
    Body::DEFAULT_DENSITY
}

fn default_elasticity() -> f32 {
    Body::DEFAULT_ELASTICITY
}

impl TryFrom<&BodyConfig> for Body {
    type Error = crate::error::Error;

    fn try_from(c: &BodyConfig) -> Result<Self> {
        Ok(Body::new(
            Vector2::new(c.position[0], c.position[1]),
            Vector2::new(c.velocity[0], c.velocity[1]),
            c.radius,
        )?
        .with_density(c.density)?
        .with_elasticity(c.elasticity)?
        .with_color(c.color))
    }
}

/// Top-level scene loaded from YAML.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub extent: Extent,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl SceneConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading scene from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validates the scene and builds the simulation. Fails on the first invalid body.
    pub fn build(&self) -> Result<Simulation> {
        let extent = self.extent;
        let bodies = self
            .bodies
            .iter()
            .map(Body::try_from)
            .collect::<Result<Vec<_>>>()?;
        Simulation::with_bodies(bodies, extent, WorldParams::from(&self.world))
    }
}
