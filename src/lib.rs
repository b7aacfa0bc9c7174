pub mod body;
pub mod c_api;
pub mod collision;
pub mod config;
pub mod error;
pub mod forces;
pub mod simulation;
pub mod utils;
pub mod vector;

pub use body::{Body, Color};
pub use collision::RestitutionRule;
pub use config::SceneConfig;
pub use error::{Error, Result};
pub use simulation::{Extent, Simulation, WorldParams};
pub use vector::{Vector2, VectorExt};
