use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building bodies, worlds and scenes.
///
/// Nothing in here is produced by [`Simulation::step`](crate::Simulation::step):
/// degenerate geometry during a step is skipped, not reported.
#[derive(Debug, Error)]
pub enum Error {
    /// A body was constructed with an invalid radius, density, elasticity or state.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// The world extent, time step or a physical constant is unusable.
    #[error("invalid world: {0}")]
    InvalidWorld(String),

    /// A scene description could not be parsed.
    #[error("scene config: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A scene file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
