use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Step must be a positive finite number, got {0}")]
    InvalidStep(f64),
    #[error("Inertia must be a non-negative finite number, got {0}")]
    InvalidInertia(f64),
    #[error("Parameter {name} has invalid value {value}")]
    InvalidParameter { name: String, value: f64 },
    #[error("Point {name} has non-finite coordinates")]
    InvalidPoint { name: &'static str },
    #[error("A search is already running on this router")]
    AlreadyRunning,
    #[error("Background search needs a tokio runtime")]
    NoRuntime,
    #[error("Node store lock was poisoned")]
    StorePoisoned,
    #[error(transparent)]
    Worker(#[from] tokio::task::JoinError),
}
