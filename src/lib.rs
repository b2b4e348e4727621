pub mod common;
pub mod error;
pub mod lifecycle;
pub mod routing;

pub use crate::common::{Axis, Direction, Point, Rect};
pub use crate::error::{Result, RouteError};
pub use crate::lifecycle::{CancelHandle, SearchState};
pub use crate::routing::config::RouteConfig;
pub use crate::routing::search::SearchOutcome;
pub use crate::routing::{RouteRequest, RouteResult, Router, SearchTask};
