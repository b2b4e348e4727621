//! Routing module: orthogonal connector search engine
pub mod config;
pub mod cost;
pub mod diagnostics;
pub mod node_store;
pub mod obstacles;
pub mod path;
pub mod planner;
pub mod search;

use self::config::RouteConfig;
use self::diagnostics::{render_grid, NodeField};
use self::node_store::NodeStore;
use self::obstacles::ObstacleMap;
use self::planner::{EuclideanHeuristic, GridMoves, Heuristic, MoveGenerator};
use self::search::{Search, SearchOutcome, SearchParams};
use crate::common::{Direction, Point, Rect};
use crate::error::{Result, RouteError};
use crate::lifecycle::{CancelHandle, RunGuard, SearchState, SearchStatus};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Endpoints and obstacles of one connector
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: Point,
    pub start_direction: Direction,
    pub goal: Point,
    pub goal_direction: Direction,
    pub bounds: Option<Rect>,
    pub obstacles: Vec<Rect>,
}

impl RouteRequest {
    pub fn new(start: Point, start_direction: Direction, goal: Point, goal_direction: Direction) -> Self {
        RouteRequest {
            start,
            start_direction,
            goal,
            goal_direction,
            bounds: None,
            obstacles: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Rect>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    fn validate(&self) -> Result<()> {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        if !finite(&self.start) {
            return Err(RouteError::InvalidPoint { name: "start" });
        }
        if !finite(&self.goal) {
            return Err(RouteError::InvalidPoint { name: "goal" });
        }
        Ok(())
    }
}

/// Polyline and outcome of one search. `path` is empty unless `outcome` is
/// [`SearchOutcome::Found`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub path: Vec<Point>,
    pub outcome: SearchOutcome,
    pub expansions: usize,
}

impl RouteResult {
    pub fn is_found(&self) -> bool {
        self.outcome == SearchOutcome::Found
    }
}

/// Connector router.
///
/// One instance runs one search at a time; use one router per concurrent
/// route. The node store of the last run stays available for diagnostics.
pub struct Router {
    status: SearchStatus,
    config: RouteConfig,
    moves: Arc<dyn MoveGenerator>,
    heuristic: Arc<dyn Heuristic>,
    store: Arc<Mutex<NodeStore>>,
}

impl Default for Router {
    fn default() -> Self {
        Router::new()
    }
}

impl Router {
    /// Create a router with the default grid moves and Euclidean heuristic
    pub fn new() -> Self {
        Router::with_config(RouteConfig::default())
    }

    pub fn with_config(config: RouteConfig) -> Self {
        Router {
            status: SearchStatus::new("router"),
            config,
            moves: Arc::new(GridMoves),
            heuristic: Arc::new(EuclideanHeuristic),
            store: Arc::new(Mutex::new(NodeStore::default())),
        }
    }

    /// Replace the move generator and heuristic
    pub fn with_planner<M, H>(mut self, moves: M, heuristic: H) -> Self
    where
        M: MoveGenerator + 'static,
        H: Heuristic + 'static,
    {
        self.moves = Arc::new(moves);
        self.heuristic = Arc::new(heuristic);
        self
    }

    /// Name used in log messages
    pub fn with_name(mut self, name: &str) -> Self {
        self.status.name = name.to_string();
        self
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Configure the router from a parameter map
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        self.config.configure(params)
    }

    pub fn state(&self) -> SearchState {
        self.status.get_state()
    }

    /// Cancel the running search, if any. Safe from any thread.
    pub fn cancel(&self) -> bool {
        self.status.cancel()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.status.cancel_handle()
    }

    /// Route a connector, blocking until done. Empty on failure.
    pub fn search(&self, request: &RouteRequest) -> Result<Vec<Point>> {
        self.search_detailed(request).map(|result| result.path)
    }

    /// Route a connector and report how the search ended
    pub fn search_detailed(&self, request: &RouteRequest) -> Result<RouteResult> {
        self.config.validate()?;
        request.validate()?;
        let guard = self.status.begin()?;
        debug!("[Router] {}: blocking search", self.status.name);
        execute(
            &self.store,
            &self.config,
            self.moves.as_ref(),
            self.heuristic.as_ref(),
            request,
            &guard,
        )
    }

    /// Start the search on tokio's blocking pool.
    ///
    /// The router is marked `Running` before this returns, so a cancel issued
    /// right after is always observed. Fails with [`RouteError::NoRuntime`]
    /// outside a tokio runtime.
    pub fn spawn_search(&self, request: RouteRequest) -> Result<SearchTask> {
        self.config.validate()?;
        request.validate()?;
        let runtime = Handle::try_current().map_err(|_| RouteError::NoRuntime)?;
        let guard = self.status.begin()?;
        debug!("[Router] {}: background search", self.status.name);

        let store = Arc::clone(&self.store);
        let config = self.config.clone();
        let moves = Arc::clone(&self.moves);
        let heuristic = Arc::clone(&self.heuristic);

        let handle = runtime.spawn_blocking(move || {
            execute(&store, &config, moves.as_ref(), heuristic.as_ref(), &request, &guard)
        });

        Ok(SearchTask {
            handle,
            cancel: self.status.cancel_handle(),
        })
    }

    /// Copy of the node store left by the last search
    pub fn last_store(&self) -> Result<NodeStore> {
        let store = self.store.lock().map_err(|_| RouteError::StorePoisoned)?;
        Ok(store.clone())
    }

    /// Grid dump of the last search
    pub fn render_last(&self, field: NodeField) -> Result<String> {
        let store = self.store.lock().map_err(|_| RouteError::StorePoisoned)?;
        Ok(render_grid(&store, field))
    }
}

/// Awaitable background search
pub struct SearchTask {
    handle: JoinHandle<Result<RouteResult>>,
    cancel: CancelHandle,
}

impl SearchTask {
    /// Request cancellation; the worker stops at its next poll
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    /// Wait for the search to finish
    pub async fn join(self) -> Result<RouteResult> {
        self.handle.await?
    }
}

fn execute(
    store: &Mutex<NodeStore>,
    config: &RouteConfig,
    moves: &dyn MoveGenerator,
    heuristic: &dyn Heuristic,
    request: &RouteRequest,
    guard: &RunGuard,
) -> Result<RouteResult> {
    let mut store = store.lock().map_err(|_| RouteError::StorePoisoned)?;
    let area = ObstacleMap::new(request.bounds, request.obstacles.clone());

    let report = Search::new(
        &mut store,
        SearchParams {
            start: request.start,
            start_direction: request.start_direction,
            goal: request.goal,
            goal_direction: request.goal_direction,
            config,
            area: &area,
            moves,
            heuristic,
        },
    )
    .run(&|| guard.is_cancelled());

    let path = match report.outcome {
        SearchOutcome::Found => path::adopted_path(&store),
        _ => Vec::new(),
    };
    debug!(
        "[Router] {:?} after {} expansions, {} vertices",
        report.outcome,
        report.expansions,
        path.len()
    );

    Ok(RouteResult {
        path,
        outcome: report.outcome,
        expansions: report.expansions,
    })
}
