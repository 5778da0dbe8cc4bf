/*
coordinator.rs

Copyright 2025 Hervé Quatremain

This file is part of Zipgrid.

Zipgrid is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Zipgrid is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Zipgrid. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Orchestrate the generation of a puzzle.
//!
//! The path search can be slow, so it runs in a worker thread. The worker receives one
//! [`PathRequest`] and sends back one [`PathResponse`] through a channel.
//! When the path is received, the numbers, the walls, and the waypoints are computed in the
//! caller's thread. These steps are fast and never fail.
//!
//! A [`Generator`] has at most one search in progress. Starting a new generation cancels the
//! previous search and discards its result.

use async_channel::{Receiver, Sender, TryRecvError};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use strum_macros::Display;

use super::edges::WallSet;
use super::grid::Grid;
use super::hamiltonian::{HamiltonianSearch, SearchError, SearchLimits};
use super::levels::LevelParams;
use super::numbers::{self, NumberMap};
use super::path::Path;
use super::puzzle::Puzzle;
use super::walls::{MAX_WALL_DENSITY, WallSelector};
use super::waypoints::{WaypointSelector, WaypointSet};
use super::weights::ScoringWeights;

/// Stack size for the search thread. The recursion is as deep as the number of cells.
const SEARCH_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Mixed into the seed for the placement of the numbers, walls, and waypoints, so that it does
/// not replay the random sequence of the search.
const PLACEMENT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Reason reported when no path could be produced.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureReason {
    MaxAttemptsReached,
    InvalidParameters,
}

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GenerationError {
    /// The request is not valid. No search is started.
    InvalidParameters(String),

    /// No path found after the given number of attempts.
    SearchExhausted { attempts: usize },

    /// No generation is in progress.
    NotStarted,

    /// The search thread could not be started, or stopped without sending a result.
    WorkerStopped,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationError::InvalidParameters(msg) => write!(f, "invalid parameters: {msg}"),
            GenerationError::SearchExhausted { attempts } => {
                write!(f, "no path found after {attempts} attempt(s)")
            }
            GenerationError::NotStarted => write!(f, "no generation in progress"),
            GenerationError::WorkerStopped => write!(f, "the path search stopped unexpectedly"),
        }
    }
}

impl Error for GenerationError {}

impl GenerationError {
    /// Reason to report to the requester, for the failures that come from the request itself.
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            GenerationError::InvalidParameters(_) => Some(FailureReason::InvalidParameters),
            GenerationError::SearchExhausted { .. } => Some(FailureReason::MaxAttemptsReached),
            GenerationError::NotStarted | GenerationError::WorkerStopped => None,
        }
    }
}

/// Result of a generation.
pub type GenerationResult = Result<Puzzle, GenerationError>;

/// Progress of the generation.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum GenerationState {
    Idle,
    Searching,
    PathFailed,
    SequencingLabels,
    SequencingDone,
    WallSelection,
    WallsDone,
    WaypointSelection,
    Complete,
}

/// Parameters for a puzzle.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct GenerationRequest {
    pub rows: usize,
    pub cols: usize,

    /// Number of random starting cells to try for the path.
    pub max_attempts: usize,

    /// Highest number (and number of numbered cells).
    pub x_cells: usize,

    /// Requested number of walls. Fewer walls might be placed.
    pub num_walls: usize,

    /// Requested number of waypoints. Fewer waypoints might be placed.
    pub num_waypoints: usize,

    /// Seed for the random generators. A random seed is used if not provided.
    pub seed: Option<u64>,
}

impl From<LevelParams> for GenerationRequest {
    fn from(params: LevelParams) -> Self {
        Self {
            rows: params.rows,
            cols: params.cols,
            max_attempts: params.max_attempts,
            x_cells: params.x_cells,
            num_walls: params.num_walls,
            num_waypoints: params.num_waypoints,
            seed: None,
        }
    }
}

impl GenerationRequest {
    /// Verify the request.
    ///
    /// # Errors
    ///
    /// Return [`GenerationError::InvalidParameters`] if the grid has no cell, is too large, or if
    /// the highest number is zero or larger than the number of cells.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GenerationError::InvalidParameters(format!(
                "the grid must have at least one row and one column ({}x{})",
                self.rows, self.cols
            )));
        }
        let num_cells: usize = self.rows.checked_mul(self.cols).ok_or_else(|| {
            GenerationError::InvalidParameters(format!(
                "the grid is too large ({}x{})",
                self.rows, self.cols
            ))
        })?;
        if self.x_cells == 0 || self.x_cells > num_cells {
            return Err(GenerationError::InvalidParameters(format!(
                "the highest number must be between 1 and {num_cells} (got {})",
                self.x_cells
            )));
        }
        Ok(())
    }
}

/// Request sent to the search thread.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct PathRequest {
    pub rows: usize,
    pub cols: usize,
    pub max_attempts: usize,
    pub seed: u64,
}

/// Response from the search thread.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathResponse {
    Found { path: Path, attempts: usize },
    Failed { reason: FailureReason, attempts: usize },
}

/// Search running in a worker thread.
struct PendingSearch {
    /// Request that started the search.
    request: GenerationRequest,

    /// Seed actually used.
    seed: u64,

    /// Receives the result of the search.
    receiver: Receiver<PathResponse>,

    /// Raised to stop the search.
    cancel: Arc<AtomicBool>,
}

impl Drop for PendingSearch {
    fn drop(&mut self) {
        // Stop the worker if it is still searching. Its result, if any, is discarded.
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Start the search thread for the given request.
fn spawn_search(
    request: PathRequest,
    limits: SearchLimits,
    sender: Sender<PathResponse>,
    cancel: Arc<AtomicBool>,
) -> Result<(), GenerationError> {
    thread::Builder::new()
        .name("zipgrid-search".to_string())
        .stack_size(SEARCH_STACK_SIZE)
        .spawn(move || {
            let mut rng: StdRng = StdRng::seed_from_u64(request.seed);
            let mut search: HamiltonianSearch = HamiltonianSearch::new(request.rows, request.cols)
                .with_limits(limits)
                .with_cancel_flag(cancel);

            let response: PathResponse = match search.search(request.max_attempts, &mut rng) {
                Ok(path) => PathResponse::Found {
                    path,
                    attempts: search.stats.attempts,
                },
                Err(SearchError::MaxAttemptsReached { attempts }) => PathResponse::Failed {
                    reason: FailureReason::MaxAttemptsReached,
                    attempts,
                },
                Err(SearchError::InvalidParameters) => PathResponse::Failed {
                    reason: FailureReason::InvalidParameters,
                    attempts: 0,
                },
                Err(SearchError::Cancelled) => return,
            };
            if sender.send_blocking(response).is_err() {
                debug!("Search result discarded: the request was superseded");
            }
        })
        .map(|_| ())
        .map_err(|e| {
            warn!("Cannot start the search thread: {e}");
            GenerationError::WorkerStopped
        })
}

/// [`Generator`] object.
pub struct Generator {
    /// Scoring coefficients for the walls and the waypoints.
    weights: ScoringWeights,

    /// Fraction of the internal edges that can become walls.
    max_wall_density: f64,

    /// Limits for each search attempt.
    limits: SearchLimits,

    /// Progress of the current generation.
    state: GenerationState,

    /// Search in progress.
    pending: Option<PendingSearch>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl Generator {
    /// Create the object.
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            max_wall_density: MAX_WALL_DENSITY,
            limits: SearchLimits::default(),
            state: GenerationState::Idle,
            pending: None,
        }
    }

    /// Set the fraction of the internal edges that can become walls.
    pub fn with_max_wall_density(mut self, max_wall_density: f64) -> Self {
        self.max_wall_density = max_wall_density;
        self
    }

    /// Set the limits for each search attempt.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Progress of the current generation.
    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Whether a search is in progress.
    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the search in progress, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            info!("Previous generation cancelled");
            self.state = GenerationState::Idle;
        }
    }

    /// Start generating a puzzle. Any generation in progress is cancelled.
    ///
    /// # Errors
    ///
    /// Return an error if the request is not valid or if the search thread cannot be started.
    pub fn start(&mut self, request: GenerationRequest) -> Result<(), GenerationError> {
        self.cancel();
        request.validate()?;

        let seed: u64 = request.seed.unwrap_or_else(|| rand::rng().random());
        let (sender, receiver) = async_channel::bounded::<PathResponse>(1);
        let cancel: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));

        debug!("Generating a puzzle for {request:?} with seed {seed}");
        spawn_search(
            PathRequest {
                rows: request.rows,
                cols: request.cols,
                max_attempts: request.max_attempts,
                seed,
            },
            self.limits,
            sender,
            cancel.clone(),
        )?;

        self.pending = Some(PendingSearch {
            request,
            seed,
            receiver,
            cancel,
        });
        self.state = GenerationState::Searching;
        Ok(())
    }

    /// Wait for the generation in progress to complete.
    ///
    /// # Errors
    ///
    /// Return an error if no generation is in progress, or if no path could be found.
    pub fn wait(&mut self) -> GenerationResult {
        let pending: PendingSearch = self.pending.take().ok_or(GenerationError::NotStarted)?;
        let response: Result<PathResponse, _> = pending.receiver.recv_blocking();
        self.complete(pending, response.ok())
    }

    /// Asynchronously wait for the generation in progress to complete.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::wait`].
    pub async fn finish(&mut self) -> GenerationResult {
        let pending: PendingSearch = self.pending.take().ok_or(GenerationError::NotStarted)?;
        let response: Result<PathResponse, _> = pending.receiver.recv().await;
        self.complete(pending, response.ok())
    }

    /// Return the result of the generation if the search is done, without blocking.
    pub fn try_finish(&mut self) -> Option<GenerationResult> {
        let response: Option<PathResponse> = match self.pending.as_ref()?.receiver.try_recv() {
            Ok(r) => Some(r),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => None,
        };
        let pending: PendingSearch = self.pending.take()?;
        Some(self.complete(pending, response))
    }

    /// Generate a puzzle and wait for the result.
    ///
    /// # Errors
    ///
    /// Return an error if the request is not valid or if no path could be found.
    pub fn generate(&mut self, request: GenerationRequest) -> GenerationResult {
        self.start(request)?;
        self.wait()
    }

    /// Build the puzzle from the search response.
    fn complete(
        &mut self,
        pending: PendingSearch,
        response: Option<PathResponse>,
    ) -> GenerationResult {
        match response {
            None => {
                self.state = GenerationState::PathFailed;
                Err(GenerationError::WorkerStopped)
            }
            Some(PathResponse::Failed { reason, attempts }) => {
                self.state = GenerationState::PathFailed;
                warn!("Path generation failed ({reason}) after {attempts} attempt(s)");
                match reason {
                    FailureReason::MaxAttemptsReached => {
                        Err(GenerationError::SearchExhausted { attempts })
                    }
                    FailureReason::InvalidParameters => Err(GenerationError::InvalidParameters(
                        "rejected by the path search".to_string(),
                    )),
                }
            }
            Some(PathResponse::Found { path, attempts }) => {
                debug!("Path received after {attempts} attempt(s)");
                Ok(self.build(&pending.request, pending.seed, path))
            }
        }
    }

    /// Place the numbers, the walls, and the waypoints along the path.
    fn build(&mut self, request: &GenerationRequest, seed: u64, path: Path) -> Puzzle {
        let grid: Grid = Grid::new(request.rows, request.cols);
        let mut rng: StdRng = StdRng::seed_from_u64(seed ^ PLACEMENT_SEED_SALT);

        self.transition(GenerationState::SequencingLabels);
        let numbers: NumberMap = numbers::assign(&path, request.x_cells, &mut rng);
        self.transition(GenerationState::SequencingDone);

        self.transition(GenerationState::WallSelection);
        let walls: WallSet = WallSelector::new(self.weights.walls, self.max_wall_density).select(
            &path,
            &numbers,
            request.num_walls,
            &grid,
            &mut rng,
        );
        self.transition(GenerationState::WallsDone);

        self.transition(GenerationState::WaypointSelection);
        let waypoints: WaypointSet = WaypointSelector::new(self.weights.waypoints).select(
            &path,
            &numbers,
            &walls,
            request.num_waypoints,
            &grid,
            &mut rng,
        );
        self.transition(GenerationState::Complete);

        info!(
            "Puzzle {}x{} generated: {} numbers, {} walls, {} waypoints (seed {seed})",
            request.rows,
            request.cols,
            numbers.len(),
            walls.len(),
            waypoints.len()
        );
        Puzzle {
            rows: request.rows,
            cols: request.cols,
            seed,
            path,
            numbers,
            walls,
            waypoints,
        }
    }

    fn transition(&mut self, state: GenerationState) {
        debug!("Generation state: {} -> {state}", self.state);
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::edges::Edge;
    use crate::generator::grid::Cell;
    use futures::executor::block_on;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    fn request(rows: usize, cols: usize, x_cells: usize, seed: u64) -> GenerationRequest {
        GenerationRequest {
            rows,
            cols,
            max_attempts: 25,
            x_cells,
            num_walls: 0,
            num_waypoints: 0,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_4x4_scenario() {
        let mut generator: Generator = Generator::default();
        let puzzle: Puzzle = generator.generate(request(4, 4, 5, 11)).expect("puzzle");
        let path: &[Cell] = puzzle.path.get();

        assert_eq!(generator.state(), GenerationState::Complete);
        assert_eq!(path.len(), 16);
        assert_eq!(puzzle.numbers.get(&path[0]), Some(1));
        assert_eq!(puzzle.numbers.get(&path[15]), Some(5));
        assert_eq!(
            path[1..15].iter().filter(|c| puzzle.numbers.contains(c)).count(),
            3
        );
    }

    #[test]
    fn test_1x1_scenario() {
        let mut generator: Generator = Generator::default();
        let mut req: GenerationRequest = request(1, 1, 1, 3);
        req.num_walls = 4;
        req.num_waypoints = 2;
        let puzzle: Puzzle = generator.generate(req).expect("puzzle");

        assert_eq!(puzzle.path.get(), &[Cell::new(0, 0)]);
        assert_eq!(puzzle.numbers.get(&Cell::new(0, 0)), Some(1));
        assert_eq!(puzzle.numbers.len(), 1);
        assert!(puzzle.walls.is_empty());
        assert!(puzzle.waypoints.is_empty());
    }

    #[test]
    fn test_10x10_scenario() {
        let mut generator: Generator = Generator::default();
        let mut req: GenerationRequest = request(10, 10, 20, 5);
        req.num_walls = 40;
        req.num_waypoints = 8;
        let puzzle: Puzzle = generator.generate(req).expect("puzzle");
        let used: HashSet<Edge> = puzzle.path.used_edges();

        assert_eq!(used.len(), 99);
        assert!(puzzle.walls.len() <= 72);
        assert!(puzzle.walls.len() <= 40);
        assert!(puzzle.walls.iter().all(|w| !used.contains(w)));
        assert_eq!(puzzle.waypoints.len(), 8);
        assert!(puzzle.waypoints.iter().all(|c| !puzzle.numbers.contains(c)));
    }

    #[test]
    fn test_1x2_has_no_wall() {
        let mut generator: Generator = Generator::default();
        let mut req: GenerationRequest = request(1, 2, 2, 9);
        req.num_walls = 10;
        let puzzle: Puzzle = generator.generate(req).expect("puzzle");

        assert!(puzzle.walls.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let mut generator: Generator = Generator::default();

        for req in [request(0, 4, 2, 0), request(4, 0, 2, 0), request(2, 2, 0, 0), request(2, 2, 5, 0)] {
            let err: GenerationError = generator.generate(req).expect_err("invalid request");
            assert_eq!(err.reason(), Some(FailureReason::InvalidParameters));
        }
        assert_eq!(generator.state(), GenerationState::Idle);
        assert!(!generator.is_searching());
    }

    #[test]
    fn test_zero_attempts() {
        let mut generator: Generator = Generator::default();
        let mut req: GenerationRequest = request(4, 4, 5, 0);
        req.max_attempts = 0;

        assert_eq!(
            generator.generate(req),
            Err(GenerationError::SearchExhausted { attempts: 0 })
        );
        assert_eq!(generator.state(), GenerationState::PathFailed);
        assert_eq!(
            GenerationError::SearchExhausted { attempts: 0 }
                .reason()
                .map(|r| r.to_string()),
            Some("max_attempts_reached".to_string())
        );
    }

    #[test]
    fn test_seed_reproduces_puzzle() {
        let mut req: GenerationRequest = request(6, 6, 9, 42);
        req.num_walls = 4;
        req.num_waypoints = 1;
        let first: Puzzle = Generator::default().generate(req).expect("puzzle");
        let second: Puzzle = Generator::default().generate(req).expect("puzzle");

        assert_eq!(first, second);
    }

    #[test]
    fn test_new_request_replaces_previous() {
        let mut generator: Generator = Generator::default();

        generator.start(request(8, 8, 10, 1)).expect("first start");
        generator.start(request(3, 3, 3, 2)).expect("second start");
        let puzzle: Puzzle = generator.wait().expect("puzzle");

        assert_eq!((puzzle.rows, puzzle.cols), (3, 3));
        assert_eq!(generator.wait(), Err(GenerationError::NotStarted));
    }

    #[test]
    fn test_try_finish() {
        let mut generator: Generator = Generator::default();

        assert!(generator.try_finish().is_none());
        generator.start(request(5, 5, 6, 8)).expect("start");
        let deadline: Instant = Instant::now() + Duration::from_secs(30);
        let result: GenerationResult = loop {
            if let Some(r) = generator.try_finish() {
                break r;
            }
            assert!(Instant::now() < deadline, "generation took too long");
            thread::sleep(Duration::from_millis(5));
        };

        assert_eq!(result.expect("puzzle").path.len(), 25);
        assert!(!generator.is_searching());
    }

    #[test]
    fn test_path_response_wire_format() {
        let failed: PathResponse = PathResponse::Failed {
            reason: FailureReason::MaxAttemptsReached,
            attempts: 25,
        };
        let json: String = serde_json::to_string(&failed).expect("serialize");

        assert_eq!(
            json,
            r#"{"status":"failed","reason":"max_attempts_reached","attempts":25}"#
        );
    }

    #[test]
    fn test_finish() {
        let mut generator: Generator = Generator::default();

        let result: GenerationResult = block_on(async {
            generator.start(request(5, 5, 6, 4)).expect("start");
            generator.finish().await
        });
        assert_eq!(result.expect("puzzle").path.len(), 25);
        assert_eq!(generator.state(), GenerationState::Complete);

        assert_eq!(
            block_on(generator.finish()),
            Err(GenerationError::NotStarted)
        );
    }

    #[test]
    fn test_max_wall_density() {
        let mut req: GenerationRequest = request(6, 6, 6, 21);
        req.num_walls = 10;

        let puzzle: Puzzle = Generator::default()
            .with_max_wall_density(0.0)
            .generate(req)
            .expect("puzzle");
        assert!(puzzle.walls.is_empty());

        // 60 edges: 6 walls at 10%
        let puzzle: Puzzle = Generator::default()
            .with_max_wall_density(0.1)
            .generate(req)
            .expect("puzzle");
        assert_eq!(puzzle.walls.len(), 6);
    }
}
