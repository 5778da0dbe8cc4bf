/*
hamiltonian.rs

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

//! Generate a random Hamiltonian path.
//!
//! The path visits every cell of the grid exactly once. Each attempt starts from a random cell
//! and runs a depth-first search. Candidate moves are ordered by their onward degree (the
//! number of unvisited neighbors they have): cells with fewer options are visited first, because
//! they are likely to become unreachable if deferred.
//!
//! If an attempt fails, then a new attempt starts from another random cell, up to a maximum
//! number of attempts.

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::grid::{Cell, Grid};
use super::path::Path;

/// Default number of search nodes after which an attempt is abandoned.
pub const DEFAULT_MAX_NODES_PER_ATTEMPT: usize = 100_000;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum SearchError {
    /// The grid has no cell, or the number of cells overflows.
    InvalidParameters,

    /// No path found after all the attempts.
    MaxAttemptsReached { attempts: usize },

    /// The search was cancelled by the requester.
    Cancelled,
}

/// Limits for a single attempt.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct SearchLimits {
    /// An attempt is abandoned after visiting that many search nodes.
    pub max_nodes_per_attempt: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_nodes_per_attempt: DEFAULT_MAX_NODES_PER_ATTEMPT,
        }
    }
}

/// Statistics for the last search.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SearchStats {
    /// Number of attempts (started from a random cell).
    pub attempts: usize,

    /// Total number of search nodes over all the attempts.
    pub nodes: usize,
}

/// Outcome of one depth-first traversal.
#[derive(Debug, PartialEq)]
enum Traversal {
    Found,
    DeadEnd,
    Abandoned,
    Cancelled,
}

/// Search state shared by the recursion.
///
/// The buffers are allocated once and reused for all the attempts. Each recursive call pushes
/// its cell and pops it back when it fails. The [`Path`] object is only built for the result.
struct SearchContext {
    /// Current partial path.
    path: Vec<Cell>,

    /// Visited status, indexed by [`Grid::cell_index`].
    visited: Vec<bool>,

    /// Flood fill marks. A cell is reached by the current fill when its mark equals `stamp`.
    marks: Vec<usize>,
    stamp: usize,

    /// Flood fill stack.
    stack: Vec<Cell>,

    /// Number of nodes visited in the current attempt.
    nodes: usize,
}

impl SearchContext {
    fn new(grid: &Grid) -> Self {
        Self {
            path: Vec::with_capacity(grid.num_cells()),
            visited: vec![false; grid.num_cells()],
            marks: vec![0; grid.num_cells()],
            stamp: 0,
            stack: Vec::with_capacity(grid.num_cells()),
            nodes: 0,
        }
    }

    fn reset(&mut self) {
        self.path.clear();
        self.visited.fill(false);
        self.nodes = 0;
    }

    fn enter(&mut self, grid: &Grid, cell: Cell) {
        self.visited[grid.cell_index(&cell)] = true;
        self.path.push(cell);
    }

    fn leave(&mut self, grid: &Grid, cell: Cell) {
        self.visited[grid.cell_index(&cell)] = false;
        self.path.pop();
    }

    fn is_visited(&self, grid: &Grid, cell: &Cell) -> bool {
        self.visited[grid.cell_index(cell)]
    }
}

/// [`HamiltonianSearch`] object.
pub struct HamiltonianSearch {
    /// Grid dimensions.
    grid: Grid,

    /// Limits for each attempt.
    limits: SearchLimits,

    /// Raised by the requester to stop the search.
    cancel: Arc<AtomicBool>,

    /// Statistics for the last search.
    pub stats: SearchStats,
}

impl HamiltonianSearch {
    /// Create the object.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            limits: SearchLimits::default(),
            cancel: Arc::new(AtomicBool::new(false)),
            stats: SearchStats::default(),
        }
    }

    /// Set the limits for each attempt.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Use the provided flag to cancel the search.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Search for a Hamiltonian path, trying at most `max_attempts` random starting cells.
    ///
    /// # Errors
    ///
    /// The method returns an error if the grid has no cell, if no path is found after
    /// `max_attempts` attempts (with zero attempts, no traversal is done), or if the search is
    /// cancelled.
    pub fn search<R: Rng>(
        &mut self,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Path, SearchError> {
        self.stats = SearchStats::default();

        let num_cells: usize = match self.grid.rows.checked_mul(self.grid.cols) {
            Some(n) if n > 0 => n,
            _ => return Err(SearchError::InvalidParameters),
        };

        debug!(
            "Searching a path for a {}x{} grid ({} cells), max attempts = {}",
            self.grid.rows, self.grid.cols, num_cells, max_attempts
        );

        let mut context: SearchContext = SearchContext::new(&self.grid);
        while self.stats.attempts < max_attempts {
            self.stats.attempts += 1;
            context.reset();

            let start: Cell = Cell::new(
                rng.random_range(0..self.grid.rows),
                rng.random_range(0..self.grid.cols),
            );

            // On a grid with an odd number of cells, coloring the cells like a checkerboard gives
            // one more "even" cell than "odd" cells. A path alternates colors, so it must start
            // and end on even cells.
            if num_cells % 2 == 1 && (start.row + start.col) % 2 == 1 {
                debug!(
                    "Attempt {}: starting cell {start} cannot start a path",
                    self.stats.attempts
                );
                continue;
            }

            let res: Traversal = self.find_path(start, &mut context, rng);
            self.stats.nodes += context.nodes;
            debug!(
                "Attempt {}: start = {start}  nodes = {}  result = {res:?}",
                self.stats.attempts, context.nodes
            );
            match res {
                Traversal::Found => {
                    info!(
                        "Path found for the {}x{} grid after {} attempt(s), {} nodes",
                        self.grid.rows, self.grid.cols, self.stats.attempts, self.stats.nodes
                    );
                    return Ok(Path::from(context.path));
                }
                Traversal::Cancelled => {
                    debug!("Search cancelled");
                    return Err(SearchError::Cancelled);
                }
                Traversal::DeadEnd | Traversal::Abandoned => (),
            }
        }

        warn!(
            "No path found after {} attempts for the {}x{} grid",
            self.stats.attempts, self.grid.rows, self.grid.cols
        );
        Err(SearchError::MaxAttemptsReached {
            attempts: self.stats.attempts,
        })
    }

    /// Recursively find a path from the given cell.
    fn find_path<R: Rng>(
        &self,
        cell: Cell,
        context: &mut SearchContext,
        rng: &mut R,
    ) -> Traversal {
        context.enter(&self.grid, cell);
        if context.path.len() == self.grid.num_cells() {
            return Traversal::Found;
        }

        context.nodes += 1;
        if self.cancel.load(Ordering::Relaxed) {
            context.leave(&self.grid, cell);
            return Traversal::Cancelled;
        }
        if context.nodes > self.limits.max_nodes_per_attempt {
            context.leave(&self.grid, cell);
            return Traversal::Abandoned;
        }

        if self.is_stranded(&cell, context) || self.is_split(&cell, context) {
            context.leave(&self.grid, cell);
            return Traversal::DeadEnd;
        }

        // Score the unvisited neighbors by their number of onward moves. Shuffling before the
        // stable sort breaks the ties randomly.
        let mut candidates: Vec<(usize, Cell)> = self
            .grid
            .neighbors(&cell)
            .into_iter()
            .filter(|n| !context.is_visited(&self.grid, n))
            .map(|n| (self.onward_degree(&n, context), n))
            .collect();
        candidates.shuffle(rng);
        candidates.sort_by_key(|(score, _)| *score);

        for (_, next) in candidates {
            match self.find_path(next, context, rng) {
                Traversal::DeadEnd => (),
                res => return res,
            }
        }
        context.leave(&self.grid, cell);
        Traversal::DeadEnd
    }

    /// Number of unvisited neighbors of the cell.
    fn onward_degree(&self, cell: &Cell, context: &SearchContext) -> usize {
        self.grid
            .neighbors(cell)
            .iter()
            .filter(|n| !context.is_visited(&self.grid, n))
            .count()
    }

    /// Whether the remaining cells cannot all be covered from the head of the path.
    ///
    /// Every unvisited cell must keep at least one way in (an unvisited neighbor or the head).
    /// A cell with exactly one way in can only be the end of the path, so at most one such cell
    /// can exist.
    fn is_stranded(&self, head: &Cell, context: &SearchContext) -> bool {
        let mut dead_ends: usize = 0;

        for (index, cell) in self.grid.cells().enumerate() {
            if context.visited[index] {
                continue;
            }
            let ways_in: usize = self
                .grid
                .neighbors(&cell)
                .iter()
                .filter(|n| *n == head || !context.is_visited(&self.grid, n))
                .count();
            match ways_in {
                0 => return true,
                1 => {
                    dead_ends += 1;
                    if dead_ends > 1 {
                        return true;
                    }
                }
                _ => (),
            }
        }
        false
    }

    /// Whether some unvisited cells cannot be reached from the head of the path.
    fn is_split(&self, head: &Cell, context: &mut SearchContext) -> bool {
        let num_left: usize = self.grid.num_cells() - context.path.len();
        let SearchContext {
            visited,
            marks,
            stamp,
            stack,
            ..
        } = context;

        *stamp += 1;
        stack.clear();
        stack.push(*head);
        let mut reached: usize = 0;

        while let Some(cell) = stack.pop() {
            for n in self.grid.neighbors(&cell) {
                let index: usize = self.grid.cell_index(&n);
                if !visited[index] && marks[index] != *stamp {
                    marks[index] = *stamp;
                    reached += 1;
                    stack.push(n);
                }
            }
        }
        reached < num_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn assert_hamiltonian(path: &Path, rows: usize, cols: usize) {
        assert_eq!(path.len(), rows * cols);
        let unique: HashSet<Cell> = path.get().iter().copied().collect();
        assert_eq!(unique.len(), rows * cols);
        assert!(path.get().iter().all(|c| c.row < rows && c.col < cols));
        assert!(path.get().windows(2).all(|w| w[0].is_adjacent(&w[1])));
    }

    #[test]
    fn test_single_cell() {
        let mut rng: StdRng = StdRng::seed_from_u64(1);
        let mut search: HamiltonianSearch = HamiltonianSearch::new(1, 1);
        let path: Path = search.search(1, &mut rng).expect("1x1 path");

        assert_eq!(path.get(), &[Cell::new(0, 0)]);
        assert_eq!(search.stats.attempts, 1);
    }

    #[test]
    fn test_zero_attempts() {
        let mut rng: StdRng = StdRng::seed_from_u64(1);
        let mut search: HamiltonianSearch = HamiltonianSearch::new(4, 4);

        assert_eq!(
            search.search(0, &mut rng),
            Err(SearchError::MaxAttemptsReached { attempts: 0 })
        );
        assert_eq!(search.stats.nodes, 0);
    }

    #[test]
    fn test_invalid_grid() {
        let mut rng: StdRng = StdRng::seed_from_u64(1);

        assert_eq!(
            HamiltonianSearch::new(0, 4).search(5, &mut rng),
            Err(SearchError::InvalidParameters)
        );
        assert_eq!(
            HamiltonianSearch::new(usize::MAX, 2).search(5, &mut rng),
            Err(SearchError::InvalidParameters)
        );
    }

    #[test]
    fn test_paths_for_several_sizes() {
        for (rows, cols) in [(1, 2), (1, 7), (2, 3), (3, 3), (4, 4), (5, 5), (7, 8), (10, 10)] {
            for seed in 0..5 {
                let mut rng: StdRng = StdRng::seed_from_u64(seed);
                let mut search: HamiltonianSearch = HamiltonianSearch::new(rows, cols);
                let path: Path = search
                    .search(25, &mut rng)
                    .unwrap_or_else(|e| panic!("{rows}x{cols} seed {seed}: {e:?}"));
                assert_hamiltonian(&path, rows, cols);
            }
        }
    }

    #[test]
    fn test_odd_grid_starts_on_even_cell() {
        for seed in 0..10 {
            let mut rng: StdRng = StdRng::seed_from_u64(seed);
            let path: Path = HamiltonianSearch::new(5, 5)
                .search(25, &mut rng)
                .expect("5x5 path");
            let first: Cell = path.first().expect("first cell");
            let last: Cell = path.last().expect("last cell");
            assert_eq!((first.row + first.col) % 2, 0);
            assert_eq!((last.row + last.col) % 2, 0);
        }
    }

    #[test]
    fn test_cancelled() {
        let mut rng: StdRng = StdRng::seed_from_u64(3);
        let cancel: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
        let mut search: HamiltonianSearch =
            HamiltonianSearch::new(6, 6).with_cancel_flag(cancel.clone());

        assert_eq!(search.search(25, &mut rng), Err(SearchError::Cancelled));
    }

    #[test]
    fn test_node_budget_exhausts_attempts() {
        let mut rng: StdRng = StdRng::seed_from_u64(3);
        let mut search: HamiltonianSearch =
            HamiltonianSearch::new(6, 6).with_limits(SearchLimits {
                max_nodes_per_attempt: 2,
            });

        assert_eq!(
            search.search(4, &mut rng),
            Err(SearchError::MaxAttemptsReached { attempts: 4 })
        );
    }

    #[test]
    fn test_split_detection() {
        let search: HamiltonianSearch = HamiltonianSearch::new(3, 3);
        let grid: Grid = Grid::new(3, 3);
        let mut context: SearchContext = SearchContext::new(&grid);

        // The middle row and the top right corner cut the bottom row from the head
        for cell in [Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2), Cell::new(0, 2)] {
            context.enter(&grid, cell);
        }
        assert!(search.is_split(&Cell::new(0, 2), &mut context));

        // Back to (1,2): the remaining cells are connected again, but (0,0) and (2,0) both have a
        // single way in and cannot both be the end of the path
        context.leave(&grid, Cell::new(0, 2));
        assert!(!search.is_split(&Cell::new(1, 2), &mut context));
        assert!(search.is_stranded(&Cell::new(1, 2), &context));
    }
}
