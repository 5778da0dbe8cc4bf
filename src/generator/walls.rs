/*
walls.rs

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

//! Select the walls.
//!
//! A wall blocks the movement between two adjacent cells. Walls are only placed on edges that
//! the generated path does not cross, so the path always remains a solution.
//!
//! Every candidate edge gets a score:
//!
//! - cells where the path turns make the wall look deliberate,
//! - numbered cells are worth guarding, intermediate numbers more than the first and last ones,
//! - edges that run alongside a step of the path build corridors,
//! - edges that leave a cell with one open side or less create dead ends,
//! - a small random value breaks the ties.
//!
//! The dead-end bonus depends on the walls already selected, so the walls are picked one at a
//! time, always taking the highest score among the remaining candidates.

use log::{debug, info};
use rand::Rng;
use std::collections::HashSet;

use super::edges::{Edge, WallSet};
use super::grid::{Cell, Grid};
use super::numbers::NumberMap;
use super::path::Path;
use super::weights::{self, WallWeights};

/// Default fraction of the internal edges that can become walls.
pub const MAX_WALL_DENSITY: f64 = 0.4;

/// Return the number of walls that can actually be placed.
///
/// The requested number is capped by the density limit and by the edges that must stay open for
/// the path (one per step). The result is never negative.
pub fn max_walls(requested: usize, grid: &Grid, max_density: f64) -> usize {
    let total: usize = grid.num_internal_edges();
    let density: f64 = max_density.clamp(0.0, 1.0);
    let density_cap: usize = (total as f64 * density).floor() as usize;
    let reserve: usize = grid.num_cells().saturating_sub(1);

    requested
        .min(density_cap)
        .min(total.saturating_sub(reserve))
}

/// Candidate wall with the part of its score that does not depend on the other walls.
struct Candidate {
    edge: Edge,
    score: f64,
}

/// [`WallSelector`] object.
pub struct WallSelector {
    /// Scoring coefficients.
    weights: WallWeights,

    /// Fraction of the internal edges that can become walls.
    max_density: f64,
}

impl Default for WallSelector {
    fn default() -> Self {
        Self::new(WallWeights::default(), MAX_WALL_DENSITY)
    }
}

impl WallSelector {
    /// Create the object.
    pub fn new(weights: WallWeights, max_density: f64) -> Self {
        Self {
            weights,
            max_density,
        }
    }

    /// Select up to `num_walls` walls for the given path and numbers.
    pub fn select<R: Rng>(
        &self,
        path: &Path,
        numbers: &NumberMap,
        num_walls: usize,
        grid: &Grid,
        rng: &mut R,
    ) -> WallSet {
        let mut walls: WallSet = WallSet::new();
        let cap: usize = max_walls(num_walls, grid, self.max_density);

        let used: HashSet<Edge> = path.used_edges();
        let mut candidates: Vec<Candidate> = Edge::all_internal(grid)
            .into_iter()
            .filter(|e| !used.contains(e))
            .map(|edge| Candidate { edge, score: 0.0 })
            .collect();

        debug!(
            "Walls: requested = {num_walls}  cap = {cap}  candidates = {}",
            candidates.len()
        );
        if cap == 0 || candidates.is_empty() {
            return walls;
        }

        let turns: HashSet<Cell> = (0..path.len())
            .filter(|i| path.is_turn(*i))
            .map(|i| path.get()[i])
            .collect();
        let corridors: HashSet<Edge> = used.iter().flat_map(|e| e.flanking(grid)).collect();
        let max_value: usize = numbers.max_value();

        for candidate in candidates.iter_mut() {
            let (c1, c2) = candidate.edge.cells();
            let mut score: f64 = 0.0;

            for cell in [c1, c2] {
                if turns.contains(&cell) {
                    score += self.weights.turn;
                }
                match numbers.get(&cell) {
                    Some(v) if v == 1 || v == max_value => score += self.weights.endpoint_number,
                    Some(_) => score += self.weights.interior_number,
                    None => (),
                }
            }
            if corridors.contains(&candidate.edge) {
                score += self.weights.parallel;
            }
            score += weights::jitter(self.weights.jitter, rng);
            candidate.score = score;
        }

        while walls.len() < cap && !candidates.is_empty() {
            let mut best: usize = 0;
            let mut best_score: f64 = f64::MIN;
            for (i, candidate) in candidates.iter().enumerate() {
                let score: f64 = candidate.score + self.sparsity(&candidate.edge, &walls, grid);
                if score > best_score {
                    best = i;
                    best_score = score;
                }
            }
            let chosen: Candidate = candidates.swap_remove(best);
            debug!("    Wall {} (score {best_score:.2})", chosen.edge);
            walls.insert(chosen.edge);
        }

        info!("{} wall(s) selected", walls.len());
        walls.debug();
        walls
    }

    /// Bonus for the cells of the edge that would be left with one open side or less.
    fn sparsity(&self, edge: &Edge, walls: &WallSet, grid: &Grid) -> f64 {
        let (c1, c2) = edge.cells();
        let mut bonus: f64 = 0.0;

        for cell in [c1, c2] {
            // The edge itself is not a wall yet, so it is still counted as open
            if walls.open_neighbors(grid, &cell) <= 2 {
                bonus += self.weights.sparsity;
            }
        }
        bonus
    }
}
