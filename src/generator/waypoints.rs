/*
waypoints.rs

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

//! Select the waypoints.
//!
//! A waypoint is a cell that the player must visit. Waypoints are chosen among the cells without
//! a number. Isolated cells (few open sides) and cells far from the numbers, halfway between two
//! of them, are preferred.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::edges::WallSet;
use super::grid::{Cell, Grid};
use super::numbers::NumberMap;
use super::path::Path;
use super::weights::{self, WaypointWeights};

/// Set of cells that the player must visit.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct WaypointSet {
    waypoints: BTreeSet<Cell>,
}

impl FromIterator<Cell> for WaypointSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

impl WaypointSet {
    /// Whether the cell is a waypoint.
    pub fn contains(&self, cell: &Cell) -> bool {
        self.waypoints.contains(cell)
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether there is no waypoint.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Iterate over the waypoints, row by row.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.waypoints.iter()
    }
}

/// [`WaypointSelector`] object.
#[derive(Default)]
pub struct WaypointSelector {
    /// Scoring coefficients.
    weights: WaypointWeights,
}

impl WaypointSelector {
    /// Create the object.
    pub fn new(weights: WaypointWeights) -> Self {
        Self { weights }
    }

    /// Select up to `num_waypoints` waypoints among the path cells without a number.
    pub fn select<R: Rng>(
        &self,
        path: &Path,
        numbers: &NumberMap,
        walls: &WallSet,
        num_waypoints: usize,
        grid: &Grid,
        rng: &mut R,
    ) -> WaypointSet {
        if num_waypoints == 0 {
            return WaypointSet::default();
        }

        let numbered: Vec<usize> = numbers.path_indices();
        let mut candidates: Vec<(f64, Cell)> = path
            .get()
            .iter()
            .enumerate()
            .filter(|(_, cell)| !numbers.contains(cell))
            .map(|(index, cell)| {
                let mut score: f64 = self.score(cell, index, &numbered, walls, grid);
                score += weights::jitter(self.weights.jitter, rng);
                (score, *cell)
            })
            .collect();

        debug!(
            "Waypoints: requested = {num_waypoints}  candidates = {}",
            candidates.len()
        );
        if candidates.is_empty() {
            return WaypointSet::default();
        }

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        let waypoints: WaypointSet = candidates
            .iter()
            .take(num_waypoints)
            .map(|(_, cell)| *cell)
            .collect();

        info!("{} waypoint(s) selected", waypoints.len());
        waypoints
    }

    /// Score a candidate cell at the given path position.
    fn score(
        &self,
        cell: &Cell,
        index: usize,
        numbered: &[usize],
        walls: &WallSet,
        grid: &Grid,
    ) -> f64 {
        let closed: usize = 4 - walls.open_neighbors(grid, cell);
        let mut score: f64 = self.weights.scarcity * closed as f64;

        // Path distance to the closest numbers before and after the cell
        let before: Option<usize> = numbered.iter().rev().find(|i| **i < index).map(|i| index - i);
        let after: Option<usize> = numbered.iter().find(|i| **i > index).map(|i| i - index);

        match (before, after) {
            (Some(b), Some(a)) => {
                score += self.weights.distance * b.min(a) as f64;
                let imbalance: f64 = b.abs_diff(a) as f64 / (a + b) as f64;
                score += self.weights.balance * (1.0 - imbalance);
            }
            (Some(d), None) | (None, Some(d)) => score += self.weights.distance * d as f64,
            (None, None) => (),
        }
        score
    }
}
