/*
puzzle.rs

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

//! Generated puzzle.
//!
//! A [`Puzzle`] object built by the generator is always consistent. A puzzle read from a file
//! is checked with [`Puzzle::validate`] before being used.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use super::checker::{self, SolutionError};
use super::edges::{Edge, WallSet};
use super::grid::{Cell, Grid};
use super::numbers::NumberMap;
use super::path::Path;
use super::waypoints::WaypointSet;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum PuzzleError {
    /// The grid has no cell or too many cells.
    InvalidSize { rows: usize, cols: usize },

    /// The solution path does not cover the grid.
    WrongLength { expected: usize, found: usize },

    /// The solution path visits a cell twice or jumps between cells that are not adjacent.
    InvalidPath,

    /// The number is missing, not at its position in the path, or not at its end of the path.
    NumberMisplaced { value: usize },

    /// The wall is outside the grid.
    WallOutside { wall: Edge },

    /// The wall blocks a step of the solution path.
    WallOnPath { wall: Edge },

    /// The waypoint is on a numbered cell.
    WaypointOnNumber { cell: Cell },

    /// The solution path does not solve the puzzle.
    Unsolved(SolutionError),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PuzzleError::InvalidSize { rows, cols } => write!(f, "invalid grid size {rows}x{cols}"),
            PuzzleError::WrongLength { expected, found } => {
                write!(f, "the solution covers {found} cells instead of {expected}")
            }
            PuzzleError::InvalidPath => write!(f, "the solution is not a path"),
            PuzzleError::NumberMisplaced { value } => {
                write!(f, "the number {value} is misplaced along the solution")
            }
            PuzzleError::WallOutside { wall } => write!(f, "the wall {wall} is outside the grid"),
            PuzzleError::WallOnPath { wall } => write!(f, "the wall {wall} blocks the solution"),
            PuzzleError::WaypointOnNumber { cell } => {
                write!(f, "the waypoint {cell} is on a numbered cell")
            }
            PuzzleError::Unsolved(e) => write!(f, "the solution does not solve the puzzle: {e}"),
        }
    }
}

impl Error for PuzzleError {}

/// Puzzle definition and its solution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Puzzle {
    pub rows: usize,
    pub cols: usize,

    /// Seed that reproduces the puzzle with the same parameters.
    pub seed: u64,

    /// Solution path, covering all the cells.
    pub path: Path,

    /// Numbered cells, from 1 to the highest number.
    pub numbers: NumberMap,

    /// Blocked edges.
    pub walls: WallSet,

    /// Cells that the player must visit.
    pub waypoints: WaypointSet,
}

impl Puzzle {
    /// Grid dimensions.
    pub fn grid(&self) -> Grid {
        Grid::new(self.rows, self.cols)
    }

    /// Highest number in the puzzle.
    pub fn x_cells(&self) -> usize {
        self.numbers.max_value()
    }

    /// Verify that the puzzle holds together and that its path solves it.
    ///
    /// # Errors
    ///
    /// Return the first inconsistency found.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let num_cells: usize = match self.rows.checked_mul(self.cols) {
            Some(n) if n > 0 => n,
            _ => {
                return Err(PuzzleError::InvalidSize {
                    rows: self.rows,
                    cols: self.cols,
                });
            }
        };
        if self.path.len() != num_cells {
            return Err(PuzzleError::WrongLength {
                expected: num_cells,
                found: self.path.len(),
            });
        }
        if !self.path.is_valid() {
            return Err(PuzzleError::InvalidPath);
        }

        if self.numbers.cell_for(1) != self.path.first() {
            return Err(PuzzleError::NumberMisplaced { value: 1 });
        }
        let x_cells: usize = self.x_cells();
        if self.numbers.cell_for(x_cells) != self.path.last() {
            return Err(PuzzleError::NumberMisplaced { value: x_cells });
        }
        if let Some(n) = self
            .numbers
            .iter()
            .find(|n| self.path.get().get(n.path_index) != Some(&n.cell))
        {
            return Err(PuzzleError::NumberMisplaced { value: n.value });
        }

        let grid: Grid = self.grid();
        let used: HashSet<Edge> = self.path.used_edges();
        for wall in self.walls.iter() {
            if !wall.is_internal(&grid) {
                return Err(PuzzleError::WallOutside { wall: *wall });
            }
            if used.contains(wall) {
                return Err(PuzzleError::WallOnPath { wall: *wall });
            }
        }

        if let Some(cell) = self.waypoints.iter().find(|c| self.numbers.contains(c)) {
            return Err(PuzzleError::WaypointOnNumber { cell: *cell });
        }

        checker::verify(self, self.path.get()).map_err(PuzzleError::Unsolved)
    }
}
