/*
grid.rs

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

//! Cells and adjacency in a rectangular grid.
//!
//! Cells are connected in the four cardinal directions only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell in the grid, identified by its 0-indexed row and column.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// Create a [`Cell`] object.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the two cells share a side.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Direction of the step from this cell to the given adjacent cell.
    ///
    /// Return [`None`] if the cells are not adjacent.
    pub fn direction_to(&self, other: &Cell) -> Option<Direction> {
        if !self.is_adjacent(other) {
            return None;
        }
        if other.row < self.row {
            Some(Direction::North)
        } else if other.row > self.row {
            Some(Direction::South)
        } else if other.col < self.col {
            Some(Direction::West)
        } else {
            Some(Direction::East)
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// Cardinal directions.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All the directions, in the order used by [`Grid::neighbors`].
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Row and column offsets for the direction.
    fn offset(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }
}

/// Grid dimensions.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
}

impl Grid {
    /// Create a [`Grid`] object.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of cells in the grid.
    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of internal edges (boundaries between two cells).
    pub fn num_internal_edges(&self) -> usize {
        if self.rows == 0 || self.cols == 0 {
            return 0;
        }
        self.cols * (self.rows - 1) + self.rows * (self.cols - 1)
    }

    /// Whether the cell is inside the grid.
    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Return the in-bound neighbor of the cell in the given direction.
    pub fn neighbor(&self, cell: &Cell, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.offset();
        let row: usize = cell.row.checked_add_signed(dr)?;
        let col: usize = cell.col.checked_add_signed(dc)?;
        let n: Cell = Cell::new(row, col);
        if self.in_bounds(&n) { Some(n) } else { None }
    }

    /// Return the in-bound neighbors of the cell, in the north, south, west, east order.
    pub fn neighbors(&self, cell: &Cell) -> Vec<Cell> {
        Direction::ALL
            .iter()
            .filter_map(|d| self.neighbor(cell, *d))
            .collect()
    }

    /// Index of the cell in a row-major array.
    pub fn cell_index(&self, cell: &Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Cell for the given row-major index.
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    /// Iterate over all the cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.num_cells()).map(|i| self.cell_at(i))
    }
}
