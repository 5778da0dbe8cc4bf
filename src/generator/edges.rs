/*
edges.rs

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

//! Edges between adjacent cells, and wall sets.
//!
//! An edge is the boundary between two adjacent cells. Each boundary has exactly one canonical
//! representation:
//!
//! - a `Horizontal` edge owned by the cell `(r, c)` separates `(r, c)` from the cell below it,
//!   `(r + 1, c)`.
//! - a `Vertical` edge owned by the cell `(r, c)` separates `(r, c)` from the cell on its right,
//!   `(r, c + 1)`.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::grid::{Cell, Grid};

/// Orientation of the boundary line.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Boundary below the owning cell.
    Horizontal,

    /// Boundary on the right of the owning cell.
    Vertical,
}

/// Boundary between two adjacent cells.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.orientation {
            Orientation::Horizontal => write!(f, "H_{}_{}", self.row, self.col),
            Orientation::Vertical => write!(f, "V_{}_{}", self.row, self.col),
        }
    }
}

impl Edge {
    /// Create an [`Edge`] object.
    pub const fn new(orientation: Orientation, row: usize, col: usize) -> Self {
        Self {
            orientation,
            row,
            col,
        }
    }

    /// Return the canonical edge between the two cells, or [`None`] if they are not adjacent.
    pub fn between(cell1: &Cell, cell2: &Cell) -> Option<Self> {
        if !cell1.is_adjacent(cell2) {
            return None;
        }
        if cell1.row == cell2.row {
            Some(Self::new(
                Orientation::Vertical,
                cell1.row,
                cell1.col.min(cell2.col),
            ))
        } else {
            Some(Self::new(
                Orientation::Horizontal,
                cell1.row.min(cell2.row),
                cell1.col,
            ))
        }
    }

    /// Return the two cells separated by the edge.
    pub fn cells(&self) -> (Cell, Cell) {
        let owner: Cell = Cell::new(self.row, self.col);
        match self.orientation {
            Orientation::Horizontal => (owner, Cell::new(self.row + 1, self.col)),
            Orientation::Vertical => (owner, Cell::new(self.row, self.col + 1)),
        }
    }

    /// Whether the edge separates two cells of the grid.
    pub fn is_internal(&self, grid: &Grid) -> bool {
        let (c1, c2) = self.cells();
        grid.in_bounds(&c1) && grid.in_bounds(&c2)
    }

    /// Return all the internal edges of the grid: the horizontal edges first, row by row, and then
    /// the vertical edges.
    pub fn all_internal(grid: &Grid) -> Vec<Self> {
        let mut edges: Vec<Self> = Vec::with_capacity(grid.num_internal_edges());

        for r in 0..grid.rows.saturating_sub(1) {
            for c in 0..grid.cols {
                edges.push(Self::new(Orientation::Horizontal, r, c));
            }
        }
        for r in 0..grid.rows {
            for c in 0..grid.cols.saturating_sub(1) {
                edges.push(Self::new(Orientation::Vertical, r, c));
            }
        }
        edges
    }

    /// Return the internal edges that flank a step crossing this edge.
    ///
    /// A step through a vertical edge moves east-west; the boundaries above and below the two
    /// cells of the step run alongside it. Walls on these boundaries form corridors.
    pub fn flanking(&self, grid: &Grid) -> Vec<Self> {
        let (c1, c2) = self.cells();
        let mut flanks: Vec<Self> = Vec::with_capacity(4);

        for cell in [c1, c2] {
            match self.orientation {
                Orientation::Vertical => {
                    flanks.push(Self::new(Orientation::Horizontal, cell.row, cell.col));
                    if cell.row > 0 {
                        flanks.push(Self::new(Orientation::Horizontal, cell.row - 1, cell.col));
                    }
                }
                Orientation::Horizontal => {
                    flanks.push(Self::new(Orientation::Vertical, cell.row, cell.col));
                    if cell.col > 0 {
                        flanks.push(Self::new(Orientation::Vertical, cell.row, cell.col - 1));
                    }
                }
            }
        }
        flanks.retain(|e| e.is_internal(grid));
        flanks
    }
}

/// Set of blocking edges (walls).
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct WallSet {
    walls: BTreeSet<Edge>,
}

impl FromIterator<Edge> for WallSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self {
            walls: iter.into_iter().collect(),
        }
    }
}

impl WallSet {
    /// Create an empty [`WallSet`] object.
    pub fn new() -> Self {
        Self {
            walls: BTreeSet::new(),
        }
    }

    /// Add a wall.
    pub fn insert(&mut self, edge: Edge) -> bool {
        self.walls.insert(edge)
    }

    /// Whether the edge is a wall.
    pub fn contains(&self, edge: &Edge) -> bool {
        self.walls.contains(edge)
    }

    /// Whether a wall separates the two cells.
    pub fn is_wall_between(&self, cell1: &Cell, cell2: &Cell) -> bool {
        match Edge::between(cell1, cell2) {
            Some(e) => self.walls.contains(&e),
            None => false,
        }
    }

    /// Number of walls.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Whether there is no wall.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Iterate over the walls in their canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.walls.iter()
    }

    /// Number of neighbors of the cell that are not separated from it by a wall.
    pub fn open_neighbors(&self, grid: &Grid, cell: &Cell) -> usize {
        grid.neighbors(cell)
            .iter()
            .filter(|n| !self.is_wall_between(cell, n))
            .count()
    }

    /// Print the walls.
    pub fn debug(&self) {
        let keys: Vec<String> = self.walls.iter().map(|e| e.to_string()).collect();
        debug!("Walls ({}) = {}", keys.len(), keys.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_edge() {
        let a: Cell = Cell::new(2, 3);
        let b: Cell = Cell::new(2, 4);
        let c: Cell = Cell::new(3, 3);

        assert_eq!(Edge::between(&a, &b), Edge::between(&b, &a));
        assert_eq!(
            Edge::between(&a, &b),
            Some(Edge::new(Orientation::Vertical, 2, 3))
        );
        assert_eq!(
            Edge::between(&c, &a),
            Some(Edge::new(Orientation::Horizontal, 2, 3))
        );
        assert_eq!(Edge::between(&b, &c), None);
        assert_eq!(Edge::new(Orientation::Horizontal, 2, 3).cells(), (a, c));
    }

    #[test]
    fn test_all_internal() {
        let grid: Grid = Grid::new(3, 4);
        let edges: Vec<Edge> = Edge::all_internal(&grid);

        assert_eq!(edges.len(), grid.num_internal_edges());
        assert!(edges.iter().all(|e| e.is_internal(&grid)));
        let unique: BTreeSet<Edge> = edges.iter().copied().collect();
        assert_eq!(unique.len(), edges.len());
        assert!(Edge::all_internal(&Grid::new(1, 1)).is_empty());
    }

    #[test]
    fn test_flanking() {
        let grid: Grid = Grid::new(3, 3);
        let step: Edge = Edge::new(Orientation::Vertical, 1, 0);
        let flanks: Vec<Edge> = step.flanking(&grid);

        assert_eq!(flanks.len(), 4);
        assert!(flanks.contains(&Edge::new(Orientation::Horizontal, 0, 0)));
        assert!(flanks.contains(&Edge::new(Orientation::Horizontal, 1, 1)));

        // On the border, some flanking boundaries are outside the grid
        let top: Edge = Edge::new(Orientation::Vertical, 0, 0);
        assert_eq!(top.flanking(&grid).len(), 2);
    }

    #[test]
    fn test_wall_set() {
        let grid: Grid = Grid::new(2, 2);
        let mut walls: WallSet = WallSet::new();

        walls.insert(Edge::new(Orientation::Vertical, 0, 0));
        assert!(walls.is_wall_between(&Cell::new(0, 1), &Cell::new(0, 0)));
        assert!(!walls.is_wall_between(&Cell::new(0, 0), &Cell::new(1, 0)));
        assert_eq!(walls.open_neighbors(&grid, &Cell::new(0, 0)), 1);
        assert_eq!(walls.iter().next().map(|e| e.to_string()), Some("V_0_0".to_string()));
    }
}
