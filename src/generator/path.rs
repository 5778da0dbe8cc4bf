/*
path.rs

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

//! Path through the grid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::edges::Edge;
use super::grid::Cell;

/// Path object.
///
/// The object is built from the ordered list of its cells, and is serialized as that list.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Path {
    /// Path as an ordered list of cells.
    path: Vec<Cell>,

    /// Stores the visited status of the cells.
    /// Instead of looking for the cell in the [`Path::path`] vector, this
    /// [`std::collections::HashSet`] speeds up the lookup.
    visited: HashSet<Cell>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl From<Vec<Cell>> for Path {
    fn from(path: Vec<Cell>) -> Self {
        let visited: HashSet<Cell> = path.iter().copied().collect();
        Self { path, visited }
    }
}

impl From<Path> for Vec<Cell> {
    fn from(path: Path) -> Self {
        path.path
    }
}

impl Path {
    /// Get the number of cells in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path has no cell.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether the cell is in the path or not.
    pub fn contains(&self, cell: &Cell) -> bool {
        self.visited.contains(cell)
    }

    /// Return a reference to the path vector.
    pub fn get(&self) -> &[Cell] {
        &self.path
    }

    /// Return the first cell in the path.
    pub fn first(&self) -> Option<Cell> {
        self.path.first().copied()
    }

    /// Return the last cell in the path.
    pub fn last(&self) -> Option<Cell> {
        self.path.last().copied()
    }

    /// Return the edges crossed by the steps of the path.
    ///
    /// Consecutive cells that are not adjacent (which cannot happen for a generated path) do not
    /// produce an edge.
    pub fn used_edges(&self) -> HashSet<Edge> {
        self.path
            .windows(2)
            .filter_map(|w| Edge::between(&w[0], &w[1]))
            .collect()
    }

    /// Whether the path changes direction at the given position.
    ///
    /// The first and the last cells are never turns.
    pub fn is_turn(&self, index: usize) -> bool {
        if index == 0 || index + 1 >= self.path.len() {
            return false;
        }
        let incoming = self.path[index - 1].direction_to(&self.path[index]);
        let outgoing = self.path[index].direction_to(&self.path[index + 1]);
        incoming != outgoing
    }

    /// Whether every cell appears once and every step joins two adjacent cells.
    pub fn is_valid(&self) -> bool {
        self.visited.len() == self.path.len()
            && self.path.windows(2).all(|w| w[0].is_adjacent(&w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake() -> Path {
        Path::from(vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 1),
            Cell::new(1, 0),
        ])
    }

    #[test]
    fn test_lookup() {
        let path: Path = snake();

        assert_eq!(path.len(), 4);
        assert!(path.contains(&Cell::new(1, 1)));
        assert!(!path.contains(&Cell::new(2, 0)));
        assert_eq!(path.first(), Some(Cell::new(0, 0)));
        assert_eq!(path.last(), Some(Cell::new(1, 0)));

        let empty: Path = Path::default();
        assert!(empty.is_empty());
        assert_eq!(empty.first(), None);
    }

    #[test]
    fn test_turns() {
        let path: Path = snake();

        assert!(!path.is_turn(0));
        assert!(path.is_turn(1));
        assert!(path.is_turn(2));
        assert!(!path.is_turn(3));

        let straight: Path = Path::from(vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]);
        assert!(!straight.is_turn(1));
    }

    #[test]
    fn test_used_edges_and_validity() {
        let path: Path = snake();

        assert_eq!(path.used_edges().len(), 3);
        assert!(path.is_valid());

        let broken: Path = Path::from(vec![Cell::new(0, 0), Cell::new(1, 1)]);
        assert!(!broken.is_valid());
    }

    #[test]
    fn test_serialization_keeps_order() {
        let path: Path = snake();
        let json: String = serde_json::to_string(&path).expect("serialize");
        let restored: Path = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored, path);
        assert!(restored.contains(&Cell::new(1, 0)));
    }
}
