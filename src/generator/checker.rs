/*
checker.rs

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

//! Verify a route drawn by the player.
//!
//! A route solves the puzzle when it covers every cell once, moves between adjacent cells
//! without crossing a wall, meets the numbers in increasing order from 1 to the highest one, ends
//! on the highest number, and visits all the waypoints.

use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use super::edges::Edge;
use super::grid::{Cell, Grid};
use super::puzzle::Puzzle;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum SolutionError {
    /// The route does not cover the grid.
    WrongLength { expected: usize, found: usize },

    /// The cell is outside the grid.
    OutOfBounds { cell: Cell },

    /// The cell is visited twice.
    Revisited { cell: Cell },

    /// Two consecutive cells of the route do not share a side.
    NotAdjacent { from: Cell, to: Cell },

    /// The route crosses a wall.
    WallCrossed { wall: Edge },

    /// The route does not start on a numbered cell.
    WrongStart,

    /// A number is reached before a lower one.
    NumberOutOfOrder { expected: usize, found: usize },

    /// The route does not end on the highest number.
    WrongEnd,

    /// A waypoint is not visited.
    MissingWaypoint { cell: Cell },
}

impl fmt::Display for SolutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolutionError::WrongLength { expected, found } => {
                write!(f, "the route covers {found} cells instead of {expected}")
            }
            SolutionError::OutOfBounds { cell } => write!(f, "cell {cell} is outside the grid"),
            SolutionError::Revisited { cell } => write!(f, "cell {cell} is visited twice"),
            SolutionError::NotAdjacent { from, to } => {
                write!(f, "cells {from} and {to} are not adjacent")
            }
            SolutionError::WallCrossed { wall } => write!(f, "the route crosses the wall {wall}"),
            SolutionError::WrongStart => write!(f, "the route must start on 1"),
            SolutionError::NumberOutOfOrder { expected, found } => {
                write!(f, "reached {found} while {expected} was expected")
            }
            SolutionError::WrongEnd => write!(f, "the route must end on the highest number"),
            SolutionError::MissingWaypoint { cell } => {
                write!(f, "the waypoint {cell} is not visited")
            }
        }
    }
}

impl Error for SolutionError {}

/// Verify that the route solves the puzzle.
///
/// # Errors
///
/// Return the first problem found along the route.
pub fn verify(puzzle: &Puzzle, route: &[Cell]) -> Result<(), SolutionError> {
    let grid: Grid = puzzle.grid();
    let x_cells: usize = puzzle.x_cells();

    if route.len() != grid.num_cells() {
        return Err(SolutionError::WrongLength {
            expected: grid.num_cells(),
            found: route.len(),
        });
    }

    let mut visited: HashSet<Cell> = HashSet::with_capacity(route.len());
    let mut expected: usize = 1;

    for (i, cell) in route.iter().enumerate() {
        if !grid.in_bounds(cell) {
            return Err(SolutionError::OutOfBounds { cell: *cell });
        }
        if !visited.insert(*cell) {
            return Err(SolutionError::Revisited { cell: *cell });
        }
        if i > 0 {
            let previous: &Cell = &route[i - 1];
            match Edge::between(previous, cell) {
                None => {
                    return Err(SolutionError::NotAdjacent {
                        from: *previous,
                        to: *cell,
                    });
                }
                Some(e) if puzzle.walls.contains(&e) => {
                    return Err(SolutionError::WallCrossed { wall: e });
                }
                Some(_) => (),
            }
        }

        if let Some(value) = puzzle.numbers.get(cell) {
            if value != expected {
                return Err(SolutionError::NumberOutOfOrder {
                    expected,
                    found: value,
                });
            }
            expected += 1;
        } else if i == 0 {
            return Err(SolutionError::WrongStart);
        }
    }

    let last: Option<usize> = route.last().and_then(|c| puzzle.numbers.get(c));
    if last != Some(x_cells) {
        return Err(SolutionError::WrongEnd);
    }

    if let Some(cell) = puzzle.waypoints.iter().find(|c| !visited.contains(c)) {
        return Err(SolutionError::MissingWaypoint { cell: *cell });
    }

    debug!("Route of {} cells verified", route.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::edges::{Orientation, WallSet};
    use crate::generator::numbers;
    use crate::generator::path::Path;
    use crate::generator::waypoints::WaypointSet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    // 2x3 grid, solution: (0,0) (0,1) (0,2) (1,2) (1,1) (1,0)
    fn puzzle() -> Puzzle {
        let path: Path = Path::from(vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(1, 2),
            Cell::new(1, 1),
            Cell::new(1, 0),
        ]);
        let mut rng: StdRng = StdRng::seed_from_u64(0);
        let numbers = numbers::assign(&path, 2, &mut rng);
        let walls: WallSet = [Edge::new(Orientation::Horizontal, 0, 1)].into_iter().collect();
        let waypoints: WaypointSet = [Cell::new(1, 1)].into_iter().collect();
        Puzzle {
            rows: 2,
            cols: 3,
            seed: 0,
            path,
            numbers,
            walls,
            waypoints,
        }
    }

    #[test]
    fn test_solution_path_verifies() {
        let p: Puzzle = puzzle();

        assert_eq!(verify(&p, p.path.get()), Ok(()));
    }

    #[test]
    fn test_errors() {
        let p: Puzzle = puzzle();
        let c = Cell::new;

        assert_eq!(
            verify(&p, &[c(0, 0)]),
            Err(SolutionError::WrongLength {
                expected: 6,
                found: 1
            })
        );
        assert_eq!(
            verify(&p, &[c(0, 0), c(0, 1), c(0, 1), c(1, 2), c(1, 1), c(1, 0)]),
            Err(SolutionError::Revisited { cell: c(0, 1) })
        );
        assert_eq!(
            verify(&p, &[c(0, 0), c(0, 1), c(0, 2), c(1, 0), c(1, 1), c(1, 2)]),
            Err(SolutionError::NotAdjacent {
                from: c(0, 2),
                to: c(1, 0)
            })
        );
        assert_eq!(
            verify(&p, &[c(0, 0), c(1, 0), c(1, 1), c(0, 1), c(0, 2), c(1, 2)]),
            Err(SolutionError::WallCrossed {
                wall: Edge::new(Orientation::Horizontal, 0, 1)
            })
        );
        assert_eq!(
            verify(&p, &[c(1, 0), c(1, 1), c(1, 2), c(0, 2), c(0, 1), c(0, 0)]),
            Err(SolutionError::NumberOutOfOrder {
                expected: 1,
                found: 2
            })
        );
        assert_eq!(
            verify(&p, &[c(0, 1), c(0, 0), c(1, 0), c(1, 1), c(1, 2), c(0, 2)]),
            Err(SolutionError::WrongStart)
        );
        assert_eq!(
            verify(&p, &[c(0, 0), c(0, 1), c(0, 2), c(1, 2), c(1, 1), c(9, 9)]),
            Err(SolutionError::OutOfBounds { cell: c(9, 9) })
        );
    }

    #[test]
    fn test_missing_waypoint_and_wrong_end() {
        let mut p: Puzzle = puzzle();
        p.waypoints = [Cell::new(5, 5)].into_iter().collect();

        assert_eq!(
            verify(&p, p.path.get()),
            Err(SolutionError::MissingWaypoint {
                cell: Cell::new(5, 5)
            })
        );

        // Same cells, but the numbers are placed on another path
        let mut p: Puzzle = puzzle();
        let other: Path = Path::from(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(1, 2),
            Cell::new(0, 2),
            Cell::new(0, 1),
        ]);
        let mut rng: StdRng = StdRng::seed_from_u64(0);
        p.numbers = numbers::assign(&other, 2, &mut rng);
        p.walls = WallSet::new();
        assert_eq!(verify(&p, p.path.get()), Err(SolutionError::WrongEnd));
    }
}
