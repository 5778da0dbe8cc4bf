/*
levels.rs

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

//! Difficulty of the levels.
//!
//! The levels are grouped in tiers. Each tier defines the grid size, the number of numbered
//! cells, walls, and waypoints. Inside most tiers, the levels at least 20 levels after the start
//! of the tier get one more number.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::walls;

/// Number of random starting cells tried before the path generation gives up.
pub const MAX_ATTEMPTS: usize = 25;

/// Highest number displayed in a puzzle.
pub const MAX_X_CELLS: usize = 20;

/// Number of levels after the start of a tier for the extra number.
const EXTRA_NUMBER_AFTER: usize = 20;

/// Tier definition.
struct Tier {
    /// First level of the tier.
    level: usize,
    rows: usize,
    cols: usize,
    x_cells: usize,
    num_walls: usize,
    num_waypoints: usize,

    /// Whether the levels at the end of the tier get one more number.
    extra_number: bool,
}

const fn tier(
    level: usize,
    rows: usize,
    cols: usize,
    x_cells: usize,
    num_walls: usize,
    num_waypoints: usize,
    extra_number: bool,
) -> Tier {
    Tier {
        level,
        rows,
        cols,
        x_cells,
        num_walls,
        num_waypoints,
        extra_number,
    }
}

static TIERS: [Tier; 17] = [
    tier(1, 4, 4, 5, 0, 0, false),
    tier(11, 4, 4, 6, 1, 0, false),
    tier(21, 5, 5, 7, 2, 0, true),
    tier(41, 5, 5, 8, 3, 0, true),
    tier(61, 6, 6, 9, 4, 1, true),
    tier(81, 6, 6, 10, 5, 1, true),
    tier(101, 7, 7, 11, 6, 2, true),
    tier(121, 7, 7, 12, 8, 2, true),
    tier(141, 7, 8, 13, 10, 3, true),
    tier(161, 7, 8, 14, 12, 3, true),
    tier(181, 8, 8, 15, 15, 4, true),
    tier(201, 8, 8, 16, 18, 4, true),
    tier(221, 8, 9, 17, 21, 5, true),
    tier(241, 8, 9, 18, 24, 5, true),
    tier(261, 9, 9, 19, 28, 6, true),
    tier(281, 9, 9, 20, 32, 6, true),
    tier(301, 10, 10, 20, 40, 8, false),
];

/// Generation parameters for a level.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct LevelParams {
    pub level: usize,
    pub rows: usize,
    pub cols: usize,

    /// Highest number (and number of numbered cells).
    pub x_cells: usize,

    pub num_walls: usize,
    pub num_waypoints: usize,
    pub max_attempts: usize,
}

impl LevelParams {
    /// Compute the parameters for the given level. Levels start at 1; level 0 is treated as
    /// level 1.
    pub fn for_level(level: usize) -> Self {
        let level: usize = level.max(1);
        let t: &Tier = tier_for(level);
        Self::capped(level, t, t.rows, t.cols)
    }

    /// Compute the parameters for the given level on a grid of another size.
    ///
    /// The numbers, walls, and waypoints of the level are capped for the new grid the same way
    /// they are for the level grid.
    pub fn for_grid(level: usize, rows: usize, cols: usize) -> Self {
        let level: usize = level.max(1);
        Self::capped(level, tier_for(level), rows, cols)
    }

    fn capped(level: usize, t: &Tier, rows: usize, cols: usize) -> Self {
        let mut x_cells: usize = t.x_cells;
        if t.extra_number && level - t.level >= EXTRA_NUMBER_AFTER {
            x_cells += 1;
        }
        let mut num_walls: usize = t.num_walls;
        let mut num_waypoints: usize = t.num_waypoints;

        // Grids without cells, or too large to count their cells, are left to the request
        // validation
        if let Some(num_cells) = rows.checked_mul(cols).filter(|n| *n > 0) {
            x_cells = x_cells.min(num_cells).min(MAX_X_CELLS);
            if num_cells == 1 {
                x_cells = 1;
            } else if x_cells < 2 {
                x_cells = 2;
            }
            let grid: Grid = Grid::new(rows, cols);
            num_walls = walls::max_walls(num_walls, &grid, walls::MAX_WALL_DENSITY);
            num_waypoints = num_waypoints.min(num_cells - x_cells);
        }

        Self {
            level,
            rows,
            cols,
            x_cells,
            num_walls,
            num_waypoints,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// Return the tier of the level.
fn tier_for(level: usize) -> &'static Tier {
    TIERS
        .iter()
        .rev()
        .find(|t| level >= t.level)
        .unwrap_or(&TIERS[0])
}
