/*
weights.rs

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

//! Scoring coefficients for the wall and waypoint placement.
//!
//! Only the relative order of the coefficients matters: a turn is worth more than a nearby
//! interior number, which is worth more than a nearby endpoint number, and so on. The random
//! jitter must stay smaller than the smallest bonus so that it only breaks ties.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Coefficients used to score the candidate walls.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct WallWeights {
    /// Bonus for each cell of the edge where the path turns.
    pub turn: f64,

    /// Bonus for each cell of the edge holding an intermediate number.
    pub interior_number: f64,

    /// Bonus for each cell of the edge holding the first or the last number.
    pub endpoint_number: f64,

    /// Bonus when the edge runs alongside a step of the path.
    pub parallel: f64,

    /// Bonus for each cell of the edge that would be left with one open side or less.
    pub sparsity: f64,

    /// Upper bound of the random value added to each score.
    pub jitter: f64,
}

impl Default for WallWeights {
    fn default() -> Self {
        Self {
            turn: 10.0,
            interior_number: 6.0,
            endpoint_number: 3.0,
            parallel: 4.0,
            sparsity: 1.5,
            jitter: 1.0,
        }
    }
}

/// Coefficients used to score the candidate waypoints.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct WaypointWeights {
    /// Bonus for each closed side of the cell (wall or grid border).
    pub scarcity: f64,

    /// Bonus per path step between the cell and the nearest number.
    pub distance: f64,

    /// Bonus for a cell halfway between the preceding and the following numbers.
    pub balance: f64,

    /// Upper bound of the random value added to each score.
    pub jitter: f64,
}

impl Default for WaypointWeights {
    fn default() -> Self {
        Self {
            scarcity: 3.0,
            distance: 1.0,
            balance: 2.0,
            jitter: 0.5,
        }
    }
}

/// All the scoring coefficients.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct ScoringWeights {
    pub walls: WallWeights,
    pub waypoints: WaypointWeights,
}

/// Return a random value in `[0, bound)` to add to a score.
///
/// The coefficients can come from a configuration file, so a bound that is not a positive finite
/// number gives no jitter instead of an invalid range.
pub fn jitter<R: Rng>(bound: f64, rng: &mut R) -> f64 {
    if bound > 0.0 && bound.is_finite() {
        rng.random_range(0.0..bound)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_jitter_bounds() {
        let mut rng: StdRng = StdRng::seed_from_u64(0);

        for _ in 0..100 {
            let j: f64 = jitter(0.5, &mut rng);
            assert!((0.0..0.5).contains(&j));
        }
        assert_eq!(jitter(0.0, &mut rng), 0.0);
        assert_eq!(jitter(-1.0, &mut rng), 0.0);
        assert_eq!(jitter(f64::INFINITY, &mut rng), 0.0);
        assert_eq!(jitter(f64::NAN, &mut rng), 0.0);
    }
}
