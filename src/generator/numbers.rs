/*
numbers.rs

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

//! Place the numbered cells along the path.
//!
//! The first cell of the path gets the number 1 and the last cell gets the highest number. The
//! intermediate numbers are spread along the path, in path order, so that the generated path
//! connects them in increasing order.

use log::{Level, debug, log_enabled};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::path::Path;

/// Numbered cells closer than this along the path are avoided when possible.
const MIN_GAP: usize = 3;

/// Numbered cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct NumberedCell {
    pub cell: Cell,

    /// Number displayed in the cell, starting at 1.
    pub value: usize,

    /// Position of the cell in the path.
    pub path_index: usize,
}

/// Numbered cells, ordered by value.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct NumberMap {
    numbers: Vec<NumberedCell>,
}

impl NumberMap {
    /// Number assigned to the cell, if any.
    pub fn get(&self, cell: &Cell) -> Option<usize> {
        self.numbers
            .iter()
            .find(|n| n.cell == *cell)
            .map(|n| n.value)
    }

    /// Whether the cell has a number.
    pub fn contains(&self, cell: &Cell) -> bool {
        self.numbers.iter().any(|n| n.cell == *cell)
    }

    /// Cell holding the given number.
    pub fn cell_for(&self, value: usize) -> Option<Cell> {
        self.numbers
            .iter()
            .find(|n| n.value == value)
            .map(|n| n.cell)
    }

    /// Number of numbered cells.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Whether there is no numbered cell.
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Highest number.
    pub fn max_value(&self) -> usize {
        self.numbers.last().map(|n| n.value).unwrap_or(0)
    }

    /// Iterate over the numbered cells by increasing value.
    pub fn iter(&self) -> impl Iterator<Item = &NumberedCell> {
        self.numbers.iter()
    }

    /// Path positions of the numbered cells, in increasing order.
    pub fn path_indices(&self) -> Vec<usize> {
        self.numbers.iter().map(|n| n.path_index).collect()
    }
}

/// Assign the numbers `1..=x_cells` to cells of the path.
///
/// The caller must ensure that `1 <= x_cells <= path.len()`. Out of range values are clamped.
pub fn assign<R: Rng>(path: &Path, x_cells: usize, rng: &mut R) -> NumberMap {
    let cells: &[Cell] = path.get();
    let len: usize = cells.len();
    debug_assert!(x_cells >= 1 && x_cells <= len, "x_cells out of range");
    let x_cells: usize = x_cells.clamp(1, len.max(1));

    if len == 0 {
        return NumberMap::default();
    }

    let mut indices: Vec<usize> = Vec::with_capacity(x_cells);
    indices.push(0);
    if x_cells > 2 {
        indices.extend(choose_intermediate(len, x_cells - 2, rng));
    }
    if x_cells > 1 {
        indices.push(len - 1);
    }

    let numbers: Vec<NumberedCell> = indices
        .iter()
        .enumerate()
        .map(|(i, path_index)| NumberedCell {
            cell: cells[*path_index],
            value: i + 1,
            path_index: *path_index,
        })
        .collect();

    if log_enabled!(Level::Debug) {
        debug!("Numbers at path positions {indices:?}");
    }
    NumberMap { numbers }
}

/// Choose `count` distinct positions strictly between the first and the last cells of a path of
/// length `len`, in increasing order.
///
/// Each position is chosen so that the gap from the previous one is close to an even share of the
/// remaining path. Gaps of at least [`MIN_GAP`] are preferred. Candidates are shuffled so that
/// equally good positions are selected randomly.
fn choose_intermediate<R: Rng>(len: usize, count: usize, rng: &mut R) -> Vec<usize> {
    let last: usize = len - 1;
    let mut candidates: Vec<usize> = (1..last).collect();
    candidates.shuffle(rng);

    let mut chosen: Vec<usize> = Vec::with_capacity(count);
    let mut previous: usize = 0;

    for k in 0..count {
        let remaining: usize = count - k;
        // Leave enough room after this position for the remaining numbers
        let upper: usize = last - remaining;
        let spacing: f64 = (last - previous) as f64 / (remaining + 1) as f64;
        let target: f64 = previous as f64 + spacing;

        let in_range = |i: &&usize| **i > previous && **i <= upper;
        let spaced = |i: &&usize| **i - previous >= MIN_GAP && last - **i >= MIN_GAP;

        let pick: Option<usize> = candidates
            .iter()
            .filter(in_range)
            .filter(spaced)
            .min_by(|a, b| distance(**a, target).total_cmp(&distance(**b, target)))
            .or_else(|| {
                candidates
                    .iter()
                    .filter(in_range)
                    .min_by(|a, b| distance(**a, target).total_cmp(&distance(**b, target)))
            })
            .copied();

        // There is always a candidate: the interior holds `len - 2 >= count` positions
        let index: usize = pick.unwrap_or(previous + 1);
        chosen.push(index);
        previous = index;
    }
    chosen
}

fn distance(index: usize, target: f64) -> f64 {
    (index as f64 - target).abs()
}
