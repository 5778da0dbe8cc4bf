/*
generator.rs

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

//! Generate random puzzles.
//!
//! A puzzle is built in four steps:
//!
//! * A random path visiting every cell once, represented by a [`path::Path`] object.
//!   You create this object with a [`hamiltonian::HamiltonianSearch`] object and its
//!   [`hamiltonian::HamiltonianSearch::search`] method.
//!   If no path is found after a number of attempts, then the method returns an error.
//!
//! * The numbered cells, represented by a [`numbers::NumberMap`] object and created by
//!   [`numbers::assign`].
//!   The numbers follow the path, so the path connects them in increasing order.
//!
//! * The walls, represented by a [`edges::WallSet`] object and selected by a
//!   [`walls::WallSelector`] object.
//!   Walls are never placed on an edge crossed by the path.
//!
//! * The waypoints, represented by a [`waypoints::WaypointSet`] object and selected by a
//!   [`waypoints::WaypointSelector`] object.
//!
//! The [`coordinator::Generator`] object runs these steps, the path search in a worker thread,
//! and returns a [`puzzle::Puzzle`] object.
//! The parameters for each game level are computed by [`levels::LevelParams::for_level`].
//!
//! A route drawn by the player can be verified with [`checker::verify`].

pub mod checker;
pub mod coordinator;
pub mod edges;
pub mod grid;
pub mod hamiltonian;
pub mod levels;
pub mod numbers;
pub mod path;
pub mod puzzle;
pub mod walls;
pub mod waypoints;
pub mod weights;
