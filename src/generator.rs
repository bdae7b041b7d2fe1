/*
generator.rs

Copyright 2025 Hervé Quatremain

This file is part of Impostori.

Impostori is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Impostori is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Impostori. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Generate Impostori puzzles.
//!
//! The grid has 36 hexagonal cells laid out in 6 rows of 6 cells, and grouped in 6 boxes of 2 rows
//! and 3 columns. The geometry is provided by the [`topology`] module.
//!
//! Every cell holds a role and a value. The [`cell::GridCell`] objects also record the adjacencies
//! to their neighbors, split into required, optional, and dropped adjacencies. The [`grid::Grid`]
//! object groups the cells and keeps the adjacencies of both cells in sync. The clue each adjacency
//! shows is computed by an [`rules::AdjacencyRule`].
//!
//! A puzzle is produced in three steps:
//!
//! * A solved grid is generated by a [`random_grid::RandomGrid`] object.
//!   Roles are seeded box by box, the [`solver::Solver`] completes the values, and the grid is
//!   kept only if its clues lead to a single solution.
//!
//! * The grid is pruned by a [`prune::Pruner`] object.
//!   Adjacencies are dropped as long as the solution stays unique, until the requested dropout
//!   is reached.
//!
//! * The solution is compared with the solutions already produced by a [`twins::TwinDetector`]
//!   object, and rejected if it is a symmetric copy of one of them.
//!
//! [`puzzles::PuzzleBatch`] chains these steps.

pub mod cell;
pub mod edges;
pub mod grid;
pub mod prune;
pub mod puzzles;
pub mod random_grid;
pub mod rules;
pub mod solver;
pub mod topology;
pub mod twins;
