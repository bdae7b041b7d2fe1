/*
grid.rs

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

//! The Impostori grid.
//!
//! A [`Grid`] groups the 36 [`GridCell`] objects and the partition of their indexes by role.
//! Like the cells, grids are values: the `with_*` methods return an updated copy and always
//! apply an adjacency change to both cells of the edge, so that the adjacency of cell A to cell
//! B is required, optional, or dropped exactly when the adjacency of B to A is.

use log::{Level, debug, log_enabled};
use serde::{Deserialize, Serialize};

use super::cell::{CellCandidate, GridCell, Role, RoleIndexes};
use super::edges::{Edge, EdgeStatus};
use super::rules::{self, AdjacencyRule, Clue};
use super::topology;

/// Clue of an adjacency that the solver must honor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClueEdge {
    pub edge: Edge,
    pub clue: Clue,
}

/// The 36 cells and the partition of their indexes by role.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub cells: Vec<GridCell>,
    pub type_indexes: RoleIndexes,
}

impl Grid {
    /// Create a grid from a role layout.
    ///
    /// The candidates of each cell are all the values with the cell role. All the geometric
    /// adjacencies are added as optional, on both sides.
    pub fn new(roles: &[Role; topology::NUM_CELLS]) -> Self {
        let mut cells: Vec<GridCell> = roles
            .iter()
            .enumerate()
            .map(|(index, role)| {
                let candidates: Vec<CellCandidate> = (rules::MIN_VALUE..=rules::MAX_VALUE)
                    .map(|value| CellCandidate::new(value, *role))
                    .collect();
                GridCell::new(index, *role, candidates)
            })
            .collect();

        for index in 0..topology::NUM_CELLS {
            for adjacent in topology::adjacent_indexes(index) {
                cells[index] = cells[index].add_adjacency(&cells[adjacent]);
            }
        }

        let mut grid: Grid = Self {
            cells,
            type_indexes: RoleIndexes::new(),
        };
        grid.refresh_type_indexes();
        grid
    }

    /// Rebuild the grid level partition of the indexes by role.
    fn refresh_type_indexes(&mut self) {
        self.type_indexes = RoleIndexes::new();
        for cell in &self.cells {
            self.type_indexes.insert(cell.role, cell.index);
        }
    }

    /// Return the given cell.
    pub fn cell(&self, index: usize) -> &GridCell {
        &self.cells[index]
    }

    /// Return a copy of the grid where the candidates of the given cell are replaced.
    pub fn with_candidates(&self, index: usize, candidates: Vec<CellCandidate>) -> Grid {
        let mut grid: Grid = self.clone();
        grid.cells[index].candidates = candidates;
        grid
    }

    /// Return a copy of the grid where every cell is collapsed to the matching candidate.
    ///
    /// If a role changes, the role buckets of the neighbors and of the grid are updated.
    pub fn with_solution(&self, solution: &[CellCandidate]) -> Grid {
        let mut grid: Grid = self.clone();
        for (cell, candidate) in grid.cells.iter_mut().zip(solution) {
            *cell = cell.with_solution(*candidate);
        }
        for index in 0..grid.cells.len() {
            let mut by_role: RoleIndexes = RoleIndexes::new();
            for adjacent in &grid.cells[index].adjacency.all {
                by_role.insert(grid.cells[*adjacent].role, *adjacent);
            }
            grid.cells[index].adjacency.by_role = by_role;
        }
        grid.refresh_type_indexes();
        grid
    }

    /// Return all the geometric edges of the grid, sorted by identifier.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .cells
            .iter()
            .flat_map(|cell| {
                cell.adjacency
                    .all
                    .iter()
                    .filter(|other| **other > cell.index)
                    .map(|other| Edge::new(cell.index, *other))
            })
            .collect();
        edges.sort_unstable_by_key(|e| e.id());
        edges
    }

    /// Return the edges with the given status.
    pub fn edges_with_status(&self, status: EdgeStatus) -> Vec<Edge> {
        self.edges()
            .into_iter()
            .filter(|e| self.edge_status(e) == status)
            .collect()
    }

    /// Status of an edge, read from the lower cell.
    pub fn edge_status(&self, edge: &Edge) -> EdgeStatus {
        let adjacency = &self.cells[edge.lower].adjacency;
        if adjacency.required.contains(&edge.upper) {
            EdgeStatus::Required
        } else if adjacency.optional.contains(&edge.upper) {
            EdgeStatus::Optional
        } else {
            EdgeStatus::Dropped
        }
    }

    /// Return a copy of the grid with the optional edge moved to required.
    pub fn with_required(&self, edge: &Edge) -> Grid {
        let mut grid: Grid = self.clone();
        let (lower, upper) = (&self.cells[edge.lower], &self.cells[edge.upper]);
        grid.cells[edge.lower] = lower.require_adjacency(upper);
        grid.cells[edge.upper] = upper.require_adjacency(lower);
        grid
    }

    /// Return a copy of the grid with the optional edge dropped.
    pub fn with_dropped(&self, edge: &Edge) -> Grid {
        let mut grid: Grid = self.clone();
        let (lower, upper) = (&self.cells[edge.lower], &self.cells[edge.upper]);
        grid.cells[edge.lower] = lower.drop_adjacency(upper);
        grid.cells[edge.upper] = upper.drop_adjacency(lower);
        grid
    }

    /// Return a copy of the grid where all the optional edges are required.
    pub fn with_all_required(&self) -> Grid {
        self.edges_with_status(EdgeStatus::Optional)
            .iter()
            .fold(self.clone(), |grid, edge| grid.with_required(edge))
    }

    /// Number of dropped edges and total number of edges.
    pub fn dropout(&self) -> (usize, usize) {
        let edges: Vec<Edge> = self.edges();
        let dropped: usize = edges
            .iter()
            .filter(|e| self.edge_status(e) == EdgeStatus::Dropped)
            .count();
        (dropped, edges.len())
    }

    /// Whether every cell is collapsed to one candidate.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|c| c.is_solved())
    }

    /// Return the solution of the grid, or None if the grid is not solved.
    pub fn solution(&self) -> Option<Vec<CellCandidate>> {
        if !self.is_solved() {
            return None;
        }
        Some(self.cells.iter().map(|c| c.candidates[0]).collect())
    }

    /// Return the clues of the edges that are still in force.
    ///
    /// Clues are computed from the solved values. Edges with an unsolved end are skipped.
    pub fn clues<R: AdjacencyRule>(&self, rule: &R) -> Vec<ClueEdge> {
        self.edges()
            .into_iter()
            .filter(|e| self.edge_status(e).in_force())
            .filter(|e| self.cells[e.lower].is_solved() && self.cells[e.upper].is_solved())
            .map(|edge| ClueEdge {
                edge,
                clue: rule.clue(
                    self.cells[edge.lower].candidates[0],
                    self.cells[edge.upper].candidates[0],
                ),
            })
            .collect()
    }

    /// Whether the solved cells break a rule: a value twice in a row, a column, or a box, too many
    /// cells of a role in a box, or two adjacent cells the rule does not permit.
    ///
    /// Unsolved cells are ignored.
    pub fn is_valid<R: AdjacencyRule>(&self, rule: &R) -> bool {
        let solved = |i: usize| -> Option<CellCandidate> {
            let cell: &GridCell = &self.cells[i];
            if cell.is_solved() {
                Some(cell.candidates[0])
            } else {
                None
            }
        };

        for i in 0..topology::NUM_CELLS {
            let Some(a) = solved(i) else {
                continue;
            };
            for p in topology::peers(i) {
                if solved(p).is_some_and(|b| b.value == a.value) {
                    debug!("Cell {i} and {p} share value {}", a.value);
                    return false;
                }
            }
            for j in topology::adjacent_indexes(i) {
                if let Some(b) = solved(j)
                    && !rule.permits(a, b)
                {
                    debug!("Cell {i} ({}) cannot be adjacent to {j} ({})", a.role, b.role);
                    return false;
                }
            }
        }

        for b in 0..topology::NUM_BOXES {
            for role in Role::ALL {
                let count: usize = topology::box_cells(b)
                    .into_iter()
                    .filter(|i| solved(*i).is_some_and(|c| c.role == role))
                    .count();
                if count > rules::role_quota(role) {
                    debug!("Box {b} has too many {role} cells ({count})");
                    return false;
                }
            }
        }
        true
    }

    /// Print the grid.
    pub fn debug(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        let mut s: String = String::new();
        for row in 0..topology::GRID_WIDTH {
            s.clear();
            s.push_str(&" ".repeat(row * 2));
            for column in 0..topology::GRID_WIDTH {
                let cell: &GridCell = &self.cells[row * topology::GRID_WIDTH + column];
                if cell.is_solved() {
                    s.push_str(&format!("{}{} ", cell.role.letter(), cell.candidates[0].value));
                } else {
                    s.push_str(&format!("{}. ", cell.role.letter()));
                }
            }
            debug!("{s}");
        }
        let (dropped, total) = self.dropout();
        debug!("Dropped edges: {dropped}/{total}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generator::rules::ImpostoriRule;

    /// A valid solution used across the test modules.
    ///
    /// Values follow a box-compatible Latin square. Roles respect the box distribution and the
    /// adjacency restrictions of [`ImpostoriRule`].
    pub(crate) const VALUES: [u8; 36] = [
        1, 2, 3, 4, 5, 6, //
        4, 5, 6, 1, 2, 3, //
        2, 3, 1, 5, 6, 4, //
        5, 6, 4, 2, 3, 1, //
        3, 1, 2, 6, 4, 5, //
        6, 4, 5, 3, 1, 2, //
    ];

    pub(crate) const ROLES: [Role; 36] = {
        use Role::{Detective as D, Imposter as I, Vacant as V, Worker as W};
        [
            I, D, W, I, W, D, //
            W, V, W, W, V, W, //
            W, I, D, W, I, D, //
            V, W, W, V, W, W, //
            I, D, W, I, W, W, //
            W, V, W, W, V, D, //
        ]
    };

    pub(crate) fn solution() -> Vec<CellCandidate> {
        VALUES
            .iter()
            .zip(ROLES.iter())
            .map(|(v, r)| CellCandidate::new(*v, *r))
            .collect()
    }

    pub(crate) fn solved_grid() -> Grid {
        Grid::new(&ROLES).with_solution(&solution())
    }

    fn assert_symmetric(grid: &Grid) {
        for cell in &grid.cells {
            for other in &cell.adjacency.all {
                let back = &grid.cells[*other].adjacency;
                assert!(back.all.contains(&cell.index));
                assert_eq!(
                    cell.adjacency.required.contains(other),
                    back.required.contains(&cell.index)
                );
                assert_eq!(
                    cell.adjacency.optional.contains(other),
                    back.optional.contains(&cell.index)
                );
            }
        }
    }

    #[test]
    fn new_grid_is_symmetric_and_optional() {
        let grid: Grid = Grid::new(&ROLES);
        assert_symmetric(&grid);
        assert_eq!(grid.edges().len(), 85);
        assert_eq!(grid.edges_with_status(EdgeStatus::Optional).len(), 85);
        assert_eq!(grid.dropout(), (0, 85));
        assert!(!grid.is_solved());
    }

    #[test]
    fn type_indexes_partition_the_grid() {
        let grid: Grid = Grid::new(&ROLES);
        assert_eq!(grid.type_indexes.len(), 36);
        assert_eq!(grid.type_indexes.detective.len(), 6);
        assert_eq!(grid.type_indexes.worker.len(), 18);
        for i in 0..36 {
            assert_eq!(grid.type_indexes.role_of(i), Some(ROLES[i]));
        }
    }

    #[test]
    fn edge_changes_apply_to_both_cells() {
        let grid: Grid = Grid::new(&ROLES);
        let e1: Edge = Edge::new(14, 8);
        let e2: Edge = Edge::new(14, 15);
        let grid: Grid = grid.with_required(&e1).with_dropped(&e2);
        assert_symmetric(&grid);
        assert_eq!(grid.edge_status(&e1), EdgeStatus::Required);
        assert_eq!(grid.edge_status(&e2), EdgeStatus::Dropped);
        // A required edge cannot be dropped
        assert_eq!(grid.with_dropped(&e1).edge_status(&e1), EdgeStatus::Required);
        assert_eq!(grid.dropout(), (1, 85));

        let all: Grid = grid.with_all_required();
        assert_symmetric(&all);
        assert!(all.edges_with_status(EdgeStatus::Optional).is_empty());
        assert_eq!(all.edges_with_status(EdgeStatus::Required).len(), 84);
    }

    #[test]
    fn reference_solution_is_valid() {
        let grid: Grid = solved_grid();
        assert!(grid.is_solved());
        assert!(grid.is_valid(&ImpostoriRule));
        assert_eq!(grid.solution(), Some(solution()));
        assert_eq!(grid.clues(&ImpostoriRule).len(), 85);
    }

    #[test]
    fn broken_solutions_are_detected() {
        let mut values: Vec<CellCandidate> = solution();
        values.swap(0, 1);
        let grid: Grid = Grid::new(&ROLES).with_solution(&values);
        // Column 0 now holds the value 2 twice
        assert!(!grid.is_valid(&ImpostoriRule));

        let mut roles: Vec<CellCandidate> = solution();
        // Cells 2 and 3 become two adjacent imposters
        roles[2].role = Role::Imposter;
        let grid: Grid = Grid::new(&ROLES).with_solution(&roles);
        assert!(!grid.is_valid(&ImpostoriRule));
        assert_eq!(grid.cell(3).adjacency.by_role.role_of(2), Some(Role::Imposter));
        assert_eq!(grid.type_indexes.imposter.len(), 7);
    }
}
