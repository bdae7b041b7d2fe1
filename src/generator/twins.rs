/*
twins.rs

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

//! Detect solutions that are symmetric copies of each other.
//!
//! The signature of a solved grid is computed for every transform of
//! [`Symmetry::ALL`]; the smallest one is the canonical signature. Two grids are twins
//! when their canonical signatures are equal.
//!
//! A [`TwinDetector`] accumulates the signatures of the accepted grids. It is not synchronized: a
//! batch that runs generations concurrently must funnel the insertions through a single writer.

use log::debug;
use std::collections::HashSet;

use super::cell::GridCell;
use super::grid::Grid;
use super::topology::{NUM_CELLS, Symmetry};

/// Signature of the grid seen through the given transform.
///
/// Each cell contributes its role letter and its value, read at the transformed position. Return
/// None if the grid is not solved.
fn transformed_signature(grid: &Grid, symmetry: Symmetry) -> Option<String> {
    let mut s: String = String::with_capacity(NUM_CELLS * 2);
    for i in 0..NUM_CELLS {
        let cell: &GridCell = grid.cell(symmetry.apply(i));
        if !cell.is_solved() {
            return None;
        }
        s.push(cell.role.letter());
        s.push(char::from(b'0' + cell.candidates[0].value));
    }
    Some(s)
}

/// Canonical signature of a solved grid, or None if the grid is not solved.
pub fn signature(grid: &Grid) -> Option<String> {
    Symmetry::ALL
        .iter()
        .filter_map(|s| transformed_signature(grid, *s))
        .min()
}

/// Set of the signatures already accepted.
#[derive(Debug, Default)]
pub struct TwinDetector {
    signatures: HashSet<String>,
}

impl TwinDetector {
    /// Create an empty [`TwinDetector`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the grid is a twin of an accepted grid.
    pub fn is_twin(&self, grid: &Grid) -> bool {
        signature(grid).is_some_and(|s| self.signatures.contains(&s))
    }

    /// Accept a grid. Return `false`, and leave the set unchanged, if the grid is a twin of an
    /// accepted grid or is not solved.
    pub fn insert(&mut self, grid: &Grid) -> bool {
        let Some(s) = signature(grid) else {
            return false;
        };
        if !self.signatures.insert(s) {
            debug!("Twin grid rejected");
            return false;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::cell::{CellCandidate, Role};
    use crate::generator::grid::tests::{ROLES, solution, solved_grid};

    /// The reference solution transformed by the given symmetry.
    fn transformed(symmetry: Symmetry) -> Grid {
        let s: Vec<CellCandidate> = solution();
        let moved: Vec<CellCandidate> = (0..NUM_CELLS).map(|i| s[symmetry.apply(i)]).collect();
        let mut roles: [Role; NUM_CELLS] = ROLES;
        for (r, c) in roles.iter_mut().zip(&moved) {
            *r = c.role;
        }
        Grid::new(&roles).with_solution(&moved)
    }

    #[test]
    fn signature_is_invariant_under_symmetry() {
        let reference: Option<String> = signature(&solved_grid());
        assert!(reference.is_some());
        for symmetry in Symmetry::ALL {
            assert_eq!(signature(&transformed(symmetry)), reference);
        }
    }

    #[test]
    fn rotated_grid_is_a_twin() {
        let mut detector: TwinDetector = TwinDetector::new();
        assert!(detector.insert(&solved_grid()));
        assert!(detector.is_twin(&transformed(Symmetry::Rotate180)));
        assert!(!detector.insert(&transformed(Symmetry::Rotate180)));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn different_solution_is_not_a_twin() {
        let mut detector: TwinDetector = TwinDetector::new();
        assert!(detector.insert(&solved_grid()));
        let mut other: Vec<CellCandidate> = solution();
        // Swap the values of two rows of the same box band
        for c in 0..6 {
            other.swap(c, 6 + c);
        }
        let grid: Grid = Grid::new(&ROLES).with_solution(&other);
        assert!(!detector.is_twin(&grid));
        assert!(detector.insert(&grid));
    }

    #[test]
    fn unsolved_grid_is_ignored() {
        let mut detector: TwinDetector = TwinDetector::new();
        assert!(!detector.insert(&Grid::new(&ROLES)));
        assert!(detector.is_empty());
    }
}
