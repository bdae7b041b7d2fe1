/*
edges.rs

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

//! Adjacencies between cells, seen from the grid rather than from a cell.
//!
//! Every adjacency is shared by two cells. The adjacency of cell 1 to cell 2 is the same as the
//! adjacency of cell 2 to cell 1, so an [`Edge`] stores its indexes sorted by size and derives a
//! single identifier from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an adjacency in the grid.
///
/// - an `Optional` edge has not been decided yet. Its clue is still enforced.
/// - a `Required` edge is part of the released puzzle.
/// - a `Dropped` edge is not shown in the released puzzle; similar to removing the clue.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EdgeStatus {
    Optional,
    Required,
    Dropped,
}

impl EdgeStatus {
    /// Whether the solver must enforce the clue of an edge with this status.
    pub fn in_force(&self) -> bool {
        !matches!(self, EdgeStatus::Dropped)
    }
}

/// Undirected adjacency between two cells.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// Higher of the two cell indexes.
    pub upper: usize,

    /// Lower of the two cell indexes.
    pub lower: usize,
}

impl Edge {
    /// Create an [`Edge`] object from two cell indexes given in any order.
    pub fn new(index1: usize, index2: usize) -> Self {
        if index1 > index2 {
            Self {
                upper: index1,
                lower: index2,
            }
        } else {
            Self {
                upper: index2,
                lower: index1,
            }
        }
    }

    /// Unique identifier in the "xxyy" format, where "xx" is the upper index and "yy" the lower
    /// index.
    pub fn id(&self) -> usize {
        self.upper * 100 + self.lower
    }

    /// Whether the given cell is one end of the edge.
    pub fn is_in(&self, index: usize) -> bool {
        self.upper == index || self.lower == index
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::topology;
    use std::collections::HashSet;

    #[test]
    fn id_does_not_depend_on_the_point_of_view() {
        assert_eq!(Edge::new(14, 8), Edge::new(8, 14));
        assert_eq!(Edge::new(14, 8).id(), 1408);
        assert_eq!(Edge::new(0, 1).id(), 100);
        assert_eq!(Edge::new(35, 34).to_string(), "34-35");
    }

    #[test]
    fn ids_are_unique_per_pair() {
        let mut ids: HashSet<usize> = HashSet::new();
        let mut edges: HashSet<Edge> = HashSet::new();
        for i in 0..topology::NUM_CELLS {
            for j in topology::adjacent_indexes(i) {
                let e: Edge = Edge::new(i, j);
                if edges.insert(e) {
                    assert!(ids.insert(e.id()), "duplicate id {}", e.id());
                }
                assert!(e.is_in(i));
                assert!(e.is_in(j));
            }
        }
        assert_eq!(ids.len(), 85);
    }

    #[test]
    fn dropped_edges_are_not_enforced() {
        assert!(EdgeStatus::Optional.in_force());
        assert!(EdgeStatus::Required.in_force());
        assert!(!EdgeStatus::Dropped.in_force());
    }
}
