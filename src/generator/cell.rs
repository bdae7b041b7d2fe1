/*
cell.rs

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

//! Cells of the Impostori grid and their adjacencies.
//!
//! A [`GridCell`] is a value: the adjacency operations never modify the cell in place but return
//! an updated copy. Trial steps during generation and pruning can then be abandoned by simply
//! dropping the new value.
//!
//! The adjacency operations only update one side. Callers are responsible for applying the
//! counterpart operation to the target cell; [`super::grid::Grid`] does that for every edge it
//! updates.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

use super::topology;

/// Category of a cell.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    FromRepr,
    Default,
)]
#[repr(u8)]
pub enum Role {
    Detective,
    #[default]
    Worker,
    Imposter,
    Vacant,
}

impl Role {
    /// The four roles, in their encoding order.
    pub const ALL: [Role; 4] = [Role::Detective, Role::Worker, Role::Imposter, Role::Vacant];

    /// One-letter code used in signatures and debug dumps.
    pub fn letter(&self) -> char {
        match self {
            Role::Detective => 'D',
            Role::Worker => 'W',
            Role::Imposter => 'I',
            Role::Vacant => 'V',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Detective => write!(f, "detective"),
            Role::Worker => write!(f, "worker"),
            Role::Imposter => write!(f, "imposter"),
            Role::Vacant => write!(f, "vacant"),
        }
    }
}

/// A (value, role) pair that is still possible for a cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCandidate {
    pub value: u8,
    pub role: Role,
}

impl CellCandidate {
    pub fn new(value: u8, role: Role) -> Self {
        Self { value, role }
    }
}

/// Cell indexes partitioned by role.
///
/// Used at the grid level (every cell index is in exactly one list) and at the cell level
/// (every adjacent index is in exactly one list).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleIndexes {
    pub detective: Vec<usize>,
    pub worker: Vec<usize>,
    pub imposter: Vec<usize>,
    pub vacant: Vec<usize>,
}

impl RoleIndexes {
    /// Create an empty [`RoleIndexes`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the indexes for the given role.
    pub fn get(&self, role: Role) -> &Vec<usize> {
        match role {
            Role::Detective => &self.detective,
            Role::Worker => &self.worker,
            Role::Imposter => &self.imposter,
            Role::Vacant => &self.vacant,
        }
    }

    fn get_mut(&mut self, role: Role) -> &mut Vec<usize> {
        match role {
            Role::Detective => &mut self.detective,
            Role::Worker => &mut self.worker,
            Role::Imposter => &mut self.imposter,
            Role::Vacant => &mut self.vacant,
        }
    }

    /// Add an index to the list of the given role.
    pub fn insert(&mut self, role: Role, index: usize) {
        let list: &mut Vec<usize> = self.get_mut(role);
        if !list.contains(&index) {
            list.push(index);
        }
    }

    /// Remove an index from whichever list holds it.
    pub fn remove(&mut self, index: usize) {
        for role in Role::ALL {
            self.get_mut(role).retain(|i| *i != index);
        }
    }

    /// Return the role under which the index is stored.
    pub fn role_of(&self, index: usize) -> Option<Role> {
        Role::ALL.into_iter().find(|r| self.get(*r).contains(&index))
    }

    /// Total number of indexes across the four lists.
    pub fn len(&self) -> usize {
        Role::ALL.iter().map(|r| self.get(*r).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Adjacency record of a cell.
///
/// - `all` lists the geometric neighbors. It never changes once the grid is built.
/// - `required` lists the adjacencies the released puzzle depends on.
/// - `optional` lists the adjacencies that are not decided yet. They are still enforced by the
///   solver.
/// - the dropped adjacencies are the ones in `all` but in neither `required` nor `optional`.
/// - `by_role` partitions `all` by the role of the neighbor.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    pub all: Vec<usize>,
    pub required: Vec<usize>,
    pub optional: Vec<usize>,
    pub by_role: RoleIndexes,
}

impl Adjacency {
    /// Return the dropped adjacencies.
    pub fn dropped(&self) -> Vec<usize> {
        self.all
            .iter()
            .filter(|i| !self.required.contains(i) && !self.optional.contains(i))
            .copied()
            .collect()
    }

    /// Whether the adjacency to the given index is still enforced (required or optional).
    pub fn in_force(&self, index: usize) -> bool {
        self.required.contains(&index) || self.optional.contains(&index)
    }
}

/// Compute a 6-bit direction mask from a list of adjacent indexes.
fn direction_mask(from: usize, indexes: &[usize]) -> u8 {
    indexes
        .iter()
        .filter_map(|i| topology::direction(from, *i))
        .fold(0u8, |mask, bit| mask | (1 << bit))
}

/// A cell of the grid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Position in the grid (0 to 35).
    pub index: usize,

    pub role: Role,

    /// Solution value, or 0 while the cell is not solved.
    pub value: u8,

    /// Remaining (value, role) pairs. A solved cell has exactly one.
    pub candidates: Vec<CellCandidate>,

    pub adjacency: Adjacency,
}

impl GridCell {
    /// Create a cell with no adjacency and the given candidates.
    pub fn new(index: usize, role: Role, candidates: Vec<CellCandidate>) -> Self {
        Self {
            index,
            role,
            value: 0,
            candidates,
            adjacency: Adjacency::default(),
        }
    }

    /// Whether the candidates have collapsed to a single pair.
    pub fn is_solved(&self) -> bool {
        self.candidates.len() == 1
    }

    /// Return a copy of the cell with the target cell added as an optional adjacency.
    ///
    /// The cell is returned unchanged if the target is already adjacent.
    pub fn add_adjacency(&self, target: &GridCell) -> GridCell {
        let target_index: usize = target.index;
        if self.adjacency.all.contains(&target_index) {
            return self.clone();
        }
        let mut cell: GridCell = self.clone();
        cell.adjacency.all.push(target_index);
        cell.adjacency.optional.push(target_index);
        cell.adjacency.by_role.insert(target.role, target_index);
        cell
    }

    /// Return a copy of the cell with the optional adjacency to the target cell removed
    /// altogether.
    ///
    /// Only undecided adjacencies can be removed: the cell is returned unchanged if the target is
    /// not in both `all` and `optional`.
    pub fn remove_adjacency(&self, target: &GridCell) -> GridCell {
        let target_index: usize = target.index;
        if !self.adjacency.optional.contains(&target_index)
            || !self.adjacency.all.contains(&target_index)
        {
            return self.clone();
        }
        let mut cell: GridCell = self.clone();
        cell.adjacency.all.retain(|i| *i != target_index);
        cell.adjacency.optional.retain(|i| *i != target_index);
        cell.adjacency.by_role.remove(target_index);
        cell
    }

    /// Return a copy of the cell with the adjacency to the target cell moved from optional to
    /// required.
    ///
    /// The cell is returned unchanged if the adjacency is not optional.
    pub fn require_adjacency(&self, target: &GridCell) -> GridCell {
        let target_index: usize = target.index;
        if !self.adjacency.optional.contains(&target_index) {
            return self.clone();
        }
        let mut cell: GridCell = self.clone();
        cell.adjacency.optional.retain(|i| *i != target_index);
        cell.adjacency.required.push(target_index);
        cell
    }

    /// Return a copy of the cell with the adjacency to the target cell moved from optional to
    /// dropped.
    ///
    /// The target stays a geometric neighbor (in `all` and `by_role`). The cell is returned
    /// unchanged if the adjacency is not optional.
    pub fn drop_adjacency(&self, target: &GridCell) -> GridCell {
        let target_index: usize = target.index;
        if !self.adjacency.optional.contains(&target_index) {
            return self.clone();
        }
        let mut cell: GridCell = self.clone();
        cell.adjacency.optional.retain(|i| *i != target_index);
        cell
    }

    /// Return a copy of the cell collapsed to the given candidate.
    pub fn with_solution(&self, candidate: CellCandidate) -> GridCell {
        let mut cell: GridCell = self.clone();
        cell.value = candidate.value;
        cell.role = candidate.role;
        cell.candidates = vec![candidate];
        cell
    }

    /// 6-bit direction mask of the required adjacencies.
    pub fn required_mask(&self) -> u8 {
        direction_mask(self.index, &self.adjacency.required)
    }

    /// 6-bit direction mask of the dropped adjacencies.
    pub fn dropped_mask(&self) -> u8 {
        direction_mask(self.index, &self.adjacency.dropped())
    }
}
