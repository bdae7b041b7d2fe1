/*
rules.rs

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

//! Deduction rules of the puzzle.
//!
//! Besides the value constraints shared with Sudoku (every row, column, and box holds each value
//! once) and the role distribution of each box, the puzzle relies on the adjacencies between
//! cells. These are described by an [`AdjacencyRule`], which the solver takes as a parameter.
//!
//! [`ImpostoriRule`] is the default rule:
//!
//! - two Imposters are never adjacent, and neither are two Vacant cells.
//! - an adjacency that touches a Vacant cell shows nothing.
//! - an adjacency that touches a Detective shows the difference between the two values.
//! - any other adjacency shows whether the value of the lower cell is less than, equal to, or
//!   greater than the value of the upper cell.
//! - Imposters lie: when exactly one end of the adjacency is an Imposter, the sign of the clue is
//!   inverted.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::cell::{CellCandidate, Role};

/// Smallest cell value.
pub const MIN_VALUE: u8 = 1;

/// Largest cell value.
pub const MAX_VALUE: u8 = 6;

/// Number of cells of each role in every box.
pub const BOX_ROLES: [(Role, usize); 4] = [
    (Role::Detective, 1),
    (Role::Worker, 3),
    (Role::Imposter, 1),
    (Role::Vacant, 1),
];

/// Number of cells with the given role in every box.
pub fn role_quota(role: Role) -> usize {
    BOX_ROLES
        .iter()
        .find(|(r, _)| *r == role)
        .map_or(0, |(_, n)| *n)
}

/// The roles of a box, one entry per cell.
pub fn box_role_list() -> Vec<Role> {
    BOX_ROLES
        .iter()
        .flat_map(|(role, n)| std::iter::repeat_n(*role, *n))
        .collect()
}

/// What an adjacency shows to the player.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Clue {
    Silent,
    Less,
    Equal,
    Greater,
    /// Value of the upper cell minus the value of the lower cell.
    Difference(i8),
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Clue::Silent => write!(f, " "),
            Clue::Less => write!(f, "<"),
            Clue::Equal => write!(f, "="),
            Clue::Greater => write!(f, ">"),
            Clue::Difference(d) => write!(f, "{d:+}"),
        }
    }
}

/// Relation between the roles and values of two adjacent cells.
pub trait AdjacencyRule {
    /// Whether the two candidates can sit on adjacent cells. This applies to every geometric
    /// adjacency, whatever its status.
    fn permits(&self, a: CellCandidate, b: CellCandidate) -> bool;

    /// Clue shown by the adjacency between the `lower` and the `upper` cells.
    fn clue(&self, lower: CellCandidate, upper: CellCandidate) -> Clue;
}

/// Default rule set.
#[derive(Debug, Copy, Clone, Default)]
pub struct ImpostoriRule;

impl AdjacencyRule for ImpostoriRule {
    fn permits(&self, a: CellCandidate, b: CellCandidate) -> bool {
        !(a.role == b.role && matches!(a.role, Role::Imposter | Role::Vacant))
    }

    fn clue(&self, lower: CellCandidate, upper: CellCandidate) -> Clue {
        if lower.role == Role::Vacant || upper.role == Role::Vacant {
            return Clue::Silent;
        }
        let lies: bool = (lower.role == Role::Imposter) != (upper.role == Role::Imposter);
        let difference: i8 = upper.value as i8 - lower.value as i8;
        let difference: i8 = if lies { -difference } else { difference };

        if lower.role == Role::Detective || upper.role == Role::Detective {
            return Clue::Difference(difference);
        }
        match difference.cmp(&0) {
            // The lower cell holds the smaller value
            Ordering::Greater => Clue::Less,
            Ordering::Equal => Clue::Equal,
            Ordering::Less => Clue::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(value: u8, role: Role) -> CellCandidate {
        CellCandidate::new(value, role)
    }

    #[test]
    fn box_distribution_fills_a_box() {
        assert_eq!(box_role_list().len(), 6);
        assert_eq!(role_quota(Role::Worker), 3);
        assert_eq!(role_quota(Role::Imposter), 1);
    }

    #[test]
    fn forbidden_role_pairs() {
        let rule: ImpostoriRule = ImpostoriRule;
        assert!(!rule.permits(c(1, Role::Imposter), c(2, Role::Imposter)));
        assert!(!rule.permits(c(1, Role::Vacant), c(2, Role::Vacant)));
        assert!(rule.permits(c(1, Role::Worker), c(1, Role::Worker)));
        assert!(rule.permits(c(1, Role::Imposter), c(2, Role::Vacant)));
    }

    #[test]
    fn workers_tell_the_truth() {
        let rule: ImpostoriRule = ImpostoriRule;
        assert_eq!(rule.clue(c(2, Role::Worker), c(5, Role::Worker)), Clue::Less);
        assert_eq!(rule.clue(c(5, Role::Worker), c(2, Role::Worker)), Clue::Greater);
        assert_eq!(rule.clue(c(3, Role::Worker), c(3, Role::Worker)), Clue::Equal);
    }

    #[test]
    fn imposters_lie() {
        let rule: ImpostoriRule = ImpostoriRule;
        assert_eq!(
            rule.clue(c(2, Role::Imposter), c(5, Role::Worker)),
            Clue::Greater
        );
        assert_eq!(
            rule.clue(c(2, Role::Detective), c(5, Role::Imposter)),
            Clue::Difference(-3)
        );
    }

    #[test]
    fn detectives_show_differences_and_vacant_cells_nothing() {
        let rule: ImpostoriRule = ImpostoriRule;
        assert_eq!(
            rule.clue(c(2, Role::Detective), c(6, Role::Worker)),
            Clue::Difference(4)
        );
        assert_eq!(rule.clue(c(2, Role::Detective), c(6, Role::Vacant)), Clue::Silent);
        assert_eq!(Clue::Difference(4).to_string(), "+4");
    }
}
