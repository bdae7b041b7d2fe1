/*
topology.rs

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

//! Fixed geometry of the Impostori grid.
//!
//! The grid is a 6x6 rhombus of hexagonal cells. Cells are numbered row by row, and each row is
//! shifted half a cell to the right of the row above:
//!
//! ```text
//!  00  01  02  03  04  05
//!    06  07  08  09  10  11
//!      12  13  14  15  16  17
//!        18  19  20  21  22  23
//!          24  25  26  27  28  29
//!            30  31  32  33  34  35
//! ```
//!
//! Boxes are 2 rows by 3 columns.

/// Number of cells per row and per column.
pub const GRID_WIDTH: usize = 6;

/// Number of cells in the grid.
pub const NUM_CELLS: usize = GRID_WIDTH * GRID_WIDTH;

/// Number of boxes in the grid.
pub const NUM_BOXES: usize = 6;

/// Index offsets from a central hex cell to each of its 6 orthogonally adjacent cells.
///
/// The position of an offset in this array is the direction bit used by the compact adjacency
/// masks (see [`direction`]).
const OFFSETS: [isize; 6] = [-6, -5, -1, 1, 5, 6];

/// Return the row of the given cell.
pub fn row_of(index: usize) -> usize {
    index / GRID_WIDTH
}

/// Return the column of the given cell.
pub fn column_of(index: usize) -> usize {
    index % GRID_WIDTH
}

/// Return the box of the given cell.
pub fn box_of(index: usize) -> usize {
    (row_of(index) / 2) * 2 + column_of(index) / 3
}

/// Return the indexes of the cells orthogonally adjacent to the given cell.
///
/// Indexes out of the grid are omitted, and so are wraparound indexes: when the cell is in the
/// leftmost or rightmost column, `index ± 1` and `index ± 5` can land on the other side of the
/// grid. Such a candidate is rejected when its column is more than one column away.
pub fn adjacent_indexes(index: usize) -> Vec<usize> {
    OFFSETS
        .iter()
        .filter_map(|offset| {
            let adjacent: isize = index as isize + offset;
            if adjacent < 0 || adjacent >= NUM_CELLS as isize {
                return None;
            }
            let adjacent: usize = adjacent as usize;
            if column_of(adjacent).abs_diff(column_of(index)) > 1 {
                return None;
            }
            Some(adjacent)
        })
        .collect()
}

/// Whether two cells are adjacent.
pub fn is_adjacent(index1: usize, index2: usize) -> bool {
    adjacent_indexes(index1).contains(&index2)
}

/// Return the direction bit (0 to 5) that leads from `from` to the adjacent cell `to`, or None
/// if the cells are not adjacent.
pub fn direction(from: usize, to: usize) -> Option<usize> {
    if !is_adjacent(from, to) {
        return None;
    }
    let offset: isize = to as isize - from as isize;
    OFFSETS.iter().position(|o| *o == offset)
}

/// Return the cells that share a row, a column, or a box with the given cell.
///
/// The given cell is not part of the returned list.
pub fn peers(index: usize) -> Vec<usize> {
    (0..NUM_CELLS)
        .filter(|&i| {
            i != index
                && (row_of(i) == row_of(index)
                    || column_of(i) == column_of(index)
                    || box_of(i) == box_of(index))
        })
        .collect()
}

/// Return the cells of the given box, in increasing order.
pub fn box_cells(box_index: usize) -> Vec<usize> {
    (0..NUM_CELLS).filter(|&i| box_of(i) == box_index).collect()
}

/// Transformations that map the grid onto itself while preserving adjacency.
///
/// In (row, column) coordinates, the neighbors of a cell are at (0, ±1), (±1, 0), (+1, -1),
/// and (-1, +1). Four transformations keep that set stable. Only [`Symmetry::Identity`] and
/// [`Symmetry::Rotate180`] also keep the boxes stable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    /// Half turn around the grid center.
    Rotate180,
    /// Reflection across the long diagonal (cells 0 to 35): `(row, column)` to `(column, row)`.
    Transpose,
    /// Reflection across the short diagonal (cells 5 to 30).
    AntiTranspose,
}

impl Symmetry {
    /// All the transformations of the group.
    pub const ALL: [Symmetry; 4] = [
        Symmetry::Identity,
        Symmetry::Rotate180,
        Symmetry::Transpose,
        Symmetry::AntiTranspose,
    ];

    /// Return the cell index the given cell is moved to.
    pub fn apply(&self, index: usize) -> usize {
        let last: usize = GRID_WIDTH - 1;
        let (row, column) = (row_of(index), column_of(index));
        let (r, c) = match self {
            Symmetry::Identity => (row, column),
            Symmetry::Rotate180 => (last - row, last - column),
            Symmetry::Transpose => (column, row),
            Symmetry::AntiTranspose => (last - column, last - row),
        };
        r * GRID_WIDTH + c
    }
}
