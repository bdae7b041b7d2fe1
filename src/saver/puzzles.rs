/*
puzzles.rs

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

//! Encode puzzles and save them to a JSON file.
//!
//! An [`EncodedPuzzle`] lists the 36 cells of the puzzle grid. A cell carries its index (0 to 35),
//! its role code (0 to 3), its value (1 to 6), and two direction masks: the adjacencies that are
//! required, and the ones that are dropped. Bit `n` of a mask is the direction of the `n`th
//! neighbor offset. Masks are written as 6-character binary strings.

use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::generator::cell::{CellCandidate, GridCell, Role};
use crate::generator::edges::Edge;
use crate::generator::grid::Grid;
use crate::generator::puzzles::Puzzle;
use crate::generator::rules;
use crate::generator::topology::{self, NUM_CELLS};

/// Serialize and deserialize 6-bit direction masks with Serde.
pub mod mask {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Serialize a mask as a binary string.
    pub fn serialize<S>(mask: &u8, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{mask:06b}"))
    }

    /// Deserialize a mask from a binary string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        if s.len() != 6 {
            return Err(Error::custom(format!("mask {s:?} is not 6 bits long")));
        }
        u8::from_str_radix(&s, 2).map_err(|e| Error::custom(format!("mask {s:?}: {e}")))
    }
}

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum DecodeError {
    /// The puzzle does not have 36 cells.
    CellCount(usize),

    /// The cell index is out of range or not in order.
    Index(usize),

    /// Unknown role code.
    Role(u8),

    /// The value is out of range.
    Value(u8),

    /// A mask refers to a direction with no neighbor, or the two masks of an adjacency disagree.
    Mask(usize),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::CellCount(n) => write!(f, "{n} cells instead of {NUM_CELLS}"),
            DecodeError::Index(i) => write!(f, "unexpected cell index {i}"),
            DecodeError::Role(r) => write!(f, "unknown role code {r}"),
            DecodeError::Value(v) => write!(f, "value {v} out of range"),
            DecodeError::Mask(i) => write!(f, "inconsistent adjacency masks for cell {i}"),
        }
    }
}

impl Error for DecodeError {}

/// Compact form of a cell.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EncodedCell {
    pub index: u8,
    pub role: u8,
    pub value: u8,
    #[serde(with = "mask")]
    pub required: u8,
    #[serde(with = "mask")]
    pub dropped: u8,
}

impl EncodedCell {
    /// Create an [`EncodedCell`] object from a solved cell.
    pub fn new(cell: &GridCell) -> Self {
        Self {
            index: cell.index as u8,
            role: cell.role as u8,
            value: cell.value,
            required: cell.required_mask(),
            dropped: cell.dropped_mask(),
        }
    }
}

/// Compact form of a puzzle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedPuzzle {
    /// Achieved dropout fraction.
    pub dropout: f64,

    /// Seed that produces the puzzle.
    pub seed: u64,

    /// Canonical signature of the solution.
    pub signature: String,

    pub cells: Vec<EncodedCell>,
}

impl EncodedPuzzle {
    /// Create an [`EncodedPuzzle`] object.
    pub fn new(puzzle: &Puzzle) -> Self {
        Self {
            dropout: puzzle.dropout,
            seed: puzzle.seed,
            signature: puzzle.signature.clone(),
            cells: puzzle.grid.cells.iter().map(EncodedCell::new).collect(),
        }
    }

    /// Rebuild the puzzle grid.
    ///
    /// # Errors
    ///
    /// The method returns an error if a field is out of range, or if the masks of two adjacent
    /// cells do not describe the same adjacency status.
    pub fn decode(&self) -> Result<Grid, DecodeError> {
        if self.cells.len() != NUM_CELLS {
            return Err(DecodeError::CellCount(self.cells.len()));
        }
        let mut roles: [Role; NUM_CELLS] = [Role::default(); NUM_CELLS];
        let mut solution: Vec<CellCandidate> = Vec::with_capacity(NUM_CELLS);
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.index as usize != i {
                return Err(DecodeError::Index(cell.index as usize));
            }
            roles[i] = Role::from_repr(cell.role).ok_or(DecodeError::Role(cell.role))?;
            if !(rules::MIN_VALUE..=rules::MAX_VALUE).contains(&cell.value) {
                return Err(DecodeError::Value(cell.value));
            }
            solution.push(CellCandidate::new(cell.value, roles[i]));
        }

        let mut grid: Grid = Grid::new(&roles).with_solution(&solution);
        for edge in grid.edges() {
            let required: bool = self.has_direction(edge.lower, edge.upper, |c| c.required)?;
            let dropped: bool = self.has_direction(edge.lower, edge.upper, |c| c.dropped)?;
            grid = match (required, dropped) {
                (true, false) => grid.with_required(&edge),
                (false, true) => grid.with_dropped(&edge),
                _ => return Err(DecodeError::Mask(edge.lower)),
            };
        }

        // Bits with no matching neighbor
        for (i, cell) in self.cells.iter().enumerate() {
            let valid: u8 = topology::adjacent_indexes(i)
                .into_iter()
                .filter_map(|j| topology::direction(i, j))
                .fold(0, |m, bit| m | 1 << bit);
            if (cell.required | cell.dropped) & !valid != 0 {
                return Err(DecodeError::Mask(i));
            }
        }
        Ok(grid)
    }

    /// Whether the selected mask holds the adjacency, on both cells.
    fn has_direction(
        &self,
        lower: usize,
        upper: usize,
        select: fn(&EncodedCell) -> u8,
    ) -> Result<bool, DecodeError> {
        let edge: Edge = Edge::new(lower, upper);
        let (Some(down), Some(up)) = (
            topology::direction(edge.lower, edge.upper),
            topology::direction(edge.upper, edge.lower),
        ) else {
            return Err(DecodeError::Mask(lower));
        };
        let from_lower: bool = select(&self.cells[edge.lower]) & (1 << down) != 0;
        let from_upper: bool = select(&self.cells[edge.upper]) & (1 << up) != 0;
        if from_lower != from_upper {
            return Err(DecodeError::Mask(lower));
        }
        Ok(from_lower)
    }
}

/// Object to save and restore generated puzzles.
pub struct SaverPuzzles {
    /// Path to the save file.
    save_file: PathBuf,
}

impl SaverPuzzles {
    /// Create a [`SaverPuzzles`] object.
    ///
    /// The provided [`PathBuf`] is the path to the JSON file.
    pub fn new(save_file: PathBuf) -> Self {
        debug!("Puzzles file: {save_file:?}");
        Self { save_file }
    }

    /// Retrieve the puzzles from the file.
    ///
    /// Return the puzzles or None if the file does not exist.
    pub fn get_puzzles(&self) -> Result<Option<Vec<EncodedPuzzle>>, Box<dyn Error>> {
        let file: File;
        match File::open(&self.save_file) {
            Ok(f) => file = f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        }
        let reader: BufReader<File> = BufReader::new(file);
        let puzzles: Vec<EncodedPuzzle> = serde_json::from_reader(reader)?;
        Ok(Some(puzzles))
    }

    /// Save the provided puzzles, replacing the content of the file.
    pub fn save_puzzles(&self, puzzles: &[EncodedPuzzle]) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.save_file)?;
        write_puzzles(BufWriter::new(file), puzzles)
    }

    /// Delete the file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

/// Write the puzzles in JSON format.
pub fn write_puzzles<W: Write>(
    mut writer: W,
    puzzles: &[EncodedPuzzle],
) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut writer, puzzles)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
