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

//! Produce puzzles in batches.
//!
//! A [`PuzzleBatch`] chains the three steps of the generation: a solved grid is created by
//! [`RandomGrid`], rejected if it is a twin of a puzzle already produced by the batch, and then
//! pruned by [`Pruner`] to the requested dropout.
//!
//! The batch owns the random number generator. For every puzzle it draws a new seed, which is
//! stored in the [`Puzzle`] so that the puzzle can be produced again in isolation.

use clap::ValueEnum;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use strum_macros::FromRepr;

use super::grid::Grid;
use super::prune::{PruneResult, Pruner};
use super::random_grid::{self, GenerateError, RandomGrid};
use super::rules::AdjacencyRule;
use super::solver;
use super::twins::{self, TwinDetector};
use crate::progress::Progress;

/// Puzzle difficulty level.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialOrd,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[repr(i32)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Fraction of the adjacencies to drop.
    pub fn dropout(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.5,
            Difficulty::Hard => 0.7,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Fraction of the adjacencies to drop, between 0.0 and 1.0.
    pub dropout: f64,

    /// Seed of the batch random number generator. Taken from the operating system when None.
    pub seed: Option<u64>,

    /// Maximum number of seeding attempts per grid.
    pub max_attempts: usize,

    /// Maximum number of solver decisions per search.
    pub max_iterations: usize,

    /// Accept grids that are twins of grids already produced.
    pub allow_twins: bool,

    /// Prune the adjacencies in identifier order instead of random order.
    pub scan_order: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dropout: Difficulty::default().dropout(),
            seed: None,
            max_attempts: random_grid::MAX_ATTEMPTS,
            max_iterations: solver::MAX_ITERATIONS,
            allow_twins: false,
            scan_order: false,
        }
    }
}

impl Settings {
    /// Create a [`Settings`] object for the given difficulty level.
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            dropout: difficulty.dropout(),
            ..Self::default()
        }
    }
}

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum PuzzleError {
    /// The grid could not be generated.
    Generate(GenerateError),

    /// The grid is a twin of a grid already produced.
    DuplicateGrid,
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PuzzleError::Generate(e) => write!(f, "generation failed: {e}"),
            PuzzleError::DuplicateGrid => write!(f, "duplicate grid"),
        }
    }
}

impl Error for PuzzleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PuzzleError::Generate(e) => Some(e),
            PuzzleError::DuplicateGrid => None,
        }
    }
}

impl From<GenerateError> for PuzzleError {
    fn from(e: GenerateError) -> Self {
        PuzzleError::Generate(e)
    }
}

/// A released puzzle.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    /// Pruned grid. Adjacencies are either required or dropped.
    pub grid: Grid,

    /// Canonical signature of the solution.
    pub signature: String,

    /// Seed that produces this puzzle.
    pub seed: u64,

    /// Requested dropout fraction.
    pub requested_dropout: f64,

    /// Achieved dropout fraction.
    pub dropout: f64,

    /// Number of dropped adjacencies.
    pub dropped: usize,

    /// Number of adjacencies.
    pub total: usize,

    /// Whether the requested dropout was reached.
    pub complete: bool,
}

/// Batch of puzzles sharing a random number generator and a twin detector.
pub struct PuzzleBatch<R: AdjacencyRule> {
    rule: R,
    settings: Settings,
    rng: StdRng,
    twins: TwinDetector,

    /// Number of puzzles produced.
    pub generated: usize,

    /// Number of grids rejected as twins.
    pub duplicates: usize,

    /// Number of failed generations.
    pub failures: usize,
}

impl<R: AdjacencyRule> PuzzleBatch<R> {
    /// Create a [`PuzzleBatch`] object.
    pub fn new(settings: Settings, rule: R) -> Self {
        let rng: StdRng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rule,
            settings,
            rng,
            twins: TwinDetector::new(),
            generated: 0,
            duplicates: 0,
            failures: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Return the signatures accepted so far.
    pub fn twins(&self) -> &TwinDetector {
        &self.twins
    }

    /// Restart the random number generator from the given seed. Accepted signatures are kept.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Produce the next puzzle.
    ///
    /// # Errors
    ///
    /// The method returns an error if the grid cannot be generated, or if it is a twin of a grid
    /// already produced and twins are not allowed. In both cases the method can be retried: the
    /// next call uses a new seed.
    pub fn generate(&mut self, progress: &mut dyn Progress) -> Result<Puzzle, PuzzleError> {
        let seed: u64 = self.rng.random();
        debug!("Puzzle seed = {seed}");
        let mut rng: StdRng = StdRng::seed_from_u64(seed);

        let grid: Grid = match RandomGrid::new(&self.rule)
            .with_max_attempts(self.settings.max_attempts)
            .with_max_iterations(self.settings.max_iterations)
            .generate(&mut rng, progress)
        {
            Ok(g) => g,
            Err(e) => {
                self.failures += 1;
                return Err(e.into());
            }
        };

        if !self.settings.allow_twins && self.twins.is_twin(&grid) {
            info!("Grid rejected: twin of a previous grid");
            self.duplicates += 1;
            return Err(PuzzleError::DuplicateGrid);
        }

        let result: PruneResult = Pruner::new(&self.rule)
            .with_scan_order(self.settings.scan_order)
            .with_max_iterations(self.settings.max_iterations)
            .prune(&grid, self.settings.dropout, &mut rng, progress);

        self.twins.insert(&grid);
        self.generated += 1;
        result.grid.debug();
        let complete: bool = result.is_complete();
        Ok(Puzzle {
            signature: twins::signature(&result.grid).unwrap_or_default(),
            grid: result.grid,
            seed,
            requested_dropout: self.settings.dropout,
            dropout: result.dropout,
            dropped: result.dropped,
            total: result.total,
            complete,
        })
    }
}
