/*
random_grid.rs

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

//! Generate a random solved grid.
//!
//! Generation goes through the following states:
//!
//! - `Empty`: nothing generated yet.
//! - `Seeding`: the roles are distributed in every box, in random order. Boxes are filled one
//!   after the other and a box layout is redrawn while it puts two cells next to each other that
//!   the rule does not permit.
//! - `Solving`: the solver completes the values, trying the candidates in random order. The
//!   resulting grid is then checked: with every adjacency in force, the solver must find exactly
//!   one solution.
//! - `Solved` or `Failed`.
//!
//! A failed attempt restarts the seeding. The number of attempts is bounded.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fmt;
use std::time::Instant;

use super::cell::{CellCandidate, Role};
use super::grid::Grid;
use super::rules::{self, AdjacencyRule};
use super::solver::{self, SolveError, Solution, Solver};
use super::topology::{self, NUM_CELLS};
use crate::progress::Progress;

/// Default maximum number of seeding attempts.
pub const MAX_ATTEMPTS: usize = 100;

// Number of times a box layout is redrawn before the attempt is abandoned.
const MAX_BOX_DRAWS: usize = 50;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GenerateError {
    /// No role layout could be completed within the maximum number of attempts.
    SeedingExhausted,

    /// Grids could be completed, but none had a unique solution.
    NoUniqueSolution,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::SeedingExhausted => write!(f, "cannot seed a valid grid"),
            GenerateError::NoUniqueSolution => write!(f, "no grid with a unique solution"),
        }
    }
}

impl Error for GenerateError {}

/// Generation state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GeneratorState {
    Empty,
    Seeding,
    Solving,
    Solved,
    Failed,
}

/// [`RandomGrid`] object.
pub struct RandomGrid<'a, R: AdjacencyRule> {
    rule: &'a R,

    pub state: GeneratorState,

    /// Number of attempts it took to generate the last grid.
    pub attempt: usize,

    /// Number of solver decisions, across all the attempts.
    pub iteration: usize,

    /// Duration in seconds it took to generate the last grid.
    pub duration: f32,

    max_attempts: usize,
    max_iterations: usize,
}

impl<'a, R: AdjacencyRule> RandomGrid<'a, R> {
    /// Create the object.
    pub fn new(rule: &'a R) -> Self {
        Self {
            rule,
            state: GeneratorState::Empty,
            attempt: 0,
            iteration: 0,
            duration: 0.0,
            max_attempts: MAX_ATTEMPTS,
            max_iterations: solver::MAX_ITERATIONS,
        }
    }

    /// Set the maximum number of seeding attempts.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the maximum number of solver decisions per search.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Generate and return a solved grid with a unique solution.
    ///
    /// All the adjacencies of the returned grid are still optional.
    ///
    /// # Errors
    ///
    /// The method returns an error when no grid could be produced within the maximum number of
    /// attempts. [`GenerateError::NoUniqueSolution`] is returned if the last attempt reached the
    /// uniqueness check, [`GenerateError::SeedingExhausted`] otherwise.
    pub fn generate(
        &mut self,
        rng: &mut StdRng,
        progress: &mut dyn Progress,
    ) -> Result<Grid, GenerateError> {
        let start: Instant = Instant::now();
        let mut error: GenerateError = GenerateError::SeedingExhausted;
        self.attempt = 0;
        self.iteration = 0;
        self.state = GeneratorState::Empty;
        progress.start("Generating grid", self.max_attempts);

        while self.attempt < self.max_attempts {
            self.attempt += 1;
            progress.increment(1);

            self.state = GeneratorState::Seeding;
            let Some(roles) = self.seed_roles(rng) else {
                debug!("Attempt {}: cannot distribute the roles", self.attempt);
                error = GenerateError::SeedingExhausted;
                continue;
            };

            self.state = GeneratorState::Solving;
            let mut completion: Solver = Solver::for_completion(&Grid::new(&roles), self.rule)
                .with_max_iterations(self.max_iterations);
            let result: Result<Option<Grid>, SolveError> = completion.first_solution(rng);
            self.iteration += completion.iteration;
            let grid: Grid = match result {
                Ok(Some(g)) => g,
                Ok(None) => {
                    debug!("Attempt {}: the role layout has no solution", self.attempt);
                    error = GenerateError::SeedingExhausted;
                    continue;
                }
                Err(e) => {
                    debug!("Attempt {}: {e}", self.attempt);
                    error = GenerateError::SeedingExhausted;
                    continue;
                }
            };

            let mut check: Solver =
                Solver::for_puzzle(&grid, self.rule).with_max_iterations(self.max_iterations);
            let result: Result<Solution, SolveError> = check.count_solutions();
            self.iteration += check.iteration;
            match result {
                Ok(Solution::UniqueSolution(_)) => {
                    self.state = GeneratorState::Solved;
                    self.duration = start.elapsed().as_secs_f32();
                    progress.finish();
                    debug!(
                        "Attempts = {}  Iterations = {}  Duration = {}",
                        self.attempt, self.iteration, self.duration
                    );
                    grid.debug();
                    return Ok(grid);
                }
                Ok(s) => debug!("Attempt {}: {s:?}", self.attempt),
                Err(e) => debug!("Attempt {}: {e}", self.attempt),
            }
            error = GenerateError::NoUniqueSolution;
        }

        self.state = GeneratorState::Failed;
        self.duration = start.elapsed().as_secs_f32();
        progress.finish();
        warn!("Generation failed after {} attempts: {error}", self.attempt);
        Err(error)
    }

    /// Distribute the roles of every box in random order.
    ///
    /// Return None if a box cannot be laid out next to the boxes already filled.
    fn seed_roles(&self, rng: &mut StdRng) -> Option<[Role; NUM_CELLS]> {
        let mut roles: [Option<Role>; NUM_CELLS] = [None; NUM_CELLS];
        let mut list: Vec<Role> = rules::box_role_list();

        for b in 0..topology::NUM_BOXES {
            let cells: Vec<usize> = topology::box_cells(b);
            let mut placed: bool = false;
            for _ in 0..MAX_BOX_DRAWS {
                list.shuffle(rng);
                for (i, role) in cells.iter().zip(&list) {
                    roles[*i] = Some(*role);
                }
                if cells.iter().all(|i| self.fits(*i, &roles)) {
                    placed = true;
                    break;
                }
            }
            if !placed {
                return None;
            }
        }

        let mut layout: [Role; NUM_CELLS] = [Role::default(); NUM_CELLS];
        for (role, r) in layout.iter_mut().zip(roles) {
            *role = r?;
        }
        Some(layout)
    }

    /// Whether the role of the cell can sit next to the roles of its placed neighbors, for at
    /// least one pair of values.
    fn fits(&self, index: usize, roles: &[Option<Role>; NUM_CELLS]) -> bool {
        let Some(role) = roles[index] else {
            return true;
        };
        topology::adjacent_indexes(index).into_iter().all(|j| {
            roles[j].is_none_or(|other| {
                (rules::MIN_VALUE..=rules::MAX_VALUE).any(|a| {
                    (rules::MIN_VALUE..=rules::MAX_VALUE).any(|b| {
                        self.rule
                            .permits(CellCandidate::new(a, role), CellCandidate::new(b, other))
                    })
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::edges::EdgeStatus;
    use crate::generator::rules::{Clue, ImpostoriRule};
    use crate::progress::NoProgress;
    use rand::SeedableRng;

    #[test]
    fn seeded_layout_respects_box_quotas() {
        let rule: ImpostoriRule = ImpostoriRule;
        let generator: RandomGrid<ImpostoriRule> = RandomGrid::new(&rule);
        let mut rng: StdRng = StdRng::seed_from_u64(1);
        let roles: [Role; NUM_CELLS] = (0..20)
            .find_map(|_| generator.seed_roles(&mut rng))
            .expect("layout");
        for b in 0..topology::NUM_BOXES {
            for role in Role::ALL {
                let count: usize = topology::box_cells(b)
                    .into_iter()
                    .filter(|i| roles[*i] == role)
                    .count();
                assert_eq!(count, rules::role_quota(role));
            }
        }
        for i in 0..NUM_CELLS {
            for j in topology::adjacent_indexes(i) {
                assert!(!(roles[i] == roles[j] && roles[i] == Role::Imposter));
                assert!(!(roles[i] == roles[j] && roles[i] == Role::Vacant));
            }
        }
    }

    #[test]
    fn generated_grid_is_solved_and_unique() {
        let rule: ImpostoriRule = ImpostoriRule;
        let mut generator: RandomGrid<ImpostoriRule> = RandomGrid::new(&rule);
        let mut rng: StdRng = StdRng::seed_from_u64(42);
        let grid: Grid = generator
            .generate(&mut rng, &mut NoProgress)
            .expect("grid");
        assert_eq!(generator.state, GeneratorState::Solved);
        assert!(generator.attempt >= 1);
        assert!(grid.is_solved());
        assert!(grid.is_valid(&rule));
        assert_eq!(grid.edges_with_status(EdgeStatus::Optional).len(), 85);
        assert!(matches!(
            Solver::for_puzzle(&grid, &rule).count_solutions(),
            Ok(Solution::UniqueSolution(_))
        ));
    }

    #[test]
    fn same_seed_gives_same_grid() {
        let rule: ImpostoriRule = ImpostoriRule;
        let mut rng: StdRng = StdRng::seed_from_u64(3);
        let g1: Grid = RandomGrid::new(&rule)
            .generate(&mut rng, &mut NoProgress)
            .expect("grid");
        let mut rng: StdRng = StdRng::seed_from_u64(3);
        let g2: Grid = RandomGrid::new(&rule)
            .generate(&mut rng, &mut NoProgress)
            .expect("grid");
        assert_eq!(g1, g2);
    }

    /// Rule that never shows anything on the adjacencies.
    struct SilentRule;

    impl AdjacencyRule for SilentRule {
        fn permits(&self, _a: CellCandidate, _b: CellCandidate) -> bool {
            true
        }

        fn clue(&self, _lower: CellCandidate, _upper: CellCandidate) -> Clue {
            Clue::Silent
        }
    }

    #[test]
    fn grids_without_clues_are_never_unique() {
        let rule: SilentRule = SilentRule;
        let mut generator: RandomGrid<SilentRule> = RandomGrid::new(&rule).with_max_attempts(3);
        let mut rng: StdRng = StdRng::seed_from_u64(7);
        assert_eq!(
            generator.generate(&mut rng, &mut NoProgress),
            Err(GenerateError::NoUniqueSolution)
        );
        assert_eq!(generator.state, GeneratorState::Failed);
        assert_eq!(generator.attempt, 3);
    }

    #[test]
    fn exhausted_attempts_fail() {
        let rule: ImpostoriRule = ImpostoriRule;
        let mut generator: RandomGrid<ImpostoriRule> =
            RandomGrid::new(&rule).with_max_attempts(0);
        let mut rng: StdRng = StdRng::seed_from_u64(0);
        assert_eq!(
            generator.generate(&mut rng, &mut NoProgress),
            Err(GenerateError::SeedingExhausted)
        );
        assert_eq!(generator.state, GeneratorState::Failed);
    }
}
