/*
prune.rs

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

//! Drop adjacencies from a solved grid while its solution stays unique.
//!
//! When starting, every adjacency of the generated grid is optional, and so in force. In each
//! iteration, one optional adjacency is dropped and the solver searches for a second solution.
//! If there is none, the adjacency stays dropped. Otherwise it is required: the puzzle depends on
//! its clue, and it is not tried again.
//!
//! Pruning stops when the requested dropout is reached or when all the adjacencies have been
//! tried. The adjacencies that were not tried are then required.

use log::{Level, debug, info, log_enabled};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::time::Instant;

use super::edges::{Edge, EdgeStatus};
use super::grid::Grid;
use super::rules::AdjacencyRule;
use super::solver::{self, SolveError, Solution, Solver};
use crate::progress::Progress;

/// Result of a pruning run.
///
/// Not reaching the requested dropout is not an error: the grid is the best one found and
/// `dropout` gives the fraction of adjacencies actually dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneResult {
    /// Pruned grid. Adjacencies are either required or dropped.
    pub grid: Grid,

    /// Dropped adjacencies, in the order they were dropped.
    pub dropped_edges: Vec<Edge>,

    /// Number of dropped adjacencies.
    pub dropped: usize,

    /// Number of adjacencies in the grid.
    pub total: usize,

    /// Achieved dropout fraction.
    pub dropout: f64,

    /// Number of dropped adjacencies that was requested.
    pub target: usize,
}

impl PruneResult {
    /// Whether the requested dropout was reached.
    pub fn is_complete(&self) -> bool {
        self.dropped >= self.target
    }
}

/// Pruner object.
pub struct Pruner<'a, R: AdjacencyRule> {
    rule: &'a R,

    /// Try the adjacencies in identifier order instead of random order.
    scan_order: bool,

    max_iterations: usize,

    /// Number of adjacencies tried by the last run.
    pub evaluated: usize,

    /// Number of solver decisions made by the last run.
    pub iteration: usize,

    /// Duration in seconds of the last run.
    pub duration: f32,
}

impl<'a, R: AdjacencyRule> Pruner<'a, R> {
    /// Create the object.
    pub fn new(rule: &'a R) -> Self {
        Self {
            rule,
            scan_order: false,
            max_iterations: solver::MAX_ITERATIONS,
            evaluated: 0,
            iteration: 0,
            duration: 0.0,
        }
    }

    /// Try the adjacencies in identifier order, for reproducible results without a seed.
    pub fn with_scan_order(mut self, scan_order: bool) -> Self {
        self.scan_order = scan_order;
        self
    }

    /// Set the maximum number of solver decisions per search.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Drop adjacencies until the `dropout` fraction of all the adjacencies is dropped.
    ///
    /// A search that exceeds the maximum number of iterations counts as a failed relaxation.
    pub fn prune(
        &mut self,
        grid: &Grid,
        dropout: f64,
        rng: &mut StdRng,
        progress: &mut dyn Progress,
    ) -> PruneResult {
        let start: Instant = Instant::now();
        let (mut dropped, total) = grid.dropout();
        let target: usize = (dropout.clamp(0.0, 1.0) * total as f64).round() as usize;

        let mut candidates: Vec<Edge> = grid.edges_with_status(EdgeStatus::Optional);
        if !self.scan_order {
            candidates.shuffle(rng);
        }

        if log_enabled!(Level::Debug) {
            debug!("Pruning grid");
            debug!("    target = {target}/{total}");
            debug!(
                "    candidates = {:?}",
                candidates.iter().map(|e| e.id()).collect::<Vec<usize>>()
            );
        }

        self.evaluated = 0;
        self.iteration = 0;
        progress.start("Pruning adjacencies", candidates.len());

        let mut current: Grid = grid.clone();
        let mut dropped_edges: Vec<Edge> = Vec::with_capacity(target);
        for edge in candidates {
            if dropped >= target {
                break;
            }
            self.evaluated += 1;
            progress.increment(1);

            let trial: Grid = current.with_dropped(&edge);
            let mut solver: Solver =
                Solver::for_puzzle(&trial, self.rule).with_max_iterations(self.max_iterations);
            let result: Result<Solution, SolveError> = solver.count_solutions();
            self.iteration += solver.iteration;
            match result {
                Ok(Solution::UniqueSolution(_)) => {
                    debug!("    dropping adjacency {edge}");
                    current = trial;
                    dropped += 1;
                    dropped_edges.push(edge);
                }
                other => {
                    debug!("    requiring adjacency {edge} ({other:?})");
                    current = current.with_required(&edge);
                }
            }
        }
        progress.finish();

        let current: Grid = current.with_all_required();
        self.duration = start.elapsed().as_secs_f32();
        let result: PruneResult = PruneResult {
            grid: current,
            dropped_edges,
            dropped,
            total,
            dropout: if total == 0 {
                0.0
            } else {
                dropped as f64 / total as f64
            },
            target,
        };
        if !result.is_complete() {
            info!(
                "Requested dropout not reached: {}/{} adjacencies dropped, {} requested",
                result.dropped, result.total, result.target
            );
        }
        debug!(
            "Evaluated = {}  Iterations = {}  Duration = {}",
            self.evaluated, self.iteration, self.duration
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::grid::tests::solved_grid;
    use crate::generator::rules::ImpostoriRule;
    use crate::progress::NoProgress;
    use rand::SeedableRng;

    fn is_unique(grid: &Grid) -> bool {
        matches!(
            Solver::for_puzzle(grid, &ImpostoriRule).count_solutions(),
            Ok(Solution::UniqueSolution(_))
        )
    }

    #[test]
    fn zero_dropout_requires_everything() {
        let grid: Grid = solved_grid();
        let mut rng: StdRng = StdRng::seed_from_u64(0);
        let result: PruneResult =
            Pruner::new(&ImpostoriRule).prune(&grid, 0.0, &mut rng, &mut NoProgress);
        assert!(result.is_complete());
        assert_eq!(result.dropped, 0);
        assert_eq!(result.target, 0);
        assert_eq!(result.grid.edges_with_status(EdgeStatus::Required).len(), 85);
    }

    #[test]
    fn pruned_grid_keeps_a_unique_solution() {
        let grid: Grid = solved_grid();
        assert!(is_unique(&grid));
        let mut rng: StdRng = StdRng::seed_from_u64(5);
        let mut pruner: Pruner<ImpostoriRule> = Pruner::new(&ImpostoriRule);
        let result: PruneResult = pruner.prune(&grid, 0.5, &mut rng, &mut NoProgress);

        assert_eq!(result.total, 85);
        assert_eq!(result.target, 43);
        assert_eq!(result.dropped, result.dropped_edges.len());
        assert!(result.dropped <= result.target);
        assert!(pruner.evaluated >= result.dropped);
        assert!(result.grid.edges_with_status(EdgeStatus::Optional).is_empty());
        assert_eq!(
            result.grid.edges_with_status(EdgeStatus::Dropped),
            {
                let mut e: Vec<Edge> = result.dropped_edges.clone();
                e.sort_unstable_by_key(|e| e.id());
                e
            }
        );
        assert!(is_unique(&result.grid));
        assert_eq!(result.grid.solution(), grid.solution());
    }

    #[test]
    fn scan_order_is_deterministic() {
        let grid: Grid = solved_grid();
        let mut rng1: StdRng = StdRng::seed_from_u64(1);
        let mut rng2: StdRng = StdRng::seed_from_u64(2);
        let r1: PruneResult = Pruner::new(&ImpostoriRule)
            .with_scan_order(true)
            .prune(&grid, 0.3, &mut rng1, &mut NoProgress);
        let r2: PruneResult = Pruner::new(&ImpostoriRule)
            .with_scan_order(true)
            .prune(&grid, 0.3, &mut rng2, &mut NoProgress);
        assert_eq!(r1, r2);
    }

    #[test]
    fn dropout_is_clamped() {
        let grid: Grid = solved_grid();
        let mut rng: StdRng = StdRng::seed_from_u64(0);
        let result: PruneResult = Pruner::new(&ImpostoriRule)
            .with_scan_order(true)
            .prune(&grid, -1.0, &mut rng, &mut NoProgress);
        assert_eq!(result.target, 0);
        assert_eq!(result.dropout, 0.0);
    }
}
