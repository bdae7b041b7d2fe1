/*
solver.rs

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

//! Count the solutions of a grid.
//!
//! The solver works on bit sets: each cell has a 24-bit domain, one bit per (value, role) pair.
//! Constraints are propagated to a fixed point after every decision:
//!
//! - a solved cell removes its value from the cells in the same row, column, and box.
//! - a box cannot hold more cells of a role than the role quota.
//! - for each pair of adjacent cells, a candidate is kept only if the other cell still has a
//!   candidate that the rule permits next to it and that reproduces the clue of the adjacency,
//!   when that adjacency is in force.
//!
//! The search itself uses an explicit stack of decision frames instead of recursion. Each frame
//! stores the cell being decided, the candidates that have not been tried yet, and a snapshot of
//! the domains to restore before trying the next candidate.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fmt;

use super::cell::{CellCandidate, Role};
use super::grid::{ClueEdge, Grid};
use super::rules::{self, AdjacencyRule, Clue};
use super::topology::{self, NUM_CELLS};

/// Default maximum number of decisions before the search gives up.
pub const MAX_ITERATIONS: usize = 200_000;

const NUM_VALUES: usize = (rules::MAX_VALUE - rules::MIN_VALUE + 1) as usize;
const NUM_CANDIDATES: usize = NUM_VALUES * Role::ALL.len();

/// Candidates of a cell, one bit per (value, role) pair.
type Domain = u32;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum SolveError {
    /// The search made more decisions than allowed.
    IterationsExceeded,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveError::IterationsExceeded => write!(f, "maximum number of iterations exceeded"),
        }
    }
}

impl Error for SolveError {}

/// Outcome of a solution count.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    NoSolution,
    UniqueSolution(Grid),
    MultipleSolutions,
}

fn candidate_bit(candidate: CellCandidate) -> Option<usize> {
    if !(rules::MIN_VALUE..=rules::MAX_VALUE).contains(&candidate.value) {
        return None;
    }
    Some(candidate.role as usize * NUM_VALUES + (candidate.value - rules::MIN_VALUE) as usize)
}

fn bit_candidate(bit: usize) -> CellCandidate {
    CellCandidate::new(
        (bit % NUM_VALUES) as u8 + rules::MIN_VALUE,
        Role::from_repr((bit / NUM_VALUES) as u8).unwrap_or_default(),
    )
}

/// Bits of all the candidates with the given value.
fn value_mask(value: u8) -> Domain {
    Role::ALL.iter().fold(0, |mask, role| {
        mask | 1 << (*role as usize * NUM_VALUES + (value - rules::MIN_VALUE) as usize)
    })
}

/// Bits of all the candidates with the given role.
fn role_mask(role: Role) -> Domain {
    ((1 << NUM_VALUES) - 1) << (role as usize * NUM_VALUES)
}

/// Iterate over the candidate bits of a domain.
fn bits(domain: Domain) -> impl Iterator<Item = usize> {
    (0..NUM_CANDIDATES).filter(move |b| domain & (1 << b) != 0)
}

fn domain_of(candidates: &[CellCandidate]) -> Domain {
    candidates
        .iter()
        .filter_map(|c| candidate_bit(*c))
        .fold(0, |domain, bit| domain | 1 << bit)
}

/// Constraint between a cell and one of its neighbors.
struct Link {
    other: usize,

    /// For each candidate bit of the cell, the candidates of the neighbor that are compatible.
    support: [Domain; NUM_CANDIDATES],
}

/// Decision frame of the search.
struct Frame {
    cell: usize,
    untried: Vec<usize>,
    snapshot: [Domain; NUM_CELLS],
}

/// Backtracking solver.
pub struct Solver {
    /// Grid the solutions are applied to.
    base: Grid,

    /// Starting domains.
    domains: [Domain; NUM_CELLS],

    links: Vec<Vec<Link>>,
    peers: Vec<Vec<usize>>,
    boxes: Vec<Vec<usize>>,

    /// Number of decisions made by the last search.
    pub iteration: usize,

    max_iterations: usize,
}

impl Solver {
    /// Create a solver that starts from the current candidates of the grid cells and enforces the
    /// given clues.
    pub fn new<R: AdjacencyRule>(grid: &Grid, rule: &R, clues: &[ClueEdge]) -> Self {
        let mut domains: [Domain; NUM_CELLS] = [0; NUM_CELLS];
        for (domain, cell) in domains.iter_mut().zip(&grid.cells) {
            *domain = domain_of(&cell.candidates);
        }

        let links: Vec<Vec<Link>> = (0..NUM_CELLS)
            .map(|i| {
                topology::adjacent_indexes(i)
                    .into_iter()
                    .map(|j| {
                        let clue: Option<Clue> = clues
                            .iter()
                            .find(|c| c.edge.is_in(i) && c.edge.is_in(j))
                            .map(|c| c.clue);
                        let mut support: [Domain; NUM_CANDIDATES] = [0; NUM_CANDIDATES];
                        for bi in bits(domains[i]) {
                            let ci: CellCandidate = bit_candidate(bi);
                            for bj in bits(domains[j]) {
                                let cj: CellCandidate = bit_candidate(bj);
                                let shown: Clue = if i < j {
                                    rule.clue(ci, cj)
                                } else {
                                    rule.clue(cj, ci)
                                };
                                if rule.permits(ci, cj) && clue.is_none_or(|c| c == shown) {
                                    support[bi] |= 1 << bj;
                                }
                            }
                        }
                        Link { other: j, support }
                    })
                    .collect()
            })
            .collect();

        Self {
            base: grid.clone(),
            domains,
            links,
            peers: (0..NUM_CELLS).map(topology::peers).collect(),
            boxes: (0..topology::NUM_BOXES).map(topology::box_cells).collect(),
            iteration: 0,
            max_iterations: MAX_ITERATIONS,
        }
    }

    /// Create a solver that completes the grid from its current candidates, without clues.
    pub fn for_completion<R: AdjacencyRule>(grid: &Grid, rule: &R) -> Self {
        Self::new(grid, rule, &[])
    }

    /// Create a solver for the puzzle a solved grid represents.
    ///
    /// Roles are given: every cell starts with all the values for its role. The clues of the
    /// adjacencies still in force are computed from the grid solution.
    pub fn for_puzzle<R: AdjacencyRule>(grid: &Grid, rule: &R) -> Self {
        let clues: Vec<ClueEdge> = grid.clues(rule);
        let puzzle: Grid = grid.cells.iter().fold(grid.clone(), |g, cell| {
            let candidates: Vec<CellCandidate> = (rules::MIN_VALUE..=rules::MAX_VALUE)
                .map(|value| CellCandidate::new(value, cell.role))
                .collect();
            g.with_candidates(cell.index, candidates)
        });
        Self::new(&puzzle, rule, &clues)
    }

    /// Set the maximum number of decisions.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Count the solutions, stopping at the second one.
    ///
    /// Candidates are tried in increasing order, so the result is repeatable.
    ///
    /// # Errors
    ///
    /// The method returns an error when the search exceeds the maximum number of iterations.
    pub fn count_solutions(&mut self) -> Result<Solution, SolveError> {
        let mut solutions: Vec<Vec<CellCandidate>> = self.search(2, None)?;
        debug!(
            "Solutions found = {}  Iterations = {}",
            solutions.len(),
            self.iteration
        );
        Ok(match solutions.len() {
            0 => Solution::NoSolution,
            1 => Solution::UniqueSolution(self.base.with_solution(&solutions.remove(0))),
            _ => Solution::MultipleSolutions,
        })
    }

    /// Return the first solution found, trying the candidates in random order.
    ///
    /// # Errors
    ///
    /// The method returns an error when the search exceeds the maximum number of iterations.
    pub fn first_solution(&mut self, rng: &mut StdRng) -> Result<Option<Grid>, SolveError> {
        let solutions: Vec<Vec<CellCandidate>> = self.search(1, Some(rng))?;
        debug!("Iterations = {}", self.iteration);
        Ok(solutions.first().map(|s| self.base.with_solution(s)))
    }

    /// Run the search until `limit` solutions are found or the search space is exhausted.
    fn search(
        &mut self,
        limit: usize,
        mut rng: Option<&mut StdRng>,
    ) -> Result<Vec<Vec<CellCandidate>>, SolveError> {
        let mut solutions: Vec<Vec<CellCandidate>> = Vec::with_capacity(limit);
        let mut domains: [Domain; NUM_CELLS] = self.domains;
        let mut stack: Vec<Frame> = Vec::with_capacity(NUM_CELLS);

        self.iteration = 0;
        if !self.propagate(&mut domains, (0..NUM_CELLS).collect()) {
            return Ok(solutions);
        }

        loop {
            match select_cell(&domains) {
                Some(cell) => {
                    // Candidates are popped from the end of the list
                    let mut untried: Vec<usize> = bits(domains[cell]).collect();
                    match rng.as_deref_mut() {
                        Some(r) => untried.shuffle(r),
                        None => untried.reverse(),
                    }
                    stack.push(Frame {
                        cell,
                        untried,
                        snapshot: domains,
                    });
                }
                None => {
                    solutions.push(domains.iter().map(|d| single(*d)).collect());
                    if solutions.len() >= limit {
                        return Ok(solutions);
                    }
                }
            }

            // Move to the next candidate that survives propagation, backtracking as needed
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(solutions);
                };
                let Some(bit) = frame.untried.pop() else {
                    stack.pop();
                    continue;
                };
                self.iteration += 1;
                if self.iteration > self.max_iterations {
                    return Err(SolveError::IterationsExceeded);
                }
                let cell: usize = frame.cell;
                domains = frame.snapshot;
                domains[cell] = 1 << bit;
                if self.propagate(&mut domains, vec![cell]) {
                    break;
                }
            }
        }
    }

    /// Propagate the constraints from the queued cells. Return `false` when a domain becomes
    /// empty.
    fn propagate(&self, domains: &mut [Domain; NUM_CELLS], mut queue: Vec<usize>) -> bool {
        let mut queued: [bool; NUM_CELLS] = [false; NUM_CELLS];
        for i in &queue {
            queued[*i] = true;
        }

        while let Some(i) = queue.pop() {
            queued[i] = false;
            let domain: Domain = domains[i];
            if domain == 0 {
                return false;
            }
            let mut changed: Vec<usize> = Vec::new();

            if domain.count_ones() == 1 {
                let candidate: CellCandidate = single(domain);
                let others: Domain = !value_mask(candidate.value);
                for p in &self.peers[i] {
                    restrict(domains, *p, others, &mut changed);
                }

                let cells: &Vec<usize> = &self.boxes[topology::box_of(i)];
                let role_bits: Domain = role_mask(candidate.role);
                let count: usize = cells
                    .iter()
                    .filter(|k| domains[**k].count_ones() == 1 && domains[**k] & role_bits != 0)
                    .count();
                let quota: usize = rules::role_quota(candidate.role);
                if count > quota {
                    return false;
                }
                if count == quota {
                    for k in cells {
                        if domains[*k].count_ones() > 1 {
                            restrict(domains, *k, !role_bits, &mut changed);
                        }
                    }
                }
            }

            for link in &self.links[i] {
                let support: Domain = bits(domain).fold(0, |mask, b| mask | link.support[b]);
                restrict(domains, link.other, support, &mut changed);
            }

            for k in changed {
                if domains[k] == 0 {
                    return false;
                }
                if !queued[k] {
                    queued[k] = true;
                    queue.push(k);
                }
            }
        }
        true
    }
}

/// Restrict the domain of a cell and record the cell if its domain changed.
fn restrict(
    domains: &mut [Domain; NUM_CELLS],
    k: usize,
    mask: Domain,
    changed: &mut Vec<usize>,
) {
    let before: Domain = domains[k];
    domains[k] &= mask;
    if domains[k] != before {
        changed.push(k);
    }
}

/// Return the candidate of a single-bit domain.
fn single(domain: Domain) -> CellCandidate {
    bit_candidate(domain.trailing_zeros() as usize)
}

/// Select the unsolved cell with the fewest candidates. Ties go to the lowest index.
fn select_cell(domains: &[Domain; NUM_CELLS]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, domain) in domains.iter().enumerate() {
        let count: u32 = domain.count_ones();
        if count > 1 && best.is_none_or(|(_, c)| count < c) {
            best = Some((i, count));
        }
    }
    best.map(|(i, _)| i)
}
