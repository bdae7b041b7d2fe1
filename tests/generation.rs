/*
generation.rs

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

use rand::SeedableRng;
use rand::rngs::StdRng;

use impostori::generator::cell::{CellCandidate, GridCell, Role};
use impostori::generator::edges::{Edge, EdgeStatus};
use impostori::generator::grid::Grid;
use impostori::generator::prune::{PruneResult, Pruner};
use impostori::generator::puzzles::{Difficulty, Puzzle, PuzzleBatch, PuzzleError, Settings};
use impostori::generator::random_grid::RandomGrid;
use impostori::generator::rules::ImpostoriRule;
use impostori::generator::solver::{Solution, Solver};
use impostori::generator::topology::{self, NUM_CELLS, Symmetry};
use impostori::generator::twins::{self, TwinDetector};
use impostori::progress::NoProgress;
use impostori::saver::puzzles::EncodedPuzzle;

fn generate(seed: u64) -> Grid {
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    RandomGrid::new(&ImpostoriRule)
        .generate(&mut rng, &mut NoProgress)
        .expect("grid")
}

fn is_unique(grid: &Grid) -> bool {
    matches!(
        Solver::for_puzzle(grid, &ImpostoriRule).count_solutions(),
        Ok(Solution::UniqueSolution(_))
    )
}

fn assert_symmetric(grid: &Grid) {
    for cell in &grid.cells {
        for other in &cell.adjacency.all {
            let back: &GridCell = grid.cell(*other);
            assert!(back.adjacency.all.contains(&cell.index));
            assert_eq!(
                cell.adjacency.required.contains(other),
                back.adjacency.required.contains(&cell.index),
                "required {} <> {other}",
                cell.index
            );
            assert_eq!(
                cell.adjacency.optional.contains(other),
                back.adjacency.optional.contains(&cell.index),
                "optional {} <> {other}",
                cell.index
            );
        }
    }
}

#[test]
fn topology_is_fixed() {
    assert_eq!(topology::adjacent_indexes(14), vec![8, 9, 13, 15, 19, 20]);
    assert_eq!(topology::adjacent_indexes(0), vec![1, 6]);
    assert_eq!(topology::box_of(0), 0);
    assert_eq!(topology::box_of(35), 5);
    for b in 0..topology::NUM_BOXES {
        assert_eq!(topology::box_cells(b).len(), 6);
    }
    assert_eq!(
        topology::adjacent_indexes(14),
        topology::adjacent_indexes(14)
    );
}

#[test]
fn generated_grids_have_a_unique_solution() {
    for seed in [1, 2, 3] {
        let grid: Grid = generate(seed);
        assert!(grid.is_solved());
        assert!(grid.is_valid(&ImpostoriRule));
        assert!(is_unique(&grid), "seed {seed}");
        assert_symmetric(&grid);
    }
}

#[test]
fn pruning_keeps_uniqueness_at_every_step() {
    let grid: Grid = generate(10);
    let mut rng: StdRng = StdRng::seed_from_u64(10);
    let result: PruneResult = Pruner::new(&ImpostoriRule).prune(
        &grid,
        Difficulty::Hard.dropout(),
        &mut rng,
        &mut NoProgress,
    );

    // Replay the drops one by one
    let mut current: Grid = grid.clone();
    let mut dropped: usize = current.dropout().0;
    for edge in &result.dropped_edges {
        current = current.with_dropped(edge);
        let (now, _) = current.dropout();
        assert_eq!(now, dropped + 1);
        dropped = now;
        assert!(is_unique(&current), "not unique after dropping {edge}");
        assert_symmetric(&current);
    }

    assert_eq!(dropped, result.dropped);
    assert_symmetric(&result.grid);
    assert!(is_unique(&result.grid));
    assert!(
        result
            .grid
            .edges_with_status(EdgeStatus::Optional)
            .is_empty()
    );
    assert_eq!(
        result.grid.edges_with_status(EdgeStatus::Required).len() + result.dropped,
        result.total
    );
    assert_eq!(result.grid.solution(), grid.solution());
}

#[test]
fn required_edges_are_never_dropped() {
    let grid: Grid = generate(20);
    let kept: Edge = grid.edges()[0];
    let grid: Grid = grid.with_required(&kept);
    let mut rng: StdRng = StdRng::seed_from_u64(20);
    let result: PruneResult =
        Pruner::new(&ImpostoriRule).prune(&grid, 1.0, &mut rng, &mut NoProgress);
    assert_eq!(result.grid.edge_status(&kept), EdgeStatus::Required);
    assert!(!result.dropped_edges.contains(&kept));
    assert!(!result.is_complete());
}

#[test]
fn rotated_grid_is_a_twin() {
    let grid: Grid = generate(30);
    let solution: Vec<CellCandidate> = grid.solution().expect("solved");
    let rotated: Vec<CellCandidate> = (0..NUM_CELLS)
        .map(|i| solution[Symmetry::Rotate180.apply(i)])
        .collect();
    let roles: [Role; NUM_CELLS] = std::array::from_fn(|i| rotated[i].role);
    let twin: Grid = Grid::new(&roles).with_solution(&rotated);

    assert_eq!(twins::signature(&twin), twins::signature(&grid));

    let mut detector: TwinDetector = TwinDetector::new();
    assert!(detector.insert(&grid));
    assert!(detector.is_twin(&twin));
    assert!(!detector.insert(&twin));
}

#[test]
fn batches_are_reproducible() {
    let settings: Settings = Settings {
        seed: Some(77),
        ..Settings::from_difficulty(Difficulty::Easy)
    };
    let mut b1: PuzzleBatch<ImpostoriRule> = PuzzleBatch::new(settings.clone(), ImpostoriRule);
    let mut b2: PuzzleBatch<ImpostoriRule> = PuzzleBatch::new(settings, ImpostoriRule);
    for _ in 0..2 {
        let p1: Result<Puzzle, PuzzleError> = b1.generate(&mut NoProgress);
        let p2: Result<Puzzle, PuzzleError> = b2.generate(&mut NoProgress);
        assert_eq!(p1, p2);
    }
}

#[test]
fn encoded_puzzle_decodes_to_the_same_puzzle() {
    let settings: Settings = Settings {
        seed: Some(5),
        scan_order: true,
        ..Settings::default()
    };
    let puzzle: Puzzle = PuzzleBatch::new(settings, ImpostoriRule)
        .generate(&mut NoProgress)
        .expect("puzzle");
    let decoded: Grid = EncodedPuzzle::new(&puzzle).decode().expect("decode");
    assert_eq!(decoded.solution(), puzzle.grid.solution());
    for edge in puzzle.grid.edges() {
        assert_eq!(decoded.edge_status(&edge), puzzle.grid.edge_status(&edge));
    }
    assert!(is_unique(&decoded));
}

#[test]
fn adjacency_no_ops() {
    let grid: Grid = generate(40);
    let edge: Edge = Edge::new(14, 8);
    let required: Grid = grid.with_required(&edge);
    assert_eq!(required.with_required(&edge), required);
    assert_eq!(required.with_dropped(&edge), required);

    let cell: &GridCell = grid.cell(0);
    let stranger: &GridCell = grid.cell(35);
    assert_eq!(cell.remove_adjacency(stranger).adjacency, cell.adjacency);
}
