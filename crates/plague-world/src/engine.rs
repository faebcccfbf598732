//! Seeding and the per-generation update.

use crate::grid::GridState;
use crate::rules::Neighbourhood;
use plague_core::{Cell, Error, Position, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument, trace};

/// Random draws tried per placement before falling back to an explicit candidate list
const REJECTION_ATTEMPTS: usize = 64;

pub struct SimulationEngine {
    rng: ChaCha8Rng,
}

impl SimulationEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Place `healthy_count` organisms on empty cells, then infect
    /// `infected_count` of the healthy ones.
    ///
    /// Both counts are checked against the grid before anything is placed, so a
    /// failed call leaves the grid untouched.
    #[instrument(skip(self, grid), fields(width = grid.width(), height = grid.height()))]
    pub fn seed(
        &mut self,
        grid: &mut GridState,
        healthy_count: usize,
        infected_count: usize,
    ) -> Result<()> {
        let counts = grid.counts();

        if healthy_count > counts.empty {
            return Err(Error::CapacityExceeded {
                cell: Cell::Healthy,
                requested: healthy_count,
                available: counts.empty,
            });
        }

        let infectable = counts.healthy + healthy_count;
        if infected_count > infectable {
            return Err(Error::CapacityExceeded {
                cell: Cell::Infected,
                requested: infected_count,
                available: infectable,
            });
        }

        for _ in 0..healthy_count {
            self.place(grid, Cell::Empty, Cell::Healthy)?;
        }

        for _ in 0..infected_count {
            self.place(grid, Cell::Healthy, Cell::Infected)?;
        }

        debug!(
            healthy = grid.count(Cell::Healthy),
            infected = grid.count(Cell::Infected),
            "Population seeded"
        );
        Ok(())
    }

    /// Turn one uniformly chosen `from` cell into `to`
    fn place(&mut self, grid: &mut GridState, from: Cell, to: Cell) -> Result<Position> {
        for _ in 0..REJECTION_ATTEMPTS {
            let x = self.rng.gen_range(0..grid.width());
            let y = self.rng.gen_range(0..grid.height());

            if grid.get(x, y)? == from {
                grid.set(x, y, to)?;
                return Ok(Position::new(x, y));
            }
        }

        // Dense grid: pick directly among the remaining candidates.
        let candidates: Vec<Position> = grid
            .iter()
            .filter(|(_, cell)| *cell == from)
            .map(|(pos, _)| pos)
            .collect();
        trace!(?from, candidates = candidates.len(), "Rejection sampling exhausted");

        let pos = *candidates.choose(&mut self.rng).ok_or_else(|| {
            Error::InvalidState(format!("no {:?} cell left to turn {:?}", from, to))
        })?;
        grid.set(pos.x, pos.y, to)?;
        Ok(pos)
    }

    /// Compute the next generation and swap it in.
    ///
    /// Only interior cells are evaluated. The outermost ring is always
    /// `Empty` afterwards, including any organisms seeded there.
    pub fn step(&self, grid: &mut GridState) -> Result<()> {
        let width = grid.width() as usize;
        let height = grid.height() as usize;

        let (current, next) = grid.buffers_mut();
        if current.len() != width * height || next.len() != current.len() {
            return Err(Error::InvalidState(format!(
                "buffer sizes {}/{} do not match {}x{} grid",
                current.len(),
                next.len(),
                width,
                height
            )));
        }

        next.fill(Cell::Empty);

        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                next[y * width + x] = Neighbourhood::scan(current, width, x, y).next_cell();
            }
        }

        grid.swap_buffers();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_with(width: i32, height: i32, cells: &[(i32, i32, Cell)]) -> GridState {
        let mut grid = GridState::new(width, height).unwrap();
        for &(x, y, cell) in cells {
            grid.set(x, y, cell).unwrap();
        }
        grid
    }

    fn occupied(grid: &GridState, cell: Cell) -> Vec<(i32, i32)> {
        let mut positions: Vec<(i32, i32)> = grid
            .iter()
            .filter(|(_, c)| *c == cell)
            .map(|(pos, _)| (pos.x, pos.y))
            .collect();
        positions.sort();
        positions
    }

    #[test]
    fn test_isolation_death() {
        let mut grid = grid_with(5, 5, &[(2, 2, Cell::Healthy)]);
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(grid.get(2, 2).unwrap(), Cell::Empty);
        assert_eq!(grid.count(Cell::Healthy), 0);
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_birth() {
        let mut grid = grid_with(
            5,
            5,
            &[(1, 1, Cell::Healthy), (2, 1, Cell::Healthy), (3, 1, Cell::Healthy)],
        );
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(grid.get(2, 2).unwrap(), Cell::Healthy);
    }

    #[test]
    fn test_contagion_precedence() {
        let mut grid = grid_with(
            5,
            5,
            &[
                (2, 2, Cell::Healthy),
                (1, 1, Cell::Infected),
                (2, 1, Cell::Healthy),
                (3, 1, Cell::Healthy),
            ],
        );
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(grid.get(2, 2).unwrap(), Cell::Infected);
    }

    #[test]
    fn test_infection_burnout() {
        let mut grid = grid_with(
            5,
            5,
            &[
                (2, 2, Cell::Infected),
                (1, 1, Cell::Infected),
                (2, 1, Cell::Infected),
                (3, 1, Cell::Infected),
            ],
        );
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(grid.get(2, 2).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_infected_with_three_neighbours_stays_infected() {
        let mut grid = grid_with(
            5,
            5,
            &[
                (2, 2, Cell::Infected),
                (1, 1, Cell::Healthy),
                (2, 1, Cell::Healthy),
                (3, 1, Cell::Healthy),
            ],
        );
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(grid.get(2, 2).unwrap(), Cell::Infected);
    }

    #[test]
    fn test_empty_cell_is_not_infected_directly() {
        let mut grid = grid_with(
            5,
            5,
            &[(1, 1, Cell::Infected), (2, 1, Cell::Infected), (3, 1, Cell::Infected)],
        );
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(grid.get(2, 2).unwrap(), Cell::Healthy);
    }

    #[test]
    fn test_border_is_cleared() {
        let mut grid = grid_with(
            5,
            5,
            &[
                (0, 0, Cell::Healthy),
                (4, 2, Cell::Infected),
                (2, 4, Cell::Healthy),
                (0, 1, Cell::Healthy),
                (1, 0, Cell::Healthy),
            ],
        );
        SimulationEngine::new(0).step(&mut grid).unwrap();

        for (pos, cell) in grid.iter() {
            if pos.is_border(5, 5) {
                assert_eq!(cell, Cell::Empty, "border cell {:?}", pos);
            }
        }
        // (1,1) sees three seeded border organisms and is born.
        assert_eq!(grid.get(1, 1).unwrap(), Cell::Healthy);
    }

    #[test]
    fn test_five_by_five_scenario() {
        let mut grid = grid_with(
            5,
            5,
            &[
                (1, 1, Cell::Healthy),
                (1, 2, Cell::Healthy),
                (1, 3, Cell::Healthy),
                (2, 1, Cell::Healthy),
                (2, 2, Cell::Healthy),
            ],
        );
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(occupied(&grid, Cell::Healthy), vec![(1, 1), (2, 1), (2, 3)]);
        assert_eq!(grid.count(Cell::Healthy), 3);
        assert_eq!(grid.count(Cell::Infected), 0);
    }

    #[test]
    fn test_tiny_grid_step() {
        let mut grid = grid_with(2, 2, &[(0, 0, Cell::Healthy), (1, 1, Cell::Infected)]);
        SimulationEngine::new(0).step(&mut grid).unwrap();

        assert_eq!(grid.count(Cell::Empty), 4);
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_seed_exact_counts() {
        let mut grid = GridState::new(20, 20).unwrap();
        SimulationEngine::new(42).seed(&mut grid, 150, 30).unwrap();

        assert_eq!(grid.count(Cell::Healthy), 120);
        assert_eq!(grid.count(Cell::Infected), 30);
        assert_eq!(grid.count(Cell::Empty), 250);
    }

    #[test]
    fn test_seed_fills_grid_completely() {
        let mut grid = GridState::new(6, 6).unwrap();
        SimulationEngine::new(7).seed(&mut grid, 36, 36).unwrap();

        assert_eq!(grid.count(Cell::Infected), 36);
    }

    #[test]
    fn test_seed_respects_existing_population() {
        let mut grid = grid_with(3, 3, &[(1, 1, Cell::Healthy), (0, 0, Cell::Infected)]);
        let mut engine = SimulationEngine::new(3);

        engine.seed(&mut grid, 7, 8).unwrap();
        assert_eq!(grid.count(Cell::Empty), 0);
        assert_eq!(grid.count(Cell::Infected), 9);
    }

    #[test]
    fn test_seed_rejects_overfull_request() {
        let mut grid = grid_with(3, 3, &[(1, 1, Cell::Healthy)]);
        let result = SimulationEngine::new(1).seed(&mut grid, 9, 0);

        assert!(matches!(
            result,
            Err(Error::CapacityExceeded {
                cell: Cell::Healthy,
                requested: 9,
                available: 8,
            })
        ));
        assert_eq!(grid.count(Cell::Healthy), 1);
    }

    #[test]
    fn test_seed_rejects_too_many_infected() {
        let mut grid = GridState::new(4, 4).unwrap();
        let result = SimulationEngine::new(1).seed(&mut grid, 5, 6);

        assert!(matches!(
            result,
            Err(Error::CapacityExceeded {
                cell: Cell::Infected,
                requested: 6,
                available: 5,
            })
        ));
        assert_eq!(grid.count(Cell::Empty), 16);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = GridState::new(15, 15).unwrap();
        let mut b = GridState::new(15, 15).unwrap();
        SimulationEngine::new(99).seed(&mut a, 100, 10).unwrap();
        SimulationEngine::new(99).seed(&mut b, 100, 10).unwrap();

        assert_eq!(a.cells(), b.cells());
    }

    fn arb_grid() -> impl Strategy<Value = GridState> {
        (3i32..12, 3i32..12).prop_flat_map(|(w, h)| {
            proptest::collection::vec(
                prop_oneof![Just(Cell::Empty), Just(Cell::Healthy), Just(Cell::Infected)],
                (w * h) as usize,
            )
            .prop_map(move |cells| {
                let mut grid = GridState::new(w, h).unwrap();
                for (i, cell) in cells.into_iter().enumerate() {
                    let pos = grid.index_to_pos(i);
                    grid.set(pos.x, pos.y, cell).unwrap();
                }
                grid
            })
        })
    }

    proptest! {
        #[test]
        fn prop_step_is_deterministic(grid in arb_grid()) {
            let engine = SimulationEngine::new(0);
            let mut a = grid.clone();
            let mut b = grid;
            engine.step(&mut a).unwrap();
            engine.step(&mut b).unwrap();
            prop_assert_eq!(a.cells(), b.cells());
        }

        #[test]
        fn prop_border_stays_empty(grid in arb_grid(), steps in 1usize..4) {
            let engine = SimulationEngine::new(0);
            let mut grid = grid;
            for _ in 0..steps {
                engine.step(&mut grid).unwrap();
            }
            let (w, h) = (grid.width(), grid.height());
            for (pos, cell) in grid.iter() {
                if pos.is_border(w, h) {
                    prop_assert_eq!(cell, Cell::Empty);
                }
            }
            prop_assert_eq!(grid.generation(), steps as u64);
        }

        #[test]
        fn prop_population_bounded(grid in arb_grid()) {
            let engine = SimulationEngine::new(0);
            let mut grid = grid;
            engine.step(&mut grid).unwrap();
            let counts = grid.counts();
            prop_assert!(counts.organisms() <= grid.capacity());
            prop_assert_eq!(counts.total(), grid.capacity());
        }

        #[test]
        fn prop_seed_exact(
            seed in any::<u64>(),
            (w, h, healthy, infected) in (1i32..15, 1i32..15).prop_flat_map(|(w, h)| {
                let cap = (w * h) as usize;
                (Just(w), Just(h), 0..=cap).prop_flat_map(|(w, h, healthy)| {
                    (Just(w), Just(h), Just(healthy), 0..=healthy)
                })
            }),
        ) {
            let mut grid = GridState::new(w, h).unwrap();
            SimulationEngine::new(seed).seed(&mut grid, healthy, infected).unwrap();
            prop_assert_eq!(grid.count(Cell::Healthy), healthy - infected);
            prop_assert_eq!(grid.count(Cell::Infected), infected);
        }
    }
}
