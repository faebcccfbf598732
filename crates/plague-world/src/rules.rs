//! Per-cell update rules.
//!
//! Two hardcoded rule families decide a cell's next value: a life-like
//! survival/birth rule driven by the number of occupied neighbours, and an
//! infection rule driven by the number of infected cells in the 3x3 block.
//! The infection rule runs second and overrides the survival result whenever
//! one of its conditions holds.

use plague_core::Cell;

/// What a cell sees of its 3x3 block in the current generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbourhood {
    pub centre: Cell,
    /// Occupied cells among the eight surrounding ones
    pub neighbours: u8,
    /// Infected cells in the whole block, centre included
    pub bad_neighbours: u8,
}

impl Neighbourhood {
    /// Scan the block around interior cell (x, y) of a row-major buffer.
    ///
    /// Caller guarantees `1 <= x < width - 1` and that row `y + 1` exists.
    pub fn scan(cells: &[Cell], width: usize, x: usize, y: usize) -> Self {
        let centre = cells[y * width + x];
        let mut neighbours = 0u8;
        let mut bad_neighbours = 0u8;

        for row in (y - 1)..=(y + 1) {
            for col in (x - 1)..=(x + 1) {
                let cell = cells[row * width + col];
                if cell.is_occupied() {
                    neighbours += 1;
                }
                if cell == Cell::Infected {
                    bad_neighbours += 1;
                }
            }
        }

        // The block count includes the centre; only an occupied centre is taken back out.
        if centre.is_occupied() {
            neighbours -= 1;
        }

        Self {
            centre,
            neighbours,
            bad_neighbours,
        }
    }

    /// Value of the centre cell in the next generation
    pub fn next_cell(&self) -> Cell {
        let survived = survival_rule(self.centre, self.neighbours);
        infection_rule(self.centre, self.bad_neighbours).unwrap_or(survived)
    }
}

/// Isolation and overcrowding kill healthy cells; exactly three neighbours give birth.
pub fn survival_rule(centre: Cell, neighbours: u8) -> Cell {
    match centre {
        Cell::Healthy if neighbours < 3 => Cell::Empty,
        Cell::Healthy if neighbours > 3 => Cell::Empty,
        Cell::Empty if neighbours == 3 => Cell::Healthy,
        other => other,
    }
}

/// Returns an override when the infection takes effect, `None` otherwise.
pub fn infection_rule(centre: Cell, bad_neighbours: u8) -> Option<Cell> {
    match centre {
        Cell::Infected if bad_neighbours > 2 => Some(Cell::Empty),
        Cell::Healthy if bad_neighbours > 0 => Some(Cell::Infected),
        _ => None,
    }
}
