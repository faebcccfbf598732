//! Double-buffered 2D grid holding the population.

use plague_core::{Cell, Error, PopulationCounts, Position, Result};
use std::fmt;

/// A fixed-size, non-wrapping grid of cells.
///
/// The grid owns two buffers: the current generation, which every read goes
/// through, and a scratch buffer the engine fills with the next generation
/// before the two are swapped.
#[derive(Debug, Clone)]
pub struct GridState {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    next: Vec<Cell>,
    generation: u64,
}

impl GridState {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        // Cell indices are computed in i32, so the whole grid must fit in one.
        if width <= 0 || height <= 0 || width.checked_mul(height).is_none() {
            return Err(Error::InvalidDimensions { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; size],
            next: vec![Cell::Empty; size],
            generation: 0,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of completed steps
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Get the cell at (x, y)
    pub fn get(&self, x: i32, y: i32) -> Result<Cell> {
        let index = self.pos_to_index(x, y)?;
        Ok(self.cells[index])
    }

    /// Overwrite the cell at (x, y)
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<()> {
        let index = self.pos_to_index(x, y)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Number of cells currently holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Counts for every cell type in one pass
    pub fn counts(&self) -> PopulationCounts {
        self.cells.iter().copied().collect()
    }

    /// Current generation in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (self.index_to_pos(i), cell))
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    fn pos_to_index(&self, x: i32, y: i32) -> Result<usize> {
        if !self.contains(x, y) {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) as usize)
    }

    /// Current generation (read-only) and the next-generation buffer
    pub(crate) fn buffers_mut(&mut self) -> (&[Cell], &mut [Cell]) {
        (&self.cells, &mut self.next)
    }

    /// Publish the next-generation buffer as the current one
    pub(crate) fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
