use std::fmt;

use crate::error::GridError;

/// Backing capacity on both axes; the resource always carries 10 columns.
pub const GRID_CAPACITY: usize = 10;

/// The square region of the board currently in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridSize {
    Three,
    Five,
    #[default]
    Ten,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Three, GridSize::Five, GridSize::Ten];

    pub fn side(self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Five => 5,
            GridSize::Ten => 10,
        }
    }

    pub fn contains(self, col: usize, row: usize) -> bool {
        col < self.side() && row < self.side()
    }
}

impl TryFrom<usize> for GridSize {
    type Error = GridError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        GridSize::ALL
            .into_iter()
            .find(|s| s.side() == n)
            .ok_or(GridError::UnsupportedSize(n))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.side();
        write!(f, "{n}x{n}")
    }
}

/// Boolean board indexed `[col][row]`.
/// Storage is always 10x10; only the `active_size` corner is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridState {
    cells: [[bool; GRID_CAPACITY]; GRID_CAPACITY],
    active_size: GridSize,
}

impl GridState {
    pub fn new(active_size: GridSize) -> Self {
        Self {
            cells: [[false; GRID_CAPACITY]; GRID_CAPACITY],
            active_size,
        }
    }

    pub fn active_size(&self) -> GridSize {
        self.active_size
    }

    /// Switch the active region. Every cell is reset, including the
    /// ones that stay inside the new region.
    pub fn set_active_size(&mut self, size: GridSize) {
        *self = Self::new(size);
    }

    pub fn clear(&mut self) {
        self.cells = [[false; GRID_CAPACITY]; GRID_CAPACITY];
    }

    /// Flip a cell inside the active region and return its new value.
    pub fn toggle(&mut self, col: usize, row: usize) -> Result<bool, GridError> {
        if !self.active_size.contains(col, row) {
            return Err(GridError::OutOfRange {
                col,
                row,
                size: self.active_size,
            });
        }
        let cell = &mut self.cells[col][row];
        *cell = !*cell;
        Ok(*cell)
    }

    /// Read any cell of the backing storage; out-of-capacity reads are `false`.
    pub fn get(&self, col: usize, row: usize) -> bool {
        self.cells
            .get(col)
            .and_then(|c| c.get(row))
            .copied()
            .unwrap_or(false)
    }

    /// Write into the backing storage regardless of the active region.
    /// Writes beyond the 10x10 capacity are dropped.
    pub(crate) fn set(&mut self, col: usize, row: usize, value: bool) {
        if let Some(cell) = self.cells.get_mut(col).and_then(|c| c.get_mut(row)) {
            *cell = value;
        }
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = bool> + '_ {
        (0..self.active_size.side()).map(move |row| self.get(col, row))
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = bool> + '_ {
        (0..self.active_size.side()).map(move |col| self.get(col, row))
    }

    pub fn active_count(&self) -> usize {
        let n = self.active_size.side();
        (0..n)
            .flat_map(|col| (0..n).map(move |row| (col, row)))
            .filter(|&(col, row)| self.cells[col][row])
            .count()
    }
}
