use crate::Card;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) was expected to hold a card")]
    EmptyCell { row: usize, col: usize },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GridPhase {
    Filling,
    Scrolling,
}

/// `width + 1` rows of `width` cells. Rows form a ring: once the cursor would
/// pass the last row, the oldest row is cleared and becomes the new last row.
/// Row indices in the public API are logical (0 = oldest visible row).
#[derive(Debug, Clone)]
pub struct GridBuffer {
    width: usize,
    height: usize,
    cells: Vec<Option<Card>>,
    base_row: usize,
    cursor: CellPos,
    phase: GridPhase,
}

impl GridBuffer {
    pub fn new(width: usize) -> Self {
        let height = width + 1;
        Self {
            width,
            height,
            cells: vec![None; width * height],
            base_row: 0,
            cursor: CellPos::new(0, 0),
            phase: GridPhase::Filling,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cursor(&self) -> CellPos {
        self.cursor
    }

    pub fn phase(&self) -> GridPhase {
        self.phase
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.height || col >= self.width {
            return Err(GridError::OutOfBounds { row, col });
        }
        let physical = (self.base_row + row) % self.height;
        Ok(physical * self.width + col)
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<Option<Card>, GridError> {
        Ok(self.cells[self.offset(row, col)?])
    }

    pub fn set(&mut self, row: usize, col: usize, card: Option<Card>) -> Result<(), GridError> {
        let offset = self.offset(row, col)?;
        self.cells[offset] = card;
        Ok(())
    }

    /// Writes at the cursor without moving it.
    pub fn place(&mut self, card: Card) -> Result<CellPos, GridError> {
        let at = self.cursor;
        self.set(at.row, at.col, Some(card))?;
        Ok(at)
    }

    /// Moves the cursor one cell forward. Returns true when a row was evicted.
    pub fn advance(&mut self) -> bool {
        self.cursor.col += 1;
        if self.cursor.col < self.width {
            return false;
        }
        self.cursor.col = 0;
        self.cursor.row += 1;
        if self.cursor.row < self.height {
            return false;
        }
        let oldest = self.base_row * self.width;
        self.cells[oldest..oldest + self.width].fill(None);
        self.base_row = (self.base_row + 1) % self.height;
        self.cursor.row = self.height - 1;
        self.phase = GridPhase::Scrolling;
        true
    }

    /// Rows in logical order, oldest first.
    pub fn rows(&self) -> Vec<&[Option<Card>]> {
        (0..self.height)
            .map(|row| {
                let start = ((self.base_row + row) % self.height) * self.width;
                &self.cells[start..start + self.width]
            })
            .collect()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}
