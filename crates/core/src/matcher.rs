use crate::{Card, CellPos, GridBuffer, GridError, Player};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    LeftRight,
    TopBottom,
    BottomTop,
    RightLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::LeftRight,
        Direction::TopBottom,
        Direction::BottomTop,
        Direction::RightLeft,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Direction::LeftRight => "left-right",
            Direction::TopBottom => "top-bottom",
            Direction::BottomTop => "bottom-top",
            Direction::RightLeft => "right-left",
        }
    }

    // Rows never wrap; columns do.
    pub fn cells(self, at: CellPos, len: usize, width: usize) -> Option<Vec<CellPos>> {
        let wrap = |back: usize| (at.col + width * len - back % width) % width;
        let mut cells = Vec::with_capacity(len);
        for i in 0..len {
            let cell = match self {
                Direction::LeftRight => CellPos::new(at.row, wrap(len - 1 - i)),
                Direction::RightLeft => CellPos::new(at.row, wrap(i)),
                Direction::TopBottom => CellPos::new(at.row.checked_sub(len - 1 - i)?, at.col),
                Direction::BottomTop => CellPos::new(at.row.checked_sub(i)?, at.col),
            };
            cells.push(cell);
        }
        Some(cells)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Window {
    pub direction: Direction,
    pub cells: Vec<CellPos>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceMatch {
    pub player: usize,
    pub window: Window,
}

pub fn windows_at(grid: &GridBuffer, at: CellPos) -> Result<Vec<Window>, GridError> {
    let len = grid.width();
    if grid.cell(at.row, at.col)?.is_none() {
        return Err(GridError::EmptyCell {
            row: at.row,
            col: at.col,
        });
    }
    let mut windows = Vec::with_capacity(Direction::ALL.len());
    'directions: for direction in Direction::ALL {
        let Some(cells) = direction.cells(at, len, grid.width()) else {
            continue;
        };
        let mut cards = Vec::with_capacity(len);
        for cell in &cells {
            match grid.cell(cell.row, cell.col)? {
                Some(card) => cards.push(card),
                None => continue 'directions,
            }
        }
        windows.push(Window {
            direction,
            cells,
            cards,
        });
    }
    Ok(windows)
}

pub fn window_matches(window: &Window, player: &Player) -> bool {
    window.cards.len() == player.sequence.len()
        && window
            .cards
            .iter()
            .zip(&player.sequence)
            .all(|(card, method)| method.matches(card))
}

/// First match in player order, then direction order.
pub fn find_match(
    grid: &GridBuffer,
    at: CellPos,
    players: &[Player],
) -> Result<Option<SequenceMatch>, GridError> {
    let windows = windows_at(grid, at)?;
    for (index, player) in players.iter().enumerate() {
        if !player.is_contender(grid.width()) {
            continue;
        }
        if let Some(window) = windows.iter().find(|window| window_matches(window, player)) {
            return Ok(Some(SequenceMatch {
                player: index,
                window: window.clone(),
            }));
        }
    }
    Ok(None)
}
