use crate::{BettingMethod, Player};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("sequence needs {expected} methods, got {actual}")]
    InvalidSequenceLength { expected: usize, actual: usize },
}

/// Outcome of splitting the pot on a win.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payout {
    pub pot: i64,
    pub winner_share: i64,
    pub house_share: i64,
    /// The odd chip lost to floor division; nobody receives it.
    pub remainder: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    pub pot: i64,
    pub casino: i64,
}

impl Ledger {
    /// Charges the sum of the methods' prices to `player` and moves it to the pot.
    /// Balances may go negative.
    pub fn assign_sequence(
        &mut self,
        player: &mut Player,
        methods: Vec<BettingMethod>,
        length: usize,
    ) -> Result<i64, LedgerError> {
        if methods.len() != length {
            return Err(LedgerError::InvalidSequenceLength {
                expected: length,
                actual: methods.len(),
            });
        }
        let cost: i64 = methods.iter().map(|method| method.price).sum();
        player.chips -= cost;
        self.pot += cost;
        player.sequence = methods;
        Ok(cost)
    }

    /// Halves the pot between `players[winner]` and the house, then clears every
    /// player's sequence.
    pub fn credit_win(&mut self, winner: usize, players: &mut [Player]) -> Payout {
        let pot = self.pot;
        let half = pot / 2;
        if let Some(player) = players.get_mut(winner) {
            player.chips += half;
        }
        self.casino += half;
        self.pot = 0;
        for player in players.iter_mut() {
            player.sequence.clear();
        }
        Payout {
            pot,
            winner_share: half,
            house_share: half,
            remainder: pot - 2 * half,
        }
    }
}
