use crate::{
    Card, CellPos, DealerStream, GameConfig, GameState, GridBuffer, GridError, LedgerError, Phase,
    PlayerId, Roster, RngState, WinEvent,
};
use thiserror::Error;

mod setup;
mod tick;

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("no enabled player has a full sequence")]
    NoParticipants,
    #[error("dealer stream ended")]
    DealerExhausted,
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    #[error("internal invariant violation: {0}")]
    Invariant(#[from] GridError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The round is not running; nothing was touched.
    Idle,
    Dealt {
        at: CellPos,
        card: Card,
        evicted: bool,
    },
    Won(WinEvent),
}

/// The single owner of everything a round mutates. Any driver (terminal loop,
/// UI event loop) goes through these methods one call at a time.
#[derive(Debug)]
pub struct RoundState<D = DealerStream> {
    pub config: GameConfig,
    pub roster: Roster,
    pub state: GameState,
    pub grid: GridBuffer,
    dealer: D,
}

impl RoundState<DealerStream> {
    pub fn new(config: GameConfig, roster: Roster) -> Self {
        let rng = match config.seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        };
        Self::with_dealer(config, roster, DealerStream::new(rng))
    }

    pub fn seed(&self) -> u64 {
        self.dealer.seed()
    }
}

impl<D: Iterator<Item = Card>> RoundState<D> {
    pub fn with_dealer(config: GameConfig, roster: Roster, dealer: D) -> Self {
        let grid = GridBuffer::new(config.sequence_length);
        Self {
            config,
            roster,
            state: GameState::new(),
            grid,
            dealer,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn pot(&self) -> i64 {
        self.state.ledger.pot
    }

    pub fn casino(&self) -> i64 {
        self.state.ledger.casino
    }

    fn ensure_not_running(&self) -> Result<(), RoundError> {
        if self.is_running() {
            return Err(RoundError::InvalidPhase(self.state.phase));
        }
        Ok(())
    }
}
