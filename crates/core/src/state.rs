use crate::{Ledger, WinEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Running,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub ledger: Ledger,
    pub ticks: u64,
    #[serde(default)]
    pub last_win: Option<WinEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Setup,
            ledger: Ledger::default(),
            ticks: 0,
            last_win: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
