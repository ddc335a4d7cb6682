use crate::{Card, CellPos, Direction, Payout, PlayerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WinEvent {
    pub winner: PlayerId,
    pub name: String,
    pub direction: Direction,
    pub cells: Vec<CellPos>,
    pub cards: Vec<Card>,
    pub payout: Payout,
    pub tick: u64,
}

impl WinEvent {
    pub fn cards_label(&self) -> String {
        self.cards
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    SequenceAssigned {
        player: PlayerId,
        cost: i64,
        chips: i64,
        pot: i64,
    },
    RoundStarted { contenders: usize, pot: i64 },
    CardDealt { tick: u64, at: CellPos, card: Card },
    RowEvicted { tick: u64 },
    RoundWon(WinEvent),
    RoundAborted { reason: String },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
