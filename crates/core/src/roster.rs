use crate::BettingMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub sequence: Vec<BettingMethod>,
    pub chips: i64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Player {
    pub fn has_sequence(&self) -> bool {
        !self.sequence.is_empty()
    }

    /// Enabled with a sequence of exactly `length` methods.
    pub fn is_contender(&self, length: usize) -> bool {
        self.enabled && self.sequence.len() == length
    }

    pub fn sequence_label(&self) -> String {
        self.sequence
            .iter()
            .map(BettingMethod::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Serializable form of the roster, owned by whatever store persists it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterSnapshot {
    pub version: u32,
    pub players: Vec<Player>,
}

/// Players in registration order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, chips: i64) -> PlayerId {
        let id = self.alloc_id();
        self.players.push(Player {
            id,
            name: name.trim().to_string(),
            sequence: Vec::new(),
            chips,
            enabled: true,
        });
        id
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.position(id)?;
        Some(self.players.remove(index))
    }

    /// Flips the enabled flag, returning the new value.
    pub fn toggle(&mut self, id: PlayerId) -> Option<bool> {
        let player = self.get_mut(id)?;
        player.enabled = !player.enabled;
        Some(player.enabled)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    pub fn position(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|player| player.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn total_chips(&self) -> i64 {
        self.players.iter().map(|player| player.chips).sum()
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            version: SNAPSHOT_VERSION,
            players: self.players.clone(),
        }
    }

    /// Rebuilds a roster; new ids continue after the highest restored one.
    pub fn restore(snapshot: RosterSnapshot) -> Self {
        let next_id = snapshot
            .players
            .iter()
            .map(|player| player.id.0 + 1)
            .max()
            .unwrap_or(0);
        Self {
            players: snapshot.players,
            next_id,
        }
    }

    fn alloc_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}
