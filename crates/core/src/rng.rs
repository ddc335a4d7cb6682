use crate::{Card, Rank, Suit};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Endless card source. Suit and rank are drawn independently and uniformly,
/// i.e. with replacement: repeats across draws are expected.
#[derive(Debug, Clone)]
pub struct DealerStream {
    rng: RngState,
}

impl DealerStream {
    pub fn new(rng: RngState) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RngState::from_seed(seed))
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn draw(&mut self) -> Card {
        let suit = Suit::ALL[self.rng.index(Suit::ALL.len())];
        let rank = Rank::ALL[self.rng.index(Rank::ALL.len())];
        Card::new(suit, rank)
    }
}

impl Iterator for DealerStream {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        Some(self.draw())
    }
}
