use crate::{Card, Rank, Suit};

/// The reference 52-card deck that method odds are measured against.
#[derive(Debug, Clone)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn standard52() -> Self {
        let mut cards = Vec::with_capacity(Suit::ALL.len() * Rank::ALL.len());
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count_where(&self, mut predicate: impl FnMut(&Card) -> bool) -> usize {
        self.cards.iter().filter(|card| predicate(card)).count()
    }
}
