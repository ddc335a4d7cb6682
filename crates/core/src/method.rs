use crate::{Card, Token};
use serde::{Deserialize, Serialize};

/// One terminal of the category tree: a label path plus the acceptable tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SimpleMethod {
    pub path: Vec<String>,
    pub options: Vec<Token>,
}

impl SimpleMethod {
    pub fn label(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    /// Suit tokens and rank tokens are checked independently; a kind with no
    /// tokens in the option list places no constraint on the card.
    pub fn matches(&self, card: &Card) -> bool {
        let mut has_suit = false;
        let mut suit_ok = false;
        let mut has_rank = false;
        let mut rank_ok = false;
        for token in &self.options {
            match *token {
                Token::Suit(suit) => {
                    has_suit = true;
                    suit_ok |= suit == card.suit;
                }
                Token::Rank(rank) => {
                    has_rank = true;
                    rank_ok |= rank == card.rank;
                }
            }
        }
        (!has_suit || suit_ok) && (!has_rank || rank_ok)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Simple(SimpleMethod),
    /// Simple methods from distinct top-level categories, AND-ed together.
    Combination(Vec<SimpleMethod>),
}

impl MethodKind {
    pub fn parts(&self) -> &[SimpleMethod] {
        match self {
            MethodKind::Simple(method) => std::slice::from_ref(method),
            MethodKind::Combination(parts) => parts,
        }
    }

    pub fn matches(&self, card: &Card) -> bool {
        self.parts().iter().all(|part| part.matches(card))
    }

    pub fn label(&self) -> String {
        match self {
            MethodKind::Simple(method) => method.label().to_string(),
            MethodKind::Combination(parts) => parts
                .iter()
                .map(SimpleMethod::label)
                .collect::<Vec<_>>()
                .join(" & "),
        }
    }

    pub fn is_combination(&self) -> bool {
        matches!(self, MethodKind::Combination(_))
    }
}

/// Fraction of the reference deck satisfying a method, kept as an exact ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Odds {
    pub hits: u32,
    pub total: u32,
}

impl Odds {
    pub fn probability(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.hits as f64 / self.total as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BettingMethod {
    pub kind: MethodKind,
    pub odds: Odds,
    pub price: i64,
}

impl BettingMethod {
    pub fn probability(&self) -> f64 {
        self.odds.probability()
    }

    pub fn label(&self) -> String {
        self.kind.label()
    }

    pub fn matches(&self, card: &Card) -> bool {
        self.kind.matches(card)
    }
}
