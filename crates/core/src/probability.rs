use crate::{Deck, MethodKind, Odds};

/// Share of `deck` that satisfies every part of `kind` on a single card.
pub fn odds_of(kind: &MethodKind, deck: &Deck) -> Odds {
    let hits = deck.count_where(|card| kind.matches(card));
    Odds {
        hits: hits as u32,
        total: deck.len() as u32,
    }
}
