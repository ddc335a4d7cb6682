use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|suit| suit.name().eq_ignore_ascii_case(value.trim()))
    }
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    /// Accepts the short label (`"10"`, `"Q"`) as well as the variant name (`"Queen"`).
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|rank| {
            rank.label().eq_ignore_ascii_case(value)
                || format!("{rank:?}").eq_ignore_ascii_case(value)
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub fn is_red(&self) -> bool {
        self.suit.color() == Color::Red
    }

    /// Two-part compact form used by the grid renderers, e.g. `10♥`.
    pub fn short(&self) -> String {
        format!("{}{}", self.rank.label(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank.label(), self.suit.name())
    }
}

/// A single acceptable suit or rank inside a betting method's option list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Token {
    Suit(Suit),
    Rank(Rank),
}

impl Token {
    pub fn parse(value: &str) -> Option<Self> {
        Suit::from_name(value)
            .map(Token::Suit)
            .or_else(|| Rank::from_label(value).map(Token::Rank))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Token::Suit(suit) => suit.name(),
            Token::Rank(rank) => rank.label(),
        }
    }
}

impl TryFrom<String> for Token {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Token::parse(&value).ok_or_else(|| format!("unknown card token {value:?}"))
    }
}

impl From<Token> for String {
    fn from(value: Token) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suits_split_into_two_colors() {
        let red = Suit::ALL.iter().filter(|s| s.color() == Color::Red).count();
        assert_eq!(red, 2);
        assert!(Card::new(Suit::Diamonds, Rank::Two).is_red());
        assert!(!Card::new(Suit::Spades, Rank::Two).is_red());
    }

    #[test]
    fn parses_tokens_by_label_and_name() {
        assert_eq!(Token::parse("Hearts"), Some(Token::Suit(Suit::Hearts)));
        assert_eq!(Token::parse("10"), Some(Token::Rank(Rank::Ten)));
        assert_eq!(Token::parse("q"), Some(Token::Rank(Rank::Queen)));
        assert_eq!(Token::parse("Ace"), Some(Token::Rank(Rank::Ace)));
        assert_eq!(Token::parse("Joker"), None);
    }

    #[test]
    fn formats_cards() {
        let card = Card::new(Suit::Hearts, Rank::Ten);
        assert_eq!(card.to_string(), "10 of Hearts");
        assert_eq!(card.short(), "10♥");
    }
}
