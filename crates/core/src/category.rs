use crate::{CatalogError, Rank, SimpleMethod, Suit, Token};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryNode {
    Terminal { name: String, options: Vec<Token> },
    Group { name: String, children: Vec<CategoryNode> },
}

impl CategoryNode {
    pub fn terminal(name: impl Into<String>, options: impl IntoIterator<Item = Token>) -> Self {
        Self::Terminal {
            name: name.into(),
            options: options.into_iter().collect(),
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<CategoryNode>) -> Self {
        Self::Group {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Terminal { name, .. } | Self::Group { name, .. } => name,
        }
    }

    fn collect(&self, path: &mut Vec<String>, out: &mut Vec<SimpleMethod>) -> Result<(), CatalogError> {
        path.push(self.name().to_string());
        match self {
            Self::Terminal { options, .. } => {
                if options.is_empty() {
                    return Err(CatalogError::EmptyTerminal(path.join(" / ")));
                }
                out.push(SimpleMethod {
                    path: path.clone(),
                    options: options.clone(),
                });
            }
            Self::Group { children, .. } => {
                for child in children {
                    child.collect(path, out)?;
                }
            }
        }
        path.pop();
        Ok(())
    }
}

/// A top-level category. Combinations only ever pair methods from distinct categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub children: Vec<CategoryNode>,
}

impl Category {
    pub fn new(name: impl Into<String>, children: Vec<CategoryNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Depth-first list of every terminal below this category, labelled with its full path.
    pub fn simple_methods(&self) -> Result<Vec<SimpleMethod>, CatalogError> {
        let mut path = vec![self.name.clone()];
        let mut out = Vec::new();
        for child in &self.children {
            child.collect(&mut path, &mut out)?;
        }
        if out.is_empty() {
            return Err(CatalogError::EmptyCategory(self.name.clone()));
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTree {
    pub categories: Vec<Category>,
}

impl CategoryTree {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Simple methods bucketed by top-level category, in tree order.
    pub fn buckets(&self) -> Result<Vec<(String, Vec<SimpleMethod>)>, CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::EmptyTree);
        }
        let mut seen = HashSet::new();
        let mut buckets = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            if !seen.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
            buckets.push((category.name.clone(), category.simple_methods()?));
        }
        Ok(buckets)
    }

    /// The built-in tree: colors and suits in `center`, specific ranks and rank classes in `corner`.
    pub fn standard() -> Self {
        use Rank::*;
        let ranks = |items: &[Rank]| items.iter().copied().map(Token::Rank).collect::<Vec<_>>();

        let center = Category::new(
            "center",
            vec![
                CategoryNode::group(
                    "color",
                    vec![
                        CategoryNode::terminal(
                            "red",
                            [Token::Suit(Suit::Hearts), Token::Suit(Suit::Diamonds)],
                        ),
                        CategoryNode::terminal(
                            "black",
                            [Token::Suit(Suit::Clubs), Token::Suit(Suit::Spades)],
                        ),
                    ],
                ),
                CategoryNode::group(
                    "suits",
                    Suit::ALL
                        .into_iter()
                        .map(|suit| CategoryNode::terminal(suit.name(), [Token::Suit(suit)]))
                        .collect(),
                ),
            ],
        );

        let corner = Category::new(
            "corner",
            vec![
                CategoryNode::group(
                    "specific",
                    Rank::ALL
                        .into_iter()
                        .map(|rank| CategoryNode::terminal(rank.label(), [Token::Rank(rank)]))
                        .collect(),
                ),
                CategoryNode::group(
                    "generic",
                    vec![
                        CategoryNode::terminal("letters", ranks(&[Ace, Jack, Queen, King])),
                        CategoryNode::group(
                            "numbers",
                            vec![
                                CategoryNode::terminal(
                                    "all numbers",
                                    ranks(&[Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten]),
                                ),
                                CategoryNode::terminal(
                                    "high numbers",
                                    ranks(&[Eight, Nine, Ten, Jack, Queen, King]),
                                ),
                                CategoryNode::terminal(
                                    "low numbers",
                                    ranks(&[Two, Three, Four, Five, Six, Seven]),
                                ),
                                CategoryNode::terminal(
                                    "even numbers",
                                    ranks(&[Two, Four, Six, Eight, Ten]),
                                ),
                                CategoryNode::terminal("odd numbers", ranks(&[Three, Five, Seven, Nine])),
                                CategoryNode::terminal("prime numbers", ranks(&[Two, Three, Five, Seven])),
                            ],
                        ),
                    ],
                ),
            ],
        );

        Self::new(vec![center, corner])
    }
}
