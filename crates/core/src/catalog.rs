use crate::{odds_of, BettingMethod, CategoryTree, Deck, MethodKind, PricingModel, SimpleMethod};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("category tree has no categories")]
    EmptyTree,
    #[error("category {0:?} has no terminal groups")]
    EmptyCategory(String),
    #[error("terminal {0:?} lists no tokens")]
    EmptyTerminal(String),
    #[error("category {0:?} appears more than once")]
    DuplicateCategory(String),
    #[error("method {0:?} matches no card")]
    UnsatisfiableMethod(String),
    #[error("pricing constants cannot produce positive prices: {0:?}")]
    InvalidPricing(PricingModel),
}

/// Every simple and combination method, stamped with odds and price.
#[derive(Debug, Clone)]
pub struct Catalog {
    methods: Vec<BettingMethod>,
}

impl Catalog {
    pub fn generate(tree: &CategoryTree, pricing: &PricingModel) -> Result<Self, CatalogError> {
        if !pricing.is_valid() {
            return Err(CatalogError::InvalidPricing(*pricing));
        }
        let buckets = tree.buckets()?;
        let deck = Deck::standard52();

        let mut kinds: Vec<MethodKind> = buckets
            .iter()
            .flat_map(|(_, methods)| methods.iter().cloned().map(MethodKind::Simple))
            .collect();
        for size in 2..=buckets.len() {
            for picked in index_subsets(buckets.len(), size) {
                let lists: Vec<&[SimpleMethod]> =
                    picked.iter().map(|&index| buckets[index].1.as_slice()).collect();
                kinds.extend(cartesian(&lists).into_iter().map(MethodKind::Combination));
            }
        }

        let mut methods = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let odds = odds_of(&kind, &deck);
            if odds.hits == 0 {
                return Err(CatalogError::UnsatisfiableMethod(kind.label()));
            }
            let price = pricing.price_of(odds.probability());
            debug_assert!(price > 0, "price must stay positive");
            methods.push(BettingMethod { kind, odds, price });
        }
        log::info!("generated {} betting methods", methods.len());
        Ok(Self { methods })
    }

    pub fn standard() -> Result<Self, CatalogError> {
        Self::generate(&CategoryTree::standard(), &PricingModel::default())
    }

    pub fn methods(&self) -> &[BettingMethod] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Display order: ascending probability, catalog order breaking ties.
    pub fn sorted_by_probability(&self) -> Vec<&BettingMethod> {
        let mut sorted: Vec<&BettingMethod> = self.methods.iter().collect();
        sorted.sort_by(|a, b| a.probability().total_cmp(&b.probability()));
        sorted
    }

    pub fn find(&self, label: &str) -> Option<&BettingMethod> {
        self.methods
            .iter()
            .find(|method| method.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn search(&self, query: &str) -> Vec<&BettingMethod> {
        let query = query.trim().to_ascii_lowercase();
        self.sorted_by_probability()
            .into_iter()
            .filter(|method| method.label().to_ascii_lowercase().contains(&query))
            .collect()
    }
}

/// Every `size`-element subset of `0..count`, each in ascending order.
fn index_subsets(count: usize, size: usize) -> Vec<Vec<usize>> {
    fn walk(start: usize, count: usize, size: usize, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if prefix.len() == size {
            out.push(prefix.clone());
            return;
        }
        for index in start..count {
            prefix.push(index);
            walk(index + 1, count, size, prefix, out);
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    walk(0, count, size, &mut Vec::with_capacity(size), &mut out);
    out
}

fn cartesian(lists: &[&[SimpleMethod]]) -> Vec<Vec<SimpleMethod>> {
    let mut acc: Vec<Vec<SimpleMethod>> = vec![Vec::new()];
    for list in lists {
        let mut next = Vec::with_capacity(acc.len() * list.len());
        for prefix in &acc {
            for item in list.iter() {
                let mut combo = prefix.clone();
                combo.push(item.clone());
                next.push(combo);
            }
        }
        acc = next;
    }
    acc
}
