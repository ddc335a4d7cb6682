use anyhow::{bail, Context};
use serde_json::{Map, Value};

pub use middl_core::{Category, CategoryNode, CategoryTree, GameConfig, PricingModel, Token};

/// Reads the nested-object tree notation: arrays are terminals, objects are
/// groups, a lone string is a one-token terminal. Key order is kept.
pub fn parse_category_tree(value: &Value) -> anyhow::Result<CategoryTree> {
    let Value::Object(map) = value else {
        bail!("category tree must be an object of categories");
    };
    let mut categories = Vec::with_capacity(map.len());
    for (name, body) in map {
        let Value::Object(children) = body else {
            bail!("category {name:?} must be an object of groups");
        };
        let children = parse_children(children, name)?;
        categories.push(Category::new(name.clone(), children));
    }
    Ok(CategoryTree::new(categories))
}

fn parse_children(map: &Map<String, Value>, path: &str) -> anyhow::Result<Vec<CategoryNode>> {
    map.iter()
        .map(|(name, value)| {
            let here = format!("{path} / {name}");
            parse_node(name, value, &here).with_context(|| format!("in {here}"))
        })
        .collect()
}

fn parse_node(name: &str, value: &Value, path: &str) -> anyhow::Result<CategoryNode> {
    match value {
        Value::String(token) => Ok(CategoryNode::terminal(name, [parse_token(token)?])),
        Value::Array(items) => {
            let mut options = Vec::with_capacity(items.len());
            for item in items {
                let Value::String(token) = item else {
                    bail!("terminal {name:?} holds a non-string token: {item}");
                };
                options.push(parse_token(token)?);
            }
            Ok(CategoryNode::terminal(name, options))
        }
        Value::Object(children) => Ok(CategoryNode::group(name, parse_children(children, path)?)),
        other => bail!("unsupported value for {name:?}: {other}"),
    }
}

fn parse_token(value: &str) -> anyhow::Result<Token> {
    Token::parse(value).with_context(|| format!("unknown card token {value:?}"))
}

/// Inverse of [`parse_category_tree`], used when writing the built-in tree out.
#[cfg(test)]
mod tests {
    use super::*;
    use middl_core::{Rank, Suit};
    use serde_json::json;

    #[test]
    fn parses_nested_groups_in_key_order() {
        let value = json!({
            "center": {"color": {"red": ["Hearts", "Diamonds"], "black": ["Clubs", "Spades"]}},
            "corner": {"specific": {"K": "K", "A": "A"}}
        });
        let tree = parse_category_tree(&value).expect("parse");
        assert_eq!(tree.categories.len(), 2);
        let buckets = tree.buckets().expect("buckets");
        let labels: Vec<&str> = buckets[1].1.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["K", "A"]);
        assert_eq!(buckets[0].1[0].options, vec![Token::Suit(Suit::Hearts), Token::Suit(Suit::Diamonds)]);
        assert_eq!(buckets[1].1[0].options, vec![Token::Rank(Rank::King)]);
    }

    #[test]
    fn unknown_token_names_its_location() {
        let value = json!({"corner": {"generic": {"letters": ["A", "Z"]}}});
        let err = parse_category_tree(&value).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("corner / generic"), "{chain}");
        assert!(chain.contains("\"Z\""), "{chain}");
    }

    #[test]
    fn top_level_terminal_is_rejected() {
        let value = json!({"center": ["Hearts"]});
        assert!(parse_category_tree(&value).is_err());
    }
}
