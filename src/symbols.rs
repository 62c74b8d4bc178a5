use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::syntree::SynTree;

/// Wraps a renamed symbol on both sides: `PP` becomes `_PP_`
pub const MARKER: char = '_';

/// The alphabets found in a corpus
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolSets {
  /// Tokens, the leaves of the trees
  pub terminals: BTreeSet<String>,
  /// Every node label, POS tags included
  pub nonterminals: BTreeSet<String>,
  /// Labels of preterminal nodes
  pub pos: BTreeSet<String>,
  /// Root label of the first tree, before renaming
  pub start: Option<String>,
}

impl SymbolSets {
  pub fn new() -> Self {
    Default::default()
  }

  pub fn classify<'a, I>(trees: I) -> Self
  where
    I: IntoIterator<Item = &'a SynTree>,
  {
    let mut sets = Self::new();
    for tree in trees {
      sets.add_tree(tree);
    }
    sets
  }

  pub fn add_tree(&mut self, tree: &SynTree) {
    if self.start.as_deref().is_none_or(str::is_empty) {
      self.start = Some(tree.label().to_string());
    }
    self.visit(tree);
  }

  fn visit(&mut self, tree: &SynTree) {
    match tree {
      SynTree::Branch(label, children) => {
        self.nonterminals.insert(label.clone());
        for child in children {
          self.visit(child);
        }
      }
      SynTree::Preterminal(tag, token) => {
        self.nonterminals.insert(tag.clone());
        self.pos.insert(tag.clone());
        self.terminals.insert(token.clone());
      }
    }
  }

  /// Symbols that are both nonterminals and POS tags
  pub fn ambiguous(&self) -> impl Iterator<Item = &String> {
    self.nonterminals.intersection(&self.pos)
  }
}

/// Renaming table for ambiguous symbols, built once per training corpus
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolMap(BTreeMap<String, String>);

impl SymbolMap {
  pub fn wrap(symbol: &str) -> String {
    format!("{}{}{}", MARKER, symbol, MARKER)
  }

  fn unwrap(symbol: &str) -> Option<&str> {
    symbol
      .strip_prefix(MARKER)
      .and_then(|s| s.strip_suffix(MARKER))
      .filter(|s| !s.is_empty())
  }

  /// Whether `symbol` has the `_X_` form of a renamed symbol
  pub fn is_wrapped(symbol: &str) -> bool {
    Self::unwrap(symbol).is_some()
  }

  /// The terminal a POS tag emits in the unlexicalized grammar: the tag with
  /// its markers removed. Unwrapped symbols are returned as they are.
  pub fn placeholder(symbol: &str) -> &str {
    Self::unwrap(symbol).unwrap_or(symbol)
  }

  /// Maps every symbol in nonterminals ∩ POS to its wrapped form. Fails if a
  /// wrapped form is already a nonterminal or POS symbol of its own.
  pub fn disambiguate(sets: &SymbolSets) -> Result<Self> {
    let mut map = BTreeMap::new();
    for symbol in sets.ambiguous() {
      let replacement = Self::wrap(symbol);
      if sets.pos.contains(&replacement) || sets.nonterminals.contains(&replacement) {
        return Err(Error::AmbiguousSymbol {
          symbol: symbol.clone(),
          replacement,
        });
      }
      if sets.terminals.contains(&replacement) {
        // tokens never reach the grammar, so this is only worth a mention
        warn!(%symbol, %replacement, "replacement symbol also occurs as a token");
      }
      debug!(%symbol, %replacement, "renaming ambiguous symbol");
      map.insert(symbol.clone(), replacement);
    }
    info!(renamed = map.len(), "disambiguated symbols");
    Ok(Self(map))
  }

  pub fn get(&self, symbol: &str) -> Option<&str> {
    self.0.get(symbol).map(String::as_str)
  }

  /// The renamed symbol, or `symbol` itself if it isn't ambiguous
  pub fn apply<'a>(&'a self, symbol: &'a str) -> &'a str {
    self.get(symbol).unwrap_or(symbol)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse_treebank::parse_trees;

  fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_classify() {
    let trees = parse_trees(
      "(S (NP (DT the) (NN dog)) (VP (VBD ran)))
       (FRAG (NP (NN cat)))",
    )
    .unwrap();
    let sets = SymbolSets::classify(&trees);

    assert_eq!(sets.start.as_deref(), Some("S"));
    assert_eq!(sets.terminals, set(&["cat", "dog", "ran", "the"]));
    assert_eq!(sets.pos, set(&["DT", "NN", "VBD"]));
    assert_eq!(
      sets.nonterminals,
      set(&["DT", "FRAG", "NN", "NP", "S", "VBD", "VP"])
    );
  }

  #[test]
  fn test_every_pos_tag_is_wrapped() {
    let trees = parse_trees("(S (NP (DT the) (NN dog)) (VP (VBD ran)))").unwrap();
    let map = SymbolMap::disambiguate(&SymbolSets::classify(&trees)).unwrap();

    assert_eq!(
      map.iter().collect::<Vec<_>>(),
      vec![("DT", "_DT_"), ("NN", "_NN_"), ("VBD", "_VBD_")]
    );
    assert_eq!(map.apply("NP"), "NP");
    assert_eq!(map.apply("NN"), "_NN_");
  }

  #[test]
  fn test_phrase_label_used_as_pos() {
    let trees = parse_trees(
      "(S (PP (IN in) (NP (NN town))) (VP (VBD slept)))
       (S (NP (PRP it)) (VP (VBD gave) (PP up)))",
    )
    .unwrap();
    let sets = SymbolSets::classify(&trees);
    assert!(sets.ambiguous().any(|s| s == "PP"));

    let map = SymbolMap::disambiguate(&sets).unwrap();
    assert_eq!(map.get("PP"), Some("_PP_"));
    assert_eq!(map.get("S"), None);
    assert_eq!(map.get("VP"), None);
  }

  #[test]
  fn test_replacement_collision_is_fatal() {
    let trees = parse_trees("(S (_NN_ (NN dog)) (VP (VBD ran)))").unwrap();
    let err = SymbolMap::disambiguate(&SymbolSets::classify(&trees)).unwrap_err();
    match err {
      Error::AmbiguousSymbol {
        symbol,
        replacement,
      } => {
        assert_eq!(symbol, "NN");
        assert_eq!(replacement, "_NN_");
      }
      e => panic!("unexpected error {}", e),
    }
  }

  #[test]
  fn test_replacement_equal_to_token_is_allowed() {
    let trees = parse_trees("(S (NP (NN _NN_)) (VP (VBD ran)))").unwrap();
    let map = SymbolMap::disambiguate(&SymbolSets::classify(&trees)).unwrap();
    assert_eq!(map.get("NN"), Some("_NN_"));
  }

  #[test]
  fn test_placeholder() {
    assert_eq!(SymbolMap::placeholder("_PP_"), "PP");
    assert_eq!(SymbolMap::placeholder("_-NONE-_"), "-NONE-");
    assert_eq!(SymbolMap::placeholder("NP"), "NP");
    assert_eq!(SymbolMap::placeholder("_"), "_");
    assert_eq!(SymbolMap::placeholder("__"), "__");
    assert_eq!(SymbolMap::placeholder("_NP"), "_NP");
    assert!(SymbolMap::is_wrapped("_PP_"));
    assert!(!SymbolMap::is_wrapped("NP"));
    assert!(!SymbolMap::is_wrapped("__"));
  }
}
