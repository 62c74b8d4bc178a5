use std::fmt;

use crate::symbols::SymbolMap;
use crate::syntree::SynTree;

/// A production `lhs -> rhs`. Compared structurally, so equal rules read off
/// different trees count together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rule {
  pub lhs: String,
  pub rhs: Vec<String>,
}

impl Rule {
  pub fn new(lhs: impl Into<String>, rhs: Vec<String>) -> Self {
    Self {
      lhs: lhs.into(),
      rhs,
    }
  }

  pub fn len(&self) -> usize {
    self.rhs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// An empty right-hand side becomes the lhs's own placeholder terminal,
  /// so no rule without symbols is ever counted. Only meaningful for a
  /// wrapped lhs, otherwise the rule would point back at itself.
  pub fn fill_empty(mut self) -> Self {
    if self.is_empty() {
      self.rhs.push(SymbolMap::placeholder(&self.lhs).to_string());
    }
    self
  }

  /// Every rule used in `tree`, top-down and left to right
  pub fn read_off(tree: &SynTree) -> Vec<Rule> {
    let mut rules = Vec::new();
    Self::collect(tree, &mut rules);
    rules
  }

  fn collect(tree: &SynTree, rules: &mut Vec<Rule>) {
    match tree {
      SynTree::Preterminal(tag, token) => rules.push(Rule::new(tag.as_str(), vec![token.clone()])),
      SynTree::Branch(label, children) => {
        let rhs = children.iter().map(|c| c.label().to_string()).collect();
        rules.push(Rule::new(label.as_str(), rhs).fill_empty());
        for child in children {
          Self::collect(child, rules);
        }
      }
    }
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for symbol in self.rhs.iter() {
      write!(f, " {}", symbol)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_read_off_order() {
    let tree: SynTree = "(S (NP (_DT_ DT) (_NN_ NN)) (VP (_VBD_ VBD)))".parse().unwrap();
    let rules = Rule::read_off(&tree)
      .iter()
      .map(|r| r.to_string())
      .collect::<Vec<_>>();

    assert_eq!(
      rules,
      vec![
        "S -> NP VP",
        "NP -> _DT_ _NN_",
        "_DT_ -> DT",
        "_NN_ -> NN",
        "VP -> _VBD_",
        "_VBD_ -> VBD",
      ]
    );
  }

  #[test]
  fn test_empty_rhs_is_filled_with_placeholder() {
    let tree = SynTree::branch(
      "S",
      vec![SynTree::branch("_X_", vec![]), SynTree::preterminal("_Y_", "Y")],
    );
    let rules = Rule::read_off(&tree);

    assert_eq!(rules[1], Rule::new("_X_", vec!["X".to_string()]));
    assert!(rules.iter().all(|r| !r.is_empty()));
    assert!(rules.iter().all(|r| r.rhs != [r.lhs.clone()]));
  }
}
