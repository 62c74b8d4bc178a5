//! Chomsky Normal Form for constituency trees.
//!
//! Two passes, both returning new trees:
//!
//! 1. [`binarize`] right-factors every node with more than two children. With
//!    `A -> B C D E` and a Markov order of 2 this gives
//!
//!    ```text
//!    A         -> B A|<C-D>
//!    A|<C-D>   -> C A|<D-E>
//!    A|<D-E>   -> D E
//!    ```
//!
//!    Each synthetic label names the parent and at most `markov_order` labels
//!    of the siblings still to come, starting with the one it introduces.
//!
//! 2. [`collapse_unary`] merges `A -> B` chains, where `B` is itself a phrase,
//!    into a single `A+B` node. A phrase over a single POS node is left alone,
//!    as is the root, so every tree keeps its plain start label.

use crate::error::{Error, Result};
use crate::syntree::SynTree;

/// Sibling history kept in synthetic binarization labels
pub const MARKOV_ORDER: usize = 2;

/// Joins the labels of a collapsed unary chain
pub const UNARY_JOIN: char = '+';

/// Binarizes, then collapses unary chains. Fails on a root with no children.
pub fn normalize(tree: &SynTree) -> Result<SynTree> {
  if let SynTree::Branch(_, children) = tree {
    if children.is_empty() {
      return Err(Error::EmptyTree);
    }
  }
  Ok(collapse_unary(&binarize(tree, MARKOV_ORDER)))
}

pub fn binarize(tree: &SynTree, markov_order: usize) -> SynTree {
  match tree {
    SynTree::Preterminal(_, _) => tree.clone(),
    SynTree::Branch(label, children) => {
      let children = children
        .iter()
        .map(|c| binarize(c, markov_order))
        .collect::<Vec<_>>();
      if children.len() <= 2 {
        SynTree::Branch(label.clone(), children)
      } else {
        factor_right(label, children, markov_order)
      }
    }
  }
}

fn markov_label(parent: &str, siblings: &[String]) -> String {
  format!("{}|<{}>", parent, siblings.join("-"))
}

/// Builds the right-branching spine from the bottom up. Expects at least 3 children.
fn factor_right(parent: &str, mut children: Vec<SynTree>, markov_order: usize) -> SynTree {
  let n = children.len();
  let labels = children
    .iter()
    .map(|c| c.label().to_string())
    .collect::<Vec<_>>();
  let window = |i: usize| &labels[i..(i + markov_order).min(n)];

  let last_two = children.split_off(n - 2);
  let mut spine = SynTree::Branch(markov_label(parent, window(n - 2)), last_two);
  for i in (1..n - 2).rev() {
    // children is [c0 ..= ci] here
    let Some(child) = children.pop() else {
      unreachable!("factor_right called with fewer than 3 children")
    };
    spine = SynTree::Branch(markov_label(parent, window(i)), vec![child, spine]);
  }

  children.push(spine);
  SynTree::Branch(parent.to_string(), children)
}

/// Merges phrase-over-phrase unary chains into `A+B` nodes, below the root
pub fn collapse_unary(tree: &SynTree) -> SynTree {
  match tree {
    SynTree::Branch(label, children) if children.len() == 1 => {
      SynTree::Branch(label.clone(), vec![collapse_chain(&children[0])])
    }
    _ => collapse_chain(tree),
  }
}

fn collapse_chain(tree: &SynTree) -> SynTree {
  match tree {
    SynTree::Preterminal(_, _) => tree.clone(),
    SynTree::Branch(label, children) => {
      let mut label = label.clone();
      let mut children = children.as_slice();
      while let [SynTree::Branch(child_label, grandchildren)] = children {
        label.push(UNARY_JOIN);
        label.push_str(child_label);
        children = grandchildren.as_slice();
      }
      SynTree::Branch(label, children.iter().map(collapse_chain).collect())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse_treebank::parse_trees;

  fn norm(s: &str) -> String {
    normalize(&s.parse().unwrap()).unwrap().to_string()
  }

  /// Every branch has two children, or one POS child. The root may also have a
  /// single phrase child.
  fn assert_cnf(tree: &SynTree, is_root: bool) {
    if let Some((label, children)) = tree.get_branch() {
      match children {
        [_, _] => {}
        [only] if only.is_preterminal() || is_root => {}
        _ => panic!("{} is not in CNF at {}", tree, label),
      }
      for child in children {
        assert_cnf(child, false);
      }
    }
  }

  #[test]
  fn test_right_factored_golden() {
    assert_eq!(
      norm("(A (B b) (C c) (D d) (E e))"),
      "(A (B b) (A|<C-D> (C c) (A|<D-E> (D d) (E e))))"
    );
    assert_eq!(
      norm("(A (B b) (C c) (D d))"),
      "(A (B b) (A|<C-D> (C c) (D d)))"
    );
  }

  #[test]
  fn test_markov_window_is_bounded() {
    let tree: SynTree = "(NP (DT a) (JJ b) (JJ c) (NN d) (NNS e))".parse().unwrap();
    assert_eq!(
      binarize(&tree, 1).to_string(),
      "(NP (DT a) (NP|<JJ> (JJ b) (NP|<JJ> (JJ c) (NP|<NN> (NN d) (NNS e)))))"
    );
    assert_eq!(
      binarize(&tree, MARKOV_ORDER).to_string(),
      "(NP (DT a) (NP|<JJ-JJ> (JJ b) (NP|<JJ-NN> (JJ c) (NP|<NN-NNS> (NN d) (NNS e)))))"
    );
  }

  #[test]
  fn test_cnf_tree_is_unchanged() {
    let s = "(S (NP (DT the) (NN dog)) (VP (VBD ran)))";
    assert_eq!(norm(s), s);
  }

  #[test]
  fn test_unary_chain_collapses_above_pos() {
    assert_eq!(
      norm("(S (NP (NP (NNS dogs))) (VP (VB bark)))"),
      "(S (NP+NP (NNS dogs)) (VP (VB bark)))"
    );
    assert_eq!(
      norm("(S (X (Y (Z (A a) (B b)))) (C c))"),
      "(S (X+Y+Z (A a) (B b)) (C c))"
    );
  }

  #[test]
  fn test_root_is_never_merged() {
    assert_eq!(
      norm("(ROOT (S (VP (VB go))))"),
      "(ROOT (S+VP (VB go)))"
    );
    assert_eq!(norm("(X (Y y))"), "(X (Y y))");
    assert_eq!(norm("(X y)"), "(X y)");
  }

  #[test]
  fn test_synthetic_labels_use_original_child_labels() {
    // C is collapsed into C+D after binarization named the spine
    assert_eq!(
      norm("(A (B b) (C (D (E e) (F f))) (G g))"),
      "(A (B b) (A|<C-G> (C+D (E e) (F f)) (G g)))"
    );
  }

  #[test]
  fn test_empty_root_is_an_error() {
    let tree = SynTree::branch("S", vec![]);
    assert!(matches!(normalize(&tree), Err(Error::EmptyTree)));

    // a degenerate subtree further down is passed through
    let tree = SynTree::branch(
      "S",
      vec![SynTree::branch("NP", vec![]), SynTree::preterminal("VB", "go")],
    );
    assert_eq!(normalize(&tree).unwrap(), tree);
  }

  #[test]
  fn test_yield_and_shape_on_sample_corpus() {
    let trees = parse_trees(include_str!("../corpora/sample.mrg")).unwrap();
    assert!(!trees.is_empty());
    for tree in trees.iter() {
      let normal = normalize(tree).unwrap();
      assert_eq!(normal.leaves(), tree.leaves());
      assert_cnf(&normal, true);
      assert_eq!(normalize(&normal).unwrap(), normal);
    }
  }
}
