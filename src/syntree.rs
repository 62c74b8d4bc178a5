use std::fmt;

/// A constituency tree. Tokens only ever appear under a preterminal, so
/// there is no bare leaf variant.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SynTree {
  /// An internal node: label and ordered subtrees
  Branch(String, Vec<SynTree>),
  /// A POS node: tag and the single token it dominates
  Preterminal(String, String),
}

impl SynTree {
  pub fn branch(label: impl Into<String>, children: Vec<SynTree>) -> Self {
    Self::Branch(label.into(), children)
  }

  pub fn preterminal(tag: impl Into<String>, token: impl Into<String>) -> Self {
    Self::Preterminal(tag.into(), token.into())
  }

  pub fn label(&self) -> &str {
    match self {
      Self::Branch(label, _) | Self::Preterminal(label, _) => label,
    }
  }

  pub fn is_preterminal(&self) -> bool {
    matches!(self, Self::Preterminal(_, _))
  }

  pub fn is_branch(&self) -> bool {
    matches!(self, Self::Branch(_, _))
  }

  pub fn get_branch(&self) -> Option<(&str, &[SynTree])> {
    match self {
      Self::Branch(label, children) => Some((label, children)),
      _ => None,
    }
  }

  /// The tokens of the tree, in order
  pub fn leaves(&self) -> Vec<&str> {
    let mut leaves = Vec::new();
    self.collect_leaves(&mut leaves);
    leaves
  }

  fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
    match self {
      Self::Preterminal(_, token) => leaves.push(token),
      Self::Branch(_, children) => {
        for child in children {
          child.collect_leaves(leaves);
        }
      }
    }
  }

  pub fn preterminal_count(&self) -> usize {
    match self {
      Self::Preterminal(_, _) => 1,
      Self::Branch(_, children) => children.iter().map(Self::preterminal_count).sum(),
    }
  }

  /// Builds a new tree with every label passed through `map_label`. Tokens are
  /// rebuilt by `map_token`, which sees the already-mapped tag and the old token,
  /// and is called once per preterminal, left to right.
  pub fn map<F, G>(&self, map_label: &F, map_token: &mut G) -> SynTree
  where
    F: Fn(&str) -> String,
    G: FnMut(&str, &str) -> String,
  {
    match self {
      Self::Branch(label, children) => {
        let mut mapped = Vec::with_capacity(children.len());
        for child in children {
          mapped.push(child.map(map_label, map_token));
        }
        SynTree::Branch(map_label(label), mapped)
      }
      Self::Preterminal(tag, token) => {
        let tag = map_label(tag);
        let token = map_token(&tag, token);
        SynTree::Preterminal(tag, token)
      }
    }
  }
}

/// Single-line bracketed form: `(S (NP (DT the) (NN dog)) (VP (VBD ran)))`
impl fmt::Display for SynTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Preterminal(tag, token) => write!(f, "({} {})", tag, token),
      Self::Branch(label, children) => {
        write!(f, "({} ", label)?;
        for (idx, child) in children.iter().enumerate() {
          if idx > 0 {
            write!(f, " ")?;
          }
          write!(f, "{}", child)?;
        }
        write!(f, ")")
      }
    }
  }
}
