use crate::symbols::SymbolMap;
use crate::syntree::SynTree;

/// A normalized tree after renaming, and the sentence read off its leaves
#[derive(Debug, Clone, PartialEq)]
pub struct Substituted {
  pub tree: SynTree,
  pub sentence: Vec<String>,
}

/// Renames every label through `map` and replaces each token with the
/// placeholder of its (renamed) POS tag, so `(NN dog)` becomes `(_NN_ NN)`.
/// The sentence holds the placeholders in order, one per preterminal.
pub fn substitute(tree: &SynTree, map: &SymbolMap) -> Substituted {
  let mut sentence = Vec::with_capacity(tree.preterminal_count());
  let tree = tree.map(
    &|label: &str| map.apply(label).to_string(),
    &mut |tag: &str, _token: &str| {
      let placeholder = SymbolMap::placeholder(tag).to_string();
      sentence.push(placeholder.clone());
      placeholder
    },
  );
  Substituted { tree, sentence }
}
