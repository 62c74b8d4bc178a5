use tracing::{debug, info};

use crate::config::Config;
use crate::emit::{self, Destination};
use crate::error::{Error, Result};
use crate::grammar::{Grammar, RuleCounts};
use crate::normalize::normalize;
use crate::parse_treebank::read_treebank;
use crate::substitute::{Substituted, substitute};
use crate::symbols::{SymbolMap, SymbolSets};
use crate::syntree::SynTree;

/// State carried from the classification pass through counting
#[derive(Debug, Default, Clone)]
pub struct Induction {
  pub symbols: SymbolSets,
  pub map: SymbolMap,
  pub counts: RuleCounts,
}

impl Induction {
  /// First pass: collect the alphabets and settle the symbol map
  pub fn classify(trees: &[SynTree]) -> Result<Self> {
    let symbols = SymbolSets::classify(trees);
    info!(
      trees = trees.len(),
      terminals = symbols.terminals.len(),
      nonterminals = symbols.nonterminals.len(),
      pos = symbols.pos.len(),
      "classified symbols"
    );
    let map = SymbolMap::disambiguate(&symbols)?;
    Ok(Self {
      symbols,
      map,
      counts: RuleCounts::new(),
    })
  }

  /// Second pass, one tree at a time. `index` is 1-based, for errors.
  pub fn count(&mut self, tree: &SynTree, index: usize) -> Result<()> {
    let out = transform(tree, &self.map, index)?;
    self.counts.add_tree(&out.tree);
    Ok(())
  }

  pub fn count_all(&mut self, trees: &[SynTree]) -> Result<()> {
    for (idx, tree) in trees.iter().enumerate() {
      self.count(tree, idx + 1)?;
    }
    info!(rules = self.counts.len(), "counted rules");
    Ok(())
  }

  /// Root label of the first tree, renamed if it was ambiguous
  pub fn start(&self) -> &str {
    let start = self.symbols.start.as_deref().unwrap_or_default();
    self.map.apply(start)
  }

  pub fn grammar(&self) -> Grammar {
    Grammar::estimate(self.start(), &self.counts)
  }
}

/// Both passes over a training corpus
pub fn induce(trees: &[SynTree]) -> Result<(Grammar, SymbolMap)> {
  let mut induction = Induction::classify(trees)?;
  induction.count_all(trees)?;
  Ok((induction.grammar(), induction.map))
}

/// Normalizes and renames one tree, the same way for training and evaluation
fn transform(tree: &SynTree, map: &SymbolMap, index: usize) -> Result<Substituted> {
  let normal = normalize(tree).map_err(|e| match e {
    Error::EmptyTree => Error::MalformedTree {
      index,
      message: e.to_string(),
    },
    e => e,
  })?;
  let out = substitute(&normal, map);
  if let Some(label) = unfillable_branch(&out.tree) {
    return Err(Error::MalformedTree {
      index,
      message: format!("empty branch '{}' has no POS placeholder to stand in for it", label),
    });
  }
  Ok(out)
}

/// The first empty branch whose label isn't a renamed POS tag. Counting it
/// would give the rule `X -> X`.
fn unfillable_branch(tree: &SynTree) -> Option<&str> {
  match tree {
    SynTree::Preterminal(_, _) => None,
    SynTree::Branch(label, children) if children.is_empty() => {
      (!SymbolMap::is_wrapped(label)).then_some(label.as_str())
    }
    SynTree::Branch(_, children) => children.iter().find_map(unfillable_branch),
  }
}

/// Transformed sentences that passed the length filter, in corpus order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EvalCorpus {
  pub items: Vec<Substituted>,
  /// How many sentences were longer than the limit
  pub rejected: usize,
}

pub fn evaluation_corpus(
  trees: &[SynTree],
  map: &SymbolMap,
  max_length: usize,
) -> Result<EvalCorpus> {
  let mut corpus = EvalCorpus::default();
  for (idx, tree) in trees.iter().enumerate() {
    let out = transform(tree, map, idx + 1)?;
    if out.sentence.len() <= max_length {
      corpus.items.push(out);
    } else {
      debug!(tree = idx + 1, length = out.sentence.len(), "sentence too long");
      corpus.rejected += 1;
    }
  }
  info!(
    kept = corpus.items.len(),
    rejected = corpus.rejected,
    max_length,
    "built evaluation corpus"
  );
  Ok(corpus)
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
  pub trees: usize,
  pub rules: usize,
  pub renamed: usize,
  pub start: String,
  pub eval_kept: Option<usize>,
}

/// Reads the treebank(s), writes the grammar and any evaluation outputs.
/// Outputs are only moved into place once everything has succeeded.
pub fn run(config: &Config) -> Result<Summary> {
  let mut grammar_out = Destination::create(&config.grammar)?;
  let mut sentences_out = config.sentences.as_ref().map(Destination::create).transpose()?;
  let mut trees_out = config.trees.as_ref().map(Destination::create).transpose()?;

  let trees = read_treebank(&config.treebank)?;
  let mut induction = Induction::classify(&trees)?;
  induction.count_all(&trees)?;
  let grammar = induction.grammar();
  grammar_out.write_with(|w| emit::write_grammar(w, &grammar))?;

  let mut eval_kept = None;
  if config.wants_eval() {
    let eval_path = config.eval_treebank();
    let read_trees;
    let eval_trees = if eval_path == config.treebank.as_path() {
      &trees
    } else {
      read_trees = read_treebank(eval_path)?;
      &read_trees
    };

    let corpus = evaluation_corpus(eval_trees, &induction.map, config.max_length)?;
    if let Some(out) = sentences_out.as_mut() {
      out.write_with(|w| emit::write_sentences(w, &corpus))?;
    }
    if let Some(out) = trees_out.as_mut() {
      out.write_with(|w| emit::write_trees(w, &corpus))?;
    }
    eval_kept = Some(corpus.items.len());
  }

  grammar_out.commit()?;
  for out in [sentences_out, trees_out].into_iter().flatten() {
    let path = out.path().display().to_string();
    out.commit()?;
    debug!(%path, "wrote output");
  }

  Ok(Summary {
    trees: trees.len(),
    rules: grammar.rules.len(),
    renamed: induction.map.len(),
    start: grammar.start,
    eval_kept,
  })
}
