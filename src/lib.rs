#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod emit;
pub mod error;
pub mod grammar;
pub mod normalize;
pub mod parse_treebank;
pub mod pipeline;
pub mod rules;
pub mod substitute;
pub mod symbols;
pub mod syntree;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::grammar::{Grammar, RuleCounts};
pub use crate::pipeline::{Induction, induce, run};
pub use crate::rules::Rule;
pub use crate::syntree::SynTree;

#[test]
fn test_single_sentence_grammar() {
  let tree: SynTree = "(S (NP (DT the) (NN dog)) (VP (VBD ran)))".parse().unwrap();
  let (g, _) = induce(&[tree]).unwrap();

  assert_eq!(g.start, "S");
  assert_eq!(
    g.to_string(),
    "S\n\
     NP -> _DT_ _NN_ [1.0]\n\
     S -> NP VP [1.0]\n\
     VP -> _VBD_ [1.0]\n\
     _DT_ -> DT [1.0]\n\
     _NN_ -> NN [1.0]\n\
     _VBD_ -> VBD [1.0]\n"
  );
}

#[test]
fn test_phrase_label_as_pos_is_never_bare() {
  let trees = parse_treebank::parse_trees(
    "(S (NP (PRP she)) (VP (VBD looked) (PP (IN at) (NP (PRP it)))))
     (S (NP (PRP she)) (VP (VBD gave) (PP up)))",
  )
  .unwrap();
  let (g, _) = induce(&trees).unwrap();

  // the phrase and the POS uses of PP are renamed alike
  assert!(g.lhs_symbols().contains("_PP_"));
  assert!(!g.lhs_symbols().contains("PP"));
  assert_eq!(
    g.probability(&Rule::new("_PP_", vec!["PP".to_string()])),
    Some(0.5)
  );
  assert_eq!(
    g.probability(&Rule::new("_PP_", vec!["_IN_".to_string(), "NP".to_string()])),
    Some(0.5)
  );
}
