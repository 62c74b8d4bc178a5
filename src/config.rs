use std::path::{Path, PathBuf};

/// Sentences longer than this are left out of the evaluation corpus by default
pub const DEFAULT_MAX_LENGTH: usize = 30;

/// Where a run reads from and writes to
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Treebank the grammar is induced from
  pub treebank: PathBuf,
  /// Destination of the grammar
  pub grammar: PathBuf,
  /// Treebank for the evaluation corpus, if not the training treebank
  pub eval_treebank: Option<PathBuf>,
  /// Destination of the evaluation sentences, one per line
  pub sentences: Option<PathBuf>,
  /// Destination of the evaluation trees, one per line
  pub trees: Option<PathBuf>,
  /// Longest evaluation sentence kept, in tokens
  pub max_length: usize,
}

impl Config {
  pub fn new(treebank: impl Into<PathBuf>, grammar: impl Into<PathBuf>) -> Self {
    Self {
      treebank: treebank.into(),
      grammar: grammar.into(),
      eval_treebank: None,
      sentences: None,
      trees: None,
      max_length: DEFAULT_MAX_LENGTH,
    }
  }

  pub fn with_eval_treebank(mut self, path: impl Into<PathBuf>) -> Self {
    self.eval_treebank = Some(path.into());
    self
  }

  pub fn with_sentences(mut self, path: impl Into<PathBuf>) -> Self {
    self.sentences = Some(path.into());
    self
  }

  pub fn with_trees(mut self, path: impl Into<PathBuf>) -> Self {
    self.trees = Some(path.into());
    self
  }

  pub fn with_max_length(mut self, max_length: usize) -> Self {
    self.max_length = max_length;
    self
  }

  pub fn eval_treebank(&self) -> &Path {
    self.eval_treebank.as_deref().unwrap_or(&self.treebank)
  }

  /// Whether any evaluation output was asked for
  pub fn wants_eval(&self) -> bool {
    self.sentences.is_some() || self.trees.is_some()
  }
}

#[test]
fn test_defaults() {
  let config = Config::new("wsj.mrg", "wsj.pcfg");
  assert_eq!(config.max_length, 30);
  assert_eq!(config.eval_treebank(), Path::new("wsj.mrg"));
  assert!(!config.wants_eval());

  let config = config
    .with_eval_treebank("dev.mrg")
    .with_trees("dev.trees")
    .with_max_length(40);
  assert_eq!(config.eval_treebank(), Path::new("dev.mrg"));
  assert!(config.wants_eval());
  assert_eq!(config.max_length, 40);
}
