use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a grammar induction run
#[derive(Debug, Error)]
pub enum Error {
  /// The marker-wrapped replacement for an ambiguous symbol is itself
  /// already a nonterminal or POS symbol
  #[error("cannot make nonterminal unambiguous: {symbol} (replacement {replacement} is already in use)")]
  AmbiguousSymbol { symbol: String, replacement: String },

  #[error("tree has a root node with no children")]
  EmptyTree,

  #[error("malformed tree #{index}: {message}")]
  MalformedTree { index: usize, message: String },

  #[error("treebank syntax: {message}")]
  Parse { message: String },

  #[error("{}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl Error {
  pub(crate) fn parse(message: impl Into<String>) -> Self {
    Self::Parse {
      message: message.into(),
    }
  }

  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
