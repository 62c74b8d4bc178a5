use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use treebank2pcfg::Config;
use treebank2pcfg::config::DEFAULT_MAX_LENGTH;

/// Learns an unlexicalized PCFG in Chomsky Normal Form from a Penn Treebank file
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
  /// The Penn Treebank file to induce the grammar from
  #[arg(short, long, value_name = "FILE")]
  penn: PathBuf,

  /// File to write the PCFG to
  #[arg(short, long, value_name = "FILE")]
  grammar: PathBuf,

  /// Treebank to read the evaluation sentences and trees from (defaults to --penn)
  #[arg(short = 'e', long, value_name = "FILE")]
  penn_eval: Option<PathBuf>,

  /// File to write the evaluation sentences to
  #[arg(short, long, value_name = "FILE")]
  sentences: Option<PathBuf>,

  /// File to write the evaluation trees to, one per line
  #[arg(short, long, value_name = "FILE")]
  trees: Option<PathBuf>,

  /// Maximum length of the evaluation sentences
  #[arg(short, long, value_name = "N", default_value_t = DEFAULT_MAX_LENGTH)]
  length: usize,
}

impl Cli {
  fn into_config(self) -> Config {
    let mut config = Config::new(self.penn, self.grammar).with_max_length(self.length);
    if let Some(path) = self.penn_eval {
      config = config.with_eval_treebank(path);
    }
    if let Some(path) = self.sentences {
      config = config.with_sentences(path);
    }
    if let Some(path) = self.trees {
      config = config.with_trees(path);
    }
    config
  }
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let config = Cli::parse().into_config();
  let summary = treebank2pcfg::run(&config)
    .with_context(|| format!("failed to induce a grammar from {}", config.treebank.display()))?;

  info!(
    trees = summary.trees,
    rules = summary.rules,
    renamed = summary.renamed,
    start = %summary.start,
    grammar = %config.grammar.display(),
    "wrote grammar"
  );
  if let Some(kept) = summary.eval_kept {
    info!(
      sentences = kept,
      max_length = config.max_length,
      eval = %config.eval_treebank().display(),
      "wrote evaluation corpus"
    );
  }

  Ok(())
}
