use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::pipeline::EvalCorpus;

pub fn write_grammar<W: Write>(w: &mut W, grammar: &Grammar) -> io::Result<()> {
  write!(w, "{}", grammar)
}

/// One sentence per line, tokens joined by single spaces
pub fn write_sentences<W: Write>(w: &mut W, corpus: &EvalCorpus) -> io::Result<()> {
  for item in corpus.items.iter() {
    writeln!(w, "{}", item.sentence.join(" "))?;
  }
  Ok(())
}

/// One tree per line, in flat bracketed form
pub fn write_trees<W: Write>(w: &mut W, corpus: &EvalCorpus) -> io::Result<()> {
  for item in corpus.items.iter() {
    writeln!(w, "{}", item.tree)?;
  }
  Ok(())
}

/// An output file that is written beside its target and only moved into
/// place by `commit`. Dropping it uncommitted leaves nothing behind.
#[derive(Debug)]
pub struct Destination {
  path: PathBuf,
  file: BufWriter<NamedTempFile>,
}

impl Destination {
  pub fn create(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let parent_dir = path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."));
    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| Error::io(path, e))?;

    Ok(Self {
      path: path.to_path_buf(),
      file: BufWriter::new(temp_file),
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Runs a writer against the file, attributing failures to this destination
  pub fn write_with<F>(&mut self, f: F) -> Result<()>
  where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> io::Result<()>,
  {
    f(&mut self.file).map_err(|e| Error::io(&self.path, e))
  }

  pub fn commit(self) -> Result<()> {
    let Self { path, file } = self;
    let temp_file = file.into_inner().map_err(|e| Error::io(&path, e.into_error()))?;
    temp_file.persist(&path).map_err(|e| Error::io(&path, e.error))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipeline::evaluation_corpus;
  use crate::symbols::SymbolMap;
  use crate::syntree::SynTree;
  use std::fs;

  fn corpus() -> EvalCorpus {
    let trees = vec![
      "(S (NP (NN a)) (VP (VB b)))".parse::<SynTree>().unwrap(),
      "(S (NP (DT a) (NN b)) (VP (VB c)))".parse::<SynTree>().unwrap(),
    ];
    evaluation_corpus(&trees, &SymbolMap::default(), 30).unwrap()
  }

  #[test]
  fn test_write_sentences_and_trees() {
    let corpus = corpus();

    let mut out = Vec::new();
    write_sentences(&mut out, &corpus).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "NN VB\nDT NN VB\n");

    let mut out = Vec::new();
    write_trees(&mut out, &corpus).unwrap();
    assert_eq!(
      String::from_utf8(out).unwrap(),
      "(S (NP (NN NN)) (VP (VB VB)))\n(S (NP (DT DT) (NN NN)) (VP (VB VB)))\n"
    );
  }

  #[test]
  fn test_destination_appears_only_on_commit() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.txt");

    let mut dest = Destination::create(&target).unwrap();
    dest.write_with(|w| writeln!(w, "hello")).unwrap();
    assert!(!target.exists());
    dest.commit().unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");

    let mut dest = Destination::create(&target).unwrap();
    dest.write_with(|w| writeln!(w, "partial")).unwrap();
    drop(dest);
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
  }

  #[test]
  fn test_unwritable_destination_names_path() {
    let err = Destination::create("no/such/dir/grammar.pcfg").unwrap_err();
    assert!(err.to_string().contains("grammar.pcfg"));
  }
}
