/// Simple recursive-descent parsing of bracketed (Penn Treebank style) files
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::error::{Error, Result};
use crate::syntree::SynTree;

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str)>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// A bracket as written, before we know whether it is a POS node or a phrase
#[derive(Debug)]
struct RawNode {
  label: String,
  children: Vec<RawChild>,
}

#[derive(Debug)]
enum RawChild {
  Node(RawNode),
  Token(String),
}

impl RawNode {
  /// Resolves the bracket into a `SynTree`. `index` is the 1-based position of
  /// the enclosing tree in the file, for error messages.
  fn into_tree(self, index: usize) -> Result<SynTree> {
    let RawNode { label, mut children } = self;
    if matches!(children.as_slice(), [RawChild::Token(_)]) {
      if let Some(RawChild::Token(token)) = children.pop() {
        return Ok(SynTree::Preterminal(label, token));
      }
    }

    let mut subtrees = Vec::with_capacity(children.len());
    for child in children {
      match child {
        RawChild::Node(node) => subtrees.push(node.into_tree(index)?),
        RawChild::Token(token) => {
          return Err(Error::MalformedTree {
            index,
            message: format!(
              "token '{}' under '{}' has siblings; tokens must sit alone under a POS tag",
              token, label
            ),
          });
        }
      }
    }
    Ok(SynTree::Branch(label, subtrees))
  }

  /// The usual PTB outer bracket `( (S ...) )` has no label, strip it
  fn strip_empty_root(mut self) -> RawNode {
    if self.label.is_empty() && self.children.len() == 1 {
      match self.children.pop() {
        Some(RawChild::Node(node)) => return node,
        Some(token) => self.children.push(token),
        None => {}
      }
    }
    self
  }
}

/// Try to consume a regex, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<&'a str>> {
  if let Some(m) = re.find(s) {
    if m.start() > 0 {
      return (None, s);
    }
    let (_, rest) = s.split_at(m.end());
    (Some(m.as_str()), rest)
  } else {
    (None, s)
  }
}

/// Try to consume a char, returning None if it doesn't match
fn optional_char(c: char, s: &str) -> Infallible<'_, Option<char>> {
  match s.strip_prefix(c) {
    Some(rest) => (Some(c), rest),
    None => (None, s),
  }
}

/// Try to consume a char, failing if it doesn't match
fn needed_char(c: char, s: &str) -> ParseResult<'_, char> {
  if let (Some(c), rest) = optional_char(c, s) {
    Ok((c, rest))
  } else {
    Err(Error::parse(format!("couldn't match {} at {}", c, snippet(s))))
  }
}

/// Skips whitespace, including newlines
fn skip_whitespace(s: &str) -> &str {
  regex_static!(WHITESPACE, r"^\s+");
  optional_re(&WHITESPACE, s).1
}

/// The start of `s`, for error messages
fn snippet(s: &str) -> &str {
  match s.char_indices().nth(40) {
    Some((idx, _)) => &s[..idx],
    None if s.is_empty() => "end of input",
    None => s,
  }
}

/// Expands PTB leaf shorthands: `(,)` becomes `(, ,)` and `(tag word root)`
/// becomes `(tag word)`
fn expand_shorthand(s: &str) -> String {
  regex_static!(SINGLE_CHAR_LEAF, r"\(([^\s()])\)");
  regex_static!(ROOTED_LEAF, r"\(([^\s()]+) ([^\s()]+) [^\s()]+\)");
  let s = SINGLE_CHAR_LEAF.replace_all(s, "($1 $1)");
  ROOTED_LEAF.replace_all(&s, "($1 $2)").into_owned()
}

/// A label or token: anything up to whitespace or a paren
fn parse_symbol(s: &str) -> Infallible<'_, Option<&str>> {
  regex_static!(SYMBOL, r"^[^\s()]+");
  optional_re(&SYMBOL, s)
}

/// `(label child*)`, where the label may be absent
fn parse_node(s: &str) -> ParseResult<'_, RawNode> {
  let (_, s) = needed_char('(', s)?;
  let s = skip_whitespace(s);
  let (label, s) = parse_symbol(s);

  let mut children = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_whitespace(rem);
    if let (Some(_), s) = optional_char(')', rem) {
      let node = RawNode {
        label: label.unwrap_or_default().to_string(),
        children,
      };
      return Ok((node, s));
    }
    if rem.starts_with('(') {
      let (child, s) = parse_node(rem)?;
      children.push(RawChild::Node(child));
      rem = s;
    } else if let (Some(token), s) = parse_symbol(rem) {
      children.push(RawChild::Token(token.to_string()));
      rem = s;
    } else {
      return Err(Error::parse(format!(
        "unbalanced parentheses in tree labelled '{}'",
        label.unwrap_or_default()
      )));
    }
  }
}

/// Parses every top-level bracket of `s` into a tree, in order
pub fn parse_trees(s: &str) -> Result<Vec<SynTree>> {
  let source = expand_shorthand(s);
  let mut trees = Vec::new();
  let mut rem = source.as_str();
  loop {
    rem = skip_whitespace(rem);
    if rem.is_empty() {
      return Ok(trees);
    }
    let (node, s) = parse_node(rem).map_err(|e| match e {
      Error::Parse { message } => Error::parse(format!("tree #{}: {}", trees.len() + 1, message)),
      e => e,
    })?;
    trees.push(node.strip_empty_root().into_tree(trees.len() + 1)?);
    rem = s;
  }
}

/// Reads and parses a whole treebank file
pub fn read_treebank(path: impl AsRef<Path>) -> Result<Vec<SynTree>> {
  let path = path.as_ref();
  let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
  let trees = parse_trees(&source)?;
  info!(path = %path.display(), trees = trees.len(), "read treebank");
  Ok(trees)
}

impl FromStr for SynTree {
  type Err = Error;

  /// Parses exactly one bracketed tree
  fn from_str(s: &str) -> Result<Self> {
    let mut trees = parse_trees(s)?;
    match trees.len() {
      1 => Ok(trees.remove(0)),
      n => Err(Error::parse(format!("expected a single tree, found {}", n))),
    }
  }
}
