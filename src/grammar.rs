use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::rules::Rule;
use crate::syntree::SynTree;

/// How often each rule was seen, and how often each lhs was expanded at all.
/// The total for an lhs is always the sum of its rules' counts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RuleCounts {
  rules: BTreeMap<Rule, u64>,
  lhs_totals: BTreeMap<String, u64>,
}

impl RuleCounts {
  pub fn new() -> Self {
    Default::default()
  }

  pub fn add(&mut self, rule: Rule) {
    let rule = rule.fill_empty();
    *self.lhs_totals.entry(rule.lhs.clone()).or_insert(0) += 1;
    *self.rules.entry(rule).or_insert(0) += 1;
  }

  pub fn add_tree(&mut self, tree: &SynTree) {
    for rule in Rule::read_off(tree) {
      self.add(rule);
    }
  }

  pub fn count(&self, rule: &Rule) -> u64 {
    self.rules.get(rule).copied().unwrap_or(0)
  }

  pub fn total(&self, lhs: &str) -> u64 {
    self.lhs_totals.get(lhs).copied().unwrap_or(0)
  }

  /// Number of distinct rules
  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Rule, u64)> {
    self.rules.iter().map(|(rule, count)| (rule, *count))
  }
}

/// An unlexicalized PCFG in CNF: start symbol plus rule probabilities
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
  pub start: String,
  pub rules: BTreeMap<Rule, f64>,
}

impl Grammar {
  /// Maximum-likelihood estimate: count(rule) / total(lhs)
  pub fn estimate(start: impl Into<String>, counts: &RuleCounts) -> Self {
    let rules = counts
      .iter()
      .map(|(rule, count)| {
        let p = count as f64 / counts.total(&rule.lhs) as f64;
        (rule.clone(), p)
      })
      .collect();

    Self {
      start: start.into(),
      rules,
    }
  }

  pub fn probability(&self, rule: &Rule) -> Option<f64> {
    self.rules.get(rule).copied()
  }

  /// Every symbol that appears on the left of some rule
  pub fn lhs_symbols(&self) -> BTreeSet<&str> {
    self.rules.keys().map(|r| r.lhs.as_str()).collect()
  }

  /// Summed probability of each lhs's rules
  pub fn lhs_mass(&self) -> BTreeMap<&str, f64> {
    let mut mass = BTreeMap::new();
    for (rule, p) in self.rules.iter() {
      *mass.entry(rule.lhs.as_str()).or_insert(0.0) += p;
    }
    mass
  }
}

/// A probability as a plain decimal that always shows a fractional part
struct Probability(f64);

impl fmt::Display for Probability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = self.0.to_string();
    if s.contains('.') {
      write!(f, "{}", s)
    } else {
      write!(f, "{}.0", s)
    }
  }
}

/// The start symbol on the first line, then `LHS -> r1 r2 [p]` per rule
impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", self.start)?;
    for (rule, p) in self.rules.iter() {
      writeln!(f, "{} [{}]", rule, Probability(*p))?;
    }
    Ok(())
  }
}
