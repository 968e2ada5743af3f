//! Pattern matching over a token stream.
//!
//! Rules are indexed by the first word of each pattern. Candidates under
//! a key are pre-sorted longest pattern first, then by rule declaration
//! order, so the first candidate that matches at a position is the one
//! that wins. A committed match is final: the scan resumes after it and
//! never looks back, which keeps the pass linear and matches disjoint.

use std::collections::HashMap;
use std::sync::Arc;

use crate::diagnostic::Position;
use crate::error::{LintError, LintResult};
use crate::rules::{Rule, RuleTable};
use crate::stream::{Token, TokenKind};

/// One pattern of one rule, under its first word.
#[derive(Debug, Clone)]
struct Candidate {
    rule: usize,
    /// Pattern words after the first.
    rest: Vec<String>,
}

impl Candidate {
    fn len(&self) -> usize {
        self.rest.len() + 1
    }
}

/// A rule hit on a run of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'r> {
    /// The rule that matched.
    pub rule: &'r Rule,
    /// Declaration index of the rule.
    pub rule_index: usize,
    /// Index of the first matched token.
    pub first: usize,
    /// Index of the last matched token (inclusive).
    pub last: usize,
    /// Start of the first token.
    pub start: Position,
    /// End of the last token.
    pub end: Position,
}

impl Match<'_> {
    /// Source text of the matched tokens, interstitial white space included.
    pub fn actual(&self, tokens: &[Token<'_>]) -> String {
        tokens[self.first..=self.last]
            .iter()
            .map(|t| t.raw.as_ref())
            .collect()
    }
}

/// Rule table plus its first-word index.
///
/// Immutable once built; share it across threads behind an [`Arc`].
#[derive(Debug)]
pub struct Matcher {
    table: Arc<RuleTable>,
    index: HashMap<String, Vec<Candidate>>,
}

impl Matcher {
    /// Builds the first-word index.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InvalidRuleTable`] if any rule has an empty
    /// pattern.
    #[tracing::instrument(skip_all, fields(rules = table.len()))]
    pub fn new(table: Arc<RuleTable>) -> LintResult<Self> {
        let mut index: HashMap<String, Vec<Candidate>> = HashMap::new();

        for (rule_index, rule) in table.rules().iter().enumerate() {
            for pattern in &rule.patterns {
                let Some((first, rest)) = pattern.split_first() else {
                    return Err(LintError::invalid_rule(Some(&rule.id), "empty pattern"));
                };
                index.entry(first.clone()).or_default().push(Candidate {
                    rule: rule_index,
                    rest: rest.to_vec(),
                });
            }
        }

        // Stable sort keeps variant order within a rule.
        for candidates in index.values_mut() {
            candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.rule.cmp(&b.rule)));
        }

        tracing::debug!(keys = index.len(), "first-word index built");
        Ok(Self { table, index })
    }

    /// The underlying rule table.
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Finds every rule match in a token sequence.
    ///
    /// Single forward pass; at most one match starts at any token and
    /// matches never overlap.
    pub fn find<'m>(&'m self, tokens: &[Token<'_>]) -> Vec<Match<'m>> {
        let mut matches = Vec::new();
        let mut cursor = 0;

        while cursor < tokens.len() {
            let token = &tokens[cursor];
            let hit = if token.is_word() {
                self.index.get(&token.text).and_then(|candidates| {
                    candidates.iter().find_map(|candidate| {
                        extend(tokens, cursor, &candidate.rest).map(|last| (candidate.rule, last))
                    })
                })
            } else {
                None
            };

            match hit {
                Some((rule_index, last)) => {
                    matches.push(Match {
                        rule: &self.table.rules()[rule_index],
                        rule_index,
                        first: cursor,
                        last,
                        start: token.start,
                        end: tokens[last].end,
                    });
                    cursor = last + 1;
                }
                None => cursor += 1,
            }
        }

        matches
    }
}

/// Tries to match `rest` word by word after the word at `first`.
///
/// Only white space may sit between pattern words, and every word must
/// belong to the same sentence. Returns the index of the last matched
/// token.
fn extend(tokens: &[Token<'_>], first: usize, rest: &[String]) -> Option<usize> {
    let sentence = tokens[first].sentence;
    let mut last = first;

    for word in rest {
        let next = tokens[last + 1..]
            .iter()
            .position(|t| t.kind != TokenKind::Whitespace)
            .map(|offset| last + 1 + offset)?;
        let token = &tokens[next];
        if !token.is_word() || token.sentence != sentence || token.text != *word {
            return None;
        }
        last = next;
    }

    Some(last)
}
