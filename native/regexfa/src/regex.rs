//! The whole compilation pipeline behind a single type.

use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::formlang::{DFA, EpsilonNFA, compile_nfa, subset_construction};
use crate::syntax::{build_tree, infix_to_postfix, normalize};

/// Configures how a [`Regex`] is compiled.
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    ignore_whitespace: bool,
    minimize: bool,
}

impl Default for RegexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexBuilder {
    pub fn new() -> Self {
        Self {
            ignore_whitespace: false,
            minimize: true,
        }
    }

    /// If true, whitespace in the pattern is removed before parsing, so
    /// `a | b` is the same as `a|b`. By default whitespace is a literal
    /// symbol like any other.
    pub fn ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    /// If true (the default), the DFA used for matching is minimized.
    /// Otherwise the DFA produced by subset construction is used as is.
    pub fn minimize(mut self, yes: bool) -> Self {
        self.minimize = yes;
        self
    }

    /// Compiles the pattern.
    pub fn build(&self, pattern: &str) -> Result<Regex> {
        let (source, positions): (String, Vec<usize>) = if self.ignore_whitespace {
            pattern
                .chars()
                .enumerate()
                .filter(|(_, c)| !c.is_whitespace())
                .map(|(position, c)| (c, position))
                .unzip()
        } else {
            (pattern.to_string(), Vec::new())
        };

        // Positions reported by the normalizer refer to `source`, translate
        // them back into positions in `pattern`.
        let normalized = normalize(&source).map_err(|err| match err {
            Error::MalformedExpression { position, reason } if self.ignore_whitespace => {
                Error::MalformedExpression {
                    position: positions.get(position).copied().unwrap_or(position),
                    reason,
                }
            }
            err => err,
        })?;
        debug!("normalized `{}` into `{}`", pattern, normalized);

        let postfix = infix_to_postfix(&normalized);
        debug!("postfix form: `{}`", postfix);

        let tree = build_tree(&postfix)?;
        debug!("syntax tree: {} ({} nodes)", tree, tree.len());

        let nfa = compile_nfa(&tree);
        let dfa = subset_construction(&nfa);
        debug!(
            "NFA has {} states, DFA has {} states",
            nfa.num_states(),
            dfa.num_states()
        );

        let minimal_dfa = if self.minimize {
            let minimal = dfa.minimize();
            debug!("minimal DFA has {} states", minimal.num_states());
            Some(minimal)
        } else {
            None
        };

        Ok(Regex {
            pattern: pattern.to_string(),
            normalized,
            postfix,
            nfa,
            dfa,
            minimal_dfa,
        })
    }
}

/// A compiled regular expression.
///
/// Keeps the result of every stage of the pipeline. Matching is done with
/// the minimal DFA, or with the unminimized one when the regex was built
/// with [`RegexBuilder::minimize`] set to false.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    normalized: String,
    postfix: String,
    nfa: EpsilonNFA,
    dfa: DFA,
    minimal_dfa: Option<DFA>,
}

impl Regex {
    /// Compiles a pattern with the default options.
    pub fn new(pattern: &str) -> Result<Self> {
        RegexBuilder::new().build(pattern)
    }

    /// The pattern as given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The pattern after desugaring `+`, `?` and implicit concatenation.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    pub fn nfa(&self) -> &EpsilonNFA {
        &self.nfa
    }

    /// The DFA produced by subset construction.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    pub fn minimal_dfa(&self) -> Option<&DFA> {
        self.minimal_dfa.as_ref()
    }

    /// The DFA used by [`Regex::is_match`].
    pub fn matching_dfa(&self) -> &DFA {
        self.minimal_dfa.as_ref().unwrap_or(&self.dfa)
    }

    /// Returns true if the whole input belongs to the language of the regex.
    pub fn is_match(&self, input: &str) -> bool {
        self.matching_dfa().accepts(input)
    }

    /// Same as [`Regex::is_match`] but simulating the NFA.
    pub fn is_match_nfa(&self, input: &str) -> bool {
        self.nfa.accepts(input)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
