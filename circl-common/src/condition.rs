//! Condition identifier parsing
//!
//! A condition directory is named `{age_group}_{gender}_{policy_issue}_{ideology}`.
//! The policy issue may itself contain underscores, so only the first two and
//! the last token have fixed positions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Token separator inside a condition identifier
pub const SEPARATOR: char = '_';

/// Minimum number of tokens a parsable identifier carries
pub const MIN_TOKENS: usize = 4;

/// Ideology values in display order
pub const IDEOLOGIES: [&str; 3] = ["left", "neutral", "right"];

/// Structured metadata recovered from a condition directory name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionId {
    pub age_group: String,
    pub gender: String,
    pub policy_issue: String,
    pub ideology: String,
}

impl ConditionId {
    /// Parse a raw directory name
    ///
    /// Token 0 is the age group, token 1 the gender, the last token the raw
    /// ideology; everything in between is rejoined with `_` as the policy
    /// issue. Fewer than four tokens yields [`Error::UnparsableIdentifier`].
    pub fn parse(raw: &str) -> Result<Self> {
        let tokens: Vec<&str> = raw.split(SEPARATOR).collect();
        if tokens.len() < MIN_TOKENS {
            return Err(Error::UnparsableIdentifier(raw.to_string()));
        }

        let last = tokens.len() - 1;

        Ok(Self {
            age_group: tokens[0].to_string(),
            gender: tokens[1].to_string(),
            policy_issue: tokens[2..last].join("_"),
            ideology: canonicalize_ideology(tokens[last]).to_string(),
        })
    }
}

impl FromStr for ConditionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.age_group, self.gender, self.policy_issue, self.ideology
        )
    }
}

/// Map raw ideology labels onto the canonical `left`/`neutral`/`right` set
///
/// Unknown labels pass through unchanged.
pub fn canonicalize_ideology(raw: &str) -> &str {
    match raw {
        "leftist" => "left",
        "centrist" => "neutral",
        "rightist" => "right",
        other => other,
    }
}
