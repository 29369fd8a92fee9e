// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Penalty overrides and the combined selection score.
//!
//! Lower is always more desirable. A [`Penalty`] is an administrative
//! adjustment added to an implementation's intrinsic priority; the sum is a
//! [`Score`]. [`Penalty::Infinite`] produces [`Score::INFINITE`], which ranks
//! above every finite score and marks the implementation as ineligible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CapregError;

/// An additive penalty override for one implementation identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PenaltyRepr", into = "PenaltyRepr")]
pub enum Penalty {
    /// `Finite(i32::MAX)` is the infinite sentinel and behaves exactly like
    /// [`Penalty::Infinite`] in scoring, display and serialization.
    Finite(i32),
    /// Excludes the implementation from every selection query.
    Infinite,
}

impl Default for Penalty {
    fn default() -> Self {
        Penalty::ZERO
    }
}

impl Penalty {
    pub const ZERO: Penalty = Penalty::Finite(0);

    /// Builds a penalty from a raw value. `i32::MAX` is the infinite sentinel.
    pub fn new(value: i32) -> Self {
        match value {
            i32::MAX => Penalty::Infinite,
            v => Penalty::Finite(v),
        }
    }

    /// Clamps a wide value into the penalty range.
    pub fn truncate(value: i64) -> Self {
        Self::new(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    pub fn is_infinite(self) -> bool {
        self.value().is_none()
    }

    /// The finite value, `None` for the infinite sentinel.
    pub fn value(self) -> Option<i32> {
        match self {
            Penalty::Finite(v) if v != i32::MAX => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("infinite"),
        }
    }
}

impl FromStr for Penalty {
    type Err = CapregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("infinite") || trimmed.eq_ignore_ascii_case("inf") {
            return Ok(Penalty::Infinite);
        }
        trimmed
            .parse::<i64>()
            .map(Penalty::truncate)
            .map_err(|_| CapregError::InvalidPenalty(format!("`{trimmed}` is not an integer or `infinite`")))
    }
}

/// Wire form: an integer or the string `"infinite"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PenaltyRepr {
    Value(i64),
    Text(String),
}

impl TryFrom<PenaltyRepr> for Penalty {
    type Error = CapregError;

    fn try_from(repr: PenaltyRepr) -> Result<Self, Self::Error> {
        match repr {
            PenaltyRepr::Value(v) => Ok(Penalty::truncate(v)),
            PenaltyRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Penalty> for PenaltyRepr {
    fn from(penalty: Penalty) -> Self {
        match penalty.value() {
            Some(v) => PenaltyRepr::Value(v as i64),
            None => PenaltyRepr::Text("infinite".to_string()),
        }
    }
}

/// Effective desirability of a candidate: intrinsic priority plus penalty.
///
/// Ordered ascending, lower wins. Every finite combination fits in an `i64`
/// so no finite score can reach [`Score::INFINITE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(i64);

impl Score {
    pub const INFINITE: Score = Score(i64::MAX);

    /// Combines an intrinsic priority with a penalty override, saturating.
    pub fn of(priority: i32, penalty: Penalty) -> Self {
        match penalty.value() {
            Some(p) => Score((priority as i64).saturating_add(p as i64)),
            None => Score::INFINITE,
        }
    }

    /// True when the candidate must be treated as unregistered by queries.
    pub fn is_excluded(self) -> bool {
        self == Score::INFINITE
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_excluded() {
            f.write_str("infinite")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
