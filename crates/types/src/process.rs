//! Process identity and round policy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a process in input order.
///
/// Identity is purely positional; the `P{index}` label is derived on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Position of the process in the input matrices
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ProcessId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<ProcessId> for usize {
    fn from(id: ProcessId) -> Self {
        id.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// How many processes the safety scan admits before restarting from P0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPolicy {
    /// Admit the first admissible process, then rescan from index 0
    OnePerRound,
    /// Admit every admissible process met in one left-to-right pass
    Sweep,
}

impl RoundPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnePerRound => "one-per-round",
            Self::Sweep => "sweep",
        }
    }
}

impl Default for RoundPolicy {
    fn default() -> Self {
        Self::OnePerRound
    }
}

impl fmt::Display for RoundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-per-round" | "one_per_round" => Ok(Self::OnePerRound),
            "sweep" => Ok(Self::Sweep),
            other => Err(format!(
                "unknown round policy '{other}': expected one-per-round or sweep"
            )),
        }
    }
}

impl clap::ValueEnum for RoundPolicy {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::OnePerRound, Self::Sweep]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_label() {
        assert_eq!(ProcessId(3).to_string(), "P3");
        assert_eq!(ProcessId::from(7).index(), 7);
    }

    #[test]
    fn test_round_policy_parse() {
        assert_eq!("sweep".parse::<RoundPolicy>(), Ok(RoundPolicy::Sweep));
        assert_eq!(
            "one_per_round".parse::<RoundPolicy>(),
            Ok(RoundPolicy::OnePerRound)
        );
        assert!("greedy".parse::<RoundPolicy>().is_err());
        assert_eq!(RoundPolicy::default(), RoundPolicy::OnePerRound);
    }
}
