//! Fixed catalog of issue types understood by the target Jira instance

use crate::error::JiraBridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issue types with their stable Jira identifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Bug,
    #[default]
    Task,
}

impl IssueType {
    pub const ALL: [IssueType; 2] = [IssueType::Bug, IssueType::Task];

    /// Numeric issue type id on the remote instance
    pub const fn id(self) -> u64 {
        match self {
            IssueType::Bug => 10014,
            IssueType::Task => 10021,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            IssueType::Bug => "BUG",
            IssueType::Task => "TASK",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IssueType {
    type Err = JiraBridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                JiraBridgeError::invalid_param(
                    "issueType",
                    format!("Unknown issue type '{}', expected 'task' or 'bug'", s),
                )
            })
    }
}
