// datawash-core/src/domain/pipeline/policy.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What replay does when a step names an unknown operation or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Keep going with the dataset as it was before the step.
    #[default]
    Skip,
    /// Abort with an error naming the step.
    Raise,
}

impl FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(OnError::Skip),
            "raise" => Ok(OnError::Raise),
            other => Err(format!("unknown on_error policy '{other}' (expected skip or raise)")),
        }
    }
}

impl fmt::Display for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnError::Skip => write!(f, "skip"),
            OnError::Raise => write!(f, "raise"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("Raise".parse::<OnError>(), Ok(OnError::Raise));
        assert_eq!(" skip ".parse::<OnError>(), Ok(OnError::Skip));
        assert!("ignore".parse::<OnError>().is_err());
        assert_eq!(OnError::default().to_string(), "skip");
    }
}
