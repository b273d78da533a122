//! The closed set of ordering policies the Policy Sorter recognises.

use serde::{Deserialize, Serialize};

/// An ordering policy for the Policy Sorter.
///
/// See the lineplan-solver crate for the sorter itself; this enum lives in
/// core because `Schedule` records which policy produced it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Earliest Deadline First. Optimal for minimising maximum lateness on a
    /// single machine (Jackson's Rule). The default.
    #[default]
    Edf,
    /// Ascending priority (1 = highest).
    Priority,
    /// Shortest Job First (by total production minutes).
    Sjf,
    /// Longest Job First (by total production minutes, descending).
    Ljf,
    /// Approximates EDF while accounting for processing time.
    Slack,
    /// Orders by customer rank (table lookup; unknown customers rank last).
    Customer,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Edf => "EDF",
            Self::Priority => "PRIORITY",
            Self::Sjf => "SJF",
            Self::Ljf => "LJF",
            Self::Slack => "SLACK",
            Self::Customer => "CUSTOMER",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Policy {
    type Err = String;

    /// Parse operator free-text ("schedule <policy>") into the closed enum
    /// (see REDESIGN FLAGS: free-text commands must not reach the core).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EDF" => Ok(Self::Edf),
            "PRIORITY" => Ok(Self::Priority),
            "SJF" => Ok(Self::Sjf),
            "LJF" => Ok(Self::Ljf),
            "SLACK" => Ok(Self::Slack),
            "CUSTOMER" => Ok(Self::Customer),
            other => Err(format!("unrecognised policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_policies_case_insensitively() {
        assert_eq!("edf".parse::<Policy>().unwrap(), Policy::Edf);
        assert_eq!("Priority".parse::<Policy>().unwrap(), Policy::Priority);
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!("fifo".parse::<Policy>().is_err());
    }

    #[test]
    fn default_policy_is_edf() {
        assert_eq!(Policy::default(), Policy::Edf);
    }
}
