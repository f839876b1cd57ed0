//! Enumerations and field types for tasks.
//!
//! This module defines the priority scale, the priority selector used by the
//! filter controls, and the names of the three derived buckets.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for a task.
///
/// Serialised with its capitalised name (`"Low"`, `"Medium"`, `"High"`),
/// lowercase spellings are accepted on load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Priority {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Priority selector: either every priority or exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    /// Selector positions in display order, used by cycling controls.
    pub const CHOICES: [PriorityFilter; 4] = [
        PriorityFilter::All,
        PriorityFilter::Only(Priority::Low),
        PriorityFilter::Only(Priority::Medium),
        PriorityFilter::Only(Priority::High),
    ];

    /// Whether a task with the given priority passes this selector.
    pub fn matches(self, priority: Option<Priority>) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => priority == Some(p),
        }
    }

    /// Step to the next (or previous) selector, wrapping around.
    pub fn cycle(self, forward: bool) -> Self {
        let len = Self::CHOICES.len();
        let idx = Self::CHOICES.iter().position(|&c| c == self).unwrap_or(0);
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::CHOICES[next]
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("All"),
            PriorityFilter::Only(p) => f.write_str(p.label()),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PriorityFilter::All),
            "low" => Ok(PriorityFilter::Only(Priority::Low)),
            "medium" => Ok(PriorityFilter::Only(Priority::Medium)),
            "high" => Ok(PriorityFilter::Only(Priority::High)),
            other => Err(format!(
                "unknown priority '{other}', expected one of: all, low, medium, high"
            )),
        }
    }
}

/// The three derived buckets shown side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Upcoming,
    Overdue,
    Completed,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Upcoming, Bucket::Overdue, Bucket::Completed];

    pub fn title(self) -> &'static str {
        match self {
            Bucket::Upcoming => "Upcoming Tasks",
            Bucket::Overdue => "Overdue Tasks",
            Bucket::Completed => "Completed Tasks",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_filter_parse() {
        assert_eq!("All".parse::<PriorityFilter>(), Ok(PriorityFilter::All));
        assert_eq!(" high ".parse::<PriorityFilter>(), Ok(PriorityFilter::Only(Priority::High)));
        assert!("urgent".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn test_priority_filter_cycle_wraps() {
        assert_eq!(PriorityFilter::All.cycle(true), PriorityFilter::Only(Priority::Low));
        assert_eq!(PriorityFilter::All.cycle(false), PriorityFilter::Only(Priority::High));
        assert_eq!(PriorityFilter::Only(Priority::High).cycle(true), PriorityFilter::All);
    }

    #[test]
    fn test_priority_filter_matches() {
        assert!(PriorityFilter::All.matches(None));
        assert!(PriorityFilter::Only(Priority::Low).matches(Some(Priority::Low)));
        assert!(!PriorityFilter::Only(Priority::Low).matches(Some(Priority::High)));
        assert!(!PriorityFilter::Only(Priority::Low).matches(None));
    }

    #[test]
    fn test_priority_serialises_capitalised() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
        let p: Priority = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(p, Priority::Medium);
    }
}
