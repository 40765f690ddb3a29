//! Linear step indicator.
//!
//! The indicator has no state of its own beyond the current step: every
//! indicator's status is derived from it.

use serde::{Deserialize, Serialize};

/// Visual status of a single step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not reached yet.
    #[default]
    Neutral,
    /// The step being worked on.
    Active,
    /// Already passed.
    Completed,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Ordered, fixed-length sequence of step indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stepper {
    labels: Vec<String>,
    current: u32,
}

impl Stepper {
    /// Create a stepper over the given labels, with no step shown yet.
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels, current: 0 }
    }

    /// Show step `n` (1-indexed).
    ///
    /// Values past the end leave every indicator completed and none active;
    /// zero leaves every indicator neutral.
    pub fn set_step(&mut self, n: u32) {
        self.current = n;
    }

    /// Currently shown step.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Number of indicators.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no indicators.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Status of the indicator at 0-based `index`.
    pub fn status(&self, index: usize) -> StepStatus {
        let position = u64::try_from(index).unwrap_or(u64::MAX).saturating_add(1);
        let current = u64::from(self.current);
        if current == 0 || position > current {
            StepStatus::Neutral
        } else if position == current {
            StepStatus::Active
        } else {
            StepStatus::Completed
        }
    }

    /// All indicators with their labels and statuses, in order.
    pub fn indicators(&self) -> impl Iterator<Item = (&str, StepStatus)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), self.status(i)))
    }
}
