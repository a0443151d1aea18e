//! Enumerations and field types shared by tasks and derived views.
//!
//! This module defines the priority scale used by the task store and the urgency
//! buckets a deadline falls into relative to today.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Task priority on the remote service's 1-4 scale, where 4 is the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const LOWEST: Priority = Priority(1);
    pub const HIGHEST: Priority = Priority(4);

    /// Create a priority, rejecting values outside 1..=4.
    pub fn new(level: u8) -> Option<Self> {
        (1..=4).contains(&level).then_some(Priority(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// The `pN` name the filter language uses, where p1 is the most urgent.
    pub fn filter_name(self) -> String {
        format!("p{}", 5 - self.level())
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::LOWEST
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Priority::new(level).ok_or_else(|| format!("priority must be between 1 and 4, got {level}"))
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

/// How close a deadline is, relative to a reference day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Overdue,
    DueToday,
    Imminent,
    Soon,
    Distant,
}

impl Urgency {
    /// Symbolic colour name for presentation layers.
    pub fn color_name(self) -> &'static str {
        match self {
            Urgency::Overdue => "red",
            Urgency::DueToday => "orange",
            Urgency::Imminent => "yellow",
            Urgency::Soon => "green",
            Urgency::Distant => "grey",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Overdue => "Overdue",
            Urgency::DueToday => "Due today",
            Urgency::Imminent => "Imminent",
            Urgency::Soon => "Soon",
            Urgency::Distant => "Distant",
        };
        f.write_str(s)
    }
}
