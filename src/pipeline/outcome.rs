//! Per-stage outcomes and the run report.

use std::fmt;

use crate::config::FailurePolicy;
use crate::error::Error;
use crate::fs::{PublishPaths, TimestampToken};

/// Remote resource fetched by the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Image,
    Playlist,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Image => write!(f, "image"),
            Resource::Playlist => write!(f, "playlist"),
        }
    }
}

/// A step of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch(Resource),
    Patch,
    Publish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch(resource) => write!(f, "download of {}", resource),
            Stage::Patch => write!(f, "playlist patch"),
            Stage::Publish => write!(f, "publish"),
        }
    }
}

/// How a stage ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Not attempted: missing input or halted by policy.
    Skipped(String),
    /// Attempted and failed.
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl From<&Error> for Outcome {
    fn from(err: &Error) -> Self {
        match err {
            Error::Precondition(reason) => Outcome::Skipped(reason.clone()),
            other => Outcome::Failed(other.to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "ok"),
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Everything one run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub token: TimestampToken,
    pub stages: Vec<(Stage, Outcome)>,
    /// Final artifact paths, set once publishing succeeded.
    pub published: Option<PublishPaths>,
}

impl RunReport {
    pub fn new(token: TimestampToken) -> Self {
        Self {
            token,
            stages: Vec::new(),
            published: None,
        }
    }

    pub fn record(&mut self, stage: Stage, outcome: Outcome) {
        self.stages.push((stage, outcome));
    }

    pub fn outcome(&self, stage: Stage) -> Option<&Outcome> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, outcome)| outcome)
    }

    /// Every stage ran and succeeded.
    pub fn succeeded(&self) -> bool {
        !self.stages.is_empty() && self.stages.iter().all(|(_, o)| o.is_success())
    }

    pub fn failures(&self) -> usize {
        self.stages.iter().filter(|(_, o)| o.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.stages
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Skipped(_)))
            .count()
    }

    /// Whether the next stage may run under `policy`.
    pub fn may_continue(&self, policy: FailurePolicy) -> bool {
        match policy {
            FailurePolicy::Continue => true,
            FailurePolicy::Halt => self.failures() == 0,
        }
    }
}
