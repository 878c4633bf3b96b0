use std::fmt;

use bevy::prelude::*;

/// States of one provisioning transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProvisionPhase {
    #[default]
    Idle,
    CollisionCaptured,
    CollisionRemoved,
    SystemCreated,
    ParametersApplied,
    CollisionRestored,
    Done,
    Failed,
}

impl ProvisionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CollisionCaptured => "collision captured",
            Self::CollisionRemoved => "collision removed",
            Self::SystemCreated => "system created",
            Self::ParametersApplied => "parameters applied",
            Self::CollisionRestored => "collision restored",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProvisionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a best-effort step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    Applied,
    Skipped(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Nothing was mutated.
    PreconditionFailure,
    /// A host call failed. Phases committed before it are left in place.
    HostStateFailure,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProvisioningStatus {
    Succeeded {
        display_name: String,
        cache_name: String,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    /// State the transaction was in when the entry was written.
    pub phase: ProvisionPhase,
    pub message: String,
}

/// What a provisioning run reports back. Holds no host state.
#[derive(Clone, Debug, PartialEq)]
pub struct ProvisioningOutcome {
    pub status: ProvisioningStatus,
    /// Last state reached before the run ended.
    pub reached: ProvisionPhase,
    pub log: Vec<LogEntry>,
    /// Named best-effort steps and what became of them.
    pub steps: Vec<(&'static str, StepResult)>,
}

impl ProvisioningOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ProvisioningStatus::Succeeded { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.status {
            ProvisioningStatus::Failed { kind, .. } => Some(*kind),
            ProvisioningStatus::Succeeded { .. } => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match &self.status {
            ProvisioningStatus::Succeeded { display_name, .. } => Some(display_name),
            ProvisioningStatus::Failed { .. } => None,
        }
    }

    pub fn cache_name(&self) -> Option<&str> {
        match &self.status {
            ProvisioningStatus::Succeeded { cache_name, .. } => Some(cache_name),
            ProvisioningStatus::Failed { .. } => None,
        }
    }

    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps
            .iter()
            .find(|(step, _)| *step == name)
            .map(|(_, result)| result)
    }

    pub fn entries(&self, level: LogLevel) -> impl Iterator<Item = &LogEntry> {
        self.log.iter().filter(move |entry| entry.level == level)
    }
}

// ---------------------------------------------------------------------------
// Phase log
// ---------------------------------------------------------------------------

/// Collects phase narration and mirrors it to the Bevy log.
#[derive(Default)]
pub(super) struct PhaseLog {
    entries: Vec<LogEntry>,
}

impl PhaseLog {
    pub(super) fn push(
        &mut self,
        level: LogLevel,
        phase: ProvisionPhase,
        message: impl Into<String>,
    ) {
        let message = message.into();
        match level {
            LogLevel::Info => info!("Hair system [{phase}]: {message}"),
            LogLevel::Warn => warn!("Hair system [{phase}]: {message}"),
            LogLevel::Error => error!("Hair system [{phase}]: {message}"),
        }
        self.entries.push(LogEntry {
            level,
            phase,
            message,
        });
    }

    pub(super) fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}
