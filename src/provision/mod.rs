//! Provisioning a strand system on a scene object.

mod collision;
mod orchestrator;
mod outcome;
mod request;

pub use collision::*;
pub use orchestrator::*;
pub use outcome::{
    FailureKind, LogEntry, LogLevel, ProvisionPhase, ProvisioningOutcome, ProvisioningStatus,
    StepResult,
};
pub use request::*;
