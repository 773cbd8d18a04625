//! Canister lifecycle orchestration.
//!
//! Workflows sequence the remote steps of each lifecycle operation and turn
//! their outcome into an [`ApplyReport`]. Decisions come from `domain`;
//! remote effects go through `ops`.

pub mod canister;
pub mod steps;

pub use canister::CanisterWorkflow;
pub use steps::{ApplyReport, StepRecord, StepStatus};
