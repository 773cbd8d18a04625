use crate::{
    Error,
    dto::{CanisterState, Diagnostics},
    ops::RemoteOp,
};
use derive_more::Display;

///
/// StepStatus
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StepStatus {
    #[display("done")]
    Done,
    #[display("failed")]
    Failed,
}

///
/// StepRecord
/// One remote sub-step of a lifecycle operation.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepRecord {
    pub op: RemoteOp,
    pub status: StepStatus,
}

///
/// ApplyReport
///
/// Outcome of a lifecycle operation. `state` is what the host should persist:
/// on failure after allocation it still names the canister, with only the
/// facets known to have applied.
///

#[derive(Debug, Default)]
pub struct ApplyReport {
    pub state: Option<CanisterState>,
    pub steps: Vec<StepRecord>,
    pub diagnostics: Diagnostics,
    pub error: Option<Error>,
}

impl ApplyReport {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Remote operations in the order they were attempted.
    #[must_use]
    pub fn ops(&self) -> Vec<RemoteOp> {
        self.steps.iter().map(|s| s.op).collect()
    }

    /// Record the outcome of one remote step and pass it through.
    pub(crate) fn track<T>(&mut self, op: RemoteOp, result: Result<T, Error>) -> Result<T, Error> {
        let status = if result.is_ok() {
            StepStatus::Done
        } else {
            StepStatus::Failed
        };
        self.steps.push(StepRecord { op, status });

        result
    }

    /// Close the report with the state reached and the overall result.
    pub(crate) fn settle(
        mut self,
        state: Option<CanisterState>,
        result: Result<(), Error>,
    ) -> Self {
        self.state = state;
        self.error = result.err();
        self
    }

    /// Convert into the persisted state, surfacing the error if there was one.
    pub fn into_result(self) -> Result<Option<CanisterState>, Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.state),
        }
    }
}
