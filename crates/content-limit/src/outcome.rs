use crate::failure::PolicyFailure;

/// Result of the header phase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum EvaluationOutcome {
    /// The request may proceed through the pipeline.
    Continue,
    /// The request must be answered with the failure and not processed further.
    Reject(PolicyFailure),
}

impl EvaluationOutcome {
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, EvaluationOutcome::Continue)
    }

    #[must_use]
    pub fn failure(&self) -> Option<&PolicyFailure> {
        match self {
            EvaluationOutcome::Continue => None,
            EvaluationOutcome::Reject(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<(), PolicyFailure> {
        match self {
            EvaluationOutcome::Continue => Ok(()),
            EvaluationOutcome::Reject(failure) => Err(failure),
        }
    }
}

impl From<PolicyFailure> for EvaluationOutcome {
    fn from(failure: PolicyFailure) -> Self {
        EvaluationOutcome::Reject(failure)
    }
}
