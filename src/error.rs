// Error taxonomy for the analysis engine.
//
// The analytical components signal failures as typed values so batch
// pipelines can keep processing other authors/documents after one failure.
// Conditions that are recovered locally (no history, degenerate vectors,
// empty corpora) are NOT errors — they surface as reason markers on the
// result types instead.

use thiserror::Error;

use crate::store::traits::StoreError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A caller-supplied parameter is outside its valid range.
    /// Fail-fast at call time; nothing is silently clamped except the
    /// documented subset-size clamp in the impostors verifier.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An operation needs at least one candidate/impostor and got none.
    #[error("insufficient candidates: {0}")]
    InsufficientCandidates(String),

    /// Propagated unchanged from the profile store boundary.
    /// Retry policy, if any, belongs to the caller.
    #[error(transparent)]
    Storage(#[from] StoreError),
}
