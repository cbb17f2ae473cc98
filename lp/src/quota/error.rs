//! Quota error taxonomy

use thiserror::Error;

/// Failures surfaced by quota operations
///
/// Policy denials are not errors; they come back as [`super::GuardDecision`]s.
#[derive(Debug, Error)]
pub enum QuotaError {
    /// Caller supplied no usable user identity
    #[error("not authenticated")]
    NotAuthenticated,

    /// Counter or launch storage failed
    #[error("quota store error: {0}")]
    Store(#[from] quotastore::StoreError),

    /// The referenced launch does not exist
    #[error("launch not found: {0}")]
    LaunchNotFound(String),

    /// The launch exists but belongs to a different account
    ///
    /// Deliberately distinct from [`QuotaError::LaunchNotFound`]; unifying
    /// the two is a policy choice left to callers.
    #[error("launch {launch_id} is owned by another account")]
    OwnershipMismatch { launch_id: String },

    /// Stored plan tier text did not parse
    #[error("unknown plan tier {0:?} on usage counter")]
    UnknownTier(String),
}
