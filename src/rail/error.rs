//! Rail error types

use thiserror::Error;

/// Which side of the transfer a rail rejection points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Receiver-side funding issue
    Destination,
    /// Sender-side funding issue (bad source, insufficient balance)
    Source,
    /// Rejection that matched no known path
    Unclassified,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::Destination => "DESTINATION_REJECTED",
            RejectionKind::Source => "SOURCE_REJECTED",
            RejectionKind::Unclassified => "UNCLASSIFIED_RAIL_ERROR",
        }
    }
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rail call failures
#[derive(Debug, Clone, Error)]
pub enum RailError {
    #[error("Rail rejected the destination funding source: {detail}")]
    DestinationRejected { detail: String },

    #[error("Rail rejected the source funding source: {detail}")]
    SourceRejected { detail: String },

    #[error("Rail rejected the transfer: {detail}")]
    Unclassified { detail: String },

    /// The rail may or may not have accepted the transfer; the confirmation
    /// was never read. Must be reconciled out-of-band before any resubmit.
    #[error("Transfer outcome indeterminate: {detail}")]
    Indeterminate { detail: String },
}

impl RailError {
    /// Stable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            RailError::DestinationRejected { .. } => "DESTINATION_REJECTED",
            RailError::SourceRejected { .. } => "SOURCE_REJECTED",
            RailError::Unclassified { .. } => "UNCLASSIFIED_RAIL_ERROR",
            RailError::Indeterminate { .. } => "INDETERMINATE_TRANSFER",
        }
    }

    /// The rejection kind, for rejections. `None` for indeterminate, which
    /// is not a rejection and must never be treated as one.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            RailError::DestinationRejected { .. } => Some(RejectionKind::Destination),
            RailError::SourceRejected { .. } => Some(RejectionKind::Source),
            RailError::Unclassified { .. } => Some(RejectionKind::Unclassified),
            RailError::Indeterminate { .. } => None,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            RailError::DestinationRejected { detail }
            | RailError::SourceRejected { detail }
            | RailError::Unclassified { detail }
            | RailError::Indeterminate { detail } => detail,
        }
    }
}
