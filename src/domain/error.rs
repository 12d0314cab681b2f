use crate::domain::{VendorId, WriteOff};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),
}

/// Failure reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("vendor {0} does not exist")]
    VendorMissing(VendorId),

    #[error("atomic posting is not supported by this store")]
    Unsupported,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The store call a persistence failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingStep {
    VendorRead,
    WriteOffInsert,
    VendorUpdate,
    AtomicPost,
}

impl core::fmt::Display for PostingStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let step = match self {
            Self::VendorRead => "vendor read",
            Self::WriteOffInsert => "write-off insert",
            Self::VendorUpdate => "vendor update",
            Self::AtomicPost => "atomic post",
        };
        f.write_str(step)
    }
}

/// Stable, machine-readable failure reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    ValidationError,
    NotFound,
    NoPendingBalance,
    InvalidAmount,
    EffectiveAmountZero,
    StaleBalance,
    PersistenceError,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::NotFound => "NotFound",
            Self::NoPendingBalance => "NoPendingBalance",
            Self::InvalidAmount => "InvalidAmount",
            Self::EffectiveAmountZero => "EffectiveAmountZero",
            Self::StaleBalance => "StaleBalance",
            Self::PersistenceError => "PersistenceError",
        }
    }

    /// Store failures and lost balance races may succeed on a plain retry.
    /// Under the sequential strategy retrying a store failure can double-post,
    /// since nothing deduplicates requests.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::PersistenceError | Self::StaleBalance)
    }
}

impl core::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PostingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Vendor {0} not found")]
    NotFound(VendorId),

    #[error("Vendor {0} has no pending balance")]
    NoPendingBalance(VendorId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Effective amount for vendor {0} is not positive")]
    EffectiveAmountZero(VendorId),

    #[error("Balance of vendor {vendor} changed during each of {attempts} posting attempts")]
    StaleBalance { vendor: VendorId, attempts: u32 },

    /// `write_off` holds the record when the insert landed but a later step
    /// did not, which leaves it for manual reconciliation.
    #[error("Persistence failed during {step}: {source}")]
    Persistence {
        step: PostingStep,
        write_off: Option<Box<WriteOff>>,
        source: StoreError,
    },
}

impl PostingError {
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::Validation(_) => ReasonCode::ValidationError,
            Self::NotFound(_) => ReasonCode::NotFound,
            Self::NoPendingBalance(_) => ReasonCode::NoPendingBalance,
            Self::InvalidAmount(_) => ReasonCode::InvalidAmount,
            Self::EffectiveAmountZero(_) => ReasonCode::EffectiveAmountZero,
            Self::StaleBalance { .. } => ReasonCode::StaleBalance,
            Self::Persistence { .. } => ReasonCode::PersistenceError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("Batch contains no items")]
    EmptyBatch,
}
