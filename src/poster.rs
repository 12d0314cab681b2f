//! Single write-off posting.
//!
//! The poster reads a vendor snapshot, runs the balance policy and then writes
//! using whichever strategy the store advertises:
//!
//! - [`PostingCapability::Atomic`]: one conditional call that inserts the
//!   write-off and debits the vendor only if the balance still covers the
//!   amount. A failed guard means another posting got there first; the poster
//!   re-reads and re-evaluates, up to `max_conflict_retries` times.
//! - [`PostingCapability::Sequential`]: insert the write-off, then debit the
//!   vendor. If the debit fails the write-off stays behind and is returned in
//!   the error for reconciliation. Nothing stops two concurrent postings from
//!   reading the same balance and both debiting it.
//!
//! The read-then-write window is accepted in both modes; only the atomic mode
//! detects when it was lost.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::{
    Approval, AtomicOutcome, NewWriteOff, PostingCapability, PostingError, PostingStep,
    PostingStore, Rejection, StatusTracking, ValidatedRequest, Vendor, VendorId, WriteOff,
    WriteOffRequest, policy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterConfig {
    pub status_tracking: StatusTracking,
    pub max_conflict_retries: u32,
    /// Fall back to sequential writes when an atomic attempt errors out.
    pub degrade_on_atomic_failure: bool,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            status_tracking: StatusTracking::Enabled,
            max_conflict_retries: 3,
            degrade_on_atomic_failure: true,
        }
    }
}

/// Strategy that actually committed a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingMode {
    Atomic,
    Sequential,
}

impl PostingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Sequential => "sequential",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub write_off: WriteOff,
    pub vendor: Vendor,
    pub requested: Decimal,
    pub clamped: bool,
    pub mode: PostingMode,
}

pub type PostingResult = Result<Posting, PostingError>;

#[derive(Debug)]
pub struct WriteOffPoster<S: PostingStore> {
    store: S,
    config: PosterConfig,
}

impl<S: PostingStore> WriteOffPoster<S> {
    pub fn new(store: S, config: PosterConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(
        name = "post_write_off",
        skip_all,
        fields(vendor = ?request.vendor_id, reference = ?request.reference)
    )]
    pub async fn post(&self, request: &WriteOffRequest) -> PostingResult {
        let request = request.validate()?;
        self.post_validated(request).await
    }

    pub async fn post_validated(&self, request: ValidatedRequest) -> PostingResult {
        let date = request.date.unwrap_or_else(Utc::now);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let vendor = self.read_vendor(&request.vendor_id).await?;
            let requested = request.requested()?;
            let approval = self.approve(&vendor, requested)?;
            let record = new_record(&request, approval.effective, date);

            if self.store.capability() == PostingCapability::Sequential {
                return self
                    .post_sequential(record, approval, requested)
                    .await;
            }

            match self.store.post_atomic(record.clone(), approval.patch()).await {
                Ok(AtomicOutcome::Posted { write_off, vendor }) => {
                    let mode = PostingMode::Atomic;
                    return Ok(self.posted(write_off, vendor, approval, requested, mode));
                }
                Ok(AtomicOutcome::InsufficientBalance { current }) => {
                    if attempts > self.config.max_conflict_retries {
                        warn!(attempts, "balance kept moving, giving up");
                        return Err(PostingError::StaleBalance {
                            vendor: request.vendor_id,
                            attempts,
                        });
                    }
                    debug!(
                        attempts,
                        read = %vendor.outstanding,
                        current = %current.outstanding,
                        "balance changed since read, re-evaluating"
                    );
                }
                Err(source) if self.config.degrade_on_atomic_failure => {
                    warn!(error = %source, "atomic posting failed, degrading to sequential writes");
                    return self
                        .post_sequential(record, approval, requested)
                        .await;
                }
                Err(source) => {
                    return Err(PostingError::Persistence {
                        step: PostingStep::AtomicPost,
                        write_off: None,
                        source,
                    });
                }
            }
        }
    }

    async fn read_vendor(&self, id: &VendorId) -> Result<Vendor, PostingError> {
        self.store
            .get(id)
            .await
            .map_err(|source| PostingError::Persistence {
                step: PostingStep::VendorRead,
                write_off: None,
                source,
            })?
            .ok_or_else(|| PostingError::NotFound(id.clone()))
    }

    fn approve(&self, vendor: &Vendor, requested: Decimal) -> Result<Approval, PostingError> {
        let decision = policy::evaluate_vendor(vendor, requested, self.config.status_tracking);
        debug!(outstanding = %vendor.outstanding, %requested, ?decision, "policy evaluated");

        decision.map_err(|rejection| match rejection {
            Rejection::NoPendingBalance => PostingError::NoPendingBalance(vendor.id.clone()),
            Rejection::InvalidAmount => {
                PostingError::InvalidAmount(format!("{requested} is not a positive amount"))
            }
            Rejection::EffectiveAmountZero => PostingError::EffectiveAmountZero(vendor.id.clone()),
        })
    }

    async fn post_sequential(
        &self,
        record: NewWriteOff,
        approval: Approval,
        requested: Decimal,
    ) -> PostingResult {
        let vendor_id = record.vendor_id.clone();

        let write_off = self
            .store
            .insert(record)
            .await
            .map_err(|source| PostingError::Persistence {
                step: PostingStep::WriteOffInsert,
                write_off: None,
                source,
            })?;

        let vendor = match self.store.update(&vendor_id, &approval.patch()).await {
            Ok(vendor) => vendor,
            Err(source) => {
                warn!(
                    write_off = %write_off.id,
                    error = %source,
                    "write-off recorded but vendor balance was not debited"
                );
                return Err(PostingError::Persistence {
                    step: PostingStep::VendorUpdate,
                    write_off: Some(Box::new(write_off)),
                    source,
                });
            }
        };

        Ok(self.posted(write_off, vendor, approval, requested, PostingMode::Sequential))
    }

    fn posted(
        &self,
        write_off: WriteOff,
        vendor: Vendor,
        approval: Approval,
        requested: Decimal,
        mode: PostingMode,
    ) -> Posting {
        let clamped = approval.clamped(requested);
        info!(
            write_off = %write_off.id,
            amount = %write_off.amount,
            outstanding = %vendor.outstanding,
            clamped,
            mode = mode.as_str(),
            "write-off posted"
        );
        Posting {
            write_off,
            vendor,
            requested,
            clamped,
            mode,
        }
    }
}

fn new_record(request: &ValidatedRequest, amount: Decimal, date: DateTime<Utc>) -> NewWriteOff {
    NewWriteOff {
        reference: request.reference.clone(),
        note: request.note.clone(),
        amount,
        date,
        vendor_id: request.vendor_id.clone(),
        actor_id: request.actor_id.clone(),
        branch_id: request.branch_id.clone(),
    }
}
