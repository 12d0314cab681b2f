//! Persistence capabilities the posting engine consumes.

#![allow(async_fn_in_trait)]

use futures::Stream;

use crate::domain::{
    Error, NewWriteOff, StoreError, TimeOrder, Vendor, VendorId, VendorPatch, WriteOff,
    WriteOffRequest,
};

/// Source of write-off requests for a batch.
pub trait RequestStream {
    type ReqStream: Stream<Item = Result<WriteOffRequest, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::ReqStream;
}

pub trait VendorStore {
    async fn get(&self, id: &VendorId) -> Result<Option<Vendor>, StoreError>;

    /// Applies a relative decrement (and optional status) unconditionally.
    async fn update(&self, id: &VendorId, patch: &VendorPatch) -> Result<Vendor, StoreError>;
}

pub trait WriteOffStore {
    async fn insert(&self, record: NewWriteOff) -> Result<WriteOff, StoreError>;

    async fn list_by_vendor(
        &self,
        id: &VendorId,
        order: TimeOrder,
    ) -> Result<Vec<WriteOff>, StoreError>;

    async fn list_all(&self, order: TimeOrder) -> Result<Vec<WriteOff>, StoreError>;
}

/// How a store can apply the write-off insert and the vendor decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingCapability {
    /// Both writes commit together, guarded by `outstanding >= decrement`.
    Atomic,
    /// Two independent writes. A failure between them leaves an orphaned
    /// write-off, and concurrent postings may over-debit the vendor.
    Sequential,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomicOutcome {
    Posted { write_off: WriteOff, vendor: Vendor },
    /// The guard failed; nothing was written.
    InsufficientBalance { current: Vendor },
}

pub trait PostingStore: VendorStore + WriteOffStore {
    fn capability(&self) -> PostingCapability;

    /// Inserts `record` and applies `patch` as one unit, but only while the
    /// vendor's outstanding balance still covers `patch.decrement`.
    async fn post_atomic(
        &self,
        _record: NewWriteOff,
        _patch: VendorPatch,
    ) -> Result<AtomicOutcome, StoreError> {
        Err(StoreError::Unsupported)
    }
}
