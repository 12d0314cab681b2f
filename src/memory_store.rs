use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::{
    AtomicOutcome, NewWriteOff, PostingCapability, PostingStep, PostingStore, StoreError,
    TimeOrder, Vendor, VendorId, VendorPatch, VendorStore, WriteOff, WriteOffStore,
};

/// Shared in-memory vendor and write-off store. Clones share state.
///
/// Every async call yields to the scheduler once before touching state, so
/// concurrent postings interleave the way they would against a database.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
    capability: PostingCapability,
}

#[derive(Debug, Default)]
struct Inner {
    vendors: HashMap<VendorId, Vendor>,
    ledger: Vec<WriteOff>,
    faults: HashSet<PostingStep>,
}

impl InMemoryStore {
    pub fn new(capability: PostingCapability) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            capability,
        }
    }

    pub fn atomic() -> Self {
        Self::new(PostingCapability::Atomic)
    }

    pub fn sequential() -> Self {
        Self::new(PostingCapability::Sequential)
    }

    /// Adds or replaces a vendor.
    pub fn seed(&self, vendor: Vendor) -> Result<(), StoreError> {
        self.lock()?.vendors.insert(vendor.id.clone(), vendor);
        Ok(())
    }

    /// Makes the next call for `step` fail with [`StoreError::Unavailable`].
    pub fn fail_next(&self, step: PostingStep) -> Result<(), StoreError> {
        self.lock()?.faults.insert(step);
        Ok(())
    }

    pub fn vendor(&self, id: &VendorId) -> Result<Option<Vendor>, StoreError> {
        Ok(self.lock()?.vendors.get(id).cloned())
    }

    /// All vendors ordered by id.
    pub fn vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        let mut vendors: Vec<Vendor> = self.lock()?.vendors.values().cloned().collect();
        vendors.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(vendors)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl Inner {
    fn take_fault(&mut self, step: PostingStep) -> Result<(), StoreError> {
        if self.faults.remove(&step) {
            return Err(StoreError::Unavailable(format!("injected failure at {step}")));
        }
        Ok(())
    }

    fn vendor_mut(&mut self, id: &VendorId) -> Result<&mut Vendor, StoreError> {
        self.vendors
            .get_mut(id)
            .ok_or_else(|| StoreError::VendorMissing(id.clone()))
    }

    fn append(&mut self, record: NewWriteOff) -> WriteOff {
        let write_off = WriteOff::from_new(record, Utc::now());
        self.ledger.push(write_off.clone());
        write_off
    }
}

fn ordered(mut list: Vec<WriteOff>, order: TimeOrder) -> Vec<WriteOff> {
    // Ledger is in insertion order; stable sorts keep that order for equal timestamps.
    match order {
        TimeOrder::OldestFirst => list.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        TimeOrder::NewestFirst => {
            list.reverse();
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }
    list
}

impl VendorStore for InMemoryStore {
    async fn get(&self, id: &VendorId) -> Result<Option<Vendor>, StoreError> {
        tokio::task::yield_now().await;
        let mut inner = self.lock()?;
        inner.take_fault(PostingStep::VendorRead)?;
        Ok(inner.vendors.get(id).cloned())
    }

    async fn update(&self, id: &VendorId, patch: &VendorPatch) -> Result<Vendor, StoreError> {
        tokio::task::yield_now().await;
        let mut inner = self.lock()?;
        inner.take_fault(PostingStep::VendorUpdate)?;
        let vendor = inner.vendor_mut(id)?;
        vendor.apply(patch);
        Ok(vendor.clone())
    }
}

impl WriteOffStore for InMemoryStore {
    async fn insert(&self, record: NewWriteOff) -> Result<WriteOff, StoreError> {
        tokio::task::yield_now().await;
        let mut inner = self.lock()?;
        inner.take_fault(PostingStep::WriteOffInsert)?;
        if !inner.vendors.contains_key(&record.vendor_id) {
            return Err(StoreError::VendorMissing(record.vendor_id));
        }
        Ok(inner.append(record))
    }

    async fn list_by_vendor(
        &self,
        id: &VendorId,
        order: TimeOrder,
    ) -> Result<Vec<WriteOff>, StoreError> {
        tokio::task::yield_now().await;
        let list = self
            .lock()?
            .ledger
            .iter()
            .filter(|w| &w.vendor_id == id)
            .cloned()
            .collect();
        Ok(ordered(list, order))
    }

    async fn list_all(&self, order: TimeOrder) -> Result<Vec<WriteOff>, StoreError> {
        tokio::task::yield_now().await;
        let list = self.lock()?.ledger.clone();
        Ok(ordered(list, order))
    }
}

impl PostingStore for InMemoryStore {
    fn capability(&self) -> PostingCapability {
        self.capability
    }

    async fn post_atomic(
        &self,
        record: NewWriteOff,
        patch: VendorPatch,
    ) -> Result<AtomicOutcome, StoreError> {
        if self.capability != PostingCapability::Atomic {
            return Err(StoreError::Unsupported);
        }

        tokio::task::yield_now().await;
        let mut inner = self.lock()?;
        inner.take_fault(PostingStep::AtomicPost)?;

        let vendor = inner.vendor_mut(&record.vendor_id)?;
        if vendor.outstanding < patch.decrement {
            return Ok(AtomicOutcome::InsufficientBalance {
                current: vendor.clone(),
            });
        }
        vendor.apply(&patch);
        let vendor = vendor.clone();

        let write_off = inner.append(record);
        Ok(AtomicOutcome::Posted { write_off, vendor })
    }
}
