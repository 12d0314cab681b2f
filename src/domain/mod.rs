pub mod error;
pub mod money;
pub mod policy;
pub mod request;
pub mod traits;
pub mod vendor;
pub mod write_off;

pub use error::{BatchError, Error, PostingError, PostingStep, ReasonCode, StoreError};
pub use policy::{Approval, Rejection, StatusTracking};
pub use request::{ValidatedRequest, WriteOffRequest};
pub use traits::{
    AtomicOutcome, PostingCapability, PostingStore, RequestStream, VendorStore,
    WriteOffStore,
};
pub use vendor::{Vendor, VendorId, VendorPatch, VendorStatus};
pub use write_off::{NewWriteOff, TimeOrder, WriteOff};
