use tracing::error;

use crate::domain::PostingError;

/// Receives failures that left the store in a state needing manual repair.
pub trait ReconciliationSink {
    fn report(&self, item: usize, error: &PostingError);
}

/// True when a write-off landed without its vendor debit.
pub fn needs_reconciliation(error: &PostingError) -> bool {
    matches!(
        error,
        PostingError::Persistence {
            write_off: Some(_),
            ..
        }
    )
}

#[derive(Default, Debug)]
pub struct LogReconciliation {}

impl ReconciliationSink for LogReconciliation {
    fn report(&self, item: usize, err: &PostingError) {
        if let PostingError::Persistence {
            write_off: Some(write_off),
            step,
            ..
        } = err
        {
            error!(item, %write_off, %step, "orphaned write-off needs reconciliation");
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{PostingStep, StoreError, VendorId};

    #[test]
    fn only_orphaned_write_offs_need_reconciliation() {
        let insert_failed = PostingError::Persistence {
            step: PostingStep::WriteOffInsert,
            write_off: None,
            source: StoreError::Unavailable("down".into()),
        };
        assert!(!needs_reconciliation(&insert_failed));
        assert!(!needs_reconciliation(&PostingError::NoPendingBalance(
            VendorId::new("v1")
        )));

        let write_off = crate::domain::WriteOff::from_new(
            crate::domain::NewWriteOff {
                reference: "FM-1".into(),
                note: None,
                amount: Decimal::ONE,
                date: chrono::Utc::now(),
                vendor_id: VendorId::new("v1"),
                actor_id: None,
                branch_id: None,
            },
            chrono::Utc::now(),
        );
        let update_failed = PostingError::Persistence {
            step: PostingStep::VendorUpdate,
            write_off: Some(Box::new(write_off)),
            source: StoreError::Unavailable("down".into()),
        };
        assert!(needs_reconciliation(&update_failed));
    }
}
