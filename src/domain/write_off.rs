use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::VendorId;

/// Insert payload for a write-off. The amount is the effective (clamped) one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWriteOff {
    pub reference: String,
    pub note: Option<String>,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub vendor_id: VendorId,
    pub actor_id: Option<String>,
    pub branch_id: Option<String>,
}

/// Immutable stored write-off record.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOff {
    pub id: Uuid,
    pub reference: String,
    pub note: Option<String>,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub vendor_id: VendorId,
    pub actor_id: Option<String>,
    pub branch_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WriteOff {
    pub fn from_new(record: NewWriteOff, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference: record.reference,
            note: record.note,
            amount: record.amount,
            date: record.date,
            vendor_id: record.vendor_id,
            actor_id: record.actor_id,
            branch_id: record.branch_id,
            created_at,
        }
    }
}

impl core::fmt::Display for WriteOff {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "write_off={},vendor={},reference={},amount={}",
            self.id, self.vendor_id, self.reference, self.amount
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}
