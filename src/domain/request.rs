use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{PostingError, VendorId, money};

/// Raw write-off request exactly as a caller submits it. Every field is
/// optional text so that missing or malformed input can be reported per item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WriteOffRequest {
    #[serde(rename = "vendor")]
    pub vendor_id: Option<String>,
    pub reference: Option<String>,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "actor")]
    pub actor_id: Option<String>,
    #[serde(rename = "branch")]
    pub branch_id: Option<String>,
}

impl WriteOffRequest {
    pub fn new(vendor_id: &str, reference: &str, amount: &str) -> Self {
        Self {
            vendor_id: Some(vendor_id.to_owned()),
            reference: Some(reference.to_owned()),
            amount: Some(amount.to_owned()),
            ..Self::default()
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_owned());
        self
    }

    pub fn with_actor(mut self, actor_id: &str, branch_id: &str) -> Self {
        self.actor_id = Some(actor_id.to_owned());
        self.branch_id = Some(branch_id.to_owned());
        self
    }

    /// Checks required fields and parses the date. Has no side effects.
    ///
    /// The amount is only checked for presence here. It is judged by
    /// [`ValidatedRequest::requested`] once the vendor is known to exist, so
    /// a missing vendor always wins over a bad amount.
    pub fn validate(&self) -> Result<ValidatedRequest, PostingError> {
        let mut missing = Vec::new();
        let vendor_id = present(&self.vendor_id);
        let reference = present(&self.reference);
        let amount = present(&self.amount);
        if vendor_id.is_none() {
            missing.push("vendor");
        }
        if reference.is_none() {
            missing.push("reference");
        }
        if amount.is_none() {
            missing.push("amount");
        }

        let (Some(vendor_id), Some(reference), Some(amount)) = (vendor_id, reference, amount)
        else {
            return Err(PostingError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        };

        let date = match present(&self.date) {
            Some(raw) => Some(parse_date(raw).ok_or_else(|| {
                PostingError::Validation(format!("'{raw}' is not a valid date"))
            })?),
            None => None,
        };

        Ok(ValidatedRequest {
            vendor_id: VendorId::new(vendor_id),
            reference: reference.to_owned(),
            amount: amount.to_owned(),
            note: present(&self.note).map(str::to_owned),
            date,
            actor_id: present(&self.actor_id).map(str::to_owned),
            branch_id: present(&self.branch_id).map(str::to_owned),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub vendor_id: VendorId,
    pub reference: String,
    pub amount: String,
    pub note: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub actor_id: Option<String>,
    pub branch_id: Option<String>,
}

impl ValidatedRequest {
    /// The requested amount, which must be a positive number.
    pub fn requested(&self) -> Result<Decimal, PostingError> {
        match money::parse_amount(&self.amount) {
            Some(amount) if amount > Decimal::ZERO => Ok(amount),
            Some(_) => Err(PostingError::InvalidAmount(format!(
                "{} is not a positive amount",
                self.amount
            ))),
            None => Err(PostingError::InvalidAmount(format!(
                "'{}' is not a number",
                self.amount
            ))),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
