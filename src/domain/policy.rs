//! Balance policy: decides how much of a requested write-off may be posted
//! against a vendor and whether the vendor reaches its terminal status.
//!
//! Everything here is pure. The same snapshot, amount and tracking flag always
//! produce the same [`PolicyDecision`].

use rust_decimal::Decimal;

use crate::domain::{Vendor, VendorPatch, VendorStatus};

/// Whether vendors carry a status attribute that the policy should drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTracking {
    Enabled,
    Disabled,
}

impl From<bool> for StatusTracking {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoPendingBalance,
    InvalidAmount,
    EffectiveAmountZero,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approval {
    pub effective: Decimal,
    pub remaining: Decimal,
    pub status: Option<VendorStatus>,
}

impl Approval {
    pub fn clamped(&self, requested: Decimal) -> bool {
        self.effective < requested
    }

    pub fn patch(&self) -> VendorPatch {
        VendorPatch {
            decrement: self.effective,
            status: self.status,
        }
    }
}

pub type PolicyDecision = Result<Approval, Rejection>;

pub fn evaluate(
    outstanding: Decimal,
    requested: Decimal,
    tracking: StatusTracking,
) -> PolicyDecision {
    if requested <= Decimal::ZERO {
        return Err(Rejection::InvalidAmount);
    }
    if outstanding <= Decimal::ZERO {
        return Err(Rejection::NoPendingBalance);
    }

    let effective = requested.min(outstanding);
    if effective <= Decimal::ZERO {
        return Err(Rejection::EffectiveAmountZero);
    }

    let remaining = outstanding - effective;
    let status = match tracking {
        StatusTracking::Enabled if remaining <= Decimal::ZERO => Some(VendorStatus::WrittenOff),
        _ => None,
    };

    Ok(Approval {
        effective,
        remaining,
        status,
    })
}

pub fn evaluate_vendor(
    vendor: &Vendor,
    requested: Decimal,
    tracking: StatusTracking,
) -> PolicyDecision {
    evaluate(vendor.outstanding, requested, tracking)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn partial_write_off_keeps_status() {
        let approval = evaluate(d(5000), d(500), StatusTracking::Enabled).unwrap();
        assert_eq!(approval.effective, d(500));
        assert_eq!(approval.remaining, d(4500));
        assert_eq!(approval.status, None);
        assert!(!approval.clamped(d(500)));
    }

    #[test]
    fn over_request_is_clamped_and_terminal() {
        let approval = evaluate(d(300), d(1000), StatusTracking::Enabled).unwrap();
        assert_eq!(approval.effective, d(300));
        assert_eq!(approval.remaining, Decimal::ZERO);
        assert_eq!(approval.status, Some(VendorStatus::WrittenOff));
        assert!(approval.clamped(d(1000)));
    }

    #[test]
    fn exact_payoff_without_tracking_signals_nothing() {
        let approval = evaluate(d(300), d(300), StatusTracking::Disabled).unwrap();
        assert_eq!(approval.remaining, Decimal::ZERO);
        assert_eq!(approval.status, None);
    }

    #[test]
    fn bad_amount_is_rejected_before_empty_balance() {
        assert_eq!(
            evaluate(Decimal::ZERO, d(-1), StatusTracking::Enabled),
            Err(Rejection::InvalidAmount)
        );
        assert_eq!(
            evaluate(Decimal::ZERO, d(5), StatusTracking::Enabled),
            Err(Rejection::NoPendingBalance)
        );
        assert_eq!(
            evaluate(d(-10), d(5), StatusTracking::Enabled),
            Err(Rejection::NoPendingBalance)
        );
    }

    #[test]
    fn non_positive_request_is_invalid() {
        assert_eq!(
            evaluate(d(100), Decimal::ZERO, StatusTracking::Enabled),
            Err(Rejection::InvalidAmount)
        );
        assert_eq!(
            evaluate(d(100), d(-3), StatusTracking::Enabled),
            Err(Rejection::InvalidAmount)
        );
    }

    #[test]
    fn decision_is_repeatable() {
        let inputs = [(d(500), d(300)), (d(200), d(300)), (d(1), d(1))];
        for (outstanding, requested) in inputs {
            for tracking in [StatusTracking::Enabled, StatusTracking::Disabled] {
                let first = evaluate(outstanding, requested, tracking);
                let second = evaluate(outstanding, requested, tracking);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn effective_is_min_and_remaining_never_negative() {
        for outstanding in [1i64, 7, 300, 5000] {
            for requested in [1i64, 6, 300, 301, 10_000] {
                let approval =
                    evaluate(d(outstanding), d(requested), StatusTracking::Disabled).unwrap();
                assert_eq!(approval.effective, d(requested.min(outstanding)));
                assert!(approval.remaining >= Decimal::ZERO);
                assert_eq!(approval.remaining, d(outstanding) - approval.effective);
            }
        }
    }
}
