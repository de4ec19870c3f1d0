//! Checkout price tiers
//!
//! The pool server only accepts a fixed set of amounts, so any requested
//! price is mapped to the closest authorized tier before forwarding.

use crate::error::{Error, Result};

/// Authorized pool tiers in USD, ascending
pub const AUTHORIZED_TIERS: [u32; 4] = [19, 29, 59, 99];

/// Map `amount` to the nearest authorized tier. Equal distance goes to the
/// lower tier (44 -> 29).
pub fn nearest_tier(amount: f64) -> Result<u32> {
    nearest_in(&AUTHORIZED_TIERS, amount)
}

/// Nearest value of `tiers` to `amount`, ties to the lower value.
pub fn nearest_in(tiers: &[u32], amount: f64) -> Result<u32> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    tiers
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (f64::from(*a) - amount).abs();
            let db = (f64::from(*b) - amount).abs();
            da.total_cmp(&db).then(a.cmp(b))
        })
        .ok_or_else(|| Error::InvalidConfig("no authorized tiers configured".to_string()))
}
