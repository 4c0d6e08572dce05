//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! Order prices and quantities are stored as `u64` scaled by 10^8, so the
//! crossing test and the fill-conservation checks in the book are exact
//! integer comparisons. Money held by participants (cash, average cost,
//! P&L) is kept as [`Decimal`]; the helpers here convert between the two.
//!
//! ## Examples
//!
//! ```
//! use tradematch::types::price::{from_fixed, to_fixed, units};
//!
//! let price = to_fixed("150.25").unwrap();
//! assert_eq!(price, 15_025_000_000);
//! assert_eq!(from_fixed(price), "150.25000000");
//! assert_eq!(units(100), 10_000_000_000);
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
///
/// This provides 8 decimal places of precision.
pub const SCALE: u64 = 100_000_000;

/// Largest whole-unit value representable without overflow.
pub const MAX_UNITS: u64 = u64::MAX / SCALE;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a whole number of units to fixed-point.
///
/// Saturates at `u64::MAX` for values above [`MAX_UNITS`].
#[inline]
pub fn units(whole: u64) -> u64 {
    whole.saturating_mul(SCALE)
}

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` when the string does not parse, is negative, or does
/// not fit in a `u64` once scaled.
///
/// ```
/// use tradematch::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-3"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a [`Decimal`] to fixed-point, rounding to 8 places.
///
/// Negative or out-of-range values yield `None`.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert a fixed-point value to a [`Decimal`].
#[inline]
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render a fixed-point value with all 8 decimal places.
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Render a fixed-point value with trailing zeros removed.
///
/// ```
/// use tradematch::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    fixed_to_decimal(value).normalize().to_string()
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Cash value of `quantity` units at `price`, both fixed-point.
///
/// Computed in [`Decimal`] so the product never overflows and keeps
/// full precision (up to 16 decimal places).
///
/// ```
/// use tradematch::types::price::{notional, units};
/// use rust_decimal::Decimal;
///
/// assert_eq!(notional(units(50), units(150)), Decimal::from(7_500));
/// ```
#[inline]
pub fn notional(quantity: u64, price: u64) -> Decimal {
    fixed_to_decimal(quantity) * fixed_to_decimal(price)
}

/// Multiply two fixed-point values, returning a fixed-point result.
///
/// `None` on overflow.
pub fn checked_mul(a: u64, b: u64) -> Option<u64> {
    let result = fixed_to_decimal(a).checked_mul(fixed_to_decimal(b))?;
    decimal_to_fixed(result)
}

/// Divide two fixed-point values, returning a fixed-point result.
///
/// `None` when `b` is zero or on overflow.
pub fn checked_div(a: u64, b: u64) -> Option<u64> {
    if b == 0 {
        return None;
    }

    let result = fixed_to_decimal(a).checked_div(fixed_to_decimal(b))?;
    decimal_to_fixed(result)
}

// ============================================================================
// Unit Tests
// ============================================================================
