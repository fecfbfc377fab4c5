// Copyright 2020 CoD Technologies Corp.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! DecimalVar.

use crate::num::DecimalFloat;
use crate::sema::DecFltSemantics;
use lazy_static::lazy_static;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Powers of ten below this exponent are served from a table.
const POW10_CACHED: u32 = 64;

lazy_static! {
    static ref POW10: Vec<BigInt> = {
        let ten = BigInt::from(10u8);
        let mut powers = Vec::with_capacity(POW10_CACHED as usize);
        let mut p = BigInt::one();
        for _ in 0..POW10_CACHED {
            powers.push(p.clone());
            p *= &ten;
        }
        powers
    };
}

/// Returns `10^exp`.
#[inline]
pub(crate) fn pow10(exp: u32) -> BigInt {
    match POW10.get(exp as usize) {
        Some(p) => p.clone(),
        None => BigInt::from(10u8).pow(exp),
    }
}

/// `DecimalVar` is the exact form we use for arithmetic.
///
/// The represented number is `value * 10^lsb_weight`. Unlike an encoded
/// payload, `value` is unbounded: every operation is computed exactly here
/// and only `make_result()` fits the result back into an encoding, which is
/// where overflow, saturation and wrap-around happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecimalVar {
    value: BigInt,
    lsb_weight: i32,
}

impl DecimalVar {
    #[inline]
    pub fn new(value: BigInt, lsb_weight: i32) -> Self {
        DecimalVar { value, lsb_weight }
    }

    /// Decodes a payload of `sema`.
    pub fn from_payload(bits: &BigUint, sema: &DecFltSemantics) -> Self {
        let width = sema.width();
        let value = if sema.is_signed() && bits.bit(u64::from(width - 1)) {
            BigInt::from_biguint(Sign::Plus, bits.clone()) - (BigInt::one() << width)
        } else {
            BigInt::from_biguint(Sign::Plus, bits.clone())
        };

        DecimalVar::new(value, sema.lsb_weight())
    }

    #[inline]
    pub fn into_value(self) -> BigInt {
        self.value
    }

    /// Re-expresses `self` with a least significant digit of weight
    /// `lsb_weight`. Dropped digits round toward negative infinity.
    pub fn rescale(&self, lsb_weight: i32) -> Self {
        let value = match lsb_weight.cmp(&self.lsb_weight) {
            Ordering::Equal => self.value.clone(),
            Ordering::Less => &self.value * pow10((self.lsb_weight - lsb_weight) as u32),
            Ordering::Greater => self
                .value
                .div_floor(&pow10((lsb_weight - self.lsb_weight) as u32)),
        };

        DecimalVar::new(value, lsb_weight)
    }

    /// Like `rescale()`, but dropped digits round toward zero.
    pub fn rescale_trunc(&self, lsb_weight: i32) -> Self {
        if lsb_weight > self.lsb_weight {
            let value = &self.value / pow10((lsb_weight - self.lsb_weight) as u32);
            DecimalVar::new(value, lsb_weight)
        } else {
            self.rescale(lsb_weight)
        }
    }

    /// Brings `self` and `other` to the finer of their two scales.
    fn align(&self, other: &Self) -> (BigInt, BigInt, i32) {
        let lsb_weight = self.lsb_weight.min(other.lsb_weight);
        (
            self.rescale(lsb_weight).value,
            other.rescale(lsb_weight).value,
            lsb_weight,
        )
    }

    pub fn add_common(&self, other: &Self) -> Self {
        let (a, b, lsb_weight) = self.align(other);
        DecimalVar::new(a + b, lsb_weight)
    }

    pub fn sub_common(&self, other: &Self) -> Self {
        let (a, b, lsb_weight) = self.align(other);
        DecimalVar::new(a - b, lsb_weight)
    }

    /// Computes `self * other` at the scale of `rlsb_weight`.
    pub fn mul_common(&self, other: &Self, rlsb_weight: i32) -> Self {
        let product = DecimalVar::new(
            &self.value * &other.value,
            self.lsb_weight + other.lsb_weight,
        );
        product.rescale(rlsb_weight)
    }

    /// Computes `self / other` at the scale of `rlsb_weight`, rounding
    /// toward negative infinity.
    ///
    /// Returns `None` if `other` is zero.
    pub fn div_common(&self, other: &Self, rlsb_weight: i32) -> Option<Self> {
        if other.value.is_zero() {
            return None;
        }

        // result = a * 10^la / (b * 10^lb * 10^rlsb)
        let shift = i64::from(other.lsb_weight) + i64::from(rlsb_weight);
        let exp = i64::from(self.lsb_weight) - shift;
        let quotient = if exp >= 0 {
            (&self.value * pow10(exp as u32)).div_floor(&other.value)
        } else {
            self.value.div_floor(&(&other.value * pow10((-exp) as u32)))
        };

        Some(DecimalVar::new(quotient, rlsb_weight))
    }

    /// Compares two numbers regardless of their scales.
    pub fn cmp_common(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.align(other);
        a.cmp(&b)
    }

    /// Make `self` to be a result decimal of `sema`.
    ///
    /// Returns the result and whether it overflowed. An out-of-range value
    /// is clamped when `sema` saturates, and otherwise wraps around in the
    /// two's complement encoding.
    pub fn make_result(self, sema: &DecFltSemantics) -> (DecimalFloat, bool) {
        debug_assert_eq!(self.lsb_weight, sema.lsb_weight());

        if self.value > sema.max_int() {
            if sema.is_saturated() {
                return (DecimalFloat::get_max(sema), true);
            }
        } else if self.value < sema.min_int() {
            if sema.is_saturated() {
                return (DecimalFloat::get_min(sema), true);
            }
        } else {
            return (DecimalFloat::new(encode(&self.value, sema), *sema), false);
        }

        (DecimalFloat::new(encode(&self.value, sema), *sema), true)
    }

    /// Convert `self` to text representation.
    ///
    /// Exactly `-lsb_weight` digits follow the decimal point; with a
    /// non-negative lsb weight there is no decimal point at all.
    pub fn write<W: fmt::Write>(&self, f: &mut W) -> Result<(), fmt::Error> {
        // Output a dash for negative values.
        if self.value.is_negative() {
            write!(f, "-")?;
        }

        let digits = self.value.magnitude().to_str_radix(10);

        if self.lsb_weight >= 0 {
            write!(f, "{}", digits)?;
            if !self.value.is_zero() {
                for _ in 0..self.lsb_weight {
                    write!(f, "0")?;
                }
            }
            return Ok(());
        }

        let scale = (-self.lsb_weight) as usize;
        if digits.len() > scale {
            let (integral, fractional) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", integral, fractional)
        } else {
            write!(f, "0.{:0>width$}", digits, width = scale)
        }
    }
}

/// Encodes an integer into a payload of `sema`, keeping the low-order bits.
///
/// Unsigned values wrap within the value bits so that a padding bit stays
/// clear.
pub(crate) fn encode(value: &BigInt, sema: &DecFltSemantics) -> BigUint {
    let bits = if sema.is_signed() {
        sema.width()
    } else {
        sema.value_bits()
    };
    let modulus = BigInt::one() << bits;

    value
        .mod_floor(&modulus)
        .to_biguint()
        .unwrap_or_else(BigUint::zero)
}

impl fmt::Display for DecimalVar {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        self.write(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(value: i64, lsb_weight: i32) -> DecimalVar {
        DecimalVar::new(BigInt::from(value), lsb_weight)
    }

    fn sema(
        width: u32,
        scale: i32,
        signed: bool,
        saturated: bool,
        padded: bool,
    ) -> DecFltSemantics {
        DecFltSemantics::new(width, scale, signed, saturated, padded).unwrap()
    }

    fn assert_write(value: i64, lsb_weight: i32, expected: &str) {
        assert_eq!(var(value, lsb_weight).to_string(), expected);
    }

    #[test]
    fn pow10_table() {
        assert_eq!(pow10(0), BigInt::one());
        assert_eq!(pow10(3), BigInt::from(1000));
        assert_eq!(pow10(POW10_CACHED - 1), BigInt::from(10u8).pow(POW10_CACHED - 1));
        assert_eq!(pow10(POW10_CACHED + 7), BigInt::from(10u8).pow(POW10_CACHED + 7));
    }

    #[test]
    fn write() {
        assert_write(0, 0, "0");
        assert_write(0, -2, "0.00");
        assert_write(0, 3, "0");
        assert_write(125, -1, "12.5");
        assert_write(-125, -1, "-12.5");
        assert_write(5, -2, "0.05");
        assert_write(-5, -2, "-0.05");
        assert_write(100, -2, "1.00");
        assert_write(123, 2, "12300");
        assert_write(-7, 1, "-70");
        assert_write(42, 0, "42");
        assert_write(1, -10, "0.0000000001");
    }

    #[test]
    fn rescale() {
        assert_eq!(var(125, -1).rescale(-3), var(12500, -3));
        assert_eq!(var(125, -1).rescale(0), var(12, 0));
        assert_eq!(var(-125, -1).rescale(0), var(-13, 0));
        assert_eq!(var(-125, -1).rescale_trunc(0), var(-12, 0));
        assert_eq!(var(7, 2).rescale(0), var(700, 0));
        assert_eq!(var(7, 2).rescale(2), var(7, 2));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(var(125, -1).add_common(&var(1, -2)), var(1251, -2));
        assert_eq!(var(125, -1).sub_common(&var(3, 0)), var(95, -1));
        assert_eq!(var(15, -1).mul_common(&var(25, -1), -2), var(375, -2));
        assert_eq!(var(15, -1).mul_common(&var(25, -1), -1), var(37, -1));
        assert_eq!(var(-15, -1).mul_common(&var(25, -1), -1), var(-38, -1));
        assert_eq!(var(10, 0).div_common(&var(4, 0), -2), Some(var(250, -2)));
        assert_eq!(var(1, 0).div_common(&var(3, 0), -3), Some(var(333, -3)));
        assert_eq!(var(-1, 0).div_common(&var(3, 0), -3), Some(var(-334, -3)));
        assert_eq!(var(5, 2).div_common(&var(5, -1), 1), Some(var(100, 1)));
        assert_eq!(var(1, 0).div_common(&var(0, -4), 0), None);
    }

    #[test]
    fn compare() {
        assert_eq!(var(125, -1).cmp_common(&var(1250, -2)), Ordering::Equal);
        assert_eq!(var(125, -1).cmp_common(&var(13, 0)), Ordering::Less);
        assert_eq!(var(-1, 3).cmp_common(&var(-999, 0)), Ordering::Less);
    }

    #[test]
    fn make_result() {
        let s = sema(8, 0, true, false, false);
        let (r, overflow) = var(127, 0).make_result(&s);
        assert!(!overflow);
        assert_eq!(r.value(), BigInt::from(127));

        let (r, overflow) = var(128, 0).make_result(&s);
        assert!(overflow);
        assert_eq!(r.value(), BigInt::from(-128));

        let (r, overflow) = var(-129, 0).make_result(&s.with_saturation(true));
        assert!(overflow);
        assert_eq!(r.value(), BigInt::from(-128));

        let u = sema(8, 0, false, false, true);
        let (r, overflow) = var(130, 0).make_result(&u);
        assert!(overflow);
        assert_eq!(r.bits(), &BigUint::from(2u8));

        let (r, overflow) = var(-1, 0).make_result(&u.with_saturation(true));
        assert!(overflow);
        assert!(r.is_zero());
    }

    #[test]
    fn from_payload() {
        let s = sema(8, 2, true, false, false);
        let v = DecimalVar::from_payload(&BigUint::from(0xFFu8), &s);
        assert_eq!(v, var(-1, -2));
        let v = DecimalVar::from_payload(&BigUint::from(0x7Fu8), &s);
        assert_eq!(v, var(127, -2));

        let u = sema(8, 2, false, false, false);
        let v = DecimalVar::from_payload(&BigUint::from(0xFFu8), &u);
        assert_eq!(v, var(255, -2));
    }
}
