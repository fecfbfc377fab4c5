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

//! DecimalFloat

use crate::error::DecimalError;
use crate::sema::DecFltSemantics;
use crate::var::{encode, DecimalVar};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Not;

const WIDTH_MISMATCH_MSG: &str =
    "the value should have a bit width that matches the semantics width";
const PADDING_BIT_MSG: &str = "the padding bit of an unsigned padded value should be clear";

/// An immutable decimal value tagged with its encoding semantics.
///
/// The payload is the raw bit pattern of the encoding: it always fits in
/// `semantics().width()` bits and is interpreted in two's complement when
/// the semantics is signed.
///
/// Equality and hashing are structural: two values are equal if and only if
/// their semantics and payloads are identical, which makes `DecimalFloat`
/// usable as a uniquing key. Use `compare()` for numeric ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecimalFloat {
    bits: BigUint,
    sema: DecFltSemantics,
}

impl DecimalFloat {
    /// Creates a `DecimalFloat` from a raw payload.
    ///
    /// # Panics
    /// Panics if `bits` does not fit in `sema.width()` bits, or if it sets
    /// the padding bit of an unsigned padded `sema`.
    #[inline]
    pub fn new(bits: BigUint, sema: DecFltSemantics) -> Self {
        assert!(bits.bits() <= u64::from(sema.width()), "{}", WIDTH_MISMATCH_MSG);
        assert!(
            !sema.has_unsigned_padding() || bits.bits() <= u64::from(sema.value_bits()),
            "{}",
            PADDING_BIT_MSG
        );
        DecimalFloat { bits, sema }
    }

    /// Creates a zero of `sema`.
    #[inline]
    pub fn zero(sema: DecFltSemantics) -> Self {
        DecimalFloat {
            bits: BigUint::zero(),
            sema,
        }
    }

    /// Reinterprets the payload of `other` under `sema`.
    ///
    /// # Panics
    /// Panics if the widths of `other` and `sema` differ, or if the payload
    /// sets the padding bit of an unsigned padded `sema`.
    #[inline]
    pub fn with_semantics(other: &DecimalFloat, sema: DecFltSemantics) -> Self {
        assert_eq!(other.width(), sema.width(), "{}", WIDTH_MISMATCH_MSG);
        DecimalFloat::new(other.bits.clone(), sema)
    }

    /// Returns the largest value of `sema`.
    pub fn get_max(sema: &DecFltSemantics) -> Self {
        DecimalFloat::new(encode(&sema.max_int(), sema), *sema)
    }

    /// Returns the smallest value of `sema`.
    pub fn get_min(sema: &DecFltSemantics) -> Self {
        DecimalFloat::new(encode(&sema.min_int(), sema), *sema)
    }

    /// Returns one unit in the last place of `sema`, the payload one.
    ///
    /// A signed one-bit `sema` has only the values zero and minus one, so
    /// there the payload one reads as minus one unit.
    ///
    /// # Panics
    /// Panics if `sema` is unsigned and padded with a width of one, which
    /// leaves no value bits.
    #[inline]
    pub fn get_epsilon(sema: &DecFltSemantics) -> Self {
        DecimalFloat::new(BigUint::one(), *sema)
    }

    #[inline]
    pub fn semantics(&self) -> DecFltSemantics {
        self.sema
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.sema.width()
    }

    /// Returns the raw payload.
    #[inline]
    pub fn bits(&self) -> &BigUint {
        &self.bits
    }

    /// Returns the raw payload, consuming `self`.
    #[inline]
    pub fn bitcast_to_bits(self) -> BigUint {
        self.bits
    }

    /// Returns the payload interpreted as an integer, signed or not as the
    /// semantics says.
    #[inline]
    pub fn value(&self) -> BigInt {
        self.as_var().into_value()
    }

    /// No value owns resources beyond its payload.
    #[inline]
    pub const fn needs_cleanup(&self) -> bool {
        false
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    #[inline]
    pub fn bool_value(&self) -> bool {
        !self.is_zero()
    }

    /// Checks if `self` is less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sema.is_signed() && self.bits.bit(u64::from(self.width() - 1))
    }

    #[inline]
    pub(crate) fn as_var(&self) -> DecimalVar {
        DecimalVar::from_payload(&self.bits, &self.sema)
    }

    /// Promotes `self` and `other` to their common semantics.
    fn promote(
        &self,
        other: &Self,
    ) -> Result<(DecimalVar, DecimalVar, DecFltSemantics), DecimalError> {
        let sema = self.sema.get_common_semantics(&other.sema)?;
        let lhs = self.as_var().rescale(sema.lsb_weight());
        let rhs = other.as_var().rescale(sema.lsb_weight());
        Ok((lhs, rhs, sema))
    }

    /// Computes `self + other` in the common semantics of both operands.
    ///
    /// Returns the result and whether it overflowed.
    pub fn add(&self, other: &Self) -> Result<(Self, bool), DecimalError> {
        let (lhs, rhs, sema) = self.promote(other)?;
        Ok(lhs.add_common(&rhs).make_result(&sema))
    }

    /// Computes `self - other` in the common semantics of both operands.
    ///
    /// Returns the result and whether it overflowed.
    pub fn sub(&self, other: &Self) -> Result<(Self, bool), DecimalError> {
        let (lhs, rhs, sema) = self.promote(other)?;
        Ok(lhs.sub_common(&rhs).make_result(&sema))
    }

    /// Computes `self * other` in the common semantics of both operands.
    /// Digits below the common scale round toward negative infinity.
    ///
    /// Returns the result and whether it overflowed.
    pub fn mul(&self, other: &Self) -> Result<(Self, bool), DecimalError> {
        let (lhs, rhs, sema) = self.promote(other)?;
        Ok(lhs.mul_common(&rhs, sema.lsb_weight()).make_result(&sema))
    }

    /// Computes `self / other` in the common semantics of both operands.
    /// Digits below the common scale round toward negative infinity.
    ///
    /// Returns the result and whether it overflowed, or `DivisionByZero` if
    /// the payload of `other` is zero.
    pub fn div(&self, other: &Self) -> Result<(Self, bool), DecimalError> {
        if other.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }

        let (lhs, rhs, sema) = self.promote(other)?;
        let quotient = lhs
            .div_common(&rhs, sema.lsb_weight())
            .ok_or(DecimalError::DivisionByZero)?;
        Ok(quotient.make_result(&sema))
    }

    /// Adds one unit in the last place.
    ///
    /// Returns the result and whether it overflowed. Unlike adding
    /// `get_epsilon()`, this always counts upwards, even in a signed one-bit
    /// semantics.
    pub fn inc(&self) -> (Self, bool) {
        let next = DecimalVar::new(self.value() + 1, self.sema.lsb_weight());
        next.make_result(&self.sema)
    }

    /// Negates `self` in two's complement: all bits flipped, plus one unit
    /// in the last place.
    ///
    /// Negating the smallest signed value or any non-zero unsigned value
    /// overflows.
    pub fn negate(&self) -> (Self, bool) {
        let negated = DecimalVar::new(-self.value(), self.sema.lsb_weight());
        negated.make_result(&self.sema)
    }

    /// Flips every payload bit, except the padding bit of an unsigned padded
    /// semantics.
    pub fn flip_all_bits(&self) -> Self {
        let mask = if self.sema.is_signed() {
            self.sema.modulus() - 1u8
        } else {
            (BigUint::one() << self.sema.value_bits()) - 1u8
        };
        DecimalFloat::new(&self.bits ^ mask, self.sema)
    }

    /// Re-expresses `self` in `dst` by shifting its decimal digits.
    ///
    /// Digits below the scale of `dst` round toward negative infinity.
    /// Returns the result and whether it overflowed.
    pub fn convert(&self, dst: &DecFltSemantics) -> (Self, bool) {
        if self.sema == *dst {
            return (self.clone(), false);
        }

        self.as_var().rescale(dst.lsb_weight()).make_result(dst)
    }

    /// Compares the numbers `self` and `other` represent, regardless of
    /// their semantics.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.as_var().cmp_common(&other.as_var())
    }

    /// Convert `self` to text representation.
    #[inline]
    pub fn write<W: fmt::Write>(&self, f: &mut W) -> Result<(), fmt::Error> {
        self.as_var().write(f)
    }
}

impl Not for &DecimalFloat {
    type Output = DecimalFloat;

    #[inline]
    fn not(self) -> DecimalFloat {
        self.flip_all_bits()
    }
}

impl Not for DecimalFloat {
    type Output = DecimalFloat;

    #[inline]
    fn not(self) -> DecimalFloat {
        self.flip_all_bits()
    }
}

impl fmt::Display for DecimalFloat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        self.write(f)
    }
}
