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

//! Decimal encoding semantics.

use crate::error::DecimalError;
use crate::float::{BinaryFloat, FloatFormat};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use rustc_apfloat::{Round, Status};
use std::fmt;

/// Largest encodable payload width, the range of a 16-bit width field.
pub const MAX_WIDTH: u32 = u16::MAX as u32;

/// Smallest lsb weight, the range of a signed 13-bit field.
pub const MIN_LSB_WEIGHT: i32 = -(1 << 12);

/// Largest lsb weight, the range of a signed 13-bit field.
pub const MAX_LSB_WEIGHT: i32 = (1 << 12) - 1;

/// Describes one decimal floating point encoding.
///
/// A payload of `width` bits holds an integer `n`, interpreted in two's
/// complement when the semantics is signed. The encoded number is
/// `n * 10^lsb_weight`.
///
/// An unsigned encoding may carry a padding bit: the most significant bit
/// of the payload is reserved and never holds a value bit, so that the
/// unsigned type has the same number of value bits as a signed type of the
/// same width.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DecFltSemantics {
    width: u16,
    lsb_weight: i16,
    is_signed: bool,
    is_saturated: bool,
    has_unsigned_padding: bool,
}

impl DecFltSemantics {
    /// Creates a `DecFltSemantics`.
    ///
    /// Returns `UnrepresentableSemantics`:
    /// * if `width` is not in `1..=MAX_WIDTH`
    /// * if `-scale` is not in `MIN_LSB_WEIGHT..=MAX_LSB_WEIGHT`
    ///
    /// `has_unsigned_padding` is ignored for signed semantics.
    pub fn new(
        width: u32,
        scale: i32,
        is_signed: bool,
        is_saturated: bool,
        has_unsigned_padding: bool,
    ) -> Result<Self, DecimalError> {
        Self::from_parts(
            i64::from(width),
            -i64::from(scale),
            is_signed,
            is_saturated,
            has_unsigned_padding,
        )
    }

    /// Returns the semantics of a plain integer type.
    pub fn integer(width: u32, is_signed: bool) -> Result<Self, DecimalError> {
        Self::new(width, 0, is_signed, false, false)
    }

    fn from_parts(
        width: i64,
        lsb_weight: i64,
        is_signed: bool,
        is_saturated: bool,
        has_unsigned_padding: bool,
    ) -> Result<Self, DecimalError> {
        if !(1..=i64::from(MAX_WIDTH)).contains(&width)
            || !(i64::from(MIN_LSB_WEIGHT)..=i64::from(MAX_LSB_WEIGHT)).contains(&lsb_weight)
        {
            return Err(DecimalError::UnrepresentableSemantics { width, lsb_weight });
        }

        Ok(DecFltSemantics {
            width: width as u16,
            lsb_weight: lsb_weight as i16,
            is_signed,
            is_saturated,
            has_unsigned_padding: has_unsigned_padding && !is_signed,
        })
    }

    /// Returns a copy of `self` with the saturation policy replaced.
    #[inline]
    pub const fn with_saturation(self, is_saturated: bool) -> Self {
        DecFltSemantics {
            is_saturated,
            ..self
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width as u32
    }

    /// Number of decimal digits after the decimal point, `-lsb_weight`.
    #[inline]
    pub const fn scale(&self) -> i32 {
        -(self.lsb_weight as i32)
    }

    /// Power-of-ten weight of the least significant payload unit.
    #[inline]
    pub const fn lsb_weight(&self) -> i32 {
        self.lsb_weight as i32
    }

    #[inline]
    pub const fn msb_weight(&self) -> i32 {
        // both lsb and msb are part of the width
        self.lsb_weight as i32 + self.width as i32 - 1
    }

    #[inline]
    pub const fn is_signed(&self) -> bool {
        self.is_signed
    }

    #[inline]
    pub const fn is_saturated(&self) -> bool {
        self.is_saturated
    }

    #[inline]
    pub const fn has_unsigned_padding(&self) -> bool {
        self.has_unsigned_padding
    }

    #[inline]
    pub const fn has_sign_or_padding_bit(&self) -> bool {
        self.is_signed || self.has_unsigned_padding
    }

    #[inline]
    pub fn integral_bits(&self) -> u32 {
        let bits = self.msb_weight() + 1 - self.has_sign_or_padding_bit() as i32;
        bits.max(0) as u32
    }

    /// Computes the semantics both `self` and `other` are promoted to when
    /// they meet in one operation.
    ///
    /// The finer scale wins. Magnitude budgets are compared without the sign
    /// or padding bit, which is added back once the signedness and the
    /// saturation policy of the result are known.
    pub fn get_common_semantics(&self, other: &Self) -> Result<Self, DecimalError> {
        let common_lsb = self.lsb_weight().min(other.lsb_weight());
        let common_msb = (self.msb_weight() - self.has_sign_or_padding_bit() as i32)
            .max(other.msb_weight() - other.has_sign_or_padding_bit() as i32);
        let mut common_width = i64::from(common_msb) - i64::from(common_lsb) + 1;

        let is_signed = self.is_signed || other.is_signed;
        let is_saturated = self.is_saturated || other.is_saturated;

        // An unsigned padded result only keeps its padding bit when it
        // does not saturate.
        let has_unsigned_padding = !is_signed
            && self.has_unsigned_padding
            && other.has_unsigned_padding
            && !is_saturated;

        if is_signed || has_unsigned_padding {
            common_width += 1;
        }

        Self::from_parts(
            common_width,
            i64::from(common_lsb),
            is_signed,
            is_saturated,
            has_unsigned_padding,
        )
        .inspect_err(|_| {
            tracing::debug!(
                width = common_width,
                lsb_weight = common_lsb,
                "common decimal semantics is not representable"
            );
        })
    }

    /// Checks if the integer bounds of `self` can be rounded into `format`
    /// without overflowing it.
    ///
    /// If the bounds do not fit, a rescaled bound will not fit either, so
    /// `format` cannot be used as the working format of a conversion.
    pub fn fits_in_float_semantics(&self, format: FloatFormat) -> bool {
        let max = BinaryFloat::from_bigint(format, &self.max_int(), Round::NearestTiesToAway);
        if max.status.contains(Status::OVERFLOW) || !self.is_signed {
            return !max.status.contains(Status::OVERFLOW);
        }

        let min = BinaryFloat::from_bigint(format, &self.min_int(), Round::NearestTiesToAway);
        !min.status.contains(Status::OVERFLOW)
    }

    /// Number of payload bits carrying magnitude, the top bit excluded for
    /// signed and padded encodings.
    #[inline]
    pub(crate) fn value_bits(&self) -> u32 {
        self.width() - self.has_sign_or_padding_bit() as u32
    }

    /// `2^width`, the wrap-around modulus of the payload.
    #[inline]
    pub(crate) fn modulus(&self) -> BigUint {
        BigUint::one() << self.width()
    }

    /// Largest payload integer.
    #[inline]
    pub(crate) fn max_int(&self) -> BigInt {
        (BigInt::one() << self.value_bits()) - 1
    }

    /// Smallest payload integer.
    #[inline]
    pub(crate) fn min_int(&self) -> BigInt {
        if self.is_signed {
            -(BigInt::one() << (self.width() - 1))
        } else {
            BigInt::zero()
        }
    }
}

impl fmt::Display for DecFltSemantics {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "({}, {}, {}",
            self.width(),
            self.scale(),
            if self.is_signed { "signed" } else { "unsigned" }
        )?;
        if self.is_saturated {
            write!(f, ", saturated")?;
        }
        if self.has_unsigned_padding {
            write!(f, ", padded")?;
        }
        write!(f, ")")
    }
}
