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

//! Conversions between decimals, integers and binary floats.

use crate::error::DecimalError;
use crate::float::{BinaryFloat, FloatFormat};
use crate::num::DecimalFloat;
use crate::sema::DecFltSemantics;
use crate::var::{pow10, DecimalVar};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::One;
use rustc_apfloat::Round;

impl DecimalFloat {
    /// Creates a decimal of `dst` from an integer.
    ///
    /// Digits below the scale of `dst` are truncated toward zero.
    /// Returns the result and whether it overflowed.
    pub fn get_from_int_value(value: &BigInt, dst: &DecFltSemantics) -> (Self, bool) {
        DecimalVar::new(value.clone(), 0)
            .rescale_trunc(dst.lsb_weight())
            .make_result(dst)
    }

    /// Creates a decimal of `dst` from a binary float.
    ///
    /// The float is decoded exactly and digits below the scale of `dst` are
    /// truncated toward zero. NaN gives zero and infinities give the bound
    /// of their sign if `dst` saturates and zero otherwise, all reported as
    /// overflow.
    ///
    /// Returns the result and whether it overflowed.
    pub fn get_from_float_value(value: BinaryFloat, dst: &DecFltSemantics) -> (Self, bool) {
        let (negative, sig, exp) = match value.decompose() {
            Some(parts) => parts,
            None => {
                let result = if value.is_infinite() && dst.is_saturated() {
                    if value.is_negative() {
                        DecimalFloat::get_min(dst)
                    } else {
                        DecimalFloat::get_max(dst)
                    }
                } else {
                    DecimalFloat::zero(*dst)
                };
                return (result, true);
            }
        };

        // magnitude = num / den, with the decimal scale folded in
        let mut num = BigInt::from_biguint(Sign::Plus, sig);
        let mut den = BigInt::one();
        if exp >= 0 {
            num <<= exp as usize;
        } else {
            den <<= (-exp) as usize;
        }

        let lsb_weight = dst.lsb_weight();
        if lsb_weight >= 0 {
            den *= pow10(lsb_weight as u32);
        } else {
            num *= pow10((-lsb_weight) as u32);
        }

        let magnitude = num / den;
        let value = if negative { -magnitude } else { magnitude };
        DecimalVar::new(value, lsb_weight).make_result(dst)
    }

    /// Converts `self` to an integer of `dst_width` bits, truncating toward
    /// zero.
    ///
    /// An out-of-range integer is clamped if `self` saturates, and otherwise
    /// wraps around in `dst_width` bits.
    ///
    /// Returns the integer and whether it overflowed.
    ///
    /// # Panics
    /// Panics if `dst_width` is zero.
    pub fn to_int(&self, dst_width: u32, dst_signed: bool) -> (BigInt, bool) {
        assert!(dst_width > 0, "the integer width should not be zero");

        let value = self.as_var().rescale_trunc(0).into_value();
        let (min, max) = if dst_signed {
            let half = BigInt::one() << (dst_width - 1);
            (-half.clone(), half - 1)
        } else {
            (BigInt::from(0), (BigInt::one() << dst_width) - 1)
        };

        if value >= min && value <= max {
            return (value, false);
        }

        if self.semantics().is_saturated() {
            let bound = if value < min { min } else { max };
            return (bound, true);
        }

        let modulus = BigInt::one() << dst_width;
        let mut wrapped = value.mod_floor(&modulus);
        if wrapped > max {
            wrapped -= modulus;
        }
        (wrapped, true)
    }

    /// Converts `self` to a binary float of `format`, rounding once with
    /// `round`.
    ///
    /// The semantics must fit a format on the promotion chain of `format`.
    /// The exact value `value() * 10^lsb_weight` is then rounded directly
    /// into `format`, and results beyond its range overflow as `round`
    /// says.
    ///
    /// Returns `NoWiderFloatFormat` if no format is wide enough to hold the
    /// payloads of the semantics.
    pub fn to_float(&self, format: FloatFormat, round: Round) -> Result<BinaryFloat, DecimalError> {
        let sema = self.semantics();

        let mut working = format;
        while !sema.fits_in_float_semantics(working) {
            working = working.promote().ok_or_else(|| {
                tracing::debug!(
                    semantics = %sema,
                    format = ?working,
                    "no float format can hold the decimal payload"
                );
                DecimalError::NoWiderFloatFormat(working)
            })?;
        }

        let lsb_weight = sema.lsb_weight();
        let (num, den) = if lsb_weight >= 0 {
            (self.value() * pow10(lsb_weight as u32), BigUint::one())
        } else {
            let (_, den) = pow10((-lsb_weight) as u32).into_parts();
            (self.value(), den)
        };

        Ok(BinaryFloat::from_ratio(format, &num, &den, round).value)
    }
}
