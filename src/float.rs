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

//! Binary floating point values in a runtime-selected IEEE format.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rustc_apfloat::ieee;
use rustc_apfloat::{ExpInt, Float, FloatConvert, Round, Status, StatusAnd};
use std::fmt;

/// Binary floating point formats in scope.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FloatFormat {
    Half,
    BFloat,
    Single,
    Double,
    Quad,
}

impl FloatFormat {
    /// Number of significand bits, the integer bit included.
    #[inline]
    pub const fn precision(self) -> u32 {
        match self {
            FloatFormat::Half => 11,
            FloatFormat::BFloat => 8,
            FloatFormat::Single => 24,
            FloatFormat::Double => 53,
            FloatFormat::Quad => 113,
        }
    }

    /// Returns the next wider format, or `None` for the widest one.
    #[inline]
    pub const fn promote(self) -> Option<FloatFormat> {
        match self {
            FloatFormat::BFloat => Some(FloatFormat::Double),
            FloatFormat::Half => Some(FloatFormat::Single),
            FloatFormat::Single => Some(FloatFormat::Double),
            FloatFormat::Double => Some(FloatFormat::Quad),
            FloatFormat::Quad => None,
        }
    }
}

/// A binary floating point value tagged with its format.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BinaryFloat {
    Half(ieee::Half),
    BFloat(ieee::BFloat),
    Single(ieee::Single),
    Double(ieee::Double),
    Quad(ieee::Quad),
}

trait Format: Float {
    const FORMAT: FloatFormat;

    fn tag(self) -> BinaryFloat;
}

macro_rules! impl_format {
    ($t: ident) => {
        impl Format for ieee::$t {
            const FORMAT: FloatFormat = FloatFormat::$t;

            #[inline]
            fn tag(self) -> BinaryFloat {
                BinaryFloat::$t(self)
            }
        }
    };
}

impl_format!(Half);
impl_format!(BFloat);
impl_format!(Single);
impl_format!(Double);
impl_format!(Quad);

// Runs `$body` with `$x` bound to the wrapped value.
macro_rules! each_value {
    ($value: expr, $x: ident => $body: expr) => {
        match $value {
            BinaryFloat::Half($x) => $body,
            BinaryFloat::BFloat($x) => $body,
            BinaryFloat::Single($x) => $body,
            BinaryFloat::Double($x) => $body,
            BinaryFloat::Quad($x) => $body,
        }
    };
}

// Runs `$body` with `$f` aliased to the float type of `$format`.
macro_rules! each_format {
    ($format: expr, $f: ident => $body: expr) => {
        match $format {
            FloatFormat::Half => {
                type $f = ieee::Half;
                $body
            }
            FloatFormat::BFloat => {
                type $f = ieee::BFloat;
                $body
            }
            FloatFormat::Single => {
                type $f = ieee::Single;
                $body
            }
            FloatFormat::Double => {
                type $f = ieee::Double;
                $body
            }
            FloatFormat::Quad => {
                type $f = ieee::Quad;
                $body
            }
        }
    };
}

#[inline]
fn tagged<F: Format>(r: StatusAnd<F>) -> StatusAnd<BinaryFloat> {
    r.status.and(r.value.tag())
}

/// Rounding of a magnitude that is negated afterwards.
#[inline]
fn mirror(round: Round) -> Round {
    match round {
        Round::TowardPositive => Round::TowardNegative,
        Round::TowardNegative => Round::TowardPositive,
        other => other,
    }
}

/// Result of a magnitude beyond the range of `F`.
#[inline]
fn overflow<F: Float>(round: Round) -> StatusAnd<F> {
    let value = match round {
        Round::TowardZero | Round::TowardNegative => F::largest(),
        _ => F::INFINITY,
    };
    (Status::OVERFLOW | Status::INEXACT).and(value)
}

/// Rounds the exact ratio `num / den` into `F` with a single rounding.
///
/// The quotient is computed in integers at the weight of the last
/// significand bit of the result, denormals included, so the remainder
/// alone decides the rounding.
fn from_ratio_r<F: Float>(num: &BigUint, den: &BigUint, round: Round) -> StatusAnd<F> {
    debug_assert!(!den.is_zero());

    if num.is_zero() {
        return Status::OK.and(F::ZERO);
    }

    let precision = F::PRECISION as i64;
    let max_exp = i64::from(F::MAX_EXP);
    let min_exp = i64::from(F::MIN_EXP);

    // exp = floor(log2(num / den))
    let mut exp = num.bits() as i64 - den.bits() as i64;
    let below = if exp >= 0 {
        *num < (den << exp as usize)
    } else {
        (num << (-exp) as usize) < *den
    };
    if below {
        exp -= 1;
    }

    if exp > max_exp {
        return overflow(round);
    }

    // weight of the last significand bit
    let ulp = exp.max(min_exp) - (precision - 1);
    let (scaled, divisor) = if ulp <= 0 {
        (num << (-ulp) as usize, den.clone())
    } else {
        (num.clone(), den << ulp as usize)
    };
    let (mut sig, rem) = scaled.div_rem(&divisor);

    let is_inexact = !rem.is_zero();
    let round_up = is_inexact
        && match round {
            Round::TowardZero | Round::TowardNegative => false,
            Round::TowardPositive => true,
            Round::NearestTiesToAway => (&rem << 1u8) >= divisor,
            Round::NearestTiesToEven => {
                let twice = &rem << 1u8;
                twice > divisor || (twice == divisor && sig.bit(0))
            }
        };
    if round_up {
        sig += 1u8;
    }

    // a carry out of the significand bumps the exponent
    if !sig.is_zero() && ulp + sig.bits() as i64 - 1 > max_exp {
        return overflow(round);
    }

    let mut status = Status::OK;
    if is_inexact {
        status |= Status::INEXACT;
        if exp < min_exp {
            status |= Status::UNDERFLOW;
        }
    }

    // both steps are exact: `sig` has at most `precision + 1` bits and ends
    // on a power of two when it has that many
    let value = F::from_u128(sig.to_u128().unwrap_or(u128::MAX))
        .value
        .scalbn(ulp as ExpInt);
    status.and(value)
}

fn from_signed_ratio_r<F: Float>(num: &BigInt, den: &BigUint, round: Round) -> StatusAnd<F> {
    if num.sign() == Sign::Minus {
        let r = from_ratio_r::<F>(num.magnitude(), den, mirror(round));
        r.status.and(-r.value)
    } else {
        from_ratio_r(num.magnitude(), den, round)
    }
}

fn decompose<F: Format>(x: F) -> Option<(bool, BigUint, i64)> {
    if x.is_nan() || x.is_infinite() {
        return None;
    }

    let negative = x.is_negative();
    if x.is_zero() {
        return Some((negative, BigUint::zero(), 0));
    }

    let x = if negative { -x } else { x };
    let exp = i64::from(x.ilogb());
    let shift = i64::from(F::FORMAT.precision()) - 1 - exp;

    // Scaling the significand up to an integer is exact, denormals included.
    let sig = x.scalbn_r(ExpInt::try_from(shift).ok()?, Round::TowardZero);
    let mut is_exact = false;
    let sig = sig.to_u128_r(128, Round::TowardZero, &mut is_exact).value;
    debug_assert!(is_exact);

    Some((negative, BigUint::from(sig), -shift))
}

fn convert_to<S>(x: S, format: FloatFormat, round: Round) -> StatusAnd<BinaryFloat>
where
    S: FloatConvert<ieee::Half>
        + FloatConvert<ieee::BFloat>
        + FloatConvert<ieee::Single>
        + FloatConvert<ieee::Double>
        + FloatConvert<ieee::Quad>,
{
    let mut loses_info = false;
    each_format!(format, F => {
        tagged(<S as FloatConvert<F>>::convert_r(x, round, &mut loses_info))
    })
}

fn binary_op<F: Format>(
    lhs: F,
    rhs: BinaryFloat,
    round: Round,
    op: impl FnOnce(F, F, Round) -> StatusAnd<F>,
) -> StatusAnd<BinaryFloat> {
    let rhs = F::from_bits(rhs.convert(F::FORMAT, round).value.to_bits());
    tagged(op(lhs, rhs, round))
}

impl BinaryFloat {
    /// Rounds an integer into `format`.
    ///
    /// The status reports `OVERFLOW` when the rounded value exceeds the
    /// range of `format`, and `INEXACT` when rounding happened.
    pub fn from_bigint(format: FloatFormat, value: &BigInt, round: Round) -> StatusAnd<Self> {
        Self::from_ratio(format, value, &BigUint::one(), round)
    }

    /// Rounds the exact ratio `num / den` into `format`, rounding once.
    ///
    /// # Panics
    /// Panics if `den` is zero.
    pub fn from_ratio(
        format: FloatFormat,
        num: &BigInt,
        den: &BigUint,
        round: Round,
    ) -> StatusAnd<Self> {
        assert!(!den.is_zero(), "the denominator should not be zero");
        each_format!(format, F => tagged(from_signed_ratio_r::<F>(num, den, round)))
    }

    #[inline]
    pub fn from_f64(value: f64) -> Self {
        BinaryFloat::Double(ieee::Double::from_bits(u128::from(value.to_bits())))
    }

    #[inline]
    pub fn from_f32(value: f32) -> Self {
        BinaryFloat::Single(ieee::Single::from_bits(u128::from(value.to_bits())))
    }

    /// Rounds `self` to the nearest `f64`.
    pub fn to_f64(self) -> f64 {
        let double = self
            .convert(FloatFormat::Double, Round::NearestTiesToEven)
            .value;
        f64::from_bits(double.to_bits() as u64)
    }

    #[inline]
    pub fn format(&self) -> FloatFormat {
        match self {
            BinaryFloat::Half(_) => FloatFormat::Half,
            BinaryFloat::BFloat(_) => FloatFormat::BFloat,
            BinaryFloat::Single(_) => FloatFormat::Single,
            BinaryFloat::Double(_) => FloatFormat::Double,
            BinaryFloat::Quad(_) => FloatFormat::Quad,
        }
    }

    /// Raw IEEE bits, right aligned.
    #[inline]
    pub fn to_bits(self) -> u128 {
        each_value!(self, x => x.to_bits())
    }

    /// Converts `self` to `format`, rounding with `round`.
    pub fn convert(self, format: FloatFormat, round: Round) -> StatusAnd<Self> {
        each_value!(self, x => convert_to(x, format, round))
    }

    /// Computes `self * rhs` in the format of `self`.
    pub fn mul_r(self, rhs: Self, round: Round) -> StatusAnd<Self> {
        each_value!(self, x => binary_op(x, rhs, round, |a, b, r| a.mul_r(b, r)))
    }

    /// Computes `self / rhs` in the format of `self`.
    pub fn div_r(self, rhs: Self, round: Round) -> StatusAnd<Self> {
        each_value!(self, x => binary_op(x, rhs, round, |a, b, r| a.div_r(b, r)))
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        each_value!(self, x => x.is_nan())
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        each_value!(self, x => x.is_infinite())
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        each_value!(self, x => x.is_negative())
    }

    /// Splits a finite value into `(negative, significand, exponent)` such
    /// that its magnitude is exactly `significand * 2^exponent`.
    ///
    /// Returns `None` for NaN and infinities.
    pub fn decompose(self) -> Option<(bool, BigUint, i64)> {
        each_value!(self, x => decompose(x))
    }
}

impl fmt::Display for BinaryFloat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        each_value!(self, x => fmt::Display::fmt(x, f))
    }
}
