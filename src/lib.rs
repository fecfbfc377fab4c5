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

//! Arbitrary precision decimal floating point with configurable encoding
//! semantics.
//!
//! A [`DecFltSemantics`] describes one encoding: payload width, decimal
//! scale, signedness, overflow policy and an optional unsigned padding bit.
//! A [`DecimalFloat`] is an immutable payload tagged with its semantics.
//!
//! Every operation computes the exact result and then fits it into the
//! result semantics, reporting whether it overflowed:
//!
//! ```
//! use apdecimal::{DecFltSemantics, DecimalFloat};
//!
//! let sema = DecFltSemantics::new(8, 1, false, false, false).unwrap();
//! let value = DecimalFloat::parse("12.5", sema).unwrap();
//! let (sum, overflow) = value.add(&DecimalFloat::get_epsilon(&sema)).unwrap();
//! assert!(!overflow);
//! assert_eq!(sum.to_string(), "12.6");
//! ```

mod convert;
mod error;
mod float;
mod num;
mod parse;
mod sema;
mod var;

pub use crate::error::{DecimalError, ParseDecimalError};
pub use crate::float::{BinaryFloat, FloatFormat};
pub use crate::num::DecimalFloat;
pub use crate::sema::{DecFltSemantics, MAX_LSB_WEIGHT, MAX_WIDTH, MIN_LSB_WEIGHT};
pub use rustc_apfloat::{Round, Status, StatusAnd};

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use std::cmp::Ordering;

    fn sema(
        width: u32,
        scale: i32,
        signed: bool,
        saturated: bool,
        padded: bool,
    ) -> DecFltSemantics {
        DecFltSemantics::new(width, scale, signed, saturated, padded).unwrap()
    }

    #[test]
    fn add_one_ulp() {
        let s = sema(8, 1, false, false, false);
        let value = DecimalFloat::new(125u32.into(), s);
        assert_eq!(value.to_string(), "12.5");

        let (sum, overflow) = value.add(&DecimalFloat::get_epsilon(&s)).unwrap();
        assert!(!overflow);
        assert_eq!(sum.to_string(), "12.6");
    }

    #[test]
    fn common_semantics_gains_sign_bit() {
        let s1 = sema(8, 0, true, false, false);
        let s2 = sema(8, 2, false, false, true);
        let common = s1.get_common_semantics(&s2).unwrap();
        assert_eq!(common.lsb_weight(), -2);
        assert_eq!(common.width(), 10);
        assert!(common.is_signed());
    }

    #[test]
    fn float_fit() {
        let narrow = sema(8, 0, true, false, false);
        assert!(narrow.fits_in_float_semantics(FloatFormat::Single));

        let wide = sema(64, 0, true, false, false);
        assert!(wide.integral_bits() > FloatFormat::Half.precision());
        assert!(!wide.fits_in_float_semantics(FloatFormat::Half));
    }

    #[test]
    fn mixed_pipeline() {
        let price = sema(32, 2, true, true, false);
        let rate = sema(16, 4, false, false, true);

        let amount = DecimalFloat::parse("1999.99", price).unwrap();
        let tax = DecimalFloat::parse("0.0825", rate).unwrap();

        let (levy, overflow) = amount.mul(&tax).unwrap();
        assert!(!overflow);
        assert_eq!(levy.semantics().scale(), 4);
        assert!(levy.semantics().is_saturated());
        assert_eq!(levy.to_string(), "164.9991");

        let (total, overflow) = amount.add(&levy).unwrap();
        assert!(!overflow);
        assert_eq!(total.to_string(), "2164.9891");

        let (rounded, overflow) = total.convert(&price);
        assert!(!overflow);
        assert_eq!(rounded.to_string(), "2164.98");
        assert_eq!(rounded.compare(&amount), Ordering::Greater);

        let (units, overflow) = rounded.to_int(16, false);
        assert!(!overflow);
        assert_eq!(units, BigInt::from(2164));

        let approx = rounded
            .to_float(FloatFormat::Double, Round::NearestTiesToEven)
            .unwrap();
        assert_eq!(approx.to_f64(), 2164.98);

        let (back, overflow) = DecimalFloat::get_from_float_value(approx, &price);
        assert!(!overflow);
        assert!(back.compare(&rounded) != Ordering::Greater);
    }

    #[test]
    fn errors_are_distinct() {
        let s = sema(16, 2, true, true, false);
        let one = DecimalFloat::parse("1", s).unwrap();
        let zero = DecimalFloat::zero(s);
        assert_eq!(one.div(&zero), Err(DecimalError::DivisionByZero));

        let err = DecimalFloat::parse("1000", s).unwrap_err();
        assert!(err.is_overflow());
    }
}
