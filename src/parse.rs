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

//! Decimal parsing utilities.

use crate::error::ParseDecimalError;
use crate::num::DecimalFloat;
use crate::sema::DecFltSemantics;
use crate::var::{encode, pow10};
use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_traits::Zero;
use smallvec::SmallVec;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Sign {
    Positive,
    Negative,
}

/// The interesting parts of a decimal string.
#[derive(Debug)]
struct Decimal<'a> {
    pub sign: Sign,
    pub integral: &'a [u8],
    pub fractional: &'a [u8],
    pub exp: i32,
}

/// Checks if the input string is a valid decimal and if so, locate the integral
/// part, the fractional part, and the exponent in it.
fn parse_decimal(s: &[u8]) -> Result<(Decimal, &[u8]), ParseDecimalError> {
    let (sign, s) = extract_sign(s);

    if s.is_empty() {
        return Err(ParseDecimalError::invalid());
    }

    let (integral, s) = eat_digits(s);

    let (fractional, exp, s) = match s.first() {
        Some(&b'e') | Some(&b'E') => {
            if integral.is_empty() {
                return Err(ParseDecimalError::invalid());
            }

            let (exp, s) = extract_exponent(&s[1..])?;
            (b"".as_ref(), exp, s)
        }
        Some(&b'.') => {
            let (fractional, s) = eat_digits(&s[1..]);
            if integral.is_empty() && fractional.is_empty() {
                return Err(ParseDecimalError::invalid());
            }

            match s.first() {
                Some(&b'e') | Some(&b'E') => {
                    let (exp, s) = extract_exponent(&s[1..])?;
                    (fractional, exp, s)
                }
                _ => (fractional, 0, s),
            }
        }
        _ => {
            if integral.is_empty() {
                return Err(ParseDecimalError::invalid());
            }

            (b"".as_ref(), 0, s)
        }
    };

    Ok((
        Decimal {
            sign,
            integral,
            fractional,
            exp,
        },
        s,
    ))
}

/// Carves off whitespaces up to the first non-whitespace character.
#[inline]
fn eat_whitespaces(s: &[u8]) -> &[u8] {
    let i = s.iter().take_while(|&i| i.is_ascii_whitespace()).count();
    &s[i..]
}

/// Carves off decimal digits up to the first non-digit character.
#[inline]
fn eat_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let i = s.iter().take_while(|&i| i.is_ascii_digit()).count();
    (&s[..i], &s[i..])
}

/// Splits a decimal string bytes into sign and the rest, without inspecting or validating the rest.
#[inline]
fn extract_sign(s: &[u8]) -> (Sign, &[u8]) {
    match s.first() {
        Some(b'+') => (Sign::Positive, &s[1..]),
        Some(b'-') => (Sign::Negative, &s[1..]),
        _ => (Sign::Positive, s),
    }
}

/// Extracts exponent, if any.
fn extract_exponent(s: &[u8]) -> Result<(i32, &[u8]), ParseDecimalError> {
    let (sign, s) = extract_sign(s);
    let (mut number, s) = eat_digits(s);

    if number.is_empty() {
        return Err(ParseDecimalError::invalid());
    }

    while number.first() == Some(&b'0') {
        number = &number[1..];
    }

    // Any exponent this small truncates every digit away.
    let floor = -(i32::MAX / 2);

    if number.len() > 10 {
        return match sign {
            Sign::Positive => Err(ParseDecimalError::overflow()),
            Sign::Negative => Ok((floor, s)),
        };
    }

    let exp = {
        let mut result: i64 = 0;
        for &n in number {
            result = result * 10 + (n - b'0') as i64;
        }
        match sign {
            Sign::Positive => result,
            Sign::Negative => -result,
        }
    };

    // Keeps the digit shift below well inside `i64`.
    if exp >= i64::from(i32::MAX / 2) {
        return Err(ParseDecimalError::overflow());
    }
    if exp <= i64::from(floor) {
        return Ok((floor, s));
    }

    Ok((exp as i32, s))
}

/// Parses a string bytes into an integer count of units of `lsb_weight`.
///
/// Digits below `lsb_weight` are truncated toward zero. Returns `None` if the
/// integer would need more than `max_bits` bits.
///
/// This function does not handle leading or trailing spaces. It returns the
/// remaining string bytes so that caller can check for trailing spaces/garbage
/// if deemed necessary.
fn parse_str(
    s: &[u8],
    lsb_weight: i32,
    max_bits: u32,
) -> Result<(Option<BigInt>, &[u8]), ParseDecimalError> {
    let (
        Decimal {
            sign,
            integral,
            fractional,
            exp,
        },
        s,
    ) = parse_decimal(s)?;

    let mut dec_digits: SmallVec<[u8; 128]> =
        SmallVec::with_capacity(integral.len() + fractional.len());
    dec_digits.extend(integral.iter().map(|&i| i - b'0'));
    dec_digits.extend(fractional.iter().map(|&i| i - b'0'));

    let magnitude = BigUint::from_radix_be(&dec_digits, 10).unwrap_or_else(BigUint::zero);
    if magnitude.is_zero() {
        return Ok((Some(BigInt::zero()), s));
    }

    // the literal is `magnitude * 10^(exp - fractional.len())`
    let shift = i64::from(exp) - fractional.len() as i64 - i64::from(lsb_weight);
    let magnitude = if shift >= 0 {
        // every power of ten adds at least one bit
        if shift > i64::from(max_bits) {
            return Ok((None, s));
        }
        BigInt::from_biguint(BigSign::Plus, magnitude) * pow10(shift as u32)
    } else if -shift > dec_digits.len() as i64 {
        BigInt::zero()
    } else {
        BigInt::from_biguint(BigSign::Plus, magnitude) / pow10((-shift) as u32)
    };

    let value = match sign {
        Sign::Positive => magnitude,
        Sign::Negative => -magnitude,
    };

    Ok((Some(value), s))
}

/// Parses a string slice and creates a decimal of `sema`.
///
/// This function handles leading or trailing spaces.
fn from_str(s: &str, sema: &DecFltSemantics) -> Result<DecimalFloat, ParseDecimalError> {
    let s = s.as_bytes();
    let s = eat_whitespaces(s);
    if s.is_empty() {
        return Err(ParseDecimalError::empty());
    }

    let (value, s) = parse_str(s, sema.lsb_weight(), sema.width())?;

    if s.iter().any(|n| !n.is_ascii_whitespace()) {
        return Err(ParseDecimalError::invalid());
    }

    match value {
        Some(value) if value >= sema.min_int() && value <= sema.max_int() => {
            Ok(DecimalFloat::new(encode(&value, sema), *sema))
        }
        _ => Err(ParseDecimalError::overflow()),
    }
}

impl DecimalFloat {
    /// Parses a decimal literal into a value of `sema`.
    ///
    /// Accepts `[+|-]digits[.digits][(e|E)[+|-]digits]` surrounded by optional
    /// whitespace, where either the integral or the fractional digits may be
    /// omitted. Digits below the scale of `sema` are truncated toward zero.
    ///
    /// Returns an overflow error if the value does not fit `sema`.
    #[inline]
    pub fn parse(s: &str, sema: DecFltSemantics) -> Result<DecimalFloat, ParseDecimalError> {
        from_str(s, &sema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::tests::arb_semantics;
    use crate::var::DecimalVar;
    use proptest::prelude::*;

    fn sema(width: u32, scale: i32, signed: bool) -> DecFltSemantics {
        DecFltSemantics::new(width, scale, signed, false, false).unwrap()
    }

    fn wide() -> DecFltSemantics {
        sema(256, 6, true)
    }

    fn assert_parse_empty<S: AsRef<str>>(s: S) {
        let result = DecimalFloat::parse(s.as_ref(), wide());
        assert_eq!(result.unwrap_err(), ParseDecimalError::empty());
    }

    fn assert_parse_invalid<S: AsRef<str>>(s: S) {
        let result = DecimalFloat::parse(s.as_ref(), wide());
        assert_eq!(result.unwrap_err(), ParseDecimalError::invalid());
    }

    fn assert_parse_overflow<S: AsRef<str>>(s: S, sema: DecFltSemantics) {
        let result = DecimalFloat::parse(s.as_ref(), sema);
        assert_eq!(result.unwrap_err(), ParseDecimalError::overflow());
    }

    #[test]
    fn parse_error() {
        assert_parse_empty("");
        assert_parse_empty("   ");
        assert_parse_invalid("-");
        assert_parse_invalid("   -   ");
        assert_parse_invalid("-.");
        assert_parse_invalid("- 1");
        assert_parse_invalid("NaN");
        assert_parse_invalid("inf");
        assert_parse_invalid(".");
        assert_parse_invalid("   .   ");
        assert_parse_invalid("e");
        assert_parse_invalid("   e   ");
        assert_parse_invalid("-e");
        assert_parse_invalid("-1e");
        assert_parse_invalid("1e1.1");
        assert_parse_invalid("-1 e1");
        assert_parse_invalid("1.2.3");
        assert_parse_invalid("   x   ");
        assert_parse_invalid("12x");
    }

    #[test]
    fn parse_overflow() {
        assert_parse_overflow("1e10000000000", wide());
        assert_parse_overflow("1e2147483648", wide());

        let s = sema(8, 1, false);
        assert_parse_overflow("25.6", s);
        assert_parse_overflow("-0.1", s);
        assert_parse_overflow("1e30", s);

        let s = sema(8, 0, true);
        assert_parse_overflow("128", s);
        assert_parse_overflow("-129", s);
        assert_parse_overflow("1e1000", s);

        let padded = DecFltSemantics::new(8, 0, false, false, true).unwrap();
        assert_parse_overflow("128", padded);
    }

    fn assert_parse<S: AsRef<str>, V: AsRef<str>>(s: S, sema: DecFltSemantics, expected: V) {
        let decimal = DecimalFloat::parse(s.as_ref(), sema).unwrap();
        assert_eq!(decimal.to_string(), expected.as_ref());
        assert_eq!(decimal.semantics(), sema);
    }

    #[test]
    fn parse_valid() {
        let int = sema(160, 0, true);

        // Integer
        assert_parse("0", int, "0");
        assert_parse("-0", int, "0");
        assert_parse("   -0   ", int, "0");
        assert_parse("00000.", int, "0");
        assert_parse("+128", int, "128");
        assert_parse("-128", int, "-128");
        assert_parse("4294967296", int, "4294967296");
        assert_parse(
            "-340282366920938463463374607431768211456",
            int,
            "-340282366920938463463374607431768211456",
        );
        assert_parse("000000000123", int, "123");
        assert_parse("-000000000123", int, "-123");

        // Fixed-point number
        let s = wide();
        assert_parse("0.0", s, "0.000000");
        assert_parse("-0.0", s, "0.000000");
        assert_parse(".5", s, "0.500000");
        assert_parse("-.5", s, "-0.500000");
        assert_parse("128.128", s, "128.128000");
        assert_parse("-65536.65536", s, "-65536.655360");
        assert_parse(
            "18446744073709551616.184467",
            s,
            "18446744073709551616.184467",
        );
        assert_parse("000000000123.000000000123", s, "123.000000");

        // Scientific notation
        assert_parse("0e0", s, "0.000000");
        assert_parse("-0000000000E-0000000000", s, "0.000000");
        assert_parse("00000000001e00000000001", s, "10.000000");
        assert_parse("-00000000001e-00000000001", s, "-0.100000");
        assert_parse("1e10", s, "10000000000.000000");
        assert_parse("-1e-6", s, "-0.000001");
        assert_parse("0000001.23456000e3", s, "1234.560000");
        assert_parse("-0000001.23456000E-3", s, "-0.001234");
        assert_parse("1e-1000", s, "0.000000");
        assert_parse("1e-1073741823", s, "0.000000");
        assert_parse("1e-2147483648", s, "0.000000");
        assert_parse("-1e-99999999999999", s, "0.000000");
        assert_parse("123456789e-00000000000000000009", s, "0.123456");
        assert_parse("0e1000000", s, "0.000000");

        // Coarse scales
        let s = sema(16, -2, true);
        assert_parse("1234", s, "1200");
        assert_parse("-1299.99", s, "-1200");
        assert_parse("99", s, "0");
        assert_parse("1.5e3", s, "1500");
    }

    #[test]
    fn parse_truncates() {
        let s = sema(16, 1, true);
        assert_parse("12.59", s, "12.5");
        assert_parse("-12.59", s, "-12.5");
        assert_parse("-0.09", s, "0.0");

        let s = sema(8, 1, false);
        assert_parse("25.5", s, "25.5");
        assert_parse("25.59", s, "25.5");
    }

    #[test]
    fn parse_bounds() {
        let s = sema(8, 0, true);
        assert_eq!(DecimalFloat::parse("127", s).unwrap(), DecimalFloat::get_max(&s));
        assert_eq!(DecimalFloat::parse("-128", s).unwrap(), DecimalFloat::get_min(&s));

        let s = sema(8, 2, false);
        assert_eq!(DecimalFloat::parse("2.55", s).unwrap(), DecimalFloat::get_max(&s));
        assert_eq!(DecimalFloat::parse("-0.001", s).unwrap(), DecimalFloat::zero(s));
    }

    proptest! {
        #[test]
        fn to_string_then_parse(s in arb_semantics(), raw in any::<i128>()) {
            let (value, _) = DecimalVar::new(BigInt::from(raw), s.lsb_weight()).make_result(&s);
            let text = value.to_string();
            let parsed = DecimalFloat::parse(&text, s).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
