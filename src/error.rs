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

//! Error types.

use crate::float::FloatFormat;
use std::error::Error;
use std::fmt;

/// An error which can be returned when parsing a decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDecimalError {
    kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseErrorKind {
    Empty,
    Invalid,
    Overflow,
}

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.kind {
            ParseErrorKind::Empty => write!(f, "cannot parse decimal from empty string"),
            ParseErrorKind::Invalid => write!(f, "invalid decimal literal"),
            ParseErrorKind::Overflow => write!(f, "value overflows decimal format"),
        }
    }
}

impl Error for ParseDecimalError {}

impl ParseDecimalError {
    #[inline]
    pub(crate) const fn new(kind: ParseErrorKind) -> Self {
        ParseDecimalError { kind }
    }

    #[inline]
    pub(crate) const fn empty() -> Self {
        Self::new(ParseErrorKind::Empty)
    }

    #[inline]
    pub(crate) const fn invalid() -> Self {
        Self::new(ParseErrorKind::Invalid)
    }

    #[inline]
    pub(crate) const fn overflow() -> Self {
        Self::new(ParseErrorKind::Overflow)
    }

    /// Checks if the literal did not fit the target semantics.
    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.kind == ParseErrorKind::Overflow
    }
}

/// Conditions reported by arithmetic and conversion operations.
///
/// Ordinary magnitude overflow is not an error: it is reported through the
/// `bool` of the `(value, overflow)` pair every operation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecimalError {
    /// The width or scale does not fit the packed semantics fields.
    #[error("decimal semantics (width {width}, lsb weight {lsb_weight}) is not representable")]
    UnrepresentableSemantics { width: i64, lsb_weight: i64 },

    /// The divisor's encoded magnitude is zero.
    #[error("attempt to divide by zero")]
    DivisionByZero,

    /// No binary floating point format in scope is wide enough.
    #[error("no binary floating point format wider than {0:?}")]
    NoWiderFloatFormat(FloatFormat),
}
