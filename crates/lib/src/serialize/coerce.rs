//! Scalar coercion rules shared by the scalar serializers.
//!
//! Integers accept native integers, floats without a fractional part, and
//! strings in decimal, `0x` hexadecimal or `0b` binary form (prefixes are
//! case-insensitive, a leading `-` is allowed). Out-of-range values are
//! reported, never truncated.
//!
//! ```
//! # use configtree::{node::Scalar, serialize::coerce};
//! assert_eq!(coerce::to_integer::<i32>(&Scalar::Text("0x2E9FA0D".into())), Ok(48888333));
//! assert!(coerce::to_integer::<i32>(&Scalar::Float(48888333.4)).is_err());
//! assert!(coerce::to_integer::<u8>(&Scalar::Int(348)).is_err());
//! assert_eq!(coerce::to_bool(&Scalar::Text("YES".into())), Ok(true));
//! ```

use std::num::IntErrorKind;

use super::CoercionError;
use crate::node::Scalar;

const TRUE_WORDS: &[&str] = &["true", "yes", "y", "t", "on", "1"];
const FALSE_WORDS: &[&str] = &["false", "no", "n", "f", "off", "0"];

/// Integer types reachable through [`to_integer`].
pub trait Integral: TryFrom<i128> + Copy {
    const NAME: &'static str;
}

macro_rules! integral {
    ($($ty:ty),*) => {
        $(impl Integral for $ty {
            const NAME: &'static str = stringify!($ty);
        })*
    };
}

integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn unparseable(scalar: &Scalar, target: &'static str) -> CoercionError {
    CoercionError::Unparseable {
        value: scalar.to_string(),
        target,
    }
}

/// Converts a scalar to an integer type with range checks.
pub fn to_integer<T: Integral>(scalar: &Scalar) -> Result<T, CoercionError> {
    let wide = match scalar {
        Scalar::Int(n) => i128::from(*n),
        Scalar::Float(x) => float_to_integral(*x, &x.to_string(), T::NAME)?,
        Scalar::Text(text) => parse_integer(text, T::NAME)?,
        Scalar::Bool(_) | Scalar::Opaque(_) => return Err(unparseable(scalar, T::NAME)),
    };
    T::try_from(wide).map_err(|_| CoercionError::OutOfRange {
        value: wide.to_string(),
        target: T::NAME,
    })
}

fn float_to_integral(x: f64, shown: &str, target: &'static str) -> Result<i128, CoercionError> {
    if x.is_nan() {
        return Err(CoercionError::Unparseable {
            value: shown.to_string(),
            target,
        });
    }
    if x.is_infinite() || x < i128::MIN as f64 || x >= i128::MAX as f64 {
        return Err(CoercionError::OutOfRange {
            value: shown.to_string(),
            target,
        });
    }
    if x.fract() != 0.0 {
        return Err(CoercionError::FractionalPart {
            value: shown.to_string(),
            target,
        });
    }
    Ok(x as i128)
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Parses decimal, `0x` hexadecimal or `0b` binary integer text.
///
/// Decimal text that only parses as a float follows the float rules, so
/// `"3.0"` reads as 3 and `"3.5"` fails with a fractional-part error.
pub fn parse_integer(text: &str, target: &'static str) -> Result<i128, CoercionError> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (radix, digits) = if let Some(hex) = strip_prefix_ignore_case(unsigned, "0x") {
        (16, hex)
    } else if let Some(bin) = strip_prefix_ignore_case(unsigned, "0b") {
        (2, bin)
    } else {
        (10, unsigned)
    };
    let malformed = || CoercionError::Unparseable {
        value: text.to_string(),
        target,
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(malformed());
    }
    match i128::from_str_radix(digits, radix) {
        Ok(magnitude) => Ok(if negative { -magnitude } else { magnitude }),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(CoercionError::OutOfRange {
                value: text.to_string(),
                target,
            })
        }
        Err(_) if radix == 10 => match trimmed.parse::<f64>() {
            Ok(x) => float_to_integral(x, text, target),
            Err(_) => Err(malformed()),
        },
        Err(_) => Err(malformed()),
    }
}

/// Converts a scalar to an `f64`.
pub fn to_f64(scalar: &Scalar) -> Result<f64, CoercionError> {
    match scalar {
        Scalar::Float(x) => Ok(*x),
        Scalar::Int(n) => Ok(*n as f64),
        Scalar::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| unparseable(scalar, "f64")),
        Scalar::Bool(_) | Scalar::Opaque(_) => Err(unparseable(scalar, "f64")),
    }
}

/// Converts a scalar to an `f32`. Finite values beyond `f32::MAX` are out of
/// range.
pub fn to_f32(scalar: &Scalar) -> Result<f32, CoercionError> {
    let wide = to_f64(scalar).map_err(|_| unparseable(scalar, "f32"))?;
    if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
        return Err(CoercionError::OutOfRange {
            value: scalar.to_string(),
            target: "f32",
        });
    }
    match scalar {
        Scalar::Text(text) => text
            .trim()
            .parse::<f32>()
            .map_err(|_| unparseable(scalar, "f32")),
        _ => Ok(wide as f32),
    }
}

/// Converts a scalar to a boolean.
///
/// Native booleans pass through. Text matches `true`/`yes`/`y`/`t`/`on`/`1`
/// or `false`/`no`/`n`/`f`/`off`/`0`, ignoring case. Anything else fails.
pub fn to_bool(scalar: &Scalar) -> Result<bool, CoercionError> {
    match scalar {
        Scalar::Bool(b) => Ok(*b),
        Scalar::Text(text) => {
            let text = text.trim();
            if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
                Ok(true)
            } else if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
                Ok(false)
            } else {
                Err(unparseable(scalar, "bool"))
            }
        }
        _ => Err(unparseable(scalar, "bool")),
    }
}

/// Converts a scalar to a `char`: one-character text, or an integer code
/// point.
pub fn to_char(scalar: &Scalar) -> Result<char, CoercionError> {
    match scalar {
        Scalar::Text(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(unparseable(scalar, "char")),
            }
        }
        Scalar::Int(_) => {
            let code: u32 = to_integer(scalar)?;
            char::from_u32(code).ok_or_else(|| unparseable(scalar, "char"))
        }
        _ => Err(unparseable(scalar, "char")),
    }
}
